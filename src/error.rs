//! Error types for path validation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in a path expression
pub type Span = std::ops::Range<usize>;

/// Errors produced by the strict path parser
///
/// The resolver itself never fails: a missing path resolves to `None`.
/// Only [`crate::Path::parse`] reports misuse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path at {span:?}: {message}")]
    InvalidArgument { span: Span, message: String },
}

impl PathError {
    pub fn span(&self) -> &Span {
        match self {
            PathError::InvalidArgument { span, .. } => span,
        }
    }

    /// Format the error with the offending path underlined using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            PathError::InvalidArgument { span, message } => {
                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(message)
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
