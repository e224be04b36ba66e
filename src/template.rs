//! `{path}` placeholder substitution
//!
//! Every `{inner}` occurrence in a template is resolved as a dotted path
//! against a [`RootList`]. Scalars are stringified in place. Containers are
//! plucked out of the template instead: their placeholder renders as the
//! empty string and the value itself is returned alongside the text.
//!
//! ```rust
//! use pathsub::{sub, Substitution};
//! use serde_json::json;
//!
//! let mut data = json!({"bar": "far"});
//! assert_eq!(sub("foo {bar}", &mut data, None), Substitution::Text("foo far".into()));
//! ```

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{CaptureMatches, Regex};
use serde_json::Value;
use tracing::trace;

use crate::path::{resolve, MutationMode, Path, RootList};
use crate::value::{display_string, is_container};

/// Result of a substitution
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    /// Every placeholder resolved to a scalar (or nothing)
    Text(String),
    /// At least one placeholder resolved to a container
    Extracted { text: String, values: Vec<Value> },
}

impl Substitution {
    /// The substituted text, with extracted placeholders rendered empty
    pub fn text(&self) -> &str {
        match self {
            Substitution::Text(text) => text,
            Substitution::Extracted { text, .. } => text,
        }
    }

    /// Containers found in the template, in the order encountered
    pub fn values(&self) -> &[Value] {
        match self {
            Substitution::Text(_) => &[],
            Substitution::Extracted { values, .. } => values,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, Substitution::Extracted { .. })
    }

    /// Flatten into the `[text, values...]` sequence
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Substitution::Text(text) => vec![Value::String(text)],
            Substitution::Extracted { text, values } => {
                let mut out = Vec::with_capacity(values.len() + 1);
                out.push(Value::String(text));
                out.extend(values);
                out
            }
        }
    }

    /// A string for [`Substitution::Text`], an array otherwise
    pub fn into_value(self) -> Value {
        match self {
            Substitution::Text(text) => Value::String(text),
            extracted => Value::Array(extracted.into_values()),
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A `{inner}` occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'t> {
    /// Byte range of the whole placeholder, braces included
    pub span: Range<usize>,
    /// Text between the braces; never empty and never contains `}`
    pub inner: &'t str,
}

/// `{inner}` where `inner` runs up to the first `}`
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// Iterator over the non-overlapping placeholders of a template
#[derive(Debug)]
pub struct Placeholders<'t> {
    matches: CaptureMatches<'static, 't>,
}

impl<'t> Iterator for Placeholders<'t> {
    type Item = Placeholder<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.matches.next()?;
        let whole = captures.get(0)?;
        let inner = captures.get(1)?;
        Some(Placeholder {
            span: whole.range(),
            inner: inner.as_str(),
        })
    }
}

/// Scan `template` left to right for `{inner}` placeholders
///
/// `inner` is never empty and may itself contain `{`, so `{}` is left as
/// text and `{{a}}` names the path `{a`.
pub fn placeholders(template: &str) -> Placeholders<'_> {
    Placeholders {
        matches: PLACEHOLDER.captures_iter(template),
    }
}

/// Replace every placeholder in `template` with its value from `roots`
///
/// Each placeholder is resolved with `mode`, so a template can consume
/// (`DeleteOnFind`) or materialize (`Create`) the properties it names.
pub fn substitute(template: &str, roots: &mut RootList<'_>, mode: MutationMode) -> Substitution {
    let mut text = String::with_capacity(template.len());
    let mut values = Vec::new();
    let mut last = 0;

    for placeholder in placeholders(template) {
        text.push_str(&template[last..placeholder.span.start]);
        last = placeholder.span.end;

        match resolve(&Path::new(placeholder.inner), roots, mode) {
            Some(value) if is_container(&value) => {
                trace!(path = placeholder.inner, "extracted container");
                values.push(value);
            }
            scalar => text.push_str(&display_string(scalar.as_ref())),
        }
    }
    text.push_str(&template[last..]);

    if values.is_empty() {
        Substitution::Text(text)
    } else {
        Substitution::Extracted { text, values }
    }
}

/// Replace `{path}` placeholders in `template` with values from `data`
///
/// The `remove` flag is negated and then read as the `add` flag of
/// [`crate::get_object`]: `Some(true)` removes each found property,
/// `Some(false)` creates missing ones, `None` only reads.
pub fn sub<'a>(template: &str, data: impl Into<RootList<'a>>, remove: Option<bool>) -> Substitution {
    let mode = MutationMode::from_add_flag(remove.map(|r| !r));
    substitute(template, &mut data.into(), mode)
}
