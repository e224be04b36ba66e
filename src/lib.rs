//! pathsub - dotted path lookup and `{path}` template substitution
//!
//! This library resolves dotted paths such as `user.address.city` against one
//! or more root objects, optionally creating missing objects or removing what
//! it finds, and substitutes `{path}` placeholders in templates.
//!
//! # Example
//!
//! ```rust
//! use pathsub::{get_object, sub};
//! use serde_json::json;
//!
//! let mut data = json!({"foo": {"bar": "car"}});
//! assert_eq!(get_object("foo.bar", &mut data, None), Some(json!("car")));
//! assert_eq!(sub("foo {foo.bar}", &mut data, None).text(), "foo car");
//! ```

pub mod case;
pub mod context;
pub mod error;
pub mod path;
pub mod template;
pub mod value;

pub use case::{camelize, capitalize, classize, escape_html, nice_name, underscore};
pub use context::{ContextError, DataContext, DataFormat};
pub use error::PathError;
pub use path::{get_object, lookup, resolve, MutationMode, Path, RootList};
pub use template::{placeholders, sub, substitute, Placeholder, Substitution};
pub use value::is_container;

use thiserror::Error;

/// Errors surfaced by the command line front end
#[derive(Debug, Error)]
pub enum Error {
    /// A path expression failed strict validation
    #[error("{0}")]
    Path(#[from] PathError),

    /// A data context could not be loaded or saved
    #[error("{0}")]
    Context(#[from] ContextError),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A result could not be serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
