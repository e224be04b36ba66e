//! String case helpers and HTML escaping
//!
//! ```rust
//! use pathsub::case;
//!
//! assert_eq!(case::underscore("OneTwo"), "one_two");
//! assert_eq!(case::camelize("some-string"), "someString");
//! assert_eq!(case::escape_html("<b>"), "&lt;b&gt;");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// `_` or `-` word separators
static WORD_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"_|-").expect("valid regex"));

/// An acronym followed by a capitalized word (`HTMLParser`)
static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid regex"));

/// A lowercase letter or digit followed by an uppercase letter (`oneTwo`)
static CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched
fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert `CamelCase` to `snake_case`
///
/// The first `==` becomes `/`, so `Foo==Bar` underscores to `foo/bar`.
pub fn underscore(s: &str) -> String {
    let s = s.replacen("==", "/", 1);
    let s = ACRONYM_BOUNDARY.replace_all(&s, "${1}_${2}");
    let s = CASE_BOUNDARY.replace_all(&s, "${1}_${2}");
    s.to_lowercase()
}

/// Capitalize every `_`/`-` separated word and join them with `join`
fn join_capitalized(s: &str, join: &str) -> String {
    WORD_SEPARATOR
        .split(s)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(join)
}

/// `some_string` or `some-string` to `SomeString`
pub fn classize(s: &str) -> String {
    join_capitalized(s, "")
}

/// `some_string` or `some-string` to `someString`
pub fn camelize(s: &str) -> String {
    decapitalize(&classize(s))
}

/// `some_string` to `Some String`
pub fn nice_name(s: &str) -> String {
    join_capitalized(s, " ")
}

/// Replace `&`, `<`, `>`, `"` and `'` with HTML entities
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
