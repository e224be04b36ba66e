//! Dotted path resolution against a list of root objects
//!
//! A path such as `app.models.recipe` is looked up in each root in turn; the
//! first root that yields a value wins. The same walk serves three purposes,
//! selected by [`MutationMode`]: a plain read, a read that materializes
//! missing containers, and a read that removes what it finds.
//!
//! # Example
//!
//! ```rust
//! use pathsub::{resolve, MutationMode, Path, RootList};
//! use serde_json::json;
//!
//! let mut root = json!({"foo": {"bar": "car"}});
//! let mut roots = RootList::from(&mut root);
//! let value = resolve(&Path::new("foo.bar"), &mut roots, MutationMode::None);
//! assert_eq!(value, Some(json!("car")));
//! ```

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::PathError;
use crate::value::{is_container, is_truthy};

/// An ordered list of property names split from a dotted string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<'a> {
    segments: Vec<&'a str>,
}

impl<'a> Path<'a> {
    /// Split `source` on `.` without validation
    ///
    /// Empty input yields an empty path. Empty segments (`a..b`) are kept
    /// and looked up as the empty property name.
    pub fn new(source: &'a str) -> Self {
        if source.is_empty() {
            return Self {
                segments: Vec::new(),
            };
        }
        Self {
            segments: source.split('.').collect(),
        }
    }

    /// Split `source` on `.`, rejecting empty segments
    pub fn parse(source: &'a str) -> Result<Self, PathError> {
        let path = Self::new(source);
        let mut start = 0;
        for segment in &path.segments {
            if segment.is_empty() {
                // Point at the dot that produced the empty segment
                let span = if start == 0 { 0..1 } else { start - 1..start };
                return Err(PathError::InvalidArgument {
                    span,
                    message: "empty path segment".to_string(),
                });
            }
            start += segment.len() + 1;
        }
        Ok(path)
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// How a lookup may modify the roots it walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationMode {
    /// Pure read
    #[default]
    None,
    /// Missing containers along the path (and a missing leaf) are created as
    /// empty objects
    Create,
    /// A found leaf is removed from its parent and returned
    DeleteOnFind,
}

impl MutationMode {
    /// Map the tri-state `add` flag of [`get_object`] to a mode
    ///
    /// `None` reads, `Some(true)` creates, `Some(false)` deletes on find.
    pub fn from_add_flag(add: Option<bool>) -> Self {
        match add {
            None => MutationMode::None,
            Some(true) => MutationMode::Create,
            Some(false) => MutationMode::DeleteOnFind,
        }
    }
}

/// Candidate roots in priority order
#[derive(Debug, Default)]
pub struct RootList<'a> {
    roots: Vec<&'a mut Value>,
}

impl<'a> RootList<'a> {
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Append a root with the lowest priority so far
    pub fn push(&mut self, root: &'a mut Value) {
        self.roots.push(root);
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn first(&self) -> Option<&Value> {
        self.roots.first().map(|root| &**root)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.roots.iter().map(|root| &**root)
    }
}

/// A single value becomes a one-root list; an array supplies one root per
/// element.
impl<'a> From<&'a mut Value> for RootList<'a> {
    fn from(value: &'a mut Value) -> Self {
        match value {
            Value::Array(items) => Self {
                roots: items.iter_mut().collect(),
            },
            other => Self { roots: vec![other] },
        }
    }
}

impl<'a> From<Vec<&'a mut Value>> for RootList<'a> {
    fn from(roots: Vec<&'a mut Value>) -> Self {
        Self { roots }
    }
}

impl<'a> From<&'a mut [Value]> for RootList<'a> {
    fn from(roots: &'a mut [Value]) -> Self {
        Self {
            roots: roots.iter_mut().collect(),
        }
    }
}

impl<'a> IntoIterator for RootList<'a> {
    type Item = &'a mut Value;
    type IntoIter = std::vec::IntoIter<&'a mut Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.into_iter()
    }
}

impl<'a> FromIterator<&'a mut Value> for RootList<'a> {
    fn from_iter<I: IntoIterator<Item = &'a mut Value>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().collect(),
        }
    }
}

/// Resolve `path` against `roots`, applying `mode` to the root that matches
///
/// An empty path returns the first root untouched. The search stops at the
/// first falsy root (`null`, `false`, `0`, `""`). A root whose walk hits a
/// missing or non-object intermediate is skipped in favour of the next one.
pub fn resolve(path: &Path<'_>, roots: &mut RootList<'_>, mode: MutationMode) -> Option<Value> {
    let Some((leaf, parents)) = path.segments.split_last() else {
        return roots.first().cloned();
    };

    for (index, root) in roots.roots.iter_mut().enumerate() {
        if !is_truthy(&**root) {
            trace!(index, "falsy root ends the search");
            break;
        }

        let Some(parent) = walk(&mut **root, parents, mode) else {
            trace!(index, path = ?path.segments, "walk aborted, trying next root");
            continue;
        };

        if let Some(found) = take_leaf(parent, leaf, mode) {
            trace!(index, path = ?path.segments, "resolved");
            return Some(found);
        }
    }

    None
}

/// Resolve `path` against `roots` without any possibility of mutation
///
/// Follows the same search order as [`resolve`] in [`MutationMode::None`],
/// but borrows the result instead of cloning it.
pub fn lookup<'v>(path: &Path<'_>, roots: &[&'v Value]) -> Option<&'v Value> {
    let Some((leaf, parents)) = path.segments.split_last() else {
        return roots.first().copied();
    };

    for root in roots {
        if !is_truthy(root) {
            break;
        }
        let parent = parents
            .iter()
            .try_fold(*root, |current, segment| current.as_object()?.get(*segment));
        if let Some(found) = parent.and_then(|p| p.as_object()).and_then(|m| m.get(*leaf)) {
            return Some(found);
        }
    }

    None
}

/// Look up the dotted `name` in `roots`
///
/// `add` selects the side effect: `None` reads only, `Some(true)` creates
/// missing objects along the path, `Some(false)` removes the found property.
///
/// ```rust
/// use pathsub::get_object;
/// use serde_json::json;
///
/// let mut root = json!({});
/// get_object("a.b.c", &mut root, Some(true));
/// assert_eq!(root, json!({"a": {"b": {"c": {}}}}));
/// ```
pub fn get_object<'a>(
    name: &str,
    roots: impl Into<RootList<'a>>,
    add: Option<bool>,
) -> Option<Value> {
    let mut roots = roots.into();
    resolve(&Path::new(name), &mut roots, MutationMode::from_add_flag(add))
}

/// Walk all but the last segment, returning the object that should hold the
/// leaf
fn walk<'v>(
    root: &'v mut Value,
    segments: &[&str],
    mode: MutationMode,
) -> Option<&'v mut Map<String, Value>> {
    let mut current = root;
    for segment in segments {
        current = next(current, segment, mode)?;
    }
    if !is_container(current) {
        return None;
    }
    // Arrays are containers without named properties
    current.as_object_mut()
}

fn next<'v>(current: &'v mut Value, segment: &str, mode: MutationMode) -> Option<&'v mut Value> {
    let map = current.as_object_mut()?;
    if mode == MutationMode::Create && !map.contains_key(segment) {
        debug!(segment, "creating missing container");
        map.insert(segment.to_string(), Value::Object(Map::new()));
    }
    map.get_mut(segment)
}

fn take_leaf(parent: &mut Map<String, Value>, leaf: &str, mode: MutationMode) -> Option<Value> {
    match mode {
        MutationMode::None => parent.get(leaf).cloned(),
        MutationMode::Create => {
            if !parent.contains_key(leaf) {
                debug!(segment = leaf, "creating missing leaf");
            }
            Some(
                parent
                    .entry(leaf)
                    .or_insert_with(|| Value::Object(Map::new()))
                    .clone(),
            )
        }
        MutationMode::DeleteOnFind => {
            let removed = parent.remove(leaf);
            if removed.is_some() {
                debug!(segment = leaf, "removed found property");
            }
            removed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_path_split() {
        assert_eq!(Path::new("a.b.c").segments(), &["a", "b", "c"]);
        assert_eq!(Path::new("single").len(), 1);
        assert!(Path::new("").is_empty());
        assert_eq!(Path::new("a..b").segments(), &["a", "", "b"]);
    }

    #[test]
    fn test_path_parse_rejects_empty_segments() {
        assert!(Path::parse("a.b").is_ok());
        assert!(Path::parse("").is_ok());

        let err = Path::parse("a..b").unwrap_err();
        assert_eq!(err.span(), &(1..2));

        let err = Path::parse(".a").unwrap_err();
        assert_eq!(err.span(), &(0..1));

        let err = Path::parse("a.").unwrap_err();
        assert_eq!(err.span(), &(1..2));
    }

    #[test]
    fn test_mode_from_add_flag() {
        assert_eq!(MutationMode::from_add_flag(None), MutationMode::None);
        assert_eq!(MutationMode::from_add_flag(Some(true)), MutationMode::Create);
        assert_eq!(
            MutationMode::from_add_flag(Some(false)),
            MutationMode::DeleteOnFind
        );
        assert_eq!(MutationMode::default(), MutationMode::None);
    }

    #[test]
    fn test_root_list_from_array_spreads() {
        let mut data = json!([{"a": 1}, {"b": 2}]);
        let roots = RootList::from(&mut data);
        assert_eq!(roots.len(), 2);
    }

    #[test]
    fn test_root_list_from_object_is_single() {
        let mut data = json!({"a": 1});
        let roots = RootList::from(&mut data);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots.first(), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_resolve_existing_leaf() {
        let mut root = json!({"Foo": {"Bar": {"Zar": "Ted"}}});
        let value = get_object("Foo.Bar.Zar", &mut root, None);
        assert_eq!(value, Some(json!("Ted")));
    }

    #[test]
    fn test_resolve_intermediate_container() {
        let mut root = json!({"foo": {"bar": {"k": 1}}});
        assert_eq!(get_object("foo.bar", &mut root, None), Some(json!({"k": 1})));
    }

    #[test]
    fn test_empty_path_returns_first_root() {
        let mut roots = vec![json!({"a": 1}), json!({"b": 2})];
        let value = get_object("", roots.as_mut_slice(), Some(false));
        assert_eq!(value, Some(json!({"a": 1})));
        assert_eq!(roots[0], json!({"a": 1}));
    }

    #[test]
    fn test_empty_path_with_no_roots() {
        assert_eq!(get_object("", RootList::new(), None), None);
    }

    #[test]
    fn test_missing_path_is_none() {
        let mut root = json!({"a": {}});
        assert_eq!(get_object("a.b.c", &mut root, None), None);
        assert_eq!(get_object("x", &mut root, None), None);
    }

    #[test]
    fn test_scalar_intermediate_aborts() {
        let mut root = json!({"a": "text"});
        assert_eq!(get_object("a.length", &mut root, None), None);
        assert_eq!(get_object("a.b", &mut root, Some(true)), None);
        assert_eq!(root, json!({"a": "text"}));
    }

    #[test]
    fn test_null_intermediate_aborts() {
        let mut root = json!({"a": null});
        assert_eq!(get_object("a.b", &mut root, None), None);
    }

    #[test]
    fn test_null_leaf_is_found() {
        let mut root = json!({"a": null});
        assert_eq!(get_object("a", &mut root, None), Some(Value::Null));
    }

    #[test]
    fn test_array_has_no_named_properties() {
        let mut root = json!({"list": [1, 2, 3]});
        assert_eq!(get_object("list.0", &mut root, None), None);
        assert_eq!(get_object("list.x", &mut root, Some(true)), None);
        assert_eq!(root, json!({"list": [1, 2, 3]}));
    }

    #[test]
    fn test_create_materializes_intermediates() {
        let mut root = json!({"a": {"keep": true}});
        let value = get_object("a.b.c", &mut root, Some(true));
        assert_eq!(value, Some(json!({})));
        assert_eq!(root, json!({"a": {"keep": true, "b": {"c": {}}}}));

        // The created leaf is visible to a plain read afterwards
        assert_eq!(get_object("a.b.c", &mut root, None), Some(json!({})));
    }

    #[test]
    fn test_create_keeps_existing_leaf() {
        let mut root = json!({"a": {"b": 5}});
        assert_eq!(get_object("a.b", &mut root, Some(true)), Some(json!(5)));
        assert_eq!(root, json!({"a": {"b": 5}}));
    }

    #[test]
    fn test_delete_on_find() {
        let mut root = json!({"a": {"b": "gone", "c": "stays"}});
        assert_eq!(get_object("a.b", &mut root, Some(false)), Some(json!("gone")));
        assert_eq!(root, json!({"a": {"c": "stays"}}));
        assert_eq!(get_object("a.b", &mut root, None), None);
    }

    #[test]
    fn test_delete_missing_leaf_changes_nothing() {
        let mut root = json!({"a": {"c": 1}});
        assert_eq!(get_object("a.b", &mut root, Some(false)), None);
        assert_eq!(get_object("z.b", &mut root, Some(false)), None);
        assert_eq!(root, json!({"a": {"c": 1}}));
    }

    #[test]
    fn test_multi_root_first_match_wins() {
        let mut local = json!({"name": "local"});
        let mut global = json!({"name": "global", "only": "global"});
        let mut roots = RootList::from(vec![&mut local, &mut global]);

        assert_eq!(
            resolve(&Path::new("name"), &mut roots, MutationMode::None),
            Some(json!("local"))
        );
        assert_eq!(
            resolve(&Path::new("only"), &mut roots, MutationMode::None),
            Some(json!("global"))
        );
        assert_eq!(
            resolve(&Path::new("neither"), &mut roots, MutationMode::None),
            None
        );
    }

    #[test]
    fn test_multi_root_fails_over_on_missing_intermediate() {
        let mut roots = vec![json!({"a": 1}), json!({"a": {"b": 2}})];
        assert_eq!(get_object("a.b", roots.as_mut_slice(), None), Some(json!(2)));
    }

    #[test]
    fn test_delete_only_touches_matching_root() {
        let mut roots = vec![json!({"x": 1}), json!({"a": 2})];
        assert_eq!(get_object("a", roots.as_mut_slice(), Some(false)), Some(json!(2)));
        assert_eq!(roots, vec![json!({"x": 1}), json!({})]);
    }

    #[test]
    fn test_create_stops_at_first_root() {
        let mut roots = vec![json!({}), json!({"a": {"b": 1}})];
        assert_eq!(get_object("a.b", roots.as_mut_slice(), Some(true)), Some(json!({})));
        assert_eq!(roots[0], json!({"a": {"b": {}}}));
        assert_eq!(roots[1], json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_falsy_root_ends_search() {
        let mut roots = vec![Value::Null, json!({"a": 1})];
        assert_eq!(get_object("a", roots.as_mut_slice(), None), None);

        let mut roots = vec![json!("abc"), json!({"a": 1})];
        assert_eq!(get_object("a", roots.as_mut_slice(), None), Some(json!(1)));
    }

    #[test]
    fn test_empty_root_list() {
        assert_eq!(get_object("a.b", RootList::new(), None), None);
        assert_eq!(get_object("a.b", RootList::new(), Some(true)), None);
    }

    #[test]
    fn test_read_is_side_effect_free() {
        let original = json!({"a": {"b": [1, 2]}, "c": null});
        let mut root = original.clone();
        for path in ["a", "a.b", "a.x.y", "c", "c.d", "missing"] {
            let first = get_object(path, &mut root, None);
            let second = get_object(path, &mut root, None);
            assert_eq!(first, second);
        }
        assert_eq!(root, original);
    }

    #[test]
    fn test_lookup_borrows() {
        let local = json!({"a": {"b": "local"}});
        let global = json!({"c": 3});
        let roots = [&local, &global];
        assert_eq!(lookup(&Path::new("a.b"), &roots), Some(&json!("local")));
        assert_eq!(lookup(&Path::new("c"), &roots), Some(&json!(3)));
        assert_eq!(lookup(&Path::new("a.b.c"), &roots), None);
        assert_eq!(lookup(&Path::new(""), &roots), Some(&local));
    }
}
