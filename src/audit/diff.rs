//! Structural differencing of document trees
//!
//! Walks two trees in lockstep and reports every leaf-level difference as
//! a `Change`. Mappings are compared key by key, sequences index by index.
//! There is no move detection: removing an element from the middle of an
//! array shows up as edits on every later index plus a removed tail.
//!
//! Output order is depth-first. Keys of the previous mapping come first
//! (sorted), then keys only present in the current one; array tails are
//! reported by ascending index.

use crate::models::{Path, Value};

/// One raw difference between two document trees
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Present in the current tree only
    Added { path: Path, value: Value },
    /// Present in the previous tree only
    Deleted { path: Path, value: Value },
    /// Scalar value changed at an existing path
    Edited { path: Path, lhs: Value, rhs: Value },
    /// An element appended to or dropped from the end of an array
    ///
    /// `path` is the array's own path; the inner change's path ends with
    /// `index`.
    ArrayElement {
        path: Path,
        index: usize,
        change: Box<Change>,
    },
}

impl Change {
    /// Path of the changed value itself
    ///
    /// For array elements this is the element's path, not the array's.
    pub fn path(&self) -> &Path {
        match self {
            Change::Added { path, .. }
            | Change::Deleted { path, .. }
            | Change::Edited { path, .. } => path,
            Change::ArrayElement { change, .. } => change.path(),
        }
    }

    /// Short tag used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Change::Added { .. } => "added",
            Change::Deleted { .. } => "deleted",
            Change::Edited { .. } => "edited",
            Change::ArrayElement { .. } => "array",
        }
    }
}

/// Compare two document trees
pub fn diff(before: &Value, after: &Value) -> Vec<Change> {
    diff_under(&Path::root(), before, after)
}

/// Compare two subtrees that live at `base` inside a larger document
///
/// Every emitted path starts with `base`.
pub fn diff_under(base: &Path, before: &Value, after: &Value) -> Vec<Change> {
    let mut changes = Vec::new();
    walk(base, before, after, &mut changes);
    changes
}

fn walk(path: &Path, before: &Value, after: &Value, out: &mut Vec<Change>) {
    match (before, after) {
        (Value::Object(lhs), Value::Object(rhs)) => {
            for (key, old) in lhs {
                let child = path.child(key.as_str());
                match rhs.get(key) {
                    Some(new) => walk(&child, old, new, out),
                    None => out.push(Change::Deleted {
                        path: child,
                        value: old.clone(),
                    }),
                }
            }
            for (key, new) in rhs {
                if !lhs.contains_key(key) {
                    out.push(Change::Added {
                        path: path.child(key.as_str()),
                        value: new.clone(),
                    });
                }
            }
        }
        (Value::Array(lhs), Value::Array(rhs)) => {
            let common = lhs.len().min(rhs.len());
            for (index, (old, new)) in lhs.iter().zip(rhs).enumerate() {
                walk(&path.child(index), old, new, out);
            }
            for (index, new) in rhs.iter().enumerate().skip(common) {
                out.push(Change::ArrayElement {
                    path: path.clone(),
                    index,
                    change: Box::new(Change::Added {
                        path: path.child(index),
                        value: new.clone(),
                    }),
                });
            }
            for (index, old) in lhs.iter().enumerate().skip(common) {
                out.push(Change::ArrayElement {
                    path: path.clone(),
                    index,
                    change: Box::new(Change::Deleted {
                        path: path.child(index),
                        value: old.clone(),
                    }),
                });
            }
        }
        _ if before == after => {}
        _ if before.is_structured() || after.is_structured() => {
            // Incompatible shapes: the old value goes away and the new one
            // takes its place. A null side has nothing to report.
            if !before.is_null() {
                out.push(Change::Deleted {
                    path: path.clone(),
                    value: before.clone(),
                });
            }
            if !after.is_null() {
                out.push(Change::Added {
                    path: path.clone(),
                    value: after.clone(),
                });
            }
        }
        _ => out.push(Change::Edited {
            path: path.clone(),
            lhs: before.clone(),
            rhs: after.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn paths(changes: &[Change]) -> Vec<String> {
        changes.iter().map(|c| c.path().to_string()).collect()
    }

    #[test]
    fn test_identical_trees_have_no_changes() {
        let doc = tree(json!({
            "name": "Checking",
            "tags": ["a", {"b": [1, 2]}],
            "nested": {"deep": {"deeper": null}}
        }));
        assert!(diff(&doc, &doc.clone()).is_empty());
        assert!(diff(&Value::Null, &Value::Null).is_empty());
    }

    #[test]
    fn test_scalar_edit() {
        let changes = diff(&tree(json!({"b": 1})), &tree(json!({"b": 101})));
        assert_eq!(
            changes,
            vec![Change::Edited {
                path: Path::from_segments(["b"]),
                lhs: Value::from(1i64),
                rhs: Value::from(101i64),
            }]
        );
    }

    #[test]
    fn test_key_added_and_removed() {
        let changes = diff(&tree(json!({"a": "x"})), &tree(json!({"b": "y"})));
        assert_eq!(changes.len(), 2);
        assert!(matches!(&changes[0], Change::Deleted { value, .. } if *value == Value::from("x")));
        assert!(matches!(&changes[1], Change::Added { value, .. } if *value == Value::from("y")));
        assert_eq!(paths(&changes), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_paths() {
        let changes = diff(
            &tree(json!({"d": {"e": "old", "f": 1}})),
            &tree(json!({"d": {"e": "new", "f": 1}})),
        );
        assert_eq!(paths(&changes), vec!["d.e"]);
    }

    #[test]
    fn test_array_common_prefix_is_positional() {
        // Removing the first element shifts everything: no move detection
        let changes = diff(&tree(json!({"c": [1, 2, 3]})), &tree(json!({"c": [2, 3]})));
        assert_eq!(paths(&changes), vec!["c.0", "c.1", "c.2"]);
        assert_eq!(changes[0].kind(), "edited");
        assert_eq!(changes[1].kind(), "edited");
        match &changes[2] {
            Change::ArrayElement {
                path,
                index,
                change,
            } => {
                assert_eq!(path.to_string(), "c");
                assert_eq!(*index, 2);
                assert!(matches!(**change, Change::Deleted { .. }));
            }
            other => panic!("expected array element, got {:?}", other),
        }
    }

    #[test]
    fn test_array_tail_added_in_ascending_order() {
        let changes = diff(
            &tree(json!({"c": []})),
            &tree(json!({"c": [{"x": 1}, {"x": 2}]})),
        );
        assert_eq!(paths(&changes), vec!["c.0", "c.1"]);
        for change in &changes {
            match change {
                Change::ArrayElement { change, .. } => {
                    assert!(matches!(**change, Change::Added { .. }))
                }
                other => panic!("expected array element, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_shape_mismatch_is_replacement() {
        let changes = diff(&tree(json!({"v": [1]})), &tree(json!({"v": {"x": 1}})));
        assert_eq!(changes.len(), 2);
        assert!(matches!(&changes[0], Change::Deleted { .. }));
        assert!(matches!(&changes[1], Change::Added { .. }));
        assert_eq!(paths(&changes), vec!["v", "v"]);
    }

    #[test]
    fn test_null_to_object_is_pure_add() {
        let changes = diff(&tree(json!({"v": null})), &tree(json!({"v": {"x": 1}})));
        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], Change::Added { .. }));
    }

    #[test]
    fn test_scalar_type_change_is_edit() {
        let changes = diff(&tree(json!({"v": 1})), &tree(json!({"v": "1"})));
        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], Change::Edited { .. }));
    }

    #[test]
    fn test_diff_under_prefixes_paths() {
        let base = Path::from_segments(["x"]);
        let changes = diff_under(&base, &tree(json!({"y": null})), &tree(json!({"y": 1})));
        assert_eq!(paths(&changes), vec!["x.y"]);
    }

    #[test]
    fn test_output_is_stable() {
        let before = tree(json!({"z": 1, "a": [1, 2], "m": {"q": "r"}}));
        let after = tree(json!({"z": 2, "a": [1], "m": {"q": "s"}, "b": true}));
        let first = diff(&before, &after);
        let second = diff(&before, &after);
        assert_eq!(first, second);
        assert_eq!(paths(&first), vec!["a.1", "m.q", "z", "b"]);
    }
}
