//! Deep merge for loader config trees.
//!
//! Later values win on scalars, mappings merge recursively, and sequences are
//! concatenated positionally at any depth.

use crate::ConfigTree;
use serde_json::Value;

/// Merge `second` into `first`, key by key.
///
/// A key missing from `first` is inserted as-is. When both sides hold a
/// mapping the merge recurses, and when both hold a sequence the items of
/// `second` are appended. Anything else (a scalar or a type mismatch) is
/// replaced by the value from `second`.
pub fn merge(mut first: ConfigTree, second: ConfigTree) -> ConfigTree {
    for (key, value) in second {
        match first.get_mut(&key) {
            Some(existing) => merge_slot(existing, value),
            None => {
                first.insert(key, value);
            }
        }
    }
    first
}

/// Merge a value into an existing slot without moving the slot's key.
fn merge_slot(slot: &mut Value, value: Value) {
    match (slot, value) {
        (Value::Object(existing), Value::Object(overlay)) => {
            let current = std::mem::take(existing);
            *existing = merge(current, overlay);
        }
        (Value::Array(existing), Value::Array(overlay)) => existing.extend(overlay),
        (slot, value) => *slot = value,
    }
}

/// Merge two nodes, deciding per node how they combine.
///
/// Sequences are positional: the items of `second` are appended to `first`,
/// the same way [`merge`] treats sequences nested inside mappings.
pub fn merge_values(first: Value, second: Value) -> Value {
    match (first, second) {
        (Value::Object(first), Value::Object(second)) => Value::Object(merge(first, second)),
        (Value::Array(mut first), Value::Array(second)) => {
            first.extend(second);
            Value::Array(first)
        }
        (_, second) => second,
    }
}

/// Fold a list of trees over a base, first to last.
pub fn merge_all<I>(base: ConfigTree, trees: I) -> ConfigTree
where
    I: IntoIterator<Item = ConfigTree>,
{
    trees.into_iter().fold(base, merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(value: Value) -> ConfigTree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn later_scalar_wins() {
        let merged = merge(tree(json!({"waitSeconds": 0})), tree(json!({"waitSeconds": 7})));
        assert_eq!(Value::Object(merged), json!({"waitSeconds": 7}));
    }

    #[test]
    fn mappings_merge_recursively() {
        let first = tree(json!({"config": {"paths": {"a": "a.js"}, "waitSeconds": 0}}));
        let second = tree(json!({"config": {"paths": {"b": "b.js"}}}));
        let merged = merge(first, second);
        assert_eq!(
            Value::Object(merged),
            json!({"config": {"paths": {"a": "a.js", "b": "b.js"}, "waitSeconds": 0}})
        );
    }

    #[test]
    fn nested_sequences_are_concatenated() {
        let first = tree(json!({"config": {"shim": {"backbone": {"deps": ["jquery"]}}}}));
        let second = tree(json!({"config": {"shim": {"backbone": {"deps": ["underscore"]}}}}));
        let merged = merge(first, second);
        assert_eq!(
            Value::Object(merged),
            json!({"config": {"shim": {"backbone": {"deps": ["jquery", "underscore"]}}}})
        );
    }

    #[test]
    fn sequence_against_scalar_takes_second_value() {
        let merged = merge(
            tree(json!({"exclude": ["a"], "deps": "x"})),
            tree(json!({"exclude": "none", "deps": ["y"]})),
        );
        assert_eq!(Value::Object(merged), json!({"exclude": "none", "deps": ["y"]}));
    }

    #[test]
    fn type_mismatch_takes_second_value() {
        let merged = merge(
            tree(json!({"paths": "oops", "map": {"*": {}}})),
            tree(json!({"paths": {"a": "a"}, "map": false})),
        );
        assert_eq!(
            Value::Object(merged),
            json!({"paths": {"a": "a"}, "map": false})
        );
    }

    #[test]
    fn empty_tree_is_identity_on_both_sides() {
        let sample = tree(json!({"config": {"paths": {"a": "a"}}, "build": {"x": [1, 2]}}));
        assert_eq!(merge(sample.clone(), ConfigTree::new()), sample);
        assert_eq!(merge(ConfigTree::new(), sample.clone()), sample);
    }

    #[test]
    fn self_merge_without_sequences_is_idempotent() {
        let sample = tree(json!({"config": {"paths": {"a": "a"}, "waitSeconds": 5}}));
        assert_eq!(merge(sample.clone(), sample.clone()), sample);
    }

    #[test]
    fn self_merge_doubles_nested_sequence() {
        let sample = tree(json!({"build": {"exclude": ["jquery"], "optimize": "none"}}));
        assert_eq!(
            Value::Object(merge(sample.clone(), sample)),
            json!({"build": {"exclude": ["jquery", "jquery"], "optimize": "none"}})
        );
    }

    #[test]
    fn self_merge_of_sequence_appends() {
        let list = json!(["jquery", "backbone"]);
        assert_eq!(
            merge_values(list.clone(), list),
            json!(["jquery", "backbone", "jquery", "backbone"])
        );
    }

    #[test]
    fn merge_values_delegates_mappings() {
        let merged = merge_values(json!({"a": {"b": 1}}), json!({"a": {"c": 2}}));
        assert_eq!(merged, json!({"a": {"b": 1, "c": 2}}));
        assert_eq!(merge_values(json!([1]), json!("x")), json!("x"));
    }

    #[test]
    fn merge_keeps_first_key_order() {
        let merged = merge(
            tree(json!({"z": 1, "a": 2})),
            tree(json!({"a": 3, "m": 4})),
        );
        let keys: Vec<_> = merged.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn merge_all_folds_in_order() {
        let merged = merge_all(
            ConfigTree::new(),
            vec![
                tree(json!({"paths": {"foo": "one"}})),
                tree(json!({"paths": {"foo": "two"}})),
            ],
        );
        assert_eq!(Value::Object(merged), json!({"paths": {"foo": "two"}}));
    }
}
