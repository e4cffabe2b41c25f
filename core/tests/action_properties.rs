//! Property tests for action recognition and merging.

#![allow(clippy::unwrap_used)] // Tests can unwrap

use composable_flux_core::{Action, Reducer, Store, StoreTree};
use proptest::collection;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn fields() -> impl Strategy<Value = Map<String, Value>> {
    collection::btree_map("[a-d]", scalar(), 0..4)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    /// An object is an action exactly when its `type` is a non-empty string.
    #[test]
    fn test_from_value_requires_string_type(kind in scalar(), payload in fields()) {
        let mut object = payload;
        object.insert("type".to_string(), kind.clone());

        let accepted = Action::from_value(Value::Object(object)).is_some();
        let expected = kind.as_str().is_some_and(|k| !k.is_empty());
        prop_assert_eq!(accepted, expected);
    }

    /// A valid action survives the trip through its JSON object unchanged.
    #[test]
    fn test_value_form_is_lossless(kind in "[A-Z_]{1,8}", payload in fields()) {
        let mut action = Action::new(kind);
        action.merge(payload);

        let restored = Action::from_value(action.to_value()).unwrap();
        prop_assert_eq!(restored, action);
    }

    /// Merged fields always win, and untouched fields are kept.
    #[test]
    fn test_merge_prefers_incoming(base in fields(), incoming in fields()) {
        let mut action = Action::new("BASE");
        action.merge(base.clone());
        action.merge(incoming.clone());

        for (key, value) in &incoming {
            prop_assert_eq!(action.get(key), Some(value));
        }
        for (key, value) in base.iter().filter(|(key, _)| !incoming.contains_key(*key)) {
            prop_assert_eq!(action.get(key), Some(value));
        }
        prop_assert_eq!(action.kind(), "BASE");
    }

    /// Folding a sequence through a counter store counts the handled actions.
    #[test]
    fn test_store_folds_in_order(kinds in collection::vec(prop::sample::select(vec!["INC", "DOUBLE", "NOOP"]), 0..16)) {
        let store = Store::new(1)
            .on("INC", |s, _| json!(s.as_i64().unwrap_or(0) + 1))
            .on("DOUBLE", |s, _| json!(s.as_i64().unwrap_or(0) * 2));
        let tree = StoreTree::from(store);

        let mut expected = 1_i64;
        let mut state = tree.initial_state();
        for kind in &kinds {
            expected = match *kind {
                "INC" => expected + 1,
                "DOUBLE" => expected * 2,
                _ => expected,
            };
            state = tree.reduce(&state, &Action::new(*kind)).unwrap();
        }

        prop_assert_eq!(state.to_json(), json!(expected));
    }
}
