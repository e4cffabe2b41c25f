//! A sample store tree shared by the workspace's tests.
//!
//! ```text
//! storeA: { propAA: 0, propAB: "" }          handles X_A, X_B, Y_A
//! storeB: { propBA: {}, propBB: [] }         handles X_A, Y_A, Y_B
//! storeC:
//!   storeCA: 0                               handles Y_A (+1)
//!   storeCB:
//!     storeCBA: [5, 7]                       each handles Y_A (+1)
//! ```

use composable_flux_core::{Action, Store, StoreTree, Value};
use serde_json::json;

/// Action type handled by `storeA` and `storeB`
pub const X_A: &str = "X_A";
/// Action type handled by `storeA`
pub const X_B: &str = "X_B";
/// Action type handled by `storeA`, `storeB` and every `storeC` leaf
pub const Y_A: &str = "Y_A";
/// Action type handled by `storeB`
pub const Y_B: &str = "Y_B";
/// Action type no store handles
pub const Z: &str = "Z";

/// Copy `state` (an object) with `fields` merged over it
#[must_use]
pub fn with_fields(state: &Value, fields: Value) -> Value {
    let mut next = state.clone();
    if let (Value::Object(target), Value::Object(source)) = (&mut next, fields) {
        target.extend(source);
    }
    next
}

fn increment(state: &Value, _: &Action) -> Value {
    json!(state.as_i64().unwrap_or(0) + 1)
}

/// `storeA`: two primitive props
#[must_use]
pub fn store_a() -> Store {
    Store::new(json!({ "propAA": 0, "propAB": "" }))
        .on(X_A, |s, _| with_fields(s, json!({ "propAA": 123 })))
        .on(X_B, |s, _| with_fields(s, json!({ "propAA": 234, "propAB": "thing" })))
        .on(Y_A, |s, _| with_fields(s, json!({ "propAB": "test string" })))
}

/// `storeB`: an object prop and an array prop
#[must_use]
pub fn store_b() -> Store {
    Store::new(json!({ "propBA": {}, "propBB": [] }))
        .on(X_A, |s, _| with_fields(s, json!({ "propBA": { "num": 6 } })))
        .on(Y_A, |s, _| with_fields(s, json!({ "propBB": [1, 2] })))
        .on(Y_B, |s, _| {
            with_fields(s, json!({ "propBA": { "num": 9 }, "propBB": ["3", "4"] }))
        })
}

/// The full three-store tree
#[must_use]
pub fn sample_tree() -> StoreTree {
    StoreTree::map([
        ("storeA", store_a().into()),
        ("storeB", store_b().into()),
        (
            "storeC",
            StoreTree::map([
                ("storeCA", Store::new(0).on(Y_A, increment).into()),
                (
                    "storeCB",
                    StoreTree::map([(
                        "storeCBA",
                        StoreTree::seq([
                            Store::new(5).on(Y_A, increment),
                            Store::new(7).on(Y_A, increment),
                        ]),
                    )]),
                ),
            ]),
        ),
    ])
}

/// The initial state of [`sample_tree`] as plain JSON
#[must_use]
pub fn sample_initial_json() -> Value {
    json!({
        "storeA": { "propAA": 0, "propAB": "" },
        "storeB": { "propBA": {}, "propBB": [] },
        "storeC": {
            "storeCA": 0,
            "storeCB": { "storeCBA": [5, 7] }
        }
    })
}

/// A lone store starting at 0 that adds 5 on `X_A`
#[must_use]
pub fn adder() -> Store {
    Store::new(0).on(X_A, |s, _| json!(s.as_i64().unwrap_or(0) + 5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use composable_flux_core::Reducer;

    #[test]
    fn test_sample_tree_initial_state() {
        let tree = sample_tree();
        assert_eq!(tree.initial_state().to_json(), sample_initial_json());
        assert_eq!(tree.store_count(), 5);
    }

    #[test]
    fn test_with_fields_overrides() {
        let merged = with_fields(&json!({ "a": 1, "b": 2 }), json!({ "b": 3 }));
        assert_eq!(merged, json!({ "a": 1, "b": 3 }));
    }
}
