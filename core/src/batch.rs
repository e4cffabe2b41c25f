//! Batch flattening - turns loose dispatch arguments into an ordered action list.
//!
//! Dispatch arguments may mix single actions with arbitrarily nested arrays
//! of actions. Flattening expands every nested array in place, preserving the
//! order the arguments were written in, and drops every entry that is not a
//! well-formed [`Action`].

use crate::action::Action;
use serde_json::Value;

/// The result of flattening one set of dispatch arguments
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlattenedBatch {
    /// Well-formed actions, in argument order
    pub actions: Vec<Action>,

    /// Number of non-array entries that were not actions and got dropped
    pub rejected: usize,
}

impl FlattenedBatch {
    /// True when no well-formed action survived filtering
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Flatten and filter dispatch arguments
///
/// # Example
///
/// ```
/// use composable_flux_core::flatten_actions;
/// use serde_json::{Value, json};
///
/// let batch = flatten_actions([
///     json!({ "type": "A" }),
///     json!([[{ "type": "B" }], 0, false]),
///     Value::Null,
///     json!({ "type": "C" }),
/// ]);
///
/// let kinds: Vec<_> = batch.actions.iter().map(|a| a.kind()).collect();
/// assert_eq!(kinds, ["A", "B", "C"]);
/// assert_eq!(batch.rejected, 3);
/// ```
pub fn flatten_actions<I>(args: I) -> FlattenedBatch
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let mut batch = FlattenedBatch::default();
    for arg in args {
        push_flattened(arg.into(), &mut batch);
    }
    batch
}

fn push_flattened(value: Value, batch: &mut FlattenedBatch) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_flattened(item, batch);
            }
        },
        other => match Action::from_value(other) {
            Some(action) => batch.actions.push(action),
            None => batch.rejected += 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(batch: &FlattenedBatch) -> Vec<&str> {
        batch.actions.iter().map(Action::kind).collect()
    }

    #[test]
    fn test_empty_arguments() {
        let batch = flatten_actions(Vec::<Value>::new());
        assert!(batch.is_empty());
        assert_eq!(batch.rejected, 0);
    }

    #[test]
    fn test_only_invalid_entries() {
        let batch = flatten_actions([Value::Null, json!([0, false, null])]);
        assert!(batch.is_empty());
        assert_eq!(batch.rejected, 4);
    }

    #[test]
    fn test_deep_nesting_preserves_order() {
        let batch = flatten_actions([
            json!([{ "type": "1" }, [{ "type": "2" }, [[{ "type": "3" }]]]]),
            json!({ "type": "4" }),
            json!([[], [[{ "type": "5" }]]]),
        ]);
        assert_eq!(kinds(&batch), ["1", "2", "3", "4", "5"]);
        assert_eq!(batch.rejected, 0);
    }

    #[test]
    fn test_unrecognized_types_are_kept() {
        let batch = flatten_actions([json!({ "type": "NOBODY_HANDLES_THIS" })]);
        assert_eq!(kinds(&batch), ["NOBODY_HANDLES_THIS"]);
    }

    #[test]
    fn test_accepts_actions_directly() {
        let batch = flatten_actions([Action::new("A"), Action::new("B")]);
        assert_eq!(kinds(&batch), ["A", "B"]);
    }
}
