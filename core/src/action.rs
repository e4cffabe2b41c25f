//! Actions - the discrete inputs a dispatcher folds into state.
//!
//! An action is a JSON object carrying a non-empty string `type` tag. Every
//! other field is opaque payload that only handlers interpret.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The field that carries an action's type tag
pub const TYPE_FIELD: &str = "type";

/// A well-formed action: a type tag plus an opaque payload
///
/// Serializes to the flat object `{"type": kind, ...payload}`.
///
/// # Example
///
/// ```
/// use composable_flux_core::Action;
/// use serde_json::json;
///
/// let action = Action::new("TODO_ADDED").with("title", "write docs");
/// assert_eq!(action.kind(), "TODO_ADDED");
/// assert_eq!(action.to_value(), json!({ "type": "TODO_ADDED", "title": "write docs" }));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Action {
    /// Create an action with an empty payload
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    /// Add (or replace) a payload field
    ///
    /// A `type` key is applied as a rename rather than stored in the payload.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert(key.into(), value.into());
        self.merge(fields);
        self
    }

    /// Interpret an arbitrary JSON value as an action
    ///
    /// Returns `None` for anything that is not an object with a non-empty
    /// string `type`: null, booleans, numbers, strings, arrays, and objects
    /// whose type is missing, empty, or not a string.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut payload) = value else {
            return None;
        };

        match payload.remove(TYPE_FIELD) {
            Some(Value::String(kind)) if !kind.is_empty() => Some(Self { kind, payload }),
            _ => None,
        }
    }

    /// Whether the type tag is non-empty
    ///
    /// Always true for actions recognized by [`from_value`](Self::from_value);
    /// [`new`](Self::new) accepts any string, so dispatchers check this.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.kind.is_empty()
    }

    /// The action's type tag
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The payload fields (never contains `type`)
    #[must_use]
    pub const fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Look up a single payload field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Merge `fields` over this action, the incoming fields winning
    ///
    /// A non-empty string `type` among the fields renames the action; any
    /// other `type` value is ignored so the action stays well-formed.
    pub fn merge(&mut self, mut fields: Map<String, Value>) {
        if let Some(Value::String(kind)) = fields.remove(TYPE_FIELD) {
            if !kind.is_empty() {
                self.kind = kind;
            }
        }
        self.payload.extend(fields);
    }

    /// Render the action as its flat JSON object
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl TryFrom<Value> for Action {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
            .ok_or_else(|| "expected an object with a non-empty string `type`".to_string())
    }
}

impl From<Action> for Value {
    fn from(action: Action) -> Self {
        let mut object = Map::with_capacity(action.payload.len() + 1);
        object.insert(TYPE_FIELD.to_string(), Value::String(action.kind));
        object.extend(action.payload);
        Self::Object(object)
    }
}
