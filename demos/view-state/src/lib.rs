//! # View State Example
//!
//! The view state of a small todo list, built from two stores:
//!
//! - `todos`: the list itself, an array of `{ id, text, done }` objects
//! - `filter`: which todos the view shows (`"all"`, `"active"` or `"done"`)
//!
//! New todos get their `id` from a middleware stage, so the `todos` store
//! stays a pure function of state and action.
//!
//! ## Example
//!
//! ```
//! use composable_flux_runtime::Flux;
//! use serde_json::json;
//! use view_state::{ADD_TODO, SET_FILTER, id_stamper, view_tree, visible_todos};
//!
//! let mut flux = Flux::new(view_tree());
//! flux.proxy(id_stamper());
//!
//! flux.dispatch([
//!     json!({ "type": ADD_TODO, "text": "write docs" }),
//!     json!({ "type": SET_FILTER, "filter": "active" }),
//! ])
//! .unwrap();
//!
//! assert_eq!(visible_todos(&flux.state()).len(), 1);
//! ```

use composable_flux_core::{Action, HandlerError, MapMiddleware, Mapware, StateTree, Store, StoreTree};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};

/// Add a todo: `{ "type": "ADD_TODO", "text": String }`
pub const ADD_TODO: &str = "ADD_TODO";
/// Flip a todo's `done` flag: `{ "type": "TOGGLE_TODO", "id": u64 }`
pub const TOGGLE_TODO: &str = "TOGGLE_TODO";
/// Drop every finished todo
pub const CLEAR_COMPLETED: &str = "CLEAR_COMPLETED";
/// Change the view filter: `{ "type": "SET_FILTER", "filter": String }`
pub const SET_FILTER: &str = "SET_FILTER";

/// Filters the view understands
pub const FILTERS: [&str; 3] = ["all", "active", "done"];

fn todos(state: &Value) -> &[Value] {
    state.as_array().map_or(&[][..], Vec::as_slice)
}

fn is_done(todo: &Value) -> bool {
    todo.get("done").and_then(Value::as_bool).unwrap_or(false)
}

fn add_todo(state: &Value, action: &Action) -> Result<Value, HandlerError> {
    let text = action
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::new("ADD_TODO needs a string `text`"))?;
    let id = action
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| HandlerError::new("ADD_TODO reached the store without an `id`"))?;

    let mut next = todos(state).to_vec();
    next.push(json!({ "id": id, "text": text, "done": false }));
    Ok(Value::Array(next))
}

fn toggle_todo(state: &Value, action: &Action) -> Value {
    let target = action.get("id").and_then(Value::as_u64);
    let next = todos(state)
        .iter()
        .map(|todo| {
            if todo.get("id").and_then(Value::as_u64) == target {
                let mut flipped = todo.clone();
                flipped["done"] = Value::Bool(!is_done(todo));
                flipped
            } else {
                todo.clone()
            }
        })
        .collect();
    Value::Array(next)
}

fn clear_completed(state: &Value, _: &Action) -> Value {
    Value::Array(todos(state).iter().filter(|todo| !is_done(todo)).cloned().collect())
}

fn set_filter(_: &Value, action: &Action) -> Result<Value, HandlerError> {
    match action.get("filter").and_then(Value::as_str) {
        Some(filter) if FILTERS.contains(&filter) => Ok(Value::from(filter)),
        Some(other) => Err(HandlerError::new(format!("unknown filter `{other}`"))),
        None => Err(HandlerError::new("SET_FILTER needs a string `filter`")),
    }
}

/// The todo list store
#[must_use]
pub fn todos_store() -> Store {
    Store::new(json!([]))
        .try_on(ADD_TODO, add_todo)
        .on(TOGGLE_TODO, toggle_todo)
        .on(CLEAR_COMPLETED, clear_completed)
}

/// The filter store
#[must_use]
pub fn filter_store() -> Store {
    Store::new("all").try_on(SET_FILTER, set_filter)
}

/// The whole view: `{ todos, filter }`
#[must_use]
pub fn view_tree() -> StoreTree {
    StoreTree::map([("todos", todos_store().into()), ("filter", filter_store().into())])
}

/// Middleware stamping each new todo with the next id, starting at 1
#[must_use]
pub fn id_stamper() -> MapMiddleware {
    let next_id = AtomicU64::new(1);
    Mapware::middleware().on(ADD_TODO, move |_| {
        json!({ "id": next_id.fetch_add(1, Ordering::Relaxed) })
    })
}

/// The todos the current filter lets through
#[must_use]
pub fn visible_todos(state: &StateTree) -> Vec<Value> {
    let filter = state
        .pointer("/filter")
        .and_then(Value::as_str)
        .unwrap_or("all");
    let list = state.pointer("/todos").map_or(&[][..], todos);

    list.iter()
        .filter(|todo| match filter {
            "active" => !is_done(todo),
            "done" => is_done(todo),
            _ => true,
        })
        .cloned()
        .collect()
}
