//! View state example binary
//!
//! Drives a todo-list view through a Flux: a middleware stage stamps ids, a
//! Mapware subscriber reacts to one action type, and a plain listener
//! redraws the visible list after every dispatch.

use composable_flux_core::{Action, Mapware, StateTree};
use composable_flux_runtime::{Flux, FluxConfig, metrics::register_metrics};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use view_state::{
    ADD_TODO, CLEAR_COMPLETED, SET_FILTER, TOGGLE_TODO, id_stamper, view_tree, visible_todos,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "view_state=debug,composable_flux_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    register_metrics();

    println!("=== View State Example: Composable Flux ===\n");

    let mut flux = Flux::with_config(view_tree(), FluxConfig::default().with_name("todo-view"));
    flux.proxy(id_stamper());

    let announcer = Arc::new(Mapware::subscriber().on(ADD_TODO, |state| {
        let total = state.pointer("/todos").and_then(|t| t.as_array()).map_or(0, Vec::len);
        tracing::info!(total, "Todo added");
    }));
    flux.hook(Arc::clone(&announcer));

    let renderer = Arc::new(|actions: &[Action], state: &Arc<StateTree>| {
        let kinds: Vec<&str> = actions.iter().map(Action::kind).collect();
        println!("  after {kinds:?}:");
        for todo in visible_todos(state) {
            let mark = if todo["done"] == json!(true) { 'x' } else { ' ' };
            println!("    [{mark}] #{} {}", todo["id"], todo["text"]);
        }
    });
    flux.hook(Arc::clone(&renderer));

    println!(">>> Adding three todos in one batch");
    flux.dispatch([json!([
        { "type": ADD_TODO, "text": "buy milk" },
        { "type": ADD_TODO, "text": "write docs" },
        { "type": ADD_TODO, "text": "call home" }
    ])])?;

    println!("\n>>> Finishing #2 and showing only finished todos");
    flux.dispatch([
        json!({ "type": TOGGLE_TODO, "id": 2 }),
        json!({ "type": SET_FILTER, "filter": "done" }),
    ])?;

    println!("\n>>> Dispatching nothing but noise (no redraw expected)");
    flux.dispatch([json!(null), json!([0, false, "todo"])])?;

    println!("\n>>> Setting an unknown filter");
    if let Err(error) = flux.dispatch([json!({ "type": SET_FILTER, "filter": "someday" })]) {
        println!("  rejected: {error}");
    }

    flux.unhook(&announcer);

    println!("\n>>> Clearing finished todos and showing everything");
    flux.dispatch([
        json!({ "type": CLEAR_COMPLETED }),
        json!({ "type": SET_FILTER, "filter": "all" }),
    ])?;

    println!("\nFinal state: {}", flux.state().to_json());
    println!("History:");
    for action in flux.history() {
        println!("  {}", action.to_value());
    }

    Ok(())
}
