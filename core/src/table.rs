//! Type-keyed handler lookup shared by stores and mapware.

use crate::action::Action;
use std::collections::BTreeMap;
use std::fmt;

/// A mapping from action type to handler
///
/// Stores keep their transition functions in one, and both mapware builders
/// keep theirs in one, so "does this action have a handler" is answered the
/// same way everywhere.
#[derive(Clone)]
pub struct HandlerTable<H> {
    handlers: BTreeMap<String, H>,
}

impl<H> HandlerTable<H> {
    /// Create an empty table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register `handler` for `kind`, replacing any previous one
    pub fn insert(&mut self, kind: impl Into<String>, handler: H) {
        self.handlers.insert(kind.into(), handler);
    }

    /// The handler registered for `kind`
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&H> {
        self.handlers.get(kind)
    }

    /// The handler registered for the action's type
    #[must_use]
    pub fn handler_for(&self, action: &Action) -> Option<&H> {
        self.get(action.kind())
    }

    /// Whether a handler is registered for `kind`
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered action types, in sorted order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Number of registered handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H> Default for HandlerTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for HandlerTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}
