//! Error types raised while folding actions into state.

use std::fmt;
use thiserror::Error;

/// A failure raised by a user-supplied handler or middleware stage
///
/// Handlers are expected to be total over the types they register for; this
/// is how one signals that it is not.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create a handler error with a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// One step from a store tree's root towards a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A key inside a keyed mapping
    Key(String),
    /// A position inside an ordered sequence
    Index(usize),
}

/// The location of a node inside a store tree
///
/// Displays as `storeC.storeCB.storeCBA[1]`, or `<root>` for the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePath(Vec<PathSegment>);

impl StorePath {
    /// The path of the tree's root
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// The segments from the root, outermost first
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Errors from folding an action through a store tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReduceError {
    /// A store's handler failed
    #[error("store at `{path}` failed to reduce `{kind}`")]
    Handler {
        /// Location of the failing store
        path: StorePath,
        /// Type of the action being reduced
        kind: String,
        /// The handler's own error
        #[source]
        source: HandlerError,
    },

    /// The state handed to the tree does not mirror the tree's shape
    #[error("state at `{path}` does not match the store tree shape")]
    ShapeMismatch {
        /// Location of the first mismatching node
        path: StorePath,
    },
}

impl ReduceError {
    /// Location of the node the error was raised at
    #[must_use]
    pub const fn path(&self) -> &StorePath {
        match self {
            Self::Handler { path, .. } | Self::ShapeMismatch { path } => path,
        }
    }

    /// Re-anchor the error one level further up the tree
    #[must_use]
    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        match &mut self {
            Self::Handler { path, .. } | Self::ShapeMismatch { path } => path.prepend(segment),
        }
        self
    }
}
