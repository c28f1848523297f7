//! Error types for graph mutation and tracker lookups.
//!
//! Scoring functions never fail; they degrade to sentinel values. Only
//! operations that can be misused by the caller have an error type.

use thiserror::Error;

/// Errors returned when mutating a [`KnowledgeGraph`](crate::graph::KnowledgeGraph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge was added from a topic that was never inserted as a node.
    #[error("unknown source topic '{from}' for edge to '{to}'")]
    UnknownSource { from: String, to: String },
}

/// Errors returned by the [`LearningTracker`](crate::tracker::LearningTracker).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The user has no registered profile.
    #[error("unknown user: {0}")]
    UnknownUser(String),
}

impl GraphError {
    /// The source topic that was rejected.
    pub fn source_topic(&self) -> &str {
        match self {
            GraphError::UnknownSource { from, .. } => from,
        }
    }
}
