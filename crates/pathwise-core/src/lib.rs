//! Knowledge graph, learning analytics, and recommendations.
//!
//! This crate holds the in-memory topic graph, the heuristic scoring
//! formulas over a learner's attempt history, and the tracker that keeps
//! the small amount of per-learner state those formulas need.

pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod parser;
pub mod recommend;
pub mod report;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AnalyticsConfig;
pub use error::{GraphError, TrackerError};
pub use graph::{EdgeKind, KnowledgeGraph};
pub use tracker::LearningTracker;
