pub mod analyze;
pub mod best_hours;
pub mod init;
pub mod path;
pub mod prereqs;
pub mod recommend;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use pathwise_core::graph::KnowledgeGraph;
use pathwise_core::parser;

/// Parse a curriculum file and build its graph.
pub(crate) fn load_graph(path: &Path) -> Result<KnowledgeGraph> {
    let curriculum = parser::parse_curriculum(path)?;
    Ok(curriculum.build_graph())
}

/// Read and deserialize a JSON input file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}
