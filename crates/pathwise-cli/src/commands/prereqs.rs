//! The `pathwise prereqs` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(curriculum_path: PathBuf, topic: String, transitive: bool) -> Result<()> {
    let graph = super::load_graph(&curriculum_path)?;
    if !graph.has_node(&topic) {
        anyhow::bail!("unknown topic: {topic}");
    }

    let prereqs = if transitive {
        graph.prerequisite_closure(&topic)
    } else {
        graph.get_prerequisites(&topic)
    };

    if prereqs.is_empty() {
        println!("{topic} has no prerequisites.");
        return Ok(());
    }

    let label = if transitive { "Study order for" } else { "Prerequisites of" };
    println!("{label} {topic}:");
    for (i, prereq) in prereqs.iter().enumerate() {
        let weight = graph.node_weight(prereq).unwrap_or(pathwise_core::graph::DEFAULT_TOPIC_WEIGHT);
        println!("  {}. {prereq} (weight {weight:.1})", i + 1);
    }

    Ok(())
}
