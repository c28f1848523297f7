//! The `pathwise path` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(curriculum_path: PathBuf, from: String, to: String) -> Result<()> {
    let graph = super::load_graph(&curriculum_path)?;

    for topic in [&from, &to] {
        if !graph.has_node(topic) {
            anyhow::bail!("unknown topic: {topic}");
        }
    }

    match graph.find_learning_path(&from, &to) {
        Some(path) => {
            println!("{}", path.join(" -> "));
            println!("({} step(s))", path.len() - 1);
        }
        None => println!("No learning path from {from} to {to}."),
    }

    Ok(())
}
