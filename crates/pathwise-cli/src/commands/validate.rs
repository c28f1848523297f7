//! The `pathwise validate` command.

use std::path::PathBuf;

use anyhow::Result;

use pathwise_core::parser;

pub fn execute(curriculum_path: PathBuf) -> Result<()> {
    let curricula = if curriculum_path.is_dir() {
        parser::load_curriculum_directory(&curriculum_path)?
    } else {
        vec![parser::parse_curriculum(&curriculum_path)?]
    };

    let mut total_warnings = 0;

    for curriculum in &curricula {
        println!(
            "Curriculum: {} ({} topics, {} edges)",
            curriculum.name,
            curriculum.topics.len(),
            curriculum.edges.len()
        );

        let warnings = parser::validate_curriculum(curriculum);
        for w in &warnings {
            let prefix = w
                .topic_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All curricula valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
