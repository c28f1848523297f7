//! The `pathwise init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("pathwise.toml").exists() {
        println!("pathwise.toml already exists, skipping.");
    } else {
        std::fs::write("pathwise.toml", SAMPLE_CONFIG)?;
        println!("Created pathwise.toml");
    }

    std::fs::create_dir_all("curricula")?;
    let example_path = std::path::Path::new("curricula/example.toml");
    if example_path.exists() {
        println!("curricula/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CURRICULUM)?;
        println!("Created curricula/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: pathwise validate --curriculum curricula/example.toml");
    println!("  2. Run: pathwise path --curriculum curricula/example.toml --from arithmetic --to calculus");
    println!("  3. Run: pathwise prereqs --curriculum curricula/example.toml --topic calculus --transitive");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# pathwise configuration

fatigue_break_threshold = 0.7
high_accuracy_threshold = 0.8
pace_completion_threshold = 0.9
focus_accuracy_threshold = 0.7
revision_accuracy_threshold = 0.6
difficulty_step = 0.1
retention_decay_rate = 0.1
reinforcement_retention_threshold = 0.5
base_break_minutes = 15
recent_session_window = 5
best_hours_count = 3
"#;

const EXAMPLE_CURRICULUM: &str = r#"[curriculum]
id = "example"
name = "Example Mathematics Curriculum"
description = "A small curriculum to get started"

[[topics]]
id = "arithmetic"

[[topics]]
id = "algebra_basics"

[[topics]]
id = "linear_equations"
weight = 0.8

[[topics]]
id = "geometry"

[[topics]]
id = "calculus"
weight = 1.5

[[edges]]
from = "arithmetic"
to = "algebra_basics"
kind = "prerequisite"

[[edges]]
from = "algebra_basics"
to = "linear_equations"
kind = "prerequisite"

[[edges]]
from = "arithmetic"
to = "geometry"
kind = "prerequisite"

[[edges]]
from = "linear_equations"
to = "calculus"
kind = "prerequisite"

[[edges]]
from = "geometry"
to = "calculus"
kind = "prerequisite"

[[edges]]
from = "geometry"
to = "linear_equations"
kind = "related"
"#;
