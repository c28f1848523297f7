//! The `pathwise analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use pathwise_core::analytics::{break_duration, compute_metrics};
use pathwise_core::config::load_config_from;
use pathwise_core::model::TopicSession;

pub fn execute(history: PathBuf, config_path: Option<PathBuf>, format: String) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let session: TopicSession = super::read_json(&history)?;
    let metrics = compute_metrics(&session);

    tracing::debug!(topic = %session.topic_id, attempts = session.exercise_attempts.len(), "analysed session");

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!(
        "Topic: {} ({} attempts)",
        session.topic_id,
        session.exercise_attempts.len()
    );

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Accuracy"),
        Cell::new(format!("{:.1}%", metrics.accuracy_rate * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Comprehension speed"),
        Cell::new(format!("{:.3}", metrics.comprehension_speed)),
    ]);
    table.add_row(vec![
        Cell::new("Consistency"),
        Cell::new(format!("{:.3}", metrics.consistency)),
    ]);
    table.add_row(vec![
        Cell::new("Difficulty handling"),
        Cell::new(format!("{:.2}", metrics.difficulty_handling)),
    ]);
    table.add_row(vec![
        Cell::new("Fatigue"),
        Cell::new(format!("{:.2}", metrics.fatigue_level)),
    ]);
    println!("{table}");

    if metrics.fatigue_level > config.fatigue_break_threshold {
        println!(
            "\nFatigue is high: take a {} minute break.",
            break_duration(metrics.fatigue_level, config.base_break_minutes)
        );
    }

    Ok(())
}
