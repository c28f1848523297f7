//! The `pathwise best-hours` command.

use std::path::PathBuf;

use anyhow::Result;

use pathwise_core::analytics::best_learning_hours;
use pathwise_core::config::load_config_from;
use pathwise_core::model::PerformanceRecord;

pub fn execute(history: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let records: Vec<PerformanceRecord> = super::read_json(&history)?;

    let hours = best_learning_hours(&records, config.best_hours_count);
    if hours.is_empty() {
        println!("No performance history.");
        return Ok(());
    }

    println!("Best hours to study:");
    for (rank, hour) in hours.iter().enumerate() {
        println!("  {}. {hour:02}:00", rank + 1);
    }

    Ok(())
}
