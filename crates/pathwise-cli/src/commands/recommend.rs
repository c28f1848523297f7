//! The `pathwise recommend` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;

use pathwise_core::config::load_config_from;
use pathwise_core::model::{PerformanceRecord, TopicSession, UserProfile};
use pathwise_core::recommend::{recommend, LearnerSignals};
use pathwise_core::report::AnalyticsReport;
use pathwise_core::LearningTracker;

/// Input file for `pathwise recommend`.
#[derive(Debug, Deserialize)]
struct LearnerProgress {
    user_id: String,
    /// Fraction of the topic's material completed.
    #[serde(default)]
    completion_rate: f64,
    session: TopicSession,
    #[serde(default)]
    profile: UserProfile,
    #[serde(default)]
    performance_history: Vec<PerformanceRecord>,
}

pub fn execute(
    progress_path: PathBuf,
    config_path: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let progress: LearnerProgress = super::read_json(&progress_path)?;

    let tracker = LearningTracker::with_system_clock(config.clone());
    tracker.register_user(&progress.user_id);
    tracker.update_profile(&progress.user_id, |p| *p = progress.profile.clone())?;
    if !progress.performance_history.is_empty() {
        tracker.best_learning_time(&progress.user_id, &progress.performance_history);
    }

    let metrics = tracker.analyze_learning_ability(&progress.user_id, &progress.session);
    let signals = LearnerSignals::from_metrics(&metrics, progress.completion_rate);
    let profile = tracker.profile(&progress.user_id).unwrap_or_default();
    let recommendation = recommend(&signals, &profile, &config);

    let report = AnalyticsReport::new(
        progress.user_id,
        progress.session.topic_id,
        metrics,
        recommendation,
        Utc::now(),
    );

    if let Some(path) = &output {
        report.save_json(path)?;
        tracing::info!("report saved to {}", path.display());
    }

    match format.as_str() {
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }

    Ok(())
}

fn print_text(report: &AnalyticsReport) {
    let m = &report.metrics;
    let r = &report.recommendation;

    println!("Learner: {} / topic: {}", report.user_id, report.topic_id);
    println!(
        "Accuracy {:.1}%, fatigue {:.2}, consistency {:.3}",
        m.accuracy_rate * 100.0,
        m.fatigue_level,
        m.consistency
    );

    if let Some(minutes) = r.suggested_break_duration {
        println!("Break needed: take {minutes} minutes off.");
    }
    println!("Difficulty change: {:+.1}", r.difficulty_change);
    println!("Pace: {}", r.pace_change);
    if !r.focus_areas.is_empty() {
        println!("Focus areas: {}", r.focus_areas.join(", "));
    }
    if r.revision_needed {
        println!("Revision needed.");
    }
    if !r.study_hours.is_empty() {
        let hours: Vec<String> = r.study_hours.iter().map(|h| format!("{h:02}:00")).collect();
        println!("Best hours: {}", hours.join(", "));
    }
}
