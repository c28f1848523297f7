//! Learner analytics reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::AbilityMetrics;
use crate::recommend::Recommendation;

/// A snapshot of one learner's metrics and the advice derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub topic_id: String,
    pub metrics: AbilityMetrics,
    pub recommendation: Recommendation,
}

impl AnalyticsReport {
    pub fn new(
        user_id: impl Into<String>,
        topic_id: impl Into<String>,
        metrics: AbilityMetrics,
        recommendation: Recommendation,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            user_id: user_id.into(),
            topic_id: topic_id.into(),
            metrics,
            recommendation,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalyticsReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let m = &self.metrics;
        let r = &self.recommendation;
        let mut md = String::new();

        md.push_str(&format!(
            "## {}: {}\n\n_Generated {}_\n\n",
            self.user_id,
            self.topic_id,
            self.created_at.format("%Y-%m-%d %H:%M UTC")
        ));

        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Accuracy | {:.1}% |\n", m.accuracy_rate * 100.0));
        md.push_str(&format!("| Comprehension speed | {:.3} |\n", m.comprehension_speed));
        md.push_str(&format!("| Consistency | {:.3} |\n", m.consistency));
        md.push_str(&format!("| Difficulty handling | {:.2} |\n", m.difficulty_handling));
        md.push_str(&format!("| Fatigue | {:.2} |\n", m.fatigue_level));
        md.push_str(&format!("| Retention | {:.1}% |\n", m.retention_rate * 100.0));
        md.push('\n');

        md.push_str("### Recommendation\n\n");
        match r.suggested_break_duration {
            Some(minutes) if r.break_needed => {
                md.push_str(&format!("- **Take a break** of {minutes} minutes\n"))
            }
            _ => md.push_str("- No break needed\n"),
        }
        md.push_str(&format!("- Difficulty: {:+.1}\n", r.difficulty_change));
        md.push_str(&format!("- Pace: {}\n", r.pace_change));
        if !r.focus_areas.is_empty() {
            md.push_str(&format!("- Focus on: {}\n", r.focus_areas.join(", ")));
        }
        if r.revision_needed {
            md.push_str("- Revision needed\n");
        }
        if !r.study_hours.is_empty() {
            let hours: Vec<String> = r.study_hours.iter().map(|h| format!("{h:02}:00")).collect();
            md.push_str(&format!("- Best hours: {}\n", hours.join(", ")));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::PaceChange;

    fn make_report(break_needed: bool) -> AnalyticsReport {
        AnalyticsReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            user_id: "test_user_001".into(),
            topic_id: "math_101".into(),
            metrics: AbilityMetrics {
                comprehension_speed: 0.044,
                accuracy_rate: 0.5,
                consistency: 0.39,
                difficulty_handling: 0.85,
                fatigue_level: 0.8,
                retention_rate: 1.0,
            },
            recommendation: Recommendation {
                break_needed,
                suggested_break_duration: break_needed.then_some(27),
                difficulty_change: -0.1,
                pace_change: PaceChange::Maintain,
                focus_areas: vec!["problem_solving".into()],
                revision_needed: true,
                study_hours: vec![9, 20],
            },
        }
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(true);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = AnalyticsReport::load_json(&path).unwrap();

        assert_eq!(loaded.user_id, "test_user_001");
        assert_eq!(loaded.recommendation, report.recommendation);
    }

    #[test]
    fn load_missing_file() {
        let err = AnalyticsReport::load_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read report"));
    }

    #[test]
    fn markdown_output() {
        let md = make_report(true).to_markdown();
        assert!(md.contains("math_101"));
        assert!(md.contains("| Accuracy | 50.0% |"));
        assert!(md.contains("Take a break** of 27 minutes"));
        assert!(md.contains("Focus on: problem_solving"));
        assert!(md.contains("Best hours: 09:00, 20:00"));

        let rested = make_report(false).to_markdown();
        assert!(rested.contains("No break needed"));
    }
}
