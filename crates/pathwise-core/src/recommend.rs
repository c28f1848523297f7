//! Deterministic mapping from learner metrics to study advice.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analytics::{break_duration, fatigue_level, AbilityMetrics};
use crate::config::AnalyticsConfig;
use crate::model::{ProgressSnapshot, UserProfile};

/// Focus area suggested when accuracy is low.
pub const PROBLEM_SOLVING: &str = "problem_solving";

/// Whether to change the learner's pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceChange {
    Increase,
    Maintain,
}

impl fmt::Display for PaceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaceChange::Increase => write!(f, "increase"),
            PaceChange::Maintain => write!(f, "maintain"),
        }
    }
}

/// The three numbers the recommendation rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnerSignals {
    pub accuracy: f64,
    pub completion_rate: f64,
    pub fatigue_level: f64,
}

impl LearnerSignals {
    /// Signals from analysed ability metrics plus a completion rate.
    pub fn from_metrics(metrics: &AbilityMetrics, completion_rate: f64) -> Self {
        Self {
            accuracy: metrics.accuracy_rate,
            completion_rate,
            fatigue_level: metrics.fatigue_level,
        }
    }

    /// Signals from a progress snapshot; fatigue comes from its attempts.
    pub fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        Self {
            accuracy: snapshot.accuracy,
            completion_rate: snapshot.completion_rate,
            fatigue_level: fatigue_level(&snapshot.exercise_attempts),
        }
    }
}

/// Fatigue and whether it warrants a break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueStatus {
    pub level: f64,
    pub break_recommended: bool,
    /// Minutes.
    pub suggested_break: u32,
}

/// Adjustments returned after a progress update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressAdjustments {
    pub difficulty_change: f64,
    pub pace_change: PaceChange,
    pub focus_areas: Vec<String>,
    pub revision_needed: bool,
    pub fatigue_status: FatigueStatus,
}

/// Advice for a learner, combining fresh signals with their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub break_needed: bool,
    /// Present only when a break is needed. Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_break_duration: Option<u32>,
    pub difficulty_change: f64,
    pub pace_change: PaceChange,
    pub focus_areas: Vec<String>,
    pub revision_needed: bool,
    /// Best hours to study, from the learner's profile.
    #[serde(default)]
    pub study_hours: Vec<u32>,
}

/// `+step` when accuracy is high, `−step` otherwise.
pub fn adjust_difficulty(accuracy: f64, config: &AnalyticsConfig) -> f64 {
    if accuracy > config.high_accuracy_threshold {
        config.difficulty_step
    } else {
        -config.difficulty_step
    }
}

pub fn adjust_pace(completion_rate: f64, config: &AnalyticsConfig) -> PaceChange {
    if completion_rate > config.pace_completion_threshold {
        PaceChange::Increase
    } else {
        PaceChange::Maintain
    }
}

pub fn focus_areas(accuracy: f64, config: &AnalyticsConfig) -> Vec<String> {
    if accuracy < config.focus_accuracy_threshold {
        vec![PROBLEM_SOLVING.to_string()]
    } else {
        Vec::new()
    }
}

pub fn needs_revision(accuracy: f64, config: &AnalyticsConfig) -> bool {
    accuracy < config.revision_accuracy_threshold
}

pub fn fatigue_status(level: f64, config: &AnalyticsConfig) -> FatigueStatus {
    FatigueStatus {
        level,
        break_recommended: level > config.fatigue_break_threshold,
        suggested_break: break_duration(level, config.base_break_minutes),
    }
}

/// Adjustments for a single topic progress update.
pub fn progress_adjustments(snapshot: &ProgressSnapshot, config: &AnalyticsConfig) -> ProgressAdjustments {
    let signals = LearnerSignals::from_snapshot(snapshot);
    ProgressAdjustments {
        difficulty_change: adjust_difficulty(signals.accuracy, config),
        pace_change: adjust_pace(signals.completion_rate, config),
        focus_areas: focus_areas(signals.accuracy, config),
        revision_needed: needs_revision(signals.accuracy, config),
        fatigue_status: fatigue_status(signals.fatigue_level, config),
    }
}

/// Map signals and profile to a recommendation.
///
/// Topics the profile lists as weaknesses are appended to the focus areas,
/// weakest first.
pub fn recommend(
    signals: &LearnerSignals,
    profile: &UserProfile,
    config: &AnalyticsConfig,
) -> Recommendation {
    let break_needed = signals.fatigue_level > config.fatigue_break_threshold;

    let mut focus = focus_areas(signals.accuracy, config);
    let mut weak: Vec<(&String, &f64)> = profile.weaknesses.iter().collect();
    weak.sort_by(|a, b| a.1.total_cmp(b.1).then_with(|| a.0.cmp(b.0)));
    focus.extend(weak.into_iter().map(|(topic, _)| topic.clone()));

    Recommendation {
        break_needed,
        suggested_break_duration: break_needed
            .then(|| break_duration(signals.fatigue_level, config.base_break_minutes)),
        difficulty_change: adjust_difficulty(signals.accuracy, config),
        pace_change: adjust_pace(signals.completion_rate, config),
        focus_areas: focus,
        revision_needed: needs_revision(signals.accuracy, config),
        study_hours: profile.best_learning_hours.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttemptRecord;

    fn signals(accuracy: f64, completion_rate: f64, fatigue_level: f64) -> LearnerSignals {
        LearnerSignals {
            accuracy,
            completion_rate,
            fatigue_level,
        }
    }

    #[test]
    fn strong_learner() {
        let config = AnalyticsConfig::default();
        let rec = recommend(&signals(0.85, 0.95, 0.2), &UserProfile::default(), &config);

        assert!(!rec.break_needed);
        assert_eq!(rec.suggested_break_duration, None);
        assert_eq!(rec.difficulty_change, 0.1);
        assert_eq!(rec.pace_change, PaceChange::Increase);
        assert!(rec.focus_areas.is_empty());
        assert!(!rec.revision_needed);
    }

    #[test]
    fn struggling_and_tired_learner() {
        let config = AnalyticsConfig::default();
        let rec = recommend(&signals(0.5, 0.4, 0.8), &UserProfile::default(), &config);

        assert!(rec.break_needed);
        assert_eq!(rec.suggested_break_duration, Some(27));
        assert_eq!(rec.difficulty_change, -0.1);
        assert_eq!(rec.pace_change, PaceChange::Maintain);
        assert_eq!(rec.focus_areas, vec![PROBLEM_SOLVING]);
        assert!(rec.revision_needed);
    }

    #[test]
    fn thresholds_are_strict() {
        let config = AnalyticsConfig::default();
        let rec = recommend(&signals(0.8, 0.9, 0.7), &UserProfile::default(), &config);

        assert!(!rec.break_needed);
        assert_eq!(rec.difficulty_change, -0.1);
        assert_eq!(rec.pace_change, PaceChange::Maintain);
        assert!(rec.focus_areas.is_empty());
        assert!(!rec.revision_needed);

        // Between the revision and focus thresholds.
        let mid = recommend(&signals(0.65, 0.0, 0.0), &UserProfile::default(), &config);
        assert_eq!(mid.focus_areas, vec![PROBLEM_SOLVING]);
        assert!(!mid.revision_needed);
    }

    #[test]
    fn profile_weaknesses_extend_focus() {
        let config = AnalyticsConfig::default();
        let mut profile = UserProfile::default();
        profile.weaknesses.insert("chemistry".into(), 0.4);
        profile.weaknesses.insert("biology".into(), 0.2);
        profile.best_learning_hours = vec![9, 20];

        let rec = recommend(&signals(0.9, 0.5, 0.0), &profile, &config);
        assert_eq!(rec.focus_areas, vec!["biology", "chemistry"]);
        assert_eq!(rec.study_hours, vec![9, 20]);
    }

    #[test]
    fn adjustments_from_snapshot() {
        let config = AnalyticsConfig::default();
        let snapshot = ProgressSnapshot {
            topic_id: "math_101".into(),
            completion_rate: 0.9,
            accuracy: 0.85,
            time_spent: 45.0,
            difficulty_level: 3,
            engagement_level: 0.8,
            exercise_attempts: vec![],
        };
        let adj = progress_adjustments(&snapshot, &config);

        assert_eq!(adj.difficulty_change, 0.1);
        assert_eq!(adj.pace_change, PaceChange::Maintain);
        assert!(adj.focus_areas.is_empty());
        assert!(!adj.revision_needed);
        assert_eq!(adj.fatigue_status.level, 0.0);
        assert!(!adj.fatigue_status.break_recommended);
        assert_eq!(adj.fatigue_status.suggested_break, 15);
    }

    #[test]
    fn adjustments_report_fatigue_from_attempts() {
        let config = AnalyticsConfig::default();
        let snapshot = ProgressSnapshot {
            topic_id: "math_101".into(),
            accuracy: 0.5,
            exercise_attempts: vec![
                AttemptRecord::new(5.0, true),
                AttemptRecord::new(6.0, true),
                AttemptRecord::new(8.0, false),
                AttemptRecord::new(10.0, false),
            ],
            ..Default::default()
        };
        let adj = progress_adjustments(&snapshot, &config);
        assert_eq!(adj.fatigue_status.level, 1.0);
        assert!(adj.fatigue_status.break_recommended);
        assert_eq!(adj.fatigue_status.suggested_break, 30);
    }

    #[test]
    fn recommendation_json_omits_break_when_not_needed() {
        let rec = recommend(&signals(0.9, 0.5, 0.1), &UserProfile::default(), &AnalyticsConfig::default());
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("suggested_break_duration").is_none());
        assert_eq!(json["pace_change"], "maintain");
    }
}
