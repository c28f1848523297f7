//! Core data model types for pathwise.
//!
//! These are the plain records the surrounding service hands to the
//! analytics layer, plus the learner profile the tracker maintains.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single exercise attempt within a topic session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Time spent on the exercise.
    pub time_spent: f64,
    /// Whether the answer was correct.
    pub correct: bool,
}

impl AttemptRecord {
    pub fn new(time_spent: f64, correct: bool) -> Self {
        Self {
            time_spent,
            correct,
        }
    }
}

/// One learner's work on a topic: the input to ability analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicSession {
    /// Topic the attempts belong to.
    pub topic_id: String,
    /// Total time to complete the session.
    #[serde(default)]
    pub completion_time: f64,
    /// Externally measured correct rate, if the caller has one.
    #[serde(default)]
    pub correct_rate: Option<f64>,
    /// Attempts in chronological order.
    #[serde(default)]
    pub exercise_attempts: Vec<AttemptRecord>,
}

/// A performance sample taken at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub timestamp: DateTime<Utc>,
    /// Score in `[0, 1]`.
    pub performance_score: f64,
}

/// A completed study session, used for session-based fatigue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionActivity {
    /// Session length in minutes.
    pub duration: f64,
    /// Self-reported or measured intensity.
    pub intensity: f64,
}

/// A progress update for one topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub topic_id: String,
    /// Fraction of the topic's material completed.
    #[serde(default)]
    pub completion_rate: f64,
    /// Fraction of answers that were correct.
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default)]
    pub difficulty_level: u32,
    #[serde(default)]
    pub engagement_level: f64,
    /// Attempts behind this snapshot, used for fatigue.
    #[serde(default)]
    pub exercise_attempts: Vec<AttemptRecord>,
}

/// A graded submission, as recorded by the problem bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub submitted_at: DateTime<Utc>,
    /// Seconds spent on the submission.
    pub time_spent: f64,
    pub is_correct: bool,
}

/// Difficulty band of a practice problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemDifficulty {
    Easy,
    Medium,
    Hard,
}

impl ProblemDifficulty {
    /// Band matched to a skill level in `[0, 1]`: easy below 0.3, medium
    /// below 0.7, hard otherwise.
    pub fn for_skill(skill_level: f64) -> Self {
        if skill_level < 0.3 {
            ProblemDifficulty::Easy
        } else if skill_level < 0.7 {
            ProblemDifficulty::Medium
        } else {
            ProblemDifficulty::Hard
        }
    }

    /// Multiplier used by difficulty-weighted scoring.
    pub fn weight(self) -> f64 {
        match self {
            ProblemDifficulty::Easy => 1.0,
            ProblemDifficulty::Medium => 2.0,
            ProblemDifficulty::Hard => 3.0,
        }
    }
}

impl fmt::Display for ProblemDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemDifficulty::Easy => write!(f, "easy"),
            ProblemDifficulty::Medium => write!(f, "medium"),
            ProblemDifficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Preferred way of consuming material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
}

impl LearningStyle {
    /// Content formats suited to this style.
    pub fn content_formats(self) -> &'static [&'static str] {
        match self {
            LearningStyle::Visual => &["diagrams", "videos", "mind_maps"],
            LearningStyle::Auditory => &["audio_lectures", "spoken_practice", "discussion"],
            LearningStyle::Kinesthetic => &["hands_on_projects", "experiments", "role_play"],
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningStyle::Visual => write!(f, "visual"),
            LearningStyle::Auditory => write!(f, "auditory"),
            LearningStyle::Kinesthetic => write!(f, "kinesthetic"),
        }
    }
}

impl FromStr for LearningStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visual" => Ok(LearningStyle::Visual),
            "auditory" => Ok(LearningStyle::Auditory),
            "kinesthetic" => Ok(LearningStyle::Kinesthetic),
            other => Err(format!("unknown learning style: {other}")),
        }
    }
}

/// Everything the tracker knows about one learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Topic → strength score.
    #[serde(default)]
    pub strengths: HashMap<String, f64>,
    /// Topic → weakness score.
    #[serde(default)]
    pub weaknesses: HashMap<String, f64>,
    /// Most recent comprehension speed.
    #[serde(default)]
    pub learning_speed: f64,
    /// Accuracy of every analysed session, oldest first.
    #[serde(default)]
    pub accuracy_history: Vec<f64>,
    /// Hours of day the learner prefers.
    #[serde(default)]
    pub preferred_times: Vec<u32>,
    /// Topic → attention span in minutes.
    #[serde(default)]
    pub attention_span: HashMap<String, f64>,
    #[serde(default)]
    pub learning_style: Option<LearningStyle>,
    /// Topic → fatigue measured at the last progress update.
    #[serde(default)]
    pub fatigue_pattern: HashMap<String, f64>,
    /// Topic → retention measured at the last analysis.
    #[serde(default)]
    pub forgetting_curves: HashMap<String, f64>,
    /// Hours of day with the best average performance.
    #[serde(default)]
    pub best_learning_hours: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learning_style_display_and_parse() {
        assert_eq!(LearningStyle::Visual.to_string(), "visual");
        assert_eq!(
            "Kinesthetic".parse::<LearningStyle>().unwrap(),
            LearningStyle::Kinesthetic
        );
        assert!("olfactory".parse::<LearningStyle>().is_err());
    }

    #[test]
    fn topic_session_defaults_from_json() {
        let json = r#"{"topic_id": "math_101", "exercise_attempts": [{"time_spent": 5, "correct": true}]}"#;
        let session: TopicSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.completion_time, 0.0);
        assert_eq!(session.correct_rate, None);
        assert_eq!(session.exercise_attempts, vec![AttemptRecord::new(5.0, true)]);
    }

    #[test]
    fn difficulty_band_from_skill() {
        assert_eq!(ProblemDifficulty::for_skill(0.0), ProblemDifficulty::Easy);
        assert_eq!(ProblemDifficulty::for_skill(0.3), ProblemDifficulty::Medium);
        assert_eq!(ProblemDifficulty::for_skill(0.69), ProblemDifficulty::Medium);
        assert_eq!(ProblemDifficulty::for_skill(0.7), ProblemDifficulty::Hard);
        assert_eq!(ProblemDifficulty::Hard.to_string(), "hard");
        let json = serde_json::to_string(&ProblemDifficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn profile_starts_empty() {
        let profile = UserProfile::default();
        assert!(profile.accuracy_history.is_empty());
        assert!(profile.learning_style.is_none());
        assert_eq!(profile.learning_speed, 0.0);
    }
}
