//! Per-learner state and the operations that read or update it.
//!
//! The tracker is the only stateful part of the analytics layer. It keeps,
//! per user, the profile, the last time each topic was reviewed, the latest
//! progress snapshot per topic, and recent study sessions. Each user's entry
//! is locked independently, so updates for different users never contend.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::analytics::{self, AbilityMetrics};
use crate::clock::{Clock, SystemClock};
use crate::config::AnalyticsConfig;
use crate::error::TrackerError;
use crate::graph::KnowledgeGraph;
use crate::model::{
    LearningStyle, PerformanceRecord, ProgressSnapshot, SessionActivity, TopicSession, UserProfile,
};
use crate::recommend::{self, ProgressAdjustments};

#[derive(Debug, Default)]
struct LearnerState {
    profile: UserProfile,
    last_review: HashMap<String, DateTime<Utc>>,
    progress: HashMap<String, ProgressSnapshot>,
    recent_activities: Vec<SessionActivity>,
}

/// What to do next, for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextSteps {
    /// Unmastered topics whose prerequisites are all mastered, in graph order.
    pub next_topics: Vec<String>,
    /// Tracked topics with low accuracy, weakest first.
    pub weak_areas: Vec<String>,
    /// Tracked topics whose retention has decayed, most forgotten first.
    pub reinforcement: Vec<String>,
    pub break_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_break_duration: Option<u32>,
    /// Whether the current hour is one of the learner's best hours.
    pub best_time_to_study: bool,
}

/// How difficulty should ramp over a study plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    pub initial: f64,
    pub increment: f64,
    pub max_difficulty: f64,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            initial: 0.5,
            increment: 0.1,
            max_difficulty: 0.9,
        }
    }
}

/// A personalised plan built from the profile and the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub recommended_topics: Vec<String>,
    pub content_formats: Vec<String>,
    pub preferred_hours: Vec<u32>,
    pub difficulty_curve: DifficultyCurve,
}

/// Tracks learners and applies the analytics formulas to them.
pub struct LearningTracker {
    clock: Arc<dyn Clock>,
    config: AnalyticsConfig,
    learners: DashMap<String, LearnerState>,
}

impl LearningTracker {
    pub fn new(clock: Arc<dyn Clock>, config: AnalyticsConfig) -> Self {
        Self {
            clock,
            config,
            learners: DashMap::new(),
        }
    }

    /// A tracker reading wall-clock time.
    pub fn with_system_clock(config: AnalyticsConfig) -> Self {
        Self::new(Arc::new(SystemClock), config)
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Register a learner with a default profile. Returns `false` if the
    /// learner already existed.
    pub fn register_user(&self, user_id: &str) -> bool {
        match self.learners.entry(user_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(LearnerState::default());
                tracing::debug!(user_id, "registered learner");
                true
            }
        }
    }

    /// A copy of the learner's profile.
    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.learners.get(user_id).map(|state| state.profile.clone())
    }

    /// Edit a learner's profile in place.
    pub fn update_profile(
        &self,
        user_id: &str,
        edit: impl FnOnce(&mut UserProfile),
    ) -> Result<(), TrackerError> {
        let mut state = self
            .learners
            .get_mut(user_id)
            .ok_or_else(|| TrackerError::UnknownUser(user_id.to_string()))?;
        edit(&mut state.profile);
        Ok(())
    }

    /// Retention of `topic_id` for `user_id` right now; `1.0` if the topic
    /// was never tracked.
    pub fn retention_for(&self, user_id: &str, topic_id: &str) -> f64 {
        let last_review = self
            .learners
            .get(user_id)
            .and_then(|state| state.last_review.get(topic_id).copied());
        analytics::retention_since(last_review, self.clock.now(), self.config.retention_decay_rate)
    }

    /// Compute ability metrics for a session, with retention based on the
    /// last time this learner's progress on the topic was tracked.
    ///
    /// Registered learners get their profile updated: current learning
    /// speed, accuracy history, and the topic's forgetting-curve value.
    /// Unknown learners still get metrics.
    pub fn analyze_learning_ability(&self, user_id: &str, session: &TopicSession) -> AbilityMetrics {
        let retention = self.retention_for(user_id, &session.topic_id);
        let metrics = analytics::compute_metrics_with_retention(session, retention);

        match self.learners.get_mut(user_id) {
            Some(mut state) => {
                let profile = &mut state.profile;
                profile.learning_speed = metrics.comprehension_speed;
                profile.accuracy_history.push(metrics.accuracy_rate);
                profile
                    .forgetting_curves
                    .insert(session.topic_id.clone(), metrics.retention_rate);
            }
            None => tracing::debug!(user_id, "analysed session for unregistered learner"),
        }

        metrics
    }

    /// Record a progress update: stamps the topic's review time, stores the
    /// snapshot, records fatigue, and returns the resulting adjustments.
    pub fn track_progress(
        &self,
        user_id: &str,
        snapshot: ProgressSnapshot,
    ) -> Result<ProgressAdjustments, TrackerError> {
        let now = self.clock.now();
        let adjustments = recommend::progress_adjustments(&snapshot, &self.config);

        let mut state = self
            .learners
            .get_mut(user_id)
            .ok_or_else(|| TrackerError::UnknownUser(user_id.to_string()))?;

        let topic_id = snapshot.topic_id.clone();
        state.last_review.insert(topic_id.clone(), now);
        state
            .profile
            .fatigue_pattern
            .insert(topic_id.clone(), adjustments.fatigue_status.level);
        state.progress.insert(topic_id.clone(), snapshot);

        tracing::debug!(
            user_id,
            topic = %topic_id,
            fatigue = adjustments.fatigue_status.level,
            "tracked progress"
        );
        Ok(adjustments)
    }

    /// Append a finished study session. Only the last
    /// `recent_session_window` sessions are kept.
    pub fn record_session(&self, user_id: &str, activity: SessionActivity) -> Result<(), TrackerError> {
        let mut state = self
            .learners
            .get_mut(user_id)
            .ok_or_else(|| TrackerError::UnknownUser(user_id.to_string()))?;
        let activities = &mut state.recent_activities;
        activities.push(activity);
        let excess = activities.len().saturating_sub(self.config.recent_session_window);
        activities.drain(..excess);
        Ok(())
    }

    /// Session-based fatigue; `0.0` for learners with no recorded sessions.
    pub fn current_fatigue(&self, user_id: &str) -> f64 {
        self.learners
            .get(user_id)
            .map(|state| {
                analytics::current_fatigue(&state.recent_activities, self.config.recent_session_window)
            })
            .unwrap_or(0.0)
    }

    /// Rank the learner's best hours and remember them in the profile.
    pub fn best_learning_time(&self, user_id: &str, history: &[PerformanceRecord]) -> Vec<u32> {
        let hours = analytics::best_learning_hours(history, self.config.best_hours_count);
        if let Some(mut state) = self.learners.get_mut(user_id) {
            state.profile.best_learning_hours = hours.clone();
        }
        hours
    }

    /// Recommend what the learner should do next.
    pub fn recommend_next_steps(
        &self,
        user_id: &str,
        graph: &KnowledgeGraph,
    ) -> Result<NextSteps, TrackerError> {
        let now = self.clock.now();
        let state = self
            .learners
            .get(user_id)
            .ok_or_else(|| TrackerError::UnknownUser(user_id.to_string()))?;

        let fatigue = analytics::current_fatigue(&state.recent_activities, self.config.recent_session_window);
        let break_needed = fatigue > self.config.fatigue_break_threshold;

        Ok(NextSteps {
            next_topics: self.next_topics(&state, graph),
            weak_areas: self.weak_areas(&state),
            reinforcement: self.reinforcement(&state, now),
            break_needed,
            suggested_break_duration: break_needed
                .then(|| analytics::break_duration(fatigue, self.config.base_break_minutes)),
            best_time_to_study: state.profile.best_learning_hours.contains(&now.hour()),
        })
    }

    /// Build a study plan for the learner.
    pub fn personalized_plan(
        &self,
        user_id: &str,
        graph: &KnowledgeGraph,
    ) -> Result<StudyPlan, TrackerError> {
        let state = self
            .learners
            .get(user_id)
            .ok_or_else(|| TrackerError::UnknownUser(user_id.to_string()))?;

        let style = state.profile.learning_style.unwrap_or(LearningStyle::Visual);
        Ok(StudyPlan {
            recommended_topics: self.next_topics(&state, graph),
            content_formats: style.content_formats().iter().map(|f| f.to_string()).collect(),
            preferred_hours: state.profile.best_learning_hours.clone(),
            difficulty_curve: DifficultyCurve::default(),
        })
    }

    /// Number of registered learners.
    pub fn learner_count(&self) -> usize {
        self.learners.len()
    }

    fn is_mastered(&self, state: &LearnerState, topic: &str) -> bool {
        state
            .progress
            .get(topic)
            .is_some_and(|snapshot| snapshot.accuracy >= self.config.revision_accuracy_threshold)
    }

    fn next_topics(&self, state: &LearnerState, graph: &KnowledgeGraph) -> Vec<String> {
        graph
            .topics()
            .into_iter()
            .filter(|topic| !self.is_mastered(state, topic))
            .filter(|topic| {
                graph
                    .get_prerequisites(topic)
                    .iter()
                    .all(|prereq| self.is_mastered(state, prereq))
            })
            .collect()
    }

    fn weak_areas(&self, state: &LearnerState) -> Vec<String> {
        let mut weak: Vec<(&String, f64)> = state
            .progress
            .iter()
            .filter(|(_, snapshot)| snapshot.accuracy < self.config.focus_accuracy_threshold)
            .map(|(topic, snapshot)| (topic, snapshot.accuracy))
            .collect();
        weak.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        weak.into_iter().map(|(topic, _)| topic.clone()).collect()
    }

    fn reinforcement(&self, state: &LearnerState, now: DateTime<Utc>) -> Vec<String> {
        let mut fading: Vec<(&String, f64)> = state
            .last_review
            .iter()
            .map(|(topic, at)| {
                let retention = analytics::retention_since(Some(*at), now, self.config.retention_decay_rate);
                (topic, retention)
            })
            .filter(|(_, retention)| *retention < self.config.reinforcement_retention_threshold)
            .collect();
        fading.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        fading.into_iter().map(|(topic, _)| topic.clone()).collect()
    }
}
