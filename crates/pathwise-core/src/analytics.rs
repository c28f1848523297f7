//! Heuristic learning-analytics formulas.
//!
//! Every function here is pure and total: degenerate input (no attempts,
//! zero durations, empty histories) yields a documented sentinel value
//! instead of an error.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    AttemptRecord, PerformanceRecord, ProblemDifficulty, SessionActivity, Submission, TopicSession,
};

/// Weight of response-time growth in the fatigue score.
const FATIGUE_TIME_WEIGHT: f64 = 0.6;
/// Weight of accuracy decline in the fatigue score.
const FATIGUE_ACCURACY_WEIGHT: f64 = 0.4;
/// Weight of total duration in session-based fatigue.
const SESSION_DURATION_WEIGHT: f64 = 0.7;
/// Weight of average intensity in session-based fatigue.
const SESSION_INTENSITY_WEIGHT: f64 = 0.3;
/// Session-based fatigue is expressed on a 0–100 scale before normalising.
const SESSION_FATIGUE_SCALE: f64 = 100.0;
/// Minutes of study in a day that count as full fatigue.
const DAILY_STUDY_MINUTES: f64 = 480.0;
/// Effectiveness of a wrong answer.
const WRONG_ANSWER_EFFECTIVENESS: f64 = 0.3;
/// Effectiveness floor of a correct answer; speed adds up to 0.3 more.
const CORRECT_ANSWER_EFFECTIVENESS: f64 = 0.7;

/// Per-session ability metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityMetrics {
    /// Correct answers per unit of completion time.
    pub comprehension_speed: f64,
    /// Fraction of attempts answered correctly.
    pub accuracy_rate: f64,
    /// `1 / (1 + variance)` of time spent per attempt.
    pub consistency: f64,
    /// Caller-supplied correct rate.
    pub difficulty_handling: f64,
    /// Fatigue estimate in `[0, 1]`.
    pub fatigue_level: f64,
    /// Forgetting-curve retention in `(0, 1]`.
    pub retention_rate: f64,
}

/// Compute all metrics for a session that has no review history.
///
/// Retention is reported as `1.0`; use
/// [`LearningTracker::analyze_learning_ability`](crate::tracker::LearningTracker::analyze_learning_ability)
/// to account for time since the last review.
pub fn compute_metrics(session: &TopicSession) -> AbilityMetrics {
    compute_metrics_with_retention(session, 1.0)
}

pub(crate) fn compute_metrics_with_retention(
    session: &TopicSession,
    retention_rate: f64,
) -> AbilityMetrics {
    let attempts = &session.exercise_attempts;
    AbilityMetrics {
        comprehension_speed: comprehension_speed(session),
        accuracy_rate: accuracy(attempts),
        consistency: consistency(attempts),
        difficulty_handling: difficulty_handling(session),
        fatigue_level: fatigue_level(attempts),
        retention_rate,
    }
}

fn correct_count(attempts: &[AttemptRecord]) -> usize {
    attempts.iter().filter(|a| a.correct).count()
}

/// Correct attempts divided by completion time; `0` if the time is not positive.
pub fn comprehension_speed(session: &TopicSession) -> f64 {
    if session.completion_time > 0.0 {
        correct_count(&session.exercise_attempts) as f64 / session.completion_time
    } else {
        0.0
    }
}

/// Fraction of correct attempts; `0` for an empty history.
pub fn accuracy(attempts: &[AttemptRecord]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    correct_count(attempts) as f64 / attempts.len() as f64
}

/// `1 / (1 + σ²)` over time spent per attempt; `0` for an empty history.
pub fn consistency(attempts: &[AttemptRecord]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    let n = attempts.len() as f64;
    let mean = attempts.iter().map(|a| a.time_spent).sum::<f64>() / n;
    let variance = attempts
        .iter()
        .map(|a| (a.time_spent - mean).powi(2))
        .sum::<f64>()
        / n;
    1.0 / (1.0 + variance)
}

/// The caller's own correct rate, or `0` when absent.
pub fn difficulty_handling(session: &TopicSession) -> f64 {
    session.correct_rate.unwrap_or(0.0)
}

/// Mean of consecutive differences. Callers guarantee `values.len() >= 2`.
fn mean_delta(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let deltas: Vec<f64> = values
        .clone()
        .zip(values.skip(1))
        .map(|(prev, next)| next - prev)
        .collect();
    deltas.iter().sum::<f64>() / deltas.len() as f64
}

/// Fatigue from slowing responses and falling accuracy, clamped to `[0, 1]`.
///
/// `0.6 · mean(Δtime_spent) + 0.4 · −mean(Δcorrect)`; fewer than two
/// attempts yields `0`.
pub fn fatigue_level(attempts: &[AttemptRecord]) -> f64 {
    if attempts.len() < 2 {
        return 0.0;
    }

    let avg_increase = mean_delta(attempts.iter().map(|a| a.time_spent));
    let avg_correct_change = mean_delta(attempts.iter().map(|a| f64::from(u8::from(a.correct))));

    let score = avg_increase * FATIGUE_TIME_WEIGHT - avg_correct_change * FATIGUE_ACCURACY_WEIGHT;
    score.clamp(0.0, 1.0)
}

/// Ebbinghaus forgetting curve: `e^(−decay · hours)`.
///
/// Negative elapsed time (clock skew) counts as zero.
pub fn retention(hours_since_review: f64, decay_rate: f64) -> f64 {
    (-decay_rate * hours_since_review.max(0.0)).exp()
}

/// Retention given an optional last-review instant; `1.0` if never reviewed.
pub fn retention_since(last_review: Option<DateTime<Utc>>, now: DateTime<Utc>, decay_rate: f64) -> f64 {
    match last_review {
        Some(at) => {
            let hours = (now - at).num_milliseconds() as f64 / 3_600_000.0;
            retention(hours, decay_rate)
        }
        None => 1.0,
    }
}

/// Hours of day ranked by mean performance score, best first.
///
/// Returns at most `count` hours. Hours with equal means keep the order in
/// which they first appear in `history`.
pub fn best_learning_hours(history: &[PerformanceRecord], count: usize) -> Vec<u32> {
    // (hour, sum, samples), first-seen order
    let mut hourly: Vec<(u32, f64, usize)> = Vec::new();
    for record in history {
        let hour = record.timestamp.hour();
        match hourly.iter_mut().find(|(h, _, _)| *h == hour) {
            Some((_, sum, samples)) => {
                *sum += record.performance_score;
                *samples += 1;
            }
            None => hourly.push((hour, record.performance_score, 1)),
        }
    }

    let mut averages: Vec<(u32, f64)> = hourly
        .into_iter()
        .map(|(hour, sum, samples)| (hour, sum / samples as f64))
        .collect();
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));

    averages.into_iter().take(count).map(|(hour, _)| hour).collect()
}

/// Fatigue from the most recent `window` study sessions, clamped to `[0, 1]`.
///
/// `(0.7 · Σduration + 0.3 · Σintensity / window) / 100`. The intensity sum
/// is divided by the window size even when fewer sessions exist.
pub fn current_fatigue(sessions: &[SessionActivity], window: usize) -> f64 {
    if sessions.is_empty() || window == 0 {
        return 0.0;
    }

    let recent = &sessions[sessions.len().saturating_sub(window)..];
    let total_duration: f64 = recent.iter().map(|s| s.duration).sum();
    let avg_intensity = recent.iter().map(|s| s.intensity).sum::<f64>() / window as f64;

    let fatigue = (total_duration * SESSION_DURATION_WEIGHT + avg_intensity * SESSION_INTENSITY_WEIGHT)
        / SESSION_FATIGUE_SCALE;
    fatigue.clamp(0.0, 1.0)
}

/// Suggested break in whole minutes: `⌊base · (1 + fatigue)⌋`.
pub fn break_duration(fatigue_level: f64, base_minutes: u32) -> u32 {
    (f64::from(base_minutes) * (1.0 + fatigue_level)).floor() as u32
}

/// Activity over the last 24 hours of submissions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyStatistics {
    /// Seconds spent across recent submissions.
    pub total_time: f64,
    pub activity_count: usize,
    /// Fraction of recent submissions that were correct.
    pub average_effectiveness: f64,
    /// `min(1, hours · (1 − effectiveness))`.
    pub fatigue_level: f64,
}

/// Summarise submissions made within 24 hours before `now`.
pub fn daily_statistics(submissions: &[Submission], now: DateTime<Utc>) -> DailyStatistics {
    let cutoff = now - TimeDelta::hours(24);
    let recent: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.submitted_at >= cutoff)
        .collect();

    let total_time: f64 = recent.iter().map(|s| s.time_spent).sum();
    let activity_count = recent.len();
    let average_effectiveness = if activity_count > 0 {
        recent.iter().filter(|s| s.is_correct).count() as f64 / activity_count as f64
    } else {
        0.0
    };
    let fatigue_level = ((total_time / 3600.0) * (1.0 - average_effectiveness)).min(1.0);

    DailyStatistics {
        total_time,
        activity_count,
        average_effectiveness,
        fatigue_level,
    }
}

/// Effectiveness of one problem-solving activity.
///
/// A wrong answer scores `0.3`. A correct one scores
/// `0.7 + 0.3 · min(average_time / time_spent, 1)`, so answering at or under
/// the problem's average time earns the full `1.0`. A non-positive
/// `time_spent` counts as instant.
pub fn activity_effectiveness(is_correct: bool, time_spent: f64, average_time: f64) -> f64 {
    if !is_correct {
        return WRONG_ANSWER_EFFECTIVENESS;
    }

    let time_factor = if time_spent > 0.0 {
        (average_time / time_spent).clamp(0.0, 1.0)
    } else {
        1.0
    };
    CORRECT_ANSWER_EFFECTIVENESS + (1.0 - CORRECT_ANSWER_EFFECTIVENESS) * time_factor
}

/// Activity-based fatigue: minutes studied in the last 24 hours over an
/// eight-hour day, clamped to `[0, 1]`.
pub fn activity_fatigue(minutes_last_24h: f64) -> f64 {
    (minutes_last_24h / DAILY_STUDY_MINUTES).clamp(0.0, 1.0)
}

/// Difficulty-weighted success rate.
///
/// Each band's correct rate is multiplied by its weight (easy 1, medium 2,
/// hard 3), then averaged over the bands that have results. `0.0` when
/// there are no results.
pub fn weighted_difficulty_handling(results: &[(ProblemDifficulty, bool)]) -> f64 {
    let bands = [ProblemDifficulty::Easy, ProblemDifficulty::Medium, ProblemDifficulty::Hard];

    let scores: Vec<f64> = bands
        .iter()
        .filter_map(|&band| {
            let outcomes: Vec<bool> = results
                .iter()
                .filter(|(difficulty, _)| *difficulty == band)
                .map(|&(_, correct)| correct)
                .collect();
            if outcomes.is_empty() {
                return None;
            }
            let rate = outcomes.iter().filter(|&&c| c).count() as f64 / outcomes.len() as f64;
            Some(rate * band.weight())
        })
        .collect();

    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Fraction of a learning path completed after `completed_stage` of
/// `stage_count` stages, capped at `1.0`. An empty path is `0.0` complete.
pub fn path_completion_rate(completed_stage: usize, stage_count: usize) -> f64 {
    if stage_count == 0 {
        return 0.0;
    }
    (completed_stage as f64 / stage_count as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempts(data: &[(f64, bool)]) -> Vec<AttemptRecord> {
        data.iter().map(|&(t, c)| AttemptRecord::new(t, c)).collect()
    }

    fn at_hour(hour: u32) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .with_hour(hour)
            .unwrap()
    }

    #[test]
    fn empty_history_sentinels() {
        let session = TopicSession {
            topic_id: "math_101".into(),
            completion_time: 45.0,
            ..Default::default()
        };
        let metrics = compute_metrics(&session);
        assert_eq!(metrics.accuracy_rate, 0.0);
        assert_eq!(metrics.consistency, 0.0);
        assert_eq!(metrics.comprehension_speed, 0.0);
        assert_eq!(metrics.fatigue_level, 0.0);
        assert_eq!(metrics.difficulty_handling, 0.0);
        assert_eq!(metrics.retention_rate, 1.0);
    }

    #[test]
    fn sample_session_metrics() {
        let session = TopicSession {
            topic_id: "math_101".into(),
            completion_time: 45.0,
            correct_rate: Some(0.85),
            exercise_attempts: attempts(&[(5.0, true), (8.0, false), (6.0, true)]),
        };
        let metrics = compute_metrics(&session);

        assert!((metrics.comprehension_speed - 2.0 / 45.0).abs() < 1e-12);
        assert!((metrics.accuracy_rate - 2.0 / 3.0).abs() < 1e-12);
        // mean 19/3, variance 14/9
        assert!((metrics.consistency - 1.0 / (1.0 + 14.0 / 9.0)).abs() < 1e-12);
        assert_eq!(metrics.difficulty_handling, 0.85);
        // Δt = [3, -2] → 0.5; Δc = [-1, 1] → 0 ⇒ 0.3
        assert!((metrics.fatigue_level - 0.3).abs() < 1e-12);
    }

    #[test]
    fn zero_completion_time_has_zero_speed() {
        let session = TopicSession {
            completion_time: 0.0,
            exercise_attempts: attempts(&[(1.0, true)]),
            ..Default::default()
        };
        assert_eq!(comprehension_speed(&session), 0.0);

        let negative = TopicSession {
            completion_time: -3.0,
            ..session
        };
        assert_eq!(comprehension_speed(&negative), 0.0);
    }

    #[test]
    fn identical_times_are_fully_consistent() {
        assert_eq!(consistency(&attempts(&[(4.0, true), (4.0, false)])), 1.0);
    }

    #[test]
    fn fatigue_needs_two_attempts() {
        assert_eq!(fatigue_level(&attempts(&[(100.0, false)])), 0.0);
    }

    #[test]
    fn fatigue_clamped_at_one() {
        let score = fatigue_level(&attempts(&[(5.0, true), (6.0, true), (8.0, false), (10.0, false)]));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn fatigue_clamped_at_zero_when_speeding_up() {
        let score = fatigue_level(&attempts(&[(10.0, false), (5.0, true), (1.0, true)]));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn fatigue_grows_with_divergence() {
        let mut previous = 0.0;
        for step in 0..20 {
            let growth = step as f64 * 0.05;
            let history = attempts(&[(1.0, true), (1.0 + growth, true), (1.0 + 2.0 * growth, false)]);
            let score = fatigue_level(&history);
            assert!((0.0..=1.0).contains(&score));
            assert!(score >= previous, "fatigue decreased at step {step}: {score} < {previous}");
            previous = score;
        }
    }

    #[test]
    fn retention_curve() {
        assert_eq!(retention(0.0, 0.1), 1.0);
        let mut previous = 1.0;
        for hours in 1..200 {
            let r = retention(hours as f64, 0.1);
            assert!(r < previous);
            assert!(r > 0.0);
            previous = r;
        }
        assert!(retention(500.0, 0.1) < 1e-20);
        assert!((retention(10.0, 0.1) - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn retention_without_review_is_full() {
        let now = at_hour(12);
        assert_eq!(retention_since(None, now, 0.1), 1.0);
        let earlier = now - TimeDelta::hours(5);
        assert!((retention_since(Some(earlier), now, 0.1) - (-0.5f64).exp()).abs() < 1e-12);
        // Future timestamps are treated as just reviewed.
        assert_eq!(retention_since(Some(now + TimeDelta::hours(1)), now, 0.1), 1.0);
    }

    #[test]
    fn best_hours_ranking() {
        let history = vec![
            PerformanceRecord { timestamp: at_hour(9), performance_score: 0.9 },
            PerformanceRecord { timestamp: at_hour(14), performance_score: 0.7 },
            PerformanceRecord { timestamp: at_hour(20), performance_score: 0.8 },
        ];
        assert_eq!(best_learning_hours(&history, 3), vec![9, 20, 14]);
    }

    #[test]
    fn best_hours_averages_and_truncates() {
        let history = vec![
            PerformanceRecord { timestamp: at_hour(8), performance_score: 1.0 },
            PerformanceRecord { timestamp: at_hour(8), performance_score: 0.2 },
            PerformanceRecord { timestamp: at_hour(10), performance_score: 0.5 },
            PerformanceRecord { timestamp: at_hour(22), performance_score: 0.7 },
            PerformanceRecord { timestamp: at_hour(23), performance_score: 0.1 },
        ];
        // 8 → 0.6, 10 → 0.5, 22 → 0.7, 23 → 0.1
        assert_eq!(best_learning_hours(&history, 3), vec![22, 8, 10]);
        assert!(best_learning_hours(&[], 3).is_empty());
    }

    #[test]
    fn current_fatigue_uses_recent_window() {
        assert_eq!(current_fatigue(&[], 5), 0.0);

        let light = vec![SessionActivity { duration: 10.0, intensity: 50.0 }];
        // (0.7·10 + 0.3·50/5) / 100 = 0.1
        assert!((current_fatigue(&light, 5) - 0.1).abs() < 1e-12);

        let mut heavy: Vec<SessionActivity> = (0..5)
            .map(|_| SessionActivity { duration: 60.0, intensity: 1.0 })
            .collect();
        assert_eq!(current_fatigue(&heavy, 5), 1.0);

        // Older sessions fall out of the window.
        heavy.extend((0..5).map(|_| SessionActivity { duration: 0.0, intensity: 0.0 }));
        assert_eq!(current_fatigue(&heavy, 5), 0.0);
    }

    #[test]
    fn break_duration_truncates() {
        assert_eq!(break_duration(0.0, 15), 15);
        assert_eq!(break_duration(0.75, 15), 26);
        assert_eq!(break_duration(1.0, 15), 30);
    }

    #[test]
    fn daily_statistics_window() {
        let now = at_hour(12);
        let submissions = vec![
            Submission { submitted_at: now - TimeDelta::hours(1), time_spent: 1800.0, is_correct: true },
            Submission { submitted_at: now - TimeDelta::hours(2), time_spent: 1800.0, is_correct: false },
            Submission { submitted_at: now - TimeDelta::hours(30), time_spent: 9000.0, is_correct: false },
        ];
        let stats = daily_statistics(&submissions, now);
        assert_eq!(stats.activity_count, 2);
        assert_eq!(stats.total_time, 3600.0);
        assert_eq!(stats.average_effectiveness, 0.5);
        assert!((stats.fatigue_level - 0.5).abs() < 1e-12);

        let empty = daily_statistics(&[], now);
        assert_eq!(empty.activity_count, 0);
        assert_eq!(empty.fatigue_level, 0.0);
    }

    #[test]
    fn effectiveness_rewards_fast_correct_answers() {
        assert_eq!(activity_effectiveness(false, 10.0, 60.0), 0.3);
        assert_eq!(activity_effectiveness(true, 30.0, 60.0), 1.0);
        assert!((activity_effectiveness(true, 120.0, 60.0) - 0.85).abs() < 1e-12);
        assert_eq!(activity_effectiveness(true, 0.0, 60.0), 1.0);
        assert_eq!(activity_effectiveness(true, -5.0, 60.0), 1.0);
    }

    #[test]
    fn activity_fatigue_saturates_at_eight_hours() {
        assert_eq!(activity_fatigue(0.0), 0.0);
        assert_eq!(activity_fatigue(240.0), 0.5);
        assert_eq!(activity_fatigue(600.0), 1.0);
        assert_eq!(activity_fatigue(-30.0), 0.0);
    }

    #[test]
    fn weighted_handling_averages_present_bands() {
        use ProblemDifficulty::*;

        assert_eq!(weighted_difficulty_handling(&[]), 0.0);
        // easy 1/2 · 1 = 0.5, hard 1/1 · 3 = 3.0; medium has no results.
        let results = [(Easy, true), (Easy, false), (Hard, true)];
        assert_eq!(weighted_difficulty_handling(&results), 1.75);
        assert_eq!(weighted_difficulty_handling(&[(Medium, false)]), 0.0);
    }

    #[test]
    fn completion_rate_of_path() {
        assert_eq!(path_completion_rate(2, 4), 0.5);
        assert_eq!(path_completion_rate(4, 4), 1.0);
        assert_eq!(path_completion_rate(6, 4), 1.0);
        assert_eq!(path_completion_rate(3, 0), 0.0);
    }
}
