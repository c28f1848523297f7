//! Analytics configuration and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the scoring and recommendation formulas.
///
/// Every field has a default, so an empty config file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Fatigue above this recommends a break.
    #[serde(default = "default_break_threshold")]
    pub fatigue_break_threshold: f64,
    /// Accuracy above this raises difficulty; otherwise it is lowered.
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy_threshold: f64,
    /// Completion rate above this increases the pace.
    #[serde(default = "default_pace_threshold")]
    pub pace_completion_threshold: f64,
    /// Accuracy below this adds `problem_solving` as a focus area.
    #[serde(default = "default_focus_threshold")]
    pub focus_accuracy_threshold: f64,
    /// Accuracy below this flags the topic for revision.
    #[serde(default = "default_revision_threshold")]
    pub revision_accuracy_threshold: f64,
    /// Size of a single difficulty adjustment.
    #[serde(default = "default_difficulty_step")]
    pub difficulty_step: f64,
    /// Forgetting-curve decay per hour.
    #[serde(default = "default_decay_rate")]
    pub retention_decay_rate: f64,
    /// Retention below this marks a topic for reinforcement.
    #[serde(default = "default_reinforcement_threshold")]
    pub reinforcement_retention_threshold: f64,
    /// Break length at zero fatigue, in minutes.
    #[serde(default = "default_break_minutes")]
    pub base_break_minutes: u32,
    /// Number of most recent sessions considered for current fatigue.
    #[serde(default = "default_session_window")]
    pub recent_session_window: usize,
    /// Number of hours returned by the best-hour ranking.
    #[serde(default = "default_best_hours")]
    pub best_hours_count: usize,
}

fn default_break_threshold() -> f64 {
    0.7
}
fn default_high_accuracy() -> f64 {
    0.8
}
fn default_pace_threshold() -> f64 {
    0.9
}
fn default_focus_threshold() -> f64 {
    0.7
}
fn default_revision_threshold() -> f64 {
    0.6
}
fn default_difficulty_step() -> f64 {
    0.1
}
fn default_decay_rate() -> f64 {
    0.1
}
fn default_reinforcement_threshold() -> f64 {
    0.5
}
fn default_break_minutes() -> u32 {
    15
}
fn default_session_window() -> usize {
    5
}
fn default_best_hours() -> usize {
    3
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            fatigue_break_threshold: default_break_threshold(),
            high_accuracy_threshold: default_high_accuracy(),
            pace_completion_threshold: default_pace_threshold(),
            focus_accuracy_threshold: default_focus_threshold(),
            revision_accuracy_threshold: default_revision_threshold(),
            difficulty_step: default_difficulty_step(),
            retention_decay_rate: default_decay_rate(),
            reinforcement_retention_threshold: default_reinforcement_threshold(),
            base_break_minutes: default_break_minutes(),
            recent_session_window: default_session_window(),
            best_hours_count: default_best_hours(),
        }
    }
}

impl AnalyticsConfig {
    /// Reject settings the scoring formulas cannot use.
    ///
    /// A negative or NaN decay rate would make retention grow over time.
    pub fn validate(&self) -> Result<()> {
        let decay = self.retention_decay_rate;
        if !(decay >= 0.0 && decay.is_finite()) {
            anyhow::bail!("retention_decay_rate must be a non-negative finite number, got {decay}");
        }
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `pathwise.toml` in the current directory
/// 2. `~/.config/pathwise/config.toml`
///
/// Environment variable override: `PATHWISE_DECAY_RATE`.
pub fn load_config() -> Result<AnalyticsConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("pathwise.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AnalyticsConfig::default(),
    };

    if let Ok(raw) = std::env::var("PATHWISE_DECAY_RATE") {
        config.retention_decay_rate = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid PATHWISE_DECAY_RATE: {raw}"))?;
    }

    config.validate()?;
    Ok(config)
}

/// Parse a config from a TOML string.
pub fn parse_config_str(content: &str) -> Result<AnalyticsConfig> {
    let config: AnalyticsConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("pathwise"))
}
