//! Search defaults and environment overrides

use std::sync::OnceLock;

use crate::error::Result;
use crate::strategy::{BackgroundDifference, MatchStrategy, background::DEFAULT_THRESHOLD_PERCENT};

/// Suppression margin used when none is given
pub const DEFAULT_MARGIN: isize = 15;

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_env_bool(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref().map(str::trim),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

static ENV_MARGIN: OnceLock<isize> = OnceLock::new();

/// Margin from `POINTS_MARGIN`, falling back to [`DEFAULT_MARGIN`]
pub fn env_margin() -> isize {
    *ENV_MARGIN.get_or_init(|| parse_env("POINTS_MARGIN").unwrap_or(DEFAULT_MARGIN))
}

static ENV_THRESHOLD: OnceLock<f64> = OnceLock::new();

/// Background threshold from `POINTS_THRESHOLD`, falling back to 90
pub fn env_threshold() -> f64 {
    *ENV_THRESHOLD.get_or_init(|| {
        parse_env::<f64>("POINTS_THRESHOLD")
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(DEFAULT_THRESHOLD_PERCENT)
    })
}

static ENV_MAX_DIM: OnceLock<Option<u32>> = OnceLock::new();

/// Downscale limit from `POINTS_MAX_DIM`; unset or `0` disables it
pub fn env_max_dim() -> Option<u32> {
    *ENV_MAX_DIM.get_or_init(|| parse_env::<u32>("POINTS_MAX_DIM").filter(|&v| v > 0))
}

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Whether `POINTS_DEBUG` asks for verbose output
pub fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| parse_env_bool("POINTS_DEBUG"))
}

/// Margin and strategy for one search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Suppression radius around every found point
    pub margin: isize,
    /// Color matching strategy
    pub strategy: MatchStrategy,
}

impl SearchConfig {
    /// Defaults with `POINTS_MARGIN` / `POINTS_THRESHOLD` applied
    pub fn from_env() -> Result<Self> {
        let strategy = BackgroundDifference::with_threshold(env_threshold())?.into();
        Ok(Self {
            margin: env_margin(),
            strategy,
        })
    }

    /// Replace the margin
    pub fn with_margin(mut self, margin: isize) -> Self {
        self.margin = margin;
        self
    }

    /// Replace the strategy
    pub fn with_strategy(mut self, strategy: impl Into<MatchStrategy>) -> Self {
        self.strategy = strategy.into();
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            strategy: MatchStrategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ExactColorMatch;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.margin, 15);
        assert!(matches!(
            config.strategy,
            MatchStrategy::BackgroundDifference(_)
        ));
    }

    #[test]
    fn test_builder() {
        let exact = ExactColorMatch::new(1, 2, 3).unwrap();
        let config = SearchConfig::default().with_margin(4).with_strategy(exact);
        assert_eq!(config.margin, 4);
        assert!(matches!(config.strategy, MatchStrategy::ExactColor(e) if e == exact));
    }
}
