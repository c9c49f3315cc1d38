//! Tunable simulation parameters.
//!
//! The defaults reproduce the reference fire-spread behavior; presets with
//! different factors change how aggressively fire takes hold and how fast
//! vegetation recovers.

use serde::{Deserialize, Serialize};

use crate::cell::CellState;
use crate::error::ConfigError;

/// Probability factors and initial-state weights for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Growing -> Burning multiplier, applied to half the neighbor sum when
    /// fire or ash is adjacent.
    pub ignition_factor: f64,
    /// Growing -> Empty multiplier, applied to the neighbor sum when no
    /// fire or ash is adjacent.
    pub dieoff_factor: f64,
    /// Empty -> Growing multiplier, applied to the neighbor sum.
    pub regrowth_factor: f64,
    /// Relative weights for Growing / Empty / Burning in the initial fill.
    /// Burnt never appears initially.
    pub initial_weights: [u32; 3],
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            ignition_factor: 0.62,
            dieoff_factor: 0.01,
            regrowth_factor: 0.02,
            initial_weights: [7, 5, 1],
        }
    }
}

impl SimulationConfig {
    /// Check every parameter, returning the first offender.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factors = [
            ("ignition_factor", self.ignition_factor),
            ("dieoff_factor", self.dieoff_factor),
            ("regrowth_factor", self.regrowth_factor),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if self.initial_weights.iter().all(|&weight| weight == 0) {
            return Err(ConfigError::InvalidParameter {
                name: "initial_weights",
                reason: "at least one weight must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Expand the weight triple into a draw pool over Growing / Empty /
    /// Burning, one entry per unit of weight.
    pub(crate) fn initial_pool(&self) -> Vec<CellState> {
        let [growing, empty, burning] = self.initial_weights;
        let mut pool = Vec::with_capacity((growing + empty + burning) as usize);
        pool.extend(std::iter::repeat(CellState::Growing).take(growing as usize));
        pool.extend(std::iter::repeat(CellState::Empty).take(empty as usize));
        pool.extend(std::iter::repeat(CellState::Burning).take(burning as usize));
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_factors() {
        let config = SimulationConfig::default();
        assert_eq!(config.ignition_factor, 0.62);
        assert_eq!(config.dieoff_factor, 0.01);
        assert_eq!(config.regrowth_factor, 0.02);
        assert_eq!(config.initial_weights, [7, 5, 1]);
        config.validate().unwrap();
    }

    #[test]
    fn negative_or_non_finite_factors_are_rejected() {
        let mut config = SimulationConfig::default();
        config.dieoff_factor = -0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "dieoff_factor",
                ..
            })
        ));

        let mut config = SimulationConfig::default();
        config.ignition_factor = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let mut config = SimulationConfig::default();
        config.initial_weights = [0, 0, 0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "initial_weights",
                ..
            })
        ));
    }

    #[test]
    fn pool_expands_weights_in_order() {
        let pool = SimulationConfig::default().initial_pool();
        assert_eq!(pool.len(), 13);
        let growing = pool.iter().filter(|&&s| s == CellState::Growing).count();
        let empty = pool.iter().filter(|&&s| s == CellState::Empty).count();
        let burning = pool.iter().filter(|&&s| s == CellState::Burning).count();
        assert_eq!((growing, empty, burning), (7, 5, 1));
        assert!(!pool.contains(&CellState::Burnt));
    }
}
