//! ACS configuration parameters.

use crate::error::AcsError;
use serde::{Deserialize, Serialize};

/// ACS configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcsConfig {
    /// Pheromone importance (alpha)
    pub alpha: f64,
    /// Inverse-distance importance (beta)
    pub beta: f64,
    /// Exploitation probability of the pseudorandom proportional rule
    pub q0: f64,
    /// Local pheromone decay coefficient
    pub phi: f64,
    /// Global evaporation rate
    pub rho: f64,
    /// Initial pheromone level
    pub tau0: f64,
    /// Number of ants in the colony
    pub num_ants: usize,
    /// Base iteration budget; every improvement extends the budget by this much
    pub max_iter: usize,
    /// Origin city by name; `None` starts from the first city of the table
    pub origin: Option<String>,
    /// Random seed
    pub seed: u64,
}

impl Default for AcsConfig {
    fn default() -> Self {
        AcsConfig {
            alpha: 1.0,
            beta: 1.0,
            q0: 0.5,
            phi: 0.4,
            rho: 0.3,
            tau0: 0.01,
            num_ants: 50,
            max_iter: 15,
            origin: None,
            seed: 42,
        }
    }
}

impl AcsConfig {
    /// Reject invalid parameters before any iteration runs.
    pub fn validate(&self) -> Result<(), AcsError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(AcsError::InvalidConfig(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(AcsError::InvalidConfig(format!(
                "beta must be positive, got {}",
                self.beta
            )));
        }
        if !self.q0.is_finite() || !(0.0..=1.0).contains(&self.q0) {
            return Err(AcsError::InvalidConfig(format!(
                "q0 must lie in [0, 1], got {}",
                self.q0
            )));
        }
        if !self.phi.is_finite() || self.phi <= 0.0 || self.phi >= 1.0 {
            return Err(AcsError::InvalidConfig(format!(
                "phi must lie in (0, 1), got {}",
                self.phi
            )));
        }
        if !self.rho.is_finite() || self.rho <= 0.0 || self.rho >= 1.0 {
            return Err(AcsError::InvalidConfig(format!(
                "rho must lie in (0, 1), got {}",
                self.rho
            )));
        }
        if !self.tau0.is_finite() || self.tau0 <= 0.0 {
            return Err(AcsError::InvalidConfig(format!(
                "tau0 must be positive, got {}",
                self.tau0
            )));
        }
        if self.num_ants == 0 {
            return Err(AcsError::InvalidConfig(
                "colony size must be at least 1".to_string(),
            ));
        }
        if self.max_iter == 0 {
            return Err(AcsError::InvalidConfig(
                "max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
