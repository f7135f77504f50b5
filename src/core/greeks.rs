//! Option Greeks
//!
//! First and second order sensitivities as quoted alongside a contract.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Theta: dV/dt (time decay, per day)
    pub theta: f64,
    /// Vega: dV/dσ (per 1 vol point)
    pub vega: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
        }
    }

    /// Are these within the ranges a quoted contract can carry?
    pub fn is_well_formed(&self) -> bool {
        (-1.0..=1.0).contains(&self.delta) && self.gamma >= 0.0 && self.vega >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed() {
        assert!(Greeks::new(-0.4, 0.02, -0.1, 0.2).is_well_formed());
        assert!(!Greeks::new(1.2, 0.02, -0.1, 0.2).is_well_formed());
        assert!(!Greeks::new(0.5, -0.02, -0.1, 0.2).is_well_formed());
    }
}
