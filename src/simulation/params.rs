//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the driver settings (step size, end time, seed).
//! `Physics` holds the environment shared by every model: gravity, viscous
//! drag, and the epsilon guarding spring normalisation.

use crate::error::{validate_non_negative, validate_positive, SimError};
use crate::simulation::states::NVec3;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64, // time end
    pub h0: f64,    // fixed step size
    pub seed: u64,  // seed for randomized initial configurations
}

impl Parameters {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.h0.is_finite() && self.h0 > 0.0) {
            return Err(SimError::InvalidStepSize(self.h0));
        }
        validate_non_negative("t_end", self.t_end)
    }

    /// Number of whole steps needed to reach `t_end`
    pub fn step_count(&self) -> u64 {
        (self.t_end / self.h0).round() as u64
    }
}

#[derive(Debug, Clone)]
pub struct Physics {
    pub gravity: NVec3,  // gravitational acceleration
    pub viscous_k: f64,  // drag coefficient, F = -k v
    pub eps: f64,        // added to |d| before normalising spring directions
}

impl Physics {
    pub fn validate(&self) -> Result<(), SimError> {
        validate_non_negative("viscous_k", self.viscous_k)?;
        validate_positive("eps", self.eps)?;
        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(SimError::InvalidParameter { name: "gravity", value: self.gravity.norm() });
        }
        Ok(())
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: NVec3::new(0.0, -9.81, 0.0),
            viscous_k: 0.1,
            eps: 1e-6,
        }
    }
}
