//! Error types for model construction, state updates, and the driver loop.

use std::fmt;

/// Errors that can occur while building or advancing a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// `set_state` was given a vector whose length is not `2 * particle_count`.
    InvalidStateLength { expected: usize, found: usize },
    /// A particle mass is zero, negative, or not finite.
    NonPositiveMass { index: usize, mass: f64 },
    /// Cloth grids must be at least 8x8.
    InvalidGridDimensions { rows: usize, cols: usize },
    /// A pendulum needs at least one particle.
    InvalidParticleCount(usize),
    /// Step size must be positive and finite.
    InvalidStepSize(f64),
    /// A physical coefficient is out of range.
    InvalidParameter { name: &'static str, value: f64 },
    /// A position or velocity became NaN or infinite.
    NonFiniteState { step: u64, index: usize },
    /// The renderer failed to consume a frame.
    Render(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidStateLength { expected, found } => {
                write!(f, "state vector has length {found}, expected {expected}")
            }
            SimError::NonPositiveMass { index, mass } => {
                write!(f, "particle {index} has non-positive mass {mass}")
            }
            SimError::InvalidGridDimensions { rows, cols } => {
                write!(f, "cloth grid must be at least 8x8, got {rows}x{cols}")
            }
            SimError::InvalidParticleCount(n) => write!(f, "invalid particle count {n}"),
            SimError::InvalidStepSize(h) => write!(f, "step size must be positive and finite, got {h}"),
            SimError::InvalidParameter { name, value } => {
                write!(f, "parameter `{name}` out of range: {value}")
            }
            SimError::NonFiniteState { step, index } => {
                write!(f, "state element {index} is not finite after step {step}")
            }
            SimError::Render(msg) => write!(f, "renderer error: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

/// Reject masses that would produce infinite or NaN accelerations.
pub fn validate_masses(masses: &[f64]) -> Result<(), SimError> {
    match masses.iter().position(|m| !(m.is_finite() && *m > 0.0)) {
        Some(index) => Err(SimError::NonPositiveMass { index, mass: masses[index] }),
        None => Ok(()),
    }
}

/// Reject negative or non-finite coefficients.
pub fn validate_non_negative(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

/// Reject zero, negative, or non-finite coefficients.
pub fn validate_positive(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masses_must_be_positive() {
        assert!(validate_masses(&[0.1, 0.2]).is_ok());
        assert_eq!(
            validate_masses(&[0.1, 0.0]),
            Err(SimError::NonPositiveMass { index: 1, mass: 0.0 })
        );
        assert!(validate_masses(&[f64::NAN]).is_err());
    }

    #[test]
    fn display_names_the_lengths() {
        let e = SimError::InvalidStateLength { expected: 4, found: 3 };
        assert_eq!(e.to_string(), "state vector has length 3, expected 4");
    }
}
