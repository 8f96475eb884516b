//! The particle-system capability shared by every model and consumed by the integrators.

use crate::error::SimError;
use crate::simulation::states::{NVec3, State};

/// A set of point masses whose motion is described by a first-order ODE on a [`State`].
pub trait ParticleModel {
    /// Current (position, velocity) pairs.
    fn state(&self) -> &State;

    /// Replace the whole state. Fails without touching the current state if
    /// the length differs from `2 * particle_count()`.
    fn set_state(&mut self, state: State) -> Result<(), SimError>;

    /// Time derivative of `state`: velocities in the even slots and
    /// accelerations in the odd slots.
    ///
    /// Must depend only on `state` and the model's fixed parameters; the
    /// integrators call it on trial states that are never stored.
    ///
    /// `state` must have the model's length (`2 * particle_count()`); a
    /// state of any other length panics.
    fn eval_derivative(&self, state: &State) -> State;

    fn masses(&self) -> &[f64];

    /// Particles whose acceleration is pinned to zero.
    fn fixed_particles(&self) -> &[usize];

    /// Spring connections as index pairs, for drawing.
    fn springs(&self) -> Vec<(usize, usize)>;

    /// Restore the configuration the model was built with.
    fn reset(&mut self);

    fn particle_count(&self) -> usize {
        self.masses().len()
    }

    fn positions(&self) -> Vec<NVec3> {
        self.state().positions()
    }
}

/// Shared `set_state` check: the replacement must have the same length.
pub(crate) fn check_state_length(current: &State, next: &State) -> Result<(), SimError> {
    if current.len() == next.len() {
        Ok(())
    } else {
        Err(SimError::InvalidStateLength { expected: current.len(), found: next.len() })
    }
}
