//! Core state type for particle simulations.
//!
//! A [`State`] is a flat sequence of 3D vectors alternating position and
//! velocity per particle:
//! - `state[2 * i]`     position of particle `i`
//! - `state[2 * i + 1]` velocity of particle `i`
//!
//! The same layout is used for derivatives, where the even slots hold
//! velocities and the odd slots hold accelerations.

use std::ops::Index;

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    data: Vec<NVec3>, // (position, velocity) pairs
}

impl State {
    /// Build a state from parallel position and velocity slices.
    ///
    /// Panics if the slices differ in length, since the pairing would be lost.
    pub fn from_pairs(positions: &[NVec3], velocities: &[NVec3]) -> Self {
        assert_eq!(positions.len(), velocities.len(), "positions and velocities must pair up");
        let data = positions
            .iter()
            .zip(velocities.iter())
            .flat_map(|(x, v)| [*x, *v])
            .collect();
        Self { data }
    }

    /// Particles at the given positions, all at rest.
    pub fn at_rest(positions: &[NVec3]) -> Self {
        let velocities = vec![NVec3::zeros(); positions.len()];
        Self::from_pairs(positions, &velocities)
    }

    /// Number of 3D vectors (always `2 * particle_count`)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.data.len() / 2
    }

    pub fn position(&self, i: usize) -> NVec3 {
        self.data[2 * i]
    }

    pub fn velocity(&self, i: usize) -> NVec3 {
        self.data[2 * i + 1]
    }

    pub fn positions(&self) -> Vec<NVec3> {
        self.data.iter().step_by(2).copied().collect()
    }

    pub fn velocities(&self) -> Vec<NVec3> {
        self.data.iter().skip(1).step_by(2).copied().collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NVec3> {
        self.data.iter()
    }

    /// `self + h * other` as a new state. Lengths must match.
    pub fn added_scaled(&self, h: f64, other: &State) -> State {
        debug_assert_eq!(self.len(), other.len());
        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a + h * b).collect();
        State { data }
    }

    /// `h * self` as a new state.
    pub fn scaled(&self, h: f64) -> State {
        State { data: self.data.iter().map(|a| h * a).collect() }
    }

    /// Index of the first component that is NaN or infinite, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.data.iter().position(|v| !v.iter().all(|c| c.is_finite()))
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Largest Euclidean distance between two states, used for error estimates.
    pub fn max_distance(&self, other: &State) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

impl Index<usize> for State {
    type Output = NVec3;

    fn index(&self, index: usize) -> &NVec3 {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_interleave() {
        let s = State::from_pairs(
            &[NVec3::new(1.0, 0.0, 0.0), NVec3::new(2.0, 0.0, 0.0)],
            &[NVec3::new(0.0, 1.0, 0.0), NVec3::new(0.0, 2.0, 0.0)],
        );
        assert_eq!(s.len(), 4);
        assert_eq!(s.particle_count(), 2);
        assert_eq!(s[2], NVec3::new(2.0, 0.0, 0.0));
        assert_eq!(s.velocity(1), NVec3::new(0.0, 2.0, 0.0));
        assert_eq!(s.positions(), vec![NVec3::new(1.0, 0.0, 0.0), NVec3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn added_scaled_leaves_inputs_alone() {
        let a = State::at_rest(&[NVec3::new(1.0, 1.0, 1.0)]);
        let b = State::from_pairs(&[NVec3::new(2.0, 0.0, 0.0)], &[NVec3::new(0.0, 4.0, 0.0)]);
        let c = a.added_scaled(0.5, &b);
        assert_eq!(c.position(0), NVec3::new(2.0, 1.0, 1.0));
        assert_eq!(c.velocity(0), NVec3::new(0.0, 2.0, 0.0));
        assert_eq!(a.velocity(0), NVec3::zeros());
    }

    #[test]
    fn detects_non_finite() {
        let s = State::from_pairs(&[NVec3::zeros()], &[NVec3::new(0.0, f64::NAN, 0.0)]);
        assert_eq!(s.first_non_finite(), Some(1));
        assert!(!s.is_finite());
    }
}
