//! Force contributors for the mass-spring models
//!
//! Each term implements [`ForceTerm`] and adds its force on every particle
//! into a shared buffer. A [`ForceSet`] sums the terms, divides by mass, and
//! zeroes the pinned particles to produce accelerations.

use serde::Deserialize;

use crate::simulation::states::{NVec3, State};

/// Stiffness and rest length of one family of springs
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,   // Hooke constant k
    pub rest_length: f64, // length at which the spring exerts no force
}

impl SpringParams {
    pub fn new(stiffness: f64, rest_length: f64) -> Self {
        Self { stiffness, rest_length }
    }
}

/// Force on the particle at displacement `d = x_i - x_j` from its neighbour.
///
/// `eps` keeps the normalisation finite when the two particles coincide, in
/// which case the force degrades smoothly to zero instead of becoming NaN.
pub fn spring_force(d: NVec3, params: &SpringParams, eps: f64) -> NVec3 {
    let len = d.norm();
    // -k * (|d| - L) * d / (|d| + eps)
    let coef = -params.stiffness * (len - params.rest_length);
    coef * (d / (eps + len))
}

/// Trait for force sources evaluated on a trial state
/// Implementations add their contribution into `out[i]` for each particle
pub trait ForceTerm {
    fn accumulate(&self, state: &State, masses: &[f64], out: &mut [NVec3]);
}

/// Uniform gravitational field: F = m g
#[derive(Debug, Clone)]
pub struct Gravity {
    pub g: NVec3,
}

impl ForceTerm for Gravity {
    fn accumulate(&self, _state: &State, masses: &[f64], out: &mut [NVec3]) {
        for (f, m) in out.iter_mut().zip(masses.iter()) {
            *f += *m * self.g;
        }
    }
}

/// Linear viscous drag: F = -k v
#[derive(Debug, Clone)]
pub struct ViscousDrag {
    pub k: f64,
}

impl ForceTerm for ViscousDrag {
    fn accumulate(&self, state: &State, _masses: &[f64], out: &mut [NVec3]) {
        for (i, f) in out.iter_mut().enumerate() {
            *f += -self.k * state.velocity(i);
        }
    }
}

/// One family of springs stored as a per-particle neighbour list.
///
/// Every particle sums the pull of each of its own neighbours; the reaction on
/// the neighbour is produced when that neighbour's list is walked.
#[derive(Debug, Clone)]
pub struct NeighborSprings {
    pub params: SpringParams,
    pub eps: f64,
    neighbors: Vec<Vec<usize>>,
}

impl NeighborSprings {
    pub fn new(params: SpringParams, eps: f64, neighbors: Vec<Vec<usize>>) -> Self {
        Self { params, eps, neighbors }
    }

    pub fn neighbors_of(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Each connection once, as `(lower, higher)` index pairs
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for (i, list) in self.neighbors.iter().enumerate() {
            for &j in list {
                if i < j {
                    edges.push((i, j));
                }
            }
        }
        edges
    }
}

impl ForceTerm for NeighborSprings {
    fn accumulate(&self, state: &State, _masses: &[f64], out: &mut [NVec3]) {
        for (i, list) in self.neighbors.iter().enumerate() {
            let xi = state.position(i);
            // Sum first so each family contributes one addition per particle
            let mut total = NVec3::zeros();
            for &j in list {
                total += spring_force(xi - state.position(j), &self.params, self.eps);
            }
            out[i] += total;
        }
    }
}

/// Ordered collection of force terms plus the pinned particles
pub struct ForceSet {
    terms: Vec<Box<dyn ForceTerm + Send + Sync>>,
    fixed: Vec<usize>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new(), fixed: Vec::new() }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceTerm + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Pin a particle: its acceleration is forced to zero
    pub fn pin(mut self, index: usize) -> Self {
        if !self.fixed.contains(&index) {
            self.fixed.push(index);
        }
        self
    }

    pub fn fixed(&self) -> &[usize] {
        &self.fixed
    }

    /// Compute the time derivative of `state`
    /// - even slots: velocities copied from `state`
    /// - odd slots: summed forces / mass, zero for pinned particles
    ///
    /// `state` must hold one (position, velocity) pair per entry of `masses`.
    pub fn derivative(&self, state: &State, masses: &[f64]) -> State {
        let n = state.particle_count();
        debug_assert_eq!(n, masses.len(), "derivative of a {n}-particle state asked of a {}-particle model", masses.len());

        // Zero buffer, then let every term add in
        let mut forces = vec![NVec3::zeros(); n];
        for term in &self.terms {
            term.accumulate(state, masses, &mut forces);
        }

        let mut accels: Vec<NVec3> = forces.iter().zip(masses.iter()).map(|(f, m)| f / *m).collect();
        for &i in &self.fixed {
            if let Some(a) = accels.get_mut(i) {
                *a = NVec3::zeros();
            }
        }

        State::from_pairs(&state.velocities(), &accels)
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn stretched_spring_pulls_back() {
        let p = SpringParams::new(4.0, 0.1);
        let f = spring_force(NVec3::new(0.0, -0.3, 0.0), &p, 1e-6);
        // stretched by 0.2 along -y, so pulled toward +y with magnitude ~0.8
        assert!(f.y > 0.0);
        assert_abs_diff_eq!(f.norm(), 0.8, epsilon = 1e-5);
    }

    #[test]
    fn coincident_particles_give_zero_force() {
        let p = SpringParams::new(50.0, 0.2);
        let f = spring_force(NVec3::zeros(), &p, 1e-6);
        assert_eq!(f, NVec3::zeros());
    }

    #[test]
    fn edges_are_unique() {
        let springs = NeighborSprings::new(SpringParams::new(1.0, 1.0), 1e-6, vec![vec![1], vec![0, 2], vec![1]]);
        assert_eq!(springs.edges(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn pinned_particle_has_zero_acceleration() {
        let set = ForceSet::new().with(Gravity { g: NVec3::new(0.0, -9.81, 0.0) }).pin(0);
        let s = State::at_rest(&[NVec3::zeros(), NVec3::zeros()]);
        let d = set.derivative(&s, &[1.0, 1.0]);
        assert_eq!(d.velocity(0), NVec3::zeros());
        assert_abs_diff_eq!(d.velocity(1).y, -9.81, epsilon = 1e-12);
    }
}
