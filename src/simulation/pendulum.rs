//! Multi-particle pendulum: a chain of point masses joined by damped springs,
//! hanging from a pinned root particle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{validate_masses, validate_non_negative, SimError};
use crate::simulation::forces::{ForceSet, Gravity, NeighborSprings, SpringParams, ViscousDrag};
use crate::simulation::params::Physics;
use crate::simulation::states::{NVec3, State};
use crate::simulation::system::{check_state_length, ParticleModel};

/// Chain layout and spring constants
#[derive(Debug, Clone)]
pub struct PendulumParams {
    pub particles: usize,
    pub mass: f64,
    pub spring: SpringParams,
    pub anchor: NVec3, // position of the pinned root
    pub gap_min: f64,  // vertical spacing between consecutive particles is drawn from [gap_min, gap_max]
    pub gap_max: f64,
    pub jitter: f64,   // horizontal offsets are drawn from [-jitter, jitter]
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            particles: 5,
            mass: 0.1,
            spring: SpringParams::new(4.0, 0.1),
            anchor: NVec3::new(0.0, 2.0, 0.0),
            gap_min: 0.1,
            gap_max: 0.3,
            jitter: 0.1,
        }
    }
}

impl PendulumParams {
    fn validate(&self) -> Result<(), SimError> {
        if self.particles == 0 {
            return Err(SimError::InvalidParticleCount(self.particles));
        }
        validate_non_negative("spring.stiffness", self.spring.stiffness)?;
        validate_non_negative("spring.rest_length", self.spring.rest_length)?;
        validate_non_negative("gap_min", self.gap_min)?;
        validate_non_negative("jitter", self.jitter)?;
        if !(self.gap_max.is_finite() && self.gap_max >= self.gap_min) {
            return Err(SimError::InvalidParameter { name: "gap_max", value: self.gap_max });
        }
        Ok(())
    }

    /// Chain hanging straight down from the anchor, evenly spaced by `gap`
    pub fn straight(particles: usize, gap: f64) -> Self {
        Self {
            particles,
            gap_min: gap,
            gap_max: gap,
            jitter: 0.0,
            ..Self::default()
        }
    }
}

pub struct PendulumSystem {
    masses: Vec<f64>,
    forces: ForceSet,
    springs: Vec<(usize, usize)>,
    initial: State,
    state: State,
}

impl PendulumSystem {
    /// Build a chain with uniform masses; initial positions come from `seed`.
    pub fn new(params: PendulumParams, physics: &Physics, seed: u64) -> Result<Self, SimError> {
        let masses = vec![params.mass; params.particles];
        Self::with_masses(params, masses, physics, seed)
    }

    /// Build a chain with one mass per particle.
    pub fn with_masses(params: PendulumParams, masses: Vec<f64>, physics: &Physics, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        physics.validate()?;
        if masses.len() != params.particles {
            return Err(SimError::InvalidParticleCount(masses.len()));
        }
        validate_masses(&masses)?;

        let n = params.particles;

        // Linear adjacency: i <-> i - 1, i <-> i + 1
        let neighbors: Vec<Vec<usize>> = (0..n)
            .map(|i| {
                let mut list = Vec::with_capacity(2);
                if i > 0 {
                    list.push(i - 1);
                }
                if i + 1 < n {
                    list.push(i + 1);
                }
                list
            })
            .collect();
        let chain = NeighborSprings::new(params.spring, physics.eps, neighbors);
        let springs = chain.edges();

        let forces = ForceSet::new()
            .with(Gravity { g: physics.gravity })
            .with(ViscousDrag { k: physics.viscous_k })
            .with(chain)
            .pin(0);

        let initial = Self::initial_state(&params, seed);

        ftlog::debug!("pendulum: {n} particles, k = {}, rest = {}", params.spring.stiffness, params.spring.rest_length);

        Ok(Self {
            masses,
            forces,
            springs,
            state: initial.clone(),
            initial,
        })
    }

    /// Root at the anchor, each following particle a random gap below the
    /// previous one with a small random horizontal offset. All at rest.
    fn initial_state(params: &PendulumParams, seed: u64) -> State {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(params.particles);
        positions.push(params.anchor);

        for i in 1..params.particles {
            let prev_y = positions[i - 1].y;
            let gap = rng.random_range(params.gap_min..=params.gap_max);
            let dx = rng.random_range(-params.jitter..=params.jitter);
            let dz = rng.random_range(-params.jitter..=params.jitter);
            positions.push(NVec3::new(params.anchor.x + dx, prev_y - gap, params.anchor.z + dz));
        }

        State::at_rest(&positions)
    }
}

impl ParticleModel for PendulumSystem {
    fn state(&self) -> &State {
        &self.state
    }

    fn set_state(&mut self, state: State) -> Result<(), SimError> {
        check_state_length(&self.state, &state)?;
        self.state = state;
        Ok(())
    }

    fn eval_derivative(&self, state: &State) -> State {
        self.forces.derivative(state, &self.masses)
    }

    fn masses(&self) -> &[f64] {
        &self.masses
    }

    fn fixed_particles(&self) -> &[usize] {
        self.forces.fixed()
    }

    fn springs(&self) -> Vec<(usize, usize)> {
        self.springs.clone()
    }

    fn reset(&mut self) {
        self.state = self.initial.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn straight_chain_is_evenly_spaced() {
        let p = PendulumSystem::new(PendulumParams::straight(3, 0.2), &Physics::default(), 0).unwrap();
        let xs = p.positions();
        assert_abs_diff_eq!(xs[1].y, 1.8, epsilon = 1e-12);
        assert_abs_diff_eq!(xs[2].y, 1.6, epsilon = 1e-12);
        assert_eq!(xs[2].x, 0.0);
    }

    #[test]
    fn random_gaps_stay_in_range() {
        let p = PendulumSystem::new(PendulumParams::default(), &Physics::default(), 7).unwrap();
        let xs = p.positions();
        for w in xs.windows(2) {
            let gap = w[0].y - w[1].y;
            assert!(gap > 0.1 - 1e-12 && gap < 0.3 + 1e-12, "gap {gap} out of range");
            assert!((w[1].x).abs() <= 0.1);
        }
    }

    #[test]
    fn chain_springs() {
        let p = PendulumSystem::new(PendulumParams::straight(4, 0.1), &Physics::default(), 0).unwrap();
        assert_eq!(p.springs(), vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(p.fixed_particles(), &[0]);
    }

    #[test]
    fn zero_particles_rejected() {
        let r = PendulumSystem::new(PendulumParams::straight(0, 0.1), &Physics::default(), 0);
        assert!(matches!(r, Err(SimError::InvalidParticleCount(0))));
    }
}
