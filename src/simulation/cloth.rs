//! Cloth: a rows x cols grid of particles tied together by three spring
//! families and hung from its two top corners.
//!
//! - structural: up, down, left, right
//! - shear: the four diagonals
//! - flexion: two cells away along each axis
//!
//! Particle (row, col) lives at flat index `row * cols + col`.

use crate::error::{validate_masses, validate_non_negative, validate_positive, SimError};
use crate::simulation::forces::{ForceSet, Gravity, NeighborSprings, SpringParams, ViscousDrag};
use crate::simulation::params::Physics;
use crate::simulation::states::{NVec3, State};
use crate::simulation::system::{check_state_length, ParticleModel};

/// Smallest grid accepted on either axis
pub const MIN_GRID: usize = 8;

const STRUCTURAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
const SHEAR_OFFSETS: [(isize, isize); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];
const FLEXION_OFFSETS: [(isize, isize); 4] = [(2, 0), (0, 2), (-2, 0), (0, -2)];

#[derive(Debug, Clone)]
pub struct ClothParams {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f64, // spacing of the initial flat sheet
    pub mass: f64,
    pub structural: SpringParams,
    pub shear: SpringParams,
    pub flexion: SpringParams,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            cell_size: 0.2,
            mass: 0.1,
            structural: SpringParams::new(50.0, 0.2),
            shear: SpringParams::new(2.0, 0.4),
            flexion: SpringParams::new(2.0, 0.4),
        }
    }
}

impl ClothParams {
    fn validate(&self) -> Result<(), SimError> {
        if self.rows < MIN_GRID || self.cols < MIN_GRID {
            return Err(SimError::InvalidGridDimensions { rows: self.rows, cols: self.cols });
        }
        validate_positive("cell_size", self.cell_size)?;
        for (name, s) in [("structural", &self.structural), ("shear", &self.shear), ("flexion", &self.flexion)] {
            validate_non_negative(name, s.stiffness)?;
            validate_non_negative(name, s.rest_length)?;
        }
        Ok(())
    }
}

pub struct ClothSystem {
    params: ClothParams,
    masses: Vec<f64>,
    forces: ForceSet,
    structural_edges: Vec<(usize, usize)>,
    initial: State,
    state: State,
}

impl ClothSystem {
    pub fn new(params: ClothParams, physics: &Physics) -> Result<Self, SimError> {
        params.validate()?;
        physics.validate()?;

        let masses = vec![params.mass; params.rows * params.cols];
        validate_masses(&masses)?;

        let structural = NeighborSprings::new(params.structural, physics.eps, grid_neighbors(params.rows, params.cols, &STRUCTURAL_OFFSETS));
        let shear = NeighborSprings::new(params.shear, physics.eps, grid_neighbors(params.rows, params.cols, &SHEAR_OFFSETS));
        let flexion = NeighborSprings::new(params.flexion, physics.eps, grid_neighbors(params.rows, params.cols, &FLEXION_OFFSETS));
        let structural_edges = structural.edges();

        // Two top corners hold the sheet
        let forces = ForceSet::new()
            .with(Gravity { g: physics.gravity })
            .with(ViscousDrag { k: physics.viscous_k })
            .with(structural)
            .with(shear)
            .with(flexion)
            .pin(0)
            .pin(params.cols - 1);

        let initial = Self::initial_state(&params);

        ftlog::debug!("cloth: {}x{} grid, {} structural springs", params.rows, params.cols, structural_edges.len());

        Ok(Self {
            params,
            masses,
            forces,
            structural_edges,
            state: initial.clone(),
            initial,
        })
    }

    /// Flat sheet in the z = 0 plane hanging down and to the left of the origin.
    fn initial_state(params: &ClothParams) -> State {
        let mut positions = Vec::with_capacity(params.rows * params.cols);
        for row in 0..params.rows {
            for col in 0..params.cols {
                let x = -(col as f64) * params.cell_size;
                let y = -(row as f64) * params.cell_size;
                positions.push(NVec3::new(x, y, 0.0));
            }
        }
        State::at_rest(&positions)
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.params.cols + col
    }
}

/// Per-particle neighbour lists for a set of grid offsets, dropping any
/// offset that falls off the grid. There is no wraparound.
pub fn grid_neighbors(rows: usize, cols: usize, offsets: &[(isize, isize)]) -> Vec<Vec<usize>> {
    let mut neighbors = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let list = offsets
                .iter()
                .filter_map(|&(dr, dc)| {
                    let r = row.checked_add_signed(dr)?;
                    let c = col.checked_add_signed(dc)?;
                    (r < rows && c < cols).then_some(r * cols + c)
                })
                .collect();
            neighbors.push(list);
        }
    }
    neighbors
}

impl ParticleModel for ClothSystem {
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

    /// Only the structural springs; they outline the cloth's wireframe.
    fn springs(&self) -> Vec<(usize, usize)> {
        self.structural_edges.clone()
    }

    fn reset(&mut self) {
        self.state = self.initial.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_two_structural_neighbors() {
        let n = grid_neighbors(8, 8, &STRUCTURAL_OFFSETS);
        assert_eq!(n[0].len(), 2);
        assert_eq!(n[9].len(), 4);
        // last column does not wrap to the next row
        assert!(!n[7].contains(&8));
    }

    #[test]
    fn shear_and_flexion_respect_borders() {
        let shear = grid_neighbors(8, 8, &SHEAR_OFFSETS);
        assert_eq!(shear[0], vec![9]);
        assert_eq!(shear[9].len(), 4);

        let flexion = grid_neighbors(8, 8, &FLEXION_OFFSETS);
        assert_eq!(flexion[0], vec![16, 2]);
        assert_eq!(flexion[6 * 8 + 6].len(), 2);
        assert_eq!(flexion[3 * 8 + 3].len(), 4);
    }

    #[test]
    fn index_layout() {
        let cloth = ClothSystem::new(ClothParams::default(), &Physics::default()).unwrap();
        assert_eq!(cloth.index_of(1, 2), 12);
        assert_eq!(cloth.fixed_particles(), &[0, 9]);
        let x = cloth.state().position(cloth.index_of(1, 2));
        assert_eq!(x, NVec3::new(-0.4, -0.2, 0.0));
    }

    #[test]
    fn small_grid_rejected() {
        let params = ClothParams { rows: 7, ..ClothParams::default() };
        let r = ClothSystem::new(params, &Physics::default());
        assert!(matches!(r, Err(SimError::InvalidGridDimensions { rows: 7, cols: 10 })));
    }
}
