//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – which model and which integrator to run
//! - [`ParametersConfig`] – step size, end time, and random seed
//! - [`PhysicsConfig`]    – gravity, viscous drag, spring epsilon
//! - [`PendulumConfig`]   – chain layout and spring constants (optional)
//! - [`ClothConfig`]      – grid layout and the three spring families (optional)
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every section except `engine` and `parameters` may be omitted, in which
//! case the defaults below are used.
//!
//! # YAML format
//! An example cloth scenario matching these types:
//!
//! ```yaml
//! engine:
//!   model: "cloth"          # or "pendulum"
//!   integrator: "rk4"       # "euler", "trapezoidal" or "rk4"
//!   render_every: 10        # hand every 10th state to the renderer
//!
//! parameters:
//!   t_end: 5.0              # total simulation time
//!   h0: 0.005               # fixed step size
//!   seed: 42                # seed for randomized initial positions
//!
//! physics:
//!   gravity: [0.0, -9.81, 0.0]
//!   viscous_k: 0.1
//!   eps: 1.0e-6
//!
//! cloth:
//!   rows: 10
//!   cols: 10
//!   cell_size: 0.2
//!   mass: 0.1
//!   structural: { stiffness: 50.0, rest_length: 0.2 }
//!   shear:      { stiffness: 2.0,  rest_length: 0.4 }
//!   flexion:    { stiffness: 2.0,  rest_length: 0.4 }
//! ```
//!
//! The scenario builder maps this configuration into the runtime parameter
//! structs consumed by the models.

use serde::Deserialize;

use crate::simulation::cloth::ClothParams;
use crate::simulation::forces::SpringParams;
use crate::simulation::integrator::IntegratorKind;
use crate::simulation::params::{Parameters, Physics};
use crate::simulation::pendulum::PendulumParams;
use crate::simulation::states::NVec3;

/// Which particle model the engine runs
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    #[serde(rename = "pendulum")] // chain of springs hanging from one pinned particle
    Pendulum,

    #[serde(rename = "cloth")] // grid of springs hanging from two pinned corners
    Cloth,
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub model: ModelKind,           // particle model to build
    #[serde(default)]
    pub integrator: IntegratorKind, // time integrator, rk4 when omitted
    #[serde(default = "default_render_every")]
    pub render_every: u64,          // steps between frames handed to the renderer
}

fn default_render_every() -> u64 {
    1
}

/// Driver parameters
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // time end
    pub h0: f64,    // time step size
    #[serde(default)]
    pub seed: u64,  // deterministic seed to make runs reproducible
}

impl From<&ParametersConfig> for Parameters {
    fn from(cfg: &ParametersConfig) -> Self {
        Parameters {
            t_end: cfg.t_end,
            h0: cfg.h0,
            seed: cfg.seed,
        }
    }
}

/// Environment shared by every model
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: [f64; 3], // gravitational acceleration
    pub viscous_k: f64,    // drag coefficient
    pub eps: f64,          // guards spring normalisation when particles coincide
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            viscous_k: 0.1,
            eps: 1e-6,
        }
    }
}

impl From<&PhysicsConfig> for Physics {
    fn from(cfg: &PhysicsConfig) -> Self {
        Physics {
            gravity: NVec3::from(cfg.gravity),
            viscous_k: cfg.viscous_k,
            eps: cfg.eps,
        }
    }
}

/// Chain layout for the pendulum model
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PendulumConfig {
    pub particles: usize,     // number of particles including the pinned root
    pub mass: f64,            // mass of every particle
    pub spring: SpringParams, // spring between consecutive particles
    pub anchor: [f64; 3],     // root position
    pub gap: [f64; 2],        // vertical spacing range [min, max]
    pub jitter: f64,          // horizontal offset range [-jitter, jitter]
}

impl Default for PendulumConfig {
    fn default() -> Self {
        let p = PendulumParams::default();
        Self {
            particles: p.particles,
            mass: p.mass,
            spring: p.spring,
            anchor: [p.anchor.x, p.anchor.y, p.anchor.z],
            gap: [p.gap_min, p.gap_max],
            jitter: p.jitter,
        }
    }
}

impl From<&PendulumConfig> for PendulumParams {
    fn from(cfg: &PendulumConfig) -> Self {
        PendulumParams {
            particles: cfg.particles,
            mass: cfg.mass,
            spring: cfg.spring,
            anchor: NVec3::from(cfg.anchor),
            gap_min: cfg.gap[0],
            gap_max: cfg.gap[1],
            jitter: cfg.jitter,
        }
    }
}

/// Grid layout for the cloth model
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ClothConfig {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f64,           // spacing of the initial sheet
    pub mass: f64,                // mass of every particle
    pub structural: SpringParams, // up/down/left/right neighbours
    pub shear: SpringParams,      // diagonal neighbours
    pub flexion: SpringParams,    // neighbours two cells away
}

impl Default for ClothConfig {
    fn default() -> Self {
        let p = ClothParams::default();
        Self {
            rows: p.rows,
            cols: p.cols,
            cell_size: p.cell_size,
            mass: p.mass,
            structural: p.structural,
            shear: p.shear,
            flexion: p.flexion,
        }
    }
}

impl From<&ClothConfig> for ClothParams {
    fn from(cfg: &ClothConfig) -> Self {
        ClothParams {
            rows: cfg.rows,
            cols: cfg.cols,
            cell_size: cfg.cell_size,
            mass: cfg.mass,
            structural: cfg.structural,
            shear: cfg.shear,
            flexion: cfg.flexion,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,         // model and integrator selection
    pub parameters: ParametersConfig, // step size and run length
    #[serde(default)]
    pub physics: PhysicsConfig,       // environment
    pub pendulum: Option<PendulumConfig>,
    pub cloth: Option<ClothConfig>,
}

impl ScenarioConfig {
    /// Parse a scenario from YAML text
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_pendulum_uses_defaults() {
        let yaml = "engine:\n  model: pendulum\nparameters:\n  t_end: 1.0\n  h0: 0.01\n";
        let cfg = ScenarioConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.engine.model, ModelKind::Pendulum);
        assert_eq!(cfg.engine.integrator, IntegratorKind::Rk4);
        assert_eq!(cfg.engine.render_every, 1);
        assert_eq!(cfg.physics.gravity, [0.0, -9.81, 0.0]);
        assert!(cfg.pendulum.is_none());
    }

    #[test]
    fn partial_cloth_section() {
        let yaml = r#"
engine:
  model: cloth
  integrator: trapezoidal
parameters:
  t_end: 2.0
  h0: 0.001
  seed: 3
cloth:
  rows: 12
  shear: { stiffness: 5.0, rest_length: 0.3 }
"#;
        let cfg = ScenarioConfig::from_yaml(yaml).unwrap();
        let cloth = ClothParams::from(cfg.cloth.as_ref().unwrap());
        assert_eq!(cloth.rows, 12);
        assert_eq!(cloth.cols, 10);
        assert_eq!(cloth.shear, SpringParams::new(5.0, 0.3));
        assert_eq!(cloth.structural, SpringParams::new(50.0, 0.2));
        assert_eq!(cfg.engine.integrator, IntegratorKind::Trapezoidal);
    }

    #[test]
    fn unknown_integrator_is_an_error() {
        let yaml = "engine:\n  model: cloth\n  integrator: verlet\nparameters:\n  t_end: 1.0\n  h0: 0.01\n";
        assert!(ScenarioConfig::from_yaml(yaml).is_err());
    }
}
