//! Mass-spring particle simulation: a pendulum chain and a cloth grid,
//! advanced by Forward Euler, trapezoidal, or RK4 fixed-step integrators.

pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::SimError;

pub use simulation::states::{NVec3, State};
pub use simulation::system::ParticleModel;
pub use simulation::forces::{spring_force, ForceSet, ForceTerm, Gravity, NeighborSprings, SpringParams, ViscousDrag};
pub use simulation::pendulum::{PendulumParams, PendulumSystem};
pub use simulation::cloth::{ClothParams, ClothSystem};
pub use simulation::integrator::{ForwardEuler, Integrator, IntegratorKind, Rk4, Trapezoidal};
pub use simulation::params::{Parameters, Physics};
pub use simulation::engine::Engine;
pub use simulation::scenario::{RunSummary, Scenario};

pub use configuration::config::{ClothConfig, EngineConfig, ModelKind, ParametersConfig, PendulumConfig, PhysicsConfig, ScenarioConfig};

pub use visualization::renderer::{CsvRecorder, Frame, NullRenderer, Renderer};
#[cfg(feature = "vis")]
pub use visualization::viewer::run_3d;

pub use benchmark::benchmark::{bench_convergence, bench_integrators};
