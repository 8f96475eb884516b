//! High-level runtime engine settings
//!
//! Selects the model and integrator, and how often states are rendered,
//! when building and running a `Scenario`

use crate::configuration::config::{EngineConfig, ModelKind};
use crate::simulation::integrator::IntegratorKind;

#[derive(Debug, Clone)]
pub struct Engine {
    pub model: ModelKind,           // pendulum or cloth
    pub integrator: IntegratorKind, // euler, trapezoidal or rk4
    pub render_every: u64,          // steps between rendered frames, at least 1
}

impl From<&EngineConfig> for Engine {
    fn from(cfg: &EngineConfig) -> Self {
        Engine {
            model: cfg.model,
            integrator: cfg.integrator,
            render_every: cfg.render_every.max(1),
        }
    }
}
