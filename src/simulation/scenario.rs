//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`
//! containing:
//! - engine settings (`Engine`)
//! - driver parameters (`Parameters`)
//! - the particle model (pendulum or cloth) at t = 0
//! - the selected integrator
//!
//! The scenario is also the driver loop: it owns simulation time, advances
//! the model with a fixed step, and hands frames to a renderer after making
//! sure no NaN or infinity escapes into them.

use std::time::Instant;

use crate::configuration::config::{ClothConfig, ModelKind, ScenarioConfig};
use crate::error::SimError;
use crate::simulation::cloth::{ClothParams, ClothSystem};
use crate::simulation::engine::Engine;
use crate::simulation::integrator::{Integrator, IntegratorKind};
use crate::simulation::params::{Parameters, Physics};
use crate::simulation::pendulum::{PendulumParams, PendulumSystem};
use crate::simulation::system::ParticleModel;
use crate::visualization::renderer::{Frame, Renderer};

/// What a finished run looked like
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: u64,  // steps taken
    pub t: f64,      // final simulation time
    pub frames: u64, // frames handed to the renderer
}

/// A model, an integrator, and the clock driving them.
///
/// With the `vis` feature this is inserted into Bevy as a `Resource` and
/// stepped by the viewer's update system.
#[cfg_attr(feature = "vis", derive(bevy::prelude::Resource))]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    model: Box<dyn ParticleModel + Send + Sync>,
    integrator: Box<dyn Integrator + Send + Sync>,
    t: f64,
    steps: u64,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimError> {
        // Engine (runtime) from EngineConfig
        let engine = Engine::from(&cfg.engine);

        // Parameters (runtime) from ParametersConfig
        let parameters = Parameters::from(&cfg.parameters);

        // Physics shared by both models
        let physics = Physics::from(&cfg.physics);

        // Model: a missing section falls back to the defaults
        let model: Box<dyn ParticleModel + Send + Sync> = match engine.model {
            ModelKind::Pendulum => {
                let p_cfg = cfg.pendulum.unwrap_or_default();
                Box::new(PendulumSystem::new(PendulumParams::from(&p_cfg), &physics, parameters.seed)?)
            }
            ModelKind::Cloth => {
                let c_cfg: ClothConfig = cfg.cloth.unwrap_or_default();
                Box::new(ClothSystem::new(ClothParams::from(&c_cfg), &physics)?)
            }
        };

        Self::from_parts(engine, parameters, model)
    }

    /// Assemble a scenario around an already built model
    pub fn from_parts(engine: Engine, parameters: Parameters, model: Box<dyn ParticleModel + Send + Sync>) -> Result<Self, SimError> {
        parameters.validate()?;
        let integrator = engine.integrator.build();

        ftlog::info!(
            "scenario: {:?} with {} particles, integrator = {}, h = {}, t_end = {}",
            engine.model,
            model.particle_count(),
            integrator.name(),
            parameters.h0,
            parameters.t_end
        );

        Ok(Self {
            engine,
            parameters,
            model,
            integrator,
            t: 0.0,
            steps: 0,
        })
    }

    pub fn model(&self) -> &dyn ParticleModel {
        self.model.as_ref()
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Swap the integrator mid-run; the model state is kept
    pub fn set_integrator(&mut self, kind: IntegratorKind) {
        self.engine.integrator = kind;
        self.integrator = kind.build();
        ftlog::info!("integrator switched to {}", self.integrator.name());
    }

    /// Back to the initial configuration at t = 0
    pub fn reset(&mut self) {
        self.model.reset();
        self.t = 0.0;
        self.steps = 0;
        ftlog::info!("scenario reset");
    }

    /// Advance one fixed step of `parameters.h0`.
    ///
    /// A step that produces NaN or infinity is rolled back: the model keeps
    /// its last finite state and the clock does not move.
    pub fn step(&mut self) -> Result<(), SimError> {
        let h = self.parameters.h0;
        let previous = self.model.state().clone();
        self.integrator.step(self.model.as_mut(), h)?;

        // Stop before a blown-up state reaches the renderer
        if let Some(index) = self.model.state().first_non_finite() {
            let step = self.steps + 1;
            ftlog::error!(
                "non-finite state at step {step} (t = {}), element {index}; reduce h or pick a more stable integrator",
                self.t + h
            );
            self.model.set_state(previous)?;
            return Err(SimError::NonFiniteState { step, index });
        }

        self.steps += 1;
        self.t += h;
        Ok(())
    }

    /// Hand the current state to `renderer`. Refuses states holding NaN or infinity.
    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<(), SimError> {
        if let Some(index) = self.model.state().first_non_finite() {
            return Err(SimError::NonFiniteState { step: self.steps, index });
        }
        let positions = self.model.positions();
        let springs = self.model.springs();
        renderer.render(&Frame {
            step: self.steps,
            t: self.t,
            positions: &positions,
            springs: &springs,
        })
    }

    /// Step until `t_end`, rendering the initial state and every
    /// `render_every`-th state after it
    pub fn run(&mut self, renderer: &mut dyn Renderer) -> Result<RunSummary, SimError> {
        let total = self.parameters.step_count();
        let every = self.engine.render_every.max(1);
        let start = Instant::now();

        self.render(renderer)?;
        let mut frames = 1;

        while self.steps < total {
            self.step()?;
            if self.steps % every == 0 {
                self.render(renderer)?;
                frames += 1;
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        ftlog::info!(
            "run finished: {} steps to t = {:.4} in {:.3} s ({} derivative evaluations per step), {frames} frames",
            self.steps,
            self.t,
            elapsed,
            self.integrator.derivative_evals()
        );

        Ok(RunSummary { steps: self.steps, t: self.t, frames })
    }
}
