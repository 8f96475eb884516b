//! Fixed-step explicit time integrators
//!
//! Provides Forward Euler, trapezoidal (Heun) and classical RK4 steppers, all
//! driven through [`ParticleModel::eval_derivative`]. Every stage builds a
//! fresh [`State`]; the model's state is replaced once, at the end of the step.

use serde::Deserialize;

use crate::error::SimError;
use crate::simulation::states::State;
use crate::simulation::system::ParticleModel;

/// Derivative function of a state, usually a model's `eval_derivative`
pub type Derivative<'a> = dyn Fn(&State) -> State + 'a;

/// A single-step advance rule. Implementations keep no state between calls.
pub trait Integrator {
    /// One step of size `h` from `state`, returned as a new state.
    fn advance(&self, state: &State, h: f64, f: &Derivative<'_>) -> State;

    /// Advance `model` by `h` seconds.
    fn step(&self, model: &mut dyn ParticleModel, h: f64) -> Result<(), SimError> {
        check_step(h)?;
        let state = model.state().clone();
        let next = self.advance(&state, h, &|s: &State| model.eval_derivative(s));
        model.set_state(next)
    }

    /// Derivative evaluations per step
    fn derivative_evals(&self) -> usize;

    /// Global order of accuracy
    fn order(&self) -> u32;

    fn name(&self) -> &'static str;
}

fn check_step(h: f64) -> Result<(), SimError> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidStepSize(h))
    }
}

/// x_n+1 = x_n + h f(x_n)
///
/// One evaluation per step. The cheapest and least stable choice: stiff
/// springs need a very small `h`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn advance(&self, state: &State, h: f64, f: &Derivative<'_>) -> State {
        state.added_scaled(h, &f(state))
    }

    fn derivative_evals(&self) -> usize {
        1
    }

    fn order(&self) -> u32 {
        1
    }

    fn name(&self) -> &'static str {
        "euler"
    }
}

/// Trapezoidal rule with an Euler predictor (Heun's method)
///
/// f0 = f(x_n), x~ = x_n + h f0, f1 = f(x~), x_n+1 = x_n + h/2 (f0 + f1)
#[derive(Debug, Clone, Copy, Default)]
pub struct Trapezoidal;

impl Integrator for Trapezoidal {
    fn advance(&self, state: &State, h: f64, f: &Derivative<'_>) -> State {
        // Predictor: a full Euler step
        let f0 = f(state);
        let trial = state.added_scaled(h, &f0);

        // Corrector: average the slopes at both ends
        let f1 = f(&trial);
        state.added_scaled(0.5 * h, &f0).added_scaled(0.5 * h, &f1)
    }

    fn derivative_evals(&self) -> usize {
        2
    }

    fn order(&self) -> u32 {
        2
    }

    fn name(&self) -> &'static str {
        "trapezoidal"
    }
}

/// Classical fourth-order Runge-Kutta
///
/// k1 = h f(x_n)
/// k2 = h f(x_n + k1/2)
/// k3 = h f(x_n + k2/2)
/// k4 = h f(x_n + k3)
/// x_n+1 = x_n + (k1 + 2 k2 + 2 k3 + k4) / 6
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4;

impl Integrator for Rk4 {
    fn advance(&self, state: &State, h: f64, f: &Derivative<'_>) -> State {
        let k1 = f(state).scaled(h);
        let k2 = f(&state.added_scaled(0.5, &k1)).scaled(h);
        let k3 = f(&state.added_scaled(0.5, &k2)).scaled(h);
        let k4 = f(&state.added_scaled(1.0, &k3)).scaled(h);

        let sixth = 1.0 / 6.0;
        state
            .added_scaled(sixth, &k1)
            .added_scaled(2.0 * sixth, &k2)
            .added_scaled(2.0 * sixth, &k3)
            .added_scaled(sixth, &k4)
    }

    fn derivative_evals(&self) -> usize {
        4
    }

    fn order(&self) -> u32 {
        4
    }

    fn name(&self) -> &'static str {
        "rk4"
    }
}

/// Which integrator the driver uses
/// `integrator: "euler"`, `"trapezoidal"` or `"rk4"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorKind {
    #[serde(rename = "euler")] // Forward Euler, one evaluation, first order
    Euler,

    #[serde(rename = "trapezoidal")] // Heun's method, two evaluations, second order
    Trapezoidal,

    #[serde(rename = "rk4")] // Classical Runge-Kutta, four evaluations, fourth order
    #[default]
    Rk4,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 3] = [IntegratorKind::Euler, IntegratorKind::Trapezoidal, IntegratorKind::Rk4];

    pub fn build(self) -> Box<dyn Integrator + Send + Sync> {
        match self {
            IntegratorKind::Euler => Box::new(ForwardEuler),
            IntegratorKind::Trapezoidal => Box::new(Trapezoidal),
            IntegratorKind::Rk4 => Box::new(Rk4),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::simulation::states::NVec3;

    #[test]
    fn evaluation_counts_match() {
        let s = State::at_rest(&[NVec3::new(1.0, 0.0, 0.0)]);
        for kind in IntegratorKind::ALL {
            let calls = Cell::new(0);
            let f = |x: &State| {
                calls.set(calls.get() + 1);
                x.scaled(0.0)
            };
            let integrator = kind.build();
            integrator.advance(&s, 0.1, &f);
            assert_eq!(calls.get(), integrator.derivative_evals(), "{}", integrator.name());
        }
    }

    #[test]
    fn bad_step_sizes() {
        assert_eq!(check_step(0.0), Err(SimError::InvalidStepSize(0.0)));
        assert!(check_step(-0.1).is_err());
        assert!(check_step(f64::NAN).is_err());
        assert!(check_step(1e-3).is_ok());
    }
}
