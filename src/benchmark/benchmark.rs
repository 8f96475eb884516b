use std::time::Instant;

use crate::simulation::cloth::{ClothParams, ClothSystem};
use crate::simulation::integrator::{Integrator, IntegratorKind};
use crate::simulation::params::Physics;
use crate::simulation::states::{NVec3, State};
use crate::simulation::system::ParticleModel;

/// Derivative of a unit harmonic oscillator along x (k = m = 1, no pinning).
/// Exact solution from (1, 0): x = cos t, v = -sin t.
pub fn oscillator_derivative(state: &State) -> State {
    let accels: Vec<NVec3> = state.positions().iter().map(|x| -x).collect();
    State::from_pairs(&state.velocities(), &accels)
}

/// Exact oscillator state at time `t`, starting from x = 1 at rest
pub fn oscillator_exact(t: f64) -> State {
    State::from_pairs(&[NVec3::new(t.cos(), 0.0, 0.0)], &[NVec3::new(-t.sin(), 0.0, 0.0)])
}

/// Error of a single step of size `h` from the oscillator's initial state
pub fn local_error(kind: IntegratorKind, h: f64) -> f64 {
    let start = oscillator_exact(0.0);
    let next = kind.build().advance(&start, h, &oscillator_derivative);
    next.max_distance(&oscillator_exact(h))
}

/// Empirical order from halving: log2(e(h) / e(h/2)) - 1
pub fn observed_order(kind: IntegratorKind, h: f64) -> f64 {
    (local_error(kind, h) / local_error(kind, 0.5 * h)).log2() - 1.0
}

/// Print the local error of each integrator for a sequence of halved steps
/// Paste output directly into excel to graph
pub fn bench_convergence() {
    println!("integrator,h,local_error");
    for kind in IntegratorKind::ALL {
        let mut h = 0.2;
        for _ in 0..6 {
            println!("{:?},{:.6},{:.6e}", kind, h, local_error(kind, h));
            h *= 0.5;
        }
        ftlog::info!("{:?}: observed order {:.2}", kind, observed_order(kind, 0.1));
    }
}

/// Time one step of each integrator on cloth grids of growing size
pub fn bench_integrators() {
    let sizes = [8, 16, 32, 64];
    let steps = 20;
    let h = 0.001;

    println!("grid,integrator,ms_per_step");
    for n in sizes {
        for kind in IntegratorKind::ALL {
            let params = ClothParams { rows: n, cols: n, ..ClothParams::default() };
            let mut cloth = match ClothSystem::new(params, &Physics::default()) {
                Ok(c) => c,
                Err(e) => {
                    ftlog::error!("bench_integrators: {e}");
                    return;
                }
            };
            let integrator = kind.build();

            // Warm up
            if let Err(e) = integrator.step(&mut cloth, h) {
                ftlog::error!("bench_integrators: {e}");
                return;
            }

            let t0 = Instant::now();
            for _ in 0..steps {
                if let Err(e) = integrator.step(&mut cloth, h) {
                    ftlog::error!("bench_integrators: {e}");
                    return;
                }
            }
            let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

            println!("{}x{},{},{:.6}", n, n, integrator.name(), ms);
            ftlog::debug!("{}x{} {}: {} particles, {:.6} ms/step", n, n, integrator.name(), cloth.particle_count(), ms);
        }
    }
}
