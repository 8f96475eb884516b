pub mod states;
pub mod system;
pub mod params;
pub mod engine;
pub mod forces;
pub mod pendulum;
pub mod cloth;
pub mod integrator;
pub mod scenario;
