pub mod renderer;
#[cfg(feature = "vis")]
pub mod viewer;
