//! Geteilte Konfiguration zwischen Solver, Renderer und Binary.

pub mod options;
mod render_state;

pub use options::SplineOptions;
pub use options::{ARC_LENGTH_ERROR_BOUND, GPU_DISPATCH_TIMEOUT_MS, SMOOTH_FACTOR};
pub use render_state::RenderState;
