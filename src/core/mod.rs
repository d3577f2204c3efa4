//! Core-Geometrie: Vektor-Helfer, Kontrollpunkt-Solver, Bogenlänge, Render-Pfad.

pub mod arc_length;
pub mod control_points;
mod error;
pub mod path;
pub mod vector;

pub use arc_length::{estimate_length, estimate_path_length, split_cubic, MAX_SUBDIVISION_DEPTH};
pub use control_points::{
    ComputeBackend, ControlPointSet, ControlPointSolver, ControlPointStrategy, ParallelStrategy,
    SequentialStrategy,
};
pub use error::SplineError;
pub use path::{build_render_path, PathSegment, RenderPath};
