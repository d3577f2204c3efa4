//! Bézier-Spline-Engine.
//!
//! Interpolierende Kurven durch geordnete 2D-Stützpunkte: Kontrollpunkte
//! sequentiell oder per wgpu-Compute-Kernel, Pfad-Zusammenbau für einen
//! Zeichen-Callback und adaptive Bogenlängen-Schätzung.

pub mod core;
pub mod gpu;
pub mod render;
pub mod shared;

pub use core::{
    build_render_path, estimate_length, estimate_path_length, ComputeBackend, ControlPointSet,
    ControlPointSolver, ControlPointStrategy, ParallelStrategy, PathSegment, RenderPath,
    SequentialStrategy, SplineError,
};
pub use gpu::{ComputeContext, ComputeRuntime, GpuError, RuntimeStatus};
pub use render::{CurveCanvas, RenderedCurve, SplineRenderer, SvgCanvas};
pub use shared::{RenderState, SplineOptions};

use glam::DVec2;

/// Berechnet die Kontrollpunkte auf der prozessweiten Compute-Laufzeit.
///
/// `use_parallel` wählt den GPU-Kernel; ohne Gerät oder bei einem
/// Geräte-Fehler wird sequentiell gerechnet.
pub fn compute_control_points(
    points: &[DVec2],
    smooth_factor: f64,
    use_parallel: bool,
) -> Result<ControlPointSet, SplineError> {
    ControlPointSolver::new(ComputeRuntime::global()).solve(
        points,
        smooth_factor,
        ComputeBackend::from_flag(use_parallel),
    )
}
