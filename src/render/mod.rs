//! Darstellung einer Kurve: Kontrollpunkte lösen, Pfad bauen, zeichnen, messen.

mod callback;

pub use callback::{CurveCanvas, SvgCanvas};

use crate::core::{
    build_render_path, estimate_length, estimate_path_length, ComputeBackend, ControlPointSet,
    ControlPointSolver, RenderPath, SplineError,
};
use crate::gpu::ComputeRuntime;
use crate::shared::{RenderState, SplineOptions};
use glam::DVec2;

/// Abstand des Mess-Labels links vom ersten Stützpunkt.
pub const LABEL_OFFSET: f64 = 5.0;

/// Ergebnis eines Render-Aufrufs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCurve {
    pub control_points: ControlPointSet,
    pub path: RenderPath,
    /// Gemessene Länge, falls ein Label gezeichnet wurde
    pub length: Option<f64>,
    /// Text des Labels
    pub label: Option<String>,
}

/// Zeichnet interpolierende Kurven auf einen [`CurveCanvas`].
pub struct SplineRenderer<'a> {
    solver: ControlPointSolver<'a>,
    backend: ComputeBackend,
    smooth_factor: f64,
    error_bound: f64,
    measure_whole_curve: bool,
}

impl<'a> SplineRenderer<'a> {
    /// Erstellt den Renderer aus den Engine-Optionen.
    pub fn new(runtime: &'a ComputeRuntime, options: &SplineOptions) -> Self {
        Self {
            solver: ControlPointSolver::new(runtime)
                .with_dispatch_timeout(options.dispatch_timeout()),
            backend: ComputeBackend::from_flag(options.use_gpu_acceleration),
            smooth_factor: options.smooth_factor,
            error_bound: options.arc_length_error_bound,
            measure_whole_curve: options.measure_whole_curve,
        }
    }

    /// Rendert eine Kurve durch `points`.
    pub fn render(
        &self,
        points: &[DVec2],
        state: &RenderState,
        canvas: &mut dyn CurveCanvas,
    ) -> Result<RenderedCurve, SplineError> {
        let control_points = self
            .solver
            .solve(points, self.smooth_factor, self.backend)?;
        let path = build_render_path(points, &control_points);
        canvas.draw_path(&path);

        let mut length = None;
        let mut label = None;
        if state.measurements_enabled {
            if let Some(value) = self.measure(points, &path) {
                let text = state.format_measurement(value);
                let anchor = points[0] - DVec2::new(LABEL_OFFSET, 0.0);
                canvas.draw_label(&text, anchor);
                log::debug!("Kurvenlänge {} ({} Punkte)", text, points.len());
                length = Some(value);
                label = Some(text);
            }
        }

        Ok(RenderedCurve {
            control_points,
            path,
            length,
            label,
        })
    }

    /// Länge für das Label; `None` heißt: kein Label.
    fn measure(&self, points: &[DVec2], path: &RenderPath) -> Option<f64> {
        if self.measure_whole_curve {
            if points.is_empty() {
                return None;
            }
            return Some(estimate_path_length(path, self.error_bound));
        }

        // Alt-Verhalten: die ersten vier Stützpunkte als ein kubisches Stück
        match points {
            [_, _, _] => Some(0.0),
            [p0, p1, p2, p3, ..] => {
                Some(estimate_length(&[*p0, *p1, *p2, *p3], self.error_bound))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct RecordingCanvas {
        paths: Vec<RenderPath>,
        labels: Vec<(String, DVec2)>,
    }

    impl CurveCanvas for RecordingCanvas {
        fn draw_path(&mut self, path: &RenderPath) {
            self.paths.push(path.clone());
        }

        fn draw_label(&mut self, text: &str, anchor: DVec2) {
            self.labels.push((text.to_string(), anchor));
        }
    }

    fn measuring_state() -> RenderState {
        RenderState {
            measurements_enabled: true,
            ..RenderState::default()
        }
    }

    #[test]
    fn test_render_without_measurement() {
        let runtime = ComputeRuntime::disabled();
        let renderer = SplineRenderer::new(&runtime, &SplineOptions::default());
        let mut canvas = RecordingCanvas::default();
        let points = [DVec2::ZERO, DVec2::new(10.0, 0.0), DVec2::new(20.0, 5.0)];

        let curve = renderer
            .render(&points, &RenderState::default(), &mut canvas)
            .expect("Rendern muss klappen");

        assert_eq!(canvas.paths.len(), 1);
        assert!(canvas.labels.is_empty());
        assert_eq!(curve.path.len(), 3);
        assert_eq!(curve.length, None);
    }

    #[test]
    fn test_label_anchor_left_of_first_point() {
        let runtime = ComputeRuntime::disabled();
        let renderer = SplineRenderer::new(&runtime, &SplineOptions::default());
        let mut canvas = RecordingCanvas::default();
        let points = [DVec2::new(3.0, 4.0), DVec2::new(6.0, 8.0)];

        let curve = renderer
            .render(&points, &measuring_state(), &mut canvas)
            .expect("Rendern muss klappen");

        assert_eq!(
            canvas.labels,
            vec![("5.00 mm".to_string(), DVec2::new(-2.0, 4.0))]
        );
        assert_relative_eq!(curve.length.unwrap_or_default(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_legacy_measurement() {
        let runtime = ComputeRuntime::disabled();
        let options = SplineOptions {
            measure_whole_curve: false,
            ..SplineOptions::default()
        };
        let renderer = SplineRenderer::new(&runtime, &options);

        let two = [DVec2::ZERO, DVec2::new(1.0, 0.0)];
        let mut canvas = RecordingCanvas::default();
        let curve = renderer
            .render(&two, &measuring_state(), &mut canvas)
            .expect("Rendern muss klappen");
        assert!(canvas.labels.is_empty(), "unter 3 Punkten kein Label");
        assert_eq!(curve.label, None);

        let three = [DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(2.0, 1.0)];
        let curve = renderer
            .render(&three, &measuring_state(), &mut canvas)
            .expect("Rendern muss klappen");
        assert_eq!(curve.label.as_deref(), Some("0.00 mm"));

        let arch = [
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(20.0, 0.0),
        ];
        let curve = renderer
            .render(&arch, &measuring_state(), &mut canvas)
            .expect("Rendern muss klappen");
        assert_relative_eq!(curve.length.unwrap_or_default(), 20.0, max_relative = 0.01);
    }

    #[test]
    fn test_empty_input_draws_empty_path() {
        let runtime = ComputeRuntime::disabled();
        let renderer = SplineRenderer::new(&runtime, &SplineOptions::default());
        let mut canvas = RecordingCanvas::default();

        let curve = renderer
            .render(&[], &measuring_state(), &mut canvas)
            .expect("Rendern muss klappen");
        assert!(curve.path.is_empty());
        assert!(canvas.labels.is_empty());
    }
}
