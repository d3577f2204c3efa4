//! Zusammenbau der Render-Kurve aus Stützpunkten und Kontrollpunkten.
//!
//! Aufbau für n ≥ 3 Punkte:
//! - `MoveTo(p0)`
//! - `QuadTo(cp[0], p1)` als Einlauf
//! - `CubicTo(cp[2i-3], cp[2i-2], p[i])` für jeden inneren Übergang
//! - `QuadTo(cp[last], p[n-1])` als Auslauf

use super::control_points::ControlPointSet;
use glam::DVec2;
use std::fmt::Write as _;

/// Ein Zeichenbefehl der Render-Kurve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Stift absetzen
    MoveTo(DVec2),
    /// Gerade Linie zum Ziel
    LineTo(DVec2),
    /// Quadratische Bézier-Kurve
    QuadTo { control: DVec2, to: DVec2 },
    /// Kubische Bézier-Kurve
    CubicTo {
        control1: DVec2,
        control2: DVec2,
        to: DVec2,
    },
}

impl PathSegment {
    /// Endpunkt des Befehls.
    pub fn end_point(&self) -> DVec2 {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::QuadTo { to, .. } | PathSegment::CubicTo { to, .. } => to,
        }
    }
}

/// Geordnete Liste von Zeichenbefehlen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPath {
    segments: Vec<PathSegment>,
}

impl RenderPath {
    /// Leerer Pfad.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt einen Befehl an.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Alle Befehle in Zeichenreihenfolge.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Jedes zeichnende Segment als kubische Kurve.
    ///
    /// Linien werden mit Kontrollpunkten auf 1/3 und 2/3 abgebildet,
    /// Quadratics exakt graderhöht.
    pub fn cubic_pieces(&self) -> Vec<[DVec2; 4]> {
        let mut pieces = Vec::with_capacity(self.segments.len());
        let mut cursor = DVec2::ZERO;
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    cursor = p;
                    continue;
                }
                PathSegment::LineTo(to) => pieces.push(line_to_cubic(cursor, to)),
                PathSegment::QuadTo { control, to } => {
                    pieces.push(quad_to_cubic(cursor, control, to))
                }
                PathSegment::CubicTo {
                    control1,
                    control2,
                    to,
                } => pieces.push([cursor, control1, control2, to]),
            }
            cursor = segment.end_point();
        }
        pieces
    }

    /// SVG-Pfaddaten (`M`, `L`, `Q`, `C`).
    pub fn to_svg_data(&self) -> String {
        let mut data = String::new();
        for segment in &self.segments {
            if !data.is_empty() {
                data.push(' ');
            }
            // Schreiben in einen String schlägt nicht fehl
            let _ = match *segment {
                PathSegment::MoveTo(p) => write!(data, "M {} {}", p.x, p.y),
                PathSegment::LineTo(p) => write!(data, "L {} {}", p.x, p.y),
                PathSegment::QuadTo { control, to } => {
                    write!(data, "Q {} {} {} {}", control.x, control.y, to.x, to.y)
                }
                PathSegment::CubicTo {
                    control1,
                    control2,
                    to,
                } => write!(
                    data,
                    "C {} {} {} {} {} {}",
                    control1.x, control1.y, control2.x, control2.y, to.x, to.y
                ),
            };
        }
        data
    }
}

/// Gerade als kubische Kurve.
pub fn line_to_cubic(from: DVec2, to: DVec2) -> [DVec2; 4] {
    [from, from.lerp(to, 1.0 / 3.0), from.lerp(to, 2.0 / 3.0), to]
}

/// Exakte Graderhöhung einer quadratischen Kurve.
pub fn quad_to_cubic(from: DVec2, control: DVec2, to: DVec2) -> [DVec2; 4] {
    [
        from,
        from + (control - from) * (2.0 / 3.0),
        to + (control - to) * (2.0 / 3.0),
        to,
    ]
}

/// Baut die Render-Kurve aus Stützpunkten und passenden Kontrollpunkten.
///
/// Passt `control_points` nicht zur Punktanzahl, wird ein Polygonzug
/// durch die Stützpunkte erzeugt.
pub fn build_render_path(points: &[DVec2], control_points: &ControlPointSet) -> RenderPath {
    let mut path = RenderPath::new();
    let Some((&first, rest)) = points.split_first() else {
        return path;
    };
    path.push(PathSegment::MoveTo(first));

    let n = points.len();
    if n == 2 {
        path.push(PathSegment::LineTo(points[1]));
        return path;
    }
    if n < 3 {
        return path;
    }

    let cp = control_points.as_slice();
    if cp.len() != ControlPointSet::expected_len(n) {
        log::warn!(
            "Kontrollpunkte passen nicht: {} statt {} für {} Punkte, zeichne Polygonzug",
            cp.len(),
            ControlPointSet::expected_len(n),
            n
        );
        for &p in rest {
            path.push(PathSegment::LineTo(p));
        }
        return path;
    }

    path.push(PathSegment::QuadTo {
        control: cp[0],
        to: points[1],
    });
    for i in 2..n - 1 {
        path.push(PathSegment::CubicTo {
            control1: cp[2 * i - 3],
            control2: cp[2 * i - 2],
            to: points[i],
        });
    }
    path.push(PathSegment::QuadTo {
        control: cp[cp.len() - 1],
        to: points[n - 1],
    });
    path
}
