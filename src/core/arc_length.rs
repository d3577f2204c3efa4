//! Bogenlängen-Schätzung kubischer Bézier-Kurven.
//!
//! Adaptive Unterteilung nach de Casteljau: Liegt die Länge des
//! Kontrollpolygons höchstens `error_bound` über der Sehne, zählt das
//! Polygon als Länge. Sonst wird bei t = 0.5 geteilt und beide Hälften
//! werden einzeln geschätzt.

use super::path::{quad_to_cubic, PathSegment, RenderPath};
use super::vector::{distance, midpoint, polygon_length};
use glam::DVec2;

/// Maximale Unterteilungstiefe; tiefer liegende Stücke zählen mit ihrem Polygon.
pub const MAX_SUBDIVISION_DEPTH: u32 = 20;

/// Teilt eine kubische Kurve bei t = 0.5.
pub fn split_cubic(curve: &[DVec2; 4]) -> ([DVec2; 4], [DVec2; 4]) {
    let [p0, p1, p2, p3] = *curve;
    let p01 = midpoint(p0, p1);
    let p12 = midpoint(p1, p2);
    let p23 = midpoint(p2, p3);
    let p012 = midpoint(p01, p12);
    let p123 = midpoint(p12, p23);
    let mid = midpoint(p012, p123);
    ([p0, p01, p012, mid], [mid, p123, p23, p3])
}

/// Schätzt die Länge einer kubischen Kurve.
///
/// Ergebnis liegt immer zwischen Sehne und Polygonlänge und nähert sich
/// der wahren Länge von oben. Nicht-endliche Eingaben liefern ein
/// nicht-endliches Ergebnis statt einer Endlosschleife.
pub fn estimate_length(curve: &[DVec2; 4], error_bound: f64) -> f64 {
    let error_bound = error_bound.max(0.0);
    let mut total = 0.0;
    let mut stack = vec![(*curve, 0u32)];

    while let Some((piece, depth)) = stack.pop() {
        let polygon = polygon_length(&piece);
        let chord = distance(piece[0], piece[3]);

        // NaN vergleicht nie größer → Stück wird sofort übernommen
        if depth < MAX_SUBDIVISION_DEPTH && polygon - chord > error_bound {
            let (left, right) = split_cubic(&piece);
            stack.push((right, depth + 1));
            stack.push((left, depth + 1));
        } else {
            total += polygon;
        }
    }

    total
}

/// Summiert die Länge aller zeichnenden Segmente eines Pfads.
pub fn estimate_path_length(path: &RenderPath, error_bound: f64) -> f64 {
    let mut cursor = DVec2::ZERO;
    let mut total = 0.0;
    for segment in path.segments() {
        total += match *segment {
            PathSegment::MoveTo(_) => 0.0,
            PathSegment::LineTo(to) => distance(cursor, to),
            PathSegment::QuadTo { control, to } => {
                estimate_length(&quad_to_cubic(cursor, control, to), error_bound)
            }
            PathSegment::CubicTo {
                control1,
                control2,
                to,
            } => estimate_length(&[cursor, control1, control2, to], error_bound),
        };
        cursor = segment.end_point();
    }
    total
}
