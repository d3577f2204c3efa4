//! 2D-Punkt-Primitive auf Basis von `glam::DVec2`.
//!
//! Addition, Subtraktion und Skalierung liefert glam direkt; hier liegen nur
//! die Hilfsfunktionen, die Solver und Längenschätzung gemeinsam brauchen.

use glam::DVec2;

/// Sehnenlänge, unterhalb der eine Richtung als nicht definiert gilt.
///
/// Derselbe Wert steht als `DEGENERATE_CHORD_EPSILON` im Compute-Kernel.
pub const DEGENERATE_CHORD_EPSILON: f64 = 1e-9;

/// Mittelpunkt zwischen `a` und `b`.
pub fn midpoint(a: DVec2, b: DVec2) -> DVec2 {
    (a + b) * 0.5
}

/// Euklidischer Abstand zweier Punkte.
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Normierte Richtung der Sehne `from → to`.
///
/// Fallen beide Punkte (nahezu) zusammen, ist das Ergebnis der Nullvektor.
pub fn chord_direction(from: DVec2, to: DVec2) -> DVec2 {
    let chord = to - from;
    let length = chord.length();
    if length <= DEGENERATE_CHORD_EPSILON || !length.is_finite() {
        return DVec2::ZERO;
    }
    chord / length
}

/// Länge des Kontrollpolygons durch alle Punkte in Reihenfolge.
pub fn polygon_length(points: &[DVec2]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_midpoint() {
        let m = midpoint(DVec2::new(0.0, 0.0), DVec2::new(10.0, -4.0));
        assert_eq!(m, DVec2::new(5.0, -2.0));
    }

    #[test]
    fn test_chord_direction_is_normalized() {
        let dir = chord_direction(DVec2::new(1.0, 1.0), DVec2::new(4.0, 5.0));
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(dir.x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(dir.y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_chord_direction_degenerate_is_zero() {
        let p = DVec2::new(3.0, 3.0);
        assert_eq!(chord_direction(p, p), DVec2::ZERO);
        assert_eq!(chord_direction(p, p + DVec2::splat(1e-12)), DVec2::ZERO);
    }

    #[test]
    fn test_polygon_length() {
        let pts = [DVec2::ZERO, DVec2::new(3.0, 4.0), DVec2::new(3.0, 10.0)];
        assert_relative_eq!(polygon_length(&pts), 11.0);
        assert_eq!(polygon_length(&pts[..1]), 0.0);
    }
}
