//! Zeichen-Callback für fertig zusammengebaute Kurven.

use crate::core::{PathSegment, RenderPath};
use glam::DVec2;
use std::fmt::Write as _;

/// Ziel, auf das der Renderer zeichnet.
pub trait CurveCanvas {
    /// Zeichnet einen vollständigen Pfad.
    fn draw_path(&mut self, path: &RenderPath);

    /// Zeichnet ein Text-Label; `anchor` ist der linke Fußpunkt.
    fn draw_label(&mut self, text: &str, anchor: DVec2);
}

/// Sammelt Pfade und Labels und erzeugt daraus ein SVG-Dokument.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    /// Linienfarbe (SVG-Farbwert)
    pub stroke: String,
    /// Linienstärke in Kurven-Einheiten
    pub stroke_width: f64,
    /// Rand um die Bounding-Box
    pub padding: f64,
    elements: Vec<String>,
    min: DVec2,
    max: DVec2,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self {
            stroke: "black".to_string(),
            stroke_width: 1.0,
            padding: 10.0,
            elements: Vec::new(),
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anzahl gezeichneter Elemente
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn include(&mut self, p: DVec2) {
        if p.is_finite() {
            self.min = self.min.min(p);
            self.max = self.max.max(p);
        }
    }

    /// Erzeugt das SVG-Dokument.
    pub fn finish(&self) -> String {
        let (origin, size) = if self.min.x <= self.max.x && self.min.y <= self.max.y {
            let origin = self.min - DVec2::splat(self.padding);
            (origin, self.max - self.min + DVec2::splat(2.0 * self.padding))
        } else {
            (DVec2::ZERO, DVec2::splat(2.0 * self.padding))
        };

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            origin.x, origin.y, size.x, size.y
        );
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element);
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl CurveCanvas for SvgCanvas {
    fn draw_path(&mut self, path: &RenderPath) {
        for segment in path.segments() {
            match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => self.include(p),
                PathSegment::QuadTo { control, to } => {
                    self.include(control);
                    self.include(to);
                }
                PathSegment::CubicTo {
                    control1,
                    control2,
                    to,
                } => {
                    self.include(control1);
                    self.include(control2);
                    self.include(to);
                }
            }
        }
        self.elements.push(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            path.to_svg_data(),
            self.stroke,
            self.stroke_width
        ));
    }

    fn draw_label(&mut self, text: &str, anchor: DVec2) {
        self.include(anchor);
        self.elements.push(format!(
            r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
            anchor.x,
            anchor.y,
            escape_xml(text)
        ));
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
