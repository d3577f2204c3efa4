//! Einstellungen des Mess-Overlays und Formatierung des Längen-Labels.

use serde::{Deserialize, Serialize};

/// Größte sinnvolle Anzahl Nachkommastellen für f64.
const MAX_PRECISION: u32 = 15;

/// Einstellungen für das Längen-Label einer Kurve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderState {
    /// Label zeichnen
    pub measurements_enabled: bool,
    /// Multiplikator von Kurven-Einheiten zu Anzeige-Einheiten
    pub measurement_scale: f64,
    /// Einheit hinter dem Wert
    pub measurement_units: String,
    /// Nachkommastellen (auf 0..=15 begrenzt)
    pub measurement_precision: u32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            measurements_enabled: false,
            measurement_scale: 1.0,
            measurement_units: "mm".to_string(),
            measurement_precision: 2,
        }
    }
}

impl RenderState {
    /// Formatiert eine Länge als `"<wert> <einheit>"`, z.B. `"12.34 mm"`.
    pub fn format_measurement(&self, length: f64) -> String {
        let precision = self.measurement_precision.min(MAX_PRECISION) as usize;
        format!(
            "{:.*} {}",
            precision,
            length * self.measurement_scale,
            self.measurement_units
        )
    }
}
