//! Zentrale Konfiguration der Spline-Engine.
//!
//! `SplineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use super::render_state::RenderState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Kurve ───────────────────────────────────────────────────────────

/// Standard-Glättungsfaktor (0 = Polygonzug, 1 = volle Sehnenprojektion).
pub const SMOOTH_FACTOR: f64 = 0.5;

// ── Bogenlänge ──────────────────────────────────────────────────────

/// Erlaubte Differenz zwischen Polygon- und Sehnenlänge pro Teilstück.
pub const ARC_LENGTH_ERROR_BOUND: f64 = 0.05;

// ── GPU ─────────────────────────────────────────────────────────────

/// Maximale Wartezeit pro GPU-Dispatch in Millisekunden.
pub const GPU_DISPATCH_TIMEOUT_MS: u64 = 2000;

/// Name der Optionen-Datei neben der Binary.
pub const CONFIG_FILE_NAME: &str = "bezier_spline_engine.toml";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `bezier_spline_engine.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplineOptions {
    // ── Kurve ───────────────────────────────────────────────────
    /// Glättungsfaktor für die Kontrollpunkte
    pub smooth_factor: f64,

    // ── GPU ─────────────────────────────────────────────────────
    /// Kontrollpunkte datenparallel auf der GPU berechnen
    pub use_gpu_acceleration: bool,
    /// Maximale Wartezeit pro Dispatch (ms)
    pub gpu_dispatch_timeout_ms: u64,

    // ── Messung ─────────────────────────────────────────────────
    /// Fehlerschranke der Bogenlängen-Schätzung
    pub arc_length_error_bound: f64,
    /// Ganze Kurve messen statt nur des ersten kubischen Abschnitts
    pub measure_whole_curve: bool,
    /// Einstellungen des Mess-Labels
    pub measurement: RenderState,
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self {
            smooth_factor: SMOOTH_FACTOR,
            use_gpu_acceleration: false,
            gpu_dispatch_timeout_ms: GPU_DISPATCH_TIMEOUT_MS,
            arc_length_error_bound: ARC_LENGTH_ERROR_BOUND,
            measure_whole_curve: true,
            measurement: RenderState::default(),
        }
    }
}

impl SplineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("bezier-spline"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join(CONFIG_FILE_NAME)
    }

    /// Dispatch-Timeout als `Duration`.
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.gpu_dispatch_timeout_ms)
    }
}
