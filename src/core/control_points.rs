//! Kontrollpunkt-Solver für interpolierende Bézier-Splines.
//!
//! Für jedes Tripel (A, B, C) aufeinanderfolgender Stützpunkte entstehen zwei
//! Kontrollpunkte an B, entlang der Sehnenrichtung A→C verschoben. Das ergibt
//! eine tangentenstetige Kurve ohne globales Gleichungssystem (O(n), lokal).
//!
//! Zwei austauschbare Strategien: sequentiell (f64, aufrufender Thread) und
//! datenparallel (wgpu-Kernel, f32).

use super::error::SplineError;
use super::vector::chord_direction;
use crate::gpu::{dispatch_control_points, ComputeContext, ComputeRuntime, GpuErrorKind, GpuResult};
use crate::shared::options::GPU_DISPATCH_TIMEOUT_MS;
use glam::DVec2;
use std::sync::Arc;
use std::time::Duration;

/// Flache Kontrollpunkt-Liste im Layout `[out_0, in_0, out_1, in_1, ...]`.
///
/// Länge ist immer `2 * (n - 2)` für n ≥ 3 Stützpunkte, sonst 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPointSet {
    points: Vec<DVec2>,
}

impl ControlPointSet {
    /// Leere Menge (weniger als 3 Stützpunkte).
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Übernimmt eine bereits berechnete, flache Liste.
    pub fn from_points(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    /// Erwartete Länge für `sample_count` Stützpunkte.
    pub fn expected_len(sample_count: usize) -> usize {
        2 * sample_count.saturating_sub(2)
    }

    /// Anzahl der Kontrollpunkte
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Gibt zurück, ob keine Kontrollpunkte vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flache Sicht auf alle Kontrollpunkte.
    pub fn as_slice(&self) -> &[DVec2] {
        &self.points
    }

    /// Kontrollpunkt am flachen Index.
    pub fn get(&self, index: usize) -> Option<DVec2> {
        self.points.get(index).copied()
    }

    /// Auslaufender Kontrollpunkt des inneren Stützpunkts `k + 1`.
    pub fn outgoing(&self, k: usize) -> Option<DVec2> {
        self.get(2 * k)
    }

    /// Einlaufender Kontrollpunkt des inneren Stützpunkts `k + 1`.
    pub fn incoming(&self, k: usize) -> Option<DVec2> {
        self.get(2 * k + 1)
    }

    /// Letzter Kontrollpunkt (steuert das abschließende Quadratic-Segment).
    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    /// Paare `(outgoing, incoming)` je innerem Stützpunkt.
    pub fn pairs(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.points.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Ausführungs-Strategie für die Kontrollpunkt-Berechnung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputeBackend {
    /// Schleife auf dem aufrufenden Thread, f64
    #[default]
    Sequential,
    /// wgpu-Compute-Kernel, f32
    Parallel,
}

impl ComputeBackend {
    /// Übersetzt das globale GPU-Flag.
    pub fn from_flag(use_parallel: bool) -> Self {
        if use_parallel {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Gemeinsame Schnittstelle beider Backends.
pub trait ControlPointStrategy {
    /// Backend dieser Strategie.
    fn backend(&self) -> ComputeBackend;

    /// Berechnet alle Kontrollpunkte. Weniger als 3 Punkte ergeben eine leere Menge.
    fn solve(&self, points: &[DVec2], smooth_factor: f64) -> GpuResult<ControlPointSet>;
}

/// Berechnet den Kontrollpunkt am flachen Index `index`.
///
/// Gerade Indizes: auslaufend (Referenz A, Richtung +AC).
/// Ungerade Indizes: einlaufend (Referenz C, Richtung −AC).
/// Fällt A mit C zusammen, ist die Richtung null und das Ergebnis B.
pub fn control_point(points: &[DVec2], index: usize, smooth_factor: f64) -> DVec2 {
    let k = index / 2;
    let (a, b, c) = (points[k], points[k + 1], points[k + 2]);
    let (dir, reference) = if index % 2 == 0 {
        (chord_direction(a, c), a)
    } else {
        (-chord_direction(a, c), c)
    };
    let projection = (b - reference).dot(dir).abs();
    b - smooth_factor * projection * dir
}

/// Sequentielle Strategie (f64).
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStrategy;

impl SequentialStrategy {
    /// Unfehlbare Variante von [`ControlPointStrategy::solve`].
    pub fn compute(&self, points: &[DVec2], smooth_factor: f64) -> ControlPointSet {
        let count = ControlPointSet::expected_len(points.len());
        let control_points = (0..count)
            .map(|i| control_point(points, i, smooth_factor))
            .collect();
        ControlPointSet::from_points(control_points)
    }
}

impl ControlPointStrategy for SequentialStrategy {
    fn backend(&self) -> ComputeBackend {
        ComputeBackend::Sequential
    }

    fn solve(&self, points: &[DVec2], smooth_factor: f64) -> GpuResult<ControlPointSet> {
        Ok(self.compute(points, smooth_factor))
    }
}

/// Datenparallele Strategie auf einem [`ComputeContext`].
#[derive(Debug, Clone)]
pub struct ParallelStrategy {
    context: Arc<ComputeContext>,
    dispatch_timeout: Duration,
}

impl ParallelStrategy {
    /// Erstellt die Strategie für einen bestehenden Kontext.
    pub fn new(context: Arc<ComputeContext>, dispatch_timeout: Duration) -> Self {
        Self {
            context,
            dispatch_timeout,
        }
    }
}

impl ControlPointStrategy for ParallelStrategy {
    fn backend(&self) -> ComputeBackend {
        ComputeBackend::Parallel
    }

    fn solve(&self, points: &[DVec2], smooth_factor: f64) -> GpuResult<ControlPointSet> {
        let control_points = dispatch_control_points(
            &self.context,
            points,
            smooth_factor as f32,
            self.dispatch_timeout,
        )?;
        Ok(ControlPointSet::from_points(control_points))
    }
}

/// Wählt das Backend und fängt Geräte-Fehler ab.
///
/// - Kein Gerät: sequentiell (die Laufzeit merkt sich das dauerhaft)
/// - Fehler in einem Aufruf: diesen Aufruf sequentiell wiederholen
/// - Speicher erschöpft: Fehler nach außen
pub struct ControlPointSolver<'a> {
    runtime: &'a ComputeRuntime,
    dispatch_timeout: Duration,
}

impl<'a> ControlPointSolver<'a> {
    /// Solver auf einer bestimmten Laufzeit.
    pub fn new(runtime: &'a ComputeRuntime) -> Self {
        Self {
            runtime,
            dispatch_timeout: Duration::from_millis(GPU_DISPATCH_TIMEOUT_MS),
        }
    }

    /// Setzt die maximale Wartezeit pro GPU-Dispatch.
    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    /// Berechnet die Kontrollpunkte mit dem gewünschten Backend.
    pub fn solve(
        &self,
        points: &[DVec2],
        smooth_factor: f64,
        backend: ComputeBackend,
    ) -> Result<ControlPointSet, SplineError> {
        if points.len() < 3 {
            return Ok(ControlPointSet::empty());
        }

        if backend == ComputeBackend::Parallel {
            if let Some(context) = self.runtime.acquire() {
                let strategy = ParallelStrategy::new(context, self.dispatch_timeout);
                match strategy.solve(points, smooth_factor) {
                    Ok(set) => return Ok(set),
                    Err(e) if e.kind() == GpuErrorKind::ResourceExhausted => {
                        return Err(SplineError::ResourceExhausted(e))
                    }
                    Err(e) => {
                        log::warn!("GPU-Berechnung fehlgeschlagen, rechne sequentiell: {}", e);
                    }
                }
            }
        }

        Ok(SequentialStrategy.compute(points, smooth_factor))
    }
}

#[cfg(test)]
mod tests;
