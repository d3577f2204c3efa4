//! Fehler, die aus der Spline-Engine nach außen dringen.

use crate::gpu::GpuError;
use thiserror::Error;

/// Fehler einer Spline-Berechnung.
///
/// Geräte-Fehler, nach denen der sequentielle Pfad einspringen kann,
/// erscheinen hier nicht; sie werden im Solver protokolliert und aufgefangen.
#[derive(Error, Debug)]
pub enum SplineError {
    /// Die GPU hat keinen Speicher mehr für den Aufruf.
    #[error("GPU-Ressourcen erschöpft: {0}")]
    ResourceExhausted(#[source] GpuError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_resource_exhausted_keeps_source() {
        let err = SplineError::ResourceExhausted(GpuError::OutOfMemory("Buffer".into()));
        assert!(err.to_string().contains("erschöpft"));
        assert!(err.source().is_some());
    }
}
