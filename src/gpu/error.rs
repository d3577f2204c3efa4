//! GPU-Fehlertypen.

use thiserror::Error;

/// Fehler beim Aufbau des Compute-Kontexts oder während eines Dispatches.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Kein passender GPU-Adapter gefunden.
    #[error("kein GPU-Adapter verfügbar: {0}")]
    AdapterNotFound(#[from] wgpu::RequestAdapterError),

    /// Adapter gefunden, aber kein Device erhalten.
    #[error("GPU-Device konnte nicht angefordert werden: {0}")]
    DeviceRequestFailed(#[from] wgpu::RequestDeviceError),

    /// Kernel-Name ist im kompilierten Programm nicht registriert.
    #[error("Kernel '{0}' nicht gefunden")]
    KernelNotFound(String),

    /// Validierungs- oder interner Fehler von wgpu (Buffer, Bind-Group, Dispatch).
    #[error("wgpu-Validierung fehlgeschlagen: {0}")]
    Validation(String),

    /// Device-Speicher erschöpft.
    #[error("GPU-Speicher erschöpft: {0}")]
    OutOfMemory(String),

    /// Readback-Buffer konnte nicht gemappt werden.
    #[error("Readback-Mapping fehlgeschlagen: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    /// Warten auf die Queue fehlgeschlagen oder Timeout.
    #[error("Warten auf GPU fehlgeschlagen: {0}")]
    Poll(#[from] wgpu::PollError),

    /// Map-Callback hat nach dem Warten kein Ergebnis geliefert.
    #[error("Readback-Ergebnis nach dem Warten nicht verfügbar")]
    ReadbackUnavailable,

    /// Koordinate lässt sich nicht verlustarm als f32 hochladen.
    #[error("Koordinate {value} außerhalb des GPU-Wertebereichs (±{limit})")]
    CoordinateOutOfRange { value: f64, limit: f64 },

    /// Kernel hat nicht-endliche Werte zurückgegeben.
    #[error("GPU-Ergebnis enthält nicht-endliche Werte (Index {index})")]
    NonFiniteResult { index: usize },

    /// Mehr Workgroups als das Device in einer Dimension erlaubt.
    #[error("Dispatch zu groß: {workgroups} Workgroups, Limit {limit}")]
    DispatchTooLarge { workgroups: u32, limit: u32 },
}

/// Grobe Einordnung eines [`GpuError`] für die Fallback-Entscheidung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuErrorKind {
    /// Kein Gerät vorhanden: dauerhaft sequentiell rechnen.
    ResourceUnavailable,
    /// Einzelner Aufruf gescheitert: diesen Aufruf sequentiell wiederholen.
    DeviceOperationFailure,
    /// Speicher erschöpft: Fehler nach außen geben.
    ResourceExhausted,
}

impl GpuError {
    /// Ordnet den Fehler einer [`GpuErrorKind`] zu.
    pub fn kind(&self) -> GpuErrorKind {
        match self {
            Self::AdapterNotFound(_) | Self::DeviceRequestFailed(_) => {
                GpuErrorKind::ResourceUnavailable
            }
            Self::OutOfMemory(_) => GpuErrorKind::ResourceExhausted,
            Self::KernelNotFound(_)
            | Self::Validation(_)
            | Self::BufferMap(_)
            | Self::Poll(_)
            | Self::ReadbackUnavailable
            | Self::CoordinateOutOfRange { .. }
            | Self::NonFiniteResult { .. }
            | Self::DispatchTooLarge { .. } => GpuErrorKind::DeviceOperationFailure,
        }
    }
}

impl From<wgpu::Error> for GpuError {
    fn from(err: wgpu::Error) -> Self {
        match err {
            wgpu::Error::OutOfMemory { .. } => Self::OutOfMemory(err.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Result-Typ für GPU-Operationen.
pub type GpuResult<T> = Result<T, GpuError>;
