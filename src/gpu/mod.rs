//! GPU-Compute mit wgpu.
//!
//! - `context`: Adapter/Device/Queue, kompiliertes Programm, prozessweite Laufzeit
//! - `dispatch`: Kontrollpunkt-Kernel mit deterministischer Buffer-Freigabe
//! - `error`: Fehlertypen und Fallback-Einordnung

mod context;
mod dispatch;
mod error;

pub use context::{
    ComputeContext, ComputeKernel, ComputeRuntime, RuntimeStatus, CONTROL_POINTS_KERNEL,
    CONTROL_POINTS_WORKGROUP_SIZE,
};
pub use dispatch::dispatch_control_points;
pub use error::{GpuError, GpuErrorKind, GpuResult};
