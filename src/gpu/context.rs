//! GPU-Kontext und prozessweite Laufzeit.
//!
//! `ComputeContext` besitzt Adapter, Device, Queue und das kompilierte
//! Compute-Programm. `ComputeRuntime` erzeugt ihn lazy beim ersten
//! GPU-Aufruf und gibt ihn genau einmal wieder frei.

use super::error::{GpuError, GpuResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Name des Kernels für Bézier-Kontrollpunkte (Entry-Point im WGSL-Programm).
pub const CONTROL_POINTS_KERNEL: &str = "compute_bezier_control_points";

/// Workgroup-Größe, mit der `control_points.wgsl` kompiliert ist.
///
/// Liegt unter dem garantierten Minimum von `max_compute_invocations_per_workgroup`.
pub const CONTROL_POINTS_WORKGROUP_SIZE: u32 = 64;

/// Ein kompilierter Kernel samt Bind-Group-Layout.
pub struct ComputeKernel {
    pub(crate) pipeline: wgpu::ComputePipeline,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    /// Invocations pro Workgroup
    pub workgroup_size: u32,
}

/// GPU-Kontext für Compute-Dispatches.
///
/// Einmal erzeugen und für alle Kurven wiederverwenden. Dispatches auf
/// demselben Kontext laufen über `lock_queue()` nacheinander.
pub struct ComputeContext {
    adapter_info: wgpu::AdapterInfo,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    kernels: HashMap<&'static str, ComputeKernel>,
    queue_lock: Mutex<()>,
}

impl ComputeContext {
    /// Fordert Adapter und Device an und kompiliert das Kontrollpunkt-Programm.
    pub fn new() -> GpuResult<Self> {
        pollster::block_on(Self::new_async())
    }

    /// Asynchrone Variante von [`ComputeContext::new`].
    pub async fn new_async() -> GpuResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await?;

        let adapter_info = adapter.get_info();
        log::info!(
            "GPU-Adapter: {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.device_type,
            adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Bezier Spline Compute Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                ..Default::default()
            })
            .await?;

        let mut kernels = HashMap::new();
        kernels.insert(CONTROL_POINTS_KERNEL, compile_control_points_kernel(&device)?);

        Ok(Self {
            adapter_info,
            device,
            queue,
            kernels,
            queue_lock: Mutex::new(()),
        })
    }

    /// Liefert einen registrierten Kernel.
    pub fn kernel(&self, name: &str) -> GpuResult<&ComputeKernel> {
        self.kernels
            .get(name)
            .ok_or_else(|| GpuError::KernelNotFound(name.to_string()))
    }

    /// Adapter-Beschreibung (Name, Typ, Backend).
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Maximale Workgroup-Anzahl pro Dispatch-Dimension.
    pub fn max_workgroups_per_dimension(&self) -> u32 {
        self.device.limits().max_compute_workgroups_per_dimension
    }

    /// Sperrt die Queue für einen kompletten Dispatch (write → execute → read).
    pub(crate) fn lock_queue(&self) -> MutexGuard<'_, ()> {
        match self.queue_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Queue-Lock vergiftet, fahre mit innerem Zustand fort");
                poisoned.into_inner()
            }
        }
    }

    /// Holt Fehler aus zwei zuvor geöffneten Scopes (Validation oben, OutOfMemory darunter).
    pub(crate) fn pop_error_scopes(&self) -> GpuResult<()> {
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        match out_of_memory.or(validation) {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Öffnet die Scopes, die `pop_error_scopes` wieder schließt.
    pub(crate) fn push_error_scopes(&self) {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
    }
}

impl Drop for ComputeContext {
    fn drop(&mut self) {
        self.device.destroy();
        log::info!("GPU-Kontext freigegeben ({})", self.adapter_info.name);
    }
}

impl std::fmt::Debug for ComputeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeContext")
            .field("adapter", &self.adapter_info.name)
            .field("kernels", &self.kernels.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Kompiliert `control_points.wgsl` und baut Pipeline + Layout.
fn compile_control_points_kernel(device: &wgpu::Device) -> GpuResult<ComputeKernel> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Control Point Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("control_points.wgsl").into()),
    });

    let storage_entry = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Control Point Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            storage_entry(1, true),
            storage_entry(2, false),
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Control Point Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("Control Point Pipeline"),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: Some(CONTROL_POINTS_KERNEL),
        compilation_options: Default::default(),
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(GpuError::Validation(err.to_string()));
    }

    Ok(ComputeKernel {
        pipeline,
        bind_group_layout,
        workgroup_size: CONTROL_POINTS_WORKGROUP_SIZE,
    })
}

// ── Prozessweite Laufzeit ───────────────────────────────────────────

/// Zustand der [`ComputeRuntime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStatus {
    /// Noch kein GPU-Aufruf angefordert
    Uninitialized,
    /// Kontext steht bereit
    Ready,
    /// Kein Gerät gefunden; alle Aufrufe laufen sequentiell
    Unavailable,
    /// Kontext wurde freigegeben
    ShutDown,
}

enum RuntimeState {
    Uninitialized,
    Ready(Arc<ComputeContext>),
    Unavailable,
    ShutDown,
}

/// Lazy erzeugter, explizit freigegebener GPU-Kontext.
///
/// Ein fehlgeschlagener Aufbau wird gemerkt und nie wiederholt.
pub struct ComputeRuntime {
    state: Mutex<RuntimeState>,
}

static GLOBAL_RUNTIME: OnceLock<ComputeRuntime> = OnceLock::new();

impl ComputeRuntime {
    /// Erstellt eine eigene Laufzeit (z.B. für Tests).
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RuntimeState::Uninitialized),
        }
    }

    /// Laufzeit, die nie eine GPU anfordert.
    pub fn disabled() -> Self {
        Self {
            state: Mutex::new(RuntimeState::Unavailable),
        }
    }

    /// Prozessweite Laufzeit. Muss vor Prozessende per `shutdown()` freigegeben werden.
    pub fn global() -> &'static ComputeRuntime {
        GLOBAL_RUNTIME.get_or_init(ComputeRuntime::new)
    }

    fn lock_state(&self) -> MutexGuard<'_, RuntimeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Liefert den Kontext und baut ihn beim ersten Aufruf auf.
    ///
    /// `None`, wenn kein Gerät verfügbar ist oder die Laufzeit bereits heruntergefahren wurde.
    pub fn acquire(&self) -> Option<Arc<ComputeContext>> {
        let mut state = self.lock_state();
        if matches!(*state, RuntimeState::Uninitialized) {
            *state = match ComputeContext::new() {
                Ok(ctx) => RuntimeState::Ready(Arc::new(ctx)),
                Err(e) => {
                    log::warn!("GPU nicht verfügbar, rechne dauerhaft sequentiell: {}", e);
                    RuntimeState::Unavailable
                }
            };
        }
        match &*state {
            RuntimeState::Ready(ctx) => Some(Arc::clone(ctx)),
            _ => None,
        }
    }

    /// Aktueller Zustand, ohne einen Aufbau auszulösen.
    pub fn status(&self) -> RuntimeStatus {
        match &*self.lock_state() {
            RuntimeState::Uninitialized => RuntimeStatus::Uninitialized,
            RuntimeState::Ready(_) => RuntimeStatus::Ready,
            RuntimeState::Unavailable => RuntimeStatus::Unavailable,
            RuntimeState::ShutDown => RuntimeStatus::ShutDown,
        }
    }

    /// Gibt den Kontext frei. Weitere Aufrufe sind wirkungslos.
    ///
    /// Noch ausstehende `Arc`-Klone halten das Device bis zu ihrem Drop am Leben.
    pub fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.lock_state(), RuntimeState::ShutDown);
        match previous {
            RuntimeState::Ready(ctx) => {
                log::info!("Compute-Laufzeit wird heruntergefahren");
                drop(ctx);
            }
            RuntimeState::ShutDown => log::debug!("Compute-Laufzeit bereits heruntergefahren"),
            RuntimeState::Uninitialized | RuntimeState::Unavailable => {
                log::debug!("Compute-Laufzeit ohne Kontext beendet")
            }
        }
    }
}

impl Default for ComputeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_runtime_never_acquires() {
        let runtime = ComputeRuntime::disabled();
        assert!(runtime.acquire().is_none());
        assert_eq!(runtime.status(), RuntimeStatus::Unavailable);
    }

    #[test]
    fn test_new_runtime_is_uninitialized() {
        let runtime = ComputeRuntime::new();
        assert_eq!(runtime.status(), RuntimeStatus::Uninitialized);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let runtime = ComputeRuntime::disabled();
        runtime.shutdown();
        runtime.shutdown();
        assert_eq!(runtime.status(), RuntimeStatus::ShutDown);
        assert!(runtime.acquire().is_none());
    }

    #[test]
    fn test_shutdown_before_first_acquire_prevents_initialization() {
        let runtime = ComputeRuntime::new();
        runtime.shutdown();
        assert!(runtime.acquire().is_none());
        assert_eq!(runtime.status(), RuntimeStatus::ShutDown);
    }
}
