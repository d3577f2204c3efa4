//! Dispatch des Kontrollpunkt-Kernels.
//!
//! Ablauf pro Aufruf: Punkte relativ zur Bounding-Box-Mitte als
//! f32-Paare (hi, lo) hochladen → ein Work-Item pro Kontrollpunkt rechnen →
//! Versätze zurücklesen und in f64 auf die Stützpunkte addieren. Alle Buffer
//! gehören einem `DispatchResources`-Guard und werden bei jedem Ausgang
//! zerstört.

use super::context::{ComputeContext, CONTROL_POINTS_KERNEL};
use super::error::{GpuError, GpuResult};
use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use std::sync::mpsc;
use std::time::Duration;
use wgpu::util::DeviceExt;

/// Uniform-Parameter des Kernels (16 Byte, uniform-kompatibel).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ControlPointParams {
    smooth_factor: f32,
    point_count: u32,
    work_items: u32,
    _padding: u32,
}

/// Größe eines Versatzes im Ausgabe-Buffer (`vec2<f32>`).
const GPU_OFFSET_SIZE: u64 = std::mem::size_of::<[f32; 2]>() as u64;

/// Größter Betrag einer Koordinate relativ zur Bounding-Box-Mitte.
///
/// Hält `length()` im Kernel für jede Differenz zweier Punkte unter `f32::MAX`.
const GPU_COORDINATE_LIMIT: f64 = 1e18;

/// Buffer eines einzelnen Dispatches.
struct DispatchResources {
    params: wgpu::Buffer,
    points: wgpu::Buffer,
    offsets: wgpu::Buffer,
    readback: wgpu::Buffer,
}

impl DispatchResources {
    fn new(device: &wgpu::Device, points: &[[f32; 4]], params: ControlPointParams) -> Self {
        let output_size = u64::from(params.work_items) * GPU_OFFSET_SIZE;

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Control Point Params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let points_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sample Points"),
            contents: bytemuck::cast_slice(points),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let offsets = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Control Point Offsets"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Control Points Readback"),
            size: output_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            params: params_buffer,
            points: points_buffer,
            offsets,
            readback,
        }
    }

    /// Mappt den Readback-Buffer und wartet höchstens `timeout` auf die Submission.
    fn read_back(
        &self,
        device: &wgpu::Device,
        submission: wgpu::SubmissionIndex,
        timeout: Duration,
    ) -> GpuResult<Vec<DVec2>> {
        let slice = self.readback.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // Empfänger ist nach einem Timeout evtl. schon weg
            let _ = tx.send(result);
        });

        device.poll(wgpu::PollType::Wait {
            submission_index: Some(submission),
            timeout: Some(timeout),
        })?;

        rx.try_recv()
            .map_err(|_| GpuError::ReadbackUnavailable)??;

        let offsets = {
            let data = slice.get_mapped_range();
            let raw: &[[f32; 2]] = bytemuck::cast_slice(&data);
            raw.iter()
                .map(|p| DVec2::new(f64::from(p[0]), f64::from(p[1])))
                .collect()
        };
        self.readback.unmap();
        Ok(offsets)
    }
}

impl Drop for DispatchResources {
    fn drop(&mut self) {
        self.params.destroy();
        self.points.destroy();
        self.offsets.destroy();
        self.readback.destroy();
        log::debug!("Dispatch-Buffer freigegeben");
    }
}

/// Anzahl der Work-Items (= Kontrollpunkte) für `n` Stützpunkte.
pub(crate) fn work_item_count(n: usize) -> usize {
    2 * n.saturating_sub(2)
}

/// Bereitet die Punkte für den Upload vor.
///
/// Jeder Punkt wird relativ zur Bounding-Box-Mitte als `[hi.x, hi.y, lo.x, lo.y]`
/// abgelegt, mit `hi = f32(p)` und `lo = f32(p - hi)`. Nicht-endliche oder zu
/// große Koordinaten werden abgelehnt; der Aufruf läuft dann sequentiell.
fn encode_points(points: &[DVec2]) -> GpuResult<Vec<[f32; 4]>> {
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        let value = if p.x.is_finite() { p.y } else { p.x };
        return Err(GpuError::CoordinateOutOfRange {
            value,
            limit: GPU_COORDINATE_LIMIT,
        });
    }

    let (min, max) = points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );
    let origin = (min + max) * 0.5;

    points
        .iter()
        .map(|&p| {
            let local = p - origin;
            let extent = local.abs().max_element();
            if extent > GPU_COORDINATE_LIMIT {
                return Err(GpuError::CoordinateOutOfRange {
                    value: extent,
                    limit: GPU_COORDINATE_LIMIT,
                });
            }
            let hi = local.as_vec2();
            let lo = (local - hi.as_dvec2()).as_vec2();
            Ok([hi.x, hi.y, lo.x, lo.y])
        })
        .collect()
}

/// Addiert die Kernel-Versätze auf ihren Stützpunkt B.
fn apply_offsets(points: &[DVec2], offsets: Vec<DVec2>) -> GpuResult<Vec<DVec2>> {
    offsets
        .into_iter()
        .enumerate()
        .map(|(index, offset)| {
            if offset.is_finite() {
                Ok(points[index / 2 + 1] + offset)
            } else {
                Err(GpuError::NonFiniteResult { index })
            }
        })
        .collect()
}

/// Berechnet die Kontrollpunkte auf der GPU.
///
/// `smooth_factor` geht als `f32` in den Kernel, ebenso die Differenzen
/// zwischen Nachbarpunkten. Die Abweichung zum sequentiellen Pfad bleibt
/// relativ zum Versatz klein, unabhängig von der Lage der Punkte.
pub fn dispatch_control_points(
    ctx: &ComputeContext,
    points: &[DVec2],
    smooth_factor: f32,
    timeout: Duration,
) -> GpuResult<Vec<DVec2>> {
    let work_items = work_item_count(points.len());
    if work_items == 0 {
        return Ok(Vec::new());
    }

    let kernel = ctx.kernel(CONTROL_POINTS_KERNEL)?;
    let limit = ctx.max_workgroups_per_dimension();
    let workgroups = u32::try_from(work_items.div_ceil(kernel.workgroup_size as usize))
        .unwrap_or(u32::MAX);
    if workgroups > limit {
        return Err(GpuError::DispatchTooLarge { workgroups, limit });
    }

    let params = ControlPointParams {
        smooth_factor,
        point_count: points.len() as u32,
        work_items: work_items as u32,
        _padding: 0,
    };
    let encoded = encode_points(points)?;

    log::debug!(
        "Dispatch '{}': {} Punkte, {} Work-Items, {} Workgroups",
        CONTROL_POINTS_KERNEL,
        points.len(),
        work_items,
        workgroups
    );

    let _queue = ctx.lock_queue();
    ctx.push_error_scopes();

    let resources = DispatchResources::new(&ctx.device, &encoded, params);

    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Control Point Bind Group"),
        layout: &kernel.bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: resources.params.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: resources.points.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: resources.offsets.as_entire_binding(),
            },
        ],
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Control Point Encoder"),
        });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Control Point Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&kernel.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(workgroups, 1, 1);
    }
    encoder.copy_buffer_to_buffer(
        &resources.offsets,
        0,
        &resources.readback,
        0,
        resources.readback.size(),
    );

    let submission = ctx.queue.submit(Some(encoder.finish()));
    ctx.pop_error_scopes()?;

    let offsets = resources.read_back(&ctx.device, submission, timeout)?;
    apply_offsets(points, offsets)
}
