#![no_main]

use bezier_spline_engine::{build_render_path, estimate_path_length, SequentialStrategy};
use glam::DVec2;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Erstes Byte: Glättungsfaktor, Rest: Punkte als f64-Paare
    let Some((&smooth, rest)) = data.split_first() else {
        return;
    };
    let points: Vec<DVec2> = rest
        .chunks_exact(16)
        .take(256)
        .map(|chunk| {
            let mut x = [0u8; 8];
            let mut y = [0u8; 8];
            x.copy_from_slice(&chunk[..8]);
            y.copy_from_slice(&chunk[8..]);
            DVec2::new(f64::from_le_bytes(x), f64::from_le_bytes(y))
        })
        .collect();

    // Solver, Zusammenbau und Messung dürfen nie paniken
    let control_points = SequentialStrategy.compute(&points, f64::from(smooth) / 255.0);
    assert_eq!(control_points.len(), 2 * points.len().saturating_sub(2));
    let path = build_render_path(&points, &control_points);
    let _ = path.to_svg_data();
    let _ = estimate_path_length(&path, 1.0);
});
