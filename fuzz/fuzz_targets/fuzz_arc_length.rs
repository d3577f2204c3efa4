#![no_main]

use bezier_spline_engine::estimate_length;
use glam::DVec2;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [f64; 9]| {
    let curve = [
        DVec2::new(data[0], data[1]),
        DVec2::new(data[2], data[3]),
        DVec2::new(data[4], data[5]),
        DVec2::new(data[6], data[7]),
    ];
    // Muss für jede Eingabe terminieren, auch NaN/Inf
    let length = estimate_length(&curve, data[8]);
    if curve.iter().all(|p| p.is_finite()) && length.is_finite() {
        assert!(length >= 0.0);
    }
});
