use super::*;
use approx::assert_relative_eq;

fn scenario_points() -> Vec<DVec2> {
    vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(10.0, 0.0),
        DVec2::new(20.0, 10.0),
        DVec2::new(30.0, 10.0),
    ]
}

fn assert_point_eq(actual: DVec2, expected: DVec2) {
    assert_relative_eq!(actual.x, expected.x, epsilon = 1e-9);
    assert_relative_eq!(actual.y, expected.y, epsilon = 1e-9);
}

// ── Länge / Layout ──

#[test]
fn test_count_is_twice_interior_points() {
    for n in 3..12 {
        let points: Vec<DVec2> = (0..n)
            .map(|i| DVec2::new(i as f64 * 3.0, (i as f64).sin() * 5.0))
            .collect();
        let set = SequentialStrategy.compute(&points, 0.5);
        assert_eq!(set.len(), 2 * (n - 2), "n = {}", n);
        assert_eq!(set.len() % 2, 0);
    }
}

#[test]
fn test_fewer_than_three_points_is_empty() {
    let runtime = ComputeRuntime::disabled();
    let solver = ControlPointSolver::new(&runtime);
    for n in 0..3 {
        let points = vec![DVec2::new(1.0, 2.0); n];
        let set = solver
            .solve(&points, 0.5, ComputeBackend::Sequential)
            .expect("Sequentiell darf nicht scheitern");
        assert!(set.is_empty(), "n = {} muss leer sein", n);
    }
}

#[test]
fn test_scenario_values() {
    // (0,0) (10,0) (20,10) (30,10), s = 0.5
    let set = SequentialStrategy.compute(&scenario_points(), 0.5);
    assert_eq!(set.len(), 4);
    assert_point_eq(set.as_slice()[0], DVec2::new(6.0, -2.0));
    assert_point_eq(set.as_slice()[1], DVec2::new(16.0, 3.0));
    assert_point_eq(set.as_slice()[2], DVec2::new(14.0, 7.0));
    assert_point_eq(set.as_slice()[3], DVec2::new(24.0, 12.0));
}

#[test]
fn test_outgoing_incoming_accessors() {
    let set = SequentialStrategy.compute(&scenario_points(), 0.5);
    assert_eq!(set.outgoing(0), set.get(0));
    assert_eq!(set.incoming(0), set.get(1));
    assert_eq!(set.outgoing(1), set.get(2));
    assert_eq!(set.incoming(1), set.get(3));
    assert_eq!(set.incoming(2), None);
    assert_eq!(set.pairs().count(), 2);
    assert_eq!(set.last(), set.get(3));
}

// ── Geometrie ──

#[test]
fn test_collinear_points_stay_on_line() {
    let points = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(10.0, 0.0),
        DVec2::new(20.0, 0.0),
    ];
    let set = SequentialStrategy.compute(&points, 0.5);
    assert_point_eq(set.as_slice()[0], DVec2::new(5.0, 0.0));
    assert_point_eq(set.as_slice()[1], DVec2::new(15.0, 0.0));
}

#[test]
fn test_zero_smooth_factor_collapses_to_sample() {
    let points = scenario_points();
    let set = SequentialStrategy.compute(&points, 0.0);
    for (k, (out, inc)) in set.pairs().enumerate() {
        assert_eq!(out, points[k + 1]);
        assert_eq!(inc, points[k + 1]);
    }
}

#[test]
fn test_control_points_are_symmetric_around_sample_on_chord_line() {
    // Beide Kontrollpunkte von B liegen auf der Geraden durch B parallel zu AC
    let points = scenario_points();
    let set = SequentialStrategy.compute(&points, 0.5);
    let dir = (points[2] - points[0]).normalize();
    let (out, inc) = set.pairs().next().expect("Paar erwartet");
    assert_relative_eq!((out - points[1]).perp_dot(dir), 0.0, epsilon = 1e-9);
    assert_relative_eq!((inc - points[1]).perp_dot(dir), 0.0, epsilon = 1e-9);
    // auslaufend zeigt rückwärts, einlaufend vorwärts
    assert!((out - points[1]).dot(dir) < 0.0);
    assert!((inc - points[1]).dot(dir) > 0.0);
}

#[test]
fn test_coincident_chord_endpoints_produce_no_nan() {
    // A == C → Richtung null → beide Kontrollpunkte = B
    let points = vec![
        DVec2::new(5.0, 5.0),
        DVec2::new(8.0, 1.0),
        DVec2::new(5.0, 5.0),
    ];
    let set = SequentialStrategy.compute(&points, 0.5);
    assert_eq!(set.as_slice(), &[points[1], points[1]]);
}

#[test]
fn test_duplicate_points_are_finite() {
    let points = vec![DVec2::new(2.0, 2.0); 6];
    let set = SequentialStrategy.compute(&points, 0.5);
    assert_eq!(set.len(), 8);
    assert!(set.as_slice().iter().all(|p| p.is_finite()));
}

// ── Solver / Fallback ──

#[test]
fn test_parallel_request_without_device_falls_back() {
    let runtime = ComputeRuntime::disabled();
    let solver = ControlPointSolver::new(&runtime);
    let points = scenario_points();

    let parallel = solver
        .solve(&points, 0.5, ComputeBackend::Parallel)
        .expect("Fallback darf nicht scheitern");
    let sequential = SequentialStrategy.compute(&points, 0.5);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_backend_from_flag() {
    assert_eq!(ComputeBackend::from_flag(true), ComputeBackend::Parallel);
    assert_eq!(ComputeBackend::from_flag(false), ComputeBackend::Sequential);
    assert_eq!(SequentialStrategy.backend(), ComputeBackend::Sequential);
}

#[test]
fn test_expected_len() {
    assert_eq!(ControlPointSet::expected_len(0), 0);
    assert_eq!(ControlPointSet::expected_len(2), 0);
    assert_eq!(ControlPointSet::expected_len(3), 2);
    assert_eq!(ControlPointSet::expected_len(7), 10);
}
