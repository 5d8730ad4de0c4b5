use crate::geom::{
    ContinuityDriver, ControlPointId, CubicBezier3, Curve3, JoinedBezier, Point3, Tolerance,
    Transform, Vec3, enforce_tangent_continuity, evaluate_cubic_bezier, tessellate_curve_uniform,
};

fn sample_curve() -> CubicBezier3 {
    CubicBezier3::new(
        Point3::new(0.65, -0.1, 0.2),
        Point3::new(0.5, 0.4, 0.2),
        Point3::new(0.0, 0.8, 0.2),
        Point3::new(0.0, 0.0, 0.2),
    )
}

fn demo_chain() -> JoinedBezier {
    JoinedBezier::new([
        Point3::new(0.65, -0.1, 0.2),
        Point3::new(0.5, 0.4, 0.2),
        Point3::new(0.0, 0.8, 0.2),
        Point3::new(0.0, 0.0, 0.2),
        Point3::new(0.0, -0.5, 0.2),
        Point3::new(-0.2, -0.2, 0.2),
        Point3::new(-0.8, 0.5, 0.2),
    ])
}

#[test]
fn bezier_hits_its_end_control_points() {
    let c = sample_curve();
    assert_eq!(c.point_at(0.0), c.p0);
    assert_eq!(c.point_at(1.0), c.p3);
}

#[test]
fn bezier_midpoint_matches_bernstein_weights() {
    let p = evaluate_cubic_bezier(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        0.5,
    );
    // (0 + 3·1 + 3·1 + 0) / 8 and (0 + 0 + 3·1 + 1) / 8
    let tol = Tolerance::DEFAULT;
    assert!(tol.approx_eq_point3(p, Point3::new(0.75, 0.5, 0.0)));
}

#[test]
fn bezier_extrapolates_outside_unit_interval() {
    let line = CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
    );
    let tol = Tolerance::DEFAULT;
    assert!(tol.approx_eq_point3(line.point_at(2.0), Point3::new(6.0, 0.0, 0.0)));
    assert!(tol.approx_eq_point3(line.point_at(-1.0), Point3::new(-3.0, 0.0, 0.0)));
}

#[test]
fn bezier_is_affine_invariant() {
    let c = sample_curve();
    let xf = Transform::translate(Vec3::new(1.0, -2.0, 0.5))
        * Transform::rotate_axis(Vec3::new(1.0, 1.0, 0.0), 0.7).expect("axis");
    let moved = CubicBezier3::new(
        xf.apply_point(c.p0),
        xf.apply_point(c.p1),
        xf.apply_point(c.p2),
        xf.apply_point(c.p3),
    );
    let tol = Tolerance::LOOSE;
    for i in 0..=20 {
        let t = f64::from(i) / 20.0;
        assert!(tol.approx_eq_point3(moved.point_at(t), xf.apply_point(c.point_at(t))));
    }
}

#[test]
fn derivative_matches_finite_difference() {
    let c = sample_curve();
    let h = 1e-6;
    for &t in &[0.1, 0.5, 0.9] {
        let fd = c.point_at(t + h).sub_point(c.point_at(t - h)) / (2.0 * h);
        assert!(Tolerance::new(1e-5).approx_eq_vec3(c.derivative_at(t), fd));
    }
}

#[test]
fn uniform_tessellation_returns_segments_plus_one() {
    let c = sample_curve();
    let pts = tessellate_curve_uniform(&c, 100);
    assert_eq!(pts.len(), 101);
    assert_eq!(pts.first().copied(), Some(c.p0));
    assert_eq!(pts.last().copied(), Some(c.p3));
}

#[test]
fn moving_p2_or_p4_recentres_the_joint() {
    let p2 = Point3::new(0.0, 1.0, 0.2);
    let p4 = Point3::new(0.0, -0.5, 0.2);
    let stale = Point3::new(5.0, 5.0, 5.0);
    for driver in [ContinuityDriver::P2, ContinuityDriver::P4] {
        let (a, mid, b) = enforce_tangent_continuity(driver, p2, stale, p4);
        assert_eq!((a, b), (p2, p4));
        assert!(Tolerance::DEFAULT.approx_eq_point3(mid, Point3::new(0.0, 0.25, 0.2)));
    }
}

#[test]
fn moving_p3_reflects_p4_through_it() {
    let p2 = Point3::new(0.0, 0.8, 0.2);
    let p3 = Point3::new(0.1, 0.1, 0.2);
    let (a, b, p4) = enforce_tangent_continuity(ContinuityDriver::P3, p2, p3, Point3::ORIGIN);
    assert_eq!((a, b), (p2, p3));
    assert!(Tolerance::DEFAULT.approx_eq_point3(p4, Point3::new(0.2, -0.6, 0.2)));
}

#[test]
fn chain_stays_continuous_after_every_edit() {
    let mut chain = demo_chain();
    assert!(chain.is_tangent_continuous(Tolerance::DEFAULT));
    let edits = [
        (ControlPointId::P2, 0.3, 0.9),
        (ControlPointId::P3, -0.1, 0.05),
        (ControlPointId::P4, 0.4, -0.7),
        (ControlPointId::P0, 0.9, 0.9),
        (ControlPointId::P3, 0.2, 0.2),
        (ControlPointId::P6, -0.9, -0.9),
    ];
    for (id, x, y) in edits {
        chain.move_point(id, x, y);
        assert!(chain.is_tangent_continuous(Tolerance::DEFAULT), "after moving {id:?}");
    }
}

#[test]
fn chain_moves_keep_depth() {
    let mut chain = demo_chain();
    chain.move_point(ControlPointId::P5, 0.3, 0.3);
    assert_eq!(chain.point(ControlPointId::P5), Point3::new(0.3, 0.3, 0.2));
}

#[test]
fn chain_segments_share_the_joint() {
    let chain = demo_chain();
    let [a, b] = chain.segments();
    assert_eq!(a.p3, b.p0);
    let [sa, sb] = chain.sample(100);
    assert_eq!(sa.len(), 101);
    assert_eq!(sb.len(), 101);
    assert_eq!(sa.last(), sb.first());
}

#[test]
fn control_point_ids_round_trip_through_index() {
    for id in ControlPointId::ALL {
        assert_eq!(ControlPointId::from_index(id.index()), Some(id));
    }
    assert_eq!(ControlPointId::from_index(7), None);
}
