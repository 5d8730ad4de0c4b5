use std::f64::consts::{FRAC_PI_2, PI};

use crate::geom::{GeomError, Point3, Quaternion, Tolerance, Vec3, rotate};

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    Tolerance::new(1e-12).approx_eq_vec3(a, b)
}

#[test]
fn zero_angle_is_identity() {
    let v = Vec3::new(0.3, -1.2, 4.0);
    assert!(approx_vec(rotate(v, Vec3::new(1.0, 2.0, 3.0), 0.0), v));
}

#[test]
fn quarter_turn_about_z_maps_x_to_y() {
    assert!(approx_vec(rotate(Vec3::X, Vec3::Z, FRAC_PI_2), Vec3::Y));
    assert!(approx_vec(rotate(Vec3::Y, Vec3::X, FRAC_PI_2), Vec3::Z));
}

#[test]
fn axis_is_normalized_before_use() {
    let a = rotate(Vec3::X, Vec3::new(0.0, 0.0, 5.0), FRAC_PI_2);
    assert!(approx_vec(a, Vec3::Y));
}

#[test]
fn rotation_then_inverse_restores_vector() {
    let v = Vec3::new(1.5, -0.25, 0.75);
    let axis = Vec3::new(0.0, 1.0, 0.15);
    for &angle in &[0.3, 1.0, PI, 5.5] {
        let back = rotate(rotate(v, axis, angle), axis, -angle);
        assert!(approx_vec(back, v));
    }
}

#[test]
fn rotation_preserves_length() {
    let v = Vec3::new(2.0, -3.0, 6.0);
    let axis = Vec3::new(1.0, 1.0, 1.0);
    for i in 0..32 {
        let r = rotate(v, axis, f64::from(i) * 0.37);
        assert!(Tolerance::new(1e-12).approx_eq_f64(r.length(), 7.0));
    }
}

#[test]
fn zero_axis_leaves_vector_unchanged() {
    let v = Vec3::new(1.0, 2.0, 3.0);
    let r = rotate(v, Vec3::ZERO, 1.0);
    assert_eq!(r, v);
    assert!(r.is_finite());
    assert_eq!(
        Quaternion::try_from_axis_angle(Vec3::ZERO, 1.0),
        Err(GeomError::DegenerateInput("rotation axis has zero length"))
    );
}

#[test]
fn zero_norm_quaternion_normalizes_to_identity() {
    assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalized(), Quaternion::IDENTITY);
}

#[test]
fn composition_stays_unit_after_many_steps() {
    let step = Quaternion::from_axis_angle(Vec3::new(0.2, 1.0, -0.4), 0.01);
    let mut q = Quaternion::IDENTITY;
    for _ in 0..10_000 {
        q = step.compose(q);
    }
    assert!(Tolerance::new(1e-12).approx_eq_f64(q.norm(), 1.0));
}

#[test]
fn composed_rotation_matches_sequential_rotation() {
    let a = Quaternion::from_axis_angle(Vec3::X, 0.4);
    let b = Quaternion::from_axis_angle(Vec3::Y, -1.1);
    let v = Vec3::new(0.5, 0.5, -2.0);
    let sequential = a.rotate_vec3(b.rotate_vec3(v));
    assert!(approx_vec((a * b).rotate_vec3(v), sequential));
}

#[test]
fn transform_agrees_with_sandwich_product() {
    let q = Quaternion::from_axis_angle(Vec3::new(0.0, 1.0, 0.15), 0.9);
    let v = Vec3::new(0.3, -0.7, 1.1);
    let xf = q.to_transform();
    assert!(approx_vec(xf.apply_vec(v), q.rotate_vec3(v)));
    let p = xf.apply_point(Point3::new(v.x, v.y, v.z));
    assert!(approx_vec(p.to_vec3(), q.rotate_vec3(v)));
}
