#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f32 = 1e-5;

fn approx(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPSILON)
}

#[test]
fn identity_leaves_points_alone() {
    let m = identity();
    assert_eq!(transform_point(&m, 3.0, -4.0, 5.0), [3.0, -4.0, 5.0]);
}

#[test]
fn translation_offsets_points() {
    let m = translation(10.0, 20.0, 30.0);
    assert_eq!(transform_point(&m, 1.0, 2.0, 3.0), [11.0, 22.0, 33.0]);
}

#[test]
fn scaling_stretches_axes_independently() {
    let m = scaling(2.0, 3.0, 4.0);
    assert_eq!(transform_point(&m, 1.0, 1.0, 1.0), [2.0, 3.0, 4.0]);
}

#[test]
fn quarter_turn_about_y_sends_z_to_x() {
    let m = rotation_y(std::f32::consts::FRAC_PI_2);
    let p = transform_point(&m, 0.0, 0.0, 1.0);
    assert!(approx(&p, &[1.0, 0.0, 0.0]));
}

#[test]
fn quarter_turn_about_x_sends_y_to_z() {
    let m = rotation_x(std::f32::consts::FRAC_PI_2);
    let p = transform_point(&m, 0.0, 1.0, 0.0);
    assert!(approx(&p, &[0.0, 0.0, 1.0]));
}

#[test]
fn multiply_applies_right_operand_first() {
    // Scale then translate: the translation must not be scaled.
    let m = multiply(&translation(10.0, 0.0, 0.0), &scaling(2.0, 2.0, 2.0));
    let p = transform_point(&m, 1.0, 1.0, 1.0);
    assert!(approx(&p, &[12.0, 2.0, 2.0]));

    // Translate then scale: it must be.
    let m = multiply(&scaling(2.0, 2.0, 2.0), &translation(10.0, 0.0, 0.0));
    let p = transform_point(&m, 1.0, 1.0, 1.0);
    assert!(approx(&p, &[22.0, 2.0, 2.0]));
}

#[test]
fn multiply_by_identity_is_a_no_op() {
    let m = multiply(&rotation_y(0.7), &identity());
    assert!(approx(&m, &rotation_y(0.7)));
}

#[test]
fn perspective_maps_the_near_plane_to_minus_one() {
    let m = perspective(std::f32::consts::FRAC_PI_3, 1.25, 1500.0, 4000.0);
    // Point on the optical axis at the near plane.
    let x = m[10] * -1500.0 + m[14];
    let w = m[11] * -1500.0;
    assert!((x / w - -1.0).abs() < EPSILON);
    // And the far plane to +1.
    let x = m[10] * -4000.0 + m[14];
    let w = m[11] * -4000.0;
    assert!((x / w - 1.0).abs() < EPSILON);
}

#[test]
fn perspective_scales_by_the_aspect_ratio() {
    let m = perspective(std::f32::consts::FRAC_PI_3, 2.0, 1.0, 100.0);
    assert!(approx(&[m[0] * 2.0], &[m[5]]));
}
