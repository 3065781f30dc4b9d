//! Column-major 4x4 matrices for the draw layer.
//!
//! Just the handful of constructors the renderer composes per draw call;
//! the layout matches what `uniformMatrix4fv` expects, so results upload
//! without transposition.

#[cfg(test)]
#[path = "mat_test.rs"]
mod mat_test;

pub type Mat4 = [f32; 16];

#[must_use]
pub fn identity() -> Mat4 {
    let mut m = [0.0; 16];
    m[0] = 1.0;
    m[5] = 1.0;
    m[10] = 1.0;
    m[15] = 1.0;
    m
}

/// Right-handed perspective projection, OpenGL clip-space conventions.
#[must_use]
pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_radians / 2.0).tan();
    let mut m = [0.0; 16];
    m[0] = f / aspect;
    m[5] = f;
    m[10] = (far + near) / (near - far);
    m[11] = -1.0;
    m[14] = (2.0 * far * near) / (near - far);
    m
}

#[must_use]
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    let mut m = identity();
    m[12] = x;
    m[13] = y;
    m[14] = z;
    m
}

#[must_use]
pub fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
    let mut m = identity();
    m[0] = x;
    m[5] = y;
    m[10] = z;
    m
}

#[must_use]
pub fn rotation_x(radians: f32) -> Mat4 {
    let (s, c) = radians.sin_cos();
    let mut m = identity();
    m[5] = c;
    m[6] = s;
    m[9] = -s;
    m[10] = c;
    m
}

#[must_use]
pub fn rotation_y(radians: f32) -> Mat4 {
    let (s, c) = radians.sin_cos();
    let mut m = identity();
    m[0] = c;
    m[2] = -s;
    m[8] = s;
    m[10] = c;
    m
}

/// `a * b`, so `multiply(t, s)` scales first and translates second.
#[must_use]
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut m = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0;
            for k in 0..4 {
                sum += a[k * 4 + row] * b[col * 4 + k];
            }
            m[col * 4 + row] = sum;
        }
    }
    m
}

/// Transform a point, with the implicit `w = 1`.
#[must_use]
pub fn transform_point(m: &Mat4, x: f32, y: f32, z: f32) -> [f32; 3] {
    [
        m[0] * x + m[4] * y + m[8] * z + m[12],
        m[1] * x + m[5] * y + m[9] * z + m[13],
        m[2] * x + m[6] * y + m[10] * z + m[14],
    ]
}
