//! Pointer hover: raycast against scene object picking planes and the
//! resulting tilt state.
//!
//! The pointer is stored in normalized device coordinates. Each tick a ray
//! from the camera through the pointer is intersected against every
//! candidate's picking plane; the nearest hit is the sole hovered object for
//! that frame. Hovered meshes tilt toward the pointer, bounded by a fixed
//! scale; everything else relaxes back toward rest asymptotically.

#[cfg(test)]
#[path = "hover_test.rs"]
mod hover_test;

use crate::consts::TILT_RELAX_RATE;
use crate::coords::Ndc;
use crate::math::lerp;
use crate::viewport::Viewport;

/// An axis-aligned picking plane for one scene object: its world-space
/// center (Z is the mesh's working depth) and effective size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickPlane {
    pub object: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub center_z: f64,
    pub width: f64,
    pub height: f64,
}

/// A ray intersection against one picking plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Registry index of the hit object.
    pub object: usize,
    /// Ray parameter; smaller is nearer the camera.
    pub distance: f64,
    /// Intersection point in the plane's UV space, both axes in `[0, 1]`.
    pub uv: (f64, f64),
}

/// Cast a ray from the camera through `ndc` and return the nearest plane it
/// pierces, if any.
///
/// The ray leaves `(0, 0, camera_z)` with direction
/// `(ndc.x · tan(fov/2) · aspect, ndc.y · tan(fov/2), -1)`; with the Z
/// component fixed at `-1` the ray parameter is monotonic in depth, so the
/// minimum parameter is the nearest hit. Planes behind the camera and
/// degenerate (zero-size) planes never match.
#[must_use]
pub fn raycast(ndc: Ndc, viewport: &Viewport, planes: &[PickPlane]) -> Option<RayHit> {
    let dir_x = ndc.x * viewport.half_tan() * viewport.aspect;
    let dir_y = ndc.y * viewport.half_tan();

    let mut nearest: Option<RayHit> = None;
    for plane in planes {
        let t = viewport.camera_z - plane.center_z;
        if t <= 0.0 || plane.width <= 0.0 || plane.height <= 0.0 {
            continue;
        }
        let px = dir_x * t;
        let py = dir_y * t;
        let u = (px - plane.center_x) / plane.width + 0.5;
        let v = (py - plane.center_y) / plane.height + 0.5;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            continue;
        }
        let hit = RayHit { object: plane.object, distance: t, uv: (u, v) };
        if nearest.is_none_or(|n| t < n.distance) {
            nearest = Some(hit);
        }
    }
    nearest
}

/// Hover flag and tilt for one scene object.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoverState {
    pub hovered: bool,
    /// Intersection UV while hovered; cleared otherwise.
    pub uv: Option<(f64, f64)>,
    /// Pitch toward the pointer, radians.
    pub tilt_x: f64,
    /// Yaw toward the pointer, radians.
    pub tilt_y: f64,
}

impl HoverState {
    /// Mark hovered and ease the tilt toward the pointer's UV offset from
    /// center, bounded by `scale` radians at the mesh edge.
    pub fn aim(&mut self, uv: (f64, f64), scale: f64) {
        self.hovered = true;
        self.uv = Some(uv);
        let target_x = (0.5 - uv.1) * 2.0 * scale;
        let target_y = (uv.0 - 0.5) * 2.0 * scale;
        self.tilt_x = lerp(self.tilt_x, target_x, TILT_RELAX_RATE, 0.0);
        self.tilt_y = lerp(self.tilt_y, target_y, TILT_RELAX_RATE, 0.0);
    }

    /// Clear the hover flag and relax the tilt back toward rest.
    pub fn relax(&mut self) {
        self.hovered = false;
        self.uv = None;
        self.tilt_x = lerp(self.tilt_x, 0.0, TILT_RELAX_RATE, 0.0);
        self.tilt_y = lerp(self.tilt_y, 0.0, TILT_RELAX_RATE, 0.0);
    }
}
