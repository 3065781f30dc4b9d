//! Perspective frustum parameters derived from the canvas size.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{CAMERA_Z, FAR, NEAR};
use crate::coords::Rect;

/// Camera frustum parameters for the current canvas size.
///
/// Replaced wholesale whenever the canvas resizes. The field of view is
/// chosen so the frustum cross-section at [`CAMERA_Z`] is exactly the canvas
/// in CSS pixels: `fov = 2 · atan((height/2) / camera_z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,
    pub camera_z: f64,
    pub fov_radians: f64,
    pub fov_degrees: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Compute frustum parameters from the canvas's live bounding rect.
    #[must_use]
    pub fn from_canvas_rect(canvas: Rect, device_pixel_ratio: f64) -> Self {
        let fov_radians = 2.0 * ((canvas.height / 2.0) / CAMERA_Z).atan();
        Self {
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            near: NEAR,
            far: FAR,
            aspect: canvas.width / canvas.height,
            camera_z: CAMERA_Z,
            fov_radians,
            fov_degrees: fov_radians.to_degrees(),
            device_pixel_ratio,
        }
    }

    /// Half-height of the frustum cross-section at unit distance; the
    /// vertical scale factor used by raycasting and projection.
    #[must_use]
    pub fn half_tan(&self) -> f64 {
        (self.fov_radians / 2.0).tan()
    }
}
