//! Coordinate mapping between DOM layout space and 3D world space.
//!
//! World coordinates are CSS pixels relative to the canvas center, Y up.
//! This identity only holds for meshes authored at the depth where one world
//! unit projects to one CSS pixel — [`crate::consts::CAMERA_Z`] with the
//! frustum derived in [`crate::viewport`]. Meshes placed at other depths will
//! drift from their DOM anchors; that coupling is a documented precondition,
//! not something this module tries to generalize away.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

/// An axis-aligned rectangle in CSS pixels, as reported by
/// `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// A mesh position in world space (CSS pixels from canvas center, Y up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

/// Map a DOM rect onto the world-space position of its mesh.
///
/// X is the rect center offset from the canvas horizontal center; Y is the
/// same vertically but inverted, since screen-down is world-up. A rect equal
/// to the canvas rect maps to the origin.
#[must_use]
pub fn world_position(dom: Rect, canvas: Rect) -> WorldPoint {
    WorldPoint {
        x: (dom.left + dom.width / 2.0) - canvas.width / 2.0,
        y: -(dom.top + dom.height / 2.0) + canvas.height / 2.0,
    }
}

/// Pointer position in normalized device coordinates: both axes in `[-1, 1]`
/// with Y flipped so up is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ndc {
    pub x: f64,
    pub y: f64,
}

impl Ndc {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a pointer event's client coordinates against the canvas rect.
    #[must_use]
    pub fn from_client(client_x: f64, client_y: f64, canvas: Rect) -> Self {
        Self {
            x: (client_x - canvas.left) / canvas.width * 2.0 - 1.0,
            y: -((client_y - canvas.top) / canvas.height * 2.0 - 1.0),
        }
    }
}
