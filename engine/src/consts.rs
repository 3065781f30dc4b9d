//! Shared numeric constants for the effects engine.

// ── Camera ──────────────────────────────────────────────────────

/// Camera depth at which one world unit projects to exactly one CSS pixel.
///
/// The coordinate mapper depends on this coupling: meshes must be authored at
/// the depth where the perspective projection and raw pixel units line up.
pub const CAMERA_Z: f64 = 2000.0;

/// Near clip plane distance.
pub const NEAR: f64 = 1500.0;

/// Far clip plane distance.
pub const FAR: f64 = 4000.0;

// ── Interpolation ───────────────────────────────────────────────

/// Default terminal snap distance for [`crate::math::lerp`].
pub const LERP_LIMIT: f64 = 1e-3;

/// Per-frame decay rate for the pending slide rotation.
pub const ROTATION_RATE: f64 = 0.9;

/// Snap threshold below which the remaining rotation collapses to exactly zero.
pub const ROTATION_EPSILON: f64 = 1e-4;

/// Smoothing rate for the visually active slide index uniform.
pub const VISUAL_INDEX_RATE: f64 = 0.15;

/// Relaxation rate pulling hover tilt back toward rest.
pub const TILT_RELAX_RATE: f64 = 0.1;

/// Maximum hover tilt in radians at the far edge of a mesh.
pub const TILT_SCALE: f64 = 0.3;

// ── Geometry ────────────────────────────────────────────────────

/// Circumference segment count for cylinder slide geometry.
pub const CYLINDER_SEGMENTS: usize = 100;

// ── Timing ──────────────────────────────────────────────────────

/// Trailing debounce applied to window resize bursts, in milliseconds.
pub const RESIZE_DEBOUNCE_MS: u32 = 500;
