//! Small math helpers: rate-based interpolation with a terminal snap, and
//! axis-angle orientation between two directions.

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;

/// Interpolate from `start` toward `end` by `rate`, snapping to `end` once
/// the remaining distance drops below `limit`.
///
/// The snap makes repeated application terminate at exactly `end` in a
/// finite number of steps instead of converging asymptotically forever.
#[must_use]
pub fn lerp(start: f64, end: f64, rate: f64, limit: f64) -> f64 {
    let current = (1.0 - rate) * start + rate * end;
    if (end - current).abs() < limit {
        end
    } else {
        current
    }
}

/// A direction or position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy. Zero vectors are returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            self
        } else {
            Self::new(self.x / len, self.y / len, self.z / len)
        }
    }
}

/// Axis-angle rotation taking the `original` direction onto `target`.
///
/// The axis is the normalized cross product and the angle comes from the dot
/// product, clamped so floating error never escapes `acos`'s domain.
#[must_use]
pub fn point_to(original: Vec3, target: Vec3) -> (Vec3, f64) {
    let from = original.normalized();
    let to = target.normalized();
    let axis = from.cross(to).normalized();
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    (axis, angle)
}

/// Signed yaw (rotation about +Y) taking the `original` direction onto
/// `target`, for directions lying in the XZ plane.
#[must_use]
pub fn point_to_yaw(original: Vec3, target: Vec3) -> f64 {
    let (axis, angle) = point_to(original, target);
    if axis.y < 0.0 { -angle } else { angle }
}
