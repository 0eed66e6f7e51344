//! Minimal 3-D vector math for the arena.
//!
//! The arena uses a left-handed, y-up frame: `x` points right, `z` points
//! forward and `y` points up. An agent's orientation is a yaw angle in
//! degrees, measured clockwise from `+z` when viewed from above, so turning
//! right increases the yaw.

use serde::{Deserialize, Serialize};

/// A 3-D vector in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// Lateral component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
    /// Depth component.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// World up axis; rotating about it turns an agent.
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    /// Construct a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Construct a vector on the ground plane (`y = 0`).
    pub const fn flat(x: f32, z: f32) -> Self {
        Self::new(x, 0.0, z)
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> f32 {
        self.x.mul_add(other.x, self.y.mul_add(other.y, self.z * other.z))
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Straight-line distance to another point.
    pub fn distance(self, other: Self) -> f32 {
        (other.x - self.x)
            .hypot(other.z - self.z)
            .hypot(other.y - self.y)
    }

    /// Distance to another point ignoring the vertical axis.
    pub fn horizontal_distance(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.z - self.z)
    }

    /// Whether every component is finite.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Unit forward vector for a yaw angle in degrees.
    pub fn forward(yaw_degrees: f32) -> Self {
        let (sin, cos) = yaw_degrees.to_radians().sin_cos();
        Self::flat(sin, cos)
    }

    /// Unit right vector for a yaw angle in degrees.
    pub fn right(yaw_degrees: f32) -> Self {
        let (sin, cos) = yaw_degrees.to_radians().sin_cos();
        Self::flat(cos, -sin)
    }

    /// This vector multiplied by `factor`.
    #[must_use]
    pub const fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// The point reached by moving `factor` times `delta` from this one.
    #[must_use]
    pub fn offset(self, delta: Self, factor: f32) -> Self {
        Self::new(
            delta.x.mul_add(factor, self.x),
            delta.y.mul_add(factor, self.y),
            delta.z.mul_add(factor, self.z),
        )
    }

    /// Express a world-space direction in the local frame of an agent with
    /// the given yaw (`x` = right, `z` = forward).
    #[must_use]
    pub fn to_local(self, yaw_degrees: f32) -> Self {
        Self::new(
            self.dot(Self::right(yaw_degrees)),
            self.y,
            self.dot(Self::forward(yaw_degrees)),
        )
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}

/// Signed horizontal angle, in degrees, from an agent's forward vector to a
/// destination.
///
/// The result lies in `(-180, 180]`. Positive means the destination is to the
/// agent's right, negative to its left. A destination on top of the agent
/// yields `0`.
pub fn signed_yaw(position: Vec3, yaw_degrees: f32, destination: Vec3) -> f32 {
    let dx = destination.x - position.x;
    let dz = destination.z - position.z;
    let forward = Vec3::forward(yaw_degrees);
    let cross = forward.z.mul_add(dx, -(forward.x * dz));
    let dot = forward.x.mul_add(dx, forward.z * dz);
    if cross == 0.0 && dot == 0.0 {
        return 0.0;
    }
    normalize_degrees(cross.atan2(dot).to_degrees())
}

/// The `y` component of the unit quaternion for a pure yaw rotation.
pub fn yaw_quaternion_y(yaw_degrees: f32) -> f32 {
    (yaw_degrees.to_radians() * 0.5).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn forward_at_zero_yaw_is_plus_z() {
        let f = Vec3::forward(0.0);
        assert!(close(f.x, 0.0));
        assert!(close(f.z, 1.0));
    }

    #[test]
    fn destination_on_the_right_is_positive() {
        let angle = signed_yaw(Vec3::ZERO, 0.0, Vec3::flat(10.0, 0.0));
        assert!(close(angle, 90.0), "got {angle}");
    }

    #[test]
    fn destination_on_the_left_is_negative() {
        let angle = signed_yaw(Vec3::ZERO, 0.0, Vec3::flat(-10.0, 10.0));
        assert!(close(angle, -45.0), "got {angle}");
    }

    #[test]
    fn destination_behind_is_plus_180() {
        let angle = signed_yaw(Vec3::ZERO, 0.0, Vec3::flat(0.0, -5.0));
        assert!(close(angle, 180.0), "got {angle}");
    }

    #[test]
    fn signed_yaw_accounts_for_agent_heading() {
        // Facing +x, a destination straight ahead on +x is dead ahead.
        let angle = signed_yaw(Vec3::flat(1.0, 1.0), 90.0, Vec3::flat(9.0, 1.0));
        assert!(close(angle, 0.0), "got {angle}");
    }

    #[test]
    fn coincident_destination_is_zero() {
        let p = Vec3::new(3.0, 1.0, 4.0);
        assert!(close(signed_yaw(p, 37.0, p), 0.0));
    }

    #[test]
    fn normalize_keeps_range_half_open() {
        assert!(close(normalize_degrees(-180.0), 180.0));
        assert!(close(normalize_degrees(540.0), 180.0));
        assert!(close(normalize_degrees(-190.0), 170.0));
        assert!(close(normalize_degrees(45.0), 45.0));
    }

    #[test]
    fn horizontal_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 50.0, 4.0);
        assert!(close(a.horizontal_distance(b), 5.0));
        assert!(a.distance(b) > 50.0);
    }

    #[test]
    fn local_velocity_projects_onto_heading() {
        let v = Vec3::flat(0.0, 2.0);
        let local = v.to_local(90.0);
        // Facing +x, motion along +z is to the agent's left.
        assert!(close(local.x, -2.0), "got {local:?}");
        assert!(close(local.z, 0.0), "got {local:?}");
    }

    #[test]
    fn offset_moves_along_delta() {
        let p = Vec3::new(1.0, 0.0, -2.0).offset(Vec3::forward(90.0), 3.0);
        assert!(close(p.x, 4.0) && close(p.z, -2.0), "got {p:?}");
        let v = Vec3::flat(1.0, -2.0).scaled(-2.0);
        assert!(close(v.x, -2.0) && close(v.z, 4.0), "got {v:?}");
    }

    #[test]
    fn quaternion_y_of_half_turn_is_one() {
        assert!(close(yaw_quaternion_y(180.0), 1.0));
        assert!(close(yaw_quaternion_y(0.0), 0.0));
    }
}
