//! Transform value types.
//!
//! These are plain values copied in and out of the live scene. No math
//! beyond what the study tools need (Euler construction, composition) is
//! provided.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

/// A 3-component vector (position, scale or Euler angles).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// An orientation stored as a quaternion.
///
/// Components are stored verbatim, so capturing and re-applying a rotation
/// reproduces it bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    fn from_axis_radians(axis: Vec3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Builds a rotation from Euler angles in degrees.
    ///
    /// The rotation is applied around Z first, then X, then Y.
    pub fn from_euler_degrees(x: f32, y: f32, z: f32) -> Self {
        let qx = Self::from_axis_radians(Vec3::new(1.0, 0.0, 0.0), x.to_radians());
        let qy = Self::from_axis_radians(Vec3::new(0.0, 1.0, 0.0), y.to_radians());
        let qz = Self::from_axis_radians(Vec3::new(0.0, 0.0, 1.0), z.to_radians());
        qy * qx * qz
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Mul for Quat {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Quat {
        Quat::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

/// Position, orientation and local scale of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    #[serde(rename = "scale")]
    pub local_scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Quat, b: Quat) -> bool {
        let eps = 1e-5;
        (a.x - b.x).abs() < eps
            && (a.y - b.y).abs() < eps
            && (a.z - b.z).abs() < eps
            && (a.w - b.w).abs() < eps
    }

    #[test]
    fn euler_zero_is_identity() {
        assert!(approx(Quat::from_euler_degrees(0.0, 0.0, 0.0), Quat::IDENTITY));
    }

    #[test]
    fn euler_single_axis() {
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert!(approx(
            Quat::from_euler_degrees(0.0, 90.0, 0.0),
            Quat::new(0.0, half, 0.0, half)
        ));
        assert!(approx(
            Quat::from_euler_degrees(90.0, 0.0, 0.0),
            Quat::new(half, 0.0, 0.0, half)
        ));
    }

    #[test]
    fn identity_is_neutral_for_multiplication() {
        let q = Quat::from_euler_degrees(10.0, 20.0, 30.0);
        assert!(approx(q * Quat::IDENTITY, q));
        assert!(approx(Quat::IDENTITY * q, q));
    }

    #[test]
    fn default_transform_has_unit_scale() {
        let t = Transform::default();
        assert_eq!(t.local_scale, Vec3::ONE);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }
}
