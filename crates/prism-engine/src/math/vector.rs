use core::ops::{Add, Mul, Neg, Sub};

use super::Matrix4;

/// Lengths below this are treated as zero by [`Vector3::normalize`].
pub const NORMALIZE_EPSILON: f32 = 0.001;

/// 3D vector in world units.
///
/// Immutable value type: every operation returns a new vector.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const FORWARD: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// Vectors shorter than [`NORMALIZE_EPSILON`] yield [`Vector3::ZERO`].
    pub fn normalize(self) -> Vector3 {
        let length = self.length();
        if length < NORMALIZE_EPSILON {
            return Vector3::ZERO;
        }
        Vector3::new(self.x / length, self.y / length, self.z / length)
    }

    #[inline]
    pub fn scale(self, scalar: f32) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Component-wise product.
    #[inline]
    pub fn mul_components(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    #[inline]
    pub fn cross(self, rhs: Vector3) -> Vector3 {
        Vector3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[inline]
    pub fn dot(self, rhs: Vector3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Transforms `self` as a point (`w = 1`) by `m`, i.e. `v · M`.
    ///
    /// The fourth output column is dropped; no perspective divide happens here.
    pub fn transform(self, m: &Matrix4) -> Vector3 {
        let e = m.as_array();
        Vector3::new(
            self.x * e[0] + self.y * e[4] + self.z * e[8] + e[12],
            self.x * e[1] + self.y * e[5] + self.z * e[9] + e[13],
            self.x * e[2] + self.y * e[6] + self.z * e[10] + e[14],
        )
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    #[inline]
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    #[inline]
    fn sub(self, rhs: Vector3) -> Vector3 {
        self + (-rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    #[inline]
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: f32) -> Vector3 {
        self.scale(rhs)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vector3::new(x, y, z)
    }
}
