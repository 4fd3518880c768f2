//! Three-axis vector used for positions, velocities, accelerations and jerks.

use core::fmt;
use core::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

use serde::Deserialize;

/// Cartesian 3-vector (X, Y, Z) in machine units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Vec3 {
    /// X component.
    #[serde(default)]
    pub x: f64,
    /// Y component.
    #[serde(default)]
    pub y: f64,
    /// Z component.
    #[serde(default)]
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Vector with all three components set to `v`.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        libm::sqrt(self.dot(self))
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f64::EPSILON {
            self / len
        } else {
            Self::ZERO
        }
    }

    /// Distance between two points.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Component-wise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(libm::fabs(self.x), libm::fabs(self.y), libm::fabs(self.z))
    }

    /// Smallest component.
    #[inline]
    pub fn min_element(self) -> f64 {
        self.x.min(self.y).min(self.z)
    }

    /// Iterate over the components in axis order.
    pub fn components(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Whether every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Whether every component lies within `eps` of `other`.
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        let d = (self - other).abs();
        d.x <= eps && d.y <= eps && d.z <= eps
    }

    /// Largest scalar `s` such that `|s * self_i| <= limits_i` on every axis.
    ///
    /// Axes where this vector has no component do not constrain the result.
    pub fn axis_capped(self, limits: Vec3) -> f64 {
        let dir = self.abs();
        let mut cap = f64::INFINITY;
        for (d, l) in dir.components().into_iter().zip(limits.components()) {
            if d > 1e-12 {
                cap = cap.min(l / d);
            }
        }
        cap
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_length_and_normalize() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!((v.length() - 5.0).abs() < 1e-12);
        assert!((v.normalized().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_axis_capped() {
        let dir = Vec3::new(1.0, 1.0, 0.0).normalized();
        let cap = dir.axis_capped(Vec3::new(100.0, 50.0, 1.0));
        // Y is the binding axis; Z has no component
        assert!((cap - 50.0 * core::f64::consts::SQRT_2).abs() < 1e-9);
    }
}
