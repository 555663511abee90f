//! Points and fitted lines in detector space.
//!
//! Coordinates are in pad units for x and y and in time buckets for z,
//! exactly as they come out of the TPC reconstruction.

use std::ops::{Add, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position (or displacement) in detector space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct XyzPoint {
    /// X coordinate (pads).
    pub x: f64,
    /// Y coordinate (pads).
    pub y: f64,
    /// Z coordinate (time buckets).
    pub z: f64,
}

impl XyzPoint {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product, treating both points as vectors from the origin.
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared Euclidean norm.
    #[inline]
    #[must_use]
    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Distance to another point projected on the XY plane (`Lxy`).
    #[inline]
    #[must_use]
    pub fn distance_xy(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for XyzPoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for XyzPoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for XyzPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A 3D line fitted to a track: a point on the line and its direction.
///
/// The direction does not need to be normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    /// A point the line passes through (usually the charge centroid).
    pub point: XyzPoint,
    /// Direction vector.
    pub direction: XyzPoint,
}

impl Line {
    /// Creates a new line.
    #[must_use]
    pub fn new(point: XyzPoint, direction: XyzPoint) -> Self {
        Self { point, direction }
    }

    /// Returns the direction vector.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> XyzPoint {
        self.direction
    }

    /// Orthogonal projection of `p` onto the line.
    ///
    /// A degenerate (zero) direction projects everything onto `self.point`.
    #[must_use]
    pub fn projection_point_on_line(&self, p: &XyzPoint) -> XyzPoint {
        let norm2 = self.direction.norm_squared();
        if norm2 == 0.0 {
            return self.point;
        }
        let t = (*p - self.point).dot(&self.direction) / norm2;
        self.point + self.direction * t
    }
}
