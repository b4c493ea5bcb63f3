#![warn(missing_docs)]

//! Math types for the trazo drafting kernel.
//!
//! Thin wrappers around nalgebra providing the types shared by every
//! stage of the snapping pipeline: points, vectors, directions, affine
//! transforms, and the tolerance constants used for coincidence,
//! parallelism, and coplanarity tests.

use nalgebra::{Matrix4, Rotation3, Unit, Vector2, Vector3, Vector4};

/// A point in 3D world space (meters).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D screen or parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vec3::new(dx, dy, dz)),
        }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Rotation about the world X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self::rotation_about_axis(&Dir3::new_unchecked(Vec3::x()), angle)
    }

    /// Rotation about the world Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation_about_axis(&Dir3::new_unchecked(Vec3::y()), angle)
    }

    /// Rotation about the world Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation_about_axis(&Dir3::new_unchecked(Vec3::z()), angle)
    }

    /// Rotation about an arbitrary axis through the origin by `angle` radians.
    ///
    /// Used by the constraint solver to spin a reference direction around
    /// the construction-plane pivot when evaluating candidate lock angles.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(axis, angle).to_homogeneous(),
        }
    }

    /// Compose: apply `other` first, then `self` (`self * other`).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (rotation/scale only, no translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for the snapping pipeline's geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in meters for derived geometry
    /// (coplanarity, plane membership).
    pub linear: f64,
    /// Cross-product / denominator tolerance below which two lines or a
    /// line and a plane count as parallel.
    pub parallel: f64,
    /// Distance below which two draft or guide points count as the same
    /// point.
    pub coincident: f64,
}

impl Tolerance {
    /// Default drafting tolerances.
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        parallel: 1e-4,
        coincident: 1e-4,
    };

    /// Check if two points are the same point within tolerance.
    pub fn points_coincident(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.coincident
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if a denominator or cross-product magnitude signals
    /// parallel geometry.
    pub fn is_parallel(&self, magnitude: f64) -> bool {
        magnitude.abs() < self.parallel
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
