//! World-space cursor rays.

use trazo_math::{Dir3, Point3, Vec3};
use trazo_probe::Aabb3;

/// A ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Reciprocal direction components, precomputed for slab tests.
    inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray; the direction is normalized.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let dir = Dir3::new_normalize(direction);
        Self {
            origin,
            direction: dir,
            inv_direction: Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z),
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Parameter of the closest point on the ray's supporting line to `p`.
    #[inline]
    pub fn closest_t(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.direction.as_ref())
    }

    /// Perpendicular distance from `p` to the ray's supporting line.
    ///
    /// This is the proximity measure every snap candidate is scored
    /// with before zoom weighting.
    #[inline]
    pub fn distance_to_point(&self, p: &Point3) -> f64 {
        (p - self.at(self.closest_t(p))).norm()
    }

    /// Slab-method ray/AABB intersection.
    ///
    /// Returns the entry and exit parameters `(t_min, t_max)` with
    /// `t_min >= 0`, or `None` when the ray misses the box or the box
    /// lies entirely behind the origin. Axis-aligned rays produce
    /// infinite reciprocals, which the slab comparisons handle.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        let mut t_min = 0.0_f64;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let inv = self.inv_direction[axis];
            let mut t0 = (aabb.min[axis] - self.origin[axis]) * inv;
            let mut t1 = (aabb.max[axis] - self.origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }
        Some((t_min, t_max))
    }
}
