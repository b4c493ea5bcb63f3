//! Axis-aligned bounding boxes in world and screen space.
//!
//! Used as a broadphase filter: only objects whose projected screen
//! box contains the cursor are handed to the per-object hit tests.

use trazo_math::{Point2, Point3, Transform};

/// Axis-aligned bounding box in 3D world space.
#[derive(Debug, Clone, Copy)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    /// Grow the box by `amount` in every direction.
    pub fn expand(&mut self, amount: f64) {
        for axis in 0..3 {
            self.min[axis] -= amount;
            self.max[axis] += amount;
        }
    }

    /// Check if the box contains at least one point.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|axis| self.min[axis] <= self.max[axis])
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// The eight corners of the box.
    ///
    /// A box that has degenerated to a point or a line still yields
    /// eight (coincident) corners; zero-size wireframe markers are
    /// valid snap targets and are not special-cased anywhere.
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Axis-aligned box covering this box under an affine transform.
    pub fn transformed(&self, t: &Transform) -> Aabb3 {
        let mut out = Aabb3::empty();
        for corner in self.corners() {
            out.include_point(&t.apply_point(&corner));
        }
        out
    }
}

/// Axis-aligned bounding box in 2D screen space (pixels, y-down).
#[derive(Debug, Clone, Copy)]
pub struct Aabb2 {
    /// Minimum corner (left/top).
    pub min: Point2,
    /// Maximum corner (right/bottom).
    pub max: Point2,
}

impl Aabb2 {
    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand the box to include a point.
    pub fn include_point(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Grow the box by `margin` pixels in every direction.
    pub fn expand(&mut self, margin: f64) {
        self.min.x -= margin;
        self.min.y -= margin;
        self.max.x += margin;
        self.max.y += margin;
    }

    /// Check if the box contains a point (edges count).
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Check if the box contains at least one point.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Width in pixels.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Project the corners of a world-space box to a screen-space box.
///
/// `view_projection` maps world space to clip space; `viewport` is the
/// screen size in pixels (origin top-left, y down). Corners behind the
/// projection (non-positive w) are skipped; if every corner is behind,
/// there is nothing on screen and `None` is returned.
pub fn project_aabb_to_screen(
    aabb: &Aabb3,
    view_projection: &Transform,
    viewport: (f64, f64),
) -> Option<Aabb2> {
    let (width, height) = viewport;
    let mut out = Aabb2::empty();
    for corner in aabb.corners() {
        let clip = view_projection.matrix
            * nalgebra::Vector4::new(corner.x, corner.y, corner.z, 1.0);
        if clip.w <= f64::MIN_POSITIVE {
            continue;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        out.include_point(&Point2::new(
            (ndc_x + 1.0) * 0.5 * width,
            (1.0 - ndc_y) * 0.5 * height,
        ));
    }
    out.is_valid().then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_and_center() {
        let mut bb = Aabb3::empty();
        assert!(!bb.is_valid());
        bb.include_point(&Point3::new(1.0, 2.0, 3.0));
        bb.include_point(&Point3::new(-1.0, 0.0, 1.0));
        assert!(bb.is_valid());
        assert!((bb.center() - Point3::new(0.0, 1.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_box_still_has_corners() {
        let bb = Aabb3::new(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0));
        assert!(bb.is_valid());
        for corner in bb.corners() {
            assert!((corner - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_transformed_box() {
        let bb = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let moved = bb.transformed(&Transform::translation(10.0, 0.0, 0.0));
        assert!((moved.min.x - 10.0).abs() < 1e-12);
        assert!((moved.max.x - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_aabb2_contains_with_margin() {
        let mut bb = Aabb2::empty();
        bb.include_point(&Point2::new(100.0, 100.0));
        bb.include_point(&Point2::new(200.0, 150.0));
        assert!(bb.contains(&Point2::new(150.0, 120.0)));
        assert!(!bb.contains(&Point2::new(95.0, 120.0)));
        bb.expand(10.0);
        assert!(bb.contains(&Point2::new(95.0, 120.0)));
    }

    #[test]
    fn test_project_identity_clip() {
        // With an identity "view projection", world coords are already
        // NDC: a unit box at the origin maps to the viewport center.
        let bb = Aabb3::new(
            Point3::new(-0.1, -0.1, 0.0),
            Point3::new(0.1, 0.1, 0.0),
        );
        let screen = project_aabb_to_screen(&bb, &Transform::identity(), (800.0, 600.0)).unwrap();
        assert!(screen.contains(&Point2::new(400.0, 300.0)));
        assert!(screen.width() < 100.0);
    }

    #[test]
    fn test_project_behind_camera() {
        // A "projection" whose w row yields -1 for every corner.
        let mut flip = Transform::identity();
        flip.matrix[(3, 3)] = -1.0;
        let bb = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let screen = project_aabb_to_screen(&bb, &flip, (800.0, 600.0));
        assert!(screen.is_none());
    }
}
