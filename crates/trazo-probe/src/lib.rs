#![warn(missing_docs)]

//! Stateless geometric probes for the trazo drafting kernel.
//!
//! Every function here is pure: it takes geometry in, returns geometry
//! out, and reports unsolvable configurations (parallel lines, parallel
//! planes, degenerate input) as `None` rather than as errors. The
//! snapping pipeline treats those as "no candidate", never as faults.

mod bbox;

pub use bbox::{project_aabb_to_screen, Aabb2, Aabb3};

use trazo_math::{Dir3, Point3, Tolerance, Vec3};

/// Intersection of two supporting lines, with the parameter along each.
///
/// `t_a` and `t_b` are normalized to the defining segments: a value in
/// `[0, 1]` means the point lies within that segment's extent. Callers
/// decide whether out-of-range parameters are acceptable.
#[derive(Debug, Clone, Copy)]
pub struct LineHit {
    /// The intersection point (on line A).
    pub point: Point3,
    /// Parameter along segment A.
    pub t_a: f64,
    /// Parameter along segment B.
    pub t_b: f64,
}

/// Closest point on the line through `a` and `b` to `p`.
///
/// Returns the projected point and the parameter `t` along `a -> b`;
/// `t` outside `[0, 1]` means the closest point lies beyond a segment
/// endpoint, and callers decide whether to accept it.
pub fn closest_point_on_line(p: &Point3, a: &Point3, b: &Point3) -> (Point3, f64) {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < f64::MIN_POSITIVE {
        // Degenerate segment: every parameter is as good as t = 0.
        return (*a, 0.0);
    }
    let t = (p - a).dot(&d) / len_sq;
    (a + t * d, t)
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
pub fn distance_to_line(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let (closest, _) = closest_point_on_line(p, a, b);
    (p - closest).norm()
}

/// Intersect the line through `p0` and `p1` with a plane.
///
/// Returns `None` when the line is parallel to the plane (direction
/// perpendicular to the normal within tolerance).
pub fn intersect_line_plane(
    p0: &Point3,
    p1: &Point3,
    plane_origin: &Point3,
    plane_normal: &Vec3,
) -> Option<Point3> {
    let dir = p1 - p0;
    let denom = dir.dot(plane_normal);
    if Tolerance::DEFAULT.is_parallel(denom / (dir.norm() * plane_normal.norm()).max(f64::MIN_POSITIVE)) {
        return None;
    }
    let t = (plane_origin - p0).dot(plane_normal) / denom;
    Some(p0 + t * dir)
}

/// Intersect the supporting lines of two 3D segments.
///
/// The two lines are treated as coplanar-projected 2D lines for the
/// purpose of construction-axis reasoning: the returned point is the
/// point on line A closest to line B, which for (near-)coplanar
/// segments is their projected crossing. Returns `None` when the lines
/// are parallel within tolerance.
pub fn intersect_lines(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> Option<LineHit> {
    let da = a1 - a0;
    let db = b1 - b0;
    let cross = da.cross(&db);
    let scale = (da.norm() * db.norm()).max(f64::MIN_POSITIVE);
    if Tolerance::DEFAULT.is_parallel(cross.norm() / scale) {
        return None;
    }
    let r = b0 - a0;
    let denom = cross.norm_squared();
    let t_a = r.cross(&db).dot(&cross) / denom;
    let t_b = r.cross(&da).dot(&cross) / denom;
    Some(LineHit {
        point: a0 + t_a * da,
        t_a,
        t_b,
    })
}

/// Intersect two planes, each given by an origin point and a normal.
///
/// Returns a point on the intersection line and the line's direction,
/// or `None` when the planes are parallel within tolerance.
pub fn intersect_planes(
    origin_a: &Point3,
    normal_a: &Vec3,
    origin_b: &Point3,
    normal_b: &Vec3,
) -> Option<(Point3, Dir3)> {
    let dir = normal_a.cross(normal_b);
    let scale = (normal_a.norm() * normal_b.norm()).max(f64::MIN_POSITIVE);
    if Tolerance::DEFAULT.is_parallel(dir.norm() / scale) {
        return None;
    }
    // Solve for the point closest to the origin satisfying both plane
    // equations, expressed in the basis (normal_a, normal_b, dir).
    let d_a = normal_a.dot(&origin_a.coords);
    let d_b = normal_b.dot(&origin_b.coords);
    let denom = dir.norm_squared();
    let point = (d_a * normal_b.cross(&dir) + d_b * dir.cross(normal_a)) / denom;
    Some((Point3::from(point), Dir3::new_normalize(dir)))
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    let scale = a.norm() * b.norm();
    if scale < f64::MIN_POSITIVE {
        return 0.0;
    }
    let cos = (a.dot(b) / scale).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Signed angle from `a` to `b` around `normal`, in degrees, in `(-180, 180]`.
pub fn signed_angle_between(a: &Vec3, b: &Vec3, normal: &Vec3) -> f64 {
    let unsigned = angle_between(a, b);
    if a.cross(b).dot(normal) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Check if two scalars are equal within `tolerance`.
pub fn is_approximately(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Check whether all points lie on the plane defined by the first three
/// non-collinear points, within `tolerance`.
///
/// Fewer than four points are trivially coplanar, as is a fully
/// collinear point set (no unique plane to violate).
pub fn is_coplanar(points: &[Point3], tolerance: f64) -> bool {
    if points.len() < 4 {
        return true;
    }
    let origin = points[0];
    // Find a point pair spanning a usable plane normal.
    let mut normal = None;
    for i in 1..points.len() {
        let u = points[i] - origin;
        if u.norm() < tolerance {
            continue;
        }
        for p in points.iter().skip(i + 1) {
            let n = u.cross(&(p - origin));
            if n.norm() > tolerance {
                normal = Some(n.normalize());
                break;
            }
        }
        if normal.is_some() {
            break;
        }
    }
    let Some(normal) = normal else {
        return true;
    };
    points
        .iter()
        .all(|p| (p - origin).dot(&normal).abs() < tolerance)
}
