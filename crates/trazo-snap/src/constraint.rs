//! Axis/plane/angle locks and their candidate resolution.

use log::trace;

use crate::candidate::{SnapAux, SnapCandidate, SnapGroup, SnapKind, PLANE_BASE_DISTANCE};
use trazo_math::{Dir3, Point3, Tolerance, Transform, Vec3};
use trazo_probe::intersect_line_plane;
use trazo_scene::{Ray, ScenePoint};

/// A single-axis lock restricting drafting to a line through the
/// anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLock {
    /// World X.
    X,
    /// World Y.
    Y,
    /// World Z.
    Z,
}

impl AxisLock {
    /// Direction of the locked axis.
    pub fn direction(&self) -> Vec3 {
        match self {
            AxisLock::X => Vec3::x(),
            AxisLock::Y => Vec3::y(),
            AxisLock::Z => Vec3::z(),
        }
    }

    /// Normal of the construction plane the lock pivots in: X and Y
    /// locks draft in the ground plane, a Z lock drafts in the
    /// vertical XZ plane.
    pub fn pivot(&self) -> Vec3 {
        match self {
            AxisLock::X | AxisLock::Y => Vec3::z(),
            AxisLock::Z => Vec3::y(),
        }
    }
}

/// A plane lock restricting drafting to one of the three canonical
/// construction planes through the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneLock {
    /// Ground plane.
    XY,
    /// Vertical plane facing Y.
    XZ,
    /// Vertical plane facing X.
    YZ,
}

impl PlaneLock {
    /// Plane normal.
    pub fn normal(&self) -> Vec3 {
        match self {
            PlaneLock::XY => Vec3::z(),
            PlaneLock::XZ => Vec3::y(),
            PlaneLock::YZ => Vec3::x(),
        }
    }

    /// In-plane reference direction that lock angles are measured
    /// from.
    pub fn base_direction(&self) -> Vec3 {
        match self {
            PlaneLock::XY | PlaneLock::XZ => Vec3::x(),
            PlaneLock::YZ => Vec3::y(),
        }
    }
}

/// The active drafting constraints.
///
/// Axis and plane locks are mutually exclusive: setting one clears
/// the other. The state persists across input events until changed by
/// an explicit toggle.
#[derive(Debug, Clone)]
pub struct ConstraintState {
    axis_lock: Option<AxisLock>,
    plane_lock: Option<PlaneLock>,
    angle_lock: Option<f64>,
    plane_origin: Point3,
}

impl ConstraintState {
    /// Unconstrained state with the construction plane at the given
    /// elevation.
    pub fn at_elevation(elevation: f64) -> Self {
        Self {
            axis_lock: None,
            plane_lock: None,
            angle_lock: None,
            plane_origin: Point3::new(0.0, 0.0, elevation),
        }
    }

    /// The active axis lock.
    pub fn axis_lock(&self) -> Option<AxisLock> {
        self.axis_lock
    }

    /// The active plane lock.
    pub fn plane_lock(&self) -> Option<PlaneLock> {
        self.plane_lock
    }

    /// The pinned lock angle in degrees, if any.
    pub fn angle_lock(&self) -> Option<f64> {
        self.angle_lock
    }

    /// Origin of the default construction plane.
    pub fn plane_origin(&self) -> Point3 {
        self.plane_origin
    }

    /// Move the default construction plane origin.
    pub fn set_plane_origin(&mut self, origin: Point3) {
        self.plane_origin = origin;
    }

    /// Toggle an axis lock: pressing the same axis again releases it;
    /// any axis lock releases a plane lock.
    pub fn toggle_axis_lock(&mut self, axis: AxisLock) {
        self.plane_lock = None;
        self.axis_lock = if self.axis_lock == Some(axis) {
            None
        } else {
            Some(axis)
        };
    }

    /// Toggle a plane lock; any plane lock releases an axis lock.
    pub fn toggle_plane_lock(&mut self, plane: PlaneLock) {
        self.axis_lock = None;
        self.plane_lock = if self.plane_lock == Some(plane) {
            None
        } else {
            Some(plane)
        };
    }

    /// Pin or release a specific lock angle in degrees.
    pub fn set_angle_lock(&mut self, degrees: Option<f64>) {
        self.angle_lock = degrees;
    }

    /// Whether an axis or plane lock is active.
    pub fn is_locked(&self) -> bool {
        self.axis_lock.is_some() || self.plane_lock.is_some()
    }

    /// Release every lock, keeping the plane origin.
    pub fn clear_locks(&mut self) {
        self.axis_lock = None;
        self.plane_lock = None;
        self.angle_lock = None;
    }
}

impl Default for ConstraintState {
    fn default() -> Self {
        Self::at_elevation(0.0)
    }
}

/// Tunables for constraint resolution.
#[derive(Debug, Clone)]
pub struct SolverParams {
    /// Angular spacing of candidate lock directions in degrees.
    pub angle_step_deg: f64,
    /// Half-length of the rendered guide line in world units.
    pub guide_half_length: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            angle_step_deg: 30.0,
            guide_half_length: 1000.0,
        }
    }
}

/// Output of one constraint resolution: zero, one, or two candidates
/// (free plane, locked axis) plus the guide line for the renderer.
#[derive(Debug, Clone, Default)]
pub struct ConstraintResolution {
    /// Plane and/or Axis candidates, unranked.
    pub candidates: Vec<SnapCandidate>,
    /// Guide-line endpoints along the accepted lock direction.
    pub guide: Option<(Point3, Point3)>,
}

/// Resolve the active constraints against the cursor ray.
///
/// Always attempts the free reference-plane intersection; with a lock
/// active, additionally sweeps the candidate lock angles, accepts the
/// direction whose out-of-axis deviation of the cursor point is
/// smallest (and within the snap threshold), and projects the cursor
/// point onto that locked line.
///
/// The reference plane sits at `last_point` (or the construction
/// origin for an empty polyline). Its normal is the locked plane's
/// normal, the pivot plane of a locked axis, or the camera direction
/// when nothing is locked.
pub fn resolve_constrained(
    ray: &Ray,
    last_point: Option<Point3>,
    state: &ConstraintState,
    threshold: f64,
    params: &SolverParams,
) -> ConstraintResolution {
    let anchor = last_point.unwrap_or_else(|| state.plane_origin());

    let normal = if let Some(plane) = state.plane_lock() {
        plane.normal()
    } else if let Some(axis) = state.axis_lock() {
        axis.pivot()
    } else {
        // Camera-facing reference plane.
        -ray.direction.into_inner()
    };

    let mut resolution = ConstraintResolution::default();

    let Some(plane_point) = intersect_line_plane(&ray.origin, &ray.at(1.0), &anchor, &normal)
    else {
        // Ray parallel to the reference plane: nothing to anchor to
        // this event.
        return resolution;
    };

    if state.is_locked() {
        if let Some((point, direction, deviation)) =
            snap_to_lock_angles(&plane_point, &anchor, state, threshold, params.angle_step_deg)
        {
            let guide = (
                anchor - params.guide_half_length * direction,
                anchor + params.guide_half_length * direction,
            );
            resolution.guide = Some(guide);
            resolution.candidates.push(SnapCandidate::new(
                ScenePoint::free(point),
                SnapKind::Axis,
                SnapGroup::Axis,
                SnapAux::AxisLine {
                    start: guide.0,
                    end: guide.1,
                },
                deviation,
            ));
        }
    }

    resolution.candidates.push(SnapCandidate::new(
        ScenePoint::free(plane_point),
        SnapKind::Plane,
        SnapGroup::Plane,
        SnapAux::None,
        PLANE_BASE_DISTANCE,
    ));

    resolution
}

/// Sweep the candidate lock angles and project the cursor point onto
/// the best-passing locked line.
///
/// Returns the projected point, the accepted direction, and the
/// out-of-axis deviation of the cursor point from that line.
fn snap_to_lock_angles(
    cursor_point: &Point3,
    anchor: &Point3,
    state: &ConstraintState,
    threshold: f64,
    angle_step_deg: f64,
) -> Option<(Point3, Vec3, f64)> {
    let (pivot, base) = match (state.axis_lock(), state.plane_lock()) {
        (Some(axis), _) => (axis.pivot(), axis.direction()),
        (_, Some(plane)) => (plane.normal(), plane.base_direction()),
        _ => return None,
    };
    let pivot = Dir3::new_normalize(pivot);

    let offset = cursor_point - anchor;
    if offset.norm() < Tolerance::DEFAULT.coincident {
        return None;
    }

    let angles: Vec<f64> = match state.angle_lock() {
        Some(pinned) => vec![pinned],
        None => {
            let steps = (360.0 / angle_step_deg).round() as usize;
            (0..steps).map(|i| i as f64 * angle_step_deg).collect()
        }
    };

    let mut best: Option<(Point3, Vec3, f64)> = None;
    for degrees in angles {
        let direction = Transform::rotation_about_axis(&pivot, degrees.to_radians())
            .apply_vec(&base)
            .normalize();
        // Rotate the cursor offset into the locked frame: the along
        // component survives, everything else is the deviation that
        // must fall inside the snap threshold.
        let along = offset.dot(&direction);
        let deviation = (offset - along * direction).norm();
        if deviation > threshold {
            continue;
        }
        if best.as_ref().map_or(true, |(_, _, d)| deviation < *d) {
            best = Some((anchor + along * direction, direction, deviation));
        }
    }
    if let Some((point, _, deviation)) = &best {
        trace!("axis lock accepted at {:?} (dev {:.5})", point, deviation);
    }
    best
}

/// Reconcile a locked guide line with an ordinary object snap.
///
/// Intersects the guide against the three canonical world planes
/// through the object candidate's point, discards solutions
/// coincident with the last draft point, and returns the remainder
/// ordered by *descending* distance from the last draft point. The
/// selector prepends these one at a time, so the nearest usable
/// intersection ends up ranked first; the ordering is contractual,
/// not cosmetic.
pub fn resolve_mixed(
    object_point: &Point3,
    guide: (Point3, Point3),
    last_point: &Point3,
) -> Vec<Point3> {
    let tol = Tolerance::DEFAULT;
    let mut points: Vec<Point3> = Vec::new();
    for normal in [Vec3::x(), Vec3::y(), Vec3::z()] {
        let Some(p) = intersect_line_plane(&guide.0, &guide.1, object_point, &normal) else {
            continue;
        };
        if tol.points_coincident(&p, last_point) {
            continue;
        }
        if points.iter().any(|q| tol.points_coincident(q, &p)) {
            continue;
        }
        points.push(p);
    }
    points.sort_by(|a, b| {
        let da = (a - last_point).norm();
        let db = (b - last_point).norm();
        db.total_cmp(&da)
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trazo_math::Point2;
    use trazo_scene::{Camera, Viewport};

    #[test]
    fn test_lock_exclusivity() {
        let mut state = ConstraintState::default();
        state.toggle_axis_lock(AxisLock::X);
        assert_eq!(state.axis_lock(), Some(AxisLock::X));
        state.toggle_plane_lock(PlaneLock::XY);
        assert!(state.axis_lock().is_none());
        assert_eq!(state.plane_lock(), Some(PlaneLock::XY));
        state.toggle_axis_lock(AxisLock::Z);
        assert!(state.plane_lock().is_none());
        // Same axis again releases.
        state.toggle_axis_lock(AxisLock::Z);
        assert!(!state.is_locked());
    }

    #[test]
    fn test_free_plane_candidate_faces_camera() {
        let cam = Camera::perspective(
            Point3::new(0.0, -10.0, 0.0),
            Point3::origin(),
            (800.0, 600.0),
        );
        let ray = cam.screen_ray(Point2::new(400.0, 300.0)).unwrap();
        let state = ConstraintState::default();
        let res = resolve_constrained(&ray, None, &state, 0.1, &SolverParams::default());
        assert_eq!(res.candidates.len(), 1);
        let plane = &res.candidates[0];
        assert_eq!(plane.kind, SnapKind::Plane);
        // Camera-facing plane through the origin: the center ray
        // lands on the origin itself.
        assert!(plane.point.position.coords.norm() < 1e-9);
        assert!(res.guide.is_none());
    }

    #[test]
    fn test_axis_lock_projects_onto_line() {
        // X lock, anchor at the origin, cursor point (0.4, 0.05, 0),
        // threshold 0.1 => axis point (0.4, 0, 0).
        let ray = Ray::new(Point3::new(0.4, 0.05, 10.0), -Vec3::z());
        let mut state = ConstraintState::default();
        state.toggle_axis_lock(AxisLock::X);
        let res = resolve_constrained(
            &ray,
            Some(Point3::origin()),
            &state,
            0.1,
            &SolverParams::default(),
        );
        let axis = res
            .candidates
            .iter()
            .find(|c| c.kind == SnapKind::Axis)
            .expect("axis candidate");
        assert!((axis.point.position - Point3::new(0.4, 0.0, 0.0)).norm() < 1e-9);
        assert_relative_eq!(axis.raw_distance, 0.05, epsilon = 1e-9);
        let (start, end) = res.guide.unwrap();
        assert!((start - Point3::new(-1000.0, 0.0, 0.0)).norm() < 1e-6);
        assert!((end - Point3::new(1000.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_axis_lock_rejects_far_cursor() {
        // Cursor far off every 30-degree direction: no axis candidate,
        // plane fallback still produced.
        let ray = Ray::new(Point3::new(0.4, 0.18, 10.0), -Vec3::z());
        let mut state = ConstraintState::default();
        state.toggle_axis_lock(AxisLock::X);
        let res = resolve_constrained(
            &ray,
            Some(Point3::origin()),
            &state,
            0.01,
            &SolverParams::default(),
        );
        assert!(res.candidates.iter().all(|c| c.kind != SnapKind::Axis));
        assert!(res.candidates.iter().any(|c| c.kind == SnapKind::Plane));
    }

    #[test]
    fn test_angle_sweep_picks_30_degree_line() {
        // Cursor near the 30-degree direction in the ground plane.
        let expected = Vec3::new(30.0_f64.to_radians().cos(), 30.0_f64.to_radians().sin(), 0.0);
        let near = Point3::from(2.0 * expected + Vec3::new(0.0, 0.02, 0.0));
        let ray = Ray::new(near + 10.0 * Vec3::z(), -Vec3::z());
        let mut state = ConstraintState::default();
        state.toggle_axis_lock(AxisLock::X);
        let res = resolve_constrained(
            &ray,
            Some(Point3::origin()),
            &state,
            0.1,
            &SolverParams::default(),
        );
        let axis = res
            .candidates
            .iter()
            .find(|c| c.kind == SnapKind::Axis)
            .expect("axis candidate");
        let dir = axis.point.position.coords.normalize();
        assert!((dir - expected).norm() < 1e-3);
    }

    #[test]
    fn test_pinned_angle_overrides_sweep() {
        let mut state = ConstraintState::default();
        state.toggle_plane_lock(PlaneLock::XY);
        state.set_angle_lock(Some(45.0));
        // Cursor near the 30-degree line, far from 45: the pinned
        // angle alone is evaluated, so no candidate survives a tight
        // threshold...
        let near30 = Point3::new(1.732, 1.0, 0.0);
        let ray = Ray::new(near30 + 10.0 * Vec3::z(), -Vec3::z());
        let res = resolve_constrained(
            &ray,
            Some(Point3::origin()),
            &state,
            0.05,
            &SolverParams::default(),
        );
        assert!(res.candidates.iter().all(|c| c.kind != SnapKind::Axis));
        // ...while a cursor near 45 degrees snaps to it.
        let near45 = Point3::new(1.0, 1.02, 0.0);
        let ray = Ray::new(near45 + 10.0 * Vec3::z(), -Vec3::z());
        let res = resolve_constrained(
            &ray,
            Some(Point3::origin()),
            &state,
            0.05,
            &SolverParams::default(),
        );
        let axis = res
            .candidates
            .iter()
            .find(|c| c.kind == SnapKind::Axis)
            .expect("axis candidate");
        let dir = axis.point.position.coords.normalize();
        assert!((dir.x - dir.y).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_ordering_contract() {
        // Guide along X through the origin; object point off-axis.
        let guide = (Point3::new(-1000.0, 0.0, 0.0), Point3::new(1000.0, 0.0, 0.0));
        let object_point = Point3::new(3.0, 1.0, 0.0);
        let last = Point3::origin();
        let points = resolve_mixed(&object_point, guide, &last);
        // The X plane through (3,1,0) crosses the guide at (3,0,0);
        // the Y and Z planes contain or parallel the guide and are
        // discarded or coincide.
        assert!(!points.is_empty());
        // Descending distance from the last point.
        for pair in points.windows(2) {
            assert!(
                (pair[0] - last).norm() >= (pair[1] - last).norm(),
                "mixed points must be ordered far-to-near"
            );
        }
        assert!((points.last().unwrap() - Point3::new(3.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_mixed_discards_last_point_coincidence() {
        let guide = (Point3::new(-1000.0, 0.0, 0.0), Point3::new(1000.0, 0.0, 0.0));
        // Object point directly above the anchor: its X plane crosses
        // the guide exactly at the anchor, which must be discarded.
        let object_point = Point3::new(0.0, 2.0, 0.0);
        let points = resolve_mixed(&object_point, guide, &Point3::origin());
        assert!(points.is_empty());
    }
}
