//! The drafted polyline and its commit state machine.

use serde::{Deserialize, Serialize};
use trazo_math::{Point3, Tolerance, Vec3};
use trazo_probe::{angle_between, is_coplanar};
use trazo_units::{format_value, FieldKind, UnitSystem};

/// Coplanarity tolerance for area measurement.
const COPLANAR_TOLERANCE: f64 = 1e-6;

/// What the finished polyline will be consumed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    /// Wall axis for the wall generator.
    #[default]
    Wall,
    /// Slab outline for the slab generator.
    Slab,
    /// Extrusion profile.
    Profile,
    /// Pure measurement (tape); retained as reference geometry.
    Tape,
}

/// Lifecycle of the drafted polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftState {
    /// No points committed yet.
    #[default]
    Empty,
    /// Points are being appended.
    Drafting,
    /// The loop closed back onto the first point; no further input is
    /// accepted, but the polyline stays readable for export.
    Closed,
}

/// Result of attempting to commit a point.
///
/// Rejections are expected outcomes of cursor motion (hovering the
/// previous point, doubling back); they change nothing and surface no
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The point was appended.
    Committed,
    /// The point closed the loop; the polyline is now terminal for
    /// input.
    ClosedLoop,
    /// Rejected: coincident with the immediately preceding point.
    Coincident,
    /// Rejected: the new segment doubles back along the previous
    /// segment's support line.
    Backtrack,
    /// Rejected: the polyline is already closed.
    AlreadyClosed,
}

impl CommitOutcome {
    /// Whether the commit changed the polyline.
    pub fn accepted(&self) -> bool {
        matches!(self, CommitOutcome::Committed | CommitOutcome::ClosedLoop)
    }
}

/// One committed point of the polyline.
///
/// Created on commit and never mutated afterwards; undo removes it
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftPoint {
    /// World-space position.
    pub position: Point3,
    /// Distance from the previous point in meters (0 for the first
    /// point).
    pub distance_from_previous: f64,
    /// Unsigned angle in degrees between this segment and the
    /// previous one (measured from world X for the first segment).
    pub angle_from_previous: f64,
    /// Formatted distance in the unit system active at commit time.
    pub distance_label: String,
    /// Formatted angle.
    pub angle_label: String,
    /// Position in the polyline.
    pub index: usize,
}

/// An ordered polyline being drafted; insertion order is the drafted
/// path.
///
/// Invariant: no two consecutive points are coincident. A closed
/// polyline repeats its first point as the last.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    points: Vec<DraftPoint>,
    kind: MeasureKind,
    state: DraftState,
    total_length: f64,
}

impl Polyline {
    /// Start an empty polyline for the given consumer.
    pub fn new(kind: MeasureKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// What the finished polyline will be consumed as.
    pub fn kind(&self) -> MeasureKind {
        self.kind
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DraftState {
        self.state
    }

    /// The committed points in drafting order.
    pub fn points(&self) -> &[DraftPoint] {
        &self.points
    }

    /// Committed positions only.
    pub fn positions(&self) -> Vec<Point3> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// The most recently committed position.
    pub fn last_position(&self) -> Option<Point3> {
        self.points.last().map(|p| p.position)
    }

    /// Direction of the most recent segment, if one exists.
    pub fn last_direction(&self) -> Option<Vec3> {
        if self.points.len() < 2 {
            return None;
        }
        let a = self.points[self.points.len() - 2].position;
        let b = self.points[self.points.len() - 1].position;
        let d = b - a;
        (d.norm() > 0.0).then(|| d.normalize())
    }

    /// Sum of all segment lengths.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Whether the loop has closed.
    pub fn is_closed(&self) -> bool {
        self.state == DraftState::Closed
    }

    /// Try to commit a resolved target position.
    ///
    /// Validation order: a point coincident with the first point of a
    /// 3+ point polyline always closes the loop, regardless of the
    /// other rules; otherwise a point coincident with the previous
    /// point is rejected, and a segment doubling back along the
    /// previous segment's support line is rejected.
    pub fn commit(&mut self, target: Point3, system: UnitSystem) -> CommitOutcome {
        let tol = Tolerance::DEFAULT;

        if self.state == DraftState::Closed {
            return CommitOutcome::AlreadyClosed;
        }

        // Closing back onto the first point is the closing signal and
        // bypasses the coincidence/backtrack rules.
        if self.points.len() >= 3
            && tol.points_coincident(&target, &self.points[0].position)
        {
            let first = self.points[0].position;
            self.append(first, system);
            self.state = DraftState::Closed;
            return CommitOutcome::ClosedLoop;
        }

        if let Some(last) = self.last_position() {
            if tol.points_coincident(&target, &last) {
                return CommitOutcome::Coincident;
            }
            if let Some(prev_dir) = self.last_direction() {
                let new_dir = (target - last).normalize();
                // Anti-parallel and on the same support line: a
                // degenerate back-and-forth edge.
                let doubles_back = angle_between(&new_dir, &-prev_dir) < 1e-3;
                let on_support_line = prev_dir.cross(&new_dir).norm() < tol.parallel;
                if doubles_back && on_support_line {
                    return CommitOutcome::Backtrack;
                }
            }
        }

        self.append(target, system);
        self.state = DraftState::Drafting;
        CommitOutcome::Committed
    }

    fn append(&mut self, position: Point3, system: UnitSystem) {
        let (distance, angle) = match self.last_position() {
            None => (0.0, 0.0),
            Some(last) => {
                let segment = position - last;
                let reference = self.last_direction().unwrap_or_else(Vec3::x);
                (segment.norm(), angle_between(&segment, &reference))
            }
        };
        self.points.push(DraftPoint {
            position,
            distance_from_previous: distance,
            angle_from_previous: angle,
            distance_label: format_value(distance, FieldKind::Distance, system),
            angle_label: format_value(angle, FieldKind::Angle, system),
            index: self.points.len(),
        });
        self.total_length += distance;
    }

    /// Remove the last committed point. Undoing the closing point
    /// reopens the polyline.
    pub fn undo(&mut self) -> Option<DraftPoint> {
        let removed = self.points.pop()?;
        self.total_length -= removed.distance_from_previous;
        self.state = if self.points.is_empty() {
            self.total_length = 0.0;
            DraftState::Empty
        } else {
            DraftState::Drafting
        };
        Some(removed)
    }

    /// Discard everything and return to the empty state.
    pub fn clear(&mut self) {
        self.points.clear();
        self.total_length = 0.0;
        self.state = DraftState::Empty;
    }

    /// Enclosed area of a closed, coplanar polyline in square meters.
    ///
    /// Computed as the magnitude of the polygon's vector area (half
    /// the sum of cross products around the loop), which projects the
    /// loop onto its best-fit plane normal. Open or non-coplanar
    /// polylines report 0.
    pub fn area(&self) -> f64 {
        if self.state != DraftState::Closed {
            return 0.0;
        }
        // The closing point repeats the first; drop it for the loop.
        let loop_points: Vec<Point3> = self.points[..self.points.len() - 1]
            .iter()
            .map(|p| p.position)
            .collect();
        if loop_points.len() < 3 || !is_coplanar(&loop_points, COPLANAR_TOLERANCE) {
            return 0.0;
        }
        let mut cross_sum = Vec3::zeros();
        for i in 0..loop_points.len() {
            let a = loop_points[i].coords;
            let b = loop_points[(i + 1) % loop_points.len()].coords;
            cross_sum += a.cross(&b);
        }
        0.5 * cross_sum.norm()
    }
}
