//! Candidate filtering, ranking, and cycling.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::candidate::{SnapAux, SnapCandidate, SnapGroup, SnapKind};
use crate::constraint::{resolve_mixed, ConstraintState};
use trazo_math::Point3;
use trazo_scene::ScenePoint;

/// Two `Edge` candidates whose snap points fall within this distance
/// of each other are treated as a crossing and yield a synthesized
/// `EdgeIntersection`.
const EDGE_JOIN_DISTANCE: f64 = 0.1;

/// User-facing visibility toggles for snap groups and types.
///
/// The Wireframe, Axis, and Plane groups, and the Axis/Plane/Mix
/// kinds, are always implicitly enabled and have no toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapFilter {
    /// Snap to solid scene objects.
    pub objects: bool,
    /// Snap to the in-progress polyline's own points.
    pub polylines: bool,
    /// Snap to retained measurement geometry.
    pub measurements: bool,
    /// Vertex snapping.
    pub vertices: bool,
    /// Edge snapping.
    pub edges: bool,
    /// Edge-midpoint snapping.
    pub edge_centers: bool,
    /// Edge-crossing snapping.
    pub edge_intersections: bool,
    /// Face snapping.
    pub faces: bool,
}

impl Default for SnapFilter {
    fn default() -> Self {
        Self {
            objects: true,
            polylines: true,
            measurements: true,
            vertices: true,
            edges: true,
            edge_centers: true,
            edge_intersections: true,
            faces: true,
        }
    }
}

impl SnapFilter {
    /// Whether a candidate group passes the user toggles.
    pub fn group_enabled(&self, group: SnapGroup) -> bool {
        match group {
            SnapGroup::Object => self.objects,
            SnapGroup::Polyline => self.polylines,
            SnapGroup::Measurement => self.measurements,
            _ => group.always_enabled(),
        }
    }

    /// Whether a candidate kind passes the user toggles.
    pub fn kind_enabled(&self, kind: SnapKind) -> bool {
        match kind {
            SnapKind::Vertex => self.vertices,
            SnapKind::Edge => self.edges,
            SnapKind::EdgeCenter => self.edge_centers,
            SnapKind::EdgeIntersection => self.edge_intersections,
            SnapKind::Face => self.faces,
            _ => kind.always_enabled(),
        }
    }
}

/// Filter, weight, rank, and lock-promote the merged candidate list.
///
/// The returned list is the event's ranked snap order: index 0 is the
/// current snap read by the renderer and the drafting engine. The
/// function is pure; identical inputs rank identically.
pub fn select_snap(
    candidates: Vec<SnapCandidate>,
    filter: &SnapFilter,
    state: &ConstraintState,
    viewport_distance: f64,
    last_point: Option<Point3>,
) -> Vec<SnapCandidate> {
    let mut list: Vec<SnapCandidate> = candidates
        .into_iter()
        .filter(|c| filter.group_enabled(c.group) && filter.kind_enabled(c.kind))
        .collect();

    if filter.edge_intersections {
        if let Some(crossing) = synthesize_edge_intersection(&list) {
            list.insert(0, crossing);
        }
    }

    list.sort_by(|a, b| {
        a.weighted_distance(viewport_distance)
            .total_cmp(&b.weighted_distance(viewport_distance))
    });

    if state.is_locked() {
        promote_lock_candidates(&mut list, last_point);
    }

    if let Some(best) = list.first() {
        debug!(
            "snap: {:?} at {:?} ({} ranked)",
            best.kind,
            best.point.position,
            list.len()
        );
    }
    list
}

/// Detect two edge candidates converging on the same spot and
/// synthesize the exact crossing of their supporting lines.
fn synthesize_edge_intersection(list: &[SnapCandidate]) -> Option<SnapCandidate> {
    let edges: Vec<&SnapCandidate> = list
        .iter()
        .filter(|c| c.kind == SnapKind::Edge)
        .collect();
    for (i, a) in edges.iter().enumerate() {
        for b in edges.iter().skip(i + 1) {
            if (a.point.position - b.point.position).norm() > EDGE_JOIN_DISTANCE {
                continue;
            }
            let (SnapAux::Edge {
                start: a0,
                end: a1,
            }, SnapAux::Edge {
                start: b0,
                end: b1,
            }) = (a.aux, b.aux)
            else {
                continue;
            };
            let Some(hit) = trazo_probe::intersect_lines(&a0, &a1, &b0, &b1) else {
                continue;
            };
            return Some(SnapCandidate::new(
                ScenePoint {
                    position: hit.point,
                    source: a.point.source,
                },
                SnapKind::EdgeIntersection,
                a.group,
                SnapAux::None,
                a.raw_distance.min(b.raw_distance),
            ));
        }
    }
    None
}

/// With a lock active, the axis owns the ranking: mixed candidates
/// first (nearest usable intersection at the head), then the plain
/// axis point, then everything else in weighted order.
fn promote_lock_candidates(list: &mut Vec<SnapCandidate>, last_point: Option<Point3>) {
    let Some(axis_index) = list.iter().position(|c| c.kind == SnapKind::Axis) else {
        return;
    };
    let head_is_constraint = matches!(
        list[0].kind,
        SnapKind::Axis | SnapKind::Plane | SnapKind::Mix
    );
    let axis = list.remove(axis_index);

    let mut front: Vec<SnapCandidate> = Vec::new();
    if !head_is_constraint {
        if let (SnapAux::AxisLine { start, end }, Some(last), Some(best)) =
            (axis.aux, last_point, list.first())
        {
            // resolve_mixed returns far-to-near; inserting each at the
            // front leaves the nearest intersection ranked first.
            for point in resolve_mixed(&best.point.position, (start, end), &last) {
                front.insert(
                    0,
                    SnapCandidate::new(
                        ScenePoint {
                            position: point,
                            source: best.point.source,
                        },
                        SnapKind::Mix,
                        SnapGroup::Axis,
                        axis.aux,
                        axis.raw_distance,
                    ),
                );
            }
        }
    }
    front.push(axis);
    front.append(list);
    *list = front;
}

/// Rotate the ranked list forward by one.
///
/// With a lock active, cycling is restricted to the leading Axis/Mix
/// run so the user can tab between the valid intersections of a
/// locked line without losing the lock or disturbing the remainder of
/// the ranking.
pub fn cycle_snaps(list: &mut [SnapCandidate], lock_active: bool) {
    if list.len() < 2 {
        return;
    }
    if lock_active {
        let run = list
            .iter()
            .take_while(|c| matches!(c.kind, SnapKind::Axis | SnapKind::Mix))
            .count();
        if run >= 2 {
            list[..run].rotate_left(1);
        }
    } else {
        list.rotate_left(1);
    }
}
