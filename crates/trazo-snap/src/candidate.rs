//! Snap candidate classification and scoring data.

use trazo_math::Point3;
use trazo_scene::ScenePoint;

/// Base raw distance assigned to a synthesized `Face` candidate, so a
/// hit face is always available as a fallback but ranks below every
/// proximity candidate at equal zoom.
pub const FACE_BASE_DISTANCE: f64 = 1e3;

/// Base raw distance assigned to the free construction-plane
/// candidate: the anchor of last resort, ranked below faces.
pub const PLANE_BASE_DISTANCE: f64 = 1e4;

/// What a candidate snaps to.
///
/// A closed enum rather than a string tag: the selector and renderer
/// must handle every variant, and the compiler checks that they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// A mesh or curve vertex.
    Vertex,
    /// A point on an edge's segment extent.
    Edge,
    /// An edge midpoint.
    EdgeCenter,
    /// The crossing of two nearby edges' supporting lines.
    EdgeIntersection,
    /// The exact ray/surface hit point on a face.
    Face,
    /// A point projected onto a locked construction axis.
    Axis,
    /// The cursor ray intersected with a construction plane.
    Plane,
    /// A locked-axis point reconciled with an ordinary object snap.
    Mix,
}

impl SnapKind {
    /// Per-kind distance weight at the given viewport distance.
    ///
    /// Lower weight makes a kind stickier: vertices beat edge centers
    /// beat edge crossings beat everything else at equal raw distance.
    pub fn weight(&self, viewport_distance: f64) -> f64 {
        match self {
            SnapKind::Vertex => viewport_distance / 10.0,
            SnapKind::EdgeCenter => viewport_distance / 8.0,
            SnapKind::EdgeIntersection => viewport_distance / 5.0,
            SnapKind::Edge
            | SnapKind::Face
            | SnapKind::Axis
            | SnapKind::Plane
            | SnapKind::Mix => viewport_distance,
        }
    }

    /// Kinds that ignore the user's type toggles.
    pub fn always_enabled(&self) -> bool {
        matches!(self, SnapKind::Axis | SnapKind::Plane | SnapKind::Mix)
    }
}

/// Which family of scene geometry a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapGroup {
    /// Solid scene objects.
    Object,
    /// Wireframe-like objects (curves, point markers).
    Wireframe,
    /// The in-progress polyline's own committed points.
    Polyline,
    /// Retained measurement geometry.
    Measurement,
    /// Locked construction axes.
    Axis,
    /// Construction planes.
    Plane,
}

impl SnapGroup {
    /// Groups that ignore the user's group toggles.
    pub fn always_enabled(&self) -> bool {
        matches!(self, SnapGroup::Wireframe | SnapGroup::Axis | SnapGroup::Plane)
    }
}

/// Auxiliary geometry carried by a candidate for downstream stages
/// (edge-intersection synthesis, mixed-candidate derivation, guide
/// rendering).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapAux {
    /// No auxiliary geometry.
    None,
    /// The endpoints of the edge the candidate lies on.
    Edge {
        /// First endpoint.
        start: Point3,
        /// Second endpoint.
        end: Point3,
    },
    /// Index of the hit triangle within the source object's mesh.
    Face {
        /// Triangle index.
        triangle: usize,
    },
    /// The guide-line endpoints of the locked axis.
    AxisLine {
        /// Guide start.
        start: Point3,
        /// Guide end.
        end: Point3,
    },
}

/// A provisional snap point, not yet chosen.
///
/// Candidates live for one input-event cycle and are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapCandidate {
    /// The snap position and its owning object, if any.
    pub point: ScenePoint,
    /// Classification of what was snapped to.
    pub kind: SnapKind,
    /// Which geometry family produced the candidate.
    pub group: SnapGroup,
    /// Auxiliary geometry for downstream stages.
    pub aux: SnapAux,
    /// Unweighted distance from the cursor ray (or a fixed base
    /// distance for fallback kinds).
    pub raw_distance: f64,
}

impl SnapCandidate {
    /// Create a candidate.
    pub fn new(
        point: ScenePoint,
        kind: SnapKind,
        group: SnapGroup,
        aux: SnapAux,
        raw_distance: f64,
    ) -> Self {
        Self {
            point,
            kind,
            group,
            aux,
            raw_distance,
        }
    }

    /// The zoom-weighted distance used for ranking.
    pub fn weighted_distance(&self, viewport_distance: f64) -> f64 {
        self.raw_distance * self.kind.weight(viewport_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_ordering() {
        // At a fixed zoom, vertex weight < edge-center < crossing < edge.
        let d = 10.0;
        assert!(SnapKind::Vertex.weight(d) < SnapKind::EdgeCenter.weight(d));
        assert!(SnapKind::EdgeCenter.weight(d) < SnapKind::EdgeIntersection.weight(d));
        assert!(SnapKind::EdgeIntersection.weight(d) < SnapKind::Edge.weight(d));
    }

    #[test]
    fn test_weight_scales_with_zoom() {
        assert!(SnapKind::Vertex.weight(100.0) > SnapKind::Vertex.weight(10.0));
    }

    #[test]
    fn test_always_enabled_kinds_and_groups() {
        assert!(SnapKind::Axis.always_enabled());
        assert!(SnapKind::Plane.always_enabled());
        assert!(!SnapKind::Vertex.always_enabled());
        assert!(SnapGroup::Wireframe.always_enabled());
        assert!(!SnapGroup::Object.always_enabled());
    }

    #[test]
    fn test_fallback_distances_rank_below_proximity() {
        assert!(FACE_BASE_DISTANCE < PLANE_BASE_DISTANCE);
    }
}
