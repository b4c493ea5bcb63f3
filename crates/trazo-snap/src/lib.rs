#![warn(missing_docs)]

//! Snap candidate generation, constraint solving, and ranking for the
//! trazo drafting kernel.
//!
//! On every input event the pipeline re-derives, from the 2D cursor
//! and the current scene, a ranked list of 3D anchor points:
//!
//! 1. [`cast_scene_ray`] culls the visible-object set by projected
//!    bounding box, surface-hits the surviving solids (with a retry
//!    ring for rays that graze between triangles), and extracts
//!    proximity candidates (vertices, edges, edge midpoints) within
//!    a zoom-adaptive threshold.
//! 2. [`resolve_constrained`] projects the cursor onto the active
//!    construction plane and, under an axis/plane/angle lock, onto
//!    the best-matching locked direction, producing the guide line
//!    for the renderer.
//! 3. [`select_snap`] merges, filters, zoom-weights, and ranks all
//!    candidates, synthesizing edge intersections and lock-reconciled
//!    [`SnapKind::Mix`] candidates; [`cycle_snaps`] rotates the
//!    ranking on user request.
//!
//! Everything is synchronous and stateless between events except the
//! explicit [`ConstraintState`]; geometric degeneracies yield "no
//! candidate", never errors.

mod candidate;
mod constraint;
mod raycast;
mod select;

pub use candidate::{
    SnapAux, SnapCandidate, SnapGroup, SnapKind, FACE_BASE_DISTANCE, PLANE_BASE_DISTANCE,
};
pub use constraint::{
    resolve_constrained, resolve_mixed, AxisLock, ConstraintResolution, ConstraintState,
    PlaneLock, SolverParams,
};
pub use raycast::{
    cast_scene_ray, edge_candidates, vertex_candidates, zoom_threshold, CastOptions,
};
pub use select::{cycle_snaps, select_snap, SnapFilter};
