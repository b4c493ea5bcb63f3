#![warn(missing_docs)]

//! trazo — interactive snapping and polyline drafting for
//! construction geometry.
//!
//! A designer drafts walls, slabs, and extrusion profiles by clicking
//! points in a 3D viewport; every pointer event re-derives a ranked
//! list of snap anchors (vertices, edges, midpoints, crossings,
//! faces, construction planes, locked axes) and feeds the winner into
//! a running polyline with live numeric override and closed-loop
//! measurement.
//!
//! # Example
//!
//! ```
//! use trazo::{DraftingConfig, DraftingSession, MeasureKind};
//! use trazo::{Camera, Point3, Scene, SceneObject, TriMesh, Viewport};
//!
//! let mut scene = Scene::new();
//! scene.add(SceneObject::solid("wall", TriMesh::cuboid(4.0, 0.3, 2.7)));
//!
//! let camera = Camera::perspective(
//!     Point3::new(2.0, -10.0, 1.5),
//!     Point3::new(2.0, 0.0, 1.5),
//!     (1280.0, 720.0),
//! );
//!
//! let mut session = DraftingSession::new(DraftingConfig::default());
//! session.begin(MeasureKind::Wall);
//!
//! // Hover the wall's lower-left corner and commit it.
//! let cursor = camera.project_to_screen(&Point3::origin()).unwrap();
//! session.pointer_moved(cursor, &scene, &camera).unwrap();
//! session.commit_point();
//! assert_eq!(session.polyline().points().len(), 1);
//! ```
//!
//! The session is the single mutable drafting context: exactly one
//! polyline is drawn at a time, all state is ephemeral, and the
//! renderer observes immutable [`FrameSnapshot`]s only.

mod config;
mod export;
mod session;

pub use config::DraftingConfig;
pub use export::PolylineExport;
pub use session::{DraftingSession, FrameSnapshot};

// The collaborating crates' public vocabulary, re-exported so hosts
// depend on `trazo` alone.
pub use trazo_draft::{
    CommitOutcome, DraftError, DraftPoint, DraftState, FieldSet, InputField, MeasureKind,
    Polyline,
};
pub use trazo_math::{Point2, Point3, Transform, Vec3};
pub use trazo_probe::{Aabb2, Aabb3};
pub use trazo_scene::{
    Camera, CurveData, ObjectKey, ObjectKind, Projection, Ray, Scene, SceneError, SceneObject,
    ScenePoint, TriMesh, Viewport,
};
pub use trazo_snap::{
    AxisLock, CastOptions, ConstraintState, PlaneLock, SnapAux, SnapCandidate, SnapFilter,
    SnapGroup, SnapKind,
};
pub use trazo_units::{format_value, parse_value, FieldKind, UnitError, UnitSystem};

use thiserror::Error;

/// Errors surfaced by the drafting facade.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A scene/viewport collaborator failed; the current event was
    /// aborted and session state is untouched.
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// An explicit drafting operation was invalid for the current
    /// state.
    #[error("draft error: {0}")]
    Draft(#[from] DraftError),

    /// Configuration text could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Export serialization failed.
    #[error("export error: {0}")]
    Export(#[from] serde_json::Error),
}
