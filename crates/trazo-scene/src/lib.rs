#![warn(missing_docs)]

//! Scene and viewport contracts for the trazo drafting kernel.
//!
//! The snapping pipeline does not own the host's scene graph or its
//! rendering camera; it consumes them through the types here:
//!
//! - [`Scene`] / [`SceneObject`]: the visible-object set, solids with
//!   triangle meshes and wireframe-like curve/marker objects
//! - [`Ray`]: a world-space cursor ray with a slab AABB test
//! - [`Viewport`]: the camera contract (`screen_ray`, projection,
//!   zoom distance), with [`Camera`] as a concrete implementation for
//!   tests, demos, and hosts without their own camera model
//! - [`ScenePoint`]: a 3D position plus its owning-object identity
//!
//! All session state built on top of these types is ephemeral; nothing
//! in this crate is persisted.

mod camera;
mod object;
mod ray;

pub use camera::{Camera, Projection, Viewport};
pub use object::{CurveData, ObjectKind, SceneObject, TriMesh};
pub use ray::Ray;

use thiserror::Error;
use trazo_math::Point3;

slotmap::new_key_type! {
    /// Stable handle to an object in a [`Scene`].
    pub struct ObjectKey;
}

/// Errors from scene/viewport collaborators.
///
/// These are the only faults that abort an input event; everything
/// geometric recovers locally with "no candidate" sentinels.
#[derive(Debug, Clone, Error)]
pub enum SceneError {
    /// No active viewport is available to cast rays from.
    #[error("no active viewport")]
    NoViewport,

    /// The view-projection matrix is singular and cannot be inverted.
    #[error("view-projection matrix is singular")]
    DegenerateView,

    /// The cursor ray direction collapsed to zero length.
    #[error("cursor ray has zero direction")]
    ZeroRayDirection,
}

/// A 3D position plus the identity of the object it came from.
///
/// Produced by the ray caster and the geometry probes; immutable once
/// produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePoint {
    /// World-space position.
    pub position: Point3,
    /// Owning object, if the point lies on scene geometry.
    pub source: Option<ObjectKey>,
}

impl ScenePoint {
    /// A point not associated with any scene object (construction
    /// planes, locked axes, draft points).
    pub fn free(position: Point3) -> Self {
        Self {
            position,
            source: None,
        }
    }

    /// A point on a scene object.
    pub fn on_object(position: Point3, source: ObjectKey) -> Self {
        Self {
            position,
            source: Some(source),
        }
    }
}

/// The visible-object set handed to the snapping pipeline.
///
/// Objects are stored in a slotmap so handles stay valid across
/// removals of unrelated objects. Scenes are expected to hold tens to
/// low hundreds of objects; every query below is a linear scan.
#[derive(Debug, Default)]
pub struct Scene {
    objects: slotmap::SlotMap<ObjectKey, SceneObject>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning its stable handle.
    pub fn add(&mut self, object: SceneObject) -> ObjectKey {
        self.objects.insert(object)
    }

    /// Remove an object by handle.
    pub fn remove(&mut self, key: ObjectKey) -> Option<SceneObject> {
        self.objects.remove(key)
    }

    /// Look up an object by handle.
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Mutable lookup by handle.
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    /// Iterate over all objects.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    /// Iterate over the objects currently visible in the viewport.
    pub fn visible_objects(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.objects.iter().filter(|(_, o)| o.visible)
    }

    /// Number of objects (visible or not).
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
