//! The drafting session: one mutable context through the whole
//! pipeline.

use log::debug;

use crate::{DraftingConfig, PolylineExport, SessionError};
use trazo_draft::{
    CommitOutcome, DraftPoint, DraftState, FieldSet, MeasureKind, Polyline,
};
use trazo_math::{Point2, Point3, Tolerance, Transform, Vec3};
use trazo_scene::{Scene, Viewport};
use trazo_snap::{
    cast_scene_ray, cycle_snaps, edge_candidates, resolve_constrained, select_snap,
    vertex_candidates, zoom_threshold, AxisLock, ConstraintState, PlaneLock, SnapCandidate,
    SnapGroup,
};
use trazo_units::{format_value, FieldKind, UnitError};

/// Everything the renderer needs for one frame, captured as plain
/// immutable data. The renderer never mutates session state; it can
/// be invoked between any two pipeline stages and always sees a
/// complete snapshot.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// The winning snap candidate, if any.
    pub best: Option<SnapCandidate>,
    /// How many candidates were ranked this event.
    pub ranked_count: usize,
    /// Guide-line endpoints of the active lock, for overlay drawing.
    pub guide: Option<(Point3, Point3)>,
    /// Committed polyline positions in drafting order.
    pub committed: Vec<Point3>,
    /// The pending point the next commit would append.
    pub preview: Option<Point3>,
    /// Polyline lifecycle state.
    pub state: DraftState,
    /// Formatted running length.
    pub total_length_label: String,
    /// Formatted enclosed area, present once the loop is closed.
    pub area_label: Option<String>,
}

/// The single mutable drafting-session context.
///
/// Exactly one polyline is drawn at a time; every pipeline stage
/// receives this context explicitly instead of reaching for shared
/// globals, which also makes the one-session assumption testable.
/// All state is discarded on [`cancel`](Self::cancel) or finalize.
#[derive(Debug)]
pub struct DraftingSession {
    config: DraftingConfig,
    polyline: Polyline,
    measurements: Vec<Polyline>,
    constraint: ConstraintState,
    fields: FieldSet,
    ranked: Vec<SnapCandidate>,
    guide: Option<(Point3, Point3)>,
    preview: Option<Point3>,
}

impl DraftingSession {
    /// Create a session with the given configuration.
    pub fn new(config: DraftingConfig) -> Self {
        let constraint = ConstraintState::at_elevation(config.default_elevation);
        Self {
            config,
            polyline: Polyline::default(),
            measurements: Vec::new(),
            constraint,
            fields: FieldSet::new(),
            ranked: Vec::new(),
            guide: None,
            preview: None,
        }
    }

    /// Start drafting a new polyline, discarding any unfinished one.
    pub fn begin(&mut self, kind: MeasureKind) {
        self.polyline = Polyline::new(kind);
        self.fields.clear();
        self.preview = None;
    }

    /// The active configuration.
    pub fn config(&self) -> &DraftingConfig {
        &self.config
    }

    /// Mutable access to the configuration (snap toggles, unit
    /// system, x-ray).
    pub fn config_mut(&mut self) -> &mut DraftingConfig {
        &mut self.config
    }

    /// The polyline being drafted.
    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    /// The active constraints.
    pub fn constraint(&self) -> &ConstraintState {
        &self.constraint
    }

    /// This event's ranked candidates (head is the current snap).
    pub fn ranked(&self) -> &[SnapCandidate] {
        &self.ranked
    }

    /// Toggle a single-axis lock.
    pub fn toggle_axis_lock(&mut self, axis: AxisLock) {
        self.constraint.toggle_axis_lock(axis);
    }

    /// Toggle a construction-plane lock.
    pub fn toggle_plane_lock(&mut self, plane: PlaneLock) {
        self.constraint.toggle_plane_lock(plane);
    }

    /// Pin or release a lock angle in degrees.
    pub fn set_angle_lock(&mut self, degrees: Option<f64>) {
        self.constraint.set_angle_lock(degrees);
    }

    /// Re-run the snapping pipeline for a pointer position.
    ///
    /// Candidate generation observes the committed-point list as of
    /// the start of this event; any commit happens strictly after
    /// selection, from the returned snapshot's preview point.
    pub fn pointer_moved(
        &mut self,
        cursor: Point2,
        scene: &Scene,
        viewport: &dyn Viewport,
    ) -> Result<FrameSnapshot, SessionError> {
        let ray = viewport.screen_ray(cursor)?;
        let threshold = zoom_threshold(viewport.viewport_distance());

        let mut candidates =
            cast_scene_ray(cursor, scene, viewport, &self.config.cast_options())?;

        candidates.extend(history_candidates(
            &ray,
            &self.polyline,
            threshold,
            SnapGroup::Polyline,
        ));
        for measurement in &self.measurements {
            candidates.extend(history_candidates(
                &ray,
                measurement,
                threshold,
                SnapGroup::Measurement,
            ));
        }

        let resolution = resolve_constrained(
            &ray,
            self.polyline.last_position(),
            &self.constraint,
            threshold,
            &self.config.solver_params(),
        );
        self.guide = resolution.guide;
        candidates.extend(resolution.candidates);

        self.ranked = select_snap(
            candidates,
            &self.config.snap,
            &self.constraint,
            viewport.viewport_distance(),
            self.polyline.last_position(),
        );
        self.preview = self.resolve_target();
        debug!(
            "pointer event: {} ranked, preview {:?}",
            self.ranked.len(),
            self.preview
        );
        Ok(self.snapshot())
    }

    /// Rotate the ranked list forward by one and update the preview.
    ///
    /// Under a lock, cycling stays within the Axis/Mix run.
    pub fn cycle_snap(&mut self) {
        cycle_snaps(&mut self.ranked, self.constraint.is_locked());
        self.preview = self.resolve_target();
    }

    /// Type into a numeric override field.
    ///
    /// A parse failure rejects the edit and keeps the previous valid
    /// value; the preview is re-resolved either way.
    pub fn field_input(&mut self, kind: FieldKind, text: &str) -> Result<(), UnitError> {
        let result = self
            .fields
            .input(kind, text, self.config.unit_system);
        self.preview = self.resolve_target();
        result
    }

    /// Commit the pending preview point into the polyline.
    ///
    /// Returns `None` when no target could be resolved this event
    /// (nothing under the cursor at all); otherwise the polyline's
    /// verdict. Accepted commits consume the numeric overrides.
    pub fn commit_point(&mut self) -> Option<CommitOutcome> {
        let target = self.preview?;
        let outcome = self.polyline.commit(target, self.config.unit_system);
        if outcome.accepted() {
            self.fields.clear();
        }
        Some(outcome)
    }

    /// Remove the last committed point.
    pub fn undo_point(&mut self) -> Option<DraftPoint> {
        self.polyline.undo()
    }

    /// Discard all session state: polyline, locks, fields, preview.
    pub fn cancel(&mut self) {
        self.polyline.clear();
        self.fields.clear();
        self.constraint.clear_locks();
        self.ranked.clear();
        self.guide = None;
        self.preview = None;
    }

    /// Hand the polyline to downstream consumers and reset for the
    /// next one.
    ///
    /// Tape polylines are retained as measurement geometry for the
    /// rest of the session and keep feeding the Measurement snap
    /// group.
    pub fn finalize(&mut self) -> Result<PolylineExport, SessionError> {
        let export = PolylineExport::from_polyline(&self.polyline)?;
        let kind = self.polyline.kind();
        let finished = std::mem::replace(&mut self.polyline, Polyline::new(kind));
        if kind == MeasureKind::Tape {
            self.measurements.push(finished);
        }
        self.fields.clear();
        self.preview = None;
        Ok(export)
    }

    /// Capture the current frame for the renderer.
    pub fn snapshot(&self) -> FrameSnapshot {
        let system = self.config.unit_system;
        FrameSnapshot {
            best: self.ranked.first().cloned(),
            ranked_count: self.ranked.len(),
            guide: self.guide,
            committed: self.polyline.positions(),
            preview: self.preview,
            state: self.polyline.state(),
            total_length_label: format_value(
                self.polyline.total_length(),
                FieldKind::Distance,
                system,
            ),
            area_label: self
                .polyline
                .is_closed()
                .then(|| format_value(self.polyline.area(), FieldKind::Area, system)),
        }
    }

    /// Resolve the pending target: numeric overrides applied over the
    /// winning candidate, clamped onto the active lock.
    fn resolve_target(&self) -> Option<Point3> {
        let mut target = self.ranked.first()?.point.position;
        let last = self.polyline.last_position();
        let anchor = last.unwrap_or_else(|| self.constraint.plane_origin());

        if let Some(field) = self.fields.editing() {
            match field.kind() {
                FieldKind::CoordX => target.x = field.value(),
                FieldKind::CoordY => target.y = field.value(),
                FieldKind::CoordZ => target.z = field.value(),
                FieldKind::Distance => {
                    if let Some(last) = last {
                        let toward = target - last;
                        if toward.norm() > Tolerance::DEFAULT.coincident {
                            target = last + toward.normalize() * field.value();
                        }
                    }
                }
                FieldKind::Angle => {
                    if let Some(last) = last {
                        let reach = (target - last).norm();
                        let direction = Transform::rotation_z(field.value().to_radians())
                            .apply_vec(&Vec3::x());
                        target = last + reach * direction;
                    }
                }
                FieldKind::Area => {}
            }
        }

        // Clamp onto the active lock: one coordinate is forced back to
        // the anchor's.
        if let Some(plane) = self.constraint.plane_lock() {
            match plane {
                PlaneLock::XY => target.z = anchor.z,
                PlaneLock::XZ => target.y = anchor.y,
                PlaneLock::YZ => target.x = anchor.x,
            }
        } else if let Some(axis) = self.constraint.axis_lock() {
            match axis {
                AxisLock::X => target.y = anchor.y,
                AxisLock::Y => target.x = anchor.x,
                AxisLock::Z => target.x = anchor.x,
            }
        }

        Some(target)
    }
}

/// Proximity candidates from a polyline's own committed geometry.
fn history_candidates(
    ray: &trazo_scene::Ray,
    polyline: &Polyline,
    threshold: f64,
    group: SnapGroup,
) -> Vec<SnapCandidate> {
    let positions = polyline.positions();
    let mut out = vertex_candidates(ray, &positions, threshold, group, None);
    let edges: Vec<(Point3, Point3)> = positions.windows(2).map(|w| (w[0], w[1])).collect();
    out.extend(edge_candidates(ray, &edges, threshold, group, None));
    out
}
