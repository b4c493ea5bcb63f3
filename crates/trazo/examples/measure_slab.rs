//! Tape-measure a span with an axis lock and an imperial distance
//! override, the way a site survey would.

use anyhow::{anyhow, Result};
use trazo::{
    AxisLock, Camera, DraftingConfig, DraftingSession, FieldKind, MeasureKind, Point3, Scene,
    UnitSystem, Vec3, Viewport,
};

fn main() -> Result<()> {
    let scene = Scene::new();

    let mut camera = Camera::perspective(
        Point3::new(0.0, 0.0, 15.0),
        Point3::origin(),
        (1280.0, 720.0),
    );
    camera.up = Vec3::y();

    let mut config = DraftingConfig::default();
    config.unit_system = UnitSystem::Imperial;
    let mut session = DraftingSession::new(config);
    session.begin(MeasureKind::Tape);

    // First point on the construction plane at the origin.
    let cursor = camera
        .project_to_screen(&Point3::origin())
        .ok_or_else(|| anyhow!("origin off screen"))?;
    session.pointer_moved(cursor, &scene, &camera)?;
    session.commit_point();

    // Lock to the X axis, aim roughly along it, then type the exact
    // span.
    session.toggle_axis_lock(AxisLock::X);
    let cursor = camera
        .project_to_screen(&Point3::new(2.0, 0.05, 0.0))
        .ok_or_else(|| anyhow!("target off screen"))?;
    session.pointer_moved(cursor, &scene, &camera)?;
    session.field_input(FieldKind::Distance, "12'-6\"")?;
    session.commit_point();

    let polyline = session.polyline();
    let last = polyline.points().last().expect("committed point");
    println!(
        "measured {} along X (raw {:.4} m)",
        last.distance_label, last.distance_from_previous
    );
    println!("total: {}", session.snapshot().total_length_label);
    Ok(())
}
