//! Draft a wall outline by snapping to the corners of an existing
//! floor slab, then export it for the wall generator.

use anyhow::{anyhow, Result};
use trazo::{
    Camera, DraftingConfig, DraftingSession, MeasureKind, Point3, Scene, SceneObject, TriMesh,
    Viewport,
};

fn main() -> Result<()> {
    let mut scene = Scene::new();
    scene.add(SceneObject::solid("slab", TriMesh::cuboid(6.0, 4.0, 0.2)));

    let camera = Camera::perspective(
        Point3::new(3.0, -12.0, 8.0),
        Point3::new(3.0, 2.0, 0.0),
        (1280.0, 720.0),
    );

    let mut session = DraftingSession::new(DraftingConfig::default());
    session.begin(MeasureKind::Wall);

    // Trace the slab's top face, corner to corner; the last click
    // lands back on the first corner and closes the loop.
    let corners = [
        Point3::new(0.0, 0.0, 0.2),
        Point3::new(6.0, 0.0, 0.2),
        Point3::new(6.0, 4.0, 0.2),
        Point3::new(0.0, 4.0, 0.2),
        Point3::new(0.0, 0.0, 0.2),
    ];
    for corner in corners {
        let cursor = camera
            .project_to_screen(&corner)
            .ok_or_else(|| anyhow!("corner is off screen"))?;
        let snapshot = session.pointer_moved(cursor, &scene, &camera)?;
        if let Some(best) = &snapshot.best {
            println!(
                "snap {:?} ({:?}) at ({:.3}, {:.3}, {:.3})",
                best.kind,
                best.group,
                best.point.position.x,
                best.point.position.y,
                best.point.position.z
            );
        }
        session.commit_point();
    }

    let export = session.finalize()?;
    println!(
        "wall outline closed: {} m total, {} m2 enclosed",
        export.total_length, export.area
    );
    println!("{}", export.to_json_string()?);
    Ok(())
}
