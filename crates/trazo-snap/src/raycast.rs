//! Scene ray casting: from a 2D cursor to an unranked candidate list.
//!
//! Culling is deliberately simple: project every visible object's
//! bounding box to screen space and keep the objects whose box (plus a
//! pixel margin) contains the cursor. Scenes here are tens to low
//! hundreds of objects, so brute-force hit testing after that filter
//! is cheap and predictable.

use log::{debug, trace};
use std::f64::consts::FRAC_1_SQRT_2;

use crate::candidate::{SnapAux, SnapCandidate, SnapGroup, SnapKind, FACE_BASE_DISTANCE};
use trazo_math::{Point2, Point3, Tolerance};
use trazo_probe::{intersect_lines, project_aabb_to_screen};
use trazo_scene::{ObjectKey, ObjectKind, Ray, Scene, SceneError, ScenePoint, Viewport};

/// Zoom-adaptive snap threshold: world-space candidate acceptance
/// distance scaling with how zoomed-out the view is, giving constant
/// pixel-apparent stickiness.
pub fn zoom_threshold(viewport_distance: f64) -> f64 {
    viewport_distance / 100.0
}

/// Tunables for a scene cast.
#[derive(Debug, Clone)]
pub struct CastOptions {
    /// Keep surface hits for every solid instead of only the nearest.
    pub x_ray: bool,
    /// Pixel margin added around projected bounding boxes before the
    /// cursor containment test.
    pub cull_margin_px: f64,
    /// Pixel radius of the retry ring used when a primary cast grazes
    /// between triangles.
    pub offset_ring_px: f64,
    /// Perspective-mode cull: objects entirely farther than this from
    /// the eye are skipped.
    pub max_view_distance: f64,
}

impl Default for CastOptions {
    fn default() -> Self {
        Self {
            x_ray: false,
            cull_margin_px: 10.0,
            offset_ring_px: 3.0,
            max_view_distance: 200.0,
        }
    }
}

/// Unit pixel offsets of the retry ring around the cursor. The count
/// and pattern are tuned for on-screen reliability, not contractual.
const OFFSET_RING: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// A ray/surface hit on a solid object.
#[derive(Debug, Clone, Copy)]
struct SurfaceHit {
    t: f64,
    point: Point3,
    triangle: usize,
}

/// Möller–Trumbore ray/triangle intersection; returns the ray
/// parameter of the hit.
fn intersect_triangle(ray: &Ray, corners: &[Point3; 3]) -> Option<f64> {
    const EPS: f64 = 1e-9;
    let e1 = corners[1] - corners[0];
    let e2 = corners[2] - corners[0];
    let pvec = ray.direction.as_ref().cross(&e2);
    let det = e1.dot(&pvec);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = ray.origin - corners[0];
    let u = tvec.dot(&pvec) * inv_det;
    if !(-EPS..=1.0 + EPS).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(&e1);
    let v = ray.direction.as_ref().dot(&qvec) * inv_det;
    if v < -EPS || u + v > 1.0 + EPS {
        return None;
    }
    let t = e2.dot(&qvec) * inv_det;
    (t > EPS).then_some(t)
}

/// Nearest hit of a ray against a triangle soup in world space.
fn ray_mesh_hit(
    ray: &Ray,
    world_verts: &[Point3],
    triangles: &[[u32; 3]],
) -> Option<SurfaceHit> {
    let mut best: Option<SurfaceHit> = None;
    for (i, tri) in triangles.iter().enumerate() {
        let corners = [
            world_verts[tri[0] as usize],
            world_verts[tri[1] as usize],
            world_verts[tri[2] as usize],
        ];
        if let Some(t) = intersect_triangle(ray, &corners) {
            if best.map_or(true, |b| t < b.t) {
                best = Some(SurfaceHit {
                    t,
                    point: ray.at(t),
                    triangle: i,
                });
            }
        }
    }
    best
}

/// Vertex proximity candidates against the cursor ray.
pub fn vertex_candidates(
    ray: &Ray,
    vertices: &[Point3],
    threshold: f64,
    group: SnapGroup,
    source: Option<ObjectKey>,
) -> Vec<SnapCandidate> {
    vertices
        .iter()
        .filter_map(|v| {
            let d = ray.distance_to_point(v);
            (d < threshold).then(|| {
                SnapCandidate::new(
                    ScenePoint {
                        position: *v,
                        source,
                    },
                    SnapKind::Vertex,
                    group,
                    SnapAux::None,
                    d,
                )
            })
        })
        .collect()
}

/// Edge and edge-midpoint proximity candidates against the cursor ray.
///
/// A midpoint is accepted under the plain proximity test. An `Edge`
/// candidate additionally requires the ray's crossing with the edge's
/// supporting line to fall within the edge's segment extent, not just
/// its infinite line.
pub fn edge_candidates(
    ray: &Ray,
    edges: &[(Point3, Point3)],
    threshold: f64,
    group: SnapGroup,
    source: Option<ObjectKey>,
) -> Vec<SnapCandidate> {
    let mut out = Vec::new();
    let ray_b = ray.at(1.0);
    for &(start, end) in edges {
        if (end - start).norm() < Tolerance::DEFAULT.coincident {
            // Zero-length edge: nothing to snap along.
            continue;
        }
        let aux = SnapAux::Edge { start, end };

        let mid = start + (end - start) * 0.5;
        let d_mid = ray.distance_to_point(&mid);
        if d_mid < threshold {
            out.push(SnapCandidate::new(
                ScenePoint {
                    position: mid,
                    source,
                },
                SnapKind::EdgeCenter,
                group,
                aux,
                d_mid,
            ));
        }

        if let Some(hit) = intersect_lines(&ray.origin, &ray_b, &start, &end) {
            if (0.0..=1.0).contains(&hit.t_b) {
                let on_edge = start + hit.t_b * (end - start);
                let d = ray.distance_to_point(&on_edge);
                if d < threshold {
                    out.push(SnapCandidate::new(
                        ScenePoint {
                            position: on_edge,
                            source,
                        },
                        SnapKind::Edge,
                        group,
                        aux,
                        d,
                    ));
                }
            }
        }
    }
    out
}

/// Cast the cursor into the scene and collect unranked snap
/// candidates from every surviving object.
///
/// Solids are surface-hit first (retrying around the cursor when the
/// primary ray grazes between triangles) and contribute proximity
/// candidates from the hit triangle plus a low-priority `Face`
/// fallback at the exact hit point. Wireframe-like objects skip the
/// surface test and contribute proximity candidates from all of their
/// vertices and edges.
pub fn cast_scene_ray(
    cursor: Point2,
    scene: &Scene,
    viewport: &dyn Viewport,
    options: &CastOptions,
) -> Result<Vec<SnapCandidate>, SceneError> {
    let view_proj = viewport.view_projection();
    let viewport_size = viewport.viewport_size();
    let threshold = zoom_threshold(viewport.viewport_distance());
    let eye = viewport.eye_position();

    // Broadphase: projected-box containment, then the perspective
    // distance cull. Degenerate (zero-volume) boxes still project and
    // still pass: point markers are valid snap targets.
    let mut survivors = Vec::new();
    let mut total = 0usize;
    for (key, object) in scene.visible_objects() {
        total += 1;
        let world_aabb = object.world_aabb();
        if !world_aabb.is_valid() {
            continue;
        }
        let Some(mut screen_box) = project_aabb_to_screen(&world_aabb, &view_proj, viewport_size)
        else {
            continue;
        };
        screen_box.expand(options.cull_margin_px);
        if !screen_box.contains(&cursor) {
            continue;
        }
        if viewport.is_perspective() {
            let nearest = world_aabb
                .corners()
                .iter()
                .map(|c| (c - eye).norm())
                .fold(f64::INFINITY, f64::min);
            if nearest > options.max_view_distance {
                trace!("cull {:?}: {:.1} beyond view distance", key, nearest);
                continue;
            }
        }
        survivors.push((key, object));
    }
    debug!("broadphase kept {} of {} objects", survivors.len(), total);

    let ray = viewport.screen_ray(cursor)?;
    let retry_rays: Vec<Ray> = OFFSET_RING
        .iter()
        .filter_map(|(dx, dy)| {
            viewport
                .screen_ray(Point2::new(
                    cursor.x + dx * options.offset_ring_px,
                    cursor.y + dy * options.offset_ring_px,
                ))
                .ok()
        })
        .collect();

    // Surface hits on solids.
    let mut hits: Vec<(ObjectKey, &trazo_scene::SceneObject, SurfaceHit)> = Vec::new();
    for &(key, object) in &survivors {
        let ObjectKind::Solid(mesh) = &object.kind else {
            continue;
        };
        let world_verts = object.world_vertices();
        let mut hit = ray_mesh_hit(&ray, &world_verts, &mesh.triangles);
        if hit.is_none() {
            for retry in &retry_rays {
                hit = ray_mesh_hit(retry, &world_verts, &mesh.triangles);
                if hit.is_some() {
                    break;
                }
            }
        }
        if let Some(hit) = hit {
            hits.push((key, object, hit));
        }
    }
    if !options.x_ray && hits.len() > 1 {
        hits.sort_by(|a, b| a.2.t.total_cmp(&b.2.t));
        hits.truncate(1);
    }

    let mut candidates = Vec::new();
    for (key, object, hit) in &hits {
        let ObjectKind::Solid(mesh) = &object.kind else {
            continue;
        };
        let corners = mesh.triangle(hit.triangle);
        let world: [Point3; 3] = [
            object.transform.apply_point(&corners[0]),
            object.transform.apply_point(&corners[1]),
            object.transform.apply_point(&corners[2]),
        ];
        candidates.extend(vertex_candidates(
            &ray,
            &world,
            threshold,
            SnapGroup::Object,
            Some(*key),
        ));
        candidates.extend(edge_candidates(
            &ray,
            &[
                (world[0], world[1]),
                (world[1], world[2]),
                (world[2], world[0]),
            ],
            threshold,
            SnapGroup::Object,
            Some(*key),
        ));
        candidates.push(SnapCandidate::new(
            ScenePoint::on_object(hit.point, *key),
            SnapKind::Face,
            SnapGroup::Object,
            SnapAux::Face {
                triangle: hit.triangle,
            },
            FACE_BASE_DISTANCE,
        ));
    }

    // Wireframe-like objects: proximity only, over all of their
    // geometry.
    for &(key, object) in &survivors {
        if object.is_solid() {
            continue;
        }
        let verts = object.world_vertices();
        let edges = object.world_edges();
        candidates.extend(vertex_candidates(
            &ray,
            &verts,
            threshold,
            SnapGroup::Wireframe,
            Some(key),
        ));
        candidates.extend(edge_candidates(
            &ray,
            &edges,
            threshold,
            SnapGroup::Wireframe,
            Some(key),
        ));
    }

    debug!("cast produced {} candidates", candidates.len());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trazo_math::{Transform, Vec3};
    use trazo_scene::{Camera, CurveData, SceneObject, TriMesh};

    fn unit_cube_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(SceneObject::solid("cube", TriMesh::cuboid(1.0, 1.0, 1.0)));
        scene
    }

    fn camera() -> Camera {
        Camera::perspective(
            Point3::new(0.5, -10.0, 0.5),
            Point3::new(0.5, 0.5, 0.5),
            (800.0, 600.0),
        )
    }

    #[test]
    fn test_cursor_over_vertex_yields_vertex_candidate() {
        let scene = unit_cube_scene();
        let cam = camera();
        let vertex = Point3::new(1.0, 0.0, 0.0);
        let cursor = cam.project_to_screen(&vertex).unwrap();
        let candidates =
            cast_scene_ray(cursor, &scene, &cam, &CastOptions::default()).unwrap();
        let hit = candidates
            .iter()
            .find(|c| c.kind == SnapKind::Vertex)
            .expect("vertex candidate");
        assert!((hit.point.position - vertex).norm() < 1e-6);
        assert!(hit.raw_distance < zoom_threshold(cam.viewport_distance()));
    }

    #[test]
    fn test_face_fallback_always_present_on_hit() {
        let scene = unit_cube_scene();
        let cam = camera();
        // Middle of the front face: no vertex or edge nearby.
        let cursor = cam
            .project_to_screen(&Point3::new(0.5, 0.0, 0.5))
            .unwrap();
        let candidates =
            cast_scene_ray(cursor, &scene, &cam, &CastOptions::default()).unwrap();
        let face = candidates
            .iter()
            .find(|c| c.kind == SnapKind::Face)
            .expect("face candidate");
        assert!((face.raw_distance - FACE_BASE_DISTANCE).abs() < 1e-12);
        assert!((face.point.position.y).abs() < 1e-6);
    }

    #[test]
    fn test_cursor_off_object_yields_nothing() {
        let scene = unit_cube_scene();
        let cam = camera();
        let candidates = cast_scene_ray(
            Point2::new(10.0, 10.0),
            &scene,
            &cam,
            &CastOptions::default(),
        )
        .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_wireframe_snaps_by_proximity() {
        let mut scene = Scene::new();
        scene.add(SceneObject::wireframe(
            "guide",
            CurveData::new(
                vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
                false,
            ),
        ));
        let cam = Camera::perspective(
            Point3::new(1.0, -10.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            (800.0, 600.0),
        );
        // Cursor over the curve midpoint.
        let cursor = cam.project_to_screen(&Point3::new(1.0, 0.0, 0.0)).unwrap();
        let candidates =
            cast_scene_ray(cursor, &scene, &cam, &CastOptions::default()).unwrap();
        assert!(candidates.iter().any(|c| c.kind == SnapKind::EdgeCenter
            && c.group == SnapGroup::Wireframe));
        assert!(candidates.iter().all(|c| c.kind != SnapKind::Face));
    }

    #[test]
    fn test_point_marker_is_snappable() {
        // Zero-volume bounding box must not be special-cased away.
        let mut scene = Scene::new();
        scene.add(SceneObject::wireframe(
            "marker",
            CurveData::marker(Point3::new(0.5, 0.0, 0.5)),
        ));
        let cam = camera();
        let cursor = cam.project_to_screen(&Point3::new(0.5, 0.0, 0.5)).unwrap();
        let candidates =
            cast_scene_ray(cursor, &scene, &cam, &CastOptions::default()).unwrap();
        assert!(candidates.iter().any(|c| c.kind == SnapKind::Vertex));
    }

    #[test]
    fn test_xray_keeps_hits_on_all_solids() {
        let mut scene = Scene::new();
        scene.add(SceneObject::solid("front", TriMesh::cuboid(1.0, 1.0, 1.0)));
        scene.add(
            SceneObject::solid("back", TriMesh::cuboid(1.0, 1.0, 1.0))
                .with_transform(Transform::translation(0.0, 5.0, 0.0)),
        );
        let cam = camera();
        let cursor = cam
            .project_to_screen(&Point3::new(0.5, 0.0, 0.5))
            .unwrap();

        let solid_faces = |opts: &CastOptions| {
            cast_scene_ray(cursor, &scene, &cam, opts)
                .unwrap()
                .into_iter()
                .filter(|c| c.kind == SnapKind::Face)
                .count()
        };
        assert_eq!(solid_faces(&CastOptions::default()), 1);
        let xray = CastOptions {
            x_ray: true,
            ..CastOptions::default()
        };
        assert_eq!(solid_faces(&xray), 2);
    }

    #[test]
    fn test_perspective_distance_cull() {
        let mut scene = Scene::new();
        scene.add(
            SceneObject::solid("far", TriMesh::cuboid(1.0, 1.0, 1.0))
                .with_transform(Transform::translation(0.0, 400.0, 0.0)),
        );
        let cam = camera();
        let cursor = cam
            .project_to_screen(&Point3::new(0.5, 400.0, 0.5))
            .unwrap();
        let candidates =
            cast_scene_ray(cursor, &scene, &cam, &CastOptions::default()).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_threshold_monotonicity() {
        // Zooming out never rejects a previously accepted candidate.
        let ray = Ray::new(Point3::new(0.0, -10.0, 0.0), Vec3::y());
        let vertex = [Point3::new(0.05, 0.0, 0.0)];
        let near = vertex_candidates(&ray, &vertex, zoom_threshold(10.0), SnapGroup::Object, None);
        let far = vertex_candidates(&ray, &vertex, zoom_threshold(50.0), SnapGroup::Object, None);
        assert_eq!(near.len(), 1);
        assert_eq!(far.len(), 1);
    }

    #[test]
    fn test_edge_candidate_requires_segment_extent() {
        // Ray crosses the supporting line beyond the segment: midpoint
        // may still be far, and no Edge candidate may appear.
        let ray = Ray::new(Point3::new(5.0, -10.0, 0.0), Vec3::y());
        let edges = [(Point3::origin(), Point3::new(1.0, 0.0, 0.0))];
        let out = edge_candidates(&ray, &edges, 0.5, SnapGroup::Object, None);
        assert!(out.iter().all(|c| c.kind != SnapKind::Edge));
    }
}
