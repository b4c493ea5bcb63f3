//! Scene object geometry: triangle meshes and wireframe curves.

use std::collections::BTreeSet;
use trazo_math::{Point3, Transform};
use trazo_probe::Aabb3;

/// A triangle mesh in object-local coordinates.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangles as vertex-index triples.
    pub triangles: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Create an empty mesh.
    pub fn new(vertices: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Axis-aligned box with one corner at the origin, spanning
    /// `(dx, dy, dz)`. The standard stand-in for walls and slabs in
    /// tests and demos.
    pub fn cuboid(dx: f64, dy: f64, dz: f64) -> Self {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(dx, 0.0, 0.0),
            Point3::new(dx, dy, 0.0),
            Point3::new(0.0, dy, 0.0),
            Point3::new(0.0, 0.0, dz),
            Point3::new(dx, 0.0, dz),
            Point3::new(dx, dy, dz),
            Point3::new(0.0, dy, dz),
        ];
        #[rustfmt::skip]
        let triangles = vec![
            [0, 2, 1], [0, 3, 2], // bottom
            [4, 5, 6], [4, 6, 7], // top
            [0, 1, 5], [0, 5, 4], // front
            [2, 3, 7], [2, 7, 6], // back
            [0, 4, 7], [0, 7, 3], // left
            [1, 2, 6], [1, 6, 5], // right
        ];
        Self {
            vertices,
            triangles,
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Unique undirected edges of the mesh, as canonically ordered
    /// vertex-index pairs (low index first).
    pub fn unique_edges(&self) -> Vec<(u32, u32)> {
        let mut edges = BTreeSet::new();
        for tri in &self.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                edges.insert(if a < b { (a, b) } else { (b, a) });
            }
        }
        edges.into_iter().collect()
    }

    /// Local-space bounding box of all vertices.
    pub fn local_aabb(&self) -> Aabb3 {
        let mut bb = Aabb3::empty();
        for v in &self.vertices {
            bb.include_point(v);
        }
        bb
    }
}

/// A wireframe-like object: an open or closed polyline curve, or a
/// single point marker. Snapped only by proximity, never by surface
/// hit.
#[derive(Debug, Clone, Default)]
pub struct CurveData {
    /// Curve points in object-local coordinates. A single point is a
    /// point marker with no edges.
    pub points: Vec<Point3>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl CurveData {
    /// Create a curve from points.
    pub fn new(points: Vec<Point3>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// A single-point marker.
    pub fn marker(point: Point3) -> Self {
        Self {
            points: vec![point],
            closed: false,
        }
    }

    /// Edges as index pairs into `points`.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        if self.points.len() < 2 {
            return Vec::new();
        }
        let mut out: Vec<(usize, usize)> = (0..self.points.len() - 1).map(|i| (i, i + 1)).collect();
        if self.closed && self.points.len() > 2 {
            out.push((self.points.len() - 1, 0));
        }
        out
    }

    /// Local-space bounding box of all points.
    ///
    /// A point marker yields a zero-volume box; that box is still a
    /// valid cull volume and is never skipped.
    pub fn local_aabb(&self) -> Aabb3 {
        let mut bb = Aabb3::empty();
        for p in &self.points {
            bb.include_point(p);
        }
        bb
    }
}

/// The geometric payload of a scene object.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// A solid with a triangulated surface: snapped by ray/surface hit
    /// first, then by proximity against the hit face.
    Solid(TriMesh),
    /// A wireframe-like object: snapped purely by proximity against
    /// its vertices and edges.
    Wireframe(CurveData),
}

/// One object in the host scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Display name (diagnostics only).
    pub name: String,
    /// Geometry payload.
    pub kind: ObjectKind,
    /// Object-local to world transform.
    pub transform: Transform,
    /// Whether the object participates in snapping at all.
    pub visible: bool,
}

impl SceneObject {
    /// Create a solid object with an identity transform.
    pub fn solid(name: impl Into<String>, mesh: TriMesh) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Solid(mesh),
            transform: Transform::identity(),
            visible: true,
        }
    }

    /// Create a wireframe object with an identity transform.
    pub fn wireframe(name: impl Into<String>, curve: CurveData) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Wireframe(curve),
            transform: Transform::identity(),
            visible: true,
        }
    }

    /// Place the object in the world.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Check whether this object has a fillable surface.
    pub fn is_solid(&self) -> bool {
        matches!(self.kind, ObjectKind::Solid(_))
    }

    /// World-space bounding box.
    pub fn world_aabb(&self) -> Aabb3 {
        let local = match &self.kind {
            ObjectKind::Solid(mesh) => mesh.local_aabb(),
            ObjectKind::Wireframe(curve) => curve.local_aabb(),
        };
        local.transformed(&self.transform)
    }

    /// All vertices in world space.
    pub fn world_vertices(&self) -> Vec<Point3> {
        let points: &[Point3] = match &self.kind {
            ObjectKind::Solid(mesh) => &mesh.vertices,
            ObjectKind::Wireframe(curve) => &curve.points,
        };
        points.iter().map(|p| self.transform.apply_point(p)).collect()
    }

    /// All unique edges in world space, as endpoint pairs.
    pub fn world_edges(&self) -> Vec<(Point3, Point3)> {
        match &self.kind {
            ObjectKind::Solid(mesh) => {
                let verts = self.world_vertices();
                mesh.unique_edges()
                    .into_iter()
                    .map(|(a, b)| (verts[a as usize], verts[b as usize]))
                    .collect()
            }
            ObjectKind::Wireframe(curve) => {
                let verts = self.world_vertices();
                curve
                    .edges()
                    .into_iter()
                    .map(|(a, b)| (verts[a], verts[b]))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_counts() {
        let mesh = TriMesh::cuboid(2.0, 3.0, 4.0);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.num_triangles(), 12);
        // A box has 12 geometric edges plus 6 face diagonals.
        assert_eq!(mesh.unique_edges().len(), 18);
    }

    #[test]
    fn test_cuboid_aabb() {
        let bb = TriMesh::cuboid(2.0, 3.0, 4.0).local_aabb();
        assert!((bb.max - Point3::new(2.0, 3.0, 4.0)).norm() < 1e-12);
        assert!(bb.min.coords.norm() < 1e-12);
    }

    #[test]
    fn test_curve_edges_open_closed() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let open = CurveData::new(points.clone(), false);
        assert_eq!(open.edges(), vec![(0, 1), (1, 2)]);
        let closed = CurveData::new(points, true);
        assert_eq!(closed.edges(), vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_marker_has_no_edges() {
        let marker = CurveData::marker(Point3::new(1.0, 2.0, 3.0));
        assert!(marker.edges().is_empty());
        let bb = marker.local_aabb();
        assert!(bb.is_valid());
        assert!((bb.min - bb.max).norm() < 1e-12);
    }

    #[test]
    fn test_world_transform_applies() {
        let obj = SceneObject::solid("wall", TriMesh::cuboid(1.0, 1.0, 1.0))
            .with_transform(Transform::translation(5.0, 0.0, 0.0));
        let bb = obj.world_aabb();
        assert!((bb.min.x - 5.0).abs() < 1e-12);
        assert!((bb.max.x - 6.0).abs() < 1e-12);
        assert!(obj
            .world_vertices()
            .iter()
            .all(|v| v.x >= 5.0 - 1e-12 && v.x <= 6.0 + 1e-12));
    }

    #[test]
    fn test_world_edges_count() {
        let obj = SceneObject::wireframe(
            "axis",
            CurveData::new(
                vec![Point3::origin(), Point3::new(10.0, 0.0, 0.0)],
                false,
            ),
        );
        assert_eq!(obj.world_edges().len(), 1);
    }
}
