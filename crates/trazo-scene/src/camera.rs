//! The viewport contract and a concrete camera.

use crate::{Ray, SceneError};
use nalgebra::{Matrix4, Vector4};
use trazo_math::{Point2, Point3, Transform, Vec3};

/// The camera/viewport contract consumed by the snapping pipeline.
///
/// Hosts with their own camera model implement this trait; tests and
/// demos use [`Camera`]. A failing `screen_ray` aborts the current
/// input event and leaves all session state untouched.
pub trait Viewport {
    /// Cast a world-space ray through a cursor position (pixels,
    /// origin top-left, y down).
    fn screen_ray(&self, cursor: Point2) -> Result<Ray, SceneError>;

    /// Combined view-projection transform (world to clip space).
    fn view_projection(&self) -> Transform;

    /// Viewport size in pixels.
    fn viewport_size(&self) -> (f64, f64);

    /// Zoom measure: how much world space the view currently spans.
    ///
    /// The snap threshold scales with this value so snap stickiness
    /// stays constant in apparent (pixel) terms as the user zooms.
    fn viewport_distance(&self) -> f64;

    /// Whether the projection is perspective (enables the far-object
    /// distance cull).
    fn is_perspective(&self) -> bool;

    /// World-space position of the camera eye.
    fn eye_position(&self) -> Point3;

    /// Project a world point to screen pixels; `None` if it lies
    /// behind the projection.
    fn project_to_screen(&self, p: &Point3) -> Option<Point2> {
        let (width, height) = self.viewport_size();
        let clip = self.view_projection().matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        if clip.w <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Point2::new(
            (clip.x / clip.w + 1.0) * 0.5 * width,
            (1.0 - clip.y / clip.w) * 0.5 * height,
        ))
    }
}

/// Projection mode of a [`Camera`].
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    /// Perspective projection with a vertical field of view in radians.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f64,
    },
    /// Orthographic projection spanning `2 * half_height` world units
    /// vertically.
    Orthographic {
        /// Half the vertical world extent of the view.
        half_height: f64,
    },
}

/// A concrete look-at camera implementing [`Viewport`].
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position.
    pub eye: Point3,
    /// Orbit target (what the camera looks at).
    pub target: Point3,
    /// Up vector.
    pub up: Vec3,
    /// Projection mode.
    pub projection: Projection,
    /// Viewport size in pixels.
    pub viewport: (f64, f64),
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
}

impl Camera {
    /// Perspective camera with a 45° vertical field of view.
    pub fn perspective(eye: Point3, target: Point3, viewport: (f64, f64)) -> Self {
        Self {
            eye,
            target,
            up: Vec3::z(),
            projection: Projection::Perspective {
                fov_y: 45.0_f64.to_radians(),
            },
            viewport,
            near: 0.01,
            far: 10_000.0,
        }
    }

    /// Orthographic camera spanning `2 * half_height` world units
    /// vertically.
    pub fn orthographic(
        eye: Point3,
        target: Point3,
        half_height: f64,
        viewport: (f64, f64),
    ) -> Self {
        Self {
            eye,
            target,
            up: Vec3::z(),
            projection: Projection::Orthographic { half_height },
            viewport,
            near: 0.01,
            far: 10_000.0,
        }
    }

    fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    fn projection_matrix(&self) -> Matrix4<f64> {
        let aspect = self.viewport.0 / self.viewport.1;
        match self.projection {
            Projection::Perspective { fov_y } => {
                Matrix4::new_perspective(aspect, fov_y, self.near, self.far)
            }
            Projection::Orthographic { half_height } => {
                let half_width = half_height * aspect;
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

impl Viewport for Camera {
    fn screen_ray(&self, cursor: Point2) -> Result<Ray, SceneError> {
        let (width, height) = self.viewport;
        let inv = self
            .view_projection()
            .matrix
            .try_inverse()
            .ok_or(SceneError::DegenerateView)?;

        let ndc_x = 2.0 * cursor.x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.y / height;

        // Unproject the cursor at the near and far clip planes; the
        // ray runs from one through the other.
        let unproject = |ndc_z: f64| -> Result<Point3, SceneError> {
            let v = inv * Vector4::new(ndc_x, ndc_y, ndc_z, 1.0);
            if v.w.abs() < f64::MIN_POSITIVE {
                return Err(SceneError::DegenerateView);
            }
            Ok(Point3::new(v.x / v.w, v.y / v.w, v.z / v.w))
        };
        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;

        let dir = far - near;
        if dir.norm() < 1e-12 {
            return Err(SceneError::ZeroRayDirection);
        }
        Ok(Ray::new(near, dir))
    }

    fn view_projection(&self) -> Transform {
        Transform {
            matrix: self.projection_matrix() * self.view_matrix(),
        }
    }

    fn viewport_size(&self) -> (f64, f64) {
        self.viewport
    }

    fn viewport_distance(&self) -> f64 {
        match self.projection {
            Projection::Perspective { .. } => (self.eye - self.target).norm(),
            Projection::Orthographic { half_height } => 2.0 * half_height,
        }
    }

    fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    fn eye_position(&self) -> Point3 {
        self.eye
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_camera() -> Camera {
        Camera::perspective(
            Point3::new(0.0, -10.0, 0.0),
            Point3::origin(),
            (800.0, 600.0),
        )
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let cam = test_camera();
        let ray = cam.screen_ray(Point2::new(400.0, 300.0)).unwrap();
        // Ray through the viewport center runs from the eye toward
        // the target.
        let to_target = (cam.target - cam.eye).normalize();
        assert!((ray.direction.as_ref() - to_target).norm() < 1e-6);
        assert!(ray.distance_to_point(&cam.target) < 1e-6);
    }

    #[test]
    fn test_project_target_to_center() {
        let cam = test_camera();
        let px = cam.project_to_screen(&cam.target).unwrap();
        assert_relative_eq!(px.x, 400.0, epsilon = 1e-6);
        assert_relative_eq!(px.y, 300.0, epsilon = 1e-6);
    }

    #[test]
    fn test_project_behind_camera_is_none() {
        let cam = test_camera();
        assert!(cam.project_to_screen(&Point3::new(0.0, -20.0, 0.0)).is_none());
    }

    #[test]
    fn test_ray_project_round_trip() {
        let cam = test_camera();
        let cursor = Point2::new(523.0, 211.0);
        let ray = cam.screen_ray(cursor).unwrap();
        // Any point along the ray projects back to the cursor.
        let px = cam.project_to_screen(&ray.at(9.0)).unwrap();
        assert!((px.x - cursor.x).abs() < 1e-4);
        assert!((px.y - cursor.y).abs() < 1e-4);
    }

    #[test]
    fn test_orthographic_ray_parallel_to_view() {
        let cam = Camera::orthographic(
            Point3::new(0.0, -10.0, 0.0),
            Point3::origin(),
            5.0,
            (800.0, 600.0),
        );
        let a = cam.screen_ray(Point2::new(100.0, 100.0)).unwrap();
        let b = cam.screen_ray(Point2::new(700.0, 500.0)).unwrap();
        // Orthographic rays all share the view direction.
        assert!((a.direction.as_ref() - b.direction.as_ref()).norm() < 1e-9);
    }

    #[test]
    fn test_viewport_distance_modes() {
        let cam = test_camera();
        assert!((cam.viewport_distance() - 10.0).abs() < 1e-12);
        let ortho = Camera::orthographic(
            Point3::new(0.0, -10.0, 0.0),
            Point3::origin(),
            5.0,
            (800.0, 600.0),
        );
        assert!((ortho.viewport_distance() - 10.0).abs() < 1e-12);
        assert!(!ortho.is_perspective());
    }
}
