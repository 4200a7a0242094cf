/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::scene::AxisBounds;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A projected point: screen coordinates plus normalized depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f64::consts::PI / 4.0, // 45 degrees
            aspect: width as f64 / height.max(1) as f64,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Camera looking at the center of `bounds` from far enough away that
    /// the whole box stays in view whatever the orbit rotation.
    pub fn framing(bounds: &AxisBounds, width: u32, height: u32) -> Self {
        let mut camera = Self::new(width, height);
        let center = Point3::new(
            (bounds.x.0 + bounds.x.1) / 2.0,
            (bounds.y.0 + bounds.y.1) / 2.0,
            (bounds.z.0 + bounds.z.1) / 2.0,
        );
        let radius = Vector3::new(
            bounds.x.1 - bounds.x.0,
            bounds.y.1 - bounds.y.0,
            bounds.z.1 - bounds.z.0,
        )
        .norm()
            / 2.0;

        // Fit the bounding sphere into the narrower of the two fields of view
        let half_fov = (camera.fov / 2.0).min((camera.aspect * (camera.fov / 2.0).tan()).atan());
        let distance = radius / half_fov.sin();

        camera.target = center;
        camera.position = center + Vector3::new(0.0, 0.0, distance);
        camera.near = (distance - radius).max(0.1) * 0.5;
        camera.far = distance + radius * 2.0;
        camera
    }

    /// Switch between perspective and orthographic projection
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space, `None` when it falls outside
    /// the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        model_matrix: &Matrix4<f64>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or degenerate
        if clip.w.abs() < 1e-9 || (clip.w < 0.0 && self.mode == ProjectionMode::Perspective) {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.iter().any(|c| !(-1.0..=1.0).contains(c)) {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f64,
            y: (1.0 - ndc.y) * 0.5 * height as f64,
            depth: ndc.z,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
