/// Display transforms for meshes and the orbit rotation of the view
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::Mesh;

/// Uniform scale followed by a translation: `v' = v * scale + translation`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translation: Vector3<f64>,
}

impl Transform {
    pub fn new(scale: f64, translation: Vector3<f64>) -> Self {
        Self { scale, translation }
    }

    pub fn identity() -> Self {
        Self::new(1.0, Vector3::zeros())
    }

    /// Transform a single point. The scale is not validated: zero collapses
    /// every point onto the translation, negative values mirror.
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(point.coords * self.scale + self.translation)
    }

    /// Transform every vertex of a mesh, preserving order and count.
    /// Faces are untouched since only positions move.
    pub fn apply(&self, mesh: &Mesh) -> Vec<Point3<f64>> {
        mesh.vertices().iter().map(|v| self.apply_point(v)).collect()
    }

    /// Homogeneous matrix equivalent to [`Transform::apply_point`]
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.translation) * Matrix4::new_scaling(self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Combined rotation `rz * ry * rx`; X is applied first
    pub fn matrix(&self) -> Matrix4<f64> {
        let rx = Matrix4::new_rotation(Vector3::new(self.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.z));

        rz * ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scale_then_translate() {
        let t = Transform::new(2.0, Vector3::new(1.0, -1.0, 0.5));
        let p = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(p, Point3::new(3.0, 3.0, 6.5));
    }

    #[test]
    fn test_round_trip_recovers_vertex() {
        let v = Point3::new(-0.7, 4.2, 1.9);
        for &(s, t) in &[
            (0.1, Vector3::new(-10.0, 10.0, 0.0)),
            (2.75, Vector3::new(3.3, -4.4, 9.9)),
            (-1.5, Vector3::new(0.0, 0.0, 0.0)),
        ] {
            let moved = Transform::new(s, t).apply_point(&v);
            let recovered = Point3::from((moved.coords - t) / s);
            assert_relative_eq!(recovered, v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_apply_preserves_order_and_faces() {
        let cube = Mesh::cube(1.0);
        let t = Transform::new(3.0, Vector3::new(0.0, 5.0, 0.0));
        let moved = t.apply(&cube);

        assert_eq!(moved.len(), cube.vertices().len());
        for (before, after) in cube.vertices().iter().zip(&moved) {
            assert_relative_eq!(*after, t.apply_point(before));
        }
        assert_eq!(cube.faces().len(), 12);
    }

    #[test]
    fn test_zero_scale_collapses_to_translation() {
        let t = Transform::new(0.0, Vector3::new(1.0, 2.0, 3.0));
        for p in t.apply(&Mesh::cube(4.0)) {
            assert_relative_eq!(p, Point3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_matrix_matches_apply() {
        let t = Transform::new(1.5, Vector3::new(-2.0, 0.0, 7.0));
        let p = Point3::new(1.0, -1.0, 2.0);
        assert_relative_eq!(t.matrix().transform_point(&p), t.apply_point(&p), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        state.rotate(0.1, 0.2, 0.3);
        assert_relative_eq!(state.x, 0.1);
        assert_relative_eq!(state.y, 0.2);
        assert_relative_eq!(state.z, 0.3);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = RotationState::zero().matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-12);
    }
}
