/// Mesh geometry and bounding-box extraction
use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Errors raised while assembling a mesh from raw parts
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// A triangle face as three indices into the vertex sequence
pub type Face = [usize; 3];

/// An immutable triangle mesh: vertex positions plus index triples
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh, checking that every face points at an existing vertex
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<Face>) -> Result<Self, GeometryError> {
        let vertex_count = vertices.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(GeometryError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Per-axis minimum and maximum corners, or `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let bounds = self.vertices[1..]
            .iter()
            .fold((first, first), |(min, max), v| (min.inf(v), max.sup(v)));
        Some(bounds)
    }

    /// Create an axis-aligned cube centered on the origin, for testing
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let faces = vec![
            // Front
            [4, 5, 6],
            [4, 6, 7],
            // Back
            [0, 3, 2],
            [0, 2, 1],
            // Top
            [3, 7, 6],
            [3, 6, 2],
            // Bottom
            [0, 1, 5],
            [0, 5, 4],
            // Right
            [1, 2, 6],
            [1, 6, 5],
            // Left
            [0, 4, 7],
            [0, 7, 3],
        ];

        Self { vertices, faces }
    }
}

/// Axis-aligned extent of a mesh: `max - min` along each axis independently.
///
/// An absent mesh yields the zero vector, which callers read as "no data"
/// rather than as degenerate geometry. A mesh without vertices is treated
/// the same way.
pub fn dimensions(mesh: Option<&Mesh>) -> Vector3<f64> {
    mesh.and_then(Mesh::bounds)
        .map(|(min, max)| max - min)
        .unwrap_or_else(Vector3::zeros)
}
