/// Scene description handed to a renderer
use nalgebra::{Point3, Vector3};

use crate::geometry::Face;

/// Display range applied to every axis of the scene
pub const AXIS_LIMIT: f64 = 20.0;
/// Tick-count hint for renderers that draw axis ticks
pub const AXIS_TICKS: u32 = 4;
/// Opacity of mesh surfaces
pub const SURFACE_OPACITY: f64 = 0.5;
/// Size of the center-of-mass marker
pub const MARKER_SIZE: f64 = 6.0;

/// Fixed display colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Blue,
    Red,
    Pink,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Pink => "pink",
        }
    }
}

/// Which vector relationship an overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Resultant,
    Difference,
    CrossProduct,
    CenterOfMass,
}

impl OverlayKind {
    /// Legend label of the overlay
    pub fn label(self) -> &'static str {
        match self {
            OverlayKind::Resultant => "resultant",
            OverlayKind::Difference => "difference",
            OverlayKind::CrossProduct => "cross product",
            OverlayKind::CenterOfMass => "center of mass",
        }
    }
}

/// A computed vector waiting to be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub value: Vector3<f64>,
}

impl Overlay {
    pub fn new(kind: OverlayKind, value: Vector3<f64>) -> Self {
        Self { kind, value }
    }
}

/// A transformed mesh ready to be drawn as a surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRender {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
}

/// Inclusive display range per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
    pub ticks: u32,
}

impl AxisBounds {
    pub fn symmetric(limit: f64) -> Self {
        Self {
            x: (-limit, limit),
            y: (-limit, limit),
            z: (-limit, limit),
            ticks: AXIS_TICKS,
        }
    }

    /// Whether a point is inside the displayed frame. Points outside are
    /// still valid scene content; they may just render clipped.
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        let inside = |(lo, hi): (f64, f64), v: f64| lo <= v && v <= hi;
        inside(self.x, p.x) && inside(self.y, p.y) && inside(self.z, p.z)
    }
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self::symmetric(AXIS_LIMIT)
    }
}

/// A single renderable element
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Surface {
        name: String,
        color: Color,
        opacity: f64,
        vertices: Vec<Point3<f64>>,
        faces: Vec<Face>,
    },
    /// Line from `start` to `end`, drawn with end markers
    Segment {
        name: String,
        kind: OverlayKind,
        start: Point3<f64>,
        end: Point3<f64>,
    },
    Marker {
        name: String,
        color: Color,
        size: f64,
        position: Point3<f64>,
    },
}

impl Primitive {
    pub fn name(&self) -> &str {
        match self {
            Primitive::Surface { name, .. }
            | Primitive::Segment { name, .. }
            | Primitive::Marker { name, .. } => name.as_str(),
        }
    }
}

/// Everything a renderer needs for one plot
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub bounds: AxisBounds,
}

impl Scene {
    pub fn surfaces(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Surface { .. }))
    }

    /// Overlay kinds present in the scene, in draw order
    pub fn overlay_kinds(&self) -> Vec<OverlayKind> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Segment { kind, .. } => Some(*kind),
                Primitive::Marker { .. } => Some(OverlayKind::CenterOfMass),
                Primitive::Surface { .. } => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

fn surface(name: &str, color: Color, render: SurfaceRender) -> Primitive {
    Primitive::Surface {
        name: name.to_string(),
        color,
        opacity: SURFACE_OPACITY,
        vertices: render.vertices,
        faces: render.faces,
    }
}

fn overlay_primitive(overlay: Overlay) -> Primitive {
    let name = overlay.kind.label().to_string();
    let end = Point3::from(overlay.value);
    match overlay.kind {
        OverlayKind::CenterOfMass => Primitive::Marker {
            name,
            color: Color::Pink,
            size: MARKER_SIZE,
            position: end,
        },
        kind => Primitive::Segment {
            name,
            kind,
            start: Point3::origin(),
            end,
        },
    }
}

/// Assemble mesh surfaces and vector overlays into a scene.
///
/// Mesh 1 is drawn blue and mesh 2 red. Overlays keep their given order;
/// center of mass becomes a point marker, the rest become lines from the
/// origin.
pub fn compose(
    mesh1: Option<SurfaceRender>,
    mesh2: Option<SurfaceRender>,
    overlays: Vec<Overlay>,
) -> Scene {
    let mut primitives = Vec::with_capacity(2 + overlays.len());
    if let Some(render) = mesh1 {
        primitives.push(surface("mesh 1", Color::Blue, render));
    }
    if let Some(render) = mesh2 {
        primitives.push(surface("mesh 2", Color::Red, render));
    }
    primitives.extend(overlays.into_iter().map(overlay_primitive));

    Scene {
        primitives,
        bounds: AxisBounds::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> SurfaceRender {
        SurfaceRender {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn test_empty_scene_keeps_fixed_bounds() {
        let scene = compose(None, None, Vec::new());
        assert!(scene.is_empty());
        assert_eq!(scene.bounds.x, (-20.0, 20.0));
        assert_eq!(scene.bounds.y, (-20.0, 20.0));
        assert_eq!(scene.bounds.z, (-20.0, 20.0));
        assert_eq!(scene.bounds.ticks, 4);
    }

    #[test]
    fn test_surfaces_are_colored_per_slot() {
        let scene = compose(Some(triangle()), Some(triangle()), Vec::new());
        let colors: Vec<_> = scene
            .surfaces()
            .map(|p| match p {
                Primitive::Surface { color, opacity, .. } => {
                    assert_eq!(*opacity, 0.5);
                    *color
                }
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors, vec![Color::Blue, Color::Red]);
    }

    #[test]
    fn test_only_second_mesh() {
        let scene = compose(None, Some(triangle()), Vec::new());
        assert_eq!(scene.primitives.len(), 1);
        assert_eq!(scene.primitives[0].name(), "mesh 2");
    }

    #[test]
    fn test_overlays_become_segments_and_marker() {
        let scene = compose(
            None,
            None,
            vec![
                Overlay::new(OverlayKind::Resultant, Vector3::new(6.0, 2.0, 8.0)),
                Overlay::new(OverlayKind::CenterOfMass, Vector3::new(3.0, 1.0, 4.0)),
            ],
        );

        match &scene.primitives[0] {
            Primitive::Segment { name, start, end, .. } => {
                assert_eq!(name, "resultant");
                assert_eq!(*start, Point3::origin());
                assert_eq!(*end, Point3::new(6.0, 2.0, 8.0));
            }
            other => panic!("expected segment, got {:?}", other),
        }
        match &scene.primitives[1] {
            Primitive::Marker { name, color, size, position } => {
                assert_eq!(name, "center of mass");
                assert_eq!(*color, Color::Pink);
                assert_eq!(*size, 6.0);
                assert_eq!(*position, Point3::new(3.0, 1.0, 4.0));
            }
            other => panic!("expected marker, got {:?}", other),
        }
        assert_eq!(
            scene.overlay_kinds(),
            vec![OverlayKind::Resultant, OverlayKind::CenterOfMass]
        );
    }

    #[test]
    fn test_out_of_frame_content_is_kept() {
        let far = Vector3::new(100.0, 0.0, 0.0);
        let scene = compose(None, None, vec![Overlay::new(OverlayKind::Difference, far)]);
        assert_eq!(scene.primitives.len(), 1);
        assert!(!scene.bounds.contains(&Point3::from(far)));
        assert!(scene.bounds.contains(&Point3::new(20.0, -20.0, 0.0)));
    }
}
