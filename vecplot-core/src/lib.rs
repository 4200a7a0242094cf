/// VecPlot Core Library - Shared geometry and vector logic
///
/// This library provides the stateless core of the two-mesh vector plotter:
/// OBJ loading, bounding-box extraction, display transforms, vector algebra
/// and scene composition, plus the camera used by renderers.

pub mod config;
pub mod geometry;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod scene;
pub mod transform;
pub mod upload;
pub mod vector;

// Re-export commonly used types
pub use config::{ConfigError, MeshControls, OverlayToggles, PlotConfig};
pub use geometry::{dimensions, Face, Mesh};
pub use obj::{load_obj_file, parse_obj, parse_obj_bytes, ObjError};
pub use pipeline::{plot, Plot, VectorReport};
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use scene::{compose, AxisBounds, Color, Overlay, OverlayKind, Primitive, Scene, SurfaceRender};
pub use transform::{RotationState, Transform};
pub use upload::{stage_and_load, ReleaseWarning, UploadError, UploadSlot, Uploads};
pub use vector::{center_of_mass, center_of_mass_of, cross, difference, resultant, MassedVector};
