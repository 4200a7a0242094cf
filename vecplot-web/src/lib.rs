/// VecPlot Web - WASM bindings for the two-mesh vector plotter
///
/// The page feeds uploaded OBJ bytes and control values into a
/// `VectorPlotter`, calls `plot()`, and hands the returned traces to its
/// 3D plotting library. Uploads are parsed in memory since the browser has
/// no filesystem to stage them in.
use log::warn;
use nalgebra::Point3;
use vecplot_core::{
    parse_obj_bytes, plot, Color, MeshControls, OverlayKind, PlotConfig, Primitive, Scene, UploadSlot, Uploads,
};
use wasm_bindgen::prelude::*;

fn slot(index: u8) -> Result<UploadSlot, JsValue> {
    match index {
        1 => Ok(UploadSlot::Mesh1),
        2 => Ok(UploadSlot::Mesh2),
        other => Err(JsValue::from_str(&format!("no mesh slot {}", other))),
    }
}

fn flatten(points: &[Point3<f64>]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

/// One drawable trace of a plot, in flat-array form
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    name: String,
    kind: String,
    color: String,
    opacity: f64,
    size: f64,
    positions: Vec<f64>,
    faces: Vec<u32>,
}

#[wasm_bindgen]
impl Trace {
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// `"mesh"`, `"lines"` or `"marker"`
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.kind.clone()
    }

    /// Empty when the plotting library should pick a color
    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        self.color.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// x, y, z triples
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f64> {
        self.positions.clone()
    }

    /// i, j, k triples into `positions`; empty for lines and markers
    #[wasm_bindgen(getter)]
    pub fn faces(&self) -> Vec<u32> {
        self.faces.clone()
    }
}

impl From<&Primitive> for Trace {
    fn from(primitive: &Primitive) -> Self {
        match primitive {
            Primitive::Surface {
                name,
                color,
                opacity,
                vertices,
                faces,
            } => Trace {
                name: name.clone(),
                kind: "mesh".to_string(),
                color: color.name().to_string(),
                opacity: *opacity,
                size: 0.0,
                positions: flatten(vertices),
                faces: faces.iter().flatten().map(|&i| i as u32).collect(),
            },
            Primitive::Segment {
                name, start, end, ..
            } => Trace {
                name: name.clone(),
                kind: "lines".to_string(),
                color: String::new(),
                opacity: 1.0,
                size: 0.0,
                positions: flatten(&[*start, *end]),
                faces: Vec::new(),
            },
            Primitive::Marker {
                name,
                color,
                size,
                position,
            } => Trace {
                name: name.clone(),
                kind: "marker".to_string(),
                color: color.name().to_string(),
                opacity: 1.0,
                size: *size,
                positions: flatten(&[*position]),
                faces: Vec::new(),
            },
        }
    }
}

/// Output of one `plot()` call
#[wasm_bindgen]
pub struct PlotResult {
    traces: Vec<Trace>,
    axis_range: [f64; 2],
    ticks: u32,
    vectors: Vec<f64>,
}

impl From<&Scene> for PlotResult {
    fn from(scene: &Scene) -> Self {
        Self {
            traces: scene.primitives.iter().map(Trace::from).collect(),
            axis_range: [scene.bounds.x.0, scene.bounds.x.1],
            ticks: scene.bounds.ticks,
            vectors: Vec::new(),
        }
    }
}

#[wasm_bindgen]
impl PlotResult {
    #[wasm_bindgen(js_name = traceCount)]
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Trace by index; the same index always returns an equal trace
    pub fn trace(&self, index: usize) -> Option<Trace> {
        self.traces.get(index).cloned()
    }

    /// Display range shared by all three axes
    #[wasm_bindgen(js_name = axisRange)]
    pub fn axis_range(&self) -> Vec<f64> {
        self.axis_range.to_vec()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// v1 then v2, as six numbers
    pub fn vectors(&self) -> Vec<f64> {
        self.vectors.clone()
    }
}

/// Browser-side plotter state: the two upload slots and the controls
#[wasm_bindgen]
#[derive(Default)]
pub struct VectorPlotter {
    uploads: Uploads,
    config: PlotConfig,
}

#[wasm_bindgen]
impl VectorPlotter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> VectorPlotter {
        Self::default()
    }

    /// Parse uploaded OBJ bytes into slot 1 or 2. A failed upload empties
    /// the slot and reports the parse error.
    pub fn upload(&mut self, index: u8, bytes: &[u8]) -> Result<(), JsValue> {
        let slot = slot(index)?;
        match parse_obj_bytes(bytes) {
            Ok(mesh) => {
                self.uploads.set(slot, mesh);
                Ok(())
            }
            Err(err) => {
                warn!("Rejected upload for {}: {}", slot.label(), err);
                self.uploads.clear(slot);
                Err(JsValue::from_str(&err.to_string()))
            }
        }
    }

    /// Whether both slots hold a mesh, i.e. plotting can be offered
    pub fn ready(&self) -> bool {
        self.uploads.both().is_some()
    }

    #[wasm_bindgen(js_name = setTranslation)]
    pub fn set_translation(&mut self, index: u8, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        let controls = self.controls_mut(index)?;
        controls.translation = [x, y, z];
        self.config = self.config.clamped();
        Ok(())
    }

    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, index: u8, scale: f64) -> Result<(), JsValue> {
        self.controls_mut(index)?.scale = scale;
        self.config = self.config.clamped();
        Ok(())
    }

    #[wasm_bindgen(js_name = setOverlays)]
    pub fn set_overlays(&mut self, resultant: bool, difference: bool, cross_product: bool, center_of_mass: bool) {
        let overlays = &mut self.config.overlays;
        overlays.resultant = resultant;
        overlays.difference = difference;
        overlays.cross_product = cross_product;
        overlays.center_of_mass = center_of_mass;
    }

    /// Run the pipeline once. Fails when a slot is still empty.
    pub fn plot(&self) -> Result<PlotResult, JsValue> {
        let (mesh1, mesh2) = self
            .uploads
            .both()
            .ok_or_else(|| JsValue::from_str("upload two meshes before plotting"))?;

        let plot = plot(Some(mesh1), Some(mesh2), &self.config);
        let mut result = PlotResult::from(&plot.scene);
        result.vectors = plot.vectors().iter().flat_map(|v| [v.x, v.y, v.z]).collect();
        Ok(result)
    }
}

impl VectorPlotter {
    fn controls_mut(&mut self, index: u8) -> Result<&mut MeshControls, JsValue> {
        Ok(match slot(index)? {
            UploadSlot::Mesh1 => &mut self.config.mesh1,
            UploadSlot::Mesh2 => &mut self.config.mesh2,
        })
    }
}

/// Legend label for an overlay kind, for pages that build their own legend
#[wasm_bindgen(js_name = overlayLabel)]
pub fn overlay_label(index: u8) -> Option<String> {
    let kind = match index {
        0 => OverlayKind::Resultant,
        1 => OverlayKind::Difference,
        2 => OverlayKind::CrossProduct,
        3 => OverlayKind::CenterOfMass,
        _ => return None,
    };
    Some(kind.label().to_string())
}

/// Name of a mesh slot's fixed display color
#[wasm_bindgen(js_name = meshColor)]
pub fn mesh_color(index: u8) -> Option<String> {
    match index {
        1 => Some(Color::Blue.name().to_string()),
        2 => Some(Color::Red.name().to_string()),
        _ => None,
    }
}
