/// The compute-and-compose pipeline run once per plot request
use log::debug;
use nalgebra::Vector3;

use crate::config::{MeshControls, PlotConfig};
use crate::geometry::{dimensions, Mesh};
use crate::scene::{compose, Overlay, OverlayKind, Scene, SurfaceRender};
use crate::vector::{center_of_mass_of, cross, difference, resultant, MassedVector};

/// Every derived quantity, computed whether or not its overlay is shown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorReport {
    pub v1: Vector3<f64>,
    pub v2: Vector3<f64>,
    pub resultant: Vector3<f64>,
    pub difference: Vector3<f64>,
    pub cross_product: Vector3<f64>,
    pub center_of_mass: Option<Vector3<f64>>,
}

impl VectorReport {
    pub fn new(v1: Vector3<f64>, v2: Vector3<f64>, masses: [f64; 2]) -> Self {
        let massed = [MassedVector::new(v1, masses[0]), MassedVector::new(v2, masses[1])];
        Self {
            v1,
            v2,
            resultant: resultant(&v1, &v2),
            difference: difference(&v1, &v2),
            cross_product: cross(&v1, &v2),
            center_of_mass: center_of_mass_of(&massed),
        }
    }
}

/// Result of one plot request
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub scene: Scene,
    pub report: VectorReport,
}

impl Plot {
    /// The two dimension vectors the overlays were derived from
    pub fn vectors(&self) -> [Vector3<f64>; 2] {
        [self.report.v1, self.report.v2]
    }
}

fn render_mesh(mesh: Option<&Mesh>, controls: &MeshControls) -> Option<SurfaceRender> {
    mesh.map(|mesh| SurfaceRender {
        vertices: controls.transform().apply(mesh),
        faces: mesh.faces().to_vec(),
    })
}

/// Overlays selected by the toggles, in a fixed order. An undefined center
/// of mass is left out.
fn overlays(report: &VectorReport, config: &PlotConfig) -> Vec<Overlay> {
    let toggles = &config.overlays;
    let mut overlays = Vec::new();
    if toggles.resultant {
        overlays.push(Overlay::new(OverlayKind::Resultant, report.resultant));
    }
    if toggles.difference {
        overlays.push(Overlay::new(OverlayKind::Difference, report.difference));
    }
    if toggles.cross_product {
        overlays.push(Overlay::new(OverlayKind::CrossProduct, report.cross_product));
    }
    if toggles.center_of_mass {
        match report.center_of_mass {
            Some(com) => overlays.push(Overlay::new(OverlayKind::CenterOfMass, com)),
            None => debug!(
                "Center of mass undefined for masses {:?}, skipping marker",
                config.masses
            ),
        }
    }
    overlays
}

/// Compute dimensions, derived vectors and the scene for one request.
///
/// The vectors come from the untransformed meshes; translation and scale
/// only affect how the surfaces are displayed.
pub fn plot(mesh1: Option<&Mesh>, mesh2: Option<&Mesh>, config: &PlotConfig) -> Plot {
    let report = VectorReport::new(dimensions(mesh1), dimensions(mesh2), config.masses);
    debug!(
        "Plotting v1={:?} v2={:?} with {:?}",
        report.v1.as_slice(),
        report.v2.as_slice(),
        config.overlays
    );

    let scene = compose(
        render_mesh(mesh1, &config.mesh1),
        render_mesh(mesh2, &config.mesh2),
        overlays(&report, config),
    );

    Plot { scene, report }
}
