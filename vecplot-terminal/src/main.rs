/// VecPlot Terminal - plot two OBJ meshes and their dimension vectors
///
/// Usage: vecplot-terminal <mesh1.obj> <mesh2.obj> [--config preset.toml]
///
/// Log output goes to stderr; set RUST_LOG to see more than warnings.
use clap::Parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use vecplot_core::{PlotConfig, UploadSlot, Uploads};
use vecplot_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(name = "vecplot-terminal", about = "Plot two OBJ meshes and the vectors between their bounding boxes")]
struct Args {
    /// OBJ file for mesh 1 (drawn blue)
    mesh1: PathBuf,

    /// OBJ file for mesh 2 (drawn red)
    mesh2: PathBuf,

    /// TOML preset with initial translations, scales, overlays and masses
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn upload(uploads: &mut Uploads, slot: UploadSlot, path: &Path) -> io::Result<()> {
    let bytes = fs::read(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| slot.label().to_string());

    uploads
        .accept(slot, &name, &bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlotConfig::load_from_file(path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?,
        None => PlotConfig::default(),
    };

    let mut uploads = Uploads::new();
    upload(&mut uploads, UploadSlot::Mesh1, &args.mesh1)?;
    upload(&mut uploads, UploadSlot::Mesh2, &args.mesh2)?;
    for warning in uploads.warnings() {
        eprintln!("warning: {}", warning);
    }

    let mut app = TerminalApp::new(uploads, config)?;
    app.run()?;

    println!("Thank you for using VecPlot!");
    Ok(())
}
