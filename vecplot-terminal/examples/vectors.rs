/// Example: print the vectors derived from two OBJ files without the TUI
///
/// Usage: cargo run --example vectors -- mesh1.obj mesh2.obj

use std::env;
use std::io;
use vecplot_core::{load_obj_file, plot, PlotConfig};
use vecplot_terminal::report_lines;

fn main() -> io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <mesh1.obj> <mesh2.obj>", args[0]);
        std::process::exit(1);
    }

    let load = |path: &str| {
        load_obj_file(path).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load {}: {}", path, e))
        })
    };
    let mesh1 = load(&args[1])?;
    let mesh2 = load(&args[2])?;

    let plot = plot(Some(&mesh1), Some(&mesh2), &PlotConfig::default());
    for line in report_lines(&plot.report) {
        println!("{}", line);
    }
    Ok(())
}
