/// Terminal front end for the two-mesh vector plotter
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use std::io::{self, stdout, Write};
use std::time::Duration;
use vecplot_core::{plot, AxisBounds, Camera, Plot, PlotConfig, RotationState, Uploads, VectorReport};

pub mod controls;
pub mod renderer;

pub use controls::{Action, Controls};
pub use renderer::AsciiRenderer;

/// Rows reserved at the top of the screen for status text
const STATUS_ROWS: u16 = 3;

/// Format a vector the way the status line shows it
pub fn format_vector(v: &nalgebra::Vector3<f64>) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

/// Center of mass as shown to the user, `undefined` when it has none
pub fn format_center_of_mass(report: &VectorReport) -> String {
    report
        .center_of_mass
        .as_ref()
        .map(format_vector)
        .unwrap_or_else(|| "undefined".to_string())
}

/// Multi-line text report of every derived quantity
pub fn report_lines(report: &VectorReport) -> Vec<String> {
    [
        ("v1 (mesh 1 dimensions):", format_vector(&report.v1)),
        ("v2 (mesh 2 dimensions):", format_vector(&report.v2)),
        ("resultant (v1 + v2):", format_vector(&report.resultant)),
        ("difference (v1 - v2):", format_vector(&report.difference)),
        ("cross product (v1 x v2):", format_vector(&report.cross_product)),
        ("center of mass:", format_center_of_mass(report)),
    ]
    .into_iter()
    .map(|(label, value)| format!("{:<25}{}", label, value))
    .collect()
}

/// Main application struct for terminal plotting
pub struct TerminalApp {
    uploads: Uploads,
    controls: Controls,
    plot: Option<Plot>,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    messages: Vec<String>,
    running: bool,
}

impl TerminalApp {
    /// Start with both upload slots filled; warnings collected while
    /// loading are shown in the status area.
    pub fn new(mut uploads: Uploads, config: PlotConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let view_height = height.saturating_sub(STATUS_ROWS).max(1);
        let camera = Camera::framing(&AxisBounds::default(), width as u32, view_height as u32);
        let messages = uploads
            .take_warnings()
            .iter()
            .map(ToString::to_string)
            .collect();

        Ok(Self {
            uploads,
            controls: Controls::new(config),
            plot: None,
            rotation: RotationState::new(0.4, -0.6, 0.0),
            camera,
            renderer: AsciiRenderer::new(width as usize, view_height as usize),
            messages,
            running: true,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;
        while self.running {
            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                    if kind != KeyEventKind::Release {
                        self.handle_key(code)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: event::KeyCode) -> io::Result<()> {
        match self.controls.handle_key(code) {
            Action::Quit => self.running = false,
            Action::Plot => {
                self.plot_now();
                self.render()?;
            }
            Action::Orbit { dx, dy, dz } => {
                self.rotation.rotate(dx, dy, dz);
                self.render()?;
            }
            Action::ToggleProjection => {
                self.camera.toggle_mode();
                debug!("Projection mode {:?}", self.camera.mode);
                self.render()?;
            }
            Action::Edited | Action::None => self.render()?,
        }
        Ok(())
    }

    /// Run the pipeline once with a snapshot of the current controls
    pub fn plot_now(&mut self) {
        let config = self.controls.config();
        match self.uploads.both() {
            Some((mesh1, mesh2)) => {
                let plot = plot(Some(mesh1), Some(mesh2), &config);
                info!("Plotted {} primitives", plot.scene.primitives.len());
                self.plot = Some(plot);
            }
            None => {
                debug!("Plot requested without two meshes");
                self.messages.push("Load two meshes to plot".to_string());
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.rotation.matrix();
        self.renderer.clear();
        if let Some(plot) = &self.plot {
            self.renderer.render_scene(&plot.scene, &model, &self.camera);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS), terminal::Clear(ClearType::FromCursorDown))?;
        self.renderer.draw(&mut stdout)?;

        // Status overlay
        let help = "1/2 mesh  x/y/z axis  +/- move  [/] scale  r/d/c/m overlays  p plot  arrows orbit  o ortho  q quit";
        let vectors = match &self.plot {
            Some(plot) => {
                let report = &plot.report;
                format!(
                    "v1={} v2={} R={} D={} C={} COM={}",
                    format_vector(&report.v1),
                    format_vector(&report.v2),
                    format_vector(&report.resultant),
                    format_vector(&report.difference),
                    format_vector(&report.cross_product),
                    format_center_of_mass(report)
                )
            }
            None => "press p to plot".to_string(),
        };

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!("VecPlot | {} | {}", self.controls.summary(), help)),
            cursor::MoveTo(0, 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::White),
            Print(vectors),
            cursor::MoveTo(0, 2),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Red),
            Print(self.messages.last().cloned().unwrap_or_default()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
