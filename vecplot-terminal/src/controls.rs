/// Keyboard controls standing in for the plotter's sliders and checkboxes
use crossterm::event::KeyCode;
use vecplot_core::{PlotConfig, UploadSlot};

/// Step applied to a translation slider per key press
pub const TRANSLATION_STEP: f64 = 0.5;
/// Step applied to a scale slider per key press
pub const SCALE_STEP: f64 = 0.1;
/// Orbit step in radians
pub const ORBIT_STEP: f64 = 0.1;

/// Translation axis currently bound to `+`/`-`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

/// What the application should do after a key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    /// Controls changed; the next plot request picks the new values up
    Edited,
    Plot,
    Orbit { dx: f64, dy: f64, dz: f64 },
    /// Switch between perspective and orthographic view
    ToggleProjection,
    Quit,
}

/// Control state: current slider/toggle values plus which slider is selected
#[derive(Debug, Clone)]
pub struct Controls {
    config: PlotConfig,
    pub active: UploadSlot,
    pub axis: Axis,
}

impl Controls {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config: config.clamped(),
            active: UploadSlot::Mesh1,
            axis: Axis::X,
        }
    }

    /// Snapshot of the controls for one plot request
    pub fn config(&self) -> PlotConfig {
        self.config
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('p') | KeyCode::Enter => Action::Plot,

            KeyCode::Char('1') => self.select(UploadSlot::Mesh1),
            KeyCode::Char('2') => self.select(UploadSlot::Mesh2),
            KeyCode::Char('x') => self.select_axis(Axis::X),
            KeyCode::Char('y') => self.select_axis(Axis::Y),
            KeyCode::Char('z') => self.select_axis(Axis::Z),

            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_translation(TRANSLATION_STEP),
            KeyCode::Char('-') => self.nudge_translation(-TRANSLATION_STEP),
            KeyCode::Char(']') => self.nudge_scale(SCALE_STEP),
            KeyCode::Char('[') => self.nudge_scale(-SCALE_STEP),

            KeyCode::Char('r') => self.toggle(|t| &mut t.resultant),
            KeyCode::Char('d') => self.toggle(|t| &mut t.difference),
            KeyCode::Char('c') => self.toggle(|t| &mut t.cross_product),
            KeyCode::Char('m') => self.toggle(|t| &mut t.center_of_mass),

            KeyCode::Char('o') => Action::ToggleProjection,
            KeyCode::Char('w') | KeyCode::Up => Action::Orbit { dx: ORBIT_STEP, dy: 0.0, dz: 0.0 },
            KeyCode::Char('s') | KeyCode::Down => Action::Orbit { dx: -ORBIT_STEP, dy: 0.0, dz: 0.0 },
            KeyCode::Char('a') | KeyCode::Left => Action::Orbit { dx: 0.0, dy: -ORBIT_STEP, dz: 0.0 },
            KeyCode::Char('e') | KeyCode::Right => Action::Orbit { dx: 0.0, dy: ORBIT_STEP, dz: 0.0 },
            _ => Action::None,
        }
    }

    fn select(&mut self, slot: UploadSlot) -> Action {
        self.active = slot;
        Action::None
    }

    fn select_axis(&mut self, axis: Axis) -> Action {
        self.axis = axis;
        Action::None
    }

    fn edit(&mut self, change: impl FnOnce(&mut PlotConfig)) -> Action {
        change(&mut self.config);
        self.config = self.config.clamped();
        Action::Edited
    }

    fn nudge_translation(&mut self, step: f64) -> Action {
        let (active, axis) = (self.active, self.axis.index());
        self.edit(|config| {
            let controls = match active {
                UploadSlot::Mesh1 => &mut config.mesh1,
                UploadSlot::Mesh2 => &mut config.mesh2,
            };
            controls.translation[axis] += step;
        })
    }

    fn nudge_scale(&mut self, step: f64) -> Action {
        let active = self.active;
        self.edit(|config| {
            let controls = match active {
                UploadSlot::Mesh1 => &mut config.mesh1,
                UploadSlot::Mesh2 => &mut config.mesh2,
            };
            controls.scale += step;
        })
    }

    fn toggle(&mut self, flag: impl FnOnce(&mut vecplot_core::OverlayToggles) -> &mut bool) -> Action {
        self.edit(|config| {
            let flag = flag(&mut config.overlays);
            *flag = !*flag;
        })
    }

    /// One-line summary of the control values
    pub fn summary(&self) -> String {
        let on = |flag: bool| if flag { "on" } else { "off" };
        let t = &self.config.overlays;
        format!(
            "[{}/{}] m1 t=({:.1},{:.1},{:.1}) s={:.1} | m2 t=({:.1},{:.1},{:.1}) s={:.1} | R:{} D:{} C:{} M:{}",
            self.active.label(),
            self.axis.label(),
            self.config.mesh1.translation[0],
            self.config.mesh1.translation[1],
            self.config.mesh1.translation[2],
            self.config.mesh1.scale,
            self.config.mesh2.translation[0],
            self.config.mesh2.translation[1],
            self.config.mesh2.translation[2],
            self.config.mesh2.scale,
            on(t.resultant),
            on(t.difference),
            on(t.cross_product),
            on(t.center_of_mass),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translation_targets_active_mesh_and_axis() {
        let mut controls = Controls::new(PlotConfig::default());
        controls.handle_key(KeyCode::Char('2'));
        controls.handle_key(KeyCode::Char('z'));
        assert_eq!(controls.handle_key(KeyCode::Char('+')), Action::Edited);
        controls.handle_key(KeyCode::Char('+'));

        let config = controls.config();
        assert_relative_eq!(config.mesh2.translation[2], 1.0);
        assert_eq!(config.mesh1.translation, [0.0; 3]);
    }

    #[test]
    fn test_translation_is_clamped() {
        let mut controls = Controls::new(PlotConfig::default());
        for _ in 0..30 {
            controls.handle_key(KeyCode::Char('-'));
        }
        assert_relative_eq!(controls.config().mesh1.translation[0], -10.0);
    }

    #[test]
    fn test_scale_controls_own_mesh() {
        let mut controls = Controls::new(PlotConfig::default());
        controls.handle_key(KeyCode::Char(']'));
        controls.handle_key(KeyCode::Char('2'));
        for _ in 0..20 {
            controls.handle_key(KeyCode::Char('['));
        }

        let config = controls.config();
        assert_relative_eq!(config.mesh1.scale, 1.1);
        assert_relative_eq!(config.mesh2.scale, 0.1);
    }

    #[test]
    fn test_toggles() {
        let mut controls = Controls::new(PlotConfig::default());
        controls.handle_key(KeyCode::Char('c'));
        controls.handle_key(KeyCode::Char('m'));
        controls.handle_key(KeyCode::Char('m'));

        let overlays = controls.config().overlays;
        assert!(overlays.cross_product);
        assert!(!overlays.center_of_mass);
        assert!(!overlays.resultant);
    }

    #[test]
    fn test_plot_quit_and_orbit() {
        let mut controls = Controls::new(PlotConfig::default());
        assert_eq!(controls.handle_key(KeyCode::Enter), Action::Plot);
        assert_eq!(controls.handle_key(KeyCode::Esc), Action::Quit);
        assert!(matches!(controls.handle_key(KeyCode::Left), Action::Orbit { .. }));
        assert_eq!(controls.handle_key(KeyCode::Char('o')), Action::ToggleProjection);
        assert_eq!(controls.handle_key(KeyCode::Char('!')), Action::None);
    }

    #[test]
    fn test_out_of_range_start_is_clamped() {
        let mut config = PlotConfig::default();
        config.mesh1.scale = 9.0;
        assert_relative_eq!(Controls::new(config).config().mesh1.scale, 3.0);
    }
}
