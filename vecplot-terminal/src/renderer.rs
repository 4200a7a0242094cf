/// ASCII rasterizer for terminal rendering of a plot scene
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use vecplot_core::{scene, AxisBounds, Camera, OverlayKind, Primitive, Scene, ScreenPoint};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[',', ':', ';', '=', '+', '%', '#', '@'];

const AXIS_GLYPH: char = '.';
const SEGMENT_GLYPH: char = '*';
const SEGMENT_END_GLYPH: char = 'X';
const MARKER_GLYPH: char = 'O';

/// A terminal cell: glyph plus foreground color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
    };
}

/// Terminal color of a scene color
pub fn terminal_color(color: scene::Color) -> Color {
    match color {
        scene::Color::Blue => Color::Blue,
        scene::Color::Red => Color::Red,
        scene::Color::Pink => Color::Magenta,
    }
}

/// Terminal color of a line overlay
pub fn overlay_color(kind: OverlayKind) -> Color {
    match kind {
        OverlayKind::Resultant => Color::Green,
        OverlayKind::Difference => Color::Yellow,
        OverlayKind::CrossProduct => Color::Cyan,
        OverlayKind::CenterOfMass => Color::Magenta,
    }
}

/// ASCII renderer that converts a scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            cells: vec![Cell::BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.cells.fill(Cell::BLANK);
    }

    /// Draw the axis frame, then surfaces, then overlays on top
    pub fn render_scene(&mut self, scene: &Scene, model_matrix: &Matrix4<f64>, camera: &Camera) {
        self.render_axes(&scene.bounds, model_matrix, camera);

        for primitive in &scene.primitives {
            if let Primitive::Surface {
                color,
                vertices,
                faces,
                ..
            } = primitive
            {
                let color = terminal_color(*color);
                for face in faces {
                    let triangle = [vertices[face[0]], vertices[face[1]], vertices[face[2]]];
                    self.render_triangle(&triangle, color, model_matrix, camera);
                }
            }
        }

        for primitive in &scene.primitives {
            match primitive {
                Primitive::Segment {
                    kind, start, end, ..
                } => {
                    let color = overlay_color(*kind);
                    self.render_segment(start, end, SEGMENT_GLYPH, color, true, model_matrix, camera);
                    self.render_point(end, SEGMENT_END_GLYPH, color, model_matrix, camera);
                }
                Primitive::Marker {
                    color, position, ..
                } => {
                    self.render_point(position, MARKER_GLYPH, terminal_color(*color), model_matrix, camera);
                }
                Primitive::Surface { .. } => {}
            }
        }
    }

    fn render_axes(&mut self, bounds: &AxisBounds, model_matrix: &Matrix4<f64>, camera: &Camera) {
        let axes = [
            (Point3::new(bounds.x.0, 0.0, 0.0), Point3::new(bounds.x.1, 0.0, 0.0)),
            (Point3::new(0.0, bounds.y.0, 0.0), Point3::new(0.0, bounds.y.1, 0.0)),
            (Point3::new(0.0, 0.0, bounds.z.0), Point3::new(0.0, 0.0, bounds.z.1)),
        ];
        for (start, end) in &axes {
            self.render_segment(start, end, AXIS_GLYPH, Color::DarkGrey, false, model_matrix, camera);
        }
    }

    fn project(&self, point: &Point3<f64>, model_matrix: &Matrix4<f64>, camera: &Camera) -> Option<ScreenPoint> {
        camera.project_to_screen(point, model_matrix, self.width as u32, self.height as u32)
    }

    fn put(&mut self, x: f64, y: f64, depth: f64, cell: Cell, on_top: bool) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = y * self.width + x;
        if on_top || depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth.min(self.depth_buffer[idx]);
            self.cells[idx] = cell;
        }
    }

    fn render_point(&mut self, point: &Point3<f64>, glyph: char, color: Color, model_matrix: &Matrix4<f64>, camera: &Camera) {
        if let Some(p) = self.project(point, model_matrix, camera) {
            self.put(p.x, p.y, p.depth, Cell { glyph, color }, true);
        }
    }

    /// Sample the segment in world space so partially clipped lines still
    /// draw their visible part.
    #[allow(clippy::too_many_arguments)]
    fn render_segment(
        &mut self,
        start: &Point3<f64>,
        end: &Point3<f64>,
        glyph: char,
        color: Color,
        on_top: bool,
        model_matrix: &Matrix4<f64>,
        camera: &Camera,
    ) {
        let steps = 2 * (self.width + self.height);
        let delta: Vector3<f64> = end - start;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            if let Some(p) = self.project(&(start + delta * t), model_matrix, camera) {
                self.put(p.x, p.y, p.depth, Cell { glyph, color }, on_top);
            }
        }
    }

    fn render_triangle(&mut self, triangle: &[Point3<f64>; 3], color: Color, model_matrix: &Matrix4<f64>, camera: &Camera) {
        // Project vertices to screen space
        let mut screen = [ScreenPoint { x: 0.0, y: 0.0, depth: 0.0 }; 3];
        for (slot, vertex) in screen.iter_mut().zip(triangle) {
            match self.project(vertex, model_matrix, camera) {
                Some(p) => *slot = p,
                None => return, // Triangle is clipped
            }
        }

        // Surfaces are two-sided, so shade by the absolute facing
        let normal = model_matrix
            .transform_vector(&(triangle[1] - triangle[0]).cross(&(triangle[2] - triangle[0])))
            .try_normalize(1e-12);
        let brightness = match normal {
            Some(n) => n.dot(&Vector3::z()).abs(),
            None => return, // Degenerate triangle
        };

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f64) as usize;
        let glyph = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(&screen, Cell { glyph, color });
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], cell: Cell) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to screen bounds
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i64).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i64).min(self.width as i64 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i64).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(
                    (v0.x, v0.y),
                    (v1.x, v1.y),
                    (v2.x, v2.y),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                        self.put(px, py, depth, cell, false);
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                if cell.color != current {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = cell.color;
                }
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
