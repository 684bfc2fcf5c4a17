use serde::{Deserialize, Serialize};

/// Magnitude that maps onto one vertical scale unit.
pub const MAGNITUDE_DIVISOR: f64 = 128.0;
/// Vertical pixels per scale unit.
pub const VERTICAL_SCALE: f64 = 50.0;

/// 2D drawing backend the spectrum line is stroked onto.
pub trait DrawSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Maps magnitudes onto canvas coordinates, one point per bin.
///
/// Bin `i` lands at `x = floor(width / bins * i)` and magnitude `m` at
/// `y = height - floor(m / 128 * 50)`, so the line rises from the bottom edge.
pub fn spectrum_polyline(magnitudes: &[u8], width: f64, height: f64) -> Vec<Point> {
    let spacing = width / magnitudes.len().max(1) as f64;
    magnitudes
        .iter()
        .enumerate()
        .map(|(i, &magnitude)| Point {
            x: (spacing * i as f64).trunc(),
            y: (height - (f64::from(magnitude) / MAGNITUDE_DIVISOR * VERTICAL_SCALE).trunc())
                .max(0.0),
        })
        .collect()
}

/// Clears the canvas and strokes `points` as a single open path.
pub fn draw_polyline<S: DrawSurface + ?Sized>(surface: &mut S, points: &[Point], width: f64, height: f64) {
    surface.clear_rect(0.0, 0.0, width, height);
    surface.begin_path();
    if let Some((first, rest)) = points.split_first() {
        surface.move_to(first.x, first.y);
        for point in rest {
            surface.line_to(point.x, point.y);
        }
    }
    surface.stroke();
}

/// Drawing instruction captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Stroke,
}

/// Surface that keeps every command it receives. Used headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    strokes: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of completed frames (stroked paths) so far.
    pub fn strokes(&self) -> usize {
        self.strokes
    }

    /// Commands issued since the most recent `clear_rect`.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::ClearRect { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Vertices of the most recently recorded path.
    pub fn last_path(&self) -> Vec<Point> {
        self.last_frame()
            .iter()
            .filter_map(|command| match *command {
                DrawCommand::MoveTo { x, y } | DrawCommand::LineTo { x, y } => Some(Point { x, y }),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
        self.strokes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_bins_onto_the_canvas() {
        let mut magnitudes = vec![0_u8; 128];
        magnitudes[1] = 128;
        magnitudes[2] = 255;
        magnitudes[127] = 64;

        let points = spectrum_polyline(&magnitudes, 500.0, 100.0);

        assert_eq!(points.len(), 128);
        assert_eq!(points[0], Point { x: 0.0, y: 100.0 });
        assert_eq!(points[1], Point { x: 3.0, y: 50.0 });
        // floor(255 / 128 * 50) = 99
        assert_eq!(points[2], Point { x: 7.0, y: 1.0 });
        assert_eq!(points[127], Point { x: 496.0, y: 75.0 });
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.x, (500.0 / 128.0 * i as f64).floor());
        }
    }

    #[test]
    fn draws_a_single_open_path() {
        let mut surface = RecordingSurface::new();
        let points = spectrum_polyline(&[0, 128, 0], 300.0, 100.0);
        draw_polyline(&mut surface, &points, 300.0, 100.0);

        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::ClearRect {
                    x: 0.0,
                    y: 0.0,
                    width: 300.0,
                    height: 100.0
                },
                DrawCommand::BeginPath,
                DrawCommand::MoveTo { x: 0.0, y: 100.0 },
                DrawCommand::LineTo { x: 100.0, y: 50.0 },
                DrawCommand::LineTo { x: 200.0, y: 100.0 },
                DrawCommand::Stroke,
            ]
        );
        assert_eq!(surface.strokes(), 1);
        assert_eq!(surface.last_path(), points);
    }

    #[test]
    fn stroke_count_matches_recorded_frames() {
        let mut surface = RecordingSurface::new();
        for magnitudes in [[0_u8, 64], [255, 128]] {
            let points = spectrum_polyline(&magnitudes, 100.0, 100.0);
            draw_polyline(&mut surface, &points, 100.0, 100.0);
        }

        let stroked = surface
            .commands()
            .iter()
            .filter(|command| matches!(command, DrawCommand::Stroke))
            .count();
        assert_eq!(surface.strokes(), 2);
        assert_eq!(stroked, surface.strokes());
        assert_eq!(
            surface.last_path(),
            vec![Point { x: 0.0, y: 1.0 }, Point { x: 50.0, y: 50.0 }]
        );
    }

    #[test]
    fn serialises_commands_with_an_op_tag() {
        let json = serde_json::to_string(&DrawCommand::MoveTo { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(json, r#"{"op":"move_to","x":1.0,"y":2.0}"#);
    }
}
