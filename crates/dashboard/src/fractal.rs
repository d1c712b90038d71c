//! Decorative Sierpinski canvas.
//!
//! [`compose`] turns the mining stats into a list of triangles on a 400×300
//! logical canvas; [`TextCanvas`] rasterises that list into characters for
//! the terminal. The drawing is cosmetic and carries no chain data.

use rand::Rng;
use sierpinski_api_client::MiningStats;

/// Logical canvas width.
pub const CANVAS_WIDTH: f64 = 400.0;
/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 300.0;

const OUTER_TRIANGLE: [Point; 3] = [[200.0, 50.0], [50.0, 250.0], [350.0, 250.0]];
const SUBDIVISION_CENTER: Point = [200.0, 150.0];
const SUBDIVISION_BASE: f64 = 150.0;
const MAX_LEVELS: usize = 4;

pub type Point = [f64; 2];

/// A drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Outline {
        vertices: [Point; 3],
        alpha: f64,
        width: f64,
    },
    Fill {
        vertices: [Point; 3],
        alpha: f64,
    },
}

impl Shape {
    pub fn vertices(&self) -> &[Point; 3] {
        match self {
            Shape::Outline { vertices, .. } | Shape::Fill { vertices, .. } => vertices,
        }
    }

    pub fn alpha(&self) -> f64 {
        match self {
            Shape::Outline { alpha, .. } | Shape::Fill { alpha, .. } => *alpha,
        }
    }
}

/// Shapes in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn outlines(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Outline { .. }))
    }

    pub fn fills(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Fill { .. }))
    }
}

/// Subdivision depth for a triangle count: `floor(log2(count))`, capped at 4.
pub fn subdivision_levels(triangle_count: f64) -> usize {
    if triangle_count.is_nan() || triangle_count < 1.0 {
        return 0;
    }
    (triangle_count.log2().floor() as usize).min(MAX_LEVELS)
}

/// Builds the scene for the current stats.
///
/// Subdivision outlines are scattered around the centre with `rng`, so two
/// calls with the same stats differ unless the generator is seeded.
pub fn compose<R: Rng + ?Sized>(stats: &MiningStats, rng: &mut R) -> Scene {
    let mut shapes = vec![Shape::Outline {
        vertices: OUTER_TRIANGLE,
        alpha: 1.0,
        width: 2.0,
    }];

    for level in 0..subdivision_levels(stats.triangle_count) {
        let size = SUBDIVISION_BASE * 0.5_f64.powi(level as i32 + 1);
        let alpha = 0.8 - 0.2 * level as f64;
        let width = (2.0 - 0.3 * level as f64).max(1.0);

        for _ in 0..3_usize.pow(level as u32) {
            let x = SUBDIVISION_CENTER[0] + (rng.gen::<f64>() - 0.5) * size;
            let y = SUBDIVISION_CENTER[1] + (rng.gen::<f64>() - 0.5) * size;
            shapes.push(Shape::Outline {
                vertices: [
                    [x, y - size / 2.0],
                    [x - size / 2.0, y + size / 2.0],
                    [x + size / 2.0, y + size / 2.0],
                ],
                alpha,
                width,
            });
        }
    }

    for (index, triangle) in stats.valid_triangles.iter().enumerate() {
        if let Some(vertices) = triangle.vertices().filter(|v| area(v) > f64::EPSILON) {
            shapes.push(Shape::Fill {
                vertices,
                alpha: (0.3 + 0.1 * index as f64).min(1.0),
            });
        }
    }

    Scene { shapes }
}

/// Character grid the scene is rasterised into.
#[derive(Debug, Clone)]
pub struct TextCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Default for TextCanvas {
    fn default() -> Self {
        Self::new(56, 21)
    }
}

impl TextCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(2);
        let rows = rows.max(2);
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Paints every shape in order. Points outside the canvas are dropped.
    pub fn paint(&mut self, scene: &Scene) {
        for shape in &scene.shapes {
            match shape {
                Shape::Fill { vertices, alpha } => self.fill(vertices, fill_glyph(*alpha)),
                Shape::Outline {
                    vertices,
                    alpha,
                    width,
                } => {
                    let glyph = outline_glyph(*alpha, *width);
                    for i in 0..3 {
                        self.line(vertices[i], vertices[(i + 1) % 3], glyph);
                    }
                }
            }
        }
    }

    /// Rasterises `scene` onto a fresh canvas of this size.
    pub fn render(&self, scene: &Scene) -> String {
        let mut canvas = Self::new(self.cols, self.rows);
        canvas.paint(scene);
        canvas.to_string()
    }

    fn cell_of(&self, point: Point) -> Option<(usize, usize)> {
        let col = (point[0] / CANVAS_WIDTH * (self.cols - 1) as f64).round();
        let row = (point[1] / CANVAS_HEIGHT * (self.rows - 1) as f64).round();
        if !(0.0..self.cols as f64).contains(&col) || !(0.0..self.rows as f64).contains(&row) {
            return None;
        }
        Some((col as usize, row as usize))
    }

    fn set(&mut self, point: Point, glyph: char) {
        if let Some((col, row)) = self.cell_of(point) {
            self.cells[row * self.cols + col] = glyph;
        }
    }

    fn line(&mut self, from: Point, to: Point, glyph: char) {
        let dx = (to[0] - from[0]) / CANVAS_WIDTH * self.cols as f64;
        let dy = (to[1] - from[1]) / CANVAS_HEIGHT * self.rows as f64;
        let steps = (dx.abs().max(dy.abs()).ceil() as usize).clamp(1, 4096) * 2;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            self.set(
                [
                    from[0] + (to[0] - from[0]) * t,
                    from[1] + (to[1] - from[1]) * t,
                ],
                glyph,
            );
        }
    }

    fn fill(&mut self, vertices: &[Point; 3], glyph: char) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let point = [
                    col as f64 / (self.cols - 1) as f64 * CANVAS_WIDTH,
                    row as f64 / (self.rows - 1) as f64 * CANVAS_HEIGHT,
                ];
                if contains(vertices, point) {
                    self.cells[row * self.cols + col] = glyph;
                }
            }
        }
    }
}

impl std::fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.cells.chunks(self.cols).enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let line: String = row.iter().collect();
            f.write_str(&line)?;
        }
        Ok(())
    }
}

fn outline_glyph(alpha: f64, width: f64) -> char {
    if width >= 2.0 {
        '#'
    } else if alpha >= 0.6 {
        '*'
    } else if alpha >= 0.4 {
        '+'
    } else {
        '.'
    }
}

fn fill_glyph(alpha: f64) -> char {
    if alpha >= 0.7 {
        '▓'
    } else if alpha >= 0.5 {
        '▒'
    } else {
        '░'
    }
}

fn area(vertices: &[Point; 3]) -> f64 {
    let [a, b, c] = vertices;
    ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
}

fn contains(vertices: &[Point; 3], point: Point) -> bool {
    let sign = |a: Point, b: Point, c: Point| (a[0] - c[0]) * (b[1] - c[1]) - (b[0] - c[0]) * (a[1] - c[1]);
    let d1 = sign(point, vertices[0], vertices[1]);
    let d2 = sign(point, vertices[1], vertices[2]);
    let d3 = sign(point, vertices[2], vertices[0]);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
