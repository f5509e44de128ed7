//! Immediate-mode draw primitives.
//!
//! `Painter` is the only seam that touches the graphics backend. Callers
//! position every element themselves; painters keep no state between calls
//! beyond the commands they emit. `ScenePainter` targets a `vello::Scene`,
//! `RecordingPainter` captures `DrawOp`s so frame composition can be asserted
//! without a GPU.

use vello::kurbo::{Affine, BezPath, Line, Point, Rect, Stroke};
use vello::peniko::{Color, Fill, FontData};
use vello::{Glyph, Scene};

/// Relative text size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    pub fn px(self) -> f64 {
        match self {
            FontSize::Small => 12.0,
            FontSize::Medium => 14.0,
            FontSize::Large => 20.0,
        }
    }
}

pub trait Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color);

    /// Fill a closed polygon. Fewer than three points draws nothing.
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    /// Left-aligned text with its baseline at `origin.y`.
    fn text(&mut self, origin: Point, text: &str, color: Color, size: FontSize);
}

// ---------------------------------------------------------------------------
// Vello painter
// ---------------------------------------------------------------------------

pub struct ScenePainter<'a> {
    scene: &'a mut Scene,
    font: Option<&'a FontData>,
}

impl<'a> ScenePainter<'a> {
    pub fn new(scene: &'a mut Scene, font: Option<&'a FontData>) -> Self {
        Self { scene, font }
    }

    fn bitmap_text(&mut self, origin: Point, text: &str, color: Color, size: FontSize) {
        let px = size.px() / 7.0;
        let top = origin.y - MICRO_ROWS as f64 * px;
        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let bits = micro_glyph(ch.to_ascii_uppercase());
            let x = origin.x + i as f64 * (MICRO_COLS + 1) as f64 * px;
            for row in 0..MICRO_ROWS {
                for col in 0..MICRO_COLS {
                    let bit = (MICRO_ROWS - 1 - row) * MICRO_COLS + (MICRO_COLS - 1 - col);
                    if bits >> bit & 1 == 1 {
                        let x0 = x + col as f64 * px;
                        let y0 = top + row as f64 * px;
                        self.fill_rect(Rect::new(x0, y0, x0 + px, y0 + px), color);
                    }
                }
            }
        }
    }
}

impl Painter for ScenePainter<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &rect);
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.scene.stroke(
            &Stroke::new(width),
            Affine::IDENTITY,
            color,
            None,
            &Line::new(from, to),
        );
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let [first, rest @ ..] = points else { return };
        if rest.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &path);
    }

    fn text(&mut self, origin: Point, text: &str, color: Color, size: FontSize) {
        match self.font {
            Some(font) => {
                let font_size = size.px() as f32;
                let glyphs = layout_line(text, font, font_size, origin);
                if glyphs.is_empty() {
                    return;
                }
                self.scene
                    .draw_glyphs(font)
                    .font_size(font_size)
                    .brush(&color)
                    .draw(Fill::NonZero, glyphs.into_iter());
            }
            None => self.bitmap_text(origin, text, color, size),
        }
    }
}

/// Single-line glyph run positioned with skrifa advance widths.
fn layout_line(text: &str, font: &FontData, font_size: f32, origin: Point) -> Vec<Glyph> {
    use skrifa::MetadataProvider;

    let Ok(font_ref) = skrifa::FontRef::from_index(font.data.as_ref(), font.index) else {
        return Vec::new();
    };
    let charmap = font_ref.charmap();
    let metrics = font_ref.glyph_metrics(
        skrifa::instance::Size::new(font_size),
        skrifa::instance::LocationRef::default(),
    );

    let mut x = origin.x as f32;
    text.chars()
        .map(|ch| {
            let gid = charmap.map(ch).unwrap_or_default();
            let glyph = Glyph {
                id: gid.to_u32(),
                x,
                y: origin.y as f32,
            };
            x += metrics.advance_width(gid).unwrap_or(font_size * 0.6);
            glyph
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Recording painter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum DrawOp {
    Rect {
        rect: Rect,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    Text {
        origin: Point,
        text: String,
        color: Color,
        size: FontSize,
    },
}

#[derive(Debug, Default)]
pub struct RecordingPainter {
    ops: Vec<DrawOp>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// All text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Index of the first text op containing `needle`.
    pub fn position_of_text(&self, needle: &str) -> Option<usize> {
        self.ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { text, .. } if text.contains(needle)))
    }

    pub fn polygons(&self) -> impl Iterator<Item = &[Point]> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Polygon { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.ops.push(DrawOp::Line { from, to, width, color });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() >= 3 {
            self.ops.push(DrawOp::Polygon {
                points: points.to_vec(),
                color,
            });
        }
    }

    fn text(&mut self, origin: Point, text: &str, color: Color, size: FontSize) {
        self.ops.push(DrawOp::Text {
            origin,
            text: text.to_string(),
            color,
            size,
        });
    }
}

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// Clip a convex or concave polygon against an axis-aligned rectangle
/// (Sutherland-Hodgman). Returns an empty vec when nothing remains.
pub fn clip_polygon(points: &[Point], bounds: Rect) -> Vec<Point> {
    let mut out: Vec<Point> = points.to_vec();
    let edges: [(fn(Point, Rect) -> bool, fn(Point, Point, Rect) -> Point); 4] = [
        (|p, r| p.x >= r.x0, |a, b, r| lerp_x(a, b, r.x0)),
        (|p, r| p.x <= r.x1, |a, b, r| lerp_x(a, b, r.x1)),
        (|p, r| p.y >= r.y0, |a, b, r| lerp_y(a, b, r.y0)),
        (|p, r| p.y <= r.y1, |a, b, r| lerp_y(a, b, r.y1)),
    ];
    for (inside, cross) in edges {
        if out.is_empty() {
            break;
        }
        let input = std::mem::take(&mut out);
        let mut prev = input[input.len() - 1];
        for &cur in &input {
            match (inside(cur, bounds), inside(prev, bounds)) {
                (true, true) => out.push(cur),
                (true, false) => {
                    out.push(cross(prev, cur, bounds));
                    out.push(cur);
                }
                (false, true) => out.push(cross(prev, cur, bounds)),
                (false, false) => {}
            }
            prev = cur;
        }
    }
    if out.len() < 3 { Vec::new() } else { out }
}

fn lerp_x(a: Point, b: Point, x: f64) -> Point {
    let t = (x - a.x) / (b.x - a.x);
    Point::new(x, a.y + t * (b.y - a.y))
}

fn lerp_y(a: Point, b: Point, y: f64) -> Point {
    let t = (y - a.y) / (b.y - a.y);
    Point::new(a.x + t * (b.x - a.x), y)
}

/// Scale RGB channels, keeping alpha.
pub fn shade(color: Color, factor: f32) -> Color {
    let [r, g, b, a] = color.components;
    Color::new([
        (r * factor).clamp(0.0, 1.0),
        (g * factor).clamp(0.0, 1.0),
        (b * factor).clamp(0.0, 1.0),
        a,
    ])
}

/// Add a constant to RGB channels, keeping alpha.
pub fn brighten(color: Color, amount: f32) -> Color {
    let [r, g, b, a] = color.components;
    Color::new([
        (r + amount).clamp(0.0, 1.0),
        (g + amount).clamp(0.0, 1.0),
        (b + amount).clamp(0.0, 1.0),
        a,
    ])
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Load the first monospace font found in common system locations.
pub fn load_mono_font() -> Option<FontData> {
    const DIRS: [&str; 6] = [
        "/System/Library/Fonts/",
        "/Library/Fonts/",
        "/usr/share/fonts/truetype/dejavu/",
        "/usr/share/fonts/truetype/liberation/",
        "/usr/share/fonts/TTF/",
        "C:\\Windows\\Fonts\\",
    ];
    const NAMES: [&str; 6] = [
        "Menlo",
        "Monaco",
        "DejaVuSansMono",
        "LiberationMono-Regular",
        "consola",
        "cour",
    ];
    NAMES.iter().find_map(|name| {
        DIRS.iter().find_map(|dir| {
            ["ttf", "ttc", "otf"].iter().find_map(|ext| {
                let data = std::fs::read(format!("{dir}{name}.{ext}")).ok()?;
                Some(FontData::new(data.into(), 0))
            })
        })
    })
}

// ---------------------------------------------------------------------------
// Bitmap micro font (3x5, uppercase only)
// ---------------------------------------------------------------------------

const MICRO_COLS: usize = 3;
const MICRO_ROWS: usize = 5;

/// 15-bit glyph, top row in the high bits, leftmost column first.
fn micro_glyph(ch: char) -> u16 {
    match ch {
        'A' => 0b010_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b011_100_100_100_011,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_110_100_111,
        'F' => 0b111_100_110_100_100,
        'G' => 0b011_100_101_101_011,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'J' => 0b001_001_001_101_010,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_111_101_101,
        'N' => 0b110_101_101_101_101,
        'O' => 0b010_101_101_101_010,
        'P' => 0b110_101_110_100_100,
        'Q' => 0b010_101_101_110_011,
        'R' => 0b110_101_110_101_101,
        'S' => 0b011_100_010_001_110,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'V' => 0b101_101_101_101_010,
        'W' => 0b101_101_111_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_010_010_010,
        'Z' => 0b111_001_010_100_111,
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b110_001_010_100_111,
        '3' => 0b110_001_010_001_110,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_110_001_110,
        '6' => 0b011_100_111_101_111,
        '7' => 0b111_001_010_010_010,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_110,
        '.' => 0b000_000_000_000_010,
        ',' => 0b000_000_000_010_100,
        ':' => 0b000_010_000_010_000,
        '-' => 0b000_000_111_000_000,
        '_' => 0b000_000_000_000_111,
        '/' => 0b001_001_010_100_100,
        '(' => 0b001_010_010_010_001,
        ')' => 0b100_010_010_010_100,
        '[' => 0b011_010_010_010_011,
        ']' => 0b110_010_010_010_110,
        '%' => 0b101_001_010_100_101,
        '|' => 0b010_010_010_010_010,
        '!' => 0b010_010_010_000_010,
        '?' => 0b110_001_010_000_010,
        '+' => 0b000_010_111_010_000,
        '=' => 0b000_111_000_111_000,
        '&' => 0b010_101_010_101_011,
        '<' => 0b001_010_100_010_001,
        '>' => 0b100_010_001_010_100,
        '\'' => 0b010_010_000_000_000,
        '*' => 0b101_010_101_000_000,
        '#' => 0b101_111_101_111_101,
        _ => 0b111_111_111_111_111,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new([1.0, 1.0, 1.0, 1.0]);

    #[test]
    fn recording_painter_keeps_draw_order() {
        let mut p = RecordingPainter::new();
        p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), WHITE);
        p.text(Point::new(1.0, 9.0), "hello", WHITE, FontSize::Small);
        p.line(Point::ZERO, Point::new(5.0, 5.0), 1.0, WHITE);
        assert_eq!(p.ops().len(), 3);
        assert!(matches!(p.ops()[0], DrawOp::Rect { .. }));
        assert_eq!(p.position_of_text("hell"), Some(1));
        assert!(p.contains_text("hello"));
    }

    #[test]
    fn degenerate_polygon_is_dropped() {
        let mut p = RecordingPainter::new();
        p.fill_polygon(&[Point::ZERO, Point::new(1.0, 1.0)], WHITE);
        assert!(p.ops().is_empty());
    }

    #[test]
    fn clip_keeps_polygon_inside_bounds() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let square = [
            Point::new(-5.0, -5.0),
            Point::new(5.0, -5.0),
            Point::new(5.0, 5.0),
            Point::new(-5.0, 5.0),
        ];
        let clipped = clip_polygon(&square, bounds);
        assert!(clipped.len() >= 4);
        for p in &clipped {
            assert!(p.x >= 0.0 && p.x <= 10.0 && p.y >= 0.0 && p.y <= 10.0);
        }
    }

    #[test]
    fn clip_outside_polygon_is_empty() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let tri = [Point::new(20.0, 20.0), Point::new(30.0, 20.0), Point::new(25.0, 30.0)];
        assert!(clip_polygon(&tri, bounds).is_empty());
    }

    #[test]
    fn clip_inside_polygon_is_unchanged() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let tri = [Point::new(1.0, 1.0), Point::new(9.0, 1.0), Point::new(5.0, 9.0)];
        assert_eq!(clip_polygon(&tri, bounds), tri.to_vec());
    }

    #[test]
    fn brighten_and_shade_clamp() {
        let c = brighten(Color::new([0.9, 0.1, 0.5, 1.0]), 0.3);
        let expected = [1.0, 0.4, 0.8, 1.0];
        for (got, want) in c.components.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }
        let d = shade(Color::new([0.5, 0.5, 0.5, 0.5]), 4.0);
        assert_eq!(d.components, [1.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn micro_font_glyphs_fit_fifteen_bits() {
        for ch in (' '..='~').map(|c| c.to_ascii_uppercase()) {
            assert!(micro_glyph(ch) < 1 << (MICRO_COLS * MICRO_ROWS));
        }
    }

    #[test]
    fn bitmap_fallback_needs_no_font() {
        let mut scene = Scene::new();
        let mut painter = ScenePainter::new(&mut scene, None);
        painter.text(Point::new(0.0, 10.0), "Hex 0x4D", WHITE, FontSize::Medium);
    }
}
