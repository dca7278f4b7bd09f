//! Rendering of single shapes and normalized scenes to image buffers
//!
//! Single shapes use fixed fractional layouts of the canvas; composite
//! shapes (tree, house, sun) are fixed arrangements of sub-primitives. Names
//! outside the vocabulary draw a red border so the mismatch is visible.

use crate::color::parse_color;
use crate::models::{Placement, Scene, SceneShape, ShapeName};
use crate::output::{save_png, OutputError};
use crate::shapes::{
    rasterize_ellipse, rasterize_ellipse_outline, rasterize_polygon, rasterize_polygon_outline,
    rasterize_rect, rasterize_stroke, rasterize_thick_line,
};
use image::{Rgba, RgbaImage};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A warning generated during rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Border colour for names the renderer does not know
const FALLBACK_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const FALLBACK_INSET: i32 = 10;
const FALLBACK_STROKE: i32 = 2;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Trunk colour of the tree composite
const TRUNK_COLOR: Rgba<u8> = Rgba([165, 42, 42, 255]);

const SUN_RADIUS: f64 = 0.25;
const SUN_RAYS: u32 = 8;
const SUN_RAY_REACH: f64 = 1.3;

/// Stroke width used for every shape in scene mode
pub const SCENE_STROKE: i32 = 4;
/// Half-extent of a scene shape as a fraction of `size * dimension`
const SCENE_EXTENT: f64 = 0.35;
const SCENE_MIN_SIZE: f64 = 0.05;

/// Canvas and pen settings for a single-shape render.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub width: u32,
    pub height: u32,
    pub stroke: u32,
    pub color: String,
    pub background: String,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            stroke: 3,
            color: "black".to_string(),
            background: "white".to_string(),
        }
    }
}

/// `floor(dim * fraction)`, tolerant of float noise such as 0.83 * 300.
fn frac(dim: u32, fraction: f64) -> i32 {
    (dim as f64 * fraction + 1e-9).floor() as i32
}

/// Parse a colour, falling back with a warning.
fn color_or(name: &str, fallback: Rgba<u8>, role: &str, warnings: &mut Vec<Warning>) -> Rgba<u8> {
    match parse_color(name) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(Warning::new(format!("invalid {} color '{}': {}", role, name, e)));
            fallback
        }
    }
}

/// Write a pixel set onto the image, clipping to its bounds.
fn paint(image: &mut RgbaImage, pixels: &HashSet<(i32, i32)>, color: Rgba<u8>) {
    let (w, h) = image.dimensions();
    for &(x, y) in pixels {
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Render one named shape.
///
/// Unknown names do not fail: they draw a red border inset 10px from the
/// canvas edge and produce a warning.
///
/// # Examples
///
/// ```
/// use text2shape::renderer::{render_shape, ShapeStyle};
///
/// let (image, warnings) = render_shape("circle", &ShapeStyle::default());
/// assert_eq!(image.dimensions(), (300, 300));
/// assert!(warnings.is_empty());
/// ```
pub fn render_shape(name: &str, style: &ShapeStyle) -> (RgbaImage, Vec<Warning>) {
    let mut warnings = Vec::new();
    let bg = color_or(&style.background, WHITE, "background", &mut warnings);
    let fg = color_or(&style.color, BLACK, "stroke", &mut warnings);

    let (w, h) = (style.width, style.height);
    let stroke = style.stroke as i32;
    let mut image = RgbaImage::from_pixel(w, h, bg);

    let Ok(shape) = name.parse::<ShapeName>() else {
        warnings.push(Warning::new(format!("unknown shape '{}', drawing fallback border", name)));
        // Tiny canvases get a smaller inset so the border never vanishes
        let inset = FALLBACK_INSET.min((w.min(h) as i32 - 1) / 4).max(0);
        let (right, bottom) = (w as i32 - inset, h as i32 - inset);
        let border =
            rasterize_stroke(inset, inset, right - inset + 1, bottom - inset + 1, FALLBACK_STROKE);
        paint(&mut image, &border, FALLBACK_COLOR);
        return (image, warnings);
    };

    let (x17, y17, x83, y83) = (frac(w, 0.17), frac(h, 0.17), frac(w, 0.83), frac(h, 0.83));

    match shape {
        ShapeName::Circle => {
            paint(&mut image, &rasterize_ellipse_outline(x17, y17, x83, y83, stroke), fg);
        }
        ShapeName::Square => {
            let outline = rasterize_stroke(x17, y17, x83 - x17 + 1, y83 - y17 + 1, stroke);
            paint(&mut image, &outline, fg);
        }
        ShapeName::Triangle => {
            let points = [(frac(w, 0.50), y17), (x17, y83), (x83, y83)];
            paint(&mut image, &rasterize_polygon_outline(&points, stroke), fg);
        }
        ShapeName::Line => {
            let mid = frac(h, 0.5);
            paint(&mut image, &rasterize_thick_line((x17, mid), (x83, mid), stroke), fg);
        }
        ShapeName::Tree => {
            let (left, top) = (frac(w, 0.43), frac(h, 0.62));
            let trunk = rasterize_rect(left, top, frac(w, 0.57) - left + 1, frac(h, 0.86) - top + 1);
            paint(&mut image, &trunk, TRUNK_COLOR);

            let canopy = [(frac(w, 0.50), frac(h, 0.22)), (frac(w, 0.25), top), (frac(w, 0.75), top)];
            paint(&mut image, &rasterize_polygon(&canopy), fg);
            paint(&mut image, &rasterize_polygon_outline(&canopy, 1), fg);
        }
        ShapeName::House => {
            let (left, right) = (frac(w, 0.25), frac(w, 0.75));
            let (eaves, floor) = (frac(h, 0.52), frac(h, 0.85));
            let body = rasterize_stroke(left, eaves, right - left + 1, floor - eaves + 1, stroke);
            paint(&mut image, &body, fg);

            let roof = [(left, eaves), (frac(w, 0.50), frac(h, 0.25)), (right, eaves)];
            paint(&mut image, &rasterize_polygon_outline(&roof, stroke), fg);
        }
        ShapeName::Sun => {
            let (x0, y0, x1, y1) = (frac(w, 0.25), frac(h, 0.25), frac(w, 0.75), frac(h, 0.75));
            paint(&mut image, &rasterize_ellipse(x0, y0, x1, y1), fg);
            paint(&mut image, &rasterize_ellipse_outline(x0, y0, x1, y1, stroke), fg);
            paint(&mut image, &sun_rays(w, h, stroke), fg);
        }
    }

    (image, warnings)
}

/// Eight rays at 45° steps, from the disc edge out to 1.3x its radius.
fn sun_rays(w: u32, h: u32, stroke: i32) -> HashSet<(i32, i32)> {
    let (cx, cy) = (w as f64 * 0.5, h as f64 * 0.5);
    let (rx, ry) = (w as f64 * SUN_RADIUS, h as f64 * SUN_RADIUS);

    let mut pixels = HashSet::new();
    for i in 0..SUN_RAYS {
        let angle = (i as f64 * 45.0).to_radians();
        let (cos, sin) = (angle.cos(), angle.sin());
        let start = ((cx + rx * cos).round() as i32, (cy + ry * sin).round() as i32);
        let end = (
            (cx + rx * SUN_RAY_REACH * cos).round() as i32,
            (cy + ry * SUN_RAY_REACH * sin).round() as i32,
        );
        pixels.extend(rasterize_thick_line(start, end, stroke));
    }
    pixels
}

/// Render a normalized scene.
///
/// Each shape is centered at `(x * W, y * H)` with half-extents
/// `0.35 * size` of each dimension and drawn with [`SCENE_STROKE`].
pub fn render_scene(scene: &Scene) -> (RgbaImage, Vec<Warning>) {
    let mut warnings = Vec::new();
    let (w, h) = (scene.canvas.width, scene.canvas.height);
    let bg = color_or(&scene.canvas.bg, WHITE, "background", &mut warnings);
    let mut image = RgbaImage::from_pixel(w, h, bg);

    for shape in &scene.shapes {
        let color = color_or(shape.color(), BLACK, "shape", &mut warnings);
        let pixels = match shape {
            SceneShape::Circle(p) => {
                let (l, t, r, b) = scene_box(p, w, h);
                rasterize_ellipse_outline(l, t, r, b, SCENE_STROKE)
            }
            SceneShape::Square(p) => {
                let (l, t, r, b) = scene_box(p, w, h);
                rasterize_stroke(l, t, r - l + 1, b - t + 1, SCENE_STROKE)
            }
            SceneShape::Triangle(p) => {
                let (l, t, r, b) = scene_box(p, w, h);
                rasterize_polygon_outline(&[((l + r) / 2, t), (l, b), (r, b)], SCENE_STROKE)
            }
            SceneShape::Line(seg) => {
                let start = ((seg.x1 * w as f64).round() as i32, (seg.y1 * h as f64).round() as i32);
                let end = ((seg.x2 * w as f64).round() as i32, (seg.y2 * h as f64).round() as i32);
                rasterize_thick_line(start, end, SCENE_STROKE)
            }
        };
        paint(&mut image, &pixels, color);
    }

    (image, warnings)
}

/// Inclusive pixel box `(left, top, right, bottom)` of a placed shape.
fn scene_box(p: &Placement, w: u32, h: u32) -> (i32, i32, i32, i32) {
    let size = p.size.max(SCENE_MIN_SIZE);
    let (cx, cy) = (p.x * w as f64, p.y * h as f64);
    let (hx, hy) = (SCENE_EXTENT * size * w as f64, SCENE_EXTENT * size * h as f64);
    (
        (cx - hx).round() as i32,
        (cy - hy).round() as i32,
        (cx + hx).round() as i32,
        (cy + hy).round() as i32,
    )
}

/// Render a shape and save it as PNG, creating parent directories.
///
/// Returns the written path.
pub fn draw_shape(name: &str, style: &ShapeStyle, path: &Path) -> Result<PathBuf, OutputError> {
    let (image, warnings) = render_shape(name, style);
    log_warnings(&warnings);
    save_png(&image, path)?;
    Ok(path.to_path_buf())
}

/// Render a scene and save it as PNG, creating parent directories.
///
/// Returns the written path.
pub fn draw_scene(scene: &Scene, path: &Path) -> Result<PathBuf, OutputError> {
    let (image, warnings) = render_scene(scene);
    log_warnings(&warnings);
    save_png(&image, path)?;
    Ok(path.to_path_buf())
}

fn log_warnings(warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Canvas, Segment};
    use crate::shapes::bounds;
    use tempfile::TempDir;

    /// Pixels that differ from the background, as a set.
    fn ink(image: &RgbaImage, bg: Rgba<u8>) -> HashSet<(i32, i32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != bg)
            .map(|(x, y, _)| (x as i32, y as i32))
            .collect()
    }

    fn style(w: u32, h: u32) -> ShapeStyle {
        ShapeStyle { width: w, height: h, ..ShapeStyle::default() }
    }

    #[test]
    fn test_circle_bounding_box() {
        let (image, warnings) = render_shape("circle", &style(300, 300));
        assert!(warnings.is_empty());
        assert_eq!(bounds(&ink(&image, WHITE)), Some((51, 51, 249, 249)));
        assert_eq!(*image.get_pixel(150, 150), WHITE);
        assert_eq!(*image.get_pixel(51, 150), BLACK);
    }

    #[test]
    fn test_square_bounding_box() {
        let (image, _) = render_shape("square", &style(300, 300));
        assert_eq!(bounds(&ink(&image, WHITE)), Some((51, 51, 249, 249)));
        assert_eq!(*image.get_pixel(51, 51), BLACK);
        assert_eq!(*image.get_pixel(150, 150), WHITE);
    }

    #[test]
    fn test_triangle_apex_and_base() {
        let (image, _) = render_shape("triangle", &style(300, 300));
        assert_eq!(*image.get_pixel(150, 51), BLACK);
        assert_eq!(*image.get_pixel(51, 249), BLACK);
        assert_eq!(*image.get_pixel(249, 249), BLACK);
        assert_eq!(*image.get_pixel(150, 200), WHITE);
    }

    #[test]
    fn test_line_is_horizontal_at_middle() {
        let s = ShapeStyle { stroke: 1, ..style(300, 300) };
        let (image, _) = render_shape("line", &s);
        assert_eq!(bounds(&ink(&image, WHITE)), Some((51, 150, 249, 150)));
    }

    #[test]
    fn test_tree_trunk_and_canopy() {
        let s = ShapeStyle { color: "green".to_string(), ..style(100, 100) };
        let (image, _) = render_shape("tree", &s);
        let green = parse_color("green").unwrap();
        assert_eq!(*image.get_pixel(50, 75), TRUNK_COLOR);
        assert_eq!(*image.get_pixel(50, 40), green);
        assert_eq!(*image.get_pixel(50, 22), green);
        assert_eq!(*image.get_pixel(50, 10), WHITE);
        assert_eq!(*image.get_pixel(50, 90), WHITE);
    }

    #[test]
    fn test_house_body_and_roof() {
        let (image, _) = render_shape("house", &style(100, 100));
        // Roof strokes are centered on their edges, so they overhang by one pixel
        assert_eq!(bounds(&ink(&image, WHITE)), Some((24, 24, 76, 85)));
        assert_eq!(*image.get_pixel(25, 70), BLACK);
        assert_eq!(*image.get_pixel(50, 25), BLACK);
        assert_eq!(*image.get_pixel(50, 70), WHITE);
    }

    #[test]
    fn test_sun_disc_and_rays() {
        let s = ShapeStyle { color: "gold".to_string(), stroke: 1, ..style(200, 200) };
        let (image, _) = render_shape("sun", &s);
        let gold = parse_color("gold").unwrap();
        assert_eq!(*image.get_pixel(100, 100), gold);
        // Rightward ray ends at 1.3 x radius (50 * 1.3 = 65)
        assert_eq!(*image.get_pixel(164, 100), gold);
        assert_eq!(*image.get_pixel(166, 100), WHITE);
        // Diagonal ray
        let d = (100.0 + 50.0 * 1.15 * std::f64::consts::FRAC_1_SQRT_2).round() as u32;
        assert_eq!(*image.get_pixel(d, d), gold);
        // Between rays, beyond the disc
        assert_eq!(*image.get_pixel(100 + 58, 100 + 24), WHITE);
    }

    #[test]
    fn test_unknown_shape_fallback_border() {
        let (image, warnings) = render_shape("unknown-name", &style(100, 100));
        assert_eq!(warnings.len(), 1);
        let pixels = ink(&image, WHITE);
        assert_eq!(bounds(&pixels), Some((10, 10, 90, 90)));
        assert_eq!(*image.get_pixel(10, 10), FALLBACK_COLOR);
        assert_eq!(*image.get_pixel(11, 50), FALLBACK_COLOR);
        assert_eq!(*image.get_pixel(12, 50), WHITE);
    }

    #[test]
    fn test_fallback_border_on_tiny_canvases() {
        for size in [1u32, 2, 5, 12, 20] {
            let (image, warnings) = render_shape("unknown-name", &style(size, size));
            assert_eq!(warnings.len(), 1);
            assert!(!ink(&image, WHITE).is_empty(), "no border on {0}x{0}", size);
        }
        let (image, _) = render_shape("unknown-name", &style(20, 20));
        assert_eq!(*image.get_pixel(4, 4), FALLBACK_COLOR);
    }

    #[test]
    fn test_shape_names_are_exact() {
        let (_, warnings) = render_shape("Circle", &ShapeStyle::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_invalid_colors_fall_back_with_warnings() {
        let s = ShapeStyle {
            color: "notacolor".to_string(),
            background: "#12".to_string(),
            ..style(50, 50)
        };
        let (image, warnings) = render_shape("square", &s);
        assert_eq!(warnings.len(), 2);
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(frac(50, 0.17) as u32, 25), BLACK);
    }

    #[test]
    fn test_background_color() {
        let s = ShapeStyle { background: "lightgray".to_string(), ..style(40, 40) };
        let (image, _) = render_shape("line", &s);
        assert_eq!(*image.get_pixel(0, 0), Rgba([211, 211, 211, 255]));
    }

    #[test]
    fn test_frac_truncates() {
        assert_eq!(frac(300, 0.17), 51);
        assert_eq!(frac(300, 0.83), 249);
        assert_eq!(frac(101, 0.5), 50);
    }

    fn scene_with(shapes: Vec<SceneShape>) -> Scene {
        Scene { canvas: Canvas { width: 200, height: 100, bg: "white".to_string() }, shapes }
    }

    #[test]
    fn test_scene_square_box() {
        let scene = scene_with(vec![SceneShape::Square(Placement {
            color: "red".to_string(),
            x: 0.5,
            y: 0.5,
            size: 0.5,
        })]);
        let (image, warnings) = render_scene(&scene);
        assert!(warnings.is_empty());
        assert_eq!(image.dimensions(), (200, 100));
        // half extents: 0.35 * 0.5 * 200 = 35, 0.35 * 0.5 * 100 = 17.5
        assert_eq!(bounds(&ink(&image, WHITE)), Some((65, 33, 135, 68)));
    }

    #[test]
    fn test_scene_triangle_apex_at_box_midpoint() {
        let scene = scene_with(vec![SceneShape::Triangle(Placement {
            color: "black".to_string(),
            x: 0.3,
            y: 0.5,
            size: 0.4,
        })]);
        let (image, _) = render_scene(&scene);
        // box: 60 +- 28 horizontally, 50 +- 14 vertically
        assert_eq!(*image.get_pixel(60, 36), BLACK);
        assert_eq!(*image.get_pixel(32, 64), BLACK);
        assert_eq!(*image.get_pixel(88, 64), BLACK);
    }

    #[test]
    fn test_scene_line_endpoints() {
        let scene = scene_with(vec![SceneShape::Line(Segment {
            color: "blue".to_string(),
            x1: 0.0,
            y1: 0.5,
            x2: 1.0,
            y2: 0.5,
        })]);
        let (image, _) = render_scene(&scene);
        let blue = parse_color("blue").unwrap();
        assert_eq!(*image.get_pixel(0, 50), blue);
        assert_eq!(*image.get_pixel(199, 50), blue);
    }

    #[test]
    fn test_scene_min_size_floor() {
        let p = Placement { color: "black".to_string(), x: 0.5, y: 0.5, size: 0.0 };
        // 0.35 * 0.05 * 200 = 3.5
        assert_eq!(scene_box(&p, 200, 200), (97, 97, 104, 104));
    }

    #[test]
    fn test_empty_scene_is_background_only() {
        let (image, _) = render_scene(&scene_with(vec![]));
        assert!(ink(&image, WHITE).is_empty());
    }

    #[test]
    fn test_draw_shape_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/circle.png");
        let written = draw_shape("circle", &ShapeStyle::default(), &path).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 300);
    }

    #[test]
    fn test_draw_scene_writes_png() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scene.png");
        let written = draw_scene(&Scene::default(), &path).unwrap();
        assert_eq!(written, path);
        assert_eq!(image::open(&path).unwrap().height(), 640);
    }
}
