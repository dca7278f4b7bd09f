//! Shape rasterization primitives.
//!
//! These functions convert geometric shapes into sets of integer pixel
//! coordinates. Bounding boxes are inclusive on both ends, and outlines grow
//! inward from the box so a shape never paints outside its bounds.

use std::collections::HashSet;

/// Rasterize a line using Bresenham's line algorithm.
///
/// Returns all pixels that form a line between two points.
///
/// # Examples
///
/// ```
/// use text2shape::shapes::rasterize_line;
///
/// let pixels = rasterize_line((0, 0), (3, 3));
/// assert_eq!(pixels.len(), 4);
/// assert!(pixels.contains(&(0, 0)));
/// assert!(pixels.contains(&(3, 3)));
/// ```
pub fn rasterize_line(p0: (i32, i32), p1: (i32, i32)) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        pixels.insert((x0, y0));

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    pixels
}

/// Rasterize a line of the given width.
///
/// A `width`-sized square is stamped on every Bresenham pixel. Width 1 is a
/// plain Bresenham line; width 0 draws nothing.
pub fn rasterize_thick_line(p0: (i32, i32), p1: (i32, i32), width: i32) -> HashSet<(i32, i32)> {
    if width <= 0 {
        return HashSet::new();
    }
    let spine = rasterize_line(p0, p1);
    if width == 1 {
        return spine;
    }

    let lo = -(width / 2);
    let hi = lo + width - 1;
    let mut pixels = HashSet::with_capacity(spine.len() * (width * width) as usize);
    for (x, y) in spine {
        for oy in lo..=hi {
            for ox in lo..=hi {
                pixels.insert((x + ox, y + oy));
            }
        }
    }
    pixels
}

/// Rasterize a filled rectangle.
///
/// Returns all pixels within a rectangle defined by top-left corner (x, y)
/// and dimensions (w, h).
///
/// # Examples
///
/// ```
/// use text2shape::shapes::rasterize_rect;
///
/// let pixels = rasterize_rect(0, 0, 3, 2);
/// assert_eq!(pixels.len(), 6);
/// assert!(pixels.contains(&(0, 0)));
/// assert!(pixels.contains(&(2, 1)));
/// ```
pub fn rasterize_rect(x: i32, y: i32, w: i32, h: i32) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();

    if w <= 0 || h <= 0 {
        return pixels;
    }

    for dy in 0..h {
        for dx in 0..w {
            pixels.insert((x + dx, y + dy));
        }
    }

    pixels
}

/// Rasterize a stroked rectangle (outline only).
///
/// Returns pixels forming the outline of a rectangle with specified thickness.
///
/// # Examples
///
/// ```
/// use text2shape::shapes::rasterize_stroke;
///
/// let pixels = rasterize_stroke(0, 0, 4, 4, 1);
/// assert!(pixels.contains(&(0, 0)));
/// assert!(pixels.contains(&(3, 0)));
/// assert!(!pixels.contains(&(1, 1))); // Interior should be empty
/// ```
pub fn rasterize_stroke(x: i32, y: i32, w: i32, h: i32, thickness: i32) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();

    if w <= 0 || h <= 0 || thickness <= 0 {
        return pixels;
    }

    // Top and bottom edges
    for dx in 0..w {
        for t in 0..thickness.min(h) {
            pixels.insert((x + dx, y + t));
            pixels.insert((x + dx, y + h - 1 - t));
        }
    }

    // Left and right edges
    for dy in 0..h {
        for t in 0..thickness.min(w) {
            pixels.insert((x + t, y + dy));
            pixels.insert((x + w - 1 - t, y + dy));
        }
    }

    pixels
}

/// Rasterize a filled ellipse inscribed in the inclusive box
/// `(x0, y0)-(x1, y1)`.
///
/// A pixel is inside when `((x-cx)/rx)^2 + ((y-cy)/ry)^2 <= 1`, with the
/// center and radii taken from the box, so the extreme pixels touch all four
/// sides of the box.
///
/// # Examples
///
/// ```
/// use text2shape::shapes::rasterize_ellipse;
///
/// let pixels = rasterize_ellipse(0, 0, 10, 10);
/// assert!(pixels.contains(&(5, 5)));
/// assert!(pixels.contains(&(0, 5)));
/// assert!(!pixels.contains(&(0, 0)));
/// ```
pub fn rasterize_ellipse(x0: i32, y0: i32, x1: i32, y1: i32) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();
    if x1 < x0 || y1 < y0 {
        return pixels;
    }

    let cx = (x0 + x1) as f64 / 2.0;
    let cy = (y0 + y1) as f64 / 2.0;
    let rx = (x1 - x0) as f64 / 2.0;
    let ry = (y1 - y0) as f64 / 2.0;

    for y in y0..=y1 {
        for x in x0..=x1 {
            if inside_ellipse(x as f64 - cx, y as f64 - cy, rx, ry) {
                pixels.insert((x, y));
            }
        }
    }

    pixels
}

/// Rasterize an ellipse outline of the given thickness inside the inclusive
/// box `(x0, y0)-(x1, y1)`.
pub fn rasterize_ellipse_outline(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: i32,
) -> HashSet<(i32, i32)> {
    if thickness <= 0 {
        return HashSet::new();
    }
    let outer = rasterize_ellipse(x0, y0, x1, y1);
    // Inner box collapsed: the outline is the whole disc
    if x1 - x0 < 2 * thickness || y1 - y0 < 2 * thickness {
        return outer;
    }
    let inner =
        rasterize_ellipse(x0 + thickness, y0 + thickness, x1 - thickness, y1 - thickness);
    outer.difference(&inner).copied().collect()
}

/// Point-in-ellipse test relative to the center. Degenerate radii collapse
/// the ellipse to a line along that axis.
fn inside_ellipse(dx: f64, dy: f64, rx: f64, ry: f64) -> bool {
    let term = |d: f64, r: f64| {
        if r == 0.0 {
            if d == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            (d / r) * (d / r)
        }
    };
    // Small tolerance so extreme pixels on the axes survive rounding
    term(dx, rx) + term(dy, ry) <= 1.0 + 1e-9
}

/// Rasterize a filled polygon using scanline fill algorithm.
///
/// Returns all pixels within a polygon defined by a list of vertices.
/// Uses an even-odd fill rule.
///
/// # Examples
///
/// ```
/// use text2shape::shapes::rasterize_polygon;
///
/// let triangle = vec![(0, 0), (4, 0), (2, 3)];
/// let pixels = rasterize_polygon(&triangle);
/// assert!(pixels.len() > 0);
/// assert!(pixels.contains(&(2, 1)));
/// ```
pub fn rasterize_polygon(vertices: &[(i32, i32)]) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();

    if vertices.len() < 3 {
        return pixels;
    }

    let min_y = vertices.iter().map(|(_, y)| *y).min().unwrap_or(0);
    let max_y = vertices.iter().map(|(_, y)| *y).max().unwrap_or(0);

    for y in min_y..=max_y {
        let mut intersections = Vec::new();

        for i in 0..vertices.len() {
            let j = (i + 1) % vertices.len();
            let (x1, y1) = vertices[i];
            let (x2, y2) = vertices[j];

            // Skip horizontal edges
            if y1 == y2 {
                continue;
            }

            // Half-open on the upper endpoint so shared vertices count once
            let y_min = y1.min(y2);
            let y_max = y1.max(y2);
            if y >= y_min && (y < y_max || (y == max_y && y == y_max)) {
                let x = x1 + (y - y1) * (x2 - x1) / (y2 - y1);
                intersections.push(x);
            }
        }

        intersections.sort_unstable();

        for chunk in intersections.chunks(2) {
            if chunk.len() == 2 {
                for x in chunk[0]..=chunk[1] {
                    pixels.insert((x, y));
                }
            }
        }
    }

    // Scanline fill can miss slivers along steep edges; the outline covers them
    pixels.extend(rasterize_polygon_outline(vertices, 1));
    pixels
}

/// Rasterize the closed outline of a polygon with lines of the given width.
pub fn rasterize_polygon_outline(vertices: &[(i32, i32)], width: i32) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        pixels.extend(rasterize_thick_line(vertices[i], vertices[j], width));
    }
    pixels
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of a pixel set.
pub fn bounds(pixels: &HashSet<(i32, i32)>) -> Option<(i32, i32, i32, i32)> {
    let mut iter = pixels.iter();
    let &(x, y) = iter.next()?;
    Some(iter.fold((x, y, x, y), |(x0, y0, x1, y1), &(px, py)| {
        (x0.min(px), y0.min(py), x1.max(px), y1.max(py))
    }))
}
