//! Scene normalization: untrusted candidate JSON to a bounded, valid [`Scene`]
//!
//! Nothing here fails. Missing canvas fields take defaults, invalid shapes
//! are dropped one by one, numeric fields are clamped and snapped to a 0.05
//! grid, colours are normalized, and the list is truncated to `max_shapes`.
//!
//! Positional primitives (circle, square, triangle) are clamped to [0, 1],
//! snapped, then restricted to [0.10, 0.90] (position) and [0.10, 0.50]
//! (size) so they stay on canvas and visible. Lines are clamped to [0, 1]
//! and snapped only; their endpoints may sit on the canvas edge.

use crate::color::{normalize_color, DEFAULT_COLOR};
use crate::models::{Canvas, Placement, Primitive, Scene, SceneShape, Segment};
use crate::parser::extract_json_lenient;
use serde_json::{Map, Value};
use tracing::debug;

/// Upper bound on shapes kept from a candidate scene.
pub const MAX_SCENE_SHAPES: usize = 12;

/// Largest canvas dimension accepted from a candidate scene.
pub const MAX_CANVAS_DIM: u32 = 4096;

/// Grid steps per unit; 20 steps of 0.05.
const GRID_STEPS: f64 = 20.0;

const POSITION_MIN: f64 = 0.10;
const POSITION_MAX: f64 = 0.90;
const SIZE_MIN: f64 = 0.10;
const SIZE_MAX: f64 = 0.50;

const DEFAULT_POSITION: f64 = 0.5;
const DEFAULT_SIZE: f64 = 0.25;

/// Normalize an untrusted candidate scene.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use text2shape::normalizer::{normalize, MAX_SCENE_SHAPES};
///
/// let scene = normalize(
///     &json!({"shapes": [{"shape": "circle", "x": 0.02, "y": 0.51, "size": 0.9}]}),
///     MAX_SCENE_SHAPES,
/// );
/// assert_eq!(scene.canvas.width, 640);
/// assert_eq!(scene.shapes.len(), 1);
/// ```
pub fn normalize(candidate: &Value, max_shapes: usize) -> Scene {
    let canvas = normalize_canvas(candidate.get("canvas"));

    let shapes: Vec<SceneShape> = candidate
        .get("shapes")
        .and_then(Value::as_array)
        .map(|raw| raw.iter().filter_map(normalize_shape).take(max_shapes).collect())
        .unwrap_or_default();

    Scene { canvas, shapes }
}

/// Extract the first JSON object from free text and normalize it.
///
/// Text without a usable object yields an empty default scene.
pub fn normalize_str(text: &str, max_shapes: usize) -> Scene {
    match extract_json_lenient(text) {
        Some(value) => normalize(&value, max_shapes),
        None => Scene::default(),
    }
}

fn normalize_canvas(raw: Option<&Value>) -> Canvas {
    let defaults = Canvas::default();
    let Some(canvas) = raw.and_then(Value::as_object) else {
        return defaults;
    };

    Canvas {
        width: canvas_dim(canvas.get("width")).unwrap_or(defaults.width),
        height: canvas_dim(canvas.get("height")).unwrap_or(defaults.height),
        bg: match canvas.get("bg") {
            None | Some(Value::Null) => defaults.bg,
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        },
    }
}

/// Integer canvas dimension, truncated toward zero. Non-positive or
/// non-numeric values are rejected so the caller can use the default.
fn canvas_dim(raw: Option<&Value>) -> Option<u32> {
    let value = as_number(raw?)?.trunc();
    if value < 1.0 {
        return None;
    }
    Some(value.min(MAX_CANVAS_DIM as f64) as u32)
}

fn normalize_shape(raw: &Value) -> Option<SceneShape> {
    let obj = raw.as_object()?;
    let kind = obj.get("shape").and_then(Value::as_str)?.trim().to_lowercase();
    let Some(primitive) = Primitive::parse(&kind) else {
        debug!(shape = %kind, "dropping shape with unknown kind");
        return None;
    };

    let color = match obj.get("color") {
        Some(Value::String(s)) => normalize_color(s),
        _ => DEFAULT_COLOR.to_string(),
    };

    if primitive == Primitive::Line {
        if !has_fields(obj, &["x1", "y1", "x2", "y2"]) {
            debug!("dropping line without endpoints");
            return None;
        }
        return Some(SceneShape::Line(Segment {
            color,
            x1: snap(clamp01(obj.get("x1"), 0.2)),
            y1: snap(clamp01(obj.get("y1"), 0.2)),
            x2: snap(clamp01(obj.get("x2"), 0.8)),
            y2: snap(clamp01(obj.get("y2"), 0.8)),
        }));
    }

    if !has_fields(obj, &["x", "y", "size"]) {
        debug!(shape = %kind, "dropping shape without position or size");
        return None;
    }

    let placement = Placement {
        color,
        x: snap(clamp01(obj.get("x"), DEFAULT_POSITION)).clamp(POSITION_MIN, POSITION_MAX),
        y: snap(clamp01(obj.get("y"), DEFAULT_POSITION)).clamp(POSITION_MIN, POSITION_MAX),
        size: snap(clamp01(obj.get("size"), DEFAULT_SIZE)).clamp(SIZE_MIN, SIZE_MAX),
    };

    Some(match primitive {
        Primitive::Circle => SceneShape::Circle(placement),
        Primitive::Square => SceneShape::Square(placement),
        _ => SceneShape::Triangle(placement),
    })
}

/// A field counts as present when the key exists with a non-null value.
fn has_fields(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().all(|key| obj.get(*key).is_some_and(|v| !v.is_null()))
}

/// Finite number or numeric string. `"NaN"` and `"inf"` count as non-numeric.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Clamp into [0, 1]; non-numeric, NaN and infinite values take `default`.
fn clamp01(raw: Option<&Value>, default: f64) -> f64 {
    match raw.and_then(as_number) {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => default,
    }
}

/// Snap to the nearest multiple of 0.05.
fn snap(v: f64) -> f64 {
    (v * GRID_STEPS).round() / GRID_STEPS
}
