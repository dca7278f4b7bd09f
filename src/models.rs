//! Data models for shape names and normalized scenes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A canonical shape name from the fixed drawing vocabulary.
///
/// The declaration order is the vocabulary order, which is also the
/// tie-break order for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeName {
    Circle,
    Square,
    Triangle,
    Line,
    Tree,
    House,
    Sun,
}

impl ShapeName {
    /// Every shape a direct command can name, in vocabulary order.
    pub const ALL: [ShapeName; 7] = [
        ShapeName::Circle,
        ShapeName::Square,
        ShapeName::Triangle,
        ShapeName::Line,
        ShapeName::Tree,
        ShapeName::House,
        ShapeName::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeName::Circle => "circle",
            ShapeName::Square => "square",
            ShapeName::Triangle => "triangle",
            ShapeName::Line => "line",
            ShapeName::Tree => "tree",
            ShapeName::House => "house",
            ShapeName::Sun => "sun",
        }
    }

    /// Composite shapes are drawn from several fixed sub-primitives.
    pub fn is_composite(self) -> bool {
        matches!(self, ShapeName::Tree | ShapeName::House | ShapeName::Sun)
    }

    /// The scene-capable primitive this name corresponds to, if any.
    pub fn primitive(self) -> Option<Primitive> {
        match self {
            ShapeName::Circle => Some(Primitive::Circle),
            ShapeName::Square => Some(Primitive::Square),
            ShapeName::Triangle => Some(Primitive::Triangle),
            ShapeName::Line => Some(Primitive::Line),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeName {
    type Err = ();

    /// Exact, case-sensitive lookup. Callers normalize case first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeName::ALL.into_iter().find(|name| name.as_str() == s).ok_or(())
    }
}

/// The primitive kinds a scene may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Circle,
    Square,
    Triangle,
    Line,
}

impl Primitive {
    pub const ALL: [Primitive; 4] =
        [Primitive::Circle, Primitive::Square, Primitive::Triangle, Primitive::Line];

    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::Circle => "circle",
            Primitive::Square => "square",
            Primitive::Triangle => "triangle",
            Primitive::Line => "line",
        }
    }

    pub fn parse(s: &str) -> Option<Primitive> {
        Primitive::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

/// Canvas descriptor of a scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub bg: String,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: 640, height: 640, bg: "lightblue".to_string() }
    }
}

/// Placement of a circle, square or triangle.
///
/// `x`/`y` are the normalized center, `size` the normalized extent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Endpoints of a line, normalized to the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub color: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One primitive in a scene, tagged by its `shape` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum SceneShape {
    Circle(Placement),
    Square(Placement),
    Triangle(Placement),
    Line(Segment),
}

impl SceneShape {
    pub fn primitive(&self) -> Primitive {
        match self {
            SceneShape::Circle(_) => Primitive::Circle,
            SceneShape::Square(_) => Primitive::Square,
            SceneShape::Triangle(_) => Primitive::Triangle,
            SceneShape::Line(_) => Primitive::Line,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            SceneShape::Circle(p) | SceneShape::Square(p) | SceneShape::Triangle(p) => &p.color,
            SceneShape::Line(s) => &s.color,
        }
    }
}

/// A normalized scene: canvas plus an ordered, bounded list of primitives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Scene {
    pub canvas: Canvas,
    pub shapes: Vec<SceneShape>,
}

impl Scene {
    /// A scene with no shapes means nothing useful was produced.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
