//! Colour names: normalization for scenes and parsing for the renderer
//!
//! Scene colours come from untrusted text, so they are first normalized to a
//! small supported set (with aliases and hex pass-through). Rendering then
//! parses any CSS colour string into RGBA.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Colour used when a scene colour is absent or unrecognized.
pub const DEFAULT_COLOR: &str = "black";

/// Colour names a scene may use verbatim.
pub const SUPPORTED_COLORS: &[&str] = &[
    "black",
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "orange",
    "purple",
    "pink",
    "brown",
    "gray",
    "grey",
    "lightblue",
    "lightgreen",
    "peachpuff",
    "gold",
    "navy",
    "teal",
    "maroon",
    "olive",
];

/// Informal names mapped onto supported colours.
pub const COLOR_ALIASES: &[(&str, &str)] = &[
    ("peach", "peachpuff"),
    ("skin", "peachpuff"),
    ("skin-tone", "peachpuff"),
    ("beige", "peachpuff"),
    ("azure", "lightblue"),
    ("lime", "green"),
    ("grey", "gray"),
];

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Normalize an untrusted colour name for use in a scene.
///
/// Lower-cases and trims, then: supported names pass through, aliases are
/// mapped, `#rgb`/`#rrggbb` hex passes through, anything else becomes
/// [`DEFAULT_COLOR`]. The result is always a fixed point of this function.
///
/// # Examples
///
/// ```
/// use text2shape::color::normalize_color;
///
/// assert_eq!(normalize_color(" Red "), "red");
/// assert_eq!(normalize_color("peach"), "peachpuff");
/// assert_eq!(normalize_color("#A0B"), "#a0b");
/// assert_eq!(normalize_color("chartreuse-ish"), "black");
/// ```
pub fn normalize_color(raw: &str) -> String {
    let c = raw.trim().to_lowercase();
    if SUPPORTED_COLORS.contains(&c.as_str()) {
        return c;
    }
    if let Some((_, mapped)) = COLOR_ALIASES.iter().find(|(alias, _)| *alias == c) {
        return (*mapped).to_string();
    }
    if is_short_hex(&c) {
        return c;
    }
    DEFAULT_COLOR.to_string()
}

/// True for `#` followed by exactly 3 or 6 hex digits.
pub fn is_short_hex(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Parse a CSS color string into an RGBA color.
///
/// Accepts hex (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`), functional
/// notation such as `rgb()`/`hsl()`, and CSS named colours.
///
/// # Examples
///
/// ```
/// use text2shape::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("peachpuff").unwrap(), image::Rgba([255, 218, 185, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    parse_css_color(s)
}

/// Parse the digits after '#'
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.len() {
        // Short forms double each digit
        3 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, 255])),
        4 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, digits[3] * 17])),
        6 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            255,
        ])),
        8 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            digits[6] * 16 + digits[7],
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Value of an ASCII hex digit; callers check `is_ascii_hexdigit` first.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, named colors, ...)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let r = (rgb.r * 255.0).round() as u8;
                let g = (rgb.g * 255.0).round() as u8;
                let b = (rgb.b * 255.0).round() as u8;
                let a = (rgb.alpha * 255.0).round() as u8;
                Ok(Rgba([r, g, b, a]))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
