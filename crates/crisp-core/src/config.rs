//! Demo scene content: colors, the static frame, and the cursor stroke.
//!
//! Kept apart from the alignment and compositing code so the algorithm
//! never sees a literal coordinate or color.

use crate::error::ConfigError;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

// ─── Defaults ────────────────────────────────────────────────────────────

/// Stroke color of the static background lines.
pub const LINE_COLOR: Color = Color::rgb(0xFF, 0xFF, 0xFF);

/// Stroke color of the cursor line on the foreground layer.
pub const ACCENT_COLOR: Color = Color::rgb(0xFF, 0x95, 0x00);

/// Foreground backdrop. Must stay black: compositing with `lighter`
/// leaves the destination untouched wherever the source is black.
pub const FOREGROUND_FILL: Color = Color::BLACK;

/// Line thickness in logical pixels.
pub const LINE_THICKNESS: f64 = 1.0;

/// Bounding box of the background "L" and its diagonal, in logical pixels.
pub const FRAME: Rect = Rect::new(10.0, 10.0, 990.0, 590.0);

/// Half the length of the horizontal cursor stroke, in logical pixels.
pub const CURSOR_HALF_LENGTH: f64 = 10.0;

// ─── Color ───────────────────────────────────────────────────────────────

/// Opaque sRGB color. Serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// `#RRGGBB`, upper case. Accepted by `strokeStyle` / `fillStyle`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or(ConfigError::InvalidColor(value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// Overridable scene content. Missing JSON fields fall back to the
/// constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub line_color: Color,
    pub accent_color: Color,
    /// Logical thickness for both layers.
    pub line_thickness: f64,
    pub frame: Rect,
    pub cursor_half_length: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            line_color: LINE_COLOR,
            accent_color: ACCENT_COLOR,
            line_thickness: LINE_THICKNESS,
            frame: FRAME,
            cursor_half_length: CURSOR_HALF_LENGTH,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON scene description.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("line_thickness", self.line_thickness)?;
        positive("cursor_half_length", self.cursor_half_length)?;
        Ok(())
    }

    /// Top edge, left edge, and corner-to-corner diagonal of the frame,
    /// all starting from its top-left corner.
    pub fn background_segments(&self) -> [(Point, Point); 3] {
        let f = self.frame;
        let origin = Point::new(f.x0, f.y0);
        [
            (origin, Point::new(f.x1, f.y0)),
            (origin, Point::new(f.x0, f.y1)),
            (origin, Point::new(f.x1, f.y1)),
        ]
    }

    /// Horizontal stroke centered on the pointer.
    pub fn cursor_segment(&self, at: Point) -> (Point, Point) {
        let half = self.cursor_half_length;
        (Point::new(at.x - half, at.y), Point::new(at.x + half, at.y))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
