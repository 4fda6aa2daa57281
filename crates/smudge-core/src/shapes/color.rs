//! Colors for region borders and fills.

use peniko::Color;
use peniko::color::Srgb;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
///
/// Deserializes either from a `{ r, g, b, a }` object or from a CSS color
/// string such as `"rgba(0, 0, 0, 0.3)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColorRepr")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    /// Create a color from RGBA8 channels.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Opaque white.
    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Format as a CSS `rgb()`/`rgba()` string.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let alpha = (f64::from(self.a) / 255.0 * 100.0).round() / 100.0;
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Rgba {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    255
}

impl From<ColorRepr> for SerializableColor {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Css(s) => parse_css_color(&s),
            ColorRepr::Rgba { r, g, b, a } => Self::new(r, g, b, a),
        }
    }
}

/// Parse a CSS color string to SerializableColor.
///
/// Accepts anything the CSS color parser in `peniko` understands: hex,
/// `rgb()`/`rgba()`, `hsl()` and named colors. Anything else is black.
pub fn parse_css_color(color: &str) -> SerializableColor {
    let color = color.trim();

    if color.eq_ignore_ascii_case("transparent") {
        return SerializableColor::transparent();
    }

    match peniko::color::parse_color(color) {
        Ok(parsed) => parsed.to_alpha_color::<Srgb>().into(),
        Err(err) => {
            log::warn!("Unrecognized color {:?} ({:?}), using black", color, err);
            SerializableColor::black()
        }
    }
}
