//! Colors, blend modes and the text attribute palette

use crate::error::{GraphicsError, GraphicsResult};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Build a color from unchecked integer channels.
    ///
    /// This is the boundary check for callers that marshal numbers from a
    /// script: any channel outside `0..=255` is reported instead of clamped.
    pub fn try_from_i64(r: i64, g: i64, b: i64, a: i64) -> GraphicsResult<Self> {
        fn channel(name: char, value: i64) -> GraphicsResult<u8> {
            u8::try_from(value).map_err(|_| GraphicsError::InvalidColor {
                channel: name,
                value,
            })
        }

        Ok(Self {
            r: channel('r', r)?,
            g: channel('g', g)?,
            b: channel('b', b)?,
            a: channel('a', a)?,
        })
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.to_array())
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        Color::from_array(pixel.0)
    }
}

/// How source pixels are combined with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Overwrite: `dst = src`
    None,
    /// Alpha blending
    #[default]
    Blend,
    /// Additive: `dst.rgb += src.rgb * src.a`
    Add,
    /// Color modulate: `dst.rgb *= src.rgb`
    Mod,
    /// Color multiply, weighted by source alpha
    Mul,
}

impl BlendMode {
    pub const ALL: [BlendMode; 5] = [
        BlendMode::None,
        BlendMode::Blend,
        BlendMode::Add,
        BlendMode::Mod,
        BlendMode::Mul,
    ];

    /// Name used by scripts.
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::None => "none",
            BlendMode::Blend => "blend",
            BlendMode::Add => "add",
            BlendMode::Mod => "mod",
            BlendMode::Mul => "mul",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }
}

/// 16-color CGA palette used by text attributes.
pub const PALETTE: [Color; 16] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0x00, 0x00, 0xAA),
    Color::rgb(0x00, 0xAA, 0x00),
    Color::rgb(0x00, 0xAA, 0xAA),
    Color::rgb(0xAA, 0x00, 0x00),
    Color::rgb(0xAA, 0x00, 0xAA),
    Color::rgb(0xAA, 0x55, 0x00),
    Color::rgb(0xAA, 0xAA, 0xAA),
    Color::rgb(0x55, 0x55, 0x55),
    Color::rgb(0x55, 0x55, 0xFF),
    Color::rgb(0x55, 0xFF, 0x55),
    Color::rgb(0x55, 0xFF, 0xFF),
    Color::rgb(0xFF, 0x55, 0x55),
    Color::rgb(0xFF, 0x55, 0xFF),
    Color::rgb(0xFF, 0xFF, 0x55),
    Color::rgb(0xFF, 0xFF, 0xFF),
];

/// Split a text attribute byte into `(foreground, background)`.
///
/// The low nibble picks the foreground, the high nibble the background.
/// Background index 0 is transparent rather than black.
pub fn attribute_colors(attr: u8) -> (Color, Color) {
    let fg = PALETTE[(attr & 0x0F) as usize];
    let bg = match attr >> 4 {
        0 => Color::TRANSPARENT,
        index => PALETTE[index as usize],
    };
    (fg, bg)
}
