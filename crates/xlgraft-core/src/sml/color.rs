//! Colors, theme palettes and theme color resolution.

use crate::error::Result;
use crate::xml::namespaces::A;
use crate::xml::XmlDocument;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// ARGB color (`0xAARRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Accepts `RRGGBB` or `AARRGGBB`, with or without a leading `#`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        match hex.len() {
            6 => u32::from_str_radix(hex, 16).ok().map(|rgb| Self(0xFF00_0000 | rgb)),
            8 => u32::from_str_radix(hex, 16).ok().map(Self),
            _ => None,
        }
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// `AARRGGBB`, the form SpreadsheetML `rgb` attributes use.
    pub fn to_argb_hex(self) -> String {
        format!("{:08X}", self.0)
    }

    /// Applies an Excel tint (`-1.0..=1.0`) to the HLS luminance.
    ///
    /// Negative tints darken: `L' = L * (1 + tint)`. Positive tints
    /// lighten: `L' = L * (1 - tint) + tint`. Hue, saturation and alpha are
    /// kept.
    pub fn with_tint(self, tint: f64) -> Self {
        if tint == 0.0 || !tint.is_finite() {
            return self;
        }
        let tint = tint.clamp(-1.0, 1.0);

        let (h, l, s) = rgb_to_hls(self.red(), self.green(), self.blue());
        let l = if tint < 0.0 {
            l * (1.0 + tint)
        } else {
            l * (1.0 - tint) + tint
        };
        let (r, g, b) = hls_to_rgb(h, l.clamp(0.0, 1.0), s);

        Self((self.alpha() as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
    }
}

fn rgb_to_hls(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, l, 0.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (u8, u8, u8) {
    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if s == 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, h)),
        to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// A color as written in a style part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Color {
    Rgb(Rgb),
    /// Index into the workbook theme palette plus a tint in `-1.0..=1.0`.
    Theme { index: u32, tint: f64 },
    /// Legacy indexed palette entry.
    Indexed(u32),
    Auto,
}

// Tints compare by bit pattern so colors can key hash maps.
impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Color::Rgb(rgb) => rgb.hash(state),
            Color::Theme { index, tint } => {
                index.hash(state);
                tint.to_bits().hash(state);
            }
            Color::Indexed(i) => i.hash(state),
            Color::Auto => {}
        }
    }
}

impl Color {
    pub fn rgb(argb: u32) -> Self {
        Color::Rgb(Rgb(argb))
    }

    pub fn theme(index: u32) -> Self {
        Color::Theme { index, tint: 0.0 }
    }
}

/// Workbook theme: the color palette plus the raw theme part.
///
/// Palette slots follow the SpreadsheetML `theme` attribute order:
/// 0 lt1, 1 dk1, 2 lt2, 3 dk2, 4-9 accent1-6, 10 hlink, 11 folHlink.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    pub palette: Vec<Option<Rgb>>,
    /// Bytes of `xl/theme/theme1.xml` as loaded, written back verbatim.
    pub raw: Option<Vec<u8>>,
}

const SCHEME_SLOTS: [&str; 12] = [
    "lt1", "dk1", "lt2", "dk2", "accent1", "accent2", "accent3", "accent4", "accent5",
    "accent6", "hlink", "folHlink",
];

impl Theme {
    pub fn new(palette: Vec<Option<Rgb>>) -> Self {
        Self { palette, raw: None }
    }

    /// Default Office palette.
    pub fn office() -> Self {
        Self::new(
            [
                0xFFFFFFFF, 0xFF000000, 0xFFEEECE1, 0xFF1F497D, 0xFF4F81BD, 0xFFC0504D,
                0xFF9BBB59, 0xFF8064A2, 0xFF4BACC6, 0xFFF79646, 0xFF0000FF, 0xFF800080,
            ]
            .into_iter()
            .map(|argb| Some(Rgb(argb)))
            .collect(),
        )
    }

    /// Reads the `a:clrScheme` of a theme part. Slots the scheme does not
    /// define stay empty.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let doc = crate::xml::parser::parse_bytes(bytes)?;
        let mut theme = Self {
            palette: vec![None; SCHEME_SLOTS.len()],
            raw: Some(bytes.to_vec()),
        };

        let Some(root) = doc.root() else {
            return Ok(theme);
        };
        let Some(scheme) = doc.find_descendant(root, &A::clrScheme()) else {
            return Ok(theme);
        };

        for (slot, name) in SCHEME_SLOTS.iter().enumerate() {
            theme.palette[slot] = doc
                .element_children(scheme)
                .find(|&n| doc.get(n).and_then(|d| d.local_name()) == Some(*name))
                .and_then(|entry| scheme_entry_color(&doc, entry));
        }
        Ok(theme)
    }

    pub fn color(&self, index: u32) -> Option<Rgb> {
        self.palette.get(index as usize).copied().flatten()
    }
}

fn scheme_entry_color(doc: &XmlDocument, entry: indextree::NodeId) -> Option<Rgb> {
    let clr = doc.element_children(entry).next()?;
    match doc.get(clr)?.local_name()? {
        "srgbClr" => doc.attribute_local(clr, "val").and_then(Rgb::parse_hex),
        "sysClr" => doc
            .attribute_local(clr, "lastClr")
            .and_then(Rgb::parse_hex)
            .or_else(|| match doc.attribute_local(clr, "val")? {
                "windowText" => Some(Rgb(0xFF000000)),
                "window" => Some(Rgb(0xFFFFFFFF)),
                _ => None,
            }),
        _ => None,
    }
}

/// Resolves a color against the theme it was authored with.
///
/// Absence propagates: no color, an automatic color, or a theme slot the
/// theme lacks all yield `None`. Theme tints are applied to the slot color.
pub fn resolve_color(color: Option<&Color>, theme: &Theme) -> Option<Rgb> {
    match color? {
        Color::Rgb(rgb) => Some(*rgb),
        Color::Theme { index, tint } => theme.color(*index).map(|rgb| rgb.with_tint(*tint)),
        Color::Indexed(index) => indexed_color(*index),
        Color::Auto => None,
    }
}

/// Standard 64-entry legacy palette plus the two system colors.
pub fn indexed_color(index: u32) -> Option<Rgb> {
    let rgb: [u8; 3] = match index {
        0 | 8 => [0, 0, 0],
        1 | 9 => [255, 255, 255],
        2 | 10 => [255, 0, 0],
        3 | 11 => [0, 255, 0],
        4 | 12 => [0, 0, 255],
        5 | 13 => [255, 255, 0],
        6 | 14 => [255, 0, 255],
        7 | 15 => [0, 255, 255],
        16 => [128, 0, 0],
        17 => [0, 128, 0],
        18 => [0, 0, 128],
        19 => [128, 128, 0],
        20 => [128, 0, 128],
        21 => [0, 128, 128],
        22 => [192, 192, 192],
        23 => [128, 128, 128],
        24 => [153, 153, 255],
        25 => [153, 51, 102],
        26 => [255, 255, 204],
        27 => [204, 255, 255],
        28 => [102, 0, 102],
        29 => [255, 128, 128],
        30 => [0, 102, 204],
        31 => [204, 204, 255],
        32 => [0, 0, 128],
        33 => [255, 0, 255],
        34 => [255, 255, 0],
        35 => [0, 255, 255],
        36 => [128, 0, 128],
        37 => [128, 0, 0],
        38 => [0, 128, 128],
        39 => [0, 0, 255],
        40 => [0, 204, 255],
        41 => [204, 255, 255],
        42 => [204, 255, 204],
        43 => [255, 255, 153],
        44 => [153, 204, 255],
        45 => [255, 153, 204],
        46 => [204, 153, 255],
        47 => [255, 204, 153],
        48 => [51, 102, 255],
        49 => [51, 204, 204],
        50 => [153, 204, 0],
        51 => [255, 204, 0],
        52 => [255, 153, 0],
        53 => [255, 102, 0],
        54 => [102, 102, 153],
        55 => [150, 150, 150],
        56 => [0, 51, 102],
        57 => [51, 153, 102],
        58 => [0, 51, 0],
        59 => [51, 51, 0],
        60 => [153, 51, 0],
        61 => [153, 51, 51],
        62 => [51, 51, 153],
        63 => [51, 51, 51],
        // System foreground and background.
        64 => [0, 0, 0],
        65 => [255, 255, 255],
        _ => return None,
    };
    Some(Rgb::from_rgb(rgb[0], rgb[1], rgb[2]))
}
