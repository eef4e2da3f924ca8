use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LiveryError;

/// Identifier of a stop node in the host's network store. `0` means "no stop".
pub type StopId = u32;

/// Identifier of a district. `0` means "outside any district".
pub type DistrictId = u16;

/// Identifier of a transit line in the host's line store.
pub type LineId = u16;

/// RGBA color with 8-bit channels. Equality is exact per channel, alpha included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque black, returned when a palette has no usable entries.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA`, `0xRRGGBB` or a bare hex run (case-insensitive).
    ///
    /// Alpha defaults to 255 when only six digits are given. Anything else yields `None`.
    pub fn from_hex(token: &str) -> Option<Self> {
        let t = token.trim();
        let t = t.strip_prefix('#').unwrap_or(t);
        let t = t
            .strip_prefix("0x")
            .or_else(|| t.strip_prefix("0X"))
            .unwrap_or(t);
        if !(t.len() == 6 || t.len() == 8) || !t.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&t[i..i + 2], 16).ok();
        let alpha = if t.len() == 8 { channel(6)? } else { 255 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// `#RRGGBB` form, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            f.write_str(&self.to_hex())
        } else {
            write!(f, "{}{:02X}", self.to_hex(), self.a)
        }
    }
}

impl FromStr for Color {
    type Err = LiveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s).ok_or_else(|| LiveryError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = LiveryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Transport category of a line, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportCategory {
    Bus,
    Metro,
    Train,
    Tram,
    Monorail,
    Ship,
    Airplane,
}

/// Palette family searched by the hue-based strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFamily {
    Any,
    Blue,
    Green,
    Orange,
}

impl ColorFamily {
    pub const ALL: [ColorFamily; 4] = [
        ColorFamily::Any,
        ColorFamily::Blue,
        ColorFamily::Green,
        ColorFamily::Orange,
    ];
}

impl From<TransportCategory> for ColorFamily {
    fn from(category: TransportCategory) -> Self {
        match category {
            TransportCategory::Bus => ColorFamily::Blue,
            TransportCategory::Metro => ColorFamily::Green,
            TransportCategory::Train => ColorFamily::Orange,
            _ => ColorFamily::Any,
        }
    }
}

/// Brightness tier used by the categorised strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessClass {
    Bright,
    Pale,
    Dark,
}

impl BrightnessClass {
    pub const ALL: [BrightnessClass; 3] = [
        BrightnessClass::Bright,
        BrightnessClass::Pale,
        BrightnessClass::Dark,
    ];
}

impl From<TransportCategory> for BrightnessClass {
    fn from(category: TransportCategory) -> Self {
        match category {
            TransportCategory::Bus => BrightnessClass::Pale,
            TransportCategory::Metro => BrightnessClass::Bright,
            _ => BrightnessClass::Dark,
        }
    }
}

/// World position of a stop. Only the ground plane matters for district lookup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub z: f32,
}

/// A stop as seen through the host's network store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopNode {
    pub position: Position,
    pub next: StopId,
    pub prev: StopId,
}

/// Read-only projection of a transit line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineView {
    pub id: LineId,
    /// Number shown to players, used in generated names (`#<number> ...`).
    pub number: u16,
    pub category: TransportCategory,
    pub stops_head: StopId,
    pub color: Color,
    pub is_active: bool,
    pub has_custom_color: bool,
    pub has_custom_name: bool,
}

impl LineView {
    /// Active and never touched by the operator (or by a previous pass).
    pub fn needs_livery(&self) -> bool {
        self.is_active && !self.has_custom_color && !self.has_custom_name
    }
}

/// Districts visited by a full circuit of a line.
///
/// `districts` keeps first-visit order without duplicates; the empty string stands
/// for "outside any district" and is collapsed like any other name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamingContext {
    pub districts: Vec<String>,
    pub stop_count: usize,
}

impl NamingContext {
    /// Record a visited stop, keeping the district list unique.
    pub fn visit(&mut self, district: String) {
        self.stop_count += 1;
        if !self.districts.contains(&district) {
            self.districts.push(district);
        }
    }
}

/// Bounded sample of a line, used by the London strategy.
///
/// Unlike [`NamingContext`], `districts` holds real district names only; stops
/// outside any district raise `non_district` instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineAnalysis {
    pub districts: Vec<String>,
    pub stop_count: usize,
    pub non_district: bool,
}

impl LineAnalysis {
    pub fn district_count(&self) -> usize {
        self.districts.len()
    }
}

/// Result of one line's processing: what the host should write back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub line: LineId,
    pub number: u16,
    pub color: Color,
    /// `None` leaves the existing name untouched.
    pub name: Option<String>,
}
