//! Fence background colors and tint (transparency) handling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::validation::{MAX_TINT, MIN_TINT};

/// Background colors a fence can use. Persisted by symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FenceColor {
    #[default]
    Gray,
    Black,
    White,
    Green,
    Purple,
    Yellow,
    Red,
    Blue,
}

impl FenceColor {
    pub const ALL: [FenceColor; 8] = [
        FenceColor::Gray,
        FenceColor::Black,
        FenceColor::White,
        FenceColor::Green,
        FenceColor::Purple,
        FenceColor::Yellow,
        FenceColor::Red,
        FenceColor::Blue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FenceColor::Gray => "Gray",
            FenceColor::Black => "Black",
            FenceColor::White => "White",
            FenceColor::Green => "Green",
            FenceColor::Purple => "Purple",
            FenceColor::Yellow => "Yellow",
            FenceColor::Red => "Red",
            FenceColor::Blue => "Blue",
        }
    }

    /// Opaque RGB value as 0x00RRGGBB
    pub fn rgb(self) -> u32 {
        match self {
            FenceColor::Gray => 0x80_80_80,
            FenceColor::Black => 0x00_00_00,
            FenceColor::White => 0xFF_FF_FF,
            FenceColor::Green => 0x00_80_00,
            FenceColor::Purple => 0x80_00_80,
            FenceColor::Yellow => 0xFF_FF_00,
            FenceColor::Red => 0xFF_00_00,
            FenceColor::Blue => 0x00_00_FF,
        }
    }

    /// Combine with a tint into a translucent ARGB color
    pub fn tinted(self, tint: Tint) -> TintedColor {
        TintedColor(((tint.alpha() as u32) << 24) | self.rgb())
    }
}

impl fmt::Display for FenceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when text does not name a member of one of the settings enums
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl FromStr for FenceColor {
    type Err = UnknownVariant;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "color",
                value: s.to_string(),
                expected: Self::ALL.map(|c| c.name()).join(", "),
            })
    }
}

/// Fence background transparency in percent, always within 1..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Tint(u8);

impl Tint {
    pub const MIN: Tint = Tint(MIN_TINT);
    pub const MAX: Tint = Tint(MAX_TINT);

    /// Build a tint, clamping out-of-range values into 1..=100
    pub fn clamped(percent: i64) -> Self {
        Tint(percent.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    /// Build a tint, rejecting out-of-range values
    pub fn new(percent: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0).contains(&percent).then_some(Tint(percent))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// 8-bit alpha channel for this tint
    pub fn alpha(self) -> u8 {
        ((self.0 as u32 * 255 + 50) / 100) as u8
    }

    /// Value for _NET_WM_WINDOW_OPACITY (0 = transparent, u32::MAX = opaque)
    pub fn to_window_opacity(self) -> u32 {
        ((self.0 as u64 * u32::MAX as u64) / MAX_TINT as u64) as u32
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint(85)
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// ARGB color actually painted on a fence background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TintedColor(u32);

impl TintedColor {
    pub fn argb32(self) -> u32 {
        self.0
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// RGB part without alpha, suitable for an X11 background pixel
    pub fn rgb(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }
}

impl fmt::Display for TintedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}
