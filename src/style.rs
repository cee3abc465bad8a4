//! Effective fence style: per-fence overrides over global settings
//!
//! Color can be overridden per fence; tint is always global.

use crate::color::{FenceColor, Tint, TintedColor};
use crate::config::GlobalSettings;
use crate::fence::FenceRecord;

/// Style painted on one fence window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceStyle {
    pub color: FenceColor,
    pub tint: Tint,
}

impl FenceStyle {
    /// Global color and tint, ignoring any override
    pub fn global(global: &GlobalSettings) -> Self {
        Self {
            color: global.selected_color,
            tint: effective_tint(global),
        }
    }

    pub fn tinted_color(&self) -> TintedColor {
        self.color.tinted(self.tint)
    }
}

pub fn effective_color(record: &FenceRecord, global: &GlobalSettings) -> FenceColor {
    record.custom_color.unwrap_or(global.selected_color)
}

pub fn effective_tint(global: &GlobalSettings) -> Tint {
    global.tint_value
}

/// Style for a fence, or the global style when the fence has no record
pub fn resolve(record: Option<&FenceRecord>, global: &GlobalSettings) -> FenceStyle {
    match record {
        Some(record) => FenceStyle {
            color: effective_color(record, global),
            tint: effective_tint(global),
        },
        None => FenceStyle::global(global),
    }
}
