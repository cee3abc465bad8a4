//! Pushes the effective style out to every open fence window

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::config::GlobalSettings;
use crate::fence::FenceRegistry;
use crate::style::{self, FenceStyle};

/// A live fence window that can be restyled
pub trait FenceSurface {
    fn title(&self) -> &str;

    /// Paint the window with `style`. Must be idempotent.
    fn apply_style(&mut self, style: FenceStyle) -> Result<()>;
}

/// Outcome of one propagation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Windows styled from their own record
    pub styled: usize,
    /// Windows without a record, styled with global values
    pub fallback: usize,
    /// Windows whose style could not be applied
    pub failed: usize,
}

impl BroadcastReport {
    pub fn total(&self) -> usize {
        self.styled + self.fallback + self.failed
    }
}

/// Restyle every open fence window from its record (or global values when it has none)
pub fn apply_to_all_open_fences<W: FenceSurface>(
    global: &GlobalSettings,
    records: &FenceRegistry,
    windows: &mut [W],
) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    if records.is_empty() && !windows.is_empty() {
        debug!(windows = windows.len(), "No fence records loaded, every fence gets the global style");
    }

    for window in windows.iter_mut() {
        let record = records.get(window.title());
        if record.is_none() {
            warn!(title = %window.title(), "No record for open fence, applying global style");
        }
        let style = style::resolve(record, global);

        match window.apply_style(style) {
            Ok(()) => {
                debug!(title = %window.title(), color = %style.color, tint = %style.tint, "Applied fence style");
                if record.is_some() {
                    report.styled += 1;
                } else {
                    report.fallback += 1;
                }
            }
            Err(e) => {
                error!(title = %window.title(), error = ?e, "Failed to apply fence style");
                report.failed += 1;
            }
        }
    }

    info!(
        styled = report.styled,
        fallback = report.fallback,
        failed = report.failed,
        "Propagated settings to open fences"
    );
    report
}
