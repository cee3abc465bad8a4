//! Options surface model
//!
//! Edits happen on a private copy of the settings. Nothing reaches disk or
//! the open fences until `commit`, which saves once and then propagates once.
//! Dropping or cancelling the session discards the copy.

use tracing::{debug, error, info};

use crate::broadcast::{self, BroadcastReport, FenceSurface};
use crate::config::{ConfigStore, GlobalSettings};
use crate::fence::FenceRegistry;
use crate::notice::Notice;

#[derive(Debug)]
pub struct OptionsSession {
    pending: GlobalSettings,
    dirty: bool,
}

impl OptionsSession {
    /// Start editing from the current settings
    pub fn open(current: &GlobalSettings) -> Self {
        Self {
            pending: current.clone(),
            dirty: false,
        }
    }

    pub fn pending(&self) -> &GlobalSettings {
        &self.pending
    }

    /// Edit the pending copy (previews read from `pending`)
    pub fn edit(&mut self, f: impl FnOnce(&mut GlobalSettings)) {
        f(&mut self.pending);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save the pending settings, then restyle every open fence exactly once.
    /// On save failure nothing is propagated and `current` keeps its old value.
    pub fn commit<W: FenceSurface>(
        self,
        store: &ConfigStore,
        current: &mut GlobalSettings,
        records: &FenceRegistry,
        windows: &mut [W],
    ) -> Result<BroadcastReport, Notice> {
        if let Err(e) = store.save(&self.pending) {
            error!(error = ?e, "Failed to save options");
            return Err(Notice::from_error("Could not save options", &e));
        }

        info!(changed = self.dirty, "Options saved");
        *current = self.pending;
        Ok(broadcast::apply_to_all_open_fences(current, records, windows))
    }

    /// Close without saving
    pub fn cancel(self) {
        debug!(discarded = self.dirty, "Options closed without saving");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::tests::RecordingSurface;
    use crate::color::{FenceColor, Tint};
    use crate::fence::FenceRecord;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_commit_saves_and_propagates_once() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let mut current = store.load();
        let records: FenceRegistry = [FenceRecord::new("Work").with_custom_color(FenceColor::Red)]
            .into_iter()
            .collect();
        let mut windows = vec![RecordingSurface::new("Work"), RecordingSurface::new("Loose")];

        let mut session = OptionsSession::open(&current);
        session.edit(|s| s.tint_value = Tint::clamped(25));
        session.edit(|s| s.selected_color = FenceColor::Blue);
        session.edit(|s| s.tint_value = Tint::clamped(30));

        // Previews do not touch windows or disk
        assert!(windows.iter().all(|w| w.applied.is_empty()));
        assert_eq!(store.load().tint_value, Tint::default());

        let report = session.commit(&store, &mut current, &records, &mut windows).unwrap();

        assert_eq!(report.styled, 1);
        assert_eq!(report.fallback, 1);
        assert_eq!(current.tint_value, Tint::clamped(30));
        assert_eq!(store.load(), current);
        assert_eq!(windows[0].applied.len(), 1);
        assert_eq!(windows[1].applied.len(), 1);
        assert_eq!(windows[0].last().unwrap().color, FenceColor::Red);
        assert_eq!(windows[1].last().unwrap().color, FenceColor::Blue);
        assert_eq!(windows[1].last().unwrap().tint, Tint::clamped(30));
    }

    #[test]
    fn test_cancel_discards_edits() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let current = store.load();
        let on_disk = fs::read_to_string(store.path()).unwrap();

        let mut session = OptionsSession::open(&current);
        session.edit(|s| s.log_enabled = true);
        assert!(session.is_dirty());
        assert!(session.pending().log_enabled);
        session.cancel();

        assert!(!current.log_enabled);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), on_disk);
    }

    #[test]
    fn test_failed_save_is_a_notice_and_skips_propagation() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = ConfigStore::new(&blocker);

        let mut current = GlobalSettings::default();
        let mut windows = vec![RecordingSurface::new("Work")];
        let mut session = OptionsSession::open(&current);
        session.edit(|s| s.selected_color = FenceColor::Purple);

        let notice = session
            .commit(&store, &mut current, &FenceRegistry::new(), &mut windows)
            .unwrap_err();

        assert_eq!(notice.title, "Could not save options");
        assert!(!notice.message.is_empty());
        assert_eq!(current.selected_color, FenceColor::Gray);
        assert!(windows[0].applied.is_empty());
    }
}
