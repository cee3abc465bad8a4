//! Per-shortcut edit dialog model
//!
//! Holds the icon indicator and the name field. Browsing only changes the
//! indicator; `save` and `restore_default` are the only paths that write.

use std::path::{Path, PathBuf};
use tracing::info;

use super::{
    base_name, display_name, DesktopEntry, IconDescriptor, IconUpdate, RestoreOutcome, ShortcutEditor,
    ShortcutError, ShortcutFile,
};

/// Result of a committed edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSave {
    /// Name for the fence label store
    pub display_name: String,
    pub icon: IconUpdate,
}

#[derive(Debug)]
pub struct ShortcutEditSession<S = DesktopEntry> {
    editor: ShortcutEditor<S>,
    shortcut: PathBuf,
    /// Icon currently stored in the shortcut
    committed_icon: IconDescriptor,
    /// Icon shown in the dialog
    icon: IconDescriptor,
    name: String,
}

impl<S: ShortcutFile> ShortcutEditSession<S> {
    /// Open the dialog for `shortcut`, reading its current icon
    pub fn open(shortcut: impl Into<PathBuf>) -> Result<Self, ShortcutError> {
        let shortcut = shortcut.into();
        let editor = ShortcutEditor::<S>::new();
        let icon = editor.read_icon(&shortcut)?;
        let name = base_name(&shortcut);
        Ok(Self {
            editor,
            shortcut,
            committed_icon: icon.clone(),
            icon,
            name,
        })
    }

    pub fn shortcut(&self) -> &Path {
        &self.shortcut
    }

    pub fn icon(&self) -> &IconDescriptor {
        &self.icon
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pick a new icon file. Nothing is written until `save`.
    pub fn browse(&mut self, icon_file: impl Into<PathBuf>) {
        self.icon = IconDescriptor::Custom(icon_file.into());
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Commit the selected icon (if it changed) and resolve the display name
    pub fn save(&mut self) -> Result<SessionSave, ShortcutError> {
        let icon = if self.icon != self.committed_icon {
            self.editor.set_custom_icon(&self.shortcut, &self.icon)?
        } else {
            IconUpdate::Unchanged
        };
        if icon == IconUpdate::Applied {
            self.committed_icon = self.icon.clone();
        }

        let display_name = display_name(&self.shortcut, &self.name);
        self.name = display_name.clone();
        info!(shortcut = %self.shortcut.display(), name = %display_name, icon = ?icon, "Saved shortcut edits");
        Ok(SessionSave { display_name, icon })
    }

    /// Restore the target's icon and reset the name field and indicator
    pub fn restore_default(&mut self) -> Result<RestoreOutcome, ShortcutError> {
        let outcome = self.editor.restore_default(&self.shortcut)?;
        self.icon = outcome.icon.clone();
        self.committed_icon = outcome.icon.clone();
        self.name = outcome.display_name.clone();
        Ok(outcome)
    }
}
