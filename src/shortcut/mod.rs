//! Shortcut icon and display-name editing
//!
//! The editor only ever writes the icon location of a shortcut. Display names
//! are computed here and handed back to the caller; the fence label store
//! owns them.

pub mod desktop_entry;
pub mod session;

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::constants::shortcut::DEFAULT_ICON;

pub use desktop_entry::DesktopEntry;
pub use session::ShortcutEditSession;

#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("Failed to open shortcut {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid shortcut: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Failed to save shortcut {}: {reason}", .path.display())]
    SaveFailed { path: PathBuf, reason: String },
}

impl ShortcutError {
    /// Fold any failure during a commit into the save-failed outcome
    fn into_save_failed(self, path: &Path) -> Self {
        match self {
            ShortcutError::SaveFailed { .. } => self,
            other => ShortcutError::SaveFailed {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }
}

/// Platform shortcut object: an icon location we can rewrite and a target we can read
pub trait ShortcutFile: Sized {
    fn open(path: &Path) -> Result<Self, ShortcutError>;

    /// Raw icon location, possibly `path,index`
    fn icon_location(&self) -> Option<&str>;

    fn set_icon_location(&mut self, location: &str);

    /// Executable or file the shortcut launches
    fn target_path(&self) -> Option<PathBuf>;

    /// Persist without ever leaving a partially written file
    fn save(&self) -> Result<(), ShortcutError>;
}

/// Icon shown for a shortcut in the edit dialog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IconDescriptor {
    /// The target's own icon
    #[default]
    Default,
    Custom(PathBuf),
}

impl IconDescriptor {
    /// Interpret indicator text; blank text and the "Default" sentinel mean the target's icon
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text == DEFAULT_ICON {
            IconDescriptor::Default
        } else {
            IconDescriptor::Custom(PathBuf::from(text))
        }
    }

    /// Descriptor for a raw icon location field (index after the first comma is dropped)
    fn from_location(location: Option<&str>) -> Self {
        match location {
            Some(location) => {
                let path = location.split(',').next().unwrap_or_default();
                Self::parse(path)
            }
            None => IconDescriptor::Default,
        }
    }
}

impl fmt::Display for IconDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconDescriptor::Default => f.write_str(DEFAULT_ICON),
            IconDescriptor::Custom(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconUpdate {
    Applied,
    /// No valid new icon was selected; the shortcut was not touched
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Base name of the shortcut file, for the caller's label
    pub display_name: String,
    /// Always `Default` after a restore
    pub icon: IconDescriptor,
    /// False when the target could not be found and the icon was left alone
    pub icon_restored: bool,
}

/// Shortcut file name without its extension
pub fn base_name(shortcut: &Path) -> String {
    shortcut
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Name to show for a shortcut: the proposal, or the file's base name when the proposal is blank
pub fn display_name(shortcut: &Path, proposed: &str) -> String {
    if proposed.trim().is_empty() {
        base_name(shortcut)
    } else {
        proposed.to_string()
    }
}

/// Icon editing over a shortcut backend
#[derive(Debug)]
pub struct ShortcutEditor<S = DesktopEntry> {
    _backend: PhantomData<S>,
}

impl<S> Default for ShortcutEditor<S> {
    fn default() -> Self {
        Self { _backend: PhantomData }
    }
}

impl<S: ShortcutFile> ShortcutEditor<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_icon(&self, shortcut: &Path) -> Result<IconDescriptor, ShortcutError> {
        let file = S::open(shortcut)?;
        Ok(IconDescriptor::from_location(file.icon_location()))
    }

    /// Point the shortcut at `icon`. Anything other than an existing file leaves it untouched.
    pub fn set_custom_icon(&self, shortcut: &Path, icon: &IconDescriptor) -> Result<IconUpdate, ShortcutError> {
        let IconDescriptor::Custom(icon_file) = icon else {
            info!(shortcut = %shortcut.display(), "No custom icon selected, keeping current icon");
            return Ok(IconUpdate::Unchanged);
        };
        if icon_file.as_os_str().is_empty() || !icon_file.is_file() {
            warn!(shortcut = %shortcut.display(), icon = %icon_file.display(), "Icon is not an existing file, keeping current icon");
            return Ok(IconUpdate::Unchanged);
        }

        let result = S::open(shortcut).and_then(|mut file| {
            file.set_icon_location(&icon_file.to_string_lossy());
            file.save()
        });
        match result {
            Ok(()) => {
                info!(shortcut = %shortcut.display(), icon = %icon_file.display(), "Set custom shortcut icon");
                Ok(IconUpdate::Applied)
            }
            Err(e) => {
                error!(shortcut = %shortcut.display(), error = %e, "Failed to set shortcut icon");
                Err(e.into_save_failed(shortcut))
            }
        }
    }

    /// Point the icon back at the target executable and recompute the display name.
    /// A missing target leaves the icon alone but still yields the name.
    pub fn restore_default(&self, shortcut: &Path) -> Result<RestoreOutcome, ShortcutError> {
        let mut file = S::open(shortcut).map_err(|e| {
            error!(shortcut = %shortcut.display(), error = %e, "Failed to open shortcut for restore");
            e.into_save_failed(shortcut)
        })?;

        let icon_restored = match file.target_path() {
            Some(target) if fs::metadata(&target).is_ok() => {
                file.set_icon_location(&target.to_string_lossy());
                file.save().map_err(|e| {
                    error!(shortcut = %shortcut.display(), error = %e, "Failed to save restored icon");
                    e.into_save_failed(shortcut)
                })?;
                info!(shortcut = %shortcut.display(), target = %target.display(), "Restored default shortcut icon");
                true
            }
            Some(target) => {
                warn!(shortcut = %shortcut.display(), target = %target.display(), "Shortcut target missing, icon left unchanged");
                false
            }
            None => {
                warn!(shortcut = %shortcut.display(), "Shortcut has no target, icon left unchanged");
                false
            }
        };

        Ok(RestoreOutcome {
            display_name: base_name(shortcut),
            icon: IconDescriptor::Default,
            icon_restored,
        })
    }
}
