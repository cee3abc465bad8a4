//! freedesktop.org desktop entries (`*.desktop`) as shortcut files
//!
//! Only keys of the `[Desktop Entry]` group are read or written. Every other
//! line (comments, localized keys, action groups) is kept as-is on save.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{ShortcutError, ShortcutFile};
use crate::constants::config::TEMP_EXTENSION;
use crate::constants::shortcut::{DESKTOP_ENTRY_GROUP, EXEC_KEY, ICON_KEY, TRY_EXEC_KEY};

#[derive(Debug, Clone)]
pub struct DesktopEntry {
    path: PathBuf,
    lines: Vec<String>,
    /// Line indices of the `[Desktop Entry]` body (header excluded)
    group: Range<usize>,
    /// "\r\n" when the file was read with CRLF line endings
    newline: &'static str,
    trailing_newline: bool,
}

impl DesktopEntry {
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ShortcutError> {
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();

        let header = lines
            .iter()
            .position(|line| line.trim() == DESKTOP_ENTRY_GROUP)
            .ok_or_else(|| ShortcutError::Malformed {
                path: path.to_path_buf(),
                reason: format!("no {DESKTOP_ENTRY_GROUP} group"),
            })?;
        let end = lines[header + 1..]
            .iter()
            .position(|line| line.trim_start().starts_with('['))
            .map_or(lines.len(), |offset| header + 1 + offset);

        Ok(Self {
            path: path.to_path_buf(),
            lines,
            group: header + 1..end,
            newline: if contents.contains("\r\n") { "\r\n" } else { "\n" },
            trailing_newline: contents.ends_with('\n'),
        })
    }

    /// Index and value of `key` inside the group
    fn find(&self, key: &str) -> Option<(usize, &str)> {
        self.group.clone().find_map(|index| {
            let line = self.lines[index].trim_start();
            if line.starts_with('#') {
                return None;
            }
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| (index, v.trim()))
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|(_, value)| value)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let line = format!("{key}={value}");
        if let Some(index) = self.find(key).map(|(index, _)| index) {
            self.lines[index] = line;
            return;
        }

        // Append after the last non-blank line of the group, keeping the blank separator
        let mut insert_at = self.group.end;
        while insert_at > self.group.start && self.lines[insert_at - 1].trim().is_empty() {
            insert_at -= 1;
        }
        self.lines.insert(insert_at, line);
        self.group.end += 1;
    }

    fn render(&self) -> String {
        let mut out = self.lines.join(self.newline);
        if self.trailing_newline || self.lines.is_empty() {
            out.push_str(self.newline);
        }
        out
    }
}

/// First word of an Exec line, honouring double quotes
fn first_exec_token(exec: &str) -> Option<String> {
    let exec = exec.trim_start();
    if let Some(rest) = exec.strip_prefix('"') {
        let mut token = String::new();
        let mut chars = rest.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => token.extend(chars.next()),
                '"' => return Some(token),
                _ => token.push(c),
            }
        }
        // Unterminated quote
        return None;
    }
    exec.split_whitespace().next().map(str::to_string)
}

/// Resolve a bare command name against PATH
fn resolve_command(command: &str) -> Option<PathBuf> {
    if command.contains('/') {
        return Some(PathBuf::from(command));
    }
    let search = env::var_os("PATH")?;
    env::split_paths(&search)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}

impl ShortcutFile for DesktopEntry {
    fn open(path: &Path) -> Result<Self, ShortcutError> {
        let contents = fs::read_to_string(path).map_err(|source| ShortcutError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    fn icon_location(&self) -> Option<&str> {
        self.get(ICON_KEY).filter(|value| !value.is_empty())
    }

    fn set_icon_location(&mut self, location: &str) {
        self.set(ICON_KEY, location);
    }

    fn target_path(&self) -> Option<PathBuf> {
        let command = match self.get(TRY_EXEC_KEY).filter(|v| !v.is_empty()) {
            Some(try_exec) => try_exec.to_string(),
            None => first_exec_token(self.get(EXEC_KEY)?)?,
        };
        let resolved = resolve_command(&command);
        if resolved.is_none() {
            debug!(shortcut = %self.path.display(), command = %command, "Command not found on PATH");
        }
        resolved
    }

    fn save(&self) -> Result<(), ShortcutError> {
        let save_failed = |reason: String| ShortcutError::SaveFailed {
            path: self.path.clone(),
            reason,
        };

        // Write through symlinks to the real entry. Never recreate a shortcut
        // that was deleted after it was opened.
        let target = fs::canonicalize(&self.path)
            .map_err(|e| save_failed(format!("the shortcut file no longer exists: {e}")))?;
        let permissions = fs::metadata(&target)
            .map_err(|e| save_failed(format!("could not read {}: {e}", target.display())))?
            .permissions();

        let mut temp_path = OsString::from(target.as_os_str());
        temp_path.push(format!(".{TEMP_EXTENSION}"));
        let temp_path = PathBuf::from(temp_path);
        let remove_temp = || {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temporary shortcut file");
            }
        };

        fs::write(&temp_path, self.render())
            .map_err(|e| save_failed(format!("could not write {}: {e}", temp_path.display())))?;
        // Keep the executable bit desktops require before launching an entry
        if let Err(e) = fs::set_permissions(&temp_path, permissions) {
            remove_temp();
            return Err(save_failed(format!("could not copy permissions: {e}")));
        }
        if let Err(e) = fs::rename(&temp_path, &target) {
            remove_temp();
            return Err(save_failed(format!("could not replace shortcut: {e}")));
        }
        debug!(shortcut = %self.path.display(), target = %target.display(), "Saved desktop entry");
        Ok(())
    }
}
