//! Fence records as kept by the fence manager
//!
//! A record only carries what the style pass needs: the fence title and an
//! optional color override. Records are owned by the fence manager; this
//! crate reads them from its `fences.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::color::FenceColor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FenceRecord {
    pub title: String,

    /// `None` inherits the global selected color
    #[serde(
        default,
        deserialize_with = "deserialize_custom_color",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_color: Option<FenceColor>,
}

#[cfg(test)]
impl FenceRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            custom_color: None,
        }
    }

    pub fn with_custom_color(mut self, color: FenceColor) -> Self {
        self.custom_color = Some(color);
        self
    }
}

/// Empty, blank or unrecognized color text means "no override"
fn deserialize_custom_color<'de, D>(deserializer: D) -> Result<Option<FenceColor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|text| {
        if text.trim().is_empty() {
            return None;
        }
        text.parse::<FenceColor>()
            .inspect_err(|e| warn!(error = %e, "Ignoring unknown custom fence color"))
            .ok()
    }))
}

/// Open fence records keyed by title
#[derive(Debug, Clone, Default)]
pub struct FenceRegistry {
    records: HashMap<String, FenceRecord>,
}

impl FenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record with the same title
    pub fn insert(&mut self, record: FenceRecord) {
        if let Some(previous) = self.records.insert(record.title.clone(), record) {
            debug!(title = %previous.title, "Replaced fence record");
        }
    }

    pub fn get(&self, title: &str) -> Option<&FenceRecord> {
        self.records.get(title)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse a JSON array of fence records
    pub fn from_json(contents: &str) -> Result<Self> {
        let records: Vec<FenceRecord> =
            serde_json::from_str(contents).context("Failed to parse fence records")?;
        Ok(records.into_iter().collect())
    }

    /// Read the fence manager's records file.
    /// A missing or unreadable file gives an empty registry; windows then use global values.
    pub fn load_or_empty(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No fence records file, all fences use global style");
                return Self::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read fence records");
                return Self::new();
            }
        };

        match Self::from_json(&contents) {
            Ok(registry) => {
                info!(path = %path.display(), count = registry.len(), "Loaded fence records");
                registry
            }
            Err(e) => {
                warn!(path = %path.display(), error = ?e, "Ignoring malformed fence records");
                Self::new()
            }
        }
    }
}

impl FromIterator<FenceRecord> for FenceRegistry {
    fn from_iter<I: IntoIterator<Item = FenceRecord>>(iter: I) -> Self {
        let mut registry = Self::new();
        for record in iter {
            registry.insert(record);
        }
        registry
    }
}
