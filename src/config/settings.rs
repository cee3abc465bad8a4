//! Global settings record shared by every fence
//!
//! The on-disk shape is parsed field by field: a missing key or a value of
//! the wrong shape only costs that one field its persisted value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::color::{FenceColor, Tint, UnknownVariant};

/// Animation played when a shortcut inside a fence is launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaunchEffect {
    #[default]
    Zoom,
    Bounce,
    FadeOut,
    SlideUp,
    Rotate,
    Agitate,
}

impl LaunchEffect {
    pub const ALL: [LaunchEffect; 6] = [
        LaunchEffect::Zoom,
        LaunchEffect::Bounce,
        LaunchEffect::FadeOut,
        LaunchEffect::SlideUp,
        LaunchEffect::Rotate,
        LaunchEffect::Agitate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LaunchEffect::Zoom => "Zoom",
            LaunchEffect::Bounce => "Bounce",
            LaunchEffect::FadeOut => "FadeOut",
            LaunchEffect::SlideUp => "SlideUp",
            LaunchEffect::Rotate => "Rotate",
            LaunchEffect::Agitate => "Agitate",
        }
    }
}

impl fmt::Display for LaunchEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaunchEffect {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "launch effect",
                value: s.to_string(),
                expected: Self::ALL.map(|e| e.name()).join(", "),
            })
    }
}

/// Process-wide settings applied to every fence unless a fence overrides them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Fences snap to screen edges and to each other
    pub snap_enabled: bool,

    /// Background transparency of every fence (no per-fence override)
    pub tint_value: Tint,

    /// Background color for fences without a custom color
    pub selected_color: FenceColor,

    /// Append diagnostic events to the log file
    pub log_enabled: bool,

    /// Launch shortcuts on single click instead of double click
    pub single_click_to_launch: bool,

    pub launch_effect: LaunchEffect,
}

fn default_snap_enabled() -> bool {
    true
}

fn default_log_enabled() -> bool {
    false
}

fn default_single_click_to_launch() -> bool {
    true
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            snap_enabled: default_snap_enabled(),
            tint_value: Tint::default(),
            selected_color: FenceColor::default(),
            log_enabled: default_log_enabled(),
            single_click_to_launch: default_single_click_to_launch(),
            launch_effect: LaunchEffect::default(),
        }
    }
}

/// A value that parses to `None` instead of failing when the JSON has the wrong shape
#[derive(Debug)]
pub(crate) struct Lenient<T>(Option<T>);

// Manual impl so a missing key does not require `T: Default`
impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Lenient(None)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Lenient(serde_json::from_value(value).ok()))
    }
}

/// Settings as found on disk, before defaults are applied
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedSettings {
    #[serde(default)]
    snap_enabled: Lenient<bool>,
    #[serde(default)]
    tint_value: Lenient<i64>,
    #[serde(default)]
    selected_color: Lenient<FenceColor>,
    #[serde(default)]
    log_enabled: Lenient<bool>,
    #[serde(default)]
    single_click_to_launch: Lenient<bool>,
    #[serde(default)]
    launch_effect: Lenient<LaunchEffect>,
}

impl GlobalSettings {
    /// Apply per-field defaults to a persisted record.
    /// Returns the settings plus the names of the fields that were replaced or clamped.
    pub(crate) fn from_persisted(persisted: PersistedSettings) -> (Self, Vec<&'static str>) {
        let defaults = GlobalSettings::default();
        let mut repaired = Vec::new();

        fn take<T>(field: Lenient<T>, default: T, name: &'static str, repaired: &mut Vec<&'static str>) -> T {
            field.0.unwrap_or_else(|| {
                warn!(field = name, "Setting missing or invalid, using default");
                repaired.push(name);
                default
            })
        }

        let tint_value = match persisted.tint_value.0 {
            Some(raw) => {
                let tint = Tint::clamped(raw);
                if tint.percent() as i64 != raw {
                    warn!(field = "tintValue", value = raw, clamped = tint.percent(), "Tint out of range, clamping");
                    repaired.push("tintValue");
                }
                tint
            }
            None => {
                warn!(field = "tintValue", "Setting missing or invalid, using default");
                repaired.push("tintValue");
                defaults.tint_value
            }
        };

        let settings = GlobalSettings {
            snap_enabled: take(persisted.snap_enabled, defaults.snap_enabled, "snapEnabled", &mut repaired),
            tint_value,
            selected_color: take(persisted.selected_color, defaults.selected_color, "selectedColor", &mut repaired),
            log_enabled: take(persisted.log_enabled, defaults.log_enabled, "logEnabled", &mut repaired),
            single_click_to_launch: take(
                persisted.single_click_to_launch,
                defaults.single_click_to_launch,
                "singleClickToLaunch",
                &mut repaired,
            ),
            launch_effect: take(persisted.launch_effect, defaults.launch_effect, "launchEffect", &mut repaired),
        };

        (settings, repaired)
    }

    /// Parse settings JSON, substituting defaults per field.
    /// Fails only when the text is not a JSON object at all.
    pub fn from_json(contents: &str) -> serde_json::Result<(Self, Vec<&'static str>)> {
        // Going through a map rejects arrays, which a derived struct would accept positionally
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(contents)?;
        let persisted = PersistedSettings::deserialize(serde_json::Value::Object(object))?;
        Ok(Self::from_persisted(persisted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_json() -> String {
        r#"{
            "snapEnabled": false,
            "tintValue": 40,
            "selectedColor": "Purple",
            "logEnabled": true,
            "singleClickToLaunch": false,
            "launchEffect": "Agitate"
        }"#
        .to_string()
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(GlobalSettings::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "snapEnabled",
            "tintValue",
            "selectedColor",
            "logEnabled",
            "singleClickToLaunch",
            "launchEffect",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 6);
        assert_eq!(json["selectedColor"], "Gray");
        assert_eq!(json["launchEffect"], "Zoom");
        assert_eq!(json["tintValue"], 85);
    }

    #[test]
    fn test_from_json_all_fields_present() {
        let (settings, repaired) = GlobalSettings::from_json(&full_json()).unwrap();
        assert!(repaired.is_empty());
        assert!(!settings.snap_enabled);
        assert_eq!(settings.tint_value.percent(), 40);
        assert_eq!(settings.selected_color, FenceColor::Purple);
        assert!(settings.log_enabled);
        assert!(!settings.single_click_to_launch);
        assert_eq!(settings.launch_effect, LaunchEffect::Agitate);
    }

    #[test]
    fn test_from_json_empty_object_is_all_defaults() {
        let (settings, repaired) = GlobalSettings::from_json("{}").unwrap();
        assert_eq!(settings, GlobalSettings::default());
        assert_eq!(repaired.len(), 6);
    }

    #[test]
    fn test_unknown_enum_text_falls_back() {
        let json = r#"{"selectedColor": "Orange", "launchEffect": "Explode", "tintValue": 30}"#;
        let (settings, repaired) = GlobalSettings::from_json(json).unwrap();
        assert_eq!(settings.selected_color, FenceColor::Gray);
        assert_eq!(settings.launch_effect, LaunchEffect::Zoom);
        assert_eq!(settings.tint_value.percent(), 30);
        assert!(repaired.contains(&"selectedColor"));
        assert!(repaired.contains(&"launchEffect"));
    }

    #[test]
    fn test_enum_ordinal_is_not_accepted() {
        // Only symbolic names are valid; an index must not silently map to a variant
        let (settings, repaired) = GlobalSettings::from_json(r#"{"selectedColor": 6}"#).unwrap();
        assert_eq!(settings.selected_color, FenceColor::Gray);
        assert!(repaired.contains(&"selectedColor"));
    }

    #[test]
    fn test_wrong_shape_values_fall_back() {
        let json = r#"{"snapEnabled": "yes", "tintValue": "high", "logEnabled": 1}"#;
        let (settings, repaired) = GlobalSettings::from_json(json).unwrap();
        assert!(settings.snap_enabled);
        assert_eq!(settings.tint_value, Tint::default());
        assert!(!settings.log_enabled);
        assert!(repaired.contains(&"snapEnabled"));
        assert!(repaired.contains(&"tintValue"));
        assert!(repaired.contains(&"logEnabled"));
    }

    #[test]
    fn test_tint_out_of_range_is_clamped() {
        let (settings, repaired) = GlobalSettings::from_json(r#"{"tintValue": 0}"#).unwrap();
        assert_eq!(settings.tint_value, Tint::MIN);
        assert!(repaired.contains(&"tintValue"));

        let (settings, _) = GlobalSettings::from_json(r#"{"tintValue": 1000}"#).unwrap();
        assert_eq!(settings.tint_value, Tint::MAX);
    }

    #[test]
    fn test_fractional_tint_uses_default() {
        let (settings, repaired) = GlobalSettings::from_json(r#"{"tintValue": 50.5}"#).unwrap();
        assert_eq!(settings.tint_value, Tint::default());
        assert!(repaired.contains(&"tintValue"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let json = r#"{"tintValue": 60, "someFutureOption": [1, 2, 3]}"#;
        let (settings, _) = GlobalSettings::from_json(json).unwrap();
        assert_eq!(settings.tint_value.percent(), 60);
    }

    #[test]
    fn test_non_object_is_an_error() {
        assert!(GlobalSettings::from_json("not json at all").is_err());
        assert!(GlobalSettings::from_json("[1, 2]").is_err());
        assert!(GlobalSettings::from_json("").is_err());
    }

    #[test]
    fn test_launch_effect_from_str() {
        assert_eq!("fadeout".parse::<LaunchEffect>(), Ok(LaunchEffect::FadeOut));
        assert_eq!("SlideUp".parse::<LaunchEffect>(), Ok(LaunchEffect::SlideUp));
        assert!("Spin".parse::<LaunchEffect>().is_err());
    }
}
