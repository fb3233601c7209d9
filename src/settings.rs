//! Partial widget settings and the shallow merge used by `on_update`.

use dashboard_api::{SettingsMapping, WidgetSettings};
use serde_json::{Map, Value};

/// A partial [`WidgetSettings`] record.
///
/// `None` fields leave the stored value untouched. Entries in `extra`
/// overwrite same-named widget-specific fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetPatch {
    /// New enabled flag.
    pub enabled: Option<bool>,
    /// New width in pixels.
    pub width: Option<u32>,
    /// New height in pixels.
    pub height: Option<u32>,
    /// New polling period; `Some(None)` clears it.
    pub refresh_interval_ms: Option<Option<u64>>,
    /// Widget-specific fields to set.
    pub extra: Map<String, Value>,
}

impl WidgetPatch {
    /// Patch that only sets the enabled flag.
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    /// Patch that only sets the size.
    pub fn size(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Whether applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.refresh_interval_ms.is_none()
            && self.extra.is_empty()
    }

    /// Returns `settings` with this patch applied.
    pub fn apply(&self, settings: &WidgetSettings) -> WidgetSettings {
        let mut next = settings.clone();
        if let Some(enabled) = self.enabled {
            next.enabled = enabled;
        }
        if let Some(width) = self.width {
            next.width = width;
        }
        if let Some(height) = self.height {
            next.height = height;
        }
        if let Some(interval) = self.refresh_interval_ms {
            next.refresh_interval_ms = interval;
        }
        for (key, value) in &self.extra {
            next.extra.insert(key.clone(), value.clone());
        }
        next
    }
}

/// Shallow-merges `patch` into the entry for `id`.
///
/// An absent entry starts from [`WidgetSettings::default`]. Every other
/// entry is carried over unchanged.
pub fn merge(mapping: &SettingsMapping, id: &str, patch: &WidgetPatch) -> SettingsMapping {
    let mut next = mapping.clone();
    let current = next.get(id).cloned().unwrap_or_default();
    next.insert(id.to_string(), patch.apply(&current));
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mapping() -> SettingsMapping {
        let mut mapping = SettingsMapping::new();
        mapping.insert(
            "clock".to_string(),
            WidgetSettings {
                width: 200,
                height: 100,
                ..WidgetSettings::default()
            },
        );
        let mut weather = WidgetSettings {
            width: 300,
            height: 150,
            refresh_interval_ms: Some(600_000),
            ..WidgetSettings::default()
        };
        weather.extra.insert("units".to_string(), Value::from("metric"));
        mapping.insert("weather".to_string(), weather);
        mapping
    }

    #[test]
    fn test_merge_leaves_other_entries_untouched() {
        let before = sample_mapping();
        let after = merge(&before, "clock", &WidgetPatch::size(640, 480));

        assert_eq!(after["weather"], before["weather"]);
        assert_eq!(
            serde_json::to_string(&after["weather"]).expect("serializes"),
            serde_json::to_string(&before["weather"]).expect("serializes"),
        );
        assert_eq!(after["clock"].width, 640);
        assert_eq!(after["clock"].height, 480);
        assert!(after["clock"].enabled);
    }

    #[test]
    fn test_merge_is_shallow_on_the_one_entry() {
        let before = sample_mapping();
        let after = merge(&before, "weather", &WidgetPatch::enabled(false));
        let weather = &after["weather"];
        assert!(!weather.enabled);
        assert_eq!(weather.width, 300);
        assert_eq!(weather.refresh_interval_ms, Some(600_000));
        assert_eq!(weather.extra.get("units"), Some(&Value::from("metric")));
    }

    #[test]
    fn test_merge_inserts_missing_entry_from_defaults() {
        let before = sample_mapping();
        let after = merge(&before, "photo", &WidgetPatch::enabled(false));
        assert_eq!(after.len(), 3);
        assert!(!after["photo"].enabled);
        assert_eq!(after["photo"].width, WidgetSettings::default().width);
    }

    #[test]
    fn test_merge_does_not_mutate_input() {
        let before = sample_mapping();
        let snapshot = before.clone();
        let _ = merge(&before, "clock", &WidgetPatch::enabled(false));
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_patch_clears_refresh_interval() {
        let before = sample_mapping();
        let patch = WidgetPatch {
            refresh_interval_ms: Some(None),
            ..WidgetPatch::default()
        };
        let after = merge(&before, "weather", &patch);
        assert!(after["weather"].refresh_interval_ms.is_none());
    }

    #[test]
    fn test_patch_sets_extra_fields() {
        let mut patch = WidgetPatch::default();
        patch.extra.insert("units".to_string(), Value::from("imperial"));
        let after = merge(&sample_mapping(), "weather", &patch);
        assert_eq!(after["weather"].extra["units"], "imperial");
    }

    #[test]
    fn test_empty_patch() {
        assert!(WidgetPatch::default().is_empty());
        assert!(!WidgetPatch::enabled(true).is_empty());
    }
}
