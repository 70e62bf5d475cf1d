//! Records consumed from the persistence layer.
//!
//! These mirror what the service stores: a presentation with ordered slide
//! records whose content is a free-form tree, plus the template's theme.

use crate::types::{normalize_hex_color, Decoration, Palette, Theme};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A stored presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationRecord {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Vec<SlideRecord>,
    pub theme: Option<ThemeRecord>,
}

/// A stored slide: layout name plus template-defined content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Position in the deck. Records are exported sorted by this.
    pub index: usize,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub content: Value,
    /// Rendered markup kept by the UI. Not used for export.
    pub html: Option<String>,
    /// Per-slide properties such as `background`.
    pub properties: Option<Value>,
    pub speaker_note: Option<String>,
}

impl SlideRecord {
    pub fn new(index: usize, layout: impl Into<String>, content: Value) -> Self {
        Self {
            index,
            layout: layout.into(),
            content,
            html: None,
            properties: None,
            speaker_note: None,
        }
    }
}

/// A template theme as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub name: Option<String>,
    /// Loose colors keyed `background`, `text`, `primary`, `secondary`,
    /// `accent1`, `accent2`, ...
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    pub font_family: Option<String>,
    pub decoration: Option<String>,
}

impl ThemeRecord {
    /// Convert to a model theme, replacing unusable colors with defaults.
    pub fn to_theme(&self) -> Theme {
        let defaults = Palette::default();
        let color = |key: &str, fallback: &str| -> String {
            match self.colors.get(key) {
                Some(raw) => normalize_hex_color(raw).unwrap_or_else(|| {
                    log::warn!("Theme color '{}' has invalid value '{}'", key, raw);
                    fallback.to_string()
                }),
                None => fallback.to_string(),
            }
        };

        let accents = self
            .colors
            .iter()
            .filter(|(k, _)| k.starts_with("accent"))
            .filter_map(|(_, v)| normalize_hex_color(v))
            .collect();

        let decoration = match self.decoration.as_deref().map(str::to_lowercase).as_deref() {
            Some("rounded") => Decoration::Rounded,
            Some("shadowed") | Some("shadow") => Decoration::Shadowed,
            _ => Decoration::Flat,
        };

        Theme {
            name: self.name.clone().unwrap_or_else(|| "Default".to_string()),
            palette: Palette {
                background: color("background", &defaults.background),
                text: color("text", &defaults.text),
                primary: color("primary", &defaults.primary),
                secondary: color("secondary", &defaults.secondary),
                accents,
            },
            font_family: self
                .font_family
                .as_ref()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
            decoration,
        }
    }
}

/// The persistence collaborator, reduced to what export needs.
pub trait PresentationStore {
    /// Fetch a presentation by id, `None` when it does not exist.
    fn presentation(&self, id: &str) -> Option<PresentationRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_theme_record_to_theme() {
        let record = ThemeRecord {
            name: Some("Ocean".into()),
            colors: [
                ("background".to_string(), "#0b1f3a".to_string()),
                ("text".to_string(), "fff".to_string()),
                ("primary".to_string(), "not-a-color".to_string()),
                ("accent1".to_string(), "#123456".to_string()),
            ]
            .into_iter()
            .collect(),
            font_family: Some("  Inter ".into()),
            decoration: Some("Rounded".into()),
        };
        let theme = record.to_theme();
        assert_eq!(theme.name, "Ocean");
        assert_eq!(theme.palette.background, "0B1F3A");
        assert_eq!(theme.palette.text, "FFFFFF");
        assert_eq!(theme.palette.primary, Palette::default().primary);
        assert_eq!(theme.palette.accents, vec!["123456".to_string()]);
        assert_eq!(theme.font_family.as_deref(), Some("Inter"));
        assert_eq!(theme.decoration, Decoration::Rounded);
    }

    #[test]
    fn test_presentation_record_from_json() {
        let record: PresentationRecord = serde_json::from_value(json!({
            "id": "p-1",
            "title": "Launch",
            "slides": [
                { "index": 0, "layout": "title", "content": { "title": "Hi" } }
            ]
        }))
        .unwrap();
        assert_eq!(record.slides.len(), 1);
        assert_eq!(record.slides[0].content["title"], "Hi");
        assert!(record.theme.is_none());
    }
}
