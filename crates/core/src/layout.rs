//! Named layout schemas.
//!
//! A layout tells the builder where conventional content goes when the
//! content tree itself carries no position: the title region, the body
//! region, and ordered regions for images and icons.

use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Regions of a slide layout, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSchema {
    pub name: String,
    pub title: Position,
    pub body: Position,
    #[serde(default)]
    pub images: Vec<Position>,
    #[serde(default)]
    pub icons: Vec<Position>,
}

impl LayoutSchema {
    /// Title across the top, body below, one image region on the right.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            title: Position::new(64.0, 48.0, 1152.0, 96.0),
            body: Position::new(64.0, 168.0, 700.0, 480.0),
            images: vec![Position::new(796.0, 168.0, 420.0, 480.0)],
            icons: grid_icons(4, 796.0, 168.0),
        }
    }
}

fn grid_icons(count: usize, left: f64, top: f64) -> Vec<Position> {
    (0..count)
        .map(|i| Position::new(left + (i % 2) as f64 * 120.0, top + (i / 2) as f64 * 120.0, 96.0, 96.0))
        .collect()
}

/// Source of layout schemas, keyed by layout name.
pub trait LayoutCatalog {
    /// Look up a layout by name.
    fn layout(&self, name: &str) -> Option<&LayoutSchema>;

    /// Look up a layout, falling back to the standard one.
    fn layout_or_standard(&self, name: &str) -> LayoutSchema {
        match self.layout(name) {
            Some(layout) => layout.clone(),
            None => {
                log::debug!("Unknown layout '{}', using standard regions", name);
                LayoutSchema::standard()
            }
        }
    }
}

/// The layouts every template ships with.
#[derive(Debug, Clone)]
pub struct BuiltinLayouts {
    layouts: HashMap<String, LayoutSchema>,
}

impl BuiltinLayouts {
    pub fn new() -> Self {
        let mut catalog = Self {
            layouts: HashMap::new(),
        };

        catalog.insert(LayoutSchema {
            name: "title".to_string(),
            title: Position::new(96.0, 240.0, 1088.0, 140.0),
            body: Position::new(96.0, 400.0, 1088.0, 96.0),
            images: Vec::new(),
            icons: Vec::new(),
        });
        catalog.insert(LayoutSchema {
            name: "title-content".to_string(),
            title: Position::new(64.0, 48.0, 1152.0, 96.0),
            body: Position::new(64.0, 168.0, 1152.0, 480.0),
            images: Vec::new(),
            icons: Vec::new(),
        });
        catalog.insert(LayoutSchema {
            name: "image-left".to_string(),
            title: Position::new(672.0, 48.0, 544.0, 96.0),
            body: Position::new(672.0, 168.0, 544.0, 480.0),
            images: vec![Position::new(0.0, 0.0, 608.0, 720.0)],
            icons: Vec::new(),
        });
        catalog.insert(LayoutSchema {
            name: "image-right".to_string(),
            ..LayoutSchema::standard()
        });
        catalog.insert(LayoutSchema {
            name: "icons".to_string(),
            title: Position::new(64.0, 48.0, 1152.0, 96.0),
            body: Position::new(64.0, 560.0, 1152.0, 112.0),
            images: Vec::new(),
            icons: (0..4)
                .map(|i| Position::new(136.0 + i as f64 * 272.0, 240.0, 128.0, 128.0))
                .collect(),
        });

        catalog
    }

    /// Add or replace a layout.
    pub fn insert(&mut self, layout: LayoutSchema) {
        self.layouts.insert(layout.name.clone(), layout);
    }
}

impl Default for BuiltinLayouts {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCatalog for BuiltinLayouts {
    fn layout(&self, name: &str) -> Option<&LayoutSchema> {
        self.layouts.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = BuiltinLayouts::new();
        let layout = catalog.layout("image-left").unwrap();
        assert_eq!(layout.images.len(), 1);
        assert_eq!(catalog.layout("icons").unwrap().icons.len(), 4);
        assert!(catalog.layout("nope").is_none());
    }

    #[test]
    fn test_unknown_layout_falls_back_to_standard() {
        let catalog = BuiltinLayouts::new();
        assert_eq!(catalog.layout_or_standard("nope"), LayoutSchema::standard());
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = BuiltinLayouts::new();
        let mut custom = LayoutSchema::standard();
        custom.name = "title".to_string();
        catalog.insert(custom.clone());
        assert_eq!(catalog.layout("title"), Some(&custom));
    }

    #[test]
    fn test_standard_regions_on_canvas() {
        let layout = LayoutSchema::standard();
        for region in [&layout.title, &layout.body]
            .into_iter()
            .chain(layout.images.iter())
            .chain(layout.icons.iter())
        {
            assert!(region.left + region.width <= 1280.0);
            assert!(region.top + region.height <= 720.0);
        }
    }
}
