//! Embedded picture files.
//!
//! Every referencing picture gets its own media part; identical files are
//! not shared.

use crate::constants::{image_content_type, part};
use slidepack_core::{Error, Result};
use std::fs;
use std::path::Path;

/// One embedded file.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Part name, e.g. `ppt/media/image1.png`.
    pub part_name: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
    /// Pixel size, when the header could be read.
    pub dimensions: Option<(u32, u32)>,
}

/// Media parts in insertion order.
#[derive(Debug, Default)]
pub struct MediaStore {
    items: Vec<MediaItem>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a local file into a new media part.
    ///
    /// A missing file or a format the package cannot carry is fatal: the
    /// builder has already substituted the placeholder for anything it could
    /// not resolve.
    pub fn add(&mut self, path: &Path) -> Result<&MediaItem> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let content_type = image_content_type(&ext).ok_or_else(|| {
            Error::Packaging(format!("Unsupported media type: {}", path.display()))
        })?;

        let data = fs::read(path).map_err(|e| {
            Error::Packaging(format!("Failed to read media '{}': {}", path.display(), e))
        })?;

        let dimensions = match image::image_dimensions(path) {
            Ok(size) => Some(size),
            Err(e) => {
                log::warn!("Could not read size of '{}': {}", path.display(), e);
                None
            }
        };

        let ext = if ext == "jpg" { "jpeg".to_string() } else { ext };
        self.items.push(MediaItem {
            part_name: part::media(self.items.len() + 1, &ext),
            content_type,
            data,
            dimensions,
        });
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<MediaItem> {
        self.items
    }
}
