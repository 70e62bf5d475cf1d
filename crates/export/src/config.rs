//! Export configuration, built once at startup and shared by reference.

use slidepack_core::{Canvas, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the built-in placeholder picture inside the assets directory.
pub const PLACEHOLDER_FILE: &str = "placeholder.png";

/// A 16x9 light gray PNG used for pictures whose asset is not resolved yet.
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x09, 0x08, 0x02, 0x00, 0x00, 0x00, 0xB4, 0x48, 0x3B,
    0x65, 0x00, 0x00, 0x00, 0x12, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x38, 0x43, 0x22, 0x60,
    0x18, 0xD5, 0x30, 0x28, 0x34, 0x00, 0x00, 0x96, 0x31, 0x58, 0x50, 0x55, 0x20, 0xF0, 0x7A, 0x00,
    0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Where exports go and where they are staged.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Durable destination of finished files.
    pub export_dir: PathBuf,
    /// Parent of the per-export working directories.
    pub temp_root: PathBuf,
    /// Holds the placeholder picture.
    pub assets_dir: PathBuf,
    pub canvas: Canvas,
}

impl ExportConfig {
    pub fn new(
        export_dir: impl Into<PathBuf>,
        temp_root: impl Into<PathBuf>,
        assets_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            export_dir: export_dir.into(),
            temp_root: temp_root.into(),
            assets_dir: assets_dir.into(),
            canvas: Canvas::default(),
        }
    }

    /// Set a custom logical canvas.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Config with every directory below `root`; handy for tests and
    /// single-directory deployments.
    pub fn under(root: &Path) -> Self {
        Self::new(root.join("exports"), root.join("tmp"), root.join("assets"))
    }

    pub fn placeholder_path(&self) -> PathBuf {
        self.assets_dir.join(PLACEHOLDER_FILE)
    }

    /// Create the directories and write the placeholder picture if it is
    /// missing. Call once before the first export.
    pub fn prepare(&self) -> Result<()> {
        for dir in [&self.export_dir, &self.temp_root, &self.assets_dir] {
            fs::create_dir_all(dir)?;
        }

        let placeholder = self.placeholder_path();
        if !placeholder.exists() {
            fs::write(&placeholder, PLACEHOLDER_PNG)?;
            log::info!("Wrote placeholder picture to {}", placeholder.display());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new("exports", std::env::temp_dir().join("slidepack"), "assets")
    }
}
