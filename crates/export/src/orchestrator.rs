//! Export orchestration: record -> model -> package -> promoted file.

use crate::config::ExportConfig;
use serde::{Deserialize, Serialize};
use slidepack_core::{
    sanitize_filename, BuildReport, Error, ExportFormat, GeometryResolver, LayoutCatalog,
    ModelBuilder, PresentationRecord, PresentationStore, Result,
};
use slidepack_pptx::{PackageInspector, PptxWriter};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Prefix of per-export working directories under the temp root.
const WORKDIR_PREFIX: &str = "export-";

/// What a successful export hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub presentation_id: String,
    pub path: PathBuf,
}

/// Parse a requested format name; anything unknown is unsupported.
pub fn parse_format(name: &str) -> Result<ExportFormat> {
    ExportFormat::from_name(name).ok_or_else(|| Error::UnsupportedFormat(name.to_string()))
}

/// Final file name for a presentation title.
pub fn output_file_name(title: Option<&str>, format: ExportFormat) -> String {
    format!("{}.{}", sanitize_filename(title.unwrap_or("")), format.extension())
}

/// Runs exports against one configuration.
///
/// Each call stages its work in a fresh directory under the temp root, so
/// concurrent calls never share intermediate files.
pub struct Exporter<'a> {
    config: &'a ExportConfig,
    layouts: &'a dyn LayoutCatalog,
}

impl<'a> Exporter<'a> {
    pub fn new(config: &'a ExportConfig, layouts: &'a dyn LayoutCatalog) -> Self {
        Self { config, layouts }
    }

    /// Look up `id` in `store` and export it.
    pub fn export_by_id(
        &self,
        store: &dyn PresentationStore,
        id: &str,
        format: ExportFormat,
    ) -> Result<ExportOutcome> {
        ensure_supported(format)?;
        let record = store
            .presentation(id)
            .ok_or_else(|| Error::PresentationNotFound(id.to_string()))?;
        self.export(&record, format)
    }

    /// Compile `record` into a file in the export directory.
    pub fn export(&self, record: &PresentationRecord, format: ExportFormat) -> Result<ExportOutcome> {
        ensure_supported(format)?;

        let geometry = GeometryResolver::new(self.config.canvas);
        let builder = ModelBuilder::new(self.layouts, geometry, self.config.placeholder_path());
        let (model, report) = builder.build(record);
        log_report(&record.id, &report);

        let workdir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir_in(&self.config.temp_root)?;

        let stem = sanitize_filename(record.title.as_deref().unwrap_or(""));
        let archive = PptxWriter::new(geometry).write(&model, workdir.path(), &stem)?;

        let summary = PackageInspector::new().inspect_file(&archive)?;
        if summary.slide_count() != model.slides.len() {
            return Err(Error::Packaging(format!(
                "Package has {} slides, model has {}",
                summary.slide_count(),
                model.slides.len()
            )));
        }

        let path = self.promote(&archive, &output_file_name(record.title.as_deref(), format))?;
        log::info!(
            "Exported presentation {} ({} slides) to {}",
            record.id,
            model.slides.len(),
            path.display()
        );

        Ok(ExportOutcome {
            presentation_id: record.id.clone(),
            path,
        })
    }

    /// Copy the archive next to its destination, then rename it into place.
    fn promote(&self, archive: &Path, file_name: &str) -> Result<PathBuf> {
        let dest = self.config.export_dir.join(file_name);
        let mut staged = tempfile::Builder::new()
            .prefix(".staging-")
            .tempfile_in(&self.config.export_dir)?;

        let mut source = File::open(archive)?;
        io::copy(&mut source, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        staged.persist(&dest).map_err(|e| Error::IoError(e.error))?;

        log::debug!("Promoted {} to {}", archive.display(), dest.display());
        Ok(dest)
    }
}

fn ensure_supported(format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Pptx => Ok(()),
        other => Err(Error::UnsupportedFormat(other.extension().to_string())),
    }
}

fn log_report(id: &str, report: &BuildReport) {
    if report.skipped_shapes > 0 {
        log::warn!("Presentation {}: skipped {} shapes", id, report.skipped_shapes);
    }
    if report.placeholder_assets > 0 {
        log::warn!(
            "Presentation {}: {} pictures use the placeholder",
            id,
            report.placeholder_assets
        );
    }
    if !report.blanked_slides.is_empty() {
        log::warn!(
            "Presentation {}: slides {:?} were written blank",
            id,
            report.blanked_slides
        );
    }
}
