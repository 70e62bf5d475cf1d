//! The in-memory package: parts, their relationships and the content type
//! manifest, plus writing it out as a directory tree and a ZIP archive.

use crate::constants::{content_type, ns, part};
use crate::rels::{rels_part_name, resolve_target, Relationships};
use crate::xml::{escape, XML_DECLARATION};
use slidepack_core::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One package part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part name without a leading slash, e.g. `ppt/slides/slide1.xml`.
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Part {
    fn extension(&self) -> &str {
        self.name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
    }
}

/// All parts of a deck, in the order they are archived.
#[derive(Debug, Default)]
pub struct Package {
    parts: Vec<Part>,
    /// Relationship sets keyed by source part name (`""` is the package).
    relationships: Vec<(String, Relationships)>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, name: impl Into<String>, content_type: &str, data: impl Into<Vec<u8>>) {
        self.parts.push(Part {
            name: name.into(),
            content_type: content_type.to_string(),
            data: data.into(),
        });
    }

    /// Attach relationships to `source` and add the matching `.rels` part.
    pub fn add_relationships(&mut self, source: &str, rels: Relationships) {
        let name = if source.is_empty() {
            part::ROOT_RELS.to_string()
        } else {
            rels_part_name(source)
        };
        self.add_part(name, content_type::RELATIONSHIPS, rels.to_xml());
        self.relationships.push((source.to_string(), rels));
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Relationships whose source is `source`.
    pub fn relationships(&self, source: &str) -> Option<&Relationships> {
        self.relationships
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, rels)| rels)
    }

    /// `[Content_Types].xml`: extension defaults where unambiguous,
    /// overrides for everything else.
    pub fn content_types_xml(&self) -> String {
        let mut defaults: BTreeMap<String, String> = BTreeMap::new();
        defaults.insert("rels".to_string(), content_type::RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), content_type::XML.to_string());
        let mut overrides: Vec<(&str, &str)> = Vec::new();

        for part in &self.parts {
            let ext = part.extension().to_lowercase();
            match defaults.get(&ext).cloned() {
                Some(ct) if ct == part.content_type => {}
                None if ext != "xml" && !ext.is_empty() => {
                    defaults.insert(ext, part.content_type.clone());
                }
                _ => overrides.push((part.name.as_str(), part.content_type.as_str())),
            }
        }

        let mut xml = String::with_capacity(1024 + overrides.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, ns::CONTENT_TYPES));
        for (ext, ct) in &defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(ext),
                ct
            ));
        }
        for (name, ct) in overrides {
            xml.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                escape(name),
                ct
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Check the package is complete before anything is written.
    ///
    /// Every part needs a content type and a unique name, every relationship
    /// source must exist, and every internal relationship target must
    /// resolve to a part.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for part in &self.parts {
            if !names.insert(part.name.as_str()) {
                return Err(Error::Packaging(format!("Duplicate part: {}", part.name)));
            }
            if part.content_type.is_empty() {
                return Err(Error::Packaging(format!(
                    "Part has no content type: {}",
                    part.name
                )));
            }
        }

        for (source, rels) in &self.relationships {
            if !source.is_empty() && !names.contains(source.as_str()) {
                return Err(Error::Packaging(format!(
                    "Relationships for missing part: {}",
                    source
                )));
            }
            for rel in rels.iter() {
                if rel.external {
                    if rel.target.is_empty() {
                        return Err(Error::Packaging(format!(
                            "{} in '{}' has an empty external target",
                            rel.id, source
                        )));
                    }
                    continue;
                }
                let target = resolve_target(source, &rel.target);
                if !names.contains(target.as_str()) {
                    return Err(Error::Packaging(format!(
                        "{} in '{}' points to missing part '{}'",
                        rel.id, source, target
                    )));
                }
            }
        }

        Ok(())
    }

    /// Archive entry names in order, manifest first.
    pub fn entry_names(&self) -> Vec<String> {
        std::iter::once(part::CONTENT_TYPES.to_string())
            .chain(self.parts.iter().map(|p| p.name.clone()))
            .collect()
    }

    /// Write the manifest and every part below `root`.
    pub fn write_to_dir(&self, root: &Path) -> Result<()> {
        write_file(root, part::CONTENT_TYPES, self.content_types_xml().as_bytes())?;
        for part in &self.parts {
            write_file(root, &part.name, &part.data)?;
        }
        log::debug!("Wrote {} parts to {}", self.parts.len() + 1, root.display());
        Ok(())
    }

    /// Zip a tree written by [`write_to_dir`](Self::write_to_dir) into `dest`.
    pub fn archive_dir(&self, root: &Path, dest: &Path) -> Result<()> {
        let file = File::create(dest)?;
        let mut entries = Vec::with_capacity(self.parts.len() + 1);
        for name in self.entry_names() {
            let data = fs::read(root.join(&name)).map_err(|e| {
                Error::Packaging(format!("Missing written part '{}': {}", name, e))
            })?;
            entries.push((name, data));
        }
        zip_entries(file, entries)
    }

    /// The whole package as ZIP bytes, without touching the file system.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>> {
        let mut entries = Vec::with_capacity(self.parts.len() + 1);
        entries.push((
            part::CONTENT_TYPES.to_string(),
            self.content_types_xml().into_bytes(),
        ));
        for part in &self.parts {
            entries.push((part.name.clone(), part.data.clone()));
        }
        let mut buffer = Cursor::new(Vec::new());
        zip_entries(&mut buffer, entries)?;
        Ok(buffer.into_inner())
    }
}

fn write_file(root: &Path, name: &str, data: &[u8]) -> Result<()> {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, data)?;
    Ok(())
}

fn zip_entries<W: Write + Seek>(writer: W, entries: Vec<(String, Vec<u8>)>) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        zip.start_file(name.as_str(), options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
        zip.write_all(&data)?;
    }

    zip.finish()
        .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
    Ok(())
}
