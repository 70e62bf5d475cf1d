//! Reads a produced deck back: slide order, per-slide text and pictures,
//! and a relationship integrity check.

use crate::constants::{part, rel_type};
use crate::rels::{rels_part_name, resolve_target, Relationship};
use quick_xml::events::Event;
use quick_xml::Reader;
use slidepack_core::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// What one slide holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideSummary {
    /// 1-based display position.
    pub number: usize,
    pub part_name: String,
    /// Text of every non-empty paragraph, in document order.
    pub lines: Vec<String>,
    pub pictures: usize,
    pub has_notes: bool,
}

/// What a whole package holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSummary {
    pub title: Option<String>,
    pub slides: Vec<SlideSummary>,
    /// Number of relationships checked across all `.rels` parts.
    pub relationships: usize,
}

impl PackageSummary {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Inspector for PPTX archives.
pub struct PackageInspector;

impl PackageInspector {
    pub fn new() -> Self {
        Self
    }

    /// Inspect the archive at `path`.
    pub fn inspect_file(&self, path: &Path) -> Result<PackageSummary> {
        let file = File::open(path)?;
        self.inspect(BufReader::new(file))
    }

    /// Inspect an archive from a reader.
    pub fn inspect<R: Read + Seek>(&self, reader: R) -> Result<PackageSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let names: HashSet<String> = archive.file_names().map(String::from).collect();
        if !names.contains(part::CONTENT_TYPES) {
            return Err(Error::Packaging(format!("Missing {}", part::CONTENT_TYPES)));
        }

        let relationships = self.check_relationships(&mut archive, &names)?;

        let root_rels = parse_relationships(&read_file_from_archive(&mut archive, part::ROOT_RELS)?)?;
        let presentation = root_rels
            .iter()
            .find(|r| r.rel_type == rel_type::OFFICE_DOCUMENT)
            .map(|r| resolve_target("", &r.target))
            .ok_or_else(|| Error::Packaging("No office document relationship".to_string()))?;

        let title = if names.contains(part::CORE_PROPS) {
            extract_title(&read_file_from_archive(&mut archive, part::CORE_PROPS)?)?
        } else {
            None
        };

        let mut summary = PackageSummary {
            title,
            slides: Vec::new(),
            relationships,
        };
        for (idx, slide_path) in self.get_slide_order(&mut archive, &presentation)?.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, &names, slide_path, idx + 1)?;
            summary.slides.push(slide);
        }

        log::debug!(
            "Inspected package with {} slides and {} relationships",
            summary.slides.len(),
            summary.relationships
        );
        Ok(summary)
    }

    /// Slide part names in the order of the presentation's slide id list.
    fn get_slide_order<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        presentation: &str,
    ) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, &rels_part_name(presentation))?;
        let rels = parse_relationships(&rels_content)?;
        let content = read_file_from_archive(archive, presentation)?;

        let mut reader = Reader::from_str(&content);
        reader.trim_text(true);

        let mut slides = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"sldId" =>
                {
                    let rid = e
                        .attributes()
                        .flatten()
                        .find(|attr| is_relationship_id(attr.key.as_ref()))
                        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
                        .ok_or_else(|| Error::Packaging("Slide id without r:id".to_string()))?;

                    let rel = rels.iter().find(|r| r.id == rid).ok_or_else(|| {
                        Error::Packaging(format!("Slide relationship {} is missing", rid))
                    })?;
                    slides.push(resolve_target(presentation, &rel.target));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing {}: {}",
                        presentation, e
                    )));
                }
                _ => {}
            }
        }

        Ok(slides)
    }

    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        names: &HashSet<String>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<SlideSummary> {
        let content = read_file_from_archive(archive, slide_path)?;
        let (lines, pictures) = extract_slide_content(&content)?;

        let rels_path = rels_part_name(slide_path);
        let has_notes = if names.contains(&rels_path) {
            parse_relationships(&read_file_from_archive(archive, &rels_path)?)?
                .iter()
                .any(|r| r.rel_type == rel_type::NOTES_SLIDE)
        } else {
            false
        };

        Ok(SlideSummary {
            number: slide_number,
            part_name: slide_path.to_string(),
            lines,
            pictures,
            has_notes,
        })
    }

    /// Every internal target of every `.rels` part must be an archive entry.
    fn check_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        names: &HashSet<String>,
    ) -> Result<usize> {
        let mut rels_parts: Vec<&String> = names.iter().filter(|n| n.ends_with(".rels")).collect();
        rels_parts.sort();

        let mut checked = 0;
        for rels_path in rels_parts {
            let source = source_of_rels(rels_path);
            for rel in parse_relationships(&read_file_from_archive(archive, rels_path)?)? {
                checked += 1;
                if rel.external {
                    continue;
                }
                let target = resolve_target(&source, &rel.target);
                if !names.contains(&target) {
                    return Err(Error::Packaging(format!(
                        "{} in '{}' points to missing part '{}'",
                        rel.id, rels_path, target
                    )));
                }
            }
        }
        Ok(checked)
    }
}

impl Default for PackageInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Paragraph texts and the picture count of one slide part.
fn extract_slide_content(xml_content: &str) -> Result<(Vec<String>, usize)> {
    let mut reader = Reader::from_str(xml_content);

    let mut lines = Vec::new();
    let mut pictures = 0;
    let mut in_paragraph = false;
    let mut in_text = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"pic" => pictures += 1,
                b"p" => {
                    in_paragraph = true;
                    current_text.clear();
                }
                b"t" if in_paragraph => in_text = true,
                b"br" if in_paragraph => current_text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if in_paragraph && local_name(e.name().as_ref()) == b"br" {
                    current_text.push('\n');
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().unwrap_or_default();
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" if in_paragraph => {
                    in_paragraph = false;
                    if !current_text.trim().is_empty() {
                        lines.push(std::mem::take(&mut current_text));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok((lines, pictures))
}

fn extract_title(xml_content: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml_content);
    let mut in_title = false;
    let mut title = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"title" => in_title = true,
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"title" => in_title = false,
            Ok(Event::Text(ref e)) if in_title => {
                title.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing core properties: {}", e))),
            _ => {}
        }
    }

    Ok(if title.is_empty() { None } else { Some(title) })
}

fn parse_relationships(xml_content: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut rels = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut rel = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                    external: false,
                };
                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"TargetMode" => rel.external = value == "External",
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Source part of a relationships part: `ppt/_rels/presentation.xml.rels`
/// belongs to `ppt/presentation.xml`, `_rels/.rels` to the package.
fn source_of_rels(rels_path: &str) -> String {
    let file = rels_path.trim_end_matches(".rels");
    match file.rsplit_once("_rels/") {
        Some((dir, name)) => format!("{}{}", dir, name),
        None => file.to_string(),
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// `r:id` and friends, but not the bare `id` attribute.
fn is_relationship_id(key: &[u8]) -> bool {
    key != b"id" && local_name(key) == b"id"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::PptxWriter;
    use slidepack_core::types::{Paragraph, Position, ShapeModel, TextBox, TextFrame};
    use slidepack_core::{PresentationModel, SlideModel};
    use std::io::Cursor;

    fn deck(texts: &[&str]) -> Vec<u8> {
        let mut model = PresentationModel::new(Some("Quarterly <Review>".into()));
        for text in texts {
            let mut slide = SlideModel::new();
            slide.add_shape(ShapeModel::TextBox(TextBox {
                position: Position::new(0.0, 0.0, 100.0, 50.0),
                frame: TextFrame::new(vec![Paragraph::text(*text)]),
            }));
            if text.starts_with('N') {
                slide.note = Some("note".into());
            }
            model.add_slide(slide);
        }
        PptxWriter::default()
            .build_package(&model)
            .unwrap()
            .to_zip_bytes()
            .unwrap()
    }

    #[test]
    fn test_inspect_written_deck() {
        let bytes = deck(&["First", "Next one", "Third"]);
        let summary = PackageInspector::new().inspect(Cursor::new(bytes)).unwrap();

        assert_eq!(summary.title.as_deref(), Some("Quarterly <Review>"));
        assert_eq!(summary.slide_count(), 3);
        assert_eq!(summary.slides[0].lines, vec!["First".to_string()]);
        assert_eq!(summary.slides[1].lines, vec!["Next one".to_string()]);
        assert!(summary.slides[1].has_notes);
        assert!(!summary.slides[2].has_notes);
        assert_eq!(summary.slides[2].part_name, "ppt/slides/slide3.xml");
        assert!(summary.relationships > 0);
    }

    #[test]
    fn test_line_breaks_and_pictures() {
        let xml = concat!(
            r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>"#,
            r#"<p:sp><p:txBody><a:p><a:r><a:t>one</a:t></a:r><a:br><a:rPr/></a:br>"#,
            r#"<a:r><a:t>two</a:t></a:r></a:p><a:p><a:endParaRPr/></a:p></p:txBody></p:sp>"#,
            r#"<p:pic><p:blipFill/></p:pic><p:pic><p:blipFill/></p:pic>"#,
            r#"</p:spTree></p:cSld></p:sld>"#
        );
        let (lines, pictures) = extract_slide_content(xml).unwrap();
        assert_eq!(pictures, 2);
        assert_eq!(lines, vec!["one\ntwo".to_string()]);
    }

    #[test]
    fn test_missing_manifest_rejected() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            zip.start_file("ppt/presentation.xml", zip::write::FileOptions::default())
                .unwrap();
            zip.finish().unwrap();
        }
        buffer.set_position(0);
        let err = PackageInspector::new().inspect(buffer).unwrap_err();
        assert!(matches!(err, Error::Packaging(_)));
    }

    #[test]
    fn test_source_of_rels() {
        assert_eq!(source_of_rels("_rels/.rels"), "");
        assert_eq!(source_of_rels("ppt/_rels/presentation.xml.rels"), "ppt/presentation.xml");
        assert_eq!(
            source_of_rels("ppt/slides/_rels/slide2.xml.rels"),
            "ppt/slides/slide2.xml"
        );
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
        assert!(is_relationship_id(b"r:id"));
        assert!(!is_relationship_id(b"id"));
    }
}
