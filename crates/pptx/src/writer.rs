//! PPTX writer: turns a [`PresentationModel`] into a validated package.

use crate::constants::{content_type, part, rel_type};
use crate::media::MediaStore;
use crate::package::Package;
use crate::rels::Relationships;
use crate::shapes::{self, BlipRef};
use crate::{slide, template, theme};
use slidepack_core::geometry::GeometryResolver;
use slidepack_core::style::StyleCascade;
use slidepack_core::types::{
    normalize_hex_color, ParagraphContent, PictureSource, PresentationModel, ShapeModel, SlideModel,
    Theme,
};
use slidepack_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Shape ids start after the shape tree's own id (1).
const FIRST_SHAPE_ID: u32 = 2;

/// Writer for PPTX (Office Open XML) decks.
pub struct PptxWriter {
    geometry: GeometryResolver,
}

impl PptxWriter {
    /// Create a writer for the given canvas resolver.
    pub fn new(geometry: GeometryResolver) -> Self {
        Self { geometry }
    }

    /// Build and validate the full package for `model`.
    ///
    /// Local pictures are read here; a missing file fails the whole package.
    /// So does any color that is not hex.
    pub fn build_package(&self, model: &PresentationModel) -> Result<Package> {
        check_colors(model)?;
        let cascade = StyleCascade::new(&model.theme);
        let has_notes = model.notes_count() > 0;
        let mut media = MediaStore::new();

        let mut pres_rels = Relationships::new();
        let master_rid = pres_rels.add(rel_type::SLIDE_MASTER, "slideMasters/slideMaster1.xml");

        let mut slide_rids = Vec::with_capacity(model.slides.len());
        let mut slide_parts = Vec::with_capacity(model.slides.len());
        let mut notes_parts = Vec::new();

        for (i, slide) in model.slides.iter().enumerate() {
            let n = i + 1;
            slide_rids.push(pres_rels.add(rel_type::SLIDE, format!("slides/slide{}.xml", n)));

            let mut rels = Relationships::new();
            rels.add(rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
            if let Some(note) = &slide.note {
                rels.add(rel_type::NOTES_SLIDE, format!("../notesSlides/notesSlide{}.xml", n));

                let mut notes_rels = Relationships::new();
                notes_rels.add(rel_type::NOTES_MASTER, "../notesMasters/notesMaster1.xml");
                notes_rels.add(rel_type::SLIDE, format!("../slides/slide{}.xml", n));
                notes_parts.push((part::notes_slide(n), slide::notes_slide_xml(note), notes_rels));
            }

            let shapes = self.render_shapes(slide, n, &cascade, &mut rels, &mut media)?;
            let xml = slide::slide_xml(slide.background.as_ref(), &shapes);
            slide_parts.push((part::slide(n), xml, rels));
        }

        let notes_master_rid = if has_notes {
            Some(pres_rels.add(rel_type::NOTES_MASTER, "notesMasters/notesMaster1.xml"))
        } else {
            None
        };
        pres_rels.add(rel_type::PRES_PROPS, "presProps.xml");
        pres_rels.add(rel_type::VIEW_PROPS, "viewProps.xml");
        pres_rels.add(rel_type::THEME, "theme/theme1.xml");
        pres_rels.add(rel_type::TABLE_STYLES, "tableStyles.xml");

        let mut package = Package::new();

        let mut root_rels = Relationships::new();
        root_rels.add(rel_type::OFFICE_DOCUMENT, part::PRESENTATION);
        root_rels.add(rel_type::CORE_PROPERTIES, part::CORE_PROPS);
        root_rels.add(rel_type::EXTENDED_PROPERTIES, part::APP_PROPS);
        package.add_relationships("", root_rels);

        package.add_part(
            part::CORE_PROPS,
            content_type::CORE_PROPERTIES,
            template::core_props_xml(model.name.as_deref()),
        );
        package.add_part(
            part::APP_PROPS,
            content_type::EXTENDED_PROPERTIES,
            template::app_props_xml(model.slides.len(), model.notes_count()),
        );

        package.add_part(
            part::PRESENTATION,
            content_type::PRESENTATION,
            template::presentation_xml(
                &master_rid,
                notes_master_rid.as_deref(),
                &slide_rids,
                self.geometry.canvas().size_emu(),
            ),
        );
        package.add_relationships(part::PRESENTATION, pres_rels);
        package.add_part(part::PRES_PROPS, content_type::PRES_PROPS, template::pres_props_xml());
        package.add_part(part::VIEW_PROPS, content_type::VIEW_PROPS, template::view_props_xml());
        package.add_part(
            part::TABLE_STYLES,
            content_type::TABLE_STYLES,
            template::table_styles_xml(),
        );
        package.add_part(part::THEME, content_type::THEME, theme::theme_xml(&model.theme));

        package.add_part(
            part::SLIDE_MASTER,
            content_type::SLIDE_MASTER,
            template::slide_master_xml(),
        );
        let mut master_rels = Relationships::new();
        master_rels.add(rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        master_rels.add(rel_type::THEME, "../theme/theme1.xml");
        package.add_relationships(part::SLIDE_MASTER, master_rels);

        package.add_part(
            part::SLIDE_LAYOUT,
            content_type::SLIDE_LAYOUT,
            template::slide_layout_xml(),
        );
        let mut layout_rels = Relationships::new();
        layout_rels.add(rel_type::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        package.add_relationships(part::SLIDE_LAYOUT, layout_rels);

        for (name, xml, rels) in slide_parts {
            package.add_part(name.as_str(), content_type::SLIDE, xml);
            package.add_relationships(&name, rels);
        }

        if has_notes {
            package.add_part(
                part::NOTES_MASTER,
                content_type::NOTES_MASTER,
                template::notes_master_xml(),
            );
            let mut notes_master_rels = Relationships::new();
            notes_master_rels.add(rel_type::THEME, "../theme/theme2.xml");
            package.add_relationships(part::NOTES_MASTER, notes_master_rels);
            package.add_part(
                part::NOTES_THEME,
                content_type::THEME,
                theme::theme_xml(&Theme::default()),
            );
        }
        for (name, xml, rels) in notes_parts {
            package.add_part(name.as_str(), content_type::NOTES_SLIDE, xml);
            package.add_relationships(&name, rels);
        }

        for item in media.into_items() {
            package.add_part(item.part_name, item.content_type, item.data);
        }

        package.validate()?;
        log::debug!(
            "Built package with {} slides and {} parts",
            model.slides.len(),
            package.parts().len()
        );
        Ok(package)
    }

    /// Build the package, write its parts below `<workdir>/package/` and
    /// archive them to `<workdir>/<file_stem>.pptx`.
    pub fn write(&self, model: &PresentationModel, workdir: &Path, file_stem: &str) -> Result<PathBuf> {
        let package = self.build_package(model)?;
        let tree = workdir.join("package");
        package.write_to_dir(&tree)?;

        let dest = workdir.join(format!("{}.pptx", file_stem));
        package.archive_dir(&tree, &dest)?;
        Ok(dest)
    }

    /// Render every shape of a slide in paint order. A slide with any
    /// unresolvable position is written without shapes.
    fn render_shapes(
        &self,
        slide: &SlideModel,
        number: usize,
        cascade: &StyleCascade,
        rels: &mut Relationships,
        media: &mut MediaStore,
    ) -> Result<Vec<String>> {
        if let Some(err) = slide
            .shapes
            .iter()
            .find_map(|s| self.geometry.validate(s.position()).err())
        {
            log::error!("Slide {}: {}; writing it without shapes", number, err);
            return Ok(Vec::new());
        }

        let mut rendered = Vec::with_capacity(slide.shapes.len());
        for (i, shape) in slide.shapes.iter().enumerate() {
            let id = FIRST_SHAPE_ID + i as u32;
            let xml = match shape {
                ShapeModel::TextBox(tb) => {
                    shapes::text_box(id, self.geometry.resolve_text_box(&tb.position)?, tb, cascade)
                }
                ShapeModel::AutoShape(s) => {
                    shapes::auto_shape(id, self.geometry.resolve(&s.position)?, s, cascade)
                }
                ShapeModel::PictureBox(pic) => {
                    let bounds = self.geometry.resolve(&pic.position)?;
                    let (blip, size) = match &pic.source {
                        PictureSource::Network(url) => {
                            (BlipRef::Link(rels.add_external(rel_type::IMAGE, url.as_str())), None)
                        }
                        PictureSource::Local(path) => {
                            let item = media.add(path)?;
                            let target = format!(
                                "../{}",
                                item.part_name.trim_start_matches("ppt/")
                            );
                            (BlipRef::Embed(rels.add(rel_type::IMAGE, target)), item.dimensions)
                        }
                    };
                    shapes::picture(id, bounds, pic, &blip, size)
                }
                ShapeModel::Connector(c) => {
                    shapes::connector(id, self.geometry.resolve_corners(&c.position)?, c)
                }
            };
            rendered.push(xml);
        }
        Ok(rendered)
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new(GeometryResolver::default())
    }
}

/// Reject the model if any color it carries is not a hex value.
fn check_colors(model: &PresentationModel) -> Result<()> {
    let palette = &model.theme.palette;
    for color in [&palette.background, &palette.text, &palette.primary, &palette.secondary]
        .into_iter()
        .chain(&palette.accents)
    {
        check_color(color, "theme")?;
    }

    for (i, slide) in model.slides.iter().enumerate() {
        let at = format!("slide {}", i + 1);
        if let Some(fill) = &slide.background {
            check_color(&fill.color, &at)?;
        }
        for shape in &slide.shapes {
            for color in shape_colors(shape) {
                check_color(color, &at)?;
            }
        }
    }
    Ok(())
}

fn check_color(color: &str, at: &str) -> Result<()> {
    match normalize_hex_color(color) {
        Some(_) => Ok(()),
        None => Err(Error::Serialization(format!("{}: invalid color '{}'", at, color))),
    }
}

fn shape_colors(shape: &ShapeModel) -> Vec<&str> {
    let mut colors = Vec::new();
    match shape {
        ShapeModel::AutoShape(s) => {
            colors.extend(s.stroke.as_ref().map(|stroke| stroke.color.as_str()));
            colors.extend(s.shadow.as_ref().map(|shadow| shadow.color.as_str()));
        }
        ShapeModel::Connector(c) => colors.push(c.color.as_str()),
        _ => {}
    }

    let Some(frame) = shape.frame() else {
        return colors;
    };
    colors.extend(frame.fill.as_ref().map(|fill| fill.color.as_str()));
    let mut fonts: Vec<_> = frame.font.iter().collect();
    for paragraph in &frame.paragraphs {
        fonts.extend(paragraph.font.iter());
        if let ParagraphContent::Runs(runs) = &paragraph.content {
            fonts.extend(runs.iter().filter_map(|run| run.font.as_ref()));
        }
    }
    colors.extend(fonts.into_iter().filter_map(|font| font.color.as_deref()));
    colors
}
