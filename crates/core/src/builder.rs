//! Maps stored slide content trees into the typed slide model.
//!
//! Content trees have no fixed schema. Conventional top-level keys carry the
//! slide text, and marker keys anywhere in the tree flag asset-bearing or
//! explicitly drawn nodes. A shape that cannot be mapped is skipped with a
//! warning; an asset without a usable source gets the placeholder picture.
//! Neither stops the rest of the slide.

use crate::content::{f64_field, find_key_paths, get_at_path, str_field, ContentPath};
use crate::geometry::GeometryResolver;
use crate::layout::{LayoutCatalog, LayoutSchema};
use crate::normalize::TextNormalizer;
use crate::records::{PresentationRecord, SlideRecord};
use crate::types::{
    normalize_hex_color, Alignment, AutoShape, AutoShapeKind, Connector, ConnectorKind,
    Decoration, Fill, FocusPoint, Font, Margin, ObjectFit, Paragraph, PictureBox, PictureSource,
    Position, PresentationModel, Shadow, ShapeMask, ShapeModel, SlideModel, Stroke, TextBox,
    TextFrame, TextRun, Theme,
};
use crate::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Marks an image node; the resolved source sits in [`IMAGE_URL_KEY`].
pub const IMAGE_PROMPT_KEY: &str = "__image_prompt__";
pub const IMAGE_URL_KEY: &str = "__image_url__";
/// Marks an icon node; the resolved source sits in [`ICON_URL_KEY`].
pub const ICON_QUERY_KEY: &str = "__icon_query__";
pub const ICON_URL_KEY: &str = "__icon_url__";
/// Marks an explicitly drawn preset shape.
pub const SHAPE_KEY: &str = "__shape__";
/// Marks an explicitly drawn connector line.
pub const CONNECTOR_KEY: &str = "__connector__";
/// Optional explicit position on any marker node.
pub const POSITION_KEY: &str = "__position__";
pub const SPEAKER_NOTE_KEY: &str = "__speaker_note__";

/// Raster formats the package can embed.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff"];

const TITLE_KEYS: &[&str] = &["title", "heading"];
const BODY_KEYS: &[&str] = &["description", "body"];
const LIST_KEYS: &[&str] = &["bullets", "items", "points"];

const TITLE_FONT_SIZE: f64 = 40.0;
const BODY_FONT_SIZE: f64 = 20.0;
const ROUNDED_RADIUS: f64 = 12.0;

/// What the builder absorbed while mapping a presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Shapes dropped because their content could not be mapped.
    pub skipped_shapes: usize,
    /// Pictures that received the placeholder asset.
    pub placeholder_assets: usize,
    /// Indices of slides whose shapes were dropped for invalid geometry.
    pub blanked_slides: Vec<usize>,
}

/// Builds a [`PresentationModel`] from stored records.
pub struct ModelBuilder<'a> {
    layouts: &'a dyn LayoutCatalog,
    geometry: GeometryResolver,
    placeholder: PathBuf,
    normalizer: TextNormalizer,
}

impl<'a> ModelBuilder<'a> {
    /// Create a builder that substitutes `placeholder` for unresolved assets.
    pub fn new(
        layouts: &'a dyn LayoutCatalog,
        geometry: GeometryResolver,
        placeholder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            layouts,
            geometry,
            placeholder: placeholder.into(),
            normalizer: TextNormalizer::new(),
        }
    }

    /// Map a whole presentation. Slides come out sorted by their index.
    pub fn build(&self, record: &PresentationRecord) -> (PresentationModel, BuildReport) {
        let mut report = BuildReport::default();
        let theme = record
            .theme
            .as_ref()
            .map(|t| t.to_theme())
            .unwrap_or_default();

        let mut slides: Vec<&SlideRecord> = record.slides.iter().collect();
        slides.sort_by_key(|s| s.index);

        let mut model = PresentationModel::new(
            record
                .title
                .as_deref()
                .map(|t| self.normalizer.normalize(t)),
        );
        for slide in slides {
            let built = self.build_slide(slide, &theme, &mut report);
            model.add_slide(built);
        }
        model.theme = theme;

        log::debug!(
            "Built {} slides for presentation {} ({} skipped shapes, {} placeholders)",
            model.slides.len(),
            record.id,
            report.skipped_shapes,
            report.placeholder_assets
        );

        (model, report)
    }

    /// Map one slide record.
    pub fn build_slide(
        &self,
        record: &SlideRecord,
        theme: &Theme,
        report: &mut BuildReport,
    ) -> SlideModel {
        let layout = self.layouts.layout_or_standard(&record.layout);
        let content = &record.content;
        let mut slide = SlideModel::new();

        slide.background = Some(self.background(record, theme));
        slide.note = record
            .speaker_note
            .as_deref()
            .or_else(|| str_field(content, SPEAKER_NOTE_KEY))
            .map(|n| self.normalizer.normalize(n));

        // back to front: decorations, lines, pictures, text
        let mut mapped: Vec<Result<ShapeModel>> = Vec::new();
        for path in find_key_paths(content, SHAPE_KEY) {
            mapped.push(self.auto_shape(content, &path, theme));
        }
        for path in find_key_paths(content, CONNECTOR_KEY) {
            mapped.push(self.connector(content, &path, theme));
        }
        for (n, path) in find_key_paths(content, IMAGE_PROMPT_KEY).iter().enumerate() {
            mapped.push(self.picture(content, path, AssetKind::Image, layout.images.get(n), report));
        }
        for (n, path) in find_key_paths(content, ICON_QUERY_KEY).iter().enumerate() {
            mapped.push(self.picture(content, path, AssetKind::Icon, layout.icons.get(n), report));
        }
        if let Some(title) = self.title(content, &layout) {
            mapped.push(title);
        }
        if let Some(body) = self.body(content, &layout) {
            mapped.push(body);
        }

        for shape in mapped {
            match shape {
                Ok(shape) => slide.add_shape(shape),
                Err(e) if e.is_recoverable() => {
                    log::warn!("Slide {}: skipping shape: {}", record.index, e);
                    report.skipped_shapes += 1;
                }
                Err(e) => {
                    log::error!("Slide {}: {}", record.index, e);
                    report.skipped_shapes += 1;
                }
            }
        }

        self.blank_invalid_geometry(&mut slide, record.index, report);
        slide
    }

    /// Drop every shape of a slide whose geometry cannot be resolved. The
    /// background and note survive so the deck keeps its slide count.
    fn blank_invalid_geometry(&self, slide: &mut SlideModel, index: usize, report: &mut BuildReport) {
        if let Err(e) = self.check_geometry(slide) {
            log::error!("Slide {}: {}; exporting it without shapes", index, e);
            slide.shapes.clear();
            report.blanked_slides.push(index);
        }
    }

    fn check_geometry(&self, slide: &SlideModel) -> Result<()> {
        for shape in &slide.shapes {
            self.geometry.validate(shape.position()).map_err(|e| {
                Error::Geometry(format!("{} shape: {}", shape.kind_name(), e))
            })?;
        }
        Ok(())
    }

    fn background(&self, record: &SlideRecord, theme: &Theme) -> Fill {
        let explicit = record
            .properties
            .as_ref()
            .and_then(|p| str_field(p, "background"))
            .and_then(|raw| {
                let color = normalize_hex_color(raw);
                if color.is_none() {
                    log::warn!("Slide {}: ignoring background '{}'", record.index, raw);
                }
                color
            });
        Fill::solid(explicit.unwrap_or_else(|| theme.palette.background.clone()))
    }

    fn title(&self, content: &Value, layout: &LayoutSchema) -> Option<Result<ShapeModel>> {
        let text = TITLE_KEYS.iter().find_map(|k| str_field(content, k))?;
        let mut frame = TextFrame::new(vec![Paragraph::text(self.normalizer.normalize(text))]);
        frame.font = Some(Font {
            size: Some(TITLE_FONT_SIZE),
            weight: Some(700),
            ..Default::default()
        });
        Some(Ok(ShapeModel::TextBox(TextBox {
            position: layout.title,
            frame,
        })))
    }

    /// Description paragraph followed by one bulleted paragraph per list item.
    fn body(&self, content: &Value, layout: &LayoutSchema) -> Option<Result<ShapeModel>> {
        let description = BODY_KEYS.iter().find_map(|k| str_field(content, k));
        let list = LIST_KEYS
            .iter()
            .find_map(|k| content.get(*k).and_then(Value::as_array));
        if description.is_none() && list.is_none() {
            return None;
        }

        let mut paragraphs = Vec::new();
        if let Some(text) = description {
            for line in self.normalizer.normalize(text).split('\n') {
                paragraphs.push(Paragraph::text(line));
            }
        }
        if let Some(items) = list {
            let bullets: Vec<Paragraph> = items.iter().filter_map(|i| self.list_item(i)).collect();
            if bullets.is_empty() && description.is_none() {
                return Some(Err(Error::ContentMapping(format!(
                    "list of {} items has no text",
                    items.len()
                ))));
            }
            paragraphs.extend(bullets);
        }

        let mut frame = TextFrame::new(paragraphs);
        frame.font = Some(Font {
            size: Some(BODY_FONT_SIZE),
            ..Default::default()
        });
        Some(Ok(ShapeModel::TextBox(TextBox {
            position: layout.body,
            frame,
        })))
    }

    fn list_item(&self, item: &Value) -> Option<Paragraph> {
        if let Some(text) = item.as_str().map(str::trim).filter(|s| !s.is_empty()) {
            return Some(Paragraph::text(self.normalizer.normalize(text)).bulleted());
        }
        let heading = TITLE_KEYS.iter().find_map(|k| str_field(item, k));
        let detail = BODY_KEYS.iter().find_map(|k| str_field(item, k));
        let runs = match (heading, detail) {
            (Some(h), Some(d)) => vec![
                TextRun::new(format!("{}: ", self.normalizer.normalize(h))).with_font(Font {
                    weight: Some(700),
                    ..Default::default()
                }),
                TextRun::new(self.normalizer.normalize(d)),
            ],
            (Some(t), None) | (None, Some(t)) => vec![TextRun::new(self.normalizer.normalize(t))],
            (None, None) => return None,
        };
        Some(Paragraph::runs(runs).bulleted())
    }

    fn picture(
        &self,
        content: &Value,
        path: &ContentPath,
        kind: AssetKind,
        region: Option<&Position>,
        report: &mut BuildReport,
    ) -> Result<ShapeModel> {
        let node = node_at(content, path)?;
        let position = match explicit_position(node, path)? {
            Some(position) => position,
            None => *region.ok_or_else(|| {
                Error::ContentMapping(format!("{} at '{}' has no layout region", kind.name(), path))
            })?,
        };

        let source = match resolve_asset(str_field(node, kind.url_key())) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("{} at '{}': {}; using placeholder", kind.name(), path, e);
                report.placeholder_assets += 1;
                PictureSource::Local(self.placeholder.clone())
            }
        };

        let mut picture = PictureBox::new(position, source);
        picture.clip = true;
        picture.object_fit = Some(match str_field(node, "object_fit") {
            Some("contain") => ObjectFit::Contain,
            Some("fill") => ObjectFit::Fill,
            Some("cover") => ObjectFit::Cover,
            _ => kind.default_fit(),
        });
        picture.focus = node.get("focus").map(|f| FocusPoint {
            x: f64_field(f, "x").unwrap_or(50.0),
            y: f64_field(f, "y").unwrap_or(50.0),
        });
        picture.mask = match str_field(node, "mask") {
            Some("circle") => Some(ShapeMask::Circle),
            Some("rectangle") => Some(ShapeMask::Rectangle),
            _ => None,
        };
        picture.opacity = f64_field(node, "opacity");
        picture.invert = node.get("invert").and_then(Value::as_bool).unwrap_or(false);
        Ok(ShapeModel::PictureBox(picture))
    }

    fn auto_shape(&self, content: &Value, path: &ContentPath, theme: &Theme) -> Result<ShapeModel> {
        let node = node_at(content, path)?;
        let kind_name = str_field(node, SHAPE_KEY).unwrap_or("rectangle");
        let kind = AutoShapeKind::from_name(kind_name).ok_or_else(|| {
            Error::ContentMapping(format!("unknown shape kind '{}' at '{}'", kind_name, path))
        })?;
        let position = require_position(node, path)?;

        let mut frame = TextFrame::default();
        if let Some(text) = str_field(node, "text") {
            frame.paragraphs = vec![Paragraph::text(self.normalizer.normalize(text))];
            frame.alignment = Some(Alignment::Center);
            frame.margin = Some(Margin {
                top: 8.0,
                right: 8.0,
                bottom: 8.0,
                left: 8.0,
            });
        }
        if let Some(color) = str_field(node, "text_color").and_then(normalize_hex_color) {
            frame.font = Some(Font {
                color: Some(color),
                ..Default::default()
            });
        }
        frame.fill = Some(Fill {
            color: color_field(node, "fill").unwrap_or_else(|| theme.palette.primary.clone()),
            opacity: f64_field(node, "opacity").unwrap_or(1.0),
        });

        let stroke = node.get("stroke").map(|s| Stroke {
            color: color_field(s, "color").unwrap_or_else(|| theme.palette.secondary.clone()),
            thickness: f64_field(s, "thickness").unwrap_or(1.0),
            opacity: f64_field(s, "opacity").unwrap_or(1.0),
        });

        let border_radius = f64_field(node, "radius").or(match theme.decoration {
            Decoration::Rounded => Some(ROUNDED_RADIUS),
            _ => None,
        });
        let kind = match (kind, border_radius) {
            (AutoShapeKind::Rectangle, Some(r)) if r > 0.0 => AutoShapeKind::RoundedRectangle,
            (kind, _) => kind,
        };

        let shadow = match theme.decoration {
            Decoration::Shadowed => Some(Shadow {
                radius: 12.0,
                offset: 4.0,
                color: "000000".to_string(),
                opacity: 0.25,
                angle: 90.0,
            }),
            _ => None,
        };

        Ok(ShapeModel::AutoShape(AutoShape {
            kind,
            position,
            frame,
            stroke,
            shadow,
            border_radius,
        }))
    }

    fn connector(&self, content: &Value, path: &ContentPath, theme: &Theme) -> Result<ShapeModel> {
        let node = node_at(content, path)?;
        let kind_name = str_field(node, CONNECTOR_KEY).unwrap_or("straight");
        let kind = ConnectorKind::from_name(kind_name).ok_or_else(|| {
            Error::ContentMapping(format!("unknown connector kind '{}' at '{}'", kind_name, path))
        })?;
        Ok(ShapeModel::Connector(Connector {
            kind,
            position: require_line_position(node, path)?,
            thickness: f64_field(node, "thickness").unwrap_or(2.0),
            color: color_field(node, "color").unwrap_or_else(|| theme.palette.secondary.clone()),
            opacity: f64_field(node, "opacity").unwrap_or(1.0),
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum AssetKind {
    Image,
    Icon,
}

impl AssetKind {
    fn name(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Icon => "icon",
        }
    }

    fn url_key(&self) -> &'static str {
        match self {
            AssetKind::Image => IMAGE_URL_KEY,
            AssetKind::Icon => ICON_URL_KEY,
        }
    }

    fn default_fit(&self) -> ObjectFit {
        match self {
            AssetKind::Image => ObjectFit::Cover,
            AssetKind::Icon => ObjectFit::Contain,
        }
    }
}

fn node_at<'v>(content: &'v Value, path: &ContentPath) -> Result<&'v Value> {
    get_at_path(content, path)
        .ok_or_else(|| Error::ContentMapping(format!("no node at '{}'", path)))
}

fn color_field(node: &Value, key: &str) -> Option<String> {
    str_field(node, key).and_then(normalize_hex_color)
}

/// Position from the node's `__position__`, if it has one. Every edge is
/// required; a box without a height has no area to draw into.
fn explicit_position(node: &Value, path: &ContentPath) -> Result<Option<Position>> {
    read_position(node, path, false)
}

fn read_position(node: &Value, path: &ContentPath, flat_ok: bool) -> Result<Option<Position>> {
    let Some(raw) = node.get(POSITION_KEY) else {
        return Ok(None);
    };
    let field = |name: &str| {
        f64_field(raw, name).ok_or_else(|| {
            Error::ContentMapping(format!("{} at '{}' lacks numeric '{}'", POSITION_KEY, path, name))
        })
    };
    let height = match f64_field(raw, "height") {
        Some(h) => h,
        None if flat_ok => 0.0,
        None => field("height")?,
    };
    Ok(Some(Position::new(field("left")?, field("top")?, field("width")?, height)))
}

fn require_position(node: &Value, path: &ContentPath) -> Result<Position> {
    explicit_position(node, path)?.ok_or_else(|| missing_position(path))
}

/// Connectors may omit the height; a horizontal line is flat.
fn require_line_position(node: &Value, path: &ContentPath) -> Result<Position> {
    read_position(node, path, true)?.ok_or_else(|| missing_position(path))
}

fn missing_position(path: &ContentPath) -> Error {
    Error::ContentMapping(format!("'{}' has no {}", path, POSITION_KEY))
}
