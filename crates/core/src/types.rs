//! Domain types for the typed slide model handed to the serializer.
//!
//! The model is built fresh for every export, owned as a plain tree
//! (presentation -> slides -> shapes -> paragraphs -> runs) and dropped once
//! the package is written.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output container formats a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Office Open XML slide deck.
    Pptx,
    /// Portable Document Format. Recognised, never produced.
    Pdf,
}

impl ExportFormat {
    /// Parse a format name such as "pptx" or ".PPTX".
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('.').to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// File extension for the format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
        }
    }

    /// Detect a produced file's format from its magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        if bytes.starts_with(b"%PDF") {
            return Some(Self::Pdf);
        }

        None
    }
}

/// A whole presentation, slides in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationModel {
    /// Optional presentation name (written to the document properties).
    pub name: Option<String>,

    /// Theme used for the theme part and as a style fallback layer.
    #[serde(default)]
    pub theme: Theme,

    /// Slides in display order. Never reordered.
    pub slides: Vec<SlideModel>,
}

impl PresentationModel {
    /// Create an empty presentation with the default theme.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            theme: Theme::default(),
            slides: Vec::new(),
        }
    }

    /// Add a slide at the end of the deck.
    pub fn add_slide(&mut self, slide: SlideModel) {
        self.slides.push(slide);
    }

    /// Number of slides carrying a speaker note.
    pub fn notes_count(&self) -> usize {
        self.slides.iter().filter(|s| s.note.is_some()).count()
    }
}

/// A single slide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideModel {
    /// Optional solid background.
    pub background: Option<Fill>,

    /// Optional speaker note (plain text).
    pub note: Option<String>,

    /// Shapes in paint order (first is painted first, at the back).
    pub shapes: Vec<ShapeModel>,
}

impl SlideModel {
    /// Create an empty slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of the existing ones.
    pub fn add_shape(&mut self, shape: ShapeModel) {
        self.shapes.push(shape);
    }
}

/// Logical position and size, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Solid fill with opacity in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: String,
    #[serde(default = "opaque")]
    pub opacity: f64,
}

impl Fill {
    /// An opaque fill of the given color.
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            opacity: 1.0,
        }
    }
}

/// Outline stroke; thickness in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub thickness: f64,
    #[serde(default = "opaque")]
    pub opacity: f64,
}

/// Outer shadow; radius and offset in pixels, angle in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub radius: f64,
    pub offset: f64,
    pub color: String,
    #[serde(default = "opaque")]
    pub opacity: f64,
    pub angle: f64,
}

fn opaque() -> f64 {
    1.0
}

/// A font override layer. Unset fields inherit from the next layer down.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: Option<String>,
    /// Size in points.
    pub size: Option<f64>,
    /// CSS-style weight, 100..=900.
    pub weight: Option<u16>,
    pub italic: Option<bool>,
    /// Six hex digits, no leading '#'.
    pub color: Option<String>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
}

impl Font {
    /// Fill every unset field of `self` from `lower`.
    pub fn over(&self, lower: &Font) -> Font {
        Font {
            name: self.name.clone().or_else(|| lower.name.clone()),
            size: self.size.or(lower.size),
            weight: self.weight.or(lower.weight),
            italic: self.italic.or(lower.italic),
            color: self.color.clone().or_else(|| lower.color.clone()),
            underline: self.underline.or(lower.underline),
            strike: self.strike.or(lower.strike),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Font::default()
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Inner text margin, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Space before and after a paragraph, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParagraphSpacing {
    pub before: f64,
    pub after: f64,
}

/// A run of text sharing one font override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub font: Option<Font>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }
}

/// Paragraph content: plain text or runs, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphContent {
    Text(String),
    Runs(Vec<TextRun>),
}

/// A paragraph of a text frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(flatten)]
    pub content: ParagraphContent,
    pub alignment: Option<Alignment>,
    pub spacing: Option<ParagraphSpacing>,
    /// Line height as a multiple of single spacing.
    pub line_height: Option<f64>,
    /// Paragraph-level font, between run and shape in the cascade.
    pub font: Option<Font>,
    #[serde(default)]
    pub bullet: bool,
}

impl Paragraph {
    /// A plain-text paragraph.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(ParagraphContent::Text(text.into()))
    }

    /// A paragraph made of runs.
    pub fn runs(runs: Vec<TextRun>) -> Self {
        Self::with_content(ParagraphContent::Runs(runs))
    }

    fn with_content(content: ParagraphContent) -> Self {
        Self {
            content,
            alignment: None,
            spacing: None,
            line_height: None,
            font: None,
            bullet: false,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn bulleted(mut self) -> Self {
        self.bullet = true;
        self
    }

    /// Concatenated text of the paragraph.
    pub fn plain_text(&self) -> String {
        match &self.content {
            ParagraphContent::Text(text) => text.clone(),
            ParagraphContent::Runs(runs) => runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

/// Text-bearing part of TextBox and AutoShape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    pub margin: Option<Margin>,
    pub fill: Option<Fill>,
    #[serde(default = "wrap_default")]
    pub wrap: bool,
    /// Shape-level default font.
    pub font: Option<Font>,
    /// Shape-level default alignment.
    pub alignment: Option<Alignment>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

fn wrap_default() -> bool {
    true
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            margin: None,
            fill: None,
            wrap: true,
            font: None,
            alignment: None,
            paragraphs: Vec::new(),
        }
    }
}

impl TextFrame {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            ..Default::default()
        }
    }
}

/// A plain text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub position: Position,
    #[serde(default)]
    pub frame: TextFrame,
}

/// Preset geometries available to AutoShape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoShapeKind {
    #[default]
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Triangle,
    Diamond,
    RightArrow,
    Chevron,
    Hexagon,
    Star,
}

impl AutoShapeKind {
    /// Parse a loosely written kind name ("rounded-rectangle", "Oval", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "rectangle" | "rect" => Some(Self::Rectangle),
            "roundedrectangle" | "roundrect" => Some(Self::RoundedRectangle),
            "ellipse" | "oval" | "circle" => Some(Self::Ellipse),
            "triangle" => Some(Self::Triangle),
            "diamond" => Some(Self::Diamond),
            "rightarrow" | "arrow" => Some(Self::RightArrow),
            "chevron" => Some(Self::Chevron),
            "hexagon" => Some(Self::Hexagon),
            "star" => Some(Self::Star),
            _ => None,
        }
    }
}

/// A preset geometric shape with optional text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoShape {
    pub kind: AutoShapeKind,
    pub position: Position,
    #[serde(default)]
    pub frame: TextFrame,
    pub stroke: Option<Stroke>,
    pub shadow: Option<Shadow>,
    /// Corner radius in pixels (rounded rectangles).
    pub border_radius: Option<f64>,
}

/// Where a picture's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PictureSource {
    /// Linked, never embedded.
    Network(String),
    /// Embedded into the media store.
    Local(PathBuf),
}

impl PictureSource {
    pub fn is_network(&self) -> bool {
        matches!(self, PictureSource::Network(_))
    }
}

/// How a picture fills its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectFit {
    Contain,
    Cover,
    Fill,
}

/// Focus point for cropping, in percent of the image (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusPoint {
    pub x: f64,
    pub y: f64,
}

impl Default for FocusPoint {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// Geometry the picture is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeMask {
    #[default]
    Rectangle,
    Circle,
}

/// A picture reference and its presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureBox {
    pub position: Position,
    pub source: PictureSource,
    /// Crop the picture to its frame instead of stretching it.
    #[serde(default)]
    pub clip: bool,
    pub opacity: Option<f64>,
    #[serde(default)]
    pub invert: bool,
    pub object_fit: Option<ObjectFit>,
    pub focus: Option<FocusPoint>,
    pub mask: Option<ShapeMask>,
}

impl PictureBox {
    pub fn new(position: Position, source: PictureSource) -> Self {
        Self {
            position,
            source,
            clip: false,
            opacity: None,
            invert: false,
            object_fit: None,
            focus: None,
            mask: None,
        }
    }
}

/// Line routing of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    #[default]
    Straight,
    Elbow,
    Curved,
}

impl ConnectorKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "straight" | "line" => Some(Self::Straight),
            "elbow" | "bent" => Some(Self::Elbow),
            "curved" | "curve" => Some(Self::Curved),
            _ => None,
        }
    }
}

/// A line from the top-left to the bottom-right corner of its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub position: Position,
    /// Thickness in pixels.
    pub thickness: f64,
    pub color: String,
    #[serde(default = "opaque")]
    pub opacity: f64,
}

/// Everything a slide can contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape_type", rename_all = "snake_case")]
pub enum ShapeModel {
    TextBox(TextBox),
    AutoShape(AutoShape),
    PictureBox(PictureBox),
    Connector(Connector),
}

impl ShapeModel {
    pub fn position(&self) -> &Position {
        match self {
            ShapeModel::TextBox(s) => &s.position,
            ShapeModel::AutoShape(s) => &s.position,
            ShapeModel::PictureBox(s) => &s.position,
            ShapeModel::Connector(s) => &s.position,
        }
    }

    /// Text frame, for the variants that carry text.
    pub fn frame(&self) -> Option<&TextFrame> {
        match self {
            ShapeModel::TextBox(s) => Some(&s.frame),
            ShapeModel::AutoShape(s) => Some(&s.frame),
            _ => None,
        }
    }

    /// Human-readable variant name used in shape names and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ShapeModel::TextBox(_) => "TextBox",
            ShapeModel::AutoShape(_) => "AutoShape",
            ShapeModel::PictureBox(_) => "Picture",
            ShapeModel::Connector(_) => "Connector",
        }
    }
}

/// Template colors. All values are six hex digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: String,
    pub text: String,
    pub primary: String,
    pub secondary: String,
    #[serde(default)]
    pub accents: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "FFFFFF".to_string(),
            text: "000000".to_string(),
            primary: "2F5597".to_string(),
            secondary: "44546A".to_string(),
            accents: Vec::new(),
        }
    }
}

/// Template decoration style applied to explicit shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    #[default]
    Flat,
    Rounded,
    Shadowed,
}

/// Named defaults of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub palette: Palette,
    pub font_family: Option<String>,
    #[serde(default)]
    pub decoration: Decoration,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            palette: Palette::default(),
            font_family: None,
            decoration: Decoration::Flat,
        }
    }
}

/// Normalize a CSS-ish hex color to six upper-case digits.
///
/// Accepts an optional leading '#' and the three-digit shorthand.
pub fn normalize_hex_color(color: &str) -> Option<String> {
    let hex = color.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(hex.to_uppercase()),
        3 => Some(
            hex.chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_uppercase(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_name() {
        assert_eq!(ExportFormat::from_name("pptx"), Some(ExportFormat::Pptx));
        assert_eq!(ExportFormat::from_name(".PPTX"), Some(ExportFormat::Pptx));
        assert_eq!(ExportFormat::from_name("pdf"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::from_name("key"), None);
    }

    #[test]
    fn test_export_format_from_magic() {
        assert_eq!(
            ExportFormat::from_magic(&[0x50, 0x4B, 0x03, 0x04, 0x14]),
            Some(ExportFormat::Pptx)
        );
        assert_eq!(ExportFormat::from_magic(b"%PDF-1.7"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::from_magic(b"PK"), None);
    }

    #[test]
    fn test_font_over_fills_unset_fields() {
        let run = Font {
            size: Some(24.0),
            underline: Some(false),
            ..Default::default()
        };
        let shape = Font {
            name: Some("Inter".into()),
            size: Some(12.0),
            underline: Some(true),
            strike: Some(true),
            ..Default::default()
        };
        let merged = run.over(&shape);
        assert_eq!(merged.name.as_deref(), Some("Inter"));
        assert_eq!(merged.size, Some(24.0));
        assert_eq!(merged.underline, Some(false));
        assert_eq!(merged.strike, Some(true));
        assert_eq!(merged.italic, None);
    }

    #[test]
    fn test_paragraph_plain_text() {
        let p = Paragraph::runs(vec![TextRun::new("Hello "), TextRun::new("World")]);
        assert_eq!(p.plain_text(), "Hello World");
        assert_eq!(Paragraph::text("Hi").plain_text(), "Hi");
    }

    #[test]
    fn test_shape_model_tagged_serde() {
        let shape = ShapeModel::TextBox(TextBox {
            position: Position::new(10.0, 20.0, 300.0, 40.0),
            frame: TextFrame::new(vec![Paragraph::text("Hello World")]),
        });
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["shape_type"], "text_box");
        assert_eq!(json["frame"]["paragraphs"][0]["text"], "Hello World");

        let back: ShapeModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_paragraph_rejects_missing_content() {
        let result: Result<Paragraph, _> = serde_json::from_str(r#"{"bullet": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_picture_source_is_network() {
        assert!(PictureSource::Network("https://x/y.png".into()).is_network());
        assert!(!PictureSource::Local("/tmp/y.png".into()).is_network());
    }

    #[test]
    fn test_auto_shape_kind_from_name() {
        assert_eq!(AutoShapeKind::from_name("Oval"), Some(AutoShapeKind::Ellipse));
        assert_eq!(
            AutoShapeKind::from_name("rounded-rectangle"),
            Some(AutoShapeKind::RoundedRectangle)
        );
        assert_eq!(AutoShapeKind::from_name("blob"), None);
    }

    #[test]
    fn test_normalize_hex_color() {
        assert_eq!(normalize_hex_color("#ff8800").as_deref(), Some("FF8800"));
        assert_eq!(normalize_hex_color("abc").as_deref(), Some("AABBCC"));
        assert_eq!(normalize_hex_color("12345"), None);
        assert_eq!(normalize_hex_color("zzzzzz"), None);
    }

    #[test]
    fn test_notes_count() {
        let mut model = PresentationModel::new(Some("Deck".into()));
        let mut slide = SlideModel::new();
        slide.note = Some("Say hi".into());
        model.add_slide(slide);
        model.add_slide(SlideModel::new());
        assert_eq!(model.notes_count(), 1);
    }
}
