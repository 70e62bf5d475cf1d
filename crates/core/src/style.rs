//! Style cascade resolution.
//!
//! Effective run styles are resolved from layers, highest first: run font,
//! paragraph font, shape default, theme default, global fallback. Resolution
//! is pure; the same model always yields the same styles.

use crate::types::{
    Alignment, Font, Paragraph, ParagraphContent, ParagraphSpacing, TextFrame, Theme,
};

/// Font used when no layer names one.
pub const FALLBACK_FONT_NAME: &str = "Arial";

/// Size used when no layer sets one, in points.
pub const FALLBACK_FONT_SIZE: f64 = 18.0;

/// Text color used when no layer sets one.
pub const FALLBACK_TEXT_COLOR: &str = "000000";

const BOLD_WEIGHT: u16 = 600;

/// A fully resolved run style. Every field is concrete.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: String,
    pub underline: bool,
    pub strike: bool,
}

/// A run with its effective style.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub text: String,
    pub font: ResolvedFont,
}

/// A paragraph with its effective alignment and resolved runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParagraph {
    pub alignment: Alignment,
    pub spacing: Option<ParagraphSpacing>,
    pub line_height: Option<f64>,
    pub bullet: bool,
    pub runs: Vec<ResolvedRun>,
    /// Style of the paragraph end mark (and of empty paragraphs).
    pub end_font: ResolvedFont,
}

/// Layered style resolver for one presentation.
#[derive(Debug, Clone)]
pub struct StyleCascade {
    /// Theme layer and global fallback, already merged.
    base: Font,
}

impl StyleCascade {
    /// Cascade whose theme layer comes from `theme`.
    pub fn new(theme: &Theme) -> Self {
        let theme_layer = Font {
            name: theme.font_family.clone(),
            color: Some(theme.palette.text.clone()),
            ..Default::default()
        };
        Self {
            base: theme_layer.over(&Self::fallback()),
        }
    }

    /// The global fallback layer.
    pub fn fallback() -> Font {
        Font {
            name: Some(FALLBACK_FONT_NAME.to_string()),
            size: Some(FALLBACK_FONT_SIZE),
            weight: Some(400),
            italic: Some(false),
            color: Some(FALLBACK_TEXT_COLOR.to_string()),
            underline: None,
            strike: None,
        }
    }

    /// Resolve one run from its layers, highest precedence first.
    pub fn resolve_font(
        &self,
        run: Option<&Font>,
        paragraph: Option<&Font>,
        shape: Option<&Font>,
    ) -> ResolvedFont {
        let merged = [run, paragraph, shape]
            .into_iter()
            .flatten()
            .rev()
            .fold(self.base.clone(), |lower, layer| layer.over(&lower));

        ResolvedFont {
            name: merged
                .name
                .unwrap_or_else(|| FALLBACK_FONT_NAME.to_string()),
            size: merged.size.unwrap_or(FALLBACK_FONT_SIZE),
            bold: merged.weight.unwrap_or(400) >= BOLD_WEIGHT,
            italic: merged.italic.unwrap_or(false),
            color: merged
                .color
                .unwrap_or_else(|| FALLBACK_TEXT_COLOR.to_string()),
            // unset at every layer means off
            underline: merged.underline.unwrap_or(false),
            strike: merged.strike.unwrap_or(false),
        }
    }

    /// Paragraph alignment, then shape default, then left.
    pub fn resolve_alignment(
        &self,
        paragraph: Option<Alignment>,
        shape: Option<Alignment>,
    ) -> Alignment {
        paragraph.or(shape).unwrap_or_default()
    }

    /// Resolve every paragraph of a text frame.
    pub fn resolve_frame(&self, frame: &TextFrame) -> Vec<ResolvedParagraph> {
        frame
            .paragraphs
            .iter()
            .map(|p| self.resolve_paragraph(p, frame))
            .collect()
    }

    fn resolve_paragraph(&self, paragraph: &Paragraph, frame: &TextFrame) -> ResolvedParagraph {
        let para_font = paragraph.font.as_ref();
        let shape_font = frame.font.as_ref();
        let runs = match &paragraph.content {
            ParagraphContent::Text(text) if text.is_empty() => Vec::new(),
            ParagraphContent::Text(text) => vec![ResolvedRun {
                text: text.clone(),
                font: self.resolve_font(None, para_font, shape_font),
            }],
            ParagraphContent::Runs(runs) => runs
                .iter()
                .map(|run| ResolvedRun {
                    text: run.text.clone(),
                    font: self.resolve_font(run.font.as_ref(), para_font, shape_font),
                })
                .collect(),
        };

        ResolvedParagraph {
            alignment: self.resolve_alignment(paragraph.alignment, frame.alignment),
            spacing: paragraph.spacing,
            line_height: paragraph.line_height,
            bullet: paragraph.bullet,
            runs,
            end_font: self.resolve_font(None, para_font, shape_font),
        }
    }
}

impl Default for StyleCascade {
    fn default() -> Self {
        Self::new(&Theme::default())
    }
}
