//! Text body markup: body properties, paragraphs and runs.

use crate::constants::LANG;
use crate::xml::{escape, solid_fill};
use slidepack_core::geometry::{pt_to_centipoints, px_to_emu};
use slidepack_core::style::{ResolvedFont, ResolvedParagraph, StyleCascade};
use slidepack_core::types::{Alignment, TextFrame};

/// Bullet indent in EMU (0.375 in).
const BULLET_INDENT: i64 = 342_900;
const BULLET_CHAR: &str = "\u{2022}";

/// Vertical anchoring of a text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        }
    }
}

/// Full `p:txBody` for a frame, styles resolved through `cascade`.
pub fn text_body(cascade: &StyleCascade, frame: &TextFrame, anchor: Anchor, auto_fit: bool) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str("<p:txBody>");
    xml.push_str(&body_properties(frame, anchor, auto_fit));
    xml.push_str("<a:lstStyle/>");

    let paragraphs = cascade.resolve_frame(frame);
    if paragraphs.is_empty() {
        // a text body needs at least one paragraph
        let end_font = cascade.resolve_font(None, None, frame.font.as_ref());
        xml.push_str("<a:p>");
        xml.push_str(&run_properties("a:endParaRPr", &end_font));
        xml.push_str("</a:p>");
    }
    for paragraph in &paragraphs {
        xml.push_str(&paragraph_xml(paragraph));
    }

    xml.push_str("</p:txBody>");
    xml
}

fn body_properties(frame: &TextFrame, anchor: Anchor, auto_fit: bool) -> String {
    let mut xml = format!(
        r#"<a:bodyPr wrap="{}" rtlCol="0" anchor="{}""#,
        if frame.wrap { "square" } else { "none" },
        anchor.as_str()
    );
    if let Some(margin) = frame.margin {
        xml.push_str(&format!(
            r#" lIns="{}" tIns="{}" rIns="{}" bIns="{}""#,
            px_to_emu(margin.left),
            px_to_emu(margin.top),
            px_to_emu(margin.right),
            px_to_emu(margin.bottom)
        ));
    }
    if auto_fit {
        xml.push_str("><a:spAutoFit/></a:bodyPr>");
    } else {
        xml.push_str("/>");
    }
    xml
}

fn alignment_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "l",
        Alignment::Center => "ctr",
        Alignment::Right => "r",
        Alignment::Justify => "just",
    }
}

/// One `a:p`. Line breaks inside run text become `a:br`.
pub fn paragraph_xml(paragraph: &ResolvedParagraph) -> String {
    let mut xml = String::from("<a:p>");

    xml.push_str(&format!(r#"<a:pPr algn="{}""#, alignment_value(paragraph.alignment)));
    if paragraph.bullet {
        xml.push_str(&format!(r#" marL="{}" indent="-{}""#, BULLET_INDENT, BULLET_INDENT));
    }
    xml.push('>');
    if let Some(line_height) = paragraph.line_height {
        xml.push_str(&format!(
            r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#,
            (line_height.max(0.0) * 100_000.0).round() as i64
        ));
    }
    if let Some(spacing) = paragraph.spacing {
        xml.push_str(&format!(
            r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef><a:spcAft><a:spcPts val="{}"/></a:spcAft>"#,
            pt_to_centipoints(spacing.before.max(0.0)),
            pt_to_centipoints(spacing.after.max(0.0))
        ));
    }
    if paragraph.bullet {
        xml.push_str(&format!(r#"<a:buChar char="{}"/>"#, BULLET_CHAR));
    } else {
        xml.push_str("<a:buNone/>");
    }
    xml.push_str("</a:pPr>");

    for run in &paragraph.runs {
        for (i, line) in run.text.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<a:br>");
                xml.push_str(&run_properties("a:rPr", &run.font));
                xml.push_str("</a:br>");
            }
            if line.is_empty() {
                continue;
            }
            xml.push_str("<a:r>");
            xml.push_str(&run_properties("a:rPr", &run.font));
            xml.push_str(&format!("<a:t>{}</a:t>", escape(line)));
            xml.push_str("</a:r>");
        }
    }

    xml.push_str(&run_properties("a:endParaRPr", &paragraph.end_font));
    xml.push_str("</a:p>");
    xml
}

/// `a:rPr` or `a:endParaRPr` for a resolved font.
pub fn run_properties(tag: &str, font: &ResolvedFont) -> String {
    let mut xml = format!(
        r#"<{} lang="{}" sz="{}""#,
        tag,
        LANG,
        pt_to_centipoints(font.size)
    );
    if font.bold {
        xml.push_str(r#" b="1""#);
    }
    if font.italic {
        xml.push_str(r#" i="1""#);
    }
    if font.underline {
        xml.push_str(r#" u="sng""#);
    }
    if font.strike {
        xml.push_str(r#" strike="sngStrike""#);
    }
    xml.push_str(r#" dirty="0">"#);
    xml.push_str(&solid_fill(&font.color, 1.0));
    xml.push_str(&format!(r#"<a:latin typeface="{}"/>"#, escape(&font.name)));
    xml.push_str(&format!("</{}>", tag));
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidepack_core::types::{Font, Margin, Paragraph, ParagraphSpacing, TextRun};

    fn body(frame: &TextFrame) -> String {
        text_body(&StyleCascade::default(), frame, Anchor::Top, true)
    }

    #[test]
    fn test_plain_text_paragraph() {
        let xml = body(&TextFrame::new(vec![Paragraph::text("Hello World")]));
        assert!(xml.contains("<a:t>Hello World</a:t>"));
        assert!(xml.contains(r#"algn="l""#));
        assert!(xml.contains(r#"sz="1800""#));
        assert!(xml.contains(r#"<a:latin typeface="Arial"/>"#));
        assert!(xml.contains("<a:spAutoFit/>"));
        assert!(xml.contains(r#"wrap="square""#));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let xml = body(&TextFrame::new(vec![Paragraph::text("one\ntwo")]));
        assert_eq!(xml.matches("<a:br>").count(), 1);
        assert!(xml.contains("<a:t>one</a:t>"));
        assert!(xml.contains("<a:t>two</a:t>"));
    }

    #[test]
    fn test_run_styles_and_escaping() {
        let frame = TextFrame::new(vec![Paragraph::runs(vec![
            TextRun::new("A & B").with_font(Font {
                weight: Some(700),
                italic: Some(true),
                underline: Some(true),
                strike: Some(true),
                color: Some("FF0000".into()),
                ..Default::default()
            }),
            TextRun::new(" <plain>"),
        ])]);
        let xml = body(&frame);
        assert!(xml.contains(r#"b="1" i="1" u="sng" strike="sngStrike""#));
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"/>"#));
        assert!(xml.contains("<a:t>A &amp; B</a:t>"));
        assert!(xml.contains("<a:t> &lt;plain&gt;</a:t>"));
    }

    #[test]
    fn test_bullets_and_spacing() {
        let mut paragraph = Paragraph::text("Point").bulleted();
        paragraph.spacing = Some(ParagraphSpacing {
            before: 6.0,
            after: 12.0,
        });
        paragraph.line_height = Some(1.5);
        let xml = body(&TextFrame::new(vec![paragraph]));
        assert!(xml.contains(r#"marL="342900" indent="-342900""#));
        assert!(xml.contains("<a:buChar char=\"\u{2022}\"/>"));
        assert!(xml.contains(r#"<a:spcPct val="150000"/>"#));
        assert!(xml.contains(r#"<a:spcBef><a:spcPts val="600"/></a:spcBef>"#));
        assert!(xml.contains(r#"<a:spcAft><a:spcPts val="1200"/></a:spcAft>"#));
    }

    #[test]
    fn test_empty_frame_has_one_paragraph() {
        let mut frame = TextFrame::default();
        frame.wrap = false;
        frame.margin = Some(Margin {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        });
        let xml = text_body(&StyleCascade::default(), &frame, Anchor::Middle, false);
        assert_eq!(xml.matches("<a:p>").count(), 1);
        assert!(xml.contains("<a:endParaRPr"));
        assert!(xml.contains(r#"wrap="none""#));
        assert!(xml.contains(r#"anchor="ctr""#));
        assert!(xml.contains(r#"lIns="38100" tIns="9525" rIns="19050" bIns="28575""#));
        assert!(!xml.contains("spAutoFit"));
    }
}
