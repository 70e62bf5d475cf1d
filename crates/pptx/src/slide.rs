//! Slide and notes slide parts.

use crate::constants::{ns, LANG};
use crate::template::sp_tree_open;
use crate::xml::{escape, solid_fill, XML_DECLARATION};
use slidepack_core::types::Fill;

fn open(tag: &str) -> String {
    format!(
        r#"{}<p:{} xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        XML_DECLARATION,
        tag,
        ns::DML,
        ns::R,
        ns::PML
    )
}

/// `p:sld` around already rendered shape elements.
pub fn slide_xml(background: Option<&Fill>, shapes: &[String]) -> String {
    let mut xml = open("sld");
    xml.push_str("<p:cSld>");
    if let Some(fill) = background {
        xml.push_str("<p:bg><p:bgPr>");
        xml.push_str(&solid_fill(&fill.color, fill.opacity));
        xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
    }
    xml.push_str(sp_tree_open());
    for shape in shapes {
        xml.push_str(shape);
    }
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

/// `p:notes` holding the slide image and the note text, one paragraph per
/// line.
pub fn notes_slide_xml(note: &str) -> String {
    let mut xml = open("notes");
    xml.push_str("<p:cSld>");
    xml.push_str(sp_tree_open());
    xml.push_str(concat!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
        r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
        r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
        r#"<p:txBody><a:bodyPr/><a:lstStyle/>"#
    ));
    for line in note.split('\n') {
        if line.is_empty() {
            xml.push_str(&format!(r#"<a:p><a:endParaRPr lang="{}"/></a:p>"#, LANG));
        } else {
            xml.push_str(&format!(
                r#"<a:p><a:r><a:rPr lang="{}" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                LANG,
                escape(line)
            ));
        }
    }
    xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
    xml
}
