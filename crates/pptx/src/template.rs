//! Fixed deck scaffolding: presentation, properties, master, layout and
//! notes master parts.
//!
//! Every deck uses one master with one blank layout; all content lives on
//! the slides themselves.

use crate::constants::{ns, NOTES_SIZE, SLIDE_LAYOUT_ID, SLIDE_MASTER_ID};
use crate::xml::{escape, XML_DECLARATION};

const APPLICATION: &str = "slidepack";

fn pml_root(tag: &str, extra: &str) -> String {
    format!(
        r#"{}<p:{} xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"{}>"#,
        XML_DECLARATION,
        tag,
        ns::DML,
        ns::R,
        ns::PML,
        extra
    )
}

/// Opening of `p:spTree` with its mandatory group properties.
pub fn sp_tree_open() -> &'static str {
    concat!(
        "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>",
        "<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>",
        "<a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>"
    )
}

const CLR_MAP: &str = concat!(
    r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
    r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
    r#"hlink="hlink" folHlink="folHlink""#
);

/// `ppt/presentation.xml`.
///
/// `slide_rids` are the presentation-level relationship ids of the slides,
/// in display order.
pub fn presentation_xml(
    master_rid: &str,
    notes_master_rid: Option<&str>,
    slide_rids: &[String],
    slide_size: (i64, i64),
) -> String {
    let mut xml = pml_root("presentation", r#" saveSubsetFonts="1""#);
    xml.push_str(&format!(
        r#"<p:sldMasterIdLst><p:sldMasterId id="{}" r:id="{}"/></p:sldMasterIdLst>"#,
        SLIDE_MASTER_ID, master_rid
    ));
    if let Some(rid) = notes_master_rid {
        xml.push_str(&format!(
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
            rid
        ));
    }
    if !slide_rids.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (i, rid) in slide_rids.iter().enumerate() {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                crate::constants::FIRST_SLIDE_ID as usize + i,
                rid
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="{}" cy="{}"/>"#,
        slide_size.0, slide_size.1, NOTES_SIZE.0, NOTES_SIZE.1
    ));
    xml.push_str("<p:defaultTextStyle><a:defPPr><a:defRPr lang=\"en-US\"/></a:defPPr></p:defaultTextStyle>");
    xml.push_str("</p:presentation>");
    xml
}

pub fn pres_props_xml() -> String {
    let mut xml = pml_root("presentationPr", "");
    xml.push_str("</p:presentationPr>");
    xml
}

pub fn view_props_xml() -> String {
    let mut xml = pml_root("viewPr", "");
    xml.push_str(r#"<p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#);
    xml
}

pub fn table_styles_xml() -> String {
    format!(
        r#"{}<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        XML_DECLARATION,
        ns::DML
    )
}

/// `docProps/core.xml`; carries the presentation name as title.
pub fn core_props_xml(title: Option<&str>) -> String {
    let mut xml = format!(
        r#"{}<cp:coreProperties xmlns:cp="{}" xmlns:dc="{}" xmlns:dcterms="{}" xmlns:xsi="{}">"#,
        XML_DECLARATION,
        ns::CORE_PROPS,
        ns::DC,
        ns::DCTERMS,
        ns::XSI
    );
    if let Some(title) = title {
        xml.push_str(&format!("<dc:title>{}</dc:title>", escape(title)));
    }
    xml.push_str(&format!("<dc:creator>{}</dc:creator>", APPLICATION));
    xml.push_str("</cp:coreProperties>");
    xml
}

pub fn app_props_xml(slides: usize, notes: usize) -> String {
    format!(
        r#"{}<Properties xmlns="{}"><Application>{}</Application><PresentationFormat>Custom</PresentationFormat><Slides>{}</Slides><Notes>{}</Notes></Properties>"#,
        XML_DECLARATION,
        ns::EXTENDED_PROPS,
        APPLICATION,
        slides,
        notes
    )
}

/// The single slide master. Its relationships are rId1 = layout,
/// rId2 = theme.
pub fn slide_master_xml() -> String {
    let mut xml = pml_root("sldMaster", "");
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str(sp_tree_open());
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(&format!("<p:clrMap {}/>", CLR_MAP));
    xml.push_str(&format!(
        r#"<p:sldLayoutIdLst><p:sldLayoutId id="{}" r:id="rId1"/></p:sldLayoutIdLst>"#,
        SLIDE_LAYOUT_ID
    ));
    xml.push_str("<p:txStyles>");
    for style in ["titleStyle", "bodyStyle", "otherStyle"] {
        xml.push_str(&format!(
            r#"<p:{s}><a:lvl1pPr><a:defRPr lang="en-US"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:{s}>"#,
            s = style
        ));
    }
    xml.push_str("</p:txStyles></p:sldMaster>");
    xml
}

/// The blank layout every slide uses.
pub fn slide_layout_xml() -> String {
    let mut xml = pml_root("sldLayout", r#" type="blank" preserve="1""#);
    xml.push_str(r#"<p:cSld name="Blank">"#);
    xml.push_str(sp_tree_open());
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    xml
}

/// Notes master; its only relationship is rId1 = notes theme.
pub fn notes_master_xml() -> String {
    let mut xml = pml_root("notesMaster", "");
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str(sp_tree_open());
    xml.push_str(concat!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
        r#"<p:nvPr><p:ph type="sldImg" idx="2"/></p:nvPr></p:nvSpPr>"#,
        r#"<p:spPr><a:xfrm><a:off x="381000" y="685800"/><a:ext cx="6096000" cy="3429000"/></a:xfrm>"#,
        r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:sp>"#,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
        r#"<p:nvPr><p:ph type="body" sz="quarter" idx="3"/></p:nvPr></p:nvSpPr>"#,
        r#"<p:spPr><a:xfrm><a:off x="685800" y="4400550"/><a:ext cx="5486400" cy="3600450"/></a:xfrm>"#,
        r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
        r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#
    ));
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(&format!("<p:clrMap {}/>", CLR_MAP));
    xml.push_str("</p:notesMaster>");
    xml
}
