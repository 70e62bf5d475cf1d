//! Theme part generated from the model theme.

use crate::constants::ns;
use crate::xml::{escape, XML_DECLARATION};
use slidepack_core::style::FALLBACK_FONT_NAME;
use slidepack_core::types::{normalize_hex_color, Theme};

/// Accent colors used when the palette names fewer than six.
const DEFAULT_ACCENTS: [&str; 6] = ["4472C4", "ED7D31", "A5A5A5", "FFC000", "5B9BD5", "70AD47"];

/// Render `a:theme` for `theme`.
pub fn theme_xml(theme: &Theme) -> String {
    let palette = &theme.palette;
    let color = |value: &str, fallback: &str| normalize_hex_color(value).unwrap_or_else(|| fallback.to_string());

    // primary leads the accents, then the palette's own accents, then defaults
    let mut accents: Vec<String> = std::iter::once(color(&palette.primary, DEFAULT_ACCENTS[0]))
        .chain(palette.accents.iter().filter_map(|a| normalize_hex_color(a)))
        .take(6)
        .collect();
    for default in DEFAULT_ACCENTS.iter().skip(accents.len()) {
        accents.push(default.to_string());
    }

    let font = escape(theme.font_family.as_deref().unwrap_or(FALLBACK_FONT_NAME)).into_owned();

    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<a:theme xmlns:a="{}" name="{}"><a:themeElements>"#,
        ns::DML,
        escape(&theme.name)
    ));

    xml.push_str(&format!(r#"<a:clrScheme name="{}">"#, escape(&theme.name)));
    xml.push_str(&format!(
        r#"<a:dk1><a:srgbClr val="{}"/></a:dk1>"#,
        color(&palette.text, "000000")
    ));
    xml.push_str(&format!(
        r#"<a:lt1><a:srgbClr val="{}"/></a:lt1>"#,
        color(&palette.background, "FFFFFF")
    ));
    xml.push_str(&format!(
        r#"<a:dk2><a:srgbClr val="{}"/></a:dk2>"#,
        color(&palette.secondary, "44546A")
    ));
    xml.push_str(r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#);
    for (i, accent) in accents.iter().enumerate() {
        xml.push_str(&format!(
            r#"<a:accent{n}><a:srgbClr val="{}"/></a:accent{n}>"#,
            accent,
            n = i + 1
        ));
    }
    xml.push_str(r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#);
    xml.push_str(r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#);
    xml.push_str("</a:clrScheme>");

    xml.push_str(&format!(r#"<a:fontScheme name="{}">"#, escape(&theme.name)));
    for slot in ["majorFont", "minorFont"] {
        xml.push_str(&format!(
            r#"<a:{slot}><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:{slot}>"#,
            slot = slot,
            font = font
        ));
    }
    xml.push_str("</a:fontScheme>");

    xml.push_str(&format!(r#"<a:fmtScheme name="{}">"#, escape(&theme.name)));
    xml.push_str("<a:fillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        xml.push_str(&format!(
            r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/><a:miter lim="800000"/></a:ln>"#,
            width
        ));
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme>");

    xml.push_str("</a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}
