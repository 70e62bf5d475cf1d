//! Small markup helpers shared by the part writers.

use slidepack_core::geometry::fraction_to_percentage;
use slidepack_core::types::normalize_hex_color;
use std::borrow::Cow;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Escape text or an attribute value.
pub fn escape(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// `a:srgbClr`, with an alpha child when not opaque.
///
/// `color` must already be hex; [`PptxWriter`](crate::PptxWriter) rejects
/// models carrying anything else before rendering.
pub fn srgb_color(color: &str, opacity: f64) -> String {
    let value = normalize_hex_color(color).unwrap_or_else(|| color.to_ascii_uppercase());
    if opacity >= 1.0 {
        format!(r#"<a:srgbClr val="{}"/>"#, value)
    } else {
        format!(
            r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
            value,
            fraction_to_percentage(opacity)
        )
    }
}

pub fn solid_fill(color: &str, opacity: f64) -> String {
    format!("<a:solidFill>{}</a:solidFill>", srgb_color(color, opacity))
}

/// `a:xfrm` for a shape; connectors pass flip flags separately.
pub fn xfrm(left: i64, top: i64, width: i64, height: i64) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        left, top, width, height
    )
}
