//! Shape tree elements: `p:sp`, `p:pic` and `p:cxnSp`.

use crate::text::{text_body, Anchor};
use crate::xml::{escape, solid_fill, srgb_color, xfrm};
use slidepack_core::geometry::{
    degrees_to_angle, fit_picture, fraction_to_percentage, px_to_emu, Bounds, Corners,
};
use slidepack_core::style::StyleCascade;
use slidepack_core::types::{
    AutoShape, AutoShapeKind, Connector, ConnectorKind, Fill, ObjectFit, PictureBox, Shadow,
    ShapeMask, Stroke, TextBox,
};

/// How a picture's bytes are referenced from its slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlipRef {
    /// Embedded media part.
    Embed(String),
    /// External link.
    Link(String),
}

fn preset_name(kind: AutoShapeKind) -> &'static str {
    match kind {
        AutoShapeKind::Rectangle => "rect",
        AutoShapeKind::RoundedRectangle => "roundRect",
        AutoShapeKind::Ellipse => "ellipse",
        AutoShapeKind::Triangle => "triangle",
        AutoShapeKind::Diamond => "diamond",
        AutoShapeKind::RightArrow => "rightArrow",
        AutoShapeKind::Chevron => "chevron",
        AutoShapeKind::Hexagon => "hexagon",
        AutoShapeKind::Star => "star5",
    }
}

fn connector_preset(kind: ConnectorKind) -> &'static str {
    match kind {
        ConnectorKind::Straight => "line",
        ConnectorKind::Elbow => "bentConnector3",
        ConnectorKind::Curved => "curvedConnector3",
    }
}

fn non_visual(id: u32, name: &str) -> String {
    format!(r#"<p:cNvPr id="{}" name="{} {}"/>"#, id, name, id)
}

fn fill_xml(fill: Option<&Fill>) -> String {
    match fill {
        Some(fill) => solid_fill(&fill.color, fill.opacity),
        None => "<a:noFill/>".to_string(),
    }
}

fn line_xml(stroke: Option<&Stroke>) -> String {
    match stroke {
        Some(stroke) if stroke.thickness > 0.0 => format!(
            r#"<a:ln w="{}">{}</a:ln>"#,
            px_to_emu(stroke.thickness),
            solid_fill(&stroke.color, stroke.opacity)
        ),
        _ => "<a:ln><a:noFill/></a:ln>".to_string(),
    }
}

fn shadow_xml(shadow: &Shadow) -> String {
    format!(
        r#"<a:effectLst><a:outerShdw blurRad="{}" dist="{}" dir="{}" algn="ctr" rotWithShape="0">{}</a:outerShdw></a:effectLst>"#,
        px_to_emu(shadow.radius.max(0.0)),
        px_to_emu(shadow.offset.max(0.0)),
        degrees_to_angle(shadow.angle),
        srgb_color(&shadow.color, shadow.opacity)
    )
}

/// Corner rounding as the `adj` guide of `roundRect`, capped at half the
/// shorter side.
fn corner_adjust(radius_px: f64, bounds: &Bounds) -> i64 {
    let shorter = bounds.width.min(bounds.height);
    if shorter <= 0 {
        return 0;
    }
    let adj = (px_to_emu(radius_px.max(0.0)) as f64 / shorter as f64 * 100_000.0).round() as i64;
    adj.min(50_000)
}

pub fn text_box(id: u32, bounds: Bounds, shape: &TextBox, cascade: &StyleCascade) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(&non_visual(id, "TextBox"));
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

    xml.push_str("<p:spPr>");
    xml.push_str(&xfrm(bounds.left, bounds.top, bounds.width, bounds.height));
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str(&fill_xml(shape.frame.fill.as_ref()));
    xml.push_str("</p:spPr>");

    xml.push_str(&text_body(cascade, &shape.frame, Anchor::Top, true));
    xml.push_str("</p:sp>");
    xml
}

pub fn auto_shape(id: u32, bounds: Bounds, shape: &AutoShape, cascade: &StyleCascade) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(&non_visual(id, "AutoShape"));
    xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");

    xml.push_str("<p:spPr>");
    xml.push_str(&xfrm(bounds.left, bounds.top, bounds.width, bounds.height));
    xml.push_str(&format!(r#"<a:prstGeom prst="{}">"#, preset_name(shape.kind)));
    match (shape.kind, shape.border_radius) {
        (AutoShapeKind::RoundedRectangle, Some(radius)) => xml.push_str(&format!(
            r#"<a:avLst><a:gd name="adj" fmla="val {}"/></a:avLst>"#,
            corner_adjust(radius, &bounds)
        )),
        _ => xml.push_str("<a:avLst/>"),
    }
    xml.push_str("</a:prstGeom>");
    xml.push_str(&fill_xml(shape.frame.fill.as_ref()));
    xml.push_str(&line_xml(shape.stroke.as_ref()));
    if let Some(shadow) = &shape.shadow {
        xml.push_str(&shadow_xml(shadow));
    }
    xml.push_str("</p:spPr>");

    xml.push_str(&text_body(cascade, &shape.frame, Anchor::Middle, false));
    xml.push_str("</p:sp>");
    xml
}

/// `p:pic`. `image_size` enables contain/cover fitting; without it the
/// picture is stretched over its frame.
pub fn picture(
    id: u32,
    frame: Bounds,
    shape: &PictureBox,
    blip: &BlipRef,
    image_size: Option<(u32, u32)>,
) -> String {
    let fit_mode = shape
        .object_fit
        .unwrap_or(if shape.clip { ObjectFit::Cover } else { ObjectFit::Fill });
    let fit = match image_size {
        Some(size) => fit_picture(fit_mode, shape.focus.unwrap_or_default(), size, frame),
        None => fit_picture(ObjectFit::Fill, Default::default(), (0, 0), frame),
    };

    let mut xml = String::with_capacity(1024);
    xml.push_str("<p:pic><p:nvPicPr>");
    xml.push_str(&non_visual(id, "Picture"));
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);

    xml.push_str("<p:blipFill>");
    match blip {
        BlipRef::Embed(rid) => xml.push_str(&format!(r#"<a:blip r:embed="{}">"#, escape(rid))),
        BlipRef::Link(rid) => xml.push_str(&format!(r#"<a:blip r:link="{}">"#, escape(rid))),
    }
    if let Some(opacity) = shape.opacity.filter(|o| *o < 1.0) {
        xml.push_str(&format!(
            r#"<a:alphaModFix amt="{}"/>"#,
            fraction_to_percentage(opacity)
        ));
    }
    if shape.invert {
        xml.push_str(r#"<a:duotone><a:srgbClr val="FFFFFF"/><a:srgbClr val="000000"/></a:duotone>"#);
    }
    xml.push_str("</a:blip>");
    if !fit.crop.is_empty() {
        xml.push_str(&format!(
            r#"<a:srcRect l="{}" t="{}" r="{}" b="{}"/>"#,
            fit.crop.left, fit.crop.top, fit.crop.right, fit.crop.bottom
        ));
    }
    xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");

    let geometry = match shape.mask.unwrap_or_default() {
        ShapeMask::Rectangle => "rect",
        ShapeMask::Circle => "ellipse",
    };
    xml.push_str("<p:spPr>");
    xml.push_str(&xfrm(
        fit.bounds.left,
        fit.bounds.top,
        fit.bounds.width,
        fit.bounds.height,
    ));
    xml.push_str(&format!(r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#, geometry));
    xml.push_str("</p:spPr></p:pic>");
    xml
}

/// `p:cxnSp` drawn from the first corner to the second.
pub fn connector(id: u32, corners: Corners, shape: &Connector) -> String {
    let bounds = corners.to_bounds();
    let mut flips = String::new();
    if corners.x2 < corners.x1 {
        flips.push_str(r#" flipH="1""#);
    }
    if corners.y2 < corners.y1 {
        flips.push_str(r#" flipV="1""#);
    }

    let mut xml = String::with_capacity(512);
    xml.push_str("<p:cxnSp><p:nvCxnSpPr>");
    xml.push_str(&non_visual(id, "Connector"));
    xml.push_str("<p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>");
    xml.push_str("<p:spPr>");
    xml.push_str(&format!(
        r#"<a:xfrm{}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        flips, bounds.left, bounds.top, bounds.width, bounds.height
    ));
    xml.push_str(&format!(
        r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
        connector_preset(shape.kind)
    ));
    xml.push_str(&format!(
        r#"<a:ln w="{}">{}</a:ln>"#,
        px_to_emu(shape.thickness.max(0.0)),
        solid_fill(&shape.color, shape.opacity)
    ));
    xml.push_str("</p:spPr></p:cxnSp>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidepack_core::types::{FocusPoint, Paragraph, PictureSource, Position, TextFrame};

    fn bounds(width: i64, height: i64) -> Bounds {
        Bounds {
            left: 10,
            top: 20,
            width,
            height,
        }
    }

    #[test]
    fn test_text_box_markup() {
        let shape = TextBox {
            position: Position::default(),
            frame: TextFrame::new(vec![Paragraph::text("Hi")]),
        };
        let xml = text_box(2, bounds(100, 50), &shape, &StyleCascade::default());
        assert!(xml.starts_with("<p:sp>"));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="TextBox 2"/>"#));
        assert!(xml.contains(r#"txBox="1""#));
        assert!(xml.contains(r#"<a:off x="10" y="20"/><a:ext cx="100" cy="50"/>"#));
        assert!(xml.contains("<a:noFill/>"));
    }

    #[test]
    fn test_rounded_rectangle_adjust_capped() {
        let shape = AutoShape {
            kind: AutoShapeKind::RoundedRectangle,
            position: Position::default(),
            frame: TextFrame::default(),
            stroke: Some(Stroke {
                color: "00FF00".into(),
                thickness: 2.0,
                opacity: 1.0,
            }),
            shadow: Some(Shadow {
                radius: 12.0,
                offset: 4.0,
                color: "000000".into(),
                opacity: 0.25,
                angle: 90.0,
            }),
            border_radius: Some(12.0),
        };
        // 12px = 114300 EMU over a 1000000 EMU short side
        let xml = auto_shape(3, bounds(2_000_000, 1_000_000), &shape, &StyleCascade::default());
        assert!(xml.contains(r#"prst="roundRect""#));
        assert!(xml.contains(r#"fmla="val 11430""#));
        assert!(xml.contains(r#"<a:ln w="19050">"#));
        assert!(xml.contains(r#"dir="5400000""#));
        assert!(xml.contains(r#"<a:alpha val="25000"/>"#));
        assert!(xml.contains(r#"anchor="ctr""#));

        assert_eq!(corner_adjust(10_000.0, &bounds(100, 100)), 50_000);
        assert_eq!(corner_adjust(5.0, &bounds(0, 100)), 0);
    }

    #[test]
    fn test_picture_cover_and_effects() {
        let mut shape = PictureBox::new(
            Position::default(),
            PictureSource::Local("/tmp/x.png".into()),
        );
        shape.clip = true;
        shape.opacity = Some(0.5);
        shape.invert = true;
        shape.mask = Some(ShapeMask::Circle);
        shape.focus = Some(FocusPoint::default());
        let xml = picture(
            4,
            bounds(1000, 1000),
            &shape,
            &BlipRef::Embed("rId2".into()),
            Some((200, 100)),
        );
        assert!(xml.contains(r#"<a:blip r:embed="rId2">"#));
        assert!(xml.contains(r#"<a:alphaModFix amt="50000"/>"#));
        assert!(xml.contains("<a:duotone>"));
        assert!(xml.contains(r#"<a:srcRect l="25000" t="0" r="25000" b="0"/>"#));
        assert!(xml.contains(r#"prst="ellipse""#));
    }

    #[test]
    fn test_linked_picture_without_size_stretches() {
        let shape = PictureBox::new(
            Position::default(),
            PictureSource::Network("https://x.test/a.png".into()),
        );
        let xml = picture(5, bounds(300, 200), &shape, &BlipRef::Link("rId3".into()), None);
        assert!(xml.contains(r#"<a:blip r:link="rId3">"#));
        assert!(!xml.contains("srcRect"));
        assert!(xml.contains(r#"<a:ext cx="300" cy="200"/>"#));
    }

    #[test]
    fn test_picture_contain_centers() {
        let mut shape = PictureBox::new(Position::default(), PictureSource::Local("a.png".into()));
        shape.object_fit = Some(ObjectFit::Contain);
        let xml = picture(6, bounds(2000, 1000), &shape, &BlipRef::Embed("rId1".into()), Some((100, 100)));
        assert!(xml.contains(r#"<a:off x="510" y="20"/><a:ext cx="1000" cy="1000"/>"#));
    }

    #[test]
    fn test_connector_kinds() {
        let corners = Corners {
            x1: 0,
            y1: 0,
            x2: 100,
            y2: 50,
        };
        let mut shape = Connector {
            kind: ConnectorKind::Elbow,
            position: Position::default(),
            thickness: 2.0,
            color: "333333".into(),
            opacity: 1.0,
        };
        let xml = connector(7, corners, &shape);
        assert!(xml.starts_with("<p:cxnSp>"));
        assert!(xml.contains(r#"prst="bentConnector3""#));
        assert!(!xml.contains("flipH"));

        shape.kind = ConnectorKind::Straight;
        let reversed = Corners {
            x1: 100,
            y1: 0,
            x2: 0,
            y2: 50,
        };
        let xml = connector(8, reversed, &shape);
        assert!(xml.contains(r#"prst="line""#));
        assert!(xml.contains(r#"<a:xfrm flipH="1">"#));
    }
}
