//! Coordinate and unit resolution.
//!
//! Shapes are positioned in logical canvas pixels. The package format works
//! in English Metric Units (914400 EMU per inch, 9525 EMU per CSS pixel).
//! Shapes are never clipped to the canvas here.

use crate::types::{FocusPoint, ObjectFit, Position};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// EMU per logical pixel (96 DPI).
pub const EMU_PER_PX: f64 = 9525.0;

/// EMU per typographic point.
pub const EMU_PER_PT: f64 = 12700.0;

/// Largest coordinate DrawingML accepts (ST_CoordinateUnqualified).
pub const MAX_COORDINATE_EMU: i64 = 27_273_042_316_900;

/// Default canvas width in pixels (16:9).
pub const DEFAULT_CANVAS_WIDTH: f64 = 1280.0;

/// Default canvas height in pixels (16:9).
pub const DEFAULT_CANVAS_HEIGHT: f64 = 720.0;

/// Logical canvas size of every slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl Canvas {
    /// Slide size in EMU.
    pub fn size_emu(&self) -> (i64, i64) {
        (px_to_emu(self.width), px_to_emu(self.height))
    }
}

/// Left/top/width/height in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Bounds {
    /// Corner pair; `None` when the far corner does not fit in `i64`.
    pub fn corners(&self) -> Option<Corners> {
        Some(Corners {
            x1: self.left,
            y1: self.top,
            x2: self.left.checked_add(self.width)?,
            y2: self.top.checked_add(self.height)?,
        })
    }
}

/// Top-left and bottom-right corners in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Corners {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Corners {
    pub fn to_bounds(&self) -> Bounds {
        Bounds {
            left: self.x1.min(self.x2),
            top: self.y1.min(self.y2),
            width: (self.x2 - self.x1).abs(),
            height: (self.y2 - self.y1).abs(),
        }
    }
}

/// Source crop in 1/1000 of a percent per edge, as `a:srcRect` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crop {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Crop {
    pub fn is_empty(&self) -> bool {
        *self == Crop::default()
    }
}

/// Result of fitting a picture into its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureFit {
    pub bounds: Bounds,
    pub crop: Crop,
}

pub fn px_to_emu(px: f64) -> i64 {
    (px * EMU_PER_PX).round() as i64
}

/// Points to the hundredths used by `sz` and `spcPts`.
pub fn pt_to_centipoints(pt: f64) -> i64 {
    (pt * 100.0).round() as i64
}

/// Degrees to the 60000ths used by DrawingML angles.
pub fn degrees_to_angle(deg: f64) -> i64 {
    (deg.rem_euclid(360.0) * 60000.0).round() as i64
}

/// Fraction in [0, 1] to DrawingML's 100000ths, clamped.
pub fn fraction_to_percentage(value: f64) -> i64 {
    (value.clamp(0.0, 1.0) * 100000.0).round() as i64
}

/// Resolves logical positions into absolute EMU geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryResolver {
    canvas: Canvas,
}

impl GeometryResolver {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Left/top/width/height projection. Negative sizes clamp to zero.
    pub fn resolve(&self, position: &Position) -> Result<Bounds> {
        check_position(position)?;
        Ok(Bounds {
            left: px_to_emu(position.left),
            top: px_to_emu(position.top),
            width: px_to_emu(position.width.max(0.0)),
            height: px_to_emu(position.height.max(0.0)),
        })
    }

    /// Like [`resolve`](Self::resolve), but a height of zero or less means
    /// "let the reader auto-size" and becomes the full canvas height.
    pub fn resolve_text_box(&self, position: &Position) -> Result<Bounds> {
        let mut bounds = self.resolve(position)?;
        if position.height <= 0.0 {
            bounds.height = px_to_emu(self.canvas.height);
        }
        Ok(bounds)
    }

    /// Corner-pair projection used for connectors.
    pub fn resolve_corners(&self, position: &Position) -> Result<Corners> {
        let bounds = self.resolve(position)?;
        bounds
            .corners()
            .ok_or_else(|| Error::Geometry(format!("corners overflow for {:?}", bounds)))
    }

    /// Check a position without producing bounds.
    pub fn validate(&self, position: &Position) -> Result<()> {
        check_position(position)
    }
}

/// Every field must be finite, and every edge must stay within the
/// DrawingML coordinate range once converted to EMU.
fn check_position(position: &Position) -> Result<()> {
    let fields = [
        ("left", position.left),
        ("top", position.top),
        ("width", position.width),
        ("height", position.height),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(Error::Geometry(format!(
                "{} is not a finite number ({})",
                name, value
            )));
        }
    }

    let edges = [
        ("left", position.left),
        ("top", position.top),
        ("width", position.width),
        ("height", position.height),
        ("right edge", position.left + position.width.max(0.0)),
        ("bottom edge", position.top + position.height.max(0.0)),
    ];
    for (name, value) in edges {
        if (value * EMU_PER_PX).abs() > MAX_COORDINATE_EMU as f64 {
            return Err(Error::Geometry(format!(
                "{} is out of range ({} px)",
                name, value
            )));
        }
    }
    Ok(())
}

/// Fit an image of `image_size` pixels into `frame`.
///
/// `Fill` stretches. `Contain` shrinks the frame to the image aspect ratio,
/// centered in the original frame. `Cover` keeps the frame and crops the
/// source around `focus`.
pub fn fit_picture(
    fit: ObjectFit,
    focus: FocusPoint,
    image_size: (u32, u32),
    frame: Bounds,
) -> PictureFit {
    let (img_w, img_h) = (image_size.0 as f64, image_size.1 as f64);
    let stretched = PictureFit {
        bounds: frame,
        crop: Crop::default(),
    };
    if img_w <= 0.0 || img_h <= 0.0 || frame.width <= 0 || frame.height <= 0 {
        return stretched;
    }

    let image_ratio = img_w / img_h;
    let frame_ratio = frame.width as f64 / frame.height as f64;

    match fit {
        ObjectFit::Fill => stretched,
        ObjectFit::Contain => {
            let (width, height) = if image_ratio > frame_ratio {
                (frame.width as f64, frame.width as f64 / image_ratio)
            } else {
                (frame.height as f64 * image_ratio, frame.height as f64)
            };
            let (width, height) = (width.round() as i64, height.round() as i64);
            PictureFit {
                bounds: Bounds {
                    left: frame.left + (frame.width - width) / 2,
                    top: frame.top + (frame.height - height) / 2,
                    width,
                    height,
                },
                crop: Crop::default(),
            }
        }
        ObjectFit::Cover => {
            let fx = focus.x.clamp(0.0, 100.0) / 100.0;
            let fy = focus.y.clamp(0.0, 100.0) / 100.0;
            let mut crop = Crop::default();
            if image_ratio > frame_ratio {
                // too wide: trim left/right
                let excess = 1.0 - frame_ratio / image_ratio;
                crop.left = (excess * fx * 100000.0).round() as i64;
                crop.right = (excess * (1.0 - fx) * 100000.0).round() as i64;
            } else if image_ratio < frame_ratio {
                let excess = 1.0 - image_ratio / frame_ratio;
                crop.top = (excess * fy * 100000.0).round() as i64;
                crop.bottom = (excess * (1.0 - fy) * 100000.0).round() as i64;
            }
            PictureFit {
                bounds: frame,
                crop,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canvas_is_widescreen() {
        assert_eq!(Canvas::default().size_emu(), (12_192_000, 6_858_000));
    }

    #[test]
    fn test_resolve_projections() {
        let resolver = GeometryResolver::default();
        let pos = Position::new(100.0, 50.0, 200.0, 80.0);
        let bounds = resolver.resolve(&pos).unwrap();
        assert_eq!(bounds.left, 952_500);
        assert_eq!(bounds.top, 476_250);
        assert_eq!(bounds.width, 1_905_000);
        assert_eq!(bounds.height, 762_000);

        let corners = resolver.resolve_corners(&pos).unwrap();
        assert_eq!(corners.x2, 952_500 + 1_905_000);
        assert_eq!(corners.y2, 476_250 + 762_000);
        assert_eq!(corners.to_bounds(), bounds);
    }

    #[test]
    fn test_negative_size_clamps() {
        let resolver = GeometryResolver::default();
        let bounds = resolver
            .resolve(&Position::new(-10.0, 0.0, -5.0, -1.0))
            .unwrap();
        assert_eq!(bounds.left, -95_250);
        assert_eq!(bounds.width, 0);
        assert_eq!(bounds.height, 0);
    }

    #[test]
    fn test_text_box_default_height() {
        let resolver = GeometryResolver::default();
        let bounds = resolver
            .resolve_text_box(&Position::new(0.0, 0.0, 400.0, 0.0))
            .unwrap();
        assert_eq!(bounds.height, 6_858_000);

        let explicit = resolver
            .resolve_text_box(&Position::new(0.0, 0.0, 400.0, 40.0))
            .unwrap();
        assert_eq!(explicit.height, px_to_emu(40.0));
    }

    #[test]
    fn test_non_finite_is_geometry_error() {
        let resolver = GeometryResolver::default();
        let err = resolver
            .resolve(&Position::new(f64::NAN, 0.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));
        assert!(resolver
            .validate(&Position::new(0.0, 0.0, f64::INFINITY, 1.0))
            .is_err());
    }

    #[test]
    fn test_out_of_range_is_geometry_error() {
        let resolver = GeometryResolver::default();
        let huge = Position::new(0.0, 0.0, 1e300, 10.0);
        assert!(matches!(resolver.resolve(&huge), Err(Error::Geometry(_))));

        // each field fits on its own, the far corner does not
        let far = Position::new(2e9, 0.0, 2e9, 0.0);
        assert!(matches!(resolver.resolve_corners(&far), Err(Error::Geometry(_))));
        assert!(resolver.resolve_corners(&Position::new(1e15, 0.0, 1e15, 0.0)).is_err());
        assert!(resolver.validate(&Position::new(0.0, -1e12, 1.0, 1.0)).is_err());

        let edge = MAX_COORDINATE_EMU as f64 / EMU_PER_PX;
        assert!(resolver.validate(&Position::new(0.0, 0.0, edge - 1.0, 1.0)).is_ok());
    }

    #[test]
    fn test_corners_overflow_is_none() {
        let bounds = Bounds {
            left: i64::MAX,
            top: 0,
            width: 1,
            height: 0,
        };
        assert_eq!(bounds.corners(), None);
    }

    #[test]
    fn test_unit_helpers() {
        assert_eq!(pt_to_centipoints(18.0), 1800);
        assert_eq!(degrees_to_angle(90.0), 5_400_000);
        assert_eq!(degrees_to_angle(-90.0), 16_200_000);
        assert_eq!(fraction_to_percentage(0.5), 50_000);
        assert_eq!(fraction_to_percentage(2.0), 100_000);
    }

    #[test]
    fn test_fit_contain_letterboxes() {
        let frame = Bounds {
            left: 0,
            top: 0,
            width: 2000,
            height: 1000,
        };
        let fit = fit_picture(ObjectFit::Contain, FocusPoint::default(), (100, 100), frame);
        assert_eq!(fit.bounds.width, 1000);
        assert_eq!(fit.bounds.height, 1000);
        assert_eq!(fit.bounds.left, 500);
        assert!(fit.crop.is_empty());
    }

    #[test]
    fn test_fit_cover_crops_around_focus() {
        let frame = Bounds {
            left: 0,
            top: 0,
            width: 1000,
            height: 1000,
        };
        let centered = fit_picture(ObjectFit::Cover, FocusPoint::default(), (200, 100), frame);
        assert_eq!(centered.crop.left, 25_000);
        assert_eq!(centered.crop.right, 25_000);
        assert_eq!(centered.bounds, frame);

        let left_focus = fit_picture(
            ObjectFit::Cover,
            FocusPoint { x: 0.0, y: 50.0 },
            (200, 100),
            frame,
        );
        assert_eq!(left_focus.crop.left, 0);
        assert_eq!(left_focus.crop.right, 50_000);
    }

    #[test]
    fn test_fit_fill_and_degenerate() {
        let frame = Bounds {
            left: 1,
            top: 2,
            width: 30,
            height: 40,
        };
        let fill = fit_picture(ObjectFit::Fill, FocusPoint::default(), (10, 10), frame);
        assert_eq!(fill.bounds, frame);
        let empty = fit_picture(ObjectFit::Cover, FocusPoint::default(), (0, 10), frame);
        assert!(empty.crop.is_empty());
    }

    proptest! {
        #[test]
        fn prop_resolved_sizes_never_negative(
            left in -5000.0f64..5000.0,
            top in -5000.0f64..5000.0,
            width in -5000.0f64..5000.0,
            height in -5000.0f64..5000.0,
        ) {
            let resolver = GeometryResolver::default();
            let pos = Position::new(left, top, width, height);
            let bounds = resolver.resolve(&pos).unwrap();
            prop_assert!(bounds.width >= 0);
            prop_assert!(bounds.height >= 0);
            let text = resolver.resolve_text_box(&pos).unwrap();
            prop_assert!(text.height >= 0);
        }

        #[test]
        fn prop_contain_stays_inside_frame(
            w in 1u32..4000,
            h in 1u32..4000,
            fw in 1i64..10_000_000,
            fh in 1i64..10_000_000,
        ) {
            let frame = Bounds { left: 0, top: 0, width: fw, height: fh };
            let fit = fit_picture(ObjectFit::Contain, FocusPoint::default(), (w, h), frame);
            prop_assert!(fit.bounds.width <= fw && fit.bounds.height <= fh);
            prop_assert!(fit.bounds.left >= 0 && fit.bounds.top >= 0);
        }
    }
}
