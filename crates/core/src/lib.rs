//! Core domain types for presentation export: the typed slide model, the
//! content-tree mapping that builds it, and geometry and style resolution.

pub mod builder;
pub mod content;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod normalize;
pub mod records;
pub mod style;
pub mod types;

pub use builder::{BuildReport, ModelBuilder};
pub use error::{Error, Result};
pub use geometry::{Canvas, GeometryResolver};
pub use layout::{BuiltinLayouts, LayoutCatalog, LayoutSchema};
pub use normalize::{sanitize_filename, TextNormalizer};
pub use records::{PresentationRecord, PresentationStore, SlideRecord, ThemeRecord};
pub use style::StyleCascade;
pub use types::{ExportFormat, PresentationModel, ShapeModel, SlideModel, Theme};
