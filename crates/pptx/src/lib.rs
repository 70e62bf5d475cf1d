//! PPTX (Office Open XML) backend: serializes a presentation model into a
//! package of XML parts and media, archives it, and reads archives back.
//!
//! A PPTX file is a ZIP archive of XML parts linked by relationship parts.

pub mod constants;
pub mod inspect;
pub mod media;
pub mod package;
pub mod rels;
pub mod shapes;
pub mod slide;
pub mod template;
pub mod text;
pub mod theme;
pub mod writer;
pub mod xml;

pub use inspect::{PackageInspector, PackageSummary, SlideSummary};
pub use package::{Package, Part};
pub use writer::PptxWriter;
