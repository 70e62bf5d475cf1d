//! Export orchestration for presentations: builds the slide model from a
//! stored record, packages it and promotes the finished file atomically.

pub mod config;
pub mod orchestrator;
pub mod store;

pub use config::{ExportConfig, PLACEHOLDER_FILE, PLACEHOLDER_PNG};
pub use orchestrator::{output_file_name, parse_format, ExportOutcome, Exporter};
pub use store::MemoryStore;
