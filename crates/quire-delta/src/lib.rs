//! quire-delta: the canonical rich-text document model.
//!
//! This crate provides:
//! - `Delta`, `Op`, `Insert`, `Attributes` - the operation list and its JSON shape
//! - `Classifier` - rewrites hosted image embeds into image/video/file blot ops
//! - v1/v2 schema migration
//! - image and file URL extraction for indexing
//! - `HtmlImporter` - the seam to an external HTML-to-delta editing engine

pub mod classify;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod schema;
pub mod text;

pub use classify::{
    Classifier, GuessMime, IMAGE_EXTENSIONS, MediaKind, MimeResolver, VIDEO_EXTENSIONS,
};
pub use engine::{ClipboardEngine, HtmlImporter, LazyEngine};
pub use error::DeltaError;
pub use extract::{extract_files, extract_files_from_value, extract_images, extract_images_from_value};
pub use model::{Attributes, Delta, FileBlot, Insert, Mention, Op};
pub use schema::{SchemaVersion, migrate_value};
pub use text::delta_from_plain_text;
