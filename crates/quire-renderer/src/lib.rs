//! quire renderer
//!
//! Read views over a canonical [`quire_delta::Delta`]: an HTML fragment for
//! display and export, and plain-text projections for search, previews and
//! notifications.
//!
//! Rendering walks the delta once and hands every op to a [`delta::DeltaOutput`];
//! each projection is one output implementation.

pub mod delta;
pub mod error;
pub mod escape;

pub use delta::{
    DeltaOutput, HtmlDeltaOutput, HtmlOptions, HtmlVariant, LinkAttribute, PlainTextOutput,
    PureTextOutput, process_delta, pure_text_lenient, render_delta_html, render_delta_pure_text,
    render_delta_text, render_text_run, render_text_run_with,
};
pub use error::RenderOptionError;
