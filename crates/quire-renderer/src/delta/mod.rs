mod attributes;
mod html_output;
mod processor;
mod text_output;


pub use attributes::{LinkAttribute, render_text_run, render_text_run_with};
pub use html_output::{HtmlDeltaOutput, HtmlOptions, HtmlVariant, render_delta_html};
pub use processor::process_delta;
pub use text_output::{
    PlainTextOutput, PureTextOutput, pure_text_lenient, render_delta_pure_text,
    render_delta_text,
};

use quire_delta::{Attributes, Insert, Op};

/// A projection target for a delta walk.
pub trait DeltaOutput {
    type Error;

    /// Whether this output wants to see `op` at all.
    fn accepts(&self, _op: &Op) -> bool {
        true
    }

    fn write_text(&mut self, text: &str, attributes: Option<&Attributes>)
    -> Result<(), Self::Error>;

    /// Write any non-text insert.
    fn write_embed(&mut self, insert: &Insert) -> Result<(), Self::Error>;
}
