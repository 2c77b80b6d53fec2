//! Plain-text projections, for search indexing, previews and notifications.
//! Both are lossy and one-way.

use std::fmt::Write;

use quire_delta::{Attributes, Delta, Insert, Op};
use serde_json::Value;

use super::{DeltaOutput, process_delta};

/// Text runs verbatim; media as `![url]!`, mentions as `@value`.
pub struct PlainTextOutput<W: Write> {
    writer: W,
}

impl<W: Write> PlainTextOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DeltaOutput for PlainTextOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str, _: Option<&Attributes>) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn write_embed(&mut self, insert: &Insert) -> Result<(), Self::Error> {
        match insert {
            Insert::Image(url) | Insert::Video(url) => write!(self.writer, "![{url}]!"),
            Insert::FileBlot(blot) => write!(self.writer, "![{}]!", blot.href),
            Insert::Mention(mention) => write!(self.writer, "@{}", mention.value),
            _ => Ok(()),
        }
    }
}

/// Text runs and bare mention values only. Lone newline runs are dropped.
pub struct PureTextOutput<W: Write> {
    writer: W,
}

impl<W: Write> PureTextOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DeltaOutput for PureTextOutput<W> {
    type Error = std::fmt::Error;

    fn accepts(&self, op: &Op) -> bool {
        !op.is_newline()
    }

    fn write_text(&mut self, text: &str, _: Option<&Attributes>) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn write_embed(&mut self, insert: &Insert) -> Result<(), Self::Error> {
        match insert {
            Insert::Mention(mention) => self.writer.write_str(&mention.value),
            _ => Ok(()),
        }
    }
}

pub fn render_delta_text(delta: &Delta) -> String {
    let mut output = PlainTextOutput::new(String::new());
    let _ = process_delta(delta, &mut output);
    output.into_inner()
}

pub fn render_delta_pure_text(delta: &Delta) -> String {
    let mut output = PureTextOutput::new(String::new());
    let _ = process_delta(delta, &mut output);
    output.into_inner()
}

/// Pure text straight from stored JSON.
///
/// Never fails: anything that does not parse as a delta is logged and
/// yields an empty string.
pub fn pure_text_lenient(value: Value) -> String {
    match Delta::from_value(value) {
        Ok(delta) => render_delta_pure_text(&delta),
        Err(err) => {
            tracing::warn!(%err, "could not read delta for pure text, returning empty");
            String::new()
        }
    }
}
