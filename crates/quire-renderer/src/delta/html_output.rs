use std::fmt::Write;

use quire_delta::{Attributes, Delta, Insert, Mention};

use super::attributes::{LinkAttribute, render_text_run_with};
use super::{DeltaOutput, process_delta};
use crate::escape::{encode_uri, escape_html};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HtmlVariant {
    /// Every embed kind, including file blots and mentions.
    #[default]
    Full,
    /// Images and videos only, with query strings stripped from their URLs.
    /// File blots and mentions are dropped.
    WithoutFileBlot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    pub variant: HtmlVariant,
    pub link_attribute: LinkAttribute,
    /// Close mention spans (with the mention's text inside) instead of
    /// leaving them open as stored documents expect.
    pub close_mentions: bool,
}

impl HtmlOptions {
    pub fn without_file_blot() -> Self {
        Self {
            variant: HtmlVariant::WithoutFileBlot,
            ..Default::default()
        }
    }
}

pub struct HtmlDeltaOutput<W: Write> {
    writer: W,
    options: HtmlOptions,
}

impl<W: Write> HtmlDeltaOutput<W> {
    pub fn new(writer: W, options: HtmlOptions) -> Self {
        Self { writer, options }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn source(&self, url: &str) -> String {
        match self.options.variant {
            HtmlVariant::Full => encode_uri(url),
            HtmlVariant::WithoutFileBlot => {
                encode_uri(url.split('?').next().unwrap_or_default())
            }
        }
    }

    fn write_mention(&mut self, mention: &Mention) -> std::fmt::Result {
        write!(
            self.writer,
            "<span class=\"mention\" data-index=\"{}\" data-denotation-char=\"{}\" data-id=\"{}\" data-value=\"{}\" data-key=\"{}\">",
            mention.index, mention.denotation_char, mention.id, mention.value, mention.key
        )?;
        if self.options.close_mentions {
            write!(
                self.writer,
                "<span class=\"ql-mention-denotation-char\">{}</span>{}</span>",
                escape_html(&mention.denotation_char),
                escape_html(&mention.value)
            )?;
        }
        Ok(())
    }
}

impl<W: Write> DeltaOutput for HtmlDeltaOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(
        &mut self,
        text: &str,
        attributes: Option<&Attributes>,
    ) -> Result<(), Self::Error> {
        let html = render_text_run_with(text, attributes, self.options.link_attribute);
        self.writer.write_str(&html)
    }

    fn write_embed(&mut self, insert: &Insert) -> Result<(), Self::Error> {
        match (self.options.variant, insert) {
            (_, Insert::Image(url)) => {
                let src = self.source(url);
                write!(self.writer, "<img src=\"{src}\">")
            }
            (_, Insert::Video(url)) => {
                let src = self.source(url);
                write!(self.writer, "<video src=\"{src}\">")
            }
            (HtmlVariant::Full, Insert::FileBlot(blot)) => {
                write!(self.writer, "<img src=\"{}\">", encode_uri(&blot.href))
            }
            (HtmlVariant::Full, Insert::Mention(mention)) => self.write_mention(mention),
            // Boxed v2 text and unknown embeds have no HTML form.
            _ => Ok(()),
        }
    }
}

/// Render a delta as an HTML fragment.
pub fn render_delta_html(delta: &Delta, options: HtmlOptions) -> String {
    let mut output = HtmlDeltaOutput::new(String::new(), options);
    // Writing into a String cannot fail.
    let _ = process_delta(delta, &mut output);
    output.into_inner()
}
