//! Inline markup for a single text run.

use std::str::FromStr;

use quire_delta::Attributes;

use crate::error::RenderOptionError;
use crate::escape::escape_html;

/// Attribute name used on link anchors.
///
/// Stored HTML has always been written with the misspelled `herf`, and
/// downstream consumers read it back that way. `Href` produces valid anchors
/// but is a format change for those consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkAttribute {
    #[default]
    Herf,
    Href,
}

impl LinkAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkAttribute::Herf => "herf",
            LinkAttribute::Href => "href",
        }
    }
}

impl FromStr for LinkAttribute {
    type Err = RenderOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "herf" => Ok(LinkAttribute::Herf),
            "href" => Ok(LinkAttribute::Href),
            other => Err(RenderOptionError::LinkAttribute(other.to_owned())),
        }
    }
}

/// Render a text run with the legacy `herf` link attribute.
pub fn render_text_run(text: &str, attributes: Option<&Attributes>) -> String {
    render_text_run_with(text, attributes, LinkAttribute::default())
}

/// Render a text run and its attributes as an HTML fragment.
///
/// Nesting, inside out: strike, then bold (carrying the color) or a color
/// span, then the link anchor. Runs without attributes have every newline
/// turned into `<br>`; attributed runs only the first one.
pub fn render_text_run_with(
    text: &str,
    attributes: Option<&Attributes>,
    link_attribute: LinkAttribute,
) -> String {
    let mut html = escape_html(text);
    let Some(attributes) = attributes else {
        return html.replace('\n', "<br>");
    };

    if attributes.is_strike() {
        html = format!("<s>{html}</s>");
    }

    html = match (attributes.is_bold(), attributes.color()) {
        (true, Some(color)) => format!(
            "<strong style=\"{}\">{}</strong>",
            color_style(color),
            first_break(&html)
        ),
        (true, None) => format!("<strong>{}</strong>", first_break(&html)),
        (false, Some(color)) => format!(
            "<span style=\"{}\">{}</span>",
            color_style(color),
            first_break(&html)
        ),
        (false, None) => first_break(&html),
    };

    if let Some(link) = attributes.link() {
        html = format!("<a {}=\"{}\">{}</a>", link_attribute.as_str(), link, html);
    }
    html
}

// TODO: convert every newline here too once stored documents no longer
// depend on the single-break output.
fn first_break(html: &str) -> String {
    html.replacen('\n', "<br>", 1)
}

/// `#RRGGBB` to `color: rgb(R, G, B);`
fn color_style(color: &str) -> String {
    format!(
        "color: rgb({}, {}, {});",
        channel(color, 1..3),
        channel(color, 3..5),
        channel(color, 5..7)
    )
}

fn channel(color: &str, range: std::ops::Range<usize>) -> u8 {
    match color
        .get(range)
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
    {
        Some(value) => value,
        None => {
            tracing::debug!(color, "invalid color channel, using 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> Attributes {
        Attributes::default()
    }

    #[test]
    fn test_plain_converts_every_newline() {
        assert_eq!(render_text_run("a\nb\nc", None), "a<br>b<br>c");
    }

    #[test]
    fn test_attributed_converts_first_newline_only() {
        assert_eq!(render_text_run("a\nb\nc", Some(&attrs())), "a<br>b\nc");
    }

    #[test]
    fn test_escapes_before_markup() {
        let bold = Attributes {
            bold: Some(true),
            ..attrs()
        };
        assert_eq!(
            render_text_run("<b>&\"'", Some(&bold)),
            "<strong>&lt;b&gt;&amp;&quot;&#39;</strong>"
        );
    }

    #[test]
    fn test_bold_with_color() {
        let a = Attributes {
            bold: Some(true),
            color: Some("#ff0000".into()),
            ..attrs()
        };
        assert_eq!(
            render_text_run("hi\n", Some(&a)),
            "<strong style=\"color: rgb(255, 0, 0);\">hi<br></strong>"
        );
    }

    #[test]
    fn test_color_span() {
        let a = Attributes {
            color: Some("#0a10ff".into()),
            ..attrs()
        };
        assert_eq!(
            render_text_run("x", Some(&a)),
            "<span style=\"color: rgb(10, 16, 255);\">x</span>"
        );
    }

    #[test]
    fn test_empty_color_is_ignored() {
        let a = Attributes {
            color: Some(String::new()),
            ..attrs()
        };
        assert_eq!(render_text_run("x", Some(&a)), "x");
    }

    #[test]
    fn test_invalid_color_channels_are_zero() {
        let a = Attributes {
            color: Some("#zz80".into()),
            ..attrs()
        };
        assert_eq!(
            render_text_run("x", Some(&a)),
            "<span style=\"color: rgb(0, 128, 0);\">x</span>"
        );
    }

    #[test]
    fn test_short_color_is_not_expanded() {
        // Channels are read at fixed offsets; `#f00` is not shorthand for red.
        let a = Attributes {
            color: Some("#f00".into()),
            ..attrs()
        };
        assert_eq!(
            render_text_run("x", Some(&a)),
            "<span style=\"color: rgb(240, 0, 0);\">x</span>"
        );
    }

    #[test]
    fn test_full_nesting_order() {
        let a = Attributes {
            bold: Some(true),
            strike: Some(true),
            color: Some("#000000".into()),
            link: Some("https://example.com".into()),
            ..attrs()
        };
        assert_eq!(
            render_text_run("go\n", Some(&a)),
            "<a herf=\"https://example.com\"><strong style=\"color: rgb(0, 0, 0);\"><s>go<br></s></strong></a>"
        );
    }

    #[test]
    fn test_href_opt_in() {
        let a = Attributes {
            link: Some("https://example.com".into()),
            ..attrs()
        };
        assert_eq!(
            render_text_run_with("go", Some(&a), LinkAttribute::Href),
            "<a href=\"https://example.com\">go</a>"
        );
    }

    #[test]
    fn test_link_attribute_from_str() {
        assert_eq!("href".parse::<LinkAttribute>().unwrap(), LinkAttribute::Href);
        assert_eq!("herf".parse::<LinkAttribute>().unwrap(), LinkAttribute::Herf);
        assert!("src".parse::<LinkAttribute>().is_err());
    }
}
