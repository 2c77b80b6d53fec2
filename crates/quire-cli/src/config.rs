//! Optional KDL configuration for the CLI.
//!
//! ```kdl
//! image-extensions "jpg" "jpeg" "png" "gif"
//! video-extensions "mp4" "webm"
//! link-attribute "href"
//! close-mentions true
//! ```

use std::path::Path;

use kdl::KdlDocument;
use miette::{IntoDiagnostic, Result, WrapErr};
use quire_delta::Classifier;
use quire_renderer::{HtmlOptions, LinkAttribute};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub image_extensions: Option<Vec<String>>,
    pub video_extensions: Option<Vec<String>>,
    pub link_attribute: Option<LinkAttribute>,
    pub close_mentions: Option<bool>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let doc: KdlDocument = text
            .parse()
            .into_diagnostic()
            .wrap_err("invalid KDL config")?;

        let link_attribute = match first_string(&doc, "link-attribute") {
            Some(value) => Some(value.parse::<LinkAttribute>()?),
            None => None,
        };
        let close_mentions = doc
            .get("close-mentions")
            .and_then(|node| node.entries().first())
            .and_then(|entry| entry.value().as_bool());

        Ok(Self {
            image_extensions: strings(&doc, "image-extensions"),
            video_extensions: strings(&doc, "video-extensions"),
            link_attribute,
            close_mentions,
        })
    }

    pub fn classifier(&self) -> Classifier {
        let mut classifier = Classifier::new();
        if let Some(extensions) = &self.image_extensions {
            classifier = classifier.with_image_extensions(extensions.iter().cloned());
        }
        if let Some(extensions) = &self.video_extensions {
            classifier = classifier.with_video_extensions(extensions.iter().cloned());
        }
        classifier
    }

    pub fn html_options(&self) -> HtmlOptions {
        HtmlOptions {
            link_attribute: self.link_attribute.unwrap_or_default(),
            close_mentions: self.close_mentions.unwrap_or(false),
            ..Default::default()
        }
    }
}

fn strings(doc: &KdlDocument, name: &str) -> Option<Vec<String>> {
    let node = doc.get(name)?;
    Some(
        node.entries()
            .iter()
            .filter(|entry| entry.name().is_none())
            .filter_map(|entry| entry.value().as_string())
            .map(str::to_owned)
            .collect(),
    )
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)?.entries().first()?.value().as_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_delta::MediaKind;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            image-extensions "jpg" "gif"
            video-extensions "webm"
            link-attribute "href"
            close-mentions true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.image_extensions,
            Some(vec!["jpg".to_owned(), "gif".to_owned()])
        );
        assert_eq!(config.video_extensions, Some(vec!["webm".to_owned()]));

        let options = config.html_options();
        assert_eq!(options.link_attribute, LinkAttribute::Href);
        assert!(options.close_mentions);

        let classifier = config.classifier();
        assert_eq!(classifier.media_kind("/a.gif"), MediaKind::Image);
        assert_eq!(classifier.media_kind("/a.webm"), MediaKind::Video);
        assert_eq!(classifier.media_kind("/a.mp4"), MediaKind::File);
    }

    #[test]
    fn test_empty_config_keeps_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.html_options(), HtmlOptions::default());
        assert_eq!(config.classifier().media_kind("/a.mov"), MediaKind::Video);
    }

    #[test]
    fn test_bad_link_attribute() {
        assert!(Config::parse("link-attribute \"src\"").is_err());
    }
}
