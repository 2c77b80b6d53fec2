//! Media classification for hosted image embeds.
//!
//! Pasted HTML turns every `<img>` into an `image` embed, whatever the URL
//! actually points at. The classifier looks at the URL's path extension and
//! rewrites the embed into an image, a video, or a downloadable file blot.

use std::collections::HashSet;

use percent_encoding::percent_encode_byte;
use url::Url;

use crate::model::{Attributes, Delta, FileBlot, Insert, Op};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "rmvb", "avi", "mov", "rm", "wmv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    File,
}

/// File name to MIME type lookup. Best effort; `None` means unknown.
pub trait MimeResolver {
    fn mime_type(&self, file_name: &str) -> Option<String>;
}

/// Extension-table lookup backed by `mime_guess`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuessMime;

impl MimeResolver for GuessMime {
    fn mime_type(&self, file_name: &str) -> Option<String> {
        if file_name.is_empty() {
            return None;
        }
        mime_guess::from_path(file_name)
            .first_raw()
            .map(str::to_owned)
    }
}

impl<F: Fn(&str) -> Option<String>> MimeResolver for F {
    fn mime_type(&self, file_name: &str) -> Option<String> {
        self(file_name)
    }
}

#[derive(Debug, Clone)]
pub struct Classifier<M = GuessMime> {
    image_extensions: HashSet<String>,
    video_extensions: HashSet<String>,
    mime: M,
}

impl Default for Classifier<GuessMime> {
    fn default() -> Self {
        Self {
            image_extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            video_extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            mime: GuessMime,
        }
    }
}

impl Classifier<GuessMime> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: MimeResolver> Classifier<M> {
    pub fn with_mime_resolver<N: MimeResolver>(self, mime: N) -> Classifier<N> {
        Classifier {
            image_extensions: self.image_extensions,
            video_extensions: self.video_extensions,
            mime,
        }
    }

    /// Replace the extensions treated as images. Matching is case-sensitive.
    pub fn with_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the extensions treated as videos. Matching is case-sensitive.
    pub fn with_video_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.video_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Kind of resource a URL path points at, judged by its last `.` segment.
    pub fn media_kind(&self, path: &str) -> MediaKind {
        let extension = path.rsplit('.').next().unwrap_or_default();
        if self.image_extensions.contains(extension) {
            MediaKind::Image
        } else if self.video_extensions.contains(extension) {
            MediaKind::Video
        } else {
            MediaKind::File
        }
    }

    /// Classify one op, returning the (possibly rewritten) copy.
    ///
    /// Only `image` embeds with an `http`/`https` URL are considered. Anything
    /// else, including URLs that fail to parse, comes back unchanged.
    pub fn classify(&self, op: &Op) -> Op {
        let Insert::Image(src) = &op.insert else {
            return op.clone();
        };
        if !src.starts_with("http") {
            return op.clone();
        }
        let url = match Url::parse(src) {
            Ok(url) => url,
            Err(err) => {
                tracing::debug!(%src, %err, "leaving unparseable image url unclassified");
                return op.clone();
            }
        };
        if !matches!(url.scheme(), "http" | "https") {
            return op.clone();
        }

        let path = raw_path(src);
        match self.media_kind(&path) {
            MediaKind::Image => op.clone(),
            MediaKind::Video => {
                tracing::debug!(%src, "classified as video");
                Op::video(src.clone())
            }
            MediaKind::File => {
                let file_name = path.rsplit('/').next().unwrap_or_default();
                let file_type = self.mime.mime_type(file_name);
                tracing::debug!(%src, file_name, ?file_type, "classified as file");
                Op {
                    insert: Insert::FileBlot(FileBlot {
                        href: src.clone(),
                        file_name: file_name.to_owned(),
                        file_size: None,
                        file_type,
                    }),
                    attributes: Some(Attributes {
                        size: Some(String::new()),
                        ..Default::default()
                    }),
                }
            }
        }
    }

    pub fn classify_delta(&self, delta: &Delta) -> Delta {
        delta.iter().map(|op| self.classify(op)).collect()
    }
}

/// The path of `src` as written, without normalization.
///
/// `Url::path` percent-encodes non-ASCII and resolves dot-segments, which
/// would garble stored file names. Only whitespace, quotes and a handful of
/// unsafe ASCII characters are escaped; backslashes count as slashes.
fn raw_path(src: &str) -> String {
    let rest = src.split_once("://").map_or(src, |(_, rest)| rest);
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let rest = &rest[..end];
    let Some(start) = rest.find(['/', '\\']) else {
        return "/".to_owned();
    };

    let mut path = String::with_capacity(rest.len() - start);
    for c in rest[start..].chars() {
        match c {
            '\\' => path.push('/'),
            '\t' | '\n' | '\r' | ' ' | '"' | '\'' | '<' | '>' | '^' | '`' | '{' | '|' | '}' => {
                path.push_str(percent_encode_byte(c as u8))
            }
            _ => path.push(c),
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_extensions_are_untouched() {
        let classifier = Classifier::new();
        for url in [
            "http://x/a.png",
            "https://cdn.example.com/p/a.jpg?w=300",
            "https://x/dir.v2/photo.jpeg",
        ] {
            let op = Op::image(url);
            assert_eq!(classifier.classify(&op), op, "{url}");
        }
    }

    #[test]
    fn test_video_extensions_become_video() {
        let classifier = Classifier::new();
        for ext in VIDEO_EXTENSIONS {
            let url = format!("https://x/clip.{ext}");
            assert_eq!(classifier.classify(&Op::image(&url)), Op::video(&url));
        }
    }

    #[test]
    fn test_other_extensions_become_file_blots() {
        let classifier = Classifier::new();
        let op = classifier.classify(&Op::image("https://x/docs/report.pdf?dl=1"));
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "insert": {"fileBlot": {
                    "href": "https://x/docs/report.pdf?dl=1",
                    "fileName": "report.pdf",
                    "fileSize": null,
                    "fileType": "application/pdf"
                }},
                "attributes": {"size": ""}
            })
        );
    }

    #[test]
    fn test_unknown_mime_is_none() {
        let classifier = Classifier::new();
        let op = classifier.classify(&Op::image("http://x/files/README"));
        match op.insert {
            Insert::FileBlot(blot) => {
                assert_eq!(blot.file_name, "README");
                assert_eq!(blot.file_type, None);
                assert_eq!(blot.file_size, None);
            }
            other => panic!("expected file blot, got {other:?}"),
        }
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let classifier = Classifier::new();
        let op = classifier.classify(&Op::image("http://x/a.PNG"));
        assert!(matches!(op.insert, Insert::FileBlot(_)));
    }

    #[test]
    fn test_non_http_and_non_image_pass_through() {
        let classifier = Classifier::new();
        for op in [
            Op::image("data:image/gif;base64,R0lGODlh"),
            Op::image("/relative/a.pdf"),
            Op::image("httpfoo"),
            Op::video("http://x/a.pdf"),
            Op::text("http://x/a.pdf"),
        ] {
            assert_eq!(classifier.classify(&op), op);
        }
    }

    #[test]
    fn test_non_ascii_file_name_is_kept_raw() {
        let classifier = Classifier::new();
        let op = classifier.classify(&Op::image("http://x/报告 1.pdf?v=2"));
        match op.insert {
            Insert::FileBlot(blot) => {
                assert_eq!(blot.href, "http://x/报告 1.pdf?v=2");
                assert_eq!(blot.file_name, "报告%201.pdf");
                assert_eq!(blot.file_type.as_deref(), Some("application/pdf"));
            }
            other => panic!("expected file blot, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_path_is_not_normalized() {
        assert_eq!(raw_path("http://x/a/../b%20c.pdf"), "/a/../b%20c.pdf");
        assert_eq!(raw_path("https://x.com/café.mov#t=1"), "/café.mov");
        assert_eq!(raw_path("http://x"), "/");
        assert_eq!(raw_path("http://x?q=/a.png"), "/");
        assert_eq!(raw_path("http://x/a\\b.zip"), "/a/b.zip");

        let classifier = Classifier::new();
        assert_eq!(
            classifier.classify(&Op::image("https://x.com/café.mov")),
            Op::video("https://x.com/café.mov")
        );
    }

    #[test]
    fn test_idempotent() {
        let classifier = Classifier::new();
        let delta = Delta::from(vec![
            Op::image("http://x/a.png"),
            Op::image("http://x/a.mov"),
            Op::image("http://x/a.zip"),
            Op::text("x"),
        ]);
        let once = classifier.classify_delta(&delta);
        assert_eq!(classifier.classify_delta(&once), once);
        assert_eq!(delta.ops[1], Op::image("http://x/a.mov"));
    }

    #[test]
    fn test_custom_sets_and_resolver() {
        let classifier = Classifier::new()
            .with_image_extensions(["gif"])
            .with_video_extensions(["webm"])
            .with_mime_resolver(|_: &str| Some("x/test".to_owned()));
        assert_eq!(classifier.media_kind("/a.gif"), MediaKind::Image);
        assert_eq!(classifier.media_kind("/a.webm"), MediaKind::Video);
        assert_eq!(classifier.media_kind("/a.png"), MediaKind::File);
        match classifier.classify(&Op::image("http://x/a.png")).insert {
            Insert::FileBlot(blot) => assert_eq!(blot.file_type.as_deref(), Some("x/test")),
            other => panic!("expected file blot, got {other:?}"),
        }
    }
}
