//! Delta data model.
//!
//! A [`Delta`] is an ordered list of [`Op`]s. Each op inserts either a run of
//! text (optionally carrying inline [`Attributes`]) or a single embedded
//! object. The JSON wire shape follows the editor's format: text inserts are
//! bare strings, embeds are single-key objects (`{"image": url}`,
//! `{"fileBlot": {...}}`, ...).

use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DeltaError, json_kind};

/// Inline formatting attached to a text insert.
///
/// Unknown attributes are kept in `extra` so a delta survives a
/// deserialize/serialize pass unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    /// `#RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Set (to an empty string) on classified file blots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attributes {
    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_strike(&self) -> bool {
        self.strike.unwrap_or(false)
    }

    /// The color, if set to something non-empty.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref().filter(|c| !c.is_empty())
    }

    /// The link target. An empty link still counts as present.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

/// A classified generic downloadable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBlot {
    pub href: String,
    #[serde(default)]
    pub file_name: String,
    /// Never computed here; always serialized, usually as `null`.
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_type: Option<String>,
}

/// Reference to a tagged entity, e.g. a user mention.
///
/// The editor stores these as DOM dataset values, so every field is a string.
/// Numbers are accepted and stringified on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    #[serde(default, deserialize_with = "lenient_string")]
    pub index: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub denotation_char: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: String,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// What an [`Op`] inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert {
    /// v1 text run: `"insert": "hello"`
    Text(String),
    /// v2 text run: `"insert": {"text": "hello"}`
    BoxedText(String),
    Image(String),
    Video(String),
    FileBlot(FileBlot),
    Mention(Mention),
    /// Any other embed object, kept verbatim. This includes `{"image": null}`.
    Embed(Map<String, Value>),
}

impl Insert {
    /// Pick the variant from the keys present on an embed object.
    ///
    /// `text` wins over everything else, then `fileBlot`, `mention`, `image`
    /// and `video`.
    pub fn from_object(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        if let Some(Value::String(text)) = map.get("text") {
            return Ok(Insert::BoxedText(text.clone()));
        }
        if let Some(blot) = map.get("fileBlot") {
            return FileBlot::deserialize(blot).map(Insert::FileBlot);
        }
        if let Some(mention) = map.get("mention") {
            return Mention::deserialize(mention).map(Insert::Mention);
        }
        if let Some(Value::String(url)) = map.get("image") {
            return Ok(Insert::Image(url.clone()));
        }
        if let Some(Value::String(url)) = map.get("video") {
            return Ok(Insert::Video(url.clone()));
        }
        Ok(Insert::Embed(map))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Insert::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_embed(&self) -> bool {
        !matches!(self, Insert::Text(_))
    }
}

impl Serialize for Insert {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Insert::Text(text) => serializer.serialize_str(text),
            Insert::BoxedText(text) => single_entry(serializer, "text", text),
            Insert::Image(url) => single_entry(serializer, "image", url),
            Insert::Video(url) => single_entry(serializer, "video", url),
            Insert::FileBlot(blot) => single_entry(serializer, "fileBlot", blot),
            Insert::Mention(mention) => single_entry(serializer, "mention", mention),
            Insert::Embed(map) => map.serialize(serializer),
        }
    }
}

fn single_entry<S: Serializer, V: Serialize + ?Sized>(
    serializer: S,
    key: &str,
    value: &V,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl<'de> Deserialize<'de> for Insert {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(Insert::Text(text)),
            Value::Object(map) => Insert::from_object(map).map_err(de::Error::custom),
            other => Err(de::Error::custom(format_args!(
                "expected a string or an embed object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// One insert plus its optional attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Op {
    pub insert: Insert,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Op {
    pub fn new(insert: Insert) -> Self {
        Self {
            insert,
            attributes: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Insert::Text(text.into()))
    }

    pub fn styled(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes: Some(attributes),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::new(Insert::Image(url.into()))
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::new(Insert::Video(url.into()))
    }

    pub fn mention(mention: Mention) -> Self {
        Self::new(Insert::Mention(mention))
    }

    /// A text insert consisting of exactly one newline.
    pub fn is_newline(&self) -> bool {
        self.insert.as_text() == Some("\n")
    }
}

/// An ordered sequence of ops. Order is reading order.
///
/// Accepts `{"ops": [...]}`, a bare array, or `null` (empty) on the way in;
/// always serializes as a bare array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Delta {
    pub ops: Vec<Op>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a delta out of an already-decoded JSON value.
    ///
    /// Fails on the first op that does not have a valid `insert`, reporting
    /// its position.
    pub fn from_value(value: Value) -> Result<Self, DeltaError> {
        let items = match value {
            Value::Null => return Ok(Self::default()),
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("ops") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(DeltaError::NotASequence {
                        found: json_kind(&other),
                    });
                }
                None => return Err(DeltaError::NotASequence { found: "an object" }),
            },
            other => {
                return Err(DeltaError::NotASequence {
                    found: json_kind(&other),
                });
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|source| DeltaError::MalformedOp { index, source })
            })
            .collect()
    }

    /// The `{"ops": [...]}` layout.
    pub fn to_wrapped_value(&self) -> Result<Value, serde_json::Error> {
        let mut map = Map::new();
        map.insert("ops".to_owned(), serde_json::to_value(&self.ops)?);
        Ok(Value::Object(map))
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl FromStr for Delta {
    type Err = DeltaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl<'de> Deserialize<'de> for Delta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::from_value(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

impl From<Vec<Op>> for Delta {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops }
    }
}

impl FromIterator<Op> for Delta {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Delta {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
