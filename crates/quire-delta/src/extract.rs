//! Pull resource URLs out of a delta for indexing.

use serde_json::Value;

use crate::error::DeltaError;
use crate::model::{Delta, Insert};

/// Image URLs in document order. Empty URLs are skipped.
pub fn extract_images(delta: &Delta) -> Vec<&str> {
    delta
        .iter()
        .filter_map(|op| match &op.insert {
            Insert::Image(url) => Some(url.as_str()),
            _ => None,
        })
        .filter(|url| !url.is_empty())
        .collect()
}

/// File blot hrefs in document order. Empty hrefs are skipped.
pub fn extract_files(delta: &Delta) -> Vec<&str> {
    delta
        .iter()
        .filter_map(|op| match &op.insert {
            Insert::FileBlot(blot) => Some(blot.href.as_str()),
            _ => None,
        })
        .filter(|href| !href.is_empty())
        .collect()
}

pub fn extract_images_from_value(value: Value) -> Result<Vec<String>, DeltaError> {
    let delta = Delta::from_value(value)?;
    Ok(extract_images(&delta).into_iter().map(str::to_owned).collect())
}

pub fn extract_files_from_value(value: Value) -> Result<Vec<String>, DeltaError> {
    let delta = Delta::from_value(value)?;
    Ok(extract_files(&delta).into_iter().map(str::to_owned).collect())
}
