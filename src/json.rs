// JSON uploads. The image server also accepts an `application/json` array
// where each item is either a URL it should fetch itself or the image bytes
// encoded as base64.

use crate::error::UploadError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest JSON body the server accepts.
pub const MAX_JSON_PAYLOAD: usize = 1 << 20;

/// One entry of the JSON array, serialized as `{"url": ..}` or `{"base64": ..}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum JsonItem {
    #[serde(rename = "url")]
    Url(String),
    #[serde(rename = "base64")]
    Base64(String),
}

impl JsonItem {
    /// Read `path` and encode its bytes.
    pub fn from_file(path: &Path) -> Result<Self, UploadError> {
        let data = std::fs::read(path).map_err(|e| UploadError::read_file(path, e))?;
        Ok(JsonItem::Base64(STANDARD.encode(data)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonUploadRequest {
    pub url: String,
    pub items: Vec<JsonItem>,
}

impl JsonUploadRequest {
    /// Files first, in order, then remote URLs.
    pub fn from_sources<P: AsRef<Path>>(
        url: impl Into<String>,
        files: &[P],
        fetch: &[String],
    ) -> Result<Self, UploadError> {
        let mut items = files
            .iter()
            .map(|p| JsonItem::from_file(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        items.extend(fetch.iter().cloned().map(JsonItem::Url));
        Ok(JsonUploadRequest {
            url: url.into(),
            items,
        })
    }

    /// Size of the serialized body. Warns when the server would reject it.
    pub fn encoded_len(&self) -> Result<usize, UploadError> {
        let len = serde_json::to_vec(&self.items)?.len();
        if len > MAX_JSON_PAYLOAD {
            log::warn!(
                "JSON body is {} bytes, the server only accepts {}",
                len,
                MAX_JSON_PAYLOAD
            );
        }
        Ok(len)
    }
}
