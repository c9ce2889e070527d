// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Media records used as polymorphic association targets.
//!
//! Type tokens derived from these are `video`, `image`, and `video_clip`.

use jsonapi_core::{EncodeError, Resource};
use serde_json::{json, Value};

/// A video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Video {
    /// Primary key.
    pub id: u64,
    /// Title.
    pub title: String,
}

/// An image. A `None` id models an unsaved record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// Primary key, absent until persisted.
    pub id: Option<u64>,
    /// Source URL.
    pub url: String,
}

/// A short video; exercises multi-word type derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoClip {
    /// Primary key.
    pub id: u64,
}

impl Video {
    /// Video with a generated title.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: format!("video {id}"),
        }
    }
}

impl Image {
    /// Persisted image.
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            url: format!("https://img.test/{id}.png"),
        }
    }

    /// Unsaved image without an id.
    pub fn unsaved() -> Self {
        Self {
            id: None,
            url: "https://img.test/draft.png".to_owned(),
        }
    }
}

impl Resource for Video {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            "title" => Ok(json!(self.title)),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }
}

impl Resource for Image {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            "url" => Ok(json!(self.url)),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }
}

impl Resource for VideoClip {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }
}
