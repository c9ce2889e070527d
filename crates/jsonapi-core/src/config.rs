// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared encoder configuration and the storage port it is loaded from.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transform::KeyTransform;

/// Defaults shared by every descriptor of one serializer.
///
/// Builders seed their transform and cache flag from this via `configure`;
/// explicit builder calls made afterwards take precedence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Transform for output keys and resource type tokens.
    pub key_transform: KeyTransform,
    /// Whether relationships are marked cacheable for the document assembler.
    pub cache: bool,
}

impl EncoderConfig {
    /// Parses configuration from JSON, e.g. `{"key_transform": "dash"}`.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Loads configuration for `key` from `source`. A missing or empty entry
    /// yields the defaults.
    pub fn load<S>(source: &S, key: &str) -> Result<Self, ConfigError>
    where
        S: ConfigSource + ?Sized,
    {
        match source.load_raw(key)? {
            Some(bytes) if !bytes.is_empty() => Self::from_json(&bytes),
            _ => Ok(Self::default()),
        }
    }
}

/// Storage port for raw configuration blobs keyed by logical name.
pub trait ConfigSource {
    /// Raw bytes for `key`, or `None` when nothing is stored.
    fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError>;
}
