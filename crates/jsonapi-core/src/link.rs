// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Link encoder: renders one named link into a relationship's `links` object.

use core::fmt;

use serde_json::{Map, Value};

use crate::attribute::ValueSource;
use crate::error::{ConfigError, EncodeError};
use crate::params::Params;
use crate::resource::Resource;

/// One named link, e.g. `self` or `related`.
pub struct LinkDescriptor<R> {
    key: String,
    source: ValueSource<R>,
}

impl<R> fmt::Debug for LinkDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkDescriptor")
            .field("key", &self.key)
            .field("source", &self.source)
            .finish()
    }
}

impl<R: Resource> LinkDescriptor<R> {
    /// Validates a link. Empty names and empty field names are malformed.
    pub fn new(key: impl Into<String>, source: ValueSource<R>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::MalformedLink {
                link: key,
                reason: "empty link name",
            });
        }
        if source.is_blank_field() {
            return Err(ConfigError::MalformedLink {
                link: key,
                reason: "empty field name",
            });
        }
        Ok(Self { key, source })
    }

    /// Link name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes `output[key] = value`.
    pub fn encode(
        &self,
        record: &R,
        params: &Params,
        output: &mut Map<String, Value>,
    ) -> Result<(), EncodeError> {
        let value = self.source.resolve(record, params)?;
        output.insert(self.key.clone(), value);
        Ok(())
    }
}
