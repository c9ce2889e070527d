// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config source fake for testing without a real store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jsonapi_core::{ConfigError, ConfigSource};

/// In-memory implementation of [`ConfigSource`] for testing.
///
/// Tracks load calls and can be told to fail.
///
/// # Example
///
/// ```
/// use jsonapi_core::{EncoderConfig, KeyTransform};
/// use jsonapi_dry_tests::InMemoryConfigSource;
///
/// let source = InMemoryConfigSource::new();
/// source.insert("posts", br#"{"key_transform": "dash"}"#);
///
/// let config = EncoderConfig::load(&source, "posts").unwrap();
/// assert_eq!(config.key_transform, KeyTransform::Dash);
/// assert_eq!(source.load_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigSource {
    inner: Arc<Mutex<InMemoryConfigSourceInner>>,
}

#[derive(Default)]
struct InMemoryConfigSourceInner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    fail_on_load: bool,
}

impl InMemoryConfigSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `key`.
    pub fn insert(&self, key: &str, bytes: &[u8]) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.data.insert(key.to_owned(), bytes.to_vec());
    }

    /// Configure the source to fail on load.
    pub fn set_fail_on_load(&self, fail: bool) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.fail_on_load = fail;
    }

    /// Number of `load_raw` calls so far.
    pub fn load_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).load_count
    }
}

impl ConfigSource for InMemoryConfigSource {
    fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.load_count += 1;
        if inner.fail_on_load {
            return Err(ConfigError::Source("simulated load failure".into()));
        }
        Ok(inner.data.get(key).cloned())
    }
}
