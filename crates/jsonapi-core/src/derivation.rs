// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resource type derivation for polymorphic relationships.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::resource::{Resource, TypeTag};
use crate::transform::{demodulize, underscore, KeyTransform};

/// Derives a resource type token from a concrete type name.
///
/// Module qualification is stripped, the remainder is put in lower snake case,
/// then `transform` is applied: `app::media::VideoClip` with
/// [`KeyTransform::Dash`] yields `video-clip`.
pub fn derive_type(class_name: &str, transform: KeyTransform) -> String {
    transform.apply(&underscore(demodulize(class_name)))
}

/// Per-call cache of derived type tokens keyed by concrete type.
///
/// Scoped to a single relationship encode; a fresh memo is created for every
/// call and dropped when it returns.
#[derive(Debug, Default)]
pub struct TypeMemo {
    types: FxHashMap<TypeTag, String>,
}

impl TypeMemo {
    /// Empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Type token for `instance`, derived on first sight of its concrete type.
    pub fn derive(&mut self, instance: &dyn Resource, transform: KeyTransform) -> &str {
        self.types
            .entry(instance.type_tag())
            .or_insert_with(|| {
                let class = instance.class_name();
                let derived = derive_type(class, transform);
                trace!(class, resource_type = %derived, "derived resource type");
                derived
            })
            .as_str()
    }

    /// Number of distinct concrete types seen.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when nothing has been derived yet.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
