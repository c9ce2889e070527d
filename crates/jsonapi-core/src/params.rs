// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Encoding parameters and the merge rule applied before any callable runs.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Free-form parameters forwarded to computed values, predicates, and resolvers.
pub type Params = Map<String, Value>;

/// Merges statically configured parameters over the caller's.
///
/// Static values win on key collision. Without statics the caller's map is
/// passed through borrowed.
pub fn merge_params<'a>(caller: &'a Params, statics: Option<&Params>) -> Cow<'a, Params> {
    match statics {
        None => Cow::Borrowed(caller),
        Some(statics) => {
            let mut merged = caller.clone();
            merged.extend(statics.iter().map(|(k, v)| (k.clone(), v.clone())));
            Cow::Owned(merged)
        }
    }
}
