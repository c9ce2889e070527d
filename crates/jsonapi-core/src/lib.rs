// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! jsonapi-core: attribute and relationship encoding for JSON:API resources.
//!
//! A document assembler walks its records and, for every configured attribute
//! and relationship, calls `encode(record, params, output)`, which writes one
//! member into `output`. This crate covers those members only; the document
//! envelope (`data`, `included`, `meta`, `errors`) lives with the assembler.
//!
//! Descriptors are built once at configuration time and are immutable
//! afterwards. Encoding is synchronous and touches nothing but the caller's
//! output map and a per-call type memo, so distinct records may be encoded in
//! parallel with one output map each.
//!
//! ```
//! use jsonapi_core::{EncodeError, Params, RelationshipDescriptor, Resource};
//! use serde_json::{json, Map, Value};
//!
//! struct Comment {
//!     post_id: u64,
//! }
//!
//! impl Resource for Comment {
//!     fn field(&self, name: &str) -> Result<Value, EncodeError> {
//!         match name {
//!             "post_id" => Ok(json!(self.post_id)),
//!             _ => Err(EncodeError::missing_field(self, name)),
//!         }
//!     }
//! }
//!
//! let post = RelationshipDescriptor::<Comment>::to_one("post")
//!     .record_type("post")
//!     .build()?;
//! let mut out = Map::new();
//! post.encode(&Comment { post_id: 42 }, &Params::new(), &mut out)?;
//! assert_eq!(out["post"], json!({"data": {"id": "42", "type": "post"}}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]

mod attribute;
mod config;
mod derivation;
mod error;
mod identifier;
mod link;
mod params;
mod relationship;
mod resource;
/// Naming transforms (`camelize`, `dasherize`, `underscore`, `demodulize`).
pub mod transform;

pub use attribute::{
    AttributeBuilder, AttributeContext, AttributeDescriptor, AttributePredicate, ValueFn,
    ValueSource,
};
pub use config::{ConfigSource, EncoderConfig};
pub use derivation::{derive_type, TypeMemo};
pub use error::{ConfigError, EncodeError};
pub use identifier::{present_id, Linkage, RawIds, ResourceIdentifier};
pub use link::LinkDescriptor;
pub use params::{merge_params, Params};
pub use relationship::{
    AssociationFn, RelationshipBuilder, RelationshipDescriptor, RelationshipKind,
    RelationshipPredicate, ResourceTyping,
};
pub use resource::{Association, Linked, Resource, TypeTag};
pub use transform::KeyTransform;
