// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for descriptor construction and encoding.

use serde_json::Value;
use thiserror::Error;

use crate::resource::Resource;

/// Errors raised while building descriptors or loading encoder configuration.
///
/// Every variant is detected before any record is encoded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A descriptor name or output key was empty.
    #[error("output key must not be empty")]
    EmptyKey,
    /// A non-polymorphic relationship was built without a record type.
    #[error("relationship `{relationship}` is not polymorphic and needs a record type")]
    MissingRecordType {
        /// Exposed relationship name.
        relationship: String,
    },
    /// A polymorphic relationship was given a fixed record type.
    #[error("relationship `{relationship}` is polymorphic and cannot carry a fixed record type")]
    PolymorphicRecordType {
        /// Exposed relationship name.
        relationship: String,
    },
    /// A link entry could not be accepted.
    #[error("link `{link}` is malformed: {reason}")]
    MalformedLink {
        /// Link name as configured.
        link: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A key transform name outside the supported set.
    #[error("unknown key transform `{0}`")]
    UnknownTransform(String),
    /// Configuration source failed to produce bytes.
    #[error("config source error: {0}")]
    Source(String),
    /// Configuration bytes were not valid JSON for the expected shape.
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while encoding a record.
///
/// Absent identifiers and missing associations are not errors; they encode as
/// `null` or `[]`. These variants cover broken accessors and failing callables,
/// and they reach the caller unchanged.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The record adapter does not expose the requested field.
    #[error("`{class}` has no field `{field}`")]
    MissingField {
        /// Concrete type name of the record.
        class: &'static str,
        /// Requested field name.
        field: String,
    },
    /// The record adapter does not expose the requested association.
    #[error("`{class}` has no association `{name}`")]
    MissingAssociation {
        /// Concrete type name of the record.
        class: &'static str,
        /// Requested association name.
        name: String,
    },
    /// An identifier accessor produced a non-empty array or object where one id was expected.
    #[error("identifier must be a scalar, found {found}")]
    InvalidIdentifier {
        /// The offending raw value.
        found: Value,
    },
    /// A caller-supplied function or predicate failed.
    #[error("callable failed: {0}")]
    Callable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EncodeError {
    /// Wraps an arbitrary error raised inside a computed value, predicate, or resolver.
    pub fn callable<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Callable(err.into())
    }

    /// Builds a [`EncodeError::MissingField`] naming the record's concrete type.
    pub fn missing_field<T>(record: &T, field: &str) -> Self
    where
        T: Resource + ?Sized,
    {
        Self::MissingField {
            class: record.class_name(),
            field: field.to_owned(),
        }
    }
}
