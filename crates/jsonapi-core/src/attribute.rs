// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute encoder: one scalar member under an optional inclusion predicate.

use core::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::EncoderConfig;
use crate::error::{ConfigError, EncodeError};
use crate::params::Params;
use crate::resource::Resource;
use crate::transform::KeyTransform;

/// Computed value: `(record, params) -> value`.
pub type ValueFn<R> = Arc<dyn Fn(&R, &Params) -> Result<Value, EncodeError> + Send + Sync>;

/// Attribute inclusion predicate: `(record, params, context) -> include?`.
pub type AttributePredicate<R> =
    Arc<dyn Fn(&R, &Params, &AttributeContext<'_>) -> Result<bool, EncodeError> + Send + Sync>;

/// Context handed to attribute predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeContext<'a> {
    /// Output key of the attribute being decided.
    pub key: &'a str,
}

/// Where a value comes from: a named field on the record or a computed function.
pub enum ValueSource<R> {
    /// Read this field through [`Resource::field`].
    Field(String),
    /// Call this function.
    Computed(ValueFn<R>),
}

impl<R> Clone for ValueSource<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(name) => Self::Field(name.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for ValueSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<R: Resource> ValueSource<R> {
    /// Wraps a closure as a computed source.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&R, &Params) -> Result<Value, EncodeError> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Produces the value for `record`.
    pub fn resolve(&self, record: &R, params: &Params) -> Result<Value, EncodeError> {
        match self {
            Self::Field(name) => record.field(name),
            Self::Computed(f) => f(record, params),
        }
    }

    pub(crate) fn is_blank_field(&self) -> bool {
        matches!(self, Self::Field(name) if name.is_empty())
    }
}

/// Immutable description of one attribute.
pub struct AttributeDescriptor<R> {
    key: String,
    source: ValueSource<R>,
    condition: Option<AttributePredicate<R>>,
}

impl<R> fmt::Debug for AttributeDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("key", &self.key)
            .field("source", &self.source)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

impl<R: Resource> AttributeDescriptor<R> {
    /// Attribute `name` read from the record field of the same name.
    pub fn field(name: impl Into<String>) -> AttributeBuilder<R> {
        let name = name.into();
        AttributeBuilder::new(name.clone(), ValueSource::Field(name))
    }

    /// Attribute `name` produced by `f`.
    pub fn computed<F>(name: impl Into<String>, f: F) -> AttributeBuilder<R>
    where
        F: Fn(&R, &Params) -> Result<Value, EncodeError> + Send + Sync + 'static,
    {
        AttributeBuilder::new(name.into(), ValueSource::computed(f))
    }

    /// Output key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value source.
    pub fn source(&self) -> &ValueSource<R> {
        &self.source
    }

    /// Evaluates the inclusion predicate; `true` when none is configured.
    pub fn is_included(&self, record: &R, params: &Params) -> Result<bool, EncodeError> {
        match &self.condition {
            Some(condition) => condition(record, params, &AttributeContext { key: &self.key }),
            None => Ok(true),
        }
    }

    /// Writes `output[key] = value` unless the predicate excludes the attribute.
    ///
    /// An excluded attribute leaves no key at all. Accessor and callable
    /// failures propagate unchanged.
    pub fn encode(
        &self,
        record: &R,
        params: &Params,
        output: &mut Map<String, Value>,
    ) -> Result<(), EncodeError> {
        if !self.is_included(record, params)? {
            trace!(key = %self.key, "attribute excluded by condition");
            return Ok(());
        }
        let value = self.source.resolve(record, params)?;
        output.insert(self.key.clone(), value);
        Ok(())
    }
}

/// Builder for [`AttributeDescriptor`].
pub struct AttributeBuilder<R> {
    name: String,
    source: ValueSource<R>,
    condition: Option<AttributePredicate<R>>,
    transform: KeyTransform,
}

impl<R: Resource> AttributeBuilder<R> {
    fn new(name: String, source: ValueSource<R>) -> Self {
        Self {
            name,
            source,
            condition: None,
            transform: KeyTransform::None,
        }
    }

    /// Reads the value from `field` instead of the attribute name.
    pub fn from_field(mut self, field: impl Into<String>) -> Self {
        self.source = ValueSource::Field(field.into());
        self
    }

    /// Only emit the attribute when `predicate` holds.
    pub fn condition<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&R, &Params, &AttributeContext<'_>) -> Result<bool, EncodeError>
            + Send
            + Sync
            + 'static,
    {
        self.condition = Some(Arc::new(predicate));
        self
    }

    /// Transform applied to the output key.
    pub fn transform(mut self, transform: KeyTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Seeds defaults from shared encoder configuration.
    pub fn configure(mut self, config: &EncoderConfig) -> Self {
        self.transform = config.key_transform;
        self
    }

    /// Validates and freezes the descriptor.
    pub fn build(self) -> Result<AttributeDescriptor<R>, ConfigError> {
        let key = self.transform.apply(&self.name);
        if key.is_empty() || self.source.is_blank_field() {
            return Err(ConfigError::EmptyKey);
        }
        debug!(attribute = %key, source = ?self.source, "built attribute descriptor");
        Ok(AttributeDescriptor {
            key,
            source: self.source,
            condition: self.condition,
        })
    }
}
