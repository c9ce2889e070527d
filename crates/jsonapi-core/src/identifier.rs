// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resource identifiers and relationship linkage.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::EncodeError;
use crate::relationship::RelationshipKind;

/// `{id, type}` pair identifying one resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceIdentifier {
    /// Identifier, always a string on the wire.
    pub id: String,
    /// Resource type token.
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl ResourceIdentifier {
    /// Identifier from already-stringified parts.
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
        }
    }

    /// Wraps a raw id, or `None` when the id is blank.
    pub fn resolve(raw: &Value, resource_type: &str) -> Result<Option<Self>, EncodeError> {
        Ok(present_id(raw)?.map(|id| Self::new(id, resource_type)))
    }

    /// Like [`ResourceIdentifier::resolve`] but a blank id still yields the
    /// shape, as `{"id": null, "type": resource_type}`.
    pub fn shaped(raw: &Value, resource_type: &str) -> Result<Value, EncodeError> {
        Ok(match Self::resolve(raw, resource_type)? {
            Some(identifier) => identifier.into(),
            None => json!({ "id": null, "type": resource_type }),
        })
    }
}

impl From<ResourceIdentifier> for Value {
    fn from(identifier: ResourceIdentifier) -> Self {
        json!({ "id": identifier.id, "type": identifier.resource_type })
    }
}

/// Stringifies a raw identifier, treating blank values as absent.
///
/// Blank means `null`, `false`, a whitespace-only string, or an empty array or
/// object. Numbers and `true` are stringified. A non-empty array or object is
/// not an identifier.
pub fn present_id(raw: &Value) -> Result<Option<String>, EncodeError> {
    match raw {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Bool(true) => Ok(Some("true".to_owned())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        other => Err(EncodeError::InvalidIdentifier {
            found: other.clone(),
        }),
    }
}

/// Raw identifiers as read off a record or its association.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawIds {
    /// A single raw id, possibly blank.
    One(Value),
    /// A sequence of raw ids, blanks included.
    Many(Vec<Value>),
}

impl From<Value> for RawIds {
    fn from(raw: Value) -> Self {
        match raw {
            Value::Array(items) => Self::Many(items),
            other => Self::One(other),
        }
    }
}

impl RawIds {
    /// Types every raw id with `resource_type`.
    ///
    /// A blank scalar becomes `One(None)`; blanks inside a sequence are dropped.
    pub fn into_linkage(self, resource_type: &str) -> Result<Linkage, EncodeError> {
        match self {
            Self::One(raw) => Ok(Linkage::One(ResourceIdentifier::resolve(&raw, resource_type)?)),
            Self::Many(raws) => {
                let mut ids = Vec::with_capacity(raws.len());
                for raw in &raws {
                    if let Some(id) = ResourceIdentifier::resolve(raw, resource_type)? {
                        ids.push(id);
                    }
                }
                Ok(Linkage::Many(ids))
            }
        }
    }
}

/// Resolved linkage before it is shaped for the relationship kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Linkage {
    /// Scalar context; `None` when nothing resolved.
    One(Option<ResourceIdentifier>),
    /// Collection context; absent ids already filtered out.
    Many(Vec<ResourceIdentifier>),
}

impl Linkage {
    /// Shapes the linkage as the relationship's `data` member.
    ///
    /// To-many always yields an array. To-one yields a single identifier or
    /// `null`; given a sequence it keeps the first element.
    pub fn into_data(self, kind: RelationshipKind) -> Value {
        match (self, kind) {
            (Self::One(id), RelationshipKind::ToOne) => id.map_or(Value::Null, Value::from),
            (Self::Many(ids), RelationshipKind::ToOne) => {
                ids.into_iter().next().map_or(Value::Null, Value::from)
            }
            (Self::One(id), RelationshipKind::ToMany) => {
                Value::Array(id.into_iter().map(Value::from).collect())
            }
            (Self::Many(ids), RelationshipKind::ToMany) => {
                Value::Array(ids.into_iter().map(Value::from).collect())
            }
        }
    }
}
