// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record capability trait and association handles.
//!
//! Encoders never reflect on records. A record adapter implements [`Resource`]
//! and answers field and association lookups by name, typically with a `match`
//! over the names it supports.

use core::any::TypeId;
use core::ops::Deref;

use serde_json::Value;

use crate::error::EncodeError;

/// Stable identity of a record's concrete type.
///
/// Two records share a tag exactly when they are instances of the same Rust type.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeTag(TypeId);

impl TypeTag {
    /// Tag for the type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// Capability contract every encodable record implements.
///
/// Only [`Resource::field`] is required. The remaining methods have defaults
/// derived from the implementing type.
pub trait Resource: 'static {
    /// Reads a named field. Unknown names should return [`EncodeError::MissingField`].
    fn field(&self, name: &str) -> Result<Value, EncodeError>;

    /// Reads a named association.
    fn association(&self, name: &str) -> Result<Association<'_>, EncodeError> {
        Err(EncodeError::MissingAssociation {
            class: self.class_name(),
            name: name.to_owned(),
        })
    }

    /// Primary identifier of this record.
    fn id(&self) -> Result<Value, EncodeError> {
        self.field("id")
    }

    /// Fully qualified concrete type name, e.g. `app::media::Video`.
    fn class_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Identity of the concrete type, used to memoize type derivation.
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }
}

/// Handle to one associated record, borrowed from its owner or freshly built.
pub enum Linked<'a> {
    /// Borrowed from the owning record.
    Borrowed(&'a dyn Resource),
    /// Produced by a resolving function.
    Owned(Box<dyn Resource>),
}

impl Linked<'_> {
    /// The associated record.
    pub fn resource(&self) -> &dyn Resource {
        match self {
            Self::Borrowed(resource) => *resource,
            Self::Owned(resource) => resource.as_ref(),
        }
    }
}

impl Deref for Linked<'_> {
    type Target = dyn Resource;

    fn deref(&self) -> &Self::Target {
        self.resource()
    }
}

impl<'a, T: Resource> From<&'a T> for Linked<'a> {
    fn from(resource: &'a T) -> Self {
        Self::Borrowed(resource)
    }
}

impl From<Box<dyn Resource>> for Linked<'_> {
    fn from(resource: Box<dyn Resource>) -> Self {
        Self::Owned(resource)
    }
}

/// Result of reading an association.
pub enum Association<'a> {
    /// No associated record.
    Absent,
    /// Exactly one associated record.
    One(Linked<'a>),
    /// A sequence of associated records, possibly empty.
    Many(Vec<Linked<'a>>),
}

impl<'a> Association<'a> {
    /// One borrowed record, or [`Association::Absent`] for `None`.
    pub fn optional<T: Resource>(resource: Option<&'a T>) -> Self {
        resource.map_or(Self::Absent, |r| Self::One(Linked::from(r)))
    }

    /// A borrowed homogeneous slice.
    pub fn slice<T: Resource>(resources: &'a [T]) -> Self {
        Self::Many(resources.iter().map(Linked::from).collect())
    }

    /// Any sequence of handles, e.g. a mixed-type polymorphic list.
    pub fn many<I>(resources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Linked<'a>>,
    {
        Self::Many(resources.into_iter().map(Into::into).collect())
    }

    /// True for [`Association::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}
