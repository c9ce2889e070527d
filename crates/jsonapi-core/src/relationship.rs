// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Relationship encoder.
//!
//! Writes `output[key] = {"data": ..., "links": ...}` for one configured
//! relationship of a record:
//!
//! - non-polymorphic relationships type every identifier with the fixed record type;
//! - polymorphic relationships derive the type from each associated record's
//!   concrete type, memoized per encode call;
//! - lazy relationships omit `data` and keep only `links`.
//!
//! Missing associations and blank ids encode as `null` (to-one) or `[]`
//! (to-many). Broken accessors and failing callables are returned as errors;
//! the output map is only written once the whole entry has been built.

use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::attribute::ValueSource;
use crate::config::EncoderConfig;
use crate::derivation::{derive_type, TypeMemo};
use crate::error::{ConfigError, EncodeError};
use crate::identifier::{present_id, Linkage, RawIds, ResourceIdentifier};
use crate::link::LinkDescriptor;
use crate::params::{merge_params, Params};
use crate::resource::{Association, Resource};
use crate::transform::KeyTransform;

/// Cardinality of a relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    /// At most one related resource (`belongs_to`, `has_one`).
    ToOne,
    /// Any number of related resources (`has_many`).
    ToMany,
}

impl RelationshipKind {
    /// `data` value when nothing resolves: `null` or `[]`.
    pub fn empty_data(self) -> Value {
        match self {
            Self::ToOne => Value::Null,
            Self::ToMany => Value::Array(Vec::new()),
        }
    }
}

/// How identifiers of a relationship are typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceTyping {
    /// Every identifier carries this type token.
    Fixed(String),
    /// The type token comes from each associated record's concrete type.
    Polymorphic,
}

/// Association resolver: `(record, params) -> association`.
pub type AssociationFn<R> = Arc<
    dyn for<'r> Fn(&'r R, &Params) -> Result<Association<'r>, EncodeError> + Send + Sync,
>;

/// Relationship inclusion predicate: `(record, params) -> include?`.
pub type RelationshipPredicate<R> =
    Arc<dyn Fn(&R, &Params) -> Result<bool, EncodeError> + Send + Sync>;

/// Immutable description of one relationship.
///
/// Built once through [`RelationshipDescriptor::to_one`] or
/// [`RelationshipDescriptor::to_many`]; a non-polymorphic descriptor always
/// carries its record type.
pub struct RelationshipDescriptor<R> {
    key: String,
    name: String,
    id_accessor: String,
    explicit_id_accessor: bool,
    typing: ResourceTyping,
    association_accessor: String,
    resolver: Option<AssociationFn<R>>,
    serializer: Option<String>,
    kind: RelationshipKind,
    cached: bool,
    condition: Option<RelationshipPredicate<R>>,
    transform: KeyTransform,
    links: Vec<LinkDescriptor<R>>,
    lazy_load_data: bool,
    params: Option<Params>,
}

impl<R> fmt::Debug for RelationshipDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("typing", &self.typing)
            .field("id_accessor", &self.id_accessor)
            .field("association_accessor", &self.association_accessor)
            .field("resolver", &self.resolver.is_some())
            .field("lazy_load_data", &self.lazy_load_data)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> RelationshipDescriptor<R> {
    /// Starts a to-one relationship exposed as `name`.
    pub fn to_one(name: impl Into<String>) -> RelationshipBuilder<R> {
        RelationshipBuilder::new(name.into(), RelationshipKind::ToOne)
    }

    /// Starts a to-many relationship exposed as `name`.
    pub fn to_many(name: impl Into<String>) -> RelationshipBuilder<R> {
        RelationshipBuilder::new(name.into(), RelationshipKind::ToMany)
    }

    /// Output key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Exposed relationship name, before key transformation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relationship cardinality.
    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    /// Whether the resource type is derived per associated record.
    pub fn is_polymorphic(&self) -> bool {
        matches!(self.typing, ResourceTyping::Polymorphic)
    }

    /// Fixed record type, `None` for polymorphic relationships.
    pub fn record_type(&self) -> Option<&str> {
        match &self.typing {
            ResourceTyping::Fixed(ty) => Some(ty.as_str()),
            ResourceTyping::Polymorphic => None,
        }
    }

    /// Field read to obtain identifiers.
    pub fn id_accessor(&self) -> &str {
        &self.id_accessor
    }

    /// Association read when no resolver is configured.
    pub fn association_accessor(&self) -> &str {
        &self.association_accessor
    }

    /// Serializer name used by the document assembler for `included` payloads.
    pub fn serializer(&self) -> Option<&str> {
        self.serializer.as_deref()
    }

    /// Cache flag, forwarded untouched to the document assembler.
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Naming transform for derived type tokens.
    pub fn transform(&self) -> KeyTransform {
        self.transform
    }

    /// Configured links in declaration order.
    pub fn links(&self) -> &[LinkDescriptor<R>] {
        &self.links
    }

    /// Whether linkage data is withheld.
    pub fn is_lazy(&self) -> bool {
        self.lazy_load_data
    }

    /// Statically configured parameters.
    pub fn static_params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// Caller params with the static params merged over them.
    pub fn merged_params<'p>(&self, params: &'p Params) -> Cow<'p, Params> {
        merge_params(params, self.params.as_ref())
    }

    /// Evaluates the inclusion predicate against merged params.
    pub fn include_relationship(&self, record: &R, params: &Params) -> Result<bool, EncodeError> {
        self.is_included(record, &self.merged_params(params))
    }

    /// Reads the associated record(s), through the resolver when one is configured.
    pub fn fetch_associated_object<'r>(
        &self,
        record: &'r R,
        params: &Params,
    ) -> Result<Association<'r>, EncodeError> {
        self.associated(record, &self.merged_params(params))
    }

    /// Encodes this relationship of `record` into `output[key]`.
    ///
    /// An excluded relationship leaves no key. Otherwise `output[key]` holds
    /// `data` (unless lazy) and `links` (when any are configured).
    #[instrument(level = "trace", skip_all, fields(key = %self.key))]
    pub fn encode(
        &self,
        record: &R,
        params: &Params,
        output: &mut Map<String, Value>,
    ) -> Result<(), EncodeError> {
        let params = self.merged_params(params);
        if !self.is_included(record, &params)? {
            trace!("relationship excluded by condition");
            return Ok(());
        }

        let mut entry = Map::new();
        if self.lazy_load_data {
            trace!("linkage withheld for lazy relationship");
        } else {
            entry.insert("data".to_owned(), self.data(record, &params)?);
        }
        if !self.links.is_empty() {
            let mut links = Map::new();
            for link in &self.links {
                link.encode(record, &params, &mut links)?;
            }
            entry.insert("links".to_owned(), Value::Object(links));
        }
        output.insert(self.key.clone(), Value::Object(entry));
        Ok(())
    }

    fn is_included(&self, record: &R, params: &Params) -> Result<bool, EncodeError> {
        match &self.condition {
            Some(condition) => condition(record, params),
            None => Ok(true),
        }
    }

    fn associated<'r>(
        &self,
        record: &'r R,
        params: &Params,
    ) -> Result<Association<'r>, EncodeError> {
        match &self.resolver {
            Some(resolve) => resolve(record, params),
            None => record.association(&self.association_accessor),
        }
    }

    fn data(&self, record: &R, params: &Params) -> Result<Value, EncodeError> {
        match &self.typing {
            ResourceTyping::Fixed(ty) => Ok(self
                .fetch_ids(record, params)?
                .into_linkage(ty)?
                .into_data(self.kind)),
            ResourceTyping::Polymorphic => self.polymorphic_data(record, params),
        }
    }

    /// Raw ids of the related resources, independent of typing.
    fn fetch_ids(&self, record: &R, params: &Params) -> Result<RawIds, EncodeError> {
        let Some(resolve) = &self.resolver else {
            return Ok(RawIds::from(record.field(&self.id_accessor)?));
        };
        match resolve(record, params)? {
            Association::Absent => Ok(RawIds::One(Value::Null)),
            Association::One(object) => Ok(RawIds::One(object.field(&self.id_accessor)?)),
            Association::Many(objects) => objects
                .iter()
                .map(|object| object.field(&self.id_accessor))
                .collect::<Result<Vec<_>, _>>()
                .map(RawIds::Many),
        }
    }

    fn polymorphic_data(&self, record: &R, params: &Params) -> Result<Value, EncodeError> {
        let linkage = match self.associated(record, params)? {
            Association::Absent => return Ok(self.kind.empty_data()),
            Association::One(object) if self.kind == RelationshipKind::ToOne => {
                let raw = if self.resolver.is_some() {
                    object.field(&self.id_accessor)?
                } else if self.explicit_id_accessor {
                    record.field(&self.id_accessor)?
                } else {
                    object.id()?
                };
                let resource_type = derive_type(object.class_name(), self.transform);
                Linkage::One(ResourceIdentifier::resolve(&raw, &resource_type)?)
            }
            Association::One(object) => {
                let mut memo = TypeMemo::new();
                Linkage::One(self.identify(object.resource(), &mut memo)?)
            }
            Association::Many(objects) => {
                let mut memo = TypeMemo::new();
                let mut ids = Vec::with_capacity(objects.len());
                for object in &objects {
                    if let Some(id) = self.identify(object.resource(), &mut memo)? {
                        ids.push(id);
                    }
                }
                trace!(elements = objects.len(), types = memo.len(), "polymorphic linkage");
                Linkage::Many(ids)
            }
        };
        Ok(linkage.into_data(self.kind))
    }

    fn identify(
        &self,
        object: &dyn Resource,
        memo: &mut TypeMemo,
    ) -> Result<Option<ResourceIdentifier>, EncodeError> {
        let Some(id) = present_id(&object.id()?)? else {
            return Ok(None);
        };
        Ok(Some(ResourceIdentifier::new(
            id,
            memo.derive(object, self.transform),
        )))
    }
}

/// Builder for [`RelationshipDescriptor`].
///
/// Unset accessors default from the exposed name: the association accessor is
/// the name itself; the id accessor is `id` when a resolver is configured,
/// otherwise `<name>_id` (to-one) or `<singular name>_ids` (to-many).
///
/// A polymorphic to-one without a resolver reads its id from the record only
/// when [`RelationshipBuilder::id_accessor`] is set; otherwise the associated
/// record's own [`Resource::id`] is used.
pub struct RelationshipBuilder<R> {
    name: String,
    kind: RelationshipKind,
    key: Option<String>,
    id_accessor: Option<String>,
    record_type: Option<String>,
    association_accessor: Option<String>,
    resolver: Option<AssociationFn<R>>,
    serializer: Option<String>,
    polymorphic: bool,
    cached: bool,
    condition: Option<RelationshipPredicate<R>>,
    transform: KeyTransform,
    links: Vec<(String, ValueSource<R>)>,
    lazy_load_data: bool,
    params: Option<Params>,
}

impl<R: Resource> RelationshipBuilder<R> {
    fn new(name: String, kind: RelationshipKind) -> Self {
        Self {
            name,
            kind,
            key: None,
            id_accessor: None,
            record_type: None,
            association_accessor: None,
            resolver: None,
            serializer: None,
            polymorphic: false,
            cached: false,
            condition: None,
            transform: KeyTransform::None,
            links: Vec::new(),
            lazy_load_data: false,
            params: None,
        }
    }

    /// Explicit output key; bypasses the key transform.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Field read to obtain identifiers.
    pub fn id_accessor(mut self, field: impl Into<String>) -> Self {
        self.id_accessor = Some(field.into());
        self
    }

    /// Fixed record type; required unless polymorphic.
    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Association read through [`Resource::association`].
    pub fn association(mut self, name: impl Into<String>) -> Self {
        self.association_accessor = Some(name.into());
        self
    }

    /// Resolves the association with `f` instead of an accessor.
    pub fn resolve_with<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(&'r R, &Params) -> Result<Association<'r>, EncodeError>
            + Send
            + Sync
            + 'static,
    {
        self.resolver = Some(Arc::new(f));
        self
    }

    /// Serializer name forwarded to the document assembler.
    pub fn serializer(mut self, name: impl Into<String>) -> Self {
        self.serializer = Some(name.into());
        self
    }

    /// Derive resource types from associated records.
    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    /// Cache flag forwarded to the document assembler.
    pub fn cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    /// Only emit the relationship when `predicate` holds.
    pub fn condition<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&R, &Params) -> Result<bool, EncodeError> + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(predicate));
        self
    }

    /// Transform for the output key, the fixed record type, and derived type tokens.
    pub fn transform(mut self, transform: KeyTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Seeds transform and cache flag from shared encoder configuration.
    pub fn configure(mut self, config: &EncoderConfig) -> Self {
        self.transform = config.key_transform;
        self.cached = config.cache;
        self
    }

    /// Link whose value is read from a record field.
    pub fn link_field(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.links
            .push((name.into(), ValueSource::Field(field.into())));
        self
    }

    /// Link whose value is computed.
    pub fn link_with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R, &Params) -> Result<Value, EncodeError> + Send + Sync + 'static,
    {
        self.links.push((name.into(), ValueSource::computed(f)));
        self
    }

    /// Withhold linkage data; only links are emitted.
    pub fn lazy_load_data(mut self, lazy: bool) -> Self {
        self.lazy_load_data = lazy;
        self
    }

    /// Static params merged over the caller's on every call.
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Validates and freezes the descriptor.
    pub fn build(self) -> Result<RelationshipDescriptor<R>, ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        let typing = match (self.polymorphic, self.record_type) {
            (true, Some(_)) => {
                return Err(ConfigError::PolymorphicRecordType {
                    relationship: self.name,
                })
            }
            (true, None) => ResourceTyping::Polymorphic,
            (false, Some(ty)) => ResourceTyping::Fixed(self.transform.apply(&ty)),
            (false, None) => {
                return Err(ConfigError::MissingRecordType {
                    relationship: self.name,
                })
            }
        };
        let key = self
            .key
            .unwrap_or_else(|| self.transform.apply(&self.name));
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }

        let mut links: Vec<LinkDescriptor<R>> = Vec::with_capacity(self.links.len());
        for (link_name, source) in self.links {
            if links.iter().any(|l| l.key() == link_name) {
                return Err(ConfigError::MalformedLink {
                    link: link_name,
                    reason: "duplicate link name",
                });
            }
            links.push(LinkDescriptor::new(link_name, source)?);
        }

        let explicit_id_accessor = self.id_accessor.is_some();
        let id_accessor = match self.id_accessor {
            Some(field) => field,
            None if self.resolver.is_some() => "id".to_owned(),
            None => match self.kind {
                RelationshipKind::ToOne => format!("{}_id", self.name),
                RelationshipKind::ToMany => format!("{}_ids", singularize(&self.name)),
            },
        };
        let association_accessor = self
            .association_accessor
            .unwrap_or_else(|| self.name.clone());

        debug!(
            relationship = %key,
            kind = ?self.kind,
            typing = ?typing,
            lazy = self.lazy_load_data,
            links = links.len(),
            "built relationship descriptor"
        );
        Ok(RelationshipDescriptor {
            key,
            name: self.name,
            id_accessor,
            explicit_id_accessor,
            typing,
            association_accessor,
            resolver: self.resolver,
            serializer: self.serializer,
            kind: self.kind,
            cached: self.cached,
            condition: self.condition,
            transform: self.transform,
            links,
            lazy_load_data: self.lazy_load_data,
            params: self.params,
        })
    }
}

/// Naive singular form used for default id accessors: `categories` →
/// `category`, `comments` → `comment`; words ending in `ss` are kept.
fn singularize(name: &str) -> Cow<'_, str> {
    if let Some(stem) = name.strip_suffix("ies") {
        return Cow::Owned(format!("{stem}y"));
    }
    if name.ends_with("ss") {
        return Cow::Borrowed(name);
    }
    name.strip_suffix('s').map_or(Cow::Borrowed(name), Cow::Borrowed)
}
