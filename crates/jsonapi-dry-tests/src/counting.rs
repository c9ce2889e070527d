// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Records that count how often their type name is looked up.
//!
//! Type derivation reads [`Resource::class_name`] once per derivation, so the
//! probe count equals the number of derivations performed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jsonapi_core::{Association, EncodeError, Linked, Resource};
use serde_json::{json, Value};

/// Shared counter of `class_name` calls.
#[derive(Clone, Debug, Default)]
pub struct ClassNameProbe(Arc<AtomicUsize>);

impl ClassNameProbe {
    /// Fresh probe at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls observed so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Clip that reports `class_name` calls to its probe.
#[derive(Clone, Debug)]
pub struct CountingClip {
    /// Primary key.
    pub id: u64,
    probe: ClassNameProbe,
}

/// Photo that reports `class_name` calls to its probe.
#[derive(Clone, Debug)]
pub struct CountingPhoto {
    /// Primary key.
    pub id: u64,
    probe: ClassNameProbe,
}

impl CountingClip {
    /// Clip reporting to `probe`.
    pub fn new(id: u64, probe: &ClassNameProbe) -> Self {
        Self {
            id,
            probe: probe.clone(),
        }
    }
}

impl CountingPhoto {
    /// Photo reporting to `probe`.
    pub fn new(id: u64, probe: &ClassNameProbe) -> Self {
        Self {
            id,
            probe: probe.clone(),
        }
    }
}

impl Resource for CountingClip {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }

    fn class_name(&self) -> &'static str {
        self.probe.hit();
        "gallery::CountingClip"
    }
}

impl Resource for CountingPhoto {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }

    fn class_name(&self) -> &'static str {
        self.probe.hit();
        "gallery::CountingPhoto"
    }
}

/// Owner of a mixed list of items, exposed as the `items` association.
#[derive(Default)]
pub struct Gallery {
    /// Items in display order.
    pub items: Vec<Box<dyn Resource>>,
}

impl Gallery {
    /// Gallery of `clips` clips followed by `photos` photos, ids counting from 1.
    pub fn mixed(clips: u64, photos: u64, probe: &ClassNameProbe) -> Self {
        let mut items: Vec<Box<dyn Resource>> = Vec::new();
        for id in 1..=clips {
            items.push(Box::new(CountingClip::new(id, probe)));
        }
        for id in clips + 1..=clips + photos {
            items.push(Box::new(CountingPhoto::new(id, probe)));
        }
        Self { items }
    }
}

impl Resource for Gallery {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        Err(EncodeError::missing_field(self, name))
    }

    fn association(&self, name: &str) -> Result<Association<'_>, EncodeError> {
        match name {
            "items" => Ok(Association::Many(
                self.items
                    .iter()
                    .map(|item| Linked::Borrowed(item.as_ref()))
                    .collect(),
            )),
            _ => Err(EncodeError::MissingAssociation {
                class: self.class_name(),
                name: name.to_owned(),
            }),
        }
    }
}
