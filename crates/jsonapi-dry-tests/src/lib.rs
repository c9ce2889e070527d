// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for jsonapi crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`blog`] - Post/Person/Comment record adapters with plain associations
//! - [`media`] - Concrete media types for polymorphic relationships
//! - [`counting`] - Records that count type-name lookups
//! - [`config`] - In-memory config source fake

pub mod blog;
pub mod config;
pub mod counting;
pub mod media;

pub use blog::{sample_post, Comment, Person, Post};
pub use config::InMemoryConfigSource;
pub use counting::{ClassNameProbe, CountingClip, CountingPhoto, Gallery};
pub use media::{Image, Video, VideoClip};
