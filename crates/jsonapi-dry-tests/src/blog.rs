// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Blog records: a post with an author, comments, and polymorphic media.

use jsonapi_core::{Association, EncodeError, Linked, Resource};
use serde_json::{json, Value};

use crate::media::{Image, Video};

/// A post author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// A comment on a post. A `None` id models an unsaved comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    /// Primary key, absent until persisted.
    pub id: Option<u64>,
    /// Comment text.
    pub body: String,
}

/// A blog post.
///
/// Fields: `id`, `title`, `author_id`, `comment_ids`, `attachment_id`, `url`.
/// Associations: `author`, `comments`, `attachment` (polymorphic, to-one),
/// `media` (polymorphic, to-many).
pub struct Post {
    /// Primary key.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Author foreign key.
    pub author_id: Option<u64>,
    /// Loaded author.
    pub author: Option<Person>,
    /// Loaded comments.
    pub comments: Vec<Comment>,
    /// Single attachment of any media type.
    pub attachment: Option<Box<dyn Resource>>,
    /// Media of mixed types.
    pub media: Vec<Box<dyn Resource>>,
}

impl Post {
    /// Post with no author, comments, or media.
    pub fn bare(id: u64) -> Self {
        Self {
            id,
            title: format!("post {id}"),
            author_id: None,
            author: None,
            comments: Vec::new(),
            attachment: None,
            media: Vec::new(),
        }
    }
}

impl Person {
    /// Person with a generated name.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: format!("person {id}"),
        }
    }
}

impl Comment {
    /// Persisted comment.
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            body: format!("comment {id}"),
        }
    }
}

/// Post 42 by person 7, two comments, a video attachment, and mixed media.
pub fn sample_post() -> Post {
    Post {
        id: 42,
        title: "Hello".to_owned(),
        author_id: Some(7),
        author: Some(Person::new(7)),
        comments: vec![Comment::new(1), Comment::new(2)],
        attachment: Some(Box::new(Video::new(5))),
        media: vec![
            Box::new(Video::new(10)),
            Box::new(Image::new(11)),
            Box::new(Video::new(12)),
        ],
    }
}

impl Resource for Person {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            "name" => Ok(json!(self.name)),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }
}

impl Resource for Comment {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            "body" => Ok(json!(self.body)),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }
}

impl Resource for Post {
    fn field(&self, name: &str) -> Result<Value, EncodeError> {
        match name {
            "id" => Ok(json!(self.id)),
            "title" => Ok(json!(self.title)),
            "author_id" => Ok(json!(self.author_id)),
            "comment_ids" => Ok(Value::Array(
                self.comments.iter().map(|c| json!(c.id)).collect(),
            )),
            "attachment_id" => match &self.attachment {
                Some(attachment) => attachment.id(),
                None => Ok(Value::Null),
            },
            "url" => Ok(json!(format!("/posts/{}", self.id))),
            _ => Err(EncodeError::missing_field(self, name)),
        }
    }

    fn association(&self, name: &str) -> Result<Association<'_>, EncodeError> {
        match name {
            "author" => Ok(Association::optional(self.author.as_ref())),
            "comments" => Ok(Association::slice(&self.comments)),
            "attachment" => Ok(self
                .attachment
                .as_deref()
                .map_or(Association::Absent, |a| Association::One(Linked::Borrowed(a)))),
            "media" => Ok(Association::Many(
                self.media
                    .iter()
                    .map(|m| Linked::Borrowed(m.as_ref()))
                    .collect(),
            )),
            _ => Err(EncodeError::MissingAssociation {
                class: self.class_name(),
                name: name.to_owned(),
            }),
        }
    }
}
