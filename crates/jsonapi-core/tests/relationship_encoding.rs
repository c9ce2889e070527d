// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Non-polymorphic relationship encoding: linkage shapes, conditions, lazy
//! data, links, and parameter forwarding.

use std::sync::{Arc, Mutex};

use jsonapi_core::{
    Association, EncodeError, Params, RelationshipDescriptor, RelationshipKind, Resource,
};
use jsonapi_dry_tests::{sample_post, Comment, Person, Post};
use serde_json::{json, Map, Value};

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

fn encode(rel: &RelationshipDescriptor<Post>, post: &Post, params: &Params) -> Value {
    let mut out = Map::new();
    rel.encode(post, params, &mut out).expect("encode");
    Value::Object(out)
}

#[test]
fn to_one_with_static_type_stringifies_id() {
    let rel = RelationshipDescriptor::<Post>::to_one("post")
        .record_type("post")
        .id_accessor("id")
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(42), &Params::new());
    assert_eq!(out, json!({"post": {"data": {"id": "42", "type": "post"}}}));
}

#[test]
fn to_one_without_associated_id_is_null() {
    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(1), &Params::new());
    assert_eq!(out["author"]["data"], Value::Null);
}

#[test]
fn to_many_with_empty_association_is_empty_array() {
    let rel = RelationshipDescriptor::<Post>::to_many("comments")
        .record_type("comment")
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(1), &Params::new());
    assert_eq!(out, json!({"comments": {"data": []}}));
}

#[test]
fn to_many_reads_id_list_and_drops_blank_ids() {
    let mut post = sample_post();
    post.comments.push(Comment {
        id: None,
        body: "unsaved".into(),
    });
    let rel = RelationshipDescriptor::<Post>::to_many("comments")
        .record_type("comment")
        .build()
        .unwrap();
    let out = encode(&rel, &post, &Params::new());
    assert_eq!(
        out["comments"]["data"],
        json!([{"id": "1", "type": "comment"}, {"id": "2", "type": "comment"}])
    );
}

#[test]
fn resolver_maps_each_element_through_id_accessor() {
    let rel = RelationshipDescriptor::<Post>::to_many("comments")
        .record_type("comment")
        .resolve_with(|post: &Post, _: &Params| Ok(Association::slice(&post.comments[..1])))
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post(), &Params::new());
    assert_eq!(out["comments"]["data"], json!([{"id": "1", "type": "comment"}]));
}

#[test]
fn resolver_single_value_in_to_one() {
    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .resolve_with(|post: &Post, _: &Params| Ok(Association::optional(post.author.as_ref())))
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post(), &Params::new());
    assert_eq!(out["author"]["data"], json!({"id": "7", "type": "person"}));

    let out = encode(&rel, &Post::bare(3), &Params::new());
    assert_eq!(out["author"]["data"], Value::Null);
}

#[test]
fn resolver_single_value_in_to_many_is_wrapped() {
    let rel = RelationshipDescriptor::<Post>::to_many("editors")
        .record_type("person")
        .resolve_with(|post: &Post, _: &Params| Ok(Association::optional(post.author.as_ref())))
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post(), &Params::new());
    assert_eq!(out["editors"]["data"], json!([{"id": "7", "type": "person"}]));
}

#[test]
fn resolver_may_build_owned_records() {
    let rel = RelationshipDescriptor::<Post>::to_one("reviewer")
        .record_type("person")
        .resolve_with(|post: &Post, _: &Params| {
            let reviewer: Box<dyn Resource> = Box::new(Person::new(post.id + 100));
            Ok(Association::One(reviewer.into()))
        })
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(1), &Params::new());
    assert_eq!(out["reviewer"]["data"], json!({"id": "101", "type": "person"}));
}

#[test]
fn false_condition_leaves_key_absent() {
    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .condition(|_, params| Ok(params.get("with_author") == Some(&json!(true))))
        .build()
        .unwrap();
    let post = sample_post();

    let out = encode(&rel, &post, &Params::new());
    assert_eq!(out, json!({}));

    let out = encode(&rel, &post, &params(json!({"with_author": true})));
    assert_eq!(out["author"]["data"], json!({"id": "7", "type": "person"}));
}

#[test]
fn lazy_relationship_has_no_data_member() {
    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .lazy_load_data(true)
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post(), &Params::new());
    assert_eq!(out, json!({"author": {}}));
}

#[test]
fn lazy_relationship_keeps_links() {
    let rel = RelationshipDescriptor::<Post>::to_many("comments")
        .record_type("comment")
        .lazy_load_data(true)
        .link_with("related", |post: &Post, _: &Params| {
            Ok(json!(format!("/posts/{}/comments", post.id)))
        })
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post(), &Params::new());
    assert_eq!(
        out,
        json!({"comments": {"links": {"related": "/posts/42/comments"}}})
    );
}

#[test]
fn links_are_accumulated_next_to_data() {
    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .link_field("self", "url")
        .link_with("related", |post: &Post, params: &Params| {
            let host = params.get("host").and_then(Value::as_str).unwrap_or("");
            Ok(json!(format!("{host}/posts/{}/author", post.id)))
        })
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post(), &params(json!({"host": "https://x.test"})));
    assert_eq!(
        out,
        json!({"author": {
            "data": {"id": "7", "type": "person"},
            "links": {"self": "/posts/42", "related": "https://x.test/posts/42/author"}
        }})
    );
}

#[test]
fn static_params_win_and_reach_every_callable() {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
    let (in_condition, in_resolver, in_link) = (seen.clone(), seen.clone(), seen.clone());

    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .params(params(json!({"b": 2, "c": 3})))
        .condition(move |_, p| {
            in_condition.lock().unwrap().push(Value::Object(p.clone()));
            Ok(true)
        })
        .resolve_with(move |post: &Post, p: &Params| {
            in_resolver.lock().unwrap().push(Value::Object(p.clone()));
            Ok(Association::optional(post.author.as_ref()))
        })
        .link_with("self", move |_: &Post, p: &Params| {
            in_link.lock().unwrap().push(Value::Object(p.clone()));
            Ok(json!("/self"))
        })
        .build()
        .unwrap();

    let caller = params(json!({"a": 1, "b": 1}));
    encode(&rel, &sample_post(), &caller);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    for p in seen.iter() {
        assert_eq!(p, &json!({"a": 1, "b": 2, "c": 3}));
    }
    assert_eq!(
        Value::Object(rel.merged_params(&caller).into_owned()),
        json!({"a": 1, "b": 2, "c": 3})
    );
}

#[test]
fn encoding_is_idempotent() {
    let rel = RelationshipDescriptor::<Post>::to_many("comments")
        .record_type("comment")
        .link_field("self", "url")
        .build()
        .unwrap();
    let post = sample_post();
    let p = params(json!({"x": 1}));
    assert_eq!(encode(&rel, &post, &p), encode(&rel, &post, &p));
}

#[test]
fn existing_output_members_are_kept() {
    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .build()
        .unwrap();
    let mut out = Map::new();
    out.insert("comments".into(), json!({"data": []}));
    rel.encode(&sample_post(), &Params::new(), &mut out).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(rel.kind(), RelationshipKind::ToOne);
}

#[test]
fn missing_accessor_propagates() {
    let rel = RelationshipDescriptor::<Post>::to_one("editor")
        .record_type("person")
        .build()
        .unwrap();
    let mut out = Map::new();
    let err = rel
        .encode(&sample_post(), &Params::new(), &mut out)
        .unwrap_err();
    assert!(matches!(err, EncodeError::MissingField { ref field, .. } if field == "editor_id"));
}

#[test]
fn failing_condition_propagates() {
    let rel = RelationshipDescriptor::<Post>::to_one("author")
        .record_type("person")
        .condition(|_, _| Err(EncodeError::callable("no session")))
        .build()
        .unwrap();
    let err = rel
        .encode(&sample_post(), &Params::new(), &mut Map::new())
        .unwrap_err();
    assert!(matches!(err, EncodeError::Callable(_)));
}

#[test]
fn include_relationship_and_fetch_are_public() {
    let rel = RelationshipDescriptor::<Post>::to_many("comments")
        .record_type("comment")
        .params(params(json!({"full": true})))
        .condition(|_, p| Ok(p.get("full") == Some(&json!(true))))
        .build()
        .unwrap();
    let post = sample_post();
    assert!(rel.include_relationship(&post, &Params::new()).unwrap());
    match rel.fetch_associated_object(&post, &Params::new()).unwrap() {
        Association::Many(comments) => assert_eq!(comments.len(), 2),
        _ => panic!("expected comments"),
    }
}
