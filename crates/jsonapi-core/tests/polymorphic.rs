// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Polymorphic relationships: type tokens derived from concrete record types,
//! memoized once per type within one encode call.

use jsonapi_core::{
    Association, ConfigError, EncodeError, KeyTransform, Linked, Params, RelationshipDescriptor,
    Resource,
};
use jsonapi_dry_tests::{
    sample_post, ClassNameProbe, CountingClip, Gallery, Image, Post, Video, VideoClip,
};
use serde_json::{json, Map, Value};

fn encode<R: Resource>(rel: &RelationshipDescriptor<R>, record: &R) -> Value {
    let mut out = Map::new();
    rel.encode(record, &Params::new(), &mut out).expect("encode");
    Value::Object(out)
}

#[test]
fn to_one_type_comes_from_associated_class() {
    let rel = RelationshipDescriptor::<Post>::to_one("attachment")
        .polymorphic()
        .build()
        .unwrap();
    assert!(rel.is_polymorphic());
    assert_eq!(rel.record_type(), None);
    let out = encode(&rel, &sample_post());
    assert_eq!(out["attachment"]["data"], json!({"id": "5", "type": "video"}));
    assert_eq!(out["attachment"]["data"]["type"], json!("video"));
}

#[test]
fn to_one_renamed_association_reads_id_from_associated_record() {
    let rel = RelationshipDescriptor::<Post>::to_one("cover")
        .polymorphic()
        .association("attachment")
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post());
    assert_eq!(out["cover"]["data"], json!({"id": "5", "type": "video"}));
}

#[test]
fn to_one_explicit_id_accessor_reads_record_field() {
    let rel = RelationshipDescriptor::<Post>::to_one("cover")
        .polymorphic()
        .association("attachment")
        .id_accessor("attachment_id")
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post());
    assert_eq!(out["cover"]["data"], json!({"id": "5", "type": "video"}));

    let missing = RelationshipDescriptor::<Post>::to_one("cover")
        .polymorphic()
        .association("attachment")
        .id_accessor("cover_id")
        .build()
        .unwrap();
    let err = missing
        .encode(&sample_post(), &Params::new(), &mut Map::new())
        .unwrap_err();
    assert!(matches!(err, EncodeError::MissingField { ref field, .. } if field == "cover_id"));
}

#[test]
fn to_one_absent_association_is_null() {
    let rel = RelationshipDescriptor::<Post>::to_one("attachment")
        .polymorphic()
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(1));
    assert_eq!(out, json!({"attachment": {"data": null}}));
}

#[test]
fn to_one_with_resolver_reads_id_from_associated_object() {
    let rel = RelationshipDescriptor::<Post>::to_one("cover")
        .polymorphic()
        .transform(KeyTransform::Dash)
        .resolve_with(|_: &Post, _: &Params| {
            let clip: Box<dyn Resource> = Box::new(VideoClip { id: 8 });
            Ok(Association::One(clip.into()))
        })
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(1));
    assert_eq!(out["cover"]["data"], json!({"id": "8", "type": "video-clip"}));
}

#[test]
fn to_many_mixed_types() {
    let rel = RelationshipDescriptor::<Post>::to_many("media")
        .polymorphic()
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post());
    assert_eq!(
        out["media"]["data"],
        json!([
            {"id": "10", "type": "video"},
            {"id": "11", "type": "image"},
            {"id": "12", "type": "video"}
        ])
    );
}

#[test]
fn to_many_empty_association_is_empty_array() {
    let rel = RelationshipDescriptor::<Post>::to_many("media")
        .polymorphic()
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(1));
    assert_eq!(out, json!({"media": {"data": []}}));
}

#[test]
fn to_many_drops_elements_without_ids() {
    let mut post = Post::bare(1);
    let media: [Box<dyn Resource>; 2] = [Box::new(Image::unsaved()), Box::new(Image::new(3))];
    post.media = media.into();
    let rel = RelationshipDescriptor::<Post>::to_many("media")
        .polymorphic()
        .build()
        .unwrap();
    let out = encode(&rel, &post);
    assert_eq!(out["media"]["data"], json!([{"id": "3", "type": "image"}]));
}

#[test]
fn to_many_single_value_is_wrapped() {
    let rel = RelationshipDescriptor::<Post>::to_many("highlights")
        .polymorphic()
        .association("attachment")
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post());
    assert_eq!(out["highlights"]["data"], json!([{"id": "5", "type": "video"}]));
}

#[test]
fn derivation_runs_once_per_class_per_call() {
    let probe = ClassNameProbe::new();
    let gallery = Gallery::mixed(5, 0, &probe);
    let rel = RelationshipDescriptor::<Gallery>::to_many("items")
        .polymorphic()
        .build()
        .unwrap();

    let out = encode(&rel, &gallery);
    let data = out["items"]["data"].as_array().expect("array");
    assert_eq!(data.len(), 5);
    assert!(data.iter().all(|id| id["type"] == json!("counting_clip")));
    assert_eq!(probe.count(), 1);
}

#[test]
fn memo_is_scoped_to_one_call() {
    let probe = ClassNameProbe::new();
    let gallery = Gallery::mixed(3, 2, &probe);
    let rel = RelationshipDescriptor::<Gallery>::to_many("items")
        .polymorphic()
        .transform(KeyTransform::CamelLower)
        .build()
        .unwrap();

    let first = encode(&rel, &gallery);
    assert_eq!(probe.count(), 2);
    let second = encode(&rel, &gallery);
    assert_eq!(probe.count(), 4);
    assert_eq!(first, second);

    let types: Vec<&Value> = first["items"]["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|id| &id["type"])
        .collect();
    assert_eq!(
        types,
        vec![
            &json!("countingClip"),
            &json!("countingClip"),
            &json!("countingClip"),
            &json!("countingPhoto"),
            &json!("countingPhoto")
        ]
    );
}

#[test]
fn owned_heterogeneous_resolver() {
    let video = Video::new(1);
    let clip = CountingClip::new(2, &ClassNameProbe::new());
    let rel = RelationshipDescriptor::<Post>::to_many("featured")
        .polymorphic()
        .resolve_with(move |_: &Post, _: &Params| {
            let items: Vec<Box<dyn Resource>> = vec![Box::new(video.clone()), Box::new(clip.clone())];
            Ok(Association::Many(items.into_iter().map(Linked::from).collect()))
        })
        .build()
        .unwrap();
    let out = encode(&rel, &Post::bare(1));
    assert_eq!(
        out["featured"]["data"],
        json!([{"id": "1", "type": "video"}, {"id": "2", "type": "counting_clip"}])
    );
}

#[test]
fn lazy_polymorphic_skips_association_entirely() {
    let rel = RelationshipDescriptor::<Post>::to_many("media")
        .polymorphic()
        .lazy_load_data(true)
        .resolve_with(|_: &Post, _: &Params| panic!("resolver must not run for lazy data"))
        .build()
        .unwrap();
    let out = encode(&rel, &sample_post());
    assert_eq!(out, json!({"media": {}}));
}

#[test]
fn polymorphic_with_record_type_is_rejected() {
    let err = RelationshipDescriptor::<Post>::to_many("media")
        .polymorphic()
        .record_type("media")
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::PolymorphicRecordType { ref relationship } if relationship == "media"));
}
