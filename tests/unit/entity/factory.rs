use super::*;
use crate::assets::store::{ImageData, MemoryAssets};

fn entry(json: &str) -> EntityEntry {
    serde_json::from_str(json).unwrap()
}

fn build(json: &str) -> Entity {
    entry(json).spec().unwrap().build(&MemoryAssets::new())
}

#[test]
fn shape_defaults_to_filled_100_square() {
    let e = build(r#"{"type":"shape"}"#);
    assert_eq!(e.visual.position, Point::ZERO);
    assert_eq!(e.visual.size, Size::new(100.0, 100.0));
    assert_eq!(e.visual.opacity, 1.0);
    assert!(e.visual.visible);
    match e.kind {
        EntityKind::Shape(s) => {
            assert_eq!(s.primitive, Primitive::Rect);
            assert!(s.fill);
            assert_eq!(s.stroke_width, 1.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn circle_and_unknown_primitive() {
    let e = build(r##"{"type":"shape","shape":"circle","radius":10,"color":"#ff0000","fill":false}"##);
    assert_eq!(e.visual.color, Rgba8::rgb(255, 0, 0));
    assert_eq!(e.visual.size, Size::new(20.0, 20.0));
    assert!(matches!(
        e.kind,
        EntityKind::Shape(Shape {
            primitive: Primitive::Circle { radius },
            fill: false,
            ..
        }) if radius == 10.0
    ));

    let e = build(r#"{"type":"shape","shape":"hexagon"}"#);
    assert!(matches!(
        e.kind,
        EntityKind::Shape(Shape {
            primitive: Primitive::Rect,
            ..
        })
    ));
}

#[test]
fn button_defaults_and_action() {
    let e = build(
        r#"{"type":"button","x":10,"y":20,"text":"Next",
            "onClick":{"action":"switchState","target":"B"},"id":"next"}"#,
    );
    assert_eq!(e.id.as_deref(), Some("next"));
    assert_eq!(e.visual.size, Size::new(200.0, 50.0));
    assert_eq!(e.visual.color, DEFAULT_BUTTON_COLOR);
    assert!(e.is_clickable());
    assert_eq!(
        e.action(),
        Some(&Action::SwitchState {
            target: "B".to_owned()
        })
    );
    match e.kind {
        EntityKind::Button(b) => {
            assert_eq!(b.label, "Next");
            assert_eq!(b.text_color, Rgba8::WHITE);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn text_fields() {
    let e = build(
        r#"{"type":"text","content":"Hello","x":5,"y":6,"font":"bold 32px serif",
            "color":"yellow","textAlign":"center","alpha":0.5,"visible":false}"#,
    );
    assert_eq!(e.visual.position, Point::new(5.0, 6.0));
    assert_eq!(e.visual.opacity, 0.5);
    assert!(!e.visual.visible);
    assert_eq!(e.visual.color, Rgba8::rgb(255, 255, 0));
    match e.kind {
        EntityKind::Text(t) => {
            assert_eq!(t.content, "Hello");
            assert_eq!(t.style.size_px, 32.0);
            assert_eq!(t.style.align, TextAlign::Center);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn bad_color_falls_back_to_default() {
    let e = build(r#"{"type":"text","content":"x","color":"not-a-color"}"#);
    assert_eq!(e.visual.color, Rgba8::WHITE);
}

#[test]
fn sprite_uses_image_size_or_default() {
    let mut assets = MemoryAssets::new();
    assets.insert_image("hero", ImageData::solid(32, 16, Rgba8::BLACK));

    let e = entry(r#"{"type":"sprite","assetId":"hero","scaleX":2}"#)
        .spec()
        .unwrap()
        .build(&assets);
    assert_eq!(e.visual.size, Size::new(32.0, 16.0));
    assert_eq!(e.visual.scale, Vec2::new(2.0, 1.0));
    assert!(matches!(&e.kind, EntityKind::Sprite(s) if s.image.is_some()));

    let e = entry(r#"{"type":"sprite","assetId":"hero","width":64}"#)
        .spec()
        .unwrap()
        .build(&assets);
    assert_eq!(e.visual.size, Size::new(64.0, 16.0));
}

#[test]
fn missing_sprite_image_keeps_entity() {
    let e = build(r#"{"type":"sprite","assetId":"ghost","x":3}"#);
    assert_eq!(e.visual.size, Size::new(100.0, 100.0));
    assert_eq!(e.visual.position.x, 3.0);
    match &e.kind {
        EntityKind::Sprite(s) => {
            assert!(s.image.is_none());
            assert_eq!(s.asset_id.as_deref(), Some("ghost"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_and_invalid_entries_are_reported() {
    let issue = entry(r#"{"type":"video","src":"x.mp4"}"#).spec().unwrap_err();
    assert_eq!(issue, EntityIssue::UnknownKind(Some("video".to_owned())));

    let issue = entry(r#"{"x":1}"#).spec().unwrap_err();
    assert_eq!(issue, EntityIssue::UnknownKind(None));
    assert_eq!(issue.to_string(), "entity config has no type");

    let issue = entry(r#"{"type":"text","content":42}"#).spec().unwrap_err();
    assert!(matches!(issue, EntityIssue::Invalid { ref kind, .. } if kind == "text"));
}

#[test]
fn spec_accessors() {
    let e = entry(r#"{"type":"text","id":"title","animation":{"type":"fadeIn","duration":2}}"#);
    let spec = e.spec().unwrap();
    assert_eq!(spec.kind_name(), "text");
    assert_eq!(spec.id(), Some("title"));
    assert_eq!(spec.animation().map(|a| a.duration), Some(2.0));
    assert!(spec.action().is_none());
}

#[test]
fn unknown_animation_type_is_not_attached() {
    let spec: AnimationSpec = serde_json::from_str(r#"{"type":"spin"}"#).unwrap();
    assert!(checked_animation(&spec).is_none());

    let spec: AnimationSpec = serde_json::from_str(r#"{"type":"pulse","easing":"bouncy"}"#).unwrap();
    assert_eq!(checked_animation(&spec).map(|s| s.kind), Some(AnimationKind::Pulse));
}

#[test]
fn non_color_values_fall_back_to_kind_default() {
    let e = build(r#"{"type":"text","content":"x","color":16711680}"#);
    assert_eq!(e.visual.color, Rgba8::WHITE);

    let e = build(r#"{"type":"button","text":"Go","color":{"r":1}}"#);
    assert_eq!(e.visual.color, DEFAULT_BUTTON_COLOR);
}

#[test]
fn malformed_on_click_keeps_the_button() {
    let e = build(r#"{"type":"button","text":"Go","onClick":{"action":"switchState"}}"#);
    assert!(e.is_clickable());
    assert_eq!(e.visual.size, Size::new(200.0, 50.0));
    assert_eq!(e.action(), Some(&Action::Unrecognized));

    let e = build(r#"{"type":"button","onClick":"switchState"}"#);
    assert_eq!(e.action(), Some(&Action::Unrecognized));

    let e = build(r#"{"type":"button","onClick":null}"#);
    assert_eq!(e.action(), None);
}

#[test]
fn malformed_animation_keeps_the_entity_unanimated() {
    let e = entry(
        r#"{"type":"text","content":"hi","animation":{"type":"fadeIn","duration":"slow"}}"#,
    );
    let spec = e.spec().unwrap();
    let anim = spec.animation().unwrap();
    assert_eq!(anim.kind, AnimationKind::Unrecognized);
    assert!(checked_animation(anim).is_none());

    let built = spec.build(&MemoryAssets::new());
    assert_eq!(built.visual.opacity, 1.0);
    assert!(matches!(built.kind, EntityKind::Text(ref t) if t.content == "hi"));
}
