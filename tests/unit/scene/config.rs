use super::*;

const DOC: &str = r#"{
    "sceneName": "intro",
    "canvasSize": {"width": 1024, "height": 768},
    "assets": {"images": [{"id": "logo", "src": "img/logo.png"}], "audio": ["sfx/click.wav"]},
    "states": [
        {
            "name": "A",
            "clearLayers": true,
            "layers": {
                "UI_BUTTONS": [{"type": "button", "text": "Go", "onClick": {"action": "switchState", "target": "B"}}],
                "BG_FAR": [{"type": "shape"}],
                "MAIN": [{"type": "text", "content": "lost"}]
            },
            "transition": {"type": "timer", "duration": 2, "nextState": "B"}
        },
        {
            "name": "B",
            "layers": {"TEXT": [{"type": "text", "content": "Done"}]}
        }
    ]
}"#;

#[test]
fn parses_document_and_keeps_layer_order() {
    let config = SceneConfig::from_json(DOC).unwrap();
    assert_eq!(config.scene_name, "intro");
    assert_eq!(config.canvas_size, Some(Canvas::new(1024.0, 768.0)));
    assert_eq!(config.assets.len(), 2);
    assert_eq!(config.states.len(), 2);

    let a = &config.states[0];
    assert!(a.clear_layers);
    let keys: Vec<String> = a.layers.iter().map(|(slot, _)| slot.to_string()).collect();
    assert_eq!(keys, ["UI_BUTTONS", "BG_FAR", "MAIN"]);
    let slots: Vec<&LayerSlot> = a.layers.iter().map(|(slot, _)| slot).collect();
    assert_eq!(slots[0], &LayerSlot::Known(LayerName::UiButtons));
    assert_eq!(slots[2], &LayerSlot::Unknown("MAIN".to_owned()));

    assert_eq!(
        a.transition,
        Some(TransitionSpec::Timer {
            duration: 2.0,
            next_state: Some("B".to_owned()),
            next_scene: None,
        })
    );

    let b = &config.states[1];
    assert!(!b.clear_layers);
    assert!(b.transition.is_none());
    assert_eq!(config.state_index("B"), Some(1));
    assert_eq!(config.state_index("C"), None);
}

#[test]
fn unknown_transition_type_parses() {
    let t: TransitionSpec = serde_json::from_str(r#"{"type":"onKey","key":"space"}"#).unwrap();
    assert_eq!(t, TransitionSpec::Unrecognized);
}

#[test]
fn malformed_document_is_a_config_error() {
    let err = SceneConfig::from_json("{\"states\": 3}").unwrap_err();
    assert!(err.to_string().starts_with("config error:"), "{err}");
}

#[test]
fn layer_table_serializes_in_order() {
    let config = SceneConfig::from_json(DOC).unwrap();
    let json = serde_json::to_string(&config.states[0].layers).unwrap();
    let ui = json.find("UI_BUTTONS").unwrap();
    let bg = json.find("BG_FAR").unwrap();
    let main = json.find("MAIN").unwrap();
    assert!(ui < bg && bg < main);

    let back: LayerTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config.states[0].layers);
}

#[test]
fn lint_reports_unknown_layers_only_for_clean_doc() {
    let config = SceneConfig::from_json(DOC).unwrap();
    assert_eq!(
        config.lint(),
        vec![ConfigIssue::UnknownLayer {
            state: "A".to_owned(),
            layer: "MAIN".to_owned(),
        }]
    );
}

#[test]
fn lint_collects_every_problem() {
    let config = SceneConfig::from_json(
        r#"{"states": [
            {"name": "A", "layers": {"TEXT": [
                {"type": "video"},
                {"type": "text", "id": "t"},
                {"type": "text", "id": "t", "animation": {"type": "spin"}},
                {"type": "button", "onClick": {"action": "teleport"}},
                {"type": "button", "onClick": {"action": "switchState", "target": "Z"}}
            ]}, "transition": {"type": "timer", "duration": 0}},
            {"name": "A", "transition": {"type": "timer", "duration": 1, "nextState": "Q"}},
            {"name": "C", "transition": {"type": "swipe"}}
        ]}"#,
    )
    .unwrap();
    let issues = config.lint();
    let text: Vec<String> = issues.iter().map(ToString::to_string).collect();

    assert!(issues.contains(&ConfigIssue::DuplicateState("A".to_owned())));
    assert!(text.contains(&"state \"A\": TEXT[0]: unknown entity type \"video\"".to_owned()));
    assert!(issues.contains(&ConfigIssue::DuplicateEntityId {
        state: "A".to_owned(),
        id: "t".to_owned()
    }));
    assert!(issues.contains(&ConfigIssue::UnknownAnimation {
        state: "A".to_owned(),
        entity: "t".to_owned()
    }));
    assert!(issues.contains(&ConfigIssue::UnknownAction {
        state: "A".to_owned(),
        entity: "TEXT[3]".to_owned()
    }));
    assert!(issues.contains(&ConfigIssue::DanglingState {
        state: "A".to_owned(),
        target: "Z".to_owned()
    }));
    assert!(issues.contains(&ConfigIssue::NonPositiveDuration("A".to_owned())));
    assert!(issues.contains(&ConfigIssue::TransitionWithoutTarget("A".to_owned())));
    assert!(issues.contains(&ConfigIssue::DanglingState {
        state: "A".to_owned(),
        target: "Q".to_owned()
    }));
    assert!(issues.contains(&ConfigIssue::UnknownTransition("C".to_owned())));
}

#[test]
fn empty_document_lints_no_states() {
    let config = SceneConfig::from_json("{}").unwrap();
    assert_eq!(config.lint(), vec![ConfigIssue::NoStates]);
}

#[test]
fn fallback_scene_is_clean_and_shows_message() {
    let config = SceneConfig::fallback("broken", "expected value at line 1");
    assert_eq!(config.scene_name, "broken");
    assert!(config.lint().is_empty());
    let state = &config.states[0];
    assert!(state.clear_layers);
    let (_, texts) = state
        .layers
        .iter()
        .find(|(slot, _)| **slot == LayerSlot::Known(LayerName::Text))
        .unwrap();
    let contents: Vec<&str> = texts
        .iter()
        .filter_map(|e| match e.spec() {
            Ok(EntitySpec::Text(t)) => Some(t.content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(contents, ["Scene failed to load", "expected value at line 1"]);
}

#[test]
fn non_object_documents_are_rejected() {
    for doc in ["[]", r#"["x"]"#, "3", r#""scene""#, "null", "{} {}"] {
        let err = SceneConfig::from_json(doc).unwrap_err();
        assert!(err.to_string().starts_with("config error:"), "{doc}: {err}");
    }
    assert!(SceneConfig::from_json(" {} ").is_ok());
}

#[test]
fn malformed_nested_fields_are_linted_not_fatal() {
    let config = SceneConfig::from_json(
        r#"{"states": [{"name": "A", "layers": {"UI_BUTTONS": [
            {"type": "button", "id": "go", "onClick": {"action": "switchState"}},
            {"type": "button", "id": "fade", "animation": {"type": "fadeIn", "delay": "soon"}}
        ]}}]}"#,
    )
    .unwrap();
    assert_eq!(
        config.lint(),
        vec![
            ConfigIssue::UnknownAction {
                state: "A".to_owned(),
                entity: "go".to_owned(),
            },
            ConfigIssue::UnknownAnimation {
                state: "A".to_owned(),
                entity: "fade".to_owned(),
            },
        ]
    );
}
