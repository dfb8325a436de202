//! Scene document model.

use std::{collections::HashSet, fmt, path::Path};

use serde::{
    Deserialize, Serialize,
    de::{MapAccess, Visitor, value::MapAccessDeserializer},
    ser::SerializeMap,
};

use crate::{
    animation::engine::AnimationKind,
    assets::store::AssetManifest,
    compositor::layer::LayerName,
    entity::factory::{EntityEntry, EntityIssue, EntitySpec, ShapeKind, ShapeSpec, TextSpec},
    foundation::{
        color::ColorSpec,
        core::Canvas,
        error::{StageError, StageResult},
    },
    render::surface::{TextAlign, TextStyle},
    scene::action::Action,
};

/// Top-level scene document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    /// Name the scene registers under.
    #[serde(default)]
    pub scene_name: String,
    /// Target canvas; the host's canvas wins when one is bound.
    #[serde(default)]
    pub canvas_size: Option<Canvas>,
    /// Assets preloaded on enter.
    #[serde(default)]
    pub assets: AssetManifest,
    /// States in activation order; state 0 is entered first.
    #[serde(default)]
    pub states: Vec<StateConfig>,
}

/// One named configuration of layer contents.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateConfig {
    /// State name, unique within the scene.
    pub name: String,
    /// Clear the compositor and drop tracked entities before populating.
    #[serde(default)]
    pub clear_layers: bool,
    /// Entities per layer, in document order.
    #[serde(default)]
    pub layers: LayerTable,
    /// Rule that moves on from this state.
    #[serde(default)]
    pub transition: Option<TransitionSpec>,
}

/// How a state ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransitionSpec {
    /// Fire once the state timer reaches `duration` seconds.
    Timer {
        /// Seconds.
        #[serde(default)]
        duration: f64,
        /// State of the same scene to activate.
        #[serde(default, rename = "nextState", skip_serializing_if = "Option::is_none")]
        next_state: Option<String>,
        /// Scene to switch to; wins over `next_state`.
        #[serde(default, rename = "nextScene", skip_serializing_if = "Option::is_none")]
        next_scene: Option<String>,
    },
    /// Any other transition type. Never fires.
    #[serde(other)]
    Unrecognized,
}

/// Layer key as written in the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerSlot {
    /// One of the seven layers.
    Known(LayerName),
    /// Anything else; its entities are skipped.
    Unknown(String),
}

impl LayerSlot {
    /// Classify a document key.
    pub fn parse(key: &str) -> Self {
        match key.parse::<LayerName>() {
            Ok(layer) => Self::Known(layer),
            Err(_) => Self::Unknown(key.to_owned()),
        }
    }

    /// Key as written.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(layer) => layer.as_str(),
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for LayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `layers` object of a state, keeping the document's key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerTable {
    entries: Vec<(LayerSlot, Vec<EntityEntry>)>,
}

impl LayerTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer key with its entities.
    pub fn push(&mut self, slot: LayerSlot, entities: Vec<EntityEntry>) {
        self.entries.push((slot, entities));
    }

    /// Builder form of [`Self::push`] for a known layer.
    pub fn with(mut self, layer: LayerName, entities: Vec<EntityEntry>) -> Self {
        self.push(LayerSlot::Known(layer), entities);
        self
    }

    /// Layer keys and their entities in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&LayerSlot, &[EntityEntry])> {
        self.entries.iter().map(|(slot, list)| (slot, list.as_slice()))
    }

    /// Number of layer keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LayerTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (slot, list) in &self.entries {
            map.serialize_entry(slot.as_str(), list)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LayerTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = LayerTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from layer name to a list of entity configs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LayerTable, A::Error> {
                let mut table = LayerTable::new();
                while let Some((key, list)) = map.next_entry::<String, Vec<EntityEntry>>()? {
                    table.push(LayerSlot::parse(&key), list);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Non-fatal finding reported by [`SceneConfig::lint`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigIssue {
    /// Document declares no states.
    NoStates,
    /// Two states share a name; only the first is reachable by name.
    DuplicateState(String),
    /// Layer key outside the fixed set.
    UnknownLayer {
        /// State.
        state: String,
        /// Key as written.
        layer: String,
    },
    /// Entry that builds no entity.
    Entity {
        /// State.
        state: String,
        /// Layer key.
        layer: String,
        /// Position in the layer list.
        index: usize,
        /// Reason.
        issue: EntityIssue,
    },
    /// Animation whose type is unknown or whose fields did not parse.
    UnknownAnimation {
        /// State.
        state: String,
        /// Entity id or list position.
        entity: String,
    },
    /// Click action whose tag is unknown or whose fields did not parse.
    UnknownAction {
        /// State.
        state: String,
        /// Entity id or list position.
        entity: String,
    },
    /// Two entities of one state share an id; the later one wins lookups.
    DuplicateEntityId {
        /// State.
        state: String,
        /// Id.
        id: String,
    },
    /// `nextState` or `switchState` names no state.
    DanglingState {
        /// State holding the reference.
        state: String,
        /// Missing target.
        target: String,
    },
    /// Timer with neither `nextState` nor `nextScene`.
    TransitionWithoutTarget(String),
    /// Transition type other than `timer`.
    UnknownTransition(String),
    /// Timer duration of zero or less fires on the first tick.
    NonPositiveDuration(String),
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStates => f.write_str("scene has no states"),
            Self::DuplicateState(name) => write!(f, "duplicate state name \"{name}\""),
            Self::UnknownLayer { state, layer } => {
                write!(f, "state \"{state}\": unknown layer \"{layer}\"")
            }
            Self::Entity {
                state,
                layer,
                index,
                issue,
            } => write!(f, "state \"{state}\": {layer}[{index}]: {issue}"),
            Self::UnknownAnimation { state, entity } => {
                write!(f, "state \"{state}\": {entity}: unknown or malformed animation")
            }
            Self::UnknownAction { state, entity } => {
                write!(f, "state \"{state}\": {entity}: unknown or malformed click action")
            }
            Self::DuplicateEntityId { state, id } => {
                write!(f, "state \"{state}\": duplicate entity id \"{id}\"")
            }
            Self::DanglingState { state, target } => {
                write!(f, "state \"{state}\": no state named \"{target}\"")
            }
            Self::TransitionWithoutTarget(state) => {
                write!(f, "state \"{state}\": timer transition has no target")
            }
            Self::UnknownTransition(state) => {
                write!(f, "state \"{state}\": unknown transition type")
            }
            Self::NonPositiveDuration(state) => {
                write!(f, "state \"{state}\": timer duration is not positive")
            }
        }
    }
}

impl SceneConfig {
    /// Parse a scene document. The top level must be a JSON object.
    pub fn from_json(json: &str) -> StageResult<Self> {
        struct ObjectOnly;

        impl<'de> Visitor<'de> for ObjectOnly {
            type Value = SceneConfig;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a scene document object")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<SceneConfig, A::Error> {
                SceneConfig::deserialize(MapAccessDeserializer::new(map))
            }
        }

        let invalid = |e: serde_json::Error| StageError::config(format!("scene document: {e}"));
        let mut de = serde_json::Deserializer::from_str(json);
        let config = serde::Deserializer::deserialize_map(&mut de, ObjectOnly).map_err(invalid)?;
        de.end().map_err(invalid)?;
        Ok(config)
    }

    /// Read and parse a scene document from disk.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> StageResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| StageError::config(format!("read '{}': {e}", path.display())))?;
        let config = Self::from_json(&json)?;
        tracing::debug!(scene = %config.scene_name, states = config.states.len(), "scene document loaded");
        Ok(config)
    }

    /// Index of the first state called `name`.
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name == name)
    }

    /// One-state scene that shows `message`. Hosts use it when a document
    /// cannot be loaded.
    pub fn fallback(name: impl Into<String>, message: impl Into<String>) -> Self {
        let canvas = Canvas::default();
        let backdrop = EntitySpec::Shape(ShapeSpec {
            shape: ShapeKind::Rect,
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
            radius: 0.0,
            color: Some(ColorSpec::css("#1a1a1a")),
            fill: true,
            stroke_width: 1.0,
            alpha: 1.0,
            visible: true,
            rotation: 0.0,
            id: None,
            animation: None,
        });
        let text = |content: String, y: f64, color: &str, id: &str| {
            EntitySpec::Text(TextSpec {
                content,
                x: canvas.width / 2.0,
                y,
                font: TextStyle::DEFAULT_FONT.to_owned(),
                color: Some(ColorSpec::css(color)),
                text_align: TextAlign::Center,
                alpha: 1.0,
                visible: true,
                id: Some(id.to_owned()),
                animation: None,
            })
        };
        let layers = LayerTable::new()
            .with(LayerName::BgFar, vec![EntityEntry::Spec(backdrop)])
            .with(
                LayerName::Text,
                vec![
                    EntityEntry::Spec(text(
                        "Scene failed to load".to_owned(),
                        canvas.height / 2.0 - 20.0,
                        "#ff5555",
                        "error-title",
                    )),
                    EntityEntry::Spec(text(
                        message.into(),
                        canvas.height / 2.0 + 20.0,
                        "white",
                        "error-message",
                    )),
                ],
            );

        Self {
            scene_name: name.into(),
            canvas_size: Some(canvas),
            assets: AssetManifest::default(),
            states: vec![StateConfig {
                name: "error".to_owned(),
                clear_layers: true,
                layers,
                transition: None,
            }],
        }
    }

    /// Collect non-fatal problems. Runtime behaviour is unaffected: the
    /// interpreter reports and skips the same things as it meets them.
    pub fn lint(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.states.is_empty() {
            issues.push(ConfigIssue::NoStates);
        }

        let mut names = HashSet::new();
        for state in &self.states {
            if !names.insert(state.name.as_str()) {
                issues.push(ConfigIssue::DuplicateState(state.name.clone()));
            }
        }

        for state in &self.states {
            self.lint_state(state, &mut issues);
        }
        issues
    }

    fn lint_state(&self, state: &StateConfig, issues: &mut Vec<ConfigIssue>) {
        let name = &state.name;
        let mut ids = HashSet::new();

        for (slot, list) in state.layers.iter() {
            if let LayerSlot::Unknown(layer) = slot {
                issues.push(ConfigIssue::UnknownLayer {
                    state: name.clone(),
                    layer: layer.clone(),
                });
                continue;
            }
            for (index, entry) in list.iter().enumerate() {
                let spec = match entry.spec() {
                    Ok(spec) => spec,
                    Err(issue) => {
                        issues.push(ConfigIssue::Entity {
                            state: name.clone(),
                            layer: slot.to_string(),
                            index,
                            issue,
                        });
                        continue;
                    }
                };
                let label = spec
                    .id()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("{slot}[{index}]"));
                if let Some(id) = spec.id()
                    && !ids.insert(id.to_owned())
                {
                    issues.push(ConfigIssue::DuplicateEntityId {
                        state: name.clone(),
                        id: id.to_owned(),
                    });
                }
                if spec
                    .animation()
                    .is_some_and(|a| a.kind == AnimationKind::Unrecognized)
                {
                    issues.push(ConfigIssue::UnknownAnimation {
                        state: name.clone(),
                        entity: label.clone(),
                    });
                }
                match spec.action() {
                    Some(Action::Unrecognized) => issues.push(ConfigIssue::UnknownAction {
                        state: name.clone(),
                        entity: label,
                    }),
                    Some(Action::SwitchState { target }) if self.state_index(target).is_none() => {
                        issues.push(ConfigIssue::DanglingState {
                            state: name.clone(),
                            target: target.clone(),
                        })
                    }
                    _ => {}
                }
            }
        }

        match &state.transition {
            None => {}
            Some(TransitionSpec::Unrecognized) => {
                issues.push(ConfigIssue::UnknownTransition(name.clone()))
            }
            Some(TransitionSpec::Timer {
                duration,
                next_state,
                next_scene,
            }) => {
                if *duration <= 0.0 {
                    issues.push(ConfigIssue::NonPositiveDuration(name.clone()));
                }
                match (next_scene, next_state) {
                    (None, None) => issues.push(ConfigIssue::TransitionWithoutTarget(name.clone())),
                    (None, Some(target)) if self.state_index(target).is_none() => {
                        issues.push(ConfigIssue::DanglingState {
                            state: name.clone(),
                            target: target.clone(),
                        })
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
