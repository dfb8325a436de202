/// What a clicked button does.
///
/// Unknown `action` tags deserialize to [`Action::Unrecognized`], which the
/// interpreter reports and ignores.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Leave this scene for the scene registered as `target`.
    SwitchScene {
        /// Registered scene name.
        target: String,
    },
    /// Activate another state of the same scene.
    SwitchState {
        /// State name.
        target: String,
    },
    /// Play a sound effect through the audio collaborator.
    PlaySound {
        /// Audio id.
        #[serde(alias = "target")]
        sound: String,
    },
    /// Forwarded to the host as a [`crate::StageEvent::Custom`].
    Custom {
        /// Host-defined event name.
        #[serde(default)]
        name: String,
        /// Free-form payload.
        #[serde(default)]
        params: serde_json::Value,
    },
    /// Any other action tag.
    #[serde(other)]
    Unrecognized,
}

impl Action {
    /// Document spelling of the action tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SwitchScene { .. } => "switchScene",
            Self::SwitchState { .. } => "switchState",
            Self::PlaySound { .. } => "playSound",
            Self::Custom { .. } => "custom",
            Self::Unrecognized => "unrecognized",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/action.rs"]
mod tests;
