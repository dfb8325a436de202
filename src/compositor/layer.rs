use std::{fmt, str::FromStr};

/// The fixed, totally ordered set of render buckets.
///
/// Declaration order is render order: `BgFar` is painted first and
/// `UiButtons` last, independent of the order entities were added.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerName {
    /// Far background.
    BgFar,
    /// Near background.
    BgNear,
    /// Video and full-frame imagery.
    VideoImage,
    /// Vector shapes.
    Shapes,
    /// Image-backed sprites.
    Sprites,
    /// Text.
    Text,
    /// Interactive buttons, always on top.
    UiButtons,
}

impl LayerName {
    /// Number of layers.
    pub const COUNT: usize = 7;

    /// All layers in render order.
    pub const ALL: [LayerName; Self::COUNT] = [
        Self::BgFar,
        Self::BgNear,
        Self::VideoImage,
        Self::Shapes,
        Self::Sprites,
        Self::Text,
        Self::UiButtons,
    ];

    /// Position in render order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Document spelling of the layer name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BgFar => "BG_FAR",
            Self::BgNear => "BG_NEAR",
            Self::VideoImage => "VIDEO_IMAGE",
            Self::Shapes => "SHAPES",
            Self::Sprites => "SPRITES",
            Self::Text => "TEXT",
            Self::UiButtons => "UI_BUTTONS",
        }
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownLayer(pub String);

impl fmt::Display for UnknownLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown layer \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownLayer {}

impl FromStr for LayerName {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownLayer(s.to_owned()))
    }
}
