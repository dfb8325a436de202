/// Easing curves accepted in animation configs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// Quadratic in: `t²`.
    EaseIn,
    /// Quadratic out: `1 - (1 - t)²`.
    EaseOut,
    /// Quadratic in-out.
    EaseInOut,
    /// Any other name. Behaves like [`Ease::Linear`].
    #[serde(other)]
    Unrecognized,
}

impl Ease {
    /// Map linear progress to eased progress. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::Unrecognized => t,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
