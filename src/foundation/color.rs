//! Color values as they appear in scene documents.
//!
//! Documents carry canvas-style color strings, so parsing is deferred: a
//! [`ColorSpec`] always deserializes, and [`ColorSpec::resolve`] reports a
//! readable reason when the value is not a color. Callers log that reason
//! and fall back to a default instead of rejecting the whole document.

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;

/// Raw color value from a scene document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(..)`, `rgba(..)` or a named color.
    Css(String),
    /// Normalized channels in `[0, 1]`.
    Object {
        /// Red.
        r: f64,
        /// Green.
        g: f64,
        /// Blue.
        b: f64,
        /// Alpha.
        #[serde(default = "one")]
        a: f64,
    },
    /// `[r, g, b]` or `[r, g, b, a]`, normalized channels.
    Array(Vec<f64>),
    /// Any other JSON value. Never resolves.
    Other(serde_json::Value),
}

fn one() -> f64 {
    1.0
}

impl ColorSpec {
    /// Convenience constructor for CSS-like strings.
    pub fn css(s: impl Into<String>) -> Self {
        Self::Css(s.into())
    }

    /// Resolve to an RGBA8 color.
    pub fn resolve(&self) -> Result<Rgba8, String> {
        match self {
            Self::Css(s) => parse_css(s),
            Self::Object { r, g, b, a } => Ok(from_unit(*r, *g, *b, *a)),
            Self::Array(v) => match v.as_slice() {
                [r, g, b] => Ok(from_unit(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(from_unit(*r, *g, *b, *a)),
                _ => Err("rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])".to_owned()),
            },
            Self::Other(value) => Err(format!("{value} is not a color")),
        }
    }

    /// Resolve, logging and substituting `fallback` when the value is invalid.
    pub fn resolve_or(spec: Option<&ColorSpec>, fallback: Rgba8) -> Rgba8 {
        let Some(spec) = spec else {
            return fallback;
        };
        match spec.resolve() {
            Ok(c) => c,
            Err(reason) => {
                tracing::warn!(?spec, %reason, "unparsable color, using default");
                fallback
            }
        }
    }
}

fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Rgba8 {
    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }
    Rgba8::rgba(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
}

fn parse_css(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        return parse_rgb_fn(args);
    }
    named(&lower).ok_or_else(|| format!("unknown color \"{s}\""))
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }
    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    match s.len() {
        3 => Ok(Rgba8::rgb(
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
        )),
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn parse_rgb_fn(args: &str) -> Result<Rgba8, String> {
    let inner = args
        .strip_suffix(')')
        .ok_or_else(|| "rgb()/rgba() is missing ')'".to_owned())?;
    let parts = inner
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid rgb() component: {e}"))?;
    let channel = |v: f64| v.clamp(0.0, 255.0).round() as u8;
    match parts.as_slice() {
        [r, g, b] => Ok(Rgba8::rgb(channel(*r), channel(*g), channel(*b))),
        [r, g, b, a] => Ok(Rgba8::rgba(
            channel(*r),
            channel(*g),
            channel(*b),
            (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        )),
        _ => Err("rgb() takes 3 components, rgba() takes 4".to_owned()),
    }
}

fn named(name: &str) -> Option<Rgba8> {
    let c = match name {
        "transparent" => Rgba8::TRANSPARENT,
        "black" => Rgba8::BLACK,
        "white" => Rgba8::WHITE,
        "red" => Rgba8::rgb(255, 0, 0),
        "green" => Rgba8::rgb(0, 128, 0),
        "lime" => Rgba8::rgb(0, 255, 0),
        "blue" => Rgba8::rgb(0, 0, 255),
        "yellow" => Rgba8::rgb(255, 255, 0),
        "cyan" | "aqua" => Rgba8::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Rgba8::rgb(255, 0, 255),
        "gray" | "grey" => Rgba8::rgb(128, 128, 128),
        "silver" => Rgba8::rgb(192, 192, 192),
        "maroon" => Rgba8::rgb(128, 0, 0),
        "olive" => Rgba8::rgb(128, 128, 0),
        "teal" => Rgba8::rgb(0, 128, 128),
        "navy" => Rgba8::rgb(0, 0, 128),
        "purple" => Rgba8::rgb(128, 0, 128),
        "orange" => Rgba8::rgb(255, 165, 0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
