//! Auxiliary peripheral definitions: encoders, pointing devices, displays.

use serde::{Deserialize, Serialize};

/// Default detents per encoder revolution when the source does not say.
pub const DEFAULT_ENCODER_STEPS: u16 = 20;

/// Default pointing-device kind.
pub const DEFAULT_TRACKBALL_KIND: &str = "trackball";

/// Default pointing-device sensitivity multiplier.
pub const DEFAULT_TRACKBALL_SENSITIVITY: f32 = 1.0;

/// Default display kind.
pub const DEFAULT_DISPLAY_KIND: &str = "oled";

/// Default display pixel width.
pub const DEFAULT_DISPLAY_WIDTH: u32 = 128;

/// Default display pixel height.
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 32;

/// A rotary encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSpec {
    /// Stable identity, dense from 0.
    pub id: usize,
    /// Human-readable name.
    pub name: String,
    /// Pin assignments, verbatim from the source.
    #[serde(default)]
    pub pins: Vec<String>,
    /// Detents per revolution.
    #[serde(default = "default_encoder_steps")]
    pub steps: u16,
}

fn default_encoder_steps() -> u16 {
    DEFAULT_ENCODER_STEPS
}

/// A pointing device (trackball, trackpad, touchpad).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackballSpec {
    /// Stable identity, dense from 0.
    pub id: usize,
    /// Human-readable name.
    pub name: String,
    /// Device kind as declared by the source.
    #[serde(rename = "type", default = "default_trackball_kind")]
    pub kind: String,
    /// Cursor sensitivity multiplier.
    #[serde(default = "default_trackball_sensitivity")]
    pub sensitivity: f32,
}

fn default_trackball_kind() -> String {
    DEFAULT_TRACKBALL_KIND.to_string()
}

fn default_trackball_sensitivity() -> f32 {
    DEFAULT_TRACKBALL_SENSITIVITY
}

/// An onboard display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySpec {
    /// Stable identity, dense from 0.
    pub id: usize,
    /// Human-readable name.
    pub name: String,
    /// Display kind as declared by the source.
    #[serde(rename = "type", default = "default_display_kind")]
    pub kind: String,
    /// Pixel width.
    #[serde(default = "default_display_width")]
    pub width: u32,
    /// Pixel height.
    #[serde(default = "default_display_height")]
    pub height: u32,
}

fn default_display_kind() -> String {
    DEFAULT_DISPLAY_KIND.to_string()
}

fn default_display_width() -> u32 {
    DEFAULT_DISPLAY_WIDTH
}

fn default_display_height() -> u32 {
    DEFAULT_DISPLAY_HEIGHT
}
