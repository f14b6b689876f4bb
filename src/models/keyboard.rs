//! The normalized keyboard model produced by the parsing pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DisplaySpec, EncoderSpec, KeySpec, LayerSpec, LayoutFamily, TrackballSpec};

/// Firmware flavor inferred for a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FirmwareType {
    /// QMK firmware.
    Qmk,
    /// ZMK firmware.
    Zmk,
    /// Recognizable keyboard config without firmware-specific markers.
    Generic,
    /// Nothing recognizable.
    #[default]
    Unknown,
}

impl fmt::Display for FirmwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Qmk => "qmk",
            Self::Zmk => "zmk",
            Self::Generic => "generic",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Free-form metadata carried alongside the spatial model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    /// Declared config or firmware version.
    pub version: Option<String>,
    /// Declared author.
    pub author: Option<String>,
    /// Declared description.
    pub description: Option<String>,
    /// Whether the keyboard was detected as a split design.
    #[serde(default)]
    pub is_split: bool,
    /// Raw split sub-configuration, preserved for collaborators.
    pub split_config: Option<serde_json::Value>,
    /// Extractor note, e.g. the binary fallback explanation.
    pub note: Option<String>,
}

/// Normalized spatial keyboard model.
///
/// One model is produced per parsed descriptor and never mutated by the
/// parsing subsystem afterwards. Collaborators treat the collections as
/// read-only; per-key UI state lives outside the model, keyed by key id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardModel {
    /// Inferred firmware flavor.
    pub firmware: FirmwareType,
    /// Keyboard name.
    pub name: String,
    /// Inferred layout family. `None` only while the model is a draft;
    /// the dispatcher guarantees `Some` on every model it returns.
    pub layout: Option<LayoutFamily>,
    /// Spatial key definitions.
    pub keys: Vec<KeySpec>,
    /// Rotary encoders.
    #[serde(default)]
    pub encoders: Vec<EncoderSpec>,
    /// Pointing devices.
    #[serde(default)]
    pub trackballs: Vec<TrackballSpec>,
    /// Onboard displays.
    #[serde(default)]
    pub displays: Vec<DisplaySpec>,
    /// Keymap layers.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    /// Source metadata.
    #[serde(default)]
    pub metadata: ModelMetadata,
}

impl KeyboardModel {
    /// Creates an empty draft model with the given firmware flavor and name.
    #[must_use]
    pub fn draft(firmware: FirmwareType, name: impl Into<String>) -> Self {
        Self {
            firmware,
            name: name.into(),
            layout: None,
            keys: Vec::new(),
            encoders: Vec::new(),
            trackballs: Vec::new(),
            displays: Vec::new(),
            layers: Vec::new(),
            metadata: ModelMetadata::default(),
        }
    }

    /// Total number of keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// True when any key carries a split-half assignment.
    #[must_use]
    pub fn has_halved_keys(&self) -> bool {
        self.keys.iter().any(|key| key.half.is_some())
    }
}
