//! Structured config extractor.
//!
//! Deserializes JSON keyboard configs into a tolerant document mirror and
//! resolves the normalized model from it. Every field of the document is
//! optional; a missing field falls back to a default instead of failing.
//! The only failure this extractor can produce is
//! [`DescriptorError::InvalidDocument`], raised when the document itself
//! cannot be deserialized.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::constants::{DEFAULT_FLAT_KEY_COUNT, DEFAULT_SPLIT_KEY_COUNT, GRID_MARGIN, PIXEL_UNIT, SPLIT_NAME_FRAGMENTS};
use crate::error::DescriptorError;
use crate::geometry::{self, UnitKey};
use crate::models::peripherals::{
    DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_KIND, DEFAULT_DISPLAY_WIDTH, DEFAULT_ENCODER_STEPS,
    DEFAULT_TRACKBALL_KIND, DEFAULT_TRACKBALL_SENSITIVITY,
};
use crate::models::{
    DisplaySpec, EncoderSpec, FirmwareDescriptor, FirmwareType, KeyHalf, KeySpec, KeyboardModel,
    LayerSpec, LayoutFamily, ModelMetadata, TrackballSpec,
};

/// Split sub-config fields that imply a two-half electrical topology.
const SPLIT_TOPOLOGY_FIELDS: [&str; 4] = ["handedness", "main", "soft_serial_pin", "serial_pin"];

/// Structured descriptor document (simplified for our needs).
///
/// Unknown fields are ignored; known fields with incompatible shapes fail
/// the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigDoc {
    /// QMK-style keyboard name (also a QMK marker).
    pub keyboard_name: Option<String>,
    /// Keyboard name, generic form. A name source, not a firmware marker.
    pub keyboard: Option<String>,
    /// Plain name field.
    pub name: Option<String>,
    /// QMK layout alias table (marker only).
    pub layout_aliases: Option<Value>,
    /// QMK marker flag or block.
    pub qmk: Option<Value>,
    /// ZMK behaviors block (marker only).
    pub behaviors: Option<Value>,
    /// ZMK keymap block (marker only).
    pub keymap: Option<Value>,
    /// ZMK marker flag or block.
    pub zmk: Option<Value>,
    /// Split declaration, either a bare flag or a sub-config object.
    pub split: Option<SplitField>,
    /// Selected layout: a family name or an inline definition.
    pub layout: Option<LayoutField>,
    /// Named layout definitions, ordered by name.
    pub layouts: Option<BTreeMap<String, NamedLayout>>,
    /// Electrical matrix dimensions.
    pub matrix: Option<MatrixField>,
    /// Explicit key list.
    pub keys: Option<Vec<KeyEntry>>,
    /// Rotary encoders.
    pub encoders: Option<Vec<EncoderEntry>>,
    /// Pointing devices.
    pub trackballs: Option<Vec<TrackballEntry>>,
    /// Onboard displays.
    pub displays: Option<Vec<DisplayEntry>>,
    /// Keymap layers.
    pub layers: Option<Vec<LayerEntry>>,
    /// Declared version (string or number).
    pub version: Option<Value>,
    /// Declared author.
    pub author: Option<String>,
    /// Declared description.
    pub description: Option<String>,
}

/// Split declaration: either a bare flag or a sub-config object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SplitField {
    /// `"split": true`
    Flag(bool),
    /// `"split": { "enabled": true, ... }`
    Config(Value),
}

impl SplitField {
    /// True when the field explicitly enables split operation.
    fn enables_split(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Config(value) => value.get("enabled").and_then(Value::as_bool) == Some(true),
        }
    }

    /// True when the sub-config carries handedness or link-pin fields.
    fn has_half_topology(&self) -> bool {
        match self {
            Self::Flag(_) => false,
            Self::Config(value) => SPLIT_TOPOLOGY_FIELDS
                .iter()
                .any(|field| value.get(field).is_some()),
        }
    }

    /// The raw declaration, preserved for model metadata.
    fn raw(&self) -> Value {
        match self {
            Self::Flag(flag) => Value::Bool(*flag),
            Self::Config(value) => value.clone(),
        }
    }
}

/// Layout selector: a family name or an inline definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayoutField {
    /// Family or variant name, e.g. `"layout": "split_3x6_3"`.
    Name(String),
    /// Inline definition with its own key list.
    Definition(LayoutDefinition),
}

/// Inline layout definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayoutDefinition {
    /// Key objects, same shape as the explicit top-level key list.
    pub keys: Vec<KeyEntry>,
}

/// Named layout definition from a `layouts` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedLayout {
    /// Coordinate-based key positions in keyboard units.
    pub layout: Vec<KeyPositionEntry>,
}

/// Coordinate-based key position in keyboard units.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyPositionEntry {
    /// X position in keyboard units.
    #[serde(default)]
    pub x: f32,
    /// Y position in keyboard units.
    #[serde(default)]
    pub y: f32,
    /// Matrix position `[row, col]`.
    pub matrix: Option<[u8; 2]>,
    /// Width in keyboard units (default 1.0).
    #[serde(default = "default_unit_size")]
    pub w: f32,
    /// Height in keyboard units (default 1.0).
    #[serde(default = "default_unit_size")]
    pub h: f32,
}

fn default_unit_size() -> f32 {
    1.0
}

impl KeyPositionEntry {
    fn to_unit_key(&self) -> UnitKey {
        UnitKey {
            x: self.x,
            y: self.y,
            matrix: self.matrix,
            w: self.w,
            h: self.h,
        }
    }
}

/// Electrical matrix dimensions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatrixField {
    /// Row count.
    pub rows: Option<u32>,
    /// Column count.
    pub cols: Option<u32>,
}

impl MatrixField {
    /// Total key count, when both dimensions are present and non-zero.
    fn key_count(&self) -> Option<usize> {
        let rows = self.rows? as usize;
        let cols = self.cols? as usize;
        (rows > 0 && cols > 0).then_some(rows * cols)
    }
}

/// Key object from an explicit key list. Pixel-space fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyEntry {
    /// Matrix row.
    pub row: Option<u8>,
    /// Matrix column.
    pub col: Option<u8>,
    /// Pixel X position.
    pub x: Option<f32>,
    /// Pixel Y position.
    pub y: Option<f32>,
    /// Pixel width.
    pub width: Option<f32>,
    /// Pixel height.
    pub height: Option<f32>,
    /// Bound keycode.
    pub keycode: Option<String>,
    /// Split half, "left" or "right".
    pub half: Option<String>,
}

/// Encoder object from the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EncoderEntry {
    /// Human-readable name.
    pub name: Option<String>,
    /// Pin assignments.
    pub pins: Option<Vec<String>>,
    /// Detents per revolution.
    pub steps: Option<u16>,
}

/// Pointing-device object from the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackballEntry {
    /// Human-readable name.
    pub name: Option<String>,
    /// Device kind.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Cursor sensitivity multiplier.
    pub sensitivity: Option<f32>,
}

/// Display object from the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayEntry {
    /// Human-readable name.
    pub name: Option<String>,
    /// Display kind.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Pixel width.
    pub width: Option<u32>,
    /// Pixel height.
    pub height: Option<u32>,
}

/// Layer object from the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayerEntry {
    /// Layer name.
    pub name: Option<String>,
    /// Keycodes in key order.
    pub keycodes: Option<Vec<String>>,
}

/// Extracts a keyboard model from structured config content.
///
/// # Errors
///
/// Fails only when the document cannot be deserialized; the error chain
/// then carries [`DescriptorError::InvalidDocument`].
pub fn extract(descriptor: &FirmwareDescriptor) -> Result<KeyboardModel> {
    let text = descriptor.text().unwrap_or_default();
    let doc: ConfigDoc = serde_json::from_str(text).map_err(DescriptorError::InvalidDocument)?;

    let firmware = detect_firmware_type(&doc);
    let name = resolve_name(&doc, descriptor);
    let is_split = detect_split_keyboard(&doc);
    debug!(%name, %firmware, is_split, "extracted structured config");

    let (keys, layout) = resolve_keys(&doc, is_split);

    let metadata = ModelMetadata {
        version: doc.version.as_ref().and_then(scalar_to_string),
        author: doc.author.clone(),
        description: doc.description.clone(),
        is_split,
        split_config: doc.split.as_ref().map(SplitField::raw),
        note: None,
    };

    Ok(KeyboardModel {
        firmware,
        name,
        layout,
        keys,
        encoders: convert_encoders(doc.encoders.as_deref().unwrap_or_default()),
        trackballs: convert_trackballs(doc.trackballs.as_deref().unwrap_or_default()),
        displays: convert_displays(doc.displays.as_deref().unwrap_or_default()),
        layers: convert_layers(doc.layers.as_deref().unwrap_or_default()),
        metadata,
    })
}

/// Infers the firmware flavor from marker fields.
///
/// ZMK markers win over QMK markers; a document with neither is Generic.
/// A plain `keyboard` field is a name source, not a marker.
#[must_use]
pub fn detect_firmware_type(doc: &ConfigDoc) -> FirmwareType {
    if doc.behaviors.is_some() || doc.keymap.is_some() || doc.zmk.is_some() {
        FirmwareType::Zmk
    } else if doc.keyboard_name.is_some() || doc.layout_aliases.is_some() || doc.qmk.is_some() {
        FirmwareType::Qmk
    } else {
        FirmwareType::Generic
    }
}

/// Detects a split design from the ordered signals.
///
/// First match wins: the explicit flag, half-topology fields in the split
/// sub-config, a layout name mentioning a split shape, a named layout
/// mentioning split, or a keyboard name matching a known split design.
/// With no signal at all the keyboard is not split.
#[must_use]
pub fn detect_split_keyboard(doc: &ConfigDoc) -> bool {
    if let Some(split) = &doc.split {
        if split.enables_split() {
            debug!("split signal: explicit flag");
            return true;
        }
        if split.has_half_topology() {
            debug!("split signal: half topology fields");
            return true;
        }
    }

    if let Some(LayoutField::Name(layout_name)) = &doc.layout {
        if name_implies_split(layout_name) {
            debug!(layout = %layout_name, "split signal: layout name");
            return true;
        }
    }

    if let Some(layouts) = &doc.layouts {
        if layouts.keys().any(|name| name.to_lowercase().contains("split")) {
            debug!("split signal: named layout");
            return true;
        }
    }

    let named_split = [&doc.keyboard_name, &doc.keyboard, &doc.name]
        .into_iter()
        .flatten()
        .any(|name| name_implies_split(name));
    if named_split {
        debug!("split signal: keyboard name");
    }
    named_split
}

/// True when a name mentions "split" or a known split-family keyboard.
fn name_implies_split(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("split")
        || SPLIT_NAME_FRAGMENTS
            .iter()
            .any(|fragment| lowered.contains(fragment))
}

/// Resolves the keyboard name: the first non-empty name field, then the
/// file stem.
fn resolve_name(doc: &ConfigDoc, descriptor: &FirmwareDescriptor) -> String {
    [&doc.keyboard_name, &doc.keyboard, &doc.name]
        .into_iter()
        .flatten()
        .map(|name| name.trim())
        .find(|name| !name.is_empty())
        .map_or_else(|| descriptor.stem().to_string(), str::to_string)
}

/// Resolves keys from the first available source.
///
/// Order: the explicit key list, the inline layout definition, the first
/// named layout (coordinate synthesis), matrix dimensions (grid synthesis),
/// then the placeholder default. Empty lists count as unavailable. Grid
/// synthesis also decides the layout family; the other sources leave it to
/// the final inference pass.
fn resolve_keys(doc: &ConfigDoc, is_split: bool) -> (Vec<KeySpec>, Option<LayoutFamily>) {
    if let Some(entries) = &doc.keys {
        if !entries.is_empty() {
            return (convert_key_entries(entries), None);
        }
    }

    if let Some(LayoutField::Definition(definition)) = &doc.layout {
        if !definition.keys.is_empty() {
            return (convert_key_entries(&definition.keys), None);
        }
    }

    if let Some(layouts) = &doc.layouts {
        if let Some((layout_name, named)) = layouts.iter().find(|(_, named)| !named.layout.is_empty())
        {
            debug!(layout = %layout_name, "synthesizing keys from named layout");
            let units: Vec<UnitKey> = named
                .layout
                .iter()
                .map(KeyPositionEntry::to_unit_key)
                .collect();
            return (geometry::from_coordinates(&units, is_split), None);
        }
    }

    if let Some(count) = doc.matrix.as_ref().and_then(MatrixField::key_count) {
        debug!(count, is_split, "synthesizing keys from matrix dimensions");
        let (keys, family) = if is_split {
            geometry::split_grid(count)
        } else {
            geometry::flat_grid(count)
        };
        return (keys, Some(family));
    }

    debug!(is_split, "no key source; synthesizing placeholder grid");
    let (keys, family) = if is_split {
        geometry::split_grid(DEFAULT_SPLIT_KEY_COUNT)
    } else {
        geometry::flat_grid(DEFAULT_FLAT_KEY_COUNT)
    };
    (keys, Some(family))
}

/// Converts explicit key objects, filling defaults per key.
///
/// Missing pixel positions are derived from the matrix position so keys
/// without geometry still land on a plausible grid.
fn convert_key_entries(entries: &[KeyEntry]) -> Vec<KeySpec> {
    entries
        .iter()
        .enumerate()
        .map(|(id, entry)| {
            let row = entry.row.unwrap_or(0);
            let col = entry.col.unwrap_or(0);
            let mut key = KeySpec::new(
                id,
                row,
                col,
                entry
                    .x
                    .unwrap_or(f32::from(col) * PIXEL_UNIT + GRID_MARGIN),
                entry
                    .y
                    .unwrap_or(f32::from(row) * PIXEL_UNIT + GRID_MARGIN),
            );
            if let Some(width) = entry.width {
                key.width = width;
            }
            if let Some(height) = entry.height {
                key.height = height;
            }
            if let Some(keycode) = &entry.keycode {
                key.keycode = keycode.clone();
            }
            key.half = entry.half.as_deref().and_then(parse_half);
            key
        })
        .collect()
}

/// Parses a half name, case-insensitively.
fn parse_half(name: &str) -> Option<KeyHalf> {
    match name.to_lowercase().as_str() {
        "left" => Some(KeyHalf::Left),
        "right" => Some(KeyHalf::Right),
        _ => None,
    }
}

fn convert_encoders(entries: &[EncoderEntry]) -> Vec<EncoderSpec> {
    entries
        .iter()
        .enumerate()
        .map(|(id, entry)| EncoderSpec {
            id,
            name: entry
                .name
                .clone()
                .unwrap_or_else(|| format!("Encoder {}", id + 1)),
            pins: entry.pins.clone().unwrap_or_default(),
            steps: entry.steps.unwrap_or(DEFAULT_ENCODER_STEPS),
        })
        .collect()
}

fn convert_trackballs(entries: &[TrackballEntry]) -> Vec<TrackballSpec> {
    entries
        .iter()
        .enumerate()
        .map(|(id, entry)| TrackballSpec {
            id,
            name: entry
                .name
                .clone()
                .unwrap_or_else(|| format!("Trackball {}", id + 1)),
            kind: entry
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_TRACKBALL_KIND.to_string()),
            sensitivity: entry.sensitivity.unwrap_or(DEFAULT_TRACKBALL_SENSITIVITY),
        })
        .collect()
}

fn convert_displays(entries: &[DisplayEntry]) -> Vec<DisplaySpec> {
    entries
        .iter()
        .enumerate()
        .map(|(id, entry)| DisplaySpec {
            id,
            name: entry
                .name
                .clone()
                .unwrap_or_else(|| format!("Display {}", id + 1)),
            kind: entry
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_DISPLAY_KIND.to_string()),
            width: entry.width.unwrap_or(DEFAULT_DISPLAY_WIDTH),
            height: entry.height.unwrap_or(DEFAULT_DISPLAY_HEIGHT),
        })
        .collect()
}

fn convert_layers(entries: &[LayerEntry]) -> Vec<LayerSpec> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            LayerSpec::new(
                entry
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Layer {}", idx + 1)),
                entry.keycodes.clone().unwrap_or_default(),
            )
        })
        .collect()
}

/// Stringifies a scalar JSON value; non-scalars yield nothing.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
