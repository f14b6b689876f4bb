//! Spatial key definitions.

use serde::{Deserialize, Serialize};

use crate::constants::{KEY_BOX, PLACEHOLDER_KEYCODE};

/// Which half of a split keyboard a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyHalf {
    /// Left-hand half.
    Left,
    /// Right-hand half.
    Right,
}

/// A single key with matrix coordinates and pixel geometry.
///
/// Ids are dense and unique from 0 in source order; pixel positions are
/// never negative. Synthesized split geometry assigns a half to every key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Stable identity, dense from 0.
    pub id: usize,
    /// Electrical matrix row.
    pub row: u8,
    /// Electrical matrix column.
    pub col: u8,
    /// Pixel X position of the key box.
    pub x: f32,
    /// Pixel Y position of the key box.
    pub y: f32,
    /// Pixel width of the key box.
    pub width: f32,
    /// Pixel height of the key box.
    pub height: f32,
    /// Bound keycode, or the placeholder when unknown.
    #[serde(default = "default_keycode")]
    pub keycode: String,
    /// Split half assignment, when known.
    #[serde(default)]
    pub half: Option<KeyHalf>,
}

fn default_keycode() -> String {
    PLACEHOLDER_KEYCODE.to_string()
}

impl KeySpec {
    /// Creates a key at the given matrix and pixel position with the
    /// standard key box and the placeholder keycode.
    #[must_use]
    pub fn new(id: usize, row: u8, col: u8, x: f32, y: f32) -> Self {
        Self {
            id,
            row,
            col,
            x,
            y,
            width: KEY_BOX,
            height: KEY_BOX,
            keycode: default_keycode(),
            half: None,
        }
    }

    /// Sets the key box dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Assigns the key to a split half.
    #[must_use]
    pub const fn with_half(mut self, half: KeyHalf) -> Self {
        self.half = Some(half);
        self
    }
}
