//! Keymap layer definitions.

use serde::{Deserialize, Serialize};

/// A named layer with its bound keycodes in key order.
///
/// Layer lengths are advisory only; a layer is never required to match the
/// key count of the model it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Layer name as it appeared in the source.
    pub name: String,
    /// Keycode tokens in source order.
    pub keycodes: Vec<String>,
}

impl LayerSpec {
    /// Creates a layer from a name and its keycodes.
    #[must_use]
    pub fn new(name: impl Into<String>, keycodes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keycodes,
        }
    }

    /// Number of keycodes bound on this layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keycodes.len()
    }

    /// True when the layer binds no keycodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keycodes.is_empty()
    }
}
