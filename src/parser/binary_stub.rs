//! Binary fallback extractor.
//!
//! Compiled firmware images cannot be parsed, so this extractor returns a
//! fixed placeholder model decided by the extension alone: a 60% board with
//! the default 61-key grid and one layer of placeholder keycodes. This is a
//! documented degraded-service path and never fails.

use tracing::debug;

use crate::constants::{DEFAULT_FLAT_KEY_COUNT, PLACEHOLDER_KEYCODE};
use crate::geometry;
use crate::models::{
    FirmwareDescriptor, FirmwareType, KeyboardModel, LayerSpec, ModelMetadata,
};

/// Note attached to every placeholder model.
const STUB_NOTE: &str = "binary firmware images cannot be parsed; showing a placeholder layout";

/// Produces the fixed placeholder model for a binary descriptor.
#[must_use]
pub fn extract(descriptor: &FirmwareDescriptor) -> KeyboardModel {
    let firmware = match descriptor.extension().as_deref() {
        Some("uf2") => FirmwareType::Zmk,
        _ => FirmwareType::Qmk,
    };
    debug!(file = %descriptor.file_name, %firmware, "binary descriptor, using placeholder model");

    let (keys, family) = geometry::flat_grid(DEFAULT_FLAT_KEY_COUNT);
    let layer = LayerSpec::new(
        "default",
        vec![PLACEHOLDER_KEYCODE.to_string(); DEFAULT_FLAT_KEY_COUNT],
    );

    let mut model = KeyboardModel::draft(firmware, descriptor.stem());
    model.layout = Some(family);
    model.keys = keys;
    model.layers = vec![layer];
    model.metadata = ModelMetadata {
        note: Some(STUB_NOTE.to_string()),
        ..ModelMetadata::default()
    };
    model
}
