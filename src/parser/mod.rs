//! Format dispatcher and the tokenizing extractors.
//!
//! The dispatcher selects an extractor from the descriptor's file extension
//! alone, runs it, and finishes the draft with the layout inference pass.
//! Parsing is pure: the same descriptor always yields the same model.

pub mod binary_stub;
pub mod config_json;
pub mod keymap_text;
pub mod macro_source;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::geometry;
use crate::models::{FirmwareDescriptor, FirmwareType, KeyboardModel};

// Reusable pure classifiers, also called standalone by collaborators.
pub use config_json::{detect_firmware_type, detect_split_keyboard};

/// Parses a descriptor into a finished keyboard model.
///
/// Extension routing: `json` → structured config, `keymap` → declarative
/// keymap, `c`/`h` → macro source, `hex`/`uf2` → binary fallback. Anything
/// else becomes an empty unknown draft. Drafts that still lack a layout
/// family get one from the final inference pass.
///
/// # Errors
///
/// Fails only when the structured config extractor rejects its document;
/// the error is wrapped once with the file name, and the typed cause stays
/// downcastable in the chain.
pub fn parse_descriptor(descriptor: &FirmwareDescriptor) -> Result<KeyboardModel> {
    let extension = descriptor.extension();
    debug!(file = %descriptor.file_name, extension = ?extension, "dispatching descriptor");

    let mut model = match extension.as_deref() {
        Some("json") => config_json::extract(descriptor),
        Some("keymap") => Ok(keymap_text::extract(descriptor)),
        Some("c" | "h") => Ok(macro_source::extract(descriptor)),
        Some("hex" | "uf2") => Ok(binary_stub::extract(descriptor)),
        _ => {
            debug!(file = %descriptor.file_name, "unrecognized extension, empty draft");
            Ok(KeyboardModel::draft(FirmwareType::Unknown, descriptor.stem()))
        }
    }
    .with_context(|| format!("failed to parse firmware descriptor: {}", descriptor.file_name))?;

    geometry::detect_layout(&mut model);
    Ok(model)
}

/// Reads a descriptor from disk and parses it.
///
/// # Errors
///
/// Fails when the file cannot be read or the descriptor cannot be parsed;
/// either way the error is wrapped once with the path.
pub fn parse_file(path: &Path) -> Result<KeyboardModel> {
    let descriptor = FirmwareDescriptor::from_path(path)
        .with_context(|| format!("failed to parse firmware descriptor: {}", path.display()))?;
    parse_descriptor(&descriptor)
}
