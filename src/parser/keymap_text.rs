//! Declarative keymap text extractor.
//!
//! Handles devicetree-style `.keymap` sources: layer nodes inside a
//! `keymap { ... }` block, `bindings = < ... >` token lists, include
//! directives for naming, and split hints in prose or ASCII art. Geometry
//! is always synthesized from the first layer's binding count. This
//! extractor never fails; unparseable content degrades to an empty model.

use regex::Regex;
use tracing::debug;

use crate::constants::SPLIT_FAMILY_KEY_RANGE;
use crate::geometry;
use crate::models::{
    FirmwareDescriptor, FirmwareType, KeyboardModel, LayerSpec, ModelMetadata,
};

/// Extracts a keyboard model from declarative keymap content.
#[must_use]
pub fn extract(descriptor: &FirmwareDescriptor) -> KeyboardModel {
    let text = descriptor.text().unwrap_or_default();

    let name = resolve_name(text, descriptor);
    let layers = parse_layers(text);
    let key_count = layers.first().map_or(0, LayerSpec::len);
    let split = has_split_signal(text) || SPLIT_FAMILY_KEY_RANGE.contains(&key_count);
    debug!(%name, key_count, split, layers = layers.len(), "extracted keymap text");

    let mut model = KeyboardModel::draft(FirmwareType::Zmk, name);
    model.layers = layers;

    if key_count > 0 {
        let (keys, family) = if split {
            geometry::split_grid(key_count)
        } else {
            geometry::flat_grid(key_count)
        };
        model.keys = keys;
        model.layout = Some(family);
    }

    model.metadata = ModelMetadata {
        is_split: split && key_count > 0,
        ..ModelMetadata::default()
    };
    model
}

/// Derives a name from the first include directive, falling back to the
/// file stem.
///
/// `#include <behaviors.dtsi>` yields "behaviors"; directory components
/// and keymap-ish extensions are stripped.
fn resolve_name(text: &str, descriptor: &FirmwareDescriptor) -> String {
    let include = Regex::new(r#"#include\s+[<"]([^>"]+)[>"]"#).expect("static regex");
    let Some(capture) = include.captures(text) else {
        return descriptor.stem().to_string();
    };

    let path = &capture[1];
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let trimmed = base
        .strip_suffix(".dtsi")
        .or_else(|| base.strip_suffix(".keymap"))
        .or_else(|| base.strip_suffix(".overlay"))
        .or_else(|| base.strip_suffix(".h"))
        .unwrap_or(base);

    if trimmed.is_empty() {
        descriptor.stem().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Looks for split hints: the word "split", half labels, or ASCII-art
/// rows drawn with pipe borders on at least two lines.
fn has_split_signal(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if lowered.contains("split") || lowered.contains("left half") || lowered.contains("right half")
    {
        return true;
    }

    let art_rows = text
        .lines()
        .filter(|line| line.bytes().filter(|byte| *byte == b'|').count() >= 8)
        .count();
    art_rows >= 2
}

/// Parses layer nodes from the keymap block.
///
/// Each direct child node of `keymap { ... }` becomes one layer, named
/// after the node, with its `bindings` token list split on whitespace.
/// Nodes without bindings become empty layers.
fn parse_layers(text: &str) -> Vec<LayerSpec> {
    let keymap_open = Regex::new(r"keymap\s*\{").expect("static regex");
    let Some(open) = keymap_open.find(text) else {
        return Vec::new();
    };
    let Some(block) = brace_block(text, open.end() - 1) else {
        return Vec::new();
    };

    let node_open = Regex::new(r"([A-Za-z_][\w-]*)\s*\{").expect("static regex");
    let bindings_list = Regex::new(r"bindings\s*=\s*<([^>]*)>").expect("static regex");

    let mut layers = Vec::new();
    let mut cursor = 0;
    while let Some(capture) = node_open.captures_at(block, cursor) {
        let whole = capture.get(0).expect("whole match");
        let Some(node) = brace_block(block, whole.end() - 1) else {
            break;
        };

        let name = capture[1].to_string();
        let keycodes = bindings_list
            .captures(node)
            .map(|bindings| {
                bindings[1]
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        layers.push(LayerSpec::new(name, keycodes));

        // Jump past the node so nested blocks are not re-matched.
        cursor = whole.end() - 1 + node.len() + 2;
    }
    layers
}

/// Returns the content between the brace at `open` and its matching
/// close, exclusive of both braces.
fn brace_block(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    for (offset, byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
