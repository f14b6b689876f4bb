//! Macro source text extractor.
//!
//! Handles C-like QMK sources: a `#define PRODUCT` name macro, layout-macro
//! invocations whose placeholder arguments give the key count, and
//! `[layer] = LAYOUT(...)` keymap entries. Physical topology is rarely
//! encoded in C sources, so no split detection is attempted; geometry is
//! always a flat grid. This extractor never fails.

use regex::Regex;
use tracing::debug;

use crate::geometry;
use crate::models::{FirmwareDescriptor, FirmwareType, KeyboardModel, LayerSpec};

/// Extracts a keyboard model from C-like macro source content.
#[must_use]
pub fn extract(descriptor: &FirmwareDescriptor) -> KeyboardModel {
    let text = descriptor.text().unwrap_or_default();

    let name = resolve_name(text, descriptor);
    let layers = parse_layers(text);
    let key_count = count_layout_placeholders(text);
    debug!(%name, key_count, layers = layers.len(), "extracted macro source");

    let mut model = KeyboardModel::draft(FirmwareType::Qmk, name);
    model.layers = layers;

    if key_count > 0 {
        let (keys, family) = geometry::flat_grid(key_count);
        model.keys = keys;
        model.layout = Some(family);
    }

    model
}

/// Resolves the device name from a `#define PRODUCT` macro, falling back
/// to the file stem. Surrounding quotes are stripped.
fn resolve_name(text: &str, descriptor: &FirmwareDescriptor) -> String {
    let product = Regex::new(r"(?m)^\s*#\s*define\s+PRODUCT\s+(.+?)\s*$").expect("static regex");
    let Some(capture) = product.captures(text) else {
        return descriptor.stem().to_string();
    };

    let name = capture[1].trim().trim_matches('"').trim();
    if name.is_empty() {
        descriptor.stem().to_string()
    } else {
        name.to_string()
    }
}

/// Counts placeholder tokens in the first layout-macro invocation.
///
/// A placeholder is two letters followed by an identifier tail, optionally
/// with its own argument list (`k00`, `KC_A`, `MT(MOD_LSFT, KC_A)`).
/// Arguments are split on top-level commas only.
fn count_layout_placeholders(text: &str) -> usize {
    let layout_open = Regex::new(r"LAYOUT\w*\s*\(").expect("static regex");
    let placeholder = Regex::new(r"^[A-Za-z]{2}\w*").expect("static regex");

    let Some(open) = layout_open.find(text) else {
        return 0;
    };
    let Some(args) = paren_block(text, open.end() - 1) else {
        return 0;
    };

    split_top_level(args)
        .iter()
        .filter(|token| placeholder.is_match(token))
        .count()
}

/// Parses `[layer] = LAYOUT(...)` keymap entries into layers.
fn parse_layers(text: &str) -> Vec<LayerSpec> {
    let entry = Regex::new(r"\[\s*([A-Za-z_]\w*)\s*\]\s*=\s*[A-Za-z_]\w*\s*\(")
        .expect("static regex");

    let mut layers = Vec::new();
    let mut cursor = 0;
    while let Some(capture) = entry.captures_at(text, cursor) {
        let whole = capture.get(0).expect("whole match");
        let Some(args) = paren_block(text, whole.end() - 1) else {
            break;
        };

        let keycodes = split_top_level(args)
            .into_iter()
            .map(str::to_string)
            .collect();
        layers.push(LayerSpec::new(capture[1].to_string(), keycodes));

        cursor = whole.end() - 1 + args.len() + 2;
    }
    layers
}

/// Returns the content between the paren at `open` and its matching close,
/// exclusive of both parens.
fn paren_block(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let mut depth = 0usize;
    for (offset, byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
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

/// Splits an argument list on commas outside nested parens, trimming each
/// piece and dropping empties.
fn split_top_level(args: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, byte) in args.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                pieces.push(&args[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push(&args[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LayoutFamily;

    fn parse(file_name: &str, text: &str) -> KeyboardModel {
        extract(&FirmwareDescriptor::from_text(file_name, text))
    }

    const KEYMAP_C: &str = r#"
#include QMK_KEYBOARD_H
#define PRODUCT "Planck Clone"

const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {
    [_QWERTY] = LAYOUT_ortho_4x12(
        KC_TAB,  KC_Q, KC_W, KC_E, KC_R, KC_T, KC_Y, KC_U, KC_I,    KC_O,   KC_P,    KC_BSPC,
        KC_LCTL, KC_A, KC_S, KC_D, KC_F, KC_G, KC_H, KC_J, KC_K,    KC_L,   KC_SCLN, KC_QUOT,
        KC_LSFT, KC_Z, KC_X, KC_C, KC_V, KC_B, KC_N, KC_M, KC_COMM, KC_DOT, KC_SLSH, KC_ENT,
        KC_LGUI, KC_LALT, MO(1), KC_SPC, KC_SPC, KC_SPC, KC_SPC, MO(2), KC_RALT, KC_RGUI, KC_LEFT, KC_RGHT
    ),
    [_LOWER] = LAYOUT_ortho_4x12(
        KC_GRV, KC_1, KC_2, KC_3, KC_4, KC_5, KC_6, KC_7, KC_8, KC_9, KC_0, KC_DEL,
        MT(MOD_LSFT, KC_A), KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO,
        KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO,
        KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO, KC_NO
    ),
};
"#;

    #[test]
    fn test_name_from_product_macro() {
        let model = parse("keymap.c", KEYMAP_C);
        assert_eq!(model.name, "Planck Clone");
        assert_eq!(model.firmware, FirmwareType::Qmk);
    }

    #[test]
    fn test_name_falls_back_to_stem() {
        let model = parse("my_keymap.c", "int main(void) { return 0; }");
        assert_eq!(model.name, "my_keymap");
    }

    #[test]
    fn test_key_count_from_first_invocation() {
        let model = parse("keymap.c", KEYMAP_C);
        assert_eq!(model.key_count(), 48);
        assert_eq!(model.layout, Some(LayoutFamily::Ortholinear));
        assert!(model.keys.iter().all(|k| k.half.is_none()));
    }

    #[test]
    fn test_layers_split_on_top_level_commas() {
        let model = parse("keymap.c", KEYMAP_C);
        assert_eq!(model.layers.len(), 2);
        assert_eq!(model.layers[0].name, "_QWERTY");
        assert_eq!(model.layers[0].len(), 48);
        assert_eq!(model.layers[0].keycodes[0], "KC_TAB");
        assert_eq!(model.layers[1].name, "_LOWER");
        assert_eq!(model.layers[1].len(), 48);
        // The nested MT(...) call stays one token.
        assert_eq!(model.layers[1].keycodes[12], "MT(MOD_LSFT, KC_A)");
    }

    #[test]
    fn test_layout_macro_definition_counts_placeholders() {
        let header = "#define LAYOUT( \
            k00, k01, k02, \
            k10, k11, k12 \
        ) { {k00, k01, k02}, {k10, k11, k12} }";
        let model = parse("board.h", header);
        assert_eq!(model.key_count(), 6);
        assert!(model.layers.is_empty());
    }

    #[test]
    fn test_no_layout_macro_yields_empty_draft() {
        let model = parse("util.c", "#define PRODUCT Tester\nstatic int x = 1;");
        assert_eq!(model.name, "Tester");
        assert_eq!(model.key_count(), 0);
        assert_eq!(model.layout, None);
        assert!(model.layers.is_empty());
    }

    #[test]
    fn test_unbalanced_parens_degrade_gracefully() {
        let model = parse("broken.c", "[_A] = LAYOUT(KC_A, KC_B");
        assert_eq!(model.key_count(), 0);
        assert!(model.layers.is_empty());
    }
}
