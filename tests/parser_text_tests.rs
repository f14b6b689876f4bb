//! End-to-end tests for keymap, C source, and binary descriptors.

use keyprobe::models::{FirmwareDescriptor, FirmwareType, LayoutFamily};
use keyprobe::parser::parse_descriptor;

fn parse_text(file_name: &str, text: &str) -> keyprobe::models::KeyboardModel {
    let descriptor = FirmwareDescriptor::from_text(file_name, text);
    parse_descriptor(&descriptor).expect("text descriptors never fail")
}

fn keymap_with_tokens(count: usize) -> String {
    let tokens = vec!["&kp A"; count].join(" ");
    format!("keymap {{ base_layer {{ bindings = <{tokens}>; }}; }};")
}

#[test]
fn test_48_token_keymap_is_flat_ortholinear() {
    // 48 "&kp A" pairs produce 96 tokens; build 24 pairs for 48 tokens.
    let model = parse_text("board.keymap", &keymap_with_tokens(24));

    assert_eq!(model.key_count(), 48);
    assert_eq!(model.layout, Some(LayoutFamily::Ortholinear));
    assert!(model.keys.iter().all(|key| key.half.is_none()));
    assert!(!model.metadata.is_split);
}

#[test]
fn test_split_band_keymap_is_split() {
    // 21 pairs = 42 tokens, inside the split family band.
    let model = parse_text("board.keymap", &keymap_with_tokens(21));

    assert_eq!(model.key_count(), 42);
    assert_eq!(model.layout, Some(LayoutFamily::Split));
    assert!(model.keys.iter().all(|key| key.half.is_some()));
}

#[test]
fn test_split_comment_forces_split_geometry() {
    let text = format!("// left half and right half\n{}", keymap_with_tokens(4));
    let model = parse_text("board.keymap", &text);

    assert_eq!(model.key_count(), 8);
    assert_eq!(model.layout, Some(LayoutFamily::Split));
}

#[test]
fn test_keymap_name_and_layers() {
    let text = r#"
#include <layouts/sweep.dtsi>
keymap {
    base { bindings = <&kp A &kp B>; };
    nav { bindings = <&kp C &kp D>; };
};
"#;
    let model = parse_text("file.keymap", text);
    assert_eq!(model.name, "sweep");
    assert_eq!(model.firmware, FirmwareType::Zmk);
    assert_eq!(model.layers.len(), 2);
    assert_eq!(model.layers[1].name, "nav");
}

#[test]
fn test_c_source_end_to_end() {
    let text = r#"
#define PRODUCT Bench60
const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {
    [_BASE] = LAYOUT_60_ansi(
        KC_A, KC_B, KC_C, KC_D, KC_E, KC_F, KC_G, KC_H, KC_I, KC_J,
        KC_A, KC_B, KC_C, KC_D, KC_E, KC_F, KC_G, KC_H, KC_I, KC_J,
        KC_A, KC_B, KC_C, KC_D, KC_E, KC_F, KC_G, KC_H, KC_I, KC_J,
        KC_A, KC_B, KC_C, KC_D, KC_E, KC_F, KC_G, KC_H, KC_I, KC_J,
        KC_A, KC_B, KC_C, KC_D, KC_E, KC_F, KC_G, KC_H, KC_I, KC_J,
        KC_A, KC_B, KC_C, KC_D, KC_E, KC_F, KC_G, KC_H, KC_I, KC_J,
        KC_A
    ),
};
"#;
    let model = parse_text("keymap.c", text);
    assert_eq!(model.name, "Bench60");
    assert_eq!(model.firmware, FirmwareType::Qmk);
    assert_eq!(model.key_count(), 61);
    assert_eq!(model.layout, Some(LayoutFamily::SixtyPercent));
    assert_eq!(model.layers.len(), 1);
    assert_eq!(model.layers[0].len(), 61);
    // C sources never attempt split detection.
    assert!(model.keys.iter().all(|key| key.half.is_none()));
}

#[test]
fn test_header_extension_routes_to_macro_source() {
    let model = parse_text("board.h", "#define LAYOUT(k00, k01, k02) {k00, k01, k02}");
    assert_eq!(model.firmware, FirmwareType::Qmk);
    assert_eq!(model.key_count(), 3);
}

#[test]
fn test_binary_descriptors_yield_placeholder() {
    for (name, firmware) in [
        ("firmware.uf2", FirmwareType::Zmk),
        ("firmware.hex", FirmwareType::Qmk),
    ] {
        let descriptor = FirmwareDescriptor::from_bytes(name, vec![0xde, 0xad]);
        let model = parse_descriptor(&descriptor).unwrap();

        assert_eq!(model.firmware, firmware, "{name}");
        assert_eq!(model.name, "firmware");
        assert_eq!(model.key_count(), 61);
        assert_eq!(model.layout, Some(LayoutFamily::SixtyPercent));
        assert_eq!(model.layers.len(), 1);
        assert!(model.metadata.note.is_some());
    }
}

#[test]
fn test_garbage_binary_never_fails() {
    let descriptor = FirmwareDescriptor::from_bytes("x.hex", (0..=255).collect());
    assert!(parse_descriptor(&descriptor).is_ok());
}
