//! Application-wide constants.
//!
//! This module defines the application identity plus the named geometry
//! and classification constants used by the layout inference engine.

use std::ops::RangeInclusive;

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "KeyProbe";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "keyprobe";

/// Pixel width of one keyboard unit (1u) in the synthesized coordinate space.
pub const PIXEL_UNIT: f32 = 50.0;

/// Pixel margin applied on both axes before the first key.
pub const GRID_MARGIN: f32 = 10.0;

/// Pixel size of the key box drawn inside its unit cell.
pub const KEY_BOX: f32 = 45.0;

/// Horizontal pixel gap inserted between the halves of a synthesized split grid.
pub const SPLIT_GAP_PX: f32 = 100.0;

/// Extra horizontal offset applied to right-half keys found by gap analysis.
pub const SPLIT_OFFSET_PX: f32 = 50.0;

/// Vertical pixel drop applied to thumb-cluster keys in the canonical split shape.
pub const THUMB_DROP_PX: f32 = 15.0;

/// Minimum x-distance in keyboard units between adjacent columns that counts
/// as the gap between two halves.
pub const COORD_GAP_THRESHOLD: f32 = 1.5;

/// Key counts classified as a split family by the key-count classifier.
pub const SPLIT_FAMILY_KEY_RANGE: RangeInclusive<usize> = 36..=42;

/// Wider key-count band treated as a split hint for ZMK-flavored drafts.
pub const SPLIT_HINT_KEY_RANGE: RangeInclusive<usize> = 30..=50;

/// Key count of the default non-split placeholder grid.
pub const DEFAULT_FLAT_KEY_COUNT: usize = 61;

/// Key count of the default split placeholder grid.
pub const DEFAULT_SPLIT_KEY_COUNT: usize = 42;

/// Keycode assigned to synthesized keys with no binding information.
pub const PLACEHOLDER_KEYCODE: &str = "no-op";

/// Keyboard names that imply a split design even without an explicit flag.
pub const SPLIT_NAME_FRAGMENTS: [&str; 12] = [
    "corne",
    "crkbd",
    "lily58",
    "sofle",
    "iris",
    "kyria",
    "ergodox",
    "moonlander",
    "dactyl",
    "sweep",
    "ferris",
    "helix",
];
