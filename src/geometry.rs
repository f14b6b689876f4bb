//! Layout inference engine.
//!
//! Synthesizes pixel geometry for keyboards whose descriptors carry no
//! physical positions, classifies key counts into layout families, and
//! runs the final inference pass over draft models.
//!
//! All synthesized coordinates live in the same pixel space: one keyboard
//! unit is [`PIXEL_UNIT`] pixels, the grid starts [`GRID_MARGIN`] pixels
//! from the origin, and each key box is [`KEY_BOX`] pixels square unless
//! the source says otherwise.

use tracing::debug;

use crate::constants::{
    COORD_GAP_THRESHOLD, GRID_MARGIN, KEY_BOX, PIXEL_UNIT, SPLIT_FAMILY_KEY_RANGE, SPLIT_GAP_PX,
    SPLIT_HINT_KEY_RANGE, SPLIT_OFFSET_PX, THUMB_DROP_PX,
};
use crate::models::{FirmwareType, KeyHalf, KeySpec, KeyboardModel, LayoutFamily};

/// Columns per half in the canonical split shape.
const HALF_COLS: usize = 6;

/// Main grid rows per half in the canonical split shape.
const HALF_MAIN_ROWS: usize = 3;

/// Main grid keys per half; anything beyond lands in the thumb cluster.
const HALF_MAIN_KEYS: usize = HALF_COLS * HALF_MAIN_ROWS;

/// A raw key position in keyboard units, before pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitKey {
    /// X position in keyboard units.
    pub x: f32,
    /// Y position in keyboard units.
    pub y: f32,
    /// Matrix position `[row, col]`, when the source declares one.
    pub matrix: Option<[u8; 2]>,
    /// Width in keyboard units.
    pub w: f32,
    /// Height in keyboard units.
    pub h: f32,
}

/// Classifies a key count into the closest layout family.
///
/// Counts inside the split band map to split; everything else resolves by
/// the largest family that still needs that many keys.
#[must_use]
pub fn detect_layout_by_key_count(count: usize) -> LayoutFamily {
    if SPLIT_FAMILY_KEY_RANGE.contains(&count) {
        LayoutFamily::Split
    } else if count <= 48 {
        LayoutFamily::Ortholinear
    } else if count <= 61 {
        LayoutFamily::SixtyPercent
    } else if count <= 68 {
        LayoutFamily::SixtyFivePercent
    } else if count <= 84 {
        LayoutFamily::SeventyFivePercent
    } else if count <= 87 {
        LayoutFamily::Tenkeyless
    } else {
        LayoutFamily::Full
    }
}

/// Synthesizes a flat row-major grid of `count` keys.
///
/// The column count comes from the family the count classifies into, so
/// the returned family always matches the synthesized shape. Ids are dense
/// from 0 in reading order.
#[must_use]
pub fn flat_grid(count: usize) -> (Vec<KeySpec>, LayoutFamily) {
    let family = detect_layout_by_key_count(count);
    let cols = usize::from(family.cols());

    let mut keys = Vec::with_capacity(count);
    for id in 0..count {
        let row = id / cols;
        let col = id % cols;
        keys.push(KeySpec::new(
            id,
            row as u8,
            col as u8,
            col as f32 * PIXEL_UNIT + GRID_MARGIN,
            row as f32 * PIXEL_UNIT + GRID_MARGIN,
        ));
    }

    debug!(count, family = %family, "synthesized flat grid");
    (keys, family)
}

/// Synthesizes the canonical split shape: two 3x6 main grids plus thumb
/// clusters, left-half ids first, with a fixed gap between the halves.
///
/// The left half receives the extra key of an odd count. Every key carries
/// a half assignment.
#[must_use]
pub fn split_grid(count: usize) -> (Vec<KeySpec>, LayoutFamily) {
    let left_count = count.div_ceil(2);
    let right_count = count - left_count;
    let right_base = HALF_COLS as f32 * PIXEL_UNIT + SPLIT_GAP_PX;

    let mut keys = Vec::with_capacity(count);
    push_half(&mut keys, left_count, KeyHalf::Left, 0.0, 0);
    push_half(&mut keys, right_count, KeyHalf::Right, right_base, HALF_COLS as u8);

    debug!(count, "synthesized split grid");
    (keys, LayoutFamily::Split)
}

/// Appends one half of the canonical split shape.
///
/// Keys beyond the main grid form a thumb row: dropped by
/// [`THUMB_DROP_PX`] and horizontally centered under the main grid.
fn push_half(keys: &mut Vec<KeySpec>, count: usize, half: KeyHalf, base_x: f32, col_base: u8) {
    let thumb_count = count.saturating_sub(HALF_MAIN_KEYS);
    let thumb_shift = (HALF_COLS.saturating_sub(thumb_count) as f32) / 2.0;

    for idx in 0..count {
        let id = keys.len();
        let key = if idx < HALF_MAIN_KEYS {
            let row = idx / HALF_COLS;
            let col = idx % HALF_COLS;
            KeySpec::new(
                id,
                row as u8,
                col_base + col as u8,
                base_x + col as f32 * PIXEL_UNIT + GRID_MARGIN,
                row as f32 * PIXEL_UNIT + GRID_MARGIN,
            )
        } else {
            let col = idx - HALF_MAIN_KEYS;
            KeySpec::new(
                id,
                HALF_MAIN_ROWS as u8,
                col_base + col as u8,
                base_x + (thumb_shift + col as f32) * PIXEL_UNIT + GRID_MARGIN,
                HALF_MAIN_ROWS as f32 * PIXEL_UNIT + GRID_MARGIN + THUMB_DROP_PX,
            )
        };
        keys.push(key.with_half(half));
    }
}

/// Maps coordinate-based key positions into pixel space.
///
/// Matrix positions are taken from the source when present and otherwise
/// derived by rounding the unit coordinates. For split keyboards the widest
/// gap between adjacent columns decides where the right half begins; the
/// right half is pushed [`SPLIT_OFFSET_PX`] pixels further out. When no gap
/// clears the threshold, every key stays on the left half.
#[must_use]
pub fn from_coordinates(entries: &[UnitKey], is_split: bool) -> Vec<KeySpec> {
    let boundary = if is_split {
        split_boundary(entries)
    } else {
        None
    };

    let mut keys = Vec::with_capacity(entries.len());
    for (id, entry) in entries.iter().enumerate() {
        let (row, col) = match entry.matrix {
            Some([row, col]) => (row, col),
            None => (entry.y.round() as u8, entry.x.round() as u8),
        };

        let mut key = KeySpec::new(
            id,
            row,
            col,
            entry.x * PIXEL_UNIT + GRID_MARGIN,
            entry.y * PIXEL_UNIT + GRID_MARGIN,
        )
        .with_size(entry.w * KEY_BOX, entry.h * KEY_BOX);

        if is_split {
            key = match boundary {
                Some(boundary) if entry.x >= boundary => {
                    key.x += SPLIT_OFFSET_PX;
                    key.with_half(KeyHalf::Right)
                }
                _ => key.with_half(KeyHalf::Left),
            };
        }

        keys.push(key);
    }

    keys
}

/// Finds the unit x of the right half's first column.
///
/// Scans the distinct x positions in ascending order for the widest gap
/// between neighbors; ties keep the leftmost gap. Returns `None` when no
/// gap exceeds [`COORD_GAP_THRESHOLD`].
fn split_boundary(entries: &[UnitKey]) -> Option<f32> {
    let mut xs: Vec<f32> = entries.iter().map(|entry| entry.x).collect();
    xs.sort_by(f32::total_cmp);
    xs.dedup();

    let mut widest = 0.0f32;
    let mut boundary = None;
    for pair in xs.windows(2) {
        let gap = pair[1] - pair[0];
        if gap > widest {
            widest = gap;
            boundary = Some(pair[1]);
        }
    }

    if widest > COORD_GAP_THRESHOLD {
        debug!(boundary = ?boundary, gap = widest, "split gap detected");
        boundary
    } else {
        None
    }
}

/// Final inference pass over a draft model.
///
/// Assigns a layout family to models that arrived without one, in order:
/// the metadata split flag, split-half assignments on keys, the wide split
/// band for ZMK-flavored drafts, then plain key-count classification.
/// Models that already carry a family are left alone.
pub fn detect_layout(model: &mut KeyboardModel) {
    if model.layout.is_some() {
        return;
    }

    let count = model.key_count();
    let family = if model.metadata.is_split || model.has_halved_keys() {
        LayoutFamily::Split
    } else if model.firmware == FirmwareType::Zmk && SPLIT_HINT_KEY_RANGE.contains(&count) {
        LayoutFamily::Split
    } else {
        detect_layout_by_key_count(count)
    };

    debug!(keys = count, family = %family, "inferred layout family");
    model.layout = Some(family);
}
