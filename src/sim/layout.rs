//! Sentence geometry: line splitting, scatter angles, word placement
//!
//! These functions feed both the gather targets of the firework and the
//! hit-test rectangles of the revealed text, so render and input layers see
//! the exact same positions.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::consts::{CHAR_WIDTH, LINE_HEIGHT, WORD_SPACING};

/// Text width measurement seam. The wasm shell wires this to the canvas
/// `measureText`; tests and native builds use [`MonoMeasure`].
pub trait TextMeasure {
    fn width(&self, text: &str) -> f32;
}

/// Fixed per-character advance, good enough for layout-shape tests.
#[derive(Debug, Clone, Copy)]
pub struct MonoMeasure {
    pub char_width: f32,
}

impl Default for MonoMeasure {
    fn default() -> Self {
        Self {
            char_width: CHAR_WIDTH,
        }
    }
}

impl TextMeasure for MonoMeasure {
    fn width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// Split a sentence into two balanced lines on whitespace.
///
/// The first line takes `ceil(word_count / 2)` words. A one-word sentence
/// yields an empty second line; an empty sentence yields two empty lines.
pub fn split_sentence(text: &str) -> (String, String) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return (String::new(), String::new());
    }
    let first = words.len().div_ceil(2);
    (words[..first].join(" "), words[first..].join(" "))
}

/// Clockwise scatter angle for fragment `index` of `total`, starting
/// straight up (-90°) and stepping by `360° / total`.
pub fn angle_for_slot(index: usize, total: usize) -> f32 {
    debug_assert!(total > 0 && index < total);
    -FRAC_PI_2 + index as f32 * TAU / total as f32
}

/// One laid-out word: top-left anchor plus measured width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordSlot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Place `words` left to right, centered on `center_x` at `baseline_y`.
///
/// Total width is the sum of word widths plus `spacing` between neighbors;
/// the block starts at `center_x - total / 2`.
pub fn layout_words(
    words: &[&str],
    center_x: f32,
    baseline_y: f32,
    measure: &dyn TextMeasure,
    spacing: f32,
) -> Vec<WordSlot> {
    if words.is_empty() {
        return Vec::new();
    }
    let widths: Vec<f32> = words.iter().map(|w| measure.width(w)).collect();
    let total: f32 = widths.iter().sum::<f32>() + spacing * (words.len() - 1) as f32;
    let mut x = center_x - total / 2.0;
    let mut slots = Vec::with_capacity(words.len());
    for width in widths {
        slots.push(WordSlot {
            x,
            y: baseline_y,
            width,
        });
        x += width + spacing;
    }
    slots
}

/// Two-line reading layout for a whole sentence, centered on
/// (`center_x`, `center_y`). Returns one slot per word in sentence order,
/// first line offset up and second line down by half a line height.
pub fn sentence_layout(
    text: &str,
    center_x: f32,
    center_y: f32,
    measure: &dyn TextMeasure,
) -> Vec<WordSlot> {
    let (line1, line2) = split_sentence(text);
    let top: Vec<&str> = line1.split_whitespace().collect();
    let bottom: Vec<&str> = line2.split_whitespace().collect();

    let mut slots = layout_words(
        &top,
        center_x,
        center_y - LINE_HEIGHT / 2.0,
        measure,
        WORD_SPACING,
    );
    slots.extend(layout_words(
        &bottom,
        center_x,
        center_y + LINE_HEIGHT / 2.0,
        measure,
        WORD_SPACING,
    ));
    slots
}
