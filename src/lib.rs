//! Word Blast - an arcade flashcard shooter
//!
//! Shoot the descending enemies; every kill bursts into a firework of word
//! fragments that gather into an English sentence from the study deck.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, firework
//!   choreography, sentence session)
//! - `deck`: Built-in sentence deck and the translation-lookup seam
//! - `narration`: Speech gateway and the cancellable narration queue
//! - `audio`: Procedural sound effects (wasm)
//! - `progress`: Persisted deck cursor
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod deck;
pub mod narration;
pub mod progress;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;

pub use progress::DeckProgress;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the per-frame entity steps)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Entity sizes (pixels)
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const BULLET_W: f32 = 5.0;
    pub const BULLET_H: f32 = 10.0;

    /// Per-tick motion steps. Frame-based, not delta-scaled: the shell's
    /// fixed-timestep accumulator keeps the wall-clock rate stable.
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_BULLET_SPEED: f32 = 3.0;
    pub const ENEMY_FALL_STEP: f32 = 1.0;

    /// Minimum number of live enemies after every advance
    pub const ENEMY_FLOOR: usize = 2;
    /// Number of enemy sprite variants
    pub const SPRITE_COUNT: u8 = 2;
    /// A tap places the player this far above the touch point
    pub const PLAYER_TOUCH_LIFT: f32 = 20.0;

    /// Firework phase durations (ticks)
    pub const EXPLODE_TICKS: u32 = 40;
    pub const HOLD_TICKS: u32 = 45;
    pub const GATHER_TICKS: u32 = 50;

    /// Firework scatter radii (pixels)
    pub const FIREWORK_BASE_RADIUS: f32 = 24.0;
    pub const FIREWORK_MAX_RADIUS: f32 = 130.0;

    /// Sentence text layout
    pub const LINE_HEIGHT: f32 = 34.0;
    pub const WORD_SPACING: f32 = 12.0;
    /// Fallback per-character advance when no real text measurer is wired
    pub const CHAR_WIDTH: f32 = 11.0;
    /// Height of a revealed word's tap-to-translate hit box
    pub const WORD_HIT_HEIGHT: f32 = 26.0;

    /// Vertical center of a revealed block, as a fraction of canvas height.
    /// Question and answer get distinct slots so both fit on screen.
    pub const SINGLE_CENTER_FRAC: f32 = 0.40;
    pub const QUESTION_CENTER_FRAC: f32 = 0.28;
    pub const ANSWER_CENTER_FRAC: f32 = 0.52;

    /// Replay affordance dimensions
    pub const REPLAY_BUTTON_SIZE: f32 = 28.0;
    pub const REPLAY_BUTTON_GAP: f32 = 16.0;

    /// Ticks between the female and male readings of a revealed sentence
    pub const NARRATION_GAP_TICKS: u32 = 45;
}
