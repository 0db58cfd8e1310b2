//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Persistence and text measurement enter through the `ProgressStore` and
//! `TextMeasure` traits so the core never touches the browser directly.

pub mod collision;
pub mod firework;
pub mod layout;
pub mod session;
pub mod state;
pub mod tick;
pub mod wordclass;

pub use collision::{Rect, detect_collisions, resolve_first_wins};
pub use firework::{Firework, FireworkPhase, RevealRequest};
pub use layout::{MonoMeasure, TextMeasure, split_sentence};
pub use session::{
    PairPhase, PlacedWord, ProgressStore, RevealRole, SentenceBlock, SentenceSession, SessionMode,
};
pub use state::{
    Bullet, Color, Enemy, Fragment, GameEvent, GamePhase, GameState, Player, StartError,
};
pub use tick::{TickInput, tick};
