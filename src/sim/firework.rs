//! Firework text-reveal choreography
//!
//! A kill seeds a batch of word fragments at the collision point. The phase
//! machine drives them out radially (explode), pauses (hold), then eases
//! them into the two-line reading layout (gather) before committing the
//! sentence (done). Transitions are monotonic and irreversible within a run.

use glam::Vec2;

use super::layout::{TextMeasure, angle_for_slot, sentence_layout};
use super::session::RevealRole;
use super::state::{Fragment, PALETTE};
use crate::consts::*;

/// Current phase of a choreography run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireworkPhase {
    Explode,
    Hold,
    Gather,
    Done,
}

/// What a finished run reveals, decided by the sentence session at launch
#[derive(Debug, Clone, PartialEq)]
pub struct RevealRequest {
    pub text: String,
    pub role: RevealRole,
    pub deck_index: usize,
    /// Vertical center of the reading layout, as a fraction of canvas height
    pub center_frac: f32,
}

/// One choreography run
#[derive(Debug, Clone)]
pub struct Firework {
    phase: FireworkPhase,
    phase_ticks: u32,
    origin: Vec2,
    fragments: Vec<Fragment>,
    reveal: RevealRequest,
}

impl Firework {
    /// Seed a fragment batch at the burst origin, one fragment per word,
    /// palette colors cycled in slot order. An empty sentence completes
    /// trivially with no fragments.
    pub fn launch(origin: Vec2, reveal: RevealRequest) -> Self {
        let words: Vec<&str> = reveal.text.split_whitespace().collect();
        let total = words.len();
        let fragments: Vec<Fragment> = words
            .iter()
            .enumerate()
            .map(|(i, word)| Fragment {
                word: (*word).to_string(),
                angle: angle_for_slot(i, total),
                pos: origin,
                target: origin,
                color: PALETTE[i % PALETTE.len()],
                arrived: false,
            })
            .collect();

        Self {
            phase: if fragments.is_empty() {
                FireworkPhase::Done
            } else {
                FireworkPhase::Explode
            },
            phase_ticks: 0,
            origin,
            fragments,
            reveal,
        }
    }

    pub fn phase(&self) -> FireworkPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == FireworkPhase::Done
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn reveal(&self) -> &RevealRequest {
        &self.reveal
    }

    /// Consume the run for the commit step
    pub fn into_reveal(self) -> RevealRequest {
        self.reveal
    }

    /// Advance one tick. Targets are recomputed every gather tick from the
    /// eventual reading layout, so a canvas resize mid-run stays coherent.
    pub fn advance(&mut self, width: f32, height: f32, measure: &dyn TextMeasure) {
        match self.phase {
            FireworkPhase::Explode => {
                self.phase_ticks += 1;
                let p = (self.phase_ticks as f32 / EXPLODE_TICKS as f32).min(1.0);
                let eased = 1.0 - (1.0 - p) * (1.0 - p);
                let r = FIREWORK_BASE_RADIUS + (FIREWORK_MAX_RADIUS - FIREWORK_BASE_RADIUS) * eased;
                for frag in &mut self.fragments {
                    frag.pos = self.origin + Vec2::new(frag.angle.cos(), frag.angle.sin()) * r;
                }
                if p >= 1.0 {
                    self.phase = FireworkPhase::Hold;
                    self.phase_ticks = 0;
                }
            }
            FireworkPhase::Hold => {
                self.phase_ticks += 1;
                if self.phase_ticks >= HOLD_TICKS {
                    self.phase = FireworkPhase::Gather;
                    self.phase_ticks = 0;
                }
            }
            FireworkPhase::Gather => {
                self.phase_ticks += 1;
                let p = (self.phase_ticks as f32 / GATHER_TICKS as f32).min(1.0);
                let center_y = height * self.reveal.center_frac;
                let slots = sentence_layout(&self.reveal.text, width / 2.0, center_y, measure);
                let ease = p * p;
                for (frag, slot) in self.fragments.iter_mut().zip(&slots) {
                    frag.target = Vec2::new(slot.x, slot.y);
                    frag.pos += (frag.target - frag.pos) * ease;
                }
                if p >= 1.0 {
                    for frag in &mut self.fragments {
                        frag.pos = frag.target;
                        frag.arrived = true;
                    }
                    self.phase = FireworkPhase::Done;
                    self.phase_ticks = 0;
                }
            }
            FireworkPhase::Done => {}
        }
    }
}
