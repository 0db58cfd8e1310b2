//! Sentence session: deck cursor, display modes, persistence contract
//!
//! Two modes. Single: one sentence per kill, cursor advances by one and
//! wraps. Paired: sentences are question/answer pairs; a five-phase display
//! cycle walks empty → question forming → question displayed → answer
//! forming → both displayed, then restarts two sentences later.
//!
//! The cursor is persisted through [`ProgressStore`] immediately after every
//! change and never left stale.

use super::collision::Rect;
use super::firework::RevealRequest;
use super::state::{Color, GameEvent};
use crate::consts::*;
use crate::deck::Sentence;

/// Which sentence-progression mode the session runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SessionMode {
    Single,
    Paired,
}

/// Paired-mode display cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPhase {
    Empty,
    QuestionForming,
    QuestionDisplayed,
    AnswerForming,
    BothDisplayed,
}

/// Role of a revealed sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealRole {
    Single,
    Question,
    Answer,
}

/// A laid-out word of a committed sentence. The rect doubles as the
/// tap-to-translate hit region.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub color: Color,
    pub rect: Rect,
}

/// A sentence currently readable on screen
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceBlock {
    pub deck_index: usize,
    pub role: RevealRole,
    pub words: Vec<PlacedWord>,
    pub translation: &'static str,
}

/// The only two operations the session needs from the external key-value
/// store. Both are idempotent.
pub trait ProgressStore {
    fn load(&mut self) -> usize;
    fn save(&mut self, cursor: usize);
}

/// In-memory store; records every save for assertions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub cursor: usize,
    pub saves: Vec<usize>,
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> usize {
        self.cursor
    }

    fn save(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.saves.push(cursor);
    }
}

/// Owns which sentences are queued or displayed and the deck cursor
#[derive(Debug, Clone)]
pub struct SentenceSession {
    mode: SessionMode,
    deck: &'static [Sentence],
    cursor: usize,
    pair_phase: PairPhase,
    /// Doubles as the single-mode display slot
    question: Option<SentenceBlock>,
    answer: Option<SentenceBlock>,
    replay: Option<(Rect, usize)>,
    word_lookup: bool,
    translations_visible: bool,
}

impl SentenceSession {
    /// Load the persisted cursor and normalize it: out-of-range values
    /// reset to 0, and paired mode snaps an odd cursor down to its
    /// question index so a half-finished pair restarts cleanly.
    pub fn new(
        mode: SessionMode,
        deck: &'static [Sentence],
        store: &mut dyn ProgressStore,
        word_lookup: bool,
    ) -> Self {
        let mut cursor = store.load();
        if cursor >= deck.len() {
            cursor = 0;
        }
        if mode == SessionMode::Paired {
            cursor -= cursor % 2;
        }
        log::info!("deck cursor loaded: {cursor}");
        Self {
            mode,
            deck,
            cursor,
            pair_phase: PairPhase::Empty,
            question: None,
            answer: None,
            replay: None,
            word_lookup,
            translations_visible: false,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pair_phase(&self) -> PairPhase {
        self.pair_phase
    }

    pub fn word_lookup_enabled(&self) -> bool {
        self.word_lookup
    }

    pub fn translations_visible(&self) -> bool {
        self.translations_visible
    }

    pub fn set_translations_visible(&mut self, visible: bool) {
        self.translations_visible = visible;
    }

    /// Visible sentence blocks, question first
    pub fn blocks(&self) -> impl Iterator<Item = &SentenceBlock> {
        self.question.iter().chain(self.answer.iter())
    }

    pub fn replay_button(&self) -> Option<(Rect, usize)> {
        self.replay
    }

    /// Drop everything on screen; the cursor is untouched.
    pub fn clear_display(&mut self) {
        self.question = None;
        self.answer = None;
        self.replay = None;
        self.pair_phase = PairPhase::Empty;
    }

    /// A kill landed while no choreography was running. Decide whether a
    /// reveal starts, which sentence it shows, and persist any cursor move.
    pub fn advance_on_kill(&mut self, store: &mut dyn ProgressStore) -> Option<RevealRequest> {
        if self.deck.is_empty() {
            return None;
        }
        match self.mode {
            SessionMode::Single => {
                let index = self.cursor;
                self.cursor = (self.cursor + 1) % self.deck.len();
                store.save(self.cursor);
                // The previous sentence leaves the screen when the new burst starts
                self.question = None;
                self.replay = None;
                Some(self.request(index, RevealRole::Single, SINGLE_CENTER_FRAC))
            }
            SessionMode::Paired => match self.pair_phase {
                PairPhase::Empty => {
                    self.pair_phase = PairPhase::QuestionForming;
                    Some(self.request(self.cursor, RevealRole::Question, QUESTION_CENTER_FRAC))
                }
                PairPhase::QuestionDisplayed => {
                    let index = (self.cursor + 1) % self.deck.len();
                    store.save(index);
                    self.pair_phase = PairPhase::AnswerForming;
                    Some(self.request(index, RevealRole::Answer, ANSWER_CENTER_FRAC))
                }
                PairPhase::BothDisplayed => {
                    self.question = None;
                    self.answer = None;
                    self.replay = None;
                    let mut next = (self.cursor + 2) % self.deck.len();
                    next -= next % 2;
                    self.cursor = next;
                    store.save(next);
                    self.pair_phase = PairPhase::QuestionForming;
                    Some(self.request(next, RevealRole::Question, QUESTION_CENTER_FRAC))
                }
                // A run is already forming this pair; the reveal side effect
                // is suppressed until it finishes.
                PairPhase::QuestionForming | PairPhase::AnswerForming => None,
            },
        }
    }

    /// Called by the choreographer on `done`: publish the revealed sentence,
    /// expose the replay affordance (question and single roles), and emit
    /// the reveal event that drives narration.
    pub fn commit_revealed(
        &mut self,
        reveal: RevealRequest,
        words: Vec<PlacedWord>,
        events: &mut Vec<GameEvent>,
    ) {
        let block = SentenceBlock {
            deck_index: reveal.deck_index,
            role: reveal.role,
            translation: self.deck[reveal.deck_index].translation,
            words,
        };
        match reveal.role {
            RevealRole::Single | RevealRole::Question => {
                // Replay affordance is question-role only
                if reveal.role == RevealRole::Question {
                    self.replay = replay_rect(&block.words).map(|r| (r, reveal.deck_index));
                    self.pair_phase = PairPhase::QuestionDisplayed;
                }
                self.question = Some(block);
            }
            RevealRole::Answer => {
                self.answer = Some(block);
                self.pair_phase = PairPhase::BothDisplayed;
            }
        }
        events.push(GameEvent::SentenceRevealed {
            text: reveal.text,
            role: reveal.role,
            deck_index: reveal.deck_index,
        });
    }

    fn request(&self, index: usize, role: RevealRole, center_frac: f32) -> RevealRequest {
        RevealRequest {
            text: self.deck[index].text.to_string(),
            role,
            deck_index: index,
            center_frac,
        }
    }
}

/// Replay button sits just right of the block's widest extent, on the first
/// line. No button for an empty (fragment-less) sentence.
fn replay_rect(words: &[PlacedWord]) -> Option<Rect> {
    let right = words
        .iter()
        .map(|w| w.rect.x + w.rect.w)
        .fold(f32::NEG_INFINITY, f32::max);
    let top = words.first()?.rect.y;
    Some(Rect::new(
        right + REPLAY_BUTTON_GAP,
        top,
        REPLAY_BUTTON_SIZE,
        REPLAY_BUTTON_SIZE,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck;
    use crate::sim::wordclass;

    /// Minimal four-sentence paired deck: [Q0, A0, Q1, A1]
    static PAIRED_DECK: [Sentence; 4] = [
        Sentence {
            text: "How was your day",
            translation: "",
            clip: None,
        },
        Sentence {
            text: "It was great",
            translation: "",
            clip: None,
        },
        Sentence {
            text: "What are you doing",
            translation: "",
            clip: None,
        },
        Sentence {
            text: "I am reading",
            translation: "",
            clip: None,
        },
    ];

    fn placed(text: &str) -> Vec<PlacedWord> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| PlacedWord {
                text: w.to_string(),
                color: wordclass::color_for(w),
                rect: Rect::new(i as f32 * 50.0, 100.0, 40.0, 26.0),
            })
            .collect()
    }

    fn commit(session: &mut SentenceSession, req: RevealRequest) {
        let words = placed(&req.text.clone());
        let mut events = Vec::new();
        session.commit_revealed(req, words, &mut events);
        assert!(matches!(events[0], GameEvent::SentenceRevealed { .. }));
    }

    #[test]
    fn test_single_mode_cursor_advances_and_persists() {
        let mut store = MemoryStore::default();
        let mut session =
            SentenceSession::new(SessionMode::Single, deck::DECK, &mut store, false);
        let len = deck::DECK.len();

        for k in 1..=len + 2 {
            let req = session.advance_on_kill(&mut store).expect("reveal starts");
            assert_eq!(req.deck_index, (k - 1) % len);
            commit(&mut session, req);
            assert_eq!(session.cursor(), k % len);
            assert_eq!(*store.saves.last().unwrap(), k % len);
        }
    }

    #[test]
    fn test_paired_mode_full_cycle() {
        let mut store = MemoryStore::default();
        let mut session =
            SentenceSession::new(SessionMode::Paired, &PAIRED_DECK, &mut store, false);
        assert_eq!(session.pair_phase(), PairPhase::Empty);

        // Kill 1: question starts forming; no cursor write yet
        let req = session.advance_on_kill(&mut store).unwrap();
        assert_eq!(req.role, RevealRole::Question);
        assert_eq!(req.deck_index, 0);
        assert!(store.saves.is_empty());

        // Kill 2 lands mid-formation: suppressed
        assert!(session.advance_on_kill(&mut store).is_none());

        commit(&mut session, req);
        assert_eq!(session.pair_phase(), PairPhase::QuestionDisplayed);
        assert!(session.replay_button().is_some());

        // Kill 3: answer forms at cursor+1, persisted as 1
        let req = session.advance_on_kill(&mut store).unwrap();
        assert_eq!(req.role, RevealRole::Answer);
        assert_eq!(req.deck_index, 1);
        assert_eq!(store.saves, vec![1]);

        commit(&mut session, req);
        assert_eq!(session.pair_phase(), PairPhase::BothDisplayed);
        assert_eq!(session.blocks().count(), 2);
        // Cursor unchanged through the both_displayed commit
        assert_eq!(store.cursor, 1);

        // Kill 4: restart at the next pair
        let req = session.advance_on_kill(&mut store).unwrap();
        assert_eq!(req.role, RevealRole::Question);
        assert_eq!(req.deck_index, 2);
        assert_eq!(store.saves, vec![1, 2]);
        assert_eq!(session.blocks().count(), 0);
        assert_eq!(session.pair_phase(), PairPhase::QuestionForming);
    }

    #[test]
    fn test_paired_mode_wraps_to_even_start() {
        let mut store = MemoryStore {
            cursor: 2,
            saves: Vec::new(),
        };
        let mut session =
            SentenceSession::new(SessionMode::Paired, &PAIRED_DECK, &mut store, false);

        let req = session.advance_on_kill(&mut store).unwrap();
        assert_eq!(req.deck_index, 2);
        commit(&mut session, req);

        let req = session.advance_on_kill(&mut store).unwrap();
        assert_eq!(req.deck_index, 3);
        commit(&mut session, req);

        // Past the deck end: wrap to 0
        let req = session.advance_on_kill(&mut store).unwrap();
        assert_eq!(req.deck_index, 0);
        assert_eq!(store.cursor, 0);
    }

    #[test]
    fn test_out_of_range_cursor_normalizes_to_zero() {
        let mut store = MemoryStore {
            cursor: 999,
            saves: Vec::new(),
        };
        let session = SentenceSession::new(SessionMode::Single, deck::DECK, &mut store, false);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_paired_load_snaps_odd_cursor_down() {
        let mut store = MemoryStore {
            cursor: 3,
            saves: Vec::new(),
        };
        let session = SentenceSession::new(SessionMode::Paired, &PAIRED_DECK, &mut store, false);
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_clear_display_keeps_cursor() {
        let mut store = MemoryStore::default();
        let mut session =
            SentenceSession::new(SessionMode::Single, deck::DECK, &mut store, false);
        let req = session.advance_on_kill(&mut store).unwrap();
        commit(&mut session, req);
        assert_eq!(session.blocks().count(), 1);

        let cursor = session.cursor();
        session.clear_display();
        assert_eq!(session.blocks().count(), 0);
        assert_eq!(session.cursor(), cursor);
    }
}
