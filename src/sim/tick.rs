//! Fixed timestep simulation tick
//!
//! Within one tick the order is strict: lifecycle/input, entity advance,
//! collision detect + resolve, choreography trigger, choreography advance.
//! Rendering reads a snapshot afterwards. Nothing suspends inside a tick;
//! narration runs in the shell and never blocks here.

use glam::Vec2;

use super::collision::{Rect, detect_collisions, resolve_first_wins};
use super::firework::Firework;
use super::layout::{self, TextMeasure};
use super::session::{PlacedWord, ProgressStore};
use super::state::{Affordance, Bullet, GameEvent, GamePhase, GameState};
use super::wordclass;
use crate::consts::*;

/// Input commands for a single tick. One-shot fields are cleared by the
/// shell after each processed tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer drag position, canvas space
    pub pointer_move: Option<Vec2>,
    /// Pointer-down position, canvas space (fire, or an affordance tap)
    pub pointer_down: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Stop and reset transient state
    pub stop: bool,
}

/// Advance the game state by one fixed timestep.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    measure: &dyn TextMeasure,
    store: &mut dyn ProgressStore,
) {
    if input.stop {
        if state.phase != GamePhase::Ready {
            state.stop();
        }
        return;
    }
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::Ready => {}
        }
    }
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    if let Some(p) = input.pointer_move {
        let (w, h) = (state.width, state.height);
        state.player.place_at(p, w, h);
    }
    if let Some(p) = input.pointer_down {
        match state.resolve_tap(p) {
            Some(Affordance::Replay { deck_index }) => {
                state.events.push(GameEvent::ReplayRequested { deck_index });
            }
            Some(Affordance::Word { text }) => {
                state.events.push(GameEvent::WordTapped { word: text });
            }
            None => state.fire(p),
        }
    }

    advance_entities(state);
    resolve_collisions(state, store);
    advance_firework(state, measure);
}

/// Cull, refill to the spawn floor, then step every entity by its per-tick
/// constant.
fn advance_entities(state: &mut GameState) {
    let height = state.height;

    state.enemies.retain(|e| e.pos.y <= height);
    while state.enemies.len() < ENEMY_FLOOR {
        state.spawn_enemy();
    }
    for enemy in &mut state.enemies {
        enemy.pos.y += ENEMY_FALL_STEP;
    }

    state.bullets.retain(|b| b.pos.y + BULLET_H > 0.0);
    for bullet in &mut state.bullets {
        bullet.pos.y += bullet.vy;
    }

    state.enemy_bullets.retain(|b| b.pos.y < height);
    for bullet in &mut state.enemy_bullets {
        bullet.pos.y += bullet.vy;
    }
}

/// Collect-then-apply collision resolution. The detection pass is read-only
/// over every pair; removal happens afterwards by index set, so no
/// comparison is skipped by concurrent mutation.
fn resolve_collisions(state: &mut GameState, store: &mut dyn ProgressStore) {
    // Enemy fire vs player: bullet is spent, explosion cue, no damage model
    let player_rect = state.player.rect();
    let before = state.enemy_bullets.len();
    state.enemy_bullets.retain(|b| !b.rect().overlaps(&player_rect));
    for _ in state.enemy_bullets.len()..before {
        state.events.push(GameEvent::PlayerHit);
    }

    // Player fire vs enemies
    let bullet_rects: Vec<Rect> = state.bullets.iter().map(Bullet::rect).collect();
    let enemy_rects: Vec<Rect> = state.enemies.iter().map(|e| e.rect()).collect();
    let pairs = detect_collisions(&bullet_rects, &enemy_rects);
    let kills = resolve_first_wins(&pairs);
    if kills.is_empty() {
        return;
    }

    let dead_bullets: Vec<usize> = kills.iter().map(|&(bi, _)| bi).collect();
    let dead_enemies: Vec<usize> = kills.iter().map(|&(_, ei)| ei).collect();
    let kill_points: Vec<Vec2> = dead_enemies.iter().map(|&ei| enemy_rects[ei].center()).collect();

    let mut i = 0;
    state.bullets.retain(|_| {
        let keep = !dead_bullets.contains(&i);
        i += 1;
        keep
    });
    let mut i = 0;
    state.enemies.retain(|_| {
        let keep = !dead_enemies.contains(&i);
        i += 1;
        keep
    });

    for at in kill_points {
        state.events.push(GameEvent::EnemyDestroyed { at });
        // Kills during an active run still land; only the reveal is suppressed
        if state.firework.is_none() {
            if let Some(reveal) = state.session.advance_on_kill(store) {
                state.firework = Some(Firework::launch(at, reveal));
            }
        }
    }
}

/// Step the active choreography and commit it on `done`.
fn advance_firework(state: &mut GameState, measure: &dyn TextMeasure) {
    let Some(fw) = state.firework.as_mut() else {
        return;
    };
    fw.advance(state.width, state.height, measure);
    if !fw.is_done() {
        return;
    }
    if let Some(done) = state.firework.take() {
        let reveal = done.into_reveal();
        let words = place_words(
            &reveal.text,
            state.width,
            state.height * reveal.center_frac,
            measure,
        );
        state
            .session
            .commit_revealed(reveal, words, &mut state.events);
    }
}

/// Final reading layout with per-word classification colors. The same
/// computation produced the gather targets, so the committed text lands
/// exactly where the fragments stopped.
fn place_words(
    text: &str,
    width: f32,
    center_y: f32,
    measure: &dyn TextMeasure,
) -> Vec<PlacedWord> {
    let slots = layout::sentence_layout(text, width / 2.0, center_y, measure);
    text.split_whitespace()
        .zip(&slots)
        .map(|(word, slot)| PlacedWord {
            text: word.to_string(),
            color: wordclass::color_for(word),
            rect: Rect::new(slot.x, slot.y, slot.width, WORD_HIT_HEIGHT),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck;
    use crate::sim::firework::FireworkPhase;
    use crate::sim::layout::MonoMeasure;
    use crate::sim::session::{MemoryStore, SentenceSession, SessionMode};
    use crate::sim::state::Enemy;

    fn playing_state(mode: SessionMode) -> (GameState, MemoryStore) {
        let mut store = MemoryStore::default();
        let session = SentenceSession::new(mode, deck::DECK, &mut store, true);
        let mut state = GameState::new(42, 800.0, 600.0, session);
        state.start(true).unwrap();
        (state, store)
    }

    fn run(state: &mut GameState, store: &mut MemoryStore, ticks: u32) {
        let input = TickInput::default();
        let measure = MonoMeasure::default();
        for _ in 0..ticks {
            tick(state, &input, &measure, store);
        }
    }

    /// Plant an enemy and an overlapping bullet so the next tick kills it.
    fn stage_kill(state: &mut GameState) {
        state.enemies.push(Enemy {
            pos: Vec2::new(100.0, 100.0),
            sprite: 0,
            has_fired: true,
        });
        state.bullets.push(Bullet {
            pos: Vec2::new(110.0, 105.0),
            vy: 0.0,
        });
    }

    #[test]
    fn test_entities_advance_and_cull() {
        let (mut state, mut store) = playing_state(SessionMode::Single);
        state.enemies.clear();
        state.enemies.push(Enemy {
            pos: Vec2::new(10.0, 50.0),
            sprite: 0,
            has_fired: true,
        });
        state.bullets.push(Bullet {
            pos: Vec2::new(10.0, 300.0),
            vy: -PLAYER_BULLET_SPEED,
        });

        run(&mut state, &mut store, 1);
        assert_eq!(state.enemies[0].pos.y, 50.0 + ENEMY_FALL_STEP);
        assert_eq!(state.bullets[0].pos.y, 300.0 - PLAYER_BULLET_SPEED);

        // A bullet past the top edge is culled
        state.bullets[0].pos.y = -BULLET_H;
        run(&mut state, &mut store, 1);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_spawn_floor_after_cull() {
        let (mut state, mut store) = playing_state(SessionMode::Single);
        for enemy in &mut state.enemies {
            enemy.pos.y = state.height + 1.0;
        }
        run(&mut state, &mut store, 1);
        assert!(state.enemies.len() >= ENEMY_FLOOR);
        assert!(state.enemies.iter().all(|e| e.pos.y <= state.height));
    }

    #[test]
    fn test_kill_starts_choreography_and_emits_event() {
        let (mut state, mut store) = playing_state(SessionMode::Single);
        state.enemies.clear();
        stage_kill(&mut state);

        run(&mut state, &mut store, 1);
        assert!(state.bullets.is_empty());
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::EnemyDestroyed { .. })));
        let fw = state.firework.as_ref().expect("choreography started");
        let words = deck::DECK[0].text.split_whitespace().count();
        assert_eq!(fw.fragments().len(), words);
        assert_eq!(store.saves, vec![1]);
    }

    #[test]
    fn test_kill_during_active_run_is_suppressed() {
        let (mut state, mut store) = playing_state(SessionMode::Single);
        state.enemies.clear();
        stage_kill(&mut state);
        run(&mut state, &mut store, 1);
        let fragment_count = state.firework.as_ref().unwrap().fragments().len();
        let phase = state.firework.as_ref().unwrap().phase();
        assert_eq!(phase, FireworkPhase::Explode);

        // Second kill while the run is in flight
        stage_kill(&mut state);
        state.events.clear();
        run(&mut state, &mut store, 1);

        // Enemy and bullet are gone, but the in-flight run is untouched
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::EnemyDestroyed { .. })));
        let fw = state.firework.as_ref().unwrap();
        assert_eq!(fw.fragments().len(), fragment_count);
        // Cursor did not advance for the suppressed reveal
        assert_eq!(store.saves, vec![1]);
    }

    #[test]
    fn test_full_reveal_cycle_commits_sentence() {
        let (mut state, mut store) = playing_state(SessionMode::Single);
        state.enemies.clear();
        stage_kill(&mut state);
        run(&mut state, &mut store, 1);

        run(&mut state, &mut store, EXPLODE_TICKS + HOLD_TICKS + GATHER_TICKS);
        assert!(state.firework.is_none());
        let revealed = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::SentenceRevealed { .. }))
            .count();
        assert_eq!(revealed, 1);
        assert_eq!(state.session.blocks().count(), 1);

        let block = state.session.blocks().next().unwrap();
        assert_eq!(block.deck_index, 0);
        assert!(block.words.iter().all(|w| w.rect.w > 0.0));
    }

    #[test]
    fn test_replay_tap_does_not_fire() {
        let (mut state, mut store) = playing_state(SessionMode::Paired);
        state.enemies.clear();
        stage_kill(&mut state);
        run(&mut state, &mut store, 1 + EXPLODE_TICKS + HOLD_TICKS + GATHER_TICKS);
        let (button, deck_index) = state.session.replay_button().expect("replay visible");

        state.events.clear();
        let bullets_before = state.bullets.len();
        let input = TickInput {
            pointer_down: Some(button.center()),
            ..Default::default()
        };
        tick(&mut state, &input, &MonoMeasure::default(), &mut store);

        assert_eq!(state.bullets.len(), bullets_before);
        assert!(state
            .events
            .iter()
            .any(|e| *e == GameEvent::ReplayRequested { deck_index }));
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let (mut state, mut store) = playing_state(SessionMode::Single);
        let measure = MonoMeasure::default();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &measure, &mut store);
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), &measure, &mut store);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, &measure, &mut store);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let make = || {
            let mut store = MemoryStore::default();
            let session = SentenceSession::new(SessionMode::Single, deck::DECK, &mut store, false);
            let mut state = GameState::new(99999, 800.0, 600.0, session);
            state.start(true).unwrap();
            (state, store)
        };
        let (mut a, mut store_a) = make();
        let (mut b, mut store_b) = make();

        let measure = MonoMeasure::default();
        let inputs = [
            TickInput {
                pointer_down: Some(Vec2::new(400.0, 500.0)),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                pointer_move: Some(Vec2::new(200.0, 520.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];
        for input in &inputs {
            tick(&mut a, input, &measure, &mut store_a);
            tick(&mut b, input, &measure, &mut store_b);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.sprite, eb.sprite);
        }
        assert_eq!(a.player.pos, b.player.pos);
    }
}
