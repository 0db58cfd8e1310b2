//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::firework::Firework;
use super::session::{RevealRole, SentenceBlock, SentenceSession};
use crate::consts::*;

/// Lifecycle phase of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Not started, or stopped; entities are empty
    Ready,
    /// Ticks advance the world
    Playing,
    /// Tick chain halted; transient state frozen
    Paused,
}

/// An RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string for the canvas painter
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Fragment colors, cycled in slot order
pub const PALETTE: [Color; 6] = [
    Color::rgb(0xff, 0x5e, 0x5e),
    Color::rgb(0xff, 0xb8, 0x3d),
    Color::rgb(0xff, 0xe9, 0x66),
    Color::rgb(0x6e, 0xe7, 0x7a),
    Color::rgb(0x5e, 0xb8, 0xff),
    Color::rgb(0xc9, 0x8a, 0xff),
];

/// The player ship, one instance per session
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_SIZE, PLAYER_SIZE)
    }

    /// Center the ship on a pointer position, lifted above the finger and
    /// clamped to the canvas.
    pub fn place_at(&mut self, p: Vec2, width: f32, height: f32) {
        let x = p.x - PLAYER_SIZE / 2.0;
        let y = p.y - PLAYER_SIZE / 2.0 - PLAYER_TOUCH_LIFT;
        self.pos.x = x.clamp(0.0, (width - PLAYER_SIZE).max(0.0));
        self.pos.y = y.clamp(0.0, (height - PLAYER_SIZE).max(0.0));
    }
}

/// A projectile; `vy` is negative for player bullets, positive for enemy fire
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vy: f32,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BULLET_W, BULLET_H)
    }
}

/// A descending enemy sprite
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub sprite: u8,
    /// Return-fire happens once, on the first player shot after spawn
    pub has_fired: bool,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ENEMY_SIZE, ENEMY_SIZE)
    }
}

/// One word of an in-flight firework. The angle slot is unique and fixed
/// for the fragment's lifetime; only position, target and `arrived` mutate.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub word: String,
    pub angle: f32,
    pub pos: Vec2,
    pub target: Vec2,
    pub color: Color,
    pub arrived: bool,
}

/// Side effects produced by a tick, drained by the shell each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player fired a bullet
    ShotFired,
    /// An enemy was destroyed at this point
    EnemyDestroyed { at: Vec2 },
    /// An enemy bullet reached the player
    PlayerHit,
    /// A firework finished gathering; the sentence is now on screen
    SentenceRevealed {
        text: String,
        role: RevealRole,
        deck_index: usize,
    },
    /// The replay affordance was tapped
    ReplayRequested { deck_index: usize },
    /// A revealed word was tapped for translation lookup
    WordTapped { word: String },
}

/// A tap resolved against the previous frame's layout rectangles
#[derive(Debug, Clone, PartialEq)]
pub enum Affordance {
    Replay { deck_index: usize },
    Word { text: String },
}

/// Why a session could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// Required assets have not finished loading; the user must re-invoke start
    AssetsNotReady,
    /// A session is already running or paused
    AlreadyRunning,
}

impl std::fmt::Display for StartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartError::AssetsNotReady => write!(f, "assets are still loading"),
            StartError::AlreadyRunning => write!(f, "a game is already running"),
        }
    }
}

impl std::error::Error for StartError {}

/// Complete game state, owned exclusively by the shell's tick thread
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// At most one choreography run is active at a time
    pub firework: Option<Firework>,
    pub session: SentenceSession,
    pub events: Vec<GameEvent>,
    pub seed: u64,
    rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, width: f32, height: f32, session: SentenceSession) -> Self {
        Self {
            phase: GamePhase::Ready,
            time_ticks: 0,
            width,
            height,
            player: Player { pos: Vec2::ZERO },
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            firework: None,
            session,
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Begin a session. Rejected (with a user-visible notice, no retry)
    /// while assets are loading or a session is already live.
    pub fn start(&mut self, assets_ready: bool) -> Result<(), StartError> {
        if !assets_ready {
            return Err(StartError::AssetsNotReady);
        }
        if self.phase != GamePhase::Ready {
            return Err(StartError::AlreadyRunning);
        }

        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.firework = None;
        self.events.clear();
        self.player.pos = Vec2::new(
            self.width / 2.0 - PLAYER_SIZE / 2.0,
            self.height - PLAYER_SIZE - 10.0,
        );
        for _ in 0..ENEMY_FLOOR {
            self.spawn_enemy();
        }
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        log::info!("session started (deck cursor {})", self.session.cursor());
        Ok(())
    }

    /// Full reset of transient state. The persisted deck cursor survives.
    pub fn stop(&mut self) {
        self.phase = GamePhase::Ready;
        self.time_ticks = 0;
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.firework = None;
        self.events.clear();
        self.session.clear_display();
        log::info!("session stopped");
    }

    /// Append one enemy with a random sprite at a random x in the top band.
    /// Bounds are baked into the random range, so spawning never fails.
    pub fn spawn_enemy(&mut self) {
        let max_x = (self.width - ENEMY_SIZE).max(1.0);
        let x = self.rng.random_range(0.0..max_x);
        let sprite = self.rng.random_range(0..SPRITE_COUNT);
        self.enemies.push(Enemy {
            pos: Vec2::new(x, -ENEMY_SIZE),
            sprite,
            has_fired: false,
        });
    }

    /// Pointer-down fire action: reposition the ship, spawn one player
    /// bullet, and let every enemy that has not yet fired return fire once.
    pub fn fire(&mut self, tap: Vec2) {
        self.player.place_at(tap, self.width, self.height);
        self.bullets.push(Bullet {
            pos: Vec2::new(
                self.player.pos.x + PLAYER_SIZE / 2.0 - BULLET_W / 2.0,
                self.player.pos.y,
            ),
            vy: -PLAYER_BULLET_SPEED,
        });
        self.events.push(GameEvent::ShotFired);

        for enemy in &mut self.enemies {
            if !enemy.has_fired {
                self.enemy_bullets.push(Bullet {
                    pos: Vec2::new(
                        enemy.pos.x + ENEMY_SIZE / 2.0 - BULLET_W / 2.0,
                        enemy.pos.y + ENEMY_SIZE,
                    ),
                    vy: ENEMY_BULLET_SPEED,
                });
                enemy.has_fired = true;
            }
        }
    }

    /// Hit-test a tap against the affordance rectangles computed during the
    /// previous layout pass. `None` means the tap falls through to `fire`.
    pub fn resolve_tap(&self, p: Vec2) -> Option<Affordance> {
        if let Some((rect, deck_index)) = self.session.replay_button() {
            if rect.contains(p) {
                return Some(Affordance::Replay { deck_index });
            }
        }
        if self.session.word_lookup_enabled() {
            for block in self.session.blocks() {
                for word in &block.words {
                    if word.rect.contains(p) {
                        return Some(Affordance::Word {
                            text: word.text.clone(),
                        });
                    }
                }
            }
        }
        None
    }

    /// Read-only per-frame drawing data; the painter needs no game logic.
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            phase: self.phase,
            player: self.player.rect(),
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    rect: e.rect(),
                    sprite: e.sprite,
                })
                .collect(),
            bullets: self.bullets.iter().map(Bullet::rect).collect(),
            enemy_bullets: self.enemy_bullets.iter().map(Bullet::rect).collect(),
            fragments: self
                .firework
                .iter()
                .flat_map(|fw| fw.fragments())
                .map(|f| FragmentView {
                    word: &f.word,
                    pos: f.pos,
                    color: f.color,
                })
                .collect(),
            blocks: self.session.blocks().collect(),
            replay_button: self.session.replay_button().map(|(rect, _)| rect),
            translations_visible: self.session.translations_visible(),
        }
    }
}

/// One enemy as the painter sees it
#[derive(Debug, Clone, Copy)]
pub struct EnemyView {
    pub rect: Rect,
    pub sprite: u8,
}

/// One in-flight fragment as the painter sees it
#[derive(Debug, Clone, Copy)]
pub struct FragmentView<'a> {
    pub word: &'a str,
    pub pos: Vec2,
    pub color: Color,
}

/// Everything the render collaborator draws in one frame
#[derive(Debug)]
pub struct RenderSnapshot<'a> {
    pub phase: GamePhase,
    pub player: Rect,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<Rect>,
    pub enemy_bullets: Vec<Rect>,
    pub fragments: Vec<FragmentView<'a>>,
    pub blocks: Vec<&'a SentenceBlock>,
    pub replay_button: Option<Rect>,
    pub translations_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck;
    use crate::sim::session::{MemoryStore, SessionMode};

    fn test_state() -> GameState {
        let mut store = MemoryStore::default();
        let session = SentenceSession::new(SessionMode::Single, deck::DECK, &mut store, false);
        GameState::new(7, 800.0, 600.0, session)
    }

    #[test]
    fn test_start_requires_assets() {
        let mut state = test_state();
        assert_eq!(state.start(false), Err(StartError::AssetsNotReady));
        assert_eq!(state.phase, GamePhase::Ready);

        state.start(true).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), ENEMY_FLOOR);
        assert_eq!(state.start(true), Err(StartError::AlreadyRunning));
    }

    #[test]
    fn test_spawn_stays_in_bounds() {
        let mut state = test_state();
        for _ in 0..50 {
            state.spawn_enemy();
        }
        for enemy in &state.enemies {
            assert!(enemy.pos.x >= 0.0);
            assert!(enemy.pos.x <= state.width - ENEMY_SIZE);
            assert!(enemy.sprite < SPRITE_COUNT);
        }
    }

    #[test]
    fn test_fire_spawns_bullet_and_return_fire_once() {
        let mut state = test_state();
        state.start(true).unwrap();
        let tap = Vec2::new(400.0, 500.0);

        state.fire(tap);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.enemy_bullets.len(), ENEMY_FLOOR);
        assert!(state.enemies.iter().all(|e| e.has_fired));

        // Second shot: no additional return fire
        state.fire(tap);
        assert_eq!(state.bullets.len(), 2);
        assert_eq!(state.enemy_bullets.len(), ENEMY_FLOOR);
    }

    #[test]
    fn test_player_placement_clamped() {
        let mut state = test_state();
        state.player.place_at(Vec2::new(-100.0, 10_000.0), 800.0, 600.0);
        assert_eq!(state.player.pos.x, 0.0);
        assert_eq!(state.player.pos.y, 600.0 - PLAYER_SIZE);
    }

    #[test]
    fn test_stop_resets_transient_state() {
        let mut state = test_state();
        state.start(true).unwrap();
        state.fire(Vec2::new(400.0, 500.0));
        state.stop();
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.firework.is_none());
    }
}
