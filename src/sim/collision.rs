//! Axis-aligned collision detection
//!
//! Overlap uses strict inequalities, so rectangles whose edges merely touch
//! do not count as a hit. Detection is a read-only pass over every pair;
//! destructive removal happens only after the pass completes.

use glam::Vec2;

/// An axis-aligned rectangle (top-left anchored, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict AABB overlap test. Exact edge contact is a miss.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Point containment (used for affordance hit-tests)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Collect every overlapping (bullet, enemy) index pair in a single pass.
///
/// The caller decides how many pairs to resolve; nothing is removed here.
pub fn detect_collisions(bullets: &[Rect], enemies: &[Rect]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (bi, bullet) in bullets.iter().enumerate() {
        for (ei, enemy) in enemies.iter().enumerate() {
            if bullet.overlaps(enemy) {
                pairs.push((bi, ei));
            }
        }
    }
    pairs
}

/// Filter raw pairs so each bullet consumes at most one enemy and each enemy
/// dies at most once per frame, first pair in pass order wins.
pub fn resolve_first_wins(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut used_bullets = Vec::new();
    let mut used_enemies = Vec::new();
    let mut kills = Vec::new();
    for &(bi, ei) in pairs {
        if used_bullets.contains(&bi) || used_enemies.contains(&ei) {
            continue;
        }
        used_bullets.push(bi);
        used_enemies.push(ei);
        kills.push((bi, ei));
    }
    kills
}
