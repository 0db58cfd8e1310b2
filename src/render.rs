//! Canvas 2D painter
//!
//! Draws the per-frame `RenderSnapshot` and nothing else; all gameplay
//! decisions happen in `sim`. Also hosts the canvas-backed text measurer
//! that keeps gather targets and hit boxes in sync with what is drawn.

use web_sys::CanvasRenderingContext2d;

use crate::consts::LINE_HEIGHT;
use crate::sim::layout::TextMeasure;
use crate::sim::state::RenderSnapshot;

/// Font used for fragments and revealed sentences; the measurer must match.
pub const TEXT_FONT: &str = "22px 'Trebuchet MS', sans-serif";
const TRANSLATION_FONT: &str = "16px 'Trebuchet MS', sans-serif";

const BACKGROUND: &str = "#0b1021";
const PLAYER_COLOR: &str = "#4f8ef7";
const BULLET_COLOR: &str = "red";
const ENEMY_BULLET_COLOR: &str = "orange";
const SPRITE_COLORS: [&str; 2] = ["#e05d5d", "#9b59b6"];
const TRANSLATION_COLOR: &str = "#9aa4c0";
const REPLAY_COLOR: &str = "#3ddc84";

/// Measures text through the same 2D context the painter draws with.
pub struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasMeasure {
    fn width(&self, text: &str) -> f32 {
        self.ctx.set_font(TEXT_FONT);
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }
}

/// Stateless snapshot painter
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn draw(&self, snap: &RenderSnapshot<'_>) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_fill_style_str(PLAYER_COLOR);
        ctx.fill_rect(
            snap.player.x as f64,
            snap.player.y as f64,
            snap.player.w as f64,
            snap.player.h as f64,
        );

        for enemy in &snap.enemies {
            let color = SPRITE_COLORS[enemy.sprite as usize % SPRITE_COLORS.len()];
            ctx.set_fill_style_str(color);
            ctx.fill_rect(
                enemy.rect.x as f64,
                enemy.rect.y as f64,
                enemy.rect.w as f64,
                enemy.rect.h as f64,
            );
        }

        ctx.set_fill_style_str(BULLET_COLOR);
        for rect in &snap.bullets {
            ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        }
        ctx.set_fill_style_str(ENEMY_BULLET_COLOR);
        for rect in &snap.enemy_bullets {
            ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        }

        ctx.set_font(TEXT_FONT);
        ctx.set_text_baseline("top");

        for fragment in &snap.fragments {
            ctx.set_fill_style_str(&fragment.color.to_css());
            let _ = ctx.fill_text(fragment.word, fragment.pos.x as f64, fragment.pos.y as f64);
        }

        for block in &snap.blocks {
            for word in &block.words {
                ctx.set_fill_style_str(&word.color.to_css());
                let _ = ctx.fill_text(&word.text, word.rect.x as f64, word.rect.y as f64);
            }
            if snap.translations_visible && !block.words.is_empty() {
                let bottom = block
                    .words
                    .iter()
                    .map(|w| w.rect.y)
                    .fold(f32::NEG_INFINITY, f32::max);
                ctx.set_font(TRANSLATION_FONT);
                ctx.set_fill_style_str(TRANSLATION_COLOR);
                ctx.set_text_align("center");
                let _ = ctx.fill_text(
                    block.translation,
                    self.width / 2.0,
                    (bottom + LINE_HEIGHT) as f64,
                );
                ctx.set_text_align("start");
                ctx.set_font(TEXT_FONT);
            }
        }

        if let Some(button) = snap.replay_button {
            ctx.set_fill_style_str(REPLAY_COLOR);
            ctx.begin_path();
            ctx.move_to(button.x as f64, button.y as f64);
            ctx.line_to(button.x as f64, (button.y + button.h) as f64);
            ctx.line_to((button.x + button.w) as f64, (button.y + button.h / 2.0) as f64);
            ctx.close_path();
            ctx.fill();
        }
    }
}
