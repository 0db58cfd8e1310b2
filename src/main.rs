//! Word Blast entry point
//!
//! Wires browser input and DOM chrome to the simulation, drives the
//! fixed-timestep loop, and drains game events into audio and narration.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use word_blast::audio::{AudioManager, SoundEffect};
    use word_blast::consts::*;
    use word_blast::deck::{self, StubDictionary, WordTranslator};
    use word_blast::narration::{NarrationQueue, Narrator, SpeechNarrator};
    use word_blast::render::{CanvasMeasure, CanvasPainter};
    use word_blast::sim::layout::{MonoMeasure, TextMeasure};
    use word_blast::sim::{
        GameEvent, GamePhase, GameState, SentenceSession, StartError, TickInput, tick,
    };
    use word_blast::{DeckProgress, Settings};

    const BACKGROUND_TRACK: &str = "background";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        progress: DeckProgress,
        settings: Settings,
        narration: NarrationQueue,
        narrator: SpeechNarrator,
        audio: AudioManager,
        painter: Option<CanvasPainter>,
        measure: Box<dyn TextMeasure>,
        dictionary: StubDictionary,
        accumulator: f32,
        last_time: f64,
        /// Phase seen at the end of the previous frame, for transition hooks
        last_phase: GamePhase,
        assets_ready: bool,
        /// Whether a frame callback is currently scheduled
        running: bool,
    }

    impl Game {
        /// Run simulation ticks and drain their events
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(
                    &mut self.state,
                    &input,
                    self.measure.as_ref(),
                    &mut self.progress,
                );
                self.narration.advance(&mut self.narrator);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pointer_down = None;
                self.input.pause = false;
                self.input.stop = false;

                self.drain_events();
            }
        }

        fn drain_events(&mut self) {
            let events = std::mem::take(&mut self.state.events);
            for event in events {
                match event {
                    GameEvent::ShotFired => self.audio.play(SoundEffect::Shoot),
                    GameEvent::EnemyDestroyed { .. } | GameEvent::PlayerHit => {
                        self.audio.play(SoundEffect::Explosion);
                    }
                    GameEvent::SentenceRevealed {
                        text, deck_index, ..
                    } => {
                        self.audio.play(SoundEffect::Reveal);
                        self.narration
                            .enqueue_reveal(&text, deck::DECK[deck_index].clip);
                    }
                    GameEvent::ReplayRequested { deck_index } => {
                        self.audio.play(SoundEffect::UiTap);
                        let sentence = deck::DECK[deck_index];
                        self.narration.enqueue_reveal(sentence.text, sentence.clip);
                    }
                    GameEvent::WordTapped { word } => {
                        self.audio.play(SoundEffect::UiTap);
                        match self.dictionary.translate(&word) {
                            Some(meaning) => show_notice(&format!("{word}: {meaning}")),
                            None => log::info!("no dictionary entry for {word}"),
                        }
                    }
                }
            }
        }

        fn render(&self) {
            if let Some(painter) = &self.painter {
                painter.draw(&self.state.snapshot());
            }
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud-progress") {
                el.set_text_content(Some(&format!(
                    "{}/{}",
                    self.state.session.cursor() + 1,
                    deck::DECK.len()
                )));
            }
        }

        /// One animation frame. Returns false when the tick chain must halt.
        fn frame(&mut self, time: f64) -> bool {
            if self.last_time == 0.0 {
                self.last_time = time;
            }
            let dt = ((time - self.last_time) / 1000.0) as f32;
            self.last_time = time;

            self.update(dt);
            self.render();
            self.update_hud();

            let phase = self.state.phase;
            // Narration abandoned at pause is not resumed, but the
            // background track comes back
            if phase == GamePhase::Playing
                && self.last_phase == GamePhase::Paused
                && self.settings.background_music
            {
                self.narrator.play_background_loop(BACKGROUND_TRACK);
            }
            self.last_phase = phase;

            if phase == GamePhase::Playing {
                true
            } else {
                // Paused or stopped: abandon pending narration immediately
                self.narration.cancel(&mut self.narrator);
                self.running = false;
                false
            }
        }

        fn start(&mut self) {
            match self.state.start(self.assets_ready) {
                Ok(()) => {
                    hide_notice();
                    self.audio.resume();
                    if self.settings.background_music {
                        self.narrator.play_background_loop(BACKGROUND_TRACK);
                    }
                }
                Err(err @ StartError::AssetsNotReady) => {
                    log::warn!("start rejected: {err}");
                    show_notice("Still loading, try again in a moment");
                }
                Err(err) => log::warn!("start rejected: {err}"),
            }
        }
    }

    fn show_notice(text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("notice"))
        {
            el.set_text_content(Some(text));
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_notice() {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("notice"))
        {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    /// Schedule the next animation frame if the chain is not already live
    fn ensure_running(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.running {
                return;
            }
            g.running = true;
            g.last_time = 0.0;
            g.accumulator = 0.0;
        }
        schedule_frame(game.clone());
    }

    fn schedule_frame(game: Rc<RefCell<Game>>) {
        let closure = Closure::once_into_js(move |time: f64| {
            let keep_going = game.borrow_mut().frame(time);
            if keep_going {
                schedule_frame(game);
            }
        });
        web_sys::window()
            .expect("no window")
            .request_animation_frame(closure.unchecked_ref())
            .expect("requestAnimationFrame failed");
    }

    fn canvas_point(canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch: reposition and fire, matching the one-finger play style
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let p = canvas_point(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    game.borrow_mut().input.pointer_down = Some(p);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag: reposition only
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let p = canvas_point(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    game.borrow_mut().input.pointer_move = Some(p);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse equivalents for desktop
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().input.pointer_down = Some(p);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.buttons() != 0 {
                    let p = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                    game.borrow_mut().input.pointer_move = Some(p);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: Escape pauses
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Escape" {
                    game.borrow_mut().input.pause = true;
                    ensure_running(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_control_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("startBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().start();
                if game.borrow().state.phase == GamePhase::Playing {
                    ensure_running(&game);
                }
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pauseBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let phase = game.borrow().state.phase;
                match phase {
                    GamePhase::Playing | GamePhase::Paused => {
                        game.borrow_mut().input.pause = true;
                        ensure_running(&game);
                    }
                    GamePhase::Ready => {}
                }
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("stopBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.stop = true;
                ensure_running(&game);
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Auto-pause when the tab is hidden
    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let document = web_sys::window().unwrap().document().unwrap();
            let mut g = game.borrow_mut();
            let g = &mut *g;
            if document.hidden() {
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                }
                // Frame callbacks stop while hidden, so silence speech now
                g.narration.cancel(&mut g.narrator);
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            } else if g.settings.mute_on_blur {
                g.audio.set_muted(false);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            let mut g = game.borrow_mut();
            g.state.resize(w as f32, h as f32);
            if let Some(painter) = &mut g.painter {
                painter.set_size(w, h);
            }
        });
        let _ =
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Word Blast starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: Option<CanvasRenderingContext2d> = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into().ok());

        let settings = Settings::load();
        let mut progress = DeckProgress::load();
        let mut session = SentenceSession::new(
            settings.mode,
            deck::DECK,
            &mut progress,
            settings.word_lookup,
        );
        session.set_translations_visible(settings.show_translations);

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, width as f32, height as f32, session);
        log::info!("Game initialized with seed: {seed}");

        let assets_ready = ctx.is_some();
        if !assets_ready {
            log::error!("2D canvas context unavailable");
        }
        let painter = ctx
            .clone()
            .map(|ctx| CanvasPainter::new(ctx, width, height));
        let measure: Box<dyn TextMeasure> = match ctx {
            Some(ctx) => Box::new(CanvasMeasure::new(ctx)),
            None => Box::new(MonoMeasure::default()),
        };
        let narrator = SpeechNarrator::new(settings.effective_speech_volume());
        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);

        let game = Rc::new(RefCell::new(Game {
            state,
            input: TickInput::default(),
            progress,
            settings,
            narration: NarrationQueue::new(),
            narrator,
            audio,
            painter,
            measure,
            dictionary: StubDictionary,
            accumulator: 0.0,
            last_time: 0.0,
            last_phase: GamePhase::Ready,
            assets_ready,
            running: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_control_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(canvas, game.clone());

        // Draw the idle screen once; the tick chain starts with the Start button
        game.borrow().render();

        log::info!("Word Blast ready");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Word Blast is a browser game; build for wasm32 (e.g. with trunk) to play.");
}
