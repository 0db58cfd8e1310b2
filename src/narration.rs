//! Narration gateway and sequencing
//!
//! The game never blocks on audio: speech and clip playback are
//! fire-and-forget calls on the [`Narrator`] gateway. Dependent steps (the
//! female reading, a fixed gap, then the male reading) are sequenced by a
//! small tick-driven queue. Every queued step carries the cancellation
//! token of its enqueue generation; pausing or stopping the game cancels
//! the token, so stale continuations can never fire later.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::consts::NARRATION_GAP_TICKS;

/// Narration voice selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGender {
    Female,
    Male,
}

/// External speech/clip gateway. All calls return immediately; completion
/// may race with gameplay and gameplay never gates on it.
pub trait Narrator {
    fn speak(&mut self, text: &str, voice: VoiceGender);
    fn play_clip(&mut self, clip: &str);
    fn play_background_loop(&mut self, track: &str);
    fn stop_all(&mut self);
}

/// One queued narration action
#[derive(Debug, Clone)]
pub enum NarrationStep {
    Speak { text: String, voice: VoiceGender },
    PlayClip(String),
    Wait(u32),
}

/// Shared cancellation flag; cloned into every step of a generation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Tick-driven step sequencer. The shell advances it once per frame.
#[derive(Debug, Default)]
pub struct NarrationQueue {
    steps: VecDeque<(CancelToken, NarrationStep)>,
    wait_left: u32,
    token: CancelToken,
}

impl NarrationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.steps.is_empty() && self.wait_left == 0
    }

    pub fn enqueue(&mut self, step: NarrationStep) {
        self.steps.push_back((self.token.clone(), step));
    }

    /// Queue the standard reveal narration: a pre-recorded clip when one
    /// exists, otherwise the sentence spoken twice (female, gap, male).
    pub fn enqueue_reveal(&mut self, text: &str, clip: Option<&str>) {
        match clip {
            Some(clip) => self.enqueue(NarrationStep::PlayClip(clip.to_string())),
            None => {
                self.enqueue(NarrationStep::Speak {
                    text: text.to_string(),
                    voice: VoiceGender::Female,
                });
                self.enqueue(NarrationStep::Wait(NARRATION_GAP_TICKS));
                self.enqueue(NarrationStep::Speak {
                    text: text.to_string(),
                    voice: VoiceGender::Male,
                });
            }
        }
    }

    /// Drop every pending step, invalidate their tokens, and silence the
    /// gateway. Called on pause and stop; narration is never auto-resumed.
    pub fn cancel(&mut self, narrator: &mut dyn Narrator) {
        self.token.cancel();
        self.token = CancelToken::default();
        self.steps.clear();
        self.wait_left = 0;
        narrator.stop_all();
    }

    /// Advance one tick: honor a pending wait, then run steps up to and
    /// including the next wait. Each step's token is checked right before
    /// it fires.
    pub fn advance(&mut self, narrator: &mut dyn Narrator) {
        if self.wait_left > 0 {
            self.wait_left -= 1;
            return;
        }
        while let Some((token, step)) = self.steps.pop_front() {
            if token.is_cancelled() {
                continue;
            }
            match step {
                NarrationStep::Speak { text, voice } => narrator.speak(&text, voice),
                NarrationStep::PlayClip(clip) => narrator.play_clip(&clip),
                NarrationStep::Wait(ticks) => {
                    self.wait_left = ticks;
                    return;
                }
            }
        }
    }
}

/// Speech-synthesis narrator for the browser. Failures are logged and
/// skipped; narration is best-effort and never fatal.
#[cfg(target_arch = "wasm32")]
pub struct SpeechNarrator {
    synth: Option<web_sys::SpeechSynthesis>,
    background: Option<web_sys::HtmlAudioElement>,
    volume: f32,
}

#[cfg(target_arch = "wasm32")]
impl SpeechNarrator {
    pub fn new(volume: f32) -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            log::warn!("speech synthesis unavailable, narration disabled");
        }
        Self {
            synth,
            background: None,
            volume,
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(target_arch = "wasm32")]
impl Narrator for SpeechNarrator {
    fn speak(&mut self, text: &str, voice: VoiceGender) {
        let Some(synth) = &self.synth else { return };
        match web_sys::SpeechSynthesisUtterance::new_with_text(text) {
            Ok(utterance) => {
                utterance.set_lang("en-US");
                utterance.set_rate(0.95);
                utterance.set_volume(self.volume);
                utterance.set_pitch(match voice {
                    VoiceGender::Female => 1.4,
                    VoiceGender::Male => 0.8,
                });
                synth.speak(&utterance);
            }
            Err(err) => log::warn!("utterance creation failed: {err:?}"),
        }
    }

    fn play_clip(&mut self, clip: &str) {
        match web_sys::HtmlAudioElement::new_with_src(&format!("audio/{clip}.mp3")) {
            Ok(audio) => {
                audio.set_volume(self.volume as f64);
                if let Err(err) = audio.play() {
                    log::warn!("clip playback rejected: {err:?}");
                }
            }
            Err(err) => log::warn!("clip load failed: {err:?}"),
        }
    }

    fn play_background_loop(&mut self, track: &str) {
        match web_sys::HtmlAudioElement::new_with_src(&format!("audio/{track}.mp3")) {
            Ok(audio) => {
                audio.set_loop(true);
                audio.set_volume((self.volume * 0.4) as f64);
                if let Err(err) = audio.play() {
                    log::warn!("background playback rejected: {err:?}");
                }
                self.background = Some(audio);
            }
            Err(err) => log::warn!("background load failed: {err:?}"),
        }
    }

    fn stop_all(&mut self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
        if let Some(audio) = self.background.take() {
            audio.pause().ok();
        }
    }
}

/// No-op narrator for native builds and headless tests.
#[derive(Debug, Default)]
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn speak(&mut self, _text: &str, _voice: VoiceGender) {}
    fn play_clip(&mut self, _clip: &str) {}
    fn play_background_loop(&mut self, _track: &str) {}
    fn stop_all(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingNarrator {
        calls: Vec<String>,
    }

    impl Narrator for RecordingNarrator {
        fn speak(&mut self, text: &str, voice: VoiceGender) {
            self.calls.push(format!("speak:{voice:?}:{text}"));
        }
        fn play_clip(&mut self, clip: &str) {
            self.calls.push(format!("clip:{clip}"));
        }
        fn play_background_loop(&mut self, track: &str) {
            self.calls.push(format!("loop:{track}"));
        }
        fn stop_all(&mut self) {
            self.calls.push("stop".to_string());
        }
    }

    #[test]
    fn test_reveal_speaks_both_voices_with_gap() {
        let mut queue = NarrationQueue::new();
        let mut narrator = RecordingNarrator::default();
        queue.enqueue_reveal("hello there", None);

        queue.advance(&mut narrator);
        assert_eq!(narrator.calls, vec!["speak:Female:hello there"]);

        // The male reading only fires after the full gap
        for _ in 0..NARRATION_GAP_TICKS {
            queue.advance(&mut narrator);
        }
        assert_eq!(narrator.calls.len(), 1);
        queue.advance(&mut narrator);
        assert_eq!(narrator.calls[1], "speak:Male:hello there");
        assert!(queue.is_idle());
    }

    #[test]
    fn test_clip_takes_priority_over_speech() {
        let mut queue = NarrationQueue::new();
        let mut narrator = RecordingNarrator::default();
        queue.enqueue_reveal("ignored", Some("lesson01"));
        queue.advance(&mut narrator);
        assert_eq!(narrator.calls, vec!["clip:lesson01"]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_cancel_drops_pending_and_silences() {
        let mut queue = NarrationQueue::new();
        let mut narrator = RecordingNarrator::default();
        queue.enqueue_reveal("abandoned", None);
        queue.advance(&mut narrator); // female reading fired

        queue.cancel(&mut narrator);
        assert_eq!(narrator.calls.last().unwrap(), "stop");

        // Nothing stale fires afterwards, however long we wait
        for _ in 0..NARRATION_GAP_TICKS * 2 {
            queue.advance(&mut narrator);
        }
        assert_eq!(narrator.calls.len(), 2);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_steps_enqueued_after_cancel_still_run() {
        let mut queue = NarrationQueue::new();
        let mut narrator = RecordingNarrator::default();
        queue.enqueue_reveal("old", None);
        queue.cancel(&mut narrator);

        queue.enqueue_reveal("new", None);
        queue.advance(&mut narrator);
        assert_eq!(narrator.calls.last().unwrap(), "speak:Female:new");
    }
}
