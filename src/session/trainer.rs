use std::time::Instant;

use rand::rngs::SmallRng;

use crate::audio::ToneEmitter;
use crate::engine::charset::CharSet;
use crate::engine::timing::FEEDBACK_DELAY;
use crate::morse::{self, Symbol};
use crate::session::input::SymbolInput;
use crate::session::playback::PulsePlayback;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Character shown, user keys its symbols.
    #[default]
    TextToSymbols,
    /// Symbols played as pulses, user types the character.
    SymbolsToText,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::TextToSymbols => "Text -> Morse",
            Direction::SymbolsToText => "Morse -> Text",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Direction::TextToSymbols => Direction::SymbolsToText,
            Direction::SymbolsToText => Direction::TextToSymbols,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainerFeedback {
    Correct,
    /// `keyed` is what the wrong symbols spell, when they spell anything.
    Incorrect { answer: String, keyed: Option<char> },
}

impl TrainerFeedback {
    pub fn message(&self) -> String {
        match self {
            TrainerFeedback::Correct => "Correct!".to_string(),
            TrainerFeedback::Incorrect { answer, .. } => format!("Correct answer: {answer}"),
        }
    }

    pub fn keyed_note(&self) -> Option<String> {
        match self {
            TrainerFeedback::Incorrect {
                keyed: Some(ch), ..
            } => Some(format!("You keyed: {ch}")),
            _ => None,
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, TrainerFeedback::Correct)
    }
}

/// Untimed, endless practice outside the level catalog.
pub struct TrainerSession {
    rng: SmallRng,
    direction: Direction,
    charset: CharSet,
    running: bool,
    challenge: Option<char>,
    code: String,
    input: SymbolInput,
    typed: Option<char>,
    revealed: bool,
    feedback: Option<TrainerFeedback>,
    next_at: Option<Instant>,
    playback: PulsePlayback,
}

impl TrainerSession {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            rng,
            direction: Direction::default(),
            charset: CharSet::default(),
            running: false,
            challenge: None,
            code: String::new(),
            input: SymbolInput::default(),
            typed: None,
            revealed: false,
            feedback: None,
            next_at: None,
            playback: PulsePlayback::default(),
        }
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.running {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn set_charset(&mut self, charset: CharSet) -> bool {
        if self.running {
            return false;
        }
        self.charset = charset;
        true
    }

    pub fn start(&mut self, now: Instant) {
        self.running = true;
        self.next_challenge(now);
        tracing::debug!(
            "trainer started: {} / {}",
            self.direction.label(),
            self.charset.label()
        );
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.challenge = None;
        self.code.clear();
        self.reset_attempt();
        self.playback.cancel();
    }

    fn reset_attempt(&mut self) {
        self.input.clear();
        self.typed = None;
        self.revealed = false;
        self.feedback = None;
        self.next_at = None;
    }

    fn next_challenge(&mut self, now: Instant) {
        let ch = self.charset.pick(&mut self.rng);
        self.challenge = Some(ch);
        self.code = morse::encode_char(ch).unwrap_or_default().to_string();
        self.reset_attempt();
        self.playback.cancel();
        if self.direction == Direction::SymbolsToText {
            self.playback.start(&self.code, now);
        }
    }

    fn awaiting_answer(&self, direction: Direction) -> bool {
        self.running && self.direction == direction && self.feedback.is_none()
    }

    pub fn push_symbol(&mut self, symbol: Symbol, now: Instant) -> bool {
        if !self.awaiting_answer(Direction::TextToSymbols) {
            return false;
        }
        self.input.push(symbol, now);
        true
    }

    pub fn clear_input(&mut self) {
        if self.feedback.is_none() {
            self.input.clear();
            self.typed = None;
        }
    }

    /// Single-character answer; a new key replaces the previous one.
    pub fn type_char(&mut self, ch: char) -> bool {
        if !self.awaiting_answer(Direction::SymbolsToText) || !ch.is_ascii_alphanumeric() {
            return false;
        }
        self.typed = Some(ch.to_ascii_uppercase());
        true
    }

    pub fn backspace(&mut self) {
        if self.feedback.is_none() {
            self.typed = None;
        }
    }

    pub fn submit(&mut self, now: Instant) -> Option<TrainerFeedback> {
        if !self.running || self.feedback.is_some() {
            return None;
        }
        let challenge = self.challenge?;
        let feedback = match self.direction {
            Direction::TextToSymbols => {
                if self.input.is_empty() {
                    return None;
                }
                if self.input.matches(&self.code) {
                    TrainerFeedback::Correct
                } else {
                    TrainerFeedback::Incorrect {
                        answer: self.code.clone(),
                        keyed: morse::decode_char(&self.input.as_code()),
                    }
                }
            }
            Direction::SymbolsToText => {
                let typed = self.typed?;
                if typed.eq_ignore_ascii_case(&challenge) {
                    TrainerFeedback::Correct
                } else {
                    TrainerFeedback::Incorrect {
                        answer: challenge.to_string(),
                        keyed: None,
                    }
                }
            }
        };
        self.feedback = Some(feedback.clone());
        self.next_at = Some(now + FEEDBACK_DELAY);
        Some(feedback)
    }

    pub fn reveal_answer(&mut self) -> bool {
        if !self.awaiting_answer(Direction::SymbolsToText) {
            return false;
        }
        self.revealed = true;
        true
    }

    pub fn replay(&mut self, now: Instant) -> bool {
        if !self.awaiting_answer(Direction::SymbolsToText) {
            return false;
        }
        self.playback.start(&self.code, now)
    }

    /// Sound due pulses and move on once feedback has been shown long
    /// enough. Returns true when a new challenge was drawn.
    pub fn poll(&mut self, now: Instant, emitter: &dyn ToneEmitter) -> bool {
        self.playback.poll(now, emitter);
        match self.next_at {
            Some(at) if self.running && now >= at => {
                self.next_challenge(now);
                true
            }
            _ => false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn charset(&self) -> CharSet {
        self.charset
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn challenge(&self) -> Option<char> {
        self.challenge
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn input(&self) -> &SymbolInput {
        &self.input
    }

    pub fn typed(&self) -> Option<char> {
        self.typed
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn feedback(&self) -> Option<&TrainerFeedback> {
        self.feedback.as_ref()
    }

    pub fn is_playing(&self, now: Instant) -> bool {
        self.playback.is_playing(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SilentEmitter, Tone};
    use crate::clock::{Clock, ManualClock};
    use rand::SeedableRng;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingEmitter {
        tones: RefCell<Vec<Tone>>,
    }

    impl ToneEmitter for RecordingEmitter {
        fn emit(&self, tone: Tone) {
            self.tones.borrow_mut().push(tone);
        }
    }

    fn trainer(seed: u64) -> TrainerSession {
        TrainerSession::new(SmallRng::seed_from_u64(seed))
    }

    fn key_code(session: &mut TrainerSession, code: &str, now: Instant) {
        for ch in code.chars() {
            session.push_symbol(Symbol::from_char(ch).unwrap(), now);
        }
    }

    #[test]
    fn test_numbers_only_produces_digits() {
        let clock = ManualClock::new();
        let mut t = trainer(7);
        t.set_charset(CharSet::Numbers);
        t.start(clock.now());
        for _ in 0..200 {
            assert!(t.challenge().unwrap().is_ascii_digit());
            t.stop();
            t.start(clock.now());
        }
    }

    #[test]
    fn test_settings_locked_while_running() {
        let clock = ManualClock::new();
        let mut t = trainer(1);
        t.start(clock.now());
        assert!(!t.set_charset(CharSet::All));
        assert!(!t.set_direction(Direction::SymbolsToText));
        t.stop();
        assert!(t.set_direction(Direction::SymbolsToText));
        assert_eq!(t.direction(), Direction::SymbolsToText);
    }

    #[test]
    fn test_text_to_symbols_correct_then_auto_next() {
        let clock = ManualClock::new();
        let mut t = trainer(3);
        t.start(clock.now());
        let code = t.code().to_string();
        assert!(!code.is_empty());

        key_code(&mut t, &code, clock.now());
        assert_eq!(t.submit(clock.now()), Some(TrainerFeedback::Correct));
        assert_eq!(t.submit(clock.now()), None);
        assert!(!t.push_symbol(Symbol::Dot, clock.now()));

        clock.advance_ms(1499);
        assert!(!t.poll(clock.now(), &SilentEmitter));
        clock.advance_ms(1);
        assert!(t.poll(clock.now(), &SilentEmitter));
        assert!(t.feedback().is_none());
        assert!(t.input().is_empty());
    }

    #[test]
    fn test_wrong_symbols_report_code() {
        let clock = ManualClock::new();
        let mut t = trainer(5);
        t.start(clock.now());
        let code = t.code().to_string();
        let wrong = format!("{code}.");
        key_code(&mut t, &wrong, clock.now());
        let feedback = t.submit(clock.now()).unwrap();
        assert_eq!(feedback.message(), format!("Correct answer: {code}"));
    }

    #[test]
    fn test_wrong_symbols_name_what_they_spell() {
        let clock = ManualClock::new();
        let mut t = trainer(29);
        t.set_charset(CharSet::Numbers);
        t.start(clock.now());
        // Digits never encode as a lone dot, which spells E.
        key_code(&mut t, ".", clock.now());
        let feedback = t.submit(clock.now()).unwrap();
        assert_eq!(feedback.keyed_note().as_deref(), Some("You keyed: E"));
    }

    #[test]
    fn test_empty_submit_ignored() {
        let clock = ManualClock::new();
        let mut t = trainer(2);
        t.start(clock.now());
        assert_eq!(t.submit(clock.now()), None);
        t.stop();
        t.set_direction(Direction::SymbolsToText);
        t.start(clock.now());
        assert_eq!(t.submit(clock.now()), None);
    }

    #[test]
    fn test_symbols_to_text_case_insensitive() {
        let clock = ManualClock::new();
        let mut t = trainer(11);
        t.set_direction(Direction::SymbolsToText);
        t.start(clock.now());
        let answer = t.challenge().unwrap().to_ascii_lowercase();
        assert!(t.type_char(answer));
        assert_eq!(t.submit(clock.now()), Some(TrainerFeedback::Correct));
    }

    #[test]
    fn test_symbols_to_text_plays_pulses() {
        let clock = ManualClock::new();
        let emitter = RecordingEmitter::default();
        let mut t = trainer(13);
        t.set_direction(Direction::SymbolsToText);
        t.start(clock.now());
        let code = t.code().to_string();
        clock.advance_ms(10_000);
        t.poll(clock.now(), &emitter);
        let played: String = emitter
            .tones
            .borrow()
            .iter()
            .map(|tone| if *tone == Tone::Dot { '.' } else { '-' })
            .collect();
        assert_eq!(played, code);
    }

    #[test]
    fn test_replay_refused_during_playback() {
        let clock = ManualClock::new();
        let mut t = trainer(17);
        t.set_direction(Direction::SymbolsToText);
        t.start(clock.now());
        assert!(t.is_playing(clock.now()));
        assert!(!t.replay(clock.now()));
        clock.advance_ms(10_000);
        t.poll(clock.now(), &SilentEmitter);
        assert!(t.replay(clock.now()));
    }

    #[test]
    fn test_reveal_until_feedback() {
        let clock = ManualClock::new();
        let mut t = trainer(19);
        t.set_direction(Direction::SymbolsToText);
        t.start(clock.now());
        assert!(t.reveal_answer());
        assert!(t.is_revealed());
        t.type_char('0');
        t.submit(clock.now());
        clock.advance(FEEDBACK_DELAY);
        t.poll(clock.now(), &SilentEmitter);
        assert!(!t.is_revealed());
    }

    #[test]
    fn test_stop_cancels_pending_work() {
        let clock = ManualClock::new();
        let emitter = RecordingEmitter::default();
        let mut t = trainer(23);
        t.set_direction(Direction::SymbolsToText);
        t.start(clock.now());
        t.type_char('A');
        t.submit(clock.now());
        t.stop();

        clock.advance_ms(10_000);
        assert!(!t.poll(clock.now(), &emitter));
        assert!(emitter.tones.borrow().is_empty());
        assert!(t.challenge().is_none());
        assert!(t.feedback().is_none());
    }
}
