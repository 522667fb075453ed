use std::time::{Duration, Instant};

use crate::catalog::Level;
use crate::engine::timing::{self, FEEDBACK_DELAY, TICK_STEP};
use crate::hint::{HintRequest, HintSlot};
use crate::morse::{self, Symbol};
use crate::session::input::SymbolInput;
use crate::session::result::LevelSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizState {
    /// Challenge shown, nothing entered yet.
    Presenting,
    Answering,
    Correct,
    /// Wrong submission; the next retry action starts a fresh attempt.
    Incorrect,
    /// Countdown ran out; waits for the automatic advance.
    TimeExpired,
    LevelComplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    Correct,
    Incorrect,
    TimeExpired,
    Advanced { index: usize },
    LevelComplete,
}

/// One pass through a level's challenges.
pub struct QuizSession {
    level_index: Option<usize>,
    level_name: String,
    challenges: Vec<String>,
    index: usize,
    expected: String,
    input: SymbolInput,
    state: QuizState,
    timed: bool,
    budget: Duration,
    remaining: Duration,
    last_step: Instant,
    advance_at: Option<Instant>,
    hint: HintSlot,
    serial: u64,
    summary: LevelSummary,
}

impl QuizSession {
    /// Timed session over a catalog level.
    pub fn for_level(level_index: usize, level: &Level, now: Instant) -> Self {
        Self::new(Some(level_index), &level.name, level.challenges.clone(), true, now)
    }

    pub fn new(
        level_index: Option<usize>,
        level_name: &str,
        challenges: Vec<String>,
        timed: bool,
        now: Instant,
    ) -> Self {
        let summary = LevelSummary::new(level_index, level_name, challenges.len(), now);
        let mut session = Self {
            level_index,
            level_name: level_name.to_string(),
            challenges,
            index: 0,
            expected: String::new(),
            input: SymbolInput::default(),
            state: QuizState::Presenting,
            timed,
            budget: Duration::ZERO,
            remaining: Duration::ZERO,
            last_step: now,
            advance_at: None,
            hint: HintSlot::default(),
            serial: 0,
            summary,
        };
        if session.challenges.is_empty() {
            session.finish(now);
        } else {
            session.present(now);
        }
        session
    }

    /// Continue hint serials from an earlier session so its late replies
    /// never match a challenge here.
    pub fn with_first_serial(mut self, serial: u64) -> Self {
        self.serial = serial;
        self
    }

    fn present(&mut self, now: Instant) {
        let challenge = &self.challenges[self.index];
        self.expected = morse::encode(challenge);
        self.budget = timing::time_budget(challenge);
        self.remaining = self.budget;
        self.last_step = now;
        self.advance_at = None;
        self.input.clear();
        self.hint.clear();
        self.state = QuizState::Presenting;
    }

    fn finish(&mut self, now: Instant) {
        self.state = QuizState::LevelComplete;
        self.advance_at = None;
        self.hint.clear();
        self.summary.finished_at = Some(now);
    }

    fn advance(&mut self, now: Instant) -> QuizEvent {
        self.serial += 1;
        if self.index + 1 < self.challenges.len() {
            self.index += 1;
            self.present(now);
            QuizEvent::Advanced { index: self.index }
        } else {
            self.finish(now);
            QuizEvent::LevelComplete
        }
    }

    /// Input is frozen once the answer is accepted or the clock ran out.
    fn accepts_input(&self) -> bool {
        matches!(
            self.state,
            QuizState::Presenting | QuizState::Answering | QuizState::Incorrect
        )
    }

    fn begin_retry_if_needed(&mut self) {
        if self.state == QuizState::Incorrect {
            self.input.clear();
        }
    }

    pub fn push_symbol(&mut self, symbol: Symbol, now: Instant) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.begin_retry_if_needed();
        self.input.push(symbol, now);
        self.state = QuizState::Answering;
        true
    }

    pub fn clear(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.input.clear();
        self.state = QuizState::Answering;
        true
    }

    /// Explicit retry after a wrong answer.
    pub fn retry(&mut self) -> bool {
        if self.state != QuizState::Incorrect {
            return false;
        }
        self.input.clear();
        self.state = QuizState::Answering;
        true
    }

    pub fn submit(&mut self) -> Option<QuizEvent> {
        if !self.accepts_input() {
            return None;
        }
        if self.input.matches(&self.expected) {
            self.state = QuizState::Correct;
            self.summary.correct += 1;
            Some(QuizEvent::Correct)
        } else {
            self.state = QuizState::Incorrect;
            self.summary.incorrect_attempts += 1;
            Some(QuizEvent::Incorrect)
        }
    }

    /// Move on after a correct answer.
    pub fn next(&mut self, now: Instant) -> Option<QuizEvent> {
        if self.state != QuizState::Correct {
            return None;
        }
        Some(self.advance(now))
    }

    /// Drive the countdown and the delayed advance. Reports at most one
    /// event per call.
    pub fn poll(&mut self, now: Instant) -> Option<QuizEvent> {
        match self.state {
            QuizState::TimeExpired => match self.advance_at {
                Some(at) if now >= at => Some(self.advance(now)),
                _ => None,
            },
            QuizState::Presenting | QuizState::Answering | QuizState::Incorrect if self.timed => {
                self.step_countdown(now);
                if self.remaining.is_zero() {
                    self.state = QuizState::TimeExpired;
                    self.advance_at = Some(now + FEEDBACK_DELAY);
                    self.summary.timeouts += 1;
                    Some(QuizEvent::TimeExpired)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Refill the countdown, used when returning from the trainer.
    pub fn restart_timer(&mut self, now: Instant) {
        if self.accepts_input() {
            self.remaining = self.budget;
        }
        self.last_step = now;
    }

    fn step_countdown(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_step);
        let steps = (elapsed.as_millis() / TICK_STEP.as_millis()) as u32;
        if steps > 0 {
            let consumed = TICK_STEP * steps;
            self.remaining = self.remaining.saturating_sub(consumed);
            self.last_step += consumed;
        }
    }

    pub fn request_hint(&mut self) -> HintRequest {
        if self.state == QuizState::LevelComplete {
            return HintRequest::Ignored;
        }
        let challenge = self.challenges[self.index].clone();
        self.hint.request(&challenge, self.serial)
    }

    /// Store a fetched hint. Replies for an earlier challenge are dropped.
    pub fn receive_hint(&mut self, serial: u64, text: String) -> bool {
        if serial != self.serial || !self.hint.is_loading() {
            return false;
        }
        self.hint.fulfil(text);
        true
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn level_index(&self) -> Option<usize> {
        self.level_index
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn challenge(&self) -> Option<&str> {
        if self.state == QuizState::LevelComplete {
            return None;
        }
        self.challenges.get(self.index).map(String::as_str)
    }

    pub fn is_word_challenge(&self) -> bool {
        self.challenge().is_some_and(|c| c.chars().count() > 1)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn input(&self) -> &SymbolInput {
        &self.input
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn remaining_ratio(&self) -> f64 {
        timing::remaining_ratio(self.remaining, self.budget)
    }

    pub fn hint(&self) -> &HintSlot {
        &self.hint
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn progress(&self) -> f64 {
        if self.challenges.is_empty() {
            return 0.0;
        }
        (self.index + 1) as f64 / self.challenges.len() as f64
    }

    pub fn summary(&self) -> &LevelSummary {
        &self.summary
    }
}
