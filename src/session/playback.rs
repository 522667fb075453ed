use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::audio::{Tone, ToneEmitter};
use crate::morse::symbol::parse_symbols;
use crate::morse::Symbol;

pub const LEAD_IN: Duration = Duration::from_millis(500);
pub const DOT_GAP: Duration = Duration::from_millis(200);
pub const DASH_GAP: Duration = Duration::from_millis(400);
pub const TRAILING: Duration = Duration::from_millis(300);

/// Offsets from the start of playback at which each pulse sounds, plus the
/// total length including the trailing pause.
pub fn schedule(code: &str) -> (Vec<(Duration, Tone)>, Duration) {
    let mut at = LEAD_IN;
    let mut pulses = Vec::new();
    for symbol in parse_symbols(code) {
        pulses.push((at, Tone::from_symbol(symbol)));
        at += match symbol {
            Symbol::Dot => DOT_GAP,
            Symbol::Dash => DASH_GAP,
        };
    }
    (pulses, at + TRAILING)
}

/// Timed pulse train for a symbol sequence, polled from the UI tick.
#[derive(Clone, Debug, Default)]
pub struct PulsePlayback {
    pending: VecDeque<(Instant, Tone)>,
    ends_at: Option<Instant>,
}

impl PulsePlayback {
    /// Begin playing `code`. Refused while a previous playback is running.
    pub fn start(&mut self, code: &str, now: Instant) -> bool {
        if self.is_playing(now) {
            return false;
        }
        let (pulses, total) = schedule(code);
        self.pending = pulses.into_iter().map(|(at, tone)| (now + at, tone)).collect();
        self.ends_at = Some(now + total);
        true
    }

    /// Emit every pulse that is due.
    pub fn poll(&mut self, now: Instant, emitter: &dyn ToneEmitter) {
        while let Some(&(at, tone)) = self.pending.front() {
            if at > now {
                break;
            }
            emitter.emit(tone);
            self.pending.pop_front();
        }
        if self.ends_at.is_some_and(|end| now >= end) {
            self.ends_at = None;
        }
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
        self.ends_at = None;
    }

    pub fn is_playing(&self, now: Instant) -> bool {
        self.ends_at.is_some_and(|end| now < end)
    }
}
