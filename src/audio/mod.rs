#[cfg(feature = "audio")]
pub mod rodio_emitter;

use crate::morse::Symbol;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Dot,
    Dash,
    Correct,
    Incorrect,
}

impl Tone {
    pub fn from_symbol(symbol: Symbol) -> Self {
        match symbol {
            Symbol::Dot => Tone::Dot,
            Symbol::Dash => Tone::Dash,
        }
    }

    /// (frequency Hz, duration ms) segments played back to back.
    pub fn segments(self) -> &'static [(f32, u64)] {
        match self {
            Tone::Dot => &[(880.0, 100)],
            Tone::Dash => &[(880.0, 250)],
            // C5 E5 G5 C6
            Tone::Correct => &[(523.25, 100), (659.25, 100), (783.99, 100), (1046.5, 200)],
            Tone::Incorrect => &[(160.0, 70), (130.0, 70), (100.0, 60)],
        }
    }
}

/// Fire-and-forget sound output. Implementations must never block the UI
/// thread for the length of the tone.
pub trait ToneEmitter {
    fn emit(&self, tone: Tone);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SilentEmitter;

impl ToneEmitter for SilentEmitter {
    fn emit(&self, _tone: Tone) {}
}

/// Open the audio device if enabled, falling back to silence.
pub fn open_emitter(enabled: bool, volume: f32) -> Box<dyn ToneEmitter> {
    if !enabled {
        return Box::new(SilentEmitter);
    }
    #[cfg(feature = "audio")]
    {
        match rodio_emitter::RodioEmitter::new(volume) {
            Ok(emitter) => return Box::new(emitter),
            Err(e) => tracing::warn!("audio output unavailable, continuing silently: {e:#}"),
        }
    }
    #[cfg(not(feature = "audio"))]
    {
        let _ = volume;
        tracing::info!("built without audio support");
    }
    Box::new(SilentEmitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration_ms(tone: Tone) -> u64 {
        tone.segments().iter().map(|(_, ms)| ms).sum()
    }

    #[test]
    fn test_dash_is_longer_than_dot() {
        assert!(duration_ms(Tone::Dash) > duration_ms(Tone::Dot));
    }

    #[test]
    fn test_correct_arpeggio_lasts_half_a_second() {
        assert_eq!(duration_ms(Tone::Correct), 500);
        assert_eq!(Tone::Correct.segments().len(), 4);
    }

    #[test]
    fn test_disabled_audio_is_silent() {
        // Must not touch the audio device.
        let emitter = open_emitter(false, 0.5);
        emitter.emit(Tone::Dot);
    }
}
