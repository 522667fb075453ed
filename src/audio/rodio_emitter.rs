use std::time::Duration;

use anyhow::Result;
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::audio::{Tone, ToneEmitter};

const FADE_MS: u64 = 10;

pub struct RodioEmitter {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    volume: f32,
}

impl RodioEmitter {
    pub fn new(volume: f32) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            volume: volume.clamp(0.0, 1.0),
        })
    }
}

impl ToneEmitter for RodioEmitter {
    fn emit(&self, tone: Tone) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(self.volume);
        for &(freq, ms) in tone.segments() {
            let segment = SineWave::new(freq)
                .take_duration(Duration::from_millis(ms))
                .fade_in(Duration::from_millis(FADE_MS));
            sink.append(segment);
        }
        sink.detach();
    }
}
