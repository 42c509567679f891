//! Audio output sink
//!
//! The game only ever asks for two things: the looping road track and the
//! one-shot crash. Backends decide what that sounds like.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player hit a car
    Crash,
}

/// Something that can play the game's audio cues
pub trait AudioSink {
    /// Start (or resume) the looping background track
    fn start_music(&mut self);
    /// Stop the background track
    fn stop_music(&mut self);
    /// Fire a one-shot effect
    fn play(&mut self, effect: SoundEffect);
}

/// Audio cue as observed by a sink, for tests and replays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    MusicStarted,
    MusicStopped,
    Effect(SoundEffect),
}

/// Sink that remembers every cue in order
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub cues: Vec<AudioCue>,
}

impl AudioSink for RecordingAudio {
    fn start_music(&mut self) {
        self.cues.push(AudioCue::MusicStarted);
    }

    fn stop_music(&mut self) {
        self.cues.push(AudioCue::MusicStopped);
    }

    fn play(&mut self, effect: SoundEffect) {
        self.cues.push(AudioCue::Effect(effect));
    }
}
