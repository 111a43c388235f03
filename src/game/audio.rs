//! Audio boundary.
//!
//! The core triggers sounds by name on a numbered channel and never reads
//! anything back. Playback, mixing and asset lookup belong to the host.

/// Channel used for one-shot gameplay cues (checkpoint, win).
pub const CUE_CHANNEL: usize = 0;

/// Fire-and-forget sound service provided by the host application.
pub trait AudioService {
    fn play_sound(&mut self, name: &str, channel: usize);
    fn set_volume(&mut self, channel: usize, volume: f32);
}

/// Silent implementation for headless runs and tests.
pub struct NullAudio;

impl AudioService for NullAudio {
    fn play_sound(&mut self, _name: &str, _channel: usize) {}
    fn set_volume(&mut self, _channel: usize, _volume: f32) {}
}
