/// Audio collaborator. Playback itself is the host's business.
pub trait AudioSink {
    /// Fire-and-forget sound effect by asset id.
    fn play_sfx(&mut self, id: &str);
}

/// Sink that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_sfx(&mut self, id: &str) {
        tracing::debug!(id, "sfx (silent)");
    }
}
