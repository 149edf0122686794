//! Sound player port for the audio delivery channel

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::Chime;

/// Errors that can occur during cue playback
#[derive(Error, Debug)]
pub enum SoundError {
    /// Failed to play the cue
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// No audio output device, or playback blocked by the platform
    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),
}

/// Port trait for cue playback
#[async_trait]
pub trait SoundPlayer: Send + Sync {
    /// Play a chime to completion
    async fn play(&self, chime: &Chime) -> Result<(), SoundError>;
}

/// Blanket implementation for boxed sound players
#[async_trait]
impl SoundPlayer for Box<dyn SoundPlayer> {
    async fn play(&self, chime: &Chime) -> Result<(), SoundError> {
        self.as_ref().play(chime).await
    }
}
