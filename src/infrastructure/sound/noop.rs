//! No-op sound player
//!
//! Used when the sound channel is switched off in config.

use async_trait::async_trait;

use crate::application::ports::{SoundError, SoundPlayer};
use crate::domain::notification::Chime;

/// Sound player that stays silent
pub struct NoOpSoundPlayer;

impl NoOpSoundPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SoundPlayer for NoOpSoundPlayer {
    async fn play(&self, _chime: &Chime) -> Result<(), SoundError> {
        Ok(())
    }
}
