//! Rodio-based sound player
//!
//! Synthesizes chimes from sine tones.

use std::time::Duration;

use async_trait::async_trait;
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};

use crate::application::ports::{SoundError, SoundPlayer};
use crate::domain::notification::Chime;

/// Level the chime decays towards by its end
const FLOOR_AMPLITUDE: f32 = 0.01;

/// Sound player implementation using rodio
pub struct RodioSoundPlayer;

impl RodioSoundPlayer {
    /// Create a new rodio-based sound player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SoundPlayer for RodioSoundPlayer {
    async fn play(&self, chime: &Chime) -> Result<(), SoundError> {
        let chime = chime.clone();
        // Playback blocks until the sink drains
        tokio::task::spawn_blocking(move || play_chime_sync(&chime))
            .await
            .map_err(|e| SoundError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Amplitude for a tone starting `start_ms` into the chime.
/// Falls exponentially from the chime amplitude towards the floor.
fn amplitude_at(chime: &Chime, start_ms: u64) -> f32 {
    let total = chime.total_ms().max(1) as f32;
    let progress = start_ms as f32 / total;
    let ratio = (FLOOR_AMPLITUDE / chime.amplitude).max(f32::MIN_POSITIVE);
    chime.amplitude * ratio.powf(progress)
}

/// Create a tone with a short fade in to avoid clicks
fn gentle_tone(freq: f32, duration_ms: u64, amplitude: f32) -> impl Source<Item = f32> + Send {
    let fade_ms = (duration_ms / 5).min(30);
    SineWave::new(freq)
        .take_duration(Duration::from_millis(duration_ms))
        .fade_in(Duration::from_millis(fade_ms))
        .amplify(amplitude)
}

/// Play a chime synchronously (called from spawn_blocking)
fn play_chime_sync(chime: &Chime) -> Result<(), SoundError> {
    let (_stream, stream_handle) =
        OutputStream::try_default().map_err(|e| SoundError::AudioUnavailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| SoundError::PlaybackFailed(e.to_string()))?;

    let mut elapsed_ms = 0;
    for tone in &chime.tones {
        let amplitude = amplitude_at(chime, elapsed_ms);
        sink.append(gentle_tone(tone.frequency_hz, tone.duration_ms, amplitude));
        elapsed_ms += tone.duration_ms;
    }

    sink.sleep_until_end();

    Ok(())
}
