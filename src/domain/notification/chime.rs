//! Audible cue definitions

/// A single sine tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
}

/// A short sequence of tones played back to back
#[derive(Debug, Clone, PartialEq)]
pub struct Chime {
    pub tones: Vec<Tone>,
    /// Starting amplitude, decays towards silence over the chime
    pub amplitude: f32,
}

impl Chime {
    /// Two-tone cue for new notifications: 800Hz then 600Hz, 0.5s total
    pub fn new_notification() -> Self {
        Self {
            tones: vec![
                Tone {
                    frequency_hz: 800.0,
                    duration_ms: 100,
                },
                Tone {
                    frequency_hz: 600.0,
                    duration_ms: 400,
                },
            ],
            amplitude: 0.3,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.tones.iter().map(|t| t.duration_ms).sum()
    }
}
