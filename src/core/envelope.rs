// src/core/envelope.rs
//
// Exponential fade applied to the frozen signal when the freeze is engaged
// or released.

/// Floor the envelope ramps from and back down to
pub const MIN_GAIN: f32 = 0.001;

/// Level at which a fade counts as complete when computing its rate
const FADE_TOP: f32 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Rising,
    Falling,
}

/// Wet-signal gain envelope.
///
/// Rises multiplicatively from [`MIN_GAIN`] to 1.0 while engaged and falls
/// back to [`MIN_GAIN`] when released, where it snaps to silence.
#[derive(Debug, Clone)]
pub struct FadeEnvelope {
    gain: f32,
    direction: Direction,
    rise: Option<f32>,
    fall: Option<f32>,
}

impl Default for FadeEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeEnvelope {
    /// A silent, released envelope with instant fades
    pub fn new() -> Self {
        Self {
            gain: 0.0,
            direction: Direction::Falling,
            rise: None,
            fall: None,
        }
    }

    /// Set fade durations; zero or negative durations switch instantly
    pub fn set_durations(&mut self, fade_in_secs: f32, fade_out_secs: f32, sample_rate: u32) {
        self.rise = fade_rate(fade_in_secs, sample_rate);
        self.fall = fade_rate(fade_out_secs, sample_rate);
    }

    /// Ramp towards full gain, starting from the floor if currently silent
    pub fn engage(&mut self) {
        if self.gain < MIN_GAIN {
            self.gain = MIN_GAIN;
        }
        self.direction = Direction::Rising;
    }

    /// Ramp towards silence
    pub fn release(&mut self) {
        self.direction = Direction::Falling;
    }

    /// Advance one frame and return the gain for it
    pub fn next_gain(&mut self) -> f32 {
        match self.direction {
            Direction::Rising if self.gain < 1.0 => {
                self.gain = match self.rise {
                    Some(rate) => (self.gain * rate).min(1.0),
                    None => 1.0,
                };
            }
            Direction::Falling if self.gain > MIN_GAIN => {
                self.gain = match self.fall {
                    Some(rate) => (self.gain / rate).max(MIN_GAIN),
                    None => 0.0,
                };
            }
            _ => {}
        }

        if self.direction == Direction::Falling && self.gain <= MIN_GAIN {
            self.gain = 0.0;
        }
        self.gain
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

/// Per-frame multiplier that moves the floor to 0.99 in `duration_secs`
fn fade_rate(duration_secs: f32, sample_rate: u32) -> Option<f32> {
    let frames = duration_secs * sample_rate as f32;
    if !frames.is_finite() || frames <= 0.0 {
        return None;
    }
    Some((FADE_TOP / MIN_GAIN).powf(1.0 / frames))
}
