use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::{info, warn};

use crate::clock::{PlaybackClock, Scheduler};
use crate::constants::{DEFAULT_HZ, MAX_HZ, MIN_HZ};
use crate::error::FrequencyError;

/// Slideshow frequency in whole Hz, always within `MIN_HZ..=MAX_HZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Frequency(u32);

impl Frequency {
    pub fn new(hz: i64) -> Result<Self, FrequencyError> {
        if hz < MIN_HZ as i64 || hz > MAX_HZ as i64 {
            return Err(FrequencyError::OutOfRange(hz));
        }
        Ok(Self(hz as u32))
    }

    pub fn clamped(hz: i64) -> Self {
        let clamped = hz.clamp(MIN_HZ as i64, MAX_HZ as i64);
        if clamped != hz {
            warn!("Frequency {} Hz clamped to {} Hz", hz, clamped);
        }
        Self(clamped as u32)
    }

    /// Accepts `"10"` as well as the display form `"10 Hz"`.
    pub fn parse(text: &str) -> Result<Self, FrequencyError> {
        let hz = text
            .trim()
            .trim_end_matches("Hz")
            .trim_end()
            .parse::<i64>()
            .map_err(|_| FrequencyError::NotANumber(text.to_string()))?;
        Self::new(hz)
    }

    pub fn hz(self) -> u32 {
        self.0
    }

    pub fn period(self) -> Duration {
        Duration::from_secs(1) / self.0
    }

    pub fn step(self, delta: i64) -> Self {
        Self::clamped(self.0 as i64 + delta)
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self(DEFAULT_HZ)
    }
}

impl FromStr for Frequency {
    type Err = FrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl PlaybackState {
    /// Text for the play/pause control: the action it would perform.
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Playing => "Pause",
            PlaybackState::Paused => "Play",
        }
    }
}

/// Play/pause state machine owning the playback clock.
#[derive(Debug)]
pub struct PlaybackController<S: Scheduler> {
    clock: PlaybackClock<S>,
    state: PlaybackState,
    frequency: Frequency,
}

impl<S: Scheduler> PlaybackController<S> {
    /// Starts in `Playing` with the clock running.
    pub fn new(scheduler: S, frequency: Frequency) -> Self {
        let mut clock = PlaybackClock::new(scheduler);
        clock.start(frequency.period());
        Self { clock, state: PlaybackState::Playing, frequency }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn period(&self) -> Duration {
        self.frequency.period()
    }

    pub fn frame_index(&self) -> u64 {
        self.clock.frame_index()
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.clock.stop();
            self.state = PlaybackState::Paused;
            info!("Paused at frame {}", self.clock.frame_index());
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.clock.start(self.frequency.period());
            self.state = PlaybackState::Playing;
            info!("Resumed at {}", self.frequency);
        }
    }

    pub fn toggle(&mut self) -> PlaybackState {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
        }
        self.state
    }

    /// Stores the new frequency; restarts the clock only while playing, even
    /// when the value is unchanged.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        if self.state == PlaybackState::Playing {
            self.clock.stop();
            self.clock.start(frequency.period());
        }
        info!("Frequency set to {} ({:?})", frequency, frequency.period());
    }

    /// Applies pending ticks. Returns how many were applied.
    pub fn pump(&mut self) -> u32 {
        self.clock.pump()
    }

    pub fn scheduler(&self) -> &S {
        self.clock.scheduler()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.clock.scheduler_mut()
    }
}
