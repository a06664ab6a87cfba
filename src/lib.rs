//! gridshow - grid slideshow for grouped image sequences
//!
//! The playback core (manifest, selection, layout, clock, controller,
//! renderer, session) is UI-agnostic; surfaces apply its render plans.

pub mod cli;
pub mod clock;
pub mod constants;
pub mod controller;
pub mod error;
pub mod glitch;
pub mod layout;
pub mod manifest;
pub mod manifest_builder;
pub mod panel;
pub mod renamer;
pub mod renderer;
pub mod selection;
pub mod session;
pub mod surface;
#[cfg(feature = "window")]
pub mod window;

pub use clock::{IntervalScheduler, PlaybackClock, Scheduler, WallClockScheduler};
pub use controller::{Frequency, PlaybackController, PlaybackState};
pub use layout::{Cell, Grid, GridShape};
pub use manifest::{Manifest, Quality};
pub use session::Session;
