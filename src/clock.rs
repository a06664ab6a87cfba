//! Playback clock and the scheduling port it runs on.
//!
//! Timers never call back into the clock. The owner polls
//! [`PlaybackClock::pump`] from its event loop, which drains the scheduler's
//! firings and counts only those belonging to the live timer. A cancelled
//! timer therefore cannot contribute a tick, even if it fired in the same
//! poll as its replacement was scheduled.

use std::time::{Duration, Instant};

use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Repeating-timer port. Implementations decide where time comes from.
pub trait Scheduler {
    /// Starts a repeating timer firing every `period`.
    fn schedule(&mut self, period: Duration) -> TimerHandle;
    /// Cancels `handle`. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
    /// Returns every firing since the last call, oldest first.
    fn drain_fired(&mut self) -> Vec<TimerHandle>;
    /// Number of timers currently scheduled.
    fn active_timers(&self) -> usize;
}

#[derive(Debug)]
struct Timer {
    handle: TimerHandle,
    period: Duration,
    elapsed: Duration,
}

/// Scheduler driven by explicit elapsed time.
///
/// Used directly by tests as a simulated clock, and by the window loop which
/// feeds it each frame's `dt`.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    next_id: u64,
    timers: Vec<Timer>,
    fired: Vec<TimerHandle>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `dt` to every timer. An overdue timer fires once, however
    /// many periods `dt` spans, and keeps its phase.
    pub fn advance(&mut self, dt: Duration) {
        for timer in self.timers.iter_mut() {
            timer.elapsed += dt;
            if timer.elapsed >= timer.period {
                let missed = timer.elapsed.as_nanos() / timer.period.as_nanos();
                if missed > 1 {
                    debug!("{:?} late by {} period(s), firing once", timer.handle, missed - 1);
                }
                let rest = timer.elapsed.as_nanos() % timer.period.as_nanos();
                timer.elapsed = Duration::from_nanos(rest as u64);
                self.fired.push(timer.handle);
            }
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule(&mut self, period: Duration) -> TimerHandle {
        // A zero period would fire forever inside advance()
        let period = period.max(Duration::from_millis(1));
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer { handle, period, elapsed: Duration::ZERO });
        trace!("Scheduled {:?} every {:?}", handle, period);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|timer| timer.handle != handle);
        self.fired.retain(|fired| *fired != handle);
    }

    fn drain_fired(&mut self) -> Vec<TimerHandle> {
        std::mem::take(&mut self.fired)
    }

    fn active_timers(&self) -> usize {
        self.timers.len()
    }
}

/// Wall-clock scheduler: advances an [`IntervalScheduler`] by the real time
/// elapsed between drains.
#[derive(Debug)]
pub struct WallClockScheduler {
    inner: IntervalScheduler,
    last: Instant,
}

impl WallClockScheduler {
    pub fn new() -> Self {
        Self { inner: IntervalScheduler::new(), last: Instant::now() }
    }
}

impl Default for WallClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for WallClockScheduler {
    fn schedule(&mut self, period: Duration) -> TimerHandle {
        // Catch up first so time before scheduling is not credited to the new timer
        let now = Instant::now();
        self.inner.advance(now.duration_since(self.last));
        self.last = now;
        self.inner.schedule(period)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.inner.cancel(handle);
    }

    fn drain_fired(&mut self) -> Vec<TimerHandle> {
        let now = Instant::now();
        self.inner.advance(now.duration_since(self.last));
        self.last = now;
        self.inner.drain_fired()
    }

    fn active_timers(&self) -> usize {
        self.inner.active_timers()
    }
}

/// Shared frame counter plus the single repeating timer that advances it.
#[derive(Debug)]
pub struct PlaybackClock<S: Scheduler> {
    scheduler: S,
    live: Option<TimerHandle>,
    frame_index: u64,
}

impl<S: Scheduler> PlaybackClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler, live: None, frame_index: 0 }
    }

    /// Cancels any running timer, then starts a new one.
    pub fn start(&mut self, period: Duration) {
        self.stop();
        self.live = Some(self.scheduler.schedule(period));
        debug!("Clock started, period {:?}", period);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.live.take() {
            self.scheduler.cancel(handle);
            debug!("Clock stopped at frame {}", self.frame_index);
        }
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Applies pending firings of the live timer. Returns the tick count.
    pub fn pump(&mut self) -> u32 {
        let fired = self.scheduler.drain_fired();
        let Some(live) = self.live else {
            return 0;
        };
        let mut ticks = 0;
        for handle in fired {
            if handle == live {
                self.frame_index += 1;
                ticks += 1;
            } else {
                trace!("Dropping stale firing of {:?}", handle);
            }
        }
        ticks
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
