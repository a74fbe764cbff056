//! Per-task elapsed time tracking.
//!
//! A stopwatch only counts while its task is pending. Time is passed in by the
//! caller so the event loop drives it from `Instant::now()` and tests from a
//! fixed base instant.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::StopwatchError;
use crate::models::TaskId;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    /// Counting; `since` is the boundary the next second is measured from
    Running { since: Instant },
}

#[derive(Debug, Clone)]
pub struct Stopwatch {
    state: State,
    time: u64,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            state: State::Stopped,
            time: 0,
        }
    }

    /// Elapsed whole seconds
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    pub fn start(&mut self, now: Instant) -> Result<(), StopwatchError> {
        match self.state {
            State::Running { .. } => Err(StopwatchError::AlreadyRunning),
            State::Stopped => {
                self.state = State::Running { since: now };
                Ok(())
            }
        }
    }

    /// Stop counting. Seconds completed up to `now` are credited, the partial
    /// second is dropped.
    pub fn stop(&mut self, now: Instant) -> Result<(), StopwatchError> {
        match self.state {
            State::Stopped => Err(StopwatchError::NotRunning),
            State::Running { .. } => {
                self.tick(now);
                self.state = State::Stopped;
                Ok(())
            }
        }
    }

    /// Start when stopped, stop when running. Returns the new running state.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_running() {
            let _ = self.stop(now);
        } else {
            let _ = self.start(now);
        }
        self.is_running()
    }

    /// Zero the count without touching the running state
    pub fn reset(&mut self, now: Instant) {
        self.time = 0;
        if let State::Running { .. } = self.state {
            self.state = State::Running { since: now };
        }
    }

    /// Credit every whole second elapsed since the last boundary.
    /// Returns how many seconds were added.
    pub fn tick(&mut self, now: Instant) -> u64 {
        let State::Running { since } = self.state else {
            return 0;
        };

        let elapsed = now.saturating_duration_since(since).as_secs();
        if elapsed > 0 {
            self.time += elapsed;
            // elapsed is at most the real gap, so the new boundary is <= now
            let advanced = since + TICK * u32::try_from(elapsed).unwrap_or(u32::MAX);
            self.state = State::Running { since: advanced };
        }
        elapsed
    }

    pub fn display(&self) -> String {
        format_hms(self.time)
    }
}

/// `HH:MM:SS`, hours wrapping at 24
pub fn format_hms(time: u64) -> String {
    let hours = (time / 3600) % 24;
    let minutes = (time / 60) % 60;
    let seconds = time % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Stopwatches of all pending tasks, keyed by task id
#[derive(Debug, Default)]
pub struct Stopwatches {
    watches: HashMap<TaskId, Stopwatch>,
}

impl Stopwatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stopwatch for `id`, created stopped at zero if missing
    pub fn ensure(&mut self, id: TaskId) -> &mut Stopwatch {
        self.watches.entry(id).or_default()
    }

    pub fn get(&self, id: TaskId) -> Option<&Stopwatch> {
        self.watches.get(&id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Stopwatch> {
        self.watches.get_mut(&id)
    }

    /// Discard the stopwatch of a task leaving the pending list
    pub fn dispose(&mut self, id: TaskId) -> Option<Stopwatch> {
        self.watches.remove(&id)
    }

    pub fn tick_all(&mut self, now: Instant) {
        for watch in self.watches.values_mut() {
            watch.tick(now);
        }
    }

    pub fn any_running(&self) -> bool {
        self.watches.values().any(Stopwatch::is_running)
    }
}
