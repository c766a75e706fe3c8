//! Quiet-period coalescing of outgoing saves.
//!
//! Every edit calls [`SaveQueue::schedule`], which pushes the deadline back by
//! the quiet period. When the deadline passes, [`SaveQueue::take_ready`] hands
//! out a single write permit; the caller then sends the store's *current*
//! snapshot, so a burst of edits becomes one request carrying the latest state.
//!
//! At most one write is in flight. Edits made while it is outstanding keep the
//! queue dirty, and [`SaveQueue::finish`] reports how long to wait before the
//! next write may go out.
//!
//! Time is passed in as a [`Duration`] since any fixed origin so the queue works
//! the same under a browser clock and in tests.

use std::time::Duration;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct SaveQueue {
    quiet: Duration,
    deadline: Option<Duration>,
    in_flight: bool,
}

impl Default for SaveQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl SaveQueue {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
            in_flight: false,
        }
    }

    /// Records an edit at `now`. Returns the delay after which the caller
    /// should call [`take_ready`](Self::take_ready).
    pub fn schedule(&mut self, now: Duration) -> Duration {
        self.deadline = Some(now + self.quiet);
        self.quiet
    }

    /// Makes pending work due immediately (used after creating a table).
    pub fn schedule_now(&mut self, now: Duration) {
        self.deadline = Some(now);
    }

    /// Hands out the write permit if work is pending, its deadline has passed
    /// and no write is outstanding.
    pub fn take_ready(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if !self.in_flight && now >= deadline => {
                self.deadline = None;
                self.in_flight = true;
                true
            }
            _ => false,
        }
    }

    /// Releases the write permit. Returns the delay until the next write is
    /// due when more edits arrived meanwhile.
    pub fn finish(&mut self, now: Duration) -> Option<Duration> {
        self.in_flight = false;
        self.delay_until_due(now)
    }

    /// Remaining wait before pending work is due, `None` when nothing is pending.
    pub fn delay_until_due(&self, now: Duration) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.checked_sub(now).unwrap_or(Duration::ZERO))
    }

    /// Drops pending work. An outstanding write is not affected.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
