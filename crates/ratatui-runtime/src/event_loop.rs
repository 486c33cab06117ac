use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Decides which event comes next.
///
/// Ticks take priority over renders, and renders over terminal input, so a
/// burst of key presses can never starve the tick clock. If the tick interval
/// is unset no ticks are generated. A render follows every tick and every
/// terminal event.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with ticks disabled.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates an `EventLoop` whose clocks start at `now`.
    ///
    /// The first tick fires one full interval after `now`; the first render
    /// is due immediately.
    fn starting_at(now: Instant) -> Self {
        Self {
            tick_interval: None,
            last_tick: now,
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Returns the tick or render event due at `now`, if any, and records it.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(tick_interval) = self.tick_interval
            && now.duration_since(self.last_tick) >= tick_interval
        {
            self.last_tick = now;
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        if self.dirty {
            self.dirty = false;
            return Some(TuiEvent::Render);
        }

        None
    }

    /// Time to wait for input before the next tick or render is due.
    ///
    /// `None` means nothing is scheduled and input can be awaited forever.
    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        if self.dirty {
            return Some(Duration::ZERO);
        }
        let next_tick_at = self.last_tick + self.tick_interval?;
        Some(next_tick_at.saturating_duration_since(now))
    }
}
