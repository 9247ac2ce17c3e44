//! Trailing-edge debouncing: repeated calls within the window collapse to
//! one, carrying the final call's payload.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
        }
    }

    /// Registers a call. Any earlier pending payload is replaced and the
    /// window restarts from `now`.
    pub fn call(&mut self, payload: T, now: Instant) {
        self.pending = Some(payload);
        self.deadline = Some(now + self.window);
    }

    /// Fires once the input has quiesced for a full window, yielding the
    /// last payload. Returns `None` while the window is still open.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
