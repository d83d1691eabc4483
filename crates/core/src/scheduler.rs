//! Scheduler module - logical timers for gravity and deferred row removal
//!
//! Time only moves when the owner calls [`Scheduler::poll`] with an elapsed
//! budget, which keeps the engine deterministic. A real-time driver asks for
//! [`Scheduler::next_deadline_ms`] and sleeps exactly that long.
//!
//! - **Gravity** is a recurring timer. Arming it with a different interval
//!   restarts it from zero; disarming drops any partial progress.
//! - **Row removal** is a one-shot timer tagged with a [`ClearToken`].
//!   Scheduling again while one is pending restarts its delay. Cancelling
//!   bumps the epoch, so a token minted before the cancel can no longer match.

/// Identifies one scheduled row removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearToken {
    epoch: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GravityTimer {
    interval_ms: u32,
    elapsed_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeferredClear {
    remaining_ms: u32,
    token: ClearToken,
}

/// A timer that came due during [`Scheduler::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    Gravity,
    Clear(ClearToken),
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    epoch: u32,
    gravity: Option<GravityTimer>,
    clear: Option<DeferredClear>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm gravity with `interval_ms`, or disarm it with `None`.
    ///
    /// Re-arming with the same interval keeps the current progress.
    pub fn set_gravity(&mut self, interval_ms: Option<u32>) {
        match (interval_ms, self.gravity) {
            (None, _) => self.gravity = None,
            (Some(interval), Some(timer)) if timer.interval_ms == interval => {}
            (Some(interval), _) => {
                self.gravity = Some(GravityTimer {
                    interval_ms: interval.max(1),
                    elapsed_ms: 0,
                });
            }
        }
    }

    /// Current gravity interval, `None` while suspended
    pub fn gravity_interval_ms(&self) -> Option<u32> {
        self.gravity.map(|g| g.interval_ms)
    }

    /// Schedule a row removal after `delay_ms`.
    ///
    /// If one is already pending its deadline restarts at `delay_ms` and its
    /// token is returned.
    pub fn schedule_clear(&mut self, delay_ms: u32) -> ClearToken {
        let token = self
            .clear
            .map_or(ClearToken { epoch: self.epoch }, |pending| pending.token);
        self.clear = Some(DeferredClear {
            remaining_ms: delay_ms,
            token,
        });
        token
    }

    /// Drop the pending removal (if any) and invalidate every outstanding token
    pub fn cancel_clear(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.clear = None;
    }

    /// Whether `token` belongs to the current epoch
    pub fn is_current(&self, token: ClearToken) -> bool {
        token.epoch == self.epoch
    }

    /// Token of the pending removal, if one is scheduled
    pub fn pending_token(&self) -> Option<ClearToken> {
        self.clear.map(|c| c.token)
    }

    /// Milliseconds until the earliest armed timer fires
    pub fn next_deadline_ms(&self) -> Option<u32> {
        let gravity = self.gravity.map(|g| g.interval_ms.saturating_sub(g.elapsed_ms));
        let clear = self.clear.map(|c| c.remaining_ms);
        match (gravity, clear) {
            (Some(g), Some(c)) => Some(g.min(c)),
            (g, c) => g.or(c),
        }
    }

    /// Advance by at most `budget_ms`.
    ///
    /// If a timer comes due within the budget, time advances exactly to it and
    /// `Some((consumed_ms, due))` is returned; the caller handles the firing and
    /// polls again with the rest of its budget. Otherwise the whole budget is
    /// consumed and `None` is returned. Row removal wins ties.
    pub fn poll(&mut self, budget_ms: u32) -> Option<(u32, Due)> {
        let step = match self.next_deadline_ms() {
            Some(next) if next <= budget_ms => next,
            _ => {
                self.accrue(budget_ms);
                return None;
            }
        };

        self.accrue(step);

        if let Some(clear) = self.clear {
            if clear.remaining_ms == 0 {
                self.clear = None;
                return Some((step, Due::Clear(clear.token)));
            }
        }

        if let Some(gravity) = self.gravity.as_mut() {
            if gravity.elapsed_ms >= gravity.interval_ms {
                gravity.elapsed_ms = 0;
                return Some((step, Due::Gravity));
            }
        }

        // Unreachable with a consistent deadline; treat as fully consumed.
        None
    }

    fn accrue(&mut self, ms: u32) {
        if let Some(gravity) = self.gravity.as_mut() {
            gravity.elapsed_ms = gravity.elapsed_ms.saturating_add(ms);
        }
        if let Some(clear) = self.clear.as_mut() {
            clear.remaining_ms = clear.remaining_ms.saturating_sub(ms);
        }
    }
}
