//! Hold gate: the cancellable single-shot timer that starts a selection
//! once enough fingers have been held down long enough.
//!
//! ```text
//!            arm (population ≥ 2)            poll (now ≥ deadline)
//!   Idle ─────────────────────────▶ Pending ─────────────────────▶ Fired
//!    ▲                                 │                             │
//!    └──── cancel (population < 2) ────┘                             │
//!    └────────────────────────── reset (round settled) ──────────────┘
//! ```
//!
//! Arming is only accepted from `Idle`, so two timers can never be
//! outstanding and a new one cannot start before the previous round has
//! been reset.

use std::time::Duration;

use log::debug;

/// How long the fingers must stay down before a winner is drawn.
pub const HOLD_DURATION: Duration = Duration::from_millis(2000);

/// Minimum number of contacts for the gate to arm.
pub const ARM_THRESHOLD: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// GateState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// No timer outstanding.
    Idle,
    /// Timer armed at `armed_at`, expiring at `deadline`.
    Pending { armed_at: Duration, deadline: Duration },
    /// Timer elapsed at `at`; stays here until [`HoldGate::reset`].
    Fired { at: Duration },
}

/// What a gate operation did, for the caller to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateEvent {
    Armed { deadline: Duration },
    Cancelled,
    Fired { at: Duration },
}

// ════════════════════════════════════════════════════════════════════════════
// HoldGate
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct HoldGate {
    state: GateState,
}

impl Default for HoldGate {
    fn default() -> Self {
        HoldGate { state: GateState::Idle }
    }
}

impl HoldGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, GateState::Pending { .. })
    }

    /// Arm when idle and `population` has reached the threshold.
    pub fn arm(&mut self, population: usize, now: Duration) -> Option<GateEvent> {
        if self.state != GateState::Idle || population < ARM_THRESHOLD {
            return None;
        }
        let deadline = now + HOLD_DURATION;
        self.state = GateState::Pending { armed_at: now, deadline };
        debug!("hold gate armed with {} contacts, fires at {:?}", population, deadline);
        Some(GateEvent::Armed { deadline })
    }

    /// Cancel a pending timer once `population` drops below the threshold.
    /// Growth, shrinkage above the threshold and movement never touch the
    /// deadline.
    pub fn cancel_below(&mut self, population: usize) -> Option<GateEvent> {
        match self.state {
            GateState::Pending { .. } if population < ARM_THRESHOLD => {
                self.state = GateState::Idle;
                debug!("hold gate cancelled, {} contact(s) left", population);
                Some(GateEvent::Cancelled)
            }
            _ => None,
        }
    }

    /// Fire the timer if its deadline has passed.  Fires at most once per
    /// pending period; the reported instant is the deadline itself.
    pub fn poll(&mut self, now: Duration) -> Option<GateEvent> {
        match self.state {
            GateState::Pending { deadline, .. } if now >= deadline => {
                self.state = GateState::Fired { at: deadline };
                debug!("hold gate fired at {:?}", deadline);
                Some(GateEvent::Fired { at: deadline })
            }
            _ => None,
        }
    }

    /// Return to `Idle` after the fired round has been wrapped up.
    pub fn reset(&mut self) {
        if let GateState::Fired { .. } = self.state {
            self.state = GateState::Idle;
        }
    }

    /// Time left before the pending timer fires.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        match self.state {
            GateState::Pending { deadline, .. } => Some(deadline.saturating_sub(now)),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
