//! Touch session: the state machine that owns every component and
//! processes one logical event queue.
//!
//! Time is a monotonic [`Duration`] since the session started and is passed
//! into every call.  Before an event is applied, any timer whose deadline
//! has passed fires first, just as its callback would have been dispatched
//! ahead of the event on a real queue.

use std::time::Duration;

use indexmap::IndexSet;
use log::{debug, info};

use crate::challenge::{Challenge, ChallengePool, Draw};
use crate::contact::{Contact, ContactRegistry, TouchBatch, TouchId, TouchPoint};
use crate::error::Result;
use crate::haptics::{Haptics, TAP};
use crate::hold_gate::{GateEvent, GateState, HoldGate};
use crate::presentation::{self, HoldView, RenderModel, Scene, WinnerView};
use crate::selector::{select_winner, RandomIndex};

/// Pause between selecting a winner and clearing the board for the next
/// challenge.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

// ════════════════════════════════════════════════════════════════════════════
// Phase
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for fingers.
    Idle,
    /// Hold gate pending; a winner is drawn at `deadline`.
    Holding { deadline: Duration },
    /// Winner shown; the board clears at `deadline`.
    Settling { winner: TouchId, deadline: Duration },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Selection {
    winner:      TouchId,
    selected_at: Duration,
    settle_at:   Duration,
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session<R, H> {
    registry:  ContactRegistry,
    gate:      HoldGate,
    /// Contacts that still have a marker on screen.  Always a subset of the
    /// registry; a finger that lost stays tracked but is not shown.
    visible:   IndexSet<TouchId>,
    selection: Option<Selection>,

    pool:      ChallengePool,
    current:   Option<Challenge>,
    exhausted: bool,
    rounds:    u64,

    rng:       R,
    haptics:   H,
}

impl<R: RandomIndex, H: Haptics> Session<R, H> {
    /// Build the pool from `dataset` and draw the first challenge.
    pub fn new(dataset: Vec<Challenge>, rng: R, haptics: H) -> Result<Self> {
        let pool = ChallengePool::new(dataset)?;
        info!("session started with {} challenges", pool.len());
        let mut session = Session {
            registry:  ContactRegistry::new(),
            gate:      HoldGate::new(),
            visible:   IndexSet::new(),
            selection: None,
            pool,
            current:   None,
            exhausted: false,
            rounds:    0,
            rng,
            haptics,
        };
        session.next_challenge();
        Ok(session)
    }

    // ── input ─────────────────────────────────────────────────────────────

    pub fn handle(&mut self, batch: &TouchBatch, now: Duration) {
        match batch {
            TouchBatch::Began(p)     => self.touches_began(p, now),
            TouchBatch::Moved(p)     => self.touches_moved(p, now),
            TouchBatch::Ended(p)     => self.touches_ended(p, now),
            TouchBatch::Cancelled(p) => self.touches_cancelled(p, now),
        }
    }

    pub fn touches_began(&mut self, touches: &[TouchPoint], now: Duration) {
        self.advance(now);
        let added = self.registry.began(touches);
        if added.is_empty() {
            return;
        }
        for &id in &added {
            self.haptics.vibrate(TAP);
            // The board shows only the winner until it settles.
            if self.selection.is_none() {
                self.visible.insert(id);
            }
        }
        debug!("contacts {:?} down, population {}", added, self.registry.len());
        self.gate.arm(self.registry.len(), now);
    }

    pub fn touches_moved(&mut self, touches: &[TouchPoint], now: Duration) {
        self.advance(now);
        self.registry.moved(touches);
    }

    pub fn touches_ended(&mut self, touches: &[TouchPoint], now: Duration) {
        self.advance(now);
        let removed = self.registry.ended(touches);
        if removed.is_empty() {
            return;
        }
        for id in &removed {
            self.visible.shift_remove(id);
        }
        debug!("contacts {:?} up, population {}", removed, self.registry.len());
        self.gate.cancel_below(self.registry.len());
    }

    pub fn touches_cancelled(&mut self, touches: &[TouchPoint], now: Duration) {
        self.touches_ended(touches, now);
    }

    /// Fire any timer that is due.  Call this from the frame loop.
    pub fn tick(&mut self, now: Duration) {
        self.advance(now);
    }

    // ── timers ────────────────────────────────────────────────────────────

    fn advance(&mut self, now: Duration) {
        if let Some(GateEvent::Fired { at }) = self.gate.poll(now) {
            self.select(at);
        }
        if let Some(sel) = self.selection {
            if now >= sel.settle_at {
                self.settle(sel);
            }
        }
    }

    /// Draw the winner among the contacts that have a marker.  Fingers held
    /// over from an earlier round are tracked but never eligible.
    fn select(&mut self, at: Duration) {
        let active = self.visible_contacts();
        if active.is_empty() {
            debug!("hold expired with no marked contacts, round dropped");
            self.gate.reset();
            return;
        }
        let Some(winner) = select_winner(&active, &mut self.rng) else {
            self.gate.reset();
            return;
        };
        self.visible.retain(|&id| id == winner);
        self.selection = Some(Selection {
            winner,
            selected_at: at,
            settle_at: at + SETTLE_DELAY,
        });
        self.haptics.vibrate(TAP);
        debug!("winner {} out of {} contacts", winner, active.len());
    }

    fn settle(&mut self, sel: Selection) {
        self.visible.clear();
        self.selection = None;
        self.gate.reset();
        self.rounds += 1;
        debug!("round {} settled at {:?}", self.rounds, sel.settle_at);
        self.next_challenge();
    }

    fn next_challenge(&mut self) {
        match self.pool.draw(&mut self.rng) {
            Draw::Drawn(c) => {
                debug!("challenge {} drawn, {} left", c.id, self.pool.len());
                self.current = Some(c);
            }
            Draw::Exhausted => self.exhausted = true,
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        if let Some(sel) = self.selection {
            return Phase::Settling { winner: sel.winner, deadline: sel.settle_at };
        }
        match self.gate.state() {
            GateState::Pending { deadline, .. } => Phase::Holding { deadline },
            _ => Phase::Idle,
        }
    }

    pub fn winner(&self) -> Option<TouchId> {
        self.selection.map(|s| s.winner)
    }

    pub fn population(&self) -> usize {
        self.registry.len()
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.registry.snapshot()
    }

    /// Contacts that currently have a marker, in first-touch order.
    pub fn visible_contacts(&self) -> Vec<Contact> {
        self.registry
            .iter()
            .filter(|c| self.visible.contains(&c.id))
            .collect()
    }

    pub fn current_challenge(&self) -> Option<&Challenge> {
        self.current.as_ref()
    }

    pub fn remaining_challenges(&self) -> usize {
        self.pool.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn haptics_mut(&mut self) -> &mut H {
        &mut self.haptics
    }

    pub fn render(&self) -> RenderModel {
        let visible = self.visible_contacts();
        let hold = match self.gate.state() {
            GateState::Pending { armed_at, .. } => HoldView::Holding { since: armed_at },
            _ => HoldView::Idle,
        };
        presentation::render(&Scene {
            visible: &visible,
            hold,
            winner: self.selection.map(|s| WinnerView { id: s.winner, selected_at: s.selected_at }),
            challenge: self.current.as_ref(),
            exhausted: self.exhausted,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
