//! Touch input: raw window input turned into touch batches.
//!
//! The public interface is [`SimEvent`] delivered over a `mpsc` channel, so
//! the session only ever sees [`TouchBatch`]es and does not care whether they
//! came from a real surface or from the keyboard simulator.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use finger_picker::{Point, TouchBatch, TouchId, TouchPoint};
use log::debug;

// ════════════════════════════════════════════════════════════════════════════
// SimEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Touch(TouchBatch),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// TouchSource trait
// ════════════════════════════════════════════════════════════════════════════

pub trait TouchSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SimEvent>);
}

/// Spawn a touch source on its own thread and return the receiving end.
/// The receiver is the session's single event queue.
pub fn spawn_touch_source<S: TouchSource>(source: S) -> Receiver<SimEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// Raw simulation input
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Digit key `slot` (1–9) pressed with the cursor at `at`.
    FingerKey { slot: u8, at: Point },
    /// Left mouse held, cursor at the given point.
    Drag(Point),
    /// `C`: every finger leaves the surface at once.
    CancelAll,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// FingerPad
// ════════════════════════════════════════════════════════════════════════════

/// Simulated fingers, keyed by digit slot.  A slot's touch id is the slot
/// number, so ids are reused only after the finger was lifted.
#[derive(Debug, Default)]
pub struct FingerPad {
    down: BTreeMap<u8, Point>,
}

impl FingerPad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn down_count(&self) -> usize {
        self.down.len()
    }

    pub fn translate(&mut self, input: SimInput) -> Option<SimEvent> {
        let batch = match input {
            SimInput::FingerKey { slot, at } => {
                let point = TouchPoint { id: TouchId(slot as u64), location: at };
                if self.down.remove(&slot).is_some() {
                    TouchBatch::Ended(vec![point])
                } else {
                    self.down.insert(slot, at);
                    TouchBatch::Began(vec![point])
                }
            }
            SimInput::Drag(at) => {
                let (&slot, pos) = self
                    .down
                    .iter_mut()
                    .min_by(|a, b| a.1.distance_sq(at).total_cmp(&b.1.distance_sq(at)))?;
                if *pos == at {
                    return None;
                }
                *pos = at;
                TouchBatch::Moved(vec![TouchPoint { id: TouchId(slot as u64), location: at }])
            }
            SimInput::CancelAll => {
                if self.down.is_empty() {
                    return None;
                }
                let points = std::mem::take(&mut self.down)
                    .into_iter()
                    .map(|(slot, at)| TouchPoint { id: TouchId(slot as u64), location: at })
                    .collect();
                TouchBatch::Cancelled(points)
            }
            SimInput::Quit => return Some(SimEvent::Quit),
        };
        Some(SimEvent::Touch(batch))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimTouchSource
// ════════════════════════════════════════════════════════════════════════════

/// Touch source driven by [`SimInput`] events from the visualizer's window.
pub struct SimTouchSource {
    pub rx: Receiver<SimInput>,
}

impl TouchSource for SimTouchSource {
    fn run(self: Box<Self>, tx: Sender<SimEvent>) {
        let mut pad = FingerPad::new();
        for input in self.rx {
            let Some(event) = pad.translate(input) else { continue };
            debug!("sim input {:?} -> {:?}", input, event);
            let quit = event == SimEvent::Quit;
            if tx.send(event).is_err() || quit {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
