//! # finger_picker
//!
//! Core of the finger picker party game: everybody puts a finger on the
//! screen, and after a sustained two-second hold one finger is picked at
//! random and a new challenge card is dealt.
//!
//! ## Components
//!
//! | Module | Role |
//! |---|---|
//! | [`contact`] | Registry of active touches, keyed by touch id |
//! | [`hold_gate`] | Single-shot timer armed at ≥2 contacts, cancelled below |
//! | [`selector`] | Uniform random winner; injectable randomness |
//! | [`challenge`] | Pool of challenges drawn without replacement |
//! | [`presentation`] | Pure state → render model mapping |
//! | [`haptics`] | Fire-and-forget vibration boundary |
//! | [`session`] | Owns all of the above and runs the round cycle |
//!
//! ## Round cycle
//!
//! ```text
//!  touches ──▶ registry ──▶ hold gate ──(2000 ms)──▶ selector ──▶ winner shown
//!                               ▲                                     │
//!                               └──── board cleared, next card ◀──(1000 ms)
//! ```
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use finger_picker::{Challenge, NoHaptics, RngIndex, Session, TouchPoint};
//!
//! let data = vec![Challenge::new(1, "Sing a song"), Challenge::new(2, "Tell a joke")];
//! let mut session = Session::new(data, RngIndex::from_os_rng(), NoHaptics).unwrap();
//!
//! session.touches_began(&[TouchPoint::new(1, 10.0, 10.0)], Duration::ZERO);
//! session.touches_began(&[TouchPoint::new(2, 20.0, 20.0)], Duration::ZERO);
//! session.tick(Duration::from_millis(2000));
//! assert!(session.winner().is_some());
//! ```

pub mod challenge;
pub mod contact;
pub mod error;
pub mod haptics;
pub mod hold_gate;
pub mod presentation;
pub mod selector;
pub mod session;

pub use challenge::{Challenge, ChallengePool, Draw};
pub use contact::{Contact, ContactRegistry, Point, TouchBatch, TouchId, TouchPoint};
pub use error::PickerError;
pub use haptics::{Haptics, NoHaptics};
pub use hold_gate::{GateState, HoldGate, HOLD_DURATION};
pub use presentation::{AnimationIntent, Marker, MarkerStyle, RenderModel};
pub use selector::{select_winner, DefaultRandom, RandomIndex, RngIndex};
pub use session::{Phase, Session, SETTLE_DELAY};
