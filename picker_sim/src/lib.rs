//! # picker_sim
//!
//! Desktop stand-in for the phone: a window plays the touch surface, the
//! keyboard and mouse play the fingers, and the [`finger_picker`] session
//! runs unchanged behind it.
//!
//! ## Controls
//!
//! | Input | Touch |
//! |---|---|
//! | `1`–`9` | Put finger N down at the cursor; press again to lift it |
//! | Left-drag | Move the finger nearest the cursor |
//! | `C` | Cancel every finger (touch-cancelled) |
//! | `Q` | Quit |
//!
//! Buzzes from the session show up as a white flash around the window edge.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod visualizer;
