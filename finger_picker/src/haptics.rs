//! Haptic feedback boundary.  Calls are fire-and-forget: nothing is
//! returned and nothing is retried.

use std::time::Duration;

/// Length of the buzz for a new finger and for the winner.
pub const TAP: Duration = Duration::from_millis(5);

pub trait Haptics {
    fn vibrate(&mut self, duration: Duration);
}

/// Discards every request.  For surfaces without a vibration motor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _duration: Duration) {}
}

impl<H: Haptics + ?Sized> Haptics for Box<H> {
    fn vibrate(&mut self, duration: Duration) {
        (**self).vibrate(duration)
    }
}
