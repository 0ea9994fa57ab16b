//! Presentation driver: a pure mapping from session state to a render
//! model.
//!
//! Nothing here owns state.  Animations are described, not stepped: each
//! marker carries [`AnimationIntent`]s with their start instant and the
//! rendering layer advances them however it likes ([`AnimationIntent::value_at`]
//! is provided for renderers without an animation engine of their own).

use std::time::Duration;

use crate::challenge::Challenge;
use crate::contact::{Contact, Point, TouchId};

// ════════════════════════════════════════════════════════════════════════════
// Look
// ════════════════════════════════════════════════════════════════════════════

/// Marker diameter in surface units.
pub const MARKER_SIZE: f32 = 100.0;
/// ARGB, `rgba(0, 150, 255, 0.6)`.
pub const MARKER_COLOR: u32 = 0x990096FF;
/// ARGB, gold.
pub const WINNER_COLOR: u32 = 0xFFFFD700;

pub const PULSE_PERIOD: Duration = Duration::from_millis(500);
pub const PULSE_SCALE: f32 = 1.5;
pub const PULSE_OPACITY: f32 = 0.5;

pub const GROW_DURATION: Duration = Duration::from_millis(150);
pub const GROW_SCALE: f32 = 1.5;

/// Challenge card: fraction of the surface width, fixed height, corner radius.
pub const CARD_WIDTH_RATIO: f32 = 0.85;
pub const CARD_HEIGHT: f32 = 200.0;
pub const CARD_RADIUS: f32 = 16.0;
pub const CARD_COLOR: u32 = 0xFFFFFFFF;

// ════════════════════════════════════════════════════════════════════════════
// AnimationIntent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Property {
    Scale,
    Opacity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Run once and hold the end value.
    Once,
    /// Repeat forever; `reverse` plays every other cycle backwards.
    Loop { reverse: bool },
}

/// Declarative description of one animated property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationIntent {
    pub property:   Property,
    pub repeat:     Repeat,
    pub from:       f32,
    pub to:         f32,
    pub duration:   Duration,
    pub started_at: Duration,
}

impl AnimationIntent {
    pub fn pulse_scale(started_at: Duration) -> Self {
        AnimationIntent {
            property: Property::Scale,
            repeat:   Repeat::Loop { reverse: true },
            from:     1.0,
            to:       PULSE_SCALE,
            duration: PULSE_PERIOD,
            started_at,
        }
    }

    pub fn pulse_opacity(started_at: Duration) -> Self {
        AnimationIntent {
            property: Property::Opacity,
            repeat:   Repeat::Loop { reverse: true },
            from:     1.0,
            to:       PULSE_OPACITY,
            duration: PULSE_PERIOD,
            started_at,
        }
    }

    pub fn grow(started_at: Duration) -> Self {
        AnimationIntent {
            property: Property::Scale,
            repeat:   Repeat::Once,
            from:     1.0,
            to:       GROW_SCALE,
            duration: GROW_DURATION,
            started_at,
        }
    }

    /// Value of the animated property at `now` (ease-in-out, quadratic).
    pub fn value_at(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.started_at).as_secs_f32();
        let t = elapsed / self.duration.as_secs_f32().max(f32::EPSILON);
        let phase = match self.repeat {
            Repeat::Once => t.min(1.0),
            Repeat::Loop { reverse } => {
                let cycle = t.floor();
                let frac = t - cycle;
                if reverse && (cycle as u64) % 2 == 1 { 1.0 - frac } else { frac }
            }
        };
        self.from + (self.to - self.from) * ease_in_out_quad(phase)
    }
}

fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Render model
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Regular finger marker; pulses while the hold gate is pending.
    Pulsing,
    /// The selected finger.
    Winner,
}

/// One circle to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id:         TouchId,
    pub center:     Point,
    /// Top-left corner of the marker's bounding box, so that the circle is
    /// centered on the touch point.
    pub origin:     Point,
    pub size:       f32,
    pub color:      u32,
    pub style:      MarkerStyle,
    pub animations: Vec<AnimationIntent>,
}

impl Marker {
    fn value_of(&self, property: Property, now: Duration) -> Option<f32> {
        self.animations
            .iter()
            .find(|a| a.property == property)
            .map(|a| a.value_at(now))
    }

    pub fn scale_at(&self, now: Duration) -> f32 {
        self.value_of(Property::Scale, now).unwrap_or(1.0)
    }

    pub fn opacity_at(&self, now: Duration) -> f32 {
        self.value_of(Property::Opacity, now).unwrap_or(1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct RenderModel {
    pub markers:   Vec<Marker>,
    pub card:      Option<CardView>,
    /// The challenge pool has run dry.
    pub exhausted: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Scene → RenderModel
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldView {
    Idle,
    Holding { since: Duration },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinnerView {
    pub id:          TouchId,
    pub selected_at: Duration,
}

/// Everything the driver reads.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Visible contacts, in first-touch order.
    pub visible:   &'a [Contact],
    pub hold:      HoldView,
    pub winner:    Option<WinnerView>,
    pub challenge: Option<&'a Challenge>,
    pub exhausted: bool,
}

pub fn render(scene: &Scene<'_>) -> RenderModel {
    let markers = scene
        .visible
        .iter()
        .filter_map(|c| match scene.winner {
            Some(w) if w.id == c.id => Some(marker(c, MarkerStyle::Winner, vec![
                AnimationIntent::grow(w.selected_at),
            ])),
            Some(_) => None,
            None => {
                let animations = match scene.hold {
                    HoldView::Holding { since } => vec![
                        AnimationIntent::pulse_scale(since),
                        AnimationIntent::pulse_opacity(since),
                    ],
                    HoldView::Idle => Vec::new(),
                };
                Some(marker(c, MarkerStyle::Pulsing, animations))
            }
        })
        .collect();

    RenderModel {
        markers,
        card: scene.challenge.map(|c| CardView { text: c.text.clone() }),
        exhausted: scene.exhausted,
    }
}

fn marker(c: &Contact, style: MarkerStyle, animations: Vec<AnimationIntent>) -> Marker {
    let half = MARKER_SIZE / 2.0;
    Marker {
        id: c.id,
        center: c.position,
        origin: Point::new(c.position.x - half, c.position.y - half),
        size: MARKER_SIZE,
        color: match style {
            MarkerStyle::Pulsing => MARKER_COLOR,
            MarkerStyle::Winner => WINNER_COLOR,
        },
        style,
        animations,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
