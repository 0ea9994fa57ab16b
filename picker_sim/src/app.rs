//! Top-level simulation loop.
//!
//! `App` owns the [`Session`] and turns its state into a status line and a
//! haptic flash.  [`run`] wires it to the touch source and the window.

use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use finger_picker::{DefaultRandom, Haptics, Phase, RenderModel, Session, TouchBatch};
use log::{debug, info};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::input::{spawn_touch_source, SimEvent, SimInput, SimTouchSource};
use crate::visualizer::Visualizer;

/// Frames the border stays lit after a vibration request.
const FLASH_FRAMES: u32 = 4;

// ════════════════════════════════════════════════════════════════════════════
// FlashHaptics: buzzes become a screen flash
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct FlashHaptics {
    pending: u32,
}

impl FlashHaptics {
    /// Number of buzzes since the last call.
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}

impl Haptics for FlashHaptics {
    fn vibrate(&mut self, duration: Duration) {
        debug!("buzz {:?}", duration);
        self.pending += 1;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App {
    session:      Session<DefaultRandom, FlashHaptics>,
    flash_frames: u32,
    pub status:   String,
}

impl App {
    pub fn new(cfg: &SimConfig) -> Result<Self, SimError> {
        let dataset = cfg.load_challenges()?;
        let session = Session::new(dataset, cfg.random(), FlashHaptics::default())?;
        let mut app = App { session, flash_frames: 0, status: String::new() };
        app.refresh_status(Duration::ZERO);
        Ok(app)
    }

    pub fn handle(&mut self, batch: &TouchBatch, now: Duration) {
        self.session.handle(batch, now);
    }

    /// Per-frame logic: fire due timers, update flash and status.
    pub fn tick(&mut self, now: Duration) {
        self.session.tick(now);

        if self.session.haptics_mut().take() > 0 {
            self.flash_frames = FLASH_FRAMES;
        } else {
            self.flash_frames = self.flash_frames.saturating_sub(1);
        }
        self.refresh_status(now);
    }

    fn refresh_status(&mut self, now: Duration) {
        self.status = match self.session.phase() {
            Phase::Idle if self.session.population() < 2 => {
                "Two or more fingers on the screen".to_string()
            }
            Phase::Idle => "Add a finger to start the next round".to_string(),
            Phase::Holding { deadline } => {
                format!("Hold still... {:.1}s", deadline.saturating_sub(now).as_secs_f32())
            }
            Phase::Settling { winner, .. } => format!("Finger {} wins", winner.0),
        };
        if self.session.is_exhausted() {
            self.status.push_str("  - no more challenges");
        }
    }

    pub fn session(&self) -> &Session<DefaultRandom, FlashHaptics> {
        &self.session
    }

    pub fn render_model(&self) -> RenderModel {
        self.session.render()
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_frames > 0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run()
// ════════════════════════════════════════════════════════════════════════════

/// Open the window and drive the event/render loop at ~60 fps until the
/// window closes or `Q` is pressed.
pub fn run(cfg: SimConfig) -> Result<(), SimError> {
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let events = spawn_touch_source(SimTouchSource { rx: sim_rx });

    let mut vis = Visualizer::new(sim_tx, cfg.width, cfg.height)?;
    let mut app = App::new(&cfg)?;
    let start = Instant::now();

    info!(
        "{}x{} surface, {} challenges loaded",
        cfg.width,
        cfg.height,
        app.session().remaining_challenges() + usize::from(app.session().current_challenge().is_some()),
    );

    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        loop {
            match events.try_recv() {
                Ok(SimEvent::Touch(batch)) => app.handle(&batch, start.elapsed()),
                Ok(SimEvent::Quit) => return Ok(()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        let now = start.elapsed();
        app.tick(now);
        vis.render(&app.render_model(), now, &app.status, app.is_flashing());
    }

    info!("{} rounds played", app.session().rounds_played());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
