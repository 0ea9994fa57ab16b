//! Simulation settings, from the command line or defaults.

use std::path::PathBuf;

use clap::Parser;
use finger_picker::{Challenge, DefaultRandom, PickerError, RngIndex};

/// Challenge list bundled into the binary.
pub const DEFAULT_CHALLENGES: &str = include_str!("../data/challenges.json");

#[derive(Parser, Debug)]
#[command(name = "picker_sim", version, about = "Finger picker touch-surface simulation")]
pub struct Args {
    /// JSON challenge list; the bundled one is used when omitted
    #[arg(long)]
    pub challenges: Option<PathBuf>,

    /// Seed for reproducible winners and challenge order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Surface width in pixels
    #[arg(long, default_value_t = 480)]
    pub width: usize,

    /// Surface height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub challenges: Option<PathBuf>,
    pub seed:       Option<u64>,
    pub width:      usize,
    pub height:     usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            challenges: None,
            seed:       None,
            width:      480,
            height:     800,
        }
    }
}

impl From<Args> for SimConfig {
    fn from(a: Args) -> Self {
        SimConfig {
            challenges: a.challenges,
            seed:       a.seed,
            // Smaller than a couple of markers is unusable.
            width:      a.width.max(240),
            height:     a.height.max(320),
        }
    }
}

impl SimConfig {
    pub fn load_challenges(&self) -> Result<Vec<Challenge>, PickerError> {
        match &self.challenges {
            Some(path) => Challenge::list_from_path(path),
            None => Challenge::list_from_json(DEFAULT_CHALLENGES),
        }
    }

    pub fn random(&self) -> DefaultRandom {
        match self.seed {
            Some(seed) => RngIndex::seeded(seed),
            None => RngIndex::from_os_rng(),
        }
    }
}
