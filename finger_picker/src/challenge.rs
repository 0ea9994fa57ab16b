//! Challenge dispenser.
//!
//! The pool is filled once from the dataset and only ever shrinks: each
//! draw removes one random entry, so no challenge repeats within a
//! session.

use std::collections::HashSet;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{PickerError, Result};
use crate::selector::RandomIndex;

// ════════════════════════════════════════════════════════════════════════════
// Challenge
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id:   u32,
    #[serde(alias = "challenge")]
    pub text: String,
}

impl Challenge {
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Challenge { id, text: text.into() }
    }

    /// Parse a JSON array of `{ "id", "text" }` records.
    pub fn list_from_json(json: &str) -> Result<Vec<Challenge>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn list_from_path(path: &Path) -> Result<Vec<Challenge>> {
        let json = std::fs::read_to_string(path).map_err(|source| PickerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::list_from_json(&json)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ChallengePool
// ════════════════════════════════════════════════════════════════════════════

/// Outcome of one draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Draw {
    Drawn(Challenge),
    /// Nothing left; the pool is unchanged.
    Exhausted,
}

#[derive(Debug, Default)]
pub struct ChallengePool {
    remaining: Vec<Challenge>,
}

impl ChallengePool {
    /// Build the pool, rejecting datasets that reuse an id.
    pub fn new(items: Vec<Challenge>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for c in &items {
            if !seen.insert(c.id) {
                return Err(PickerError::DuplicateChallenge { id: c.id });
            }
        }
        Ok(ChallengePool { remaining: items })
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn remaining(&self) -> &[Challenge] {
        &self.remaining
    }

    /// Remove and return a uniformly chosen challenge.  The other entries
    /// keep their relative order.
    pub fn draw<R: RandomIndex + ?Sized>(&mut self, rng: &mut R) -> Draw {
        if self.remaining.is_empty() {
            info!("challenge pool exhausted, nothing left to draw");
            return Draw::Exhausted;
        }
        let len = self.remaining.len();
        let i = rng.index(len);
        debug_assert!(i < len, "random index {} out of range for {} challenges", i, len);
        Draw::Drawn(self.remaining.remove(i.min(len - 1)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
