//! Generation parameters for one dungeon session.

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::GenError;
use crate::geometry::Coords;

/// Grid extents, starting anchors, budgets and seed.
///
/// Every field has a default so a partial JSON config deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    /// One starting anchor per dungeon entrance.
    pub starts: Vec<Coords>,
    pub room_budget: u32,
    pub piece_budget: u32,
    /// Placement attempts per starting anchor before the session fails.
    pub start_attempts: u32,
    pub seed: u64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            depth: 1,
            starts: vec![Coords::new(40, 30, 0)],
            room_budget: defaults::ROOM_BUDGET,
            piece_budget: defaults::PIECE_BUDGET,
            start_attempts: defaults::START_ATTEMPTS,
            seed: defaults::SEED,
        }
    }
}

impl GenConfig {
    /// A config for a `width`×`height`×`depth` grid with a single start.
    pub fn new(width: i32, height: i32, depth: i32, start: Coords) -> Self {
        Self {
            width,
            height,
            depth,
            starts: vec![start],
            ..Self::default()
        }
    }

    pub fn with_budgets(mut self, piece_budget: u32, room_budget: u32) -> Self {
        self.piece_budget = piece_budget;
        self.room_budget = room_budget;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.width <= 0 || self.height <= 0 || self.depth <= 0 {
            return Err(GenError::InvalidConfig(format!(
                "grid extents must be positive, got {}x{}x{}",
                self.width, self.height, self.depth
            )));
        }
        if self.room_budget == 0 || self.piece_budget == 0 {
            return Err(GenError::InvalidConfig("budgets must be non-zero".into()));
        }
        if self.start_attempts == 0 {
            return Err(GenError::InvalidConfig("start_attempts must be non-zero".into()));
        }
        if self.starts.is_empty() {
            return Err(GenError::InvalidConfig("at least one start is required".into()));
        }
        // Every start places an entrance, and any entrance may be a room.
        let starts = self.starts.len();
        if starts > self.piece_budget as usize || starts > self.room_budget as usize {
            return Err(GenError::InvalidConfig(format!(
                "{} starts exceed the budgets of {} pieces and {} rooms",
                starts, self.piece_budget, self.room_budget
            )));
        }
        if let Some(s) = self.starts.iter().find(|s| {
            !(0..self.width).contains(&s.x)
                || !(0..self.height).contains(&s.y)
                || !(0..self.depth).contains(&s.z)
        }) {
            return Err(GenError::InvalidConfig(format!("start {} is outside the grid", s)));
        }
        Ok(())
    }
}
