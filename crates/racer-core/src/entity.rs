use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Velocity};

/// Checkpoint number as it appears in the snapshot (`1`, `2`, `3` on the stock track).
pub type CheckpointId = u8;

/// Which car an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Ai,
            Self::Ai => Self::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

/// Per-car record carried in every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub vx: i32,
    #[serde(default)]
    pub vy: i32,
    /// Claimed checkpoints in the order they were claimed.
    #[serde(default)]
    pub checkpoints_passed: Vec<CheckpointId>,
    /// Skips still owed.
    #[serde(default)]
    pub penalty_turns: u32,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub finish_turn: Option<u32>,
}

impl EntityState {
    /// A stationary car at `start` with no progress.
    pub fn at(start: Position) -> Self {
        Self {
            x: start.x,
            y: start.y,
            vx: 0,
            vy: 0,
            checkpoints_passed: Vec::new(),
            penalty_turns: 0,
            finished: false,
            finish_turn: None,
        }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub const fn velocity(&self) -> Velocity {
        Velocity::new(self.vx, self.vy)
    }

    pub fn set_position(&mut self, pos: Position) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.vx = velocity.vx;
        self.vy = velocity.vy;
    }

    pub fn has_passed(&self, id: CheckpointId) -> bool {
        self.checkpoints_passed.contains(&id)
    }

    /// First checkpoint in `sequence` not yet claimed.
    pub fn next_checkpoint(&self, sequence: &[CheckpointId]) -> Option<CheckpointId> {
        sequence.iter().copied().find(|id| !self.has_passed(*id))
    }

    /// Whether every checkpoint in `sequence` has been claimed.
    pub fn has_all_checkpoints(&self, sequence: &[CheckpointId]) -> bool {
        sequence.iter().all(|id| self.has_passed(*id))
    }

    pub fn owes_penalty(&self) -> bool {
        self.penalty_turns > 0
    }
}
