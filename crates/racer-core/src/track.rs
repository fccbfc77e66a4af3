use serde::{Deserialize, Serialize};

use crate::entity::CheckpointId;
use crate::error::RuleError;
use crate::geometry::Position;
use crate::state::GameState;

pub const GRASS: &str = "🟩";
pub const ASPHALT: &str = "⬛";
pub const FINISH: &str = "🏁";
pub const WALL: &str = "🧱";
/// Shown in place of a struck spectator.
pub const SKULL: &str = "💀";

/// How a cell behaves for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Wall,
    /// Runoff: drivable, but landing on it costs a penalty turn.
    Grass,
    Asphalt,
    Finish,
    Checkpoint(CheckpointId),
    /// A spectator's cell, live or struck.
    Audience,
}

/// Whether grass is runoff or a hard wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrassPolicy {
    #[default]
    Runoff,
    Wall,
}

/// Classified, read-only view of a snapshot's grid.
///
/// Display symbols change from turn to turn (spectators react to cars), so
/// classification keys off the snapshot's audience map, checkpoint and finish
/// cells first and only falls back to the symbol for plain terrain.
#[derive(Debug, Clone)]
pub struct TrackMap {
    width: i32,
    height: i32,
    cells: Vec<Terrain>,
    grass: GrassPolicy,
}

impl TrackMap {
    pub fn from_state(state: &GameState, grass: GrassPolicy) -> Result<Self, RuleError> {
        state.validate()?;
        let width = state.width() as i32;
        let height = state.height() as i32;

        let mut cells = Vec::with_capacity((width * height) as usize);
        for (y, row) in state.track.iter().enumerate() {
            for (x, symbol) in row.iter().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                if state.audience_at(pos).is_some() {
                    cells.push(Terrain::Audience);
                } else {
                    cells.push(terrain_from_symbol(symbol));
                }
            }
        }

        let mut map = Self {
            width,
            height,
            cells,
            grass,
        };
        for (&id, positions) in &state.checkpoints {
            for &pos in positions {
                map.set(pos, Terrain::Checkpoint(id));
            }
        }
        for &pos in &state.finish_line {
            map.set(pos, Terrain::Finish);
        }
        Ok(map)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn grass_policy(&self) -> GrassPolicy {
        self.grass
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Terrain at `pos`, or `None` off the grid.
    pub fn terrain(&self, pos: Position) -> Option<Terrain> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Whether a car may end its move on `pos`.
    pub fn is_drivable(&self, pos: Position) -> bool {
        match self.terrain(pos) {
            None | Some(Terrain::Wall) => false,
            Some(Terrain::Grass) => self.grass == GrassPolicy::Runoff,
            Some(_) => true,
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    fn set(&mut self, pos: Position, terrain: Terrain) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = terrain;
        }
    }
}

fn terrain_from_symbol(symbol: &str) -> Terrain {
    match symbol {
        GRASS => Terrain::Grass,
        ASPHALT => Terrain::Asphalt,
        FINISH => Terrain::Finish,
        _ => Terrain::Wall,
    }
}
