use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{CheckpointId, EntityState, Side};
use crate::error::RuleError;
use crate::geometry::Position;

/// Race result once the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Ai,
    Tie,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Self::Player,
            Side::Ai => Self::Ai,
        }
    }
}

/// Display-only trail of visited cells per car.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub player: Vec<Position>,
    #[serde(default)]
    pub ai: Vec<Position>,
}

impl History {
    pub fn trail(&self, side: Side) -> &[Position] {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn push(&mut self, side: Side, pos: Position) {
        match side {
            Side::Player => self.player.push(pos),
            Side::Ai => self.ai.push(pos),
        }
    }
}

/// Where the turn state machine stands for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    AwaitingPlayerMove,
    AwaitingAiMove,
    GameOver,
}

/// Complete game snapshot. The server keeps nothing between requests; the
/// client sends this back verbatim with each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Correlates log lines for one race. Absent in older snapshots.
    #[serde(default)]
    pub game_id: Uuid,
    /// Display symbols, row-major (`track[y][x]`).
    pub track: Vec<Vec<String>>,
    /// Spectator symbol per `"x,y"` key.
    #[serde(default)]
    pub original_audience: BTreeMap<String, String>,
    /// Struck spectators, each at most once.
    #[serde(default)]
    pub dead_audience: Vec<Position>,
    #[serde(default)]
    pub checkpoints: BTreeMap<CheckpointId, Vec<Position>>,
    #[serde(default)]
    pub finish_line: Vec<Position>,
    pub player: EntityState,
    pub ai: EntityState,
    pub current_turn: Side,
    pub turn_number: u32,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub history: History,
}

impl GameState {
    pub fn entity(&self, side: Side) -> &EntityState {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn entity_mut(&mut self, side: Side) -> &mut EntityState {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else {
            match self.current_turn {
                Side::Player => GamePhase::AwaitingPlayerMove,
                Side::Ai => GamePhase::AwaitingAiMove,
            }
        }
    }

    /// Checkpoint ids in the order they must be claimed.
    pub fn checkpoint_sequence(&self) -> Vec<CheckpointId> {
        self.checkpoints.keys().copied().collect()
    }

    pub fn height(&self) -> usize {
        self.track.len()
    }

    pub fn width(&self) -> usize {
        self.track.first().map_or(0, Vec::len)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width()
            && (pos.y as usize) < self.height()
    }

    /// Original symbol of the spectator standing at `pos`, if any.
    pub fn audience_at(&self, pos: Position) -> Option<&str> {
        self.original_audience.get(&pos.key()).map(String::as_str)
    }

    pub fn is_dead_audience(&self, pos: Position) -> bool {
        self.dead_audience.contains(&pos)
    }

    /// Reject snapshots that cannot describe a playable race.
    pub fn validate(&self) -> Result<(), RuleError> {
        let width = self.width();
        if width == 0 {
            return Err(RuleError::InvalidState("track is empty".to_string()));
        }
        if let Some(row) = self.track.iter().position(|r| r.len() != width) {
            return Err(RuleError::InvalidState(format!(
                "track row {row} has {} cells, expected {width}",
                self.track[row].len()
            )));
        }
        if self.turn_number == u32::MAX {
            return Err(RuleError::InvalidState("turn number is exhausted".to_string()));
        }
        let sequence = self.checkpoint_sequence();
        let span = width.max(self.height());
        for side in [Side::Player, Side::Ai] {
            let car = self.entity(side);
            let pos = car.position();
            if !self.in_bounds(pos) {
                return Err(RuleError::InvalidState(format!(
                    "{side} is off the track at ({}, {})",
                    pos.x, pos.y
                )));
            }
            // A legal landing never carries more speed than the grid is wide.
            if car.vx.unsigned_abs() as usize > span || car.vy.unsigned_abs() as usize > span {
                return Err(RuleError::InvalidState(format!(
                    "{side} velocity ({}, {}) exceeds the track",
                    car.vx, car.vy
                )));
            }
            if let Some(id) = car
                .checkpoints_passed
                .iter()
                .find(|id| !sequence.contains(id))
            {
                return Err(RuleError::InvalidState(format!(
                    "{side} claims unknown checkpoint {id}"
                )));
            }
            if car.finished && !car.has_all_checkpoints(&sequence) {
                return Err(RuleError::InvalidState(format!(
                    "{side} finished without every checkpoint"
                )));
            }
        }
        if let Some((i, pos)) = self
            .dead_audience
            .iter()
            .enumerate()
            .find(|(i, p)| self.dead_audience[..*i].contains(p))
        {
            return Err(RuleError::InvalidState(format!(
                "spectator at ({}, {}) struck twice (entry {i})",
                pos.x, pos.y
            )));
        }
        if let Some(pos) = self
            .checkpoints
            .values()
            .flatten()
            .chain(&self.finish_line)
            .find(|p| !self.in_bounds(**p))
        {
            return Err(RuleError::InvalidState(format!(
                "special cell ({}, {}) is off the track",
                pos.x, pos.y
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::open_track_state;

    #[test]
    fn phase_follows_turn_and_game_over() {
        let mut state = open_track_state(10, 10);
        assert_eq!(state.phase(), GamePhase::AwaitingPlayerMove);
        state.current_turn = Side::Ai;
        assert_eq!(state.phase(), GamePhase::AwaitingAiMove);
        state.game_over = true;
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn validate_accepts_open_track() {
        assert!(open_track_state(10, 10).validate().is_ok());
    }

    #[test]
    fn validate_rejects_ragged_rows() {
        let mut state = open_track_state(10, 10);
        state.track[3].pop();
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));
    }

    #[test]
    fn validate_rejects_off_track_car() {
        let mut state = open_track_state(10, 10);
        state.ai.x = 10;
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));
    }

    #[test]
    fn validate_rejects_unknown_checkpoint_claim() {
        let mut state = open_track_state(10, 10);
        state.player.checkpoints_passed.push(9);
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));
    }

    #[test]
    fn validate_rejects_runaway_velocity() {
        let mut state = open_track_state(10, 10);
        state.player.vx = i32::MAX;
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));

        let mut state = open_track_state(10, 10);
        state.ai.vy = i32::MIN;
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));

        let mut state = open_track_state(10, 10);
        state.player.vx = -10;
        assert!(state.validate().is_ok());
    }

    #[test]
    fn validate_rejects_exhausted_turn_counter() {
        let mut state = open_track_state(10, 10);
        state.turn_number = u32::MAX;
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));
    }

    #[test]
    fn validate_rejects_finish_without_checkpoints() {
        let mut state = open_track_state(10, 10);
        state.checkpoints.insert(1, vec![Position::new(2, 2)]);
        state.checkpoints.insert(2, vec![Position::new(4, 4)]);
        state.player.finished = true;
        state.player.finish_turn = Some(5);
        state.player.checkpoints_passed = vec![1];
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));

        state.player.checkpoints_passed.push(2);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn validate_rejects_repeated_spectator_strike() {
        let mut state = open_track_state(10, 10);
        state.dead_audience = vec![Position::new(3, 3), Position::new(5, 5)];
        assert!(state.validate().is_ok());
        state.dead_audience.push(Position::new(3, 3));
        assert!(matches!(state.validate(), Err(RuleError::InvalidState(_))));
    }

    #[test]
    fn checkpoint_keys_serialize_as_strings() {
        let mut state = open_track_state(4, 4);
        state.checkpoints.insert(1, vec![Position::new(1, 1)]);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["checkpoints"]["1"][0]["x"], 1);
        let back: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(back.checkpoint_sequence(), vec![1]);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = serde_json::json!({
            "track": [["⬛", "⬛"], ["⬛", "⬛"]],
            "player": {"x": 0, "y": 0},
            "ai": {"x": 1, "y": 1},
            "current_turn": "player",
            "turn_number": 1
        });
        let state: GameState = serde_json::from_value(json).unwrap();
        assert!(state.original_audience.is_empty());
        assert!(state.history.player.is_empty());
        assert_eq!(state.winner, None);
        assert!(state.game_id.is_nil());
    }
}
