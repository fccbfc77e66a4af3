pub mod entity;
pub mod error;
pub mod geometry;
pub mod state;
pub mod track;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::BTreeMap;

    use uuid::Uuid;

    use crate::entity::{EntityState, Side};
    use crate::geometry::{Position, Velocity};
    use crate::state::{GameState, History};
    use crate::track::ASPHALT;

    /// A `width` x `height` track paved edge to edge, no checkpoints, no
    /// finish line, no audience. Player at (1, 1), AI at (width-2, height-2).
    pub fn open_track_state(width: usize, height: usize) -> GameState {
        let track = vec![vec![ASPHALT.to_string(); width]; height];
        GameState {
            game_id: Uuid::nil(),
            track,
            original_audience: BTreeMap::new(),
            dead_audience: Vec::new(),
            checkpoints: BTreeMap::new(),
            finish_line: Vec::new(),
            player: EntityState::at(Position::new(1, 1)),
            ai: EntityState::at(Position::new(width as i32 - 2, height as i32 - 2)),
            current_turn: Side::Player,
            turn_number: 1,
            game_over: false,
            winner: None,
            history: History::default(),
        }
    }

    /// Move a car and set its velocity without going through the rules.
    pub fn place(state: &mut GameState, side: Side, pos: Position, velocity: Velocity) {
        let car = state.entity_mut(side);
        car.set_position(pos);
        car.set_velocity(velocity);
    }

    /// Paint `symbol` over a cell.
    pub fn paint(state: &mut GameState, pos: Position, symbol: &str) {
        state.track[pos.y as usize][pos.x as usize] = symbol.to_string();
    }

    /// Put a spectator on a cell (both the display grid and the audience map).
    pub fn seat_spectator(state: &mut GameState, pos: Position, symbol: &str) {
        paint(state, pos, symbol);
        state
            .original_audience
            .insert(pos.key(), symbol.to_string());
    }
}
