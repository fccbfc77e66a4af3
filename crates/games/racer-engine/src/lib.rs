pub mod audience;
pub mod checkpoints;
pub mod config;
pub mod executor;
pub mod layout;
pub mod moves;
pub mod outcome;
pub mod planner;
pub mod trace;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use racer_core::entity::{CheckpointId, EntityState, Side};
use racer_core::error::RuleError;
use racer_core::geometry::{Move, Position};
use racer_core::state::{GameState, History};
use racer_core::track::TrackMap;

use config::RulesConfig;
use moves::MoveOptions;
use planner::Planner;

/// Stock layout as served to clients that draw the track before a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub track: Vec<Vec<String>>,
    pub checkpoints: BTreeMap<CheckpointId, Vec<Position>>,
    pub finish_line: Vec<Position>,
}

/// Turn-based vector race between a human and the computer.
///
/// Holds only the rule set and the AI strategy. Every operation takes the
/// caller's snapshot and returns a new one, so one instance serves any
/// number of concurrent games.
pub struct UltimateRacer {
    config: RulesConfig,
    planner: Box<dyn Planner>,
}

impl UltimateRacer {
    pub fn new() -> Self {
        Self::with_config(RulesConfig::load())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        let planner = planner::build(config.planner);
        Self::with_planner(config, planner)
    }

    /// Use a custom AI strategy instead of the one named in `config`.
    pub fn with_planner(config: RulesConfig, planner: Box<dyn Planner>) -> Self {
        Self { config, planner }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Fresh race on the stock circuit, player to move.
    pub fn new_game(&self) -> GameState {
        let track = layout::stock_grid();
        let state = GameState {
            game_id: Uuid::new_v4(),
            original_audience: layout::scan_audience(&track),
            track,
            dead_audience: Vec::new(),
            checkpoints: layout::stock_checkpoints(),
            finish_line: layout::stock_finish_line(),
            player: EntityState::at(layout::PLAYER_START),
            ai: EntityState::at(layout::AI_START),
            current_turn: Side::Player,
            turn_number: 1,
            game_over: false,
            winner: None,
            history: History::default(),
        };
        tracing::info!(game = %state.game_id, spectators = state.original_audience.len(), "New game");
        state
    }

    /// Options for whoever is to move. Never changes anything.
    pub fn get_moves(&self, state: &GameState) -> Result<MoveOptions, RuleError> {
        let state = prepare(state);
        if state.game_over {
            return Ok(MoveOptions::default());
        }
        self.options_for(&state, state.current_turn)
    }

    /// The human's move.
    pub fn make_move(&self, state: &GameState, mv: Move) -> Result<GameState, RuleError> {
        let state = prepare(state);
        expect_turn(&state, Side::Player)?;
        if self.options_for(&state, Side::Player)?.stalemate {
            return Err(RuleError::Stalemate(Side::Player));
        }
        executor::apply_move(&state, Side::Player, mv, &self.config)
    }

    /// Let the computer take its turn. A pending penalty is served instead
    /// of moving.
    pub fn ai_move(&self, state: &GameState) -> Result<GameState, RuleError> {
        let state = prepare(state);
        expect_turn(&state, Side::Ai)?;
        if state.ai.owes_penalty() {
            return executor::apply_skip(&state, Side::Ai, &self.config);
        }

        let track = TrackMap::from_state(&state, self.config.grass)?;
        let options = moves::legal_moves(&track, &state.ai);
        let candidates = moves::without_dead_ends(&track, &options.moves);
        let mv = self
            .planner
            .choose_move(&state, &candidates)
            .ok_or(RuleError::Stalemate(Side::Ai))?;
        executor::apply_move(&state, Side::Ai, mv, &self.config)
    }

    /// Serve one penalty turn for whoever is to move.
    pub fn skip_turn(&self, state: &GameState) -> Result<GameState, RuleError> {
        let state = prepare(state);
        if state.game_over {
            return Err(RuleError::GameOver);
        }
        executor::apply_skip(&state, state.current_turn, &self.config)
    }

    /// Stop the race now and decide it on progress.
    pub fn curtail(&self, state: &GameState) -> Result<GameState, RuleError> {
        let state = prepare(state);
        state.validate()?;
        executor::curtail(&state)
    }

    pub fn track_info(&self) -> TrackInfo {
        TrackInfo {
            track: layout::stock_grid(),
            checkpoints: layout::stock_checkpoints(),
            finish_line: layout::stock_finish_line(),
        }
    }

    fn options_for(&self, state: &GameState, side: Side) -> Result<MoveOptions, RuleError> {
        let track = TrackMap::from_state(state, self.config.grass)?;
        Ok(moves::legal_moves(&track, state.entity(side)))
    }
}

impl Default for UltimateRacer {
    fn default() -> Self {
        Self::with_config(RulesConfig::default())
    }
}

/// Copy of the snapshot with the stock checkpoint layout filled in when the
/// client sent none.
fn prepare(state: &GameState) -> GameState {
    let mut state = state.clone();
    layout::backfill(&mut state);
    state
}

fn expect_turn(state: &GameState, side: Side) -> Result<(), RuleError> {
    if state.game_over {
        return Err(RuleError::GameOver);
    }
    if state.current_turn != side {
        return Err(RuleError::WrongTurn {
            expected: state.current_turn,
            actual: side,
        });
    }
    Ok(())
}
