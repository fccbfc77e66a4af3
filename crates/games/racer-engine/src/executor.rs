use racer_core::entity::Side;
use racer_core::error::RuleError;
use racer_core::geometry::{Move, Position, Velocity};
use racer_core::state::{GameState, Winner};
use racer_core::track::{Terrain, TrackMap};

use crate::audience;
use crate::checkpoints;
use crate::config::RulesConfig;
use crate::moves::legal_moves;
use crate::outcome;
use crate::trace::traversed_cells;

/// Why a car picked up a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incident {
    /// Hit a live spectator.
    Audience,
    /// Ended the move on grass.
    Runoff,
    /// Ended the move on the other car.
    Collision,
}

/// Apply `mv` for `mover` and return the successor snapshot.
///
/// `state` is never modified; on error nothing has happened.
pub fn apply_move(
    state: &GameState,
    mover: Side,
    mv: Move,
    config: &RulesConfig,
) -> Result<GameState, RuleError> {
    check_turn(state, mover)?;
    let track = TrackMap::from_state(state, config.grass)?;
    if !legal_moves(&track, state.entity(mover)).contains(&mv) {
        return Err(RuleError::IllegalMove(mv));
    }

    let mut next = state.clone();
    let sequence = next.checkpoint_sequence();
    let from = state.entity(mover).position();
    let to = mv.position();
    let path = traversed_cells(from, to);

    next.history.push(mover, from);
    let car = next.entity_mut(mover);
    car.set_position(to);
    car.set_velocity(mv.velocity());

    let claimed = checkpoints::capture(config.checkpoint_order, car, &sequence, |id| {
        path.iter()
            .any(|p| track.terrain(*p) == Some(Terrain::Checkpoint(id)))
    });
    for id in claimed {
        tracing::info!(game = %state.game_id, side = %mover, checkpoint = id, "Checkpoint claimed");
    }

    if let Some(incident) = incident_at(&track, &next, mover, to, config) {
        if incident == Incident::Audience {
            next.dead_audience.push(to);
        }
        let car = next.entity_mut(mover);
        car.penalty_turns += config.penalty_turns_per_incident;
        if config.reset_velocity_on_penalty {
            car.set_velocity(Velocity::ZERO);
        }
        tracing::info!(
            game = %state.game_id,
            side = %mover,
            ?incident,
            owed = car.penalty_turns,
            "Penalty"
        );
    }

    let car = next.entity_mut(mover);
    if !car.finished
        && car.has_all_checkpoints(&sequence)
        && path
            .iter()
            .any(|p| track.terrain(*p) == Some(Terrain::Finish))
    {
        car.finished = true;
        car.finish_turn = Some(state.turn_number);
        tracing::info!(game = %state.game_id, side = %mover, turn = state.turn_number, "Crossed the finish line");
    }

    Ok(close_ply(next, mover, config))
}

/// Spend one owed penalty turn for `mover`.
pub fn apply_skip(
    state: &GameState,
    mover: Side,
    config: &RulesConfig,
) -> Result<GameState, RuleError> {
    check_turn(state, mover)?;
    state.validate()?;
    if !state.entity(mover).owes_penalty() {
        return Err(RuleError::SkipNotPermitted(mover));
    }

    let mut next = state.clone();
    let car = next.entity_mut(mover);
    car.penalty_turns -= 1;
    tracing::debug!(game = %state.game_id, side = %mover, owed = car.penalty_turns, "Penalty turn served");
    Ok(close_ply(next, mover, config))
}

/// End an undecided race on progress.
pub fn curtail(state: &GameState) -> Result<GameState, RuleError> {
    if state.game_over {
        return Err(RuleError::GameOver);
    }
    let mut next = state.clone();
    let winner = outcome::by_progress(&next);
    tracing::info!(game = %state.game_id, turn = state.turn_number, "Race called early");
    finish_race(&mut next, winner);
    Ok(next)
}

fn check_turn(state: &GameState, mover: Side) -> Result<(), RuleError> {
    if state.game_over {
        return Err(RuleError::GameOver);
    }
    if state.current_turn != mover {
        return Err(RuleError::WrongTurn {
            expected: state.current_turn,
            actual: mover,
        });
    }
    Ok(())
}

/// At most one incident per move; a live spectator takes precedence so the
/// strike is always recorded.
fn incident_at(
    track: &TrackMap,
    state: &GameState,
    mover: Side,
    to: Position,
    config: &RulesConfig,
) -> Option<Incident> {
    match track.terrain(to) {
        Some(Terrain::Audience) if !state.is_dead_audience(to) => return Some(Incident::Audience),
        Some(Terrain::Grass) => return Some(Incident::Runoff),
        _ => {},
    }
    (config.collision_penalty && state.entity(mover.opponent()).position() == to)
        .then_some(Incident::Collision)
}

/// Resolve the race if it is decided, then hand the turn over.
fn close_ply(mut next: GameState, mover: Side, config: &RulesConfig) -> GameState {
    if let Some(winner) = outcome::evaluate(&next, mover, config.finish_policy) {
        finish_race(&mut next, winner);
    } else if config.turn_limit > 0 && next.turn_number >= config.turn_limit {
        tracing::info!(game = %next.game_id, limit = config.turn_limit, "Turn limit reached");
        let winner = outcome::by_progress(&next);
        finish_race(&mut next, winner);
    }

    next.current_turn = mover.opponent();
    next.turn_number += 1;
    audience::react(&mut next, config.scare_radius);
    next
}

fn finish_race(state: &mut GameState, winner: Winner) {
    state.game_over = true;
    state.winner = Some(winner);
    tracing::info!(game = %state.game_id, ?winner, "Game over");
}
