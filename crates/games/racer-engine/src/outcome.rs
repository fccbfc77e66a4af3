use serde::{Deserialize, Serialize};

use racer_core::entity::{EntityState, Side};
use racer_core::state::{GameState, Winner};

/// When a race with at least one finisher is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishPolicy {
    /// Race on until both cars are home; earlier finish turn wins.
    #[default]
    BothFinish,
    /// The trailing car gets one reply after the first finish. Finishing in
    /// that reply is a tie.
    MatchedTurns,
    /// First car home wins on the spot.
    FirstFinish,
}

/// Result after `last_mover` completed a ply, or `None` if racing continues.
pub fn evaluate(state: &GameState, last_mover: Side, policy: FinishPolicy) -> Option<Winner> {
    match (state.player.finished, state.ai.finished) {
        (false, false) => None,
        (true, true) => Some(match policy {
            FinishPolicy::MatchedTurns => matched_finish(&state.player, &state.ai),
            FinishPolicy::BothFinish | FinishPolicy::FirstFinish => {
                earlier_finish(&state.player, &state.ai)
            },
        }),
        (player_home, _) => {
            let finisher = if player_home { Side::Player } else { Side::Ai };
            match policy {
                FinishPolicy::BothFinish => None,
                FinishPolicy::FirstFinish => Some(finisher.into()),
                // The finisher's own ply does not close the race; the reply does.
                FinishPolicy::MatchedTurns if last_mover == finisher => None,
                FinishPolicy::MatchedTurns => Some(finisher.into()),
            }
        },
    }
}

/// Result for a race called before it was decided on the line: a finisher
/// beats a non-finisher, then more checkpoints wins.
pub fn by_progress(state: &GameState) -> Winner {
    let (p, a) = (&state.player, &state.ai);
    match (p.finished, a.finished) {
        (true, true) => earlier_finish(p, a),
        (true, false) => Winner::Player,
        (false, true) => Winner::Ai,
        (false, false) => {
            match p.checkpoints_passed.len().cmp(&a.checkpoints_passed.len()) {
                std::cmp::Ordering::Greater => Winner::Player,
                std::cmp::Ordering::Less => Winner::Ai,
                std::cmp::Ordering::Equal => Winner::Tie,
            }
        },
    }
}

fn finish_turn(car: &EntityState) -> u32 {
    car.finish_turn.unwrap_or(u32::MAX)
}

fn earlier_finish(player: &EntityState, ai: &EntityState) -> Winner {
    match finish_turn(player).cmp(&finish_turn(ai)) {
        std::cmp::Ordering::Less => Winner::Player,
        std::cmp::Ordering::Greater => Winner::Ai,
        std::cmp::Ordering::Equal => Winner::Tie,
    }
}

fn matched_finish(player: &EntityState, ai: &EntityState) -> Winner {
    if finish_turn(player).abs_diff(finish_turn(ai)) <= 1 {
        Winner::Tie
    } else {
        earlier_finish(player, ai)
    }
}
