use serde::{Deserialize, Serialize};

use racer_core::entity::Side;
use racer_core::geometry::{Move, Position};
use racer_core::state::GameState;
use racer_core::track::GRASS;

/// Distance to the target under which the cautious planner starts braking.
const BRAKING_DISTANCE: f64 = 5.0;

/// Strategy for the computer-controlled car.
pub trait Planner: Send + Sync {
    /// Pick one of `moves` for the car whose turn it is. `None` only when
    /// `moves` is empty.
    fn choose_move(&self, state: &GameState, moves: &[Move]) -> Option<Move>;
}

/// Which [`Planner`] a race uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerKind {
    #[default]
    Distance,
    Cautious,
}

pub fn build(kind: PlannerKind) -> Box<dyn Planner> {
    match kind {
        PlannerKind::Distance => Box::new(DistancePlanner),
        PlannerKind::Cautious => Box::new(CautiousPlanner),
    }
}

/// Point the car at `side` is heading for: the centroid of its next
/// unclaimed checkpoint, or of the finish line once every checkpoint is held.
pub fn target(state: &GameState, side: Side) -> Option<(f64, f64)> {
    let car = state.entity(side);
    let cells = match car.next_checkpoint(&state.checkpoint_sequence()) {
        Some(id) => state.checkpoints.get(&id).map_or(&[][..], Vec::as_slice),
        None => state.finish_line.as_slice(),
    };
    centroid(cells)
}

fn centroid(cells: &[Position]) -> Option<(f64, f64)> {
    if cells.is_empty() {
        return None;
    }
    let n = cells.len() as f64;
    let sx: f64 = cells.iter().map(|c| f64::from(c.x)).sum();
    let sy: f64 = cells.iter().map(|c| f64::from(c.y)).sum();
    Some((sx / n, sy / n))
}

/// Greedy: land as close to the target as possible, faster on ties.
#[derive(Debug, Default)]
pub struct DistancePlanner;

impl Planner for DistancePlanner {
    fn choose_move(&self, state: &GameState, moves: &[Move]) -> Option<Move> {
        let goal = target(state, state.current_turn);
        let dist = |mv: &Move| goal.map_or(0.0, |(tx, ty)| mv.position().distance_to(tx, ty));

        let mut best: Option<&Move> = None;
        for mv in moves {
            // Strict comparisons keep the earliest candidate on exact ties.
            let better = match best {
                None => true,
                Some(b) => {
                    let (d, bd) = (dist(mv), dist(b));
                    d < bd || (d == bd && mv.velocity().speed() > b.velocity().speed())
                },
            };
            if better {
                best = Some(mv);
            }
        }

        if let Some(mv) = best {
            tracing::debug!(side = %state.current_turn, choice = %mv, ?goal, "Planner picked move");
        }
        best.copied()
    }
}

/// Scores progress toward the target and steers clear of hazards, easing off
/// near the target.
#[derive(Debug, Default)]
pub struct CautiousPlanner;

impl CautiousPlanner {
    fn score(state: &GameState, side: Side, goal: Option<(f64, f64)>, mv: &Move) -> f64 {
        let here = state.entity(side).position();
        let there = mv.position();
        let mut score = 0.0;

        if let Some((tx, ty)) = goal {
            let after = there.distance_to(tx, ty);
            score += (here.distance_to(tx, ty) - after) * 10.0;
            if after < BRAKING_DISTANCE {
                score -= mv.velocity().speed() * 2.0;
            }
        }
        if lands_in_trouble(state, there) {
            score -= 100.0;
        }
        if state.entity(side.opponent()).position() == there {
            score -= 50.0;
        }
        score
    }
}

impl Planner for CautiousPlanner {
    fn choose_move(&self, state: &GameState, moves: &[Move]) -> Option<Move> {
        let side = state.current_turn;
        let goal = target(state, side);

        let mut best: Option<(f64, &Move)> = None;
        for mv in moves {
            let score = Self::score(state, side, goal, mv);
            if best.is_none_or(|(b, _)| score > b) {
                best = Some((score, mv));
            }
        }

        best.map(|(score, mv)| {
            tracing::debug!(side = %side, choice = %mv, score, "Planner picked move");
            *mv
        })
    }
}

fn lands_in_trouble(state: &GameState, pos: Position) -> bool {
    if state.audience_at(pos).is_some() {
        return !state.is_dead_audience(pos);
    }
    state
        .track
        .get(pos.y as usize)
        .and_then(|row| row.get(pos.x as usize))
        .is_some_and(|symbol| symbol == GRASS)
}
