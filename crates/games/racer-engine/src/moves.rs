use serde::{Deserialize, Serialize};

use racer_core::entity::EntityState;
use racer_core::geometry::{Move, Velocity};
use racer_core::track::TrackMap;

/// Acceleration choices per turn, in scan order (x-major).
pub const ACCELERATIONS: [(i32, i32); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Answer to "what can this car do now".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOptions {
    pub moves: Vec<Move>,
    /// The car owes a skip and must not move this turn.
    pub penalty: bool,
    /// The car owes nothing but every candidate is blocked.
    #[serde(default)]
    pub stalemate: bool,
}

impl MoveOptions {
    pub fn contains(&self, mv: &Move) -> bool {
        self.moves.contains(mv)
    }
}

/// All nine velocity-lattice candidates for `car`, before any terrain check.
pub fn candidates(car: &EntityState) -> impl Iterator<Item = Move> + '_ {
    let v = car.velocity();
    ACCELERATIONS.iter().map(move |&(ax, ay)| {
        let next = Velocity::new(v.vx + ax, v.vy + ay);
        Move::new(car.position().offset(next), next)
    })
}

/// Legal moves for `car` on `track`.
///
/// Candidates off the grid or on a wall are dropped. Checkpoint order and
/// finish eligibility are settled when the move is applied, not here.
pub fn legal_moves(track: &TrackMap, car: &EntityState) -> MoveOptions {
    if car.owes_penalty() {
        return MoveOptions {
            moves: Vec::new(),
            penalty: true,
            stalemate: false,
        };
    }

    let moves: Vec<Move> = candidates(car)
        .filter(|mv| track.is_drivable(mv.position()))
        .collect();
    tracing::debug!(
        x = car.x,
        y = car.y,
        vx = car.vx,
        vy = car.vy,
        count = moves.len(),
        "Generated legal moves"
    );

    let stalemate = moves.is_empty();
    MoveOptions {
        moves,
        penalty: false,
        stalemate,
    }
}

/// Whether a car landing with `mv` can still brake to a standstill without
/// leaving drivable ground, easing off one unit per axis each turn.
pub fn can_stop(track: &TrackMap, mv: &Move) -> bool {
    let mut pos = mv.position();
    let mut v = mv.velocity();
    while v != Velocity::ZERO {
        v = Velocity::new(v.vx - v.vx.signum(), v.vy - v.vy.signum());
        pos = pos.offset(v);
        if !track.is_drivable(pos) {
            return false;
        }
    }
    true
}

/// `moves` minus those that commit the car to running off the grid or into
/// a wall. Falls back to all of `moves` when none can stop in time.
pub fn without_dead_ends(track: &TrackMap, moves: &[Move]) -> Vec<Move> {
    let safe: Vec<Move> = moves
        .iter()
        .filter(|mv| can_stop(track, mv))
        .copied()
        .collect();
    if safe.is_empty() { moves.to_vec() } else { safe }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racer_core::entity::Side;
    use racer_core::geometry::Position;
    use racer_core::test_helpers::{open_track_state, paint, place};
    use racer_core::track::{GRASS, GrassPolicy, WALL};

    fn map(state: &racer_core::state::GameState) -> TrackMap {
        TrackMap::from_state(state, GrassPolicy::Runoff).unwrap()
    }

    #[test]
    fn stationary_car_on_open_track_has_nine_moves() {
        let mut state = open_track_state(12, 12);
        place(&mut state, Side::Player, Position::new(5, 5), Velocity::ZERO);
        let options = legal_moves(&map(&state), &state.player);

        assert!(!options.penalty);
        assert!(!options.stalemate);
        assert_eq!(options.moves.len(), 9);
        for (dx, dy) in ACCELERATIONS {
            let expected = Move::new(Position::new(5 + dx, 5 + dy), Velocity::new(dx, dy));
            assert!(options.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn moves_follow_scan_order() {
        let mut state = open_track_state(12, 12);
        place(&mut state, Side::Player, Position::new(5, 5), Velocity::ZERO);
        let options = legal_moves(&map(&state), &state.player);
        assert_eq!(options.moves[0], Move::new(Position::new(4, 4), Velocity::new(-1, -1)));
        assert_eq!(options.moves[8], Move::new(Position::new(6, 6), Velocity::new(1, 1)));
    }

    #[test]
    fn velocity_carries_over() {
        let mut state = open_track_state(20, 20);
        place(&mut state, Side::Player, Position::new(5, 5), Velocity::new(3, -1));
        let options = legal_moves(&map(&state), &state.player);
        // Straight-on candidate keeps the velocity.
        assert!(options.contains(&Move::new(Position::new(8, 4), Velocity::new(3, -1))));
        assert!(options.contains(&Move::new(Position::new(9, 3), Velocity::new(4, -2))));
    }

    #[test]
    fn off_grid_candidates_dropped() {
        let mut state = open_track_state(12, 12);
        place(&mut state, Side::Player, Position::new(0, 0), Velocity::ZERO);
        let options = legal_moves(&map(&state), &state.player);
        assert_eq!(options.moves.len(), 4);
        assert!(options.moves.iter().all(|m| m.x >= 0 && m.y >= 0));
    }

    #[test]
    fn walls_are_dropped_grass_is_kept() {
        let mut state = open_track_state(12, 12);
        place(&mut state, Side::Player, Position::new(5, 5), Velocity::ZERO);
        paint(&mut state, Position::new(6, 5), WALL);
        paint(&mut state, Position::new(4, 5), GRASS);
        let options = legal_moves(&map(&state), &state.player);
        assert_eq!(options.moves.len(), 8);
        assert!(!options.moves.iter().any(|m| m.position() == Position::new(6, 5)));
        assert!(options.moves.iter().any(|m| m.position() == Position::new(4, 5)));

        let strict = TrackMap::from_state(&state, GrassPolicy::Wall).unwrap();
        assert_eq!(legal_moves(&strict, &state.player).moves.len(), 7);
    }

    #[test]
    fn penalty_blocks_all_moves() {
        let mut state = open_track_state(12, 12);
        state.player.penalty_turns = 2;
        let options = legal_moves(&map(&state), &state.player);
        assert!(options.penalty);
        assert!(!options.stalemate);
        assert!(options.moves.is_empty());
    }

    #[test]
    fn boxed_in_car_is_stalemated() {
        let mut state = open_track_state(12, 12);
        place(&mut state, Side::Player, Position::new(5, 5), Velocity::ZERO);
        for (dx, dy) in ACCELERATIONS {
            paint(&mut state, Position::new(5 + dx, 5 + dy), WALL);
        }
        let options = legal_moves(&map(&state), &state.player);
        assert!(options.moves.is_empty());
        assert!(!options.penalty);
        assert!(options.stalemate);
    }

    #[test]
    fn fast_car_heading_off_grid_is_stalemated() {
        let mut state = open_track_state(12, 12);
        place(&mut state, Side::Player, Position::new(10, 5), Velocity::new(5, 0));
        let options = legal_moves(&map(&state), &state.player);
        assert!(options.stalemate);
    }

    #[test]
    fn braking_past_the_edge_is_a_dead_end() {
        let state = open_track_state(10, 10);
        let track = map(&state);
        // Row 7 at speed 2 brakes to a stop on row 8.
        let ok = Move::new(Position::new(4, 7), Velocity::new(0, 2));
        assert!(can_stop(&track, &ok));
        // At speed 3 braking runs past row 9.
        let doomed = Move::new(Position::new(4, 7), Velocity::new(0, 3));
        assert!(!can_stop(&track, &doomed));
        assert!(can_stop(&track, &Move::new(Position::new(0, 0), Velocity::ZERO)));
    }

    #[test]
    fn walls_count_against_braking() {
        let mut state = open_track_state(10, 10);
        paint(&mut state, Position::new(6, 4), WALL);
        let track = map(&state);
        let mv = Move::new(Position::new(5, 4), Velocity::new(2, 0));
        assert!(!can_stop(&track, &mv));
    }

    #[test]
    fn dead_end_filter_keeps_safe_moves_or_everything() {
        let state = open_track_state(10, 10);
        let track = map(&state);
        let safe = Move::new(Position::new(4, 7), Velocity::new(0, 2));
        let doomed = Move::new(Position::new(4, 7), Velocity::new(0, 3));
        assert_eq!(without_dead_ends(&track, &[doomed, safe]), vec![safe]);
        assert_eq!(without_dead_ends(&track, &[doomed]), vec![doomed]);
    }

    #[test]
    fn options_serialize_for_client() {
        let options = MoveOptions {
            moves: vec![Move::new(Position::new(1, 2), Velocity::new(0, 1))],
            penalty: false,
            stalemate: false,
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["moves"][0]["y"], 2);
        assert_eq!(json["penalty"], false);
        assert_eq!(json["stalemate"], false);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_move_is_one_step_from_current_velocity(
                x in 0i32..16,
                y in 0i32..16,
                vx in -4i32..=4,
                vy in -4i32..=4,
            ) {
                let mut state = open_track_state(16, 16);
                place(&mut state, Side::Player, Position::new(x, y), Velocity::new(vx, vy));
                let track = map(&state);
                let options = legal_moves(&track, &state.player);
                for mv in &options.moves {
                    prop_assert!(mv.velocity().within_one_step_of(Velocity::new(vx, vy)));
                    prop_assert_eq!(mv.position(), Position::new(x, y).offset(mv.velocity()));
                    prop_assert!(track.is_drivable(mv.position()));
                }
                prop_assert_eq!(options.stalemate, options.moves.is_empty());
            }

            #[test]
            fn query_is_idempotent(
                x in 0i32..16,
                y in 0i32..16,
                vx in -3i32..=3,
                vy in -3i32..=3,
            ) {
                let mut state = open_track_state(16, 16);
                place(&mut state, Side::Player, Position::new(x, y), Velocity::new(vx, vy));
                let track = map(&state);
                prop_assert_eq!(
                    legal_moves(&track, &state.player),
                    legal_moves(&track, &state.player)
                );
            }
        }
    }
}
