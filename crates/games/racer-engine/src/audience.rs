use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use racer_core::geometry::Position;
use racer_core::state::GameState;
use racer_core::track::SKULL;

use crate::layout::SCARED_SYMBOLS;

/// Redraw every spectator on the display grid.
///
/// Struck spectators show a skull. Live ones within `radius` of either car
/// show a scared face, everyone else their original face. The scared faces
/// come from an RNG seeded by the game id and turn number, so the same
/// snapshot always renders the same way.
pub fn react(state: &mut GameState, radius: f64) {
    let cars = [state.player.position(), state.ai.position()];
    let mut rng = StdRng::seed_from_u64(seed(state));

    let mut updates: Vec<(Position, String)> = Vec::with_capacity(state.original_audience.len());
    for (key, original) in &state.original_audience {
        let Some(pos) = Position::from_key(key) else {
            tracing::warn!(%key, "Skipping malformed audience key");
            continue;
        };
        if !state.in_bounds(pos) {
            continue;
        }
        let symbol = if state.is_dead_audience(pos) {
            SKULL.to_string()
        } else if cars
            .iter()
            .any(|car| car.distance_to(f64::from(pos.x), f64::from(pos.y)) <= radius)
        {
            SCARED_SYMBOLS[rng.random_range(0..SCARED_SYMBOLS.len())].to_string()
        } else {
            original.clone()
        };
        updates.push((pos, symbol));
    }

    for (pos, symbol) in updates {
        state.track[pos.y as usize][pos.x as usize] = symbol;
    }
}

fn seed(state: &GameState) -> u64 {
    (state.game_id.as_u128() as u64) ^ u64::from(state.turn_number).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
