use std::collections::BTreeMap;

use racer_core::entity::CheckpointId;
use racer_core::geometry::Position;
use racer_core::state::GameState;

/// Stock 24x24 circuit. Runs counter-clockwise: down the left straight,
/// across the bottom, up the right side and back to the finish at column 9.
///
/// `🟩` grass, `⬛` asphalt, `🏁` finish, faces are spectators.
const TRACK_LAYOUT: [&str; 24] = [
    "🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩🟩🟩🟩😃😃🟩🟩🟩🟩🟩🟩🟩🟩😃🤓🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩🟩🟩🟩😃😐🟩🟩🟩🟩🟩🟩🟩🟩😃😃🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩🟩⬛⬛⬛⬛⬛🏁⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛⬛🏁⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛⬛🏁⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛⬛🏁⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩🟩⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛🟩🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛🟩⬛⬛⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩🟩⬛⬛⬛⬛⬛⬛⬛⬛⬛🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩",
    "🟩🟩🟩🟩😪😛🤔🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩😃😃😆🟩🟩🟩🟩",
    "🟩🟩🟩🟩🫨🫢😯🤔😯😃😃😃😃😃😃😃😃😪😆😎🟩🟩🟩🟩",
    "🟩🟩🟩🟩😆😳😯😯😛🤓🤓🤨🤨🤨😃😐😐🫨😆🥸🟩🟩🟩🟩",
    "🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩🟩",
];

/// Symbols that count as spectators when scanning a layout.
pub const AUDIENCE_SYMBOLS: [&str; 14] = [
    "😃", "😐", "🤓", "😪", "😛", "🤔", "🫨", "🫢", "😯", "😆", "😳", "🤨", "😎", "🥸",
];

/// Reactions shown by spectators when a car comes close.
pub const SCARED_SYMBOLS: [&str; 5] = ["😨", "🫨", "😱", "😵", "😵\u{200d}💫"];

pub const PLAYER_START: Position = Position::new(8, 7);
pub const AI_START: Position = Position::new(7, 5);

/// Checkpoint gates as `(id, cells)`. Claimed 1 → 2 → 3 before the finish.
const CHECKPOINTS: [(CheckpointId, [Position; 4]); 3] = [
    // Left straight, row 9.
    (
        1,
        [
            Position::new(3, 9),
            Position::new(4, 9),
            Position::new(5, 9),
            Position::new(6, 9),
        ],
    ),
    // Bottom curve, column 8.
    (
        2,
        [
            Position::new(8, 16),
            Position::new(8, 17),
            Position::new(8, 18),
            Position::new(8, 19),
        ],
    ),
    // Right side, row 9.
    (
        3,
        [
            Position::new(17, 9),
            Position::new(18, 9),
            Position::new(19, 9),
            Position::new(20, 9),
        ],
    ),
];

const FINISH_LINE: [Position; 4] = [
    Position::new(9, 4),
    Position::new(9, 5),
    Position::new(9, 6),
    Position::new(9, 7),
];

/// Split a layout row into one symbol per cell.
///
/// Spectator faces are single code points, so a plain char split is enough
/// for the stock layout.
fn split_row(row: &str) -> Vec<String> {
    row.chars().map(String::from).collect()
}

pub fn stock_grid() -> Vec<Vec<String>> {
    TRACK_LAYOUT.iter().map(|row| split_row(row)).collect()
}

pub fn stock_checkpoints() -> BTreeMap<CheckpointId, Vec<Position>> {
    CHECKPOINTS
        .iter()
        .map(|(id, cells)| (*id, cells.to_vec()))
        .collect()
}

pub fn stock_finish_line() -> Vec<Position> {
    FINISH_LINE.to_vec()
}

/// Find every spectator on a grid, keyed `"x,y"`.
pub fn scan_audience(grid: &[Vec<String>]) -> BTreeMap<String, String> {
    let mut audience = BTreeMap::new();
    for (y, row) in grid.iter().enumerate() {
        for (x, symbol) in row.iter().enumerate() {
            if AUDIENCE_SYMBOLS.contains(&symbol.as_str()) {
                audience.insert(Position::new(x as i32, y as i32).key(), symbol.clone());
            }
        }
    }
    audience
}

/// Fill in checkpoint and finish cells for snapshots that predate them.
///
/// Only applies when both are missing; a track with a finish line and no
/// checkpoints is a valid sprint layout.
pub fn backfill(state: &mut GameState) {
    if state.checkpoints.is_empty() && state.finish_line.is_empty() {
        tracing::debug!("snapshot has no checkpoint layout, assuming stock circuit");
        state.checkpoints = stock_checkpoints();
        state.finish_line = stock_finish_line();
    }
}
