use crate::entity::Side;
use crate::geometry::Move;

/// Validation failure for a requested game operation. The snapshot the
/// request carried is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The move is not in the mover's legal set.
    IllegalMove(Move),
    /// The operation targets a car whose turn it is not.
    WrongTurn { expected: Side, actual: Side },
    /// The mover has no legal move and owes no penalty.
    Stalemate(Side),
    /// A skip was requested but no penalty turn is owed.
    SkipNotPermitted(Side),
    /// The race already has a result.
    GameOver,
    /// The snapshot is internally inconsistent.
    InvalidState(String),
}

impl RuleError {
    /// Stable snake_case identifier for API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IllegalMove(_) => "illegal_move",
            Self::WrongTurn { .. } => "wrong_turn",
            Self::Stalemate(_) => "stalemate",
            Self::SkipNotPermitted(_) => "skip_not_permitted",
            Self::GameOver => "game_over",
            Self::InvalidState(_) => "invalid_state",
        }
    }
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalMove(mv) => write!(f, "illegal move: {mv}"),
            Self::WrongTurn { expected, actual } => {
                write!(f, "not {actual}'s turn (waiting on {expected})")
            },
            Self::Stalemate(side) => write!(f, "{side} has no legal move"),
            Self::SkipNotPermitted(side) => write!(f, "{side} owes no penalty turn"),
            Self::GameOver => write!(f, "game is already over"),
            Self::InvalidState(msg) => write!(f, "invalid game state: {msg}"),
        }
    }
}

impl std::error::Error for RuleError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Position, Velocity};

    #[test]
    fn display_messages() {
        let mv = Move::new(Position::new(3, 4), Velocity::new(1, 0));
        assert_eq!(
            RuleError::IllegalMove(mv).to_string(),
            "illegal move: (3, 4) @ (1, 0)"
        );
        assert_eq!(
            RuleError::WrongTurn {
                expected: Side::Player,
                actual: Side::Ai
            }
            .to_string(),
            "not ai's turn (waiting on player)"
        );
        assert_eq!(
            RuleError::SkipNotPermitted(Side::Player).to_string(),
            "player owes no penalty turn"
        );
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            RuleError::IllegalMove(Move::new(Position::new(0, 0), Velocity::ZERO)).kind(),
            RuleError::WrongTurn {
                expected: Side::Ai,
                actual: Side::Player,
            }
            .kind(),
            RuleError::Stalemate(Side::Ai).kind(),
            RuleError::SkipNotPermitted(Side::Ai).kind(),
            RuleError::GameOver.kind(),
            RuleError::InvalidState(String::new()).kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
