use serde::{Deserialize, Serialize};

use racer_core::entity::{CheckpointId, EntityState};

/// Rule for which checkpoints a car may claim next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointOrder {
    /// Only the next unclaimed checkpoint in sequence.
    #[default]
    Strict,
    /// Any unclaimed checkpoint.
    AnyOrder,
}

/// Checkpoints `car` is currently allowed to claim.
pub fn claimable(
    order: CheckpointOrder,
    car: &EntityState,
    sequence: &[CheckpointId],
) -> Vec<CheckpointId> {
    match order {
        CheckpointOrder::Strict => car.next_checkpoint(sequence).into_iter().collect(),
        CheckpointOrder::AnyOrder => sequence
            .iter()
            .copied()
            .filter(|id| !car.has_passed(*id))
            .collect(),
    }
}

/// Claim every allowed checkpoint the move touched and return the new ones.
///
/// Under strict ordering a single move can claim at most one gate, even if
/// the path also clips a later one.
pub fn capture(
    order: CheckpointOrder,
    car: &mut EntityState,
    sequence: &[CheckpointId],
    touched: impl Fn(CheckpointId) -> bool,
) -> Vec<CheckpointId> {
    let claimed: Vec<CheckpointId> = claimable(order, car, sequence)
        .into_iter()
        .filter(|id| touched(*id))
        .collect();
    car.checkpoints_passed.extend_from_slice(&claimed);
    claimed
}
