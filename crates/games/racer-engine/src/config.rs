use serde::{Deserialize, Serialize};

use racer_core::track::GrassPolicy;

use crate::checkpoints::CheckpointOrder;
use crate::outcome::FinishPolicy;
use crate::planner::PlannerKind;

/// Data-driven rule set for a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Whether grass is runoff (legal, penalised) or a wall.
    pub grass: GrassPolicy,
    /// Checkpoint claiming rule.
    pub checkpoint_order: CheckpointOrder,
    /// When the race ends once cars start crossing the line.
    pub finish_policy: FinishPolicy,
    /// Skips charged per incident (audience strike, runoff, car contact).
    pub penalty_turns_per_incident: u32,
    /// Landing on the opponent's cell counts as an incident.
    pub collision_penalty: bool,
    /// Stop the car dead when it picks up a penalty.
    pub reset_velocity_on_penalty: bool,
    /// Turn number at which an unresolved race is called on progress.
    /// 0 disables the limit.
    pub turn_limit: u32,
    /// AI strategy.
    pub planner: PlannerKind,
    /// Spectators within this distance of a car look scared.
    pub scare_radius: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            grass: GrassPolicy::Runoff,
            checkpoint_order: CheckpointOrder::Strict,
            finish_policy: FinishPolicy::BothFinish,
            penalty_turns_per_incident: 1,
            collision_penalty: true,
            reset_velocity_on_penalty: false,
            turn_limit: 200,
            planner: PlannerKind::Distance,
            scare_radius: 3.0,
        }
    }
}

impl RulesConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("RACER_RULES_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
        {
            match toml::from_str::<Self>(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(%path, "Failed to parse rules config: {e}"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/rules.toml") {
            match toml::from_str::<Self>(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Failed to parse config/rules.toml: {e}"),
            }
        }
        Self::default()
    }

    /// Problems that make the rule set unusable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.penalty_turns_per_incident == 0 {
            problems.push("penalty_turns_per_incident must be > 0".to_string());
        }
        if !self.scare_radius.is_finite() || self.scare_radius < 0.0 {
            problems.push("scare_radius must be a non-negative number".to_string());
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = RulesConfig::default();
        assert_eq!(cfg.grass, GrassPolicy::Runoff);
        assert_eq!(cfg.checkpoint_order, CheckpointOrder::Strict);
        assert_eq!(cfg.finish_policy, FinishPolicy::BothFinish);
        assert_eq!(cfg.penalty_turns_per_incident, 1);
        assert_eq!(cfg.turn_limit, 200);
        assert!(cfg.problems().is_empty());
    }

    #[test]
    fn parse_partial_toml() {
        let cfg: RulesConfig = toml::from_str(
            r#"
grass = "wall"
finish_policy = "matched_turns"
planner = "cautious"
turn_limit = 0
"#,
        )
        .unwrap();
        assert_eq!(cfg.grass, GrassPolicy::Wall);
        assert_eq!(cfg.finish_policy, FinishPolicy::MatchedTurns);
        assert_eq!(cfg.planner, PlannerKind::Cautious);
        assert_eq!(cfg.turn_limit, 0);
        // Untouched fields keep their defaults
        assert_eq!(cfg.checkpoint_order, CheckpointOrder::Strict);
        assert!(cfg.collision_penalty);
    }

    #[test]
    fn rejects_zero_penalty() {
        let cfg = RulesConfig {
            penalty_turns_per_incident: 0,
            ..RulesConfig::default()
        };
        assert_eq!(cfg.problems().len(), 1);
    }

    #[test]
    fn rejects_negative_radius() {
        let cfg = RulesConfig {
            scare_radius: -1.0,
            ..RulesConfig::default()
        };
        assert_eq!(cfg.problems().len(), 1);
    }
}
