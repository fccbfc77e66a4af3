use std::sync::Arc;

use racer_engine::UltimateRacer;

use crate::config::ServerConfig;

/// Shared, read-only application state. Games live in the client's
/// snapshots, so nothing here needs a lock.
#[derive(Clone)]
pub struct AppState {
    pub racer: Arc<UltimateRacer>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let rules = config.rules();
        tracing::info!(
            planner = ?rules.planner,
            grass = ?rules.grass,
            finish = ?rules.finish_policy,
            turn_limit = rules.turn_limit,
            "Race rules loaded"
        );
        Self {
            racer: Arc::new(UltimateRacer::with_config(rules)),
            config: Arc::new(config),
        }
    }
}
