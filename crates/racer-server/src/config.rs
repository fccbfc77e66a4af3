use serde::Deserialize;

use racer_engine::config::RulesConfig;

/// Top-level server configuration, loaded from `racer.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub cors: CorsConfig,
    pub limits: LimitsConfig,
    /// Race rules. When absent the engine's own config file is used.
    pub rules: Option<RulesConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            cors: CorsConfig::default(),
            limits: LimitsConfig::default(),
            rules: None,
        }
    }
}

/// Cross-origin settings for the browser client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Request handling limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub request_timeout_secs: u64,
    /// Largest accepted request body. A stock snapshot is a few KiB.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_body_bytes: 256 * 1024,
        }
    }
}

impl ServerConfig {
    /// Rule set to race with: the `[rules]` table if present, otherwise
    /// whatever the engine loads on its own.
    pub fn rules(&self) -> RulesConfig {
        self.rules.clone().unwrap_or_else(RulesConfig::load)
    }

    /// Everything wrong with this configuration.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            ));
        }
        for origin in &self.cors.allowed_origins {
            if origin.parse::<axum::http::HeaderValue>().is_err() {
                problems.push(format!("cors origin {origin:?} is not a valid header value"));
            }
        }
        if self.limits.request_timeout_secs == 0 {
            problems.push("limits.request_timeout_secs must be > 0".to_string());
        }
        if self.limits.max_body_bytes == 0 {
            problems.push("limits.max_body_bytes must be > 0".to_string());
        }
        if let Some(rules) = &self.rules {
            problems.extend(rules.problems().into_iter().map(|p| format!("rules.{p}")));
        }
        problems
    }

    /// Log every problem and exit if there are any.
    pub fn validate(&self) {
        let problems = self.problems();
        for problem in &problems {
            tracing::error!("{problem}");
        }
        if !problems.is_empty() {
            std::process::exit(1);
        }
    }

    /// Load config from `racer.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("racer.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from racer.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse racer.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No racer.toml found, using defaults");
                ServerConfig::default()
            },
        };

        if let Ok(addr) = std::env::var("RACER_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(origins) = std::env::var("RACER_CORS_ORIGIN")
            && !origins.is_empty()
        {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(val) = std::env::var("RACER_REQUEST_TIMEOUT_SECS")
            && let Ok(n) = val.parse::<u64>()
        {
            config.limits.request_timeout_secs = n;
        }

        config
    }
}
