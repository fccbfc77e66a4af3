use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;

use racer_engine::config::RulesConfig;
use racer_server::build_app;
use racer_server::config::ServerConfig;

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with stock rules.
    pub async fn new() -> Self {
        Self::with_rules(RulesConfig::default()).await
    }

    /// Start a test server racing under `rules`.
    pub async fn with_rules(rules: RulesConfig) -> Self {
        let config = ServerConfig {
            rules: Some(rules),
            ..ServerConfig::default()
        };
        Self::from_config(config).await
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            client: reqwest::Client::new(),
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// POST a JSON body, returning status and parsed response.
    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url()))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url()))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    /// Start a race and return the snapshot.
    pub async fn new_game(&self) -> Value {
        let (status, state) = self.post("/api/game/new", &Value::Null).await;
        assert_eq!(status, 200);
        state
    }

    pub async fn moves(&self, state: &Value) -> Value {
        let (status, options) = self.post("/api/game/moves", state).await;
        assert_eq!(status, 200, "moves failed: {options}");
        options
    }
}
