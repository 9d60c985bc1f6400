//! Test helpers for integration tests
//!
//! Spawns both servers on ephemeral ports and wraps the HTTP and WebSocket
//! clients used by the tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chat_common::{AppConfig, JwtService};
use chat_core::UserId;
use chat_db::PgPool;
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream};

/// REST API and gateway running in this process
pub struct TestServer {
    pub api_addr: SocketAddr,
    pub gateway_addr: SocketAddr,
    pub client: Client,
    pub pool: PgPool,
    jwt: Arc<JwtService>,
    _api: JoinHandle<()>,
    _gateway: JoinHandle<()>,
}

impl TestServer {
    /// Start both servers from the environment configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start both servers with a custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let api_state = chat_api::create_app_state(config.clone()).await?;
        let gateway_state = chat_gateway::create_gateway_state(&config).await?;
        let pool = api_state
            .service_context()
            .pool()
            .cloned()
            .context("API state has no database pool")?;

        let api_listener = TcpListener::bind("127.0.0.1:0").await?;
        let api_addr = api_listener.local_addr()?;
        let api_app = chat_api::create_app(api_state);
        let api = tokio::spawn(async move {
            axum::serve(api_listener, api_app).await.ok();
        });

        let gateway_listener = TcpListener::bind("127.0.0.1:0").await?;
        let gateway_addr = gateway_listener.local_addr()?;
        let gateway_app = chat_gateway::create_app(gateway_state);
        let gateway = tokio::spawn(async move {
            axum::serve(gateway_listener, gateway_app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        let jwt = Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry,
        ));

        Ok(Self {
            api_addr,
            gateway_addr,
            client,
            pool,
            jwt,
            _api: api,
            _gateway: gateway,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.api_addr)
    }

    /// Access token for a user, signed with the configured secret
    pub fn token_for(&self, user_id: i64) -> Result<String> {
        Ok(self.jwt.issue_access_token(UserId::new(user_id))?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    pub async fn get_auth(&self, path: &str, user_id: i64) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .bearer_auth(self.token_for(user_id)?)
            .send()
            .await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        user_id: i64,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(self.token_for(user_id)?)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_auth(&self, path: &str, user_id: i64) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .put(&url)
            .bearer_auth(self.token_for(user_id)?)
            .send()
            .await?)
    }

    pub async fn delete_auth(&self, path: &str, user_id: i64) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .delete(&url)
            .bearer_auth(self.token_for(user_id)?)
            .send()
            .await?)
    }

    /// Open an authenticated socket and consume the `ready` event
    pub async fn connect_socket(&self, user_id: i64) -> Result<TestSocket> {
        let url = format!(
            "ws://{}/chat?token={}",
            self.gateway_addr,
            self.token_for(user_id)?
        );
        let (stream, _) = tokio_tungstenite::connect_async(url).await?;
        let mut socket = TestSocket { stream };

        let ready = socket.next_event().await?;
        if ready["event"] != "ready" {
            bail!("expected ready, got {ready}");
        }
        Ok(socket)
    }

    /// Attempt a handshake without a token and return the HTTP status
    pub async fn reject_status(&self, query: &str) -> Result<u16> {
        let url = format!("ws://{}/chat{}", self.gateway_addr, query);
        match tokio_tungstenite::connect_async(url).await {
            Ok(_) => bail!("handshake unexpectedly accepted"),
            Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
                Ok(response.status().as_u16())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Client side of a gateway connection
pub struct TestSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestSocket {
    /// Send a client event
    pub async fn emit(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = serde_json::json!({ "event": event, "data": data });
        self.stream.send(WsMessage::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Next JSON event, skipping control frames
    pub async fn next_event(&mut self) -> Result<Value> {
        let deadline = Duration::from_secs(5);
        loop {
            let frame = tokio::time::timeout(deadline, self.stream.next())
                .await
                .context("timed out waiting for an event")?
                .context("socket closed")??;
            match frame {
                WsMessage::Text(text) => return Ok(serde_json::from_str(&text)?),
                WsMessage::Close(frame) => bail!("socket closed: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Next event with the given name, skipping others
    pub async fn expect_event(&mut self, name: &str) -> Result<Value> {
        loop {
            let event = self.next_event().await?;
            if event["event"] == name {
                return Ok(event["data"].clone());
            }
        }
    }

    /// True when nothing arrives within `wait`
    pub async fn is_quiet(&mut self, wait: Duration) -> bool {
        loop {
            match tokio::time::timeout(wait, self.stream.next()).await {
                Err(_) => return true,
                Ok(Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_)))) => {}
                Ok(_) => return false,
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Load the configuration from the environment
///
/// Ports are ignored; the servers bind ephemeral ports.
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    Ok(config)
}

/// Whether PostgreSQL and Redis are configured
pub fn check_test_env() -> bool {
    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
