//! # Common Test Utilities
//!
//! `TestApp` spawns a real server on a random port, backed by an assistant
//! whose generator and telemetry sink are in-memory mocks, so endpoint tests
//! can assert on both the HTTP responses and what the assistant did.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use climate_qa::Assistant;
use climate_qa_server::{router, state::AppState};
use climate_qa_test_utils::{MemorySink, MockGenerator};
use reqwest::Client;
use std::net::SocketAddr;
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub generator: MockGenerator,
    pub sink: MemorySink,
    pub app_state: AppState,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with a default mock generator.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(MockGenerator::new()).await
    }

    /// Spawns the server around the given generator.
    pub async fn spawn_with(generator: MockGenerator) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let sink = MemorySink::new();
        let assistant = Assistant::builder()
            .generator(Box::new(generator.clone()))
            .telemetry(Box::new(sink.clone()))
            .build()?;
        let app_state = AppState::new(assistant);
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            generator,
            sink,
            app_state: app_state_for_harness,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Posts a question and returns the status with the parsed JSON body.
    pub async fn ask(
        &self,
        session_id: Option<&str>,
        question: &str,
    ) -> Result<(reqwest::StatusCode, serde_json::Value)> {
        let mut payload = serde_json::json!({ "question": question });
        if let Some(id) = session_id {
            payload["session_id"] = serde_json::Value::from(id);
        }
        let response = self
            .client
            .post(format!("{}/ask", self.address))
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.json().await?;
        Ok((status, body))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
