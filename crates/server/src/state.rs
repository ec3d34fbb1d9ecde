//! # Application State
//!
//! The shared state handed to every request handler: the assistant, which is
//! read-only after startup, and the table of live sessions. Each session sits
//! behind its own async mutex, so concurrent requests against one session are
//! applied one after another while different sessions proceed in parallel.
//!
//! Sessions nobody has asked a question in for longer than the idle timeout
//! are ended by [`AppState::expire_idle`], which the server runs on an
//! interval. Expiry emits the same summary as an explicit `DELETE`.

use climate_qa::{config::AppConfig, Assistant, Session, SessionSummary};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use tracing::info;

pub type SessionHandle = Arc<Mutex<Session>>;

/// A live session and the last time a question reached it.
pub struct SessionSlot {
    pub handle: SessionHandle,
    pub last_active: Instant,
}

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<RwLock<HashMap<String, SessionSlot>>>,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the session with the given id, creating it if needed, and
    /// marks it active. Without an id a new session with a random id is
    /// created.
    pub async fn session_or_create(&self, id: Option<String>) -> (String, SessionHandle) {
        let (id, fresh) = match id {
            Some(id) => (id, None),
            None => {
                let session = Session::new();
                (session.id().to_string(), Some(session))
            }
        };

        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(id.clone()).or_insert_with(|| {
            info!(session_id = %id, "Started session");
            let session = fresh.unwrap_or_else(|| Session::with_id(id.as_str()));
            SessionSlot {
                handle: Arc::new(Mutex::new(session)),
                last_active: Instant::now(),
            }
        });
        slot.last_active = Instant::now();
        (id, slot.handle.clone())
    }

    pub async fn find_session(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|slot| slot.handle.clone())
    }

    pub async fn remove_session(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|slot| slot.handle)
    }

    /// Ends every session idle for at least `max_idle` and returns their
    /// summaries. A session with a question in flight is never idle.
    pub async fn expire_idle(&self, max_idle: Duration) -> Vec<SessionSummary> {
        let expired: Vec<(String, SessionHandle)> = {
            let mut sessions = self.sessions.write().await;
            let stale: Vec<String> = sessions
                .iter()
                .filter(|(_, slot)| {
                    slot.last_active.elapsed() >= max_idle && slot.handle.try_lock().is_ok()
                })
                .map(|(id, _)| id.clone())
                .collect();
            stale
                .into_iter()
                .filter_map(|id| sessions.remove(&id).map(|slot| (id, slot.handle)))
                .collect()
        };

        let mut summaries = Vec::with_capacity(expired.len());
        for (id, handle) in expired {
            let session = handle.lock().await;
            summaries.push(self.assistant.finish_session(&session));
            info!(session_id = %id, "Expired idle session");
        }
        summaries
    }
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let assistant = Assistant::from_config(config)?;
    info!(
        provider = %config.generator.provider,
        science_bridge = config.science_bridge,
        "Initialized assistant."
    );
    Ok(AppState::new(assistant))
}
