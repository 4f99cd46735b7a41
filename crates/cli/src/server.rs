//! HTTP listener for the Slack Events API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tally_chat::ChatClient;
use tally_core::RawMessage;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::events::handle_message;
use crate::mention::handle_mention;

/// Shared state for the handlers.
pub struct AppState<C: ChatClient> {
    pub client: Arc<C>,
}

/// Outer Events API payload.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackPayload {
    UrlVerification { challenge: String },
    EventCallback { event: SlackEvent },
    #[serde(other)]
    Other,
}

/// The inner event of an `event_callback`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackEvent {
    Message(MessageEvent),
    AppMention(MessageEvent),
    #[serde(other)]
    Other,
}

/// Fields shared by `message` and `app_mention` events.
#[derive(Debug, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl From<MessageEvent> for RawMessage {
    fn from(event: MessageEvent) -> Self {
        RawMessage {
            text: event.text,
            timestamp_id: event.ts,
            channel_id: event.channel,
            subtype: event.subtype,
        }
    }
}

/// Build the router.
pub fn router<C: ChatClient + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/slack/events", post(slack_events::<C>))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until the process is stopped.
pub async fn run<C: ChatClient + 'static>(port: u16, state: AppState<C>) -> Result<()> {
    let app = router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Started bot, listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn slack_events<C: ChatClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Json(payload): Json<SlackPayload>,
) -> Response {
    match payload {
        SlackPayload::UrlVerification { challenge } => {
            Json(json!({ "challenge": challenge })).into_response()
        }
        SlackPayload::EventCallback { event } => {
            // Slack wants an answer within three seconds; do the work after.
            let client = state.client.clone();
            tokio::spawn(async move { handle_event(&*client, event).await });
            StatusCode::OK.into_response()
        }
        SlackPayload::Other => StatusCode::OK.into_response(),
    }
}

/// Route one inner event to its handler.
pub async fn handle_event<C: ChatClient + ?Sized>(client: &C, event: SlackEvent) {
    match event {
        SlackEvent::Message(message) => {
            handle_message(client, &message.into()).await;
        }
        SlackEvent::AppMention(mention) => {
            if let Err(e) = handle_mention(client, &mention.channel).await {
                warn!("Failed to answer mention: {}", e);
            }
        }
        SlackEvent::Other => {}
    }
}
