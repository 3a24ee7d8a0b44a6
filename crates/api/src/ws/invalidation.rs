//! Pushes page invalidations to connected clients.
//!
//! Every component or page write publishes an invalidation on the event bus.
//! [`InvalidationForwarder`] turns each one into
//! `{"type":"invalidate","key":["pageComponents", slug]}` and sends it to
//! the connections of the tenant the write belonged to, so open builder
//! and site tabs refetch. When the forwarder falls behind the bus it cannot
//! tell which pages were missed, so every connection is told to drop all
//! of its page component lists.

use std::sync::Arc;

use axum::extract::ws::Message;
use serde::Serialize;
use sitebuilder_events::bus::PAGE_COMPONENTS_KEY;
use sitebuilder_events::SiteEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Message pushed to clients when a page's components changed.
#[derive(Debug, Serialize)]
pub struct InvalidateMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub key: Vec<String>,
}

impl InvalidateMessage {
    /// Build the push message for an event, if it invalidates anything.
    pub fn from_event(event: &SiteEvent) -> Option<Self> {
        event.cache_key().map(|key| Self {
            kind: "invalidate",
            key,
        })
    }

    /// Invalidate every page component list.
    pub fn all_pages() -> Self {
        Self {
            kind: "invalidate",
            key: vec![PAGE_COMPONENTS_KEY.to_string()],
        }
    }

    fn to_frame(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(text) => Some(Message::Text(text.into())),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize invalidation");
                None
            }
        }
    }
}

/// Forwards invalidation events from the bus to WebSocket clients.
pub struct InvalidationForwarder {
    ws_manager: Arc<WsManager>,
}

impl InvalidationForwarder {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run until the event bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<SiteEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.forward(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Invalidation forwarder lagged");
                    self.invalidate_everything().await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, invalidation forwarder shutting down");
                    break;
                }
            }
        }
    }

    async fn forward(&self, event: &SiteEvent) {
        let Some(message) = InvalidateMessage::from_event(event) else {
            return;
        };
        let Some(frame) = message.to_frame() else {
            return;
        };
        let sent = self
            .ws_manager
            .send_to_tenant(event.tenant.as_deref(), frame)
            .await;
        tracing::debug!(
            tenant = ?event.tenant,
            key = ?message.key,
            connections = sent,
            "Invalidation pushed"
        );
    }

    async fn invalidate_everything(&self) {
        if let Some(frame) = InvalidateMessage::all_pages().to_frame() {
            let sent = self.ws_manager.send_to_all(frame).await;
            tracing::info!(connections = sent, "Pushed full invalidation after lag");
        }
    }
}
