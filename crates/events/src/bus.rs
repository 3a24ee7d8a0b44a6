//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`SiteEvent`]s. It is
//! shared via `Arc<EventBus>` between the page cache (publisher) and the
//! WebSocket forwarder and builder sessions (subscribers).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A page's cached component list was dropped; every view of it must refetch.
pub const PAGE_COMPONENTS_INVALIDATED: &str = "page_components.invalidated";
pub const COMPONENT_CREATED: &str = "component.created";
pub const COMPONENT_UPDATED: &str = "component.updated";
pub const COMPONENT_DELETED: &str = "component.deleted";
pub const PAGE_PUBLISHED: &str = "page.published";
pub const SITE_RESET: &str = "site.reset";

/// Cache namespace for a page's component list.
pub const PAGE_COMPONENTS_KEY: &str = "pageComponents";

// ---------------------------------------------------------------------------
// SiteEvent
// ---------------------------------------------------------------------------

/// Something that happened to a tenant's site.
///
/// Constructed via [`SiteEvent::new`] and enriched with the builder methods
/// [`for_tenant`](SiteEvent::for_tenant), [`for_page`](SiteEvent::for_page),
/// [`for_component`](SiteEvent::for_component) and
/// [`with_payload`](SiteEvent::with_payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteEvent {
    /// Dot-separated event name, e.g. `"component.updated"`.
    pub event_type: String,

    /// Tenant subdomain, `None` for the root site.
    pub tenant: Option<String>,

    /// Slug of the affected page.
    pub page_slug: Option<String>,

    /// Affected component, for component-level events.
    pub component_id: Option<String>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl SiteEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            tenant: None,
            page_slug: None,
            component_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// The invalidation broadcast for `["pageComponents", slug]`.
    pub fn page_invalidated(tenant: Option<&str>, page_slug: &str) -> Self {
        Self::new(PAGE_COMPONENTS_INVALIDATED)
            .for_tenant(tenant)
            .for_page(page_slug)
    }

    pub fn for_tenant(mut self, tenant: Option<&str>) -> Self {
        self.tenant = tenant.map(str::to_string);
        self
    }

    pub fn for_page(mut self, page_slug: impl Into<String>) -> Self {
        self.page_slug = Some(page_slug.into());
        self
    }

    pub fn for_component(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = Some(component_id.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Returns `true` for events that require page views to refetch.
    pub fn is_invalidation(&self) -> bool {
        self.event_type == PAGE_COMPONENTS_INVALIDATED || self.event_type == SITE_RESET
    }

    /// The cache key this event invalidates, e.g. `["pageComponents", "home"]`.
    ///
    /// A site reset invalidates every page and yields just the namespace.
    pub fn cache_key(&self) -> Option<Vec<String>> {
        if !self.is_invalidation() {
            return None;
        }
        let mut key = vec![PAGE_COMPONENTS_KEY.to_string()];
        if let Some(slug) = &self.page_slug {
            key.push(slug.clone());
        }
        Some(key)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use sitebuilder_events::bus::{EventBus, SiteEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(SiteEvent::page_invalidated(Some("acme"), "home"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<SiteEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: SiteEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SiteEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = SiteEvent::new(COMPONENT_UPDATED)
            .for_tenant(Some("acme"))
            .for_page("home")
            .for_component("hero-1")
            .with_payload(serde_json::json!({"fields": ["title"]}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, COMPONENT_UPDATED);
        assert_eq!(received.tenant.as_deref(), Some("acme"));
        assert_eq!(received.page_slug.as_deref(), Some("home"));
        assert_eq!(received.component_id.as_deref(), Some("hero-1"));
        assert_eq!(received.payload["fields"][0], "title");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(SiteEvent::page_invalidated(None, "home"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1, e2);
        assert!(e1.is_invalidation());
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(SiteEvent::new(SITE_RESET));
    }

    #[test]
    fn invalidation_cache_key() {
        let event = SiteEvent::page_invalidated(Some("acme"), "home");
        assert_eq!(
            event.cache_key(),
            Some(vec!["pageComponents".to_string(), "home".to_string()])
        );

        let reset = SiteEvent::new(SITE_RESET).for_tenant(Some("acme"));
        assert_eq!(reset.cache_key(), Some(vec!["pageComponents".to_string()]));

        assert_eq!(SiteEvent::new(COMPONENT_CREATED).cache_key(), None);
    }
}
