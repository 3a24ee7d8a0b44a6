//! Debounced background saving for a [`BuilderSession`].
//!
//! Every edit calls [`Autosave::poke`]. Once no poke has arrived for the
//! configured delay, the pending edits are flushed in one go and the
//! resulting notifications are queued for the UI.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::BuilderConfig;
use crate::notification::Notification;
use crate::session::BuilderSession;

// ---------------------------------------------------------------------------
// Autosave
// ---------------------------------------------------------------------------

pub struct Autosave {
    poke: Arc<Notify>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl Autosave {
    /// Start the background saver for `session`.
    pub fn spawn(session: Arc<Mutex<BuilderSession>>, config: BuilderConfig) -> Self {
        let poke = Arc::new(Notify::new());
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run(
            session,
            config.autosave_delay,
            Arc::clone(&poke),
            cancel.clone(),
            tx,
        ));

        Self {
            poke,
            cancel,
            handle: Some(handle),
            notifications: rx,
        }
    }

    /// Signal that an edit happened. Restarts the quiet window.
    pub fn poke(&self) {
        self.poke.notify_one();
    }

    /// Wait for the next notification from a flush.
    pub async fn next_notification(&mut self) -> Option<Notification> {
        self.notifications.recv().await
    }

    /// Take every notification produced so far without waiting.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }
        drained
    }

    /// Stop the saver, flushing whatever is still pending first.
    pub async fn shutdown(mut self) -> Vec<Notification> {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Autosave task failed");
            }
        }
        self.drain_notifications()
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    session: Arc<Mutex<BuilderSession>>,
    delay: Duration,
    poke: Arc<Notify>,
    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<Notification>,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = poke.notified() => {}
        }

        // Each further poke restarts the window.
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = poke.notified() => continue,
                _ = tokio::time::sleep(delay) => break,
            }
        }

        flush(&session, &tx).await;
        if cancel.is_cancelled() {
            return;
        }
    }

    // Cancelled while idle; edits may still be pending without a poke.
    flush(&session, &tx).await;
    tracing::debug!("Autosave stopped");
}

async fn flush(session: &Mutex<BuilderSession>, tx: &mpsc::UnboundedSender<Notification>) {
    let report = session.lock().await.save().await;
    for notification in report.notifications {
        // The receiver is gone once the UI stopped listening.
        let _ = tx.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sitebuilder_backend::{Backend, MemoryBackend, RequestContext};
    use sitebuilder_core::component::NewComponent;
    use sitebuilder_core::page::{ContentMode, CreatePage};
    use sitebuilder_events::EventBus;
    use sitebuilder_gateway::{ComponentGateway, PageCache};

    fn owner() -> RequestContext {
        RequestContext::for_tenant("acme").with_token("owner-token")
    }

    async fn setup(ctx: RequestContext) -> (Arc<MemoryBackend>, Arc<Mutex<BuilderSession>>) {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .create_page(
                &owner(),
                &CreatePage {
                    title: "Home".into(),
                    slug: "home".into(),
                },
            )
            .await
            .unwrap();
        backend
            .create_component(
                &owner(),
                "home",
                &NewComponent {
                    component_id: "hero-1".into(),
                    component_type: "hero".into(),
                    data: json!({"title": "Welcome"}),
                    order: Some(0),
                },
            )
            .await
            .unwrap();
        let cache = Arc::new(PageCache::new(
            backend.clone(),
            Arc::new(EventBus::default()),
        ));
        let gateway = Arc::new(ComponentGateway::new(cache));
        let session = BuilderSession::open(gateway, ctx, "home").await.unwrap();
        (backend, Arc::new(Mutex::new(session)))
    }

    async fn stored_title(backend: &MemoryBackend) -> String {
        backend
            .list_components(&owner(), "home", ContentMode::Preview)
            .await
            .unwrap()[0]
            .data["title"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn edit(session: &Mutex<BuilderSession>, autosave: &Autosave, title: &str) {
        session
            .lock()
            .await
            .edit("hero-1", json!({ "title": title }))
            .unwrap();
        autosave.poke();
    }

    #[tokio::test(start_paused = true)]
    async fn saves_after_quiet_period() {
        let (backend, session) = setup(owner()).await;
        let mut autosave = Autosave::spawn(session.clone(), BuilderConfig::default());

        edit(&session, &autosave, "Hello").await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(stored_title(&backend).await, "Welcome");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(stored_title(&backend).await, "Hello");
        assert_eq!(
            autosave.next_notification().await,
            Some(Notification::success("Changes saved"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn each_edit_restarts_the_window() {
        let (backend, session) = setup(owner()).await;
        let autosave = Autosave::spawn(session.clone(), BuilderConfig::default());

        for title in ["H", "He", "Hel", "Hell"] {
            edit(&session, &autosave, title).await;
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        assert_eq!(stored_title(&backend).await, "Welcome");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(stored_title(&backend).await, "Hell");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_flushes_pending_edits() {
        let (backend, session) = setup(owner()).await;
        let config = BuilderConfig::default().with_autosave_delay(Duration::from_secs(60));
        let autosave = Autosave::spawn(session.clone(), config);

        edit(&session, &autosave, "Before close").await;
        let notifications = autosave.shutdown().await;

        assert_eq!(stored_title(&backend).await, "Before close");
        assert_eq!(notifications, [Notification::success("Changes saved")]);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_flush_surfaces_error_notification() {
        let (_, session) = setup(RequestContext::for_tenant("acme")).await;
        let mut autosave = Autosave::spawn(session.clone(), BuilderConfig::default());

        edit(&session, &autosave, "Nope").await;
        let notification = autosave.next_notification().await.unwrap();

        assert!(notification.is_error());
        assert_eq!(notification.component_id.as_deref(), Some("hero-1"));
        assert_eq!(
            session.lock().await.component("hero-1").unwrap().data["title"],
            "Welcome"
        );
    }
}
