//! Page aggregate cache.
//!
//! Holds the ordered component list per `(tenant, slug, mode)`. Preview and
//! published are separate entries fetched by separate backend queries.
//! Concurrent readers of the same key share one in-flight fetch, and an
//! invalidation that lands while a fetch is running keeps that fetch's
//! result out of the cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use sitebuilder_backend::{Backend, RequestContext};
use sitebuilder_core::component::{sort_components, ComponentInstance};
use sitebuilder_core::page::{ensure_slug, ContentMode};
use sitebuilder_events::bus::{SiteEvent, PAGE_COMPONENTS_KEY, SITE_RESET};
use sitebuilder_events::EventBus;
use tokio::sync::Mutex;

use crate::error::GatewayError;

/// Result of one component list fetch, shared by every waiting caller.
pub type ComponentList = Arc<[ComponentInstance]>;

type SharedFetch = Shared<BoxFuture<'static, Result<ComponentList, GatewayError>>>;

// ---------------------------------------------------------------------------
// Keys and status
// ---------------------------------------------------------------------------

/// Identity of one cached component list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub tenant: Option<String>,
    pub slug: String,
    pub mode: ContentMode,
}

impl CacheKey {
    pub fn new(tenant: Option<&str>, slug: impl Into<String>, mode: ContentMode) -> Self {
        Self {
            tenant: tenant.map(str::to_string),
            slug: slug.into(),
            mode,
        }
    }

    /// The invalidation scope this entry belongs to, `["pageComponents", slug]`.
    pub fn query_key(&self) -> [&str; 2] {
        [PAGE_COMPONENTS_KEY, &self.slug]
    }
}

/// Load state of a cache entry. An empty page is `Loaded(0)`, never
/// `NotLoaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    NotLoaded,
    Loading,
    Loaded(usize),
}

enum Slot {
    Loading { fetch: SharedFetch, fetch_id: u64 },
    Ready(ComponentList),
}

// ---------------------------------------------------------------------------
// PageCache
// ---------------------------------------------------------------------------

/// Cache of page component lists in front of the backend.
pub struct PageCache {
    backend: Arc<dyn Backend>,
    events: Arc<EventBus>,
    slots: Mutex<HashMap<CacheKey, Slot>>,
    next_fetch_id: AtomicU64,
}

impl PageCache {
    pub fn new(backend: Arc<dyn Backend>, events: Arc<EventBus>) -> Self {
        Self {
            backend,
            events,
            slots: Mutex::new(HashMap::new()),
            next_fetch_id: AtomicU64::new(1),
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Ordered components of a page in the given mode.
    ///
    /// Served from cache when loaded; otherwise joins the running fetch for
    /// the same key or starts one. Failures are returned to every waiter
    /// and are not cached.
    pub async fn get_components(
        &self,
        ctx: &RequestContext,
        slug: &str,
        mode: ContentMode,
    ) -> Result<ComponentList, GatewayError> {
        ensure_slug(slug)?;
        let key = CacheKey::new(ctx.tenant.as_deref(), slug, mode);

        let (fetch, fetch_id) = {
            let mut slots = self.slots.lock().await;
            match slots.get(&key) {
                Some(Slot::Ready(list)) => {
                    tracing::debug!(page_slug = %slug, %mode, "Page cache hit");
                    return Ok(list.clone());
                }
                Some(Slot::Loading { fetch, fetch_id }) => {
                    tracing::debug!(page_slug = %slug, %mode, "Joining in-flight fetch");
                    (fetch.clone(), *fetch_id)
                }
                None => {
                    tracing::debug!(page_slug = %slug, %mode, "Page cache miss");
                    let fetch_id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let fetch = self.start_fetch(ctx.clone(), slug.to_string(), mode);
                    slots.insert(
                        key.clone(),
                        Slot::Loading {
                            fetch: fetch.clone(),
                            fetch_id,
                        },
                    );
                    (fetch, fetch_id)
                }
            }
        };

        let outcome = fetch.await;

        let mut slots = self.slots.lock().await;
        let still_current = matches!(
            slots.get(&key),
            Some(Slot::Loading { fetch_id: current, .. }) if *current == fetch_id
        );
        if still_current {
            match &outcome {
                Ok(list) => {
                    slots.insert(key, Slot::Ready(list.clone()));
                }
                Err(err) => {
                    tracing::debug!(page_slug = %slug, %mode, error = %err, "Fetch failed");
                    slots.remove(&key);
                }
            }
        }
        outcome
    }

    /// Load state for one key.
    pub async fn status(&self, tenant: Option<&str>, slug: &str, mode: ContentMode) -> CacheStatus {
        let key = CacheKey::new(tenant, slug, mode);
        match self.slots.lock().await.get(&key) {
            None => CacheStatus::NotLoaded,
            Some(Slot::Loading { .. }) => CacheStatus::Loading,
            Some(Slot::Ready(list)) => CacheStatus::Loaded(list.len()),
        }
    }

    /// Drop every mode of a page and broadcast the invalidation.
    pub async fn invalidate_page(&self, tenant: Option<&str>, slug: &str) {
        let dropped = {
            let mut slots = self.slots.lock().await;
            let before = slots.len();
            slots.retain(|key, _| !(key.tenant.as_deref() == tenant && key.slug == slug));
            before - slots.len()
        };
        tracing::debug!(tenant = ?tenant, page_slug = %slug, dropped, "Invalidated page components");
        self.events.publish(SiteEvent::page_invalidated(tenant, slug));
    }

    /// Drop every page of a tenant and broadcast a site reset.
    pub async fn invalidate_tenant(&self, tenant: Option<&str>) {
        self.slots
            .lock()
            .await
            .retain(|key, _| key.tenant.as_deref() != tenant);
        tracing::debug!(tenant = ?tenant, "Invalidated all pages");
        self.events
            .publish(SiteEvent::new(SITE_RESET).for_tenant(tenant));
    }

    // ---- private helpers ----

    fn start_fetch(&self, ctx: RequestContext, slug: String, mode: ContentMode) -> SharedFetch {
        let backend = self.backend.clone();
        async move {
            let mut list = backend.list_components(&ctx, &slug, mode).await?;
            sort_components(&mut list);
            Ok::<_, GatewayError>(ComponentList::from(list))
        }
        .boxed()
        .shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitebuilder_backend::MemoryBackend;
    use sitebuilder_core::component::NewComponent;
    use sitebuilder_core::page::CreatePage;
    use std::time::Duration;

    fn owner() -> RequestContext {
        RequestContext::for_tenant("acme").with_token("owner-token")
    }

    async fn seeded(latency: Option<Duration>) -> (Arc<MemoryBackend>, PageCache) {
        let mut backend = MemoryBackend::new();
        if let Some(latency) = latency {
            backend = backend.with_latency(latency);
        }
        let backend = Arc::new(backend);
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
        for (id, order) in [("footer-1", 9), ("hero-1", 0), ("faq-1", 4)] {
            backend
                .create_component(
                    &owner(),
                    "home",
                    &NewComponent {
                        component_id: id.into(),
                        component_type: id.trim_end_matches("-1").into(),
                        data: serde_json::json!({}),
                        order: Some(order),
                    },
                )
                .await
                .unwrap();
        }
        let cache = PageCache::new(backend.clone(), Arc::new(EventBus::default()));
        (backend, cache)
    }

    #[tokio::test]
    async fn components_come_back_sorted_and_cached() {
        let (backend, cache) = seeded(None).await;

        let list = cache
            .get_components(&owner(), "home", ContentMode::Preview)
            .await
            .unwrap();
        let ids: Vec<_> = list.iter().map(|c| c.component_id.as_str()).collect();
        assert_eq!(ids, ["hero-1", "faq-1", "footer-1"]);

        cache
            .get_components(&owner(), "home", ContentMode::Preview)
            .await
            .unwrap();
        assert_eq!(backend.component_fetch_count(), 1);
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Preview).await,
            CacheStatus::Loaded(3)
        );
    }

    #[tokio::test]
    async fn empty_published_list_is_loaded_not_missing() {
        let (_, cache) = seeded(None).await;
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Published).await,
            CacheStatus::NotLoaded
        );

        let published = cache
            .get_components(&owner(), "home", ContentMode::Published)
            .await
            .unwrap();
        assert!(published.is_empty());
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Published).await,
            CacheStatus::Loaded(0)
        );
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_fetch() {
        let (backend, cache) = seeded(Some(Duration::from_millis(50))).await;
        let ctx = owner();

        let (a, b, c) = tokio::join!(
            cache.get_components(&ctx, "home", ContentMode::Preview),
            cache.get_components(&ctx, "home", ContentMode::Preview),
            cache.get_components(&ctx, "home", ContentMode::Preview),
        );
        assert_eq!(a.unwrap().len(), 3);
        assert_eq!(b.unwrap().len(), 3);
        assert_eq!(c.unwrap().len(), 3);
        assert_eq!(backend.component_fetch_count(), 1);
    }

    #[tokio::test]
    async fn modes_are_fetched_separately() {
        let (backend, cache) = seeded(None).await;
        cache
            .get_components(&owner(), "home", ContentMode::Preview)
            .await
            .unwrap();
        cache
            .get_components(&owner(), "home", ContentMode::Published)
            .await
            .unwrap();
        assert_eq!(backend.component_fetch_count(), 2);
    }

    #[tokio::test]
    async fn invalidation_drops_all_modes_and_broadcasts() {
        let (backend, cache) = seeded(None).await;
        let mut rx = cache.events().subscribe();

        for mode in ContentMode::ALL {
            cache.get_components(&owner(), "home", mode).await.unwrap();
        }
        cache.invalidate_page(Some("acme"), "home").await;

        for mode in ContentMode::ALL {
            assert_eq!(
                cache.status(Some("acme"), "home", mode).await,
                CacheStatus::NotLoaded
            );
        }
        let event = rx.recv().await.unwrap();
        assert_eq!(
            event.cache_key(),
            Some(vec!["pageComponents".to_string(), "home".to_string()])
        );

        cache
            .get_components(&owner(), "home", ContentMode::Preview)
            .await
            .unwrap();
        assert_eq!(backend.component_fetch_count(), 3);
    }

    #[tokio::test]
    async fn invalidation_during_fetch_keeps_stale_result_out() {
        let (_, cache) = seeded(Some(Duration::from_millis(50))).await;
        let cache = Arc::new(cache);

        let reader = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_components(&owner(), "home", ContentMode::Preview)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Preview).await,
            CacheStatus::Loading
        );
        cache.invalidate_page(Some("acme"), "home").await;

        reader.await.unwrap().unwrap();
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Preview).await,
            CacheStatus::NotLoaded
        );
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (_, cache) = seeded(None).await;
        let err = cache
            .get_components(&owner(), "missing", ContentMode::Preview)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            cache.status(Some("acme"), "missing", ContentMode::Preview).await,
            CacheStatus::NotLoaded
        );
    }

    #[tokio::test]
    async fn tenant_invalidation_leaves_other_tenants() {
        let (_, cache) = seeded(None).await;
        cache
            .get_components(&owner(), "home", ContentMode::Preview)
            .await
            .unwrap();

        cache.invalidate_tenant(Some("globex")).await;
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Preview).await,
            CacheStatus::Loaded(3)
        );

        cache.invalidate_tenant(Some("acme")).await;
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Preview).await,
            CacheStatus::NotLoaded
        );
    }
}
