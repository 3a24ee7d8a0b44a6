//! Page-level operations: list, create, rename, delete, publish, reset.

use std::sync::Arc;

use futures::future::join_all;
use sitebuilder_backend::RequestContext;
use sitebuilder_core::collections::{CollectionItem, CollectionKind, SiteCollections};
use sitebuilder_core::page::{ensure_slug, CreatePage, Page, UpdatePage};
use sitebuilder_events::bus::{SiteEvent, PAGE_PUBLISHED};
use validator::Validate;

use crate::cache::PageCache;
use crate::error::GatewayError;

/// Gateway for pages and the site-wide collections their components show.
pub struct PageGateway {
    cache: Arc<PageCache>,
}

impl PageGateway {
    pub fn new(cache: Arc<PageCache>) -> Self {
        Self { cache }
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Page>, GatewayError> {
        Ok(self.cache.backend().list_pages(ctx).await?)
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: &CreatePage,
    ) -> Result<Page, GatewayError> {
        input.validate()?;
        let page = self.cache.backend().create_page(ctx, input).await?;
        self.cache
            .invalidate_page(ctx.tenant.as_deref(), &page.slug)
            .await;
        tracing::info!(page_slug = %page.slug, page_id = page.id, "Page created");
        Ok(page)
    }

    /// Rename a page or move it to a new slug. Both the old and the new
    /// slug are invalidated.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: &UpdatePage,
    ) -> Result<Page, GatewayError> {
        ensure_slug(slug)?;
        input.validate()?;
        if input.title.is_none() && input.slug.is_none() {
            return Err(GatewayError::Validation("Nothing to update".into()));
        }
        let outcome = self.cache.backend().update_page(ctx, slug, input).await;

        let tenant = ctx.tenant.as_deref();
        self.cache.invalidate_page(tenant, slug).await;
        let page = outcome?;
        if page.slug != slug {
            self.cache.invalidate_page(tenant, &page.slug).await;
        }
        tracing::info!(page_slug = %page.slug, previous_slug = %slug, "Page updated");
        Ok(page)
    }

    /// Delete a page with all of its components.
    pub async fn delete(&self, ctx: &RequestContext, slug: &str) -> Result<(), GatewayError> {
        ensure_slug(slug)?;
        let outcome = self.cache.backend().delete_page(ctx, slug).await;
        self.cache
            .invalidate_page(ctx.tenant.as_deref(), slug)
            .await;
        outcome?;
        tracing::info!(page_slug = %slug, "Page deleted");
        Ok(())
    }

    /// Copy the page's preview components to published.
    pub async fn publish(&self, ctx: &RequestContext, slug: &str) -> Result<(), GatewayError> {
        ensure_slug(slug)?;
        let outcome = self.cache.backend().publish_page(ctx, slug).await;
        self.cache
            .invalidate_page(ctx.tenant.as_deref(), slug)
            .await;
        outcome?;

        tracing::info!(page_slug = %slug, "Page published");
        self.cache.events().publish(
            SiteEvent::new(PAGE_PUBLISHED)
                .for_tenant(ctx.tenant.as_deref())
                .for_page(slug),
        );
        Ok(())
    }

    /// Remove every page of the tenant's site.
    pub async fn reset(&self, ctx: &RequestContext) -> Result<(), GatewayError> {
        let outcome = self.cache.backend().reset_site(ctx).await;
        self.cache.invalidate_tenant(ctx.tenant.as_deref()).await;
        outcome?;
        tracing::info!(tenant = ?ctx.tenant, "Site reset");
        Ok(())
    }

    pub async fn collection(
        &self,
        ctx: &RequestContext,
        kind: CollectionKind,
    ) -> Result<Vec<CollectionItem>, GatewayError> {
        Ok(self.cache.backend().list_collection(ctx, kind).await?)
    }

    /// Fetch several collections concurrently. A collection that fails to
    /// load is left out, so its sections render as not loaded.
    pub async fn collections(
        &self,
        ctx: &RequestContext,
        kinds: impl IntoIterator<Item = CollectionKind>,
    ) -> SiteCollections {
        let kinds: Vec<_> = kinds.into_iter().collect();
        let results = join_all(kinds.iter().map(|kind| self.collection(ctx, *kind))).await;

        let mut collections = SiteCollections::new();
        for (kind, result) in kinds.into_iter().zip(results) {
            match result {
                Ok(items) => collections.insert(kind, items),
                Err(err) => {
                    tracing::warn!(collection = %kind, error = %err, "Failed to load collection");
                }
            }
        }
        collections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sitebuilder_backend::{Backend, MemoryBackend};
    use sitebuilder_core::component::NewComponent;
    use sitebuilder_core::page::ContentMode;
    use sitebuilder_events::EventBus;

    use crate::cache::CacheStatus;

    fn owner() -> RequestContext {
        RequestContext::for_tenant("acme").with_token("owner-token")
    }

    fn setup() -> (Arc<MemoryBackend>, Arc<PageCache>, PageGateway) {
        let backend = Arc::new(MemoryBackend::new());
        let cache = Arc::new(PageCache::new(
            backend.clone(),
            Arc::new(EventBus::default()),
        ));
        (backend, cache.clone(), PageGateway::new(cache))
    }

    fn home() -> CreatePage {
        CreatePage {
            title: "Home".into(),
            slug: "home".into(),
        }
    }

    #[tokio::test]
    async fn create_validates_slug() {
        let (_, _, pages) = setup();
        let err = pages
            .create(
                &owner(),
                &CreatePage {
                    title: "Home".into(),
                    slug: "Not A Slug".into(),
                },
            )
            .await
            .unwrap_err();
        assert_matches!(err, GatewayError::Validation(_));
    }

    #[tokio::test]
    async fn path_like_slugs_are_rejected_before_the_backend() {
        let (_, _, pages) = setup();
        pages.create(&owner(), &home()).await.unwrap();

        for slug in ["..", "home/..", "home/components"] {
            assert_matches!(
                pages.delete(&owner(), slug).await,
                Err(GatewayError::Validation(_))
            );
            assert_matches!(
                pages.publish(&owner(), slug).await,
                Err(GatewayError::Validation(_))
            );
            let rename = UpdatePage {
                title: Some("Start".into()),
                slug: None,
            };
            assert_matches!(
                pages.update(&owner(), slug, &rename).await,
                Err(GatewayError::Validation(_))
            );
        }
        assert_eq!(pages.list(&owner()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_slug_surfaces_backend_conflict() {
        let (_, _, pages) = setup();
        pages.create(&owner(), &home()).await.unwrap();
        let err = pages.create(&owner(), &home()).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
    }

    #[tokio::test]
    async fn publish_refreshes_published_readers() {
        let (backend, cache, pages) = setup();
        pages.create(&owner(), &home()).await.unwrap();
        backend
            .create_component(
                &owner(),
                "home",
                &NewComponent {
                    component_id: "hero-1".into(),
                    component_type: "hero".into(),
                    data: serde_json::json!({"title": "Welcome"}),
                    order: None,
                },
            )
            .await
            .unwrap();

        let live = cache
            .get_components(&owner(), "home", ContentMode::Published)
            .await
            .unwrap();
        assert!(live.is_empty());

        let mut rx = cache.events().subscribe();
        pages.publish(&owner(), "home").await.unwrap();
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Published).await,
            CacheStatus::NotLoaded
        );
        assert!(rx.recv().await.unwrap().is_invalidation());
        assert_eq!(rx.recv().await.unwrap().event_type, PAGE_PUBLISHED);

        let live = cache
            .get_components(&owner(), "home", ContentMode::Published)
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn rename_invalidates_both_slugs() {
        let (_, cache, pages) = setup();
        pages.create(&owner(), &home()).await.unwrap();
        cache
            .get_components(&owner(), "home", ContentMode::Preview)
            .await
            .unwrap();

        let page = pages
            .update(
                &owner(),
                "home",
                &UpdatePage {
                    title: None,
                    slug: Some("start".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(page.slug, "start");
        assert_eq!(
            cache.status(Some("acme"), "home", ContentMode::Preview).await,
            CacheStatus::NotLoaded
        );
        assert!(cache
            .get_components(&owner(), "start", ContentMode::Preview)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let (_, _, pages) = setup();
        let err = pages
            .update(&owner(), "home", &UpdatePage::default())
            .await
            .unwrap_err();
        assert_matches!(err, GatewayError::Validation(_));
    }

    #[tokio::test]
    async fn reset_removes_pages() {
        let (_, _, pages) = setup();
        pages.create(&owner(), &home()).await.unwrap();
        pages.reset(&owner()).await.unwrap();
        assert!(pages.list(&owner()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn collections_are_loaded_per_kind() {
        let (backend, _, pages) = setup();
        backend
            .seed_collection(Some("acme"), CollectionKind::Services, Vec::new())
            .await;

        let collections = pages
            .collections(&owner(), [CollectionKind::Services, CollectionKind::Blogs])
            .await;
        assert_eq!(collections.get(CollectionKind::Services).map(<[_]>::len), Some(0));
        assert_eq!(collections.get(CollectionKind::Blogs).map(<[_]>::len), Some(0));
    }
}
