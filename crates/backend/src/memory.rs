//! In-memory backend.
//!
//! Behaves like the REST backend closely enough for tests and local
//! development: per-tenant sites with independent preview and published
//! component lists, merge-patch updates, bearer-token checks on mutations,
//! and the backend's error messages.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sitebuilder_core::collections::{CollectionItem, CollectionKind};
use sitebuilder_core::component::{next_order, ComponentInstance, ComponentPatch, NewComponent};
use sitebuilder_core::merge::merge_patch;
use sitebuilder_core::page::{ContentMode, CreatePage, Page, UpdatePage};
use tokio::sync::RwLock;

use crate::{Backend, BackendError, RequestContext};

/// How deleting an id that does not exist is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Succeed silently.
    #[default]
    Idempotent,
    /// Answer `404 Not Found`.
    Strict,
}

#[derive(Debug, Default)]
struct SiteState {
    pages: BTreeMap<String, Page>,
    preview: HashMap<String, Vec<ComponentInstance>>,
    published: HashMap<String, Vec<ComponentInstance>>,
    collections: HashMap<CollectionKind, Vec<CollectionItem>>,
}

impl SiteState {
    fn require_page(&self, slug: &str) -> Result<(), BackendError> {
        if self.pages.contains_key(slug) {
            Ok(())
        } else {
            Err(BackendError::not_found("Page", slug))
        }
    }

    fn list_mut(&mut self, mode: ContentMode) -> &mut HashMap<String, Vec<ComponentInstance>> {
        match mode {
            ContentMode::Preview => &mut self.preview,
            ContentMode::Published => &mut self.published,
        }
    }
}

/// Backend that keeps every tenant's site in memory.
pub struct MemoryBackend {
    sites: RwLock<HashMap<Option<String>, SiteState>>,
    delete_policy: DeletePolicy,
    latency: Option<Duration>,
    next_id: AtomicI64,
    component_fetches: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(HashMap::new()),
            delete_policy: DeletePolicy::default(),
            latency: None,
            next_id: AtomicI64::new(1),
            component_fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Delay every component list fetch, to make concurrent fetches overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of component list fetches served so far.
    pub fn component_fetch_count(&self) -> usize {
        self.component_fetches.load(Ordering::SeqCst)
    }

    /// Replace a collection for a tenant.
    pub async fn seed_collection(
        &self,
        tenant: Option<&str>,
        kind: CollectionKind,
        items: Vec<CollectionItem>,
    ) {
        let mut sites = self.sites.write().await;
        sites
            .entry(tenant.map(str::to_string))
            .or_default()
            .collections
            .insert(kind, items);
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn require_token(ctx: &RequestContext) -> Result<(), BackendError> {
        match ctx.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(()),
            _ => Err(BackendError::api(401, "Authentication credentials were not provided")),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_pages(&self, ctx: &RequestContext) -> Result<Vec<Page>, BackendError> {
        let sites = self.sites.read().await;
        Ok(sites
            .get(&ctx.tenant)
            .map(|site| site.pages.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_page(
        &self,
        ctx: &RequestContext,
        input: &CreatePage,
    ) -> Result<Page, BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        let site = sites.entry(ctx.tenant.clone()).or_default();
        if site.pages.contains_key(&input.slug) {
            return Err(BackendError::api(
                409,
                format!("A page with slug '{}' already exists", input.slug),
            ));
        }
        let page = Page {
            id: self.allocate_id(),
            title: input.title.clone(),
            slug: input.slug.clone(),
        };
        site.pages.insert(page.slug.clone(), page.clone());
        site.preview.insert(page.slug.clone(), Vec::new());
        site.published.insert(page.slug.clone(), Vec::new());
        Ok(page)
    }

    async fn update_page(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: &UpdatePage,
    ) -> Result<Page, BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        let site = sites
            .get_mut(&ctx.tenant)
            .ok_or_else(|| BackendError::not_found("Page", slug))?;
        site.require_page(slug)?;

        if let Some(new_slug) = input.slug.as_deref().filter(|s| *s != slug) {
            if site.pages.contains_key(new_slug) {
                return Err(BackendError::api(
                    409,
                    format!("A page with slug '{new_slug}' already exists"),
                ));
            }
            for mode in ContentMode::ALL {
                let lists = site.list_mut(mode);
                let components = lists.remove(slug).unwrap_or_default();
                lists.insert(new_slug.to_string(), components);
            }
            if let Some(mut page) = site.pages.remove(slug) {
                page.slug = new_slug.to_string();
                site.pages.insert(new_slug.to_string(), page);
            }
        }

        let key = input.slug.as_deref().unwrap_or(slug);
        let page = site
            .pages
            .get_mut(key)
            .ok_or_else(|| BackendError::not_found("Page", key))?;
        if let Some(title) = &input.title {
            page.title = title.clone();
        }
        Ok(page.clone())
    }

    async fn delete_page(&self, ctx: &RequestContext, slug: &str) -> Result<(), BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        let removed = sites.get_mut(&ctx.tenant).and_then(|site| {
            site.preview.remove(slug);
            site.published.remove(slug);
            site.pages.remove(slug)
        });
        match (removed, self.delete_policy) {
            (Some(_), _) | (None, DeletePolicy::Idempotent) => Ok(()),
            (None, DeletePolicy::Strict) => Err(BackendError::not_found("Page", slug)),
        }
    }

    async fn list_components(
        &self,
        ctx: &RequestContext,
        slug: &str,
        mode: ContentMode,
    ) -> Result<Vec<ComponentInstance>, BackendError> {
        self.component_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut sites = self.sites.write().await;
        let site = sites
            .get_mut(&ctx.tenant)
            .ok_or_else(|| BackendError::not_found("Page", slug))?;
        site.require_page(slug)?;
        Ok(site
            .list_mut(mode)
            .get(slug)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: &NewComponent,
    ) -> Result<ComponentInstance, BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        let site = sites
            .get_mut(&ctx.tenant)
            .ok_or_else(|| BackendError::not_found("Page", slug))?;
        site.require_page(slug)?;

        let list = site.preview.entry(slug.to_string()).or_default();
        if list.iter().any(|c| c.component_id == input.component_id) {
            return Err(BackendError::api(
                409,
                format!(
                    "component_id '{}' already exists on page '{slug}'",
                    input.component_id
                ),
            ));
        }

        let instance = ComponentInstance {
            id: self.allocate_id(),
            component_id: input.component_id.clone(),
            component_type: input.component_type.clone(),
            data: input.data.clone(),
            order: input.order.unwrap_or_else(|| next_order(list)),
        };
        list.push(instance.clone());
        Ok(instance)
    }

    async fn update_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
        patch: &ComponentPatch,
    ) -> Result<ComponentInstance, BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        let site = sites
            .get_mut(&ctx.tenant)
            .ok_or_else(|| BackendError::not_found("Page", slug))?;
        site.require_page(slug)?;

        let instance = site
            .preview
            .get_mut(slug)
            .and_then(|list| list.iter_mut().find(|c| c.component_id == component_id))
            .ok_or_else(|| BackendError::not_found("Component", component_id))?;

        if let Some(data) = &patch.data {
            merge_patch(&mut instance.data, data);
        }
        if let Some(order) = patch.order {
            instance.order = order;
        }
        Ok(instance.clone())
    }

    async fn delete_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
    ) -> Result<(), BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        let site = sites
            .get_mut(&ctx.tenant)
            .ok_or_else(|| BackendError::not_found("Page", slug))?;
        site.require_page(slug)?;

        let list = site.preview.entry(slug.to_string()).or_default();
        let before = list.len();
        list.retain(|c| c.component_id != component_id);

        if list.len() == before && self.delete_policy == DeletePolicy::Strict {
            return Err(BackendError::not_found("Component", component_id));
        }
        Ok(())
    }

    async fn publish_page(&self, ctx: &RequestContext, slug: &str) -> Result<(), BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        let site = sites
            .get_mut(&ctx.tenant)
            .ok_or_else(|| BackendError::not_found("Page", slug))?;
        site.require_page(slug)?;

        let draft = site.preview.get(slug).cloned().unwrap_or_default();
        site.published.insert(slug.to_string(), draft);
        Ok(())
    }

    async fn reset_site(&self, ctx: &RequestContext) -> Result<(), BackendError> {
        Self::require_token(ctx)?;
        let mut sites = self.sites.write().await;
        if let Some(site) = sites.get_mut(&ctx.tenant) {
            site.pages.clear();
            site.preview.clear();
            site.published.clear();
        }
        Ok(())
    }

    async fn list_collection(
        &self,
        ctx: &RequestContext,
        kind: CollectionKind,
    ) -> Result<Vec<CollectionItem>, BackendError> {
        let sites = self.sites.read().await;
        Ok(sites
            .get(&ctx.tenant)
            .and_then(|site| site.collections.get(&kind).cloned())
            .unwrap_or_default())
    }
}
