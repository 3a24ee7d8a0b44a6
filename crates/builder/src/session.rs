//! One builder's editing session on one page.
//!
//! Edits are applied to the local component list straight away and
//! collected as pending merge patches. [`BuilderSession::save`] sends the
//! patches, then reloads the page from the cache so the local list matches
//! the server again.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use sitebuilder_backend::RequestContext;
use sitebuilder_core::component::{sort_components, ComponentInstance, ComponentPatch};
use sitebuilder_core::merge::{compose_patches, merge_patch};
use sitebuilder_core::page::ContentMode;
use sitebuilder_gateway::{ComponentGateway, CreateComponentRequest, DeleteOutcome, GatewayError};
use sitebuilder_render::{render_page, PageState, RenderContext, RenderedPage};

use crate::notification::Notification;

/// Result of flushing pending edits.
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failed: Vec<String>,
    pub notifications: Vec<Notification>,
}

impl SaveReport {
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty() && self.failed.is_empty()
    }
}

pub struct BuilderSession {
    gateway: Arc<ComponentGateway>,
    ctx: RequestContext,
    slug: String,
    /// Last list fetched from the server.
    server: Arc<[ComponentInstance]>,
    /// Server list with pending edits applied.
    local: Vec<ComponentInstance>,
    pending: BTreeMap<String, ComponentPatch>,
}

impl BuilderSession {
    /// Load the preview list of `slug` and start a session on it.
    pub async fn open(
        gateway: Arc<ComponentGateway>,
        ctx: RequestContext,
        slug: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let slug = slug.into();
        let server = gateway
            .cache()
            .get_components(&ctx, &slug, ContentMode::Preview)
            .await?;
        tracing::debug!(page_slug = %slug, components = server.len(), "Builder session opened");
        Ok(Self {
            gateway,
            ctx,
            local: server.to_vec(),
            server,
            slug,
            pending: BTreeMap::new(),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Components as the builder currently sees them, in render order.
    pub fn components(&self) -> &[ComponentInstance] {
        &self.local
    }

    pub fn component(&self, component_id: &str) -> Option<&ComponentInstance> {
        self.local.iter().find(|c| c.component_id == component_id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self, component_id: &str) -> Option<&ComponentPatch> {
        self.pending.get(component_id)
    }

    /// Render the local list, including unsaved edits.
    pub fn render(&self, ctx: &RenderContext) -> RenderedPage {
        render_page(&PageState::Loaded(Arc::from(self.local.clone())), ctx)
    }

    /// Merge a partial payload into a component.
    ///
    /// The local copy changes immediately; the partial is queued for the
    /// next [`save`](Self::save), merged with anything already queued.
    pub fn edit(&mut self, component_id: &str, partial: Value) -> Result<(), GatewayError> {
        if !partial.is_object() {
            return Err(GatewayError::Validation(
                "Edits must be JSON objects".into(),
            ));
        }
        let instance = self
            .local
            .iter_mut()
            .find(|c| c.component_id == component_id)
            .ok_or_else(|| not_on_page(component_id, &self.slug))?;
        if let Some(entry) = self.gateway.registry().lookup(&instance.component_type) {
            entry.validate_partial(&partial)?;
        }

        merge_patch(&mut instance.data, &partial);
        let queued = self.pending.entry(component_id.to_string()).or_default();
        match &mut queued.data {
            Some(existing) => compose_patches(existing, &partial),
            None => queued.data = Some(partial),
        }
        Ok(())
    }

    /// Move a component to a new `order`, saved with the next flush.
    pub fn move_to(&mut self, component_id: &str, order: i32) -> Result<(), GatewayError> {
        let instance = self
            .local
            .iter_mut()
            .find(|c| c.component_id == component_id)
            .ok_or_else(|| not_on_page(component_id, &self.slug))?;
        instance.order = order;
        self.pending
            .entry(component_id.to_string())
            .or_default()
            .order = Some(order);
        sort_components(&mut self.local);
        Ok(())
    }

    /// Send every pending patch, then reload from the server.
    ///
    /// Rejected patches are dropped and reported with the backend's
    /// message; their components fall back to the server state.
    pub async fn save(&mut self) -> SaveReport {
        let pending = std::mem::take(&mut self.pending);
        let mut report = SaveReport::default();
        if pending.is_empty() {
            return report;
        }

        for (component_id, patch) in pending {
            match self
                .gateway
                .update_raw(&self.ctx, &self.slug, &component_id, patch)
                .await
            {
                Ok(_) => report.saved.push(component_id),
                Err(err) => {
                    tracing::warn!(page_slug = %self.slug, component_id = %component_id, error = %err, "Save failed");
                    report
                        .notifications
                        .push(Notification::from(&err).for_component(component_id.as_str()));
                    report.failed.push(component_id);
                }
            }
        }

        if let Err(err) = self.refresh().await {
            report.notifications.push(Notification::from(&err));
            for component_id in &report.failed {
                self.revert(component_id);
            }
        }

        if report.failed.is_empty() {
            report.notifications.push(Notification::success("Changes saved"));
        }
        tracing::info!(
            page_slug = %self.slug,
            saved = report.saved.len(),
            failed = report.failed.len(),
            "Builder changes flushed"
        );
        report
    }

    /// Reload the server list, keeping unsaved edits on top of it.
    pub async fn refresh(&mut self) -> Result<(), GatewayError> {
        self.server = self
            .gateway
            .cache()
            .get_components(&self.ctx, &self.slug, ContentMode::Preview)
            .await?;
        self.local = self.server.to_vec();
        for (component_id, patch) in &self.pending {
            if let Some(instance) = self
                .local
                .iter_mut()
                .find(|c| &c.component_id == component_id)
            {
                if let Some(data) = &patch.data {
                    merge_patch(&mut instance.data, data);
                }
                if let Some(order) = patch.order {
                    instance.order = order;
                }
            }
        }
        sort_components(&mut self.local);
        Ok(())
    }

    /// Add a new section.
    pub async fn add(
        &mut self,
        component_type: &str,
        data: Value,
        order: Option<i32>,
    ) -> Result<ComponentInstance, GatewayError> {
        let created = self
            .gateway
            .create_raw(
                &self.ctx,
                &self.slug,
                CreateComponentRequest {
                    component_id: None,
                    component_type: component_type.to_string(),
                    data,
                    order,
                },
            )
            .await?;
        self.refresh_or_keep(Some(created.clone())).await;
        Ok(created)
    }

    /// Delete a section. It disappears locally at once and comes back if
    /// the backend refuses.
    pub async fn remove(&mut self, component_id: &str) -> Result<DeleteOutcome, GatewayError> {
        self.pending.remove(component_id);
        self.local.retain(|c| c.component_id != component_id);

        let outcome = self
            .gateway
            .delete(&self.ctx, &self.slug, component_id)
            .await;
        if outcome.is_err() {
            self.revert(component_id);
        }
        self.refresh_or_keep(None).await;
        outcome
    }

    /// Swap a section for a new one of a (possibly different) type at the
    /// same position. The new section is created before the old one is
    /// deleted.
    pub async fn replace(
        &mut self,
        component_id: &str,
        component_type: &str,
        data: Value,
    ) -> Result<ComponentInstance, GatewayError> {
        let order = self
            .component(component_id)
            .map(|c| c.order)
            .ok_or_else(|| not_on_page(component_id, &self.slug))?;

        let created = self
            .gateway
            .create_raw(
                &self.ctx,
                &self.slug,
                CreateComponentRequest {
                    component_id: None,
                    component_type: component_type.to_string(),
                    data,
                    order: Some(order),
                },
            )
            .await?;
        self.pending.remove(component_id);
        let removed = self
            .gateway
            .delete(&self.ctx, &self.slug, component_id)
            .await;

        self.refresh_or_keep(Some(created.clone())).await;
        removed?;
        Ok(created)
    }

    /// Persist a complete ordering of the page's sections.
    pub async fn reorder(&mut self, component_ids: &[String]) -> Result<(), GatewayError> {
        for (position, component_id) in component_ids.iter().enumerate() {
            if let Some(instance) = self
                .local
                .iter_mut()
                .find(|c| &c.component_id == component_id)
            {
                instance.order = position as i32;
            }
            if let Some(queued) = self.pending.get_mut(component_id) {
                queued.order = None;
            }
        }
        self.pending.retain(|_, patch| !patch.is_empty());
        sort_components(&mut self.local);

        let outcome = self
            .gateway
            .reorder(&self.ctx, &self.slug, component_ids)
            .await;
        self.refresh_or_keep(None).await;
        outcome.map(|_| ())
    }

    // ---- private helpers ----

    /// Put a component back to its last server state.
    fn revert(&mut self, component_id: &str) {
        let server = self
            .server
            .iter()
            .find(|c| c.component_id == component_id)
            .cloned();
        self.local.retain(|c| c.component_id != component_id);
        if let Some(server) = server {
            self.local.push(server);
        }
        sort_components(&mut self.local);
    }

    async fn refresh_or_keep(&mut self, created: Option<ComponentInstance>) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(page_slug = %self.slug, error = %err, "Reload after change failed");
            if let Some(created) = created {
                self.local.push(created);
                sort_components(&mut self.local);
            }
        }
    }
}

fn not_on_page(component_id: &str, slug: &str) -> GatewayError {
    GatewayError::Validation(format!(
        "Component '{component_id}' is not on page '{slug}'"
    ))
}
