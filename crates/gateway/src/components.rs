//! Component CRUD gateway.
//!
//! Validates writes against the schema registry, forwards them to the
//! backend and invalidates the page's component lists afterwards. The
//! backend's error message is returned unchanged.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitebuilder_backend::{BackendError, RequestContext};
use sitebuilder_core::component::{
    ensure_component_id, generate_component_id, ComponentInstance, ComponentPatch, NewComponent,
};
use sitebuilder_core::page::{ensure_slug, ContentMode};
use sitebuilder_core::schema::{ComponentDescriptor, SchemaEntry, SchemaRegistry};
use sitebuilder_events::bus::{
    SiteEvent, COMPONENT_CREATED, COMPONENT_DELETED, COMPONENT_UPDATED,
};

use crate::cache::PageCache;
use crate::error::GatewayError;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Typed create request for one component type.
#[derive(Debug, Clone)]
pub struct CreateComponent<T> {
    /// Generated when absent.
    pub component_id: Option<String>,
    pub style: Option<String>,
    pub data: T,
    /// Appended after the last component when absent.
    pub order: Option<i32>,
}

impl<T> CreateComponent<T> {
    pub fn new(data: T) -> Self {
        Self {
            component_id: None,
            style: None,
            data,
            order: None,
        }
    }

    pub fn with_id(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = Some(component_id.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn at(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }
}

/// Typed partial update. `data` holds only the changed fields.
#[derive(Debug, Clone)]
pub struct UpdateComponent<D> {
    pub data: Option<Value>,
    pub order: Option<i32>,
    _descriptor: PhantomData<D>,
}

impl<D: ComponentDescriptor> UpdateComponent<D> {
    pub fn fields(data: Value) -> Self {
        Self {
            data: Some(data),
            order: None,
            _descriptor: PhantomData,
        }
    }

    pub fn order(order: i32) -> Self {
        Self {
            data: None,
            order: Some(order),
            _descriptor: PhantomData,
        }
    }
}

/// Untyped create request, as received over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComponentRequest {
    #[serde(default)]
    pub component_id: Option<String>,
    pub component_type: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub order: Option<i32>,
}

/// What a delete did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The id was already gone; not treated as an error.
    AlreadyAbsent,
}

// ---------------------------------------------------------------------------
// ComponentGateway
// ---------------------------------------------------------------------------

/// Create, update, delete and reorder components of a page.
pub struct ComponentGateway {
    cache: Arc<PageCache>,
    registry: Arc<SchemaRegistry>,
}

impl ComponentGateway {
    pub fn new(cache: Arc<PageCache>) -> Self {
        Self::with_registry(cache, Arc::new(SchemaRegistry::builtin()))
    }

    pub fn with_registry(cache: Arc<PageCache>, registry: Arc<SchemaRegistry>) -> Self {
        Self { cache, registry }
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Create a component of type `D`.
    pub async fn create<D: ComponentDescriptor>(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: CreateComponent<D::Data>,
    ) -> Result<ComponentInstance, GatewayError> {
        let mut data = serde_json::to_value(&input.data)
            .map_err(|e| GatewayError::Validation(format!("Invalid {} payload: {e}", D::TYPE)))?;
        if let (Some(style), Value::Object(map)) = (input.style, &mut data) {
            map.insert("style".into(), Value::String(style));
        }
        self.create_raw(
            ctx,
            slug,
            CreateComponentRequest {
                component_id: input.component_id,
                component_type: D::TYPE.as_str().to_string(),
                data,
                order: input.order,
            },
        )
        .await
    }

    /// Create a component from an untyped request. Unknown types are
    /// rejected before anything is sent.
    pub async fn create_raw(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: CreateComponentRequest,
    ) -> Result<ComponentInstance, GatewayError> {
        ensure_slug(slug)?;
        let entry = self.entry_for_write(&input.component_type)?;
        let data = if input.data.is_null() {
            entry.defaults()
        } else {
            input.data
        };
        entry.validate(&data)?;

        let component_id = match input.component_id {
            Some(id) => {
                ensure_component_id(&id)?;
                id
            }
            None => generate_component_id(&input.component_type),
        };

        let request = NewComponent {
            component_id,
            component_type: input.component_type,
            data,
            order: input.order,
        };
        let outcome = self
            .cache
            .backend()
            .create_component(ctx, slug, &request)
            .await;
        let created = self.settle(ctx, slug, outcome).await?;

        tracing::info!(
            page_slug = %slug,
            component_id = %created.component_id,
            component_type = %created.component_type,
            "Component created"
        );
        self.announce(ctx, slug, COMPONENT_CREATED, &created.component_id);
        Ok(created)
    }

    /// Partially update a component of type `D`.
    pub async fn update<D: ComponentDescriptor>(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
        input: UpdateComponent<D>,
    ) -> Result<ComponentInstance, GatewayError> {
        ensure_target(slug, component_id)?;
        let patch = ComponentPatch {
            data: input.data,
            order: input.order,
        };
        let entry = self.entry_for_write(D::TYPE.as_str())?;
        self.send_update(ctx, slug, component_id, patch, Some(entry))
            .await
    }

    /// Partially update a component whose type is looked up from the
    /// page's preview list. Types this build does not know are forwarded
    /// without a schema check.
    pub async fn update_raw(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
        patch: ComponentPatch,
    ) -> Result<ComponentInstance, GatewayError> {
        ensure_target(slug, component_id)?;
        let entry = if patch.data.is_some() {
            let current = self
                .cache
                .get_components(ctx, slug, ContentMode::Preview)
                .await?;
            current
                .iter()
                .find(|c| c.component_id == component_id)
                .and_then(|c| self.registry.lookup(&c.component_type))
                .copied()
        } else {
            None
        };
        self.send_update(ctx, slug, component_id, patch, entry.as_ref())
            .await
    }

    /// Delete a component. Deleting an id that is already gone reports
    /// [`DeleteOutcome::AlreadyAbsent`].
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
    ) -> Result<DeleteOutcome, GatewayError> {
        ensure_target(slug, component_id)?;
        let outcome = self
            .cache
            .backend()
            .delete_component(ctx, slug, component_id)
            .await
            .map(|()| DeleteOutcome::Deleted)
            .or_else(|err| {
                if err.is_not_found() {
                    Ok(DeleteOutcome::AlreadyAbsent)
                } else {
                    Err(err)
                }
            });
        let deleted = self.settle(ctx, slug, outcome).await?;

        tracing::info!(page_slug = %slug, component_id = %component_id, outcome = ?deleted, "Component deleted");
        if deleted == DeleteOutcome::Deleted {
            self.announce(ctx, slug, COMPONENT_DELETED, component_id);
        }
        Ok(deleted)
    }

    /// Give each listed component `order = position`. Stops at the first
    /// failure; the page is invalidated once at the end either way.
    pub async fn reorder(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_ids: &[String],
    ) -> Result<Vec<ComponentInstance>, GatewayError> {
        ensure_slug(slug)?;
        for component_id in component_ids {
            ensure_component_id(component_id)?;
        }
        let mut seen = HashSet::new();
        if let Some(dup) = component_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(GatewayError::Validation(format!(
                "component_id '{dup}' listed more than once"
            )));
        }

        let backend = self.cache.backend();
        let mut updated = Vec::with_capacity(component_ids.len());
        let mut failure = None;
        for (position, component_id) in component_ids.iter().enumerate() {
            let patch = ComponentPatch {
                data: None,
                order: Some(position as i32),
            };
            match backend.update_component(ctx, slug, component_id, &patch).await {
                Ok(instance) => updated.push(instance),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let outcome = match failure {
            Some(err) => Err(err),
            None => Ok(updated),
        };
        let updated = self.settle(ctx, slug, outcome).await?;
        tracing::info!(page_slug = %slug, count = updated.len(), "Components reordered");
        Ok(updated)
    }

    // ---- private helpers ----

    fn entry_for_write(&self, component_type: &str) -> Result<&SchemaEntry, GatewayError> {
        self.registry
            .lookup(component_type)
            .ok_or_else(|| GatewayError::UnknownComponentType(component_type.to_string()))
    }

    async fn send_update(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
        patch: ComponentPatch,
        entry: Option<&SchemaEntry>,
    ) -> Result<ComponentInstance, GatewayError> {
        if patch.is_empty() {
            return Err(GatewayError::Validation("Nothing to update".into()));
        }
        if let (Some(entry), Some(data)) = (entry, &patch.data) {
            entry.validate_partial(data)?;
        }

        let outcome = self
            .cache
            .backend()
            .update_component(ctx, slug, component_id, &patch)
            .await;
        let updated = self.settle(ctx, slug, outcome).await?;

        tracing::info!(page_slug = %slug, component_id = %component_id, "Component updated");
        self.announce(ctx, slug, COMPONENT_UPDATED, component_id);
        Ok(updated)
    }

    /// Invalidate the page after a call reached the backend, whatever the
    /// outcome, then convert the error.
    async fn settle<T>(
        &self,
        ctx: &RequestContext,
        slug: &str,
        outcome: Result<T, BackendError>,
    ) -> Result<T, GatewayError> {
        self.cache
            .invalidate_page(ctx.tenant.as_deref(), slug)
            .await;
        outcome.map_err(|err| {
            tracing::warn!(page_slug = %slug, error = %err, "Backend rejected component write");
            GatewayError::from(err)
        })
    }

    fn announce(&self, ctx: &RequestContext, slug: &str, event_type: &str, component_id: &str) {
        self.cache.events().publish(
            SiteEvent::new(event_type)
                .for_tenant(ctx.tenant.as_deref())
                .for_page(slug)
                .for_component(component_id),
        );
    }
}

/// Both parts of a component address end up as URL path segments.
fn ensure_target(slug: &str, component_id: &str) -> Result<(), GatewayError> {
    ensure_slug(slug)?;
    ensure_component_id(component_id)?;
    Ok(())
}
