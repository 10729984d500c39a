//! Delivery orchestrator.
//!
//! Handles one inbound event at a time, either a deep-link open or a
//! navigation tap:
//!
//! ```text
//! resolve ──► authorize ──► serve ──► Outcome
//!   │            │            │
//!   NotFound     Denied       Empty / DispatchFailed
//! ```
//!
//! Nothing is remembered between events. A navigation token is decoded,
//! checked against the live catalog, clamped into the current page range
//! and authorized again for the first item of the target page, so an
//! entitlement that lapsed mid-session takes effect on the next tap.

use std::sync::Arc;

use chrono::Utc;

use crate::catalog::{EntitlementSource, ResourceCatalog};
use crate::deep_link::DeepLink;
use crate::delivery::DeliveryConfig;
use crate::dispatch::{BatchDispatcher, DispatchResult};
use crate::entitlement::{Access, DenyReason, UserRef};
use crate::error::DeliveryError;
use crate::pagination::{first_item_index, page_count, NavToken};
use crate::resource::{ImageItem, Resource, ResourceKind};
use crate::sink::DeliverySink;
use crate::types::{ChatId, ResourceId};

/// Result of one handled event, rendered into a reply by the bot layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A comic page was delivered.
    Served(ServedPage),
    /// A linked resource was resolved; the reply carries its jump URL.
    Linked {
        kind: ResourceKind,
        title: String,
        url: Option<String>,
    },
    /// Unknown payload, missing resource or kind mismatch.
    NotFound,
    Denied(DenyReason),
    /// The comic has no images yet.
    Empty { title: String },
    /// The sink kept failing; the user should try again later.
    DispatchFailed,
}

/// Metadata about a delivered page, used to build navigation controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedPage {
    pub resource_id: ResourceId,
    pub title: String,
    /// 0-based page index actually served, after clamping.
    pub page: usize,
    pub page_count: usize,
    pub item_count: usize,
}

impl ServedPage {
    pub fn prev(&self) -> Option<NavToken> {
        let page = self.page.checked_sub(1)?;
        self.token(page)
    }

    pub fn next(&self) -> Option<NavToken> {
        let page = self.page + 1;
        if page >= self.page_count {
            return None;
        }
        self.token(page)
    }

    pub fn is_single_page(&self) -> bool {
        self.page_count <= 1
    }

    fn token(&self, page: usize) -> Option<NavToken> {
        u32::try_from(page)
            .ok()
            .map(|page| NavToken::new(self.resource_id, page))
    }
}

pub struct DeliveryOrchestrator {
    catalog: Arc<dyn ResourceCatalog>,
    entitlements: Arc<dyn EntitlementSource>,
    sink: Arc<dyn DeliverySink>,
    dispatcher: BatchDispatcher,
    config: DeliveryConfig,
}

impl DeliveryOrchestrator {
    pub fn new(
        catalog: Arc<dyn ResourceCatalog>,
        entitlements: Arc<dyn EntitlementSource>,
        sink: Arc<dyn DeliverySink>,
        dispatcher: BatchDispatcher,
        config: DeliveryConfig,
    ) -> Self {
        Self {
            catalog,
            entitlements,
            sink,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Handle a deep-link open: resolve, authorize item 0, serve page 0.
    pub async fn open(
        &self,
        user: &UserRef,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Outcome, DeliveryError> {
        let Some(link) = DeepLink::parse(payload) else {
            tracing::debug!(user_id = user.id, payload, "Unrecognised deep link");
            return Ok(Outcome::NotFound);
        };

        let Some(resource) = self.catalog.lookup(link.resource_id).await? else {
            tracing::info!(user_id = user.id, resource_id = %link.resource_id, "Deep link to missing resource");
            return Ok(Outcome::NotFound);
        };
        if resource.kind != link.kind {
            tracing::info!(
                user_id = user.id,
                resource_id = %resource.id,
                expected = %link.kind,
                actual = %resource.kind,
                "Deep link kind mismatch",
            );
            return Ok(Outcome::NotFound);
        }

        if let Some(reason) = self.authorize(user, &resource, 0).await? {
            return Ok(Outcome::Denied(reason));
        }

        if resource.kind.is_linked() {
            return Ok(Outcome::Linked {
                kind: resource.kind,
                title: resource.title,
                url: resource.jump_url,
            });
        }

        let Some(items) = self.catalog.items(resource.id).await? else {
            return Ok(Outcome::NotFound);
        };
        Ok(self.serve(chat_id, &resource, &items, 0).await)
    }

    /// Handle a navigation tap carrying an encoded [`NavToken`].
    pub async fn navigate(
        &self,
        user: &UserRef,
        chat_id: ChatId,
        token: &str,
    ) -> Result<Outcome, DeliveryError> {
        let nav = match NavToken::decode(token) {
            Ok(nav) => nav,
            Err(e) => {
                tracing::debug!(user_id = user.id, error = %e, "Invalid navigation token");
                return Ok(Outcome::NotFound);
            }
        };

        let Some(resource) = self.catalog.lookup(nav.resource_id).await? else {
            return Ok(Outcome::NotFound);
        };
        if resource.kind != ResourceKind::Comic {
            return Ok(Outcome::NotFound);
        }
        let Some(items) = self.catalog.items(resource.id).await? else {
            return Ok(Outcome::NotFound);
        };

        let batch_size = self.config.batch_size();
        let requested = nav.page as usize;
        let page = requested.min(page_count(items.len(), batch_size).saturating_sub(1));
        if page != requested {
            tracing::debug!(
                resource_id = %resource.id,
                requested,
                page,
                "Navigation page out of range, clamping",
            );
        }

        let first_index = first_item_index(page, batch_size);
        if let Some(reason) = self.authorize(user, &resource, first_index).await? {
            return Ok(Outcome::Denied(reason));
        }

        Ok(self.serve(chat_id, &resource, &items, page).await)
    }

    /// Evaluate access for one item index against freshly loaded state.
    async fn authorize(
        &self,
        user: &UserRef,
        resource: &Resource,
        item_index: usize,
    ) -> Result<Option<DenyReason>, DeliveryError> {
        let entitlement = self.entitlements.entitlement(user).await?;
        match self
            .config
            .policy()
            .authorize(&entitlement, resource, item_index, Utc::now())
        {
            Access::Allowed => Ok(None),
            Access::Denied(reason) => {
                tracing::info!(
                    user_id = user.id,
                    resource_id = %resource.id,
                    item_index,
                    ?reason,
                    "Access denied",
                );
                Ok(Some(reason))
            }
        }
    }

    async fn serve(
        &self,
        chat_id: ChatId,
        resource: &Resource,
        items: &[ImageItem],
        page: usize,
    ) -> Outcome {
        let batch_size = self.config.batch_size();
        let pages = page_count(items.len(), batch_size);
        if pages == 0 {
            return Outcome::Empty {
                title: resource.title.clone(),
            };
        }

        match self
            .dispatcher
            .send_page(self.sink.as_ref(), chat_id, items, page, batch_size)
            .await
        {
            DispatchResult::Sent { .. } => Outcome::Served(ServedPage {
                resource_id: resource.id,
                title: resource.title.clone(),
                page,
                page_count: pages,
                item_count: items.len(),
            }),
            DispatchResult::EmptyPage => Outcome::Empty {
                title: resource.title.clone(),
            },
            DispatchResult::Failed { attempts, error } => {
                tracing::error!(
                    resource_id = %resource.id,
                    chat_id,
                    page,
                    attempts,
                    error = %error,
                    "Comic page could not be delivered",
                );
                Outcome::DispatchFailed
            }
        }
    }
}
