//! In-memory fakes shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{verify_ordering, EntitlementSource, ResourceCatalog};
use crate::entitlement::{UserEntitlement, UserRef};
use crate::error::CatalogError;
use crate::resource::{ImageItem, Resource, ResourceKind};
use crate::sink::{DeliverySink, SinkError};
use crate::types::{ChatId, ResourceId, UserId};

pub fn items(count: usize) -> Vec<ImageItem> {
    (1..=count)
        .map(|n| ImageItem {
            file_id: format!("file-{n}"),
            position: n as i32,
        })
        .collect()
}

pub fn resource(kind: ResourceKind, is_vip: bool) -> Resource {
    Resource {
        id: uuid::Uuid::new_v4(),
        title: format!("{kind} title"),
        kind,
        is_vip,
        jump_url: kind.is_linked().then(|| "https://example.com/read".to_string()),
        cover_file_id: None,
        preview_message_id: None,
        preview_url: None,
    }
}

/// Sink that replays a scripted list of results, then succeeds.
#[derive(Default)]
pub struct ScriptedSink {
    script: Mutex<VecDeque<Result<(), SinkError>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedSink {
    pub fn with_script(script: Vec<Result<(), SinkError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliverySink for ScriptedSink {
    async fn send_media_group(&self, _chat_id: ChatId, file_ids: &[String]) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(file_ids.to_vec());
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Catalog and entitlement store backed by hash maps.
#[derive(Default)]
pub struct MemoryStore {
    resources: Mutex<HashMap<ResourceId, (Resource, Vec<ImageItem>)>>,
    users: Mutex<HashMap<UserId, UserEntitlement>>,
    fail_storage: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail_storage: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, resource: Resource, items: Vec<ImageItem>) {
        self.resources
            .lock()
            .unwrap()
            .insert(resource.id, (resource, items));
    }

    pub fn set_items(&self, id: ResourceId, items: Vec<ImageItem>) {
        if let Some(entry) = self.resources.lock().unwrap().get_mut(&id) {
            entry.1 = items;
        }
    }

    pub fn remove(&self, id: ResourceId) {
        self.resources.lock().unwrap().remove(&id);
    }

    pub fn set_entitlement(&self, user: UserId, entitlement: UserEntitlement) {
        self.users.lock().unwrap().insert(user, entitlement);
    }

    pub fn known_users(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.fail_storage {
            return Err(CatalogError::Storage("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceCatalog for MemoryStore {
    async fn lookup(&self, id: ResourceId) -> Result<Option<Resource>, CatalogError> {
        self.check()?;
        Ok(self.resources.lock().unwrap().get(&id).map(|(r, _)| r.clone()))
    }

    async fn items(&self, id: ResourceId) -> Result<Option<Vec<ImageItem>>, CatalogError> {
        self.check()?;
        let items = self.resources.lock().unwrap().get(&id).map(|(_, i)| i.clone());
        items.map(|items| verify_ordering(id, items)).transpose()
    }
}

#[async_trait]
impl EntitlementSource for MemoryStore {
    async fn entitlement(&self, user: &UserRef) -> Result<UserEntitlement, CatalogError> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .entry(user.id)
            .or_default()
            .clone())
    }
}
