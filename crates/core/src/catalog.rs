//! Read-side storage seams used by the orchestrator.
//!
//! Implementations must not mutate resources. [`EntitlementSource`] may
//! create a user record on first contact, but never changes access state.

use async_trait::async_trait;

use crate::entitlement::{UserEntitlement, UserRef};
use crate::error::CatalogError;
use crate::resource::{ImageItem, Resource};
use crate::types::ResourceId;

#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// Fetch a resource, or `None` if it does not exist.
    async fn lookup(&self, id: ResourceId) -> Result<Option<Resource>, CatalogError>;

    /// Fetch the ordered image items of a resource, or `None` if the
    /// resource does not exist. The list must come from one consistent read
    /// and pass [`verify_ordering`].
    async fn items(&self, id: ResourceId) -> Result<Option<Vec<ImageItem>>, CatalogError>;
}

#[async_trait]
pub trait EntitlementSource: Send + Sync {
    /// Load the current access state for `user`, creating an empty record
    /// on first contact.
    async fn entitlement(&self, user: &UserRef) -> Result<UserEntitlement, CatalogError>;
}

/// Sort items by position and check positions are exactly `1..=N`.
///
/// Duplicates and gaps both break "item N of M" numbering, so either is
/// reported as [`CatalogError::CorruptOrdering`] rather than repaired.
pub fn verify_ordering(
    resource_id: ResourceId,
    mut items: Vec<ImageItem>,
) -> Result<Vec<ImageItem>, CatalogError> {
    items.sort_by_key(|item| item.position);
    for (index, item) in items.iter().enumerate() {
        let expected = i32::try_from(index + 1).unwrap_or(i32::MAX);
        if item.position != expected {
            return Err(CatalogError::CorruptOrdering {
                resource_id,
                expected,
                found: item.position,
            });
        }
    }
    Ok(items)
}
