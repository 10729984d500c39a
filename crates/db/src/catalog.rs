//! Postgres-backed catalog and entitlement source for the delivery engine.

use async_trait::async_trait;
use shelfbot_core::catalog::{verify_ordering, EntitlementSource, ResourceCatalog};
use shelfbot_core::entitlement::{UserEntitlement, UserRef};
use shelfbot_core::error::CatalogError;
use shelfbot_core::resource::{ImageItem, Resource};
use shelfbot_core::types::ResourceId;
use sqlx::PgPool;

use crate::repositories::{ComicFileRepo, ResourceRepo, UserRepo};

/// Read adapter over the repository layer.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(err: sqlx::Error) -> CatalogError {
    CatalogError::Storage(err.to_string())
}

#[async_trait]
impl ResourceCatalog for PgCatalog {
    async fn lookup(&self, id: ResourceId) -> Result<Option<Resource>, CatalogError> {
        ResourceRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage)?
            .map(Resource::try_from)
            .transpose()
    }

    /// Existence check and item list share one read-only snapshot, so a
    /// concurrent reorder is seen either entirely or not at all.
    async fn items(&self, id: ResourceId) -> Result<Option<Vec<ImageItem>>, CatalogError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM resources WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage)?;
        if !exists {
            return Ok(None);
        }

        let rows = ComicFileRepo::list_by_resource_in(&mut tx, id)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        let items = rows.into_iter().map(ImageItem::from).collect();
        verify_ordering(id, items).map(Some).inspect_err(|e| {
            tracing::error!(resource_id = %id, error = %e, "Stored page ordering is corrupt");
        })
    }
}

#[async_trait]
impl EntitlementSource for PgCatalog {
    async fn entitlement(&self, user: &UserRef) -> Result<UserEntitlement, CatalogError> {
        let row = UserRepo::ensure(&self.pool, user).await.map_err(storage)?;
        Ok(row.entitlement())
    }
}
