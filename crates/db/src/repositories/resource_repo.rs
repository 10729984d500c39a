//! Repository for the `resources` table.

use shelfbot_core::types::ResourceId;
use sqlx::PgPool;

use crate::models::resource::{CreateResource, ResourceRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, kind, jump_url, cover_file_id, preview_message_id, \
                       preview_url, is_vip, created_at, updated_at";

/// Lookup plus the few administrative writes the bot's tooling needs.
///
/// `kind` has no update path; the database also rejects kind changes.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a new resource, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateResource) -> Result<ResourceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources
                (title, kind, jump_url, cover_file_id, preview_message_id, preview_url, is_vip)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResourceRow>(&query)
            .bind(&input.title)
            .bind(input.kind.as_str())
            .bind(&input.jump_url)
            .bind(&input.cover_file_id)
            .bind(input.preview_message_id)
            .bind(&input.preview_url)
            .bind(input.is_vip)
            .fetch_one(pool)
            .await
    }

    /// Find a resource by its identifier.
    pub async fn find_by_id(
        pool: &PgPool,
        id: ResourceId,
    ) -> Result<Option<ResourceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, ResourceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Toggle the VIP flag. Returns `true` if the resource exists.
    pub async fn set_vip(pool: &PgPool, id: ResourceId, is_vip: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE resources SET is_vip = $2 WHERE id = $1")
            .bind(id)
            .bind(is_vip)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a resource and, by cascade, its comic files.
    pub async fn delete(pool: &PgPool, id: ResourceId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
