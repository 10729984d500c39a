//! Resource entity model and DTOs.

use serde::{Deserialize, Serialize};
use shelfbot_core::error::CatalogError;
use shelfbot_core::resource::{Resource, ResourceKind};
use shelfbot_core::types::{ResourceId, Timestamp};
use sqlx::FromRow;

/// A row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResourceRow {
    pub id: ResourceId,
    pub title: String,
    /// `novel`, `audio` or `comic`; constrained by `ck_resources_kind`.
    pub kind: String,
    pub jump_url: Option<String>,
    pub cover_file_id: Option<String>,
    pub preview_message_id: Option<i64>,
    pub preview_url: Option<String>,
    pub is_vip: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ResourceRow> for Resource {
    type Error = CatalogError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<ResourceKind>()
            .map_err(|e| CatalogError::CorruptRow {
                resource_id: row.id,
                reason: e.to_string(),
            })?;
        Ok(Resource {
            id: row.id,
            title: row.title,
            kind,
            is_vip: row.is_vip,
            jump_url: row.jump_url,
            cover_file_id: row.cover_file_id,
            preview_message_id: row.preview_message_id,
            preview_url: row.preview_url,
        })
    }
}

/// DTO for creating a new resource.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResource {
    pub title: String,
    pub kind: ResourceKind,
    pub jump_url: Option<String>,
    pub cover_file_id: Option<String>,
    pub preview_message_id: Option<i64>,
    pub preview_url: Option<String>,
    /// Defaults to `false` if omitted.
    pub is_vip: Option<bool>,
}
