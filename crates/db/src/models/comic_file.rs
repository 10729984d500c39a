//! Comic file entity model.

use serde::Serialize;
use shelfbot_core::resource::ImageItem;
use shelfbot_core::types::{DbId, ResourceId, Timestamp};
use sqlx::FromRow;

/// A row from the `comic_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComicFile {
    pub id: DbId,
    pub resource_id: ResourceId,
    /// Opaque platform file handle.
    pub file_id: String,
    /// 1-based and dense per resource.
    pub position: i32,
    /// Message in the storage channel the handle was captured from.
    pub storage_message_id: Option<i64>,
    pub created_at: Timestamp,
}

impl From<ComicFile> for ImageItem {
    fn from(row: ComicFile) -> Self {
        ImageItem {
            file_id: row.file_id,
            position: row.position,
        }
    }
}
