//! Catalog entry types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ResourceId;

/// The three content kinds the catalog indexes.
///
/// Stored as lowercase text in `resources.kind`; the same string is the
/// deep-link prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Text resource reached through an external link.
    Novel,
    /// Audio resource reached through an external link.
    Audio,
    /// Image set delivered page by page through the bot.
    Comic,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Novel, Self::Audio, Self::Comic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Novel => "novel",
            Self::Audio => "audio",
            Self::Comic => "comic",
        }
    }

    /// Linked kinds carry a jump URL instead of image items.
    pub fn is_linked(self) -> bool {
        !matches!(self, Self::Comic)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownKind(s.to_string()))
    }
}

/// A catalog entry as seen by the delivery engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub kind: ResourceKind,
    pub is_vip: bool,
    /// External target for linked kinds.
    pub jump_url: Option<String>,
    /// Cover file handle for comics.
    pub cover_file_id: Option<String>,
    pub preview_message_id: Option<i64>,
    pub preview_url: Option<String>,
}

/// One image of a comic, addressed by an opaque platform file handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub file_id: String,
    /// 1-based, dense within the owning resource.
    pub position: i32,
}
