//! VIP plan entity model and DTOs.

use serde::{Deserialize, Serialize};
use shelfbot_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `vip_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VipPlan {
    pub id: DbId,
    pub name: String,
    pub duration_days: i32,
    /// Display price, stored as text to keep the operator's formatting.
    pub price: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new VIP plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVipPlan {
    pub name: String,
    pub duration_days: i32,
    pub price: String,
    pub description: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    /// Defaults to `0` if omitted.
    pub sort_order: Option<i32>,
}
