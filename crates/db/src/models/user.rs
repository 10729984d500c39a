//! Bot user entity model.

use serde::Serialize;
use shelfbot_core::entitlement::UserEntitlement;
use shelfbot_core::types::{Timestamp, UserId};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub vip_expiry: Option<Timestamp>,
    pub is_blocked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn entitlement(&self) -> UserEntitlement {
        UserEntitlement {
            vip_expiry: self.vip_expiry,
            blocked: self.is_blocked,
        }
    }
}
