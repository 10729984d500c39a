//! Access policy for catalog resources.
//!
//! Elevation is time based: a user is elevated while `now < vip_expiry`.
//! The evaluator is pure; callers load a fresh [`UserEntitlement`] and pass
//! the current time on every request so nothing is cached across events.

use crate::resource::Resource;
use crate::types::{Timestamp, UserId};

/// The requesting user as reported by the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub first_name: Option<String>,
    pub username: Option<String>,
}

impl UserRef {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            first_name: None,
            username: None,
        }
    }
}

/// Stored access state for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserEntitlement {
    pub vip_expiry: Option<Timestamp>,
    pub blocked: bool,
}

impl UserEntitlement {
    pub fn is_elevated(&self, now: Timestamp) -> bool {
        self.vip_expiry.is_some_and(|expiry| expiry > now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The user was blocked administratively.
    Blocked,
    /// The item lies beyond the free preview of a VIP resource.
    UpgradeRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DenyReason),
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Access::Allowed)
    }
}

/// Free-versus-VIP policy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitlementPolicy {
    /// Number of leading items of a VIP resource viewable without elevation.
    pub free_view_limit: usize,
}

impl EntitlementPolicy {
    pub fn new(free_view_limit: usize) -> Self {
        Self { free_view_limit }
    }

    /// Decide whether the 0-based `item_index` of `resource` is viewable.
    ///
    /// Rules, first match wins:
    /// 1. blocked users are denied everything;
    /// 2. non-VIP resources are open;
    /// 3. elevated users see every VIP item;
    /// 4. everyone else sees the first `free_view_limit` items.
    pub fn authorize(
        &self,
        entitlement: &UserEntitlement,
        resource: &Resource,
        item_index: usize,
        now: Timestamp,
    ) -> Access {
        if entitlement.blocked {
            return Access::Denied(DenyReason::Blocked);
        }
        if !resource.is_vip || entitlement.is_elevated(now) {
            return Access::Allowed;
        }
        if item_index < self.free_view_limit {
            Access::Allowed
        } else {
            Access::Denied(DenyReason::UpgradeRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::resource::ResourceKind;

    fn comic(is_vip: bool) -> Resource {
        Resource {
            id: uuid::Uuid::new_v4(),
            title: "Test".into(),
            kind: ResourceKind::Comic,
            is_vip,
            jump_url: None,
            cover_file_id: None,
            preview_message_id: None,
            preview_url: None,
        }
    }

    fn elevated(now: Timestamp) -> UserEntitlement {
        UserEntitlement {
            vip_expiry: Some(now + Duration::days(3)),
            blocked: false,
        }
    }

    #[test]
    fn non_vip_is_always_allowed() {
        let policy = EntitlementPolicy::new(0);
        let now = Utc::now();
        let free = UserEntitlement::default();
        for index in [0, 1, 9, 10, 500] {
            assert_eq!(policy.authorize(&free, &comic(false), index, now), Access::Allowed);
        }
    }

    #[test]
    fn free_limit_boundary_is_exclusive() {
        let policy = EntitlementPolicy::new(20);
        let now = Utc::now();
        let free = UserEntitlement::default();
        let vip = comic(true);

        assert!(policy.authorize(&free, &vip, 0, now).is_allowed());
        assert!(policy.authorize(&free, &vip, 19, now).is_allowed());
        assert_eq!(
            policy.authorize(&free, &vip, 20, now),
            Access::Denied(DenyReason::UpgradeRequired)
        );
        assert_eq!(
            policy.authorize(&free, &vip, 21, now),
            Access::Denied(DenyReason::UpgradeRequired)
        );
    }

    #[test]
    fn zero_limit_denies_every_vip_item() {
        let policy = EntitlementPolicy::new(0);
        let now = Utc::now();
        assert_eq!(
            policy.authorize(&UserEntitlement::default(), &comic(true), 0, now),
            Access::Denied(DenyReason::UpgradeRequired)
        );
    }

    #[test]
    fn elevated_user_ignores_limit() {
        let policy = EntitlementPolicy::new(0);
        let now = Utc::now();
        for index in [0, 10, 1000] {
            assert!(policy.authorize(&elevated(now), &comic(true), index, now).is_allowed());
        }
    }

    #[test]
    fn expired_elevation_falls_back_to_free_limit() {
        let policy = EntitlementPolicy::new(5);
        let now = Utc::now();
        let lapsed = UserEntitlement {
            vip_expiry: Some(now - Duration::seconds(1)),
            blocked: false,
        };
        assert!(policy.authorize(&lapsed, &comic(true), 4, now).is_allowed());
        assert_eq!(
            policy.authorize(&lapsed, &comic(true), 5, now),
            Access::Denied(DenyReason::UpgradeRequired)
        );
    }

    #[test]
    fn expiry_equal_to_now_is_not_elevated() {
        let now = Utc::now();
        let edge = UserEntitlement {
            vip_expiry: Some(now),
            blocked: false,
        };
        assert!(!edge.is_elevated(now));
    }

    #[test]
    fn blocked_overrides_everything() {
        let policy = EntitlementPolicy::new(100);
        let now = Utc::now();
        let blocked = UserEntitlement {
            vip_expiry: Some(now + Duration::days(30)),
            blocked: true,
        };
        for resource in [comic(false), comic(true)] {
            assert_eq!(
                policy.authorize(&blocked, &resource, 0, now),
                Access::Denied(DenyReason::Blocked)
            );
        }
    }
}
