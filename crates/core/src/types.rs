/// Surrogate keys for child rows are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Resources are addressed by UUID so identifiers stay opaque in deep links.
pub type ResourceId = uuid::Uuid;

/// Messaging platform user identifier.
pub type UserId = i64;

/// Messaging platform chat identifier.
pub type ChatId = i64;
