use crate::types::ResourceId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),
}

/// Failures raised by catalog and entitlement storage.
///
/// Absence of a row is not an error here; lookups return `Option`.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The backing store could not be reached or rejected the query.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Item positions for a resource are not exactly `1..=N`.
    #[error("Corrupt ordering for resource {resource_id}: expected position {expected}, found {found}")]
    CorruptOrdering {
        resource_id: ResourceId,
        expected: i32,
        found: i32,
    },

    /// A stored row could not be mapped onto a domain value.
    #[error("Corrupt row for resource {resource_id}: {reason}")]
    CorruptRow {
        resource_id: ResourceId,
        reason: String,
    },
}

/// Unexpected conditions that abort a single delivery interaction.
///
/// Expected outcomes (not found, denied, empty, dispatch failure) are
/// modelled by [`crate::orchestrator::Outcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_corrupt_ordering() {
        let id = uuid::Uuid::nil();
        let err = CatalogError::CorruptOrdering {
            resource_id: id,
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            format!("Corrupt ordering for resource {id}: expected position 3, found 2")
        );
    }

    #[test]
    fn delivery_error_is_transparent() {
        let err: DeliveryError = CatalogError::Storage("pool timed out".into()).into();
        assert_eq!(err.to_string(), "Storage error: pool timed out");
    }
}
