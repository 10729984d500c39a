//! Validated delivery settings.
//!
//! Built once at startup and injected into the orchestrator. The page size
//! is clamped here, so a misconfigured value shows up as a startup warning
//! instead of pages silently changing size at request time.

use crate::entitlement::EntitlementPolicy;

/// Hard per-call ceiling of the messaging platform's grouped-media send.
pub const SINK_MAX_BATCH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryConfig {
    batch_size: usize,
    free_view_limit: usize,
}

impl DeliveryConfig {
    /// Build a config, clamping `batch_size` into `1..=sink_ceiling`.
    pub fn new(batch_size: usize, free_view_limit: usize, sink_ceiling: usize) -> Self {
        let ceiling = sink_ceiling.max(1);
        let clamped = batch_size.clamp(1, ceiling);
        if clamped != batch_size {
            tracing::warn!(
                requested = batch_size,
                clamped,
                ceiling,
                "Batch size outside the sink's limits, clamping",
            );
        }
        Self {
            batch_size: clamped,
            free_view_limit,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn free_view_limit(&self) -> usize {
        self.free_view_limit
    }

    pub fn policy(&self) -> EntitlementPolicy {
        EntitlementPolicy::new(self.free_view_limit)
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self::new(SINK_MAX_BATCH, 0, SINK_MAX_BATCH)
    }
}
