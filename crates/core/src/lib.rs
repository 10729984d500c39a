//! Shelfbot domain core.
//!
//! Everything the comic delivery engine needs that does not touch a
//! database driver or a network socket:
//!
//! - [`resource`]: catalog entry types and kind parsing.
//! - [`entitlement`]: the free / VIP / blocked access policy.
//! - [`pagination`]: stateless navigation tokens and page arithmetic.
//! - [`deep_link`]: `/start` payload parsing.
//! - [`delivery`]: validated delivery configuration.
//! - [`catalog`] and [`sink`]: the storage and delivery seams.
//! - [`dispatch`]: batched, retried media dispatch.
//! - [`orchestrator`]: the per-event state machine tying it together.

pub mod catalog;
pub mod deep_link;
pub mod delivery;
pub mod dispatch;
pub mod entitlement;
pub mod error;
pub mod orchestrator;
pub mod pagination;
pub mod resource;
pub mod sink;
pub mod types;

#[cfg(test)]
mod testing;
