//! `/start` payload parsing.
//!
//! Deep links have the form `<kind>_<uuid>`, e.g.
//! `comic_6f1c2d3e-9a4b-4c5d-8e7f-001122334455`. Anything else is treated
//! as an unknown resource by the caller, never as a fault.

use uuid::Uuid;

use crate::resource::ResourceKind;
use crate::types::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepLink {
    pub kind: ResourceKind,
    pub resource_id: ResourceId,
}

impl DeepLink {
    pub fn new(kind: ResourceKind, resource_id: ResourceId) -> Self {
        Self { kind, resource_id }
    }

    /// Parse a start payload. Returns `None` for unknown prefixes or
    /// malformed identifiers.
    pub fn parse(payload: &str) -> Option<Self> {
        let (prefix, id) = payload.trim().split_once('_')?;
        let kind = prefix.parse::<ResourceKind>().ok()?;
        let resource_id = Uuid::parse_str(id).ok()?;
        Some(Self { kind, resource_id })
    }

    pub fn to_payload(&self) -> String {
        format!("{}_{}", self.kind, self.resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_kind() {
        let id = Uuid::new_v4();
        for kind in ResourceKind::ALL {
            let link = DeepLink::parse(&format!("{kind}_{id}")).unwrap();
            assert_eq!(link, DeepLink::new(kind, id));
        }
    }

    #[test]
    fn payload_round_trips() {
        let link = DeepLink::new(ResourceKind::Comic, Uuid::new_v4());
        assert_eq!(DeepLink::parse(&link.to_payload()), Some(link));
    }

    #[test]
    fn accepts_simple_uuid_form() {
        let id = Uuid::new_v4();
        let link = DeepLink::parse(&format!("comic_{}", id.simple())).unwrap();
        assert_eq!(link.resource_id, id);
    }

    #[test]
    fn rejects_malformed_payloads() {
        let id = Uuid::new_v4();
        for payload in [
            String::new(),
            "comic".to_string(),
            "comic_".to_string(),
            "comic_not-a-uuid".to_string(),
            format!("video_{id}"),
            format!("COMIC_{id}"),
            id.to_string(),
        ] {
            assert_eq!(DeepLink::parse(&payload), None, "payload {payload:?}");
        }
    }
}
