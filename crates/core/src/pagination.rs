//! Stateless comic navigation.
//!
//! A [`NavToken`] carries `(resource_id, page)` inside the callback data of
//! an inline button, so any bot instance can resume navigation after a
//! restart without a session table. The wire form is the prefix byte `n`
//! followed by the URL-safe, unpadded base64 of the 16 UUID bytes and the
//! big-endian `u32` page index: always [`TOKEN_LEN`] ASCII bytes, far
//! below the 64-byte callback-data ceiling.
//!
//! Decoding is purely structural. Whether the resource still exists and the
//! page is still in range is checked by the orchestrator against live data.

use std::ops::Range;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use uuid::Uuid;

use crate::types::ResourceId;

/// Leading byte that tags callback data as a navigation token.
pub const NAV_PREFIX: char = 'n';

const PAYLOAD_BYTES: usize = 16 + 4;

/// Encoded length of every navigation token, prefix included.
pub const TOKEN_LEN: usize = 1 + (PAYLOAD_BYTES * 4).div_ceil(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavToken {
    pub resource_id: ResourceId,
    /// 0-based page index.
    pub page: u32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token does not start with the navigation prefix")]
    MissingPrefix,

    #[error("Token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token payload has {0} bytes, expected 20")]
    Length(usize),
}

impl NavToken {
    pub fn new(resource_id: ResourceId, page: u32) -> Self {
        Self { resource_id, page }
    }

    pub fn encode(&self) -> String {
        let mut payload = [0u8; PAYLOAD_BYTES];
        payload[..16].copy_from_slice(self.resource_id.as_bytes());
        payload[16..].copy_from_slice(&self.page.to_be_bytes());

        let mut token = String::with_capacity(TOKEN_LEN);
        token.push(NAV_PREFIX);
        URL_SAFE_NO_PAD.encode_string(payload, &mut token);
        token
    }

    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let body = token
            .strip_prefix(NAV_PREFIX)
            .ok_or(TokenError::MissingPrefix)?;
        let payload = URL_SAFE_NO_PAD.decode(body)?;
        if payload.len() != PAYLOAD_BYTES {
            return Err(TokenError::Length(payload.len()));
        }

        let mut id = [0u8; 16];
        id.copy_from_slice(&payload[..16]);
        let mut page = [0u8; 4];
        page.copy_from_slice(&payload[16..]);

        Ok(Self {
            resource_id: Uuid::from_bytes(id),
            page: u32::from_be_bytes(page),
        })
    }
}

/// Number of pages needed to show `item_count` items, `batch_size` per page.
pub fn page_count(item_count: usize, batch_size: usize) -> usize {
    item_count.div_ceil(batch_size)
}

/// Index of the first item on `page`.
pub fn first_item_index(page: usize, batch_size: usize) -> usize {
    page.saturating_mul(batch_size)
}

/// Item index range covered by `page`. Empty when the page lies past the end.
pub fn page_range(page: usize, batch_size: usize, item_count: usize) -> Range<usize> {
    let start = first_item_index(page, batch_size).min(item_count);
    let end = start.saturating_add(batch_size).min(item_count);
    start..end
}
