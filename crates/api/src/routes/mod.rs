//! HTTP route handlers.

pub mod editor;
pub mod guests;
pub mod health;
pub mod invitations;
pub mod profiles;
pub mod public;
pub mod rsvps;
pub mod setup;
pub mod templates;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::pagination::{clamp_limit, decode_cursor, encode_cursor};
use uuid::Uuid;

use crate::error::ApiError;

/// Keyset pagination query: `?cursor=...&limit=...`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Decoded cursor position and the clamped page size.
    pub fn bounds(&self) -> Result<(Option<(DateTime<Utc>, Uuid)>, i64), ApiError> {
        let before = self.cursor.as_deref().map(decode_cursor).transpose()?;
        Ok((before, clamp_limit(self.limit)))
    }
}

/// Splits a `limit + 1` fetch into one page and the cursor for the next.
pub(crate) fn paginate<T>(
    mut rows: Vec<T>,
    limit: i64,
    key: impl Fn(&T) -> (DateTime<Utc>, Uuid),
) -> (Vec<T>, Option<String>) {
    let limit = usize::try_from(limit).unwrap_or(0);
    if rows.len() <= limit {
        return (rows, None);
    }
    rows.truncate(limit);
    let next = rows.last().map(|row| {
        let (created_at, id) = key(row);
        encode_cursor(created_at, id)
    });
    (rows, next)
}
