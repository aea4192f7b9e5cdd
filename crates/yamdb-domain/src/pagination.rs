//! Limit/offset pagination shared across all list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination parameters.
///
/// - `limit`: 1–100, default 10
/// - `offset`: 0–`i64::MAX`, default 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Largest offset the store can bind; SQL `OFFSET` is a signed 64-bit value.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

fn default_limit() -> u64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: limit.unwrap_or_else(default_limit),
            offset: offset.unwrap_or(0),
        }
        .clamped()
    }

    /// Clamp `limit` to 1–100 and `offset` to [`MAX_OFFSET`].
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 100),
            offset: self.offset.min(MAX_OFFSET),
        }
    }
}

/// One page of a list result, with the total row count before slicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: u64, results: Vec<T>) -> Self {
        Self { count, results }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
