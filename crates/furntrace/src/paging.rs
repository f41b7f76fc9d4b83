//! Page/page-size query parameters shared by the list endpoints.

use std::fmt::Display;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Deserializes an optional number that may arrive as text. A blank value
/// (`?page=`) is treated as absent.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<V> {
        Value(V),
        Text(String),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Value(v)) => Ok(Some(v)),
        Some(Raw::Text(text)) => match text.trim() {
            "" => Ok(None),
            t => t.parse().map(Some).map_err(de::Error::custom),
        },
    }
}

/// 1-based page request. Missing or zero values fall back to defaults;
/// oversized pages are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
}

impl PageRequest {
    pub fn page(&self) -> u64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> u64 {
        self.page_size()
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}
