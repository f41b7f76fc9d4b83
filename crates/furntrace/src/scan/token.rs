//! Decoding of scanned order tokens.
//!
//! Two encodings are in circulation: the printed `ORDER-<id>` label and the
//! older URL form carrying `?id=<id>` or `&id=<id>`.

use std::sync::LazyLock;

use regex::Regex;

use super::error::ScanRejection;

static RE_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ORDER-(\d+)$").unwrap());
static RE_URL_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]id=(\d+)").unwrap());

/// Extracts the order id from a scanned token.
///
/// Surrounding whitespace is ignored. The label form must match the whole
/// token; the URL form may appear anywhere. Ids that do not fit in an `i64`
/// are rejected like any other malformed token.
pub fn parse_order_token(raw: &str) -> Result<i64, ScanRejection> {
    let token = raw.trim();
    let digits = RE_LABEL
        .captures(token)
        .or_else(|| RE_URL_ID.captures(token))
        .and_then(|caps| caps.get(1))
        .ok_or(ScanRejection::MalformedToken)?;

    digits
        .as_str()
        .parse::<i64>()
        .map_err(|_| ScanRejection::MalformedToken)
}
