//! Path and media type matching.
//!
//! # Responsibilities
//! - Strip the service prefix and normalize the remaining path
//! - Match `Content-Type` against a route's consumed media type
//! - Match `Accept` against a route's produced media type
//!
//! # Design Decisions
//! - Path matching is case-sensitive; media types are not
//! - Media type parameters (`charset=...`, `q=...`) are ignored
//! - No regex to keep matching O(n) in the path length

/// The only media type the API consumes and produces.
pub const MIME_JSON: &str = "application/json";

/// Normalize a route path: collapse repeated slashes and drop a trailing one.
///
/// The empty path normalizes to `/`.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Strip `prefix` from `path` and normalize the remainder.
///
/// Returns `None` when `path` lies outside the prefix. The prefix must end
/// on a segment boundary: `/api/v1x` is not under `/api/v1`.
pub fn strip_prefix(prefix: &str, path: &str) -> Option<String> {
    let prefix = normalize_path(prefix);
    if prefix == "/" {
        return Some(normalize_path(path));
    }

    let normalized = normalize_path(path);
    let rest = normalized.strip_prefix(&prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(normalize_path(rest))
    } else {
        None
    }
}

/// The `type/subtype` part of a media type, lowercased.
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a `Content-Type` value denotes `expected`.
pub fn content_type_matches(content_type: &str, expected: &str) -> bool {
    essence(content_type) == essence(expected)
}

/// Whether an `Accept` value admits `produced`.
///
/// Each comma-separated range may be exact, `type/*` or `*/*`.
pub fn accepts(accept: &str, produced: &str) -> bool {
    let produced = essence(produced);
    let produced_type = produced.split('/').next().unwrap_or_default();

    accept.split(',').map(essence).any(|range| {
        if range == "*/*" || range == produced {
            return true;
        }
        match range.split_once('/') {
            Some((ty, "*")) => ty == produced_type,
            _ => false,
        }
    })
}
