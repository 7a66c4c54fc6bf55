//! Filename extraction from a request path.

/// Returns everything after the last `/` of `path`.
///
/// No segment filtering happens here: `/`, the empty path, and any path with
/// a trailing slash all yield `""`, which no artifact template accepts.
pub fn last_segment(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
