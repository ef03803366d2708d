//! URL composition

/// Join a base URL, a request path and a serialized filter suffix.
///
/// At most one trailing slash is stripped from `base_url` and at most one
/// leading slash from `path`. An empty base yields `path + filter_suffix`
/// with no leading slash inserted. The suffix is appended verbatim.
pub fn compose_url(base_url: &str, path: &str, filter_suffix: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let path = path.strip_prefix('/').unwrap_or(path);

    if base.is_empty() {
        format!("{path}{filter_suffix}")
    } else {
        format!("{base}/{path}{filter_suffix}")
    }
}
