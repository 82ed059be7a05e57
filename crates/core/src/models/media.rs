//! Media URL resolution.

/// Resolve an image URL returned by the backend.
///
/// Uploaded files come back as server-relative paths (`/static/uploads/a.jpg`);
/// those are joined onto `backend_base` (the backend origin, without the API
/// prefix). Absolute `http://` and `https://` URLs are returned unchanged.
#[must_use]
pub fn resolve_media_url(backend_base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_owned();
    }
    let base = backend_base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}
