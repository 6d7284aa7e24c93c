//! URL to filesystem path mapping
//!
//! Maps each remote URL to the local file that holds its mirrored copy.
//! The mapping is pure and deterministic: every page that references the
//! same resource computes the same local path, which is what keeps
//! relative links consistent across the whole mirror.

use std::path::{Path, PathBuf};
use url::Url;

/// Maps a remote URL to its local path under `base_dir`
///
/// Rules, applied in order:
/// 1. The URL's path component is joined onto `base_dir`. Query and
///    fragment play no part in the mapping.
/// 2. A URL path ending in `/` gets `index.html` appended.
/// 3. A path whose final component has no extension gets `.html` appended.
///
/// Rule 3 is a heuristic, not content-type inspection: extensionless
/// server-side routes almost always serve markup, and a local viewer needs
/// the extension to treat them as such.
///
/// # Arguments
///
/// * `base_dir` - Root directory the mirror is written under
/// * `url` - Absolute URL being mirrored
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tidepool::mapper::local_path_for;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/docs/guide").unwrap();
/// let path = local_path_for(Path::new("mirror"), &url);
/// assert_eq!(path, PathBuf::from("mirror/docs/guide.html"));
/// ```
pub fn local_path_for(base_dir: &Path, url: &Url) -> PathBuf {
    let url_path = url.path();
    let mut local = base_dir.join(url_path.trim_start_matches('/'));

    if url_path.ends_with('/') {
        local.push("index.html");
    } else if local.extension().is_none() {
        local.set_extension("html");
    }

    local
}

/// True when the mapped local path will hold markup
///
/// The crawler dispatches on this: markup gets parsed and rewritten,
/// anything else is copied verbatim.
pub fn is_markup_path(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "html")
}
