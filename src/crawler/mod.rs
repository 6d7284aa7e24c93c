//! Crawler module for page fetching and mirroring
//!
//! This module contains the core mirroring logic, including:
//! - HTTP client construction and fetching
//! - Resource reference extraction from parsed pages
//! - Link rewriting to relative local paths
//! - Recursive mirror orchestration

mod extract;
mod fetcher;
mod mirror;
mod rewrite;

pub use extract::{extract_references, resolve_reference, ResourceReference};
pub use fetcher::{build_http_client, fetch_url};
pub use mirror::Mirror;
pub use rewrite::{relative_path_to, rewrite_references};

use crate::config::Config;
use crate::state::MirrorStats;
use crate::MirrorError;
use std::path::PathBuf;
use url::Url;

/// Mirrors a site starting from `seed`
///
/// Fetches the seed page, recursively downloads every same-host resource
/// it references, rewrites those references to relative local paths, and
/// writes the tree under `base_dir`. A failure on the seed itself is fatal
/// and propagates; failures further down degrade only their own branch and
/// show up in the returned stats.
///
/// # Arguments
///
/// * `seed` - Absolute URL to start from
/// * `base_dir` - Directory the mirror is written under
/// * `config` - Client and output configuration
///
/// # Returns
///
/// * `Ok(MirrorStats)` - Counters for the completed run
/// * `Err(MirrorError)` - The seed URL itself could not be mirrored
pub async fn mirror(
    seed: &Url,
    base_dir: PathBuf,
    config: &Config,
) -> Result<MirrorStats, MirrorError> {
    let mut run = Mirror::new(base_dir, config)?;
    run.download_page(seed).await?;
    Ok(run.stats())
}
