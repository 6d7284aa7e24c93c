//! Mirror orchestration
//!
//! The recursive heart of the crate. `download_page` fetches one URL,
//! decides markup vs opaque from its mapped local path, and for markup
//! descends into every same-host reference before rewriting and writing
//! the page. The descent is strictly depth-first and sequential: no two
//! fetches are ever in flight at once, and the shared [`VisitedSet`] is
//! what terminates cycles and collapses diamond references to a single
//! download.

use crate::config::Config;
use crate::crawler::extract::extract_references;
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::crawler::rewrite::{relative_path_to, rewrite_references};
use crate::mapper::{is_markup_path, local_path_for};
use crate::state::{MirrorStats, VisitedSet};
use crate::MirrorError;
use reqwest::Client;
use scraper::Html;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use url::Url;

/// One mirror run: the HTTP client, the output root, and the state shared
/// across every recursive call
pub struct Mirror {
    client: Client,
    base_dir: PathBuf,
    visited: VisitedSet,
    stats: MirrorStats,
}

impl Mirror {
    /// Creates a mirror run writing under `base_dir`
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Directory the mirrored tree is written under
    /// * `config` - Client configuration for the run
    pub fn new(base_dir: PathBuf, config: &Config) -> Result<Self, MirrorError> {
        let client = build_http_client(&config.fetch)?;

        Ok(Self {
            client,
            base_dir,
            visited: VisitedSet::new(),
            stats: MirrorStats::default(),
        })
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> MirrorStats {
        self.stats
    }

    /// Downloads one URL and, for markup, everything it references
    ///
    /// Returns Ok immediately when the URL was already visited; any later
    /// reference to a downloaded URL observes this and performs no work.
    /// An error covers only this URL's own fetch/parse/write. Failures of
    /// recursively fetched references are logged, counted, and absorbed --
    /// a broken image degrades one link, not the page that used it.
    pub fn download_page<'a>(
        &'a mut self,
        url: &'a Url,
    ) -> Pin<Box<dyn Future<Output = Result<(), MirrorError>> + 'a>> {
        Box::pin(async move {
            if !self.visited.check_and_mark(url.as_str()) {
                return Ok(());
            }

            tracing::debug!("fetching {}", url);
            let body = fetch_url(&self.client, url).await?;

            let local_path = local_path_for(&self.base_dir, url);
            if let Some(parent) = local_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| MirrorError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            if is_markup_path(&local_path) {
                self.download_markup(url, &local_path, body).await?;
                self.stats.pages += 1;
            } else {
                std::fs::write(&local_path, &body).map_err(|source| MirrorError::Write {
                    path: local_path.clone(),
                    source,
                })?;
                self.stats.assets += 1;
            }

            tracing::info!("saved {} -> {}", url, local_path.display());
            Ok(())
        })
    }

    /// Parses a fetched page, mirrors its references, rewrites them to
    /// relative local paths, and writes the result
    async fn download_markup(
        &mut self,
        url: &Url,
        local_path: &Path,
        body: Vec<u8>,
    ) -> Result<(), MirrorError> {
        let text = String::from_utf8(body).map_err(|_| MirrorError::Parse {
            url: url.to_string(),
            message: "response body is not valid UTF-8".to_string(),
        })?;

        // The parse tree lives only for the extraction pass; references are
        // owned values, so nothing borrows the document across the awaits
        // below.
        let references = {
            let document = Html::parse_document(&text);
            extract_references(&document, url)
        };

        let mut targets: HashMap<String, String> = HashMap::new();
        for reference in &references {
            tracing::trace!(
                "reference {} {}={}",
                reference.tag,
                reference.attr,
                reference.url
            );

            if let Err(error) = self.download_page(&reference.url).await {
                tracing::warn!("failed to mirror {}: {}", reference.url, error);
                self.stats.failures += 1;
            }

            // The rewrite happens whether or not the fetch succeeded: the
            // local path is fully determined by the URL alone.
            let resource_path = local_path_for(&self.base_dir, &reference.url);
            if let Some(relative) = relative_path_to(local_path, &resource_path) {
                targets.insert(reference.url.as_str().to_string(), relative);
            }
        }

        let rewritten = rewrite_references(&text, url, &targets)?;
        std::fs::write(local_path, rewritten).map_err(|source| MirrorError::Write {
            path: local_path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}
