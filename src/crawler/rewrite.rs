//! Link rewriting
//!
//! The second pass over a fetched page: every extracted reference's
//! attribute value is replaced with the path of its local copy, relative
//! to the page's own directory. The pass streams the original text through
//! lol_html, so everything outside the rewritten values survives
//! byte-for-byte, attribute order and whitespace included.

use crate::crawler::extract::resolve_reference;
use crate::MirrorError;
use lol_html::html_content::Element;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Relative path from `from_page`'s directory to `to_resource`
///
/// This is the value written into rewritten attributes. The computation
/// accounts for the two files sitting at different directory depths: a
/// page at `a/b.html` referencing `a/c/img.png` gets `c/img.png`, and one
/// at `a/docs/guide.html` referencing `a/index.html` gets `../index.html`.
pub fn relative_path_to(from_page: &Path, to_resource: &Path) -> Option<String> {
    let page_dir = from_page.parent()?;
    pathdiff::diff_paths(to_resource, page_dir).map(|p| p.to_string_lossy().into_owned())
}

/// Looks up the local replacement for one attribute value
///
/// The value is resolved exactly as the extractor resolved it, so the two
/// passes always agree on which references are rewritten.
fn rewritten_value(
    value: &str,
    page_url: &Url,
    targets: &HashMap<String, String>,
) -> Option<String> {
    let resolved = resolve_reference(value, page_url)?;
    targets.get(resolved.as_str()).cloned()
}

fn rewrite_attribute(
    el: &mut Element,
    attr: &str,
    page_url: &Url,
    targets: &HashMap<String, String>,
) -> Result<(), lol_html::errors::AttributeNameError> {
    if let Some(value) = el.get_attribute(attr) {
        if let Some(local) = rewritten_value(&value, page_url, targets) {
            el.set_attribute(attr, &local)?;
        }
    }
    Ok(())
}

/// Rewrites every targeted reference in `html`
///
/// `targets` maps resolved absolute URLs (the extractor's serialization)
/// to relative local paths. Attribute values that resolve to a key are
/// replaced; everything else passes through untouched, including off-host
/// references, which deliberately stay absolute in the output.
///
/// # Arguments
///
/// * `html` - The page text as fetched
/// * `page_url` - URL the page was fetched from
/// * `targets` - Resolved URL to relative local path
///
/// # Returns
///
/// * `Ok(String)` - The rewritten page
/// * `Err(MirrorError)` - The rewriter could not process the input
pub fn rewrite_references(
    html: &str,
    page_url: &Url,
    targets: &HashMap<String, String>,
) -> Result<String, MirrorError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("img[src]", |el| {
                    rewrite_attribute(el, "src", page_url, targets)?;
                    Ok(())
                }),
                element!("script[src]", |el| {
                    rewrite_attribute(el, "src", page_url, targets)?;
                    Ok(())
                }),
                element!("link[href]", |el| {
                    if el.get_attribute("rel").as_deref() == Some("stylesheet") {
                        rewrite_attribute(el, "href", page_url, targets)?;
                    }
                    Ok(())
                }),
                element!("a[href]", |el| {
                    rewrite_attribute(el, "href", page_url, targets)?;
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| MirrorError::Parse {
        url: page_url.to_string(),
        message: e.to_string(),
    })
}
