//! Resource reference extraction
//!
//! Walks a parsed page in depth-first pre-order and yields every reference
//! the mirror should consider: image and script sources, stylesheet links,
//! and anchors. Candidates are resolved to absolute URLs against the page
//! URL; anything off-host, fragment-only, or non-http(s) is dropped here,
//! which is what bounds the crawl to the seed's host.

use scraper::node::Element;
use scraper::{ElementRef, Html};
use url::Url;

/// One discovered reference on a page
#[derive(Debug, Clone)]
pub struct ResourceReference {
    /// Tag name of the referencing element
    pub tag: String,

    /// Attribute that held the reference
    pub attr: &'static str,

    /// The reference resolved to an absolute URL
    pub url: Url,
}

/// Attribute inspected for a given element
///
/// Returns None for elements that cannot reference a mirrored resource:
///
/// | tag | attribute | condition |
/// |---|---|---|
/// | `img`, `script` | `src` | none |
/// | `link` | `href` | `rel` equals `stylesheet` |
/// | `a` | `href` | none |
fn reference_attribute(element: &Element) -> Option<&'static str> {
    match element.name() {
        "img" | "script" => Some("src"),
        "link" => (element.attr("rel") == Some("stylesheet")).then_some("href"),
        "a" => Some("href"),
        _ => None,
    }
}

/// Resolves a candidate attribute value to an absolute URL
///
/// Returns None for values the mirror never touches: empty values,
/// fragment-only values (they address the same document and already work
/// locally), unresolvable references, and schemes other than http(s),
/// which covers `mailto:`, `javascript:`, `tel:`, and data URIs.
pub fn resolve_reference(value: &str, page_url: &Url) -> Option<Url> {
    let value = value.trim();

    if value.is_empty() || value.starts_with('#') {
        return None;
    }

    let resolved = page_url.join(value).ok()?;

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// True when both URLs address the same host and port
///
/// The port participates in the comparison: a URL on another port of the
/// same machine is another site, and mirroring it would fold two distinct
/// path namespaces into one local tree.
fn same_host(a: &Url, b: &Url) -> bool {
    a.host() == b.host() && a.port_or_known_default() == b.port_or_known_default()
}

/// Extracts the same-host references of a parsed page, in document order
///
/// References whose resolved host differs from the page's host are skipped
/// entirely: they are neither fetched nor rewritten, and stay absolute in
/// the output. Every page the mirror fetches shares the seed's host, so
/// comparing against the page is comparing against the seed.
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `page_url` - URL the page was fetched from, used to resolve relative
///   references
pub fn extract_references(document: &Html, page_url: &Url) -> Vec<ResourceReference> {
    let mut references = Vec::new();

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let Some(attr) = reference_attribute(element.value()) else {
            continue;
        };
        let Some(value) = element.value().attr(attr) else {
            continue;
        };
        let Some(resolved) = resolve_reference(value, page_url) else {
            continue;
        };

        if !same_host(&resolved, page_url) {
            continue;
        }

        references.push(ResourceReference {
            tag: element.value().name().to_string(),
            attr,
            url: resolved,
        });
    }

    references
}
