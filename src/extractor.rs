// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Resource Extractor
 * Discovers secondary resource URLs from fetched markup
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::config::ResourceCaps;

/// `link[href]` covers more than stylesheets (icons, preloads); bound it
/// separately from the per-kind caps.
const STYLESHEET_CEILING: usize = 50;

/// Kind of secondary resource discovered on a page.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Script,
    Stylesheet,
    Anchor,
    Image,
    Media,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Script => "script",
            ResourceKind::Stylesheet => "stylesheet",
            ResourceKind::Anchor => "anchor",
            ResourceKind::Image => "image",
            ResourceKind::Media => "media",
        }
    }
}

/// A discovered secondary resource, resolved against the page base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedResource {
    pub url: String,
    pub kind: ResourceKind,
}

/// Extract a deduplicated, capped set of secondary resource URLs from HTML.
///
/// Invalid and non-http(s) URLs are dropped silently; they are extraction
/// noise, not findings.
pub fn extract_resources(
    html: &str,
    base_url: &str,
    caps: &ResourceCaps,
) -> Vec<ExtractedResource> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(html);

    let mut seen: HashSet<String> = HashSet::new();
    let mut resources: Vec<ExtractedResource> = Vec::new();

    let mut script_count = 0usize;
    let mut link_count = 0usize;
    let mut media_count = 0usize;

    let script_selector = Selector::parse("script[src]").unwrap();
    for element in document.select(&script_selector) {
        if script_count >= caps.max_scripts {
            break;
        }
        if let Some(url) = resolve(&base, element.value().attr("src")) {
            if seen.insert(url.clone()) {
                resources.push(ExtractedResource {
                    url,
                    kind: ResourceKind::Script,
                });
                script_count += 1;
            }
        }
    }

    let stylesheet_selector = Selector::parse("link[href]").unwrap();
    let mut stylesheet_count = 0usize;
    for element in document.select(&stylesheet_selector) {
        if stylesheet_count >= STYLESHEET_CEILING {
            break;
        }
        if let Some(url) = resolve(&base, element.value().attr("href")) {
            if seen.insert(url.clone()) {
                resources.push(ExtractedResource {
                    url,
                    kind: ResourceKind::Stylesheet,
                });
                stylesheet_count += 1;
            }
        }
    }

    let anchor_selector = Selector::parse("a[href]").unwrap();
    for element in document.select(&anchor_selector) {
        if link_count >= caps.max_links {
            break;
        }
        if let Some(url) = resolve(&base, element.value().attr("href")) {
            if seen.insert(url.clone()) {
                resources.push(ExtractedResource {
                    url,
                    kind: ResourceKind::Anchor,
                });
                link_count += 1;
            }
        }
    }

    let image_selector = Selector::parse("img[src]").unwrap();
    for element in document.select(&image_selector) {
        if media_count >= caps.max_media {
            break;
        }
        if let Some(url) = resolve(&base, element.value().attr("src")) {
            if seen.insert(url.clone()) {
                resources.push(ExtractedResource {
                    url,
                    kind: ResourceKind::Image,
                });
                media_count += 1;
            }
        }
    }

    let media_selector = Selector::parse("video[src], audio[src], source[src]").unwrap();
    for element in document.select(&media_selector) {
        if media_count >= caps.max_media {
            break;
        }
        if let Some(url) = resolve(&base, element.value().attr("src")) {
            if seen.insert(url.clone()) {
                resources.push(ExtractedResource {
                    url,
                    kind: ResourceKind::Media,
                });
                media_count += 1;
            }
        }
    }

    debug!(
        "[Extractor] {} resources from {} ({} scripts, {} links)",
        resources.len(),
        base_url,
        script_count,
        link_count
    );

    resources
}

/// Anchors only, in discovery order.
pub fn extract_links(html: &str, base_url: &str, max_links: usize) -> Vec<String> {
    let caps = ResourceCaps {
        max_links,
        ..ResourceCaps::default()
    };
    extract_resources(html, base_url, &caps)
        .into_iter()
        .filter(|r| r.kind == ResourceKind::Anchor)
        .map(|r| r.url)
        .collect()
}

fn resolve(base: &Url, raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.starts_with('#') || raw.starts_with("javascript:") {
        return None;
    }

    let resolved = base.join(raw).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }

    Some(resolved.to_string())
}
