// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - CDN & Tracking Resource Classifier
 * Classifies third-party resources and detects the serving CDN
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::config::{AppConfig, ResourceCaps};
use crate::errors::{ScannerError, ScannerResult};
use crate::extractor::{extract_resources, ResourceKind};
use crate::http_client::{HttpClient, HttpResponse};
use crate::orchestrator::{FetchJob, FetchOrchestrator, ScanCancellation};
use crate::rules::lookup_fingerprint;
use crate::scoring::COMPLIANCE_WEIGHTS;
use crate::types::{ScanTarget, Severity};

/// Known CDN hosts for third-party assets
const CDN_DOMAINS: &[(&str, &str)] = &[
    (".jsdelivr.net", "jsDelivr"),
    ("cdnjs.cloudflare.com", "cdnjs"),
    (".unpkg.com", "unpkg"),
    ("unpkg.com", "unpkg"),
    ("ajax.googleapis.com", "Google Hosted Libraries"),
    (".bootstrapcdn.com", "BootstrapCDN"),
    (".cloudfront.net", "Amazon CloudFront"),
    (".akamaized.net", "Akamai"),
    (".azureedge.net", "Azure CDN"),
    (".fastly.net", "Fastly"),
    (".b-cdn.net", "Bunny CDN"),
    (".kxcdn.com", "KeyCDN"),
];

/// Known tracking/analytics hosts
const TRACKING_DOMAINS: &[(&str, &str)] = &[
    ("google-analytics.com", "Google Analytics"),
    (".google-analytics.com", "Google Analytics"),
    ("googletagmanager.com", "Google Tag Manager"),
    (".googletagmanager.com", "Google Tag Manager"),
    (".doubleclick.net", "DoubleClick"),
    ("connect.facebook.net", "Meta Pixel"),
    (".hotjar.com", "Hotjar"),
    (".mixpanel.com", "Mixpanel"),
    (".segment.com", "Segment"),
    (".clarity.ms", "Microsoft Clarity"),
    (".matomo.cloud", "Matomo"),
    ("plausible.io", "Plausible"),
];

/// Web-font services (a privacy exposure in several jurisdictions)
const FONT_DOMAINS: &[(&str, &str)] = &[
    ("fonts.googleapis.com", "Google Fonts"),
    ("fonts.gstatic.com", "Google Fonts"),
    ("use.typekit.net", "Adobe Fonts"),
    ("use.fontawesome.com", "Font Awesome"),
];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Cdn,
    Tracking,
    Fonts,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyResource {
    pub url: String,
    pub domain: String,
    pub provider: Option<String>,
    pub category: ResourceCategory,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnResourcesReport {
    pub url: String,
    pub timestamp: String,
    pub resources: Vec<ThirdPartyResource>,
    pub cdn_count: usize,
    pub tracking_count: usize,
    /// CDN serving the page itself, identified from response headers
    pub cdn_provider: Option<String>,
    pub score: u8,
}

pub struct CdnResourcesCheck {
    orchestrator: FetchOrchestrator,
    config: AppConfig,
}

impl CdnResourcesCheck {
    pub fn new(client: Arc<HttpClient>, config: AppConfig) -> Self {
        let orchestrator = FetchOrchestrator::new(client, config.batch_size);
        Self {
            orchestrator,
            config,
        }
    }

    pub async fn run(
        &self,
        target: &ScanTarget,
        cancel: &ScanCancellation,
    ) -> ScannerResult<CdnResourcesReport> {
        info!("[CdnResources] Starting classification for: {}", target.url);

        let primary_job = FetchJob::primary(
            target.url.as_str(),
            self.config.primary_timeout_secs,
            self.config.max_body_bytes,
        );
        let primary = self.orchestrator.fetch_one(primary_job, cancel).await;

        let Some(page) = primary.outcome.response() else {
            return Err(ScannerError::TargetUnreachable {
                url: target.url.to_string(),
                reason: format!("{:?}", primary.outcome),
            });
        };

        let cdn_provider = serving_cdn(page);
        if let Some(ref provider) = cdn_provider {
            debug!("[CdnResources] Page served via {}", provider);
        }

        let discovery_caps = ResourceCaps {
            max_links: 0,
            ..self.config.resource_caps.clone()
        };
        let embedded: Vec<String> =
            extract_resources(&page.body, target.url.as_str(), &discovery_caps)
                .into_iter()
                .filter(|r| r.kind != ResourceKind::Anchor)
                .map(|r| r.url)
                .collect();
        let resources = classify_resources(&embedded, &target.parsed_host);

        let cdn_count = resources
            .iter()
            .filter(|r| r.category == ResourceCategory::Cdn)
            .count();
        let tracking_count = resources
            .iter()
            .filter(|r| r.category == ResourceCategory::Tracking)
            .count();

        let severities = resources.iter().filter_map(|r| match r.category {
            ResourceCategory::Tracking => Some(Severity::High),
            ResourceCategory::Fonts | ResourceCategory::Unknown => Some(Severity::Low),
            ResourceCategory::Cdn => None,
        });

        // Positive signal: distinct CDN providers earn a capped bonus
        let distinct_cdns: HashSet<&str> = resources
            .iter()
            .filter(|r| r.category == ResourceCategory::Cdn)
            .filter_map(|r| r.provider.as_deref())
            .collect();
        let bonus = 5 * distinct_cdns.len() as u32;

        let score = COMPLIANCE_WEIGHTS.score(severities, bonus);

        info!(
            "[CdnResources] Completed: {} third-party resources, {} trackers, score {}",
            resources.len(),
            tracking_count,
            score
        );

        Ok(CdnResourcesReport {
            url: target.url.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            resources,
            cdn_count,
            tracking_count,
            cdn_provider,
            score,
        })
    }
}

/// Classify third-party resource URLs against the fingerprint tables.
pub fn classify_resources(urls: &[String], target_host: &str) -> Vec<ThirdPartyResource> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut classified = Vec::new();

    for url in urls {
        let Some(domain) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from))
        else {
            continue;
        };

        // First-party resources are not third-party exposure
        if domain == target_host || domain.ends_with(&format!(".{}", target_host)) {
            continue;
        }

        if !seen.insert(url.clone()) {
            continue;
        }

        let (category, provider) = if let Some(p) = lookup_fingerprint(TRACKING_DOMAINS, &domain) {
            (ResourceCategory::Tracking, Some(p.to_string()))
        } else if let Some(p) = lookup_fingerprint(FONT_DOMAINS, &domain) {
            (ResourceCategory::Fonts, Some(p.to_string()))
        } else if let Some(p) = lookup_fingerprint(CDN_DOMAINS, &domain) {
            (ResourceCategory::Cdn, Some(p.to_string()))
        } else {
            (ResourceCategory::Unknown, None)
        };

        classified.push(ThirdPartyResource {
            url: url.clone(),
            domain,
            provider,
            category,
        });
    }

    classified
}

/// Identify the CDN serving a response from its headers.
pub fn serving_cdn(response: &HttpResponse) -> Option<String> {
    if response.header("cf-ray").is_some()
        || response.header("cf-cache-status").is_some()
        || response
            .header("server")
            .map(|s| s.contains("cloudflare"))
            .unwrap_or(false)
    {
        return Some("Cloudflare".to_string());
    }

    if response.header("x-amz-cf-id").is_some()
        || response.header("x-amz-cf-pop").is_some()
        || response
            .header("via")
            .map(|s| s.contains("CloudFront"))
            .unwrap_or(false)
    {
        return Some("Amazon CloudFront".to_string());
    }

    if response.header("x-akamai-request-id").is_some()
        || response
            .header("server")
            .map(|s| s.contains("AkamaiGHost"))
            .unwrap_or(false)
    {
        return Some("Akamai".to_string());
    }

    if response
        .header("x-served-by")
        .map(|s| s.contains("cache"))
        .unwrap_or(false)
        || response.header("x-fastly-request-id").is_some()
    {
        return Some("Fastly".to_string());
    }

    if response.header("x-cache").is_some() || response.header("x-cache-status").is_some() {
        return Some("Generic CDN".to_string());
    }

    None
}
