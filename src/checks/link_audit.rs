// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Link & Mixed-Content Auditor
 * Verifies outbound links and flags http:// resources on https pages
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::config::{AppConfig, ResourceCaps};
use crate::errors::{ScannerError, ScannerResult};
use crate::extractor::{extract_resources, ExtractedResource, ResourceKind};
use crate::http_client::{FetchOutcome, HttpClient};
use crate::orchestrator::{FetchJob, FetchOrchestrator, ScanCancellation};
use crate::scoring::LINK_AUDIT_WEIGHTS;
use crate::types::{ScanTarget, Severity};

/// Links discovered beyond the check cap are counted but not fetched.
const LINK_DISCOVERY_CEILING: usize = 500;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLink {
    pub url: String,
    pub status: u16,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedContentItem {
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAuditReport {
    pub url: String,
    pub timestamp: String,
    pub total_links: usize,
    pub broken_links: Vec<BrokenLink>,
    pub mixed_content: Vec<MixedContentItem>,
    pub internal_links: usize,
    pub external_links: usize,
    pub score: u8,
}

pub struct LinkAuditCheck {
    orchestrator: FetchOrchestrator,
    config: AppConfig,
}

impl LinkAuditCheck {
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
    ) -> ScannerResult<LinkAuditReport> {
        info!("[LinkAudit] Starting audit for: {}", target.url);

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

        // Count every unique link, then check only the first N
        let discovery_caps = ResourceCaps {
            max_links: LINK_DISCOVERY_CEILING,
            ..self.config.resource_caps.clone()
        };
        let resources = extract_resources(&page.body, target.url.as_str(), &discovery_caps);

        let links: Vec<String> = resources
            .iter()
            .filter(|r| r.kind == ResourceKind::Anchor)
            .map(|r| r.url.clone())
            .collect();

        let total_links = links.len();
        let (internal_links, external_links) = partition_counts(&links, &target.parsed_host);

        let checked: Vec<String> = links
            .into_iter()
            .take(self.config.resource_caps.max_links)
            .collect();
        debug!(
            "[LinkAudit] {} links found, checking first {}",
            total_links,
            checked.len()
        );

        let jobs: Vec<FetchJob> = checked
            .iter()
            .map(|url| {
                FetchJob::derived(
                    url.clone(),
                    self.config.derived_timeout_secs,
                    self.config.max_body_bytes,
                )
            })
            .collect();

        let mut broken_links = Vec::new();
        for result in self.orchestrator.fetch_all(jobs, cancel).await {
            match &result.outcome {
                FetchOutcome::Success(response) if response.status_code >= 400 => {
                    broken_links.push(BrokenLink {
                        url: result.job.url.clone(),
                        status: response.status_code,
                        reason: format!("HTTP {}", response.status_code),
                    });
                }
                FetchOutcome::Success(_) => {}
                FetchOutcome::Timeout => {
                    broken_links.push(BrokenLink {
                        url: result.job.url.clone(),
                        status: 0,
                        reason: "Request timed out".to_string(),
                    });
                }
                FetchOutcome::NetworkError(reason) => {
                    broken_links.push(BrokenLink {
                        url: result.job.url.clone(),
                        status: 0,
                        reason: reason.clone(),
                    });
                }
                // Extraction noise and cancelled tails are not link health
                FetchOutcome::InvalidUrl(_) | FetchOutcome::Cancelled => {}
            }
        }

        let mixed_content = find_mixed_content(&resources, target.is_https());

        let severities = broken_links
            .iter()
            .map(|_| Severity::Medium)
            .chain(mixed_content.iter().map(|item| item.severity));
        let score = LINK_AUDIT_WEIGHTS.score(severities, 0);

        info!(
            "[LinkAudit] Completed: {} broken, {} mixed-content, score {}",
            broken_links.len(),
            mixed_content.len(),
            score
        );

        Ok(LinkAuditReport {
            url: target.url.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_links,
            broken_links,
            mixed_content,
            internal_links,
            external_links,
            score,
        })
    }
}

fn partition_counts(links: &[String], target_host: &str) -> (usize, usize) {
    let mut internal = 0;
    let mut external = 0;

    for link in links {
        match Url::parse(link).ok().and_then(|u| u.host_str().map(String::from)) {
            Some(host) if host == target_host => internal += 1,
            Some(_) => external += 1,
            None => {}
        }
    }

    (internal, external)
}

/// Embedded http:// resources on an https page. Anchors are navigation, not
/// mixed content.
pub fn find_mixed_content(
    resources: &[ExtractedResource],
    page_is_https: bool,
) -> Vec<MixedContentItem> {
    if !page_is_https {
        return Vec::new();
    }

    resources
        .iter()
        .filter(|resource| resource.kind != ResourceKind::Anchor)
        .filter(|resource| resource.url.starts_with("http://"))
        .map(|resource| MixedContentItem {
            url: resource.url.clone(),
            resource_type: resource.kind.as_str().to_string(),
            severity: Severity::High,
        })
        .collect()
}
