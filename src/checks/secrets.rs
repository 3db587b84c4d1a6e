// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Secrets Scanner
 * Detects leaked credentials in a page and its JavaScript resources
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::classifier::{classify, mask};
use crate::config::AppConfig;
use crate::errors::{ScannerError, ScannerResult};
use crate::extractor::{extract_resources, ResourceKind};
use crate::http_client::HttpClient;
use crate::matcher::{match_rules, RawMatch};
use crate::orchestrator::{FetchJob, FetchOrchestrator, ScanCancellation};
use crate::rules::SECRET_RULES;
use crate::scoring::dedupe_matches;
use crate::suppressor::suppress;
use crate::types::{Finding, ScanTarget, SourceKind};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsReport {
    pub url: String,
    pub timestamp: String,
    pub scanned_files_count: usize,
    pub total_findings: usize,
    pub findings: Vec<Finding>,
    pub scanned_files: Vec<String>,
}

pub struct SecretsCheck {
    orchestrator: FetchOrchestrator,
    config: AppConfig,
}

impl SecretsCheck {
    pub fn new(client: Arc<HttpClient>, config: AppConfig) -> Self {
        let orchestrator = FetchOrchestrator::new(client, config.batch_size);
        Self {
            orchestrator,
            config,
        }
    }

    /// Scan the target page and its scripts for leaked secrets.
    pub async fn run(
        &self,
        target: &ScanTarget,
        cancel: &ScanCancellation,
    ) -> ScannerResult<SecretsReport> {
        info!("[SecretsScan] Starting scan for: {}", target.url);

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

        let mut scanned_files = vec![target.url.to_string()];
        let mut raw_matches: Vec<RawMatch> = match_rules(
            &page.body,
            &SECRET_RULES,
            target.url.as_str(),
            SourceKind::Html,
        );

        // Second wave: fetch the page's scripts and scan each body
        let script_urls: Vec<String> = extract_resources(
            &page.body,
            target.url.as_str(),
            &self.config.resource_caps,
        )
        .into_iter()
        .filter(|resource| resource.kind == ResourceKind::Script)
        .map(|resource| resource.url)
        .collect();

        debug!("[SecretsScan] {} scripts discovered", script_urls.len());

        let script_jobs: Vec<FetchJob> = script_urls
            .iter()
            .map(|url| {
                FetchJob::derived(
                    url.clone(),
                    self.config.derived_timeout_secs,
                    self.config.max_body_bytes,
                )
            })
            .collect();

        for result in self.orchestrator.fetch_all(script_jobs, cancel).await {
            // A script that cannot be fetched yields no findings; that is
            // not an error
            if let Some(script) = result.outcome.response() {
                if script.status_code == 200 {
                    scanned_files.push(result.job.url.clone());
                    raw_matches.extend(match_rules(
                        &script.body,
                        &SECRET_RULES,
                        &result.job.url,
                        SourceKind::Script,
                    ));
                }
            }
        }

        let survivors = suppress(raw_matches);
        let deduped = dedupe_matches(survivors);

        let findings: Vec<Finding> = deduped
            .into_iter()
            .map(|raw| Finding {
                finding_type: raw.rule_name.to_string(),
                value: mask(&raw.value, raw.rule_id),
                severity: classify(raw.rule_id),
                source_url: raw.source_url,
                source_kind: raw.source_kind,
                context: raw.context,
            })
            .collect();

        info!(
            "[SecretsScan] Completed: {} files scanned, {} findings",
            scanned_files.len(),
            findings.len()
        );

        Ok(SecretsReport {
            url: target.url.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            scanned_files_count: scanned_files.len(),
            total_findings: findings.len(),
            findings,
            scanned_files,
        })
    }
}
