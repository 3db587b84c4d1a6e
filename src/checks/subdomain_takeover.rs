// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Subdomain Takeover Check
 * Detects dangling CNAME records pointing at unclaimed third-party services
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::dns::{CnameResolution, DnsClient};
use crate::errors::ScannerResult;
use crate::http_client::{FetchOutcome, HttpClient};
use crate::orchestrator::{FetchJob, FetchOrchestrator, ScanCancellation};
use crate::types::{ScanTarget, Severity};

/// Subdomain takeover service fingerprint
#[derive(Debug)]
pub struct ServiceFingerprint {
    /// Service/provider name
    pub name: &'static str,
    /// CNAME patterns that indicate this service
    pub cname_patterns: &'static [&'static str],
    /// HTTP response body patterns indicating vulnerability
    pub http_signatures: &'static [&'static str],
    /// Whether a dead endpoint alone indicates vulnerability
    pub nxdomain_vulnerable: bool,
    /// Base severity when vulnerable
    pub severity: Severity,
}

/// All supported service fingerprints
pub const SERVICE_FINGERPRINTS: &[ServiceFingerprint] = &[
    ServiceFingerprint {
        name: "AWS S3",
        cname_patterns: &[".s3.amazonaws.com", ".s3-website", "s3.amazonaws.com"],
        http_signatures: &["NoSuchBucket", "The specified bucket does not exist"],
        nxdomain_vulnerable: false,
        severity: Severity::Critical,
    },
    ServiceFingerprint {
        name: "AWS CloudFront",
        cname_patterns: &[".cloudfront.net"],
        http_signatures: &["The request could not be satisfied"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Azure Web Apps",
        cname_patterns: &[".azurewebsites.net", ".azure-mobile.net"],
        http_signatures: &["404 Web Site not found", "Azure Error"],
        nxdomain_vulnerable: true,
        severity: Severity::Critical,
    },
    ServiceFingerprint {
        name: "GitHub Pages",
        cname_patterns: &[".github.io", "github.map.fastly.net"],
        http_signatures: &["There isn't a GitHub Pages site here"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Heroku",
        cname_patterns: &[".herokuapp.com", ".herokucdn.com", ".herokudns.com"],
        http_signatures: &[
            "No such app",
            "herokucdn.com/error-pages/",
            "There's nothing here, yet",
        ],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Shopify",
        cname_patterns: &[".myshopify.com"],
        http_signatures: &["Sorry, this shop is currently unavailable"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Fastly",
        cname_patterns: &[".fastly.net", ".fastlylb.net"],
        http_signatures: &["Fastly error: unknown domain"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Zendesk",
        cname_patterns: &[".zendesk.com"],
        http_signatures: &["Help Center Closed", "This help center no longer exists"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Netlify",
        cname_patterns: &[".netlify.app", ".netlify.com"],
        http_signatures: &["Not Found - Request ID:"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Ghost",
        cname_patterns: &[".ghost.io"],
        http_signatures: &["The thing you were looking for is no longer here"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Surge.sh",
        cname_patterns: &[".surge.sh"],
        http_signatures: &["project not found"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "Tumblr",
        cname_patterns: &[".tumblr.com", "domains.tumblr.com"],
        http_signatures: &["Whatever you were looking for doesn't currently exist"],
        nxdomain_vulnerable: false,
        severity: Severity::Medium,
    },
    ServiceFingerprint {
        name: "Vercel",
        cname_patterns: &[".vercel.app", ".now.sh"],
        http_signatures: &["DEPLOYMENT_NOT_FOUND", "The deployment could not be found"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
    ServiceFingerprint {
        name: "UserVoice",
        cname_patterns: &[".uservoice.com"],
        http_signatures: &["This UserVoice subdomain is currently available"],
        nxdomain_vulnerable: false,
        severity: Severity::High,
    },
];

/// Match a CNAME record to a known takeover-prone service
pub fn match_cname_to_service(cname: &str) -> Option<&'static ServiceFingerprint> {
    let cname_lower = cname.to_lowercase();

    SERVICE_FINGERPRINTS.iter().find(|fingerprint| {
        fingerprint
            .cname_patterns
            .iter()
            .any(|pattern| cname_lower.contains(pattern))
    })
}

/// Which signature, if any, confirms a takeover in a response body
pub fn body_indicates_takeover(
    fingerprint: &ServiceFingerprint,
    body: &str,
) -> Option<&'static str> {
    let body_lower = body.to_lowercase();
    fingerprint
        .http_signatures
        .iter()
        .find(|signature| body_lower.contains(&signature.to_lowercase()))
        .copied()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainTakeoverReport {
    pub hostname: String,
    pub timestamp: String,
    pub vulnerable: bool,
    pub cname: Option<String>,
    pub service: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub struct SubdomainTakeoverCheck {
    orchestrator: FetchOrchestrator,
    dns: Arc<DnsClient>,
    config: AppConfig,
}

impl SubdomainTakeoverCheck {
    pub fn new(client: Arc<HttpClient>, dns: Arc<DnsClient>, config: AppConfig) -> Self {
        let orchestrator = FetchOrchestrator::new(client, config.batch_size);
        Self {
            orchestrator,
            dns,
            config,
        }
    }

    pub async fn run(
        &self,
        target: &ScanTarget,
        cancel: &ScanCancellation,
    ) -> ScannerResult<SubdomainTakeoverReport> {
        let hostname = target.parsed_host.clone();
        info!("[SubdomainTakeover] Checking {}", hostname);

        let report = |vulnerable, cname, service, status: &str, details| SubdomainTakeoverReport {
            hostname: hostname.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            vulnerable,
            cname,
            service,
            status: status.to_string(),
            details,
        };

        // DNS stage runs before any fetch
        let cname = match self.dns.resolve_cname(&hostname).await {
            CnameResolution::Cname(cname) => cname,
            CnameResolution::NoRecord => {
                // Terminal state: nothing dangling without a CNAME
                info!("[SubdomainTakeover] {} has no CNAME record", hostname);
                return Ok(report(false, None, None, "no CNAME", None));
            }
            CnameResolution::NxDomain => {
                return Ok(report(
                    false,
                    None,
                    None,
                    "NXDOMAIN",
                    Some("Hostname does not resolve".to_string()),
                ));
            }
        };

        debug!("[SubdomainTakeover] {} CNAME -> {}", hostname, cname);

        let Some(fingerprint) = match_cname_to_service(&cname) else {
            return Ok(report(
                false,
                Some(cname),
                None,
                "CNAME target is not a known service",
                None,
            ));
        };

        // HTTP verification against both schemes
        let mut connection_failures = 0;
        for scheme in ["https", "http"] {
            if cancel.is_cancelled() {
                break;
            }

            let url = format!("{}://{}", scheme, hostname);
            let job = FetchJob::primary(
                url,
                self.config.primary_timeout_secs,
                self.config.max_body_bytes,
            );
            let result = self.orchestrator.fetch_one(job, cancel).await;

            match &result.outcome {
                FetchOutcome::Success(response) => {
                    if let Some(signature) = body_indicates_takeover(fingerprint, &response.body) {
                        info!(
                            "[ALERT] Subdomain takeover found: {} -> {} ({})",
                            hostname, cname, fingerprint.name
                        );
                        return Ok(report(
                            true,
                            Some(cname),
                            Some(fingerprint.name.to_string()),
                            "vulnerable",
                            Some(format!(
                                "HTTP response contains takeover signature: '{}'",
                                signature
                            )),
                        ));
                    }
                }
                FetchOutcome::NetworkError(_) | FetchOutcome::Timeout => {
                    connection_failures += 1;
                }
                _ => {}
            }
        }

        // A dead endpoint behind a decommission-prone service is itself the
        // signal for NXDOMAIN-vulnerable providers
        if fingerprint.nxdomain_vulnerable && connection_failures == 2 {
            info!(
                "[ALERT] Subdomain takeover found: {} -> {} ({}, unclaimed endpoint)",
                hostname, cname, fingerprint.name
            );
            return Ok(report(
                true,
                Some(cname),
                Some(fingerprint.name.to_string()),
                "vulnerable",
                Some("CNAME target appears unclaimed: endpoint does not respond".to_string()),
            ));
        }

        info!(
            "[SubdomainTakeover] {} -> {} ({}) responding normally",
            hostname, cname, fingerprint.name
        );

        Ok(report(
            false,
            Some(cname),
            Some(fingerprint.name.to_string()),
            "service responding normally",
            None,
        ))
    }
}
