// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Exposed File Prober
 * Probes well-known sensitive paths and confirms exposure by content
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::ScannerResult;
use crate::http_client::{HttpClient, HttpResponse};
use crate::orchestrator::{FetchJob, FetchOrchestrator, ScanCancellation};
use crate::scoring::EXPOSED_FILES_WEIGHTS;
use crate::types::{ScanTarget, Severity};

/// One sensitive path to probe. A 404 on these is the desired outcome; a
/// 200 still needs the content predicate to confirm before it reports.
struct FileProbe {
    path: &'static str,
    category: &'static str,
    severity: Severity,
    confirms: fn(&HttpResponse) -> bool,
}

const PROBES: &[FileProbe] = &[
    FileProbe {
        path: ".env",
        category: "Config/System",
        severity: Severity::Critical,
        confirms: looks_like_env,
    },
    FileProbe {
        path: ".env.local",
        category: "Config/System",
        severity: Severity::Critical,
        confirms: looks_like_env,
    },
    FileProbe {
        path: ".git/HEAD",
        category: "VCS",
        severity: Severity::Critical,
        confirms: looks_like_git_head,
    },
    FileProbe {
        path: ".git/config",
        category: "VCS",
        severity: Severity::Critical,
        confirms: |r| r.contains("[core]"),
    },
    FileProbe {
        path: ".htpasswd",
        category: "Config/System",
        severity: Severity::Critical,
        confirms: looks_like_htpasswd,
    },
    FileProbe {
        path: ".htaccess",
        category: "Config/System",
        severity: Severity::Medium,
        confirms: |r| {
            !looks_like_html(&r.body)
                && (r.contains("Rewrite") || r.contains("Deny") || r.contains("<Files"))
        },
    },
    FileProbe {
        path: "id_rsa",
        category: "Key Material",
        severity: Severity::Critical,
        confirms: |r| r.contains("PRIVATE KEY"),
    },
    FileProbe {
        path: "wp-config.php.bak",
        category: "Config/System",
        severity: Severity::Critical,
        confirms: |r| r.contains("DB_PASSWORD"),
    },
    FileProbe {
        path: "backup.sql",
        category: "Backup",
        severity: Severity::High,
        confirms: looks_like_sql_dump,
    },
    FileProbe {
        path: "dump.sql",
        category: "Backup",
        severity: Severity::High,
        confirms: looks_like_sql_dump,
    },
    FileProbe {
        path: "database.sql",
        category: "Backup",
        severity: Severity::High,
        confirms: looks_like_sql_dump,
    },
    FileProbe {
        path: "backup.zip",
        category: "Backup",
        severity: Severity::High,
        confirms: |r| r.body.starts_with("PK"),
    },
    FileProbe {
        path: "phpinfo.php",
        category: "Info Disclosure",
        severity: Severity::Medium,
        confirms: |r| r.contains("phpinfo()") || r.contains("PHP Version"),
    },
    FileProbe {
        path: "server-status",
        category: "Info Disclosure",
        severity: Severity::Medium,
        confirms: |r| r.contains("Apache Server Status"),
    },
    FileProbe {
        path: ".DS_Store",
        category: "System",
        severity: Severity::Low,
        confirms: |r| r.contains("Bud1"),
    },
];

fn looks_like_env(response: &HttpResponse) -> bool {
    if looks_like_html(&response.body) {
        return false;
    }
    response
        .body
        .lines()
        .filter(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .any(|line| {
            line.split_once('=')
                .map(|(key, _)| {
                    !key.is_empty()
                        && key
                            .chars()
                            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
                })
                .unwrap_or(false)
        })
}

fn looks_like_git_head(response: &HttpResponse) -> bool {
    let body = response.body.trim_start();
    body.starts_with("ref:")
        || (body.chars().take(40).filter(|c| c.is_ascii_hexdigit()).count() == 40)
}

fn looks_like_htpasswd(response: &HttpResponse) -> bool {
    !looks_like_html(&response.body)
        && response
            .body
            .lines()
            .any(|line| line.contains(':') && !line.trim().is_empty())
}

fn looks_like_sql_dump(response: &HttpResponse) -> bool {
    response.contains("INSERT INTO")
        || response.contains("CREATE TABLE")
        || response.contains("-- MySQL dump")
}

/// Soft-404 pages confirm nothing
fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start().to_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposedFile {
    pub file: String,
    pub url: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposedFilesReport {
    pub url: String,
    pub timestamp: String,
    pub exposed_files: Vec<ExposedFile>,
    pub scanned_count: usize,
    pub score: u8,
}

pub struct ExposedFilesCheck {
    orchestrator: FetchOrchestrator,
    config: AppConfig,
}

impl ExposedFilesCheck {
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
    ) -> ScannerResult<ExposedFilesReport> {
        info!("[ExposedFiles] Probing {} paths on {}", PROBES.len(), target.url);

        let probed: Vec<(&FileProbe, String)> = PROBES
            .iter()
            .filter_map(|probe| {
                target
                    .url
                    .join(probe.path)
                    .ok()
                    .map(|url| (probe, url.to_string()))
            })
            .collect();

        let jobs: Vec<FetchJob> = probed
            .iter()
            .map(|(_, url)| {
                FetchJob::derived(
                    url.clone(),
                    self.config.probe_timeout_secs,
                    self.config.max_body_bytes,
                )
            })
            .collect();

        let scanned_count = jobs.len();
        let results = self.orchestrator.fetch_all(jobs, cancel).await;

        let mut exposed_files = Vec::new();
        for ((probe, _), result) in probed.iter().zip(results.iter()) {
            let Some(response) = result.outcome.response() else {
                // Timeouts and refused connections mean "not exposed" here
                continue;
            };

            if response.status_code != 200 {
                continue;
            }

            if (probe.confirms)(response) {
                debug!("[ExposedFiles] Confirmed exposure: {}", result.job.url);
                exposed_files.push(ExposedFile {
                    file: probe.path.to_string(),
                    url: result.job.url.clone(),
                    severity: probe.severity,
                    category: probe.category.to_string(),
                });
            }
        }

        let score =
            EXPOSED_FILES_WEIGHTS.score(exposed_files.iter().map(|f| f.severity), 0);

        info!(
            "[ExposedFiles] Completed: {} of {} paths exposed, score {}",
            exposed_files.len(),
            scanned_count,
            score
        );

        Ok(ExposedFilesReport {
            url: target.url.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            exposed_files,
            scanned_count,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(body: &str) -> HttpResponse {
        HttpResponse {
            status_code: 200,
            headers: HashMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_env_predicate_accepts_assignments() {
        assert!(looks_like_env(&response("DB_HOST=localhost\nDB_PASS=secret")));
        assert!(looks_like_env(&response("# comment\nAPI_KEY=abc123")));
    }

    #[test]
    fn test_env_predicate_rejects_html_error_pages() {
        assert!(!looks_like_env(&response("<!DOCTYPE html><html>404</html>")));
        assert!(!looks_like_env(&response("plain text with no assignments")));
    }

    #[test]
    fn test_git_head_predicate() {
        assert!(looks_like_git_head(&response("ref: refs/heads/main\n")));
        assert!(looks_like_git_head(&response(
            "0123456789abcdef0123456789abcdef01234567\n"
        )));
        assert!(!looks_like_git_head(&response("<html>not a repo</html>")));
    }

    #[test]
    fn test_sql_dump_predicate() {
        assert!(looks_like_sql_dump(&response(
            "CREATE TABLE users (id INT);\nINSERT INTO users VALUES (1);"
        )));
        assert!(!looks_like_sql_dump(&response("hello world")));
    }

    #[test]
    fn test_probe_table_contains_env() {
        let env = PROBES.iter().find(|p| p.path == ".env").unwrap();
        assert_eq!(env.severity, Severity::Critical);
        assert_eq!(env.category, "Config/System");
    }
}
