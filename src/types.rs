// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ScannerError;

/// Severity tier for a finding. Controls score weight and display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Where a piece of content was fetched from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Html,
    Script,
    Stylesheet,
    Header,
}

/// The target of one scan. Immutable for the scan's duration.
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub url: Url,
    pub parsed_host: String,
    pub scheme: String,
}

impl ScanTarget {
    /// Parse and validate a target URL. Only http(s) schemes are accepted.
    pub fn parse(raw: &str) -> Result<Self, ScannerError> {
        let url = Url::parse(raw).map_err(|_| ScannerError::InvalidTarget(raw.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScannerError::InvalidTarget(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        let parsed_host = url
            .host_str()
            .ok_or_else(|| ScannerError::InvalidTarget(raw.to_string()))?
            .to_string();
        let scheme = url.scheme().to_string();

        Ok(Self {
            url,
            parsed_host,
            scheme,
        })
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }
}

/// A surviving, classified, masked detection result included in a report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    #[serde(rename = "type")]
    pub finding_type: String,
    /// Masked representation, safe to display
    pub value: String,
    pub severity: Severity,
    pub source_url: String,
    #[serde(rename = "sourceType")]
    pub source_kind: SourceKind,
    pub context: String,
}

/// Per-severity finding counts for a report summary.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SeveritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeveritySummary {
    pub fn count(severities: impl IntoIterator<Item = Severity>) -> Self {
        let mut summary = Self::default();
        for severity in severities {
            match severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_target_parse() {
        let target = ScanTarget::parse("https://site.example/path").unwrap();
        assert_eq!(target.parsed_host, "site.example");
        assert_eq!(target.scheme, "https");
        assert!(target.is_https());
    }

    #[test]
    fn test_scan_target_rejects_bad_scheme() {
        assert!(ScanTarget::parse("ftp://site.example").is_err());
        assert!(ScanTarget::parse("not a url").is_err());
    }

    #[test]
    fn test_severity_serializes_capitalized() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"Critical\"");
    }

    #[test]
    fn test_summary_counts() {
        let summary = SeveritySummary::count(vec![
            Severity::Critical,
            Severity::High,
            Severity::High,
            Severity::Low,
        ]);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.high, 2);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.total(), 4);
    }
}
