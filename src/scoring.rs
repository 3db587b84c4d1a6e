// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Deduplicator & Scorer
 * Merges duplicate findings and computes per-check compliance scores
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashSet;

use crate::matcher::RawMatch;
use crate::types::{Severity, SeveritySummary};

/// Per-severity score weights. Every check shares the shape: baseline 100,
/// severity-weighted subtraction, floor at 0, optional capped bonus.
#[derive(Debug, Clone, Copy)]
pub struct ScoreTable {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub bonus_cap: u32,
}

/// Exposed-file probe weights
pub const EXPOSED_FILES_WEIGHTS: ScoreTable = ScoreTable {
    critical: 40,
    high: 20,
    medium: 10,
    low: 5,
    bonus_cap: 0,
};

/// Link-audit weights: broken links carry Medium, mixed content High
pub const LINK_AUDIT_WEIGHTS: ScoreTable = ScoreTable {
    critical: 25,
    high: 15,
    medium: 10,
    low: 3,
    bonus_cap: 0,
};

/// Compliance-style weights used by the CDN/tracking check
pub const COMPLIANCE_WEIGHTS: ScoreTable = ScoreTable {
    critical: 15,
    high: 8,
    medium: 5,
    low: 3,
    bonus_cap: 10,
};

impl ScoreTable {
    fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Score a set of severities: start at 100, subtract per-severity
    /// weights, floor at 0, then add the capped bonus without exceeding 100.
    pub fn score(&self, severities: impl IntoIterator<Item = Severity>, bonus: u32) -> u8 {
        let penalty: u32 = severities.into_iter().map(|s| self.weight(s)).sum();
        let base = 100u32.saturating_sub(penalty);
        let bonus = bonus.min(self.bonus_cap);
        base.saturating_add(bonus).min(100) as u8
    }

    pub fn score_summary(&self, summary: &SeveritySummary, bonus: u32) -> u8 {
        let penalty = self.critical * summary.critical as u32
            + self.high * summary.high as u32
            + self.medium * summary.medium as u32
            + self.low * summary.low as u32;
        let base = 100u32.saturating_sub(penalty);
        let bonus = bonus.min(self.bonus_cap);
        base.saturating_add(bonus).min(100) as u8
    }
}

/// Collapse raw matches sharing `(type, value, source_url)`.
///
/// Runs on the unmasked value, before emission: two hits of the same token
/// at different byte offsets of one file are one finding. First occurrence
/// wins, preserving matcher order.
pub fn dedupe_matches(matches: Vec<RawMatch>) -> Vec<RawMatch> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    matches
        .into_iter()
        .filter(|raw| {
            seen.insert((
                raw.rule_name.to_string(),
                raw.value.clone(),
                raw.source_url.clone(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleCategory;
    use crate::types::SourceKind;

    fn raw(rule_name: &'static str, value: &str, source_url: &str) -> RawMatch {
        RawMatch {
            rule_id: rule_name,
            rule_name,
            category: RuleCategory::ApiToken,
            value: value.to_string(),
            context: String::new(),
            source_url: source_url.to_string(),
            source_kind: SourceKind::Script,
        }
    }

    #[test]
    fn test_dedupe_collapses_identical_triples() {
        let matches = vec![
            raw("GitHub Personal Access Token", "ghp_x", "https://x/a.js"),
            raw("GitHub Personal Access Token", "ghp_x", "https://x/a.js"),
            raw("GitHub Personal Access Token", "ghp_x", "https://x/b.js"),
            raw("Slack Token", "ghp_x", "https://x/a.js"),
        ];

        let deduped = dedupe_matches(matches);
        assert_eq!(deduped.len(), 3);
    }

    #[test]
    fn test_score_floor_at_zero() {
        let severities = vec![Severity::Critical; 5];
        assert_eq!(EXPOSED_FILES_WEIGHTS.score(severities, 0), 0);
    }

    #[test]
    fn test_exposed_files_single_critical() {
        let score = EXPOSED_FILES_WEIGHTS.score(vec![Severity::Critical], 0);
        assert_eq!(score, 60);
    }

    #[test]
    fn test_score_is_monotonically_non_increasing() {
        let mut severities: Vec<Severity> = Vec::new();
        let mut previous = COMPLIANCE_WEIGHTS.score(severities.clone(), 0);

        for severity in [
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ] {
            severities.push(severity);
            let current = COMPLIANCE_WEIGHTS.score(severities.clone(), 0);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_bonus_is_capped_and_never_exceeds_100() {
        assert_eq!(COMPLIANCE_WEIGHTS.score(vec![], 50), 100);
        let score = COMPLIANCE_WEIGHTS.score(vec![Severity::High], 50);
        assert_eq!(score, 100); // 92 + capped bonus 10, clamped to 100
    }

    #[test]
    fn test_score_summary_matches_iter_scoring() {
        let severities = vec![Severity::High, Severity::Medium, Severity::Low];
        let summary = SeveritySummary::count(severities.clone());
        assert_eq!(
            COMPLIANCE_WEIGHTS.score(severities, 0),
            COMPLIANCE_WEIGHTS.score_summary(&summary, 0)
        );
    }
}
