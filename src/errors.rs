// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scanner Error Types
 * Production error handling with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use thiserror::Error;

/// Main scanner error type.
///
/// Fetch failures on derived resources are deliberately NOT errors: they are
/// carried as `FetchOutcome` variants on the fetch result, because absence of
/// a resource is usually the desired, non-exceptional outcome. This type
/// covers the failures that do abort a check.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Missing or malformed target URL. Never reaches the engine; surfaced
    /// as a 400-class response at the API boundary.
    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    /// The primary target itself could not be fetched. Scan-fatal.
    #[error("Failed to reach target {url}: {reason}")]
    TargetUnreachable { url: String, reason: String },

    /// DNS resolution failure for the takeover check.
    #[error("DNS resolution failed for {host}: {reason}")]
    Dns { host: String, reason: String },

    /// Unexpected failures caught at the top of a check.
    #[error("Scanner error: {0}")]
    Internal(String),
}

pub type ScannerResult<T> = Result<T, ScannerError>;

impl ScannerError {
    /// HTTP status code this error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            ScannerError::InvalidTarget(_) => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ScannerError::InvalidTarget("x".to_string()).status_code(),
            400
        );
        assert_eq!(
            ScannerError::TargetUnreachable {
                url: "https://x".to_string(),
                reason: "timeout".to_string()
            }
            .status_code(),
            500
        );
        assert_eq!(ScannerError::Internal("boom".to_string()).status_code(), 500);
    }
}
