// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - DNS Resolution
 * CNAME/TXT/MX lookups for the subdomain-takeover check
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioResolver;
use tracing::debug;

/// Result of a CNAME lookup. NXDOMAIN is distinguished from "resolves but
/// has no CNAME record" because some takeover fingerprints treat NXDOMAIN
/// itself as the vulnerable signal.
#[derive(Debug, Clone, PartialEq)]
pub enum CnameResolution {
    Cname(String),
    NoRecord,
    NxDomain,
}

pub struct DnsClient {
    resolver: TokioResolver,
}

impl DnsClient {
    pub fn new() -> Result<Self> {
        let resolver = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|e| anyhow::anyhow!("Failed to create resolver: {}", e))?
            .build();
        Ok(Self { resolver })
    }

    /// Resolve the CNAME record for a host, if any.
    pub async fn resolve_cname(&self, host: &str) -> CnameResolution {
        match self.resolver.lookup(host, RecordType::CNAME).await {
            Ok(response) => {
                for record in response.iter() {
                    if let Some(cname) = record.as_cname() {
                        let target = cname.0.to_string();
                        debug!("[Dns] {} CNAME {}", host, target);
                        // Strip the trailing root dot for presentation
                        return CnameResolution::Cname(
                            target.trim_end_matches('.').to_string(),
                        );
                    }
                }
                CnameResolution::NoRecord
            }
            Err(e) => {
                if is_nxdomain(&e.to_string()) {
                    CnameResolution::NxDomain
                } else {
                    CnameResolution::NoRecord
                }
            }
        }
    }

    /// Resolve TXT records as strings. Lookup failures yield an empty list.
    pub async fn resolve_txt(&self, host: &str) -> Vec<String> {
        match self.resolver.lookup(host, RecordType::TXT).await {
            Ok(response) => response
                .iter()
                .filter_map(|record| record.as_txt())
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|part| String::from_utf8_lossy(part).to_string())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Resolve MX exchange hosts. Lookup failures yield an empty list.
    pub async fn resolve_mx(&self, host: &str) -> Vec<String> {
        match self.resolver.lookup(host, RecordType::MX).await {
            Ok(response) => response
                .iter()
                .filter_map(|record| record.as_mx())
                .map(|mx| mx.exchange().to_string().trim_end_matches('.').to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn is_nxdomain(error: &str) -> bool {
    let error = error.to_lowercase();
    error.contains("nxdomain") || error.contains("no name")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nxdomain_error_detection() {
        assert!(is_nxdomain("NXDOMAIN response"));
        assert!(is_nxdomain("no name found"));
        assert!(!is_nxdomain("connection timed out"));
    }
}
