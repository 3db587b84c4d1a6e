// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Check Specializations
 * Thin drivers wiring the engine into per-check report shapes
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod cdn_resources;
pub mod exposed_files;
pub mod link_audit;
pub mod secrets;
pub mod subdomain_takeover;

pub use cdn_resources::{CdnResourcesCheck, CdnResourcesReport};
pub use exposed_files::{ExposedFilesCheck, ExposedFilesReport};
pub use link_audit::{LinkAuditCheck, LinkAuditReport};
pub use secrets::{SecretsCheck, SecretsReport};
pub use subdomain_takeover::{SubdomainTakeoverCheck, SubdomainTakeoverReport};
