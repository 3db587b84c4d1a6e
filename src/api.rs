// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Check API
 * HTTP JSON surface for the five exposure checks
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::checks::{
    CdnResourcesCheck, ExposedFilesCheck, LinkAuditCheck, SecretsCheck, SubdomainTakeoverCheck,
};
use crate::config::AppConfig;
use crate::dns::DnsClient;
use crate::errors::ScannerError;
use crate::http_client::HttpClient;
use crate::orchestrator::ScanCancellation;
use crate::types::ScanTarget;

pub struct ApiState {
    pub client: Arc<HttpClient>,
    pub dns: Arc<DnsClient>,
    pub config: AppConfig,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/checks/secrets", get(secrets_handler))
        .route("/api/checks/exposed-files", get(exposed_files_handler))
        .route("/api/checks/links", get(link_audit_handler))
        .route("/api/checks/cdn-resources", get(cdn_resources_handler))
        .route(
            "/api/checks/subdomain-takeover",
            get(subdomain_takeover_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CheckParams {
    url: Option<String>,
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "statusCode": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<ScannerError> for ApiError {
    fn from(err: ScannerError) -> Self {
        match err.status_code() {
            400 => ApiError::BadRequest(err.to_string()),
            _ => {
                error!("Check failed: {}", err);
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

fn parse_target(params: &CheckParams) -> Result<ScanTarget, ApiError> {
    let raw = params
        .url
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing required parameter: url".to_string()))?;

    ScanTarget::parse(raw).map_err(ApiError::from)
}

/// Targets for the takeover check may be bare hostnames.
fn parse_host_target(params: &CheckParams) -> Result<ScanTarget, ApiError> {
    let raw = params
        .url
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing required parameter: url".to_string()))?;

    ScanTarget::parse(raw)
        .or_else(|_| ScanTarget::parse(&format!("https://{}", raw)))
        .map_err(ApiError::from)
}

async fn secrets_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<CheckParams>,
) -> Result<impl IntoResponse, ApiError> {
    let target = parse_target(&params)?;
    let check = SecretsCheck::new(Arc::clone(&state.client), state.config.clone());
    let report = check.run(&target, &ScanCancellation::new()).await?;
    Ok(Json(report))
}

async fn exposed_files_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<CheckParams>,
) -> Result<impl IntoResponse, ApiError> {
    let target = parse_target(&params)?;
    let check = ExposedFilesCheck::new(Arc::clone(&state.client), state.config.clone());
    let report = check.run(&target, &ScanCancellation::new()).await?;
    Ok(Json(report))
}

async fn link_audit_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<CheckParams>,
) -> Result<impl IntoResponse, ApiError> {
    let target = parse_target(&params)?;
    let check = LinkAuditCheck::new(Arc::clone(&state.client), state.config.clone());
    let report = check.run(&target, &ScanCancellation::new()).await?;
    Ok(Json(report))
}

async fn cdn_resources_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<CheckParams>,
) -> Result<impl IntoResponse, ApiError> {
    let target = parse_target(&params)?;
    let check = CdnResourcesCheck::new(Arc::clone(&state.client), state.config.clone());
    let report = check.run(&target, &ScanCancellation::new()).await?;
    Ok(Json(report))
}

async fn subdomain_takeover_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<CheckParams>,
) -> Result<impl IntoResponse, ApiError> {
    let target = parse_host_target(&params)?;
    let check = SubdomainTakeoverCheck::new(
        Arc::clone(&state.client),
        Arc::clone(&state.dns),
        state.config.clone(),
    );
    let report = check.run(&target, &ScanCancellation::new()).await?;
    Ok(Json(report))
}
