//! REST API handlers

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: i64,
    /// Number of stored assessment sessions
    pub active_sessions: usize,
}

/// Health check endpoint
///
/// Returns server status, version, uptime, and stored session count.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let active_sessions = match state.manager.session_count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to count sessions");
            0
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        active_sessions,
    })
}

/// Axis in the domain catalogue
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSummary {
    pub id: String,
    pub name: String,
    pub pole_low: String,
    pub pole_high: String,
    /// Score range as `[min, max]`
    pub range: [f64; 2],
}

/// Domain with its axes
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub axes: Vec<AxisSummary>,
}

/// Response for the domain catalogue
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainListResponse {
    pub domains: Vec<DomainSummary>,
    /// Total items in the survey
    pub item_count: usize,
}

/// GET /api/spec/domains - List domains and their axes
pub async fn list_domains(State(state): State<Arc<AppState>>) -> Json<DomainListResponse> {
    let spec = state.manager.spec();

    let domains = spec
        .domains()
        .iter()
        .map(|domain| DomainSummary {
            id: domain.id.to_string(),
            name: domain.name.clone(),
            description: domain.description.clone(),
            axes: spec
                .axes_in_domain(&domain.id)
                .map(|axis| AxisSummary {
                    id: axis.id.to_string(),
                    name: axis.name.clone(),
                    pole_low: axis.pole_low.clone(),
                    pole_high: axis.pole_high.clone(),
                    range: [axis.range.min, axis.range.max],
                })
                .collect(),
        })
        .collect();

    Json(DomainListResponse {
        domains,
        item_count: spec.items().len(),
    })
}
