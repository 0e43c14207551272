// src/doh/health.rs

use crate::doh::state::AppState;
use crate::r#const::health;
use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub upstreams: Vec<String>,
    pub mode: &'static str,
    pub version: &'static str,
}

/// 处理 /health 请求，与中继逻辑无关
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: health::STATUS_HEALTHY,
        service: health::SERVICE_NAME,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        upstreams: state.config.relay.upstreams.clone(),
        mode: state.forwarder.mode().as_str(),
        version: health::VERSION,
    })
}
