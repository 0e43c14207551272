// src/doh/handlers.rs

use crate::config::RelayMode;
use crate::doh::classify::{classify, Rejection, Shape};
use crate::doh::page::index_page;
use crate::doh::state::AppState;
use crate::error::RelayError;
use crate::metrics::METRICS;
use crate::r#const::{body_limits, http_headers, paths, rejection_labels};
use crate::upstream::UpstreamReply;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{debug, error, warn};

/// 处理所有非辅助端点的请求：分类、转发、回写上游响应
pub async fn handle_relay(State(state): State<AppState>, request: Request) -> Response {
    // 记录请求开始时间
    let start_time = Instant::now();

    let (parts, body) = request.into_parts();

    let forward = match classify(
        &parts.method,
        &parts.uri,
        &parts.headers,
        &state.config.server.path_prefix,
    ) {
        Ok(forward) => forward,
        Err(rejection) => return handle_rejection(&state, &parts, rejection),
    };

    METRICS
        .requests_total()
        .with_label_values(&[forward.shape.label()])
        .inc();

    // POST 形态需要缓冲请求体，以便在多个上游之间复用
    let forward = if forward.shape == Shape::WirePost {
        if declared_length(&parts.headers).is_some_and(|len| len > body_limits::MAX_DNS_MESSAGE_SIZE)
        {
            warn!("Rejecting DoH POST body larger than a DNS message");
            METRICS
                .rejected_requests_total()
                .with_label_values(&[rejection_labels::PAYLOAD_TOO_LARGE])
                .inc();
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }

        match axum::body::to_bytes(body, body_limits::MAX_DNS_MESSAGE_SIZE).await {
            Ok(bytes) => forward.with_body(bytes),
            Err(e) => {
                error!("Failed to read DoH POST body: {}", e);
                METRICS
                    .rejected_requests_total()
                    .with_label_values(&[rejection_labels::BAD_BODY])
                    .inc();
                return StatusCode::BAD_REQUEST.into_response();
            }
        }
    } else {
        forward
    };

    let outcome = state.forwarder.relay(&forward).await;

    // 记录处理时间
    let duration = start_time.elapsed();
    METRICS
        .request_duration_seconds()
        .with_label_values(&[forward.shape.label()])
        .observe(duration.as_secs_f64());

    debug!("DoH {} request relayed in {:?}", forward.shape, duration);

    match outcome {
        Ok(reply) => relay_response(reply),
        Err(e) => bad_gateway(state.forwarder.mode(), e),
    }
}

// 未分类的请求：GET / 可能是首页，其余一律 404 空响应体
fn handle_rejection(state: &AppState, parts: &Parts, rejection: Rejection) -> Response {
    if state.config.endpoints.index_page
        && parts.method == Method::GET
        && parts.uri.path() == paths::INDEX
    {
        return index_page();
    }

    debug!(
        "Rejecting {} {}: {}",
        parts.method,
        parts.uri.path(),
        rejection.label()
    );
    METRICS
        .rejected_requests_total()
        .with_label_values(&[rejection.label()])
        .inc();

    StatusCode::NOT_FOUND.into_response()
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    http_headers::HOP_BY_HOP.contains(&name.as_str())
}

/// 将上游响应转换为客户端响应
///
/// 状态码和响应头原样保留（逐跳头除外），响应体以流的方式转发，
/// 并注入 `Access-Control-Allow-Origin: *`；故障转移模式下附加应答上游。
pub fn relay_response(reply: UpstreamReply) -> Response {
    let UpstreamReply {
        response,
        served_by,
    } = reply;

    let status = response.status();
    let mut headers = HeaderMap::with_capacity(response.headers().len() + 2);
    for (name, value) in response.headers() {
        if !is_hop_by_hop(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(http_headers::ALLOW_ALL_ORIGINS),
    );

    if let Some(upstream) = served_by {
        match HeaderValue::from_str(upstream.as_str()) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(http_headers::UPSTREAM_SERVER), value);
            }
            Err(e) => warn!("Cannot encode upstream {} as header: {}", upstream, e),
        }
    }

    let mut client_response = Response::new(Body::from_stream(response.bytes_stream()));
    *client_response.status_mut() = status;
    *client_response.headers_mut() = headers;
    client_response
}

// 所有上游均失败（或单上游网络错误）时回复 502
fn bad_gateway(mode: RelayMode, e: RelayError) -> Response {
    METRICS
        .relay_failures_total()
        .with_label_values(&[mode.as_str()])
        .inc();

    (
        StatusCode::BAD_GATEWAY,
        [(header::CONTENT_TYPE, http_headers::content_types::TEXT_PLAIN)],
        e.to_string(),
    )
        .into_response()
}
