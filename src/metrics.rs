use crate::r#const::paths;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use once_cell::sync::Lazy;
use prometheus::{opts, HistogramVec, IntCounterVec, Registry};
use tracing::error;

// 全局静态指标实例
pub static METRICS: Lazy<RelayMetrics> = Lazy::new(RelayMetrics::new);

// DoH 中继指标
pub struct RelayMetrics {
    registry: Registry,

    // 1. 入站请求指标
    requests_total: IntCounterVec,
    rejected_requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    relay_failures_total: IntCounterVec,

    // 2. 上游 DoH 解析器指标
    upstream_requests_total: IntCounterVec,
    upstream_errors_total: IntCounterVec,
    upstream_duration_seconds: HistogramVec,
}

impl Default for RelayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayMetrics {
    // 创建新的指标收集器
    pub fn new() -> Self {
        let registry = Registry::new();

        // 1. 入站请求指标
        let requests_total = IntCounterVec::new(
            opts!(
                "dohrelay_requests_total",
                "Total DoH requests accepted for relaying, classified by request shape"
            ),
            &["shape"],
        )
        .unwrap();

        let rejected_requests_total = IntCounterVec::new(
            opts!(
                "dohrelay_rejected_requests_total",
                "Total requests rejected before reaching an upstream, classified by reason"
            ),
            &["reason"],
        )
        .unwrap();

        let request_duration_seconds = HistogramVec::new(
            prometheus::histogram_opts!(
                "dohrelay_request_duration_seconds",
                "Time until the upstream answered or the relay gave up, classified by request shape",
                vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            ),
            &["shape"],
        )
        .unwrap();

        let relay_failures_total = IntCounterVec::new(
            opts!(
                "dohrelay_relay_failures_total",
                "Total requests answered with 502 Bad Gateway, classified by relay mode"
            ),
            &["mode"],
        )
        .unwrap();

        // 2. 上游 DoH 解析器指标
        let upstream_requests_total = IntCounterVec::new(
            opts!(
                "dohrelay_upstream_requests_total",
                "Total requests sent to upstream DoH resolvers"
            ),
            &["upstream"],
        )
        .unwrap();

        let upstream_errors_total = IntCounterVec::new(
            opts!(
                "dohrelay_upstream_errors_total",
                "Total upstream failures, classified by upstream and reason (status, transport)"
            ),
            &["upstream", "reason"],
        )
        .unwrap();

        let upstream_duration_seconds = HistogramVec::new(
            prometheus::histogram_opts!(
                "dohrelay_upstream_duration_seconds",
                "Upstream DoH request duration in seconds",
                vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            ),
            &["upstream"],
        )
        .unwrap();

        let metrics = RelayMetrics {
            registry,
            requests_total,
            rejected_requests_total,
            request_duration_seconds,
            relay_failures_total,
            upstream_requests_total,
            upstream_errors_total,
            upstream_duration_seconds,
        };

        // 注册所有指标
        metrics.register_all_metrics();

        metrics
    }

    // 注册所有指标
    fn register_all_metrics(&self) {
        self.registry
            .register(Box::new(self.requests_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.rejected_requests_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.request_duration_seconds.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.relay_failures_total.clone()))
            .unwrap();

        self.registry
            .register(Box::new(self.upstream_requests_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.upstream_errors_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.upstream_duration_seconds.clone()))
            .unwrap();
    }

    // 获取 Prometheus 注册表
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // 导出所有指标为文本格式
    pub fn export_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = String::new();
        encoder.encode_utf8(&metric_families, &mut buffer)?;
        Ok(buffer)
    }

    pub fn requests_total(&self) -> &IntCounterVec {
        &self.requests_total
    }

    pub fn rejected_requests_total(&self) -> &IntCounterVec {
        &self.rejected_requests_total
    }

    pub fn request_duration_seconds(&self) -> &HistogramVec {
        &self.request_duration_seconds
    }

    pub fn relay_failures_total(&self) -> &IntCounterVec {
        &self.relay_failures_total
    }

    pub fn upstream_requests_total(&self) -> &IntCounterVec {
        &self.upstream_requests_total
    }

    pub fn upstream_errors_total(&self) -> &IntCounterVec {
        &self.upstream_errors_total
    }

    pub fn upstream_duration_seconds(&self) -> &HistogramVec {
        &self.upstream_duration_seconds
    }
}

// 提供指标导出路由
pub fn metrics_routes() -> Router {
    Router::new().route(paths::METRICS, get(metrics_handler))
}

async fn metrics_handler() -> impl IntoResponse {
    match METRICS.export_metrics() {
        Ok(buffer) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            buffer,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
