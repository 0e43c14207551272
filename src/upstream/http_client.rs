use crate::config::HttpClientConfig;
use crate::error::AppError;
use crate::metrics::METRICS;
use crate::r#const::upstream_error_labels;
use axum::http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use std::time::{Duration, Instant};
use tracing::debug;

pub struct HttpClient;

impl HttpClient {
    // 创建HTTP客户端
    pub fn create(config: &HttpClientConfig) -> Result<ClientWithMiddleware, AppError> {
        debug!("Creating HTTP client for upstreams, config: {:?}", config);

        // 连接超时和请求超时共同构成每个上游的截止时间
        let mut client_builder = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.request_timeout));

        // 配置TCP keepalive
        if let Some(keepalive) = config.keepalive {
            client_builder = client_builder.tcp_keepalive(Duration::from_secs(keepalive as u64));
        }

        // 配置空闲连接超时
        if let Some(idle_timeout) = config.idle_timeout {
            client_builder = client_builder.pool_idle_timeout(Duration::from_secs(idle_timeout));
        }

        // 配置用户代理
        if let Some(ref agent) = config.agent {
            client_builder = client_builder.user_agent(agent);
        }

        // 配置代理
        if let Some(ref proxy_url) = config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| AppError::HttpClient(format!("Proxy configuration error: {}", e)))?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder
            .build()
            .map_err(|e| AppError::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        // 不做重试：每个上游最多尝试一次
        Ok(ClientBuilder::new(client).with(UpstreamObserver).build())
    }
}

// 上游指标标签：去掉查询部分的 URL
fn upstream_label(request: &Request) -> String {
    let mut url = request.url().clone();
    url.set_query(None);
    url.to_string()
}

// 记录每次上游调用的耗时、状态和错误
pub struct UpstreamObserver;

#[async_trait::async_trait]
impl Middleware for UpstreamObserver {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let upstream = upstream_label(&req);
        let method = req.method().clone();
        let start_time = Instant::now();

        METRICS
            .upstream_requests_total()
            .with_label_values(&[&upstream])
            .inc();

        let result = next.run(req, extensions).await;
        let duration = start_time.elapsed();

        METRICS
            .upstream_duration_seconds()
            .with_label_values(&[&upstream])
            .observe(duration.as_secs_f64());

        match &result {
            Ok(response) => {
                debug!(
                    "Upstream {} {} answered {} in {:?}",
                    method,
                    upstream,
                    response.status(),
                    duration
                );
                if !response.status().is_success() {
                    METRICS
                        .upstream_errors_total()
                        .with_label_values(&[&upstream, upstream_error_labels::STATUS])
                        .inc();
                }
            }
            Err(e) => {
                debug!(
                    "Upstream {} {} failed after {:?}: {}",
                    method, upstream, duration, e
                );
                METRICS
                    .upstream_errors_total()
                    .with_label_values(&[&upstream, upstream_error_labels::TRANSPORT])
                    .inc();
            }
        }

        result
    }
}
