use crate::config::{HttpClientConfig, RelayConfig, RelayMode};
use crate::doh::classify::{ForwardRequest, UpstreamQuery};
use crate::error::{AppError, RelayError};
use crate::r#const::{http_headers, paths};
use crate::upstream::http_client::HttpClient;
use reqwest::Response;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use tracing::{debug, error, info, warn};
use url::Url;

// 上游应答
#[derive(Debug)]
pub struct UpstreamReply {
    // 上游原始响应（状态、头、流式响应体）
    pub response: Response,
    // 故障转移模式下应答的上游，用于 X-Upstream-Server 头
    pub served_by: Option<Url>,
}

// 中继转发器
pub struct Forwarder {
    // 共享的HTTP客户端
    client: ClientWithMiddleware,
    // 上游列表，按声明顺序
    upstreams: Vec<Url>,
    // 中继模式
    mode: RelayMode,
}

impl Forwarder {
    // 创建新的转发器
    pub fn new(relay: &RelayConfig, http_config: &HttpClientConfig) -> Result<Self, AppError> {
        let client = HttpClient::create(http_config)?;
        Self::with_client(relay, client)
    }

    // 使用已有客户端创建转发器
    pub fn with_client(relay: &RelayConfig, client: ClientWithMiddleware) -> Result<Self, AppError> {
        let upstreams = relay
            .upstreams
            .iter()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| AppError::Upstream(format!("Invalid upstream URL {}: {}", raw, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if upstreams.is_empty() {
            return Err(AppError::NoUpstreamAvailable);
        }

        info!(
            "Relay initialized in {} mode with {} upstream(s)",
            relay.mode,
            upstreams.len()
        );

        Ok(Self {
            client,
            upstreams,
            mode: relay.mode,
        })
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    pub fn upstreams(&self) -> &[Url] {
        &self.upstreams
    }

    // 转发请求到上游
    pub async fn relay(&self, request: &ForwardRequest) -> Result<UpstreamReply, RelayError> {
        match self.mode {
            RelayMode::Single => self.relay_single(request).await,
            RelayMode::Failover => self.relay_failover(request).await,
        }
    }

    // 单上游：只调用一次，任何状态码都原样转发
    async fn relay_single(&self, request: &ForwardRequest) -> Result<UpstreamReply, RelayError> {
        let upstream = &self.upstreams[0];

        match self.build_request(upstream, request).send().await {
            Ok(response) => {
                debug!(
                    "Upstream {} answered {} for {} request",
                    upstream,
                    response.status(),
                    request.shape
                );
                Ok(UpstreamReply {
                    response,
                    served_by: None,
                })
            }
            Err(e) => {
                error!("Upstream request failed: {} - {}", upstream, e);
                Err(RelayError::Proxy)
            }
        }
    }

    // 故障转移：按顺序尝试，首个 2xx 胜出，失败时记录最后的错误
    async fn relay_failover(&self, request: &ForwardRequest) -> Result<UpstreamReply, RelayError> {
        let mut last_error = String::new();

        for upstream in &self.upstreams {
            match self.build_request(upstream, request).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(
                        "Upstream {} answered {} for {} request",
                        upstream,
                        response.status(),
                        request.shape
                    );
                    return Ok(UpstreamReply {
                        response,
                        served_by: Some(upstream.clone()),
                    });
                }
                Ok(response) => {
                    warn!(
                        "Upstream {} returned HTTP {}, trying next upstream",
                        upstream,
                        response.status()
                    );
                    last_error = format!("{} returned HTTP {}", upstream, response.status());
                }
                Err(e) => {
                    warn!(
                        "Upstream {} request failed: {}, trying next upstream",
                        upstream, e
                    );
                    last_error = format!("{} request failed: {}", upstream, e);
                }
            }
        }

        error!("All {} upstream(s) failed: {}", self.upstreams.len(), last_error);
        Err(RelayError::Exhausted(last_error))
    }

    // 按转发描述构造上游请求
    fn build_request(&self, upstream: &Url, request: &ForwardRequest) -> RequestBuilder {
        let mut url = upstream.clone();

        match &request.query {
            UpstreamQuery::DnsParam(value) => {
                url.query_pairs_mut().append_pair(paths::DNS_PARAM, value);
            }
            UpstreamQuery::Verbatim(Some(query)) => url.set_query(Some(query)),
            UpstreamQuery::Verbatim(None) => {}
        }

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(http_headers::ACCEPT, request.accept);

        if let Some(content_type) = request.content_type {
            builder = builder.header(http_headers::CONTENT_TYPE, content_type);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        builder
    }
}
