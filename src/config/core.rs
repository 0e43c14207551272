use crate::r#const::{http_client_limits, server_defaults};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validate_socket_addr;

// 自定义验证函数 - 验证路径前缀（空字符串表示不限制）
fn validate_path_prefix(server: &ServerConfig) -> Result<(), ValidationError> {
    if !server.path_prefix.is_empty() && !server.path_prefix.starts_with('/') {
        return Err(ValidationError::new("path_prefix_must_start_with_slash"));
    }
    Ok(())
}

fn validate_server_listen(server: &ServerConfig) -> Result<(), ValidationError> {
    validate_socket_addr(&server.listen)
}

fn validate_admin_listen(admin: &AdminConfig) -> Result<(), ValidationError> {
    validate_socket_addr(&admin.listen)
}

// 自定义验证函数 - 代理地址必须是合法 URL
fn validate_proxy(http_client: &HttpClientConfig) -> Result<(), ValidationError> {
    match &http_client.proxy {
        Some(proxy) => url::Url::parse(proxy)
            .map(|_| ())
            .map_err(|_| ValidationError::new("invalid_proxy_url")),
        None => Ok(()),
    }
}

// HTTP客户端配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_proxy", message = "Invalid proxy URL"))]
pub struct HttpClientConfig {
    // 连接超时（秒）
    #[serde(default = "default_connect_timeout")]
    #[validate(range(
        min = http_client_limits::MIN_CONNECT_TIMEOUT,
        max = http_client_limits::MAX_CONNECT_TIMEOUT,
        message = "Connect timeout is out of range"
    ))]
    pub connect_timeout: u64,
    // 请求超时（秒），即每个上游的截止时间
    #[serde(default = "default_request_timeout")]
    #[validate(range(
        min = http_client_limits::MIN_REQUEST_TIMEOUT,
        max = http_client_limits::MAX_REQUEST_TIMEOUT,
        message = "Request timeout is out of range"
    ))]
    pub request_timeout: u64,
    // 空闲连接超时（秒）（可选）
    #[serde(default = "default_idle_timeout")]
    #[validate(range(
        min = http_client_limits::MIN_IDLE_TIMEOUT,
        max = http_client_limits::MAX_IDLE_TIMEOUT,
        message = "Idle timeout is out of range"
    ))]
    pub idle_timeout: Option<u64>,
    // TCP Keepalive（秒）（可选）
    #[serde(default = "default_keepalive")]
    #[validate(range(
        min = http_client_limits::MIN_KEEPALIVE,
        max = http_client_limits::MAX_KEEPALIVE,
        message = "Keepalive is out of range"
    ))]
    pub keepalive: Option<u32>,
    // HTTP用户代理（可选）
    #[serde(default)]
    pub agent: Option<String>,
    // 访问上游使用的代理（可选），未设置时沿用系统代理环境变量
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_connect_timeout() -> u64 {
    http_client_limits::DEFAULT_CONNECT_TIMEOUT
}

fn default_request_timeout() -> u64 {
    http_client_limits::DEFAULT_REQUEST_TIMEOUT
}

fn default_idle_timeout() -> Option<u64> {
    Some(http_client_limits::DEFAULT_IDLE_TIMEOUT)
}

fn default_keepalive() -> Option<u32> {
    Some(http_client_limits::DEFAULT_KEEPALIVE)
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            idle_timeout: default_idle_timeout(),
            keepalive: default_keepalive(),
            agent: None,
            proxy: None,
        }
    }
}

// 服务器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[validate(schema(
    function = "validate_server_listen",
    message = "Invalid server listen address"
))]
#[validate(schema(
    function = "validate_path_prefix",
    message = "Path prefix must be empty or start with '/'"
))]
pub struct ServerConfig {
    // HTTP监听地址
    pub listen: String,
    // 路径前缀，空字符串允许所有路径
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

fn default_path_prefix() -> String {
    server_defaults::DEFAULT_PATH_PREFIX.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: server_defaults::DEFAULT_HTTP_LISTEN.to_string(),
            path_prefix: default_path_prefix(),
        }
    }
}

// 管理服务器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[validate(schema(
    function = "validate_admin_listen",
    message = "Invalid admin listen address"
))]
pub struct AdminConfig {
    // 管理服务器监听地址
    pub listen: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            listen: server_defaults::DEFAULT_ADMIN_LISTEN.to_string(),
        }
    }
}

// 辅助端点开关
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EndpointsConfig {
    // 是否提供 /health
    #[serde(default = "default_health")]
    pub health: bool,
    // 是否在 / 提供静态页面
    #[serde(default)]
    pub index_page: bool,
}

fn default_health() -> bool {
    true
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            health: default_health(),
            index_page: false,
        }
    }
}
