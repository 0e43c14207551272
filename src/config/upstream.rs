use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

use super::validate_url;

// 中继模式枚举
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    // 单上游，原样转发任意状态码
    Single,
    // 多上游顺序故障转移，首个 2xx 胜出
    #[default]
    Failover,
}

impl RelayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMode::Single => "single",
            RelayMode::Failover => "failover",
        }
    }
}

impl fmt::Display for RelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 自定义验证函数 - 所有上游地址必须是 http(s) URL
fn validate_upstream_urls(relay: &RelayConfig) -> Result<(), ValidationError> {
    for upstream in &relay.upstreams {
        validate_url(upstream)?;
    }
    Ok(())
}

// 自定义验证函数 - 单上游模式只能配置一个上游
fn validate_single_mode(relay: &RelayConfig) -> Result<(), ValidationError> {
    if relay.mode == RelayMode::Single && relay.upstreams.len() != 1 {
        return Err(ValidationError::new("single_mode_requires_one_upstream"));
    }
    Ok(())
}

// 中继配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[validate(schema(
    function = "validate_upstream_urls",
    message = "Upstream must be an absolute http(s) URL"
))]
#[validate(schema(
    function = "validate_single_mode",
    message = "Single mode requires exactly one upstream"
))]
pub struct RelayConfig {
    // 中继模式
    #[serde(default)]
    pub mode: RelayMode,
    // 上游 DoH 服务器列表，按声明顺序尝试
    #[validate(length(min = 1, message = "At least one upstream is required"))]
    pub upstreams: Vec<String>,
}
