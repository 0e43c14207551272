// src/doh/classify.rs
//
// 入站请求分类：判断请求属于三种 DoH 形态中的哪一种，或拒绝。
// 纯函数，不读取请求体，不产生副作用。

use crate::r#const::{http_headers::content_types, paths, rejection_labels, shape_labels};
use axum::http::{header, HeaderMap, Method, Uri};
use bytes::Bytes;
use std::fmt;

/// 支持的请求形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// GET，DNS 线格式消息通过 `dns` 查询参数传递
    WireGet,
    /// POST，请求体为二进制 DNS 消息
    WirePost,
    /// GET，请求 JSON 格式的应答
    JsonGet,
}

impl Shape {
    /// 指标标签
    pub fn label(&self) -> &'static str {
        match self {
            Shape::WireGet => shape_labels::WIRE_GET,
            Shape::WirePost => shape_labels::WIRE_POST,
            Shape::JsonGet => shape_labels::JSON_GET,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 上游 URL 的查询部分如何构造
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamQuery {
    /// 追加 `dns=<value>`
    DnsParam(String),
    /// 原样使用客户端的查询字符串（为空时不追加）
    Verbatim(Option<String>),
}

/// 拒绝原因，均以 404 空响应体回复
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    PathMismatch,
    UnsupportedShape,
}

impl Rejection {
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::PathMismatch => rejection_labels::PATH_MISMATCH,
            Rejection::UnsupportedShape => rejection_labels::UNSUPPORTED_SHAPE,
        }
    }
}

/// 转发描述：由分类步骤生成，对每个上游尝试保持不变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequest {
    pub shape: Shape,
    pub method: Method,
    pub accept: &'static str,
    pub content_type: Option<&'static str>,
    pub query: UpstreamQuery,
    pub body: Option<Bytes>,
}

impl ForwardRequest {
    /// 附加已缓冲的请求体（仅 POST 形态使用）
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }
}

// 读取请求头的字符串值
fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

// 查询字符串中第一个 dns 参数的值（已解码）
fn dns_param(raw_query: Option<&str>) -> Option<String> {
    let raw_query = raw_query?;
    url::form_urlencoded::parse(raw_query.as_bytes())
        .find(|(key, _)| key == paths::DNS_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// 对入站请求分类
///
/// 路径前缀非空且不匹配时直接拒绝；之后依次检查 GET+dns、POST+dns-message、
/// GET+Accept dns-json，首个匹配生效。请求头的值需完全相等。
pub fn classify(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    path_prefix: &str,
) -> Result<ForwardRequest, Rejection> {
    if !path_prefix.is_empty() && !uri.path().starts_with(path_prefix) {
        return Err(Rejection::PathMismatch);
    }

    if *method == Method::GET {
        if let Some(value) = dns_param(uri.query()) {
            return Ok(ForwardRequest {
                shape: Shape::WireGet,
                method: Method::GET,
                accept: content_types::DNS_MESSAGE,
                content_type: None,
                query: UpstreamQuery::DnsParam(value),
                body: None,
            });
        }
    }

    if *method == Method::POST
        && header_str(headers, header::CONTENT_TYPE) == Some(content_types::DNS_MESSAGE)
    {
        return Ok(ForwardRequest {
            shape: Shape::WirePost,
            method: Method::POST,
            accept: content_types::DNS_MESSAGE,
            content_type: Some(content_types::DNS_MESSAGE),
            query: UpstreamQuery::Verbatim(None),
            body: None,
        });
    }

    if *method == Method::GET && header_str(headers, header::ACCEPT) == Some(content_types::DNS_JSON)
    {
        let query = uri
            .query()
            .filter(|query| !query.is_empty())
            .map(str::to_string);
        return Ok(ForwardRequest {
            shape: Shape::JsonGet,
            method: Method::GET,
            accept: content_types::DNS_JSON,
            content_type: None,
            query: UpstreamQuery::Verbatim(query),
            body: None,
        });
    }

    Err(Rejection::UnsupportedShape)
}
