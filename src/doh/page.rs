// src/doh/page.rs

use crate::r#const::http_headers::content_types;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

// 首页：一个与 DoH 逻辑无关的浏览器小游戏
const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub fn index_page() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_types::TEXT_HTML)],
        INDEX_HTML,
    )
        .into_response()
}
