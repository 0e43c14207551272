// src/doh/mod.rs
//
// DoH 中继服务器模块，支持三种入站形态:
// - GET + `dns` 查询参数（RFC 8484 线格式）
// - POST + `application/dns-message` 请求体
// - GET + `Accept: application/dns-json`（JSON 格式）
// 以及可选的 /health 与首页端点。

// 子模块定义
pub mod classify;
pub mod handlers;
pub mod health;
pub mod page;
pub mod server;
pub mod state;

// 公开导出
pub use classify::{classify, ForwardRequest, Rejection, Shape, UpstreamQuery};
pub use server::{build_router, DoHServer};
pub use state::AppState;
