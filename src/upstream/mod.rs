// 声明子模块
mod forwarder;
mod http_client;

// 重导出公共API
pub use forwarder::{Forwarder, UpstreamReply};
pub use http_client::{HttpClient, UpstreamObserver};
