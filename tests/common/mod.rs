// tests/common/mod.rs
//
// 集成测试公共工具：以真实路由在随机端口上启动中继

#![allow(dead_code)]

use dohrelay::upstream::UpstreamObserver;
use dohrelay::{build_router, AppState, Config, Forwarder};
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

// 示例 DNS 查询：example.com A
pub const DNS_QUERY: &[u8] = &[
    0x00, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, b'e', b'x',
    b'a', b'm', b'p', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00, 0x00, 0x01, 0x00, 0x01,
];

// 示例 DNS 应答（内容不会被解析，只需原样返回）
pub const DNS_ANSWER: &[u8] = &[
    0x00, 0x00, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x07, b'e', b'x',
    b'a', b'm', b'p', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00, 0x00, 0x01, 0x00, 0x01, 0xc0,
    0x0c, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x01, 0x2c, 0x00, 0x04, 0x5d, 0xb8, 0xd8, 0x22,
];

// 运行中的中继
pub struct TestRelay {
    pub base_url: String,
    _task: tokio::task::JoinHandle<()>,
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self._task.abort();
    }
}

// 不经过系统代理的 HTTP 客户端
pub fn http_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

// 生成配置 YAML
pub fn relay_yaml(mode: &str, upstreams: &[String], extra: &str) -> String {
    let upstreams = upstreams
        .iter()
        .map(|u| format!("    - \"{}\"", u))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
server:
  listen: "127.0.0.1:0"
relay:
  mode: {}
  upstreams:
{}
{}
"#,
        mode, upstreams, extra
    )
}

// 根据 YAML 配置启动中继
pub async fn start_relay(yaml: &str) -> TestRelay {
    let config = Arc::new(Config::from_yaml(yaml).expect("valid test config"));

    // 与正式客户端相同的超时设置，但不经过系统代理
    let http = Client::builder()
        .no_proxy()
        .connect_timeout(Duration::from_secs(config.http_client.connect_timeout))
        .timeout(Duration::from_secs(config.http_client.request_timeout))
        .build()
        .unwrap();
    let client = ClientBuilder::new(http).with(UpstreamObserver).build();
    let forwarder = Arc::new(Forwarder::with_client(&config.relay, client).unwrap());

    let app = build_router(AppState { forwarder, config });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestRelay {
        base_url: format!("http://{}", addr),
        _task: task,
    }
}

// 获取一个当前无人监听的地址，用于模拟网络失败
pub fn unreachable_upstream() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/dns-query", port)
}
