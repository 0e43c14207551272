use assert_matches::assert_matches;
use dohrelay::config::{Config, RelayMode};
use dohrelay::error::ConfigError;
use std::io::Write;
use tempfile::NamedTempFile;

// 辅助函数：创建临时配置文件
fn create_temp_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_basic_config_loading() {
    // 创建一个最小有效配置
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstreams:
    - "https://security.cloudflare-dns.com/dns-query"
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(
        result.is_ok(),
        "Failed to load valid config: {:?}",
        result.err()
    );
    let config = result.unwrap();

    assert_eq!(config.server.listen, "127.0.0.1:8080");
    assert_eq!(
        config.relay.upstreams,
        vec!["https://security.cloudflare-dns.com/dns-query".to_string()]
    );

    // 验证默认值
    assert_eq!(config.relay.mode, RelayMode::Failover); // 默认故障转移
    assert_eq!(config.server.path_prefix, ""); // 默认不限制路径
    assert!(config.admin.is_none()); // 默认无管理服务器
    assert!(config.endpoints.health); // 默认启用健康检查
    assert!(!config.endpoints.index_page); // 默认不提供首页
}

#[test]
fn test_optional_parameters_defaults() {
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  mode: single
  upstreams:
    - "https://dns.google/dns-query"
"#;

    let file = create_temp_config_file(config_content);
    let config = Config::from_file(file.path()).unwrap();

    // 验证 HTTP 客户端默认值
    assert_eq!(config.http_client.connect_timeout, 3); // 默认连接超时
    assert_eq!(config.http_client.request_timeout, 5); // 默认请求超时
    assert_eq!(config.http_client.idle_timeout, Some(10)); // 默认空闲超时
    assert_eq!(config.http_client.keepalive, Some(30)); // 默认 keepalive
    assert!(config.http_client.agent.is_none()); // 默认无用户代理
    assert!(config.http_client.proxy.is_none()); // 默认无代理
}

#[test]
fn test_required_parameters() {
    // 缺少 relay
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
"#;

    let file = create_temp_config_file(config_content);
    assert_matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    );

    // 缺少 server.listen
    let config_content = r#"
server:
  path_prefix: "/dns-query"
relay:
  upstreams:
    - "https://dns.google/dns-query"
"#;

    let file = create_temp_config_file(config_content);
    assert_matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    );

    // 上游列表为空
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstreams: []
"#;

    let file = create_temp_config_file(config_content);
    assert_matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ValidationError(_))
    );
}

#[test]
fn test_missing_file() {
    assert_matches!(
        Config::from_file("/nonexistent/dohrelay/config.yaml"),
        Err(ConfigError::LoadError(_))
    );
}

#[test]
fn test_upstream_url_validation() {
    for upstream in [
        "ftp://dns.example.com/dns-query",
        "dns.google/dns-query",
        "not a url",
    ] {
        let config_content = format!(
            r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstreams:
    - "https://dns.google/dns-query"
    - "{}"
"#,
            upstream
        );

        let result = Config::from_yaml(&config_content);
        assert_matches!(
            result,
            Err(ConfigError::ValidationError(_)),
            "upstream {} should be rejected",
            upstream
        );
    }
}

#[test]
fn test_relay_mode_validation() {
    // 单上游模式只允许一个上游
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  mode: single
  upstreams:
    - "https://dns.google/dns-query"
    - "https://security.cloudflare-dns.com/dns-query"
"#;

    let result = Config::from_yaml(config_content);
    assert_matches!(result, Err(ConfigError::ValidationError(ref msg)) if msg.contains("exactly one upstream"));

    // 未知模式
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  mode: roundrobin
  upstreams:
    - "https://dns.google/dns-query"
"#;

    assert_matches!(
        Config::from_yaml(config_content),
        Err(ConfigError::ParseError(_))
    );

    // 故障转移模式允许单个上游
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  mode: failover
  upstreams:
    - "https://dns.google/dns-query"
"#;

    let config = Config::from_yaml(config_content).unwrap();
    assert_eq!(config.relay.mode, RelayMode::Failover);
}

#[test]
fn test_invalid_socket_address() {
    let config_content = r#"
server:
  listen: "invalid_address"
relay:
  upstreams:
    - "https://dns.google/dns-query"
"#;

    assert_matches!(
        Config::from_yaml(config_content),
        Err(ConfigError::ValidationError(_))
    );

    // 管理服务器地址无效
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
admin:
  listen: "localhost"
relay:
  upstreams:
    - "https://dns.google/dns-query"
"#;

    assert_matches!(
        Config::from_yaml(config_content),
        Err(ConfigError::ValidationError(_))
    );
}

#[test]
fn test_path_prefix_validation() {
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
  path_prefix: "dns-query"
relay:
  upstreams:
    - "https://dns.google/dns-query"
"#;

    assert_matches!(
        Config::from_yaml(config_content),
        Err(ConfigError::ValidationError(_))
    );

    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
  path_prefix: "/dns-query"
relay:
  upstreams:
    - "https://dns.google/dns-query"
"#;

    let config = Config::from_yaml(config_content).unwrap();
    assert_eq!(config.server.path_prefix, "/dns-query");
}

#[test]
fn test_parameter_range_validation() {
    // 连接超时超出范围（太小）
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstreams:
    - "https://dns.google/dns-query"
http_client:
  connect_timeout: 0
"#;

    assert!(Config::from_yaml(config_content).is_err());

    // 请求超时超出范围（太大）
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstreams:
    - "https://dns.google/dns-query"
http_client:
  request_timeout: 5000
"#;

    assert!(Config::from_yaml(config_content).is_err());

    // keepalive 超出范围
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstreams:
    - "https://dns.google/dns-query"
http_client:
  keepalive: 1
"#;

    assert!(Config::from_yaml(config_content).is_err());
}

#[test]
fn test_proxy_validation() {
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstreams:
    - "https://dns.google/dns-query"
http_client:
  proxy: "not a proxy"
"#;

    assert_matches!(
        Config::from_yaml(config_content),
        Err(ConfigError::ValidationError(_))
    );
}

#[test]
fn test_complete_valid_config() {
    let config_content = r#"
server:
  listen: "0.0.0.0:443"
  path_prefix: "/dns-query"
admin:
  listen: "127.0.0.1:9000"
relay:
  mode: failover
  upstreams:
    - "https://security.cloudflare-dns.com/dns-query"
    - "https://dns.google/dns-query"
    - "http://10.0.0.53:8053/dns-query"
endpoints:
  health: false
  index_page: true
http_client:
  connect_timeout: 5
  request_timeout: 10
  idle_timeout: 60
  keepalive: 60
  agent: "dohrelay/0.3"
  proxy: "socks5://127.0.0.1:1080"
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(
        result.is_ok(),
        "Failed to load valid config: {:?}",
        result.err()
    );
    let config = result.unwrap();

    assert_eq!(config.server.listen, "0.0.0.0:443");
    assert_eq!(config.server.path_prefix, "/dns-query");
    assert_eq!(config.admin.as_ref().unwrap().listen, "127.0.0.1:9000");
    assert_eq!(config.relay.mode, RelayMode::Failover);
    assert_eq!(config.relay.upstreams.len(), 3);
    assert_eq!(config.relay.upstreams[2], "http://10.0.0.53:8053/dns-query");
    assert!(!config.endpoints.health);
    assert!(config.endpoints.index_page);
    assert_eq!(config.http_client.connect_timeout, 5);
    assert_eq!(config.http_client.request_timeout, 10);
    assert_eq!(config.http_client.idle_timeout, Some(60));
    assert_eq!(config.http_client.keepalive, Some(60));
    assert_eq!(config.http_client.agent, Some("dohrelay/0.3".to_string()));
    assert_eq!(
        config.http_client.proxy,
        Some("socks5://127.0.0.1:1080".to_string())
    );
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    // 与 YAML 中省略 mode 时的默认值一致
    assert_eq!(config.relay.mode, RelayMode::Failover);
    assert_eq!(config.relay.mode, RelayMode::default());
    assert_eq!(config.relay.upstreams.len(), 1);
}
