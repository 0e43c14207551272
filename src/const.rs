// 应用常量定义

//
// 配置参数限制常量
//

// 应用关闭等待时间限制
pub mod shutdown_timeout {
    // 默认值
    pub const DEFAULT: u64 = 30;
    // 最小值
    pub const MIN: u64 = 1;
    // 最大值
    pub const MAX: u64 = 120;
}

// HTTP客户端配置限制
pub mod http_client_limits {
    // 默认连接超时（秒）
    pub const DEFAULT_CONNECT_TIMEOUT: u64 = 3;
    // 最小连接超时（秒）
    pub const MIN_CONNECT_TIMEOUT: u64 = 1;
    // 最大连接超时（秒）
    pub const MAX_CONNECT_TIMEOUT: u64 = 120;
    // 默认请求超时（秒）
    pub const DEFAULT_REQUEST_TIMEOUT: u64 = 5;
    // 最小请求超时（秒）
    pub const MIN_REQUEST_TIMEOUT: u64 = 1;
    // 最大请求超时（秒）
    pub const MAX_REQUEST_TIMEOUT: u64 = 1200;
    // 默认空闲超时（秒）
    pub const DEFAULT_IDLE_TIMEOUT: u64 = 10;
    // 最小空闲超时（秒）
    pub const MIN_IDLE_TIMEOUT: u64 = 5;
    // 最大空闲超时（秒）
    pub const MAX_IDLE_TIMEOUT: u64 = 1800;
    // 默认keepalive时间（秒）
    pub const DEFAULT_KEEPALIVE: u32 = 30;
    // 最小keepalive时间（秒）
    pub const MIN_KEEPALIVE: u32 = 5;
    // 最大keepalive时间（秒）
    pub const MAX_KEEPALIVE: u32 = 600;
}

// 请求体限制
pub mod body_limits {
    // DNS 消息最大长度（字节）
    pub const MAX_DNS_MESSAGE_SIZE: usize = 65535;
}

//
// 指标标签常量
//

// 请求形态标签
pub mod shape_labels {
    // GET + dns 参数
    pub const WIRE_GET: &str = "wire_get";
    // POST 二进制消息
    pub const WIRE_POST: &str = "wire_post";
    // GET JSON 格式
    pub const JSON_GET: &str = "json_get";
}

// 拒绝原因标签
pub mod rejection_labels {
    // 路径前缀不匹配
    pub const PATH_MISMATCH: &str = "path_mismatch";
    // 不支持的请求形态
    pub const UNSUPPORTED_SHAPE: &str = "unsupported_shape";
    // 请求体过大
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    // 请求体读取失败
    pub const BAD_BODY: &str = "bad_body";
}

// 上游错误类型标签
pub mod upstream_error_labels {
    // 非成功状态码
    pub const STATUS: &str = "status";
    // 网络/传输错误
    pub const TRANSPORT: &str = "transport";
}

// 子系统名称
pub mod subsystem_names {
    // 管理服务器子系统
    pub const ADMIN_SERVER: &str = "admin_server";
    // DoH服务器子系统
    pub const DOH_SERVER: &str = "doh_server";
}

// 服务器默认值
pub mod server_defaults {
    // 默认HTTP监听地址
    pub const DEFAULT_HTTP_LISTEN: &str = "127.0.0.1:8080";
    // 默认管理服务器监听地址
    pub const DEFAULT_ADMIN_LISTEN: &str = "127.0.0.1:9000";
    // 默认路径前缀（空字符串表示允许所有路径）
    pub const DEFAULT_PATH_PREFIX: &str = "";
}

// 上游默认值
pub mod upstream_defaults {
    // 默认DoH服务器
    pub const DEFAULT_DOH_SERVER: &str = "https://security.cloudflare-dns.com/dns-query";
}

// 健康检查常量
pub mod health {
    // 健康状态
    pub const STATUS_HEALTHY: &str = "healthy";
    // 服务名称
    pub const SERVICE_NAME: &str = "dohrelay";
    // 服务版本
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

// HTTP头常量
pub mod http_headers {
    // Content-Type 头
    pub const CONTENT_TYPE: &str = "Content-Type";
    // Accept 头
    pub const ACCEPT: &str = "Accept";
    // 标识应答上游的响应头（小写，供 HeaderName::from_static 使用）
    pub const UPSTREAM_SERVER: &str = "x-upstream-server";
    // 允许所有来源
    pub const ALLOW_ALL_ORIGINS: &str = "*";

    // 逐跳头，不转发给客户端
    pub const HOP_BY_HOP: &[&str] = &[
        "connection",
        "keep-alive",
        "proxy-connection",
        "transfer-encoding",
        "upgrade",
        "te",
        "trailer",
    ];

    // 内容类型常量
    pub mod content_types {
        // DNS消息内容类型
        pub const DNS_MESSAGE: &str = "application/dns-message";
        // DNS JSON内容类型
        pub const DNS_JSON: &str = "application/dns-json";
        // 纯文本
        pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
        // HTML页面
        pub const TEXT_HTML: &str = "text/html; charset=utf-8";
    }
}

// 路由路径
pub mod paths {
    // 健康检查路径
    pub const HEALTH: &str = "/health";
    // 首页路径
    pub const INDEX: &str = "/";
    // 指标路径
    pub const METRICS: &str = "/metrics";
    // DNS 查询参数名
    pub const DNS_PARAM: &str = "dns";
}
