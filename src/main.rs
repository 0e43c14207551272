use anyhow::Context;
use dohrelay::{subsystem_names, AdminServer, Args, Config, DoHServer, Forwarder};
use mimalloc::MiMalloc;
use std::process;
use std::sync::Arc;
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};
use tracing::{error, info, warn};

// 使用 mimalloc 分配器提高内存效率
#[global_allocator]
static GLOBAL: MiMalloc = mimalloc::MiMalloc;

fn init_logging(args: &Args) {
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_line_number(false);

    // 如果启用调试模式，输出调试信息，否则只输出 info 及以上级别
    if args.debug {
        builder.with_max_level(tracing::Level::DEBUG)
    } else {
        builder.with_max_level(tracing::Level::INFO)
    }
    .init();
}

// 程序入口
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志
    init_logging(&args);

    // 验证参数
    if let Err(e) = args.validation() {
        error!("Invalid command line arguments: {}", e);
        process::exit(1);
    }

    info!("Starting DoH relay");

    // 加载配置
    let config = match Config::from_file(&args.config) {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration file: {}", e);
            process::exit(1);
        }
    };

    // 如果是测试模式，成功验证配置后退出
    if args.test_config {
        info!("Configuration file validation successful");
        return Ok(());
    }

    // 创建应用组件
    let components = match create_components(config) {
        Ok(components) => components,
        Err(e) => {
            error!("Failed to create application components: {:#}", e);
            process::exit(1);
        }
    };

    // 创建优雅关闭顶层管理器
    let toplevel = Toplevel::new(|s| async move {
        // 启动DoH服务器子系统
        let doh_server = components.doh_server;
        s.start(SubsystemBuilder::new(
            subsystem_names::DOH_SERVER,
            move |s| async move { doh_server.run(s).await },
        ));
        // 启动管理服务器子系统（可选）
        if let Some(admin_server) = components.admin_server {
            s.start(SubsystemBuilder::new(
                subsystem_names::ADMIN_SERVER,
                move |s| async move { admin_server.run(s).await },
            ));
        }
    });

    // 等待关闭
    info!("All services started, waiting for requests...");
    match toplevel
        .catch_signals()
        .handle_shutdown_requests(tokio::time::Duration::from_secs(args.shutdown_timeout))
        .await
    {
        Ok(_) => {
            info!("Application gracefully shut down");
            Ok(())
        }
        Err(e) => {
            error!("Application shutdown error: {}", e);
            process::exit(1);
        }
    }
}

// 应用组件
struct AppComponents {
    // DoH 中继服务器
    doh_server: DoHServer,
    // 管理服务器
    admin_server: Option<AdminServer>,
}

// 创建应用组件
fn create_components(config: Config) -> anyhow::Result<AppComponents> {
    let config = Arc::new(config);

    // 创建转发器
    let forwarder = Arc::new(
        Forwarder::new(&config.relay, &config.http_client)
            .context("Failed to initialize upstream forwarder")?,
    );

    for (index, upstream) in forwarder.upstreams().iter().enumerate() {
        info!("Upstream #{}: {}", index + 1, upstream);
    }

    if config.server.path_prefix.is_empty() {
        info!("Path prefix not set, relaying requests on every path");
    } else {
        info!("Relaying requests under path prefix {}", config.server.path_prefix);
    }

    // 创建管理服务器
    let admin_server = match &config.admin {
        Some(admin_config) => {
            let listen_addr = admin_config
                .listen
                .parse()
                .context("Invalid admin listen address")?;
            Some(AdminServer::new(listen_addr))
        }
        None => {
            warn!("Admin server configuration not provided, metrics endpoint disabled");
            None
        }
    };

    // 创建 DoH 服务器
    let doh_server = DoHServer::new(Arc::clone(&config), forwarder)
        .context("Failed to create DoH relay server")?;

    info!(
        "DoH relay initialized on {} (health: {}, index page: {})",
        config.server.listen, config.endpoints.health, config.endpoints.index_page
    );

    Ok(AppComponents {
        doh_server,
        admin_server,
    })
}
