use crate::error::AppError;
use crate::r#const::shutdown_timeout;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

// DNS-over-HTTPS 中继服务
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dohrelay",
    author,
    version,
    about = "Relay DNS-over-HTTPS requests to one upstream resolver or an ordered failover list",
    long_about = "Relay DNS-over-HTTPS requests to upstream resolvers.\n\n\
                  Accepts RFC 8484 GET (dns parameter) and POST (application/dns-message) \
                  requests as well as JSON GET (Accept: application/dns-json) requests, \
                  forwards them unchanged and adds Access-Control-Allow-Origin: * to the answer. \
                  In failover mode upstreams are tried in the configured order until one answers 2xx."
)]
pub struct Args {
    // YAML 配置文件
    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = "./config.yaml",
        help = "Path to the YAML configuration file"
    )]
    pub config: PathBuf,

    // 测试配置
    #[arg(
        short = 't',
        long = "test",
        action = ArgAction::SetTrue,
        help = "Validate the configuration file and exit"
    )]
    pub test_config: bool,

    // 启用调试日志
    #[arg(
        short = 'd',
        long = "debug",
        action = ArgAction::SetTrue,
        help = "Log every classified request and upstream attempt"
    )]
    pub debug: bool,

    // 关闭超时
    #[arg(
        long = "shutdown-timeout",
        value_name = "SECS",
        help = "Seconds to wait for the listeners to stop after SIGINT/SIGTERM",
        default_value_t = shutdown_timeout::DEFAULT
    )]
    pub shutdown_timeout: u64,
}

impl Args {
    // 解析命令行参数
    pub fn parse_args() -> Self {
        Args::parse()
    }

    // 验证参数
    pub fn validation(&self) -> Result<(), AppError> {
        if self.shutdown_timeout < shutdown_timeout::MIN
            || self.shutdown_timeout > shutdown_timeout::MAX
        {
            return Err(AppError::InvalidShutdownTimeout);
        }
        Ok(())
    }
}
