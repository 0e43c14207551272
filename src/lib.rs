pub mod admin;
pub mod args;
pub mod config;
pub mod r#const;
pub mod doh;
pub mod error;
pub mod metrics;
pub mod upstream;

// 重导出常用组件
pub use admin::AdminServer;
pub use args::Args;
pub use config::{Config, RelayMode};
pub use doh::{build_router, AppState, DoHServer};
pub use error::{AppError, RelayError};
pub use metrics::RelayMetrics;
pub use r#const::subsystem_names;
pub use upstream::Forwarder;
