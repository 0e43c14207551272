// src/doh/state.rs

use crate::config::Config;
use crate::upstream::Forwarder;
use std::sync::Arc;

/// 应用程序状态结构体
#[derive(Clone)]
pub struct AppState {
    /// 中继转发器
    pub forwarder: Arc<Forwarder>,
    /// 只读配置
    pub config: Arc<Config>,
}
