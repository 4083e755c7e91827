// src/lib.rs

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod pool;
pub mod selection;
pub mod symbols;
pub mod transcript;
pub mod ui;
pub mod utils;
pub mod workflows;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    downloader::DownloadManager,
    error::AppResult,
};
use log::debug;
use std::sync::Arc;

/// 下载阶段共享的状态和工具
#[derive(Clone)]
pub struct DownloadJobContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: course_urls={:?}, platform={}", args.course_urls, args.platform);
    let config = Arc::new(AppConfig::new(&args)?);
    debug!(
        "加载的应用配置: platform={}, workers={}, output={:?}",
        config.platform.key, config.max_workers, config.output_dir
    );
    workflows::run(&args, config).await
}
