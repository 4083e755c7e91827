// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use edx_dl::{cli::Cli, error::AppError, logger, run_from_cli};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(AppError::UserInterrupt.exit_code());
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "edx-dl".to_string());

    let after_help = format!(
        "示例:\n  # 查看可下载的课程\n  {bin} -u me@example.com --course-list\n\n  # 下载课程的第 2 个章节，包含字幕\n  {bin} -u me@example.com -s --section-filter 2 https://courses.edx.org/courses/BerkeleyX/CS191x/2013_Spring/info\n\n  # 使用其他 OpenEdX 平台\n  {bin} -u me@example.com -x stanford --course-list",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logger::init_logger(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        log::error!("程序执行出错: {}", e);
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(e.exit_code());
    }
}
