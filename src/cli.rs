// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "edx-dl",
    version = crate_version!(),
    about = "从 OpenEdX 平台下载课程视频、字幕与文档",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    /// 目标课程链接 (例如 https://courses.edx.org/courses/BerkeleyX/CS191x/2013_Spring/info)
    #[arg(value_name = "COURSE_URLS")]
    pub course_urls: Vec<String>,

    // --- 账号 (Account) ---
    /// 登录邮箱
    #[arg(short, long, help_heading = "Account")]
    pub username: String,
    /// 登录密码 (省略时将提示输入)
    #[arg(short, long, help_heading = "Account")]
    pub password: Option<String>,
    /// OpenEdX 平台 (edx, stanford, usyd-sit, fun, gwu-seas, gwu-open, mitprox 或配置文件中的自定义平台)
    #[arg(short = 'x', long, default_value_t = constants::DEFAULT_PLATFORM.to_string(), help_heading = "Account")]
    pub platform: String,

    // --- 浏览 (Browse) ---
    /// 列出可访问的课程并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Browse")]
    pub course_list: bool,
    /// 列出所选课程的章节并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Browse")]
    pub section_list: bool,
    /// 只下载指定序号的章节 (从 1 开始，支持 1,3-5，无效时下载全部)
    #[arg(long, value_name = "N", help_heading = "Browse")]
    pub section_filter: Option<String>,

    // --- 下载选项 (Options) ---
    /// 视频格式 (传给视频下载程序，始终以 mp4 兜底)
    #[arg(short, long, help_heading = "Options")]
    pub format: Option<String>,
    /// 同时下载字幕
    #[arg(short = 's', long = "with-subtitles", action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub subtitles: bool,
    /// 设置文件保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR), help_heading = "Options")]
    pub output_dir: PathBuf,
    /// 额外传给视频下载程序的参数
    #[arg(long, default_value = "", allow_hyphen_values = true, help_heading = "Options")]
    pub youtube_options: String,
    /// 解析页面时的最大并发数
    #[arg(short, long, value_parser = clap::value_parser!(usize), help_heading = "Options")]
    pub workers: Option<usize>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
