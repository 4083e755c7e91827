// src/config.rs

pub mod file;

use self::file::load_external_config;
use crate::{
    cli::Cli,
    constants,
    error::{AppError, AppResult},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// 一个 OpenEdX 站点的配置。创建后不可变，显式传递给解析器、提取器和客户端。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformConfig {
    pub key: String,
    pub base_url: String,
    /// 课程目录所在容器的 CSS 选择器
    pub courseware_selector: String,
}

impl PlatformConfig {
    pub fn new(key: &str, base_url: &str, courseware_selector: &str) -> Self {
        Self {
            key: key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            courseware_selector: courseware_selector.to_string(),
        }
    }

    /// 以给定地址为根的平台，选择器与 edX 相同。测试中用于指向模拟服务器。
    pub fn for_base_url(base_url: &str) -> Self {
        Self::new("custom", base_url, DEFAULT_COURSEWARE_SELECTOR)
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, constants::paths::LOGIN)
    }

    pub fn homepage_url(&self) -> String {
        self.login_url()
    }

    pub fn dashboard_url(&self) -> String {
        format!("{}{}", self.base_url, constants::paths::DASHBOARD)
    }

    /// 将页面中的相对链接补全为绝对地址，已是绝对地址的原样返回
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }
}

const DEFAULT_COURSEWARE_SELECTOR: &str = r#"nav[aria-label="Course Navigation"]"#;

pub fn builtin_platforms() -> Vec<PlatformConfig> {
    vec![
        PlatformConfig::new("edx", "https://courses.edx.org", DEFAULT_COURSEWARE_SELECTOR),
        PlatformConfig::new(
            "stanford",
            "https://lagunita.stanford.edu",
            DEFAULT_COURSEWARE_SELECTOR,
        ),
        PlatformConfig::new(
            "usyd-sit",
            "http://online.it.usyd.edu.au",
            DEFAULT_COURSEWARE_SELECTOR,
        ),
        PlatformConfig::new(
            "fun",
            "https://www.france-universite-numerique-mooc.fr",
            r#"section[aria-label="Menu du cours"]"#,
        ),
        PlatformConfig::new(
            "gwu-seas",
            "http://openedx.seas.gwu.edu",
            DEFAULT_COURSEWARE_SELECTOR,
        ),
        PlatformConfig::new(
            "gwu-open",
            "http://mooc.online.gwu.edu",
            DEFAULT_COURSEWARE_SELECTOR,
        ),
        PlatformConfig::new(
            "mitprox",
            "https://mitprofessionalx.mit.edu",
            DEFAULT_COURSEWARE_SELECTOR,
        ),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub max_workers: Option<usize>,
}

/// `~/.edx-dl/config.json` 的内容，所有字段均可省略
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    /// 额外的平台，同名时覆盖内置平台
    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_dl_bin: Option<String>,
}

impl ExternalConfig {
    pub fn all_platforms(&self) -> Vec<PlatformConfig> {
        let mut platforms = builtin_platforms();
        for custom in &self.platforms {
            match platforms.iter_mut().find(|p| p.key == custom.key) {
                Some(existing) => *existing = custom.clone(),
                None => platforms.push(custom.clone()),
            }
        }
        platforms
    }

    pub fn resolve_platform(&self, key: &str) -> AppResult<PlatformConfig> {
        let platforms = self.all_platforms();
        platforms
            .iter()
            .find(|p| p.key == key)
            .cloned()
            .ok_or_else(|| {
                let keys: Vec<&str> = platforms.iter().map(|p| p.key.as_str()).collect();
                AppError::UnknownPlatform(key.to_string(), keys.join(", "))
            })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub platform: Arc<PlatformConfig>,
    pub max_workers: usize,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub output_dir: PathBuf,
    pub video_format: Option<String>,
    pub with_subtitles: bool,
    pub youtube_options: Vec<String>,
    pub youtube_dl_bin: String,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        Self::from_external(args, load_external_config()?)
    }

    pub fn from_external(args: &Cli, external: ExternalConfig) -> AppResult<Self> {
        let platform = external.resolve_platform(&args.platform)?;
        let max_workers = args
            .workers
            .or(external.network.max_workers)
            .unwrap_or(constants::DEFAULT_WORKERS)
            .max(1);

        Ok(Self {
            platform: Arc::new(platform),
            max_workers,
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(external.network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(external.network.timeout_secs.unwrap_or(60)),
            max_retries: external.network.max_retries.unwrap_or(3),
            output_dir: args.output_dir.clone(),
            video_format: args.format.clone(),
            with_subtitles: args.subtitles,
            youtube_options: args
                .youtube_options
                .split_whitespace()
                .map(String::from)
                .collect(),
            youtube_dl_bin: external
                .youtube_dl_bin
                .unwrap_or_else(|| constants::YOUTUBE_DL_BIN.to_string()),
        })
    }

    /// 传给外部下载程序的格式参数，总是以 mp4 兜底
    pub fn video_format_spec(&self) -> String {
        match &self.video_format {
            Some(format) => format!("{}/{}", format, constants::DEFAULT_VIDEO_FORMAT),
            None => constants::DEFAULT_VIDEO_FORMAT.to_string(),
        }
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platform: Arc::new(PlatformConfig::for_base_url("http://127.0.0.1")),
            max_workers: 4,
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            output_dir: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            video_format: None,
            with_subtitles: false,
            youtube_options: Vec::new(),
            youtube_dl_bin: constants::YOUTUBE_DL_BIN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_absolute_url() {
        let platform = PlatformConfig::new("edx", "https://courses.edx.org/", "nav");
        assert_eq!(
            platform.absolute_url("/courses/x/info"),
            "https://courses.edx.org/courses/x/info"
        );
        assert_eq!(
            platform.absolute_url("static/a.pdf"),
            "https://courses.edx.org/static/a.pdf"
        );
        assert_eq!(platform.absolute_url("http://cdn/a.pdf"), "http://cdn/a.pdf");
        assert_eq!(platform.dashboard_url(), "https://courses.edx.org/dashboard");
    }

    #[test]
    fn test_resolve_platform() {
        let external = ExternalConfig {
            platforms: vec![
                PlatformConfig::new("edx", "https://edx.example", "nav"),
                PlatformConfig::new("mine", "https://mine.example", "nav"),
            ],
            ..Default::default()
        };
        assert_eq!(
            external.resolve_platform("edx").unwrap().base_url,
            "https://edx.example"
        );
        assert!(external.resolve_platform("mine").is_ok());
        assert!(external.resolve_platform("stanford").is_ok());
        assert!(matches!(
            external.resolve_platform("nope"),
            Err(AppError::UnknownPlatform(..))
        ));
    }

    #[test]
    fn test_app_config_from_args() {
        let args = Cli::parse_from([
            "edx-dl",
            "-u",
            "me@example.com",
            "-p",
            "secret",
            "-f",
            "webm",
            "-s",
            "-x",
            "stanford",
            "--youtube-options",
            "--rate-limit 50K  --no-part",
        ]);
        let config = AppConfig::from_external(&args, ExternalConfig::default()).unwrap();
        assert_eq!(config.platform.key, "stanford");
        assert_eq!(config.video_format_spec(), "webm/mp4");
        assert!(config.with_subtitles);
        assert_eq!(config.youtube_options, vec!["--rate-limit", "50K", "--no-part"]);
        assert_eq!(config.max_workers, constants::DEFAULT_WORKERS);
    }
}
