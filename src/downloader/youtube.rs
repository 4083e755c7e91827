// src/downloader/youtube.rs

use crate::{config::AppConfig, error::*};
use log::{debug, info};
use std::{path::Path, process::Stdio};
use tokio::process::Command;

/// 调用外部视频下载程序 (youtube-dl 或兼容程序) 下载单个视频
#[derive(Debug, Clone)]
pub struct VideoDownloader {
    bin: String,
    format_spec: String,
    all_subs: bool,
    extra_options: Vec<String>,
}

impl VideoDownloader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            bin: config.youtube_dl_bin.clone(),
            format_spec: config.video_format_spec(),
            all_subs: config.with_subtitles,
            extra_options: config.youtube_options.clone(),
        }
    }

    pub fn build_args(&self, url: &str, target_dir: &Path, prefix: &str) -> Vec<String> {
        let template = target_dir.join(format!("{}-%(title)s-%(id)s.%(ext)s", prefix));
        let mut args = vec![
            "--ignore-config".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "-f".to_string(),
            self.format_spec.clone(),
        ];
        if self.all_subs {
            args.push("--all-subs".to_string());
        }
        args.extend(self.extra_options.iter().cloned());
        args.push(url.to_string());
        args
    }

    pub async fn download(&self, url: &str, target_dir: &Path, prefix: &str) -> AppResult<()> {
        let args = self.build_args(url, target_dir, prefix);
        info!("下载视频 {} -> {:?}", url, target_dir);
        debug!("{} {}", self.bin, args.join(" "));

        let status = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| AppError::ExternalTool(format!("无法启动 '{}': {}", self.bin, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::ExternalTool(format!(
                "'{}' 处理 {} 时退出，状态: {}",
                self.bin, url, status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloader(all_subs: bool, extra: &[&str]) -> VideoDownloader {
        VideoDownloader {
            bin: "youtube-dl".into(),
            format_spec: "mp4".into(),
            all_subs,
            extra_options: extra.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_build_args() {
        let url = "https://youtube.com/watch?v=abcdefghijk";
        let args = downloader(true, &["--rate-limit", "50K"]).build_args(url, Path::new("out"), "03");
        let template = Path::new("out").join("03-%(title)s-%(id)s.%(ext)s");
        assert_eq!(
            args,
            vec![
                "--ignore-config".to_string(),
                "-o".to_string(),
                template.to_string_lossy().into_owned(),
                "-f".to_string(),
                "mp4".to_string(),
                "--all-subs".to_string(),
                "--rate-limit".to_string(),
                "50K".to_string(),
                url.to_string(),
            ]
        );

        let args = downloader(false, &[]).build_args(url, Path::new("out"), "03");
        assert!(!args.contains(&"--all-subs".to_string()));
        assert_eq!(args.last().map(String::as_str), Some(url));
    }

    #[tokio::test]
    async fn test_missing_binary_is_tool_error() {
        let mut downloader = downloader(false, &[]);
        downloader.bin = "edx-dl-no-such-binary".into();
        let err = downloader
            .download("https://youtube.com/watch?v=abcdefghijk", Path::new("."), "01")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalTool(_)));
    }
}
