// src/downloader/subtitles.rs

use crate::{
    client::PageFetcher,
    constants,
    error::*,
    models::{DownloadResult, DownloadStatus, SubtitleSource},
    transcript, utils,
};
use anyhow::anyhow;
use log::{debug, info, warn};
use std::{fs, path::Path};

/// 获取可用的字幕语言。列表无法获取或格式不对时只尝试默认语言。
pub async fn available_languages(fetcher: &dyn PageFetcher, source: &SubtitleSource) -> Vec<String> {
    let fallback = || vec![constants::DEFAULT_SUBTITLE_LANG.to_string()];
    match fetcher.fetch_json(&source.available_url).await {
        Ok(value) => match serde_json::from_value::<Vec<String>>(value) {
            Ok(langs) => langs
                .into_iter()
                .filter(|lang| {
                    let valid = is_language_tag(lang);
                    if !valid {
                        warn!("忽略无效的字幕语言代码: {:?}", lang);
                    }
                    valid
                })
                .collect(),
            Err(e) => {
                warn!("字幕语言列表格式无效 ({}): {}", source.available_url, e);
                fallback()
            }
        },
        Err(e) => {
            warn!("获取字幕语言列表失败 ({}): {}", source.available_url, e);
            fallback()
        }
    }
}

/// 语言代码会出现在文件名中，只接受 `en`、`zh-Hans`、`pt_BR` 这样的形式
fn is_language_tag(lang: &str) -> bool {
    !lang.is_empty()
        && lang.len() <= 35
        && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 为 `target_dir` 中以 `prefix` 命名的视频保存所有语言的 SRT 字幕。
/// 已存在的字幕文件不会被覆盖，因此重复运行是幂等的。
pub async fn download_subtitles(
    fetcher: &dyn PageFetcher,
    source: &SubtitleSource,
    target_dir: &Path,
    prefix: &str,
) -> Vec<DownloadResult> {
    let Some(base_name) = utils::find_file_with_prefix(target_dir, prefix) else {
        warn!("{:?} 中没有前缀为 '{}' 的视频文件，跳过字幕", target_dir, prefix);
        return Vec::new();
    };

    let langs = available_languages(fetcher, source).await;
    debug!("'{}' 可用字幕语言: {:?}", base_name, langs);

    let mut results = Vec::with_capacity(langs.len());
    for lang in langs {
        let filename = format!("{}.{}.srt", base_name, lang);
        let path = target_dir.join(&filename);
        if path.exists() {
            info!("字幕 '{}' 已存在，跳过", filename);
            results.push(DownloadResult {
                filename,
                status: DownloadStatus::Skipped,
                message: Some("字幕已存在".to_string()),
            });
            continue;
        }

        let result = save_subtitle(fetcher, &source.url_for(&lang), &path).await;
        results.push(match result {
            Ok(()) => DownloadResult {
                filename,
                status: DownloadStatus::Success,
                message: None,
            },
            Err(e) => {
                warn!("字幕 '{}' 下载失败: {}", filename, e);
                DownloadResult {
                    filename,
                    status: DownloadStatus::from(&e),
                    message: Some(e.to_string()),
                }
            }
        });
    }
    results
}

async fn save_subtitle(fetcher: &dyn PageFetcher, url: &str, path: &Path) -> AppResult<()> {
    let value = fetcher.fetch_json(url).await?;
    let srt = transcript::json_to_srt(&value)
        .ok_or_else(|| AppError::Other(anyhow!("'{}' 不是有效的时间轴字幕", url)))?;
    fs::write(path, srt)?;
    debug!("字幕已写入 {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_language_tag() {
        assert!(is_language_tag("en"));
        assert!(is_language_tag("zh-Hans"));
        assert!(is_language_tag("pt_BR"));
        assert!(!is_language_tag(""));
        assert!(!is_language_tag("../x"));
        assert!(!is_language_tag("en/../../etc"));
        assert!(!is_language_tag("en.srt"));
    }
}
