// src/extractor/units.rs

use super::rules;
use crate::{
    config::PlatformConfig,
    constants,
    models::{SubtitleSource, Unit, youtube_watch_url},
};
use log::{debug, trace};
use std::sync::Arc;

/// 从子章节页面的原始内容中提取 Unit。纯函数，不做任何网络请求。
#[derive(Debug, Clone)]
pub struct UnitExtractor {
    platform: Arc<PlatformConfig>,
}

impl UnitExtractor {
    pub fn new(platform: Arc<PlatformConfig>) -> Self {
        Self { platform }
    }

    pub fn extract(&self, page: &str) -> Vec<Unit> {
        let mut units: Vec<Unit> = rules::unit_blocks(page)
            .enumerate()
            .filter_map(|(index, block)| {
                let unit = self.extract_block(block);
                if unit.is_none() {
                    trace!("内容块 #{} 中没有可下载资源", index);
                }
                unit
            })
            .collect();

        // 有些视频以 iframe 形式嵌在编号内容块之外，单独扫描整页补上。
        // 与上面重复的视频留给去重阶段处理。
        let extra: Vec<Unit> = rules::embedded_video_ids(page)
            .into_iter()
            .map(Unit::video_only)
            .collect();
        if !extra.is_empty() {
            debug!("页面中发现 {} 个嵌入视频", extra.len());
        }
        units.extend(extra);
        units
    }

    fn extract_block(&self, block: &str) -> Option<Unit> {
        let video_id = rules::video_id(block);
        let video_url = video_id.map(youtube_watch_url);
        let subtitles = video_id.and_then(|id| self.subtitle_source(block, id));

        let media_urls = rules::media_urls(block);
        let document_urls: Vec<String> = rules::document_hrefs(block)
            .into_iter()
            .map(|href| self.platform.absolute_url(href))
            .collect();

        let unit = Unit {
            video_url,
            subtitles,
            media_urls,
            document_urls,
        };
        unit.is_meaningful().then_some(unit)
    }

    /// 字幕模板需要插入视频 ID，两个字段缺一不可
    fn subtitle_source(&self, block: &str, video_id: &str) -> Option<SubtitleSource> {
        let translation = rules::transcript_translation_url(block)?;
        let available = rules::available_translations_url(block)?;
        Some(SubtitleSource {
            template_url: format!(
                "{}/{}?videoId={}",
                self.platform.absolute_url(translation),
                constants::SUBTITLE_LANG_PLACEHOLDER,
                video_id
            ),
            available_url: self.platform.absolute_url(available),
        })
    }
}
