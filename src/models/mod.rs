// src/models/mod.rs

pub mod api;

use crate::constants;
use crate::error::AppError;
use crate::symbols;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

// 课程结构: Course -> [Section] -> [SubSection] -> [Unit]
// 为了性能与交互体验，不保存完整的树:
//   1. 课程信息: Course, Section -> [SubSection]
//   2. 用户选择: Selection = [(Course, [Section])]
//   3. 可下载资源: ExtractionResult = {SubSection.url: [Unit]}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CourseState {
    #[default]
    NotStarted,
    Started,
}

impl fmt::Display for CourseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseState::NotStarted => write!(f, "Not yet"),
            CourseState::Started => write!(f, "Started"),
        }
    }
}

/// 仪表盘中的一门课程。缺少链接的课程仍会保留，但 `id` 与 `url` 为空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<String>,
    pub name: String,
    pub url: Option<String>,
    pub state: CourseState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub position: usize,
    pub name: String,
    pub url: String,
    pub subsections: Vec<SubSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSection {
    pub position: usize,
    pub name: String,
    pub url: String,
}

/// 字幕的获取方式: 一个按语言代码参数化的模板，以及可用语言列表的地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleSource {
    pub template_url: String,
    pub available_url: String,
}

impl SubtitleSource {
    pub fn url_for(&self, lang: &str) -> String {
        self.template_url
            .replace(constants::SUBTITLE_LANG_PLACEHOLDER, lang)
    }
}

/// 一个内容块中可下载资源的集合
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unit {
    pub video_url: Option<String>,
    pub subtitles: Option<SubtitleSource>,
    pub media_urls: Vec<String>,
    pub document_urls: Vec<String>,
}

impl Unit {
    /// 仅携带一个视频的单元 (用于 iframe 嵌入的额外视频)
    pub fn video_only(video_id: &str) -> Self {
        Self {
            video_url: Some(youtube_watch_url(video_id)),
            ..Default::default()
        }
    }

    pub fn is_meaningful(&self) -> bool {
        self.video_url.is_some() || !self.media_urls.is_empty() || !self.document_urls.is_empty()
    }
}

pub fn youtube_watch_url(video_id: &str) -> String {
    format!("{}{}", constants::YOUTUBE_WATCH_URL, video_id)
}

/// 以子章节 URL 为键、保持插入顺序的提取结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    entries: Vec<(String, Vec<Unit>)>,
    index: HashMap<String, usize>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换某个 URL 的单元列表。替换时保留原有位置。
    pub fn insert(&mut self, url: impl Into<String>, units: Vec<Unit>) {
        let url = url.into();
        match self.index.get(&url) {
            Some(&i) => self.entries[i].1 = units,
            None => {
                self.index.insert(url.clone(), self.entries.len());
                self.entries.push((url, units));
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&[Unit]> {
        self.index
            .get(url)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Unit])> {
        self.entries
            .iter()
            .map(|(k, units)| (k.as_str(), units.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unit_count(&self) -> usize {
        self.entries.iter().map(|(_, units)| units.len()).sum()
    }
}

impl FromIterator<(String, Vec<Unit>)> for ExtractionResult {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Unit>)>>(iter: T) -> Self {
        let mut result = Self::new();
        for (url, units) in iter {
            result.insert(url, units);
        }
        result
    }
}

impl IntoIterator for ExtractionResult {
    type Item = (String, Vec<Unit>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Unit>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSelection {
    pub course: Course,
    pub sections: Vec<Section>,
}

/// 用户选中的课程与章节，决定下载时的遍历顺序
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub courses: Vec<CourseSelection>,
}

impl Selection {
    pub fn subsection_urls(&self) -> Vec<String> {
        self.courses
            .iter()
            .flat_map(|c| c.sections.iter())
            .flat_map(|s| s.subsections.iter())
            .map(|sub| sub.url.clone())
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Success,
    Skipped,
    HttpError,
    NetworkError,
    TimeoutError,
    IoError,
    ToolError,
    UnexpectedError,
}

impl DownloadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            DownloadStatus::Success => (&symbols::OK, |s| s.green(), "下载成功"),
            DownloadStatus::Skipped => (&symbols::SKIP, |s| s.cyan(), "文件已存在，跳过"),
            DownloadStatus::HttpError => (&symbols::ERROR, |s| s.red(), "服务器返回错误"),
            DownloadStatus::NetworkError => (&symbols::ERROR, |s| s.red(), "网络请求失败"),
            DownloadStatus::TimeoutError => (&symbols::WARN, |s| s.yellow(), "网络连接超时"),
            DownloadStatus::IoError => (&symbols::ERROR, |s| s.red(), "本地文件读写错误"),
            DownloadStatus::ToolError => (&symbols::TOOL, |s| s.red(), "视频下载程序执行失败"),
            DownloadStatus::UnexpectedError => {
                (&symbols::ERROR, |s| s.red(), "发生未预期的程序错误")
            }
        }
    }
}

impl From<&AppError> for DownloadStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                if err.is_timeout() {
                    DownloadStatus::TimeoutError
                } else if err.is_status() {
                    DownloadStatus::HttpError
                } else {
                    DownloadStatus::NetworkError
                }
            }
            AppError::NetworkMiddleware(_) => DownloadStatus::NetworkError,
            AppError::Io(_) | AppError::TempFilePersist(_) => DownloadStatus::IoError,
            AppError::ExternalTool(_) => DownloadStatus::ToolError,
            _ => DownloadStatus::UnexpectedError,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub filename: String,
    pub status: DownloadStatus,
    pub message: Option<String>,
}
