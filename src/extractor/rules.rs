// src/extractor/rules.rs

//! 子章节页面的正则提取规则。
//!
//! 页面量大，这里不建立 DOM 树，而是对原始文本逐条套用规则。每条规则只负责
//! 一个字段，单独测试；替换成真正的解析器时只需改动本模块。

use crate::constants::YOUTUBE_VIDEO_ID_LENGTH;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

// 属性值两侧的引号可能是原样的 `"`，也可能被转义成 `&#34;` 或 `&quot;`
const QUOTE: &str = r#"(?:&#34;|&quot;|")"#;

static UNIT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div\s[^>]*?id="seq_contents_\d+"[^>]*>.*?</div>"#).unwrap()
});

static VIDEO_STREAMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"data-streams={QUOTE}.*1\.0+:([A-Za-z0-9_-]{{{YOUTUBE_VIDEO_ID_LENGTH}}})"
    ))
    .unwrap()
});

static TRANSCRIPT_TRANSLATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"data-transcript-translation-url={QUOTE}([^"&]*){QUOTE}"#
    ))
    .unwrap()
});

static AVAILABLE_TRANSLATIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"data-transcript-available-translations-url={QUOTE}([^"&]*){QUOTE}"#
    ))
    .unwrap()
});

// `;` 用来分隔 data-sources 中的多个地址，虽然它在 URL 中合法但很少见，这里排除掉
static MEDIA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^;"'\s<>]*?\.(?:mp4|webm)\b"#).unwrap()
});

static DOCUMENT_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"href={QUOTE}([^"&]*\.(?:pdf|docx?|pptx?|xlsx?))"#
    ))
    .unwrap()
});

static EMBEDDED_VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"//(?:w{0,3}\.)?youtube\.com/embed/([^ ?&"]*)[?& "]"#).unwrap()
});

/// 按文档顺序切出每个 `seq_contents_N` 内容块
pub fn unit_blocks(page: &str) -> impl Iterator<Item = &str> {
    UNIT_BLOCK_RE.find_iter(page).map(|m| m.as_str())
}

/// `data-streams` 字段中 1.0 倍速对应的视频 ID
pub fn video_id(block: &str) -> Option<&str> {
    VIDEO_STREAMS_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn transcript_translation_url(block: &str) -> Option<&str> {
    TRANSCRIPT_TRANSLATION_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn available_translations_url(block: &str) -> Option<&str> {
    AVAILABLE_TRANSLATIONS_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 块中所有直链媒体地址，去重并保持首次出现的顺序
pub fn media_urls(block: &str) -> Vec<String> {
    MEDIA_URL_RE
        .find_iter(block)
        .map(|m| m.as_str().to_string())
        .unique()
        .collect()
}

/// 块中所有指向文档的 href，保持原样 (可能是相对地址)
pub fn document_hrefs(block: &str) -> Vec<&str> {
    DOCUMENT_HREF_RE
        .captures_iter(block)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|href| !href.is_empty())
        .unique()
        .collect()
}

/// 整个页面中通过 iframe 嵌入的视频 ID，长度不足的结果会被丢弃
pub fn embedded_video_ids(page: &str) -> Vec<&str> {
    EMBEDDED_VIDEO_RE
        .captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| valid_video_id(m.as_str()))
        .collect()
}

fn valid_video_id(raw: &str) -> Option<&str> {
    let id = raw.get(..YOUTUBE_VIDEO_ID_LENGTH)?;
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        .then_some(id)
}
