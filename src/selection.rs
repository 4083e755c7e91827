// src/selection.rs

use crate::{
    error::{AppError, AppResult},
    models::{Course, Section},
    utils,
};
use log::{debug, warn};

fn normalize_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// 按用户给出的链接挑选课程，顺序与仪表盘一致。
pub fn select_courses(available: &[Course], urls: &[String]) -> AppResult<Vec<Course>> {
    if urls.is_empty() {
        return Err(AppError::MissingCourseUrls);
    }

    let selected: Vec<Course> = available
        .iter()
        .filter(|course| {
            course.url.as_deref().is_some_and(|course_url| {
                urls.iter()
                    .any(|url| normalize_url(url) == normalize_url(course_url))
            })
        })
        .cloned()
        .collect();

    if selected.is_empty() {
        return Err(AppError::Selection(
            "提供的课程链接无效，请使用 --course-list 查看正确的链接".to_string(),
        ));
    }
    debug!("选中 {} 门课程", selected.len());
    Ok(selected)
}

/// 按序号过滤章节 (从 1 开始，支持 `1,3-5` 形式)。
/// 没有给出过滤条件或条件无法匹配任何章节时返回全部章节。
pub fn filter_sections(filter: Option<&str>, sections: Vec<Section>) -> Vec<Section> {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return sections;
    };

    let indices = utils::parse_selection_indices(filter, sections.len());
    if indices.is_empty() {
        warn!("章节过滤条件 '{}' 无效，保留全部 {} 个章节", filter, sections.len());
        return sections;
    }

    sections
        .into_iter()
        .enumerate()
        .filter(|(i, _)| indices.contains(i))
        .map(|(_, section)| section)
        .collect()
}
