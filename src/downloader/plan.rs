// src/downloader/plan.rs

use crate::{
    models::{ExtractionResult, Section, Selection, Unit},
    utils,
};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

/// 一个待下载的单元，以及预先分配好的目录与文件名前缀
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTask {
    pub target_dir: PathBuf,
    pub prefix: String,
    pub unit: Unit,
}

pub fn section_dir(output_root: &Path, course_name: &str, section: &Section) -> PathBuf {
    output_root
        .join(utils::sanitize_filename(course_name))
        .join(utils::sanitize_filename(&format!(
            "{:02}-{}",
            section.position, section.name
        )))
}

/// 单元内媒体与文档的目标文件名 `{prefix}-{URL 末段}`。
/// 末段相同的 URL 依次改名为 `name-2.ext`、`name-3.ext`，结果只取决于 URL 顺序。
pub fn resource_filenames<'a, I>(prefix: &str, urls: I) -> Vec<(&'a str, String)>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut used = HashSet::new();
    urls.into_iter()
        .map(|url| {
            let base = format!("{}-{}", prefix, utils::filename_from_url(url));
            let mut filename = base.clone();
            let mut n = 2;
            while used.contains(&filename) {
                filename = numbered_filename(&base, n);
                n += 1;
            }
            used.insert(filename.clone());
            (url.as_str(), filename)
        })
        .collect()
}

fn numbered_filename(filename: &str, n: usize) -> String {
    let path = Path::new(filename);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!("{}-{}.{}", stem.to_string_lossy(), n, ext.to_string_lossy()),
        _ => format!("{}-{}", filename, n),
    }
}

/// 按 课程 -> 章节 -> 子章节 -> 单元 的顺序展开下载任务。
///
/// 前缀计数器在每个章节内从 1 开始，跨子章节连续递增。这里一次性算好所有前缀，
/// 之后无论以何种顺序执行任务，文件编号都不会变化。
pub fn plan_downloads(
    selection: &Selection,
    units: &ExtractionResult,
    output_root: &Path,
) -> Vec<UnitTask> {
    let mut tasks = Vec::new();
    for course_selection in &selection.courses {
        for section in &course_selection.sections {
            let target_dir = section_dir(output_root, &course_selection.course.name, section);
            let section_units = section
                .subsections
                .iter()
                .flat_map(|sub| units.get(&sub.url).unwrap_or_default());
            for (i, unit) in section_units.enumerate() {
                tasks.push(UnitTask {
                    target_dir: target_dir.clone(),
                    prefix: utils::unit_prefix(i + 1),
                    unit: unit.clone(),
                });
            }
        }
    }
    tasks
}
