// src/extractor/batch.rs

use super::units::UnitExtractor;
use crate::{
    client::PageFetcher,
    error::*,
    models::{ExtractionResult, Unit},
    pool, symbols, ui, utils,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// 并发抓取所有子章节页面并提取 Unit。
///
/// 单个 URL 抓取失败只会让该 URL 对应一个空列表，不影响其余 URL；
/// 返回的结果对每个提交的 URL 都有一项。
pub struct ExtractionOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    extractor: UnitExtractor,
    max_workers: usize,
}

impl ExtractionOrchestrator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: UnitExtractor, max_workers: usize) -> Self {
        Self {
            fetcher,
            extractor,
            max_workers,
        }
    }

    pub async fn extract_units(&self, url: &str) -> AppResult<Vec<Unit>> {
        debug!("处理 '{}'", url);
        let page = self.fetcher.fetch(url).await?;
        Ok(self.extractor.extract(&page))
    }

    pub async fn extract_all(&self, urls: &[String]) -> ExtractionResult {
        info!(
            "开始解析 {} 个子章节页面 (并发数: {})",
            urls.len(),
            self.max_workers
        );
        let pbar = ui::new_tasks_progress_bar(urls.len() as u64, "解析");

        let results = pool::bounded_map_or_else(
            urls.to_vec(),
            self.max_workers,
            |url| {
                let pbar = pbar.clone();
                async move {
                    let result = self.extract_units(&url).await;
                    pbar.inc(1);
                    result
                }
            },
            |url, e| {
                warn!("解析 '{}' 失败，按空结果处理: {}", url, e);
                pbar.println(format!(
                    "{} {} ({})",
                    *symbols::WARN,
                    utils::truncate_text(url, 60),
                    e
                ));
                Vec::new()
            },
        )
        .await;
        pbar.finish_and_clear();

        let result: ExtractionResult = results.into_iter().collect();
        info!(
            "解析完成: {} 个子章节，共 {} 个单元",
            result.len(),
            result.unit_count()
        );
        result
    }
}
