// src/downloader/job.rs

use super::{
    plan::{self, UnitTask},
    task_processor::TaskProcessor,
};
use crate::{
    DownloadJobContext,
    error::*,
    models::{DownloadStatus, ExtractionResult, Selection},
    symbols, ui, utils,
};
use log::info;
use std::fs;

/// 按选择顺序逐个下载单元。前缀在开始前统一分配，见 [`plan::plan_downloads`]。
pub struct CourseDownloader {
    context: DownloadJobContext,
}

impl CourseDownloader {
    pub fn new(context: DownloadJobContext) -> Self {
        Self { context }
    }

    /// 返回是否所有资源都已成功下载或跳过
    pub async fn run(&self, selection: &Selection, units: &ExtractionResult) -> AppResult<bool> {
        let output_dir = &self.context.config.output_dir;
        fs::create_dir_all(output_dir)?;
        let absolute_path = dunce::canonicalize(output_dir)?;
        info!("文件将保存到目录: \"{}\"", absolute_path.display());
        ui::info(&format!("文件将保存到目录: \"{}\"", absolute_path.display()));

        let tasks = plan::plan_downloads(selection, units, output_dir);
        self.run_tasks(&tasks).await;
        self.context.manager.print_report();
        Ok(self.context.manager.did_all_succeed())
    }

    pub async fn run_tasks(&self, tasks: &[UnitTask]) {
        let manager = &self.context.manager;
        manager.start_batch(tasks.len());
        let processor = TaskProcessor::new(self.context.clone());

        for (i, task) in tasks.iter().enumerate() {
            let dir_name = task
                .target_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui::print_sub_header(&format!(
                "[{}/{}] {} / {}",
                i + 1,
                tasks.len(),
                utils::truncate_text(&dir_name, 60),
                task.prefix
            ));

            for result in processor.process(task).await {
                match result.status {
                    DownloadStatus::Success => {
                        println!("{} {}", *symbols::OK, result.filename);
                        manager.record_success();
                    }
                    DownloadStatus::Skipped => {
                        let reason = result.message.as_deref().unwrap_or("已存在");
                        println!("{} {} ({})", *symbols::SKIP, result.filename, reason);
                        manager.record_skip(&result.filename, reason);
                    }
                    status => {
                        let (symbol, color, msg) = status.get_display_info();
                        println!("{} {} {}", symbol, result.filename, color(msg.into()));
                        manager.record_failure(&result.filename, status);
                    }
                }
            }
        }
    }
}
