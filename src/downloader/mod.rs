// src/downloader/mod.rs

mod job;
pub mod plan;
pub mod subtitles;
mod task_processor;
pub mod youtube;

pub use job::CourseDownloader;
pub use plan::{UnitTask, plan_downloads};

use crate::{models::DownloadStatus, symbols, ui};
use colored::*;
use log::info;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DownloadStats {
    pub units: usize,
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Ledger {
    stats: DownloadStats,
    failed: Vec<(String, String)>,
    skipped: Vec<(String, String)>,
}

/// 下载统计。每个资源 (视频、字幕、文件) 记一次结果。
#[derive(Clone, Default)]
pub struct DownloadManager {
    ledger: Arc<Mutex<Ledger>>,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn start_batch(&self, units: usize) {
        info!("开始新一批下载任务，单元数: {}", units);
        *self.lock() = Ledger {
            stats: DownloadStats {
                units,
                ..Default::default()
            },
            ..Default::default()
        };
    }

    pub fn record_success(&self) {
        let mut ledger = self.lock();
        ledger.stats.total += 1;
        ledger.stats.success += 1;
    }

    pub fn record_skip(&self, filename: &str, reason: &str) {
        info!("跳过文件 '{}'，原因: {}", filename, reason);
        let mut ledger = self.lock();
        ledger.stats.total += 1;
        ledger.stats.skipped += 1;
        ledger.skipped.push((filename.to_string(), reason.to_string()));
    }

    pub fn record_failure(&self, filename: &str, status: DownloadStatus) {
        log::error!("文件 '{}' 下载失败，状态: {:?}", filename, status);
        let (_, _, msg) = status.get_display_info();
        let mut ledger = self.lock();
        ledger.stats.total += 1;
        ledger.stats.failed += 1;
        ledger.failed.push((filename.to_string(), msg.to_string()));
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.lock().stats.clone()
    }

    pub fn did_all_succeed(&self) -> bool {
        self.lock().stats.failed == 0
    }

    pub fn print_report(&self) {
        let ledger = self.lock();
        let stats = &ledger.stats;
        info!(
            "下载报告: Units={}, Total={}, Success={}, Skipped={}, Failed={}",
            stats.units, stats.total, stats.success, stats.skipped, stats.failed
        );

        if !ledger.skipped.is_empty() || !ledger.failed.is_empty() {
            ui::print_sub_header("下载详情报告");
            if !ledger.skipped.is_empty() {
                println!("\n{} 跳过的文件 ({}个):", *symbols::SKIP, stats.skipped);
                print_grouped_report(&ledger.skipped, |s| s.cyan());
            }
            if !ledger.failed.is_empty() {
                println!("\n{} 失败的文件 ({}个):", *symbols::ERROR, stats.failed);
                print_grouped_report(&ledger.failed, |s| s.red());
            }
        }
        ui::print_sub_header("任务总结");
        if stats.failed == 0 {
            println!(
                "{} {} 个单元的 {} 个资源均已完成 ({} 个已跳过)。",
                *symbols::OK,
                stats.units,
                stats.total,
                stats.skipped
            );
        } else {
            let summary = format!(
                "{} | {} | {}",
                format!("成功: {}", stats.success).green(),
                format!("失败: {}", stats.failed).red(),
                format!("跳过: {}", stats.skipped).yellow()
            );
            println!("{}", summary);
        }
    }
}

fn print_grouped_report(
    items: &[(String, String)],
    color_fn: fn(ColoredString) -> ColoredString,
) {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (filename, reason) in items {
        grouped.entry(reason).or_default().push(filename);
    }
    for (reason, mut filenames) in grouped {
        println!("  - {}", color_fn(format!("原因: {}", reason).into()));
        filenames.sort();
        for filename in filenames {
            println!("    - {}", filename);
        }
    }
}
