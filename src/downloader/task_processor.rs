// src/downloader/task_processor.rs

use super::{
    plan::{self, UnitTask},
    subtitles,
    youtube::VideoDownloader,
};
use crate::{DownloadJobContext, error::*, models::*};
use futures::StreamExt;
use log::{debug, error, info};
use std::{fs, io::Write as IoWrite, path::Path};

/// `TaskProcessor` 负责单个单元的全部资源: 视频、字幕、媒体文件与文档。
/// 单个资源失败只记录在结果里，不会中断其他资源。
pub struct TaskProcessor {
    context: DownloadJobContext,
    video: VideoDownloader,
}

impl TaskProcessor {
    pub fn new(context: DownloadJobContext) -> Self {
        let video = VideoDownloader::new(&context.config);
        Self { context, video }
    }

    pub async fn process(&self, task: &UnitTask) -> Vec<DownloadResult> {
        if let Err(e) = fs::create_dir_all(&task.target_dir) {
            let e = AppError::from(e);
            error!("无法创建目录 {:?}: {}", task.target_dir, e);
            return vec![failure(task.target_dir.display().to_string(), &e)];
        }

        let mut results = Vec::new();
        let unit = &task.unit;

        if let Some(video_url) = &unit.video_url {
            let label = format!("{}-{}", task.prefix, video_url);
            results.push(match self.video.download(video_url, &task.target_dir, &task.prefix).await {
                Ok(()) => success(label),
                Err(e) => {
                    error!("视频 {} 下载失败: {}", video_url, e);
                    failure(label, &e)
                }
            });

            if self.context.config.with_subtitles {
                match &unit.subtitles {
                    Some(source) => results.extend(
                        subtitles::download_subtitles(
                            &*self.context.http_client,
                            source,
                            &task.target_dir,
                            &task.prefix,
                        )
                        .await,
                    ),
                    None => debug!("视频 {} 没有字幕信息", video_url),
                }
            }
        }

        let resources = plan::resource_filenames(
            &task.prefix,
            unit.media_urls.iter().chain(&unit.document_urls),
        );
        for (url, filename) in resources {
            results.push(self.download_url(url, &task.target_dir, filename).await);
        }
        results
    }

    async fn download_url(&self, url: &str, target_dir: &Path, filename: String) -> DownloadResult {
        let dest = target_dir.join(&filename);
        if dest.exists() {
            return DownloadResult {
                filename,
                status: DownloadStatus::Skipped,
                message: Some("文件已存在".to_string()),
            };
        }

        info!("下载 {} -> {:?}", url, dest);
        match self.download_standard_file(url, target_dir, &dest).await {
            Ok(()) => success(filename),
            Err(e) => {
                error!("文件 {} 下载失败: {}", url, e);
                failure(filename, &e)
            }
        }
    }

    /// 先写入同目录下的临时文件，完成后再重命名，避免留下不完整的目标文件。
    async fn download_standard_file(&self, url: &str, target_dir: &Path, dest: &Path) -> AppResult<()> {
        // 资源可能位于第三方 CDN，不携带平台的请求头
        let res = self
            .context
            .http_client
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let mut temp = tempfile::NamedTempFile::new_in(target_dir)?;
        let mut stream = res.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            temp.write_all(&chunk)?;
        }
        temp.flush()?;
        temp.persist(dest)?;
        Ok(())
    }
}

fn success(filename: String) -> DownloadResult {
    DownloadResult {
        filename,
        status: DownloadStatus::Success,
        message: None,
    }
}

fn failure(filename: String, e: &AppError) -> DownloadResult {
    DownloadResult {
        filename,
        status: DownloadStatus::from(e),
        message: Some(e.to_string()),
    }
}
