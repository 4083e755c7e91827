// src/workflows.rs

use crate::{
    DownloadJobContext, auth,
    cli::Cli,
    client::PageFetcher,
    config::AppConfig,
    dedup,
    downloader::{CourseDownloader, DownloadManager},
    error::{AppError, AppResult},
    extractor::{ExtractionOrchestrator, UnitExtractor, structure},
    models::{Course, CourseSelection, CourseState, Selection},
    selection, symbols, ui,
};
use anyhow::anyhow;
use log::{debug, info, warn};
use std::sync::Arc;

fn resolve_password(args: &Cli) -> AppResult<String> {
    if let Some(password) = &args.password {
        return Ok(password.clone());
    }
    let password = ui::prompt_hidden(&format!("请输入 {} 的密码", args.username))?;
    if password.is_empty() {
        return Err(AppError::Other(anyhow!("必须提供用户名和密码才能登录")));
    }
    Ok(password)
}

/// 登录并执行完整流程
pub async fn run(args: &Cli, config: Arc<AppConfig>) -> AppResult<()> {
    let password = resolve_password(args)?;

    ui::print_header(&format!(
        "登录 {} (按 {} 可随时退出)",
        config.platform.base_url,
        *symbols::CTRL_C
    ));
    let client = auth::open_session(config.clone(), &args.username, &password).await?;
    ui::info("登录成功。");

    let context = DownloadJobContext {
        manager: DownloadManager::new(),
        config,
        http_client: Arc::new(client),
    };
    run_session(args, context).await
}

/// 已登录会话上的流程: 选择课程和章节、解析资源、去重、下载
pub async fn run_session(args: &Cli, context: DownloadJobContext) -> AppResult<()> {
    let platform = context.config.platform.clone();
    let fetcher: Arc<dyn PageFetcher> = context.http_client.clone();

    let available = started_courses(structure::fetch_courses(fetcher.as_ref(), &platform).await?);
    if args.course_list {
        ui::display_courses(&available);
        return Ok(());
    }

    let selected = selection::select_courses(&available, &args.course_urls)?;
    let mut all_selections = Vec::with_capacity(selected.len());
    for course in selected {
        let sections = structure::fetch_sections(fetcher.as_ref(), &platform, &course).await?;
        all_selections.push(CourseSelection { course, sections });
    }

    if args.section_list {
        for course_selection in &all_selections {
            ui::display_sections_menu(&course_selection.course, &course_selection.sections);
        }
        return Ok(());
    }

    let selection = Selection {
        courses: all_selections
            .into_iter()
            .map(|cs| CourseSelection {
                sections: selection::filter_sections(args.section_filter.as_deref(), cs.sections),
                course: cs.course,
            })
            .collect(),
    };
    ui::display_selections(&selection.courses);

    let urls = selection.subsection_urls();
    debug!("待解析的子章节: {:?}", urls);
    let orchestrator = ExtractionOrchestrator::new(
        fetcher,
        UnitExtractor::new(platform.clone()),
        context.config.max_workers,
    );
    let all_units = orchestrator.extract_all(&urls).await;

    let num_all_units = all_units.unit_count();
    if num_all_units == 0 {
        return Err(AppError::NoResources);
    }

    let filtered_units = dedup::remove_repeated_video_urls(all_units);
    let num_filtered_units = filtered_units.unit_count();
    info!("去重: {} -> {}", num_all_units, num_filtered_units);
    ui::info(&format!(
        "Removed {} units from total {}",
        num_all_units - num_filtered_units,
        num_all_units
    ));

    let all_ok = CourseDownloader::new(context)
        .run(&selection, &filtered_units)
        .await?;
    if !all_ok {
        warn!("部分资源下载失败");
        ui::warn("部分资源下载失败，重新运行即可只补全缺失的文件。");
    }
    Ok(())
}

fn started_courses(courses: Vec<Course>) -> Vec<Course> {
    let total = courses.len();
    let started: Vec<Course> = courses
        .into_iter()
        .filter(|c| c.state == CourseState::Started)
        .collect();
    debug!("{} 门课程中 {} 门已开课", total, started.len());
    started
}
