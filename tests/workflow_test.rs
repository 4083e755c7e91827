// tests/workflow_test.rs

use clap::Parser;
use edx_dl::{
    cli::Cli,
    config::{AppConfig, ExternalConfig, PlatformConfig},
    error::AppError,
    workflows,
};
use mockito::{Mock, ServerGuard};
use std::{fs, path::Path, sync::Arc};

const COURSE_PATH: &str = "/courses/MITx/6.002x/2013_Spring";

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{}", name)).expect("无法读取模拟页面")
}

/// 登录、仪表盘和课程目录页
async fn mock_site(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        server
            .mock("GET", "/login_ajax")
            .with_status(200)
            .with_header("set-cookie", "csrftoken=tok; Path=/")
            .create_async()
            .await,
        server
            .mock("POST", "/login_ajax")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await,
        server
            .mock("GET", "/dashboard")
            .with_status(200)
            .with_body(fixture("dashboard.html"))
            .create_async()
            .await,
        server
            .mock("GET", format!("{}/courseware", COURSE_PATH).as_str())
            .with_status(200)
            .with_body(fixture("courseware.html"))
            .create_async()
            .await,
    ]
}

fn setup(server_url: &str, output_dir: &Path, extra_args: &[&str]) -> (Cli, Arc<AppConfig>) {
    let course_url = format!("{}{}/info", server_url, COURSE_PATH);
    let mut argv = vec![
        "edx-dl",
        "-u",
        "me@example.com",
        "-p",
        "secret",
        "-x",
        "mock",
        "-o",
        output_dir.to_str().unwrap(),
    ];
    argv.extend_from_slice(extra_args);
    argv.push(&course_url);
    let args = Cli::parse_from(argv);

    let external = ExternalConfig {
        platforms: vec![PlatformConfig::new(
            "mock",
            server_url,
            r#"nav[aria-label="Course Navigation"]"#,
        )],
        ..Default::default()
    };
    let config = AppConfig::from_external(&args, external).unwrap();
    (args, Arc::new(config))
}

#[tokio::test]
async fn test_full_run_downloads_documents() {
    // --- 1. Arrange ---
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();
    let _site = mock_site(&mut server).await;

    let _s1 = server
        .mock("GET", format!("{}/courseware/w1/s1/", COURSE_PATH).as_str())
        .with_status(200)
        .with_body(fixture("subsection_docs.html"))
        .create_async()
        .await;
    let _s2 = server
        .mock("GET", format!("{}/courseware/w1/s2/", COURSE_PATH).as_str())
        .with_status(200)
        .with_body(fixture("subsection_empty.html"))
        .create_async()
        .await;
    let pdf = server
        .mock("GET", "/static/notes.pdf")
        .with_status(200)
        .with_body("%PDF-1.4 fake")
        .expect(1)
        .create_async()
        .await;

    let out = tempfile::tempdir().unwrap();
    let (args, config) = setup(&server_url, out.path(), &[]);

    // --- 2. Act ---
    workflows::run(&args, config.clone()).await.expect("流程应当成功");

    // --- 3. Assert ---
    let target = out
        .path()
        .join("Circuits and Electronics")
        .join("01-Week 1 Basics")
        .join("01-notes.pdf");
    assert_eq!(fs::read_to_string(&target).unwrap(), "%PDF-1.4 fake");

    // 再次运行时已存在的文件不会重新下载
    workflows::run(&args, config).await.expect("流程应当成功");
    pdf.assert_async().await;
}

#[tokio::test]
async fn test_no_resources_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();
    let _site = mock_site(&mut server).await;

    let _subsections = server
        .mock("GET", mockito::Matcher::Regex(r"/courseware/w1/s\d/$".into()))
        .with_status(200)
        .with_body(fixture("subsection_empty.html"))
        .create_async()
        .await;

    let out = tempfile::tempdir().unwrap();
    let (args, config) = setup(&server_url, out.path(), &[]);

    let err = workflows::run(&args, config).await.unwrap_err();
    assert!(matches!(err, AppError::NoResources));
    assert_eq!(err.exit_code(), 6);
}

#[tokio::test]
async fn test_section_list_stops_before_extraction() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();
    let _site = mock_site(&mut server).await;

    let subsection = server
        .mock("GET", mockito::Matcher::Regex(r"/courseware/w1/".into()))
        .expect(0)
        .create_async()
        .await;

    let out = tempfile::tempdir().unwrap();
    let (args, config) = setup(&server_url, out.path(), &["--section-list"]);

    workflows::run(&args, config).await.expect("列出章节应当成功");
    subsection.assert_async().await;
}

#[tokio::test]
async fn test_unknown_course_url_is_selection_error() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();
    let _site = mock_site(&mut server).await;

    let out = tempfile::tempdir().unwrap();
    let (mut args, config) = setup(&server_url, out.path(), &[]);
    args.course_urls = vec![format!("{}/courses/Nope/1/2/info", server_url)];

    let err = workflows::run(&args, config).await.unwrap_err();
    assert!(matches!(err, AppError::Selection(_)));
    assert_eq!(err.exit_code(), 4);
}
