// tests/extraction_test.rs

use edx_dl::{
    client::RobustClient,
    config::{AppConfig, PlatformConfig},
    extractor::{ExtractionOrchestrator, UnitExtractor},
};
use std::fs;
use std::sync::Arc;

#[tokio::test]
async fn test_failed_page_degrades_to_empty_entry() {
    // --- 1. Arrange ---
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let docs_page = fs::read_to_string("tests/fixtures/subsection_docs.html").expect("无法读取模拟页面");
    let video_page = r#"<div class="seq_contents" id="seq_contents_0">&lt;div data-streams=&#34;1.00:dQw4w9WgXcQ&#34;&gt;&lt;/div&gt;</div>"#;

    let ok_video = server
        .mock("GET", "/s1")
        .with_status(200)
        .with_body(video_page)
        .create_async()
        .await;
    let broken = server
        .mock("GET", "/s2")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let ok_docs = server
        .mock("GET", "/s3")
        .with_status(200)
        .with_body(&docs_page)
        .create_async()
        .await;

    // 默认测试配置不重试，500 只会请求一次
    let config = Arc::new(AppConfig::default());
    let platform = Arc::new(PlatformConfig::for_base_url(&server_url));
    let client = RobustClient::new(config).expect("Failed to create client");
    let orchestrator = ExtractionOrchestrator::new(Arc::new(client), UnitExtractor::new(platform), 2);

    let urls: Vec<String> = ["/s1", "/s2", "/s3"]
        .iter()
        .map(|p| format!("{}{}", server_url, p))
        .collect();

    // --- 2. Act ---
    let result = orchestrator.extract_all(&urls).await;

    // --- 3. Assert ---
    assert_eq!(result.len(), 3, "每个提交的 URL 都应有一项");
    let keys: Vec<&str> = result.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, urls.iter().map(String::as_str).collect::<Vec<_>>());

    let video_units = result.get(&urls[0]).unwrap();
    assert_eq!(video_units.len(), 1);
    assert_eq!(
        video_units[0].video_url.as_deref(),
        Some("https://youtube.com/watch?v=dQw4w9WgXcQ")
    );

    assert_eq!(result.get(&urls[1]), Some(&[][..]));

    let doc_units = result.get(&urls[2]).unwrap();
    assert_eq!(doc_units.len(), 1);
    assert_eq!(
        doc_units[0].document_urls,
        vec![format!("{}/static/notes.pdf", server_url)]
    );

    ok_video.assert_async().await;
    broken.assert_async().await;
    ok_docs.assert_async().await;
}

#[tokio::test]
async fn test_empty_url_list() {
    let config = Arc::new(AppConfig::default());
    let platform = config.platform.clone();
    let client = RobustClient::new(config).expect("Failed to create client");
    let orchestrator = ExtractionOrchestrator::new(Arc::new(client), UnitExtractor::new(platform), 4);

    let result = orchestrator.extract_all(&[]).await;
    assert!(result.is_empty());
    assert_eq!(result.unit_count(), 0);
}
