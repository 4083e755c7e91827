// src/client.rs

use crate::{config::AppConfig, error::*};
use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{IntoUrl, Response, StatusCode, header::HeaderMap};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use std::sync::Arc;

/// 读取页面内容的抽象。提取流程只依赖这个 trait，测试中可以替换为内存实现。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> AppResult<String>;

    async fn fetch_json(&self, url: &str) -> AppResult<Value> {
        let body = self.fetch(url).await?;
        serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })
    }
}

/// 带重试、Cookie 会话和固定请求头的 HTTP 客户端
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    headers: HeaderMap,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .cookie_store(true)
                .pool_max_idle_per_host(config.max_workers)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self {
            client,
            headers: HeaderMap::new(),
        })
    }

    /// 设置此后每个请求都会携带的请求头。Cookie 会话在克隆之间共享。
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let res = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::check_status(res)
    }

    pub async fn post_form<T: IntoUrl>(
        &self,
        url: T,
        form: &[(&str, &str)],
    ) -> AppResult<Response> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let res = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await?;
        Self::check_status(res)
    }

    fn check_status(res: Response) -> AppResult<Response> {
        if res.status() == StatusCode::UNAUTHORIZED || res.status() == StatusCode::FORBIDDEN {
            return Err(AppError::Auth(format!(
                "无权访问 '{}' (HTTP {})",
                res.url(),
                res.status()
            )));
        }
        Ok(res.error_for_status()?)
    }
}

#[async_trait]
impl PageFetcher for RobustClient {
    async fn fetch(&self, url: &str) -> AppResult<String> {
        debug!("GET {}", url);
        let body = self.get(url).await?.text().await?;
        trace!("'{}' 返回 {} 字节", url, body.len());
        Ok(body)
    }
}
