// src/auth.rs

use crate::{
    client::RobustClient,
    config::{AppConfig, PlatformConfig},
    constants::{self, headers},
    error::*,
    models::api::LoginResponse,
};
use anyhow::anyhow;
use log::{debug, info, warn};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

/// 访问首页以获取 CSRF Cookie。找不到时返回空字符串。
pub async fn initial_csrf_token(client: &RobustClient, homepage_url: &str) -> AppResult<String> {
    // 首页可能返回非 2xx 状态，但仍会下发 Cookie，因此这里不检查状态码
    let res = client.client.get(homepage_url).send().await?;
    let token = res
        .cookies()
        .find(|c| c.name() == headers::CSRF_COOKIE)
        .map(|c| c.value().to_string());
    match token {
        Some(token) => {
            debug!("获取到 CSRF token");
            Ok(token)
        }
        None => {
            warn!("首页 '{}' 未下发 {} Cookie", homepage_url, headers::CSRF_COOKIE);
            Ok(String::new())
        }
    }
}

/// 构建所有后续请求共用的请求头
pub fn build_headers(platform: &PlatformConfig, csrf_token: &str) -> AppResult<HeaderMap> {
    let value = |v: &str| {
        HeaderValue::from_str(v).map_err(|e| AppError::Other(anyhow!("无效的请求头值 '{}': {}", v, e)))
    };
    let mut map = HeaderMap::new();
    map.insert(header::USER_AGENT, value(constants::USER_AGENT)?);
    map.insert(header::ACCEPT, value(headers::ACCEPT)?);
    map.insert(header::CONTENT_TYPE, value(headers::CONTENT_TYPE)?);
    map.insert(header::REFERER, value(&platform.homepage_url())?);
    map.insert(
        HeaderName::from_static("x-requested-with"),
        value(headers::X_REQUESTED_WITH)?,
    );
    map.insert(HeaderName::from_static(headers::CSRF_HEADER), value(csrf_token)?);
    Ok(map)
}

pub async fn login(
    client: &RobustClient,
    platform: &PlatformConfig,
    username: &str,
    password: &str,
) -> AppResult<()> {
    info!("以 '{}' 登录 {}", username, platform.base_url);
    let login_url = platform.login_url();
    let body = client
        .post_form(
            &login_url,
            &[("email", username), ("password", password), ("remember", "false")],
        )
        .await?
        .text()
        .await?;
    let resp: LoginResponse =
        serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
            url: login_url.clone(),
            source,
        })?;
    if !resp.success {
        let reason = resp
            .value
            .unwrap_or_else(|| "Wrong Email or Password.".to_string());
        return Err(AppError::Auth(reason));
    }
    info!("登录成功");
    Ok(())
}

/// 创建客户端、获取 CSRF token 并登录，返回带有会话的客户端
pub async fn open_session(
    config: Arc<AppConfig>,
    username: &str,
    password: &str,
) -> AppResult<RobustClient> {
    let platform = config.platform.clone();
    let client = RobustClient::new(config)?;
    let token = initial_csrf_token(&client, &platform.homepage_url()).await?;
    let client = client.with_headers(build_headers(&platform, &token)?);
    login(&client, &platform, username, password).await?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_headers_contains_fixed_set() {
        let platform = PlatformConfig::new("edx", "https://courses.edx.org", "nav");
        let map = build_headers(&platform, "tok123").unwrap();
        assert_eq!(map.get("x-csrftoken").unwrap(), "tok123");
        assert_eq!(map.get(header::REFERER).unwrap(), "https://courses.edx.org/login_ajax");
        assert_eq!(map.get("x-requested-with").unwrap(), "XMLHttpRequest");
        assert_eq!(map.get(header::USER_AGENT).unwrap(), constants::USER_AGENT);
    }

    #[test]
    fn test_empty_token_is_allowed() {
        let platform = PlatformConfig::new("edx", "https://courses.edx.org", "nav");
        let map = build_headers(&platform, "").unwrap();
        assert_eq!(map.get("x-csrftoken").unwrap(), "");
    }
}
