// src/models/api.rs

use serde::Deserialize;

/// `login_ajax` 的响应
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub value: Option<String>,
}

/// 平台字幕接口返回的时间轴文本，时间单位为毫秒
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TimedTranscript {
    #[serde(default)]
    pub start: Vec<i64>,
    #[serde(default)]
    pub end: Vec<i64>,
    #[serde(default)]
    pub text: Vec<String>,
}
