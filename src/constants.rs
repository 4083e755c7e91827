// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "Downloaded";
pub const DEFAULT_PLATFORM: &str = "edx";
pub const DEFAULT_WORKERS: usize = 20;
pub const USER_AGENT: &str = "edX-downloader/0.01";

pub const YOUTUBE_VIDEO_ID_LENGTH: usize = 11;
pub const YOUTUBE_WATCH_URL: &str = "https://youtube.com/watch?v=";
pub const YOUTUBE_DL_BIN: &str = "youtube-dl";
pub const DEFAULT_VIDEO_FORMAT: &str = "mp4";

/// 字幕模板中语言代码的占位符
pub const SUBTITLE_LANG_PLACEHOLDER: &str = "{lang}";
pub const DEFAULT_SUBTITLE_LANG: &str = "en";

pub mod headers {
    pub const ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
    pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";
    pub const X_REQUESTED_WITH: &str = "XMLHttpRequest";
    pub const CSRF_COOKIE: &str = "csrftoken";
    pub const CSRF_HEADER: &str = "x-csrftoken";
}

pub mod paths {
    pub const LOGIN: &str = "/login_ajax";
    pub const DASHBOARD: &str = "/dashboard";
    pub const COURSES_PREFIX: &str = "/courses/";
    pub const INFO_MARKER: &str = "info";
    pub const COURSEWARE_MARKER: &str = "courseware";
}
