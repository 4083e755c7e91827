// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("登录失败: {0}")]
    Auth(String),
    #[error("未知的 OpenEdX 平台 '{0}'，可选值: {1}")]
    UnknownPlatform(String, String),
    #[error("必须至少提供一个课程链接，可使用 --course-list 查看可用课程")]
    MissingCourseUrls,
    #[error("{0}")]
    Selection(String),
    #[error("所选内容中没有找到任何可下载的资源")]
    NoResources,
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("无法解析来自 '{url}' 的响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("外部程序执行失败: {0}")]
    ExternalTool(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// 进程退出码，每类致命错误对应一个独立的值
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Auth(_) | AppError::UnknownPlatform(..) => 2,
            AppError::MissingCourseUrls => 3,
            AppError::Selection(_) => 4,
            AppError::NoResources => 6,
            AppError::UserInterrupt => 130,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
