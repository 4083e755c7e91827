// src/config/file.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) fn get_config_dir() -> AppResult<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME);
    Ok(dir)
}

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    Ok(get_config_dir()?.join(constants::CONFIG_FILE_NAME))
}

/// 读取用户配置文件。文件不存在时返回默认配置，不会创建文件。
pub(crate) fn load_external_config() -> AppResult<ExternalConfig> {
    match get_config_path() {
        Ok(config_path) => load_external_config_from(&config_path),
        Err(e) => {
            warn!("{}，使用内置默认配置。", e);
            Ok(ExternalConfig::default())
        }
    }
}

pub fn load_external_config_from(config_path: &Path) -> AppResult<ExternalConfig> {
    if !config_path.is_file() {
        debug!("配置文件 {:?} 不存在，使用内置默认配置。", config_path);
        return Ok(ExternalConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
    let config: ExternalConfig = serde_json::from_str(&content)
        .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))?;
    info!(
        "已加载配置文件 {:?} (自定义平台 {} 个)",
        config_path,
        config.platforms.len()
    );
    Ok(config)
}
