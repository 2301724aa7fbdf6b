//! 输出目录管理模块
//!
//! # 设计思路
//!
//! 缩放结果统一保存到 `<用户主目录>/imageresizer`，目录名来自配置。
//! 目录在保存时按需创建（见 `resizer::save_to_dir`），这里只负责解析路径
//! 并向前端提供目录信息用于展示。
//!
//! # 实现思路
//!
//! - 主目录通过 Tauri 的路径解析器获取，失败返回 `AppError::Storage`。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tauri::{AppHandle, Manager, State, Wry};

use crate::error::AppError;
use crate::resizer::{ResizeServiceState, ResizerConfig};

/// 输出目录信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDirInfo {
    pub path: String,
    pub exists: bool,
    pub total_size: u64,
    pub file_count: u64,
}

/// 在给定主目录下拼出输出目录。
pub fn output_dir_in(home: &Path, config: &ResizerConfig) -> PathBuf {
    home.join(&config.output_dir_name)
}

/// 解析当前用户的输出目录（不创建）。
pub fn resolve_output_dir(app: &AppHandle<Wry>, config: &ResizerConfig) -> Result<PathBuf, AppError> {
    let home = app
        .path()
        .home_dir()
        .map_err(|e| AppError::Storage(format!("获取用户主目录失败: {}", e)))?;
    Ok(output_dir_in(&home, config))
}

/// 统计目录信息；目录不存在时返回零值。
pub fn dir_info(dir: &Path) -> OutputDirInfo {
    let mut total_size: u64 = 0;
    let mut file_count: u64 = 0;

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() {
                    total_size += metadata.len();
                    file_count += 1;
                }
            }
        }
    }

    OutputDirInfo {
        path: dir.to_string_lossy().to_string(),
        exists: dir.is_dir(),
        total_size,
        file_count,
    }
}

/// 获取输出目录信息（路径 + 占用大小 + 文件数）
#[tauri::command]
pub fn get_output_dir_info(
    app: AppHandle<Wry>,
    state: State<'_, ResizeServiceState>,
) -> Result<OutputDirInfo, AppError> {
    let config = state.handler().config_snapshot();
    let dir = resolve_output_dir(&app, &config)?;
    Ok(dir_info(&dir))
}
