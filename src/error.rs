//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，所有非流水线的 `#[tauri::command]`
//! 统一返回 `Result<T, AppError>`，前端获得一致的错误格式。
//! 缩放流水线内部使用 `ResizeError`，经 `From` 上转为 `AppError`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

use crate::resizer::ResizeError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 缩放流水线错误（输入 / 缩放 / 写入 / 剪贴板）
    #[error("{0}")]
    Resize(#[from] ResizeError),

    /// 输出目录不可用
    #[error("输出目录不可用: {0}")]
    Storage(String),

    /// 窗口或菜单操作失败
    #[error("窗口操作失败: {0}")]
    Window(String),
}

impl From<tauri::Error> for AppError {
    fn from(error: tauri::Error) -> Self {
        Self::Window(error.to_string())
    }
}

/// Tauri IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
