//! # Tauri 命令层
//!
//! 命令层仅做 IPC 参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `ResizeServiceState`，保持命令函数薄、稳定。

use tauri::{AppHandle, State, Wry};

use super::clipboard::ClipboardImagePayload;
use super::dimensions::{DimensionQuery, Dimensions};
use super::request::{ResizeOutcome, ResizeRequestPayload};
use super::service::ResizeServiceState;
use crate::error::AppError;

/// 缩放图片并保存到输出目录或复制到剪贴板。
///
/// 结果同时以 `image:done` / `image:error` 事件发出，且只发一次。
#[tauri::command]
pub async fn resize_image(
    state: State<'_, ResizeServiceState>,
    app: AppHandle<Wry>,
    request: ResizeRequestPayload,
) -> Result<ResizeOutcome, AppError> {
    Ok(state.resize(&app, request).await)
}

/// 收敛表单宽高，并按需应用宽高比锁。
#[tauri::command]
pub fn resolve_dimensions(query: DimensionQuery) -> Dimensions {
    query.resolve()
}

/// 读取本地图片的原始宽高，供“浏览”选中的文件预填表单。
#[tauri::command]
pub async fn get_image_dimensions(
    state: State<'_, ResizeServiceState>,
    path: String,
) -> Result<Dimensions, AppError> {
    Ok(state.image_dimensions(path).await?)
}

/// 读取当前剪贴板图片，没有图片时返回 `null`。
#[tauri::command]
pub async fn read_clipboard_image(
    state: State<'_, ResizeServiceState>,
) -> Result<Option<ClipboardImagePayload>, AppError> {
    Ok(state.read_clipboard_image().await?)
}

/// 查询当前缩放档位。
#[tauri::command]
pub fn get_resize_quality(state: State<'_, ResizeServiceState>) -> String {
    state.quality().to_string()
}

/// 切换缩放档位（quality / balanced / speed）。
#[tauri::command]
pub fn set_resize_quality(
    state: State<'_, ResizeServiceState>,
    profile: String,
) -> Result<(), AppError> {
    state.set_quality(&profile)?;
    Ok(())
}
