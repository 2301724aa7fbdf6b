//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `ResizeServiceState` 作为 Tauri 注入状态，替代全局单例函数。
//! 生命周期由 `main.rs` 统一管理；测试可以创建独立实例。
//!
//! ## 实现思路
//!
//! 对外仅暴露少量稳定 API：
//! - `resize`：解析输出目录并执行完整缩放链路，发送唯一的完成事件
//! - `read_clipboard_image`：剪贴板读取桥接
//! - `image_dimensions`：读取本地图片原始尺寸
//!
//! 系统剪贴板写入端随服务状态常驻：Linux 上剪贴板内容只在持有者存活时可被粘贴，
//! 因此不能在每次请求结束后释放。
//! - `set_quality` / `quality`：切换与查询缩放档位

use std::path::PathBuf;
use std::sync::Arc;

use tauri::{AppHandle, Wry};

use super::clipboard::{self, ClipboardImagePayload, RetryPolicy, SystemClipboard};
use super::dimensions::Dimensions;
use super::normalizer::file_dimensions;
use super::notifier::{report, TauriNotifier};
use super::request::{ResizeOutcome, ResizeRequestPayload};
use super::router::OutputRouter;
use super::{ResizeError, ResizeHandler, ResizeQuality, ResizerConfig};
use crate::storage;

/// 缩放服务状态。
pub struct ResizeServiceState {
    handler: ResizeHandler,
    clipboard: Arc<SystemClipboard>,
}

impl Default for ResizeServiceState {
    fn default() -> Self {
        Self::with_config(ResizerConfig::default())
    }
}

impl ResizeServiceState {
    /// 使用默认配置创建服务状态。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use image_resizer::resizer::ResizeServiceState;
    ///
    /// let service = ResizeServiceState::new();
    /// assert_eq!(service.quality(), "balanced");
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResizerConfig) -> Self {
        let clipboard = Arc::new(SystemClipboard::new(RetryPolicy::from(&config)));
        Self {
            handler: ResizeHandler::new(config),
            clipboard,
        }
    }

    pub fn handler(&self) -> &ResizeHandler {
        &self.handler
    }

    /// 当前配置下的输出目录（`<home>/imageresizer`）。
    pub fn output_dir(&self, app: &AppHandle<Wry>) -> Result<PathBuf, ResizeError> {
        let config = self.handler.config_snapshot();
        storage::resolve_output_dir(app, &config)
            .map_err(|e| ResizeError::Write(e.to_string()))
    }

    /// 处理一次缩放请求并通过 Tauri 事件通知前端。
    pub async fn resize(&self, app: &AppHandle<Wry>, payload: ResizeRequestPayload) -> ResizeOutcome {
        let notifier = TauriNotifier::new(app.clone());
        match self.output_dir(app) {
            Ok(dir) => {
                let router = OutputRouter::system(dir, self.clipboard.clone());
                self.handler.handle(payload, &router, &notifier).await
            }
            Err(err) => report::<()>(&notifier, Err(err)),
        }
    }

    /// 读取当前剪贴板图片（PNG），没有图片时返回 `None`。
    pub async fn read_clipboard_image(&self) -> Result<Option<ClipboardImagePayload>, ResizeError> {
        let suggested_name = self.handler.config_snapshot().clipboard_suggested_name;
        tokio::task::spawn_blocking(move || clipboard::read_clipboard_image(&suggested_name))
            .await
            .map_err(|e| ResizeError::ClipboardUnavailable(format!("线程执行失败：{}", e)))?
    }

    /// 读取本地图片的原始宽高（只解析 header）。
    pub async fn image_dimensions(&self, path: String) -> Result<Dimensions, ResizeError> {
        tokio::task::spawn_blocking(move || file_dimensions(&PathBuf::from(path)))
            .await
            .map_err(|e| ResizeError::InvalidInput(format!("线程执行失败：{}", e)))?
    }

    pub fn set_quality(&self, profile: &str) -> Result<(), ResizeError> {
        let quality = ResizeQuality::parse(profile)?;
        self.handler.set_quality(quality);
        Ok(())
    }

    pub fn quality(&self) -> &'static str {
        self.handler.quality().as_str()
    }
}
