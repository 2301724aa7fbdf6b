//! # 完成通知模块
//!
//! 每个请求结束时向发起方发送且仅发送一个信号：
//! 成功发 `image:done`（无载荷），失败发 `image:error`（载荷为可读消息）。

use tauri::{AppHandle, Emitter, Wry};

use super::request::ResizeOutcome;
use super::ResizeError;

pub const IMAGE_DONE_EVENT: &str = "image:done";
pub const IMAGE_ERROR_EVENT: &str = "image:error";

/// 请求完成信号的接收端。
pub trait CompletionNotifier: Send + Sync {
    fn done(&self);
    fn error(&self, message: &str);
}

/// 把请求结果转换为唯一一个信号，并返回对应的 `ResizeOutcome`。
pub fn report<T>(notifier: &dyn CompletionNotifier, result: Result<T, ResizeError>) -> ResizeOutcome {
    match result {
        Ok(_) => {
            notifier.done();
            ResizeOutcome::done()
        }
        Err(err) => {
            log::error!(
                "❌ 缩放请求失败 - code={} stage={} {}",
                err.code(),
                err.stage(),
                err
            );
            let message = err.to_string();
            notifier.error(&message);
            ResizeOutcome::error(message)
        }
    }
}

/// 通过 Tauri 事件通知前端。
pub struct TauriNotifier {
    app: AppHandle<Wry>,
}

impl TauriNotifier {
    pub fn new(app: AppHandle<Wry>) -> Self {
        Self { app }
    }
}

impl CompletionNotifier for TauriNotifier {
    fn done(&self) {
        if let Err(err) = self.app.emit(IMAGE_DONE_EVENT, ()) {
            log::warn!("发送 {} 事件失败: {err}", IMAGE_DONE_EVENT);
        }
    }

    fn error(&self, message: &str) {
        if let Err(err) = self.app.emit(IMAGE_ERROR_EVENT, message) {
            log::warn!("发送 {} 事件失败: {err}", IMAGE_ERROR_EVENT);
        }
    }
}
