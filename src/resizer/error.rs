//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载缩放链路中的所有失败来源，避免字符串拼接式错误处理。
//! 每个分支对应流水线中的一个阶段，`code()` / `stage()` 提供稳定的日志字段，
//! `Display` 文本直接作为 `image:error` 事件的消息发给前端。

/// 缩放请求链路统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    /// 没有可用的图片来源，或来源无法解析。
    #[error("输入无效：{0}")]
    InvalidInput(String),

    /// 缩放原语拒绝了输入（如图片损坏、尺寸超限）。
    #[error("缩放失败：{0}")]
    ResizeFailure(String),

    /// 输出目录或文件写入失败。
    #[error("写入失败：{0}")]
    Write(String),

    /// 缩放结果无法转换为剪贴板图像。
    #[error("剪贴板图像转换失败：{0}")]
    ClipboardConversion(String),

    /// 剪贴板无法打开或多次重试后仍写入失败。
    #[error("剪贴板不可用：{0}")]
    ClipboardUnavailable(String),
}

impl ResizeError {
    /// 稳定的错误码，用于日志检索。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ResizeFailure(_) => "resize_failure",
            Self::Write(_) => "write_error",
            Self::ClipboardConversion(_) => "clipboard_conversion",
            Self::ClipboardUnavailable(_) => "clipboard_unavailable",
        }
    }

    /// 出错所在的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "normalize",
            Self::ResizeFailure(_) => "resize",
            Self::Write(_) => "save",
            Self::ClipboardConversion(_) | Self::ClipboardUnavailable(_) => "clipboard",
        }
    }
}
