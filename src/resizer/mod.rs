//! # 图片缩放模块（resizer）
//!
//! ## 设计思路
//!
//! 该模块将“来源判定 → 输入归一化 → 缩放 → 输出路由 → 完成通知”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `commands`：仅做 IPC 入参/出参适配（薄封装）
//! - `service`：承载可注入状态（`ResizeServiceState`）
//! - `handler`：编排整条处理流水线
//! - `request`：线路载荷与 `ResizeRequest` 判定边界
//! - `dimensions`：宽高收敛与宽高比锁
//! - `normalizer`：三种来源归一化为同一份字节
//! - `pipeline`：解码、缩放、重新编码
//! - `router`：保存到磁盘或写入剪贴板（二选一）
//! - `clipboard`：剪贴板读写与重试
//! - `notifier`：`image:done` / `image:error` 事件
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! 前端 invoke('resize_image')
//!    ↓
//! commands.rs（参数适配）
//!    ↓
//! service.rs（State 注入、解析输出目录）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ request.rs（载荷 → ResizeRequest）
//!    ├─ normalizer.rs（来源 → 字节）
//!    ├─ pipeline.rs（解码 + 缩放 + 编码）
//!    └─ router.rs（保存 + 打开目录 | 剪贴板）
//!    ↓
//! notifier.rs（image:done | image:error）
//! ```

pub mod commands;
mod clipboard;
mod config;
pub mod dimensions;
mod error;
mod handler;
mod normalizer;
mod notifier;
mod pipeline;
mod request;
mod reveal;
mod router;
mod service;
mod source;

pub use clipboard::{ClipboardImagePayload, RetryPolicy, SystemClipboard};
pub use config::{ResizeQuality, ResizerConfig};
pub use dimensions::{AspectLock, DimensionInput, DimensionQuery, Dimensions};
pub use error::ResizeError;
pub use handler::ResizeHandler;
pub use normalizer::{file_dimensions, normalize};
pub use notifier::{report, CompletionNotifier, TauriNotifier, IMAGE_DONE_EVENT, IMAGE_ERROR_EVENT};
pub use pipeline::resize_image as resize_canonical;
pub use request::{OutputMode, ResizeOutcome, ResizeRequest, ResizeRequestPayload, ResizeStatus};
pub use reveal::SystemRevealer;
pub use router::{output_file_name, save_to_dir, to_clipboard_image, ClipboardSink, Delivery, DirectoryRevealer, OutputRouter};
pub use service::ResizeServiceState;
pub use source::{ByteArrayDescriptor, CanonicalImage, ClipboardImage, FileData, ImageSource, ResizedImage};
