//! # 剪贴板桥接模块
//!
//! ## 设计思路
//!
//! 与操作系统剪贴板交互的逻辑独立在这里，便于隔离平台不稳定因素：
//! - 写入：缩放结果（RGBA）写入系统剪贴板，带有限重试
//! - 读取：前端“粘贴”按钮读取当前剪贴板图片，编码为 PNG 返回
//!
//! ## 实现思路
//!
//! - 统一通过 `arboard` 访问剪贴板，调用方负责在阻塞线程中执行。
//! - 写入失败按 Busy / Transient / Fatal 分类，只有前两类重试。
//! - 重试采用指数退避 + 抖动，并受总时间预算约束。
//! - 写入句柄由常驻线程持有，见 `SystemClipboard`。

use std::borrow::Cow;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use image::{ImageFormat, RgbaImage};
use serde::Serialize;

use super::router::ClipboardSink;
use super::source::ClipboardImage;
use super::{ResizeError, ResizerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClipboardFailureKind {
    Busy,
    Transient,
    Fatal,
}

#[derive(Debug, Clone)]
pub(crate) struct ClipboardWriteFailure {
    pub(crate) kind: ClipboardFailureKind,
    pub(crate) message: String,
}

impl ClipboardWriteFailure {
    pub(crate) fn new(kind: ClipboardFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self.kind, ClipboardFailureKind::Busy | ClipboardFailureKind::Transient)
    }
}

impl From<arboard::Error> for ClipboardWriteFailure {
    fn from(error: arboard::Error) -> Self {
        let kind = match error {
            arboard::Error::ClipboardOccupied => ClipboardFailureKind::Busy,
            arboard::Error::ConversionFailure | arboard::Error::ClipboardNotSupported => {
                ClipboardFailureKind::Fatal
            }
            _ => ClipboardFailureKind::Transient,
        };
        Self::new(kind, error.to_string())
    }
}

/// 剪贴板写入重试策略。
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_total_ms: u64,
    pub max_delay_ms: u64,
}

impl From<&ResizerConfig> for RetryPolicy {
    fn from(config: &ResizerConfig) -> Self {
        Self {
            attempts: config.clipboard_retries,
            base_delay_ms: config.clipboard_retry_delay_ms,
            max_total_ms: config.clipboard_retry_max_total_ms,
            max_delay_ms: config.clipboard_retry_max_delay_ms,
        }
    }
}

static JITTER_STATE: AtomicU64 = AtomicU64::new(0);

fn seed_jitter_state() -> u64 {
    let time_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let state = time_seed ^ ((std::process::id() as u64) << 32) ^ 0x9E37_79B9_7F4A_7C15;
    if state == 0 { 0xA5A5_5A5A_0123_4567 } else { state }
}

fn next_jitter_u64() -> u64 {
    let mut current = JITTER_STATE.load(Ordering::Relaxed);

    loop {
        let mut next = if current == 0 { seed_jitter_state() } else { current };
        next ^= next << 13;
        next ^= next >> 7;
        next ^= next << 17;

        match JITTER_STATE.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => current = observed,
        }
    }
}

pub(crate) fn compute_backoff_delay_with_jitter(base_delay_ms: u64, attempt: u32, max_delay_ms: u64) -> u64 {
    let exp = base_delay_ms.saturating_mul(1_u64 << attempt.saturating_sub(1).min(8));
    let capped = exp.min(max_delay_ms.max(base_delay_ms));
    let jitter_bound = (capped / 3).max(1);
    let jitter = next_jitter_u64() % (jitter_bound + 1);
    capped.saturating_add(jitter)
}

pub(crate) fn would_exceed_retry_budget(elapsed_ms: u64, wait_ms: u64, budget_ms: u64) -> bool {
    elapsed_ms.saturating_add(wait_ms) > budget_ms
}

/// 按策略执行写入，直到成功、遇到不可重试错误或预算耗尽。
pub(crate) fn write_with_retry<F>(policy: RetryPolicy, mut attempt_write: F) -> Result<u32, ResizeError>
where
    F: FnMut() -> Result<(), ClipboardWriteFailure>,
{
    let attempts = policy.attempts.max(1);
    let started = Instant::now();
    let mut last_error = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let wait_ms = compute_backoff_delay_with_jitter(
                policy.base_delay_ms.max(1),
                attempt - 1,
                policy.max_delay_ms,
            );

            if would_exceed_retry_budget(elapsed_ms, wait_ms, policy.max_total_ms) {
                log::warn!(
                    "⏱️ 跳过第 {} 次重试：等待 {}ms 会超过预算 {}ms",
                    attempt,
                    wait_ms,
                    policy.max_total_ms
                );
                break;
            }

            log::debug!("🔄 重试 {}/{}，等待 {}ms", attempt, attempts, wait_ms);
            std::thread::sleep(Duration::from_millis(wait_ms));
        }

        match attempt_write() {
            Ok(()) => {
                log::info!("📋 已写入剪贴板 (尝试 {})", attempt);
                return Ok(attempt);
            }
            Err(failure) => {
                log::warn!(
                    "❌ 剪贴板写入尝试 {} 失败: {}（kind={:?}）",
                    attempt,
                    failure.message,
                    failure.kind
                );
                let retryable = failure.is_retryable();
                last_error = Some(failure.message);
                if !retryable {
                    break;
                }
            }
        }
    }

    Err(ResizeError::ClipboardUnavailable(
        last_error.unwrap_or_else(|| "未知错误".to_string()),
    ))
}

/// 在持有线程上写入图片的剪贴板后端。
pub(crate) trait ClipboardBackend {
    fn set_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardWriteFailure>;
}

impl ClipboardBackend for arboard::Clipboard {
    fn set_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardWriteFailure> {
        arboard::Clipboard::set_image(
            self,
            arboard::ImageData {
                width: image.width,
                height: image.height,
                bytes: Cow::Borrowed(image.bytes.as_slice()),
            },
        )?;
        Ok(())
    }
}

/// 在持有线程上打开剪贴板后端。
pub(crate) type BackendOpener =
    Arc<dyn Fn() -> Result<Box<dyn ClipboardBackend>, ClipboardWriteFailure> + Send + Sync>;

struct WriteCommand {
    image: Arc<ClipboardImage>,
    reply: mpsc::Sender<Result<(), ClipboardWriteFailure>>,
}

/// 基于 `arboard` 的系统剪贴板。
///
/// 剪贴板句柄由一个常驻的持有线程打开并一直保留，写入请求通过通道交给它执行。
/// X11 / Wayland 下只有句柄存活时其他程序才能粘贴到内容；持有线程随
/// `SystemClipboard` 一同退出。
pub struct SystemClipboard {
    policy: RetryPolicy,
    opener: BackendOpener,
    owner: Mutex<Option<mpsc::Sender<WriteCommand>>>,
}

impl SystemClipboard {
    pub fn new(policy: RetryPolicy) -> Self {
        let opener: BackendOpener = Arc::new(|| {
            arboard::Clipboard::new()
                .map(|clipboard| Box::new(clipboard) as Box<dyn ClipboardBackend>)
                .map_err(|e| {
                    ClipboardWriteFailure::new(ClipboardFailureKind::Busy, format!("无法访问剪贴板：{}", e))
                })
        });
        Self::with_opener(policy, opener)
    }

    pub(crate) fn with_opener(policy: RetryPolicy, opener: BackendOpener) -> Self {
        Self {
            policy,
            opener,
            owner: Mutex::new(None),
        }
    }

    /// 取得持有线程的发送端，首次调用时启动线程。
    fn owner(&self) -> Result<mpsc::Sender<WriteCommand>, ClipboardWriteFailure> {
        let mut owner = self.owner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = owner.as_ref() {
            return Ok(sender.clone());
        }

        let (sender, commands) = mpsc::channel();
        let opener = Arc::clone(&self.opener);
        std::thread::Builder::new()
            .name("clipboard-owner".to_string())
            .spawn(move || run_owner(opener, commands))
            .map_err(|e| {
                ClipboardWriteFailure::new(ClipboardFailureKind::Fatal, format!("无法启动剪贴板线程：{}", e))
            })?;

        *owner = Some(sender.clone());
        Ok(sender)
    }

    fn reset_owner(&self) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn write_once(&self, image: &Arc<ClipboardImage>) -> Result<(), ClipboardWriteFailure> {
        let owner = self.owner()?;
        let (reply, response) = mpsc::channel();
        let command = WriteCommand {
            image: Arc::clone(image),
            reply,
        };

        let lost = || ClipboardWriteFailure::new(ClipboardFailureKind::Transient, "剪贴板线程已退出");
        if owner.send(command).is_err() {
            self.reset_owner();
            return Err(lost());
        }
        response.recv().unwrap_or_else(|_| {
            self.reset_owner();
            Err(lost())
        })
    }
}

fn run_owner(opener: BackendOpener, commands: mpsc::Receiver<WriteCommand>) {
    let mut backend: Option<Box<dyn ClipboardBackend>> = None;
    for command in commands {
        let result = write_on_owner(&opener, &mut backend, &command.image);
        let _ = command.reply.send(result);
    }
    log::debug!("📋 剪贴板持有线程退出");
}

fn write_on_owner(
    opener: &BackendOpener,
    backend: &mut Option<Box<dyn ClipboardBackend>>,
    image: &ClipboardImage,
) -> Result<(), ClipboardWriteFailure> {
    if backend.is_none() {
        *backend = Some(opener()?);
    }
    let Some(clipboard) = backend.as_mut() else {
        return Err(ClipboardWriteFailure::new(ClipboardFailureKind::Transient, "剪贴板未打开"));
    };

    let result = clipboard.set_image(image);
    if let Err(failure) = &result {
        // 非占用类失败时重新打开句柄
        if failure.kind != ClipboardFailureKind::Busy {
            *backend = None;
        }
    }
    result
}

impl ClipboardSink for SystemClipboard {
    fn write_image(&self, image: ClipboardImage) -> Result<(), ResizeError> {
        log::debug!("📋 准备复制到剪贴板 - {}x{}", image.width, image.height);

        let image = Arc::new(image);
        write_with_retry(self.policy, || self.write_once(&image)).map(|_| ())
    }
}

/// 剪贴板读取结果，供前端预览并作为请求来源回传。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardImagePayload {
    /// PNG 编码的图片字节。
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub suggested_name: String,
}

/// 读取当前剪贴板图片；剪贴板中没有图片时返回 `None`。
///
/// 阻塞调用，异步上下文中应放入 `spawn_blocking`。
pub fn read_clipboard_image(suggested_name: &str) -> Result<Option<ClipboardImagePayload>, ResizeError> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| ResizeError::ClipboardUnavailable(format!("无法访问剪贴板：{}", e)))?;

    let image_data = match clipboard.get_image() {
        Ok(data) => data,
        Err(arboard::Error::ContentNotAvailable) => return Ok(None),
        Err(e) => {
            return Err(ResizeError::ClipboardUnavailable(format!("读取剪贴板图片失败：{}", e)));
        }
    };

    let rgba = ClipboardImage {
        width: image_data.width,
        height: image_data.height,
        bytes: image_data.bytes.into_owned(),
    };
    if rgba.width == 0 || rgba.height == 0 {
        return Ok(None);
    }

    encode_clipboard_png(rgba, suggested_name).map(Some)
}

/// 将剪贴板 RGBA 数据编码为 PNG 载荷。
pub(crate) fn encode_clipboard_png(
    image: ClipboardImage,
    suggested_name: &str,
) -> Result<ClipboardImagePayload, ResizeError> {
    let width = image.width as u32;
    let height = image.height as u32;
    let buffer = RgbaImage::from_raw(width, height, image.bytes)
        .ok_or_else(|| ResizeError::ClipboardConversion("剪贴板像素数据长度异常".to_string()))?;

    let mut cursor = Cursor::new(Vec::new());
    buffer
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ResizeError::ClipboardConversion(format!("PNG 编码失败：{}", e)))?;

    Ok(ClipboardImagePayload {
        bytes: cursor.into_inner(),
        width,
        height,
        suggested_name: suggested_name.to_string(),
    })
}
