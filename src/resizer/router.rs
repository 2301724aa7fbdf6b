//! # 输出路由模块
//!
//! ## 设计思路
//!
//! 缩放结果只有两个去向，且每个请求只走其中一个：
//! - `Save`：写入固定输出目录，并在文件管理器中打开该目录
//! - `Clipboard`：转换为剪贴板原生 RGBA 图像并写入系统剪贴板
//!
//! 剪贴板与“打开目录”两个外部副作用抽象为 `ClipboardSink` / `DirectoryRevealer`，
//! 生产环境使用系统实现，测试注入记录型替身。
//!
//! ## 实现思路
//!
//! 文件写入与剪贴板写入都是阻塞调用，统一放入 `spawn_blocking`，
//! 请求处理期间前端保持响应。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::GenericImageView;

use super::clipboard::SystemClipboard;
use super::request::{OutputMode, ResizeRequest};
use super::reveal::SystemRevealer;
use super::source::{ClipboardImage, ResizedImage};
use super::{ResizeError, ResizerConfig};

/// 剪贴板写入端。
pub trait ClipboardSink: Send + Sync {
    fn write_image(&self, image: ClipboardImage) -> Result<(), ResizeError>;
}

/// 在系统文件管理器中打开目录。
pub trait DirectoryRevealer: Send + Sync {
    fn reveal(&self, dir: &Path) -> Result<(), ResizeError>;
}

/// 路由结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// 已写入磁盘，附带完整路径。
    Saved(PathBuf),
    /// 已写入剪贴板。
    Copied,
}

/// 输出路由器，持有输出目录与两个外部副作用端。
#[derive(Clone)]
pub struct OutputRouter {
    output_dir: PathBuf,
    clipboard: Arc<dyn ClipboardSink>,
    revealer: Arc<dyn DirectoryRevealer>,
}

impl OutputRouter {
    pub fn new(
        output_dir: PathBuf,
        clipboard: Arc<dyn ClipboardSink>,
        revealer: Arc<dyn DirectoryRevealer>,
    ) -> Self {
        Self {
            output_dir,
            clipboard,
            revealer,
        }
    }

    /// 使用常驻的系统剪贴板与系统文件管理器。
    pub fn system(output_dir: PathBuf, clipboard: Arc<SystemClipboard>) -> Self {
        Self::new(output_dir, clipboard, Arc::new(SystemRevealer))
    }

    /// 按请求的输出模式分派，二者互斥。
    pub async fn route(
        &self,
        resized: ResizedImage,
        request: &ResizeRequest,
        config: &ResizerConfig,
    ) -> Result<Delivery, ResizeError> {
        match request.output_mode {
            OutputMode::Save => {
                let file_name = output_file_name(
                    &request.display_name,
                    request.width,
                    request.height,
                    &config.default_extension,
                );
                let dir = self.output_dir.clone();
                let path = tokio::task::spawn_blocking(move || save_to_dir(&dir, &file_name, &resized.bytes))
                    .await
                    .map_err(|e| ResizeError::Write(format!("线程执行失败：{}", e)))??;

                if config.reveal_after_save {
                    if let Err(err) = self.revealer.reveal(&self.output_dir) {
                        log::warn!("⚠️ 打开输出目录失败（不影响保存结果）：{}", err);
                    }
                }
                Ok(Delivery::Saved(path))
            }
            OutputMode::Clipboard => {
                let clipboard = Arc::clone(&self.clipboard);
                tokio::task::spawn_blocking(move || {
                    let image = to_clipboard_image(&resized.bytes)?;
                    clipboard.write_image(image)
                })
                .await
                .map_err(|e| ResizeError::ClipboardUnavailable(format!("线程执行失败：{}", e)))??;
                Ok(Delivery::Copied)
            }
        }
    }
}

/// 在原扩展名前插入 `-{width}-{height}`；没有扩展名时使用 `default_extension`。
///
/// `photo.jpg` + 200×100 → `photo-200-100.jpg`，`photo` → `photo-200-100.png`。
pub fn output_file_name(display_name: &str, width: u32, height: u32, default_extension: &str) -> String {
    let path = Path::new(display_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| display_name.to_string());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| default_extension.trim_start_matches('.').to_string());

    format!("{}-{}-{}.{}", stem, width, height, extension)
}

/// 确保目录存在并写入文件，返回完整路径。同名文件直接覆盖。
pub fn save_to_dir(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ResizeError> {
    fs::create_dir_all(dir)
        .map_err(|e| ResizeError::Write(format!("创建输出目录 '{}' 失败：{}", dir.display(), e)))?;

    let path = dir.join(file_name);
    fs::write(&path, bytes)
        .map_err(|e| ResizeError::Write(format!("写入 '{}' 失败：{}", path.display(), e)))?;

    log::info!("💾 已保存缩放结果 - {}", path.display());
    Ok(path)
}

/// 将已编码图片转换为剪贴板原生 RGBA 表示。
pub fn to_clipboard_image(bytes: &[u8]) -> Result<ClipboardImage, ResizeError> {
    if bytes.is_empty() {
        return Err(ResizeError::ClipboardConversion("图片内容为空".to_string()));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ResizeError::ClipboardConversion(format!("无法解码缩放结果：{}", e)))?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(ResizeError::ClipboardConversion(format!(
            "图像尺寸无效：{}x{}",
            width, height
        )));
    }

    let rgba = decoded.to_rgba8().into_raw();
    let expected_len = (width as usize) * (height as usize) * 4;
    if rgba.len() != expected_len {
        return Err(ResizeError::ClipboardConversion("像素数据长度异常".to_string()));
    }

    Ok(ClipboardImage {
        width: width as usize,
        height: height as usize,
        bytes: rgba,
    })
}
