//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ResizerConfig`，保证运行时行为可观测、可调整、可测试。
//! 缩放质量（quality / balanced / speed）作为高层语义，映射到底层滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置（输出目录固定为 `~/imageresizer`）。
//! - `ResizeQuality` 负责档位字符串解析与反向输出。
//! - 单次请求使用配置快照，运行中切换档位不影响已开始的请求。

use fast_image_resize as fr;
use image::imageops::FilterType;

use super::ResizeError;

/// 缩放服务配置。
#[derive(Debug, Clone)]
pub struct ResizerConfig {
    /// 输出目录名，位于用户主目录下。
    pub output_dir_name: String,
    /// 显示名没有扩展名时使用的默认扩展名（不含点）。
    pub default_extension: String,
    /// 请求既没有文件名也没有路径时使用的显示名。
    pub fallback_display_name: String,
    /// 从剪贴板读取图片时建议的文件名。
    pub clipboard_suggested_name: String,
    /// 输入字节允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码前后允许的最大像素数（源图与目标图均校验）。
    pub max_decoded_pixels: u64,
    /// 缩放质量档位。
    pub quality: ResizeQuality,
    /// 保存成功后是否在文件管理器中打开输出目录。
    pub reveal_after_save: bool,
    /// 写入剪贴板失败时最大尝试次数。
    pub clipboard_retries: u32,
    /// 重试基础间隔（毫秒）。
    pub clipboard_retry_delay_ms: u64,
    /// 单次写入允许的总重试预算（毫秒）。
    pub clipboard_retry_max_total_ms: u64,
    /// 单次退避延迟上限（毫秒）。
    pub clipboard_retry_max_delay_ms: u64,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            output_dir_name: "imageresizer".to_string(),
            default_extension: "png".to_string(),
            fallback_display_name: "resized.png".to_string(),
            clipboard_suggested_name: "clipboard.png".to_string(),
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 100_000_000,
            quality: ResizeQuality::Balanced,
            reveal_after_save: true,
            clipboard_retries: 3,
            clipboard_retry_delay_ms: 100,
            clipboard_retry_max_total_ms: 1_800,
            clipboard_retry_max_delay_ms: 900,
        }
    }
}

/// 缩放质量档位。
///
/// - `Quality`：Lanczos3，尽量保真
/// - `Balanced`：CatmullRom，质量与速度平衡
/// - `Speed`：双线性，优先速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeQuality {
    Quality,
    Balanced,
    Speed,
}

impl ResizeQuality {
    /// 从外部字符串解析档位。
    pub fn parse(profile: &str) -> Result<Self, ResizeError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ResizeError::InvalidInput(format!(
                "未知缩放档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 稳定字符串，供前端展示。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    /// `image` 回退路径使用的滤镜。
    pub(crate) fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::Lanczos3,
            Self::Balanced => FilterType::CatmullRom,
            Self::Speed => FilterType::Triangle,
        }
    }

    /// `fast_image_resize` 快速路径使用的卷积滤镜。
    pub(crate) fn fast_filter(self) -> fr::FilterType {
        match self {
            Self::Quality => fr::FilterType::Lanczos3,
            Self::Balanced => fr::FilterType::CatmullRom,
            Self::Speed => fr::FilterType::Bilinear,
        }
    }
}
