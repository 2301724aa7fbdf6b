//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入形态”和“流水线中间结果”解耦：
//! - `FileData` 表示前端 `fileData` 字段在线路上的原始形态
//! - `ImageSource` 表示已判定的来源（三选一的标签联合）
//! - `CanonicalImage` 表示已加载但未解码的字节
//! - `ResizedImage` 表示缩放并重新编码后的结果
//! - `ClipboardImage` 表示可直接写入剪贴板的 RGBA 数据

use std::path::PathBuf;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Node 风格的字节数组描述：`{ "type": "Buffer", "data": [...] }`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteArrayDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<u8>,
}

impl ByteArrayDescriptor {
    pub const BUFFER_KIND: &'static str = "Buffer";

    pub fn new(data: Vec<u8>) -> Self {
        Self {
            kind: Self::BUFFER_KIND.to_string(),
            data,
        }
    }

    pub fn is_buffer(&self) -> bool {
        self.kind == Self::BUFFER_KIND
    }
}

/// `fileData` 字段的线路形态。
///
/// 未识别的形态保留在 `Unrecognized` 中，由请求边界显式拒绝。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileData {
    Bytes(Vec<u8>),
    Descriptor(ByteArrayDescriptor),
    Unrecognized(serde_json::Value),
}

/// 已判定的图片来源，每个请求恰好一种。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// 原始字节。
    RawBytes(Vec<u8>),
    /// `{type:'Buffer', data:[...]}` 描述。
    ByteArray(ByteArrayDescriptor),
    /// 本地文件路径。
    FilePath(PathBuf),
}

impl ImageSource {
    pub fn hint(&self) -> &'static str {
        match self {
            Self::RawBytes(_) => "bytes",
            Self::ByteArray(_) => "byte-array",
            Self::FilePath(_) => "file",
        }
    }
}

/// 归一化阶段输出：与来源形态无关的已编码图片字节。
#[derive(Debug)]
pub struct CanonicalImage {
    pub bytes: Vec<u8>,
    /// 来源提示（用于日志）。
    pub source_hint: &'static str,
}

/// 缩放阶段输出。
#[derive(Debug)]
pub struct ResizedImage {
    /// 编码后的图片字节。
    pub bytes: Vec<u8>,
    /// 实际编码格式。
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// 剪贴板原生图像表示：RGBA8，`width * height * 4` 字节。
#[derive(Debug, Clone)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
}
