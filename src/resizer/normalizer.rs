//! # 输入归一化模块
//!
//! ## 设计思路
//!
//! 三种来源（原始字节 / 字节数组描述 / 本地路径）在这里收敛成同一份
//! `CanonicalImage`，后续阶段不再关心来源形态。
//!
//! ## 实现思路
//!
//! - 字节来源：直接接管所有权，不复制。
//! - 文件来源：存在性 + metadata 体积限制 + 读取。
//! - 统一做空内容、体积上限与文件签名检查；签名明确不是图片的直接拒绝，
//!   无法识别的交给解码阶段判定。
//! - 浏览对话框选中的路径先通过 `file_dimensions` 只读 header 取得原图尺寸，
//!   供表单预填与宽高比锁使用。

use std::path::Path;

use super::dimensions::Dimensions;
use super::source::{CanonicalImage, ImageSource};
use super::{ResizeError, ResizerConfig};

/// 将任意来源归一化为已编码的图片字节。
pub fn normalize(source: ImageSource, config: &ResizerConfig) -> Result<CanonicalImage, ResizeError> {
    let source_hint = source.hint();
    let bytes = match source {
        ImageSource::RawBytes(bytes) => bytes,
        ImageSource::ByteArray(descriptor) => descriptor.data,
        ImageSource::FilePath(path) => read_file(&path, config)?,
    };

    validate_size(bytes.len() as u64, config)?;
    validate_signature(&bytes)?;

    log::debug!("📥 输入归一化完成 - 来源: {} 大小: {} 字节", source_hint, bytes.len());

    Ok(CanonicalImage { bytes, source_hint })
}

/// 只读取本地图片的 header，返回原图宽高。
pub fn file_dimensions(path: &Path) -> Result<Dimensions, ResizeError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        ResizeError::InvalidInput(format!("无法读取文件信息 {}：{}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(ResizeError::InvalidInput(format!("不是文件：{}", path.display())));
    }

    let (width, height) = image::image_dimensions(path).map_err(|e| {
        ResizeError::InvalidInput(format!("无法读取图片尺寸 {}：{}", path.display(), e))
    })?;
    log::debug!("📐 原图尺寸 - {} {}x{}", path.display(), width, height);
    Ok(Dimensions { width, height })
}

fn read_file(path: &Path, config: &ResizerConfig) -> Result<Vec<u8>, ResizeError> {
    log::info!("📁 读取本地图片 - 路径: {}", path.display());

    let metadata = std::fs::metadata(path).map_err(|e| {
        ResizeError::InvalidInput(format!("无法读取文件信息 {}：{}", path.display(), e))
    })?;

    if !metadata.is_file() {
        return Err(ResizeError::InvalidInput(format!(
            "不是文件：{}",
            path.display()
        )));
    }
    validate_size(metadata.len(), config)?;

    std::fs::read(path)
        .map_err(|e| ResizeError::InvalidInput(format!("无法读取图片文件：{}", e)))
}

fn validate_size(len: u64, config: &ResizerConfig) -> Result<(), ResizeError> {
    if len == 0 {
        return Err(ResizeError::InvalidInput("图片内容为空".to_string()));
    }
    if len > config.max_file_size {
        return Err(ResizeError::InvalidInput(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            len as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

fn validate_signature(bytes: &[u8]) -> Result<(), ResizeError> {
    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ResizeError::InvalidInput(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }
    }
    Ok(())
}
