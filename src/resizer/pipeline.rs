//! # 缩放流水线模块
//!
//! ## 设计思路
//!
//! 这里是唯一委托外部缩放原语的地方。像素重采样本身交给
//! `fast_image_resize`（失败时回退 `image::resize_exact`），本模块只负责
//! “字节 → 图像 → 缩放 → 字节”的串联与资源上限。
//!
//! ## 实现思路
//!
//! 1. 读取 header 尺寸，按像素上限快速拒绝（源图与目标图都要校验）
//! 2. 完整解码
//! 3. 缩放到精确的目标宽高
//! 4. 以源格式重新编码；该格式不可写或编码失败时回退 PNG

use fast_image_resize as fr;
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, ImageReader, Rgba};
use std::io::Cursor;

use super::source::{CanonicalImage, ResizedImage};
use super::{ResizeError, ResizeQuality, ResizerConfig};

/// 将已编码图片缩放到 `width`×`height` 并重新编码。
pub fn resize_image(
    image: &CanonicalImage,
    width: u32,
    height: u32,
    config: &ResizerConfig,
) -> Result<ResizedImage, ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::ResizeFailure(format!(
            "目标尺寸必须为正数：{}x{}",
            width, height
        )));
    }
    validate_pixel_limits(config, width, height)?;

    let source_format = image::guess_format(&image.bytes).ok();
    let (header_width, header_height) = inspect_dimensions(&image.bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&image.bytes)
        .map_err(|e| ResizeError::ResizeFailure(format!("图片解码失败：{}", e)))?;
    let (source_width, source_height) = decoded.dimensions();

    let resized = match resize_with_fast_image_resize(&decoded, width, height, config.quality) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
            decoded.resize_exact(width, height, config.quality.filter())
        }
    };

    let (bytes, format) = encode(&resized, source_format)?;

    log::info!(
        "✅ 缩放完成 - 来源: {} {}x{} -> {}x{} 格式: {:?} 输出: {}KB",
        image.source_hint,
        source_width,
        source_height,
        width,
        height,
        format,
        bytes.len() / 1024
    );

    Ok(ResizedImage {
        bytes,
        format,
        width,
        height,
    })
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), ResizeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ResizeError::ResizeFailure(format!("无法识别图片格式：{}", e)))?
        .into_dimensions()
        .map_err(|e| ResizeError::ResizeFailure(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &ResizerConfig, width: u32, height: u32) -> Result<(), ResizeError> {
    let pixels = (width as u64) * (height as u64);
    if pixels > config.max_decoded_pixels {
        return Err(ResizeError::ResizeFailure(format!(
            "图片像素过大：{}x{}（限制：{} 像素）",
            width, height, config.max_decoded_pixels
        )));
    }
    Ok(())
}

fn resize_with_fast_image_resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    quality: ResizeQuality,
) -> Result<DynamicImage, ResizeError> {
    let src = image.to_rgba8();
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        src.into_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ResizeError::ResizeFailure(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(quality.fast_filter()));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ResizeError::ResizeFailure(format!("fast_image_resize 执行失败：{}", e)))?;

    let rgba = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
        target_width,
        target_height,
        dst_image.into_vec(),
    )
    .ok_or_else(|| ResizeError::ResizeFailure("fast_image_resize 输出缓冲长度异常".to_string()))?;

    Ok(DynamicImage::ImageRgba8(rgba))
}

fn encode(
    image: &DynamicImage,
    source_format: Option<ImageFormat>,
) -> Result<(Vec<u8>, ImageFormat), ResizeError> {
    if let Some(format) = source_format.filter(|f| f.writing_enabled()) {
        match encode_as(image, format) {
            Ok(bytes) => return Ok((bytes, format)),
            Err(err) => log::warn!("⚠️ 无法以 {:?} 编码，回退 PNG：{}", format, err),
        }
    }
    encode_as(image, ImageFormat::Png).map(|bytes| (bytes, ImageFormat::Png))
}

fn encode_as(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ResizeError> {
    let mut cursor = Cursor::new(Vec::new());
    let result = match format {
        // JPEG 不支持 alpha 通道
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut cursor, format),
        _ => image.write_to(&mut cursor, format),
    };
    result.map_err(|e| ResizeError::ResizeFailure(format!("图片编码失败：{}", e)))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> CanonicalImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        });
        let dyn_img = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
            _ => DynamicImage::ImageRgba8(img),
        };
        let mut cursor = Cursor::new(Vec::new());
        dyn_img
            .write_to(&mut cursor, format)
            .expect("failed to encode test image");
        CanonicalImage {
            bytes: cursor.into_inner(),
            source_hint: "test",
        }
    }

    fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
        image::load_from_memory(bytes).expect("output should decode").dimensions()
    }

    #[test]
    fn png_is_resized_to_exact_target() {
        let input = encoded(320, 200, ImageFormat::Png);
        let output = resize_image(&input, 160, 40, &ResizerConfig::default()).unwrap();

        assert_eq!(output.format, ImageFormat::Png);
        assert_eq!((output.width, output.height), (160, 40));
        assert_eq!(decoded_dimensions(&output.bytes), (160, 40));
        assert_ne!(output.bytes, input.bytes);
    }

    #[test]
    fn jpeg_stays_jpeg() {
        let input = encoded(64, 64, ImageFormat::Jpeg);
        let output = resize_image(&input, 200, 100, &ResizerConfig::default()).unwrap();

        assert_eq!(output.format, ImageFormat::Jpeg);
        assert_eq!(decoded_dimensions(&output.bytes), (200, 100));
    }

    #[test]
    fn one_by_one_target_is_allowed() {
        let input = encoded(50, 30, ImageFormat::Png);
        let output = resize_image(&input, 1, 1, &ResizerConfig::default()).unwrap();
        assert_eq!(decoded_dimensions(&output.bytes), (1, 1));
    }

    #[test]
    fn corrupt_image_is_resize_failure() {
        let mut input = encoded(40, 40, ImageFormat::Png);
        input.bytes.truncate(40);
        let result = resize_image(&input, 10, 10, &ResizerConfig::default());
        assert!(matches!(result, Err(ResizeError::ResizeFailure(_))));

        let garbage = CanonicalImage {
            bytes: vec![1, 2, 3, 4, 5],
            source_hint: "test",
        };
        let result = resize_image(&garbage, 10, 10, &ResizerConfig::default());
        assert!(matches!(result, Err(ResizeError::ResizeFailure(_))));
    }

    #[test]
    fn oversized_target_is_rejected_before_decode() {
        let config = ResizerConfig {
            max_decoded_pixels: 10_000,
            ..ResizerConfig::default()
        };
        let input = encoded(10, 10, ImageFormat::Png);
        let result = resize_image(&input, 1000, 1000, &config);
        assert!(matches!(result, Err(ResizeError::ResizeFailure(_))));
    }

    #[test]
    fn oversized_source_is_rejected_even_for_small_target() {
        let config = ResizerConfig {
            max_decoded_pixels: 100,
            ..ResizerConfig::default()
        };
        let input = encoded(20, 20, ImageFormat::Png);

        let result = resize_image(&input, 5, 5, &config);
        match result {
            Err(ResizeError::ResizeFailure(message)) => assert!(message.contains("20x20")),
            other => panic!("unexpected result: {:?}", other.map(|o| o.format)),
        }
    }

    #[test]
    fn unwritable_source_format_falls_back_to_png() {
        assert!(!ImageFormat::Dds.writing_enabled());
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(4, 3, Rgba([10, 20, 30, 255])));

        let (bytes, format) = encode(&image, Some(ImageFormat::Dds)).unwrap();

        assert_eq!(format, ImageFormat::Png);
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        assert_eq!(decoded_dimensions(&bytes), (4, 3));

        let (_, format) = encode(&image, None).unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn every_quality_profile_resizes() {
        let input = encoded(90, 60, ImageFormat::Png);
        for quality in [ResizeQuality::Quality, ResizeQuality::Balanced, ResizeQuality::Speed] {
            let config = ResizerConfig {
                quality,
                ..ResizerConfig::default()
            };
            let output = resize_image(&input, 30, 20, &config).unwrap();
            assert_eq!(decoded_dimensions(&output.bytes), (30, 20));
        }
    }
}
