//! # 请求与结果模型
//!
//! ## 设计思路
//!
//! 前端发来的是一个宽松的 JSON 载荷（`ResizeRequestPayload`），字段几乎都可缺省，
//! 这样任何形态的输入都能进入后端，并以 `image:error` 事件的形式得到回应，
//! 而不是在 IPC 反序列化阶段静默失败。
//!
//! `ResizeRequest::from_payload` 是唯一的判定边界：
//! 1. `fileData` 为字节数组 → `RawBytes`
//! 2. `fileData` 为 `{type:'Buffer', data}` → `ByteArray`
//! 3. `fileData` 为其他形态 → 显式拒绝（不回落到 `imgPath`）
//! 4. `fileData` 缺省且 `imgPath` 非空 → `FilePath`
//! 5. 否则 → `InvalidInput`
//!
//! 宽高比锁的上下文（`locked` / 原图尺寸 / 最后修改的字段）随请求一起发送，
//! 宽高在这里按锁重新收敛一次，表单里尚未刷新的另一边不会进入缩放阶段。

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::dimensions::{ChangedField, DimensionInput, DimensionQuery};
use super::source::{FileData, ImageSource};
use super::{ResizeError, ResizerConfig};

/// 前端 `resize_image` 命令的原始载荷。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRequestPayload {
    #[serde(default)]
    pub file_data: Option<FileData>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub img_path: Option<String>,
    #[serde(default)]
    pub width: Option<DimensionInput>,
    #[serde(default)]
    pub height: Option<DimensionInput>,
    #[serde(default)]
    pub output_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub locked: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub original_width: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub original_height: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub changed: Option<ChangedField>,
}

/// 宽高比锁上下文只是辅助信息：形态不对时按缺省处理，不让整个请求在 IPC 层被拒绝。
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// 输出去向，二者互斥。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Save,
    Clipboard,
}

impl OutputMode {
    /// 缺省或空字符串视为 `Save`，未知取值报错。
    pub fn parse(raw: Option<&str>) -> Result<Self, ResizeError> {
        match raw.map(|s| s.trim().to_lowercase()) {
            None => Ok(Self::Save),
            Some(mode) => match mode.as_str() {
                "" | "save" => Ok(Self::Save),
                "clipboard" => Ok(Self::Clipboard),
                other => Err(ResizeError::InvalidInput(format!(
                    "未知输出模式：{}（可选：save / clipboard）",
                    other
                ))),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Clipboard => "clipboard",
        }
    }
}

/// 一次缩放请求，由后端消费且仅消费一次。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    pub source: ImageSource,
    pub display_name: String,
    pub width: u32,
    pub height: u32,
    pub output_mode: OutputMode,
}

impl ResizeRequest {
    pub fn from_payload(
        payload: ResizeRequestPayload,
        config: &ResizerConfig,
    ) -> Result<Self, ResizeError> {
        let img_path = payload
            .img_path
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let source = match payload.file_data {
            Some(FileData::Bytes(bytes)) => ImageSource::RawBytes(bytes),
            Some(FileData::Descriptor(descriptor)) if descriptor.is_buffer() => {
                ImageSource::ByteArray(descriptor)
            }
            Some(FileData::Descriptor(descriptor)) => {
                return Err(ResizeError::InvalidInput(format!(
                    "无法识别的图片数据类型：{}",
                    descriptor.kind
                )));
            }
            Some(FileData::Unrecognized(_)) => {
                return Err(ResizeError::InvalidInput(
                    "无法识别的图片数据形态".to_string(),
                ));
            }
            None => match &img_path {
                Some(path) => ImageSource::FilePath(path.clone()),
                None => {
                    return Err(ResizeError::InvalidInput("未提供图片数据".to_string()));
                }
            },
        };

        let output_mode = OutputMode::parse(payload.output_mode.as_deref())?;
        let display_name = resolve_display_name(
            payload.filename.as_deref(),
            img_path.as_deref(),
            &config.fallback_display_name,
        );

        let dimensions = DimensionQuery {
            width: payload.width,
            height: payload.height,
            locked: payload.locked,
            original_width: payload.original_width,
            original_height: payload.original_height,
            changed: payload.changed,
        }
        .resolve();

        Ok(Self {
            source,
            display_name,
            width: dimensions.width,
            height: dimensions.height,
            output_mode,
        })
    }
}

/// 显示名：优先 `filename`，其次路径的文件名，最后使用回退名。
///
/// 只保留最后一个路径分量，输出文件不会跳出输出目录。
fn resolve_display_name(filename: Option<&str>, img_path: Option<&Path>, fallback: &str) -> String {
    filename
        .and_then(last_component)
        .or_else(|| img_path.and_then(|p| p.file_name()).map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| fallback.to_string())
}

fn last_component(name: &str) -> Option<String> {
    name.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .map(str::to_string)
}

/// 结果状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeStatus {
    Done,
    Error,
}

/// 一次请求的最终结果，发送给前端且仅发送一次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeOutcome {
    pub status: ResizeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResizeOutcome {
    pub fn done() -> Self {
        Self {
            status: ResizeStatus::Done,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResizeStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == ResizeStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resizer::source::ByteArrayDescriptor;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<ResizeRequest, ResizeError> {
        let payload: ResizeRequestPayload = serde_json::from_value(value).unwrap();
        ResizeRequest::from_payload(payload, &ResizerConfig::default())
    }

    #[test]
    fn raw_byte_array_wins() {
        let request = parse(json!({
            "fileData": [137, 80, 78, 71],
            "filename": "photo.png",
            "width": "200",
            "height": "100"
        }))
        .unwrap();

        assert_eq!(request.source, ImageSource::RawBytes(vec![137, 80, 78, 71]));
        assert_eq!(request.display_name, "photo.png");
        assert_eq!((request.width, request.height), (200, 100));
        assert_eq!(request.output_mode, OutputMode::Save);
    }

    #[test]
    fn buffer_descriptor_is_recognized() {
        let request = parse(json!({
            "fileData": {"type": "Buffer", "data": [1, 2, 3]},
            "width": 10,
            "height": 10,
            "outputMode": "clipboard"
        }))
        .unwrap();

        assert_eq!(
            request.source,
            ImageSource::ByteArray(ByteArrayDescriptor::new(vec![1, 2, 3]))
        );
        assert_eq!(request.output_mode, OutputMode::Clipboard);
        assert_eq!(request.display_name, "resized.png");
    }

    #[test]
    fn path_is_used_when_file_data_absent() {
        let request = parse(json!({
            "fileData": null,
            "imgPath": "/tmp/pics/cat.jpeg",
            "width": "", "height": "abc"
        }))
        .unwrap();

        assert_eq!(request.source, ImageSource::FilePath(PathBuf::from("/tmp/pics/cat.jpeg")));
        assert_eq!(request.display_name, "cat.jpeg");
        assert_eq!((request.width, request.height), (1, 1));
    }

    #[test]
    fn unrecognized_shape_is_rejected_even_with_path() {
        let result = parse(json!({
            "fileData": {"byteLength": 12},
            "imgPath": "/tmp/cat.png"
        }));
        assert!(matches!(result, Err(ResizeError::InvalidInput(_))));

        let result = parse(json!({
            "fileData": {"type": "Blob", "data": [1]}
        }));
        assert!(matches!(result, Err(ResizeError::InvalidInput(_))));
    }

    #[test]
    fn missing_source_is_invalid_input() {
        let result = parse(json!({"width": "10", "height": "10", "imgPath": "  "}));
        assert!(matches!(result, Err(ResizeError::InvalidInput(_))));
    }

    #[test]
    fn unknown_output_mode_is_rejected() {
        let result = parse(json!({"fileData": [1], "outputMode": "printer"}));
        assert!(matches!(result, Err(ResizeError::InvalidInput(_))));
        assert_eq!(OutputMode::parse(Some("")).unwrap(), OutputMode::Save);
    }

    #[test]
    fn display_name_drops_directories() {
        let request = parse(json!({
            "fileData": [1],
            "filename": "../../etc/evil.png"
        }))
        .unwrap();
        assert_eq!(request.display_name, "evil.png");

        let request = parse(json!({"fileData": [1], "filename": "..\\"})).unwrap();
        assert_eq!(request.display_name, "resized.png");
    }

    #[test]
    fn locked_request_recomputes_partner_of_last_edit() {
        // 宽度刚改为 500，高度字段还停留在旧值
        let request = parse(json!({
            "fileData": [1],
            "width": "500",
            "height": "500",
            "locked": true,
            "originalWidth": 1000,
            "originalHeight": 500,
            "changed": "width"
        }))
        .unwrap();
        assert_eq!((request.width, request.height), (500, 250));

        let request = parse(json!({
            "fileData": [1],
            "width": "9",
            "height": "100",
            "locked": true,
            "originalWidth": 1000,
            "originalHeight": 500,
            "changed": "height"
        }))
        .unwrap();
        assert_eq!((request.width, request.height), (200, 100));
    }

    #[test]
    fn unlocked_or_unknown_original_keeps_both_fields() {
        let request = parse(json!({
            "fileData": [1],
            "width": "500",
            "height": "500",
            "locked": false,
            "originalWidth": 1000,
            "originalHeight": 500,
            "changed": "width"
        }))
        .unwrap();
        assert_eq!((request.width, request.height), (500, 500));

        let request = parse(json!({
            "imgPath": "/tmp/a.png",
            "width": "30",
            "height": "40",
            "locked": true,
            "changed": "width"
        }))
        .unwrap();
        assert_eq!((request.width, request.height), (30, 40));
    }

    #[test]
    fn malformed_lock_context_is_ignored_not_rejected() {
        let request = parse(json!({
            "fileData": [1],
            "width": "40",
            "height": "30",
            "locked": "yes",
            "originalWidth": -3,
            "originalHeight": "tall",
            "changed": "depth"
        }))
        .unwrap();
        assert_eq!((request.width, request.height), (40, 30));

        let request = parse(json!({"fileData": [1], "changed": null, "locked": null})).unwrap();
        assert_eq!((request.width, request.height), (1, 1));
    }

    #[test]
    fn outcome_serializes_lowercase_status() {
        let value = serde_json::to_value(ResizeOutcome::error("坏了")).unwrap();
        assert_eq!(value, json!({"status": "error", "message": "坏了"}));
        let value = serde_json::to_value(ResizeOutcome::done()).unwrap();
        assert_eq!(value, json!({"status": "done"}));
    }
}
