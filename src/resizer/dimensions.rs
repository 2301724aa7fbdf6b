//! # 尺寸解析模块
//!
//! ## 设计思路
//!
//! 用户在表单里输入的宽高是字符串，可能为空、非数字、小数或负数。
//! 这里统一把它们收敛成正整数：永不失败，无效输入一律视为 1。
//!
//! 锁定宽高比时，修改一边会按原图比例重算另一边：
//! `round(另一边原始值 / 本边原始值 * 新值)`，最小为 1。
//!
//! 前端在发送请求前通过 `resolve_dimensions` 命令调用；后端处理请求时
//! 也会再收敛一次，确保到达缩放阶段的宽高始终 ≥ 1。

use serde::{Deserialize, Serialize};

/// 宽/高字段的线路形态：数字或字符串，其他形态视为无效输入。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DimensionInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl DimensionInput {
    /// 收敛为正整数。
    pub fn coerce(&self) -> u32 {
        match self {
            Self::Number(value) => clamp_positive(*value),
            Self::Text(text) => coerce_dimension(text),
            Self::Other(_) => 1,
        }
    }
}

/// 把用户输入的字符串收敛为 `[1, u32::MAX]` 内的整数。
pub fn coerce_dimension(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(value) => clamp_positive(value),
        Err(_) => 1,
    }
}

/// 可选字段的收敛：缺失等同于空输入。
pub fn coerce_optional(input: Option<&DimensionInput>) -> u32 {
    input.map(DimensionInput::coerce).unwrap_or(1)
}

fn clamp_positive(value: f64) -> u32 {
    if !value.is_finite() {
        return 1;
    }
    value.round().clamp(1.0, u32::MAX as f64) as u32
}

/// 一对已收敛的宽高。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// 宽高比锁。
///
/// 持有原图尺寸；`enabled` 为 `false` 或原图尺寸未知（为 0）时不做联动。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectLock {
    pub original_width: u32,
    pub original_height: u32,
    pub enabled: bool,
}

impl AspectLock {
    pub fn new(original_width: u32, original_height: u32, enabled: bool) -> Self {
        Self {
            original_width,
            original_height,
            enabled,
        }
    }

    fn active(&self) -> bool {
        self.enabled && self.original_width > 0 && self.original_height > 0
    }

    /// 宽度变化后的宽高。`current_height` 为锁未生效时保留的高度。
    pub fn on_width_changed(&self, width: u32, current_height: u32) -> Dimensions {
        let width = width.max(1);
        let height = if self.active() {
            scale(self.original_height, self.original_width, width)
        } else {
            current_height.max(1)
        };
        Dimensions { width, height }
    }

    /// 高度变化后的宽高。`current_width` 为锁未生效时保留的宽度。
    pub fn on_height_changed(&self, height: u32, current_width: u32) -> Dimensions {
        let height = height.max(1);
        let width = if self.active() {
            scale(self.original_width, self.original_height, height)
        } else {
            current_width.max(1)
        };
        Dimensions { width, height }
    }
}

fn scale(other_original: u32, this_original: u32, new_value: u32) -> u32 {
    clamp_positive(other_original as f64 / this_original as f64 * new_value as f64)
}

/// 哪个字段刚被用户修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangedField {
    Width,
    Height,
}

/// `resolve_dimensions` 命令的入参。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionQuery {
    #[serde(default)]
    pub width: Option<DimensionInput>,
    #[serde(default)]
    pub height: Option<DimensionInput>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub original_width: u32,
    #[serde(default)]
    pub original_height: u32,
    #[serde(default)]
    pub changed: Option<ChangedField>,
}

impl DimensionQuery {
    /// 收敛宽高并按需应用宽高比锁。
    pub fn resolve(&self) -> Dimensions {
        let width = coerce_optional(self.width.as_ref());
        let height = coerce_optional(self.height.as_ref());
        let lock = AspectLock::new(self.original_width, self.original_height, self.locked);

        match self.changed {
            Some(ChangedField::Width) => lock.on_width_changed(width, height),
            Some(ChangedField::Height) => lock.on_height_changed(height, width),
            None => Dimensions { width, height },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_handles_empty_and_garbage() {
        assert_eq!(coerce_dimension(""), 1);
        assert_eq!(coerce_dimension("   "), 1);
        assert_eq!(coerce_dimension("abc"), 1);
        assert_eq!(coerce_dimension("NaN"), 1);
        assert_eq!(coerce_dimension("inf"), 1);
    }

    #[test]
    fn coerce_clamps_zero_and_negative() {
        assert_eq!(coerce_dimension("0"), 1);
        assert_eq!(coerce_dimension("-250"), 1);
        assert_eq!(coerce_dimension("0.2"), 1);
    }

    #[test]
    fn coerce_rounds_decimals() {
        assert_eq!(coerce_dimension("200"), 200);
        assert_eq!(coerce_dimension(" 199.6 "), 200);
        assert_eq!(coerce_dimension("1e3"), 1000);
    }

    #[test]
    fn aspect_lock_round_trip() {
        let lock = AspectLock::new(1000, 500, true);

        let after_width = lock.on_width_changed(500, 500);
        assert_eq!(after_width, Dimensions { width: 500, height: 250 });

        let after_height = lock.on_height_changed(100, after_width.width);
        assert_eq!(after_height, Dimensions { width: 200, height: 100 });
    }

    #[test]
    fn aspect_lock_never_yields_zero() {
        let lock = AspectLock::new(4000, 10, true);
        assert_eq!(lock.on_width_changed(1, 1).height, 1);
    }

    #[test]
    fn unlocked_keeps_other_side() {
        let lock = AspectLock::new(1000, 500, false);
        assert_eq!(
            lock.on_width_changed(300, 77),
            Dimensions { width: 300, height: 77 }
        );
    }

    #[test]
    fn unknown_original_disables_lock() {
        let lock = AspectLock::new(0, 0, true);
        assert_eq!(
            lock.on_height_changed(40, 90),
            Dimensions { width: 90, height: 40 }
        );
    }

    #[test]
    fn query_deserializes_strings_and_numbers() {
        let query: DimensionQuery = serde_json::from_value(serde_json::json!({
            "width": "500",
            "height": 9,
            "locked": true,
            "originalWidth": 1000,
            "originalHeight": 500,
            "changed": "width"
        }))
        .unwrap();

        assert_eq!(query.resolve(), Dimensions { width: 500, height: 250 });
    }

    #[test]
    fn query_with_non_scalar_width_coerces_to_one() {
        let query: DimensionQuery = serde_json::from_value(serde_json::json!({
            "width": {"value": 10},
            "height": ""
        }))
        .unwrap();

        assert_eq!(query.resolve(), Dimensions { width: 1, height: 1 });
    }
}
