//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ResizeHandler` 只负责流程编排与配置管理，不直接与 Tauri 绑定。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 载荷判定为 `ResizeRequest`
//! 3. 归一化输入字节
//! 4. 缩放并重新编码
//! 5. 按输出模式路由（保存或剪贴板）
//! 6. 发送唯一的完成信号
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ResizerConfig>>` 支持运行时切换档位。
//! - 单次请求内使用同一配置快照，避免处理中途配置漂移。
//! - 所有失败在 `handle` 中统一捕获、记录并转换为 `image:error`，
//!   进程不会因为单个请求失败而退出。
//! - 记录 `normalize/resize/route/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use super::normalizer::normalize;
use super::notifier::{report, CompletionNotifier};
use super::pipeline::resize_image;
use super::request::{ResizeOutcome, ResizeRequest, ResizeRequestPayload};
use super::router::{Delivery, OutputRouter};
use super::{ResizeError, ResizeQuality, ResizerConfig};

/// 缩放请求处理器。
#[derive(Clone)]
pub struct ResizeHandler {
    config: Arc<RwLock<ResizerConfig>>,
}

impl ResizeHandler {
    pub fn new(config: ResizerConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置快照，保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> ResizerConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_quality(&self, quality: ResizeQuality) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.quality = quality;
        log::info!("⚙️ 已切换缩放档位：{}", quality.as_str());
    }

    pub fn quality(&self) -> ResizeQuality {
        self.config.read().unwrap_or_else(PoisonError::into_inner).quality
    }

    /// 请求入口：处理载荷并向 `notifier` 发送且仅发送一个信号。
    pub async fn handle(
        &self,
        payload: ResizeRequestPayload,
        router: &OutputRouter,
        notifier: &dyn CompletionNotifier,
    ) -> ResizeOutcome {
        let config = self.config_snapshot();
        let result = match ResizeRequest::from_payload(payload, &config) {
            Ok(request) => self.process(request, router, &config).await,
            Err(err) => Err(err),
        };
        report(notifier, result)
    }

    /// 执行 归一化 → 缩放 → 路由。
    pub async fn process(
        &self,
        request: ResizeRequest,
        router: &OutputRouter,
        config: &ResizerConfig,
    ) -> Result<Delivery, ResizeError> {
        log::info!(
            "🖼️ 开始缩放 - 名称: {} 来源: {} 目标: {}x{} 模式: {}",
            request.display_name,
            request.source.hint(),
            request.width,
            request.height,
            request.output_mode.as_str()
        );
        let total_start = Instant::now();

        let normalize_start = Instant::now();
        let source = request.source.clone();
        let normalize_config = config.clone();
        let canonical = tokio::task::spawn_blocking(move || normalize(source, &normalize_config))
            .await
            .map_err(|e| ResizeError::InvalidInput(format!("线程执行失败：{}", e)))??;
        let normalize_elapsed = normalize_start.elapsed();

        let resize_start = Instant::now();
        let (width, height) = (request.width, request.height);
        let resize_config = config.clone();
        let resized =
            tokio::task::spawn_blocking(move || resize_image(&canonical, width, height, &resize_config))
                .await
                .map_err(|e| ResizeError::ResizeFailure(format!("线程执行失败：{}", e)))??;
        let resize_elapsed = resize_start.elapsed();

        let route_start = Instant::now();
        let delivery = router.route(resized, &request, config).await?;
        let route_elapsed = route_start.elapsed();

        log::info!(
            "✅ 缩放请求完成 - {:?} normalize={}ms resize={}ms route={}ms total={}ms",
            delivery,
            normalize_elapsed.as_millis(),
            resize_elapsed.as_millis(),
            route_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(delivery)
    }
}
