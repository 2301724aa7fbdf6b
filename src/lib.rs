//! # 图片缩放工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  前端 (静态页面 + window.__TAURI__)       │
//! │                                                          │
//! │  选择/粘贴图片 ── 宽高表单(宽高比锁) ── 保存/复制按钮       │
//! │       │  invoke('resize_image') / listen('image:*')      │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ resizer ──── 归一化 · 缩放 · 输出路由 · 完成通知       │
//! │  │   ├─ dimensions     宽高收敛 + 宽高比锁               │
//! │  │   └─ clipboard      剪贴板读写 + 重试                 │
//! │  │                                                       │
//! │  ├─ storage            输出目录 ~/imageresizer            │
//! │  └─ menu               应用菜单 + 关于窗口                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，非流水线 Tauri command 的返回类型 |
//! | [`resizer`] | 缩放请求流水线与相关 Tauri command |
//! | [`storage`] | 输出目录解析与目录信息 |
//! | [`menu`] | 应用菜单、关于窗口 |

pub mod error;
pub mod menu;
pub mod resizer;
pub mod storage;
