// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # 图片缩放工具 — 应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use image_resizer::{menu, resizer, storage};
use tauri::Manager;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        // 插件初始化
        .plugin(tauri_plugin_dialog::init())
        // 应用菜单
        .menu(|handle| menu::build_menu(handle))
        .on_menu_event(|app, event| menu::handle_menu_event(app, event))
        // 应用设置
        .setup(|app| {
            log::info!("setup: begin");

            app.manage(resizer::ResizeServiceState::new());
            log::info!("setup: resize service managed");

            #[cfg(debug_assertions)]
            {
                if let Some(main_window) = app.get_webview_window("main") {
                    main_window.open_devtools();
                }
            }

            log::info!("setup: complete");
            Ok(())
        })
        // 注册所有 Tauri 命令
        .invoke_handler(tauri::generate_handler![
            // 缩放流水线
            resizer::commands::resize_image,
            resizer::commands::resolve_dimensions,
            resizer::commands::get_image_dimensions,
            resizer::commands::read_clipboard_image,
            resizer::commands::get_resize_quality,
            resizer::commands::set_resize_quality,
            // 输出目录
            storage::get_output_dir_info,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
