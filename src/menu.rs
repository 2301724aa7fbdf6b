//! 应用菜单与“关于”窗口
//!
//! macOS：应用名菜单（关于）+ 文件菜单；其他平台：文件菜单 + 帮助（关于）。
//! “关于”窗口只保留一个实例，重复点击时聚焦已有窗口。

use tauri::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu};
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder, Wry};

use crate::error::AppError;

pub const ABOUT_MENU_ID: &str = "about";
pub const ABOUT_WINDOW_LABEL: &str = "about";

/// 构建应用菜单。
pub fn build_menu(app: &AppHandle<Wry>) -> tauri::Result<Menu<Wry>> {
    let about = MenuItem::with_id(app, ABOUT_MENU_ID, "About", true, None::<&str>)?;
    let quit = PredefinedMenuItem::quit(app, None)?;
    let file = Submenu::with_items(app, "File", true, &[&quit])?;

    #[cfg(target_os = "macos")]
    {
        let app_menu = Submenu::with_items(app, app.package_info().name.clone(), true, &[&about])?;
        Menu::with_items(app, &[&app_menu, &file])
    }

    #[cfg(not(target_os = "macos"))]
    {
        let help = Submenu::with_items(app, "Help", true, &[&about])?;
        Menu::with_items(app, &[&file, &help])
    }
}

/// 菜单事件分发。
pub fn handle_menu_event(app: &AppHandle<Wry>, event: MenuEvent) {
    if event.id().as_ref() == ABOUT_MENU_ID {
        if let Err(err) = open_about_window(app) {
            log::warn!("打开关于窗口失败: {err}");
        }
    }
}

/// 打开或聚焦“关于”窗口。
pub fn open_about_window(app: &AppHandle<Wry>) -> Result<(), AppError> {
    if let Some(window) = app.get_webview_window(ABOUT_WINDOW_LABEL) {
        window.show()?;
        window.set_focus()?;
        return Ok(());
    }

    WebviewWindowBuilder::new(app, ABOUT_WINDOW_LABEL, WebviewUrl::App("about.html".into()))
        .title("About Image Resizer")
        .inner_size(300.0, 300.0)
        .resizable(false)
        .build()?;
    Ok(())
}
