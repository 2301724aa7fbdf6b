//! 在系统文件管理器中打开输出目录。
//!
//! 各平台直接调用系统自带的打开命令，进程启动即返回，不等待文件管理器退出。

use std::path::Path;
use std::process::Command;

use super::router::DirectoryRevealer;
use super::ResizeError;

/// 系统文件管理器。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRevealer;

#[cfg(target_os = "windows")]
const OPEN_COMMAND: &str = "explorer";
#[cfg(target_os = "macos")]
const OPEN_COMMAND: &str = "open";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const OPEN_COMMAND: &str = "xdg-open";

impl DirectoryRevealer for SystemRevealer {
    fn reveal(&self, dir: &Path) -> Result<(), ResizeError> {
        log::debug!("📂 打开输出目录 - {} {}", OPEN_COMMAND, dir.display());
        Command::new(OPEN_COMMAND)
            .arg(dir)
            .spawn()
            .map_err(|e| ResizeError::Write(format!("打开目录 '{}' 失败：{}", dir.display(), e)))?;
        Ok(())
    }
}
