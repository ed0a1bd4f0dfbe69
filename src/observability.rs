//! 可观测性：tracing 订阅器初始化
//!
//! 默认 info，可通过 RUST_LOG 覆盖。TUI 占用终端，日志只写文件；REPL 写 stderr。

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 日志写入 stderr
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// 以追加方式打开日志文件，必要时创建父目录
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// 日志追加写入文件；打开失败时丢弃日志，不写终端
pub fn init_with_file(path: &Path) {
    match open_log_file(path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        Err(e) => {
            // 尚未进入全屏，提示一次即可
            eprintln!("Cannot open log file {} ({}), logging disabled", path.display(), e);
            tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer().with_writer(io::sink))
                .init();
        }
    }
}
