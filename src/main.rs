//! Medassist - 终端语音健康助手
//!
//! 入口：加载配置、初始化日志、创建助手运行时与 TUI，并运行主循环。

use anyhow::Context;
use medassist::{
    config::{default_log_file, load_config, AppConfig},
    core::create_assistant,
    observability,
    ui::run_app,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = load_config(None);

    // TUI 占用终端，日志只写文件；配置加载失败时也用默认日志文件
    let log_file = loaded
        .as_ref()
        .map(|c| c.app.log_file.clone())
        .unwrap_or_else(|_| default_log_file());
    observability::init_with_file(&log_file);

    let cfg = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    // 创建助手：返回命令发送端、状态接收端
    let (cmd_tx, state_rx) = create_assistant(&cfg);

    // 启动 TUI 主循环（消费 state，向 cmd_tx 发送用户指令）
    run_app(&cfg.app.name, state_rx, cmd_tx)
        .await
        .context("App run failed")?;

    Ok(())
}
