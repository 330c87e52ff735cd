//! # Diagram Gateway 主程序

use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use diagram_gateway::{
    AppContext, Result,
    config::ConfigManager,
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
    management::GatewayServer,
};

/// Diagram Gateway CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径
    #[arg(long)]
    config: Option<String>,

    /// 日志级别
    #[arg(long)]
    log_level: Option<String>,

    /// 覆盖监听端口
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level.as_ref());

    let manager = args
        .config
        .as_deref()
        .map_or_else(ConfigManager::new, ConfigManager::with_path);
    let mut config = manager.load()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "Starting diagram gateway",
        config_path = %manager.config_path().display()
    );

    let context = Arc::new(AppContext::from_config(config)?);
    let cleanup = context.cleanup_task();
    let cleanup_token = cleanup.shutdown_token();
    let cleanup_handle = cleanup.spawn();

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_ctrl_c(shutdown.clone()));

    let result = GatewayServer::new(context).serve(shutdown).await;

    cleanup_token.cancel();
    let _ = cleanup_handle.await;

    if let Err(e) = &result {
        lerror!(
            "system",
            LogStage::Shutdown,
            LogComponent::Main,
            "service_failed",
            "Gateway server exited with error",
            error = %e
        );
    } else {
        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::Main,
            "service_shutdown",
            "Gateway stopped"
        );
    }
    result
}

async fn wait_for_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lerror!(
            "system",
            LogStage::Shutdown,
            LogComponent::Main,
            "ctrl_c_error",
            "Failed to listen for Ctrl-C",
            error = %e
        );
        return;
    }
    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "ctrl_c_received",
        "Received Ctrl-C, shutting down"
    );
    shutdown.cancel();
}
