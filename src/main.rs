//! Parla - 本地文本转语音 Web 服务
//!
//! 启动流程：配置 → 日志 → 凭据诊断 → 引擎加载器（惰性）→ HTTP 服务器。
//! 模型不在启动时装载，首个生成请求会触发一次性初始化

use std::sync::Arc;

use parla::config::{load_config, print_config};
use parla::infrastructure::adapters::credentials::EnvCredentialStore;
use parla::infrastructure::adapters::engine::{SidecarEngineConfig, SidecarEngineLoader};
// use parla::infrastructure::adapters::engine::{FakeEngineLoader, FakeTtsEngine};
use parla::application::ports::CredentialPort;
use parla::infrastructure::adapters::staging::FileSampleStaging;
use parla::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},parla={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Parla - 本地 TTS Web 服务");
    print_config(&config);

    // 凭据存储（启动时读取一次用于诊断，重试路径会重新读取）
    let credentials = Arc::new(EnvCredentialStore::new(&config.auth.env_file));
    let credential_status = credentials.status();
    match &credential_status.token_preview {
        Some(preview) => tracing::info!(token = %preview, "Found access token"),
        None if credential_status.env_file_found => {
            tracing::warn!("Credential file found but no usable token")
        }
        None => tracing::warn!("No credential file found, gated voice assets may be unavailable"),
    }

    // 推理引擎加载器
    let engine_config = SidecarEngineConfig {
        base_url: config.engine.url.clone(),
        timeout_secs: config.engine.timeout_secs,
        load_timeout_secs: config.engine.load_timeout_secs,
    };
    let loader = Arc::new(SidecarEngineLoader::new(engine_config));

    // // Fake 引擎（本地联调用，不依赖 sidecar）
    // let engine = Arc::new(FakeTtsEngine::with_defaults());
    // let loader = Arc::new(FakeEngineLoader::new(engine));

    // 上传样本暂存
    let staging = Arc::new(FileSampleStaging::new(&config.staging.dir));

    // 应用状态
    let state = AppState::new(loader, staging, credentials);

    // HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.staging.max_upload_size as usize);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_dir(&config.server.static_files.dir);
    }

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
