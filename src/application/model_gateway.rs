//! Model Gateway - 进程级模型单例
//!
//! 持有惰性初始化的推理引擎句柄，串行化并发初始化：
//! 同一时刻至多一个加载在途，其余调用方等待广播结果。
//! 昂贵的加载在锁外执行，等待无超时（以模型装载时间为界）

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};

use crate::application::ports::{
    EngineError, EngineLoaderPort, GeneratedAudio, TtsEnginePort, VoiceState,
};

/// Gateway 错误
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    /// 在 ensure_ready 成功之前调用了 generate，属于调用方错误
    #[error("Model is not ready")]
    NotReady,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// 模型句柄状态机
enum ModelSlot {
    Unloaded,
    Loading,
    Ready(Arc<dyn TtsEnginePort>),
    Failed(String),
}

/// 进程级 Model Gateway
///
/// 进程内唯一实例（经 AppState 以 Arc 共享）；唯一的共享可变
/// 状态是 `slot`，其余请求态数据均为请求本地
pub struct ModelGateway {
    loader: Arc<dyn EngineLoaderPort>,
    slot: Mutex<ModelSlot>,
    loaded: Notify,
}

impl ModelGateway {
    pub fn new(loader: Arc<dyn EngineLoaderPort>) -> Self {
        Self {
            loader,
            slot: Mutex::new(ModelSlot::Unloaded),
            loaded: Notify::new(),
        }
    }

    /// 确保引擎就绪并返回句柄
    ///
    /// - `Ready`: 立即返回
    /// - `Unloaded` / `Failed`（新调用）: 夺取 `Loading`，执行加载并广播
    /// - `Loading`: 等待在途加载的结果；等到 `Failed` 时传播该失败，
    ///   不重新进入初始化
    pub async fn ensure_ready(&self) -> Result<Arc<dyn TtsEnginePort>, GatewayError> {
        let mut waited = false;
        loop {
            let mut slot = self.slot.lock().await;
            match &*slot {
                ModelSlot::Ready(engine) => return Ok(engine.clone()),
                ModelSlot::Failed(detail) if waited => {
                    return Err(GatewayError::InitFailed(detail.clone()));
                }
                ModelSlot::Loading => {
                    // 必须在持锁期间注册等待者，否则可能错过广播
                    let notified = self.loaded.notified();
                    tokio::pin!(notified);
                    notified.as_mut().enable();
                    drop(slot);
                    waited = true;
                    notified.await;
                }
                ModelSlot::Unloaded | ModelSlot::Failed(_) => {
                    *slot = ModelSlot::Loading;
                    drop(slot);
                    return self.load_and_publish().await;
                }
            }
        }
    }

    /// 执行一次加载并向所有等待者广播结果
    async fn load_and_publish(&self) -> Result<Arc<dyn TtsEnginePort>, GatewayError> {
        tracing::info!("Loading TTS model... this may take a moment");

        // 锁外执行，加载期间其他调用方停留在 Loading 分支
        let result = self.loader.load().await;

        let outcome = {
            let mut slot = self.slot.lock().await;
            match result {
                Ok(engine) => {
                    tracing::info!(
                        sample_rate = engine.sample_rate(),
                        "TTS model loaded successfully"
                    );
                    *slot = ModelSlot::Ready(engine.clone());
                    Ok(engine)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load TTS model");
                    let detail = e.to_string();
                    *slot = ModelSlot::Failed(detail.clone());
                    Err(GatewayError::InitFailed(detail))
                }
            }
        };

        self.loaded.notify_waiters();
        outcome
    }

    /// 生成音频
    ///
    /// 要求 ensure_ready 已经成功；引擎侧失败原样上报
    pub async fn generate(
        &self,
        state: VoiceState,
        text: &str,
    ) -> Result<GeneratedAudio, GatewayError> {
        let engine = {
            let slot = self.slot.lock().await;
            match &*slot {
                ModelSlot::Ready(engine) => engine.clone(),
                _ => return Err(GatewayError::NotReady),
            }
        };

        Ok(engine.generate(state, text).await?)
    }
}
