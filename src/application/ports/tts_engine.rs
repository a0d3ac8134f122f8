//! TTS Engine Port - TTS 推理引擎抽象
//!
//! 定义推理引擎的抽象接口，具体实现在 infrastructure/adapters 层。
//! 引擎本体（权重装载、前向计算）被视为黑盒协作者，只在此边界上约定

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    /// 受限资源需要鉴权（如需接受条款才能下载的声音克隆模块）
    #[error("Authorization required: {0}")]
    AuthorizationRequired(String),

    #[error("Invalid voice reference: {0}")]
    InvalidVoice(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Engine initialization failed: {0}")]
    Init(String),
}

/// 已解析音色的不透明句柄
///
/// 由引擎返回，被一次生成调用消费；不跨请求缓存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceState(String);

impl VoiceState {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 生成的原始音频
///
/// 一维单声道样本序列加采样率，由编码器消费一次后丢弃
#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// TTS Engine Port
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 为音色引用构造 voice state
    ///
    /// `reference` 为预置音色 ID 或已暂存克隆样本的路径
    async fn voice_state(&self, reference: &str) -> Result<VoiceState, EngineError>;

    /// 使用外部凭据向受限资源源重新登录
    async fn login(&self, token: &str) -> Result<(), EngineError>;

    /// 同步生成：由 (voice state, text) 产出原始样本
    async fn generate(&self, state: VoiceState, text: &str)
        -> Result<GeneratedAudio, EngineError>;

    /// 引擎输出采样率
    fn sample_rate(&self) -> u32;
}

/// Engine Loader Port - 一次性的昂贵初始化
///
/// 权重下载与装载，IO/计算密集；由 ModelGateway 保证每个进程
/// 生命周期内至多执行一次（失败后允许重试）
#[async_trait]
pub trait EngineLoaderPort: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn TtsEnginePort>, EngineError>;
}
