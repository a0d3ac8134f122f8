//! Generation Orchestrator - 语音生成编排
//!
//! 请求级协调：校验输入 → 确保模型就绪 → 解析音色 → 生成 → WAV 封装。
//! 所有失败在此处带上下文记录日志，再映射为对外的错误类别；
//! 内部错误类型不会越过 HTTP 边界

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::model_gateway::ModelGateway;
use crate::application::voice_resolver::{VoiceError, VoiceResolver};
use crate::domain::audio;
use crate::domain::voice::VoiceRequest;

/// 生成命令
#[derive(Debug, Clone)]
pub struct GenerateSpeech {
    pub text: String,
    pub voice: VoiceRequest,
}

/// 封装完成的音频
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
}

/// 对外错误类别
///
/// 每个变体携带可读信息；除单次凭据重试外没有任何自动重试
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid voice request: {0}")]
    InvalidVoiceRequest(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Voice load failed: {0}")]
    VoiceLoadFailed(String),

    #[error("Model initialization failed: {0}")]
    ModelInitFailed(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl From<VoiceError> for GenerationError {
    fn from(e: VoiceError) -> Self {
        match e {
            VoiceError::InvalidVoiceRequest(msg) => Self::InvalidVoiceRequest(msg),
            VoiceError::VoiceNotFound(id) => Self::VoiceNotFound(id),
            VoiceError::VoiceLoadFailed(msg) => Self::VoiceLoadFailed(msg),
        }
    }
}

/// 生成命令处理器
pub struct GenerateSpeechHandler {
    gateway: Arc<ModelGateway>,
    resolver: VoiceResolver,
}

impl GenerateSpeechHandler {
    pub fn new(gateway: Arc<ModelGateway>, resolver: VoiceResolver) -> Self {
        Self { gateway, resolver }
    }

    /// 处理一次生成请求
    pub async fn handle(&self, cmd: GenerateSpeech) -> Result<EncodedAudio, GenerationError> {
        // 空文本在获取任何资源之前拒绝
        if cmd.text.trim().is_empty() {
            return Err(GenerationError::InvalidInput("text is required".to_string()));
        }

        let request_id = Uuid::new_v4();
        let voice_summary = cmd.voice.summary();

        tracing::info!(
            request_id = %request_id,
            voice = %voice_summary,
            text_len = cmd.text.len(),
            "Generating speech"
        );

        let engine = self.gateway.ensure_ready().await.map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                stage = "ensure_ready",
                voice = %voice_summary,
                error = %e,
                "Generation failed"
            );
            GenerationError::ModelInitFailed(e.to_string())
        })?;

        let state = self
            .resolver
            .resolve(engine.as_ref(), &cmd.voice)
            .await
            .map_err(|e| {
                tracing::error!(
                    request_id = %request_id,
                    stage = "resolve_voice",
                    voice = %voice_summary,
                    error = %e,
                    "Generation failed"
                );
                GenerationError::from(e)
            })?;

        let generated = self.gateway.generate(state, &cmd.text).await.map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                stage = "generate",
                voice = %voice_summary,
                error = %e,
                "Generation failed"
            );
            GenerationError::GenerationFailed(e.to_string())
        })?;

        let sample_rate = generated.sample_rate;
        let bytes = audio::encode(&generated.samples, sample_rate);

        tracing::info!(
            request_id = %request_id,
            sample_count = generated.samples.len(),
            sample_rate = sample_rate,
            audio_size = bytes.len(),
            "Speech generated"
        );

        Ok(EncodedAudio { bytes, sample_rate })
    }
}
