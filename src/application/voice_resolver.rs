//! Voice Resolver - 音色解析
//!
//! 将音色请求（预置 ID 或上传样本）解析为引擎可消费的 voice state。
//! 上传样本先经暂存落盘，再以路径形式交给引擎。
//! 对受限资源失败执行单次重新鉴权加单次重试，绝不循环

use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::{
    CredentialPort, EngineError, SampleStagingPort, TtsEnginePort, VoiceState,
};
use crate::domain::voice::VoiceRequest;

/// 音色解析错误
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Invalid voice request: {0}")]
    InvalidVoiceRequest(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Voice load failed: {0}")]
    VoiceLoadFailed(String),
}

/// 音色解析器
///
/// 凭据与暂存均为显式注入，不读取任何全局状态
pub struct VoiceResolver {
    staging: Arc<dyn SampleStagingPort>,
    credentials: Arc<dyn CredentialPort>,
}

impl VoiceResolver {
    pub fn new(
        staging: Arc<dyn SampleStagingPort>,
        credentials: Arc<dyn CredentialPort>,
    ) -> Self {
        Self {
            staging,
            credentials,
        }
    }

    /// 解析音色请求
    pub async fn resolve(
        &self,
        engine: &dyn TtsEnginePort,
        request: &VoiceRequest,
    ) -> Result<VoiceState, VoiceError> {
        request
            .validate()
            .map_err(|e| VoiceError::InvalidVoiceRequest(e.to_string()))?;

        let reference = match request {
            VoiceRequest::Preset(id) => id.clone(),
            VoiceRequest::UploadedSample { file_name, data } => {
                let path = self
                    .staging
                    .stage(file_name, data)
                    .await
                    .map_err(|e| VoiceError::VoiceLoadFailed(e.to_string()))?;
                path.to_string_lossy().into_owned()
            }
        };

        match engine.voice_state(&reference).await {
            Ok(state) => Ok(state),
            Err(EngineError::AuthorizationRequired(detail)) => {
                self.reauthenticate_and_retry(engine, &reference, detail)
                    .await
            }
            Err(EngineError::VoiceNotFound(id)) => Err(VoiceError::VoiceNotFound(id)),
            Err(e) => Err(VoiceError::VoiceLoadFailed(e.to_string())),
        }
    }

    /// 单次重新鉴权 + 单次重试
    ///
    /// 重试或鉴权失败时带回原始错误详情
    async fn reauthenticate_and_retry(
        &self,
        engine: &dyn TtsEnginePort,
        reference: &str,
        original: String,
    ) -> Result<VoiceState, VoiceError> {
        tracing::warn!(
            reference = %reference,
            detail = %original,
            "Gated voice asset, attempting re-authentication"
        );

        let token = match self.credentials.token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "Re-authentication aborted: no credential");
                return Err(VoiceError::VoiceLoadFailed(original));
            }
        };

        if let Err(e) = engine.login(&token).await {
            tracing::error!(error = %e, "Re-authentication failed");
            return Err(VoiceError::VoiceLoadFailed(original));
        }

        match engine.voice_state(reference).await {
            Ok(state) => {
                tracing::info!(reference = %reference, "Voice state loaded after re-authentication");
                Ok(state)
            }
            Err(retry_error) => {
                tracing::error!(
                    error = %retry_error,
                    "Voice state construction still failing after re-authentication"
                );
                Err(VoiceError::VoiceLoadFailed(original))
            }
        }
    }
}
