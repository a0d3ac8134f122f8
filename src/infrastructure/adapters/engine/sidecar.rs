//! Sidecar TTS Engine - 调用本机推理进程的引擎适配器
//!
//! 通过 HTTP 与推理 sidecar 通信：
//!
//! - `POST {base}/api/model/load`  装载模型，返回 `{"sample_rate": ...}`
//! - `POST {base}/api/voice/state` `{"reference": ...}` → `{"state_id": ...}`
//! - `POST {base}/api/auth/login`  `{"token": ...}`
//! - `POST {base}/api/generate`    `{"state_id", "text"}` → f32le PCM，
//!   采样率在 `X-Sample-Rate` 头中

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    EngineError, EngineLoaderPort, GeneratedAudio, TtsEnginePort, VoiceState,
};

/// 受限资源失败的标记短语
///
/// 上游以自由文本报告受限下载失败，这里按子串归类为
/// AuthorizationRequired。结构化错误码仍在等上游支持，
/// 归类逻辑只存在于本适配器，不外溢到端口
const GATING_MARKERS: &[&str] = &["voice cloning", "terms", "download"];

/// Sidecar 引擎配置
#[derive(Debug, Clone)]
pub struct SidecarEngineConfig {
    /// sidecar 基础 URL
    pub base_url: String,
    /// 常规请求超时（秒）
    pub timeout_secs: u64,
    /// 模型装载超时（秒），装载可能长达数分钟
    pub load_timeout_secs: u64,
}

impl Default for SidecarEngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_secs: 120,
            load_timeout_secs: 600,
        }
    }
}

impl SidecarEngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Serialize)]
struct VoiceStateRequest<'a> {
    reference: &'a str,
}

#[derive(Debug, Deserialize)]
struct VoiceStateResponse {
    state_id: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateRequestBody<'a> {
    state_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    sample_rate: u32,
}

fn map_transport_error(e: reqwest::Error) -> EngineError {
    if e.is_timeout() {
        EngineError::Timeout
    } else if e.is_connect() {
        EngineError::Network(format!("Cannot connect to inference sidecar: {}", e))
    } else {
        EngineError::Network(e.to_string())
    }
}

/// 归类 voice state 构造失败
fn classify_voice_error(status: StatusCode, body: &str) -> EngineError {
    let lowered = body.to_lowercase();
    if GATING_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return EngineError::AuthorizationRequired(body.to_string());
    }
    if status == StatusCode::NOT_FOUND {
        return EngineError::VoiceNotFound(body.to_string());
    }
    EngineError::Service(format!("HTTP {}: {}", status, body))
}

/// 解析 f32 little-endian PCM 载荷
fn decode_f32_pcm(bytes: &[u8]) -> Result<Vec<f32>, EngineError> {
    if bytes.len() % 4 != 0 {
        return Err(EngineError::InvalidResponse(format!(
            "PCM payload length {} is not f32-aligned",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Sidecar TTS Engine
pub struct SidecarTtsEngine {
    client: Client,
    config: SidecarEngineConfig,
    sample_rate: u32,
}

impl SidecarTtsEngine {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl TtsEnginePort for SidecarTtsEngine {
    async fn voice_state(&self, reference: &str) -> Result<VoiceState, EngineError> {
        tracing::debug!(reference = %reference, "Requesting voice state");

        let response = self
            .client
            .post(self.url("/api/voice/state"))
            .json(&VoiceStateRequest { reference })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_voice_error(status, &body));
        }

        let parsed: VoiceStateResponse = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        Ok(VoiceState::new(parsed.state_id))
    }

    async fn login(&self, token: &str) -> Result<(), EngineError> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { token })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Service(format!("HTTP {}: {}", status, body)));
        }

        tracing::info!("Re-authenticated against the asset source");
        Ok(())
    }

    async fn generate(
        &self,
        state: VoiceState,
        text: &str,
    ) -> Result<GeneratedAudio, EngineError> {
        tracing::debug!(text_len = text.len(), "Sending generate request");

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&GenerateRequestBody {
                state_id: state.as_str(),
                text,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Service(format!("HTTP {}: {}", status, body)));
        }

        let sample_rate = response
            .headers()
            .get("X-Sample-Rate")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.sample_rate);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        let samples = decode_f32_pcm(&bytes)?;

        tracing::info!(
            sample_count = samples.len(),
            sample_rate = sample_rate,
            "TTS inference completed"
        );

        Ok(GeneratedAudio {
            samples,
            sample_rate,
        })
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Sidecar 引擎加载器
///
/// 触发 sidecar 的一次性模型装载
pub struct SidecarEngineLoader {
    config: SidecarEngineConfig,
}

impl SidecarEngineLoader {
    pub fn new(config: SidecarEngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EngineLoaderPort for SidecarEngineLoader {
    async fn load(&self) -> Result<Arc<dyn TtsEnginePort>, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Init(e.to_string()))?;

        tracing::info!(base_url = %self.config.base_url, "Requesting sidecar model load");

        let response = client
            .post(format!("{}/api/model/load", self.config.base_url))
            .timeout(Duration::from_secs(self.config.load_timeout_secs))
            .send()
            .await
            .map_err(|e| EngineError::Init(map_transport_error(e).to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Init(format!("HTTP {}: {}", status, body)));
        }

        let parsed: LoadResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Init(format!("Invalid load response: {}", e)))?;

        Ok(Arc::new(SidecarTtsEngine {
            client,
            config: self.config.clone(),
            sample_rate: parsed.sample_rate,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SidecarEngineConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = SidecarEngineConfig::new("http://example.com:9000").with_timeout(60);
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_classify_gating_markers() {
        for body in [
            "you must accept the terms of use",
            "Voice Cloning module is gated",
            "failed to download restricted asset",
        ] {
            let classified = classify_voice_error(StatusCode::FORBIDDEN, body);
            assert!(
                matches!(classified, EngineError::AuthorizationRequired(_)),
                "expected AuthorizationRequired for {:?}",
                body
            );
        }
    }

    #[test]
    fn test_classify_not_found() {
        let classified = classify_voice_error(StatusCode::NOT_FOUND, "no such voice");
        assert!(matches!(classified, EngineError::VoiceNotFound(_)));
    }

    #[test]
    fn test_classify_other_failures_as_service_errors() {
        let classified = classify_voice_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(classified, EngineError::Service(_)));
    }

    #[test]
    fn test_decode_f32_pcm() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-0.25f32).to_le_bytes());

        let samples = decode_f32_pcm(&bytes).unwrap();
        assert_eq!(samples, vec![0.5, -0.25]);
    }

    #[test]
    fn test_decode_f32_pcm_rejects_misaligned_payload() {
        assert!(decode_f32_pcm(&[0u8; 7]).is_err());
    }
}
