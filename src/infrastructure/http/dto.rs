//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::voice;

// ============================================================================
// Voices DTOs
// ============================================================================

/// 预置音色条目
#[derive(Debug, Serialize)]
pub struct VoiceDto {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceDto>,
}

// ============================================================================
// Health DTO
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub auth_status: &'static str,
    pub token_preview: Option<String>,
    pub env_file_found: bool,
}

// ============================================================================
// Generate DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_voice() -> String {
    voice::DEFAULT_VOICE.to_string()
}
