//! Voices Handler

use axum::Json;

use crate::domain::voice;
use crate::infrastructure::http::dto::{VoiceDto, VoicesResponse};

/// 预置音色列表
///
/// 纯静态目录，与模型加载状态无关，绝不触发模型初始化
pub async fn list_voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: voice::catalog()
            .iter()
            .map(|v| VoiceDto {
                id: v.id,
                name: v.name,
            })
            .collect(),
    })
}
