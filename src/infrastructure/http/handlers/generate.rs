//! Generate Handler
//!
//! 同一端点接受 JSON 与 multipart 两种请求体。
//! multipart 请求中上传的音频文件优先于 `voice` 字段

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::GenerateSpeech;
use crate::domain::voice::{self, VoiceRequest};
use crate::infrastructure::http::dto::GenerateRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 缺省暂存名（multipart 未携带文件名时使用）
const DEFAULT_SAMPLE_NAME: &str = "sample.wav";

/// 生成语音
pub async fn generate(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let cmd = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart request: {}", e)))?;
        parse_multipart(multipart).await?
    } else {
        let Json(req) = Json::<GenerateRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON request: {}", e)))?;
        GenerateSpeech {
            text: req.text,
            voice: VoiceRequest::preset(req.voice),
        }
    };

    let audio = state.generate_handler.handle(cmd).await?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, audio.bytes.len())
        .body(Body::from(audio.bytes))
        .unwrap())
}

/// 解析 multipart 请求体
async fn parse_multipart(mut multipart: Multipart) -> Result<GenerateSpeech, ApiError> {
    let mut text: Option<String> = None;
    let mut voice: Option<String> = None;
    let mut sample: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "text" => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read text: {}", e)))?,
                );
            }
            "voice" => {
                voice = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read voice: {}", e)))?,
                );
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| DEFAULT_SAMPLE_NAME.to_string());

                // 验证音频格式
                let extension = PathBuf::from(&file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|s| s.to_lowercase());
                let valid_exts = ["wav", "mp3", "flac", "ogg"];
                if !extension
                    .as_ref()
                    .map(|e| valid_exts.contains(&e.as_str()))
                    .unwrap_or(false)
                {
                    return Err(ApiError::BadRequest(
                        "Only WAV, MP3, FLAC, OGG audio files are allowed".to_string(),
                    ));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec();

                sample = Some((file_name, data));
            }
            _ => {}
        }
    }

    let text = text.unwrap_or_default();

    // 上传文件优先于 voice 字段
    let voice_request = match sample {
        Some((file_name, data)) => VoiceRequest::uploaded_sample(file_name, data),
        None => VoiceRequest::preset(voice.unwrap_or_else(|| voice::DEFAULT_VOICE.to_string())),
    };

    Ok(GenerateSpeech {
        text,
        voice: voice_request,
    })
}
