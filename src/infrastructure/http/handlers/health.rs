//! Health Handler
//!
//! 诊断端点：进程状态、版本与凭据可用性（只暴露遮蔽后的预览）

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::HealthResponse;
use crate::infrastructure::http::state::AppState;

/// 健康检查
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let credential = state.credentials.status();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_status: if credential.authenticated {
            "authenticated"
        } else {
            "anonymous"
        },
        token_preview: credential.token_preview,
        env_file_found: credential.env_file_found,
    })
}
