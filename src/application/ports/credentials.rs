//! Credential Port - 外部凭据存取抽象

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 凭据错误
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No credential available")]
    Missing,

    #[error("IO error: {0}")]
    Io(String),
}

/// 凭据状态
///
/// 用于健康诊断，绝不暴露完整密钥（预览只含首尾各 4 个字符）
#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    pub authenticated: bool,
    pub token_preview: Option<String>,
    pub env_file_found: bool,
}

/// Credential Port
#[async_trait]
pub trait CredentialPort: Send + Sync {
    /// 当前凭据状态（遮蔽后的预览）
    fn status(&self) -> CredentialStatus;

    /// 读取凭据
    ///
    /// 每次调用重新读取外部存储，启动后写入的 token 也能被
    /// 重试路径拿到
    async fn token(&self) -> Result<String, CredentialError>;
}
