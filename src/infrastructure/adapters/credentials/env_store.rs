//! Env Credential Store - .env 凭据读取
//!
//! 从 .env 风格文件中读取 `HF_TOKEN=...`。每次 `token()` 调用
//! 重新读取文件，启动后补写的 token 也能被重试路径使用

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::application::ports::{CredentialError, CredentialPort, CredentialStatus};

const TOKEN_KEY: &str = "HF_TOKEN=";

/// .env 凭据存储
pub struct EnvCredentialStore {
    env_path: PathBuf,
}

impl EnvCredentialStore {
    pub fn new(env_path: impl Into<PathBuf>) -> Self {
        Self {
            env_path: env_path.into(),
        }
    }

    fn parse_token(content: &str) -> Option<String> {
        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix(TOKEN_KEY) {
                // 值可能带引号或多余空白
                let token = value.trim().trim_matches('"').trim_matches('\'');
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
        None
    }

    /// 遮蔽预览：只保留首尾各 4 个字符
    fn preview(token: &str) -> Option<String> {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() < 8 {
            return None;
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        Some(format!("{}...{}", head, tail))
    }
}

#[async_trait]
impl CredentialPort for EnvCredentialStore {
    fn status(&self) -> CredentialStatus {
        match std::fs::read_to_string(&self.env_path) {
            Ok(content) => match Self::parse_token(&content) {
                Some(token) => CredentialStatus {
                    authenticated: true,
                    token_preview: Self::preview(&token),
                    env_file_found: true,
                },
                None => CredentialStatus {
                    authenticated: false,
                    token_preview: None,
                    env_file_found: true,
                },
            },
            Err(_) => CredentialStatus {
                authenticated: false,
                token_preview: None,
                env_file_found: false,
            },
        }
    }

    async fn token(&self) -> Result<String, CredentialError> {
        let content = tokio::fs::read_to_string(&self.env_path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    CredentialError::Missing
                } else {
                    CredentialError::Io(e.to_string())
                }
            })?;

        Self::parse_token(&content).ok_or(CredentialError::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_with(content: &str) -> (tempfile::TempDir, EnvCredentialStore) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, content).unwrap();
        (dir, EnvCredentialStore::new(path))
    }

    #[tokio::test]
    async fn test_reads_plain_token() {
        let (_dir, store) = store_with("HF_TOKEN=hf_abcdefgh1234\n");
        assert_eq!(store.token().await.unwrap(), "hf_abcdefgh1234");
    }

    #[tokio::test]
    async fn test_strips_quotes_and_whitespace() {
        let (_dir, store) = store_with("HF_TOKEN=\"hf_abcdefgh1234\"  \n");
        assert_eq!(store.token().await.unwrap(), "hf_abcdefgh1234");
    }

    #[tokio::test]
    async fn test_missing_file_is_missing_credential() {
        let dir = tempdir().unwrap();
        let store = EnvCredentialStore::new(dir.path().join(".env"));

        assert!(matches!(
            store.token().await,
            Err(CredentialError::Missing)
        ));

        let status = store.status();
        assert!(!status.env_file_found);
        assert!(!status.authenticated);
    }

    #[tokio::test]
    async fn test_file_without_token_key() {
        let (_dir, store) = store_with("OTHER_KEY=value\n");

        assert!(matches!(store.token().await, Err(CredentialError::Missing)));

        let status = store.status();
        assert!(status.env_file_found);
        assert!(!status.authenticated);
    }

    #[tokio::test]
    async fn test_empty_value_is_missing() {
        let (_dir, store) = store_with("HF_TOKEN=\n");
        assert!(matches!(store.token().await, Err(CredentialError::Missing)));
    }

    #[test]
    fn test_status_preview_masks_token() {
        let (_dir, store) = store_with("HF_TOKEN=hf_abcdefgh1234\n");
        let status = store.status();

        assert!(status.authenticated);
        assert_eq!(status.token_preview.as_deref(), Some("hf_a...1234"));
    }

    #[test]
    fn test_short_token_has_no_preview() {
        let (_dir, store) = store_with("HF_TOKEN=short\n");
        let status = store.status();

        // 太短的 token 无法安全预览，但仍视为已认证
        assert!(status.authenticated);
        assert!(status.token_preview.is_none());
    }
}
