//! Sample Staging Port - 上传样本暂存抽象

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 暂存错误
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Sample Staging Port
///
/// 将上传的克隆样本写入引擎可引用的稳定路径。
/// 暂存名取原始文件名，同名覆盖为接受行为（last write wins）
#[async_trait]
pub trait SampleStagingPort: Send + Sync {
    async fn stage(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StagingError>;
}
