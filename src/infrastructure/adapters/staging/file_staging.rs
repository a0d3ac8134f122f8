//! File Sample Staging - 上传样本文件暂存
//!
//! 将上传的克隆样本写入暂存目录，暂存名取上传文件名的
//! 文件名部分；同名覆盖（last write wins）

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{SampleStagingPort, StagingError};

/// 文件系统暂存
pub struct FileSampleStaging {
    base_dir: PathBuf,
}

impl FileSampleStaging {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl SampleStagingPort for FileSampleStaging {
    async fn stage(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StagingError> {
        // 只取文件名部分，拒绝路径穿越
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StagingError::InvalidFileName(file_name.to_string()))?;

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| StagingError::Io(e.to_string()))?;

        let path = self.base_dir.join(name);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Overwriting previously staged sample");
        }

        fs::write(&path, data)
            .await
            .map_err(|e| StagingError::Io(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Staged uploaded sample"
        );

        Ok(path)
    }
}
