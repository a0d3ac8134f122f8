//! Voice Context - Value Objects

/// 音色请求
///
/// 单次请求的不可变值对象：预置音色 ID 或用户上传的克隆样本
#[derive(Debug, Clone)]
pub enum VoiceRequest {
    /// 预置音色 ID
    Preset(String),
    /// 用户上传的克隆样本（原始文件名 + 音频字节）
    UploadedSample { file_name: String, data: Vec<u8> },
}

impl VoiceRequest {
    pub fn preset(id: impl Into<String>) -> Self {
        Self::Preset(id.into())
    }

    pub fn uploaded_sample(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::UploadedSample {
            file_name: file_name.into(),
            data,
        }
    }

    /// 请求有效性检查
    ///
    /// 在任何引擎调用之前快速失败
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Self::Preset(id) if id.trim().is_empty() => Err("voice id is empty"),
            Self::UploadedSample { file_name, .. } if file_name.trim().is_empty() => {
                Err("uploaded sample has no file name")
            }
            Self::UploadedSample { data, .. } if data.is_empty() => {
                Err("uploaded sample is empty")
            }
            _ => Ok(()),
        }
    }

    /// 日志用摘要（绝不输出音频内容）
    pub fn summary(&self) -> String {
        match self {
            Self::Preset(id) => format!("preset:{}", id),
            Self::UploadedSample { file_name, data } => {
                format!("upload:{} ({} bytes)", file_name, data.len())
            }
        }
    }
}
