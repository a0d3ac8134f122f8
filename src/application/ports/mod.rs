//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod credentials;
mod sample_staging;
mod tts_engine;

pub use credentials::{CredentialError, CredentialPort, CredentialStatus};
pub use sample_staging::{SampleStagingPort, StagingError};
pub use tts_engine::{
    EngineError, EngineLoaderPort, GeneratedAudio, TtsEnginePort, VoiceState,
};
