//! 应用层
//!
//! - Ports: 出站端口定义（TtsEngine, SampleStaging, Credentials）
//! - ModelGateway: 进程级惰性模型单例
//! - VoiceResolver: 音色解析与凭据重试策略
//! - Generation: 生成命令编排

pub mod ports;

mod generation;
mod model_gateway;
mod voice_resolver;

pub use generation::{EncodedAudio, GenerateSpeech, GenerateSpeechHandler, GenerationError};
pub use model_gateway::{GatewayError, ModelGateway};
pub use voice_resolver::{VoiceError, VoiceResolver};
