//! Parla - 本地文本转语音 Web 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 预置音色目录、音色请求值对象
//! - Audio: WAV 容器编码
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, SampleStaging, Credentials）
//! - ModelGateway: 进程级惰性模型单例
//! - VoiceResolver: 音色解析与单次凭据重试
//! - Generation: 生成命令编排
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + 静态 UI 托管
//! - Adapters: 推理引擎（sidecar/fake）、样本暂存、凭据存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
