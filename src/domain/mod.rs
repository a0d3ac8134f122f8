//! 领域层
//!
//! - Voice Context: 预置音色目录与音色请求值对象
//! - Audio: WAV 容器编码（纯算法，无 IO）

pub mod audio;
pub mod voice;
