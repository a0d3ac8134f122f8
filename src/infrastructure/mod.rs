//! 基础设施层
//!
//! - HTTP: RESTful API 与静态 UI 托管
//! - Adapters: 推理引擎 / 样本暂存 / 凭据存储适配器

pub mod adapters;
pub mod http;
