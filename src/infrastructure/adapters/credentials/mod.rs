//! Credentials Adapter - 外部凭据存储实现

mod env_store;

pub use env_store::EnvCredentialStore;
