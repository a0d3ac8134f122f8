//! Engine Adapters - 推理引擎适配器

mod fake;
mod sidecar;

pub use fake::{FakeEngineLoader, FakeTtsEngine, FakeTtsEngineConfig};
pub use sidecar::{SidecarEngineConfig, SidecarEngineLoader, SidecarTtsEngine};
