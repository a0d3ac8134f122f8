//! Voice Context - 音色上下文

mod catalog;
mod request;

pub use catalog::{catalog, PresetVoice, DEFAULT_VOICE};
pub use request::VoiceRequest;
