//! 预置音色目录
//!
//! 固定的内置音色列表。纯静态数据，不依赖存储，也不触发模型加载

use serde::Serialize;

/// 默认音色 ID
pub const DEFAULT_VOICE: &str = "alba";

/// 预置音色条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetVoice {
    pub id: &'static str,
    pub name: &'static str,
}

/// 内置音色目录（顺序稳定，对外展示按此顺序）
const PRESET_CATALOG: &[PresetVoice] = &[
    PresetVoice { id: "alba", name: "Alba (Casual)" },
    PresetVoice { id: "marius", name: "Marius (Selfie)" },
    PresetVoice { id: "javert", name: "Javert (Butter)" },
    PresetVoice { id: "jean", name: "Jean (Freeform)" },
    PresetVoice { id: "fantine", name: "Fantine (VCTK)" },
    PresetVoice { id: "cosette", name: "Cosette (Expresso)" },
    PresetVoice { id: "eponine", name: "Eponine (VCTK)" },
    PresetVoice { id: "azelma", name: "Azelma (VCTK)" },
];

/// 获取预置音色目录
pub fn catalog() -> &'static [PresetVoice] {
    PRESET_CATALOG
}
