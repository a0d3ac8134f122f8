//! Fake TTS Engine - 用于测试的引擎实现
//!
//! 不做真实推理，返回确定性的正弦样本；可脚本化受限引用、
//! 损坏引用与加载失败，并暴露调用计数供测试断言副作用

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    EngineError, EngineLoaderPort, GeneratedAudio, TtsEnginePort, VoiceState,
};
use crate::domain::voice;

/// Fake 引擎配置
#[derive(Debug, Clone)]
pub struct FakeTtsEngineConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 每次生成返回的样本数
    pub samples_per_request: usize,
    /// 模拟推理延迟
    pub latency: Duration,
}

impl Default for FakeTtsEngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            samples_per_request: 2400,
            latency: Duration::ZERO,
        }
    }
}

/// Fake TTS Engine
pub struct FakeTtsEngine {
    config: FakeTtsEngineConfig,
    /// 可识别的预置音色；路径形式的引用（含分隔符）不经此校验
    known_presets: HashSet<String>,
    /// 登录前返回 AuthorizationRequired 的引用
    gated_references: HashSet<String>,
    /// 登录后依然失败的引用
    broken_references: HashSet<String>,
    authorized: AtomicBool,
    reject_login: AtomicBool,
    voice_state_calls: AtomicUsize,
    login_calls: AtomicUsize,
    generate_calls: AtomicUsize,
}

impl FakeTtsEngine {
    pub fn new(config: FakeTtsEngineConfig) -> Self {
        Self {
            config,
            known_presets: voice::catalog().iter().map(|v| v.id.to_string()).collect(),
            gated_references: HashSet::new(),
            broken_references: HashSet::new(),
            authorized: AtomicBool::new(false),
            reject_login: AtomicBool::new(false),
            voice_state_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsEngineConfig::default())
    }

    /// 将引用标记为受限（登录前拒绝）
    pub fn with_gated_reference(mut self, reference: impl Into<String>) -> Self {
        self.gated_references.insert(reference.into());
        self
    }

    /// 将引用标记为损坏（登录后依然拒绝）
    pub fn with_broken_reference(mut self, reference: impl Into<String>) -> Self {
        self.broken_references.insert(reference.into());
        self
    }

    /// 使登录总是失败
    pub fn with_rejected_login(self) -> Self {
        self.reject_login.store(true, Ordering::SeqCst);
        self
    }

    pub fn samples_per_request(&self) -> usize {
        self.config.samples_per_request
    }

    pub fn voice_state_calls(&self) -> usize {
        self.voice_state_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsEngine {
    async fn voice_state(&self, reference: &str) -> Result<VoiceState, EngineError> {
        self.voice_state_calls.fetch_add(1, Ordering::SeqCst);

        if self.gated_references.contains(reference)
            && !self.authorized.load(Ordering::SeqCst)
        {
            return Err(EngineError::AuthorizationRequired(format!(
                "downloading the voice cloning module for '{}' requires accepting the terms",
                reference
            )));
        }

        if self.broken_references.contains(reference) {
            return Err(EngineError::InvalidVoice(format!(
                "corrupt sample: {}",
                reference
            )));
        }

        // 暂存样本以路径形式引用，其余按预置目录校验
        let is_path = reference.contains('/') || reference.contains('\\');
        if !is_path && !self.known_presets.contains(reference) {
            return Err(EngineError::VoiceNotFound(reference.to_string()));
        }

        Ok(VoiceState::new(reference))
    }

    async fn login(&self, _token: &str) -> Result<(), EngineError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);

        if self.reject_login.load(Ordering::SeqCst) {
            return Err(EngineError::Service("login rejected".to_string()));
        }

        self.authorized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn generate(
        &self,
        _state: VoiceState,
        text: &str,
    ) -> Result<GeneratedAudio, EngineError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);

        if self.config.latency > Duration::ZERO {
            tokio::time::sleep(self.config.latency).await;
        }

        if text.is_empty() {
            return Err(EngineError::Service("empty text".to_string()));
        }

        // 固定频率正弦波，长度与文本无关
        let samples = (0..self.config.samples_per_request)
            .map(|i| (i as f32 * 0.05).sin() * 0.3)
            .collect();

        Ok(GeneratedAudio {
            samples,
            sample_rate: self.config.sample_rate,
        })
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}

/// Fake 引擎加载器
///
/// 可配置加载延迟与前 N 次失败，用于验证 Gateway 的
/// 单次初始化与失败重试行为
pub struct FakeEngineLoader {
    engine: Arc<FakeTtsEngine>,
    load_delay: Duration,
    fail_times: AtomicUsize,
    load_calls: AtomicUsize,
}

impl FakeEngineLoader {
    pub fn new(engine: Arc<FakeTtsEngine>) -> Self {
        Self {
            engine,
            load_delay: Duration::ZERO,
            fail_times: AtomicUsize::new(0),
            load_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// 前 N 次加载失败
    pub fn failing_times(self, times: usize) -> Self {
        self.fail_times.store(times, Ordering::SeqCst);
        self
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineLoaderPort for FakeEngineLoader {
    async fn load(&self) -> Result<Arc<dyn TtsEnginePort>, EngineError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);

        if self.load_delay > Duration::ZERO {
            tokio::time::sleep(self.load_delay).await;
        }

        // Gateway 串行化加载调用，这里无需原子性更强的更新
        let remaining = self.fail_times.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_times.store(remaining - 1, Ordering::SeqCst);
            return Err(EngineError::Init("simulated load failure".to_string()));
        }

        Ok(self.engine.clone())
    }
}
