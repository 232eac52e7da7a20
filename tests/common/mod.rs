// 集成测试公共模块
//
// 提供可编排失败次数和延迟的内存翻译后端，以及测试配置

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use live_translate::translation::{
    TranslationBackend, TranslationError, TranslationEvent, TranslationResult, TranslatorConfig,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// 一次后端调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub text: String,
    pub source: String,
    pub target: String,
}

#[derive(Default)]
struct Script {
    failures: HashMap<String, usize>,
    rejected: Vec<String>,
    calls: Vec<Call>,
    latency: Duration,
}

/// 内存翻译后端：译文为原文转大写，可以为指定片段编排失败次数
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次调用在返回前等待 `latency`
    pub fn with_latency(self, latency: Duration) -> Self {
        self.script.lock().unwrap().latency = latency;
        self
    }

    /// 片段 `text` 的前 `times` 次调用失败
    pub fn fail_times(self, text: &str, times: usize) -> Self {
        self.script
            .lock()
            .unwrap()
            .failures
            .insert(text.to_string(), times);
        self
    }

    /// 片段 `text` 被拒绝，返回不可重试的错误
    pub fn reject(self, text: &str) -> Self {
        self.script.lock().unwrap().rejected.push(text.to_string());
        self
    }

    /// 片段 `text` 总是失败
    pub fn always_fail(self, text: &str) -> Self {
        self.fail_times(text, usize::MAX)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.text).collect()
    }

    pub fn call_count(&self, text: &str) -> usize {
        self.calls().iter().filter(|c| c.text == text).count()
    }
}

impl TranslationBackend for ScriptedBackend {
    async fn translate(&self, text: &str, source: &str, target: &str) -> TranslationResult<String> {
        let latency = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call {
                text: text.to_string(),
                source: source.to_string(),
                target: target.to_string(),
            });
            script.latency
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut script = self.script.lock().unwrap();
        if script.rejected.iter().any(|r| r == text) {
            return Err(TranslationError::InvalidInput("模拟请求被拒绝".to_string()));
        }
        if let Some(remaining) = script.failures.get_mut(text) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(TranslationError::NetworkError("模拟接口不可用".to_string()));
            }
        }
        Ok(text.to_uppercase())
    }
}

/// 测试配置：默认延迟与重试参数，可指定片段大小和最大字符数
#[allow(dead_code)]
pub fn test_config(chunk_size: usize, max_chars: usize) -> TranslatorConfig {
    let mut config = TranslatorConfig::default_with_lang("en", Some("auto"));
    config.api_chunk_size = chunk_size;
    config.max_chars = max_chars;
    config
}

/// 取出当前已发送的所有事件
#[allow(dead_code)]
pub fn drain(events: &mut UnboundedReceiver<TranslationEvent>) -> Vec<TranslationEvent> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}
