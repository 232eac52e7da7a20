//! 防抖控制器
//!
//! 每次输入变化都会取消尚未触发的定时器并重新计时，连续输入只在最后一次
//! 变化后的静默期结束时触发一次翻译。定时器是一个 tokio 任务，取消即 `abort`，
//! 因此调用方需要处在 tokio 运行时中。

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::translation::config::constants;

/// 一次输入变化的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputUpdate {
    /// 去除首尾空白并截断后的文本
    pub text: String,
    pub char_count: usize,
    pub max_chars: usize,
    /// 输入是否因超过上限被截断
    pub truncated: bool,
    /// 文本与上次记录的不同，并已排期翻译
    pub scheduled: bool,
}

impl InputUpdate {
    /// 字符计数标签
    pub fn char_count_label(&self) -> String {
        format!("字符数: {}/{}", self.char_count, self.max_chars)
    }
}

/// 将延迟限制在允许范围内
pub fn clamp_delay(delay: Duration) -> Duration {
    delay.clamp(constants::MIN_DEBOUNCE_DELAY, constants::MAX_DEBOUNCE_DELAY)
}

/// 去除首尾空白，并按字符数截断
pub fn normalize_input(raw: &str, max_chars: usize) -> (String, bool) {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => (trimmed[..cut].to_string(), true),
        None => (trimmed.to_string(), false),
    }
}

#[derive(Debug)]
pub struct DebounceController {
    delay: Duration,
    max_chars: usize,
    last_input: String,
    pending: Option<JoinHandle<()>>,
}

impl DebounceController {
    pub fn new(delay: Duration, max_chars: usize) -> Self {
        Self {
            delay: clamp_delay(delay),
            max_chars,
            last_input: String::new(),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 设置延迟，返回实际生效的（限制范围后的）值
    pub fn set_delay(&mut self, delay: Duration) -> Duration {
        self.delay = clamp_delay(delay);
        self.delay
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn last_input(&self) -> &str {
        &self.last_input
    }

    /// 处理一次输入变化
    ///
    /// 文本与上次记录的相同时只返回计数，不重新排期；否则取消旧定时器，
    /// 在 `delay` 之后用当前文本调用 `trigger`。
    pub fn on_input_changed<F>(&mut self, raw: &str, trigger: F) -> InputUpdate
    where
        F: FnOnce(String) + Send + 'static,
    {
        let (text, truncated) = normalize_input(raw, self.max_chars);
        let char_count = text.chars().count();

        if truncated {
            tracing::warn!("输入超过 {} 字符，已截断", self.max_chars);
        }

        let scheduled = text != self.last_input;
        if scheduled {
            self.last_input = text.clone();
            self.cancel_pending();

            let delay = self.delay;
            let fire_with = text.clone();
            self.pending = Some(tokio::spawn(async move {
                sleep(delay).await;
                trigger(fire_with);
            }));
            tracing::trace!("自动翻译已排期: {}ms", delay.as_millis());
        }

        InputUpdate {
            text,
            char_count,
            max_chars: self.max_chars,
            truncated,
            scheduled,
        }
    }

    /// 取消尚未触发的定时器
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// 清空记录的输入并取消定时器
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.last_input.clear();
    }
}

impl Default for DebounceController {
    fn default() -> Self {
        Self::new(constants::DEFAULT_DEBOUNCE_DELAY, constants::DEFAULT_MAX_CHARS)
    }
}

impl Drop for DebounceController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_delay_is_clamped() {
        let controller = DebounceController::new(Duration::from_millis(10), 100);
        assert_eq!(controller.delay(), Duration::from_millis(100));

        let mut controller = DebounceController::default();
        assert_eq!(controller.delay(), Duration::from_millis(500));
        assert_eq!(controller.set_delay(Duration::from_secs(5)), Duration::from_secs(2));
    }

    #[test]
    fn test_normalize_trims_and_truncates() {
        assert_eq!(normalize_input("  hello \n", 10), ("hello".to_string(), false));
        assert_eq!(normalize_input("你好世界", 2), ("你好".to_string(), true));
        assert_eq!(normalize_input("abc", 3), ("abc".to_string(), false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_fire_once() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut controller = DebounceController::new(Duration::from_millis(500), 100);

        for text in ["h", "he", "hel", "hello"] {
            let sink = fired.clone();
            controller.on_input_changed(text, move |t| sink.lock().unwrap().push(t));
            sleep(Duration::from_millis(100)).await;
        }
        assert!(fired.lock().unwrap().is_empty());

        sleep(Duration::from_millis(600)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["hello".to_string()]);
        assert!(!controller.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_text_does_not_reschedule() {
        let fired = Arc::new(Mutex::new(0));
        let mut controller = DebounceController::new(Duration::from_millis(100), 100);

        let sink = fired.clone();
        let first = controller.on_input_changed("same", move |_| *sink.lock().unwrap() += 1);
        assert!(first.scheduled);
        sleep(Duration::from_millis(200)).await;

        let sink = fired.clone();
        let second = controller.on_input_changed(" same ", move |_| *sink.lock().unwrap() += 1);
        assert!(!second.scheduled);
        assert_eq!(second.char_count_label(), "字符数: 4/100");
        sleep(Duration::from_millis(200)).await;

        assert_eq!(*fired.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending() {
        let fired = Arc::new(Mutex::new(false));
        let mut controller = DebounceController::new(Duration::from_millis(100), 100);

        let sink = fired.clone();
        controller.on_input_changed("text", move |_| *sink.lock().unwrap() = true);
        assert!(controller.has_pending());
        controller.reset();
        assert_eq!(controller.last_input(), "");

        sleep(Duration::from_millis(300)).await;
        assert!(!*fired.lock().unwrap());
    }
}
