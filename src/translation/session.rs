//! 翻译会话
//!
//! 会话把防抖、调度器和展示状态组合在一起，对外提供与界面操作一一对应的方法：
//! 输入变化、立即翻译、取消、交换语言、清空、复制。
//!
//! 同一时刻最多只有一个运行在进行；运行进行中时新的翻译请求会被直接丢弃，
//! 而不是排队。取消会立即释放这个位置，旧运行之后产生的结果凭运行编号被过滤掉，
//! 不会覆盖新运行的输出。
//!
//! 状态保存在 `std::sync::Mutex` 中，锁从不跨越 `await`。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::translation::backend::TranslationBackend;
use crate::translation::config::TranslatorConfig;
use crate::translation::core::{
    Dispatcher, DispatchStatsSnapshot, Progress, RunStatus, TranslationOutcome, TranslationRequest,
};
use crate::translation::debounce::{DebounceController, InputUpdate};
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::events::{RunId, SessionStatus, TranslationEvent};
use crate::translation::language::LanguagePair;

/// 已派发运行的句柄
#[derive(Debug)]
pub struct RunHandle {
    pub run_id: RunId,
    join: JoinHandle<TranslationOutcome>,
}

impl RunHandle {
    /// 等待运行结束并取得结果
    pub async fn outcome(self) -> TranslationOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => TranslationOutcome::pending().fail(TranslationError::InternalError(
                format!("翻译任务异常退出: {}", e),
            )),
        }
    }
}

/// 会话当前状态的快照
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub languages: LanguagePair,
    pub input: String,
    pub output: String,
    pub status: SessionStatus,
    pub progress: f64,
    pub in_flight: bool,
    pub max_chars: usize,
}

impl SessionSnapshot {
    pub fn char_count_label(&self) -> String {
        format!("字符数: {}/{}", self.input.chars().count(), self.max_chars)
    }
}

/// 交换语言的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub languages: LanguagePair,
    /// 交换后的输入（旧输出去掉末尾换行）
    pub input: InputUpdate,
    /// 交换后的输出（旧输入）
    pub output: String,
}

/// 运行任务退出时释放单次飞行位置；任务 panic 或被中止时同样生效
struct RunGuard<B> {
    inner: Arc<SessionInner<B>>,
    run_id: RunId,
    finished: bool,
}

impl<B> Drop for RunGuard<B> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let error = TranslationError::InternalError("翻译任务异常退出".to_string());
        helpers::log_error(&error, &format!("运行 {}", self.run_id));
        self.inner
            .finish_run(self.run_id, &TranslationOutcome::pending().fail(error));
    }
}

struct ActiveRun {
    id: RunId,
    cancel: Arc<AtomicBool>,
}

struct SessionState {
    languages: LanguagePair,
    debounce: DebounceController,
    input: String,
    output: String,
    status: SessionStatus,
    progress: f64,
    active: Option<ActiveRun>,
    next_run_id: RunId,
}

impl SessionState {
    fn is_current(&self, run_id: RunId) -> bool {
        self.active.as_ref().is_some_and(|run| run.id == run_id)
    }
}

struct SessionInner<B> {
    backend: B,
    dispatcher: Dispatcher,
    max_chars: usize,
    events: mpsc::UnboundedSender<TranslationEvent>,
    state: Mutex<SessionState>,
}

impl<B> SessionInner<B> {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // 锁内没有会 panic 的逻辑，中毒时直接沿用内部状态
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: TranslationEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("事件接收端已关闭");
        }
    }

    fn on_progress(&self, run_id: RunId, progress: Progress) {
        let mut state = self.lock();
        if !state.is_current(run_id) {
            return;
        }
        state.progress = progress.fraction;
        state.status = SessionStatus::Translating {
            completed: progress.completed,
            total: progress.total,
        };
        self.emit(TranslationEvent::progress(run_id, progress));
    }

    fn finish_run(&self, run_id: RunId, outcome: &TranslationOutcome) {
        let mut state = self.lock();
        if !state.is_current(run_id) {
            tracing::debug!("忽略过期运行 {} 的结果", run_id);
            return;
        }
        state.active = None;

        match &outcome.status {
            RunStatus::Completed => {
                let text = outcome.output().unwrap_or_default();
                state.output = text.clone();
                state.status = SessionStatus::Completed;
                state.progress = 1.0;
                self.emit(TranslationEvent::Completed { run_id, text });
            }
            RunStatus::Failed(error) => {
                let message = error.to_string();
                if error.is_user_visible() {
                    state.output = format!("翻译出错: {}", message);
                }
                state.status = SessionStatus::Failed;
                self.emit(TranslationEvent::Failed { run_id, message });
            }
            RunStatus::Cancelled => {
                state.status = SessionStatus::Cancelled;
                self.emit(TranslationEvent::Cancelled { run_id });
            }
            RunStatus::Pending | RunStatus::InProgress => {
                state.status = SessionStatus::Ready;
            }
        }
    }
}

/// 翻译会话，克隆后共享同一个状态
pub struct TranslationSession<B> {
    inner: Arc<SessionInner<B>>,
}

impl<B> Clone for TranslationSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: TranslationBackend> TranslationSession<B> {
    /// 创建会话，返回会话和事件接收端
    pub fn new(
        backend: B,
        config: &TranslatorConfig,
    ) -> TranslationResult<(Self, mpsc::UnboundedReceiver<TranslationEvent>)> {
        config.validate()?;
        let languages = config.languages()?;
        let dispatcher = Dispatcher::from_config(config)?;
        let (events, receiver) = mpsc::unbounded_channel();

        let state = SessionState {
            languages,
            debounce: DebounceController::new(config.debounce_delay(), config.max_chars),
            input: String::new(),
            output: String::new(),
            status: SessionStatus::Ready,
            progress: 0.0,
            active: None,
            next_run_id: 1,
        };

        tracing::debug!(
            "创建翻译会话: {} -> {}, 最大 {} 字符",
            languages.source,
            languages.target,
            config.max_chars
        );

        let session = Self {
            inner: Arc::new(SessionInner {
                backend,
                dispatcher,
                max_chars: config.max_chars,
                events,
                state: Mutex::new(state),
            }),
        };
        Ok((session, receiver))
    }

    /// 输入发生变化
    ///
    /// 文本被去除首尾空白并按上限截断；与上次不同则在防抖延迟后自动翻译。
    pub fn on_input_changed(&self, raw: &str) -> InputUpdate {
        let session = self.clone();
        let mut state = self.inner.lock();
        let update = state.debounce.on_input_changed(raw, move |text| {
            session.dispatch(text);
        });
        state.input = update.text.clone();

        if update.truncated {
            self.inner.emit(TranslationEvent::LimitExceeded {
                max_chars: update.max_chars,
            });
        }
        if update.scheduled {
            state.status = SessionStatus::Typing;
            self.inner.emit(TranslationEvent::Typing {
                char_count: update.char_count,
            });
        }
        update
    }

    /// 立即翻译当前输入
    ///
    /// 输入为空或已有运行进行中时返回 `None`，请求被丢弃。
    pub fn translate_now(&self) -> Option<RunHandle> {
        let text = self.inner.lock().input.clone();
        let handle = self.dispatch(text)?;
        // 已经手动派发，挂起的自动翻译不再需要
        self.inner.lock().debounce.cancel_pending();
        Some(handle)
    }

    /// 派发一次运行
    fn dispatch(&self, text: String) -> Option<RunHandle> {
        let (run_id, cancel, request) = {
            let mut state = self.inner.lock();

            if text.trim().is_empty() {
                tracing::debug!("输入为空，跳过翻译");
                return None;
            }
            if let Some(active) = &state.active {
                tracing::debug!("运行 {} 进行中，丢弃新的翻译请求", active.id);
                return None;
            }

            let run_id = state.next_run_id;
            state.next_run_id += 1;
            let cancel = Arc::new(AtomicBool::new(false));
            state.active = Some(ActiveRun {
                id: run_id,
                cancel: Arc::clone(&cancel),
            });
            state.status = SessionStatus::Preparing;
            state.progress = 0.0;

            let request = TranslationRequest::new(state.languages, text, self.inner.max_chars);
            self.inner.emit(TranslationEvent::Started { run_id });
            (run_id, cancel, request)
        };

        tracing::debug!("派发运行 {}", run_id);
        let inner = Arc::clone(&self.inner);
        let join = tokio::spawn(async move {
            let mut guard = RunGuard {
                inner: Arc::clone(&inner),
                run_id,
                finished: false,
            };
            let outcome = inner
                .dispatcher
                .run(&request, &inner.backend, &cancel, |progress| {
                    inner.on_progress(run_id, progress)
                })
                .await;
            inner.finish_run(run_id, &outcome);
            guard.finished = true;
            outcome
        });

        Some(RunHandle { run_id, join })
    }

    /// 取消进行中的运行
    ///
    /// 立即释放单次飞行位置；旧运行在下一个片段边界停止，之后的结果被忽略。
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.lock();
        match state.active.take() {
            Some(run) => {
                run.cancel.store(true, Ordering::Release);
                state.status = SessionStatus::Cancelled;
                tracing::info!("取消运行 {}", run.id);
                self.inner
                    .emit(TranslationEvent::Cancelled { run_id: run.id });
                true
            }
            None => false,
        }
    }

    /// 交换语言和文本
    ///
    /// 旧输出（去掉末尾换行）成为新输入，旧输入成为新输出；新输入随后按普通输入处理，
    /// 与上次不同时会自动翻译。
    pub fn swap_languages(&self) -> SwapOutcome {
        let (languages, new_input, new_output) = {
            let mut state = self.inner.lock();
            state.languages = state.languages.swapped();
            let new_input = state.output.trim_end_matches('\n').to_string();
            let new_output = std::mem::take(&mut state.input);
            state.output = new_output.clone();
            (state.languages, new_input, new_output)
        };

        tracing::debug!("交换语言: {} -> {}", languages.source, languages.target);
        self.inner.emit(TranslationEvent::Swapped { languages });

        let input = self.on_input_changed(&new_input);
        SwapOutcome {
            languages,
            input,
            output: new_output,
        }
    }

    /// 清空输入和输出
    ///
    /// 进行中的运行不受影响，它完成后仍会写入输出。
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.debounce.reset();
        state.input.clear();
        state.output.clear();
        state.status = SessionStatus::Ready;
        state.progress = 0.0;
        self.inner.emit(TranslationEvent::Cleared);
    }

    /// 可复制的译文；输出为空时返回 `None`
    pub fn copyable_output(&self) -> Option<String> {
        let state = self.inner.lock();
        let text = state.output.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    pub fn languages(&self) -> LanguagePair {
        self.inner.lock().languages
    }

    /// 选择语言；只影响之后派发的运行
    pub fn set_languages(&self, languages: LanguagePair) {
        self.inner.lock().languages = languages;
    }

    pub fn delay(&self) -> Duration {
        self.inner.lock().debounce.delay()
    }

    /// 调整防抖延迟，返回限制范围后的值
    pub fn set_delay(&self, delay: Duration) -> Duration {
        self.inner.lock().debounce.set_delay(delay)
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.lock().active.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.lock().status
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock();
        SessionSnapshot {
            languages: state.languages,
            input: state.input.clone(),
            output: state.output.clone(),
            status: state.status,
            progress: state.progress,
            in_flight: state.active.is_some(),
            max_chars: self.inner.max_chars,
        }
    }

    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.inner.dispatcher.get_stats().snapshot()
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }
}
