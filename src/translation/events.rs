//! 会话事件
//!
//! 会话通过无界通道把状态变化推送给展示层（命令行、界面等）。
//! 属于某次运行的事件都带有运行编号，过期运行的事件不会被发送。

use std::fmt;

use serde::Serialize;

use crate::translation::core::Progress;
use crate::translation::language::LanguagePair;

/// 运行编号，每次派发递增
pub type RunId = u64;

/// 会话状态，`Display` 输出状态栏文本
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Ready,
    Typing,
    Preparing,
    Translating { completed: usize, total: usize },
    Completed,
    Failed,
    Cancelled,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Ready => write!(f, "就绪"),
            SessionStatus::Typing => write!(f, "输入中..."),
            SessionStatus::Preparing => write!(f, "准备翻译..."),
            SessionStatus::Translating { completed, total } => {
                write!(f, "翻译中: 片段 {}/{}", completed, total)
            }
            SessionStatus::Completed => write!(f, "翻译完成"),
            SessionStatus::Failed => write!(f, "翻译出错"),
            SessionStatus::Cancelled => write!(f, "翻译已取消"),
        }
    }
}

/// 会话推送的事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TranslationEvent {
    /// 输入发生变化，自动翻译已排期
    Typing { char_count: usize },
    /// 输入超过上限，已截断
    LimitExceeded { max_chars: usize },
    /// 新的运行已派发
    Started { run_id: RunId },
    Progress {
        run_id: RunId,
        completed: usize,
        total: usize,
        fraction: f64,
    },
    Completed { run_id: RunId, text: String },
    Failed { run_id: RunId, message: String },
    Cancelled { run_id: RunId },
    /// 语言已交换
    Swapped { languages: LanguagePair },
    /// 输入和输出已清空
    Cleared,
}

impl TranslationEvent {
    pub(crate) fn progress(run_id: RunId, progress: Progress) -> Self {
        TranslationEvent::Progress {
            run_id,
            completed: progress.completed,
            total: progress.total,
            fraction: progress.fraction,
        }
    }

    /// 事件所属的运行
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            TranslationEvent::Started { run_id }
            | TranslationEvent::Progress { run_id, .. }
            | TranslationEvent::Completed { run_id, .. }
            | TranslationEvent::Failed { run_id, .. }
            | TranslationEvent::Cancelled { run_id } => Some(*run_id),
            _ => None,
        }
    }

    /// 事件对应的状态栏状态；不改变状态的事件返回 `None`
    pub fn status(&self) -> Option<SessionStatus> {
        match self {
            TranslationEvent::Typing { .. } => Some(SessionStatus::Typing),
            TranslationEvent::Started { .. } => Some(SessionStatus::Preparing),
            TranslationEvent::Progress {
                completed, total, ..
            } => Some(SessionStatus::Translating {
                completed: *completed,
                total: *total,
            }),
            TranslationEvent::Completed { .. } => Some(SessionStatus::Completed),
            TranslationEvent::Failed { .. } => Some(SessionStatus::Failed),
            TranslationEvent::Cancelled { .. } => Some(SessionStatus::Cancelled),
            TranslationEvent::Cleared => Some(SessionStatus::Ready),
            TranslationEvent::LimitExceeded { .. } | TranslationEvent::Swapped { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TranslationEvent::Completed { .. }
                | TranslationEvent::Failed { .. }
                | TranslationEvent::Cancelled { .. }
        )
    }
}
