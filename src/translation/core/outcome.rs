//! 翻译请求与运行结果

use serde::{Deserialize, Serialize};

use crate::translation::error::TranslationError;
use crate::translation::language::{Language, LanguagePair};
use crate::translation::pipeline::join_chunks;

/// 一次翻译请求，派发后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub source: Language,
    pub target: Language,
    pub text: String,
    pub max_chars: usize,
}

impl TranslationRequest {
    pub fn new(languages: LanguagePair, text: impl Into<String>, max_chars: usize) -> Self {
        Self {
            source: languages.source,
            target: languages.target,
            text: text.into(),
            max_chars,
        }
    }

    pub fn languages(&self) -> LanguagePair {
        LanguagePair::new(self.source, self.target)
    }
}

/// 运行状态
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Failed(TranslationError),
}

/// 进度通知：第 `completed` 个片段（共 `total` 个）已翻译完成
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub fraction: f64,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        let fraction = if total == 0 {
            1.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            completed,
            total,
            fraction,
        }
    }
}

/// 一次翻译运行的结果
///
/// 只由调度器修改；新的运行开始时旧结果被替换而不是修改。
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    /// 按片段序号排列的译文
    pub chunk_results: Vec<String>,
    pub total_chunks: usize,
    pub progress: f64,
    pub status: RunStatus,
}

impl TranslationOutcome {
    pub fn pending() -> Self {
        Self {
            chunk_results: Vec::new(),
            total_chunks: 0,
            progress: 0.0,
            status: RunStatus::Pending,
        }
    }

    pub(crate) fn in_progress(total_chunks: usize) -> Self {
        Self {
            chunk_results: Vec::with_capacity(total_chunks),
            total_chunks,
            progress: 0.0,
            status: RunStatus::InProgress,
        }
    }

    pub(crate) fn record_chunk(&mut self, translated: String) -> Progress {
        self.chunk_results.push(translated);
        let progress = Progress::new(self.chunk_results.len(), self.total_chunks);
        self.progress = progress.fraction;
        progress
    }

    pub(crate) fn complete(mut self) -> Self {
        self.progress = 1.0;
        self.status = RunStatus::Completed;
        self
    }

    /// 取消：已翻译的片段被丢弃
    pub(crate) fn cancel(mut self) -> Self {
        self.chunk_results.clear();
        self.status = RunStatus::Cancelled;
        self
    }

    /// 失败：已翻译的片段被丢弃
    pub(crate) fn fail(mut self, error: TranslationError) -> Self {
        self.chunk_results.clear();
        self.status = RunStatus::Failed(error);
        self
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.status, RunStatus::Pending | RunStatus::InProgress)
    }

    /// 完整译文，只有成功完成的运行才有
    pub fn output(&self) -> Option<String> {
        match self.status {
            RunStatus::Completed => Some(join_chunks(&self.chunk_results)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TranslationError> {
        match &self.status {
            RunStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl Default for TranslationOutcome {
    fn default() -> Self {
        Self::pending()
    }
}
