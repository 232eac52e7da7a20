//! 容错调度器
//!
//! 将请求文本切分为片段，按顺序逐个调用翻译后端，每个片段在固定间隔下最多尝试
//! `max_attempts` 次。某个片段尝试耗尽时整个运行失败，后续片段不再尝试；
//! 每个片段开始前检查取消标志。失败和取消都会丢弃已翻译的片段。
//!
//! ## 工作流程
//! 1. 空输入直接返回 `Pending` 结果，不调用后端
//! 2. 按 `min(chunk_size, max_chars)` 切分文本
//! 3. 逐片段翻译，成功后回调进度
//! 4. 全部成功后按序拼接，状态为 `Completed`

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::sleep;

use super::outcome::{Progress, TranslationOutcome, TranslationRequest};
use crate::translation::backend::TranslationBackend;
use crate::translation::config::{constants, TranslatorConfig};
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::pipeline::{Chunk, Chunker};

/// 固定间隔的重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 每个片段的最大尝试次数（包括第一次）
    pub max_attempts: usize,
    /// 两次尝试之间的等待时间，不做指数增长
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_MAX_RETRY_ATTEMPTS,
            delay: constants::DEFAULT_RETRY_DELAY,
        }
    }
}

/// 调度器
#[derive(Debug)]
pub struct Dispatcher {
    chunker: Chunker,
    retry: RetryPolicy,
    stats: DispatchStats,
}

impl Dispatcher {
    pub fn new(chunk_size: usize, retry: RetryPolicy) -> TranslationResult<Self> {
        if retry.max_attempts == 0 {
            return Err(TranslationError::ConfigError(
                "最大尝试次数不能为0".to_string(),
            ));
        }

        Ok(Self {
            chunker: Chunker::new(chunk_size)?,
            retry,
            stats: DispatchStats::default(),
        })
    }

    pub fn from_config(config: &TranslatorConfig) -> TranslationResult<Self> {
        Self::new(
            config.api_chunk_size,
            RetryPolicy {
                max_attempts: config.max_retry_attempts,
                delay: config.retry_delay(),
            },
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn chunk_size(&self) -> usize {
        self.chunker.limit()
    }

    /// 切分请求文本；片段大小不会超过请求的最大字符数
    pub fn chunks_for(&self, request: &TranslationRequest) -> Vec<Chunk> {
        let limit = self.chunker.limit().min(request.max_chars);
        Chunker::with_limit(limit).split(&request.text)
    }

    /// 执行一次翻译运行
    ///
    /// `cancel` 在每个片段开始前检查；已提交给后端的片段会先完成。
    /// `on_progress` 在每个片段成功后调用一次。
    pub async fn run<B, F>(
        &self,
        request: &TranslationRequest,
        backend: &B,
        cancel: &AtomicBool,
        mut on_progress: F,
    ) -> TranslationOutcome
    where
        B: TranslationBackend,
        F: FnMut(Progress) + Send,
    {
        if request.text.trim().is_empty() {
            tracing::debug!("{}", TranslationError::EmptyInput);
            return TranslationOutcome::pending();
        }

        let chunks = self.chunks_for(request);
        let total = chunks.len();
        let source = request.source.code();
        let target = request.target.code();

        tracing::debug!(
            "开始翻译: {} 字符, {} 个片段, {} -> {}",
            request.text.chars().count(),
            total,
            source,
            target
        );

        let mut outcome = TranslationOutcome::in_progress(total);

        for chunk in &chunks {
            if cancel.load(Ordering::Acquire) {
                tracing::info!("翻译已取消，停止于片段 {}/{}", chunk.index + 1, total);
                self.stats.runs_cancelled.fetch_add(1, Ordering::Relaxed);
                return outcome.cancel();
            }

            match self.translate_chunk(backend, chunk, source, target).await {
                Ok(translated) => {
                    self.stats.chunks_translated.fetch_add(1, Ordering::Relaxed);
                    let progress = outcome.record_chunk(translated);
                    tracing::debug!("翻译中: 片段 {}/{}", progress.completed, progress.total);
                    on_progress(progress);
                }
                Err(e) => {
                    let error = TranslationError::ChunkFailed {
                        chunk: chunk.index + 1,
                        message: e.to_string(),
                    };
                    helpers::log_error(&error, "翻译运行失败");
                    self.stats.runs_failed.fetch_add(1, Ordering::Relaxed);
                    return outcome.fail(error);
                }
            }
        }

        tracing::info!("翻译完成: {} 个片段", total);
        self.stats.runs_completed.fetch_add(1, Ordering::Relaxed);
        outcome.complete()
    }

    /// 翻译单个片段，可重试的失败按固定间隔重试
    async fn translate_chunk<B>(
        &self,
        backend: &B,
        chunk: &Chunk,
        source: &str,
        target: &str,
    ) -> TranslationResult<String>
    where
        B: TranslationBackend,
    {
        let max_attempts = self.retry.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match backend.translate(&chunk.text, source, target).await {
                Ok(translated) => return Ok(translated),
                Err(e) => {
                    self.stats.failed_attempts.fetch_add(1, Ordering::Relaxed);

                    if !e.is_retryable() {
                        tracing::debug!("片段 {} 的错误不可重试: {}", chunk.index + 1, e);
                        return Err(e);
                    }
                    if attempt >= max_attempts {
                        return Err(e);
                    }

                    tracing::warn!(
                        "片段 {} 翻译失败，{}ms后重试 (尝试 {}/{}): {}",
                        chunk.index + 1,
                        self.retry.delay.as_millis(),
                        attempt + 1,
                        max_attempts,
                        e
                    );
                    sleep(self.retry.delay).await;
                }
            }
        }
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> &DispatchStats {
        &self.stats
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            chunker: Chunker::default(),
            retry: RetryPolicy::default(),
            stats: DispatchStats::default(),
        }
    }
}

/// 调度统计信息（线程安全版本）
#[derive(Debug, Default)]
pub struct DispatchStats {
    pub chunks_translated: AtomicUsize,
    pub failed_attempts: AtomicUsize,
    pub runs_completed: AtomicUsize,
    pub runs_failed: AtomicUsize,
    pub runs_cancelled: AtomicUsize,
}

impl DispatchStats {
    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            chunks_translated: self.chunks_translated.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            runs_cancelled: self.runs_cancelled.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStatsSnapshot {
    pub chunks_translated: usize,
    pub failed_attempts: usize,
    pub runs_completed: usize,
    pub runs_failed: usize,
    pub runs_cancelled: usize,
}
