//! 翻译核心模块
//!
//! 容错调度器和它产生的运行结果。调度器只负责一次运行：切分、逐片段翻译、
//! 重试、取消检查和进度回调；单次飞行约束和事件投递由 [`session`](crate::translation::session) 负责。
//!
//! ## 模块依赖关系
//!
//! ```text
//! TranslationSession (session.rs)
//!     ├── DebounceController (debounce.rs)
//!     └── Dispatcher (dispatcher.rs)
//!             ├── Chunker (pipeline/chunker.rs)
//!             └── TranslationBackend (backend/mod.rs)
//! ```

pub mod dispatcher;
pub mod outcome;

/// 容错调度器
pub use dispatcher::{DispatchStats, DispatchStatsSnapshot, Dispatcher, RetryPolicy};

/// 请求、进度和运行结果
pub use outcome::{Progress, RunStatus, TranslationOutcome, TranslationRequest};
