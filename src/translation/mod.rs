//! 翻译模块
//!
//! 实时翻译的核心，采用清晰的模块化架构：
//! - **pipeline**: 文本分片
//! - **backend**: 翻译后端接口与 Google 实现
//! - **core**: 容错调度器（重试、进度、取消）
//! - **debounce**: 输入防抖
//! - **session**: 单次飞行会话，组合以上部分
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use live_translate::translation::{GoogleBackend, TranslationSession, TranslatorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslatorConfig::default_with_lang("en", Some("zh-CN"));
//! let backend = GoogleBackend::from_config(&config)?;
//! let (session, mut events) = TranslationSession::new(backend, &config)?;
//!
//! session.on_input_changed("你好，世界");
//! while let Some(event) = events.recv().await {
//!     if event.is_terminal() {
//!         break;
//!     }
//! }
//! println!("{:?}", session.copyable_output());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 翻译后端 - 外部翻译能力的抽象
pub mod backend;

/// 配置管理模块 - 处理翻译相关的所有配置
pub mod config;

/// 容错调度器与运行结果
pub mod core;

/// 输入防抖
pub mod debounce;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 会话事件
pub mod events;

/// 支持的语言
pub mod language;

/// 文本处理管道模块 - 文本分片
pub mod pipeline;

/// 翻译会话
pub mod session;

// ============================================================================
// 重新导出
// ============================================================================

pub use backend::{FnBackend, GoogleBackend, TranslationBackend};
pub use config::{ConfigManager, TranslatorConfig};
pub use self::core::{Dispatcher, Progress, RetryPolicy, RunStatus, TranslationOutcome, TranslationRequest};
pub use debounce::{DebounceController, InputUpdate};
pub use error::{TranslationError, TranslationResult};
pub use events::{RunId, SessionStatus, TranslationEvent};
pub use language::{Language, LanguagePair};
pub use pipeline::{split_text, Chunk, Chunker};
pub use session::{RunHandle, SessionSnapshot, SwapOutcome, TranslationSession};
