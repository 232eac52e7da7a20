//! # Live Translate Library
//!
//! 边输入边翻译的核心库：输入防抖、长文本分片、带重试的逐片段翻译、
//! 进度与取消，以及保证同一时刻只有一个翻译在进行的会话。
//!
//! ## 模块组织
//!
//! - `translation` - 翻译功能
//! - `env` - 环境变量
//! - `logging` - 日志初始化

pub mod env;
pub mod logging;
pub mod translation;

// Re-export commonly used items for convenience
pub use translation::{
    GoogleBackend, Language, LanguagePair, TranslationError, TranslationEvent, TranslationResult,
    TranslationSession, TranslatorConfig,
};
