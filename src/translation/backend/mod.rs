//! 翻译后端
//!
//! 翻译后端是一个不透明的外部能力：给定文本和源/目标语言代码，返回译文。
//! 调用可能临时失败，重试由调度器负责。

use std::future::Future;

use crate::translation::error::TranslationResult;

pub mod google;

pub use google::GoogleBackend;

/// 翻译后端接口
pub trait TranslationBackend: Send + Sync + 'static {
    /// 翻译一段文本
    ///
    /// `source` 可以是 `"auto"`；语言代码来自 [`Language::code`](crate::translation::language::Language::code)。
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> impl Future<Output = TranslationResult<String>> + Send;
}

/// 把同步函数包装成翻译后端
pub struct FnBackend<F>(pub F);

impl<F> TranslationBackend for FnBackend<F>
where
    F: Fn(&str, &str, &str) -> TranslationResult<String> + Send + Sync + 'static,
{
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> impl Future<Output = TranslationResult<String>> + Send {
        std::future::ready((self.0)(text, source, target))
    }
}
