//! 文本分片器
//!
//! 将长文本切分为不超过接口限制的有序片段。切分点优先选择换行符，其次句号，
//! 再次逗号；窗口内都找不到时直接按长度硬切。所有片段按顺序拼接后与原文完全一致。
//!
//! 长度按 Unicode 字符（`char`）计算，而不是字节。

use serde::{Deserialize, Serialize};

use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 切分点的搜索顺序
const BOUNDARY_CHARS: [char; 3] = ['\n', '.', ','];

/// 一个待翻译的片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 从 0 开始的片段序号，决定译文的拼接顺序
    pub index: usize,
    pub text: String,
}

impl Chunk {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// 文本分片器
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    limit: usize,
}

impl Chunker {
    /// 创建分片器，`limit` 为单个片段的最大字符数
    pub fn new(limit: usize) -> TranslationResult<Self> {
        if limit == 0 {
            return Err(TranslationError::InvalidInput(
                "片段大小必须大于0".to_string(),
            ));
        }
        Ok(Self { limit })
    }

    /// 不做校验的构造，`limit` 为 0 时按 1 处理
    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 切分文本
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let rest = &text[start..];
            // 窗口结束位置：第 limit 个字符的字节偏移；剩余不足 limit 时到文本末尾
            let end = match rest.char_indices().nth(self.limit) {
                Some((offset, _)) => {
                    let window = &rest[..offset];
                    start + Self::boundary_in(window).unwrap_or(offset)
                }
                None => text.len(),
            };

            chunks.push(Chunk {
                index: chunks.len(),
                text: text[start..end].to_string(),
            });
            start = end;
        }

        chunks
    }

    /// 在窗口内从右向左查找切分点，返回切分点之后的字节偏移
    fn boundary_in(window: &str) -> Option<usize> {
        BOUNDARY_CHARS
            .iter()
            .find_map(|&c| window.rfind(c))
            // 分隔符都是单字节 ASCII
            .map(|pos| pos + 1)
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            limit: constants::API_CHUNK_SIZE,
        }
    }
}

/// 按给定大小切分文本
pub fn split_text(text: &str, limit: usize) -> TranslationResult<Vec<Chunk>> {
    Ok(Chunker::new(limit)?.split(text))
}

/// 按序拼接片段文本，不插入任何分隔符
pub fn join_chunks<S: AsRef<str>>(parts: &[S]) -> String {
    parts.iter().map(|p| p.as_ref()).collect()
}
