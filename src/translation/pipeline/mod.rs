//! 翻译管道模块
//!
//! 提供文本分片，为逐片段翻译做准备

pub mod chunker;

// 重新导出主要类型
pub use chunker::{join_chunks, split_text, Chunk, Chunker};
