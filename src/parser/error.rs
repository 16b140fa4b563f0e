use thiserror::Error;
use crate::models::Range;

/// 解析错误：只在内部不变量被破坏时出现，任何 Fountain 文本本身都不是错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("区间起点在终点之后: {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("区间 {start}..{end} 超出原文长度 {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("区间 {start}..{end} 不在字符边界上")]
    NotCharBoundary { start: usize, end: usize },

    #[error("字节 {0} 处没有元素覆盖")]
    CoverageGap(usize),

    #[error("元素在字节 {0} 处重叠")]
    Overlap(usize),

    #[error("子区间 {inner:?} 超出所属元素 {outer:?}")]
    Escapes { inner: Range, outer: Range },
}

/// 解析结果
pub type ParseResult<T> = Result<T, ParseError>;
