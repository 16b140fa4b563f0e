use std::fmt;
use serde::{Deserialize, Serialize};
use crate::models::range::Range;

/// 强调样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Bold,
    Italics,
    Underline,
}

/// 注解种类，对应 `[[...]]` 开头的标记
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NoteKind {
    /// `[[普通注解]]`
    Plain,
    /// `[[+新增]]`
    Addition,
    /// `[[-删除]]`
    Removal,
    /// `[[todo: ...]]`，大小写不敏感
    Todo,
    /// `[[@word]]` 边注，保存 `@` 后面的单词（可以为空）
    Margin(String),
    /// `[[Idea: ...]]` 之类的自定义前缀，不含冒号
    Custom(String),
}

impl NoteKind {
    /// 边注单词，非边注返回 None
    pub fn margin_marker(&self) -> Option<&str> {
        match self {
            NoteKind::Margin(word) => Some(word),
            _ => None,
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteKind::Plain => Ok(()),
            NoteKind::Addition => f.write_str("+"),
            NoteKind::Removal => f.write_str("-"),
            NoteKind::Todo => f.write_str("todo"),
            NoteKind::Margin(word) => write!(f, "@{}", word),
            NoteKind::Custom(prefix) => f.write_str(prefix),
        }
    }
}

/// 行内节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    /// 不含换行的连续纯文本
    Text { range: Range },
    /// 可嵌套的强调，嵌套顺序有意义
    Styled {
        style: StyleKind,
        range: Range,
        elements: Vec<Inline>,
    },
    /// `[[...]]`，`text_range` 是种类前缀之后的内容
    Note {
        range: Range,
        kind: NoteKind,
        text_range: Range,
    },
    /// `/* ... */`，任何渲染中都不输出
    Boneyard { range: Range },
}

impl Inline {
    pub fn range(&self) -> Range {
        match self {
            Inline::Text { range }
            | Inline::Styled { range, .. }
            | Inline::Note { range, .. }
            | Inline::Boneyard { range } => *range,
        }
    }
}
