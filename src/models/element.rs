use serde::{Deserialize, Serialize};
use crate::models::inline::Inline;
use crate::models::range::Range;

/// 一个物理行的行内内容
///
/// `elements` 为空且 `range` 非空表示原文中的空行，空行会被保留
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub range: Range,
    pub elements: Vec<Inline>,
    /// `>文本<` 居中
    pub centered: bool,
}

impl Line {
    pub fn new(range: Range, elements: Vec<Inline>) -> Self {
        Line { range, elements, centered: false }
    }

    pub fn blank(range: Range) -> Self {
        Line { range, elements: Vec::new(), centered: false }
    }

    pub fn is_blank(&self) -> bool {
        self.elements.is_empty()
    }
}

/// 顶层元素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// 场景标题，区间包含其后必需的空行
    Scene {
        range: Range,
        /// `#1A#` 场景编号（不含井号）
        number: Option<Range>,
    },
    Transition {
        range: Range,
        /// 以 `>` 强制
        forced: bool,
    },
    Section {
        range: Range,
        /// `#` 的个数，1 到 6
        depth: u8,
    },
    Synopsis {
        range: Range,
        /// 每行去掉 `=` 与空白后的内容
        lines_of_text: Vec<Range>,
    },
    PageBreak { range: Range },
    Action { range: Range, lines: Vec<Line> },
    Lyrics { range: Range, lines: Vec<Line> },
    Dialogue {
        range: Range,
        /// 角色名，不含 `@`、扩展和 `^`
        character_range: Range,
        /// 名字后面所有括号扩展，如 `(V.O.) (CONT'D)`，可能为空
        character_extensions_range: Range,
        /// 紧跟角色名的括号行
        parenthetical: Option<Range>,
        lines: Vec<Line>,
        /// 角色行以 `^` 结尾，双对白
        dual: bool,
    },
}

impl Element {
    pub fn range(&self) -> Range {
        match self {
            Element::Scene { range, .. }
            | Element::Transition { range, .. }
            | Element::Section { range, .. }
            | Element::Synopsis { range, .. }
            | Element::PageBreak { range }
            | Element::Action { range, .. }
            | Element::Lyrics { range, .. }
            | Element::Dialogue { range, .. } => *range,
        }
    }

    /// 有行内内容的块
    pub fn lines(&self) -> Option<&[Line]> {
        match self {
            Element::Action { lines, .. }
            | Element::Lyrics { lines, .. }
            | Element::Dialogue { lines, .. } => Some(lines),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Scene { .. } => "scene",
            Element::Transition { .. } => "transition",
            Element::Section { .. } => "section",
            Element::Synopsis { .. } => "synopsis",
            Element::PageBreak { .. } => "page_break",
            Element::Action { .. } => "action",
            Element::Lyrics { .. } => "lyrics",
            Element::Dialogue { .. } => "dialogue",
        }
    }

    /// 只由空行组成的 Action
    pub fn is_blank_action(&self) -> bool {
        match self {
            Element::Action { lines, .. } => lines.iter().all(Line::is_blank),
            _ => false,
        }
    }

    pub(crate) fn set_range(&mut self, new_range: Range) {
        match self {
            Element::Scene { range, .. }
            | Element::Transition { range, .. }
            | Element::Section { range, .. }
            | Element::Synopsis { range, .. }
            | Element::PageBreak { range }
            | Element::Action { range, .. }
            | Element::Lyrics { range, .. }
            | Element::Dialogue { range, .. } => *range = new_range,
        }
    }
}

/// 标题页键值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    /// 每个物理行一组行内节点
    pub values: Vec<Vec<Inline>>,
    pub range: Range,
}
