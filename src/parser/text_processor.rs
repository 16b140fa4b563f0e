use std::cell::Cell;
use crate::models::{Inline, NoteKind, Range, StyleKind};
use crate::utils::TOKEN_REGEX;

/// 强调分隔符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    BoldItalics,
    Bold,
    Italics,
    Underline,
}

const BOLD: u8 = 1;
const ITALICS: u8 = 2;
const UNDERLINE: u8 = 4;

impl Delimiter {
    fn marker(self) -> &'static str {
        match self {
            Delimiter::BoldItalics => "***",
            Delimiter::Bold => "**",
            Delimiter::Italics => "*",
            Delimiter::Underline => "_",
        }
    }

    /// 打开后生效的样式位
    fn styles(self) -> u8 {
        match self {
            Delimiter::BoldItalics => BOLD | ITALICS,
            Delimiter::Bold => BOLD,
            Delimiter::Italics => ITALICS,
            Delimiter::Underline => UNDERLINE,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

const STAR_DELIMITERS: [Delimiter; 3] = [Delimiter::BoldItalics, Delimiter::Bold, Delimiter::Italics];

/// 已知找不到闭合的位置，失败的查找不再重复
#[derive(Debug, Clone, Copy, Default)]
struct Memo {
    /// 每种分隔符：区间内的开口到行尾都没有闭合
    unclosed: [Option<Range>; 4],
    /// 此位置之后再没有 `*/`
    no_boneyard_close: Option<usize>,
    /// 区间内的 `[[` 在本行都没有 `]]`
    unclosed_note: Option<Range>,
}

struct Scan {
    nodes: Vec<Inline>,
    end: usize,
    closed: bool,
}

struct InlineScanner<'a> {
    src: &'a str,
    end: usize,
    memo: Cell<Memo>,
}

/// 解析一段文本的行内语法：废稿、注解、强调、纯文本
///
/// 未闭合的强调符号原样留在文本里；相邻的纯文本会合并成一个节点。
/// 同一样式不会嵌套在自身里面，递归最多三层
pub fn parse_inline(src: &str, range: Range) -> Vec<Inline> {
    if range.is_empty() || src.get(range.start..range.end).is_none() {
        return Vec::new();
    }
    let scanner = InlineScanner { src, end: range.end, memo: Cell::new(Memo::default()) };
    scanner.scan(range.start, None, 0).nodes
}

fn push_text(nodes: &mut Vec<Inline>, start: usize, end: usize) {
    if start >= end {
        return;
    }
    if let Some(Inline::Text { range }) = nodes.last_mut() {
        if range.end == start {
            range.end = end;
            return;
        }
    }
    nodes.push(Inline::Text { range: Range::new(start, end) });
}

fn is_special(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\\' | '/' | '[' | '*' | '_')
}

impl<'a> InlineScanner<'a> {
    fn rest(&self, pos: usize) -> &'a str {
        &self.src[pos..self.end]
    }

    /// 从 `start` 扫描到区间结束或遇到 `closer`，`open` 是外层已打开的样式
    fn scan(&self, start: usize, closer: Option<Delimiter>, open: u8) -> Scan {
        let mut nodes = Vec::new();
        let mut pos = start;

        while pos < self.end {
            let rest = self.rest(pos);

            if let Some(delimiter) = closer {
                if pos > start && rest.starts_with(delimiter.marker()) {
                    // 更长的分隔符能自行闭合时优先作为内层开口
                    if let Some((node, next)) = self.try_emphasis(pos, delimiter.marker().len(), open) {
                        nodes.push(node);
                        pos = next;
                        continue;
                    }
                    return Scan { nodes, end: pos, closed: true };
                }
            }

            let Some(c) = rest.chars().next() else { break };
            match c {
                '\n' | '\r' => {
                    // 强调不能跨行
                    if closer.is_some() {
                        return Scan { nodes, end: pos, closed: false };
                    }
                    pos += 1;
                }
                '\\' if rest[1..].starts_with(&['*', '_'][..]) => {
                    push_text(&mut nodes, pos, pos + 2);
                    pos += 2;
                }
                '/' if rest.starts_with("/*") => match self.boneyard_end(pos) {
                    Some(end) => {
                        nodes.push(Inline::Boneyard { range: Range::new(pos, end) });
                        pos = end;
                    }
                    None if closer.is_none() => {
                        nodes.push(Inline::Boneyard { range: Range::new(pos, self.end) });
                        pos = self.end;
                    }
                    None => {
                        push_text(&mut nodes, pos, pos + 2);
                        pos += 2;
                    }
                },
                '[' if rest.starts_with("[[") => match self.note_end(pos) {
                    Some(end) => {
                        nodes.push(self.note(Range::new(pos, end)));
                        pos = end;
                    }
                    None => {
                        push_text(&mut nodes, pos, pos + 2);
                        pos += 2;
                    }
                },
                '*' | '_' => {
                    if let Some((node, next)) = self.try_emphasis(pos, 0, open) {
                        nodes.push(node);
                        pos = next;
                    } else {
                        push_text(&mut nodes, pos, pos + 1);
                        pos += 1;
                    }
                }
                _ => {
                    let len = rest
                        .char_indices()
                        .skip(1)
                        .find(|(_, ch)| is_special(*ch))
                        .map_or(rest.len(), |(i, _)| i);
                    push_text(&mut nodes, pos, pos + len);
                    pos += len;
                }
            }
        }

        Scan { nodes, end: pos, closed: false }
    }

    /// `/*` 对应 `*/` 之后的位置
    fn boneyard_end(&self, pos: usize) -> Option<usize> {
        let mut memo = self.memo.get();
        if memo.no_boneyard_close.is_some_and(|from| pos >= from) {
            return None;
        }
        match self.src[pos + 2..self.end].find("*/") {
            Some(close) => Some(pos + 2 + close + 2),
            None => {
                memo.no_boneyard_close = Some(pos);
                self.memo.set(memo);
                None
            }
        }
    }

    /// `[[` 在同一行内对应 `]]` 之后的位置
    fn note_end(&self, pos: usize) -> Option<usize> {
        let mut memo = self.memo.get();
        if memo.unclosed_note.is_some_and(|known| known.contains(pos)) {
            return None;
        }
        let body = &self.src[pos + 2..self.end];
        let line_len = body.find('\n').unwrap_or(body.len());
        match body[..line_len].find("]]") {
            Some(close) => Some(pos + 2 + close + 2),
            None => {
                memo.unclosed_note = Some(Range::new(pos, pos + 2 + line_len));
                self.memo.set(memo);
                None
            }
        }
    }

    fn known_unclosed(&self, delimiter: Delimiter, pos: usize) -> bool {
        self.memo.get().unclosed[delimiter.index()].is_some_and(|known| known.contains(pos))
    }

    fn remember_unclosed(&self, delimiter: Delimiter, range: Range) {
        let mut memo = self.memo.get();
        let slot = &mut memo.unclosed[delimiter.index()];
        *slot = match *slot {
            Some(known) if known.end == range.end => Some(known.union(&range)),
            _ => Some(range),
        };
        self.memo.set(memo);
    }

    /// 尝试在 `pos` 打开强调，只考虑长于 `min_len` 且尚未打开的分隔符
    fn try_emphasis(&self, pos: usize, min_len: usize, open: u8) -> Option<(Inline, usize)> {
        let rest = self.rest(pos);
        let candidates: &[Delimiter] = if rest.starts_with('*') {
            &STAR_DELIMITERS
        } else {
            &[Delimiter::Underline]
        };

        for &delimiter in candidates {
            let marker = delimiter.marker();
            if marker.len() <= min_len || !rest.starts_with(marker) {
                continue;
            }
            if open & delimiter.styles() != 0 || self.known_unclosed(delimiter, pos) {
                continue;
            }
            let inner = self.scan(pos + marker.len(), Some(delimiter), open | delimiter.styles());
            if !inner.closed {
                self.remember_unclosed(delimiter, Range::new(pos, inner.end));
                continue;
            }
            let end = inner.end + marker.len();
            let range = Range::new(pos, end);
            let node = match delimiter {
                Delimiter::BoldItalics => Inline::Styled {
                    style: StyleKind::Bold,
                    range,
                    elements: vec![Inline::Styled {
                        style: StyleKind::Italics,
                        range: Range::new(pos + 2, end - 2),
                        elements: inner.nodes,
                    }],
                },
                Delimiter::Bold => Inline::Styled { style: StyleKind::Bold, range, elements: inner.nodes },
                Delimiter::Italics => Inline::Styled { style: StyleKind::Italics, range, elements: inner.nodes },
                Delimiter::Underline => Inline::Styled { style: StyleKind::Underline, range, elements: inner.nodes },
            };
            return Some((node, end));
        }
        None
    }

    /// `[[...]]`，内容不再做强调解析
    fn note(&self, range: Range) -> Inline {
        let content = Range::new(range.start + 2, range.end - 2);
        let (kind, text_range) = classify_note(self.src, content);
        Inline::Note { range, kind, text_range }
    }
}

/// 按注解开头判断种类，返回种类和去掉前缀后的正文区间
pub fn classify_note(src: &str, content: Range) -> (NoteKind, Range) {
    let body = content.slice(src);

    let (kind, prefix_len) = if body.starts_with('+') {
        (NoteKind::Addition, 1)
    } else if body.starts_with('-') {
        (NoteKind::Removal, 1)
    } else if let Some(caps) = TOKEN_REGEX["note_margin"].captures(body) {
        let word = caps.get(1).map_or("", |m| m.as_str());
        (NoteKind::Margin(word.to_string()), 1 + word.len())
    } else if let Some(caps) = TOKEN_REGEX["note_custom_kind"].captures(body) {
        let token = caps.get(1).map_or("", |m| m.as_str());
        let kind = if token.eq_ignore_ascii_case("todo") {
            NoteKind::Todo
        } else {
            NoteKind::Custom(token.to_string())
        };
        (kind, token.len() + 1)
    } else {
        return (NoteKind::Plain, content);
    };

    let after = &body[prefix_len..];
    let skipped = after.len() - after.trim_start().len();
    (kind, Range::new(content.start + prefix_len + skipped, content.end))
}
