//! 查询与提取接口
//!
//! 渲染、编辑器等外部使用方只通过这里和 `Document` 的只读方法访问语法树

use crate::models::{Document, Element, Inline, Line};
use crate::utils::BLOCK_REGEX;

/// `BOB & ALICE` 拆成多个角色名，空名字丢弃
pub fn split_character_names(text: &str) -> Vec<String> {
    text.split('&')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// 对白块的角色名；非对白返回空列表
pub fn characters_of(doc: &Document, element: &Element) -> Vec<String> {
    match element {
        Element::Dialogue { character_range, .. } => {
            split_character_names(doc.slice_raw(*character_range))
        }
        _ => Vec::new(),
    }
}

fn collect_notes<'a>(nodes: &'a [Inline], out: &mut Vec<&'a Inline>) {
    for node in nodes {
        match node {
            Inline::Note { .. } => out.push(node),
            Inline::Styled { elements, .. } => collect_notes(elements, out),
            _ => {}
        }
    }
}

/// 按文档顺序收集 Action、Dialogue、Lyrics 中的全部注解
pub fn extract_notes(elements: &[Element]) -> Vec<&Inline> {
    let mut out = Vec::new();
    for line in elements.iter().flat_map(|el| el.lines().unwrap_or(&[])) {
        collect_notes(&line.elements, &mut out);
    }
    out
}

/// 边注单词。`[[@]]` 返回 `Some("")`，其他种类和非注解返回 None
pub fn extract_margin_marker(note: &Inline) -> Option<&str> {
    match note {
        Inline::Note { kind, .. } => kind.margin_marker(),
        _ => None,
    }
}

/// 转场文本，强制转场去掉开头的 `>`
pub fn extract_transition_text(transition: &Element, doc: &Document) -> String {
    let Element::Transition { range, forced } = transition else {
        return String::new();
    };
    let text = doc.slice_raw(*range).trim();
    if *forced {
        return text.strip_prefix('>').unwrap_or(text).trim_start().to_string();
    }
    text.to_string()
}

/// 章节标题，不含 `#`
pub fn section_title(section: &Element, doc: &Document) -> String {
    match section {
        Element::Section { range, .. } => doc
            .slice_raw(*range)
            .trim()
            .trim_start_matches('#')
            .trim()
            .to_string(),
        _ => String::new(),
    }
}

/// 场景标题文本，去掉强制的 `.` 和 `#编号#`
pub fn scene_heading_text(scene: &Element, doc: &Document) -> String {
    let Element::Scene { range, .. } = scene else {
        return String::new();
    };
    let mut text = doc.slice_raw(*range).trim();
    if let Some(rest) = text.strip_prefix('.') {
        text = rest.trim_start();
    }
    match BLOCK_REGEX["scene_number"].find(text) {
        Some(m) => text[..m.start()].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// 一行的纯文本：注解和废稿不输出，强调只保留文字，`\*` `\_` 还原
pub fn plain_text_of(line: &Line, doc: &Document) -> String {
    let mut out = String::new();
    push_plain(&line.elements, doc, &mut out);
    out
}

fn push_plain(nodes: &[Inline], doc: &Document, out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text { range } => out.push_str(&unescape(doc.slice_raw(*range))),
            Inline::Styled { elements, .. } => push_plain(elements, doc, out),
            Inline::Note { .. } | Inline::Boneyard { .. } => {}
        }
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\*", "*").replace("\\_", "_")
}
