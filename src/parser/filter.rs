use tracing::debug;
use crate::models::{Document, Element, HiddenElements, Inline, KeyValue, Line};
use crate::utils::normalize_title;

fn filter_inlines(nodes: &[Inline], settings: &HiddenElements) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Note { .. } if settings.hide_notes => {}
            Inline::Boneyard { .. } if settings.hide_boneyard => {}
            Inline::Styled { style, range, elements } => {
                let children = filter_inlines(elements, settings);
                // 只包着被隐藏内容的强调一并去掉
                if children.is_empty() && !elements.is_empty() {
                    continue;
                }
                out.push(Inline::Styled { style: *style, range: *range, elements: children });
            }
            other => out.push(other.clone()),
        }
    }
    out
}

/// 原本就是空行的保留；过滤后才变空的行丢弃
fn filter_lines(lines: &[Line], settings: &HiddenElements) -> Vec<Line> {
    lines
        .iter()
        .filter_map(|line| {
            if line.is_blank() {
                return Some(line.clone());
            }
            let elements = filter_inlines(&line.elements, settings);
            if elements.is_empty() {
                return None;
            }
            Some(Line { elements, ..line.clone() })
        })
        .collect()
}

fn filter_title_page(entries: &[KeyValue], settings: &HiddenElements) -> Vec<KeyValue> {
    entries
        .iter()
        .map(|kv| KeyValue {
            key: kv.key.clone(),
            values: kv
                .values
                .iter()
                .filter(|value| value.is_empty() || !filter_inlines(value, settings).is_empty())
                .map(|value| filter_inlines(value, settings))
                .collect(),
            range: kv.range,
        })
        .collect()
}

/// 过滤块内的行；原本有行、过滤后一行不剩的块整体丢弃
fn filter_block(element: &Element, settings: &HiddenElements) -> Option<Element> {
    let original = element.lines()?;
    let lines = filter_lines(original, settings);
    if lines.is_empty() && !original.is_empty() {
        return None;
    }
    let mut filtered = element.clone();
    match &mut filtered {
        Element::Action { lines: slot, .. }
        | Element::Lyrics { lines: slot, .. }
        | Element::Dialogue { lines: slot, .. } => *slot = lines,
        _ => {}
    }
    Some(filtered)
}

/// 生成去掉隐藏元素的新文档，区间不改写、原文共享
///
/// `hide_boneyard` 时遇到标题为 "Boneyard" 的章节即停止，后面全部丢弃
pub fn remove_hidden_elements(doc: &Document, settings: &HiddenElements) -> Document {
    let boneyard_title = doc.conf().boneyard_title.to_lowercase();
    let mut elements = Vec::with_capacity(doc.elements().len());

    for element in doc.elements() {
        match element {
            Element::Section { range, .. }
                if settings.hide_boneyard && normalize_title(doc.slice_raw(*range)) == boneyard_title =>
            {
                break;
            }
            Element::Synopsis { .. } if settings.hide_synopsis => {}
            Element::Action { .. } | Element::Lyrics { .. } | Element::Dialogue { .. } => {
                if let Some(filtered) = filter_block(element, settings) {
                    elements.push(filtered);
                }
            }
            other => elements.push(other.clone()),
        }
    }

    debug!(
        before = doc.elements().len(),
        after = elements.len(),
        "removed hidden elements"
    );

    Document::new(
        doc.shared_source(),
        filter_title_page(doc.title_page(), settings),
        elements,
        doc.conf().clone(),
    )
}
