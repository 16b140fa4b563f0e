use std::collections::BTreeSet;
use std::sync::Arc;
use serde::Serialize;
use crate::api;
use crate::models::conf::{Conf, HiddenElements};
use crate::models::element::{Element, KeyValue};
use crate::models::inline::Inline;
use crate::models::range::Range;
use crate::models::structure::Structure;
use crate::parser::{filter, structure_builder, text_processor};

/// 解析结果。构造后不可变，编辑时对新文本重新解析
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(skip)]
    source: Arc<str>,
    #[serde(skip)]
    conf: Conf,
    title_page: Vec<KeyValue>,
    elements: Vec<Element>,
    characters: BTreeSet<String>,
}

impl Document {
    pub(crate) fn new(
        source: Arc<str>,
        title_page: Vec<KeyValue>,
        elements: Vec<Element>,
        conf: Conf,
    ) -> Self {
        let mut characters = BTreeSet::new();
        for element in &elements {
            if let Element::Dialogue { character_range, .. } = element {
                characters.extend(api::split_character_names(character_range.slice(&source)));
            }
        }
        Document {
            source,
            conf,
            title_page,
            elements,
            characters,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn conf(&self) -> &Conf {
        &self.conf
    }

    pub fn title_page(&self) -> &[KeyValue] {
        &self.title_page
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.title_page.is_empty()
    }

    /// 对白中出现过的全部角色名
    pub fn all_characters(&self) -> &BTreeSet<String> {
        &self.characters
    }

    /// 原样截取
    pub fn slice_raw(&self, range: Range) -> &str {
        range.slice(&self.source)
    }

    /// 截取并做 HTML 转义，可选把每行开头的空格转成 `&nbsp;`
    pub fn slice_as_html(&self, range: Range, escape_leading_spaces: bool) -> String {
        let escaped = html_escape::encode_text(self.slice_raw(range));
        if !escape_leading_spaces {
            return escaped.into_owned();
        }

        let mut out = String::with_capacity(escaped.len());
        let mut at_line_start = true;
        for c in escaped.chars() {
            if at_line_start && c == ' ' {
                out.push_str("&nbsp;");
                continue;
            }
            at_line_start = c == '\n';
            out.push(c);
        }
        out
    }

    /// 对任意区间应用行内语法（梗概行、标题页值等）
    pub fn parse_inline(&self, range: Range) -> Vec<Inline> {
        text_processor::parse_inline(&self.source, range)
    }

    pub fn characters_of(&self, dialogue: &Element) -> Vec<String> {
        api::characters_of(self, dialogue)
    }

    /// 章节/场景层级视图和片段
    pub fn structure(&self) -> Structure {
        structure_builder::build_structure(self)
    }

    /// 去掉注解、梗概或废稿后的新文档，与原文档共享原文
    pub fn with_hidden_elements_removed(&self, settings: &HiddenElements) -> Document {
        filter::remove_hidden_elements(self, settings)
    }

    /// 标题页与全部元素依次拼接，应当与原文完全一致
    pub fn reconstruct(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for kv in &self.title_page {
            out.push_str(self.slice_raw(kv.range));
        }
        for element in &self.elements {
            out.push_str(self.slice_raw(element.range()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_slice_escapes_and_keeps_indentation() {
        let doc = Document::new(Arc::from("  <b> & \n  x"), Vec::new(), Vec::new(), Conf::default());
        let all = Range::new(0, doc.source().len());
        assert_eq!(doc.slice_as_html(all, false), "  &lt;b&gt; &amp; \n  x");
        assert_eq!(
            doc.slice_as_html(all, true),
            "&nbsp;&nbsp;&lt;b&gt; &amp; \n&nbsp;&nbsp;x"
        );
    }
}
