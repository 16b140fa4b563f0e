use std::sync::Arc;
use tracing::{debug, trace};
use crate::models::{Conf, Document, Element, Line, Range};
use crate::parser::assembler;
use crate::parser::error::ParseError;
use crate::parser::lines::{logical_lines, SourceLine};
use crate::parser::text_processor::parse_inline;
use crate::parser::title_page::parse_title_page;
use crate::utils::{is_uppercase_text, BLOCK_REGEX};

/// Fountain 解析器
#[derive(Debug, Clone, Default)]
pub struct FountainParser {
    conf: Conf,
}

impl FountainParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conf(conf: Conf) -> Self {
        FountainParser { conf }
    }

    pub fn conf(&self) -> &Conf {
        &self.conf
    }

    /// 解析Fountain格式文本
    ///
    /// 任何文本都有唯一的分类结果；只有内部不变量被破坏时才返回错误
    pub fn parse(&self, script: &str) -> Result<Document, ParseError> {
        let source: Arc<str> = Arc::from(script);
        let src: &str = &source;
        let lines = logical_lines(src);

        let (title_page, first_body_line) = if self.conf.title_page {
            parse_title_page(src, &lines)
        } else {
            (Vec::new(), 0)
        };

        let classifier = Classifier {
            src,
            lines: &lines,
            cursor: first_body_line,
            elements: Vec::new(),
            pending_separator: None,
            at_boundary: true,
        };
        let raw = classifier.run();
        let raw_count = raw.len();

        let elements = if self.conf.merge_actions {
            assembler::merge_actions(src, raw)
        } else {
            raw
        };

        assembler::validate(src, &title_page, &elements)?;

        debug!(
            lines = lines.len(),
            title_keys = title_page.len(),
            raw_elements = raw_count,
            elements = elements.len(),
            "parsed fountain document"
        );

        Ok(Document::new(source, title_page, elements, self.conf.clone()))
    }
}

/// 角色行拆分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cue {
    pub character: Range,
    pub extensions: Range,
    pub dual: bool,
}

/// 逐行分类的状态机
struct Classifier<'a> {
    src: &'a str,
    lines: &'a [SourceLine],
    cursor: usize,
    elements: Vec<Element>,
    /// 软元素（章节、梗概、分页）留下的换行，由下一个元素认领
    pending_separator: Option<usize>,
    /// 上一行是空行、文档开头或软元素
    at_boundary: bool,
}

impl<'a> Classifier<'a> {
    fn run(mut self) -> Vec<Element> {
        while self.cursor < self.lines.len() {
            let line = self.lines[self.cursor];
            if line.is_blank(self.src) {
                self.blank_lines();
            } else {
                self.block();
            }
        }

        // 文末的换行归最后一个软元素
        if let Some(separator) = self.pending_separator.take() {
            if let Some(last) = self.elements.last_mut() {
                let range = last.range();
                last.set_range(Range::new(range.start.min(separator), self.src.len()));
            }
        }

        self.elements
    }

    fn content(&self, line: &SourceLine) -> &'a str {
        line.content(self.src)
    }

    fn next_is_blank(&self) -> bool {
        self.lines
            .get(self.cursor + 1)
            .map_or(true, |next| next.is_blank(self.src))
    }

    /// 元素起点：优先认领上一个软元素留下的换行
    fn start_of(&mut self, line: &SourceLine) -> usize {
        self.pending_separator.take().unwrap_or(line.start)
    }

    /// 硬元素结束：吃掉其后的一个空行
    fn finish_hard(&mut self, last_end: usize) -> usize {
        match self.lines.get(self.cursor) {
            Some(next) if next.is_blank(self.src) => {
                self.cursor += 1;
                self.at_boundary = true;
                next.end
            }
            _ => {
                self.at_boundary = false;
                last_end
            }
        }
    }

    fn finish_soft(&mut self, line: &SourceLine) -> usize {
        if line.has_newline() {
            self.pending_separator = Some(line.content_end);
        }
        self.at_boundary = true;
        line.content_end
    }

    fn push(&mut self, element: Element) {
        trace!(kind = element.kind_name(), range = ?element.range(), "classified block");
        self.elements.push(element);
    }

    /// 没有被任何元素吃掉的空行，成为只含空行的 Action
    fn blank_lines(&mut self) {
        let first = self.lines[self.cursor];
        let start = self.start_of(&first);
        let mut lines = Vec::new();
        let mut end = first.end;
        while let Some(line) = self.lines.get(self.cursor) {
            if !line.is_blank(self.src) {
                break;
            }
            lines.push(Line::blank(line.range()));
            end = line.end;
            self.cursor += 1;
        }
        self.at_boundary = true;
        self.push(Element::Action { range: Range::new(start, end), lines });
    }

    fn block(&mut self) {
        let line = self.lines[self.cursor];
        let content = self.content(&line);

        // 强制标记
        if BLOCK_REGEX["page_break"].is_match(content) {
            return self.page_break(line);
        }
        if let Some(caps) = BLOCK_REGEX["section"].captures(content) {
            let depth = caps.get(1).map_or(1, |m| m.as_str().len()).clamp(1, 6) as u8;
            return self.section(line, depth);
        }
        if BLOCK_REGEX["synopsis"].is_match(content) {
            return self.synopsis();
        }
        if BLOCK_REGEX["scene_heading_force"].is_match(content) {
            return self.scene(line);
        }
        if BLOCK_REGEX["action_force"].is_match(content) {
            return self.action();
        }
        if BLOCK_REGEX["character_force"].is_match(content) {
            if let Some(cue) = self.parse_cue(&line, true) {
                return self.dialogue(line, cue);
            }
        }
        if BLOCK_REGEX["transition_force"].is_match(content) {
            // `>文本<` 是居中的动作行
            if BLOCK_REGEX["centered"].is_match(content) {
                return self.action();
            }
            return self.transition(line, true);
        }
        if BLOCK_REGEX["lyric"].is_match(content) {
            return self.lyrics();
        }

        // 启发式
        if self.at_boundary && self.next_is_blank() {
            if BLOCK_REGEX["scene_heading"].is_match(content) {
                return self.scene(line);
            }
            let trimmed = content.trim();
            if trimmed.ends_with(':') && is_uppercase_text(trimmed) {
                return self.transition(line, false);
            }
        }
        if self.at_boundary && !self.next_is_blank() {
            if let Some(cue) = self.parse_cue(&line, false) {
                return self.dialogue(line, cue);
            }
        }

        self.action();
    }

    /// 章节、梗概、分页行会打断正在累积的块
    fn interrupts(&self, line: &SourceLine) -> bool {
        let content = self.content(line);
        BLOCK_REGEX["section"].is_match(content)
            || BLOCK_REGEX["synopsis"].is_match(content)
            || BLOCK_REGEX["page_break"].is_match(content)
    }

    fn page_break(&mut self, line: SourceLine) {
        let start = self.start_of(&line);
        self.cursor += 1;
        let end = self.finish_soft(&line);
        self.push(Element::PageBreak { range: Range::new(start, end) });
    }

    fn section(&mut self, line: SourceLine, depth: u8) {
        let start = self.start_of(&line);
        self.cursor += 1;
        let end = self.finish_soft(&line);
        self.push(Element::Section { range: Range::new(start, end), depth });
    }

    fn synopsis(&mut self) {
        let first = self.lines[self.cursor];
        let start = self.start_of(&first);
        let mut lines_of_text = Vec::new();
        let mut last = first;
        while let Some(line) = self.lines.get(self.cursor).copied() {
            let content = self.content(&line);
            if !BLOCK_REGEX["synopsis"].is_match(content) || BLOCK_REGEX["page_break"].is_match(content) {
                break;
            }
            let marker = content.find('=').map_or(0, |i| i + 1);
            let text = Range::new(line.start + marker, line.content_end).trimmed(self.src);
            lines_of_text.push(text);
            last = line;
            self.cursor += 1;
        }
        let end = self.finish_soft(&last);
        self.push(Element::Synopsis { range: Range::new(start, end), lines_of_text });
    }

    fn scene(&mut self, line: SourceLine) {
        let start = self.start_of(&line);
        let number = BLOCK_REGEX["scene_number"]
            .captures(self.content(&line))
            .and_then(|caps| caps.get(1))
            .map(|m| Range::new(line.start + m.start(), line.start + m.end()));
        self.cursor += 1;
        let end = self.finish_hard(line.end);
        self.push(Element::Scene { range: Range::new(start, end), number });
    }

    fn transition(&mut self, line: SourceLine, forced: bool) {
        let start = self.start_of(&line);
        self.cursor += 1;
        let end = self.finish_hard(line.end);
        self.push(Element::Transition { range: Range::new(start, end), forced });
    }

    fn action(&mut self) {
        let first = self.lines[self.cursor];
        let start = self.start_of(&first);
        let mut lines = Vec::new();
        let mut last_end = first.end;

        while let Some(line) = self.lines.get(self.cursor).copied() {
            if !lines.is_empty() {
                if line.is_blank(self.src) && !line.is_line_break(self.src) {
                    break;
                }
                if self.interrupts(&line) {
                    break;
                }
            }
            lines.push(self.action_line(&line));
            last_end = line.end;
            self.cursor += 1;
        }

        let end = self.finish_hard(last_end);
        self.push(Element::Action { range: Range::new(start, end), lines });
    }

    fn action_line(&self, line: &SourceLine) -> Line {
        let content = self.content(line);
        if content.trim().is_empty() {
            return Line::blank(line.range());
        }

        let mut text = line.content_range();
        if let Some(m) = BLOCK_REGEX["action_force"].find(content) {
            text.start += m.end();
        }

        if let Some(inner) = BLOCK_REGEX["centered"].captures(text.slice(self.src)).and_then(|caps| caps.get(1)) {
            let inner = Range::new(text.start + inner.start(), text.start + inner.end()).trimmed(self.src);
            return Line {
                range: line.range(),
                elements: parse_inline(self.src, inner),
                centered: true,
            };
        }

        Line::new(line.range(), parse_inline(self.src, text))
    }

    fn lyrics(&mut self) {
        let first = self.lines[self.cursor];
        let start = self.start_of(&first);
        let mut lines = Vec::new();
        let mut last_end = first.end;

        while let Some(line) = self.lines.get(self.cursor).copied() {
            let content = self.content(&line);
            if !BLOCK_REGEX["lyric"].is_match(content) {
                break;
            }
            let text = Range::new(line.start + 1, line.content_end).trimmed(self.src);
            lines.push(Line::new(line.range(), parse_inline(self.src, text)));
            last_end = line.end;
            self.cursor += 1;
        }

        let end = self.finish_hard(last_end);
        self.push(Element::Lyrics { range: Range::new(start, end), lines });
    }

    /// 拆分角色行：`@`、名字、括号扩展、`^`
    fn parse_cue(&self, line: &SourceLine, forced: bool) -> Option<Cue> {
        parse_cue(self.src, line.content_range(), forced)
    }

    fn dialogue(&mut self, cue_line: SourceLine, cue: Cue) {
        let start = self.start_of(&cue_line);
        self.cursor += 1;

        let mut parenthetical = None;
        let mut lines = Vec::new();
        let mut last_end = cue_line.end;
        let mut first = true;

        while let Some(line) = self.lines.get(self.cursor).copied() {
            if line.is_line_break(self.src) {
                lines.push(Line::blank(line.range()));
            } else if line.is_blank(self.src) || self.interrupts(&line) {
                break;
            } else {
                let text = line.content_range().trimmed(self.src);
                if first && BLOCK_REGEX["parenthetical"].is_match(self.content(&line)) {
                    parenthetical = Some(text);
                } else {
                    lines.push(Line::new(line.range(), parse_inline(self.src, text)));
                }
            }
            first = false;
            last_end = line.end;
            self.cursor += 1;
        }

        let end = self.finish_hard(last_end);
        self.push(Element::Dialogue {
            range: Range::new(start, end),
            character_range: cue.character,
            character_extensions_range: cue.extensions,
            parenthetical,
            lines,
            dual: cue.dual,
        });
    }
}

/// 角色行拆分。启发式角色名必须全大写；扩展部分必须以右括号结尾
pub(crate) fn parse_cue(src: &str, content: Range, forced: bool) -> Option<Cue> {
    let trimmed = content.trimmed(src);
    let mut text = trimmed.slice(src);
    let mut start = trimmed.start;

    let dual = text.ends_with('^');
    if dual {
        text = text[..text.len() - 1].trim_end();
    }

    if forced {
        let rest = text.strip_prefix('@')?;
        let rest_trimmed = rest.trim_start();
        start += 1 + (rest.len() - rest_trimmed.len());
        text = rest_trimmed;
    } else if text.starts_with('@') {
        return None;
    }

    let (name, extensions) = match text.find(&['(', '（'][..]) {
        Some(open) => {
            let extensions = text[open..].trim_end();
            if !(extensions.ends_with(')') || extensions.ends_with('）')) {
                return None;
            }
            (text[..open].trim_end(), Some((open, extensions.len())))
        }
        None => (text, None),
    };

    if name.is_empty() {
        return None;
    }
    if !forced && !(name.starts_with(char::is_uppercase) && is_uppercase_text(name)) {
        return None;
    }

    let character = Range::new(start, start + name.len());
    let extensions = match extensions {
        Some((open, len)) => Range::new(start + open, start + open + len),
        None => Range::empty_at(character.end),
    };
    Some(Cue { character, extensions, dual })
}
