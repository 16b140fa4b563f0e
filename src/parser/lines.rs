use crate::models::Range;
use crate::utils::is_line_break;

/// 源文本中的一行（逻辑行可能跨越多个物理行，见 [`logical_lines`]）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine {
    /// 行首
    pub start: usize,
    /// 内容结束，不含换行符
    pub content_end: usize,
    /// 行尾，包含换行符
    pub end: usize,
}

impl SourceLine {
    pub fn content<'a>(&self, src: &'a str) -> &'a str {
        self.content_range().slice(src)
    }

    pub fn content_range(&self) -> Range {
        Range::new(self.start, self.content_end)
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }

    pub fn has_newline(&self) -> bool {
        self.end > self.content_end
    }

    pub fn is_blank(&self, src: &str) -> bool {
        self.content(src).trim().is_empty()
    }

    /// 块内保留的空行（两个以上空格）
    pub fn is_line_break(&self, src: &str) -> bool {
        is_line_break(self.content(src))
    }
}

/// 按 `\n` / `\r\n` 切分物理行。末尾换行只结束最后一行，不产生新行
pub fn split_lines(src: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let bytes = src.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let (content_end, end) = match src[start..].find('\n') {
            Some(offset) => {
                let nl = start + offset;
                let content_end = if nl > start && bytes[nl - 1] == b'\r' { nl - 1 } else { nl };
                (content_end, nl + 1)
            }
            None => (bytes.len(), bytes.len()),
        };
        lines.push(SourceLine { start, content_end, end });
        start = end;
    }
    lines
}

fn find_at(src: &str, from: usize, to: usize, pattern: &str) -> Option<usize> {
    src.get(from..to)?.find(pattern).map(|offset| from + offset)
}

/// 逻辑行：未在本行闭合、但在后面闭合的 `/*` 会把中间的物理行并成一行
pub fn logical_lines(src: &str) -> Vec<SourceLine> {
    let physical = split_lines(src);
    let mut out = Vec::with_capacity(physical.len());
    // 此位置之后再没有 `*/`
    let mut no_close_from: Option<usize> = None;
    let mut i = 0;

    while i < physical.len() {
        let mut line = physical[i];
        let mut last = i;
        let mut pos = line.start;
        let mut next_boneyard = find_at(src, pos, line.content_end, "/*");
        let mut next_note = find_at(src, pos, line.content_end, "[[");

        loop {
            if next_boneyard.is_some_and(|at| at < pos) {
                next_boneyard = find_at(src, pos, line.content_end, "/*");
            }
            if next_note.is_some_and(|at| at < pos) {
                next_note = find_at(src, pos, line.content_end, "[[");
            }

            match (next_note, next_boneyard) {
                (Some(note), boneyard) if boneyard.map_or(true, |at| note < at) => {
                    // 注解里的 `/*` 不算废稿
                    match find_at(src, note + 2, line.content_end, "]]") {
                        Some(close) => pos = close + 2,
                        // 后面的 `[[` 在本行也闭合不了
                        None => next_note = None,
                    }
                }
                (_, Some(open)) => {
                    let after = open + 2;
                    if no_close_from.is_some_and(|from| after >= from) {
                        break;
                    }
                    let Some(close) = find_at(src, after, src.len(), "*/") else {
                        // 未闭合：延伸到行尾
                        no_close_from = Some(after);
                        break;
                    };
                    let close_end = close + 2;
                    while last + 1 < physical.len() && physical[last].content_end < close_end {
                        last += 1;
                    }
                    line.content_end = physical[last].content_end;
                    line.end = physical[last].end;
                    pos = close_end;
                    next_boneyard = find_at(src, pos, line.content_end, "/*");
                    next_note = find_at(src, pos, line.content_end, "[[");
                }
                _ => break,
            }
        }

        out.push(line);
        i = last + 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents<'a>(src: &'a str, lines: &[SourceLine]) -> Vec<&'a str> {
        lines.iter().map(|l| l.content(src)).collect()
    }

    #[test]
    fn trailing_newline_does_not_open_a_line() {
        let src = "A\r\nB\n\nC";
        let lines = split_lines(src);
        assert_eq!(contents(src, &lines), vec!["A", "B", "", "C"]);
        assert_eq!(lines[0].range(), Range::new(0, 3));
        assert_eq!(lines[3].range(), Range::new(7, 8));
        assert!(!lines[3].has_newline());

        assert_eq!(split_lines("A\n").len(), 1);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn multi_line_boneyard_joins_lines() {
        let src = "a /* one\n\ntwo */ b\nc";
        let lines = logical_lines(src);
        assert_eq!(contents(src, &lines), vec!["a /* one\n\ntwo */ b", "c"]);
    }

    #[test]
    fn unclosed_boneyard_and_notes_stay_on_their_line() {
        let src = "a /* never\nb [[ /* ]] c\nd";
        let lines = logical_lines(src);
        assert_eq!(contents(src, &lines), vec!["a /* never", "b [[ /* ]] c", "d"]);
    }

    #[test]
    fn many_unclosed_openers_stay_single_lines() {
        let src = format!("{}\n{}\nend", "/* ".repeat(20000), "[[".repeat(20000));
        let lines = logical_lines(&src);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].content(&src), "end");
    }
}
