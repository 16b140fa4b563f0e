use crate::models::{KeyValue, Range};
use crate::parser::lines::SourceLine;
use crate::parser::text_processor::parse_inline;
use crate::utils::BLOCK_REGEX;

fn is_key_line(src: &str, line: &SourceLine) -> bool {
    BLOCK_REGEX["title_page"].is_match(line.content(src))
}

/// 解析文档开头的标题页
///
/// 返回键值列表和正文开始的行号。标题页内部的空行只要后面还是 `Key:` 行就不算结束；
/// 结束时吃掉第一个空行
pub fn parse_title_page(src: &str, lines: &[SourceLine]) -> (Vec<KeyValue>, usize) {
    let mut entries: Vec<KeyValue> = Vec::new();
    let Some(first) = lines.first() else {
        return (entries, 0);
    };
    if !is_key_line(src, first) {
        return (entries, 0);
    }

    let mut i = 0;
    while let Some(line) = lines.get(i) {
        let content = line.content(src);

        if let Some(caps) = BLOCK_REGEX["title_page"].captures(content) {
            let key = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let mut values = Vec::new();
            if let Some(value) = caps.get(2) {
                let value = Range::new(line.start + value.start(), line.start + value.end()).trimmed(src);
                if !value.is_empty() {
                    values.push(parse_inline(src, value));
                }
            }
            entries.push(KeyValue { key, values, range: line.range() });
            i += 1;
            continue;
        }

        let Some(current) = entries.last_mut() else { break };

        if BLOCK_REGEX["title_page_continuation"].is_match(content) {
            let value = line.content_range().trimmed(src);
            current.values.push(parse_inline(src, value));
            current.range.end = line.end;
            i += 1;
            continue;
        }

        if line.is_blank(src) {
            let mut next = i;
            while lines.get(next).is_some_and(|l| l.is_blank(src)) {
                next += 1;
            }
            match lines.get(next) {
                Some(following) if is_key_line(src, following) => {
                    current.range.end = following.start;
                    i = next;
                    continue;
                }
                _ => {
                    current.range.end = line.end;
                    i += 1;
                    break;
                }
            }
        }

        break;
    }

    (entries, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::split_lines;

    #[test]
    fn keys_with_continuations() {
        let src = "Title:\n\t_**BRICK & STEEL**_\nDraft date: 1/27/2012\n\nINT. HOUSE\n";
        let lines = split_lines(src);
        let (entries, next) = parse_title_page(src, &lines);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "Title");
        assert_eq!(entries[0].values.len(), 1);
        assert_eq!(entries[1].key, "Draft date");
        assert_eq!(entries[1].range.slice(src), "Draft date: 1/27/2012\n\n");
        assert_eq!(next, 4);
    }

    #[test]
    fn blank_line_between_keys_stays_in_title_page() {
        let src = "Title: A\n\nAuthor: B\n\nAction.";
        let lines = split_lines(src);
        let (entries, next) = parse_title_page(src, &lines);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].range.slice(src), "Title: A\n\n");
        assert_eq!(next, 4);
    }

    #[test]
    fn no_title_page_without_leading_key() {
        let src = "INT. HOUSE - DAY\n\nTitle: nope";
        let (entries, next) = parse_title_page(src, &split_lines(src));
        assert!(entries.is_empty());
        assert_eq!(next, 0);
    }
}
