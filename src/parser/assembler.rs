use tracing::{debug, error};
use crate::models::{Element, KeyValue, Line, Range};
use crate::parser::error::{ParseError, ParseResult};

/// 合并相邻的 Action
///
/// 按行分类时，被多余空行隔开的段落会变成多个 Action。合并后的区间为
/// `[first.start, last.end)`，中间的空行补成空 `Line`，保证能还原原文。重复执行结果不变
pub fn merge_actions(src: &str, elements: Vec<Element>) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::with_capacity(elements.len());
    let mut merged = 0usize;

    for element in elements {
        let both_actions = matches!(element, Element::Action { .. })
            && matches!(out.last(), Some(Element::Action { .. }));
        if both_actions {
            if let (
                Some(Element::Action { range, lines }),
                Element::Action { range: next_range, lines: next_lines },
            ) = (out.last_mut(), element)
            {
                let gap_start = lines.last().map_or(range.start, |l| l.range.end);
                let gap_end = next_lines.first().map_or(next_range.start, |l| l.range.start);
                lines.extend(blank_lines_between(src, gap_start, gap_end));
                lines.extend(next_lines);
                *range = range.union(&next_range);
                merged += 1;
            }
            continue;
        }
        out.push(element);
    }

    if merged > 0 {
        debug!(merged, "merged adjacent action blocks");
    }
    out
}

/// 把 `[start, end)` 中的每个物理行补成空行
fn blank_lines_between(src: &str, start: usize, end: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut pos = start;
    while pos < end {
        let line_end = Range::new(pos, end)
            .slice(src)
            .find('\n')
            .map_or(end, |i| pos + i + 1);
        lines.push(Line::blank(Range::new(pos, line_end)));
        pos = line_end;
    }
    lines
}

fn check_range(src: &str, range: Range) -> ParseResult<()> {
    if range.start > range.end {
        return Err(ParseError::InvalidRange { start: range.start, end: range.end });
    }
    if range.end > src.len() {
        return Err(ParseError::OutOfBounds { start: range.start, end: range.end, len: src.len() });
    }
    if !src.is_char_boundary(range.start) || !src.is_char_boundary(range.end) {
        return Err(ParseError::NotCharBoundary { start: range.start, end: range.end });
    }
    Ok(())
}

fn check_coverage(src: &str, title_page: &[KeyValue], elements: &[Element]) -> ParseResult<()> {
    let mut pos = 0;
    let ranges = title_page
        .iter()
        .map(|kv| kv.range)
        .chain(elements.iter().map(Element::range));

    for range in ranges {
        check_range(src, range)?;
        if range.start > pos {
            return Err(ParseError::CoverageGap(pos));
        }
        if range.start < pos {
            return Err(ParseError::Overlap(range.start));
        }
        pos = range.end;
    }
    if pos != src.len() {
        return Err(ParseError::CoverageGap(pos));
    }

    for element in elements {
        let outer = element.range();
        for line in element.lines().unwrap_or(&[]) {
            check_range(src, line.range)?;
            if line.range.start < outer.start || line.range.end > outer.end {
                return Err(ParseError::Escapes { inner: line.range, outer });
            }
        }
    }
    Ok(())
}

/// 检查标题页和元素是否按顺序无缝覆盖全文
pub fn validate(src: &str, title_page: &[KeyValue], elements: &[Element]) -> ParseResult<()> {
    check_coverage(src, title_page, elements).map_err(|err| {
        error!(%err, "fountain document failed invariant check");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(start: usize, end: usize, lines: Vec<Line>) -> Element {
        Element::Action { range: Range::new(start, end), lines }
    }

    #[test]
    fn merge_fills_the_gap_with_blank_lines() {
        let src = "Foo\n\n\nBar";
        let elements = vec![
            action(0, 5, vec![Line::blank(Range::new(0, 4))]),
            action(5, 6, vec![Line::blank(Range::new(5, 6))]),
            action(6, 9, vec![Line::blank(Range::new(6, 9))]),
        ];
        let merged = merge_actions(src, elements);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].range(), Range::new(0, 9));
        let ranges: Vec<Range> = merged[0].lines().unwrap_or(&[]).iter().map(|l| l.range).collect();
        assert_eq!(
            ranges,
            vec![Range::new(0, 4), Range::new(4, 5), Range::new(5, 6), Range::new(6, 9)]
        );

        assert_eq!(merge_actions(src, merged.clone()), merged);
    }

    #[test]
    fn validate_reports_gaps_and_overlaps() {
        let src = "abcdef";
        assert_eq!(
            validate(src, &[], &[action(0, 2, vec![]), action(3, 6, vec![])]),
            Err(ParseError::CoverageGap(2))
        );
        assert_eq!(
            validate(src, &[], &[action(0, 4, vec![]), action(3, 6, vec![])]),
            Err(ParseError::Overlap(3))
        );
        assert_eq!(validate(src, &[], &[action(0, 6, vec![])]), Ok(()));
        assert!(matches!(
            validate(src, &[], &[action(0, 7, vec![])]),
            Err(ParseError::OutOfBounds { .. })
        ));
    }
}
