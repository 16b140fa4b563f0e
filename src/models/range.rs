use serde::{Deserialize, Serialize};

/// 原文中的半开区间 `[start, end)`，单位为字节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Range { start, end }
    }

    /// 长度为零的区间
    pub fn empty_at(pos: usize) -> Self {
        Range { start: pos, end: pos }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// 覆盖两个区间的最小区间
    pub fn union(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// 截取原文。越界或不在字符边界上时返回空串
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        if self.start > self.end {
            return "";
        }
        text.get(self.start..self.end).unwrap_or("")
    }

    /// 去掉首尾空白后的区间
    pub fn trimmed(&self, text: &str) -> Range {
        let s = self.slice(text);
        let leading = s.len() - s.trim_start().len();
        let trailing = s.len() - s.trim_end().len();
        if leading == s.len() {
            return Range::empty_at(self.start + leading.min(s.len()));
        }
        Range::new(self.start + leading, self.end - trailing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_is_total() {
        let text = "INT. 顾清住处";
        assert_eq!(Range::new(0, 4).slice(text), "INT.");
        assert_eq!(Range::new(0, 6).slice(text), "");
        assert_eq!(Range::new(3, 100).slice(text), "");
        assert_eq!(Range::new(4, 2).slice(text), "");
    }

    #[test]
    fn trimmed_keeps_inner_text() {
        let text = "  BOB  \n";
        let r = Range::new(0, 8).trimmed(text);
        assert_eq!(r.slice(text), "BOB");
        assert!(Range::new(0, 2).trimmed(text).is_empty());
    }

    #[test]
    fn union_and_contains() {
        let a = Range::new(2, 5);
        assert_eq!(a.union(&Range::new(4, 9)), Range::new(2, 9));
        assert!(a.contains(2) && a.contains(4));
        assert!(!a.contains(5));
    }
}
