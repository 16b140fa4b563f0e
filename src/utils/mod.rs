pub mod fountain_constants;

pub use fountain_constants::{BLOCK_REGEX, TOKEN_REGEX};

/// 全大写判断：至少一个大写字母，且没有小写字母；非字母字符忽略
pub fn is_uppercase_text(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

/// 章节标题归一化：去掉开头的 `#`，去空白，转小写
pub fn normalize_title(text: &str) -> String {
    text.trim().trim_start_matches('#').trim().to_lowercase()
}

/// 两个以上空格组成的行，块内表示保留的空行
pub fn is_line_break(text: &str) -> bool {
    BLOCK_REGEX["line_break"].is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_is_unicode_aware() {
        assert!(is_uppercase_text("JOSEPHINE."));
        assert!(is_uppercase_text("ÉLODIE"));
        assert!(is_uppercase_text("BOB & ALICE"));
        assert!(!is_uppercase_text("Bob"));
        assert!(!is_uppercase_text("123 ..."));
        assert!(!is_uppercase_text("顾清"));
    }

    #[test]
    fn titles_are_normalized() {
        assert_eq!(normalize_title("  ## Snippets "), "snippets");
        assert_eq!(normalize_title("#BoneYard"), "boneyard");
    }
}
