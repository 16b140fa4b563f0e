use std::collections::HashMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 块级元素正则，只作用于单行内容（不含换行）
    pub static ref BLOCK_REGEX: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        map.insert("scene_heading", Regex::new(r"(?i)^[ \t]*(?:int[.]?/ext|i/e|int|ext|est)[. ]").unwrap());
        map.insert("scene_heading_force", Regex::new(r"^[ \t]*\.[\w\(（\p{L}]").unwrap());
        map.insert("scene_number", Regex::new(r"#[ \t]*([^#\s][^#]*?)[ \t]*#[ \t]*$").unwrap());
        map.insert("section", Regex::new(r"^[ \t]*(#+)").unwrap());
        map.insert("synopsis", Regex::new(r"^[ \t]*=(?:[ \t]|$)").unwrap());
        map.insert("page_break", Regex::new(r"^[ \t]*={3,}[ \t]*$").unwrap());
        map.insert("transition_force", Regex::new(r"^[ \t]*>").unwrap());
        map.insert("centered", Regex::new(r"^[ \t]*>(.*)<[ \t]*$").unwrap());
        map.insert("action_force", Regex::new(r"^[ \t]*!").unwrap());
        map.insert("character_force", Regex::new(r"^[ \t]*@[ \t]*[^\s\(（\^]").unwrap());
        map.insert("lyric", Regex::new(r"^~[ \t]*\S").unwrap());
        map.insert("parenthetical", Regex::new(r"^[ \t]*(\(.*\)|（.*）)[ \t]*$").unwrap());
        map.insert("title_page", Regex::new(r"(?i)^[ \t]*(title|credit|author[s]?|source|notes|draft date|date|watermark|contact(?: info)?|revision|copyright|font|font italic|font bold|font bold italic|metadata|tl|tc|tr|cc|br|bl|header|footer)[ \t]*:(.*)$").unwrap());
        map.insert("title_page_continuation", Regex::new(r"^(?:[ \t]+)\S").unwrap());
        map.insert("line_break", Regex::new(r"^ {2,}$").unwrap());
        map
    };

    // 行内解析正则
    pub static ref TOKEN_REGEX: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        map.insert("note_custom_kind", Regex::new(r"^([A-Za-z]+):").unwrap());
        map.insert("note_margin", Regex::new(r"^@(\w*)").unwrap());
        map
    };
}
