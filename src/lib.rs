pub mod models;
pub mod utils;
pub mod parser;
pub mod api;

pub use models::{
    Conf,
    Document,
    Element,
    ElementIndex,
    HiddenElements,
    Inline,
    KeyValue,
    Line,
    NoteKind,
    Range,
    Snippet,
    StyleKind,
    Structure,
    StructureContent,
    StructureScene,
    StructureSection,
};

pub use parser::{
    FountainParser,
    ParseError,
    ParseResult,
};

pub use api::{
    characters_of,
    extract_margin_marker,
    extract_notes,
    extract_transition_text,
    plain_text_of,
    scene_heading_text,
    section_title,
    split_character_names,
};

/// 解析Fountain格式文本
///
/// # Arguments
///
/// * `script` - Fountain格式的剧本文本
/// * `config` - 配置对象
///
/// # Returns
///
/// 不可变的文档；只有内部不变量被破坏时返回 `ParseError`
pub fn parse(script: &str, config: &Conf) -> Result<Document, ParseError> {
    FountainParser::with_conf(config.clone()).parse(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let config = Conf::default();
        let doc = parse("INT. ROOM - DAY\n\nHello, world!", &config).unwrap();
        assert_eq!(doc.elements().len(), 2);
        assert_eq!(doc.reconstruct(), "INT. ROOM - DAY\n\nHello, world!");
    }
}
