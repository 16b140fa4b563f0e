use fountain_core::{
    extract_margin_marker, extract_notes, extract_transition_text, parse, plain_text_of,
    scene_heading_text, section_title, Conf, Document, Element, HiddenElements, Inline, NoteKind, Range,
    Snippet, StructureContent, StructureScene, StructureSection,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;

fn parse_default(script: &str) -> Document {
    parse(script, &Conf::default()).expect("解析失败")
}

#[test]
fn brick_and_steel_structure() {
    let script = fs::read_to_string("tests/test_data/brick_and_steel.fountain").expect("无法读取测试文件");
    let doc = parse_default(&script);
    let structure = doc.structure();
    assert_eq!(structure.sections.len(), 1);
    assert_eq!(structure.scene_count(), 11);
    assert!(structure.snippets.is_empty());

    let headings: Vec<String> = structure.sections[0]
        .scenes()
        .iter()
        .filter_map(|scene| scene.scene)
        .filter_map(|i| doc.element(i))
        .map(|el| scene_heading_text(el, &doc))
        .collect();
    assert_eq!(headings[0], "EXT. BRICK'S PATIO - DAY");
    assert_eq!(headings[7], "SNIPER SCOPE POV");
    assert_eq!(headings[10], "EXT. BRICK'S PATIO - DAY");
}

#[test]
fn synopses_are_hoisted_into_headers() {
    let script = "# Act One\n= The beginning\n\nINT. HOUSE - DAY\n\n= Intro scene\n\nBob enters.\n";
    let doc = parse_default(script);
    let kinds: Vec<&str> = doc.elements().iter().map(Element::kind_name).collect();
    assert_eq!(kinds, vec!["section", "synopsis", "action", "scene", "synopsis", "action"]);

    let structure = doc.structure();
    assert_eq!(
        structure.sections,
        vec![StructureSection {
            section: Some(0),
            synopsis: Some(1),
            content: vec![StructureContent::Scene(StructureScene {
                scene: Some(3),
                synopsis: Some(4),
                content: vec![5],
            })],
        }]
    );
    assert_eq!(section_title(&doc.elements()[0], &doc), "Act One");
}

#[test]
fn nested_sections_follow_depth() {
    let script = "# One\n\n## Two\n\nINT. A - DAY\n\nX.\n\n# Three\n\nY.\n";
    let doc = parse_default(script);
    let structure = doc.structure();
    assert_eq!(structure.sections.len(), 2);

    let one = &structure.sections[0];
    assert_eq!(one.content.len(), 1);
    let StructureContent::Section(two) = &one.content[0] else {
        panic!("expected nested section");
    };
    assert_eq!(two.scenes().len(), 1);

    // 第三节没有场景标题，内容落在无标题场景里
    let three = &structure.sections[1];
    assert_eq!(three.scenes().len(), 1);
    assert_eq!(three.scenes()[0].scene, None);
    assert_eq!(structure.scene_count(), 1);
}

#[test]
fn sections_deeper_than_the_limit_are_content() {
    let conf = Conf { structure_depth: 1, ..Conf::default() };
    let doc = parse("# One\n\n## Two\n\nX.\n", &conf).unwrap();
    let structure = doc.structure();
    assert_eq!(structure.sections.len(), 1);
    let scenes = structure.sections[0].scenes();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].content.len(), 2);
}

#[test]
fn snippets_split_at_page_breaks() {
    let script = "INT. A - DAY\n\nHi.\n\n# Snippets\n\nFirst bit.\n\n===\n\nSecond bit.\n";
    let doc = parse_default(script);
    let kinds: Vec<&str> = doc.elements().iter().map(Element::kind_name).collect();
    assert_eq!(kinds, vec!["scene", "action", "section", "action", "page_break", "action"]);

    let structure = doc.structure();
    assert_eq!(structure.sections.len(), 1);
    assert_eq!(structure.scene_count(), 1);
    assert_eq!(
        structure.snippets,
        vec![
            Snippet { content: vec![3], page_break: Some(4) },
            Snippet { content: vec![5], page_break: None },
        ]
    );
}

#[test]
fn hidden_notes_drop_note_only_lines() {
    let script = "This is visible text.\n[[This line only has a note]]\nAnother visible line.";
    let doc = parse_default(script);
    let settings = HiddenElements { hide_notes: true, ..HiddenElements::default() };
    let filtered = doc.with_hidden_elements_removed(&settings);

    assert_eq!(filtered.elements().len(), 1);
    let lines = filtered.elements()[0].lines().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(plain_text_of(&lines[1], &filtered), "Another visible line.");

    // 原文档不受影响
    assert_eq!(doc.elements()[0].lines().unwrap().len(), 3);
    assert_eq!(filtered.source(), doc.source());
}

#[test]
fn hidden_notes_keep_source_blank_lines() {
    let script = "Visible.\n\n\n[[note]]\nMore.";
    let doc = parse_default(script);
    assert_eq!(doc.elements().len(), 1);
    let before: Vec<Range> = doc.elements()[0].lines().unwrap().iter().map(|l| l.range).collect();
    assert_eq!(
        before,
        vec![
            Range::new(0, 9),
            Range::new(9, 10),
            Range::new(10, 11),
            Range::new(11, 20),
            Range::new(20, 25),
        ]
    );

    let settings = HiddenElements { hide_notes: true, ..HiddenElements::default() };
    let filtered = doc.with_hidden_elements_removed(&settings);
    let lines = filtered.elements()[0].lines().unwrap();
    let after: Vec<Range> = lines.iter().map(|l| l.range).collect();
    assert_eq!(
        after,
        vec![Range::new(0, 9), Range::new(9, 10), Range::new(10, 11), Range::new(20, 25)]
    );
    assert!(lines[1].is_blank() && lines[2].is_blank());
    assert_eq!(plain_text_of(&lines[3], &filtered), "More.");
}

#[test]
fn hidden_boneyard_truncates_and_strips_inline() {
    let script = "Hello /* secret */ world.\n\n# Boneyard\n\nDropped.\n";
    let doc = parse_default(script);
    let settings = HiddenElements { hide_boneyard: true, ..HiddenElements::default() };
    let filtered = doc.with_hidden_elements_removed(&settings);

    assert_eq!(filtered.elements().len(), 1);
    let lines = filtered.elements()[0].lines().unwrap();
    assert!(lines[0].elements.iter().all(|node| !matches!(node, Inline::Boneyard { .. })));
    assert_eq!(plain_text_of(&lines[0], &filtered), "Hello  world.");
}

#[test]
fn hidden_synopsis_and_empty_result() {
    let doc = parse_default("= Just a synopsis");
    let settings = HiddenElements { hide_synopsis: true, ..HiddenElements::default() };
    let filtered = doc.with_hidden_elements_removed(&settings);
    assert!(filtered.elements().is_empty());
    assert!(filtered.structure().sections.is_empty());

    let doc = parse_default("[[only a note]]");
    let settings = HiddenElements { hide_notes: true, ..HiddenElements::default() };
    assert!(doc.with_hidden_elements_removed(&settings).elements().is_empty());
}

#[rstest]
#[case::plain("[[A simple note]]", NoteKind::Plain, "")]
#[case::addition("[[+PLUS]]", NoteKind::Addition, "+")]
#[case::removal("[[-Minus]]", NoteKind::Removal, "-")]
#[case::todo("[[Todo:A]]", NoteKind::Todo, "todo")]
#[case::margin("[[@effect]]", NoteKind::Margin("effect".into()), "@effect")]
#[case::empty_margin("[[@]]", NoteKind::Margin(String::new()), "@")]
#[case::custom("[[Idea: more cats]]", NoteKind::Custom("Idea".into()), "Idea")]
fn note_kinds(#[case] script: &str, #[case] expected: NoteKind, #[case] display: &str) {
    let doc = parse_default(script);
    let notes = extract_notes(doc.elements());
    assert_eq!(notes.len(), 1);
    match notes[0] {
        Inline::Note { kind, .. } => {
            assert_eq!(kind, &expected);
            assert_eq!(kind.to_string(), display);
        }
        other => panic!("expected note, got {other:?}"),
    }
}

#[test]
fn margin_markers() {
    let doc = parse_default("[[@effect]] [[@]] [[plain]]");
    let notes = extract_notes(doc.elements());
    let markers: Vec<Option<&str>> = notes.iter().map(|note| extract_margin_marker(note)).collect();
    assert_eq!(markers, vec![Some("effect"), Some(""), None]);
}

#[test]
fn notes_are_found_inside_emphasis_and_dialogue() {
    let doc = parse_default("BOB\nI *really [[+yes]]* mean it. [[todo: fix]]\n");
    let notes = extract_notes(doc.elements());
    assert_eq!(notes.len(), 2);
    let Inline::Note { text_range, .. } = notes[1] else {
        panic!("expected note");
    };
    assert_eq!(doc.slice_raw(*text_range), "fix");
}

#[rstest]
#[case::forced("> BURN TO WHITE.", "BURN TO WHITE.")]
#[case::forced_no_space(">FADE OUT.", "FADE OUT.")]
#[case::plain("\nCUT TO:\n\n", "CUT TO:")]
fn transition_text(#[case] script: &str, #[case] expected: &str) {
    let doc = parse_default(script);
    let transition = doc
        .elements()
        .iter()
        .find(|el| matches!(el, Element::Transition { .. }))
        .expect("transition");
    assert_eq!(extract_transition_text(transition, &doc), expected);
}

#[test]
fn characters_split_on_ampersand() {
    let doc = parse_default("BRICK & STEEL\nWe got bored.\n");
    assert_eq!(doc.characters_of(&doc.elements()[0]), vec!["BRICK", "STEEL"]);
    assert_eq!(
        doc.all_characters().iter().cloned().collect::<Vec<_>>(),
        vec!["BRICK".to_string(), "STEEL".to_string()]
    );
}

#[test]
fn lyrics_keep_lines_and_drop_indentation() {
    let doc = parse_default("~Willy Wonka! Willy Wonka!\n~  The amazing chocolatier\n");
    let Some(Element::Lyrics { lines, .. }) = doc.elements().first() else {
        panic!("expected lyrics");
    };
    assert_eq!(lines.len(), 2);
    assert_eq!(plain_text_of(&lines[1], &doc), "The amazing chocolatier");
}
