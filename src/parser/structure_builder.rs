use crate::models::{
    Document, Element, ElementIndex, Snippet, Structure, StructureContent, StructureScene,
    StructureSection,
};
use crate::utils::normalize_title;

/// 刚打开的标题，等待紧随其后的梗概
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    Nothing,
    Scene,
    Section,
}

struct StructureBuilder<'a> {
    elements: &'a [Element],
    max_depth: u8,
    /// (层级, 章节)，栈底是隐式章节
    stack: Vec<(u8, StructureSection)>,
    sections: Vec<StructureSection>,
    scene: Option<StructureScene>,
    awaiting: Awaiting,
}

impl<'a> StructureBuilder<'a> {
    fn new(elements: &'a [Element], max_depth: u8) -> Self {
        StructureBuilder {
            elements,
            max_depth: max_depth.max(1),
            stack: vec![(1, StructureSection::default())],
            sections: Vec::new(),
            scene: None,
            awaiting: Awaiting::Nothing,
        }
    }

    fn current_section(&mut self) -> &mut StructureSection {
        if self.stack.is_empty() {
            self.stack.push((1, StructureSection::default()));
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last].1
    }

    fn close_scene(&mut self) {
        if let Some(scene) = self.scene.take() {
            if !scene.is_empty() {
                self.current_section().content.push(StructureContent::Scene(scene));
            }
        }
    }

    fn close_section(&mut self) {
        let Some((_, section)) = self.stack.pop() else { return };
        if section.is_empty() {
            return;
        }
        match self.stack.last_mut() {
            Some((_, parent)) => parent.content.push(StructureContent::Section(section)),
            None => self.sections.push(section),
        }
    }

    fn add(&mut self, index: ElementIndex) {
        let elements = self.elements;
        let Some(element) = elements.get(index) else { return };

        // 空行不算内容
        if element.is_blank_action() {
            return;
        }

        match element {
            Element::Section { depth, .. } if *depth <= self.max_depth => {
                self.close_scene();
                while self.stack.last().is_some_and(|(d, _)| *d >= *depth) {
                    self.close_section();
                }
                self.stack.push((
                    *depth,
                    StructureSection { section: Some(index), ..StructureSection::default() },
                ));
                self.awaiting = Awaiting::Section;
            }
            Element::Scene { .. } => {
                self.close_scene();
                self.scene = Some(StructureScene { scene: Some(index), ..StructureScene::default() });
                self.awaiting = Awaiting::Scene;
            }
            Element::Synopsis { .. } if self.awaiting == Awaiting::Scene => {
                if let Some(scene) = self.scene.as_mut() {
                    scene.synopsis = Some(index);
                }
                self.awaiting = Awaiting::Nothing;
            }
            Element::Synopsis { .. } if self.awaiting == Awaiting::Section => {
                self.current_section().synopsis = Some(index);
                self.awaiting = Awaiting::Nothing;
            }
            _ => {
                self.awaiting = Awaiting::Nothing;
                self.scene
                    .get_or_insert_with(StructureScene::default)
                    .content
                    .push(index);
            }
        }
    }

    fn finish(mut self) -> Vec<StructureSection> {
        self.close_scene();
        while !self.stack.is_empty() {
            self.close_section();
        }
        self.sections
    }
}

fn is_titled_section(doc: &Document, element: &Element, title: &str) -> bool {
    match element {
        Element::Section { range, .. } => normalize_title(doc.slice_raw(*range)) == title.to_lowercase(),
        _ => false,
    }
}

/// 按分页符切片段，空片段丢弃
fn build_snippets(elements: &[Element], from: usize) -> Vec<Snippet> {
    let mut snippets = Vec::new();
    let mut current = Snippet::default();

    for (index, element) in elements.iter().enumerate().skip(from) {
        match element {
            Element::PageBreak { .. } => {
                current.page_break = Some(index);
                let done = std::mem::take(&mut current);
                if !done.content.is_empty() {
                    snippets.push(done);
                }
            }
            _ if element.is_blank_action() => {}
            _ => current.content.push(index),
        }
    }
    if !current.content.is_empty() {
        snippets.push(current);
    }
    snippets
}

/// 把扁平元素序列重组成 章节→场景→内容 的视图
///
/// 一级 "Snippets" 章节及其后的内容不进入主结构，改为按分页符切成片段
pub fn build_structure(doc: &Document) -> Structure {
    let elements = doc.elements();
    let conf = doc.conf();

    let snippets_at = elements.iter().position(|element| {
        matches!(element, Element::Section { depth: 1, .. })
            && is_titled_section(doc, element, &conf.snippets_title)
    });
    let main_end = snippets_at.unwrap_or(elements.len());

    let mut builder = StructureBuilder::new(elements, conf.structure_depth);
    for index in 0..main_end {
        builder.add(index);
    }

    Structure {
        sections: builder.finish(),
        snippets: snippets_at.map_or_else(Vec::new, |at| build_snippets(elements, at + 1)),
    }
}
