use serde::Serialize;

/// 元素在 `Document::elements()` 中的下标
pub type ElementIndex = usize;

/// 场景视图，只引用元素下标，不复制文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureScene {
    /// 第一个场景之前的内容没有场景标题
    pub scene: Option<ElementIndex>,
    pub synopsis: Option<ElementIndex>,
    pub content: Vec<ElementIndex>,
}

impl StructureScene {
    pub fn is_empty(&self) -> bool {
        self.scene.is_none() && self.synopsis.is_none() && self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructureContent {
    Section(StructureSection),
    Scene(StructureScene),
}

/// 章节视图
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureSection {
    /// 第一个章节之前的内容属于没有标题的隐式章节
    pub section: Option<ElementIndex>,
    pub synopsis: Option<ElementIndex>,
    pub content: Vec<StructureContent>,
}

impl StructureSection {
    pub fn is_empty(&self) -> bool {
        self.section.is_none() && self.synopsis.is_none() && self.content.is_empty()
    }

    /// 递归收集所有场景，文档顺序
    pub fn scenes(&self) -> Vec<&StructureScene> {
        let mut out = Vec::new();
        collect_scenes(self, &mut out);
        out
    }
}

fn collect_scenes<'a>(section: &'a StructureSection, out: &mut Vec<&'a StructureScene>) {
    for item in &section.content {
        match item {
            StructureContent::Section(child) => collect_scenes(child, out),
            StructureContent::Scene(scene) => out.push(scene),
        }
    }
}

/// 末尾 "Snippets" 章节中以分页符切开的片段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub content: Vec<ElementIndex>,
    /// 结束这个片段的分页符
    pub page_break: Option<ElementIndex>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Structure {
    pub sections: Vec<StructureSection>,
    pub snippets: Vec<Snippet>,
}

impl Structure {
    /// 带场景标题的场景数
    pub fn scene_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.scenes())
            .filter(|s| s.scene.is_some())
            .count()
    }
}
