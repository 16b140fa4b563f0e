use serde::{Deserialize, Serialize};

/// 解析配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// 是否识别开头的标题页
    pub title_page: bool,
    /// 是否合并相邻的 Action
    pub merge_actions: bool,
    /// 参与结构层级的最深章节，更深的章节当作普通内容
    pub structure_depth: u8,
    /// 片段章节标题（比较时忽略大小写）
    pub snippets_title: String,
    /// 废稿章节标题（比较时忽略大小写）
    pub boneyard_title: String,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            title_page: true,
            merge_actions: true,
            structure_depth: 3,
            snippets_title: "snippets".to_string(),
            boneyard_title: "boneyard".to_string(),
        }
    }
}

/// 隐藏元素设置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiddenElements {
    pub hide_notes: bool,
    pub hide_synopsis: bool,
    /// 在 "Boneyard" 章节处截断全文，同时去掉行内 `/* */`
    pub hide_boneyard: bool,
}

impl HiddenElements {
    pub fn is_noop(&self) -> bool {
        !self.hide_notes && !self.hide_synopsis && !self.hide_boneyard
    }
}
