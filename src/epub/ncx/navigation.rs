//! NCX导航元素数据结构定义
//!
//! 定义NCX文件中的各种导航元素，包括元数据、文档标题、作者、导航点、导航标签、内容引用等，
//! 每个元素负责生成自身的XML节点。

use crate::epub::xml::Element;

/// NCX元数据信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NcxMetadata {
    /// 唯一标识符（dtb:uid）
    pub uid: String,
    /// 导航深度（dtb:depth）
    pub depth: u32,
    /// 总页数（dtb:totalPageCount）
    pub total_page_count: u32,
    /// 最大页码（dtb:maxPageNumber）
    pub max_page_number: u32,
}

impl NcxMetadata {
    /// 创建新的NCX元数据，不含页码信息
    pub fn new(uid: impl Into<String>, depth: u32) -> Self {
        Self {
            uid: uid.into(),
            depth,
            total_page_count: 0,
            max_page_number: 0,
        }
    }

    /// 生成 `<head>` 元素
    pub fn to_element(&self) -> Element {
        let entries = [
            ("dtb:uid", self.uid.clone()),
            ("dtb:depth", self.depth.to_string()),
            ("dtb:totalPageCount", self.total_page_count.to_string()),
            ("dtb:maxPageNumber", self.max_page_number.to_string()),
        ];

        entries.into_iter().fold(Element::new("head"), |head, (name, content)| {
            head.child(Element::new("meta").attr("name", name).attr("content", content))
        })
    }
}

/// 文档标题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTitle {
    /// 标题文本
    pub text: String,
}

impl DocTitle {
    /// 创建新的文档标题
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn to_element(&self) -> Element {
        Element::new("docTitle").child(Element::with_text("text", self.text.as_str()))
    }
}

/// 文档作者，文本形如 `姓, 名`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocAuthor {
    pub text: String,
}

impl DocAuthor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn to_element(&self) -> Element {
        Element::new("docAuthor").child(Element::with_text("text", self.text.as_str()))
    }
}

/// 导航标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLabel {
    /// 标签文本
    pub text: String,
}

impl NavLabel {
    /// 创建新的导航标签
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn to_element(&self) -> Element {
        Element::new("navLabel").child(Element::with_text("text", self.text.as_str()))
    }
}

/// 导航内容引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavContent {
    /// 源文件路径
    pub src: String,
}

impl NavContent {
    /// 创建新的导航内容引用
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    pub fn to_element(&self) -> Element {
        Element::new("content").attr("src", self.src.as_str())
    }
}

/// 导航点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    /// 唯一标识符
    pub id: String,
    /// 播放顺序，从1开始
    pub play_order: u32,
    /// CSS类名（可选）
    pub class: Option<String>,
    /// 导航标签
    pub nav_label: NavLabel,
    /// 内容引用
    pub content: NavContent,
}

impl NavPoint {
    /// 创建新的导航点
    pub fn new(id: String, play_order: u32, nav_label: NavLabel, content: NavContent) -> Self {
        Self {
            id,
            play_order,
            class: None,
            nav_label,
            content,
        }
    }

    /// 设置CSS类名
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// 生成 `<navPoint>` 元素
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("navPoint");
        if let Some(class) = &self.class {
            element = element.attr("class", class.as_str());
        }
        element
            .attr("id", self.id.as_str())
            .attr("playOrder", self.play_order.to_string())
            .child(self.nav_label.to_element())
            .child(self.content.to_element())
    }
}

/// 导航地图，每个章节一个顶层导航点
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavMap {
    /// 导航点列表
    pub nav_points: Vec<NavPoint>,
}

impl NavMap {
    /// 创建新的导航地图
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加导航点
    pub fn add_nav_point(&mut self, nav_point: NavPoint) {
        self.nav_points.push(nav_point);
    }

    /// 获取导航深度，空地图为0
    pub fn get_depth(&self) -> u32 {
        u32::from(!self.nav_points.is_empty())
    }

    pub fn to_element(&self) -> Element {
        self.nav_points
            .iter()
            .fold(Element::new("navMap"), |parent, point| parent.child(point.to_element()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(order: u32) -> NavPoint {
        NavPoint::new(
            format!("p{}", order),
            order,
            NavLabel::new(format!("label {}", order)),
            NavContent::new(format!("chapter/{:04}.html", order)),
        )
    }

    #[test]
    fn test_metadata_head() {
        let head = NcxMetadata::new("4223xxx", 1).to_element();
        let metas: Vec<(&str, &str)> = head
            .find_all("meta")
            .map(|m| (m.attribute("name").unwrap(), m.attribute("content").unwrap()))
            .collect();
        assert_eq!(
            metas,
            vec![
                ("dtb:uid", "4223xxx"),
                ("dtb:depth", "1"),
                ("dtb:totalPageCount", "0"),
                ("dtb:maxPageNumber", "0"),
            ]
        );
    }

    #[test]
    fn test_nav_point_element() {
        let element = point(1).with_class("chapter").to_element();
        assert_eq!(element.attribute("class"), Some("chapter"));
        assert_eq!(element.attribute("id"), Some("p1"));
        assert_eq!(element.attribute("playOrder"), Some("1"));
        assert_eq!(
            element.find("navLabel").unwrap().find("text").unwrap().text_content(),
            "label 1"
        );
        assert_eq!(
            element.find("content").unwrap().attribute("src"),
            Some("chapter/0001.html")
        );
    }

    #[test]
    fn test_depth() {
        let mut map = NavMap::new();
        assert_eq!(map.get_depth(), 0);

        map.add_nav_point(point(1));
        map.add_nav_point(point(2));
        assert_eq!(map.get_depth(), 1);
        assert_eq!(map.to_element().child_elements().count(), 2);
    }
}
