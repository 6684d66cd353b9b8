//! 脊柱模块
//!
//! 阅读顺序严格等于章节的追加顺序。

use crate::epub::book::Book;
use crate::epub::layout::NCX_ID;
use crate::epub::xml::Element;

/// 脊柱项信息(阅读顺序)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineItem {
    /// 引用的清单项ID
    pub idref: String,
}

impl SpineItem {
    /// 创建新的脊柱项
    pub fn new(idref: String) -> Self {
        Self { idref }
    }
}

/// 每个章节一项，按索引排列
pub fn spine_items(book: &Book) -> Vec<SpineItem> {
    book.chapters()
        .iter()
        .map(|chapter| SpineItem::new(chapter.index().manifest_id()))
        .collect()
}

/// 生成 `<spine toc="ncx">` 元素
pub fn spine_element(items: &[SpineItem]) -> Element {
    items.iter().fold(
        Element::new("spine").attr("toc", NCX_ID),
        |spine, item| spine.child(Element::new("itemref").attr("idref", item.idref.as_str())),
    )
}
