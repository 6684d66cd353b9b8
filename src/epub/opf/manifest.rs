//! 清单模块
//!
//! 生成OPF中的 `<manifest>`：样式表、NCX、每个章节、每张图片各一项。

use crate::epub::book::Book;
use crate::epub::error::Result;
use crate::epub::layout::{NCX_FILENAME, NCX_ID, STYLESHEET_FILENAME, STYLESHEET_ID};
use crate::epub::xml::Element;

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: String, href: String, media_type: String) -> Self {
        Self {
            id,
            href,
            media_type,
        }
    }

    /// 检查是否为图片文件
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    fn to_element(&self) -> Element {
        Element::new("item")
            .attr("id", self.id.as_str())
            .attr("href", self.href.as_str())
            .attr("media-type", self.media_type.as_str())
    }
}

/// 按固定顺序收集清单项
///
/// 图片格式在媒体类型映射中不存在时返回 `UnsupportedImageFormat`，不会跳过该项。
pub fn manifest_items(book: &Book) -> Result<Vec<ManifestItem>> {
    let media_types = &book.config().media_types;

    let mut items = vec![
        ManifestItem::new(
            STYLESHEET_ID.to_string(),
            STYLESHEET_FILENAME.to_string(),
            media_types.stylesheet.clone(),
        ),
        ManifestItem::new(
            NCX_ID.to_string(),
            NCX_FILENAME.to_string(),
            media_types.navigation.clone(),
        ),
    ];

    for chapter in book.chapters() {
        items.push(ManifestItem::new(
            chapter.index().manifest_id(),
            chapter.index().href(),
            media_types.chapter.clone(),
        ));
    }

    for image in book.images() {
        items.push(ManifestItem::new(
            image.index().manifest_id(),
            image.href(),
            media_types.image(image.format())?.to_string(),
        ));
    }

    Ok(items)
}

/// 生成 `<manifest>` 元素
pub fn manifest_element(items: &[ManifestItem]) -> Element {
    items
        .iter()
        .fold(Element::new("manifest"), |manifest, item| manifest.child(item.to_element()))
}
