//! 导览模块
//!
//! guide中的地标由配置决定：固定地标指向配置的章节索引（默认全部为第0章），
//! 设置封面时追加封面地标，最后追加指向最后一章的地标。
//! 目标章节不存在的地标被省略，因此没有章节时只可能保留封面地标。

use crate::epub::book::Book;
use crate::epub::layout::ChapterIndex;
use crate::epub::xml::Element;
use log::debug;

/// guide中的reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideReference {
    /// type属性
    pub kind: String,
    /// title属性
    pub title: String,
    /// 目标文件(相对于OPF文件)
    pub href: String,
}

/// 按固定顺序收集guide中的reference
pub fn guide_references(book: &Book) -> Vec<GuideReference> {
    let config = book.config();
    let mut references = Vec::new();

    for landmark in &config.landmarks {
        if !book.has_chapter(landmark.chapter) {
            debug!("地标 {} 指向不存在的章节 {}，已省略", landmark.kind, landmark.chapter);
            continue;
        }
        references.push(GuideReference {
            kind: landmark.kind.clone(),
            title: landmark.title.clone(),
            href: ChapterIndex::new(landmark.chapter).href(),
        });
    }

    if let Some(cover) = book.cover_image() {
        references.push(GuideReference {
            kind: config.cover_landmark.kind.clone(),
            title: config.cover_landmark.title.clone(),
            href: cover.href(),
        });
    }

    if let Some(label) = &config.last_chapter_landmark {
        match book.last_chapter() {
            Some(last) => references.push(GuideReference {
                kind: label.kind.clone(),
                title: label.title.clone(),
                href: last.href(),
            }),
            None => debug!("没有章节，省略地标 {}", label.kind),
        }
    }

    references
}

/// 生成 `<guide>` 元素
pub fn guide_element(references: &[GuideReference]) -> Element {
    references.iter().fold(Element::new("guide"), |guide, reference| {
        guide.child(
            Element::new("reference")
                .attr("type", reference.kind.as_str())
                .attr("title", reference.title.as_str())
                .attr("href", reference.href.as_str()),
        )
    })
}
