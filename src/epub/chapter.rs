//! 章节文档生成
//!
//! 将外部传入的内容片段包装为独立的XHTML文档。

use crate::epub::book::{Book, Chapter};
use crate::epub::error::Result;
use crate::epub::layout::{self, STYLESHEET_FILENAME};
use crate::epub::xml::{Document, Element};

/// XHTML命名空间
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// 生成章节的XHTML文档
///
/// `<title>` 使用书名；追加章节时尚未设置书名则使用章节标题。
/// 样式表链接相对于章节文件所在目录计算。文档不缩进，正文片段逐字节保留。
pub fn chapter_document(book: &Book, chapter: &Chapter) -> Result<Document> {
    let title = book.title().unwrap_or(chapter.title());
    let stylesheet_href = layout::relative_href(&chapter.index().href(), STYLESHEET_FILENAME);

    let head = Element::new("head")
        .child(
            Element::new("meta")
                .attr("http-equiv", "Content-Type")
                .attr("content", "application/xhtml+xml; charset=utf-8"),
        )
        .child(Element::with_text("title", title))
        .child(
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("type", "text/css")
                .attr("href", stylesheet_href),
        );

    let body = Element::new("body").nodes(chapter.content().iter().cloned());

    let html = Element::new("html")
        .namespace(XHTML_NS)
        .attr("xml:lang", book.language())
        .child(head)
        .child(body);

    Ok(Document::new(html)?.without_indent())
}
