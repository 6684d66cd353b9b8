//! NCX导航文档生成
//!
//! 每个章节对应一个顶层导航点，按追加顺序排列，playOrder从1开始。

use crate::epub::book::{Book, Chapter};
use crate::epub::error::Result;
use crate::epub::ncx::navigation::{
    DocAuthor, DocTitle, NavContent, NavLabel, NavMap, NavPoint, NcxMetadata,
};
use crate::epub::xml::{Document, Element};

/// NCX命名空间
pub const NCX_NS: &str = "http://www.daisy.org/z3986/2005/ncx/";

/// NCX版本
pub const NCX_VERSION: &str = "2005-1";

/// 导航点的class属性
const CHAPTER_CLASS: &str = "chapter";

/// 章节对应的导航点，标签形如 `0. 标题`
fn chapter_nav_point(chapter: &Chapter) -> NavPoint {
    let index = chapter.index();
    NavPoint::new(
        index.manifest_id(),
        (index.get() + 1) as u32,
        NavLabel::new(format!("{}. {}", index, chapter.title())),
        NavContent::new(index.href()),
    )
    .with_class(CHAPTER_CLASS)
}

/// 构建导航地图
pub fn nav_map(book: &Book) -> NavMap {
    let mut map = NavMap::new();
    for chapter in book.chapters() {
        map.add_nav_point(chapter_nav_point(chapter));
    }
    map
}

/// 生成NCX导航文档
///
/// # 参数
/// * `book` - 书籍模型
///
/// # 返回值
/// * `Result<Document>` - 缺少标题或标识符时返回错误
pub fn ncx_document(book: &Book) -> Result<Document> {
    let map = nav_map(book);
    let metadata = NcxMetadata::new(book.require_identifier()?, map.get_depth().max(1));
    let title = DocTitle::new(book.require_title()?);

    let mut root = Element::new("ncx")
        .namespace(NCX_NS)
        .attr("version", NCX_VERSION)
        .attr("xml:lang", book.language())
        .child(metadata.to_element())
        .child(title.to_element());

    for author in book.authors() {
        root = root.child(DocAuthor::new(author.file_as()).to_element());
    }

    Document::new(root.child(map.to_element()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::error::EpubError;

    fn scenario_book(dir: &std::path::Path) -> Book {
        let mut book = Book::new(dir).unwrap();
        book.set_title("T");
        book.set_identifier("ID1");
        book.append_author("A", "B");
        book.append_chapter("C0", "<p>first</p>").unwrap();
        book.append_chapter("C1", "<p>second</p>").unwrap();
        book
    }

    #[test]
    fn test_ncx_root() {
        let dir = tempfile::tempdir().unwrap();
        let document = ncx_document(&scenario_book(dir.path())).unwrap();
        let root = document.root();

        assert_eq!(root.name(), "ncx");
        assert_eq!(root.namespace_uri(None), Some(NCX_NS));
        assert_eq!(root.attribute("version"), Some("2005-1"));
        assert_eq!(root.attribute("xml:lang"), Some("en"));

        let uid = root
            .find("head")
            .unwrap()
            .find_all("meta")
            .find(|m| m.attribute("name") == Some("dtb:uid"))
            .unwrap();
        assert_eq!(uid.attribute("content"), Some("ID1"));
        assert_eq!(root.find("docTitle").unwrap().text_content(), "T");
        assert_eq!(root.find("docAuthor").unwrap().text_content(), "B, A");
    }

    #[test]
    fn test_nav_points() {
        let dir = tempfile::tempdir().unwrap();
        let document = ncx_document(&scenario_book(dir.path())).unwrap();

        let points: Vec<&Element> = document.root().find("navMap").unwrap().find_all("navPoint").collect();
        assert_eq!(points.len(), 2);

        let summary: Vec<(&str, &str, String, &str)> = points
            .iter()
            .map(|p| {
                (
                    p.attribute("id").unwrap(),
                    p.attribute("playOrder").unwrap(),
                    p.find("navLabel").unwrap().text_content(),
                    p.find("content").unwrap().attribute("src").unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("chapter_0000", "1", "0. C0".to_string(), "chapter/0000.html"),
                ("chapter_0001", "2", "1. C1".to_string(), "chapter/0001.html"),
            ]
        );
        assert!(points.iter().all(|p| p.attribute("class") == Some("chapter")));
    }

    #[test]
    fn test_one_doc_author_per_author() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = scenario_book(dir.path());
        book.append_author("Robert", "Musil");

        let document = ncx_document(&book).unwrap();
        let authors: Vec<String> = document
            .root()
            .find_all("docAuthor")
            .map(Element::text_content)
            .collect();
        assert_eq!(authors, vec!["B, A", "Musil, Robert"]);
    }

    #[test]
    fn test_zero_chapters() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = Book::new(dir.path()).unwrap();
        book.set_title("T");
        book.set_identifier("ID1");

        let document = ncx_document(&book).unwrap();
        assert_eq!(document.root().find("navMap").unwrap().child_elements().count(), 0);
        let depth = document
            .root()
            .find("head")
            .unwrap()
            .find_all("meta")
            .find(|m| m.attribute("name") == Some("dtb:depth"))
            .unwrap();
        assert_eq!(depth.attribute("content"), Some("1"));
    }

    #[test]
    fn test_missing_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = Book::new(dir.path()).unwrap();
        book.set_title("T");
        assert!(matches!(ncx_document(&book), Err(EpubError::MissingIdentifier)));
    }

    #[test]
    fn test_serialized_nav_point() {
        let dir = tempfile::tempdir().unwrap();
        let xml = ncx_document(&scenario_book(dir.path()))
            .unwrap()
            .to_xml_string()
            .unwrap();

        assert!(xml.contains(r#"<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1" xml:lang="en">"#));
        assert!(xml.contains(concat!(
            "    <navPoint class=\"chapter\" id=\"chapter_0001\" playOrder=\"2\">\n",
            "      <navLabel>\n",
            "        <text>1. C1</text>\n",
            "      </navLabel>\n",
            "      <content src=\"chapter/0001.html\"/>\n",
            "    </navPoint>\n",
        )));
    }
}
