//! 元数据模块
//!
//! 生成OPF中的 `<metadata>` 部分：标题、语言、标识符和创建者。

use crate::epub::book::{Author, Book};
use crate::epub::error::Result;
use crate::epub::xml::Element;

/// Dublin Core命名空间
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// dc:identifier的id，同时是package的unique-identifier
pub const UNIQUE_IDENTIFIER_ID: &str = "BookId";

/// 创建者信息(作者、编辑者等)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    /// 显示名 "First Last"
    pub name: String,
    /// 排序键 "Last, First"
    pub file_as: String,
    /// MARC relator代码
    pub role: String,
}

impl From<&Author> for Creator {
    fn from(author: &Author) -> Self {
        Self {
            name: author.display_name(),
            file_as: author.file_as(),
            role: author.role.code().to_string(),
        }
    }
}

impl Creator {
    fn to_element(&self) -> Element {
        Element::new("dc:creator")
            .attr("opf:file-as", self.file_as.as_str())
            .attr("opf:role", self.role.as_str())
            .text(self.name.as_str())
    }
}

/// 标识符信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// 标识符值
    pub value: String,
    /// 标识符类型(如ISBN、UUID等)
    pub scheme: String,
    /// 元素ID
    pub id: String,
}

impl Identifier {
    fn to_element(&self) -> Element {
        Element::new("dc:identifier")
            .attr("id", self.id.as_str())
            .attr("opf:scheme", self.scheme.as_str())
            .text(self.value.as_str())
    }
}

/// 生成 `<metadata>` 元素
///
/// 元素上声明 `dc` 与 `opf` 前缀。设置了封面图片时追加 `<meta name="cover">`。
pub fn metadata_element(book: &Book, opf_ns: &str) -> Result<Element> {
    let identifier = Identifier {
        value: book.require_identifier()?.to_string(),
        scheme: book.config().identifier_scheme.clone(),
        id: UNIQUE_IDENTIFIER_ID.to_string(),
    };

    let mut metadata = Element::new("metadata")
        .prefixed_namespace("dc", DC_NS)
        .prefixed_namespace("opf", opf_ns)
        .child(Element::with_text("dc:title", book.require_title()?))
        .child(Element::with_text("dc:language", book.language()))
        .child(identifier.to_element());

    for author in book.authors() {
        metadata.push(Creator::from(author).to_element());
    }

    if let Some(cover) = book.cover_image() {
        metadata.push(
            Element::new("meta")
                .attr("name", "cover")
                .attr("content", cover.index().manifest_id()),
        );
    }

    Ok(metadata)
}
