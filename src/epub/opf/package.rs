//! OPF包文档生成
//!
//! 元数据、清单、脊柱和guide共享同一套章节/图片编号，保证四部分相互一致。

use crate::epub::book::Book;
use crate::epub::error::Result;
use crate::epub::opf::guide::{guide_element, guide_references};
use crate::epub::opf::manifest::{manifest_element, manifest_items};
use crate::epub::opf::metadata::{UNIQUE_IDENTIFIER_ID, metadata_element};
use crate::epub::opf::spine::{spine_element, spine_items};
use crate::epub::xml::{Document, Element};

/// OPF命名空间
pub const OPF_NS: &str = "http://www.idpf.org/2007/opf";

/// 生成的OPF版本
pub const OPF_VERSION: &str = "2.0";

/// 生成OPF包文档
///
/// # 参数
/// * `book` - 书籍模型
///
/// # 返回值
/// * `Result<Document>` - 缺少标题/标识符或图片格式没有媒体类型映射时返回错误
pub fn package_document(book: &Book) -> Result<Document> {
    let metadata = metadata_element(book, OPF_NS)?;
    let manifest = manifest_element(&manifest_items(book)?);
    let spine = spine_element(&spine_items(book));
    let guide = guide_element(&guide_references(book));

    let root = Element::new("package")
        .namespace(OPF_NS)
        .attr("version", OPF_VERSION)
        .attr("unique-identifier", UNIQUE_IDENTIFIER_ID)
        .child(metadata)
        .child(manifest)
        .child(spine)
        .child(guide);

    Document::new(root)
}
