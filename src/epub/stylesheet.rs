//! 样式表生成

use crate::epub::book::Book;

/// 将样式规则按行拼接为样式表内容，不做任何转换
pub fn stylesheet(book: &Book) -> String {
    book.style_rules().join("\n")
}
