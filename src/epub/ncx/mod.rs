//! NCX（Navigation Control file for XML）导航文档生成模块
//!
//! 此模块生成EPUB中的NCX导航控制文件，定义阅读器中的目录结构。

pub mod document;
pub mod navigation;

pub use document::{NCX_NS, NCX_VERSION, nav_map, ncx_document};
pub use navigation::{DocAuthor, DocTitle, NavContent, NavLabel, NavMap, NavPoint, NcxMetadata};
