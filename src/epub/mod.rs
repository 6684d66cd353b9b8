pub mod archive;
pub mod book;
pub mod chapter;
pub mod config;
pub mod container;
pub mod error;
pub mod layout;
pub mod ncx;
pub mod opf;
pub mod reader;
pub mod stylesheet;
pub mod xml;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出书籍模型
pub use book::{Author, Book, Chapter, Image, Role};
pub use config::{BookConfig, Landmark, LandmarkLabel, MediaTypes};
pub use layout::{ChapterIndex, ImageFormat, ImageIndex, Layout, Member};

// 重新导出容器相关
pub use container::{Container, RootFile};

// 重新导出EPUB读取器
pub use reader::EpubPackage;

// 重新导出OPF相关
pub use opf::{Creator, GuideReference, Identifier, ManifestItem, SpineItem};

// 重新导出NCX相关
pub use ncx::{DocAuthor, DocTitle, NavContent, NavLabel, NavMap, NavPoint, NcxMetadata};

// 重新导出XML树
pub use xml::{Document, Element, Node};
