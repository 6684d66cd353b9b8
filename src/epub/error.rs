use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub构建相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("文件操作失败 {path:?}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("缺少书籍标题")]
    MissingTitle,

    #[error("缺少书籍标识符")]
    MissingIdentifier,

    #[error("不支持的图片格式: {0}")]
    UnsupportedImageFormat(String),

    #[error("封面图片索引越界: {index} (共有 {count} 张图片)")]
    CoverImageOutOfRange { index: usize, count: usize },

    #[error("无效的输出文件名: {0:?}")]
    InvalidBaseName(String),

    #[error("未知的作者角色: {0}")]
    UnknownRole(String),

    #[error("章节内容不是格式良好的XML片段: {0}")]
    MalformedFragment(String),

    #[error("无效的XML名称: {0:?}")]
    InvalidXmlName(String),

    #[error("元素 <{element}> 使用了未声明的命名空间前缀 {prefix:?}")]
    UndeclaredPrefix { prefix: String, element: String },

    #[error("元素 <{element}> 包含重复属性 {attribute:?}")]
    DuplicateAttribute { attribute: String, element: String },

    #[error("打包时找不到源文件: {0:?}")]
    MissingSource(PathBuf),

    #[error("文件不是有效的EPUB格式: {0}")]
    InvalidEpub(String),

    #[error("缺少mimetype文件")]
    MissingMimetype,

    #[error("无效的mimetype: {expected}, 找到: {found}")]
    InvalidMimetype { expected: String, found: String },

    #[error("container.xml解析错误: {0}")]
    ContainerParseError(String),

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl EpubError {
    /// 为IO错误附加出错的路径
    pub(crate) fn at(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> EpubError {
        let path = path.into();
        move |source| EpubError::FileIo { path, source }
    }
}
