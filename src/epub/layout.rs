//! 包布局模块
//!
//! 章节/图片的编号和所有路径都只在这里生成：清单id、脊柱idref、NCX的content src、
//! guide的href、暂存目录中的文件路径以及zip条目名称。各个生成器不自行拼接 `%04d`。

use crate::epub::error::{EpubError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// mimetype文件名（位于归档根目录）
pub const MIMETYPE_FILENAME: &str = "mimetype";
/// mimetype文件内容
pub const EPUB_MIMETYPE: &str = "application/epub+zip";
/// 元数据目录
pub const META_INF_DIR: &str = "META-INF";
/// container描述文件名
pub const CONTAINER_FILENAME: &str = "container.xml";
/// 内容目录
pub const OPS_DIR: &str = "OPS";
/// 样式表文件名
pub const STYLESHEET_FILENAME: &str = "book.css";
/// NCX导航文件名
pub const NCX_FILENAME: &str = "book.ncx";
/// OPF包文件名
pub const OPF_FILENAME: &str = "book.opf";
/// 章节子目录
pub const CHAPTER_DIR: &str = "chapter";
/// 图片子目录
pub const IMAGE_DIR: &str = "image";
/// 章节文件扩展名
pub const CHAPTER_EXTENSION: &str = "html";

/// 清单中样式表的id
pub const STYLESHEET_ID: &str = "stylesheet";
/// 清单中NCX的id
pub const NCX_ID: &str = "ncx";

/// 唯一的编号函数
fn numbered(prefix: &str, index: usize) -> String {
    format!("{}_{:04}", prefix, index)
}

/// 唯一的文件名函数
fn file_name(index: usize, extension: &str) -> String {
    format!("{:04}.{}", index, extension)
}

/// 章节索引，在追加时分配，从0开始单调递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterIndex(usize);

impl ChapterIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// 数值索引
    pub fn get(self) -> usize {
        self.0
    }

    /// 清单/脊柱/导航点使用的id，如 `chapter_0000`
    pub fn manifest_id(self) -> String {
        numbered("chapter", self.0)
    }

    /// 相对于OPS目录的路径，如 `chapter/0000.html`
    pub fn href(self) -> String {
        format!("{}/{}", CHAPTER_DIR, file_name(self.0, CHAPTER_EXTENSION))
    }
}

impl fmt::Display for ChapterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 图片索引，与章节编号相互独立
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageIndex(usize);

impl ImageIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// 数值索引
    pub fn get(self) -> usize {
        self.0
    }

    /// 清单使用的id，如 `image_0000`
    pub fn manifest_id(self) -> String {
        numbered("image", self.0)
    }

    /// 相对于OPS目录的路径，如 `image/0000.png`
    pub fn href(self, format: ImageFormat) -> String {
        format!("{}/{}", IMAGE_DIR, file_name(self.0, format.extension()))
    }
}

impl fmt::Display for ImageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 支持的图片格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// 格式标签，也是媒体类型映射的键
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    /// 暂存文件和归档条目使用的扩展名
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = EpubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            _ => Err(EpubError::UnsupportedImageFormat(s.to_string())),
        }
    }
}

/// 相对于OPS目录的路径转换为归档内路径
pub fn archive_path(href: &str) -> String {
    format!("{}/{}", OPS_DIR, href)
}

/// OPF包文档在归档内的路径（container.xml引用它）
pub fn package_archive_path() -> String {
    archive_path(OPF_FILENAME)
}

/// container描述文件在归档内的路径
pub fn container_archive_path() -> String {
    format!("{}/{}", META_INF_DIR, CONTAINER_FILENAME)
}

/// 从 `from_href` 所在目录指向 `to_href` 的相对路径（两者都相对于OPS目录）
pub fn relative_href(from_href: &str, to_href: &str) -> String {
    let depth = from_href.matches('/').count();
    format!("{}{}", "../".repeat(depth), to_href)
}

/// 检查输出文件的基础名称
///
/// 名称必须非空，不能包含路径分隔符，也不能是 `.` 或 `..`，保证EPUB文件落在输出目录内。
pub fn check_base_name(base_name: &str) -> Result<()> {
    let invalid = base_name.is_empty()
        || base_name == "."
        || base_name == ".."
        || base_name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(EpubError::InvalidBaseName(base_name.to_string()));
    }
    Ok(())
}

/// 暂存目录布局
///
/// ```text
/// {out_dir}/archive/mimetype
/// {out_dir}/archive/META-INF/container.xml
/// {out_dir}/archive/OPS/book.css|book.ncx|book.opf
/// {out_dir}/archive/OPS/chapter/0000.html
/// {out_dir}/archive/OPS/image/0000.png
/// ```
#[derive(Debug, Clone)]
pub struct Layout {
    out_dir: PathBuf,
    archive_dir: PathBuf,
}

impl Layout {
    /// 创建布局，不触及文件系统
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        let out_dir = out_dir.as_ref().to_path_buf();
        let archive_dir = out_dir.join("archive");
        Self {
            out_dir,
            archive_dir,
        }
    }

    /// 创建全部暂存目录
    pub fn create_dirs(&self) -> Result<()> {
        let dirs = [
            self.archive_dir.join(META_INF_DIR),
            self.ops_dir().join(CHAPTER_DIR),
            self.ops_dir().join(IMAGE_DIR),
        ];
        for dir in dirs {
            std::fs::create_dir_all(&dir).map_err(EpubError::at(&dir))?;
        }
        Ok(())
    }

    /// 输出目录
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// 暂存根目录
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// 暂存的OPS目录
    pub fn ops_dir(&self) -> PathBuf {
        self.archive_dir.join(OPS_DIR)
    }

    /// 归档内路径对应的暂存文件
    pub fn staged(&self, archive_path: &str) -> PathBuf {
        archive_path
            .split('/')
            .fold(self.archive_dir.clone(), |path, part| path.join(part))
    }

    /// 最终EPUB文件路径
    pub fn epub_path(&self, base_name: &str) -> PathBuf {
        self.out_dir.join(format!("{}.epub", base_name))
    }
}

/// 归档条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// 归档内路径
    pub archive_path: String,
    /// 是否不压缩存储
    pub stored: bool,
}

impl Member {
    fn deflated(archive_path: String) -> Self {
        Self {
            archive_path,
            stored: false,
        }
    }
}

/// 归档条目的固定顺序
///
/// mimetype必须是第一个条目且不压缩，之后依次是container.xml、样式表、NCX、OPF、
/// 按索引排列的章节和按索引排列的图片。
pub fn members(
    chapters: impl IntoIterator<Item = ChapterIndex>,
    images: impl IntoIterator<Item = (ImageIndex, ImageFormat)>,
) -> Vec<Member> {
    let mut members = vec![
        Member {
            archive_path: MIMETYPE_FILENAME.to_string(),
            stored: true,
        },
        Member::deflated(container_archive_path()),
        Member::deflated(archive_path(STYLESHEET_FILENAME)),
        Member::deflated(archive_path(NCX_FILENAME)),
        Member::deflated(package_archive_path()),
    ];
    members.extend(
        chapters
            .into_iter()
            .map(|index| Member::deflated(archive_path(&index.href()))),
    );
    members.extend(
        images
            .into_iter()
            .map(|(index, format)| Member::deflated(archive_path(&index.href(format)))),
    );
    members
}
