//! 书籍文档模型与内容写入接口
//!
//! [`Book`] 是一次构建的聚合根：外部生产者通过 `append_*` 与 `set_*` 方法写入内容，
//! 最后调用一次 [`Book::write`] 生成全部XML文档并打包为EPUB文件。

use crate::epub::archive;
use crate::epub::chapter;
use crate::epub::config::BookConfig;
use crate::epub::container;
use crate::epub::error::{EpubError, Result};
use crate::epub::layout::{
    self, ChapterIndex, EPUB_MIMETYPE, ImageFormat, ImageIndex, Layout, MIMETYPE_FILENAME,
    NCX_FILENAME, OPF_FILENAME, STYLESHEET_FILENAME,
};
use crate::epub::ncx;
use crate::epub::opf;
use crate::epub::stylesheet;
use crate::epub::xml::{self, Node};
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 创建者角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// 作者
    #[default]
    Author,
    /// 编辑
    Editor,
}

impl Role {
    /// MARC relator代码，用于opf:role属性
    pub fn code(self) -> &'static str {
        match self {
            Role::Author => "aut",
            Role::Editor => "edt",
        }
    }
}

impl FromStr for Role {
    type Err = EpubError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aut" | "author" => Ok(Role::Author),
            "edt" | "editor" => Ok(Role::Editor),
            _ => Err(EpubError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 作者信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl Author {
    /// 排序键 "Last, First"
    pub fn file_as(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// 显示名 "First Last"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 已追加的章节
#[derive(Debug, Clone)]
pub struct Chapter {
    index: ChapterIndex,
    title: String,
    content: Vec<Node>,
}

impl Chapter {
    pub fn index(&self) -> ChapterIndex {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 解析后的章节内容片段
    pub fn content(&self) -> &[Node] {
        &self.content
    }
}

/// 已追加的图片
#[derive(Debug, Clone)]
pub struct Image {
    index: ImageIndex,
    format: ImageFormat,
    data: Vec<u8>,
}

impl Image {
    pub fn index(&self) -> ImageIndex {
        self.index
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 相对于OPS目录的路径
    pub fn href(&self) -> String {
        self.index.href(self.format)
    }
}

/// 一本待构建的书
#[derive(Debug)]
pub struct Book {
    config: BookConfig,
    layout: Layout,
    title: Option<String>,
    identifier: Option<String>,
    language: String,
    base_name: String,
    authors: Vec<Author>,
    chapters: Vec<Chapter>,
    images: Vec<Image>,
    style_rules: Vec<String>,
    cover_image: Option<ImageIndex>,
}

impl Book {
    /// 使用默认配置创建书籍，并创建暂存目录
    ///
    /// # 参数
    /// * `out_dir` - 输出目录，暂存文件位于 `{out_dir}/archive`，EPUB写入 `{out_dir}/{base_name}.epub`
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        Self::with_config(out_dir, BookConfig::default())
    }

    /// 使用指定配置创建书籍
    ///
    /// 配置中的 `base_name` 不合法时返回 `InvalidBaseName`，不会创建任何目录。
    pub fn with_config<P: AsRef<Path>>(out_dir: P, config: BookConfig) -> Result<Self> {
        layout::check_base_name(&config.base_name)?;
        let layout = Layout::new(out_dir);
        layout.create_dirs()?;
        debug!("暂存目录: {}", layout.archive_dir().display());

        Ok(Self {
            language: config.language.clone(),
            base_name: config.base_name.clone(),
            config,
            layout,
            title: None,
            identifier: None,
            authors: Vec::new(),
            chapters: Vec::new(),
            images: Vec::new(),
            style_rules: Vec::new(),
            cover_image: None,
        })
    }

    // === 元数据 ===

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = Some(identifier.into());
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// 设置输出文件的基础名称（不含扩展名）
    ///
    /// 空名称、含路径分隔符的名称以及 `.`、`..` 返回 `InvalidBaseName`，原名称保持不变。
    pub fn set_base_name(&mut self, base_name: impl Into<String>) -> Result<()> {
        let base_name = base_name.into();
        layout::check_base_name(&base_name)?;
        self.base_name = base_name;
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn style_rules(&self) -> &[String] {
        &self.style_rules
    }

    /// 封面图片
    pub fn cover_image(&self) -> Option<&Image> {
        self.cover_image.and_then(|index| self.images.get(index.get()))
    }

    /// 最后一章的索引，没有章节时为None
    pub fn last_chapter(&self) -> Option<ChapterIndex> {
        self.chapters.last().map(Chapter::index)
    }

    /// 检查章节索引是否存在
    pub fn has_chapter(&self, index: usize) -> bool {
        index < self.chapters.len()
    }

    pub(crate) fn require_title(&self) -> Result<&str> {
        self.title.as_deref().ok_or(EpubError::MissingTitle)
    }

    pub(crate) fn require_identifier(&self) -> Result<&str> {
        self.identifier.as_deref().ok_or(EpubError::MissingIdentifier)
    }

    // === 内容写入 ===

    /// 追加章节
    ///
    /// 将内容片段包装为独立的XHTML文档，写入 `OPS/chapter/{索引:04}.html`。
    ///
    /// # 参数
    /// * `title` - 章节标题（用于NCX导航）
    /// * `content_fragment` - 章节正文的XHTML片段
    ///
    /// # 返回值
    /// * `Result<ChapterIndex>` - 新章节的索引
    pub fn append_chapter(
        &mut self,
        title: impl Into<String>,
        content_fragment: &str,
    ) -> Result<ChapterIndex> {
        let chapter = Chapter {
            index: ChapterIndex::new(self.chapters.len()),
            title: title.into(),
            content: xml::parse_fragment(content_fragment)?,
        };

        let document = chapter::chapter_document(self, &chapter)?;
        let path = self.layout.staged(&layout::archive_path(&chapter.index.href()));
        document.write_to(&path)?;
        debug!("章节 {} 已写入 {}", chapter.index, path.display());

        let index = chapter.index;
        self.chapters.push(chapter);
        Ok(index)
    }

    /// 追加作者
    pub fn append_author(&mut self, first: impl Into<String>, last: impl Into<String>) {
        self.append_author_with_role(first, last, Role::Author);
    }

    /// 追加指定角色的创建者
    pub fn append_author_with_role(
        &mut self,
        first: impl Into<String>,
        last: impl Into<String>,
        role: Role,
    ) {
        self.authors.push(Author {
            first_name: first.into(),
            last_name: last.into(),
            role,
        });
    }

    /// 追加一行样式表规则，原样写入
    pub fn append_style_line(&mut self, line: impl Into<String>) {
        self.style_rules.push(line.into());
    }

    /// 追加图片
    ///
    /// # 参数
    /// * `format` - 格式标签（`png`、`jpeg` 或 `jpg`）
    /// * `data` - 图片原始数据
    ///
    /// # 返回值
    /// * `Result<ImageIndex>` - 新图片的索引，不支持的格式返回 `UnsupportedImageFormat`
    pub fn append_image(&mut self, format: &str, data: impl Into<Vec<u8>>) -> Result<ImageIndex> {
        let image = Image {
            index: ImageIndex::new(self.images.len()),
            format: format.parse()?,
            data: data.into(),
        };

        let path = self.layout.staged(&layout::archive_path(&image.href()));
        fs::write(&path, &image.data).map_err(EpubError::at(&path))?;
        debug!("图片 {} 已写入 {}", image.index, path.display());

        let index = image.index;
        self.images.push(image);
        Ok(index)
    }

    /// 设置封面图片
    pub fn set_cover_image(&mut self, index: ImageIndex) -> Result<()> {
        if index.get() >= self.images.len() {
            return Err(EpubError::CoverImageOutOfRange {
                index: index.get(),
                count: self.images.len(),
            });
        }
        self.cover_image = Some(index);
        Ok(())
    }

    // === 生成 ===

    /// 检查调用方约定：标题、标识符必须已设置
    pub fn validate(&self) -> Result<()> {
        self.require_title()?;
        self.require_identifier()?;
        Ok(())
    }

    /// 生成全部文档并打包为EPUB
    ///
    /// 先在内存中生成所有文档，全部成功后才写入暂存目录，最后按固定顺序打包。
    /// 在未修改书籍的情况下重复调用，生成的文件逐字节相同。
    ///
    /// # 返回值
    /// * `Result<PathBuf>` - 生成的EPUB文件路径
    pub fn write(&self) -> Result<PathBuf> {
        self.validate()?;

        let css = stylesheet::stylesheet(self);
        let container = container::container_document(self)?;
        let package = opf::package_document(self)?;
        let navigation = ncx::ncx_document(self)?;

        let staged = |file: &str| self.layout.staged(&layout::archive_path(file));

        let css_path = staged(STYLESHEET_FILENAME);
        fs::write(&css_path, css).map_err(EpubError::at(&css_path))?;

        let mimetype_path = self.layout.staged(MIMETYPE_FILENAME);
        fs::write(&mimetype_path, EPUB_MIMETYPE).map_err(EpubError::at(&mimetype_path))?;

        container.write_to(&self.layout.staged(&layout::container_archive_path()))?;
        package.write_to(&staged(OPF_FILENAME))?;
        navigation.write_to(&staged(NCX_FILENAME))?;
        debug!("已生成 {} 个章节、{} 张图片的文档", self.chapters.len(), self.images.len());

        let epub_path = archive::assemble(self)?;
        info!("EPUB已生成: {}", epub_path.display());
        Ok(epub_path)
    }
}
