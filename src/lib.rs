pub mod epub;

// === 核心API重新导出 ===

/// 书籍模型（主要接口）
pub use epub::Book;

/// 错误处理
pub use epub::{EpubError, Result};

// === 数据结构 ===

/// 创建者、章节和图片
pub use epub::{Author, Chapter, Image, Role};

/// 编号与格式
pub use epub::{ChapterIndex, ImageFormat, ImageIndex};

/// 构建配置
pub use epub::{BookConfig, Landmark, LandmarkLabel, MediaTypes};

// === 底层组件（高级用法） ===

/// 容器组件
pub use epub::{Container, RootFile};

/// 已打包EPUB的读取器
pub use epub::EpubPackage;

/// XML树
pub use epub::{Document, Element, Node};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = "一个用于构建EPUB 2电子书容器的Rust库";

// === 便捷函数 ===

/// 快速创建使用默认配置的书籍
///
/// 这是 `Book::new` 的便捷包装函数。
///
/// # 参数
/// * `out_dir` - 输出目录
///
/// # 返回值
/// * `Result<Book>` - 书籍实例
///
/// # 示例
///
/// ```no_run
/// let mut book = epubwright::create("out")?;
/// book.set_title("Der Mann ohne Eigenschaften");
/// book.set_identifier("4223xxx");
/// book.append_author("Robert", "Musil");
/// book.append_chapter("Woraus bemerkenswerter Weise nichts hervorgeht", "<p>...</p>")?;
/// let path = book.write()?;
/// println!("已生成: {}", path.display());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn create<P: AsRef<std::path::Path>>(out_dir: P) -> Result<Book> {
    Book::new(out_dir)
}

/// 快速打开已打包的EPUB文件
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<EpubPackage> {
    EpubPackage::open(path)
}
