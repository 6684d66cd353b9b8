//! 归档组装模块
//!
//! 按固定顺序把暂存目录中的文件写入zip归档。归档先写入输出目录中的临时文件，
//! 全部条目写完后才重命名为 `{base_name}.epub`。

use crate::epub::book::Book;
use crate::epub::error::{EpubError, Result};
use crate::epub::layout::{self, Layout, Member};
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// 本书归档的全部条目
pub fn book_members(book: &Book) -> Vec<Member> {
    layout::members(
        book.chapters().iter().map(|chapter| chapter.index()),
        book.images().iter().map(|image| (image.index(), image.format())),
    )
}

/// 读取条目对应的暂存文件
fn read_staged(layout: &Layout, member: &Member) -> Result<Vec<u8>> {
    let path = layout.staged(&member.archive_path);
    fs::read(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EpubError::MissingSource(path.clone()),
        _ => EpubError::FileIo {
            path: path.clone(),
            source: e,
        },
    })
}

/// 组装EPUB归档
///
/// 条目的修改时间固定为zip的默认时间，未修改的书籍重复打包得到逐字节相同的文件。
///
/// # 参数
/// * `book` - 已完成生成的书籍，所有文档都已写入暂存目录
///
/// # 返回值
/// * `Result<PathBuf>` - EPUB文件路径；任一暂存文件缺失时返回 `MissingSource`，且不会留下EPUB文件
pub fn assemble(book: &Book) -> Result<PathBuf> {
    let layout = book.layout();
    let epub_path = layout.epub_path(book.base_name());

    let stored = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default());
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(book.config().compression_level)
        .last_modified_time(DateTime::default());

    let mut temp = NamedTempFile::new_in(layout.out_dir()).map_err(EpubError::at(layout.out_dir()))?;
    {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        for member in book_members(book) {
            let data = read_staged(layout, &member)?;
            let options = if member.stored { stored } else { deflated };
            zip.start_file(member.archive_path.as_str(), options)?;
            zip.write_all(&data)?;
            debug!("已打包 {} ({} 字节)", member.archive_path, data.len());
        }
        zip.finish()?;
    }

    temp.persist(&epub_path)
        .map_err(|e| EpubError::at(&epub_path)(e.error))?;
    Ok(epub_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use zip::ZipArchive;

    fn scenario_book(dir: &std::path::Path) -> Book {
        let mut book = Book::new(dir).unwrap();
        book.set_title("T");
        book.set_identifier("ID1");
        book.append_author("A", "B");
        book.append_chapter("C0", "<p>first</p>").unwrap();
        book.append_chapter("C1", "<p>second</p>").unwrap();
        book.append_image("png", vec![0x89, b'P', b'N', b'G']).unwrap();
        book
    }

    #[test]
    fn test_mimetype_is_first_and_stored() {
        let dir = tempfile::tempdir().unwrap();
        let path = scenario_book(dir.path()).write().unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mimetype = archive.by_index(0).unwrap();
        assert_eq!(mimetype.name(), "mimetype");
        assert_eq!(mimetype.compression(), CompressionMethod::Stored);
        assert_eq!(mimetype.size(), layout::EPUB_MIMETYPE.len() as u64);
        drop(mimetype);

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"PK\x03\x04");
        assert_eq!(&bytes[30..38], b"mimetype");
        let extra = u16::from_le_bytes([bytes[28], bytes[29]]) as usize;
        assert_eq!(&bytes[38 + extra..58 + extra], b"application/epub+zip");
    }

    #[test]
    fn test_member_list() {
        let dir = tempfile::tempdir().unwrap();
        let book = scenario_book(dir.path());
        let path = book.write().unwrap();

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();

        let mut expected: Vec<String> =
            book_members(&book).into_iter().map(|m| m.archive_path).collect();
        expected.sort_unstable();
        assert_eq!(names, expected);
        assert_eq!(archive.len(), 8);
    }

    #[test]
    fn test_missing_source_leaves_no_archive() {
        let dir = tempfile::tempdir().unwrap();
        let book = scenario_book(dir.path());
        let chapter = dir.path().join("archive/OPS/chapter/0001.html");
        fs::remove_file(&chapter).unwrap();

        let err = book.write().unwrap_err();
        assert!(matches!(err, EpubError::MissingSource(ref p) if p == &chapter));
        assert!(!dir.path().join("book.epub").exists());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("archive")]);
    }

    #[test]
    fn test_repeated_write_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let book = scenario_book(dir.path());

        let first = fs::read(book.write().unwrap()).unwrap();
        let second = fs::read(book.write().unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compression_level_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::epub::BookConfig {
            compression_level: Some(9),
            base_name: "level9".to_string(),
            ..Default::default()
        };
        let mut book = Book::with_config(dir.path(), config).unwrap();
        book.set_title("T");
        book.set_identifier("ID1");
        book.append_chapter("C0", "<p>text</p>").unwrap();

        let path = book.write().unwrap();
        assert_eq!(path, dir.path().join("level9.epub"));

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let chapter = archive.by_name("OPS/chapter/0000.html").unwrap();
        assert_eq!(chapter.compression(), CompressionMethod::Deflated);
    }
}
