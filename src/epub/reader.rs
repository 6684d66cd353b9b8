use std::fs::File;
use std::io::Read;
use std::path::Path;
use log::debug;
use zip::{CompressionMethod, ZipArchive};

use crate::epub::container::Container;
use crate::epub::error::{EpubError, Result};
use crate::epub::layout::{self, EPUB_MIMETYPE, MIMETYPE_FILENAME};

/// 已打包的EPUB文件
///
/// 用于检查生成结果：条目列表、条目内容以及container.xml指向的OPF路径。
pub struct EpubPackage {
    archive: ZipArchive<File>,
}

impl EpubPackage {
    /// 打开EPUB文件并验证mimetype条目
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    ///
    /// # 返回值
    /// * `Result<EpubPackage>` - 成功返回实例，mimetype不合规时返回错误
    pub fn open<P: AsRef<Path>>(path: P) -> Result<EpubPackage> {
        let path = path.as_ref();
        let file = File::open(path).map_err(EpubError::at(path))?;
        let archive = ZipArchive::new(file)?;

        let mut package = EpubPackage { archive };
        package.validate()?;
        debug!("EPUB验证成功: {}", path.display());

        Ok(package)
    }

    /// 验证EPUB文件的合法性
    ///
    /// 检查步骤：
    /// 1. 检查是否存在mimetype文件
    /// 2. mimetype必须是第一个条目且不压缩
    /// 3. 验证mimetype文件的内容是否为"application/epub+zip"
    fn validate(&mut self) -> Result<()> {
        if self.archive.index_for_name(MIMETYPE_FILENAME).is_none() {
            return Err(EpubError::MissingMimetype);
        }

        let mut file = self.archive.by_index(0)?;
        if file.name() != MIMETYPE_FILENAME {
            return Err(EpubError::InvalidEpub(format!(
                "第一个条目应为mimetype，实际为 {}",
                file.name()
            )));
        }
        if file.compression() != CompressionMethod::Stored {
            return Err(EpubError::InvalidEpub("mimetype条目不能压缩".to_string()));
        }

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        if content != EPUB_MIMETYPE {
            return Err(EpubError::InvalidMimetype {
                expected: EPUB_MIMETYPE.to_string(),
                found: content,
            });
        }

        Ok(())
    }

    /// 按归档顺序列出EPUB文件中的所有条目
    pub fn list_files(&mut self) -> Result<Vec<String>> {
        let mut files = Vec::with_capacity(self.archive.len());

        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            files.push(file.name().to_string());
        }

        Ok(files)
    }

    /// 提取指定文件的内容
    ///
    /// # 参数
    /// * `filename` - 要提取的文件名
    ///
    /// # 返回值
    /// * `Result<String>` - 文件内容
    pub fn extract_file(&mut self, filename: &str) -> Result<String> {
        let mut file = self.archive.by_name(filename)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// 提取指定文件的二进制内容
    pub fn extract_binary_file(&mut self, filename: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(filename)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// 解析container.xml文件
    pub fn parse_container(&mut self) -> Result<Container> {
        let container_content = self.extract_file(&layout::container_archive_path())?;
        Container::parse_xml(&container_content)
    }

    /// 获取主要的OPF文件路径
    ///
    /// # 返回值
    /// * `Result<String>` - OPF文件的完整路径
    pub fn get_opf_path(&mut self) -> Result<String> {
        let container = self.parse_container()?;

        container.get_opf_path().ok_or_else(|| {
            EpubError::ContainerParseError("container.xml中没有找到有效的rootfile".to_string())
        })
    }

    /// 获取OPF文件所在的目录
    pub fn get_opf_directory(&mut self) -> Result<String> {
        let opf_path = self.get_opf_path()?;

        Ok(opf_path
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

    /// 创建测试用的EPUB文件，条目按给定顺序写入
    fn create_test_epub(path: &Path, entries: &[(&str, &str, CompressionMethod)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);

        for (name, content, method) in entries {
            zip.start_file(*name, SimpleFileOptions::default().compression_method(*method))
                .unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }

    fn standard_entries(mimetype: &str) -> Vec<(&str, &str, CompressionMethod)> {
        vec![
            ("mimetype", mimetype, CompressionMethod::Stored),
            ("META-INF/container.xml", CONTAINER_XML, CompressionMethod::Deflated),
            ("OEBPS/content.opf", "<package/>", CompressionMethod::Deflated),
        ]
    }

    #[test]
    fn test_valid_epub() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valid.epub");
        create_test_epub(&path, &standard_entries("application/epub+zip"));

        let mut package = EpubPackage::open(&path).unwrap();
        assert_eq!(
            package.list_files().unwrap(),
            vec!["mimetype", "META-INF/container.xml", "OEBPS/content.opf"]
        );
        assert_eq!(package.extract_file("OEBPS/content.opf").unwrap(), "<package/>");
        assert_eq!(package.get_opf_path().unwrap(), "OEBPS/content.opf");
        assert_eq!(package.get_opf_directory().unwrap(), "OEBPS");
    }

    #[test]
    fn test_invalid_mimetype() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.epub");
        create_test_epub(&path, &standard_entries("application/zip"));

        match EpubPackage::open(&path) {
            Err(EpubError::InvalidMimetype { expected, found }) => {
                assert_eq!(expected, "application/epub+zip");
                assert_eq!(found, "application/zip");
            }
            _ => panic!("期望InvalidMimetype错误"),
        }
    }

    #[test]
    fn test_missing_mimetype() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.epub");
        create_test_epub(
            &path,
            &[("META-INF/container.xml", CONTAINER_XML, CompressionMethod::Deflated)],
        );

        assert!(matches!(EpubPackage::open(&path), Err(EpubError::MissingMimetype)));
    }

    #[test]
    fn test_mimetype_must_come_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.epub");
        let mut entries = standard_entries("application/epub+zip");
        entries.swap(0, 1);
        create_test_epub(&path, &entries);

        assert!(matches!(EpubPackage::open(&path), Err(EpubError::InvalidEpub(_))));
    }

    #[test]
    fn test_mimetype_must_be_stored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deflated.epub");
        let mut entries = standard_entries("application/epub+zip");
        entries[0].2 = CompressionMethod::Deflated;
        create_test_epub(&path, &entries);

        assert!(matches!(EpubPackage::open(&path), Err(EpubError::InvalidEpub(_))));
    }

    #[test]
    fn test_missing_entry_is_zip_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valid.epub");
        create_test_epub(&path, &standard_entries("application/epub+zip"));

        let mut package = EpubPackage::open(&path).unwrap();
        assert!(matches!(
            package.extract_binary_file("OEBPS/missing.png"),
            Err(EpubError::Zip(zip::result::ZipError::FileNotFound))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.epub");
        assert!(matches!(EpubPackage::open(&path), Err(EpubError::FileIo { .. })));
    }
}
