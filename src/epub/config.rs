//! 构建配置模块
//!
//! 提供EPUB构建过程中使用的全部可配置值（默认语言、媒体类型映射、导览地标映射等），
//! 支持从YAML文件加载配置。配置总是显式传入 [`Book`](crate::epub::Book)，没有全局状态。

use crate::epub::error::{EpubError, Result};
use crate::epub::layout::ImageFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 媒体类型映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaTypes {
    /// 章节文档的媒体类型
    pub chapter: String,
    /// 样式表的媒体类型
    pub stylesheet: String,
    /// NCX导航文档的媒体类型
    pub navigation: String,
    /// OPF包文档的媒体类型（写入container.xml）
    pub package: String,
    /// 图片格式标签到媒体类型的映射，如 `png -> image/png`
    pub images: BTreeMap<String, String>,
}

impl MediaTypes {
    /// 查找图片格式对应的媒体类型
    ///
    /// 映射中不存在的格式是硬错误，不会回退到默认值。
    pub fn image(&self, format: ImageFormat) -> Result<&str> {
        self.images
            .get(format.as_str())
            .map(String::as_str)
            .ok_or_else(|| EpubError::UnsupportedImageFormat(format.as_str().to_string()))
    }
}

impl Default for MediaTypes {
    fn default() -> Self {
        let mut images = BTreeMap::new();
        images.insert(ImageFormat::Png.as_str().to_string(), "image/png".to_string());
        images.insert(ImageFormat::Jpeg.as_str().to_string(), "image/jpeg".to_string());

        Self {
            chapter: "application/xhtml+xml".to_string(),
            stylesheet: "text/css".to_string(),
            navigation: "application/x-dtbncx+xml".to_string(),
            package: "application/oebps-package+xml".to_string(),
            images,
        }
    }
}

/// 指向某一章节的导览地标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    /// guide中reference的type属性（如toc、title-page）
    pub kind: String,
    /// reference的title属性
    pub title: String,
    /// 目标章节索引
    #[serde(default)]
    pub chapter: usize,
}

impl Landmark {
    /// 创建指向指定章节的地标
    pub fn new(kind: &str, title: &str, chapter: usize) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
            chapter,
        }
    }
}

/// 目标由构建过程决定的地标（封面图片、最后一章）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkLabel {
    /// reference的type属性
    pub kind: String,
    /// reference的title属性
    pub title: String,
}

impl LandmarkLabel {
    pub fn new(kind: &str, title: &str) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
        }
    }
}

/// EPUB构建配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// 默认语言代码
    pub language: String,
    /// 输出文件的基础名称（不含扩展名）
    pub base_name: String,
    /// dc:identifier的opf:scheme属性
    pub identifier_scheme: String,
    /// 媒体类型映射
    pub media_types: MediaTypes,
    /// guide中的固定地标，按顺序输出
    pub landmarks: Vec<Landmark>,
    /// 设置封面图片时追加的地标
    pub cover_landmark: LandmarkLabel,
    /// 指向最后一章的地标，没有章节时省略
    pub last_chapter_landmark: Option<LandmarkLabel>,
    /// 压缩条目的deflate级别（None使用zip默认值）
    pub compression_level: Option<i64>,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            base_name: "book".to_string(),
            identifier_scheme: "ISBNPLUS".to_string(),
            media_types: MediaTypes::default(),
            landmarks: vec![
                Landmark::new("toc", "Contents", 0),
                Landmark::new("title-page", "Title", 0),
                Landmark::new("foreword", "Foreword", 0),
                Landmark::new("copyright-page", "License", 0),
                Landmark::new("text", "Start", 0),
            ],
            cover_landmark: LandmarkLabel::new("cover", "Cover"),
            last_chapter_landmark: Some(LandmarkLabel::new("bibliography", "Bibliography")),
            compression_level: None,
        }
    }
}

impl BookConfig {
    /// 从YAML文件加载配置
    ///
    /// 文件中未出现的字段使用默认值。
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    /// * `Result<Self>` - 加载成功返回配置实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;
        Self::from_yaml_str(&content)
    }

    /// 从YAML字符串解析配置
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 序列化为YAML字符串
    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self)
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))
    }

    /// 生成默认配置文件
    ///
    /// # 参数
    /// * `path` - 输出路径
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = Self::default().to_yaml()?;

        let content_with_header = format!(
            "# EPUB构建配置文件\n# 定义默认语言、媒体类型映射以及guide地标到章节的映射\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_landmarks_point_at_first_chapter() {
        let config = BookConfig::default();
        assert_eq!(config.landmarks.len(), 5);
        assert!(config.landmarks.iter().all(|l| l.chapter == 0));
        assert_eq!(config.landmarks[0].kind, "toc");
        assert_eq!(config.landmarks[4].title, "Start");
    }

    #[test]
    fn test_image_media_types() {
        let media_types = MediaTypes::default();
        assert_eq!(media_types.image(ImageFormat::Png).unwrap(), "image/png");
        assert_eq!(media_types.image(ImageFormat::Jpeg).unwrap(), "image/jpeg");
    }

    #[test]
    fn test_missing_image_mapping_is_an_error() {
        let mut media_types = MediaTypes::default();
        media_types.images.remove("jpeg");

        let err = media_types.image(ImageFormat::Jpeg).unwrap_err();
        assert!(matches!(err, EpubError::UnsupportedImageFormat(ref f) if f == "jpeg"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = BookConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = BookConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = BookConfig::from_yaml_str("language: de\nbase_name: musil\n").unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.base_name, "musil");
        assert_eq!(config.identifier_scheme, "ISBNPLUS");
        assert_eq!(config.media_types, MediaTypes::default());
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = BookConfig::from_yaml_str("landmarks: 12").unwrap_err();
        assert!(matches!(err, EpubError::ConfigError(_)));
    }

    #[test]
    fn test_generate_and_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.yaml");

        BookConfig::generate_default_config(&path).unwrap();
        let loaded = BookConfig::from_file(&path).unwrap();
        assert_eq!(loaded, BookConfig::default());
    }
}
