use crate::epub::book::Book;
use crate::epub::error::{EpubError, Result};
use crate::epub::layout;
use crate::epub::xml::{Document, Element};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// container.xml的命名空间
pub const CONTAINER_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:container";

/// OPF包文档的标准媒体类型
const OPF_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// Container.xml的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 指向本书OPF包文档的container
    ///
    /// full-path与打包时OPF条目的路径来自同一个函数。
    pub fn for_book(book: &Book) -> Container {
        Container {
            rootfiles: vec![RootFile {
                full_path: layout::package_archive_path(),
                media_type: book.config().media_types.package.clone(),
            }],
        }
    }

    /// 生成container.xml文档
    pub fn to_document(&self) -> Result<Document> {
        let rootfiles = self.rootfiles.iter().fold(Element::new("rootfiles"), |parent, rootfile| {
            parent.child(
                Element::new("rootfile")
                    .attr("full-path", rootfile.full_path.as_str())
                    .attr("media-type", rootfile.media_type.as_str()),
            )
        });

        let root = Element::new("container")
            .namespace(CONTAINER_NS)
            .attr("version", "1.0")
            .child(rootfiles);

        Document::new(root)
    }

    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    ///
    /// # 返回值
    /// * `Result<Container, EpubError>` - 解析后的Container信息
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();
        let mut in_rootfiles = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"rootfiles" => {
                        in_rootfiles = true;
                    }
                    b"rootfile" if in_rootfiles => {
                        let mut full_path = String::new();
                        let mut media_type = String::new();

                        for attr_result in e.attributes() {
                            let attr = attr_result
                                .map_err(|e| EpubError::XmlError(quick_xml::Error::InvalidAttr(e)))?;
                            match attr.key.local_name().as_ref() {
                                b"full-path" => {
                                    full_path = attr.unescape_value()?.into_owned();
                                }
                                b"media-type" => {
                                    media_type = attr.unescape_value()?.into_owned();
                                }
                                _ => {}
                            }
                        }

                        if !full_path.is_empty() && !media_type.is_empty() {
                            rootfiles.push(RootFile {
                                full_path,
                                media_type,
                            });
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"rootfiles" {
                        in_rootfiles = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::ContainerParseError(
                "没有找到任何rootfile条目".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取主要的OPF文件路径
    ///
    /// # 返回值
    /// * `Option<String>` - OPF文件的完整路径
    pub fn get_opf_path(&self) -> Option<String> {
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type == OPF_MEDIA_TYPE)
            .or_else(|| self.rootfiles.first())
            .map(|rootfile| rootfile.full_path.clone())
    }
}

/// 生成本书的container.xml文档
pub fn container_document(book: &Book) -> Result<Document> {
    Container::for_book(book).to_document()
}
