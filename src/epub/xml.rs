//! XML文档树模块
//!
//! 提供带命名空间的元素/属性构建器。所有生成的文档（container.xml、OPF、NCX、章节XHTML）
//! 都先构建为元素树，在 [`Document::new`] 时统一校验格式良好性，再通过 quick-xml 序列化。
//! 同样的树结构也用于承载外部传入的章节内容片段。

use crate::epub::error::{EpubError, Result};
use quick_xml::Writer;
use quick_xml::escape::{partial_escape, resolve_html5_entity};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use std::io::{self, Cursor};
use std::path::Path;

/// 预定义的 `xml` 前缀，无需声明
const XML_PREFIX: &str = "xml";

/// 文档树中的节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// 子元素
    Element(Element),
    /// 文本内容（序列化时自动转义）
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// XML元素
///
/// 命名空间声明、属性和子节点都按添加顺序保存，保证序列化结果稳定可复现。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    /// (前缀, URI)，前缀为None表示默认命名空间
    namespaces: Vec<(Option<String>, String)>,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// 创建新元素，名称可带前缀（如 `dc:title`）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 创建只包含一段文本的元素
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    /// 声明默认命名空间
    pub fn namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespaces.push((None, uri.into()));
        self
    }

    /// 声明带前缀的命名空间
    pub fn prefixed_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.push((Some(prefix.into()), uri.into()));
        self
    }

    /// 添加属性
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// 添加子元素
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// 添加文本子节点
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// 批量追加子节点
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// 原地追加子节点
    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// 元素名称（含前缀）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取属性值
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 获取命名空间声明的URI
    pub fn namespace_uri(&self, prefix: Option<&str>) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// 全部子节点
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// 子元素迭代器
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// 查找第一个指定名称的直接子元素
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name == name)
    }

    /// 查找所有指定名称的直接子元素
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |e| e.name == name)
    }

    /// 拼接元素内全部文本
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        collect_text(self, &mut result);
        result
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

/// 经过校验的XML文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
    indent: bool,
}

impl Document {
    /// 以根元素创建文档，并校验整棵树
    ///
    /// 校验内容：
    /// 1. 元素名和属性名都是合法的XML名称
    /// 2. 同一元素上没有重复的属性或命名空间声明
    /// 3. 使用的每个前缀都已在当前作用域声明
    pub fn new(root: Element) -> Result<Self> {
        let mut scopes: Vec<Vec<&str>> = Vec::new();
        validate(&root, &mut scopes)?;
        Ok(Self { root, indent: true })
    }

    /// 序列化时不插入缩进和换行
    ///
    /// 用于包含外部内容的文档，文本和内联元素之间的空白保持原样。
    pub fn without_indent(mut self) -> Self {
        self.indent = false;
        self
    }

    /// 根元素
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// 序列化为字节（UTF-8，带XML声明，默认两空格缩进）
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = if self.indent {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
        } else {
            Writer::new(Cursor::new(Vec::new()))
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if !self.indent {
            io::Write::write_all(writer.get_mut(), b"\n")?;
        }
        write_element(&mut writer, &self.root)?;

        let mut bytes = writer.into_inner().into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// 序列化为字符串
    pub fn to_xml_string(&self) -> Result<String> {
        let bytes = self.to_bytes()?;
        String::from_utf8(bytes)
            .map_err(|e| EpubError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// 序列化并写入文件
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(EpubError::at(path))
    }
}

fn validate<'a>(element: &'a Element, scopes: &mut Vec<Vec<&'a str>>) -> Result<()> {
    if !is_valid_name(&element.name) {
        return Err(EpubError::InvalidXmlName(element.name.clone()));
    }

    let mut declared = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for (prefix, _) in &element.namespaces {
        let key = match prefix {
            Some(prefix) => {
                if !is_ncname(prefix) {
                    return Err(EpubError::InvalidXmlName(prefix.clone()));
                }
                declared.push(prefix.as_str());
                format!("xmlns:{}", prefix)
            }
            None => "xmlns".to_string(),
        };
        if seen.contains(&key) {
            return Err(EpubError::DuplicateAttribute {
                attribute: key,
                element: element.name.clone(),
            });
        }
        seen.push(key);
    }
    scopes.push(declared);

    check_prefix(&element.name, &element.name, scopes)?;
    for (name, _) in &element.attributes {
        if !is_valid_name(name) {
            return Err(EpubError::InvalidXmlName(name.clone()));
        }
        if seen.iter().any(|s| s == name) {
            return Err(EpubError::DuplicateAttribute {
                attribute: name.clone(),
                element: element.name.clone(),
            });
        }
        check_prefix(name, &element.name, scopes)?;
        seen.push(name.clone());
    }

    for child in element.child_elements() {
        validate(child, scopes)?;
    }
    scopes.pop();
    Ok(())
}

fn check_prefix(name: &str, element: &str, scopes: &[Vec<&str>]) -> Result<()> {
    let Some((prefix, _)) = name.split_once(':') else {
        return Ok(());
    };
    if prefix == XML_PREFIX || scopes.iter().any(|scope| scope.contains(&prefix)) {
        return Ok(());
    }
    Err(EpubError::UndeclaredPrefix {
        prefix: prefix.to_string(),
        element: element.to_string(),
    })
}

fn is_valid_name(name: &str) -> bool {
    let mut parts = name.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), None, None) => is_ncname(local),
        (Some(prefix), Some(local), None) => is_ncname(prefix) && is_ncname(local),
        _ => false,
    }
}

fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (prefix, uri) in &element.namespaces {
        let key = match prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        start.push_attribute((key.as_str(), uri.as_str()));
    }
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// 将标记片段解析为节点序列
///
/// 片段可以包含多个顶层元素和文本。注释、处理指令和DOCTYPE被丢弃，
/// 顶层的纯空白文本被忽略，元素内部的空白原样保留。
/// 文本和属性值中的HTML5命名实体（如 `&nbsp;`）被解析为对应字符。
///
/// # 参数
/// * `markup` - 外部传入的XHTML片段
///
/// # 返回值
/// * `Result<Vec<Node>>` - 顶层节点列表，标签不匹配或未闭合时返回 `MalformedFragment`
pub fn parse_fragment(markup: &str) -> Result<Vec<Node>> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().check_end_names = true;

    let malformed = |e: &dyn std::fmt::Display| EpubError::MalformedFragment(e.to_string());

    let mut top_level = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| malformed(&e))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
                for attr_result in e.attributes() {
                    let attr = attr_result.map_err(|e| malformed(&e))?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr
                        .unescape_value_with(resolve_html5_entity)
                        .map_err(|e| malformed(&e))?
                        .into_owned();
                    element = if key == "xmlns" {
                        element.namespace(value)
                    } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                        element.prefixed_namespace(prefix, value)
                    } else {
                        element.attr(key, value)
                    };
                }
                if matches!(event, Event::Start(_)) {
                    stack.push(element);
                } else {
                    attach(&mut stack, &mut top_level, Node::Element(element));
                }
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let element = stack
                    .pop()
                    .ok_or_else(|| EpubError::MalformedFragment(format!("多余的结束标签 </{}>", name)))?;
                if element.name != name {
                    return Err(EpubError::MalformedFragment(format!(
                        "结束标签 </{}> 与 <{}> 不匹配",
                        name, element.name
                    )));
                }
                attach(&mut stack, &mut top_level, Node::Element(element));
            }
            Event::Text(ref e) => {
                let text = e.unescape_with(resolve_html5_entity).map_err(|e| malformed(&e))?;
                if !stack.is_empty() || !text.trim().is_empty() {
                    attach(&mut stack, &mut top_level, Node::Text(text.into_owned()));
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                attach(&mut stack, &mut top_level, Node::Text(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(EpubError::MalformedFragment(format!("元素 <{}> 未闭合", open.name)));
    }
    Ok(top_level)
}

fn attach(stack: &mut [Element], top_level: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top_level.push(node),
    }
}
