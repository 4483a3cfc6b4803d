//! Minimal XML element tree
//!
//! Reports are small enough to hold in memory, so converters and validators
//! work on a plain element tree built with quick-xml instead of streaming.

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use xunit_core::{CoreError, CoreResult};

/// An XML element with its attributes, child elements and concatenated text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Text and CDATA content directly under this element.
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute, keeping its original position.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Trimmed text content.
    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Parse a whole document and return its root element.
    pub fn parse_str(content: &str) -> CoreResult<XmlElement> {
        let mut reader = Reader::from_str(content);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => stack.push(element_from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CoreError::parse("Unexpected closing tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(top) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| CoreError::parse(format!("Invalid text content: {}", e)))?;
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(CoreError::parse(format!(
                        "XML parse error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(CoreError::parse("Unexpected end of document: unclosed element"));
        }
        root.ok_or_else(|| CoreError::parse("Document has no root element"))
    }

    pub fn parse_file(path: &Path) -> CoreResult<XmlElement> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Serialize as an indented document with an XML declaration.
    pub fn to_xml_string(&self) -> CoreResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;
        self.write_into(&mut writer)?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| CoreError::parse(format!("Generated XML is not UTF-8: {}", e)))
    }

    pub fn write_file(&self, path: &Path) -> CoreResult<()> {
        let content = self.to_xml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn write_into<W: std::io::Write>(&self, writer: &mut Writer<W>) -> CoreResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let text = self.text_trimmed();
        if self.children.is_empty() && text.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(xml_err)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(xml_err)?;
        if !text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_err)?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(xml_err)?;
        Ok(())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> CoreResult<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| CoreError::parse(format!("Invalid attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| CoreError::parse(format!("Invalid attribute value: {}", e)))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> CoreResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(CoreError::parse("Document has more than one root element"));
    }
    *root = Some(element);
    Ok(())
}

fn xml_err<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::parse(format!("XML write error: {}", err))
}
