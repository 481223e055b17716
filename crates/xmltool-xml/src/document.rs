//! XML documents: serialization and parsing.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::{Element, Error, Result};

/// An XML document with a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Create a document from its root element.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Get the root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Convert to an XML string.
    ///
    /// With `pretty` the output is indented by two spaces per level.
    pub fn to_xml_string(&self, pretty: bool) -> Result<String> {
        let mut output = Vec::new();
        self.write_xml(&mut output, pretty)?;
        Ok(String::from_utf8(output)?)
    }

    /// Write XML to a writer.
    pub fn write_xml<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let mut xml_writer = if pretty {
            Writer::new_with_indent(writer, b' ', 2)
        } else {
            Writer::new(writer)
        };

        xml_writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| Error::Xml(e.to_string()))?;

        write_element(&mut xml_writer, &self.root)?;

        if pretty {
            xml_writer.get_mut().write_all(b"\n")?;
        }

        Ok(())
    }

    /// Parse an XML string into a document.
    ///
    /// Whitespace-only text is dropped; comments, processing instructions and
    /// the declaration are ignored.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(start_element(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = start_element(&e)?;
                    attach(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(element) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        element.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(element) = stack.last_mut() {
                        element.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::Xml(format!("XML parse error: {}", e))),
            }
        }

        root.map(Self::new).ok_or(Error::NoRoot)
    }

    /// Parse XML bytes into a document.
    pub fn parse_bytes(xml: &[u8]) -> Result<Self> {
        let xml = String::from_utf8(xml.to_vec())?;
        Self::parse(&xml)
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| Error::Xml(e.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Write a single element and its children.
fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Xml(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Xml(e.to_string()))?;

    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|e| Error::Xml(e.to_string()))?;
    }

    for child in &element.children {
        write_element(writer, child)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| Error::Xml(e.to_string()))
}
