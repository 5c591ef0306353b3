use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::ConfigNode;

/// Errors that can occur while loading a configuration tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse configuration XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Input bytes were not valid UTF-8 for tag/attribute/text extraction.
    #[error("invalid UTF-8 in configuration: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to decode text entity or bytes.
    #[error("failed to decode configuration text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Failed to read input file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// Structural issue in the document.
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Parse configuration XML bytes into a [`ConfigNode`] tree.
///
/// Leaf text is trimmed; whitespace-only text is dropped.
pub fn parse(xml: &[u8]) -> Result<ConfigNode, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<ConfigNode> = Vec::new();
    let mut root: Option<ConfigNode> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => stack.push(start_node(&e)?),
            Event::Empty(e) => {
                let node = start_node(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                append_text(&mut stack, &text);
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(e.as_ref())?;
                append_text(&mut stack, text);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("closing tag without open tag".to_string())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Malformed(format!(
            "element <{}> is not closed",
            open.tag
        )));
    }

    root.ok_or_else(|| ParseError::Malformed("no root element found".to_string()))
}

/// Parse a configuration file into a [`ConfigNode`] tree.
pub fn parse_file(path: &Path) -> Result<ConfigNode, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

fn attach(
    stack: &mut [ConfigNode],
    root: &mut Option<ConfigNode>,
    node: ConfigNode,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::Malformed(
            "multiple top-level elements found".to_string(),
        ));
    }
    *root = Some(node);
    Ok(())
}

fn append_text(stack: &mut [ConfigNode], text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let Some(current) = stack.last_mut() else {
        return;
    };
    match &mut current.text {
        Some(existing) => existing.push_str(text),
        None => current.text = Some(text.to_string()),
    }
}

fn start_node(e: &BytesStart<'_>) -> Result<ConfigNode, ParseError> {
    Ok(ConfigNode::new(qname_to_string(e.name())?))
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}
