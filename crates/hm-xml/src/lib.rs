//! Read and write HMxml documents as a plain element tree using quick-xml.
//!
//! This crate knows nothing about the parameter schema: it turns text into
//! [`Element`]s that remember where they came from, and turns elements back
//! into indented XML. The typed mapping lives in `hm-model`.

mod element;
mod writer;

use core::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::trace;

pub use element::{Attribute, Element};
pub use writer::{write_document, WriteOptions};

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml: {message} ({position})")]
    Syntax { message: String, position: Position },
    #[error("xml: <{name}> opened at {position} is never closed")]
    Unclosed { name: String, position: Position },
    #[error("xml: document has no root element")]
    NoRoot,
    #[error("xml: unexpected content after the root element ({position})")]
    TrailingContent { position: Position },
    #[error("xml write: {0}")]
    Write(String),
}

/// One-based line and column (in bytes) of an element in its source.
///
/// Elements built in memory carry [`Position::UNKNOWN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const UNKNOWN: Position = Position { line: 0, column: 0 };

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}, column {}", self.line, self.column)
        } else {
            f.write_str("unknown position")
        }
    }
}

/// Byte offset to line/column lookup.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        LineIndex { starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[line.saturating_sub(1)];
        Position {
            line,
            column: offset - start + 1,
        }
    }
}

/// Parse a complete document and return its root element.
///
/// Comments, processing instructions, the XML declaration and doctype are
/// skipped. CDATA sections are treated as text. Whitespace-only text is
/// dropped and other text is trimmed.
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let lines = LineIndex::new(xml);
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event_into(&mut buf);
        let end = reader.buffer_position();
        match event {
            Ok(Event::Start(e)) => {
                let position = lines.position(end.saturating_sub(e.len() + 2));
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::TrailingContent { position });
                }
                stack.push(start_element(&e, position)?);
            }
            Ok(Event::Empty(e)) => {
                let position = lines.position(end.saturating_sub(e.len() + 3));
                let element = start_element(&e, position)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(XmlError::TrailingContent { position }),
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| XmlError::Syntax {
                    message: "closing tag without a matching opening tag".into(),
                    position: lines.position(end),
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| XmlError::Syntax {
                    message: err.to_string(),
                    position: lines.position(end),
                })?;
                append_text(&mut stack, &text, lines.position(end))?;
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                let text = String::from_utf8_lossy(&raw);
                append_text(&mut stack, &text, lines.position(end))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(XmlError::Syntax {
                    message: err.to_string(),
                    position: lines.position(reader.buffer_position()),
                })
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed {
            name: open.name,
            position: open.position,
        });
    }
    let root = root.ok_or(XmlError::NoRoot)?;
    trace!(root = %root.name, children = root.children.len(), "parsed xml tree");
    Ok(root)
}

fn start_element(event: &BytesStart<'_>, position: Position) -> Result<Element, XmlError> {
    let mut element = Element::new(String::from_utf8_lossy(event.name().as_ref()));
    element.position = position;
    for attr in event.attributes() {
        let attr = attr.map_err(|err| XmlError::Syntax {
            message: err.to_string(),
            position,
        })?;
        let value = attr.unescape_value().map_err(|err| XmlError::Syntax {
            message: err.to_string(),
            position,
        })?;
        element.attributes.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }
    Ok(element)
}

fn append_text(stack: &mut [Element], text: &str, position: Position) -> Result<(), XmlError> {
    let Some(current) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(XmlError::Syntax {
            message: "text outside the root element".into(),
            position,
        });
    };
    match current.text.as_mut() {
        Some(existing) => existing.push_str(text),
        None => current.text = Some(text.to_string()),
    }
    Ok(())
}
