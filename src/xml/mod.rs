//! Streaming structural parser for tag-nested model files
//!
//! The parser never builds a document tree. It walks the input once and
//! reports two events to an [`ElementHandler`]:
//!
//! - `open_element(path)` when a tag opens,
//! - `close_element(path, value)` when it closes, with the text found directly
//!   inside the element (child elements excluded), trimmed.
//!
//! The parser knows nothing about the schema. Handlers validate structure and
//! may refuse any event with a [`Violation`]; the refusal is reported with the
//! current line number.
//!
//! ```
//! use gmmio::xml::{ElementHandler, EventParser, TagPath, Violation};
//!
//! #[derive(Default)]
//! struct Weights(Vec<f64>);
//!
//! impl ElementHandler for Weights {
//!     fn open_element(&mut self, _path: &TagPath) -> Result<(), Violation> {
//!         Ok(())
//!     }
//!
//!     fn close_element(&mut self, path: &TagPath, value: &str) -> Result<(), Violation> {
//!         if path.last() == Some("weight") {
//!             let w = value.parse().map_err(|_| Violation::new("bad weight"))?;
//!             self.0.push(w);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let xml = "<m><weight>0.25</weight><weight>0.75</weight></m>";
//! let mut weights = Weights::default();
//! EventParser::new(xml.as_bytes()).parse(&mut weights).unwrap();
//! assert_eq!(weights.0, vec![0.25, 0.75]);
//! ```

use std::io::Read;

use quick_xml::events::Event;
use quick_xml::Reader;

pub use error::{Violation, XmlError};
pub use path::TagPath;

pub(crate) use field::{check_version, parse_value, Field};
pub(crate) use writer::XmlOut;
use line::LineTracker;

mod error;
mod field;
mod line;
mod path;
mod writer;

#[cfg(test)]
mod tests;

/// Receives element events from an [`EventParser`]
pub trait ElementHandler {
    /// An element opened; `path` ends with its name
    fn open_element(&mut self, path: &TagPath) -> Result<(), Violation>;

    /// An element closed; `value` is its own trimmed text content
    fn close_element(&mut self, path: &TagPath, value: &str) -> Result<(), Violation>;
}

/// Pull parser driving an [`ElementHandler`]
pub struct EventParser<R: Read> {
    reader: Reader<LineTracker<R>>,
    path: TagPath,
    texts: Vec<String>,
    line: u64,
}

impl<R: Read> EventParser<R> {
    /// Create a parser over `input`
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(LineTracker::new(input));
        reader.config_mut().trim_text(true);

        Self {
            reader,
            path: TagPath::new(),
            texts: Vec::new(),
            line: 1,
        }
    }

    /// Line of the last event delivered
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Stream the whole input through `handler`
    pub fn parse<H: ElementHandler>(mut self, handler: &mut H) -> Result<(), XmlError> {
        let mut buf = Vec::new();
        loop {
            let event = self.reader.read_event_into(&mut buf);
            let position = self.reader.buffer_position() as u64;
            self.line = self.reader.get_mut().line_at(position);

            match event {
                Ok(Event::Start(ref e)) => {
                    let name = self.element_name(e.name().as_ref())?;
                    self.open(name, handler)?;
                }
                Ok(Event::Empty(ref e)) => {
                    let name = self.element_name(e.name().as_ref())?;
                    self.open(name, handler)?;
                    self.close(handler)?;
                }
                Ok(Event::End(ref e)) => {
                    let name = self.element_name(e.name().as_ref())?;
                    if self.path.last() != Some(name.as_str()) {
                        return Err(self.malformed(format!(
                            "closing tag </{name}> does not match {}",
                            self.path
                        )));
                    }
                    self.close(handler)?;
                }
                Ok(Event::Text(ref t)) => {
                    let text = t.unescape().map_err(|e| self.malformed(e))?;
                    self.append_text(&text)?;
                }
                Ok(Event::CData(ref c)) => {
                    let text = std::str::from_utf8(c).map_err(|e| self.malformed(e))?;
                    self.append_text(text)?;
                }
                Ok(Event::Eof) => {
                    if !self.path.is_empty() {
                        return Err(XmlError::UnexpectedEof {
                            line: self.line,
                            open: self.path.to_string(),
                        });
                    }
                    return Ok(());
                }
                // declarations, comments, processing instructions, doctype
                Ok(_) => {}
                Err(quick_xml::Error::Io(e)) => {
                    return Err(XmlError::Io(std::io::Error::new(e.kind(), e.to_string())));
                }
                Err(e) => return Err(self.malformed(e)),
            }
            buf.clear();
        }
    }

    fn open<H: ElementHandler>(&mut self, name: String, handler: &mut H) -> Result<(), XmlError> {
        self.path.push(name);
        self.texts.push(String::new());
        handler
            .open_element(&self.path)
            .map_err(|v| self.rejected(v))
    }

    fn close<H: ElementHandler>(&mut self, handler: &mut H) -> Result<(), XmlError> {
        let text = self.texts.pop().unwrap_or_default();
        handler
            .close_element(&self.path, text.trim())
            .map_err(|v| self.rejected(v))?;
        self.path.pop();
        Ok(())
    }

    fn append_text(&mut self, text: &str) -> Result<(), XmlError> {
        match self.texts.last_mut() {
            Some(current) => {
                current.push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(self.malformed("text outside the root element")),
        }
    }

    fn element_name(&self, raw: &[u8]) -> Result<String, XmlError> {
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|e| self.malformed(e))
    }

    fn malformed(&self, message: impl std::fmt::Display) -> XmlError {
        XmlError::Malformed {
            line: self.line,
            message: message.to_string(),
        }
    }

    fn rejected(&self, violation: Violation) -> XmlError {
        XmlError::Rejected {
            line: self.line,
            message: violation.0,
        }
    }
}
