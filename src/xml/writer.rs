use std::fmt::Display;
use std::io::{self, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Element writer producing the layout the [`EventParser`](super::EventParser)
/// reads back: one element per line, two-space indent, leaf values inline
pub(crate) struct XmlOut<W: Write> {
    writer: Writer<W>,
    depth: usize,
}

impl<W: Write> XmlOut<W> {
    pub(crate) fn new(inner: W) -> io::Result<Self> {
        let mut writer = Writer::new(inner);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer, depth: 0 })
    }

    fn newline(&mut self) -> io::Result<()> {
        let pad = format!("\n{}", "  ".repeat(self.depth));
        self.writer.write_event(Event::Text(BytesText::from_escaped(pad)))
    }

    fn inline(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::new(value)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn open(&mut self, name: &str) -> io::Result<()> {
        self.newline()?;
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn close(&mut self, name: &str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.newline()?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))
    }

    /// `<name>value</name>` on its own line
    pub(crate) fn leaf(&mut self, name: &str, value: impl Display) -> io::Result<()> {
        self.newline()?;
        self.inline(name, &value.to_string())
    }

    /// `<name><i>i</i>[<j>j</j>]value</name>` on its own line
    pub(crate) fn indexed(&mut self, name: &str, i: usize, j: Option<usize>, value: f64) -> io::Result<()> {
        self.newline()?;
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.inline("i", &i.to_string())?;
        if let Some(j) = j {
            self.inline("j", &j.to_string())?;
        }
        self.writer
            .write_event(Event::Text(BytesText::new(&value.to_string())))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn finish(mut self) -> io::Result<W> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped("\n")))?;
        Ok(self.writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut out = XmlOut::new(Vec::new()).unwrap();
        out.open("MixtureGD").unwrap();
        out.leaf("id", "a<b").unwrap();
        out.indexed("covInv", 1, Some(0), 0.5).unwrap();
        out.close("MixtureGD").unwrap();
        let text = String::from_utf8(out.finish().unwrap()).unwrap();

        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <MixtureGD>\n  \
             <id>a&lt;b</id>\n  \
             <covInv><i>1</i><j>0</j>0.5</covInv>\n\
             </MixtureGD>\n"
        );
    }
}
