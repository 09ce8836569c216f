use std::io::Write;

use crate::utils::{conf::WriterConfig, error::PogResult};

struct Frame {
    name: String,
    has_elements: bool,
    // No layout whitespace is written inside an element that carries text.
    has_text: bool,
}

/// Streaming markup emitter.
///
/// Elements are opened and closed explicitly; attributes must be pushed right after
/// [`XmlPrinter::open_element`], before any text or child element. An element that
/// receives neither text nor children is written self-closed.
///
/// ```
/// # use pogcore::markup::XmlPrinter;
/// # use pogcore::utils::conf::WriterConfig;
/// let mut printer = XmlPrinter::new(Vec::new(), &WriterConfig { indent: 0, xml_declaration: false });
/// printer.open_element("Define").unwrap();
/// printer.push_attribute("name", "ctx").unwrap();
/// printer.close_element().unwrap();
/// let bytes = printer.finish().unwrap();
/// assert_eq!(String::from_utf8(bytes).unwrap(), "<Define name=\"ctx\"/>\n");
/// ```
pub struct XmlPrinter<W: Write> {
    out: W,
    stack: Vec<Frame>,
    tag_open: bool,
    wrote_anything: bool,
    pending_declaration: bool,
    indent: usize,
}

impl<W: Write> XmlPrinter<W> {
    pub fn new(out: W, config: &WriterConfig) -> Self {
        Self {
            out,
            stack: Vec::new(),
            tag_open: false,
            wrote_anything: false,
            // Deferred to the first write so that `new` stays infallible.
            pending_declaration: config.xml_declaration,
            indent: config.indent,
        }
    }

    fn write_declaration_if_pending(&mut self) -> PogResult<()> {
        if self.pending_declaration {
            self.pending_declaration = false;
            self.out
                .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
            self.wrote_anything = true;
        }
        Ok(())
    }

    fn close_start_tag(&mut self) -> PogResult<()> {
        if self.tag_open {
            self.out.write_all(b">")?;
            self.tag_open = false;
        }
        Ok(())
    }

    fn newline_and_indent(&mut self, depth: usize) -> PogResult<()> {
        if self.indent > 0 {
            if self.wrote_anything {
                self.out.write_all(b"\n")?;
            }
            for _ in 0..depth * self.indent {
                self.out.write_all(b" ")?;
            }
        }
        Ok(())
    }

    /// Start a new element nested in the current one.
    pub fn open_element(&mut self, name: &str) -> PogResult<()> {
        self.write_declaration_if_pending()?;
        self.close_start_tag()?;

        let inline = match self.stack.last_mut() {
            Some(parent) => {
                parent.has_elements = true;
                parent.has_text
            }
            None => false,
        };
        if !inline {
            self.newline_and_indent(self.stack.len())?;
        }

        write!(self.out, "<{}", name)?;
        self.stack.push(Frame {
            name: name.to_string(),
            has_elements: false,
            has_text: false,
        });
        self.tag_open = true;
        self.wrote_anything = true;
        Ok(())
    }

    /// Add an attribute to the element that was just opened.
    pub fn push_attribute(&mut self, name: &str, value: &str) -> PogResult<()> {
        debug_assert!(
            self.tag_open,
            "attributes must be pushed before any content of the element"
        );
        write!(self.out, " {}=\"{}\"", name, escape_xml(value))?;
        Ok(())
    }

    /// Append text content to the current element.
    pub fn push_text(&mut self, text: &str) -> PogResult<()> {
        self.close_start_tag()?;
        if let Some(frame) = self.stack.last_mut() {
            frame.has_text |= !text.is_empty();
        }
        self.out.write_all(escape_xml(text).as_bytes())?;
        Ok(())
    }

    /// Close the innermost open element.
    pub fn close_element(&mut self) -> PogResult<()> {
        let frame = self
            .stack
            .pop()
            .expect("close_element called without a matching open_element");

        if self.tag_open {
            self.out.write_all(b"/>")?;
            self.tag_open = false;
        } else {
            if frame.has_elements && !frame.has_text {
                self.newline_and_indent(self.stack.len())?;
            }
            write!(self.out, "</{}>", frame.name)?;
        }
        Ok(())
    }

    /// Terminate the output with a newline, flush it and hand back the sink.
    pub fn finish(mut self) -> PogResult<W> {
        debug_assert!(self.stack.is_empty(), "unclosed elements at end of output");
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}
