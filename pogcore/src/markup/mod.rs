//! Markup layer
//!
//! The codec never looks at raw XML. Documents are first parsed into an owned,
//! read-only [`Element`] tree (see [`parse_document`]) and written back through the
//! streaming [`XmlPrinter`]. Parsing is delegated to `xml5ever` with the
//! `markup5ever_rcdom` tree sink; the resulting DOM is converted once and then
//! dropped.
//!
//! Only elements, attributes and text survive the conversion. Comments, processing
//! instructions (including the `<?xml ...?>` header) and whitespace-only text are
//! discarded.
//!
//! XML5 recovers from input that XML 1.0 rejects. Tokens are therefore checked on their
//! way to the tree builder: end tags must match the innermost open element, every
//! element must be closed before the end of input, and attribute values may not hold a
//! raw `<`. Violations are reported like any other parse error.
use std::{borrow::Cow, cell::RefCell, path::Path, str::FromStr};

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use smallvec::SmallVec;
use xml5ever::{
    QualName,
    buffer_queue::BufferQueue,
    tendril::StrTendril,
    tokenizer::{ProcessResult, TagKind, Token, TokenSink, XmlTokenizer},
    tree_builder::{TreeSink, XmlTreeBuilder},
};

use crate::utils::error::{PogError, PogResult};

pub mod printer;

pub use printer::XmlPrinter;

/// An element of a parsed markup document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: SmallVec<[(String, String); 4]>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Create an element without attributes, text or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: append an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concatenated text content of this element (excluding descendants). Empty when the
    /// element holds no text or only whitespace.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Fetch a required attribute.
    pub fn require_attribute(&self, name: &str) -> PogResult<&str> {
        self.attribute(name)
            .ok_or_else(|| PogError::missing_attribute(&self.name, name))
    }

    /// Fetch the first child element with the given name, failing if there is none.
    pub fn require_child(&self, name: &str) -> PogResult<&Element> {
        self.first_child(name)
            .ok_or_else(|| PogError::missing_element(&self.name, name))
    }

    /// Return the child elements if there are exactly `N` of them.
    pub fn exact_children<const N: usize>(&self) -> PogResult<[&Element; N]> {
        let children: Vec<&Element> = self.children.iter().collect();
        children.try_into().map_err(|_| PogError::ChildCount {
            tag: self.name.clone(),
            expected: N,
            found: self.children.len(),
        })
    }

    /// Return the only child element, used by wrapper elements such as `Hypothesis`.
    pub fn single_child(&self) -> PogResult<&Element> {
        let [child] = self.exact_children::<1>()?;
        Ok(child)
    }

    /// Parse an optional decimal attribute.
    pub fn parse_attribute<T: FromStr>(&self, name: &str) -> PogResult<Option<T>> {
        self.attribute(name)
            .map(|value| {
                value.trim().parse::<T>().map_err(|_| PogError::InvalidInteger {
                    tag: self.name.clone(),
                    attribute: name.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// Parse a required decimal attribute.
    pub fn require_parsed_attribute<T: FromStr>(&self, name: &str) -> PogResult<T> {
        self.parse_attribute(name)?
            .ok_or_else(|| PogError::missing_attribute(&self.name, name))
    }

    /// Parse an optional hash attribute. Decimal and `0x`-prefixed hexadecimal are
    /// accepted; an absent attribute yields `0`.
    pub fn hash_attribute(&self, name: &str) -> PogResult<u64> {
        let Some(value) = self.attribute(name) else {
            return Ok(0);
        };

        let trimmed = value.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };

        parsed.map_err(|_| PogError::InvalidInteger {
            tag: self.name.clone(),
            attribute: name.to_string(),
            value: value.to_string(),
        })
    }

    fn from_handle(handle: &Handle) -> Option<Self> {
        let NodeData::Element { name, attrs, .. } = &handle.data else {
            return None;
        };

        let mut element = Element::new(&*name.local);
        for attr in attrs.borrow().iter() {
            element
                .attributes
                .push((attr.name.local.to_string(), attr.value.to_string()));
        }

        for child in handle.children.borrow().iter() {
            match &child.data {
                NodeData::Element { .. } => element.children.extend(Self::from_handle(child)),
                NodeData::Text { contents } => element.text.push_str(&contents.borrow()),
                _ => {}
            }
        }

        if element.text.trim().is_empty() {
            element.text.clear();
        }

        Some(element)
    }
}

/// Token sink placed in front of the tree builder that rejects what XML 1.0 forbids
/// but XML5 repairs silently.
struct WellFormed<S> {
    inner: S,
    open: RefCell<Vec<QualName>>,
}

impl<S: TokenSink> WellFormed<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            open: RefCell::new(Vec::new()),
        }
    }

    fn violation(&self, message: String) {
        let _ = self.inner.process_token(Token::ParseError(Cow::Owned(message)));
    }

    fn check(&self, token: &Token) {
        let Token::Tag(tag) = token else {
            return;
        };

        match tag.kind {
            TagKind::StartTag | TagKind::EmptyTag => {
                if let Some(attr) = tag.attrs.iter().find(|attr| attr.value.contains('<')) {
                    self.violation(format!(
                        "Character '<' in value of attribute '{}' of '{}'",
                        attr.name.local, tag.name.local
                    ));
                }
                if tag.kind == TagKind::StartTag {
                    self.open.borrow_mut().push(tag.name.clone());
                }
            }
            TagKind::EndTag => {
                let top = self.open.borrow_mut().pop();
                match top {
                    Some(open) if open.prefix == tag.name.prefix && open.local == tag.name.local => {}
                    Some(open) => self.violation(format!(
                        "End tag '{}' does not match open element '{}'",
                        tag.name.local, open.local
                    )),
                    None => self.violation(format!("Unexpected end tag '{}'", tag.name.local)),
                }
            }
            TagKind::ShortTag => {
                self.open.borrow_mut().pop();
                self.violation("Short end tag '</>'".to_string());
            }
        }
    }
}

impl<S: TokenSink> TokenSink for WellFormed<S> {
    type Handle = S::Handle;

    fn process_token(&self, token: Token) -> ProcessResult<Self::Handle> {
        self.check(&token);
        self.inner.process_token(token)
    }

    fn end(&self) {
        let unclosed = self.open.borrow().last().map(|name| name.local.to_string());
        if let Some(name) = unclosed {
            self.violation(format!("Element '{}' is not closed", name));
        }
        self.inner.end();
    }
}

/// Parse markup text and return its root element.
///
/// `source_name` is only used in error messages (typically the file name).
pub fn parse_document(text: &str, source_name: &str) -> PogResult<Element> {
    let builder = XmlTreeBuilder::new(RcDom::default(), Default::default());
    let tokenizer = XmlTokenizer::new(WellFormed::new(builder), Default::default());

    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(text));
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    let dom: RcDom = tokenizer.sink.inner.sink.finish();

    let root = dom
        .document
        .children
        .borrow()
        .iter()
        .find_map(Element::from_handle)
        .ok_or_else(|| PogError::MissingRoot {
            found: "an empty document".to_string(),
        })?;

    if let Some(message) = dom.errors.borrow().first() {
        return Err(PogError::Markup {
            source_name: source_name.to_string(),
            message: message.to_string(),
        });
    }

    Ok(root)
}

/// Read a file and parse it with [`parse_document`].
pub fn parse_path(path: &Path) -> PogResult<Element> {
    let text = std::fs::read_to_string(path).map_err(|e| PogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_document(&text, &path.display().to_string())
}
