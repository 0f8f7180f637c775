//! Minimal XML document tree for response bodies.
//!
//! XML is the API's default response format. [`XmlElement`] gives a small
//! navigable tree over a body without committing to a response schema.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

/// Reasons a body could not be read as an XML document.
#[derive(Debug, Error)]
pub enum XmlParseError {
    /// The underlying reader rejected the input.
    #[error("Malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// An attribute could not be decoded.
    #[error("Malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// The input does not consist of exactly one root element.
    #[error("Not an XML document: {reason}")]
    NotADocument {
        /// What was wrong with the document structure.
        reason: &'static str,
    },
}

/// An element of a parsed XML document.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::clients::XmlElement;
///
/// let doc = XmlElement::parse(
///     r#"<products currentPage="1"><product><sku>1234</sku></product></products>"#,
/// )
/// .unwrap();
///
/// assert_eq!(doc.name(), "products");
/// assert_eq!(doc.attribute("currentPage"), Some("1"));
/// let sku = doc.child("product").and_then(|p| p.child("sku")).unwrap();
/// assert_eq!(sku.text(), "1234");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses `input` as a document with a single root element.
    ///
    /// # Errors
    ///
    /// Returns [`XmlParseError`] if the input is not well-formed XML, is
    /// empty, has text outside the root, or has more than one root.
    pub fn parse(input: &str) -> Result<Self, XmlParseError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::attach(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(XmlParseError::NotADocument {
                        reason: "unbalanced end tag",
                    })?;
                    Self::attach(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    match stack.last_mut() {
                        Some(parent) => parent.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(XmlParseError::NotADocument {
                                reason: "text outside the root element",
                            })
                        }
                    }
                }
                Event::CData(data) => {
                    let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.text.push_str(&data),
                        None => {
                            return Err(XmlParseError::NotADocument {
                                reason: "CDATA outside the root element",
                            })
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlParseError::NotADocument {
                reason: "unclosed element",
            });
        }
        root.ok_or(XmlParseError::NotADocument {
            reason: "no root element",
        })
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attach(
        element: Self,
        stack: &mut [Self],
        root: &mut Option<Self>,
    ) -> Result<(), XmlParseError> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
            return Ok(());
        }
        if root.is_some() {
            return Err(XmlParseError::NotADocument {
                reason: "more than one root element",
            });
        }
        *root = Some(element);
        Ok(())
    }

    /// Returns the element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of attribute `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns all attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the element's own text, trimmed and unescaped.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the first child named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Returns all children named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<stores currentPage="1" total="2">
  <store>
    <storeId>281</storeId>
    <name>Brooklyn &amp; Queens</name>
  </store>
  <store><storeId>1</storeId><phone/></store>
</stores>"#;

    #[test]
    fn test_parses_nested_document() {
        let doc = XmlElement::parse(STORES).unwrap();
        assert_eq!(doc.name(), "stores");
        assert_eq!(doc.attribute("total"), Some("2"));
        assert_eq!(doc.children().len(), 2);

        let first = doc.child("store").unwrap();
        assert_eq!(first.child("storeId").unwrap().text(), "281");
        assert_eq!(first.child("name").unwrap().text(), "Brooklyn & Queens");

        let ids: Vec<&str> = doc
            .children_named("store")
            .filter_map(|s| s.child("storeId"))
            .map(XmlElement::text)
            .collect();
        assert_eq!(ids, vec!["281", "1"]);
    }

    #[test]
    fn test_empty_elements_are_children() {
        let doc = XmlElement::parse(STORES).unwrap();
        let second = doc.children_named("store").nth(1).unwrap();
        assert_eq!(second.child("phone").unwrap().text(), "");
    }

    #[test]
    fn test_cdata_becomes_text() {
        let doc = XmlElement::parse("<p><![CDATA[a < b]]></p>").unwrap();
        assert_eq!(doc.text(), "a < b");
    }

    #[test]
    fn test_json_body_is_not_a_document() {
        assert!(XmlElement::parse(r#"{"products":[]}"#).is_err());
    }

    #[test]
    fn test_malformed_and_empty_input_fail() {
        assert!(XmlElement::parse("").is_err());
        assert!(XmlElement::parse("<a><b></a>").is_err());
        assert!(XmlElement::parse("<a>").is_err());
        assert!(XmlElement::parse("<a/><b/>").is_err());
    }
}
