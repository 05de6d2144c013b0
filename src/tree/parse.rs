//! Loading a [`Document`] from XML source.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Document, Element};
use crate::error::{Error, Result};
use crate::util::{decode_text, extract_xml_encoding};

impl Document {
    /// Parse a document from a string.
    ///
    /// Comments, processing instructions and the doctype are dropped.
    /// Character references and the five predefined entities are resolved;
    /// other named entities are kept as literal `&name;` text.
    pub fn parse(source: &str) -> Result<Document> {
        let mut reader = Reader::from_str(source);
        // End tags are matched against our own stack below.
        reader.config_mut().check_end_names = false;
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if root.is_some() {
                        return Err(Error::Malformed("content after the root element".into()));
                    }
                    stack.push(start_element(&e));
                }
                Ok(Event::Empty(e)) => {
                    let element = start_element(&e);
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(e)) => {
                    let name = e.name();
                    let name = String::from_utf8_lossy(name.as_ref());
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Malformed(format!("unexpected </{name}>")))?;
                    if element.name() != name {
                        return Err(Error::Malformed(format!(
                            "expected </{}>, found </{name}>",
                            element.name()
                        )));
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let entity = String::from_utf8_lossy(e.as_ref());
                        match resolve_entity(&entity) {
                            Some(resolved) => parent.push_text(&resolved),
                            None => {
                                tracing::debug!(%entity, "keeping unknown entity as text");
                                parent.push_text(&format!("&{entity};"));
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::Malformed(format!("unclosed <{}>", open.name())));
        }
        root.map(Document::new)
            .ok_or_else(|| Error::Malformed("no root element".into()))
    }

    /// Parse a document from raw bytes, honoring the declared encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Document> {
        let text = decode_text(bytes, extract_xml_encoding(bytes));
        Document::parse(text.trim_start_matches('\u{feff}'))
    }

    /// Read and parse a document from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loading document");
        Document::from_bytes(&bytes)
    }
}

fn start_element(e: &BytesStart<'_>) -> Element {
    let name = e.name();
    let mut element = Element::new(String::from_utf8_lossy(name.as_ref()));
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned(), Cow::into_owned);
        element.push_attr(key, value);
    }
    element
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(Error::Malformed("multiple root elements".into()))
    }
}

fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        "nbsp" => return Some("\u{a0}".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Content;
    use crate::vocab::Tag;

    #[test]
    fn test_parse_mixed_content() {
        let doc = Document::parse(r#"<p>He said <quote>no</quote>.</p>"#).unwrap();
        let p = doc.root();
        assert_eq!(p.content().len(), 3);
        assert_eq!(p.content()[0], Content::Text("He said ".into()));
        assert_eq!(p.text(), "He said no.");
    }

    #[test]
    fn test_parse_entities_merge_into_text() {
        let doc = Document::parse("<p>Tom &amp; Jerry &#8212; &#x2019;s</p>").unwrap();
        let p = doc.root();
        assert_eq!(p.content().len(), 1);
        assert_eq!(p.text(), "Tom & Jerry \u{2014} \u{2019}s");
    }

    #[test]
    fn test_parse_attributes_and_namespaces() {
        let src = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0" xml:lang="de">
            <text><body><div xml:id="c1" rend="a &amp; b"/></body></text></TEI>"#;
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.language(), "de");
        assert!(doc.root().attr("xmlns").is_none());
        let div = doc.find(Tag::Div).unwrap();
        assert_eq!(div.id(), Some("c1"));
        assert_eq!(div.rend(), "a & b");
    }

    #[test]
    fn test_parse_ignores_comments_and_pis() {
        let src = "<?xml version=\"1.0\"?><!-- note --><p>a<!-- x -->b<?pi x?></p>";
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.root().content(), &[Content::Text("ab".into())]);
    }

    #[test]
    fn test_parse_cdata_kept_verbatim() {
        let doc = Document::parse("<p><![CDATA[a < b]]></p>").unwrap();
        assert_eq!(doc.root().text(), "a < b");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Document::parse("<p><hi>x</p>").is_err());
        assert!(Document::parse("<p>").is_err());
        assert!(Document::parse("   ").is_err());
        assert!(Document::parse("<a/><b/>").is_err());
    }

    #[test]
    fn test_from_bytes_declared_encoding() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><p>caf"#.to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</p>");
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.root().text(), "caf\u{e9}");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp").as_deref(), Some("&"));
        assert_eq!(resolve_entity("#65").as_deref(), Some("A"));
        assert_eq!(resolve_entity("#x41").as_deref(), Some("A"));
        assert_eq!(resolve_entity("mdash"), None);
    }
}
