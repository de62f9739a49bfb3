//! Tag fragment parsing
//!
//! Uses html5ever's built-in RcDom and pulls the attributes of the first
//! element matching the requested tag name. The input is whatever string the
//! referencing page handed us, so it is parsed as a full (forgiving) HTML
//! document rather than validated.

use std::collections::HashMap;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Attribute view over a single parsed HTML tag.
///
/// Malformed input, or input that contains no element of the requested name,
/// yields a fragment where every attribute lookup returns absent. Callers
/// treat a missing `integrity` attribute as "no SRI declared", which is a
/// normal outcome, so there is no error path here.
#[derive(Debug, Clone, Default)]
pub struct TagFragment {
    attributes: Option<HashMap<String, String>>,
}

impl TagFragment {
    /// Parse a raw tag string and locate the first `tag_name` element in it.
    pub fn parse(raw: &str, tag_name: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut raw.as_bytes())
            .expect("HTML parsing should not fail");

        let attributes = find_element(&dom.document, tag_name);
        if attributes.is_none() {
            tracing::debug!(tag_name, "no matching element in tag fragment");
        }
        Self { attributes }
    }

    /// Whether the fragment contained a matching element at all.
    pub fn found(&self) -> bool {
        self.attributes.is_some()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Attribute value by name. Names are matched lowercase, the way the
    /// HTML parser stores them.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()?
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All attributes of the matched element.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Depth-first search for the first element with the given local name.
fn find_element(handle: &Handle, tag_name: &str) -> Option<HashMap<String, String>> {
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        if name.local.as_ref().eq_ignore_ascii_case(tag_name) {
            let map = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            return Some(map);
        }
    }

    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element(child, tag_name) {
            return Some(found);
        }
    }
    None
}
