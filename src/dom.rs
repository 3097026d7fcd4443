//! A small in-memory element tree standing in for the browser document.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Only what the lesson pages touch is supported: lookup by
//! `#id` or tag name, creating and appending elements, text, attributes
//! and the value of an input.

use std::collections::BTreeMap;
use std::fmt::Write as _;

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr", "meta"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    text: String,
    attributes: BTreeMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            text: String::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            body: NodeId(0),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element. It shows up in queries once appended.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Element with the given id, created and appended under `parent`.
    pub fn append_with_id(&mut self, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let node = self.create_element(tag);
        self.set_attribute(node, "id", id);
        self.append(parent, node);
        node
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    /// Replaces the node's content with plain text, like `innerText`.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.nodes[node.0].text = text.into();
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.into());
    }

    /// Current value of a form control. Unset reads as empty.
    pub fn value(&self, node: NodeId) -> &str {
        self.attribute(node, "value").unwrap_or("")
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        self.set_attribute(node, "value", value);
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// First attached element matching `selector` in document order.
    ///
    /// Supports `#id` and bare tag names.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        let matches = |el: &Element| match selector.strip_prefix('#') {
            Some(id) => el.attributes.get("id").map(String::as_str) == Some(id),
            None => el.tag.eq_ignore_ascii_case(selector),
        };

        let mut stack = vec![self.body];
        while let Some(id) = stack.pop() {
            let el = &self.nodes[id.0];
            if matches(el) {
                return Some(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        None
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(&mut out, self.body, 0);
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId, depth: usize) {
        let el = &self.nodes[node.0];
        let indent = "  ".repeat(depth);

        let _ = write!(out, "{indent}<{}", el.tag);
        for (name, value) in &el.attributes {
            let _ = write!(
                out,
                " {name}=\"{}\"",
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        out.push('>');

        if VOID_TAGS.contains(&el.tag.as_str()) {
            out.push('\n');
            return;
        }

        out.push_str(&html_escape::encode_text(&el.text));
        if el.children.is_empty() {
            let _ = writeln!(out, "</{}>", el.tag);
            return;
        }

        out.push('\n');
        for child in &el.children {
            self.write_node(out, *child, depth + 1);
        }
        let _ = writeln!(out, "{indent}</{}>", el.tag);
    }
}
