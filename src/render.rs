//! Turning a decoded body into elements under a container.

use crate::dom::{Document, NodeId};
use crate::error::PageError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    /// Goes into the `src` attribute instead of the text.
    Src(String),
}

/// One element to create: its tag and what to put in it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub tag: &'static str,
    pub content: Content,
}

impl NodeSpec {
    pub fn text(tag: &'static str, text: impl Into<String>) -> Self {
        Self {
            tag,
            content: Content::Text(text.into()),
        }
    }

    pub fn src(tag: &'static str, src: impl Into<String>) -> Self {
        Self {
            tag,
            content: Content::Src(src.into()),
        }
    }
}

/// Elements belonging to one record, appended together.
pub type Group = Vec<NodeSpec>;

/// Maps a decoded body to the element groups to render, in order.
pub type Extractor = fn(&Value) -> Vec<Group>;

/// Text for `body[key]`. Missing fields and `null` render empty, strings
/// render as-is, anything else in its JSON form.
pub fn field_text(body: &Value, key: &str) -> String {
    match body.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// The array under `body[key]`, or nothing when it is absent or not an array.
pub fn records<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Creates fresh elements for every group and appends them to `container`.
///
/// The container is looked up before anything is created, so a bad selector
/// leaves the document untouched. Returns the new nodes in append order.
pub fn render_groups(
    doc: &mut Document,
    container: &str,
    groups: &[Group],
) -> Result<Vec<NodeId>, PageError> {
    let target = doc
        .query_selector(container)
        .ok_or_else(|| PageError::MissingElement(container.to_string()))?;

    let mut created = Vec::with_capacity(groups.iter().map(Vec::len).sum());
    for group in groups {
        for spec in group {
            let node = doc.create_element(spec.tag);
            doc.append(target, node);
            match &spec.content {
                Content::Text(text) => doc.set_text(node, text.as_str()),
                Content::Src(src) => doc.set_attribute(node, "src", src.as_str()),
            }
            created.push(node);
        }
    }
    Ok(created)
}
