//! Markup builder
//!
//! View templates build `Element` trees with a chained builder, mirroring
//! the attribute/class/text structure of HTML markup.

use std::collections::BTreeMap;

use crate::model::FileUpload;

/// A markup node, not yet attached to a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    /// Current value of form controls
    pub value: String,
    /// Selected files of a file input
    pub files: Vec<FileUpload>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder method: set the `id` attribute
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Builder method: set the `data-testid` attribute
    pub fn test_id(self, test_id: impl Into<String>) -> Self {
        self.attr("data-testid", test_id)
    }

    /// Builder method: set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder method: mark a form control as required
    pub fn required(self) -> Self {
        self.attr("required", "")
    }

    /// Builder method: add whitespace-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    /// Builder method: set text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method: set the initial value of a form control
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Builder method: append a child
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder method: append several children
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Builder method: append a child when present
    pub fn child_opt(mut self, child: Option<Element>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Depth-first search for a descendant (or self) with the given test id
    pub fn find_by_test_id(&self, test_id: &str) -> Option<&Element> {
        if self.get_attribute("data-testid") == Some(test_id) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|c| c.find_by_test_id(test_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let el = Element::new("input")
            .id("file")
            .test_id("file")
            .attr("type", "file")
            .class("form-control blue-border")
            .required();

        assert_eq!(el.get_attribute("id"), Some("file"));
        assert_eq!(el.get_attribute("required"), Some(""));
        assert_eq!(el.classes, vec!["form-control", "blue-border"]);
    }

    #[test]
    fn test_find_by_test_id() {
        let tree = Element::new("div").child(
            Element::new("form")
                .test_id("form-new-bill")
                .child(Element::new("button").test_id("btn-send-bill")),
        );

        assert!(tree.find_by_test_id("btn-send-bill").is_some());
        assert!(tree.find_by_test_id("missing").is_none());
    }
}
