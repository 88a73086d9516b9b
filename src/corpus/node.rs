//! The validated annotation tree handed over by the external loader.
//!
//! Schema validation is not this crate's job: the loader/validator
//! collaborator parses the raw annotation document, checks it against the
//! corpus schema and hands the core an [`AnnotationNode`] tree. Nodes expose
//! their attributes as UTF-8 strings; this module supplies the typed
//! accessors that turn those strings into integers, labels and descriptor
//! vectors, failing with structural errors that name the offending element
//! and attribute.

use crate::core::{CorpusError, CorpusResult};
use std::collections::HashMap;
use std::str::FromStr;

/// A single element of the validated annotation tree.
#[derive(Debug, Clone, Default)]
pub struct AnnotationNode {
    name: String,
    attributes: HashMap<String, String>,
    text: Option<String>,
    children: Vec<AnnotationNode>,
}

impl AnnotationNode {
    /// Creates a new node with the given element name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets an attribute and returns the node.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the text content and returns the node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child node and returns the node.
    pub fn with_child(mut self, child: AnnotationNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the element name of this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text content of this node, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the child nodes of this node.
    pub fn children(&self) -> &[AnnotationNode] {
        &self.children
    }

    /// Returns the value of a required attribute.
    ///
    /// # Errors
    ///
    /// Returns a structural error naming this element and the attribute if
    /// the attribute is absent.
    pub fn attr(&self, attribute: &str) -> CorpusResult<&str> {
        self.attributes
            .get(attribute)
            .map(String::as_str)
            .ok_or_else(|| CorpusError::missing_attribute(&self.name, attribute))
    }

    /// Returns the value of a required attribute parsed into `T`.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the attribute is absent or its value
    /// fails to parse.
    pub fn parse_attr<T>(&self, attribute: &str) -> CorpusResult<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value = self.attr(attribute)?;
        value
            .parse()
            .map_err(|e| CorpusError::malformed_attribute(&self.name, attribute, value, e))
    }

    /// Decodes a required attribute holding a JSON-encoded descriptor vector.
    ///
    /// Descriptor payloads are opaque to the corpus; they are decoded into a
    /// `Vec<f32>` and passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the attribute is absent or its value is
    /// not a JSON array of numbers.
    pub fn descriptor_attr(&self, attribute: &str) -> CorpusResult<Vec<f32>> {
        let value = self.attr(attribute)?;
        serde_json::from_str(value)
            .map_err(|e| CorpusError::malformed_attribute(&self.name, attribute, value, e))
    }

    /// Iterates over all descendant nodes with the given element name, in
    /// document order.
    ///
    /// The search covers the entire subtree below this node (the node itself
    /// is never yielded), so intermediate wrapper elements between an entity
    /// and its children do not matter.
    pub fn descendants_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a AnnotationNode> + 'a {
        let mut stack: Vec<&AnnotationNode> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                stack.extend(node.children.iter().rev());
                if node.name == name {
                    return Some(node);
                }
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_accessors() {
        let node = AnnotationNode::new("video")
            .with_attr("fps", "25")
            .with_attr("uri", "https://example.com/video");
        assert_eq!(node.attr("uri").unwrap(), "https://example.com/video");
        assert_eq!(node.parse_attr::<u32>("fps").unwrap(), 25);
    }

    #[test]
    fn test_missing_attr_names_element_and_attribute() {
        let node = AnnotationNode::new("video");
        let error = node.attr("fps").unwrap_err();
        assert!(matches!(
            error,
            CorpusError::Structural { ref element, ref attribute, .. }
                if element == "video" && attribute == "fps"
        ));
    }

    #[test]
    fn test_malformed_attr_is_structural() {
        let node = AnnotationNode::new("video").with_attr("width", "wide");
        assert!(matches!(
            node.parse_attr::<u32>("width"),
            Err(CorpusError::Structural { .. })
        ));
    }

    #[test]
    fn test_descriptor_attr_decodes_json() {
        let node = AnnotationNode::new("page").with_attr("vgg256", "[0.5, 1.0, -2.25]");
        assert_eq!(node.descriptor_attr("vgg256").unwrap(), vec![0.5, 1.0, -2.25]);

        let broken = AnnotationNode::new("page").with_attr("vgg256", "not json");
        assert!(matches!(
            broken.descriptor_attr("vgg256"),
            Err(CorpusError::Structural { .. })
        ));
    }

    #[test]
    fn test_descendants_named_searches_whole_subtree_in_order() {
        let tree = AnnotationNode::new("dataset")
            .with_child(
                AnnotationNode::new("videos")
                    .with_child(AnnotationNode::new("video").with_attr("uri", "a"))
                    .with_child(
                        AnnotationNode::new("group")
                            .with_child(AnnotationNode::new("video").with_attr("uri", "b")),
                    ),
            )
            .with_child(AnnotationNode::new("video").with_attr("uri", "c"));

        let uris: Vec<&str> = tree
            .descendants_named("video")
            .map(|n| n.attr("uri").unwrap())
            .collect();
        assert_eq!(uris, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_descendants_named_excludes_self() {
        let node = AnnotationNode::new("video")
            .with_child(AnnotationNode::new("video").with_attr("uri", "inner"));
        assert_eq!(node.descendants_named("video").count(), 1);
    }
}
