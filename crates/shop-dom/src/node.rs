//! Detached UI trees.
//!
//! Renderers build `VNode` values without touching a live document, which
//! keeps them pure and testable. A `Document` materializes them later.

/// A detached UI node.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    /// An element with tag, class markers, attributes and children.
    Element(VElement),
    /// A text node.
    Text(String),
}

impl VNode {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Get the element, if this node is one.
    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Element(el) => el.text_content(),
        }
    }
}

impl From<VElement> for VNode {
    fn from(el: VElement) -> Self {
        Self::Element(el)
    }
}

/// A detached element.
#[derive(Debug, Clone, PartialEq)]
pub struct VElement {
    /// Lowercase tag name.
    pub tag: String,
    /// Class markers, in insertion order.
    pub classes: Vec<String>,
    /// Attributes other than `class`, in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<VNode>,
}

/// Start building an element.
pub fn el(tag: impl Into<String>) -> VElement {
    VElement::new(tag)
}

impl VElement {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a class marker.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set the `id` attribute.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Append a child node.
    pub fn child(mut self, node: impl Into<VNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several child nodes.
    pub fn children(mut self, nodes: impl IntoIterator<Item = VNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Append a text child.
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(VNode::text(content))
    }

    /// Get an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check for a class marker.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        self.children.iter().map(VNode::text_content).collect()
    }

    /// Depth-first search for the first descendant element with a class.
    pub fn find_by_class(&self, class: &str) -> Option<&VElement> {
        for child in &self.children {
            if let VNode::Element(el) = child {
                if el.has_class(class) {
                    return Some(el);
                }
                if let Some(found) = el.find_by_class(class) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Depth-first search for the first descendant element with a tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&VElement> {
        for child in &self.children {
            if let VNode::Element(el) = child {
                if el.tag == tag {
                    return Some(el);
                }
                if let Some(found) = el.find_by_tag(tag) {
                    return Some(found);
                }
            }
        }
        None
    }
}

/// An ordered batch of detached nodes, appended to a document in one
/// mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<VNode>,
}

impl Fragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at the end.
    pub fn push(&mut self, node: impl Into<VNode>) {
        self.nodes.push(node.into());
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the fragment holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow the top-level nodes.
    pub fn nodes(&self) -> &[VNode] {
        &self.nodes
    }

    /// Take the top-level nodes.
    pub fn into_nodes(self) -> Vec<VNode> {
        self.nodes
    }
}

impl FromIterator<VNode> for Fragment {
    fn from_iter<I: IntoIterator<Item = VNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl From<VNode> for Fragment {
    fn from(node: VNode) -> Self {
        Self { nodes: vec![node] }
    }
}

impl From<VElement> for Fragment {
    fn from(el: VElement) -> Self {
        Self::from(VNode::from(el))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = el("DIV")
            .class("product")
            .class("product")
            .attr("data-x", "1")
            .attr("data-x", "2")
            .child(el("h4").class("title").text("Shirt"));

        assert_eq!(node.tag, "div");
        assert_eq!(node.classes, vec!["product".to_string()]);
        assert_eq!(node.get_attr("data-x"), Some("2"));
        assert_eq!(node.text_content(), "Shirt");
        assert_eq!(node.find_by_class("title").unwrap().tag, "h4");
        assert!(node.find_by_tag("img").is_none());
    }

    #[test]
    fn test_fragment_collect() {
        let fragment: Fragment = (0..3)
            .map(|i| VNode::from(el("li").text(i.to_string())))
            .collect();
        assert_eq!(fragment.len(), 3);
        assert_eq!(fragment.nodes()[2].text_content(), "2");
        assert!(Fragment::new().is_empty());
    }
}
