//! Live document tree.
//!
//! Nodes live in a `scraper::Html` tree, so CSS lookups go through
//! `scraper::Selector` and match exactly what a browser would.

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector};

use crate::html::{close_tag, escape_text, is_raw_text, is_void, open_tag};
use crate::node::{Fragment, VElement, VNode};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Handle to a node inside a `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(ego_tree::NodeId);

/// Error when a selector string is not valid CSS.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector '{selector}': {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// Parse a CSS selector.
pub fn parse_selector(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// A recorded change to the live tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Children were added to and/or removed from `target` in one batch.
    ChildList {
        target: NodeId,
        added: usize,
        removed: usize,
    },
    /// An attribute (including `class`) of `target` changed.
    Attribute { target: NodeId, name: String },
}

/// Document tree with a mutation log.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    root: NodeId,
    mutations: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(VElement::new("html"))
    }
}

fn element_node(tag: &str, classes: &[String], attrs: &[(String, String)]) -> Node {
    let attr = |name: &str, value: &str| Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from(value),
    };

    let mut attributes = Vec::with_capacity(attrs.len() + 1);
    if !classes.is_empty() {
        attributes.push(attr("class", &classes.join(" ")));
    }
    attributes.extend(
        attrs
            .iter()
            .filter(|(name, _)| name != "class")
            .map(|(name, value)| attr(name, value)),
    );

    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
    Node::Element(Element::new(name, attributes))
}

fn text_node(text: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from(text),
    })
}

/// Tag, classes and non-class attributes of an element.
fn element_parts(element: &Element) -> (String, Vec<String>, Vec<(String, String)>) {
    let classes = element.classes().map(str::to_string).collect();
    let attrs = element
        .attrs()
        .filter(|(name, _)| *name != "class")
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    (element.name().to_string(), classes, attrs)
}

impl Document {
    /// Build a document whose root is the given element tree. Building does
    /// not record mutations.
    pub fn new(root: VElement) -> Self {
        let html = Html::new_document();
        let document_node = html.tree.root().id();
        let mut doc = Self {
            html,
            root: NodeId(document_node),
            mutations: Vec::new(),
        };
        doc.root = doc.insert_tree(document_node, VNode::Element(root));
        doc
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn insert_tree(&mut self, parent: ego_tree::NodeId, vnode: VNode) -> NodeId {
        let (node, children) = match vnode {
            VNode::Text(text) => (text_node(&text), Vec::new()),
            VNode::Element(el) => (element_node(&el.tag, &el.classes, &el.attrs), el.children),
        };

        let id = match self.html.tree.get_mut(parent) {
            Some(mut parent) => parent.append(node).id(),
            None => self.html.tree.orphan(node).id(),
        };
        for child in children {
            self.insert_tree(id, child);
        }
        NodeId(id)
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        self.html.tree.get(id.0)?.value().as_element()
    }

    /// Swap in a rebuilt element, keeping the node and its children.
    fn rewrite_element(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut Vec<String>, &mut Vec<(String, String)>) -> bool,
    ) -> bool {
        let Some((tag, mut classes, mut attrs)) = self.element(id).map(element_parts) else {
            return false;
        };
        if !edit(&mut classes, &mut attrs) {
            return false;
        }
        if let Some(mut node) = self.html.tree.get_mut(id.0) {
            *node.value() = element_node(&tag, &classes, &attrs);
        }
        true
    }

    /// Append a single tree under `parent`.
    pub fn append(&mut self, parent: NodeId, node: impl Into<VNode>) -> NodeId {
        let id = self.insert_tree(parent.0, node.into());
        self.mutations.push(Mutation::ChildList {
            target: parent,
            added: 1,
            removed: 0,
        });
        id
    }

    /// Append every node of `fragment` under `parent` as one batch.
    ///
    /// Exactly one `ChildList` mutation is recorded for a non-empty
    /// fragment; an empty fragment changes nothing.
    pub fn append_fragment(&mut self, parent: NodeId, fragment: Fragment) -> Vec<NodeId> {
        if fragment.is_empty() {
            return Vec::new();
        }

        let ids: Vec<NodeId> = fragment
            .into_nodes()
            .into_iter()
            .map(|node| self.insert_tree(parent.0, node))
            .collect();
        self.mutations.push(Mutation::ChildList {
            target: parent,
            added: ids.len(),
            removed: 0,
        });
        ids
    }

    /// Replace all children of `target` with `fragment` as one batch.
    ///
    /// The old children are detached, not freed: the underlying tree never
    /// reclaims nodes, so they stay in storage (unreachable from the root)
    /// until the document is dropped.
    pub fn replace_children(&mut self, target: NodeId, fragment: Fragment) -> Vec<NodeId> {
        let old = self.children(target);
        for child in &old {
            if let Some(mut node) = self.html.tree.get_mut(child.0) {
                node.detach();
            }
        }

        let ids: Vec<NodeId> = fragment
            .into_nodes()
            .into_iter()
            .map(|node| self.insert_tree(target.0, node))
            .collect();

        if !old.is_empty() || !ids.is_empty() {
            self.mutations.push(Mutation::ChildList {
                target,
                added: ids.len(),
                removed: old.len(),
            });
        }
        ids
    }

    /// Replace all children of `target` with a single text node.
    pub fn set_text_content(&mut self, target: NodeId, text: impl Into<String>) {
        self.replace_children(target, Fragment::from(VNode::text(text)));
    }

    /// Parent element of a node, `None` for the root or a detached node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.html.tree.get(id.0)?.parent()?;
        parent.value().is_element().then(|| NodeId(parent.id()))
    }

    /// Children of a node, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id.0)
            .map(|node| node.children().map(|c| NodeId(c.id())).collect())
            .unwrap_or_default()
    }

    /// Child elements of a node, in order, skipping text nodes.
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id.0)
            .map(|node| {
                node.children()
                    .filter(|c| c.value().is_element())
                    .map(|c| NodeId(c.id()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tag name, `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    /// Class markers of an element.
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.element(id)
            .map(|el| el.classes().collect())
            .unwrap_or_default()
    }

    /// Check for a class marker.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .map_or(false, |el| el.classes().any(|c| c == class))
    }

    /// Add a class marker. Returns whether the class list changed.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let changed = self.rewrite_element(id, |classes, _| {
            if classes.iter().any(|c| c == class) {
                return false;
            }
            classes.push(class.to_string());
            true
        });
        if changed {
            self.record_attribute(id, "class");
        }
        changed
    }

    /// Remove a class marker. Returns whether the class list changed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let changed = self.rewrite_element(id, |classes, _| {
            let before = classes.len();
            classes.retain(|c| c != class);
            classes.len() != before
        });
        if changed {
            self.record_attribute(id, "class");
        }
        changed
    }

    /// Get an attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// Set an attribute value.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let changed = self.rewrite_element(id, |classes, attrs| {
            if name == "class" {
                *classes = value.split_whitespace().map(str::to_string).collect();
                return true;
            }
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value,
                None => attrs.push((name.to_string(), value)),
            }
            true
        });
        if changed {
            self.record_attribute(id, name);
        }
    }

    fn record_attribute(&mut self, target: NodeId, name: &str) {
        self.mutations.push(Mutation::Attribute {
            target,
            name: name.to_string(),
        });
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        self.html
            .tree
            .get(id.0)
            .map(|node| {
                node.descendants()
                    .filter_map(|n| n.value().as_text())
                    .map(|t| &**t)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First element in document order matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = parse_selector(selector)?;
        let found = self.select(self.root, &selector).next();
        Ok(found)
    }

    /// All elements in document order matching `selector`.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = parse_selector(selector)?;
        Ok(self.select(self.root, &selector).collect())
    }

    /// First matching element inside `scope` (excluding `scope` itself).
    pub fn query_selector_in(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        let selector = parse_selector(selector)?;
        let found = self.select(scope, &selector).find(|id| *id != scope);
        Ok(found)
    }

    /// Elements under `scope`, `scope` included, that match `selector`.
    pub fn select<'a>(
        &'a self,
        scope: NodeId,
        selector: &'a Selector,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.html
            .tree
            .get(scope.0)
            .into_iter()
            .flat_map(|node| node.descendants())
            .filter(move |node| ElementRef::wrap(*node).map_or(false, |el| selector.matches(&el)))
            .map(|node| NodeId(node.id()))
    }

    /// `scope` and its descendants in document (pre-)order.
    pub fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.html
            .tree
            .get(scope.0)
            .into_iter()
            .flat_map(|node| node.descendants())
            .map(|node| NodeId(node.id()))
    }

    /// Mutations recorded since the document was built or last drained.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Drain the mutation log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Serialize a node and its descendants.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, false);
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag(id).map_or(false, is_raw_text);
        for child in self.children(id) {
            self.write_node(&mut out, child, raw);
        }
        out
    }

    /// Serialize the whole document with a doctype.
    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>\n{}\n", self.outer_html(self.root))
    }

    fn write_node(&self, out: &mut String, id: NodeId, raw: bool) {
        let Some(node) = self.html.tree.get(id.0) else {
            return;
        };
        match node.value() {
            Node::Text(t) if raw => out.push_str(t),
            Node::Text(t) => out.push_str(&escape_text(t)),
            Node::Element(element) => {
                let (tag, classes, attrs) = element_parts(element);
                open_tag(out, &tag, &classes, &attrs);
                if is_void(&tag) {
                    return;
                }
                let raw = is_raw_text(&tag);
                for child in node.children() {
                    self.write_node(out, NodeId(child.id()), raw);
                }
                close_tag(out, &tag);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::el;

    fn page() -> Document {
        Document::new(
            el("html").child(
                el("body")
                    .child(el("section").class("country-bar").class("hidden"))
                    .child(
                        el("section")
                            .id("all-products")
                            .child(el("div").class("container")),
                    )
                    .child(el("div").class("container")),
            ),
        )
    }

    #[test]
    fn test_query_selector() {
        let doc = page();
        let bar = doc.query_selector("section.country-bar").unwrap().unwrap();
        assert!(doc.has_class(bar, "hidden"));

        let container = doc.query_selector("#all-products .container").unwrap().unwrap();
        let section = doc.parent(container).unwrap();
        assert_eq!(doc.attribute(section, "id"), Some("all-products"));

        assert_eq!(doc.query_selector_all(".container").unwrap().len(), 2);
        assert_eq!(doc.query_selector("#missing .container").unwrap(), None);
        assert_eq!(doc.query_selector("html").unwrap(), Some(doc.root()));
    }

    #[test]
    fn test_combinators_and_attribute_selectors() {
        let doc = page();
        let container = doc.query_selector("#all-products .container").unwrap();
        assert_eq!(doc.query_selector("#all-products > .container").unwrap(), container);
        assert_eq!(doc.query_selector_all("body > .container").unwrap().len(), 1);
        assert_eq!(doc.query_selector_all("section[id]").unwrap().len(), 1);
        assert_eq!(
            doc.query_selector_all("section.country-bar, div.container")
                .unwrap()
                .len(),
            3
        );
        assert!(doc
            .query_selector("section:not(.hidden)")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_invalid_selector() {
        let doc = page();
        let err = doc.query_selector("div >").unwrap_err();
        assert_eq!(err.selector, "div >");
        assert!(doc.query_selector("").is_err());
        assert!(doc.query_selector("[").is_err());
    }

    #[test]
    fn test_query_selector_in_scope() {
        let doc = page();
        let section = doc.query_selector("#all-products").unwrap().unwrap();
        let inner = doc.query_selector_in(section, "div").unwrap().unwrap();
        assert!(doc.has_class(inner, "container"));
        assert_eq!(doc.query_selector_in(section, "section").unwrap(), None);
    }

    #[test]
    fn test_append_fragment_is_one_batch() {
        let mut doc = page();
        let container = doc.query_selector("#all-products .container").unwrap().unwrap();

        let fragment: Fragment = ["a", "b", "c"]
            .iter()
            .map(|t| VNode::from(el("div").class("product").text(*t)))
            .collect();
        let ids = doc.append_fragment(container, fragment);

        assert_eq!(ids.len(), 3);
        assert_eq!(doc.children(container), ids);
        assert_eq!(doc.text_content(container), "abc");
        assert_eq!(doc.query_selector_all(".container > .product").unwrap(), ids);
        assert_eq!(
            doc.mutations(),
            &[Mutation::ChildList {
                target: container,
                added: 3,
                removed: 0
            }]
        );
    }

    #[test]
    fn test_empty_fragment_is_noop() {
        let mut doc = page();
        let container = doc.query_selector("#all-products .container").unwrap().unwrap();
        assert!(doc.append_fragment(container, Fragment::new()).is_empty());
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_replace_children_detaches_old() {
        let mut doc = page();
        let bar = doc.query_selector("section.country-bar").unwrap().unwrap();
        let old = doc.append(bar, el("p").class("old"));
        doc.replace_children(bar, Fragment::from(el("p").class("new")));

        assert!(doc.query_selector("p.old").unwrap().is_none());
        assert!(doc.query_selector("p.new").unwrap().is_some());
        assert_eq!(doc.child_elements(bar).len(), 1);
        assert_eq!(doc.parent(old), None);
        assert!(!doc.descendants(doc.root()).any(|id| id == old));
    }

    #[test]
    fn test_class_and_attribute_mutations() {
        let mut doc = page();
        let bar = doc.query_selector("section.country-bar").unwrap().unwrap();

        assert!(doc.remove_class(bar, "hidden"));
        assert!(!doc.remove_class(bar, "hidden"));
        assert!(doc.query_selector("section.hidden").unwrap().is_none());
        assert!(doc.add_class(bar, "shown"));
        assert_eq!(doc.query_selector("section.shown").unwrap(), Some(bar));
        assert_eq!(doc.classes(bar), vec!["country-bar", "shown"]);
        doc.set_attribute(bar, "role", "status");

        assert_eq!(doc.attribute(bar, "role"), Some("status"));
        assert_eq!(doc.query_selector("[role=status]").unwrap(), Some(bar));
        assert_eq!(doc.take_mutations().len(), 3);
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_serialize() {
        let mut doc = Document::new(
            el("html")
                .child(el("head").child(el("style").text("a > b { }")))
                .child(el("body")),
        );
        let body = doc.query_selector("body").unwrap().unwrap();
        doc.append(
            body,
            el("p").child(el("img").attr("alt", "a \"b\"")).text("1 < 2"),
        );

        assert_eq!(
            doc.to_html(),
            "<!DOCTYPE html>\n<html><head><style>a > b { }</style></head>\
             <body><p><img alt=\"a &quot;b&quot;\">1 &lt; 2</p></body></html>\n"
        );
        assert_eq!(doc.inner_html(body), "<p><img alt=\"a &quot;b&quot;\">1 &lt; 2</p>");
    }
}
