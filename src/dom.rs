use std::collections::BTreeMap;

use crate::foundation::core::NodeId;

/// Element matcher covering the handful of queries the engine issues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// `#id`.
    Id(String),
    /// `.class`.
    Class(String),
    /// Any of the listed tag names.
    Tags(&'static [&'static str]),
    /// `[name="value"]`.
    Attr {
        /// Attribute name.
        name: String,
        /// Exact value.
        value: String,
    },
    /// `[name^="prefix"]`.
    AttrPrefix {
        /// Attribute name.
        name: String,
        /// Required value prefix.
        prefix: String,
    },
}

/// Tags a scene heading can use.
pub const HEADING_TAGS: &[&str] = &["h1", "h2"];
/// Tags treated as body copy.
pub const PARAGRAPH_TAGS: &[&str] = &["p"];

impl Selector {
    /// Match by element id.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Match by a single class.
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Match an exact attribute value.
    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: value.into(),
        }
    }

    /// In-page anchors: `a[href^="#"]`.
    pub fn fragment_links() -> Self {
        Self::AttrPrefix {
            name: "href".to_owned(),
            prefix: "#".to_owned(),
        }
    }
}

/// DOM query/creation/attribute capability.
pub trait Dom {
    /// The document node. Never matches a selector.
    fn document(&self) -> NodeId;
    /// Lowercase tag name; `None` for the document or a dangling id.
    fn tag(&self, node: NodeId) -> Option<&str>;
    /// Parent element, `None` at the document.
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    /// Children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    /// Attribute value, if present.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    /// Set or overwrite an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    /// Remove an attribute if present.
    fn remove_attribute(&mut self, node: NodeId, name: &str);
    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;
    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    /// Replace the text content of `node`.
    fn set_text(&mut self, node: NodeId, text: &str);
    /// Text content of `node`.
    fn text(&self, node: NodeId) -> Option<String>;

    /// Non-empty `id` attribute.
    fn element_id(&self, node: NodeId) -> Option<String> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    /// Whether `node` matches `selector`.
    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let Some(tag) = self.tag(node) else {
            return false;
        };
        match selector {
            Selector::Tags(tags) => tags.contains(&tag),
            Selector::Id(id) => self.element_id(node).as_deref() == Some(id.as_str()),
            Selector::Class(class) => self
                .attribute(node, "class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == class)),
            Selector::Attr { name, value } => {
                self.attribute(node, name).as_deref() == Some(value.as_str())
            }
            Selector::AttrPrefix { name, prefix } => self
                .attribute(node, name)
                .is_some_and(|v| v.starts_with(prefix.as_str())),
        }
    }

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.matches(node, selector) {
                out.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        out
    }

    /// First match in document order.
    fn query_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.matches(n, selector) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }
}

#[derive(Clone, Debug, Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    text: String,
}

/// Arena-backed [`Dom`] for headless runs and tests.
#[derive(Clone, Debug)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    attribute_writes: usize,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Tree holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::default()],
            attribute_writes: 0,
        }
    }

    /// Number of attribute mutations performed so far.
    pub fn attribute_writes(&self) -> usize {
        self.attribute_writes
    }

    /// Number of elements, not counting the document.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create `<tag>` under `parent` with the given attributes.
    pub fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.create_element(tag);
        for (k, v) in attrs {
            self.nodes[node.0 as usize]
                .attrs
                .insert((*k).to_owned(), (*v).to_owned());
        }
        self.append_child(parent, node);
        node
    }

    fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0 as usize)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0 as usize)
    }
}

impl Dom for MemoryDom {
    fn document(&self) -> NodeId {
        NodeId(0)
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        if node.0 == 0 {
            return None;
        }
        self.get(node).map(|n| n.tag.as_str())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.get(node).and_then(|n| n.attrs.get(name).cloned())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.get_mut(node) {
            n.attrs.insert(name.to_owned(), value.to_owned());
            self.attribute_writes += 1;
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.get_mut(node)
            && n.attrs.remove(name).is_some()
        {
            self.attribute_writes += 1;
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if let Some(old) = self.nodes[child.0 as usize].parent {
            self.nodes[old.0 as usize].children.retain(|c| *c != child);
        }
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(child);
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.get_mut(node) {
            n.text = text.to_owned();
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.get(node).map(|n| n.text.clone())
    }
}
