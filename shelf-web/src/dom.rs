//! Index-addressed DOM arena.
//!
//! Nodes live in a flat `Vec` and point at each other by index, so there is
//! no shared ownership and no cycle. Construction copies out of a parsed
//! `scraper` tree in document (pre-)order, optionally dropping element
//! subtrees, which makes a filtered working copy cheap to build and keeps
//! the source document untouched.
//!
//! Every traversal here is iterative: hostile pages can nest elements far
//! deeper than the call stack would tolerate.

use scraper::{ElementRef, Node};
use shelf_common::text::{collapse_whitespace, escape_attr, escape_html};

pub type NodeId = usize;

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Root,
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct DomNode {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<DomNode>,
}

/// One step of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Open(NodeId),
    Close(NodeId),
    Text(NodeId),
}

impl Dom {
    pub const ROOT: NodeId = 0;

    fn empty() -> Self {
        Self {
            nodes: vec![DomNode {
                parent: None,
                children: Vec::new(),
                data: NodeData::Root,
            }],
        }
    }

    /// Copy `root` and its subtree. `keep` is asked about every element
    /// below `root`; a `false` answer drops that element with its subtree.
    /// Comments, doctypes and processing instructions are never copied.
    pub fn from_element<F>(root: ElementRef<'_>, mut keep: F) -> Self
    where
        F: FnMut(ElementRef<'_>) -> bool,
    {
        let mut dom = Self::empty();
        let mut stack = vec![(*root, Self::ROOT, true)];

        while let Some((node, parent, is_root)) = stack.pop() {
            let data = match node.value() {
                Node::Element(el) => {
                    if !is_root && !ElementRef::wrap(node).is_some_and(&mut keep) {
                        continue;
                    }
                    NodeData::Element {
                        name: el.name().to_ascii_lowercase(),
                        attrs: el
                            .attrs()
                            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                            .collect(),
                    }
                }
                Node::Text(text) => {
                    let text: &str = text;
                    NodeData::Text(text.to_string())
                }
                _ => continue,
            };

            let is_element = matches!(data, NodeData::Element { .. });
            let id = dom.push(parent, data);
            if is_element {
                let kids: Vec<_> = node.children().collect();
                for kid in kids.into_iter().rev() {
                    stack.push((kid, id, false));
                }
            }
        }

        dom
    }

    fn push(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DomNode {
            parent: Some(parent),
            children: Vec::new(),
            data,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_tag(&self, id: NodeId, name: &str) -> bool {
        self.tag(id) == Some(name)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id].data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|c| c.split_whitespace().any(|c| c.eq_ignore_ascii_case(class)))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id].data {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id].data {
            attrs.retain(|(k, _)| k != name);
        }
    }

    /// Element ids in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|id| self.tag(*id).is_some())
    }

    /// First element (document order) matching `pred`.
    pub fn find_first<P>(&self, mut pred: P) -> Option<NodeId>
    where
        P: FnMut(&Dom, NodeId) -> bool,
    {
        self.elements().find(|id| pred(self, *id))
    }

    /// Ancestors from the parent upwards, excluding the synthetic root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
            .filter(|p| *p != Self::ROOT)
    }

    /// `id` and everything below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.nodes[cur].children.iter().rev().copied());
        }
        out
    }

    /// Concatenated text of the subtree, as-is.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.text(d))
            .collect()
    }

    /// Text of the subtree with whitespace runs collapsed.
    pub fn normalized_text(&self, id: NodeId) -> String {
        collapse_whitespace(&self.text_content(id))
    }

    pub fn walk(&self, id: NodeId) -> Walk<'_> {
        Walk {
            dom: self,
            stack: vec![(id, false)],
        }
    }

    /// Serialize `id` including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(self.walk(id), &mut out);
        out
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_html(self.walk(*child), &mut out);
        }
        out
    }

    fn write_html(&self, walk: Walk<'_>, out: &mut String) {
        for edge in walk {
            match edge {
                Edge::Open(id) => {
                    let name = self.tag(id).unwrap_or_default();
                    out.push('<');
                    out.push_str(name);
                    for (k, v) in self.attrs(id) {
                        out.push(' ');
                        out.push_str(k);
                        out.push_str("=\"");
                        out.push_str(&escape_attr(v));
                        out.push('"');
                    }
                    out.push('>');
                }
                Edge::Close(id) => {
                    let name = self.tag(id).unwrap_or_default();
                    if !is_void_element(name) {
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                }
                Edge::Text(id) => out.push_str(&escape_html(self.text(id).unwrap_or_default())),
            }
        }
    }
}

/// Depth-first walk yielding open/close/text edges.
pub struct Walk<'a> {
    dom: &'a Dom,
    stack: Vec<(NodeId, bool)>,
}

impl Walk<'_> {
    /// Call right after receiving `Edge::Open(id)`: its children are not
    /// visited and no `Edge::Close(id)` is produced.
    pub fn skip_subtree(&mut self, id: NodeId) {
        while let Some((top, exiting)) = self.stack.pop() {
            if top == id && exiting {
                break;
            }
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        while let Some((id, exiting)) = self.stack.pop() {
            let node = &self.dom.nodes[id];
            match &node.data {
                NodeData::Text(_) => return Some(Edge::Text(id)),
                NodeData::Root => {
                    self.stack
                        .extend(node.children.iter().rev().map(|c| (*c, false)));
                }
                NodeData::Element { .. } => {
                    if exiting {
                        return Some(Edge::Close(id));
                    }
                    self.stack.push((id, true));
                    self.stack
                        .extend(node.children.iter().rev().map(|c| (*c, false)));
                    return Some(Edge::Open(id));
                }
            }
        }
        None
    }
}
