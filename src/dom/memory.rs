//! In-memory [`Dom`] for unit tests.
//!
//! Supports the selector subset the behaviors use: tag names, `.class`
//! (with `\` escapes), `[attr]`, `[attr="v"]`, `[attr^="v"]`, and the
//! descendant combinator.

use std::cell::{Cell, RefCell};

use super::{escape_html, Dom};
use crate::error::BehaviorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Default)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    text: String,
    inner_html: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    scroll_y: Cell<f64>,
    scrolled: RefCell<Vec<NodeId>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let root = NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        };
        Self {
            nodes: RefCell::new(vec![root]),
            scroll_y: Cell::new(0.0),
            scrolled: RefCell::new(Vec::new()),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates `<tag attrs..>` and appends it to `parent`.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.alloc(tag);
        for (name, value) in attrs {
            self.set_attribute(&node, name, value);
        }
        self.link(parent, node);
        node
    }

    pub fn add_text(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let node = self.add(parent, tag, attrs);
        self.nodes.borrow_mut()[node.0].text = text.to_string();
        node
    }

    pub fn set_scroll_y(&self, offset: f64) {
        self.scroll_y.set(offset);
    }

    pub fn scrolled(&self) -> Vec<NodeId> {
        self.scrolled.borrow().clone()
    }

    pub fn inner_html(&self, node: NodeId) -> Option<String> {
        self.nodes.borrow()[node.0].inner_html.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        Self::write_html(&nodes, node, &mut out);
        out
    }

    fn write_html(nodes: &[NodeData], node: NodeId, out: &mut String) {
        let data = &nodes[node.0];
        out.push('<');
        out.push_str(&data.tag);
        for (name, value) in &data.attrs {
            out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        out.push('>');
        out.push_str(&escape_html(&data.text));
        if let Some(html) = &data.inner_html {
            out.push_str(html);
        }
        for child in &data.children {
            Self::write_html(nodes, *child, out);
        }
        out.push_str(&format!("</{}>", data.tag));
    }

    fn alloc(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        });
        NodeId(nodes.len() - 1)
    }

    fn link(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(old) = nodes[child.0].parent.take() {
            nodes[old.0].children.retain(|c| *c != child);
        }
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[root.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.attribute(&node, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn matches(&self, node: NodeId, selector: &[Compound]) -> bool {
        let Some((last, rest)) = selector.split_last() else {
            return false;
        };
        if !self.matches_compound(node, last) {
            return false;
        }
        let mut remaining = rest;
        let mut current = self.nodes.borrow()[node.0].parent;
        while let Some((compound, before)) = remaining.split_last() {
            loop {
                let Some(ancestor) = current else {
                    return false;
                };
                current = self.nodes.borrow()[ancestor.0].parent;
                if self.matches_compound(ancestor, compound) {
                    break;
                }
            }
            remaining = before;
        }
        true
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        if let Some(tag) = &compound.tag {
            if !self.nodes.borrow()[node.0].tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        let classes = self.classes(node);
        if !compound.classes.iter().all(|c| classes.contains(c)) {
            return false;
        }
        compound.attrs.iter().all(|filter| {
            let value = self.attribute(&node, &filter.name);
            match (&filter.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(want), Some(v)) => v == *want,
                (AttrOp::Prefix(want), Some(v)) => v.starts_with(want.as_str()),
            }
        })
    }

    fn select(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let selector = parse_selector(selector);
        self.descendants(root)
            .into_iter()
            .filter(|node| self.matches(*node, &selector))
            .collect()
    }
}

enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

struct AttrFilter {
    name: String,
    op: AttrOp,
}

#[derive(Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrFilter>,
}

fn parse_selector(selector: &str) -> Vec<Compound> {
    selector.split_whitespace().map(parse_compound).collect()
}

fn parse_compound(part: &str) -> Compound {
    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();
    let mut tag = String::new();
    while let Some(&c) = chars.peek() {
        if c == '.' || c == '[' {
            break;
        }
        tag.push(c);
        chars.next();
    }
    if !tag.is_empty() && tag != "*" {
        compound.tag = Some(tag);
    }
    while let Some(c) = chars.next() {
        match c {
            '.' => {
                let mut class = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '.' || c == '[' {
                        break;
                    }
                    chars.next();
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            class.push(escaped);
                        }
                    } else {
                        class.push(c);
                    }
                }
                compound.classes.push(class);
            }
            '[' => {
                let body: String = chars.by_ref().take_while(|c| *c != ']').collect();
                compound.attrs.push(parse_attr(&body));
            }
            _ => {}
        }
    }
    compound
}

fn parse_attr(body: &str) -> AttrFilter {
    let unquote = |v: &str| v.trim_matches(|c: char| c == '"' || c == '\'').to_string();
    if let Some((name, value)) = body.split_once("^=") {
        AttrFilter {
            name: name.to_string(),
            op: AttrOp::Prefix(unquote(value)),
        }
    } else if let Some((name, value)) = body.split_once('=') {
        AttrFilter {
            name: name.to_string(),
            op: AttrOp::Equals(unquote(value)),
        }
    } else {
        AttrFilter {
            name: body.to_string(),
            op: AttrOp::Exists,
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_in(&self.body(), selector)
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(self.body(), selector)
    }

    fn query_in(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        self.select(*root, selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body())
            .into_iter()
            .find(|node| self.attribute(node, "id").as_deref() == Some(id))
    }

    fn next_element_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let parent = nodes[node.0].parent?;
        let siblings = &nodes[parent.0].children;
        let index = siblings.iter().position(|c| c == node)?;
        siblings.get(index + 1).copied()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = nodes[id.0].parent;
        }
        false
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, BehaviorError> {
        Ok(self.alloc(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), BehaviorError> {
        self.link(*parent, *child);
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut classes = self.classes(*node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_attribute(node, "class", &classes.join(" "));
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut classes = self.classes(*node);
        if classes.iter().any(|c| c == class) {
            classes.retain(|c| c != class);
            self.set_attribute(node, "class", &classes.join(" "));
        }
    }

    fn set_class_name(&self, node: &NodeId, value: &str) {
        self.set_attribute(node, "class", value);
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0]
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let attrs = &mut nodes[node.0].attrs;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn text(&self, node: &NodeId) -> String {
        let mut out = self.nodes.borrow()[node.0].text.clone();
        for child in self.descendants(*node) {
            out.push_str(&self.nodes.borrow()[child.0].text);
        }
        out
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let children = self.children(*node);
        let mut nodes = self.nodes.borrow_mut();
        for child in children {
            nodes[child.0].parent = None;
        }
        let data = &mut nodes[node.0];
        data.children.clear();
        data.inner_html = None;
        data.text = text.to_string();
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.set_text(node, "");
        self.nodes.borrow_mut()[node.0].inner_html = Some(html.to_string());
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.nodes.borrow()[node.0]
            .styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let styles = &mut nodes[node.0].styles;
        match styles.iter_mut().find(|(p, _)| p == property) {
            Some(slot) => slot.1 = value.to_string(),
            None => styles.push((property.to_string(), value.to_string())),
        }
    }

    fn scroll_into_view(&self, node: &NodeId) {
        self.scrolled.borrow_mut().push(*node);
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }
}
