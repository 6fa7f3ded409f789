//! The small slice of the document the behaviors need.
//!
//! Behaviors are generic over [`Dom`] so they can run against the real page
//! ([`web::WebDom`]) or against an in-memory tree in unit tests.

pub mod web;

#[cfg(test)]
pub mod memory;

use crate::error::BehaviorError;

pub trait Dom {
    type Node: Clone + PartialEq;

    fn query(&self, selector: &str) -> Option<Self::Node>;
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_in(&self, root: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    fn next_element_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Inclusive: a node contains itself.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn create_element(&self, tag: &str) -> Result<Self::Node, BehaviorError>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), BehaviorError>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn set_class_name(&self, node: &Self::Node, value: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_inner_html(&self, node: &Self::Node, html: &str);

    /// Inline style value, empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Smoothly scrolls so the node's top edge meets the viewport's top.
    fn scroll_into_view(&self, node: &Self::Node);
    fn scroll_y(&self) -> f64;
}

#[cfg(test)]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
