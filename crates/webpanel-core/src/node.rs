//! The panel tree: nodes and containers.
//!
//! The set of node kinds is closed. A tree is built once at startup; after
//! that only element values and visibility change.

use crate::driver::Driver;
use crate::element::Element;
use crate::revision::Revision;
use crate::widgets::{CheckButton, Slider, Span};

/// A node of the panel tree.
#[derive(Debug, Clone)]
pub enum Node {
    Span(Span),
    Slider(Slider),
    CheckButton(CheckButton),
    Container(Container),
}

impl Node {
    /// The leaf element, unless this node is a container.
    pub fn as_element(&self) -> Option<&dyn Element> {
        match self {
            Node::Span(span) => Some(span),
            Node::Slider(slider) => Some(slider),
            Node::CheckButton(button) => Some(button),
            Node::Container(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut dyn Element> {
        match self {
            Node::Span(span) => Some(span),
            Node::Slider(slider) => Some(slider),
            Node::CheckButton(button) => Some(button),
            Node::Container(_) => None,
        }
    }

    pub fn render(&self, driver: &mut dyn Driver) {
        match self {
            Node::Container(container) => container.render(driver),
            _ => {
                if let Some(element) = self.as_element() {
                    element.render(driver);
                }
            }
        }
    }

    /// See [`Container::collect_deltas`].
    pub fn collect_deltas(&mut self, since: Revision, first: bool, driver: &mut dyn Driver) -> bool {
        match self {
            Node::Container(container) => container.collect_deltas(since, first, driver),
            _ => match self.as_element_mut() {
                Some(element) => element.collect_delta(since, first, driver),
                None => first,
            },
        }
    }
}

impl From<Span> for Node {
    fn from(span: Span) -> Self {
        Node::Span(span)
    }
}

impl From<Slider> for Node {
    fn from(slider: Slider) -> Self {
        Node::Slider(slider)
    }
}

impl From<CheckButton> for Node {
    fn from(button: CheckButton) -> Self {
        Node::CheckButton(button)
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Node::Container(container)
    }
}

/// An ordered, fixed list of child nodes.
#[derive(Debug, Clone, Default)]
pub struct Container {
    children: Vec<Node>,
}

impl Container {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Render every child in order.
    pub fn render(&self, driver: &mut dyn Driver) {
        for child in &self.children {
            child.render(driver);
        }
    }

    /// Append the deltas of every element changed after `since` to the
    /// `updates` array being written.
    ///
    /// `first` is true while nothing has been written to the array yet, and
    /// the return value carries that flag on to the next sibling, so
    /// separators end up exactly between items at any nesting depth.
    pub fn collect_deltas(&mut self, since: Revision, mut first: bool, driver: &mut dyn Driver) -> bool {
        for child in &mut self.children {
            first = child.collect_deltas(since, first, driver);
        }
        first
    }

    /// Depth-first search in declaration order; the first match wins.
    pub fn find(&self, id: &str) -> Option<&Node> {
        for child in &self.children {
            match child {
                Node::Container(container) => {
                    if let Some(found) = container.find(id) {
                        return Some(found);
                    }
                }
                leaf => {
                    if leaf.as_element().is_some_and(|e| e.id() == id) {
                        return Some(leaf);
                    }
                }
            }
        }
        None
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        for child in &mut self.children {
            match child {
                Node::Container(container) => {
                    if let Some(found) = container.find_mut(id) {
                        return Some(found);
                    }
                }
                leaf => {
                    if leaf.as_element().is_some_and(|e| e.id() == id) {
                        return Some(leaf);
                    }
                }
            }
        }
        None
    }

    /// Visit every leaf element in declaration order.
    pub fn for_each_element_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        for child in &mut self.children {
            match child {
                Node::Container(container) => container.for_each_element_mut(f),
                leaf => f(leaf),
            }
        }
    }
}

impl FromIterator<Node> for Container {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
