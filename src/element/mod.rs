//! Element descriptions - the input of a render.
//!
//! An element is an immutable description of what should be on screen at a
//! tree position: its type, an optional key, and props. The reconciler turns
//! descriptions into fibers; it never keeps the descriptions themselves
//! beyond the props it memoizes.
//!
//! ```text
//! Element { type: Host("div"), key: None, props: { id: "app", children: [
//!     Element { type: Host("span"), ... },
//!     Text("hi"),
//! ]}}
//! ```
//!
//! - [`props`] - Prop values, prop maps, style objects, event handlers
//! - [`component`] - Class and function component types

pub mod component;
pub mod props;

use std::fmt;

use crate::types::Key;

pub use component::{ClassComponent, ClassType, FunctionType, RenderFn, State, StateUpdater};
pub use props::{style, EventHandler, PropMap, PropValue, Props, StyleMap};

// =============================================================================
// Element Type
// =============================================================================

/// What an element describes.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// A host primitive, by type name (`div`, `span`, ...).
    Host(String),
    /// A stateful component.
    Class(ClassType),
    /// A function component.
    Function(FunctionType),
    /// A fragment marker. Not supported by this reconciler.
    Fragment,
    /// A portal marker targeting another container. Not supported.
    Portal,
}

impl ElementType {
    /// Display name used in logs, errors and effect records.
    pub fn name(&self) -> &str {
        match self {
            ElementType::Host(name) => name,
            ElementType::Class(class) => class.name(),
            ElementType::Function(function) => function.name(),
            ElementType::Fragment => "Fragment",
            ElementType::Portal => "Portal",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Element
// =============================================================================

/// A description of one component or host primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub element_type: ElementType,
    pub key: Option<Key>,
    pub props: Props,
}

impl Element {
    pub fn new(element_type: ElementType, props: Props) -> Self {
        Element {
            element_type,
            key: None,
            props,
        }
    }

    /// A host primitive element with empty props.
    pub fn host(type_name: impl Into<String>) -> Self {
        Element::new(ElementType::Host(type_name.into()), Props::default())
    }

    /// A class component element.
    pub fn class<C: ClassComponent>(props: Props) -> Self {
        Element::new(ElementType::Class(ClassType::of::<C>()), props)
    }

    /// A function component element.
    pub fn function(function: FunctionType, props: Props) -> Self {
        Element::new(ElementType::Function(function), props)
    }

    /// Builder: set the key.
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Builder: set a named prop.
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name, value);
        self
    }

    /// Builder: set the children description.
    pub fn with_children(mut self, children: impl Into<Children>) -> Self {
        self.props.children = children.into();
        self
    }
}

// =============================================================================
// Node & Children
// =============================================================================

/// One entry of a children description.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Text or a number rendered as text.
    Text(String),
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Text(props::format_number(value))
    }
}

/// The `children` prop.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Children {
    #[default]
    None,
    /// A single description or a single text/number.
    One(Box<Node>),
    /// An ordered collection.
    Many(Vec<Node>),
}

impl Children {
    pub fn is_none(&self) -> bool {
        matches!(self, Children::None)
    }
}

macro_rules! children_from_single {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Children {
                fn from(value: $ty) -> Self {
                    Children::One(Box::new(Node::from(value)))
                }
            }
        )*
    };
}

children_from_single!(Element, &str, String, i64, f64);

impl From<Node> for Children {
    fn from(value: Node) -> Self {
        Children::One(Box::new(value))
    }
}

impl From<Vec<Node>> for Children {
    fn from(value: Vec<Node>) -> Self {
        Children::Many(value)
    }
}

impl From<Vec<Element>> for Children {
    fn from(value: Vec<Element>) -> Self {
        Children::Many(value.into_iter().map(Node::Element).collect())
    }
}

impl From<Option<Element>> for Children {
    fn from(value: Option<Element>) -> Self {
        match value {
            Some(element) => Children::from(element),
            None => Children::None,
        }
    }
}

/// Build a [`Children::Many`] from mixed nodes.
///
/// ```ignore
/// children![Element::host("span"), "hi", 3i64]
/// ```
#[macro_export]
macro_rules! children {
    ($($node:expr),* $(,)?) => {
        $crate::element::Children::Many(vec![$($crate::element::Node::from($node)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_builder() {
        let element = Element::host("div")
            .with_key("a")
            .with_prop("id", "app")
            .with_children("hi");
        assert_eq!(element.element_type.name(), "div");
        assert_eq!(element.key, Some(Key::from("a")));
        assert_eq!(element.props.text_content(), Some("hi"));
    }

    #[test]
    fn test_children_macro_mixes_nodes() {
        let children = children![Element::host("span"), "hi", 3i64];
        match children {
            Children::Many(nodes) => {
                assert_eq!(nodes.len(), 3);
                assert_eq!(nodes[1], Node::Text("hi".into()));
                assert_eq!(nodes[2], Node::Text("3".into()));
            }
            other => panic!("expected many, got {other:?}"),
        }
    }

    #[test]
    fn test_number_text_format() {
        assert_eq!(Node::from(2.0), Node::Text("2".into()));
        assert_eq!(Node::from(2.5), Node::Text("2.5".into()));
    }
}
