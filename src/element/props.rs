//! Prop values and prop maps.
//!
//! Props carry plain attributes, a structured style object, event handlers,
//! and the `children` description. Values compare structurally except
//! handlers, which compare by pointer identity.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::{Children, Node};

// =============================================================================
// Event Handler
// =============================================================================

/// Event listener attached to a host instance.
///
/// Receives the host event name (`click`, `keydown`, ...). Synthetic event
/// payloads belong to the host, not the reconciler.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&str)>);

impl EventHandler {
    pub fn new(handler: impl Fn(&str) + 'static) -> Self {
        EventHandler(Rc::new(handler))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &str) {
        (self.0)(event)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

// =============================================================================
// Prop Value
// =============================================================================

/// Structured style object, applied key by key.
pub type StyleMap = BTreeMap<String, String>;

/// A single prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Style(StyleMap),
    Handler(EventHandler),
}

impl PropValue {
    /// Attribute text for plain values. `None` for styles and handlers.
    pub fn as_attribute(&self) -> Option<String> {
        match self {
            PropValue::Str(s) => Some(s.clone()),
            PropValue::Number(n) => Some(format_number(*n)),
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Style(_) | PropValue::Handler(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Format a number the way text content shows it: integral values without
/// a fractional part.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<StyleMap> for PropValue {
    fn from(value: StyleMap) -> Self {
        PropValue::Style(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Named prop values, ordered for deterministic application.
pub type PropMap = BTreeMap<String, PropValue>;

/// Props of an element: named values plus the `children` description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    pub values: PropMap,
    pub children: Children,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a named value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Builder: set the children description.
    pub fn with_children(mut self, children: impl Into<Children>) -> Self {
        self.children = children.into();
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Lay `defaults` under these props: explicit values win.
    pub fn merged_over(&self, defaults: &Props) -> Props {
        let mut values = defaults.values.clone();
        for (name, value) in &self.values {
            values.insert(name.clone(), value.clone());
        }
        let children = if self.children.is_none() {
            defaults.children.clone()
        } else {
            self.children.clone()
        };
        Props { values, children }
    }

    /// Children that a host component shows as its own text content.
    pub fn text_content(&self) -> Option<&str> {
        match &self.children {
            Children::One(node) => match node.as_ref() {
                Node::Text(text) => Some(text),
                Node::Element(_) => None,
            },
            _ => None,
        }
    }

    /// Whether a reused fiber holding `self` needs an Update effect to show
    /// `next`. Nested element children are diffed by their own fibers, so
    /// only values and text content count.
    pub fn differs_for_update(&self, next: &Props) -> bool {
        self.values != next.values || self.text_content() != next.text_content()
    }
}

/// Build a [`StyleMap`] from pairs.
pub fn style<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> StyleMap
where
    K: Into<String>,
    V: Into<String>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
