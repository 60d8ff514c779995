//! In-memory host tree.
//!
//! Nodes live in a flat `Vec` addressed by [`HostNodeId`], the same
//! index-not-object layout the fiber arena uses. Every adapter call is also
//! recorded as a [`HostOp`], so tests can assert both the resulting tree and
//! the exact mutations that produced it.
//!
//! ```text
//! #0 Container ─┬─ #1 <div> ─┬─ #2 <span>
//!               │            └─ #3 "hi"
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::element::EventHandler;

use super::HostConfig;

// =============================================================================
// Nodes
// =============================================================================

/// Handle to a node in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostNodeId(usize);

impl HostNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNodeKind {
    /// Mount point handed to a root.
    Container,
    Element { tag: String },
    Text,
}

/// One node of the in-memory tree.
#[derive(Debug, Clone)]
pub struct HostNode {
    pub kind: HostNodeKind,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub listeners: BTreeMap<String, EventHandler>,
    /// Text of a text node, or text content of an element.
    pub text: Option<String>,
    pub children: Vec<HostNodeId>,
    pub parent: Option<HostNodeId>,
    pub released: bool,
}

impl HostNode {
    fn new(kind: HostNodeKind) -> Self {
        HostNode {
            kind,
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            listeners: BTreeMap::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            released: false,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            HostNodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }
}

// =============================================================================
// Operation Log
// =============================================================================

/// A recorded adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    CreateInstance { node: HostNodeId, tag: String },
    CreateText { node: HostNodeId, text: String },
    AppendChild { parent: HostNodeId, child: HostNodeId },
    InsertBefore { parent: HostNodeId, child: HostNodeId, before: HostNodeId },
    RemoveChild { parent: HostNodeId, child: HostNodeId },
    SetAttribute { node: HostNodeId, name: String, value: String },
    RemoveAttribute { node: HostNodeId, name: String },
    SetStyle { node: HostNodeId, name: String, value: String },
    RemoveStyle { node: HostNodeId, name: String },
    SetTextContent { node: HostNodeId, text: String },
    ResetTextContent { node: HostNodeId },
    CommitTextUpdate { node: HostNodeId, text: String },
    AddListener { node: HostNodeId, event: String },
    RemoveListener { node: HostNodeId, event: String },
    Release { node: HostNodeId },
}

impl HostOp {
    /// Whether this call changes which nodes are attached where.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            HostOp::AppendChild { .. } | HostOp::InsertBefore { .. } | HostOp::RemoveChild { .. }
        )
    }
}

// =============================================================================
// Memory Host
// =============================================================================

/// A [`HostConfig`] that keeps the host tree in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<HostNode>,
    ops: Vec<HostOp>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mount point.
    pub fn create_container(&mut self) -> HostNodeId {
        self.push(HostNode::new(HostNodeKind::Container))
    }

    /// Slots are never reused: a released node keeps its slot, flagged, so
    /// stale handles still answer [`is_released`](Self::is_released). The
    /// vector grows with every node created over the host's lifetime.
    fn push(&mut self, node: HostNode) -> HostNodeId {
        let id = HostNodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: HostNodeId) -> Option<&HostNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: HostNodeId) -> &[HostNodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: HostNodeId) -> Option<HostNodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn tag(&self, id: HostNodeId) -> Option<&str> {
        self.node(id).and_then(HostNode::tag)
    }

    pub fn text(&self, id: HostNodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text.as_deref())
    }

    pub fn attribute(&self, id: HostNodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn style(&self, id: HostNodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.style.get(name))
            .map(String::as_str)
    }

    pub fn has_listener(&self, id: HostNodeId, event: &str) -> bool {
        self.node(id)
            .is_some_and(|n| n.listeners.contains_key(event))
    }

    pub fn is_released(&self, id: HostNodeId) -> bool {
        self.node(id).is_some_and(|n| n.released)
    }

    /// Invoke the listener for `event` on `id`. Returns whether one ran.
    pub fn dispatch(&self, id: HostNodeId, event: &str) -> bool {
        let handler = self.node(id).and_then(|n| n.listeners.get(event)).cloned();
        match handler {
            Some(handler) => {
                handler.call(event);
                true
            }
            None => false,
        }
    }

    /// Recorded operations, oldest first.
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// Drain the operation log.
    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of nodes ever created, containers included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Markup of everything below `id` (children only for a container).
    ///
    /// `<div id="a" style="color:red">text<span></span></div>`
    pub fn to_markup(&self, id: HostNodeId) -> String {
        let mut out = String::new();
        match self.node(id) {
            Some(node) if node.kind == HostNodeKind::Container => {
                for &child in &node.children {
                    self.write_markup(child, &mut out);
                }
            }
            Some(_) => self.write_markup(id, &mut out),
            None => {}
        }
        out
    }

    fn write_markup(&self, id: HostNodeId, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.kind {
            HostNodeKind::Text => out.push_str(node.text.as_deref().unwrap_or_default()),
            HostNodeKind::Container => {
                for &child in &node.children {
                    self.write_markup(child, out);
                }
            }
            HostNodeKind::Element { tag } => {
                let _ = write!(out, "<{tag}");
                for (name, value) in &node.attributes {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                if !node.style.is_empty() {
                    let style: Vec<String> =
                        node.style.iter().map(|(k, v)| format!("{k}:{v}")).collect();
                    let _ = write!(out, " style=\"{}\"", style.join(";"));
                }
                out.push('>');
                if let Some(text) = &node.text {
                    out.push_str(text);
                }
                for &child in &node.children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn node_mut(&mut self, id: HostNodeId) -> Option<&mut HostNode> {
        self.nodes.get_mut(id.0)
    }

    fn detach(&mut self, child: HostNodeId) {
        let Some(parent) = self.parent(child) else { return };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }
}

impl HostConfig for MemoryHost {
    type Instance = HostNodeId;

    fn create_instance(&mut self, type_name: &str) -> HostNodeId {
        let id = self.push(HostNode::new(HostNodeKind::Element {
            tag: type_name.to_string(),
        }));
        self.ops.push(HostOp::CreateInstance {
            node: id,
            tag: type_name.to_string(),
        });
        id
    }

    fn create_text_instance(&mut self, text: &str) -> HostNodeId {
        let mut node = HostNode::new(HostNodeKind::Text);
        node.text = Some(text.to_string());
        let id = self.push(node);
        self.ops.push(HostOp::CreateText {
            node: id,
            text: text.to_string(),
        });
        id
    }

    fn append_child(&mut self, parent: &HostNodeId, child: &HostNodeId) {
        self.detach(*child);
        if let Some(node) = self.node_mut(*parent) {
            node.children.push(*child);
        }
        if let Some(node) = self.node_mut(*child) {
            node.parent = Some(*parent);
        }
        self.ops.push(HostOp::AppendChild {
            parent: *parent,
            child: *child,
        });
    }

    fn insert_before(&mut self, parent: &HostNodeId, child: &HostNodeId, before: &HostNodeId) {
        self.detach(*child);
        if let Some(node) = self.node_mut(*parent) {
            match node.children.iter().position(|c| c == before) {
                Some(at) => node.children.insert(at, *child),
                None => node.children.push(*child),
            }
        }
        if let Some(node) = self.node_mut(*child) {
            node.parent = Some(*parent);
        }
        self.ops.push(HostOp::InsertBefore {
            parent: *parent,
            child: *child,
            before: *before,
        });
    }

    fn remove_child(&mut self, parent: &HostNodeId, child: &HostNodeId) {
        if self.parent(*child) == Some(*parent) {
            self.detach(*child);
        }
        self.ops.push(HostOp::RemoveChild {
            parent: *parent,
            child: *child,
        });
    }

    fn set_attribute(&mut self, instance: &HostNodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(*instance) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
        self.ops.push(HostOp::SetAttribute {
            node: *instance,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, instance: &HostNodeId, name: &str) {
        if let Some(node) = self.node_mut(*instance) {
            node.attributes.remove(name);
        }
        self.ops.push(HostOp::RemoveAttribute {
            node: *instance,
            name: name.to_string(),
        });
    }

    fn set_style_property(&mut self, instance: &HostNodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(*instance) {
            node.style.insert(name.to_string(), value.to_string());
        }
        self.ops.push(HostOp::SetStyle {
            node: *instance,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_style_property(&mut self, instance: &HostNodeId, name: &str) {
        if let Some(node) = self.node_mut(*instance) {
            node.style.remove(name);
        }
        self.ops.push(HostOp::RemoveStyle {
            node: *instance,
            name: name.to_string(),
        });
    }

    fn set_text_content(&mut self, instance: &HostNodeId, text: &str) {
        if let Some(node) = self.node_mut(*instance) {
            node.text = Some(text.to_string());
        }
        self.ops.push(HostOp::SetTextContent {
            node: *instance,
            text: text.to_string(),
        });
    }

    fn reset_text_content(&mut self, instance: &HostNodeId) {
        if let Some(node) = self.node_mut(*instance) {
            node.text = None;
        }
        self.ops.push(HostOp::ResetTextContent { node: *instance });
    }

    fn commit_text_update(&mut self, instance: &HostNodeId, text: &str) {
        if let Some(node) = self.node_mut(*instance) {
            node.text = Some(text.to_string());
        }
        self.ops.push(HostOp::CommitTextUpdate {
            node: *instance,
            text: text.to_string(),
        });
    }

    fn add_event_listener(&mut self, instance: &HostNodeId, event: &str, handler: EventHandler) {
        if let Some(node) = self.node_mut(*instance) {
            node.listeners.insert(event.to_string(), handler);
        }
        self.ops.push(HostOp::AddListener {
            node: *instance,
            event: event.to_string(),
        });
    }

    fn remove_event_listener(&mut self, instance: &HostNodeId, event: &str) {
        if let Some(node) = self.node_mut(*instance) {
            node.listeners.remove(event);
        }
        self.ops.push(HostOp::RemoveListener {
            node: *instance,
            event: event.to_string(),
        });
    }

    fn release_instance(&mut self, instance: &HostNodeId) {
        if let Some(node) = self.node_mut(*instance) {
            node.released = true;
            node.listeners.clear();
        }
        self.ops.push(HostOp::Release { node: *instance });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_markup_shape() {
        let mut host = MemoryHost::new();
        let root = host.create_container();
        let div = host.create_instance("div");
        let span = host.create_instance("span");
        let text = host.create_text_instance("hi");
        host.set_attribute(&div, "id", "a");
        host.append_child(&div, &span);
        host.append_child(&div, &text);
        host.append_child(&root, &div);

        assert_eq!(host.to_markup(root), "<div id=\"a\"><span></span>hi</div>");
        assert_eq!(host.parent(span), Some(div));
    }

    #[test]
    fn test_append_moves_attached_child() {
        let mut host = MemoryHost::new();
        let root = host.create_container();
        let a = host.create_instance("a");
        let b = host.create_instance("b");
        host.append_child(&root, &a);
        host.append_child(&root, &b);
        host.append_child(&root, &a);

        assert_eq!(host.children(root), &[b, a]);
    }

    #[test]
    fn test_insert_before() {
        let mut host = MemoryHost::new();
        let root = host.create_container();
        let a = host.create_instance("a");
        let c = host.create_instance("c");
        let b = host.create_instance("b");
        host.append_child(&root, &a);
        host.append_child(&root, &c);
        host.insert_before(&root, &b, &c);

        assert_eq!(host.to_markup(root), "<a></a><b></b><c></c>");
    }

    #[test]
    fn test_remove_and_release() {
        let mut host = MemoryHost::new();
        let root = host.create_container();
        let a = host.create_instance("a");
        host.append_child(&root, &a);
        host.remove_child(&root, &a);
        host.release_instance(&a);

        assert!(host.children(root).is_empty());
        assert!(host.is_released(a));
        assert_eq!(host.ops().iter().filter(|op| op.is_structural()).count(), 2);
    }

    #[test]
    fn test_released_slot_is_not_reused() {
        let mut host = MemoryHost::new();
        let a = host.create_instance("a");
        host.release_instance(&a);

        let b = host.create_instance("b");

        assert_ne!(a, b);
        assert!(host.is_released(a));
        assert!(!host.is_released(b));
        assert_eq!(host.node_count(), 2);
    }

    #[test]
    fn test_dispatch_runs_listener() {
        let mut host = MemoryHost::new();
        let button = host.create_instance("button");
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        host.add_event_listener(
            &button,
            "click",
            EventHandler::new(move |_| counter.set(counter.get() + 1)),
        );

        assert!(host.dispatch(button, "click"));
        assert!(!host.dispatch(button, "keydown"));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_text_content_keeps_children() {
        let mut host = MemoryHost::new();
        let p = host.create_instance("p");
        let b = host.create_instance("b");
        host.set_text_content(&p, "x");
        host.append_child(&p, &b);
        host.reset_text_content(&p);

        assert_eq!(host.to_markup(p), "<p><b></b></p>");
    }
}
