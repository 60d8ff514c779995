//! Host platform seam.
//!
//! The reconciler never owns the display tree. It drives a [`HostConfig`]
//! implementation, and only from two places:
//!
//! - **completion**, which creates detached instances and fills them with
//!   their initial props and children, and
//! - **commit**, which attaches, updates, and removes instances in the live
//!   tree.
//!
//! The begin phase never calls into the host, so a render that fails before
//! commit leaves the attached tree exactly as it was.
//!
//! [`MemoryHost`] is a complete in-memory implementation used by the tests
//! and the demos.

pub mod memory;
pub mod payload;

use std::fmt;

use crate::element::EventHandler;

pub use memory::{HostNode, HostNodeId, HostNodeKind, HostOp, MemoryHost};
pub use payload::{PropChange, UpdatePayload};

/// Host platform operations consumed by completion and commit.
///
/// `Instance` is a cheap handle (an index, an `Rc`, a JS reference). Both
/// fibers of a double-buffered pair hold a clone of the same handle.
pub trait HostConfig {
    type Instance: Clone + PartialEq + fmt::Debug;

    /// Create a detached primitive instance for a host type name.
    fn create_instance(&mut self, type_name: &str) -> Self::Instance;

    /// Create a detached text instance.
    fn create_text_instance(&mut self, text: &str) -> Self::Instance;

    /// Append `child` as the last child of `parent`, moving it if attached
    /// elsewhere.
    fn append_child(&mut self, parent: &Self::Instance, child: &Self::Instance);

    /// Insert `child` into `parent` right before `before`.
    fn insert_before(
        &mut self,
        parent: &Self::Instance,
        child: &Self::Instance,
        before: &Self::Instance,
    );

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Instance, child: &Self::Instance);

    fn set_attribute(&mut self, instance: &Self::Instance, name: &str, value: &str);

    fn remove_attribute(&mut self, instance: &Self::Instance, name: &str);

    fn set_style_property(&mut self, instance: &Self::Instance, name: &str, value: &str);

    fn remove_style_property(&mut self, instance: &Self::Instance, name: &str);

    /// Set the text content of a primitive whose only child is text.
    fn set_text_content(&mut self, instance: &Self::Instance, text: &str);

    /// Clear text content set by [`set_text_content`](Self::set_text_content).
    /// Must leave child instances in place.
    fn reset_text_content(&mut self, instance: &Self::Instance);

    /// Replace the text of a text instance.
    fn commit_text_update(&mut self, instance: &Self::Instance, text: &str);

    fn add_event_listener(&mut self, instance: &Self::Instance, event: &str, handler: EventHandler);

    fn remove_event_listener(&mut self, instance: &Self::Instance, event: &str);

    /// Free an instance that will never be attached again.
    fn release_instance(&mut self, _instance: &Self::Instance) {}
}
