//! Fiber - one logical tree position across renders.
//!
//! A fiber is a record in the [`FiberArena`](super::FiberArena). Every link
//! to another fiber is a [`FiberId`], never a pointer, so the cyclic shape
//! (parent back-links, alternate pairs) is plain data.
//!
//! ```text
//!            parent
//!   ┌────────────────────┐
//!   ▼                    │
//! [div] ──first_child──▶ [span] ──next_sibling──▶ ["hi"]
//!   ▲                                               │
//!   └──────────────────── parent ───────────────────┘
//!
//! [div] ◀──alternate──▶ [div'] (other buffer)
//! ```

use std::fmt;

use crate::element::component::ClassInstanceCell;
use crate::element::{Element, ElementType, Props, State};
use crate::host::UpdatePayload;
use crate::types::{EffectTag, FiberTag, Key};

// =============================================================================
// Fiber Id
// =============================================================================

/// Stable index of a fiber in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberId(pub(crate) usize);

impl FiberId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Memoized State
// =============================================================================

/// Last committed render state of a fiber.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MemoizedState {
    #[default]
    None,
    /// Host root: the element being rendered into the container.
    Element(Element),
    /// Class component state.
    Component(State),
}

// =============================================================================
// Fiber
// =============================================================================

/// Per-position render state. `I` is the host instance handle type.
pub struct Fiber<I> {
    pub tag: FiberTag,
    pub key: Option<Key>,
    /// `None` for the host root and host text.
    pub element_type: Option<ElementType>,

    pub pending_props: Props,
    pub memoized_props: Option<Props>,
    pub memoized_state: MemoizedState,

    /// Host primitive (or the container, for the host root).
    pub instance: Option<I>,
    pub(crate) class_instance: Option<ClassInstanceCell>,
    pub update_payload: Option<UpdatePayload>,

    pub effect_tag: EffectTag,

    pub parent: Option<FiberId>,
    pub first_child: Option<FiberId>,
    pub next_sibling: Option<FiberId>,
    /// Position among siblings.
    pub index: usize,
    pub alternate: Option<FiberId>,

    pub first_effect: Option<FiberId>,
    pub last_effect: Option<FiberId>,
    pub next_effect: Option<FiberId>,
}

impl<I> Fiber<I> {
    pub fn new(
        tag: FiberTag,
        key: Option<Key>,
        element_type: Option<ElementType>,
        pending_props: Props,
    ) -> Self {
        Fiber {
            tag,
            key,
            element_type,
            pending_props,
            memoized_props: None,
            memoized_state: MemoizedState::None,
            instance: None,
            class_instance: None,
            update_payload: None,
            effect_tag: EffectTag::empty(),
            parent: None,
            first_child: None,
            next_sibling: None,
            index: 0,
            alternate: None,
            first_effect: None,
            last_effect: None,
            next_effect: None,
        }
    }

    /// The root fiber of a container.
    pub fn host_root(container: I) -> Self {
        let mut fiber = Fiber::new(FiberTag::HostRoot, None, None, Props::default());
        fiber.instance = Some(container);
        fiber
    }

    /// Host text fiber. The text lives in the `children` prop.
    pub fn host_text(text: String) -> Self {
        Fiber::new(
            FiberTag::HostText,
            None,
            None,
            Props::new().with_children(text),
        )
    }

    /// Name used in logs and effect records.
    pub fn label(&self) -> &str {
        match (&self.element_type, self.tag) {
            (Some(element_type), _) => element_type.name(),
            (None, FiberTag::HostRoot) => "#root",
            (None, _) => "#text",
        }
    }

    /// Text of a host text fiber.
    pub fn text(&self) -> Option<&str> {
        self.pending_props.text_content()
    }
}

impl<I: fmt::Debug> fmt::Debug for Fiber<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fiber")
            .field("tag", &self.tag)
            .field("label", &self.label())
            .field("key", &self.key)
            .field("effect_tag", &self.effect_tag)
            .field("instance", &self.instance)
            .field("parent", &self.parent)
            .field("first_child", &self.first_child)
            .field("next_sibling", &self.next_sibling)
            .field("index", &self.index)
            .field("alternate", &self.alternate)
            .finish_non_exhaustive()
    }
}
