//! Children reconciliation - the positional diff.
//!
//! The new children description is walked alongside the previous child
//! chain, one structural slot at a time:
//!
//! ```text
//! old:  [A] ─ [B] ─ [C]
//! new:   A'    X          A' reused (Update if its props differ)
//!                         B deleted, X created (Placement)
//!                         C deleted (excess)
//! ```
//!
//! A slot is reused when the key and element type of the new entry match
//! the old fiber in that slot. Moves are never detected: a keyed entry that
//! changed position is deleted and re-created.

use crate::element::{Children, ElementType, Node, Props};
use crate::engine::{prepare_work_in_progress, Fiber, FiberArena, FiberId};
use crate::error::Result;
use crate::host::HostConfig;
use crate::types::{EffectTag, FiberTag};

use super::begin_work::create_fiber_from_element;
use super::RenderSession;

/// Diff `children` against `wip`'s previous children and rebuild its child
/// chain. Returns the new first child.
///
/// Children created under a fiber that had no committed counterpart are
/// left untagged: completion of the new parent appends their host nodes.
pub fn reconcile_children<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    wip: FiberId,
    children: Children,
) -> Result<Option<FiberId>> {
    let arena = &mut *session.arena;
    let track = arena[wip].alternate.is_some();

    let mut old = arena[wip].first_child;
    let mut first = None;
    let mut previous: Option<FiberId> = None;

    for (index, node) in into_nodes(children).into_iter().enumerate() {
        let next_old = old.and_then(|id| arena[id].next_sibling);
        let reusable = old.filter(|&id| can_reuse(&arena[id], &node));

        let child = match reusable {
            Some(current) => {
                let props = node_props(node);
                let changed = arena[current]
                    .memoized_props
                    .as_ref()
                    .is_none_or(|before| before.differs_for_update(&props));
                let child = prepare_work_in_progress(arena, current, props);
                if changed {
                    arena[child].effect_tag |= EffectTag::UPDATE;
                }
                child
            }
            None => {
                if let Some(stale) = old {
                    delete_child(arena, wip, stale);
                }
                let fiber = match node {
                    Node::Text(text) => Fiber::host_text(text),
                    Node::Element(element) => create_fiber_from_element(element)?,
                };
                let child = arena.allocate(fiber);
                if track {
                    arena[child].effect_tag |= EffectTag::PLACEMENT;
                }
                child
            }
        };

        let fiber = &mut arena[child];
        fiber.parent = Some(wip);
        fiber.index = index;
        fiber.next_sibling = None;
        match previous {
            Some(previous) => arena[previous].next_sibling = Some(child),
            None => first = Some(child),
        }
        previous = Some(child);
        old = next_old;
    }

    while let Some(stale) = old {
        old = arena[stale].next_sibling;
        delete_child(arena, wip, stale);
    }

    arena[wip].first_child = first;
    Ok(first)
}

/// Tag a committed child for deletion and link it straight onto the
/// parent's effect list. Deleted subtrees are never traversed.
pub fn delete_child<I>(arena: &mut FiberArena<I>, parent: FiberId, child: FiberId) {
    tracing::trace!(fiber = %child, label = arena[child].label(), "deletion");
    arena[child].effect_tag = EffectTag::DELETION;
    arena[child].next_effect = None;

    match arena[parent].last_effect {
        Some(last) => arena[last].next_effect = Some(child),
        None => arena[parent].first_effect = Some(child),
    }
    arena[parent].last_effect = Some(child);
}

fn into_nodes(children: Children) -> Vec<Node> {
    match children {
        Children::None => Vec::new(),
        Children::One(node) => vec![*node],
        Children::Many(nodes) => nodes,
    }
}

fn can_reuse<I>(fiber: &Fiber<I>, node: &Node) -> bool {
    match node {
        Node::Text(_) => fiber.tag == FiberTag::HostText,
        Node::Element(element) => {
            fiber.key == element.key && fiber.element_type.as_ref() == Some(&element.element_type)
        }
    }
}

/// Props as the fiber will memoize them. Class props already carry their
/// defaults, so a default never reads as a change.
fn node_props(node: Node) -> Props {
    match node {
        Node::Text(text) => Props::new().with_children(text),
        Node::Element(element) => match &element.element_type {
            ElementType::Class(class) => element.props.merged_over(&class.default_props()),
            _ => element.props,
        },
    }
}
