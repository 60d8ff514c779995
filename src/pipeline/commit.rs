//! Commit - apply the effect list to the host tree in one pass.
//!
//! Effects are applied head to tail. For each fiber:
//!
//! - Deletion: detach its top-level host nodes, unmount class instances,
//!   release host instances
//! - Update: replay the update payload (or the new text)
//! - Placement: attach its top-level host nodes under the nearest host
//!   parent, before the next stable host sibling
//!
//! A fiber tagged PlacementAndUpdate is updated, then placed. Each fiber's
//! tag is cleared once applied, which also makes it a valid insertion
//! anchor for the siblings placed after it.

use crate::engine::{FiberArena, FiberId};
use crate::host::payload::apply_changes;
use crate::host::HostConfig;
use crate::types::{EffectTag, FiberTag};

use super::effect_list::EffectRecord;

/// Walk `finished`'s effect list once and apply every effect.
pub fn commit_root<H: HostConfig>(
    arena: &mut FiberArena<H::Instance>,
    host: &mut H,
    finished: FiberId,
) -> Vec<EffectRecord> {
    let span = tracing::debug_span!("commit", root = %finished);
    let _enter = span.enter();

    let mut records = Vec::new();
    let mut next = arena[finished].first_effect;
    while let Some(fiber) = next {
        next = arena[fiber].next_effect;
        let effect = arena[fiber].effect_tag;
        tracing::trace!(%fiber, %effect, label = arena[fiber].label(), "apply effect");

        records.push(EffectRecord {
            fiber,
            tag: arena[fiber].tag,
            effect,
            label: arena[fiber].label().to_string(),
            key: arena[fiber].key.clone(),
        });

        if effect.contains(EffectTag::DELETION) {
            commit_deletion(arena, host, fiber);
        } else {
            if effect.contains(EffectTag::UPDATE) {
                commit_update(arena, host, fiber);
            }
            if effect.contains(EffectTag::PLACEMENT) {
                commit_placement(arena, host, fiber);
            }
        }

        arena[fiber].effect_tag = EffectTag::empty();
        arena[fiber].next_effect = None;
    }

    arena[finished].first_effect = None;
    arena[finished].last_effect = None;
    records
}

// =============================================================================
// Host lookups
// =============================================================================

/// Instance of the nearest ancestor that can take host children.
fn host_parent<I: Clone>(arena: &FiberArena<I>, fiber: FiberId) -> Option<I> {
    let mut node = arena[fiber].parent;
    while let Some(id) = node {
        if arena[id].tag.is_host_parent() {
            return arena[id].instance.clone();
        }
        node = arena[id].parent;
    }
    None
}

/// Host node of the first following sibling subtree that is already
/// attached. `None` means append.
pub fn host_sibling<I: Clone>(arena: &FiberArena<I>, fiber: FiberId) -> Option<I> {
    let mut node = fiber;
    'siblings: loop {
        while arena[node].next_sibling.is_none() {
            match arena[node].parent {
                Some(parent) if !arena[parent].tag.is_host_parent() => node = parent,
                _ => return None,
            }
        }
        node = arena[node].next_sibling?;

        while !arena[node].tag.is_host() {
            if arena[node].effect_tag.contains(EffectTag::PLACEMENT) {
                continue 'siblings;
            }
            match arena[node].first_child {
                Some(child) => node = child,
                None => continue 'siblings,
            }
        }

        if !arena[node].effect_tag.contains(EffectTag::PLACEMENT) {
            return arena[node].instance.clone();
        }
    }
}

fn instances<I: Clone>(arena: &FiberArena<I>, fibers: Vec<FiberId>) -> Vec<I> {
    fibers
        .into_iter()
        .filter_map(|id| arena[id].instance.clone())
        .collect()
}

// =============================================================================
// Effects
// =============================================================================

fn commit_placement<H: HostConfig>(arena: &mut FiberArena<H::Instance>, host: &mut H, fiber: FiberId) {
    let Some(parent) = host_parent(arena, fiber) else {
        tracing::warn!(%fiber, "placement without a host parent");
        return;
    };
    let before = host_sibling(arena, fiber);

    for node in instances(arena, arena.host_nodes(fiber)) {
        match &before {
            Some(before) => host.insert_before(&parent, &node, before),
            None => host.append_child(&parent, &node),
        }
    }
}

fn commit_update<H: HostConfig>(arena: &mut FiberArena<H::Instance>, host: &mut H, fiber: FiberId) {
    match arena[fiber].tag {
        FiberTag::HostComponent => {
            let payload = arena[fiber].update_payload.take();
            if let (Some(instance), Some(payload)) = (&arena[fiber].instance, payload) {
                apply_changes(host, instance, &payload);
            }
        }
        FiberTag::HostText => {
            let text = arena[fiber].text().unwrap_or_default();
            if let Some(instance) = &arena[fiber].instance {
                host.commit_text_update(instance, text);
            }
        }
        FiberTag::HostRoot | FiberTag::ClassComponent | FiberTag::FunctionComponent => {}
    }
}

fn commit_deletion<H: HostConfig>(arena: &mut FiberArena<H::Instance>, host: &mut H, fiber: FiberId) {
    let subtree = arena.subtree(fiber);

    for &id in &subtree {
        if let Some(instance) = &arena[id].class_instance {
            instance.borrow_mut().component.component_will_unmount();
        }
    }

    if let Some(parent) = host_parent(arena, fiber) {
        for node in instances(arena, arena.host_nodes(fiber)) {
            host.remove_child(&parent, &node);
        }
    }

    for &id in &subtree {
        if arena[id].tag.is_host() {
            if let Some(instance) = &arena[id].instance {
                host.release_instance(instance);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementType, Props};
    use crate::engine::Fiber;
    use crate::host::{HostNodeId, MemoryHost, PropChange};

    fn host_fiber(arena: &mut FiberArena<HostNodeId>, host: &mut MemoryHost, name: &str) -> FiberId {
        let mut fiber = Fiber::new(
            FiberTag::HostComponent,
            None,
            Some(ElementType::Host(name.into())),
            Props::default(),
        );
        fiber.instance = Some(host.create_instance(name));
        arena.allocate(fiber)
    }

    fn link(arena: &mut FiberArena<HostNodeId>, parent: FiberId, children: &[FiberId]) {
        arena[parent].first_child = children.first().copied();
        for pair in children.windows(2) {
            arena[pair[0]].next_sibling = Some(pair[1]);
        }
        for &child in children {
            arena[child].parent = Some(parent);
        }
    }

    #[test]
    fn test_placement_inserts_before_stable_sibling() {
        let mut arena = FiberArena::new();
        let mut host = MemoryHost::new();
        let container = host.create_container();
        let root = arena.allocate(Fiber::host_root(container));
        let a = host_fiber(&mut arena, &mut host, "a");
        let b = host_fiber(&mut arena, &mut host, "b");
        let c = host_fiber(&mut arena, &mut host, "c");
        link(&mut arena, root, &[a, b, c]);
        host.append_child(&container, &arena[c].instance.unwrap());
        arena[a].effect_tag = EffectTag::PLACEMENT;
        arena[b].effect_tag = EffectTag::PLACEMENT;
        arena[root].first_effect = Some(a);
        arena[a].next_effect = Some(b);
        arena[root].last_effect = Some(b);

        let records = commit_root(&mut arena, &mut host, root);

        assert_eq!(records.len(), 2);
        assert_eq!(host.to_markup(container), "<a></a><b></b><c></c>");
        assert!(arena[a].effect_tag.is_empty());
        assert_eq!(arena[root].first_effect, None);
    }

    #[test]
    fn test_placement_and_update_moves_and_updates() {
        let mut arena = FiberArena::new();
        let mut host = MemoryHost::new();
        let container = host.create_container();
        let root = arena.allocate(Fiber::host_root(container));
        let a = host_fiber(&mut arena, &mut host, "a");
        let b = host_fiber(&mut arena, &mut host, "b");
        link(&mut arena, root, &[a, b]);
        host.append_child(&container, &arena[b].instance.unwrap());
        host.append_child(&container, &arena[a].instance.unwrap());
        assert_eq!(host.to_markup(container), "<b></b><a></a>");

        arena[a].effect_tag = EffectTag::PLACEMENT_AND_UPDATE;
        arena[a].update_payload = Some(vec![PropChange::SetAttribute {
            name: "id".into(),
            value: "x".into(),
        }]);
        arena[root].first_effect = Some(a);
        arena[root].last_effect = Some(a);

        let records = commit_root(&mut arena, &mut host, root);

        assert_eq!(records[0].effect, EffectTag::PLACEMENT_AND_UPDATE);
        assert_eq!(host.to_markup(container), "<a id=\"x\"></a><b></b>");
        assert!(arena[a].update_payload.is_none());
    }

    #[test]
    fn test_host_sibling_skips_placed_wrappers() {
        let mut arena = FiberArena::new();
        let mut host = MemoryHost::new();
        let container = host.create_container();
        let root = arena.allocate(Fiber::host_root(container));
        let target = host_fiber(&mut arena, &mut host, "x");
        let placed_wrapper = arena.allocate(Fiber::new(
            FiberTag::FunctionComponent,
            None,
            None,
            Props::default(),
        ));
        let inner = host_fiber(&mut arena, &mut host, "inner");
        let empty_wrapper = arena.allocate(Fiber::new(
            FiberTag::FunctionComponent,
            None,
            None,
            Props::default(),
        ));
        let stable = host_fiber(&mut arena, &mut host, "stable");
        link(&mut arena, root, &[target, placed_wrapper, empty_wrapper, stable]);
        link(&mut arena, placed_wrapper, &[inner]);
        arena[placed_wrapper].effect_tag = EffectTag::PLACEMENT;

        assert_eq!(host_sibling(&arena, target), arena[stable].instance);
        assert_eq!(host_sibling(&arena, stable), None);
    }

    #[test]
    fn test_deletion_detaches_and_releases_subtree() {
        let mut arena = FiberArena::new();
        let mut host = MemoryHost::new();
        let container = host.create_container();
        let root = arena.allocate(Fiber::host_root(container));
        let ul = host_fiber(&mut arena, &mut host, "ul");
        let li = host_fiber(&mut arena, &mut host, "li");
        link(&mut arena, root, &[ul]);
        link(&mut arena, ul, &[li]);
        let ul_node = arena[ul].instance.unwrap();
        let li_node = arena[li].instance.unwrap();
        host.append_child(&ul_node, &li_node);
        host.append_child(&container, &ul_node);

        arena[ul].effect_tag = EffectTag::DELETION;
        arena[root].first_effect = Some(ul);
        arena[root].last_effect = Some(ul);
        commit_root(&mut arena, &mut host, root);

        assert_eq!(host.to_markup(container), "");
        assert!(host.is_released(ul_node));
        assert!(host.is_released(li_node));
    }
}
