//! Double buffering - the work-in-progress mirror of a committed fiber.
//!
//! ```text
//! render N:     current ──alternate──▶ (allocated here, once)
//! render N+1:   current ◀──alternate──▶ previous current, reset and reused
//! ```
//!
//! After the first render at a position, the same two fibers alternate
//! roles forever; nothing else allocates for that position.

use crate::element::Props;

use super::arena::FiberArena;
use super::fiber::{Fiber, FiberId};

/// Return the fiber that represents `current`'s position in the next render.
///
/// The returned fiber carries `current`'s committed snapshot (children,
/// memoized props and state, sibling link, index) and its host and class
/// instances, with the transient fields reset. `current` itself is never
/// written except for its `alternate` link on first allocation.
pub fn prepare_work_in_progress<I: Clone>(
    arena: &mut FiberArena<I>,
    current: FiberId,
    pending_props: Props,
) -> FiberId {
    let wip = match arena[current].alternate {
        Some(alternate) => {
            let fiber = &mut arena[alternate];
            fiber.pending_props = pending_props;
            fiber.effect_tag = Default::default();
            fiber.first_effect = None;
            fiber.last_effect = None;
            fiber.next_effect = None;
            fiber.update_payload = None;
            alternate
        }
        None => {
            let source = &arena[current];
            let fiber = Fiber::new(
                source.tag,
                source.key.clone(),
                source.element_type.clone(),
                pending_props,
            );
            let wip = arena.allocate(fiber);
            arena[wip].alternate = Some(current);
            arena[current].alternate = Some(wip);
            wip
        }
    };

    let source = &arena[current];
    let first_child = source.first_child;
    let next_sibling = source.next_sibling;
    let index = source.index;
    let parent = source.parent;
    let memoized_props = source.memoized_props.clone();
    let memoized_state = source.memoized_state.clone();
    let instance = source.instance.clone();
    let class_instance = source.class_instance.clone();

    let fiber = &mut arena[wip];
    fiber.first_child = first_child;
    fiber.next_sibling = next_sibling;
    fiber.index = index;
    fiber.parent = parent;
    fiber.memoized_props = memoized_props;
    fiber.memoized_state = memoized_state;
    fiber.instance = instance;
    fiber.class_instance = class_instance;
    wip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoizedState;
    use crate::types::{EffectTag, FiberTag};

    fn committed(arena: &mut FiberArena<u32>) -> FiberId {
        let mut fiber = Fiber::host_text("a".into());
        fiber.instance = Some(11);
        fiber.memoized_props = Some(Props::new().with_children("a"));
        fiber.index = 2;
        arena.allocate(fiber)
    }

    #[test]
    fn test_first_call_allocates_and_links() {
        let mut arena = FiberArena::new();
        let current = committed(&mut arena);

        let wip = prepare_work_in_progress(&mut arena, current, Props::new().with_children("b"));

        assert_ne!(wip, current);
        assert_eq!(arena[wip].alternate, Some(current));
        assert_eq!(arena[current].alternate, Some(wip));
        assert_eq!(arena[wip].tag, FiberTag::HostText);
        assert_eq!(arena[wip].instance, Some(11));
        assert_eq!(arena[wip].index, 2);
        assert_eq!(arena[wip].text(), Some("b"));
        assert_eq!(arena[current].text(), Some("a"));
    }

    #[test]
    fn test_second_call_reuses_alternate() {
        let mut arena = FiberArena::new();
        let current = committed(&mut arena);
        let wip = prepare_work_in_progress(&mut arena, current, Props::default());
        arena[wip].effect_tag = EffectTag::UPDATE;
        arena[wip].next_effect = Some(current);
        arena[wip].memoized_state = MemoizedState::Component(Default::default());

        let again = prepare_work_in_progress(&mut arena, current, Props::default());

        assert_eq!(again, wip);
        assert_eq!(arena.len(), 2);
        assert!(arena[again].effect_tag.is_empty());
        assert_eq!(arena[again].next_effect, None);
        assert_eq!(arena[again].memoized_state, MemoizedState::None);
    }

    #[test]
    fn test_roles_swap_symmetrically() {
        let mut arena = FiberArena::new();
        let a = committed(&mut arena);
        let b = prepare_work_in_progress(&mut arena, a, Props::default());
        // b is committed; the next render mirrors it back onto a.
        let next = prepare_work_in_progress(&mut arena, b, Props::default());

        assert_eq!(next, a);
        assert_eq!(arena[arena[a].alternate.unwrap()].alternate, Some(a));
    }
}
