//! Work loop - the iterative depth-first driver.
//!
//! One cursor walks the whole work-in-progress tree. Each step performs one
//! unit of work and yields the next cursor:
//!
//! ```text
//!            begin ▼ (descend to first child)
//!   [root] ──▶ [div] ──▶ [span]          leaf: complete, then
//!                 ▲         │            sibling if any, else
//!                 │         ▼            complete parent and retry
//!              complete ◀─ ["hi"]
//! ```
//!
//! The cursor is a value ([`WorkStep`]), so a caller could stop between any
//! two units. Nothing here does; a session always runs to [`WorkStep::Idle`].

use crate::engine::FiberId;
use crate::error::Result;
use crate::host::HostConfig;
use crate::reconciler::{begin_work, complete_work, RenderSession};

use super::effect_list::merge_child_effects;

/// Position of the work loop between two units of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStep {
    /// This fiber is the next unit of work.
    NextUnit(FiberId),
    /// The tree is finished.
    Idle,
}

/// The externalized cursor of one render session.
#[derive(Debug, Clone, Copy)]
pub struct WorkLoop {
    cursor: WorkStep,
}

impl WorkLoop {
    /// Start at the work-in-progress root.
    pub fn new(root: FiberId) -> Self {
        WorkLoop {
            cursor: WorkStep::NextUnit(root),
        }
    }

    pub fn cursor(&self) -> WorkStep {
        self.cursor
    }

    pub fn is_idle(&self) -> bool {
        self.cursor == WorkStep::Idle
    }

    /// Perform one unit of work. Idle stays idle.
    pub fn step<H: HostConfig>(&mut self, session: &mut RenderSession<'_, H>) -> Result<WorkStep> {
        if let WorkStep::NextUnit(unit) = self.cursor {
            self.cursor = perform_unit_of_work(session, unit)?;
        }
        Ok(self.cursor)
    }

    /// Step until idle.
    pub fn run_to_completion<H: HostConfig>(
        &mut self,
        session: &mut RenderSession<'_, H>,
    ) -> Result<()> {
        while !self.is_idle() {
            self.step(session)?;
        }
        Ok(())
    }
}

/// Begin `fiber`; descend into its first child, or complete it when it is a
/// leaf.
pub fn perform_unit_of_work<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    fiber: FiberId,
) -> Result<WorkStep> {
    session.units += 1;
    let next = begin_work(session, fiber)?;

    let props = session.arena[fiber].pending_props.clone();
    session.arena[fiber].memoized_props = Some(props);

    Ok(match next {
        Some(child) => WorkStep::NextUnit(child),
        None => complete_unit_of_work(session, fiber),
    })
}

/// Complete `fiber` and its ancestors until one has a sibling to begin.
pub fn complete_unit_of_work<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    fiber: FiberId,
) -> WorkStep {
    let mut fiber = fiber;
    loop {
        complete_work(session, fiber);

        let parent = session.arena[fiber].parent;
        if let Some(parent) = parent {
            merge_child_effects(session.arena, parent, fiber);
        }

        if let Some(sibling) = session.arena[fiber].next_sibling {
            return WorkStep::NextUnit(sibling);
        }
        match parent {
            Some(parent) => fiber = parent,
            None => return WorkStep::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::RootOptions;
    use crate::element::{Element, Props};
    use crate::engine::{prepare_work_in_progress, Fiber, FiberArena, MemoizedState};
    use crate::host::MemoryHost;

    #[test]
    fn test_steps_visit_preorder_then_idle() {
        let mut host = MemoryHost::new();
        let container = host.create_container();
        let mut arena = FiberArena::new();
        let current = arena.allocate(Fiber::host_root(container));
        let root = prepare_work_in_progress(&mut arena, current, Props::default());
        let element = Element::host("div").with_children(crate::children![Element::host("span"), "hi"]);
        arena[root].memoized_state = MemoizedState::Element(element);
        let options = RootOptions::default();

        let mut session = RenderSession::new(&mut arena, &mut host, &options, Rc::default());
        let mut work = WorkLoop::new(root);
        let mut visited = Vec::new();
        while let WorkStep::NextUnit(unit) = work.cursor() {
            visited.push(session.arena[unit].label().to_string());
            work.step(&mut session).unwrap();
        }

        assert_eq!(visited, ["#root", "div", "span", "#text"]);
        assert_eq!(session.units, 4);
        assert!(work.is_idle());
        assert_eq!(work.step(&mut session).unwrap(), WorkStep::Idle);
        assert_eq!(session.units, 4);
    }

    #[test]
    fn test_render_phase_leaves_container_empty() {
        let mut host = MemoryHost::new();
        let container = host.create_container();
        let mut arena = FiberArena::new();
        let current = arena.allocate(Fiber::host_root(container));
        let root = prepare_work_in_progress(&mut arena, current, Props::default());
        arena[root].memoized_state = MemoizedState::Element(Element::host("div"));
        let options = RootOptions::default();

        let mut session = RenderSession::new(&mut arena, &mut host, &options, Rc::default());
        WorkLoop::new(root).run_to_completion(&mut session).unwrap();

        assert!(host.children(container).is_empty());
        let div = arena[root].first_child.unwrap();
        assert_eq!(arena[root].first_effect, Some(div));
        assert!(arena[div].instance.is_some());
    }
}
