//! Root container - one mount point and its committed tree.
//!
//! # Example
//!
//! ```ignore
//! use spark_fiber::{Element, MemoryHost, Root};
//!
//! let mut host = MemoryHost::new();
//! let container = host.create_container();
//! let mut root = Root::new(host, container);
//!
//! root.render(Element::host("div").with_children("hi"))?;
//! assert_eq!(root.host().to_markup(container), "<div>hi</div>");
//! ```
//!
//! A render is one synchronous session: build the work-in-progress tree,
//! commit its effect list, then promote it to current. If the session fails
//! before commit, everything it built is discarded and the host tree is left
//! exactly as the last commit made it.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::config::RootOptions;
use crate::element::{Element, Props};
use crate::engine::{prepare_work_in_progress, Fiber, FiberArena, FiberId, MemoizedState};
use crate::error::Result;
use crate::host::HostConfig;
use crate::reconciler::RenderSession;
use crate::types::EffectTag;

use super::commit::commit_root;
use super::effect_list::RenderSummary;
use super::work_loop::WorkLoop;

/// A mount point: host, container, and the fiber trees rendered into it.
pub struct Root<H: HostConfig> {
    host: H,
    container: H::Instance,
    options: RootOptions,
    arena: FiberArena<H::Instance>,
    current: FiberId,
    /// Last element rendered, replayed by [`flush_updates`](Self::flush_updates).
    element: Option<Element>,
    /// Set when a class instance enqueues state.
    dirty: Rc<Cell<bool>>,
    /// Bumped after every commit.
    generation: Signal<u64>,
}

impl<H: HostConfig> Root<H> {
    pub fn new(host: H, container: H::Instance) -> Self {
        Self::with_options(host, container, RootOptions::default())
    }

    pub fn with_options(host: H, container: H::Instance, options: RootOptions) -> Self {
        let mut arena = FiberArena::new();
        let current = arena.allocate(Fiber::host_root(container.clone()));
        Root {
            host,
            container,
            options,
            arena,
            current,
            element: None,
            dirty: Rc::new(Cell::new(false)),
            generation: signal(0),
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render `element` into the container and commit.
    pub fn render(&mut self, element: Element) -> Result<RenderSummary> {
        self.perform(Some(element))
    }

    /// [`render`](Self::render), then invoke `callback` once the host tree
    /// is updated. The callback does not run when the render fails.
    pub fn render_with<F>(&mut self, element: Element, callback: F) -> Result<RenderSummary>
    where
        F: FnOnce(&RenderSummary),
    {
        let summary = self.render(element)?;
        callback(&summary);
        Ok(summary)
    }

    /// Re-render the last element if any class instance enqueued state.
    pub fn flush_updates(&mut self) -> Result<Option<RenderSummary>> {
        if !self.dirty.get() {
            return Ok(None);
        }
        let element = self.element.clone();
        self.perform(element).map(Some)
    }

    pub fn has_pending_updates(&self) -> bool {
        self.dirty.get()
    }

    /// Render nothing: every mounted node is deleted.
    pub fn unmount(&mut self) -> Result<RenderSummary> {
        self.perform(None)
    }

    fn perform(&mut self, element: Option<Element>) -> Result<RenderSummary> {
        let span = tracing::debug_span!(
            "render",
            element = element.as_ref().map(|e| e.element_type.name()).unwrap_or("<none>")
        );
        let _enter = span.enter();

        self.dirty.set(false);
        let wip = prepare_work_in_progress(&mut self.arena, self.current, Props::default());
        self.arena[wip].memoized_state = match &element {
            Some(element) => MemoizedState::Element(element.clone()),
            None => MemoizedState::None,
        };

        let mut session = RenderSession::new(
            &mut self.arena,
            &mut self.host,
            &self.options,
            self.dirty.clone(),
        );
        let outcome = WorkLoop::new(wip).run_to_completion(&mut session);
        let units_of_work = session.units;
        let created = std::mem::take(&mut session.created);

        if let Err(error) = outcome {
            tracing::debug!(%error, units_of_work, "render aborted before commit");
            self.abort(created);
            return Err(error);
        }

        let effects = commit_root(&mut self.arena, &mut self.host, wip);
        self.current = wip;
        self.element = element;
        let swept = self.arena.sweep(wip);

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        tracing::debug!(
            generation,
            effects = effects.len(),
            units_of_work,
            swept,
            fibers = self.arena.len(),
            "committed"
        );

        Ok(RenderSummary {
            effects,
            units_of_work,
            swept,
        })
    }

    /// Drop everything a failed session built.
    fn abort(&mut self, created: Vec<H::Instance>) {
        for instance in &created {
            self.host.release_instance(instance);
        }
        for id in self.arena.subtree(self.current) {
            let fiber = &mut self.arena[id];
            fiber.effect_tag = EffectTag::empty();
            fiber.next_effect = None;
        }
        let swept = self.arena.sweep(self.current);
        tracing::trace!(released = created.len(), swept, "discarded work in progress");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn container(&self) -> &H::Instance {
        &self.container
    }

    pub fn options(&self) -> &RootOptions {
        &self.options
    }

    /// Root fiber of the committed tree.
    pub fn current(&self) -> FiberId {
        self.current
    }

    pub fn fiber(&self, id: FiberId) -> Option<&Fiber<H::Instance>> {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &FiberArena<H::Instance> {
        &self.arena
    }

    /// Number of commits so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// The commit counter as a signal, for effects that follow commits.
    pub fn generation_signal(&self) -> Signal<u64> {
        self.generation.clone()
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
