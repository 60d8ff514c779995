//! Reconciler - the per-unit phases of a render.
//!
//! - [`begin_work`] - Produce a fiber's children description and diff it
//! - [`child_fiber`] - The positional children diff
//! - [`complete_work`] - Create host instances, compute update payloads
//!
//! Every call receives the [`RenderSession`] of the render it belongs to.
//! There is no ambient state: what a render knows lives in the session.

pub mod begin_work;
pub mod child_fiber;
pub mod complete_work;

use std::cell::Cell;
use std::rc::Rc;

use crate::config::RootOptions;
use crate::engine::FiberArena;
use crate::host::HostConfig;

pub use begin_work::{begin_work, create_fiber_from_element};
pub use child_fiber::reconcile_children;
pub use complete_work::complete_work;

/// Everything one render session threads through its units of work.
pub struct RenderSession<'a, H: HostConfig> {
    pub arena: &'a mut FiberArena<H::Instance>,
    pub host: &'a mut H,
    pub options: &'a RootOptions,
    /// Set by state updaters of class instances constructed in this session.
    pub(crate) dirty: Rc<Cell<bool>>,
    /// Host instances created by completion. Released if the session aborts.
    pub created: Vec<H::Instance>,
    /// Units of work performed.
    pub units: usize,
}

impl<'a, H: HostConfig> RenderSession<'a, H> {
    pub fn new(
        arena: &'a mut FiberArena<H::Instance>,
        host: &'a mut H,
        options: &'a RootOptions,
        dirty: Rc<Cell<bool>>,
    ) -> Self {
        RenderSession {
            arena,
            host,
            options,
            dirty,
            created: Vec::new(),
            units: 0,
        }
    }
}
