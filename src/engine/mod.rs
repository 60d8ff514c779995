//! Fiber engine - the arena and the per-position render records.
//!
//! - [`fiber`] - The fiber record and its id
//! - [`arena`] - Index allocation, traversal, mark-and-sweep
//! - [`work_in_progress`] - The double-buffer builder
//!
//! # Architecture
//!
//! Fibers are NOT heap objects pointing at each other. They are slots in one
//! arena, linked by index:
//!
//! ```text
//! Slot 0: HostRoot       (first_child=2, alternate=1)
//! Slot 1: HostRoot       (first_child=3, alternate=0)   ◀ other buffer
//! Slot 2: HostComponent  (parent=0, next_sibling=4, alternate=3)
//! ```
//!
//! Back-links and alternate pairs are plain data, slots are reused through
//! a free pool, and whatever the committed tree stops reaching is swept.

pub mod arena;
pub mod fiber;
pub mod work_in_progress;

pub use arena::FiberArena;
pub use fiber::{Fiber, FiberId, MemoizedState};
pub use work_in_progress::prepare_work_in_progress;
