//! # spark-fiber
//!
//! A fiber reconciler: turns element descriptions into host tree mutations,
//! reusing the previous render's structure wherever it can.
//!
//! ## Architecture
//!
//! Fibers are records in one arena, addressed by index. Each tree position
//! has two of them (current and work-in-progress) that swap roles at every
//! commit. A render walks the work-in-progress tree with a single cursor,
//! collects host mutations in a post-order effect list, and applies that
//! list in one pass:
//!
//! ```text
//! Element → begin (diff children) → complete (build detached host nodes)
//!         → effect list → commit (attach / update / delete) → swap buffers
//! ```
//!
//! The host platform is reached only through [`HostConfig`], and only from
//! completion and commit. [`MemoryHost`] implements it in memory.
//!
//! ## Modules
//!
//! - [`types`] - Fiber tags, effect tags, keys
//! - [`element`] - Element descriptions, props, component types
//! - [`engine`] - Fiber arena and the double-buffer builder
//! - [`reconciler`] - Begin phase, children diff, completion
//! - [`pipeline`] - Work loop, effect list, commit, root container
//! - [`host`] - Host adapter trait, update payloads, in-memory host
//! - [`config`] - Host name translation tables
//! - [`error`] - Render errors

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod reconciler;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{NameTable, RootOptions};

pub use element::{
    style, Children, ClassComponent, ClassType, Element, ElementType, EventHandler,
    FunctionType, Node, PropMap, PropValue, Props, RenderFn, State, StateUpdater, StyleMap,
};

pub use engine::{prepare_work_in_progress, Fiber, FiberArena, FiberId, MemoizedState};

pub use error::{RenderError, Result};

pub use host::{HostConfig, HostNodeId, HostOp, MemoryHost, PropChange, UpdatePayload};

pub use pipeline::{EffectRecord, RenderSummary, Root, WorkLoop, WorkStep};
