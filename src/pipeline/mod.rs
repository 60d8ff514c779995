//! Render Pipeline
//!
//! Drives one render session from an element to a committed host tree.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Root::render → prepare_work_in_progress(root) → WorkLoop (begin/complete)
//!              → commit_root (effect list) → promote + sweep → generation++
//! ```
//!
//! ## Key Design Principles
//!
//! - **Render is pure w.r.t. the live tree**: begin never touches the host,
//!   completion only builds detached instances
//! - **Commit is one pass**: the effect list is applied head to tail, then
//!   the finished tree becomes current
//! - **One cursor**: the work loop is a state machine, not recursion

pub mod commit;
pub mod effect_list;
pub mod root;
pub mod work_loop;

pub use commit::commit_root;
pub use effect_list::{effect_list, EffectRecord, RenderSummary};
pub use root::Root;
pub use work_loop::{complete_unit_of_work, perform_unit_of_work, WorkLoop, WorkStep};
