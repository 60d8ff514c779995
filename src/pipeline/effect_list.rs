//! Effect list - fibers with pending host mutations, in post-order.
//!
//! Each fiber carries the effect list of its completed subtree
//! (`first_effect`..`last_effect`, chained through `next_effect`). When a
//! fiber completes, its list is spliced onto its parent's, followed by the
//! fiber itself if it carries an effect. The root ends up holding the whole
//! list, children always ahead of the parents that contain them.

use std::fmt;

use crate::engine::{FiberArena, FiberId};
use crate::types::{EffectTag, FiberTag, Key};

/// Splice `child`'s effect list, then `child` itself, onto `parent`'s.
pub fn merge_child_effects<I>(arena: &mut FiberArena<I>, parent: FiberId, child: FiberId) {
    let (first, last) = (arena[child].first_effect, arena[child].last_effect);
    if let Some(last) = last {
        match arena[parent].last_effect {
            Some(tail) => arena[tail].next_effect = first,
            None => arena[parent].first_effect = first,
        }
        arena[parent].last_effect = Some(last);
    }

    if arena[child].effect_tag.has_host_effect() {
        append_effect(arena, parent, child);
    }
}

/// Link one fiber at the tail of `parent`'s effect list.
pub fn append_effect<I>(arena: &mut FiberArena<I>, parent: FiberId, fiber: FiberId) {
    arena[fiber].next_effect = None;
    match arena[parent].last_effect {
        Some(tail) => arena[tail].next_effect = Some(fiber),
        None => arena[parent].first_effect = Some(fiber),
    }
    arena[parent].last_effect = Some(fiber);
}

/// Fibers on `root`'s effect list, head to tail.
pub fn effect_list<I>(arena: &FiberArena<I>, root: FiberId) -> Vec<FiberId> {
    let mut out = Vec::new();
    let mut next = arena[root].first_effect;
    while let Some(id) = next {
        out.push(id);
        next = arena[id].next_effect;
    }
    out
}

// =============================================================================
// Render Summary
// =============================================================================

/// One committed effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRecord {
    pub fiber: FiberId,
    pub tag: FiberTag,
    pub effect: EffectTag,
    pub label: String,
    pub key: Option<Key>,
}

impl fmt::Display for EffectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.effect, self.label)?;
        if let Some(key) = &self.key {
            write!(f, " key={key}")?;
        }
        Ok(())
    }
}

/// What one render session did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    /// Committed effects, in commit order.
    pub effects: Vec<EffectRecord>,
    pub units_of_work: usize,
    /// Fibers released by the post-commit sweep.
    pub swept: usize,
}

impl RenderSummary {
    /// Effects whose tag contains all of `effect`.
    pub fn count(&self, effect: EffectTag) -> usize {
        self.effects.iter().filter(|r| r.effect.contains(effect)).count()
    }

    pub fn placements(&self) -> usize {
        self.count(EffectTag::PLACEMENT)
    }

    pub fn updates(&self) -> usize {
        self.count(EffectTag::UPDATE)
    }

    pub fn deletions(&self) -> usize {
        self.count(EffectTag::DELETION)
    }

    /// Labels of the effects carrying `effect`, in commit order.
    pub fn labels(&self, effect: EffectTag) -> Vec<&str> {
        self.effects
            .iter()
            .filter(|r| r.effect.contains(effect))
            .map(|r| r.label.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
