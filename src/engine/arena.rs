//! Fiber Arena - Index allocation for fiber records.
//!
//! Manages the lifecycle of fiber slots:
//! - Free index pool for O(1) reuse
//! - Checked lookups (`get`) and invariant-asserting indexing (`arena[id]`)
//! - Mark-and-sweep release of everything a committed tree no longer reaches
//!
//! The arena owns every fiber. Links between fibers are [`FiberId`]s, so
//! releasing a slot never leaves a dangling reference that is read again:
//! a reused alternate has all its links rewritten before use.

use std::ops::{Index, IndexMut};

use super::fiber::{Fiber, FiberId};

/// Owner of all fibers of one root.
pub struct FiberArena<I> {
    slots: Vec<Option<Fiber<I>>>,
    free: Vec<usize>,
}

impl<I> Default for FiberArena<I> {
    fn default() -> Self {
        FiberArena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<I> FiberArena<I> {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Store a fiber, reusing a freed slot when one exists.
    pub fn allocate(&mut self, fiber: Fiber<I>) -> FiberId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(fiber);
                FiberId(index)
            }
            None => {
                self.slots.push(Some(fiber));
                FiberId(self.slots.len() - 1)
            }
        }
    }

    /// Remove a fiber and return its slot to the pool.
    pub fn release(&mut self, id: FiberId) -> Option<Fiber<I>> {
        let fiber = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(fiber)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn get(&self, id: FiberId) -> Option<&Fiber<I>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<I>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: FiberId) -> bool {
        self.get(id).is_some()
    }

    /// Live fibers.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all live fibers, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = FiberId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| FiberId(index))
    }

    /// Children of `id`, first to last.
    pub fn children(&self, id: FiberId) -> Vec<FiberId> {
        let mut children = Vec::new();
        let mut next = self.get(id).and_then(|f| f.first_child);
        while let Some(child) = next {
            children.push(child);
            next = self[child].next_sibling;
        }
        children
    }

    /// `root` and every descendant, pre-order. Never leaves the subtree.
    pub fn subtree(&self, root: FiberId) -> Vec<FiberId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut node = root;
        loop {
            out.push(node);
            if let Some(child) = self[node].first_child {
                node = child;
                continue;
            }
            loop {
                if node == root {
                    return out;
                }
                if let Some(sibling) = self[node].next_sibling {
                    node = sibling;
                    break;
                }
                match self[node].parent {
                    Some(parent) => node = parent,
                    None => return out,
                }
            }
        }
    }

    /// Topmost host fibers below `id`, in document order. Wrapper fibers
    /// are looked through; host fibers are not descended into.
    pub fn host_children(&self, id: FiberId) -> Vec<FiberId> {
        let mut out = Vec::new();
        let mut next = self.get(id).and_then(|f| f.first_child);
        'walk: while let Some(mut node) = next {
            if self[node].tag.is_host() {
                out.push(node);
            } else if let Some(child) = self[node].first_child {
                next = Some(child);
                continue;
            }
            loop {
                if let Some(sibling) = self[node].next_sibling {
                    next = Some(sibling);
                    continue 'walk;
                }
                match self[node].parent {
                    Some(parent) if parent != id => node = parent,
                    _ => break 'walk,
                }
            }
        }
        out
    }

    /// `id` itself when it is a host fiber, otherwise its host children.
    pub fn host_nodes(&self, id: FiberId) -> Vec<FiberId> {
        match self.get(id) {
            Some(fiber) if fiber.tag.is_host() => vec![id],
            Some(_) => self.host_children(id),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Sweep
    // =========================================================================

    /// Release every fiber not reachable from `root` through child links,
    /// keeping the alternate of each reachable fiber. Returns how many were
    /// released.
    pub fn sweep(&mut self, root: FiberId) -> usize {
        let mut marked = vec![false; self.slots.len()];
        for id in self.subtree(root) {
            marked[id.0] = true;
            if let Some(alternate) = self[id].alternate {
                if let Some(mark) = marked.get_mut(alternate.0) {
                    *mark = true;
                }
            }
        }

        let doomed: Vec<FiberId> = self.ids().filter(|id| !marked[id.0]).collect();
        for &id in &doomed {
            self.release(id);
        }

        doomed.len()
    }
}

impl<I> Index<FiberId> for FiberArena<I> {
    type Output = Fiber<I>;

    fn index(&self, id: FiberId) -> &Fiber<I> {
        match self.get(id) {
            Some(fiber) => fiber,
            None => panic!("fiber {id} was released"),
        }
    }
}

impl<I> IndexMut<FiberId> for FiberArena<I> {
    fn index_mut(&mut self, id: FiberId) -> &mut Fiber<I> {
        match self.get_mut(id) {
            Some(fiber) => fiber,
            None => panic!("fiber {id} was released"),
        }
    }
}
