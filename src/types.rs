//! Core types for spark-fiber.
//!
//! These types define the vocabulary every other module speaks: what kind
//! of node a fiber stands for, which host mutations it carries, and how
//! siblings are told apart across renders.

use std::fmt;

// =============================================================================
// Fiber Tag
// =============================================================================

/// The kind of tree position a fiber represents.
///
/// Begin and complete phases dispatch exhaustively on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiberTag {
    /// The root of a mounted tree. Its host instance is the container.
    HostRoot,
    /// A stateful component with a persistent instance.
    ClassComponent,
    /// A pure function of props.
    FunctionComponent,
    /// A host primitive such as `div`.
    HostComponent,
    /// A host text node.
    HostText,
}

impl FiberTag {
    /// Fibers of this kind own a host instance.
    #[inline]
    pub const fn is_host(self) -> bool {
        matches!(self, FiberTag::HostComponent | FiberTag::HostText)
    }

    /// Fibers of this kind can be the mutation target for inserted children.
    #[inline]
    pub const fn is_host_parent(self) -> bool {
        matches!(self, FiberTag::HostComponent | FiberTag::HostRoot)
    }
}

impl fmt::Display for FiberTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FiberTag::HostRoot => "HostRoot",
            FiberTag::ClassComponent => "ClassComponent",
            FiberTag::FunctionComponent => "FunctionComponent",
            FiberTag::HostComponent => "HostComponent",
            FiberTag::HostText => "HostText",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Effect Tag (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Pending host mutations for a fiber.
    ///
    /// Empty means no effect. Combine with bitwise OR:
    /// `EffectTag::PLACEMENT | EffectTag::UPDATE` is a move plus a prop update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EffectTag: u8 {
        const PLACEMENT = 1 << 0;
        const UPDATE = 1 << 1;
        const DELETION = 1 << 2;
        const PLACEMENT_AND_UPDATE = Self::PLACEMENT.bits() | Self::UPDATE.bits();
    }
}

impl EffectTag {
    /// Tags that require the commit pass to touch the host tree.
    pub const HOST_EFFECTS: Self = Self::PLACEMENT
        .union(Self::UPDATE)
        .union(Self::DELETION);

    /// Whether this fiber belongs on the effect list.
    #[inline]
    pub const fn has_host_effect(self) -> bool {
        self.intersects(Self::HOST_EFFECTS)
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(EffectTag::DELETION) {
            f.write_str("Deletion")
        } else if self.contains(EffectTag::PLACEMENT_AND_UPDATE) {
            f.write_str("PlacementAndUpdate")
        } else if self.contains(EffectTag::PLACEMENT) {
            f.write_str("Placement")
        } else if self.contains(EffectTag::UPDATE) {
            f.write_str("Update")
        } else {
            f.write_str("NoEffect")
        }
    }
}

// =============================================================================
// Key
// =============================================================================

/// Identity hint for a child among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key(value.to_string())
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key(value.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
