//! Capture descriptors, the name lookup index, and match results.

use std::collections::HashMap;

/// Name of one capturing group: declared (`:id`) or the ordinal assigned
/// to an anonymous group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureName {
    Named(String),
    Index(usize),
}

/// One capturing group of a compiled source pattern.
///
/// `position` counts groups left to right from 0. The captured text lives
/// at slot `position + 1` of a [`MatchResult`], because slot 0 holds the
/// whole matched substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDescriptor {
    pub name: CaptureName,
    pub position: usize,
}

/// Lookup table from capture name to group position.
///
/// Built once per compiled pattern and read-only afterwards, so it can be
/// shared across concurrent requests without synchronization.
#[derive(Debug, Default)]
pub struct CaptureIndex {
    positions: HashMap<String, usize>,
}

impl CaptureIndex {
    /// Index the named descriptors. Anonymous groups stay reachable
    /// through `$n` tokens only.
    pub fn build(descriptors: &[CaptureDescriptor]) -> Self {
        let mut positions = HashMap::new();
        for descriptor in descriptors {
            if let CaptureName::Named(name) = &descriptor.name {
                positions.insert(name.clone(), descriptor.position);
            }
        }
        Self { positions }
    }

    /// Position of the named group, or `None` for an unknown name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

/// Result of applying a matcher to a path.
///
/// Slot 0 is the whole matched substring; slots 1..N hold the capture
/// groups in declaration order. A group that did not participate in the
/// match is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    slots: Vec<Option<String>>,
}

impl MatchResult {
    pub(crate) fn new(slots: Vec<Option<String>>) -> Self {
        Self { slots }
    }

    /// Captured text at the given slot, `None` when the slot is out of
    /// range or the group did not participate.
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }

    /// Number of slots, whole-match slot included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
