//! Per-object metadata: hierarchy links, sort keys, and pending lifecycle flags.
//!
//! The behavior of an object (its hooks, its gameplay state) lives in whatever
//! type the [`ObjectManager`](crate::manager::ObjectManager) stores. This
//! module holds the bookkeeping the manager itself needs: the hierarchy
//! (parent/children by id, never by pointer), the paint-order `layer`, the
//! derived hierarchy `depth`, the `enabled` switch, and the deferred lifecycle
//! flags that [`process_objects`](crate::manager::ObjectManager::process_objects)
//! commits once per tick.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::id::ObjectId;

// ---------------------------------------------------------------------------
// PendingFlags
// ---------------------------------------------------------------------------

/// Deferred lifecycle transitions awaiting the next commit batch.
///
/// `to_enable` and `to_disable` are mutually exclusive -- setting one clears
/// the other. A set flag only ever takes effect inside
/// [`process_objects`](crate::manager::ObjectManager::process_objects), never
/// at the call site that requested it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFlags {
    /// Object is registered but not yet part of the live simulation.
    pub to_start: bool,
    /// Enable requested for the next batch.
    pub to_enable: bool,
    /// Disable requested for the next batch.
    pub to_disable: bool,
    /// Deletion requested; the whole subtree was marked at request time.
    pub to_delete: bool,
}

impl PendingFlags {
    /// Whether any transition is pending.
    pub fn any(&self) -> bool {
        self.to_start || self.to_enable || self.to_disable || self.to_delete
    }

    /// Request an enable or disable, keeping the pair mutually exclusive.
    pub(crate) fn request_enabled(&mut self, enabled: bool) {
        if enabled {
            self.to_enable = true;
            self.to_disable = false;
        } else {
            self.to_disable = true;
            self.to_enable = false;
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectMeta
// ---------------------------------------------------------------------------

/// Manager-owned bookkeeping for one registered object.
///
/// Invariant: `depth == 0` when there is no parent, otherwise
/// `depth == parent.depth + 1`. The manager recomputes this transitively for
/// the whole subtree whenever parenting changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMeta {
    id: ObjectId,
    /// Debug label.
    pub name: String,
    /// Paint/sort order. Lower layers render first (background < terrain <
    /// player < particles < UI).
    pub layer: i32,
    depth: u32,
    enabled: bool,
    started: bool,
    parent: Option<ObjectId>,
    children: BTreeSet<ObjectId>,
    pending: PendingFlags,
}

impl ObjectMeta {
    pub(crate) fn new(id: ObjectId, name: impl Into<String>, layer: i32) -> Self {
        Self {
            id,
            name: name.into(),
            layer,
            depth: 0,
            enabled: false,
            started: false,
            parent: None,
            children: BTreeSet::new(),
            pending: PendingFlags {
                to_start: true,
                ..PendingFlags::default()
            },
        }
    }

    /// The object's unique id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Hierarchy depth: 0 for roots, `parent.depth + 1` otherwise.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether the object is logically on. Disabled objects skip `update`,
    /// `fixed_update`, and rendering, but stay registered.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether `start` has run. An object starts at most once in its lifetime.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The parent link, if any. Back-reference only -- the parent does not
    /// own this object's memory, the manager does.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Current children, in id order.
    pub fn children(&self) -> &BTreeSet<ObjectId> {
        &self.children
    }

    /// Pending lifecycle flags awaiting the next commit batch.
    pub fn pending(&self) -> PendingFlags {
        self.pending
    }

    // -- crate-internal mutation (only the manager drives these) ------------

    pub(crate) fn pending_mut(&mut self) -> &mut PendingFlags {
        &mut self.pending
    }

    pub(crate) fn set_enabled_now(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn mark_started(&mut self) {
        self.started = true;
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut BTreeSet<ObjectId> {
        &mut self.children
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_meta_is_pending_start_and_disabled() {
        let meta = ObjectMeta::new(ObjectId::from_raw(1), "fighter", 3);
        assert!(meta.pending().to_start);
        assert!(!meta.is_enabled());
        assert!(!meta.is_started());
        assert_eq!(meta.depth(), 0);
        assert_eq!(meta.layer, 3);
        assert!(meta.children().is_empty());
    }

    #[test]
    fn enable_disable_requests_are_mutually_exclusive() {
        let mut flags = PendingFlags::default();
        flags.request_enabled(true);
        assert!(flags.to_enable && !flags.to_disable);
        flags.request_enabled(false);
        assert!(flags.to_disable && !flags.to_enable);
        flags.request_enabled(true);
        assert!(flags.to_enable && !flags.to_disable);
    }

    #[test]
    fn any_reflects_pending_state() {
        let mut flags = PendingFlags::default();
        assert!(!flags.any());
        flags.to_delete = true;
        assert!(flags.any());
    }
}
