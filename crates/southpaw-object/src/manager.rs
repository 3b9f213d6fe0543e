//! The deferred batch-commit object manager.
//!
//! The [`ObjectManager`] exclusively owns the memory of every registered game
//! object. Lifecycle intents (start, enable, disable, delete) never take
//! effect at the call site -- they set pending flags that
//! [`process_objects`](ObjectManager::process_objects) commits in one ordered
//! batch, exactly once per gameplay tick. This is the ordering discipline that
//! makes same-tick creation, deletion, and reparenting safe despite
//! single-threaded re-entrant mutation (an object deleting itself or a sibling
//! from inside its own update hook).
//!
//! # Commit ordering
//!
//! The pending batch is sorted by `(depth ascending, id ascending)` before
//! application. Parenting always increases depth, so a parent's start/enable
//! transition is applied strictly before its children's; ties break by
//! creation order for determinism.
//!
//! # Three-pass delete
//!
//! Deletion runs in three passes: every `on_delete` hook first (with the
//! hierarchy still intact, so hooks may inspect parent/child links of objects
//! dying in the same batch), then parent links are severed, then entries are
//! erased from every tracking set and dropped. Severing and freeing only
//! after all hooks have run avoids order-dependent hierarchy corruption.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::{debug, warn};

use crate::id::ObjectId;
use crate::object::ObjectMeta;
use crate::ObjectError;

// ---------------------------------------------------------------------------
// LifecycleHooks
// ---------------------------------------------------------------------------

/// Receiver for lifecycle transitions committed by
/// [`ObjectManager::process_objects`].
///
/// The manager passes a shared reference to itself so `on_delete` hooks can
/// still inspect the intact hierarchy of objects dying in the same batch.
/// All default implementations are empty.
pub trait LifecycleHooks<O> {
    /// Invoked once, when the object first becomes live.
    fn on_start(&mut self, _id: ObjectId, _object: &mut O, _manager: &ObjectManager<O>) {}
    /// Invoked on every disabled-to-enabled transition (including the one
    /// immediately following start).
    fn on_enable(&mut self, _id: ObjectId, _object: &mut O, _manager: &ObjectManager<O>) {}
    /// Invoked on every enabled-to-disabled transition.
    fn on_disable(&mut self, _id: ObjectId, _object: &mut O, _manager: &ObjectManager<O>) {}
    /// Invoked once during the delete batch, hierarchy still intact.
    fn on_delete(&mut self, _id: ObjectId, _object: &mut O, _manager: &ObjectManager<O>) {}
}

/// No-op hooks, for callers that only need the structural commit.
pub struct NoHooks;

impl<O> LifecycleHooks<O> for NoHooks {}

// ---------------------------------------------------------------------------
// ObjectManager
// ---------------------------------------------------------------------------

struct ObjectEntry<O> {
    /// `None` only transiently, while the object is taken out for a hook call.
    object: Option<O>,
    meta: ObjectMeta,
}

/// Owns all registered objects and commits deferred lifecycle transitions.
///
/// `O` is the stored behavior type -- typically a boxed trait object supplied
/// by the simulation layer. The manager itself never dispatches gameplay
/// hooks; it surfaces lifecycle transitions through [`LifecycleHooks`] at the
/// exact points the commit algorithm requires.
pub struct ObjectManager<O> {
    entries: BTreeMap<ObjectId, ObjectEntry<O>>,
    /// Objects that are part of the live simulation (started, not yet erased).
    live: BTreeSet<ObjectId>,
    /// Objects with pending transitions awaiting the next commit batch.
    to_process: BTreeSet<ObjectId>,
    /// Camera-filtered membership for the current render pass. Rebuilt by the
    /// visibility query every render; not deferred.
    visible: BTreeSet<ObjectId>,
    next_id: u64,
}

impl<O> ObjectManager<O> {
    /// Create an empty manager. The first registered object gets id 1.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            live: BTreeSet::new(),
            to_process: BTreeSet::new(),
            visible: BTreeSet::new(),
            next_id: 1,
        }
    }

    // -- registration and lifecycle intents ---------------------------------

    /// Register a new object. Assigns the next sequential id, marks it
    /// pending-start, and takes ownership of its memory.
    ///
    /// The object is **not** part of the live simulation until the next
    /// [`process_objects`](Self::process_objects) batch starts it.
    pub fn add(&mut self, name: impl Into<String>, layer: i32, object: O) -> ObjectId {
        let id = ObjectId::from_raw(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            ObjectEntry {
                object: Some(object),
                meta: ObjectMeta::new(id, name, layer),
            },
        );
        self.to_process.insert(id);
        id
    }

    /// Request deletion of an object and, at call time, its entire current
    /// subtree.
    ///
    /// Children are snapshotted now, not at commit: a child reparented away
    /// between this call and the next batch is still torn down with the rest
    /// of the subtree. Deleting an unknown or already-removed id is a silent
    /// no-op.
    pub fn delete(&mut self, id: ObjectId) {
        if !self.entries.contains_key(&id) {
            debug!(object = %id, "delete request for unknown object ignored");
            return;
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(entry) = self.entries.get_mut(&cur) else {
                continue;
            };
            if entry.meta.pending().to_delete {
                continue;
            }
            entry.meta.pending_mut().to_delete = true;
            let kids: Vec<ObjectId> = entry.meta.children().iter().copied().collect();
            self.to_process.insert(cur);
            stack.extend(kids);
        }
    }

    /// Request an enable or disable transition for the next batch.
    ///
    /// The two requests are mutually exclusive: the later call wins.
    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) {
        let Some(entry) = self.entries.get_mut(&id) else {
            debug!(object = %id, enabled, "enable request for unknown object ignored");
            return;
        };
        entry.meta.pending_mut().request_enabled(enabled);
        self.to_process.insert(id);
    }

    // -- hierarchy ----------------------------------------------------------

    /// Reparent an object. Takes effect immediately (hierarchy edits are not
    /// deferred; only lifecycle transitions are) and recomputes `depth` for
    /// the whole moved subtree.
    ///
    /// Fails if either id is unknown or if the new parent lies inside the
    /// object's own subtree.
    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<(), ObjectError> {
        if !self.entries.contains_key(&id) {
            return Err(ObjectError::UnknownObject { id });
        }
        if let Some(pid) = parent {
            if !self.entries.contains_key(&pid) {
                return Err(ObjectError::UnknownObject { id: pid });
            }
            // Walk up from the prospective parent; finding `id` means a cycle.
            let mut cursor = Some(pid);
            while let Some(cur) = cursor {
                if cur == id {
                    return Err(ObjectError::HierarchyCycle { object: id, parent: pid });
                }
                cursor = self.entries.get(&cur).and_then(|e| e.meta.parent());
            }
        }

        let old_parent = self.entries.get(&id).and_then(|e| e.meta.parent());
        if let Some(op) = old_parent {
            if let Some(entry) = self.entries.get_mut(&op) {
                entry.meta.children_mut().remove(&id);
            }
        }
        if let Some(pid) = parent {
            if let Some(entry) = self.entries.get_mut(&pid) {
                entry.meta.children_mut().insert(id);
            }
        }
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.meta.set_parent_link(parent);
        }
        self.recompute_depths(id);
        Ok(())
    }

    /// Recompute `depth` for `root` and all its descendants from the parent
    /// chain. Breadth-first so every node sees its parent's fresh depth.
    fn recompute_depths(&mut self, root: ObjectId) {
        let base = match self.entries.get(&root) {
            Some(entry) => match entry.meta.parent() {
                Some(pid) => self
                    .entries
                    .get(&pid)
                    .map_or(0, |pe| pe.meta.depth() + 1),
                None => 0,
            },
            None => return,
        };
        let mut queue = VecDeque::new();
        queue.push_back((root, base));
        while let Some((id, depth)) = queue.pop_front() {
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            entry.meta.set_depth(depth);
            for kid in entry.meta.children().iter().copied().collect::<Vec<_>>() {
                queue.push_back((kid, depth + 1));
            }
        }
    }

    // -- paint order --------------------------------------------------------

    /// Change the paint layer. Immediate; affects the next
    /// [`process_visible_objects`](Self::process_visible_objects) sort.
    pub fn set_layer(&mut self, id: ObjectId, layer: i32) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.meta.layer = layer;
        }
    }

    // -- visibility ---------------------------------------------------------

    /// Directly set visible-set membership for the current render pass.
    ///
    /// Not deferred: visibility is driven by the broad-phase query done fresh
    /// every render, and by objects self-declaring "I drew this pass".
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) {
        if visible {
            if self.entries.contains_key(&id) {
                self.visible.insert(id);
            }
        } else {
            self.visible.remove(&id);
        }
    }

    /// Mark many ids visible at once (broad-phase query results).
    pub fn mark_visible_many(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        for id in ids {
            self.set_visible(id, true);
        }
    }

    /// Materialize the visible set into draw order: sorted by
    /// `(layer ascending, depth ascending, id ascending)`. Layer is the
    /// primary paint-order key; depth and id are deterministic tie-breakers.
    pub fn process_visible_objects(&self) -> Vec<ObjectId> {
        let mut ordered: Vec<ObjectId> = self.visible.iter().copied().collect();
        ordered.sort_by_key(|id| {
            self.entries
                .get(id)
                .map_or((0, 0, *id), |e| (e.meta.layer, e.meta.depth(), *id))
        });
        ordered
    }

    /// Whether the object is in the current render pass's visible set.
    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.visible.contains(&id)
    }

    // -- the commit batch ---------------------------------------------------

    /// Commit all pending lifecycle transitions. Invoked exactly once per
    /// gameplay tick, before fixed-step physics and before variable-rate
    /// update dispatch.
    ///
    /// Per object, in sorted `(depth, id)` order: at most one START (insert
    /// live, `on_start`, then unconditionally enable and `on_enable` --
    /// a freshly started object is always enabled exactly once, a pending
    /// disable only lands on a later tick), else one ENABLE or DISABLE; then
    /// deletion detection. Deletion itself runs in three passes afterwards
    /// (see module docs).
    pub fn process_objects<H: LifecycleHooks<O>>(&mut self, hooks: &mut H) {
        let mut batch: Vec<ObjectId> = self.to_process.iter().copied().collect();
        self.to_process.clear();
        self.visible.clear();
        batch.sort_by_key(|id| {
            let depth = self.entries.get(id).map_or(0, |e| e.meta.depth());
            (depth, *id)
        });

        debug!(batch = batch.len(), "committing lifecycle batch");

        enum Transition {
            Start,
            Enable,
            Disable,
            None,
        }

        let mut to_delete: Vec<ObjectId> = Vec::new();
        for id in batch {
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            let meta = &mut entry.meta;
            let mut transition = Transition::None;
            if meta.pending().to_start {
                meta.pending_mut().to_start = false;
                if !meta.is_started() {
                    // A fresh start swallows any queued enable; it is implied.
                    meta.pending_mut().to_enable = false;
                    meta.mark_started();
                    meta.set_enabled_now(true);
                    transition = Transition::Start;
                }
            } else if meta.pending().to_enable {
                meta.pending_mut().to_enable = false;
                meta.set_enabled_now(true);
                transition = Transition::Enable;
            } else if meta.pending().to_disable {
                meta.pending_mut().to_disable = false;
                meta.set_enabled_now(false);
                transition = Transition::Disable;
            }
            if meta.pending().to_delete {
                to_delete.push(id);
            }

            match transition {
                Transition::Start => {
                    self.live.insert(id);
                    self.dispatch(id, |o, m| hooks.on_start(id, o, m));
                    self.dispatch(id, |o, m| hooks.on_enable(id, o, m));
                }
                Transition::Enable => self.dispatch(id, |o, m| hooks.on_enable(id, o, m)),
                Transition::Disable => self.dispatch(id, |o, m| hooks.on_disable(id, o, m)),
                Transition::None => {}
            }
        }

        if to_delete.is_empty() {
            return;
        }
        debug!(deleting = to_delete.len(), "delete batch");

        // Pass 1: all on_delete hooks, hierarchy still intact.
        for &id in &to_delete {
            self.dispatch(id, |o, m| hooks.on_delete(id, o, m));
        }
        // Pass 2: sever parent links only after every hook has run.
        for &id in &to_delete {
            self.sever_parent(id);
        }
        // Pass 3: erase from every tracking set and drop.
        for &id in &to_delete {
            self.to_process.remove(&id);
            self.live.remove(&id);
            self.visible.remove(&id);
            self.entries.remove(&id);
        }
    }

    /// Detach `id` from its parent without touching descendants (they are
    /// being erased in the same batch).
    fn sever_parent(&mut self, id: ObjectId) {
        let parent = self.entries.get(&id).and_then(|e| e.meta.parent());
        if let Some(pid) = parent {
            if let Some(entry) = self.entries.get_mut(&pid) {
                entry.meta.children_mut().remove(&id);
            }
        }
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.meta.set_parent_link(None);
            entry.meta.set_depth(0);
        }
    }

    /// Take the object out, run `f` with a shared view of the manager, put it
    /// back. The transient `None` is invisible to `f` because lookups of the
    /// taken id simply miss.
    fn dispatch<F>(&mut self, id: ObjectId, f: F)
    where
        F: FnOnce(&mut O, &Self),
    {
        let Some(mut object) = self.entries.get_mut(&id).and_then(|e| e.object.take()) else {
            warn!(object = %id, "dispatch target missing or re-entered");
            return;
        };
        f(&mut object, &*self);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.object = Some(object);
        }
    }

    /// Run `f` against one object with a shared view of the manager.
    ///
    /// This is the access path the simulation layer uses for update/render
    /// dispatch: the object is temporarily taken out of its slot, so `f` may
    /// freely inspect other objects' metadata without aliasing it.
    pub fn with_object<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut O, &Self) -> R,
    ) -> Option<R> {
        let mut object = self.entries.get_mut(&id).and_then(|e| e.object.take())?;
        let out = f(&mut object, &*self);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.object = Some(object);
        }
        Some(out)
    }

    // -- accessors ----------------------------------------------------------

    /// Metadata for one object.
    pub fn meta(&self, id: ObjectId) -> Option<&ObjectMeta> {
        self.entries.get(&id).map(|e| &e.meta)
    }

    /// Shared access to a stored object.
    pub fn get(&self, id: ObjectId) -> Option<&O> {
        self.entries.get(&id).and_then(|e| e.object.as_ref())
    }

    /// Mutable access to a stored object. Prefer [`with_object`](Self::with_object)
    /// during simulation; direct access is for setup and tests.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut O> {
        self.entries.get_mut(&id).and_then(|e| e.object.as_mut())
    }

    /// Whether the id refers to a registered (live or pending) object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Whether the object has been started and not yet erased.
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.live.contains(&id)
    }

    /// Snapshot of all live ids, in id order.
    pub fn live_ids(&self) -> Vec<ObjectId> {
        self.live.iter().copied().collect()
    }

    /// Snapshot of live ids that are currently enabled, in id order.
    pub fn enabled_live_ids(&self) -> Vec<ObjectId> {
        self.live
            .iter()
            .copied()
            .filter(|id| self.meta(*id).is_some_and(|m| m.is_enabled()))
            .collect()
    }

    /// Ids with transitions awaiting the next batch ("what is pending").
    pub fn pending_ids(&self) -> Vec<ObjectId> {
        self.to_process.iter().copied().collect()
    }

    /// Total registered objects (live plus pending).
    pub fn object_count(&self) -> usize {
        self.entries.len()
    }

    /// Full teardown: drop every object without running hooks.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.live.clear();
        self.to_process.clear();
        self.visible.clear();
    }
}

impl<O> Default for ObjectManager<O> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
