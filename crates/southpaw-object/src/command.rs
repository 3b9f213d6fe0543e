//! Deferred object-lifecycle command queue.
//!
//! Gameplay hooks run while the [`ObjectManager`] is being iterated, so they
//! must never mutate it directly. Instead they queue [`ObjectCommand`]s here;
//! the simulation layer flushes the queue between dispatch phases with
//! [`CommandQueue::apply`], which translates each command into the manager's
//! pending state. Commands are applied in strict FIFO order, and the pending
//! state they produce only takes effect at the next
//! [`process_objects`](ObjectManager::process_objects) batch -- the queue adds
//! an explicit, inspectable step, it does not change the deferral semantics.

use tracing::warn;

use crate::id::ObjectId;
use crate::manager::ObjectManager;

// ---------------------------------------------------------------------------
// ObjectCommand
// ---------------------------------------------------------------------------

/// What mutation to request. `Spawn` carries the new object by value; the
/// manager takes ownership on apply.
pub enum CommandKind<O> {
    /// Register a new object, optionally parented immediately.
    Spawn {
        /// Debug label for the new object.
        name: String,
        /// Paint layer for the new object.
        layer: i32,
        /// Optional parent assigned right after registration.
        parent: Option<ObjectId>,
        /// The object itself.
        object: O,
    },
    /// Request an enable transition.
    Enable,
    /// Request a disable transition.
    Disable,
    /// Request deletion (subtree snapshot happens when this applies).
    Delete,
    /// Reparent immediately on apply.
    SetParent(Option<ObjectId>),
    /// Change the paint layer on apply.
    SetLayer(i32),
}

impl<O> CommandKind<O> {
    /// Short name for logging and introspection.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Spawn { .. } => "spawn",
            CommandKind::Enable => "enable",
            CommandKind::Disable => "disable",
            CommandKind::Delete => "delete",
            CommandKind::SetParent(_) => "set_parent",
            CommandKind::SetLayer(_) => "set_layer",
        }
    }
}

/// A single queued mutation. `target` is `None` for spawns.
pub struct ObjectCommand<O> {
    /// Which object this command targets. `None` for spawn commands.
    pub target: Option<ObjectId>,
    /// What mutation to perform.
    pub kind: CommandKind<O>,
    /// Sequential index within the queue (set on insertion).
    pub index: u32,
}

// ---------------------------------------------------------------------------
// ApplyReport
// ---------------------------------------------------------------------------

/// Summary of the last [`CommandQueue::apply`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Commands that translated into manager state.
    pub applied: usize,
    /// Commands skipped because their target was stale.
    pub skipped: usize,
    /// Ids of objects created by spawn commands, in queue order.
    pub spawned: Vec<ObjectId>,
}

// ---------------------------------------------------------------------------
// CommandQueue
// ---------------------------------------------------------------------------

/// Collects lifecycle commands during hook dispatch and applies them FIFO.
pub struct CommandQueue<O> {
    commands: Vec<ObjectCommand<O>>,
    next_index: u32,
}

impl<O> CommandQueue<O> {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            next_index: 0,
        }
    }

    fn push(&mut self, target: Option<ObjectId>, kind: CommandKind<O>) {
        let index = self.next_index;
        self.next_index += 1;
        self.commands.push(ObjectCommand { target, kind, index });
    }

    /// Queue a spawn. The returned id is only assigned at apply time, so the
    /// caller cannot observe it here; parent wiring is part of the command.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        layer: i32,
        parent: Option<ObjectId>,
        object: O,
    ) {
        self.push(
            None,
            CommandKind::Spawn {
                name: name.into(),
                layer,
                parent,
                object,
            },
        );
    }

    /// Queue an enable/disable request.
    pub fn set_enabled(&mut self, target: ObjectId, enabled: bool) {
        let kind = if enabled {
            CommandKind::Enable
        } else {
            CommandKind::Disable
        };
        self.push(Some(target), kind);
    }

    /// Queue a deletion request.
    pub fn delete(&mut self, target: ObjectId) {
        self.push(Some(target), CommandKind::Delete);
    }

    /// Queue a reparent.
    pub fn set_parent(&mut self, target: ObjectId, parent: Option<ObjectId>) {
        self.push(Some(target), CommandKind::SetParent(parent));
    }

    /// Queue a layer change.
    pub fn set_layer(&mut self, target: ObjectId, layer: i32) {
        self.push(Some(target), CommandKind::SetLayer(layer));
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// `(target, kind-name)` pairs of everything pending, in queue order.
    pub fn pending(&self) -> Vec<(Option<ObjectId>, &'static str)> {
        self.commands
            .iter()
            .map(|c| (c.target, c.kind.name()))
            .collect()
    }

    /// Drain the queue into the manager, FIFO.
    ///
    /// Commands targeting ids the manager no longer knows are logged and
    /// skipped -- a deleted object's leftover commands are not an error.
    pub fn apply(&mut self, manager: &mut ObjectManager<O>) -> ApplyReport {
        let commands = std::mem::take(&mut self.commands);
        self.next_index = 0;

        let mut report = ApplyReport::default();
        for cmd in commands {
            match cmd.kind {
                CommandKind::Spawn {
                    name,
                    layer,
                    parent,
                    object,
                } => {
                    let id = manager.add(name, layer, object);
                    if let Some(pid) = parent {
                        if let Err(e) = manager.set_parent(id, Some(pid)) {
                            warn!(command = cmd.index, error = %e, "spawn parent rejected");
                        }
                    }
                    report.spawned.push(id);
                    report.applied += 1;
                }
                CommandKind::Enable | CommandKind::Disable => {
                    let Some(target) = cmd.target else {
                        report.skipped += 1;
                        continue;
                    };
                    if manager.contains(target) {
                        manager.set_enabled(target, matches!(cmd.kind, CommandKind::Enable));
                        report.applied += 1;
                    } else {
                        warn!(command = cmd.index, object = %target, "enable target is stale");
                        report.skipped += 1;
                    }
                }
                CommandKind::Delete => {
                    let Some(target) = cmd.target else {
                        report.skipped += 1;
                        continue;
                    };
                    if manager.contains(target) {
                        manager.delete(target);
                        report.applied += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                CommandKind::SetParent(parent) => {
                    let Some(target) = cmd.target else {
                        report.skipped += 1;
                        continue;
                    };
                    match manager.set_parent(target, parent) {
                        Ok(()) => report.applied += 1,
                        Err(e) => {
                            warn!(command = cmd.index, error = %e, "set_parent rejected");
                            report.skipped += 1;
                        }
                    }
                }
                CommandKind::SetLayer(layer) => {
                    let Some(target) = cmd.target else {
                        report.skipped += 1;
                        continue;
                    };
                    if manager.contains(target) {
                        manager.set_layer(target, layer);
                        report.applied += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
            }
        }
        report
    }
}

impl<O> Default for CommandQueue<O> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::NoHooks;

    #[test]
    fn spawn_applies_and_reports_id() {
        let mut queue: CommandQueue<u32> = CommandQueue::new();
        let mut manager = ObjectManager::new();
        queue.spawn("a", 0, None, 7);
        let report = queue.apply(&mut manager);
        assert_eq!(report.applied, 1);
        assert_eq!(report.spawned.len(), 1);
        let id = report.spawned[0];
        assert_eq!(manager.get(id), Some(&7));
        assert!(queue.is_empty());
    }

    #[test]
    fn spawn_with_parent_wires_hierarchy() {
        let mut queue: CommandQueue<u32> = CommandQueue::new();
        let mut manager = ObjectManager::new();
        let parent = manager.add("parent", 0, 1);
        queue.spawn("child", 0, Some(parent), 2);
        let report = queue.apply(&mut manager);
        let child = report.spawned[0];
        assert_eq!(manager.meta(child).unwrap().parent(), Some(parent));
        assert_eq!(manager.meta(child).unwrap().depth(), 1);
    }

    #[test]
    fn stale_targets_are_skipped_not_fatal() {
        let mut queue: CommandQueue<u32> = CommandQueue::new();
        let mut manager = ObjectManager::new();
        let ghost = ObjectId::from_raw(404);
        queue.set_enabled(ghost, true);
        queue.delete(ghost);
        queue.set_layer(ghost, 3);
        let report = queue.apply(&mut manager);
        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped, 3);
    }

    #[test]
    fn commands_remain_deferred_until_commit() {
        let mut queue: CommandQueue<u32> = CommandQueue::new();
        let mut manager = ObjectManager::new();
        let id = manager.add("a", 0, 1);
        manager.process_objects(&mut NoHooks);

        queue.set_enabled(id, false);
        queue.apply(&mut manager);
        // Applied to pending state, but the transition waits for the batch.
        assert!(manager.meta(id).unwrap().is_enabled());
        manager.process_objects(&mut NoHooks);
        assert!(!manager.meta(id).unwrap().is_enabled());
    }

    #[test]
    fn pending_introspection_lists_queue_order() {
        let mut queue: CommandQueue<u32> = CommandQueue::new();
        let id = ObjectId::from_raw(1);
        queue.delete(id);
        queue.set_enabled(id, true);
        queue.spawn("x", 0, None, 9);
        assert_eq!(
            queue.pending(),
            vec![(Some(id), "delete"), (Some(id), "enable"), (None, "spawn")]
        );
    }

    #[test]
    fn delete_then_reparent_keeps_delete_closure() {
        // Matches the engine-level contract: the subtree is snapshotted when
        // the delete *applies*, which is still before the next commit batch.
        let mut queue: CommandQueue<u32> = CommandQueue::new();
        let mut manager = ObjectManager::new();
        let parent = manager.add("parent", 0, 0);
        let child = manager.add("child", 0, 0);
        manager.set_parent(child, Some(parent)).unwrap();
        manager.process_objects(&mut NoHooks);

        queue.delete(parent);
        queue.set_parent(child, None);
        queue.apply(&mut manager);
        manager.process_objects(&mut NoHooks);

        assert!(!manager.contains(parent));
        assert!(!manager.contains(child), "child dies with its parent");
    }
}
