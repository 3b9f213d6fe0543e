//! Input event demultiplexing.
//!
//! Device translation (keyboard, gamepad, debouncing) lives outside the
//! engine. The host pushes already-translated [`InputEvent`]s into the
//! [`InputManager`]; once per scene update the queue is drained and every
//! event is offered to each registered [`InputGroup`] in registration order.
//!
//! Groups are keyed by an integer id so gameplay code can hold a handle
//! without borrowing the manager. Lookup misses are `Option`/logged no-ops,
//! never errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Logical game button, already mapped from physical devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Jump / menu up.
    Up,
    /// Crouch / menu down.
    Down,
    /// Fast, weak attack.
    LightAttack,
    /// Slow, strong attack.
    HeavyAttack,
    /// Character special move.
    Special,
    /// Guard.
    Block,
    /// Pause / confirm.
    Start,
    /// Back / cancel.
    Back,
}

/// A debounced input event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Button went down this frame.
    Pressed(Button),
    /// Button went up this frame.
    Released(Button),
    /// Analog axis moved. `value` is in [-1, 1].
    Axis {
        /// Axis index on the logical controller.
        axis: u8,
        /// Deflection, negative = left/up.
        value: f32,
    },
}

// ---------------------------------------------------------------------------
// Input groups
// ---------------------------------------------------------------------------

/// Identifier for a registered input group.
pub type InputGroupId = u32;

/// A consumer of input events: one per player, plus one per active menu.
pub trait InputGroup {
    /// Called once per queued event during the scene update. Return `true`
    /// to consume the event and stop it from reaching later groups.
    fn handle(&mut self, event: &InputEvent) -> bool;
}

// ---------------------------------------------------------------------------
// InputManager
// ---------------------------------------------------------------------------

/// Owns the frame event queue and the registered groups.
#[derive(Default)]
pub struct InputManager {
    queue: Vec<InputEvent>,
    groups: BTreeMap<InputGroupId, Box<dyn InputGroup>>,
    next_group_id: InputGroupId,
}

impl InputManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next dispatch.
    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Register a group and return its id. Groups receive events in
    /// ascending id order (registration order).
    pub fn register_group(&mut self, group: Box<dyn InputGroup>) -> InputGroupId {
        let id = self.next_group_id;
        self.next_group_id += 1;
        self.groups.insert(id, group);
        id
    }

    /// Remove a group. Unknown ids are logged and ignored.
    pub fn unregister_group(&mut self, id: InputGroupId) {
        if self.groups.remove(&id).is_none() {
            warn!(group = id, "unregister of unknown input group ignored");
        }
    }

    /// Access a registered group, e.g. to poll its derived state.
    pub fn group(&self, id: InputGroupId) -> Option<&dyn InputGroup> {
        self.groups.get(&id).map(|g| &**g)
    }

    /// Mutable access to a registered group.
    pub fn group_mut(&mut self, id: InputGroupId) -> Option<&mut dyn InputGroup> {
        self.groups
            .get_mut(&id)
            .map(|g| &mut **g as &mut dyn InputGroup)
    }

    /// Number of events waiting for the next dispatch.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Drain the queue, offering each event to every group in id order until
    /// one consumes it. Called once per scene update.
    pub fn dispatch(&mut self) {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            for group in self.groups.values_mut() {
                if group.handle(event) {
                    break;
                }
            }
        }
    }
}

impl std::fmt::Debug for InputManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputManager")
            .field("queued", &self.queue.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<InputEvent>>>,
        consume: bool,
    }

    impl InputGroup for Recorder {
        fn handle(&mut self, event: &InputEvent) -> bool {
            self.seen.borrow_mut().push(*event);
            self.consume
        }
    }

    #[test]
    fn dispatch_drains_queue_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut input = InputManager::new();
        input.register_group(Box::new(Recorder {
            seen: Rc::clone(&seen),
            consume: false,
        }));

        input.push_event(InputEvent::Pressed(Button::LightAttack));
        input.push_event(InputEvent::Released(Button::LightAttack));
        assert_eq!(input.pending_events(), 2);

        input.dispatch();
        assert_eq!(input.pending_events(), 0);
        assert_eq!(
            *seen.borrow(),
            vec![
                InputEvent::Pressed(Button::LightAttack),
                InputEvent::Released(Button::LightAttack),
            ]
        );
    }

    #[test]
    fn consuming_group_shadows_later_groups() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut input = InputManager::new();
        input.register_group(Box::new(Recorder {
            seen: Rc::clone(&first),
            consume: true,
        }));
        input.register_group(Box::new(Recorder {
            seen: Rc::clone(&second),
            consume: false,
        }));

        input.push_event(InputEvent::Pressed(Button::Start));
        input.dispatch();

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn unregistered_group_stops_receiving() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut input = InputManager::new();
        let id = input.register_group(Box::new(Recorder {
            seen: Rc::clone(&seen),
            consume: false,
        }));
        input.unregister_group(id);

        input.push_event(InputEvent::Pressed(Button::Block));
        input.dispatch();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unregister_unknown_group_is_noop() {
        let mut input = InputManager::new();
        input.unregister_group(99);
    }

    #[test]
    fn group_lookup_miss_returns_none() {
        let input = InputManager::new();
        assert!(input.group(7).is_none());
    }

    #[test]
    fn group_mut_feeds_events_directly() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut input = InputManager::new();
        let id = input.register_group(Box::new(Recorder {
            seen: Rc::clone(&seen),
            consume: false,
        }));

        let group = input.group_mut(id).unwrap();
        group.handle(&InputEvent::Pressed(Button::Special));
        assert_eq!(seen.borrow().len(), 1);
        assert!(input.group_mut(99).is_none());
    }
}
