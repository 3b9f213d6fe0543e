//! Southpaw object model -- scene-graph objects with deferred lifecycle.
//!
//! This crate provides the object-lifecycle core of the Southpaw engine: a
//! parent/child scene graph of game objects whose creation, enabling,
//! disabling, and deletion are all deferred to a single ordered commit batch
//! per tick ([`ObjectManager::process_objects`](manager::ObjectManager::process_objects)).
//! The manager exclusively owns every object's memory; gameplay code holds
//! only [`ObjectId`](id::ObjectId)s, so deferred deletion can never leave a
//! dangling reference -- a dead id simply misses.
//!
//! # Quick Start
//!
//! ```
//! use southpaw_object::prelude::*;
//!
//! let mut manager: ObjectManager<&'static str> = ObjectManager::new();
//! let parent = manager.add("torso", 0, "torso hitbox");
//! let child = manager.add("fist", 0, "fist hitbox");
//! manager.set_parent(child, Some(parent)).unwrap();
//!
//! // Nothing is live until the batch commits.
//! assert!(!manager.is_live(parent));
//! manager.process_objects(&mut NoHooks);
//! assert!(manager.is_live(parent));
//! assert_eq!(manager.meta(child).unwrap().depth(), 1);
//! ```

#![deny(unsafe_code)]

pub mod command;
pub mod id;
pub mod manager;
pub mod object;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by object-graph operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// The id does not refer to a registered object.
    #[error("object {id} is not registered (stale or never added)")]
    UnknownObject {
        /// The offending id.
        id: id::ObjectId,
    },

    /// Reparenting would make an object its own ancestor.
    #[error("reparenting {object} under {parent} would create a hierarchy cycle")]
    HierarchyCycle {
        /// The object being reparented.
        object: id::ObjectId,
        /// The rejected parent.
        parent: id::ObjectId,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::command::{ApplyReport, CommandKind, CommandQueue, ObjectCommand};
    pub use crate::id::ObjectId;
    pub use crate::manager::{LifecycleHooks, NoHooks, ObjectManager};
    pub use crate::object::{ObjectMeta, PendingFlags};
    pub use crate::ObjectError;
}
