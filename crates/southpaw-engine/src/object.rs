//! The game-object capability contract.
//!
//! Every piece of gameplay and UI code plugs into the engine by implementing
//! [`GameObject`]. The trait is the full dispatch surface: lifecycle hooks,
//! the two update cadences, collision callbacks, and rendering. All methods
//! default to empty so implementors override only what they need.
//!
//! Hooks receive the object's own id plus a context struct instead of the
//! scene itself: mutations of the object graph go through the deferred
//! [`CommandQueue`], so an object deleting itself (or a sibling) from inside
//! its own `update` is always safe and takes effect at the next commit.

use southpaw_object::command::CommandQueue;
use southpaw_object::id::ObjectId;
use southpaw_object::manager::ObjectManager;

use crate::camera::CameraLens;
use crate::physics::PhysicsWorld;
use crate::render::{GizmoQueue, RenderBackend};

/// The storage type the engine's object manager holds.
pub type BoxedObject = Box<dyn GameObject>;

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// Engine state handed to update and lifecycle hooks.
///
/// `objects` is read-only: structural changes are queued on `commands` and
/// applied at the next lifecycle commit.
pub struct ObjectCtx<'a> {
    /// Deferred object-graph mutations.
    pub commands: &'a mut CommandQueue<BoxedObject>,
    /// The rigid-body world, for body state, impulses, and queries.
    pub physics: &'a mut PhysicsWorld,
    /// Debug-overlay primitives for this step.
    pub gizmos: &'a mut GizmoQueue,
    /// Read access to the object graph.
    pub objects: &'a ObjectManager<BoxedObject>,
    /// Seconds covered by this call: the frame delta in `update`, the fixed
    /// step in `fixed_update`, zero in lifecycle hooks.
    pub dt: f32,
    /// Current interpolation parameter.
    pub alpha: f32,
    /// Monotonic id of the scene update this call belongs to.
    pub update_id: u64,
}

/// Engine state handed to render hooks.
pub struct RenderCtx<'a> {
    /// The drawing surface.
    pub backend: &'a mut dyn RenderBackend,
    /// Read access to body transforms, for interpolated positions.
    pub physics: &'a PhysicsWorld,
    /// Read access to the object graph.
    pub objects: &'a ObjectManager<BoxedObject>,
    /// The active camera's view.
    pub camera: CameraLens,
    /// Interpolation parameter for this render pass.
    pub alpha: f32,
}

// ---------------------------------------------------------------------------
// Collision view
// ---------------------------------------------------------------------------

/// One side's view of a contact. Each body in a touching pair receives its
/// own view with the normal signed for its side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// The other body in the pair.
    pub other: ObjectId,
    /// World-space contact normal pointing from this object toward `other`.
    /// Zero for exit events and sensor overlaps.
    pub normal: [f32; 2],
}

// ---------------------------------------------------------------------------
// GameObject
// ---------------------------------------------------------------------------

/// The polymorphic capability set of everything living in a scene.
#[allow(unused_variables)]
pub trait GameObject {
    /// Called once, on the commit that makes the object live.
    fn start(&mut self, id: ObjectId, ctx: &mut ObjectCtx<'_>) {}

    /// Called on every enable transition, including the one implied by
    /// `start`.
    fn on_enable(&mut self, id: ObjectId, ctx: &mut ObjectCtx<'_>) {}

    /// Called on every disable transition.
    fn on_disable(&mut self, id: ObjectId, ctx: &mut ObjectCtx<'_>) {}

    /// Called once during the delete commit, with the hierarchy still
    /// intact: parent and children links remain readable.
    fn on_delete(&mut self, id: ObjectId, ctx: &mut ObjectCtx<'_>) {}

    /// Variable-rate gameplay tick, once per scene update while enabled.
    fn update(&mut self, id: ObjectId, ctx: &mut ObjectCtx<'_>) {}

    /// Fixed-rate gameplay tick, once per physics step while enabled.
    fn fixed_update(&mut self, id: ObjectId, ctx: &mut ObjectCtx<'_>) {}

    /// A contact involving this object's body began this step.
    fn on_collision_enter(&mut self, id: ObjectId, info: CollisionInfo, ctx: &mut ObjectCtx<'_>) {}

    /// A contact involving this object's body persisted this step. Toggling
    /// solver response via
    /// [`set_contact_enabled`](crate::physics::PhysicsWorld::set_contact_enabled)
    /// from here is the supported way to build one-way platforms; creating
    /// or removing bodies from collision hooks is not.
    fn on_collision_stay(&mut self, id: ObjectId, info: CollisionInfo, ctx: &mut ObjectCtx<'_>) {}

    /// A contact involving this object's body ended this step.
    fn on_collision_exit(&mut self, id: ObjectId, info: CollisionInfo, ctx: &mut ObjectCtx<'_>) {}

    /// Draw the object. Only called when the object is in this pass's
    /// visible set, in (layer, depth, id) order.
    fn render(&mut self, id: ObjectId, ctx: &mut RenderCtx<'_>) {}

    /// Draw debug overlay for the object, after all regular rendering.
    fn draw_gizmos(&mut self, id: ObjectId, ctx: &mut RenderCtx<'_>) {}

    /// Objects that can act as the scene camera return their lens here.
    fn as_camera(&self) -> Option<CameraLens> {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl GameObject for Bare {}

    #[test]
    fn default_impl_is_not_a_camera() {
        let object = Bare;
        assert!(object.as_camera().is_none());
    }

    #[test]
    fn boxed_objects_store_in_manager() {
        let mut manager: ObjectManager<BoxedObject> = ObjectManager::new();
        let id = manager.add("bare", 0, Box::new(Bare));
        assert!(manager.contains(id));
    }
}
