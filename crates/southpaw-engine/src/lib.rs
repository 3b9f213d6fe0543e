//! Southpaw engine -- fixed-timestep 2D fighting-game simulation core.
//!
//! This crate builds on [`southpaw_object`]'s deferred-lifecycle object model
//! to provide the full simulation driver: a [`Scene`](scene::Scene) that runs
//! the fixed-timestep accumulator loop, a rapier2d-backed
//! [`PhysicsWorld`](physics::PhysicsWorld) with typed contact events and
//! queries, cyclic [`Animation`](animation::Animation) counters for sprite
//! and UI progression, and the [`GameObject`](object::GameObject) capability
//! trait every piece of gameplay plugs into. Rendering and input stay behind
//! host-implemented traits so the simulation itself is headless and
//! deterministic.
//!
//! # Quick Start
//!
//! ```
//! use southpaw_engine::prelude::*;
//!
//! struct Crate;
//!
//! impl GameObject for Crate {
//!     fn start(&mut self, id: ObjectId, ctx: &mut ObjectCtx<'_>) {
//!         ctx.physics.add_body(id, &BodyDef::default());
//!     }
//! }
//!
//! let mut scene = Scene::new(SceneConfig::default());
//! scene.add_object("crate", 0, Box::new(Crate));
//!
//! // One update commits the spawn and runs start; a 32 ms delta covers two
//! // 16 ms fixed steps.
//! scene.update_by(32);
//! assert_eq!(scene.fixed_step_count(), 2);
//! ```

#![deny(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod camera;
pub mod input;
pub mod object;
pub mod physics;
pub mod render;
pub mod scene;
pub mod timer;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the object-model crate for convenience.
pub use southpaw_object;

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Install the default tracing subscriber: env-filtered (`RUST_LOG`),
/// `warn` when unset. Call once from the host entry point; calling again is
/// a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Object-model exports.
    pub use southpaw_object::prelude::*;

    // Simulation driver.
    pub use crate::scene::{Scene, SceneConfig, UpdateMode};
    pub use crate::timer::Timer;

    // Game objects and dispatch contexts.
    pub use crate::object::{BoxedObject, CollisionInfo, GameObject, ObjectCtx, RenderCtx};

    // Physics types.
    pub use crate::physics::{
        BodyDef, BodyKind, ColliderShape, ContactEvent, ContactPhase, PhysicsWorld, QueryMask,
        RayHit, TransformPair,
    };

    // Animation.
    pub use crate::animation::{
        Animation, AnimationBank, AnimationListener, AnimationState, Easing, CYCLES_INFINITE,
    };

    // Camera and rendering boundary.
    pub use crate::camera::{Camera, CameraLens};
    pub use crate::render::{
        Color, Flip, Gizmo, GizmoQueue, Rect, RecordingBackend, RenderBackend, TextureId,
    };

    // Input boundary.
    pub use crate::input::{Button, InputEvent, InputGroup, InputGroupId, InputManager};

    // Assets boundary.
    pub use crate::assets::{AssetLoadError, AssetStore};
}
