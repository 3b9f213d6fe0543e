//! The tick orchestrator.
//!
//! A [`Scene`] is one running match: it owns the physics world, the object
//! manager, the deferred command queue, the input manager, and the clock, and
//! ties them together with the fixed-timestep accumulator pattern.
//!
//! Per [`update`](Scene::update): commit deferred lifecycle transitions,
//! flush commands, dispatch input, run zero or more fixed steps (each one:
//! physics step, collision dispatch, `fixed_update` dispatch, snapshot
//! rotation), then the variable-rate `update` dispatch for every enabled
//! object. The leftover accumulator fraction becomes `alpha`, which
//! [`render`](Scene::render) uses to interpolate body transforms so a
//! variable render framerate never stutters against the fixed simulation
//! rate.
//!
//! In [`UpdateMode::StepByStep`] the simulation advances exactly one fixed
//! step per [`request_step`](Scene::request_step) and `alpha` pins to 1.0
//! (render the exact physics state). This drives the frame-step debugger.

use serde::{Deserialize, Serialize};
use southpaw_object::command::CommandQueue;
use southpaw_object::id::ObjectId;
use southpaw_object::manager::{LifecycleHooks, ObjectManager};
use tracing::{debug, info, warn};

use crate::camera::CameraLens;
use crate::input::InputManager;
use crate::object::{BoxedObject, CollisionInfo, ObjectCtx, RenderCtx};
use crate::physics::{ContactPhase, PhysicsWorld};
use crate::render::{Color, Gizmo, GizmoQueue, RenderBackend};
use crate::timer::Timer;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How the scene consumes time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateMode {
    /// Fixed-timestep accumulator fed by the wall clock.
    #[default]
    Realtime,
    /// One fixed step per explicit request; for debug tooling.
    StepByStep,
}

/// Scene construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed simulation step, in milliseconds.
    pub time_step_ms: u64,
    /// Gravity vector for the physics world.
    pub gravity: [f32; 2],
    /// Time consumption mode.
    pub update_mode: UpdateMode,
    /// Clamp for one frame's raw wall-clock delta, in milliseconds.
    pub max_delta_ms: u64,
    /// Time scale, 1.0 = realtime.
    pub time_scale: f32,
    /// Draw a world-space unit grid behind the debug overlay.
    pub draw_debug_grid: bool,
    /// Outline every physics collider.
    pub draw_physics_shapes: bool,
    /// Dispatch `draw_gizmos` hooks and drain the gizmo queue.
    pub draw_gizmos: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            time_step_ms: 16,
            gravity: [0.0, -9.81],
            update_mode: UpdateMode::Realtime,
            max_delta_ms: crate::timer::DEFAULT_MAX_DELTA_MS,
            time_scale: 1.0,
            draw_debug_grid: false,
            draw_physics_shapes: false,
            draw_gizmos: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle hook bridge
// ---------------------------------------------------------------------------

/// Forwards object-manager lifecycle transitions into [`GameObject`]
/// (crate::object::GameObject) hooks, with a full [`ObjectCtx`] so the hooks
/// can queue commands and touch the physics world.
struct SceneHooks<'a> {
    commands: &'a mut CommandQueue<BoxedObject>,
    physics: &'a mut PhysicsWorld,
    gizmos: &'a mut GizmoQueue,
    alpha: f32,
    update_id: u64,
}

impl SceneHooks<'_> {
    fn ctx<'c>(&'c mut self, objects: &'c ObjectManager<BoxedObject>) -> ObjectCtx<'c> {
        ObjectCtx {
            commands: self.commands,
            physics: self.physics,
            gizmos: self.gizmos,
            objects,
            dt: 0.0,
            alpha: self.alpha,
            update_id: self.update_id,
        }
    }
}

impl LifecycleHooks<BoxedObject> for SceneHooks<'_> {
    fn on_start(
        &mut self,
        id: ObjectId,
        object: &mut BoxedObject,
        manager: &ObjectManager<BoxedObject>,
    ) {
        object.start(id, &mut self.ctx(manager));
    }

    fn on_enable(
        &mut self,
        id: ObjectId,
        object: &mut BoxedObject,
        manager: &ObjectManager<BoxedObject>,
    ) {
        object.on_enable(id, &mut self.ctx(manager));
    }

    fn on_disable(
        &mut self,
        id: ObjectId,
        object: &mut BoxedObject,
        manager: &ObjectManager<BoxedObject>,
    ) {
        object.on_disable(id, &mut self.ctx(manager));
    }

    fn on_delete(
        &mut self,
        id: ObjectId,
        object: &mut BoxedObject,
        manager: &ObjectManager<BoxedObject>,
    ) {
        object.on_delete(id, &mut self.ctx(manager));
        // The body dies with the object. Hierarchy teardown stays with the
        // manager; only the physics side is cleaned up here.
        self.physics.remove_body(id);
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// One authoritative simulation context; exactly one exists per match.
pub struct Scene {
    config: SceneConfig,
    timer: Timer,
    physics: PhysicsWorld,
    objects: ObjectManager<BoxedObject>,
    commands: CommandQueue<BoxedObject>,
    input: InputManager,
    gizmos: GizmoQueue,
    active_camera: Option<ObjectId>,
    step_accu_ms: u64,
    alpha: f32,
    update_id: u64,
    step_requested: bool,
    fixed_step_count: u64,
}

impl Scene {
    /// Build a scene from its configuration. A `time_step_ms` of zero can
    /// never drain the accumulator, so it is clamped to one millisecond.
    pub fn new(mut config: SceneConfig) -> Self {
        if config.time_step_ms == 0 {
            warn!("time_step_ms of 0 is invalid, clamped to 1");
            config.time_step_ms = 1;
        }
        let mut timer = Timer::new(config.max_delta_ms);
        timer.set_scale(config.time_scale);
        let physics = PhysicsWorld::new(config.gravity);
        info!(
            time_step_ms = config.time_step_ms,
            mode = ?config.update_mode,
            "scene created"
        );
        Self {
            config,
            timer,
            physics,
            objects: ObjectManager::new(),
            commands: CommandQueue::new(),
            input: InputManager::new(),
            gizmos: GizmoQueue::new(),
            active_camera: None,
            step_accu_ms: 0,
            alpha: 0.0,
            update_id: 0,
            step_requested: false,
            fixed_step_count: 0,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// The scene configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Read access to the object graph.
    pub fn objects(&self) -> &ObjectManager<BoxedObject> {
        &self.objects
    }

    /// Mutable access to the object graph, for host-side setup.
    pub fn objects_mut(&mut self) -> &mut ObjectManager<BoxedObject> {
        &mut self.objects
    }

    /// Read access to the physics world.
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Mutable access to the physics world, for host-side setup.
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// The deferred command queue, for queueing mutations from outside hooks.
    pub fn commands_mut(&mut self) -> &mut CommandQueue<BoxedObject> {
        &mut self.commands
    }

    /// The input manager, for pushing host events and registering groups.
    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// Interpolation parameter of the last update; in `[0, 1)` in realtime
    /// mode, exactly 1.0 in step-by-step mode.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Monotonic update counter. Dependent systems use it to detect "already
    /// processed this tick".
    pub fn update_id(&self) -> u64 {
        self.update_id
    }

    /// Total fixed steps executed since construction.
    pub fn fixed_step_count(&self) -> u64 {
        self.fixed_step_count
    }

    /// Number of registered objects, live or pending.
    pub fn object_count(&self) -> usize {
        self.objects.object_count()
    }

    /// Convenience registration: add an object to the graph. It starts at
    /// the next update's lifecycle commit.
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        layer: i32,
        object: BoxedObject,
    ) -> ObjectId {
        self.objects.add(name, layer, object)
    }

    /// Select the camera object. Pass an id whose object implements
    /// `as_camera`; `None` disables rendering.
    pub fn set_active_camera(&mut self, camera: Option<ObjectId>) {
        self.active_camera = camera;
    }

    /// The currently selected camera object, if any.
    pub fn active_camera(&self) -> Option<ObjectId> {
        self.active_camera
    }

    /// Switch time consumption mode at runtime.
    pub fn set_update_mode(&mut self, mode: UpdateMode) {
        self.config.update_mode = mode;
    }

    /// Change the time scale for subsequent updates.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale;
        self.timer.set_scale(scale);
    }

    /// In step-by-step mode, arm exactly one fixed step for the next update.
    pub fn request_step(&mut self) {
        self.step_requested = true;
    }

    // -- the tick -----------------------------------------------------------

    /// Advance the scene using the wall clock.
    pub fn update(&mut self) {
        self.timer.update();
        self.run_update();
    }

    /// Advance the scene by an injected delta in milliseconds. Used by tests
    /// and replay tooling; behavior is identical to [`update`](Self::update)
    /// with a wall-clock delta of the same size.
    pub fn update_by(&mut self, delta_ms: u64) {
        self.timer.update_by(delta_ms);
        self.run_update();
    }

    fn run_update(&mut self) {
        self.update_id += 1;

        // 1. Commit deferred lifecycle transitions.
        {
            let alpha = self.alpha;
            let update_id = self.update_id;
            let Scene {
                physics,
                objects,
                commands,
                gizmos,
                ..
            } = self;
            let mut hooks = SceneHooks {
                commands,
                physics,
                gizmos,
                alpha,
                update_id,
            };
            objects.process_objects(&mut hooks);
        }
        self.flush_commands();

        // 2. Input.
        self.input.dispatch();

        // 3. Fixed steps.
        match self.config.update_mode {
            UpdateMode::Realtime => {
                self.step_accu_ms += self.timer.delta_ms();
                while self.step_accu_ms >= self.config.time_step_ms {
                    self.make_fixed_step();
                    self.step_accu_ms -= self.config.time_step_ms;
                }
                self.alpha = self.step_accu_ms as f32 / self.config.time_step_ms as f32;
            }
            UpdateMode::StepByStep => {
                if self.step_requested {
                    self.step_requested = false;
                    self.make_fixed_step();
                }
                self.alpha = 1.0;
            }
        }

        // 4. Variable-rate update for every enabled live object.
        let dt = self.timer.delta_seconds();
        for id in self.objects.enabled_live_ids() {
            self.dispatch_update(id, dt);
        }
        self.flush_commands();
    }

    /// One fixed simulation step: physics, collision dispatch, fixed-rate
    /// gameplay, snapshot rotation.
    fn make_fixed_step(&mut self) {
        self.fixed_step_count += 1;
        // Last step's transient overlay is stale now.
        self.gizmos.clear();

        let dt = self.config.time_step_ms as f32 / 1000.0;
        let events = self.physics.step(dt);
        debug!(
            step = self.fixed_step_count,
            contacts = events.len(),
            "fixed step"
        );
        for event in &events {
            self.dispatch_collision(event.a, event.b, event.phase, event.normal);
            self.dispatch_collision(
                event.b,
                event.a,
                event.phase,
                [-event.normal[0], -event.normal[1]],
            );
        }
        self.flush_commands();

        for id in self.objects.enabled_live_ids() {
            self.dispatch_fixed_update(id, dt);
        }
        self.flush_commands();

        self.physics.rotate_snapshots();
    }

    fn flush_commands(&mut self) {
        if !self.commands.is_empty() {
            self.commands.apply(&mut self.objects);
        }
    }

    // -- hook dispatch helpers ----------------------------------------------

    fn dispatch_update(&mut self, id: ObjectId, dt: f32) {
        let alpha = self.alpha;
        let update_id = self.update_id;
        let Scene {
            physics,
            objects,
            commands,
            gizmos,
            ..
        } = self;
        objects.with_object(id, |object, manager| {
            let mut ctx = ObjectCtx {
                commands,
                physics,
                gizmos,
                objects: manager,
                dt,
                alpha,
                update_id,
            };
            object.update(id, &mut ctx);
        });
    }

    fn dispatch_fixed_update(&mut self, id: ObjectId, dt: f32) {
        let alpha = self.alpha;
        let update_id = self.update_id;
        let Scene {
            physics,
            objects,
            commands,
            gizmos,
            ..
        } = self;
        objects.with_object(id, |object, manager| {
            let mut ctx = ObjectCtx {
                commands,
                physics,
                gizmos,
                objects: manager,
                dt,
                alpha,
                update_id,
            };
            object.fixed_update(id, &mut ctx);
        });
    }

    /// One side's collision callback: `normal` is already signed to point
    /// from `me` toward `other`.
    fn dispatch_collision(
        &mut self,
        me: ObjectId,
        other: ObjectId,
        phase: ContactPhase,
        normal: [f32; 2],
    ) {
        if !self.objects.is_live(me) {
            return;
        }
        let alpha = self.alpha;
        let update_id = self.update_id;
        let Scene {
            physics,
            objects,
            commands,
            gizmos,
            ..
        } = self;
        objects.with_object(me, |object, manager| {
            let info = CollisionInfo { other, normal };
            let mut ctx = ObjectCtx {
                commands,
                physics,
                gizmos,
                objects: manager,
                dt: 0.0,
                alpha,
                update_id,
            };
            match phase {
                ContactPhase::Started => object.on_collision_enter(me, info, &mut ctx),
                ContactPhase::Stayed => object.on_collision_stay(me, info, &mut ctx),
                ContactPhase::Stopped => object.on_collision_exit(me, info, &mut ctx),
            }
        });
    }

    // -- rendering ----------------------------------------------------------

    /// Render the scene: no-op without an active camera. Visibility comes
    /// from the broad-phase AABB query against the camera view, merged with
    /// anything gameplay marked visible this tick; draw order is
    /// `(layer, depth, id)`.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        let Some(camera_id) = self.active_camera else {
            return;
        };
        let Some(lens) = self.objects.get(camera_id).and_then(|o| o.as_camera()) else {
            warn!(camera = %camera_id, "active camera is missing or not a camera");
            return;
        };

        let in_view = self.physics.overlap_aabb(lens.view_aabb());
        self.objects.mark_visible_many(in_view);
        let ordered = self.objects.process_visible_objects();

        for &id in &ordered {
            if !self.objects.meta(id).is_some_and(|m| m.is_enabled()) {
                continue;
            }
            self.dispatch_render(id, backend, lens, RenderHook::Render);
        }

        if self.config.draw_debug_grid {
            self.draw_grid(backend, lens);
        }
        if self.config.draw_physics_shapes {
            for gizmo in self.physics.debug_shapes() {
                backend.draw_gizmo(&gizmo);
            }
        }
        if self.config.draw_gizmos {
            for &id in &ordered {
                if !self.objects.meta(id).is_some_and(|m| m.is_enabled()) {
                    continue;
                }
                self.dispatch_render(id, backend, lens, RenderHook::Gizmos);
            }
            for gizmo in self.gizmos.pending() {
                backend.draw_gizmo(gizmo);
            }
        }
    }

    fn dispatch_render(
        &mut self,
        id: ObjectId,
        backend: &mut dyn RenderBackend,
        camera: CameraLens,
        hook: RenderHook,
    ) {
        let alpha = self.alpha;
        let Scene {
            physics, objects, ..
        } = self;
        objects.with_object(id, |object, manager| {
            let mut ctx = RenderCtx {
                backend,
                physics: &*physics,
                objects: manager,
                camera,
                alpha,
            };
            match hook {
                RenderHook::Render => object.render(id, &mut ctx),
                RenderHook::Gizmos => object.draw_gizmos(id, &mut ctx),
            }
        });
    }

    fn draw_grid(&self, backend: &mut dyn RenderBackend, lens: CameraLens) {
        let aabb = lens.view_aabb();
        let color = Color::rgba(255, 255, 255, 48);
        let mut x = aabb.x.floor();
        while x <= aabb.x + aabb.w {
            backend.draw_gizmo(&Gizmo::Line {
                from: [x, aabb.y],
                to: [x, aabb.y + aabb.h],
                color,
            });
            x += 1.0;
        }
        let mut y = aabb.y.floor();
        while y <= aabb.y + aabb.h {
            backend.draw_gizmo(&Gizmo::Line {
                from: [aabb.x, y],
                to: [aabb.x + aabb.w, y],
                color,
            });
            y += 1.0;
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("update_id", &self.update_id)
            .field("fixed_steps", &self.fixed_step_count)
            .field("alpha", &self.alpha)
            .field("objects", &self.objects.object_count())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum RenderHook {
    Render,
    Gizmos,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
