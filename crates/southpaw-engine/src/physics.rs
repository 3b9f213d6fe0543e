//! rapier2d rigid-body world adapter.
//!
//! The [`PhysicsWorld`] owns a rapier2d simulation and maps engine
//! [`ObjectId`]s to rapier body and collider handles. Gameplay code never
//! touches rapier types directly: bodies are described by [`BodyDef`],
//! contacts come back as [`ContactEvent`]s, and queries return typed hits
//! keyed by object id.
//!
//! # Determinism
//!
//! rapier2d is compiled with `enhanced-determinism`. Combined with the fixed
//! timestep and the deterministic sorting of contact events and query
//! results, identical inputs replay to identical simulations on the same
//! platform.
//!
//! # One-way platforms
//!
//! Individual contact pairs can be switched off with
//! [`set_contact_enabled`](PhysicsWorld::set_contact_enabled). A disabled
//! pair still generates contact events (so gameplay can keep inspecting the
//! normal and re-enable it) but contributes no solver impulses; this is how
//! platforms that are only solid from above are built. Bodies are never
//! created or removed from inside contact handling; only this flag toggles.

use std::collections::{HashMap, HashSet};

use rapier2d::prelude::*;
use southpaw_object::id::ObjectId;
use tracing::{debug, warn};

use crate::render::{Gizmo, Color, Rect};

// ---------------------------------------------------------------------------
// Body description
// ---------------------------------------------------------------------------

/// How the solver treats a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BodyKind {
    /// Fully simulated (fighters, projectiles, debris).
    Dynamic,
    /// Moved by gameplay, pushes but is not pushed (moving platforms).
    Kinematic,
    /// Immovable (terrain, walls).
    Static,
}

/// Collider geometry.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ColliderShape {
    /// Axis-aligned box with half-extents.
    Box {
        /// Half-width along x.
        half_width: f32,
        /// Half-height along y.
        half_height: f32,
    },
    /// Circle with radius.
    Circle {
        /// Circle radius.
        radius: f32,
    },
}

impl ColliderShape {
    fn to_shared(self) -> SharedShape {
        match self {
            ColliderShape::Box {
                half_width,
                half_height,
            } => SharedShape::cuboid(half_width as Real, half_height as Real),
            ColliderShape::Circle { radius } => SharedShape::ball(radius as Real),
        }
    }
}

/// Full description of a body and its single collider.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyDef {
    /// Solver treatment.
    pub kind: BodyKind,
    /// Collider geometry.
    pub shape: ColliderShape,
    /// Initial world position.
    pub position: [f32; 2],
    /// Initial rotation in radians.
    pub rotation: f32,
    /// Bounciness, 0 = none.
    pub restitution: f32,
    /// Surface friction.
    pub friction: f32,
    /// Mass density of the collider.
    pub density: f32,
    /// Sensors detect contacts but never push.
    pub sensor: bool,
    /// Collision category bits this body belongs to.
    pub categories: u32,
    /// Collision categories this body interacts with.
    pub mask: u32,
    /// Lock rotation (fighters stay upright).
    pub fixed_rotation: bool,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape: ColliderShape::Box {
                half_width: 0.5,
                half_height: 0.5,
            },
            position: [0.0, 0.0],
            rotation: 0.0,
            restitution: 0.0,
            friction: 0.5,
            density: 1.0,
            sensor: false,
            categories: 0x0001,
            mask: 0xFFFF,
            fixed_rotation: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Contact events
// ---------------------------------------------------------------------------

/// Where in its lifetime a contact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContactPhase {
    /// The pair began touching this step.
    Started,
    /// The pair kept touching this step.
    Stayed,
    /// The pair separated this step.
    Stopped,
}

/// A contact between two bodies, reported once per step per pair.
///
/// `normal` is the world-space contact normal pointing from `a` toward `b`;
/// it is zero for [`ContactPhase::Stopped`] events (the pair no longer
/// touches) and for sensor overlaps (no manifold exists).
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    /// First body of the pair (smaller id).
    pub a: ObjectId,
    /// Second body of the pair (larger id).
    pub b: ObjectId,
    /// Contact lifetime phase.
    pub phase: ContactPhase,
    /// World-space normal from `a` toward `b`.
    pub normal: [f32; 2],
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Category/mask filter applied to ray and shape queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryMask {
    /// Categories the query itself belongs to.
    pub categories: u32,
    /// Categories the query can hit.
    pub mask: u32,
    /// Skip sensor colliders.
    pub solids_only: bool,
}

impl Default for QueryMask {
    fn default() -> Self {
        Self {
            categories: 0xFFFF,
            mask: 0xFFFF,
            solids_only: false,
        }
    }
}

impl QueryMask {
    fn to_filter(self) -> QueryFilter<'static> {
        let mut filter = QueryFilter::default().groups(InteractionGroups::new(
            Group::from_bits_truncate(self.categories),
            Group::from_bits_truncate(self.mask),
        ));
        if self.solids_only {
            filter = filter.exclude_sensors();
        }
        filter
    }
}

/// A ray intersection, closest-first in "first hit" queries.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// The body that was hit.
    pub object: ObjectId,
    /// World-space hit point.
    pub point: [f32; 2],
    /// World-space surface normal at the hit.
    pub normal: [f32; 2],
    /// Position along the ray in `[0, 1]` of the origin→end segment.
    pub fraction: f32,
}

// ---------------------------------------------------------------------------
// Interpolation snapshots
// ---------------------------------------------------------------------------

/// Pre/post-step transform pair used for render interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPair {
    /// Transform at the end of the previous fixed step.
    pub last: ([f32; 2], f32),
    /// Transform at the end of the current fixed step.
    pub curr: ([f32; 2], f32),
}

impl TransformPair {
    fn pinned(position: [f32; 2], rotation: f32) -> Self {
        Self {
            last: (position, rotation),
            curr: (position, rotation),
        }
    }

    /// Linear position lerp and plain angle lerp (2D, no slerp needed).
    pub fn interpolated(&self, alpha: f32) -> ([f32; 2], f32) {
        let (lp, lr) = self.last;
        let (cp, cr) = self.curr;
        (
            [
                lp[0] + (cp[0] - lp[0]) * alpha,
                lp[1] + (cp[1] - lp[1]) * alpha,
            ],
            lr + (cr - lr) * alpha,
        )
    }
}

// ---------------------------------------------------------------------------
// Contact filter hooks
// ---------------------------------------------------------------------------

/// Orders a collider pair so both orientations hash identically.
fn ordered_pair(a: ColliderHandle, b: ColliderHandle) -> (ColliderHandle, ColliderHandle) {
    if a.into_raw_parts() <= b.into_raw_parts() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Applies the disabled-contact set during narrow-phase filtering. Disabled
/// pairs keep generating contact manifolds and events but produce no solver
/// impulses.
struct ContactToggle<'a> {
    disabled: &'a HashSet<(ColliderHandle, ColliderHandle)>,
}

impl PhysicsHooks for ContactToggle<'_> {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        let pair = ordered_pair(context.collider1, context.collider2);
        if self.disabled.contains(&pair) {
            Some(SolverFlags::empty())
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns the rapier simulation and the object↔handle maps.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    object_to_body: HashMap<ObjectId, RigidBodyHandle>,
    object_to_collider: HashMap<ObjectId, ColliderHandle>,
    collider_to_object: HashMap<ColliderHandle, ObjectId>,
    disabled_contacts: HashSet<(ColliderHandle, ColliderHandle)>,
    transforms: HashMap<ObjectId, TransformPair>,
}

impl PhysicsWorld {
    /// Create a world with the given gravity vector.
    pub fn new(gravity: [f32; 2]) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![gravity[0] as Real, gravity[1] as Real],
            integration_params: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            object_to_body: HashMap::new(),
            object_to_collider: HashMap::new(),
            collider_to_object: HashMap::new(),
            disabled_contacts: HashSet::new(),
            transforms: HashMap::new(),
        }
    }

    // -- body management ----------------------------------------------------

    /// Create a body and collider for an object. No-op if the object already
    /// has a body.
    pub fn add_body(&mut self, object: ObjectId, def: &BodyDef) {
        if self.object_to_body.contains_key(&object) {
            warn!(%object, "body already registered, add ignored");
            return;
        }

        let translation = vector![def.position[0] as Real, def.position[1] as Real];
        let mut builder = match def.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        }
        .translation(translation)
        .rotation(def.rotation as Real);
        if def.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let body_handle = self.rigid_body_set.insert(builder.build());

        let collider = ColliderBuilder::new(def.shape.to_shared())
            .restitution(def.restitution as Real)
            .friction(def.friction as Real)
            .density(def.density as Real)
            .sensor(def.sensor)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(def.categories),
                Group::from_bits_truncate(def.mask),
            ))
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        self.object_to_body.insert(object, body_handle);
        self.object_to_collider.insert(object, collider_handle);
        self.collider_to_object.insert(collider_handle, object);
        self.transforms
            .insert(object, TransformPair::pinned(def.position, def.rotation));
        self.query_pipeline.update(&self.collider_set);
        debug!(%object, kind = ?def.kind, "body registered");
    }

    /// Remove an object's body, collider, snapshots, and contact toggles.
    /// No-op if the object has no body.
    pub fn remove_body(&mut self, object: ObjectId) {
        let Some(body_handle) = self.object_to_body.remove(&object) else {
            return;
        };
        if let Some(collider_handle) = self.object_to_collider.remove(&object) {
            self.collider_to_object.remove(&collider_handle);
            self.disabled_contacts
                .retain(|(a, b)| *a != collider_handle && *b != collider_handle);
        }
        self.rigid_body_set.remove(
            body_handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        self.transforms.remove(&object);
        self.query_pipeline.update(&self.collider_set);
        debug!(%object, "body removed");
    }

    /// Whether the object has a registered body.
    pub fn has_body(&self, object: ObjectId) -> bool {
        self.object_to_body.contains_key(&object)
    }

    /// Number of registered bodies.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Current gravity vector.
    pub fn gravity(&self) -> [f32; 2] {
        [self.gravity.x as f32, self.gravity.y as f32]
    }

    // -- body state ---------------------------------------------------------

    /// Current world position of a body.
    pub fn position(&self, object: ObjectId) -> Option<[f32; 2]> {
        let body = self.body(object)?;
        let t = body.translation();
        Some([t.x as f32, t.y as f32])
    }

    /// Current rotation of a body, in radians.
    pub fn rotation(&self, object: ObjectId) -> Option<f32> {
        Some(self.body(object)?.rotation().angle() as f32)
    }

    /// Current linear velocity of a body.
    pub fn velocity(&self, object: ObjectId) -> Option<[f32; 2]> {
        let v = self.body(object)?.linvel();
        Some([v.x as f32, v.y as f32])
    }

    /// Set a body's linear velocity. No-op for unknown objects.
    pub fn set_velocity(&mut self, object: ObjectId, velocity: [f32; 2]) {
        if let Some(body) = self.body_mut(object) {
            body.set_linvel(vector![velocity[0] as Real, velocity[1] as Real], true);
        }
    }

    /// Teleport a body. Resets the interpolation pair so the render does not
    /// sweep across the jump.
    pub fn set_position(&mut self, object: ObjectId, position: [f32; 2]) {
        if let Some(body) = self.body_mut(object) {
            body.set_translation(vector![position[0] as Real, position[1] as Real], true);
            let rotation = body.rotation().angle() as f32;
            self.transforms
                .insert(object, TransformPair::pinned(position, rotation));
        }
    }

    /// Apply an instantaneous impulse at the center of mass.
    pub fn apply_impulse(&mut self, object: ObjectId, impulse: [f32; 2]) {
        if let Some(body) = self.body_mut(object) {
            body.apply_impulse(vector![impulse[0] as Real, impulse[1] as Real], true);
        }
    }

    fn body(&self, object: ObjectId) -> Option<&RigidBody> {
        self.rigid_body_set.get(*self.object_to_body.get(&object)?)
    }

    fn body_mut(&mut self, object: ObjectId) -> Option<&mut RigidBody> {
        self.rigid_body_set
            .get_mut(*self.object_to_body.get(&object)?)
    }

    // -- contact toggling ---------------------------------------------------

    /// Enable or disable solver response for one body pair. Contact events
    /// keep flowing either way. Unknown objects are ignored with a warning.
    pub fn set_contact_enabled(&mut self, a: ObjectId, b: ObjectId, enabled: bool) {
        let (Some(&ca), Some(&cb)) = (
            self.object_to_collider.get(&a),
            self.object_to_collider.get(&b),
        ) else {
            warn!(%a, %b, "contact toggle on unknown body pair ignored");
            return;
        };
        let pair = ordered_pair(ca, cb);
        if enabled {
            self.disabled_contacts.remove(&pair);
        } else {
            self.disabled_contacts.insert(pair);
        }
    }

    /// Whether solver response is enabled for a body pair. Defaults to true.
    pub fn contact_enabled(&self, a: ObjectId, b: ObjectId) -> bool {
        match (
            self.object_to_collider.get(&a),
            self.object_to_collider.get(&b),
        ) {
            (Some(&ca), Some(&cb)) => !self.disabled_contacts.contains(&ordered_pair(ca, cb)),
            _ => true,
        }
    }

    // -- stepping -----------------------------------------------------------

    /// Step the simulation by `dt` seconds and return this step's contact
    /// events, deterministically ordered by `(a, b, phase)`.
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        self.integration_params.dt = dt as Real;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);
        let hooks = ContactToggle {
            disabled: &self.disabled_contacts,
        };

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &hooks,
            &event_handler,
        );

        let mut events = Vec::new();
        let mut started_pairs = HashSet::new();
        while let Ok(event) = collision_recv.try_recv() {
            match event {
                CollisionEvent::Started(h1, h2, _flags) => {
                    started_pairs.insert(ordered_pair(h1, h2));
                }
                CollisionEvent::Stopped(h1, h2, _flags) => {
                    if let Some((a, b)) = self.object_pair(h1, h2) {
                        events.push(ContactEvent {
                            a,
                            b,
                            phase: ContactPhase::Stopped,
                            normal: [0.0, 0.0],
                        });
                    }
                }
            }
        }

        // Touching pairs come from the narrow phase so Stay events carry a
        // manifold normal. Pairs that started this step are reported as
        // Started instead of Stayed.
        let mut reported = HashSet::new();
        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let key = ordered_pair(pair.collider1, pair.collider2);
            let Some((a, b)) = self.object_pair(pair.collider1, pair.collider2) else {
                continue;
            };
            // Normal from the first collider; flip when the ordered object
            // pair swapped the collider order.
            let mut normal = pair
                .manifolds
                .first()
                .map(|m| [m.data.normal.x as f32, m.data.normal.y as f32])
                .unwrap_or([0.0, 0.0]);
            if self.collider_to_object.get(&pair.collider1) != Some(&a) {
                normal = [-normal[0], -normal[1]];
            }
            let phase = if started_pairs.contains(&key) {
                reported.insert(key);
                ContactPhase::Started
            } else {
                ContactPhase::Stayed
            };
            events.push(ContactEvent {
                a,
                b,
                phase,
                normal,
            });
        }

        // Sensor overlaps never enter the contact graph; report their start
        // events with a zero normal.
        for key in started_pairs {
            if reported.contains(&key) {
                continue;
            }
            if let Some((a, b)) = self.object_pair(key.0, key.1) {
                events.push(ContactEvent {
                    a,
                    b,
                    phase: ContactPhase::Started,
                    normal: [0.0, 0.0],
                });
            }
        }

        // Channel delivery and narrow-phase iteration order may vary; sort
        // for deterministic dispatch.
        events.sort_by(|x, y| (x.a, x.b, x.phase).cmp(&(y.a, y.b, y.phase)));
        events
    }

    fn object_pair(&self, h1: ColliderHandle, h2: ColliderHandle) -> Option<(ObjectId, ObjectId)> {
        let o1 = *self.collider_to_object.get(&h1)?;
        let o2 = *self.collider_to_object.get(&h2)?;
        Some((o1.min(o2), o1.max(o2)))
    }

    // -- interpolation snapshots --------------------------------------------

    /// Shift every body's current transform into its `last` slot and capture
    /// the post-step transform as `curr`. Called once at the end of every
    /// fixed step.
    pub fn rotate_snapshots(&mut self) {
        for (&object, &body_handle) in &self.object_to_body {
            let Some(body) = self.rigid_body_set.get(body_handle) else {
                continue;
            };
            let t = body.translation();
            let curr = ([t.x as f32, t.y as f32], body.rotation().angle() as f32);
            self.transforms
                .entry(object)
                .and_modify(|pair| {
                    pair.last = pair.curr;
                    pair.curr = curr;
                })
                .or_insert(TransformPair {
                    last: curr,
                    curr,
                });
        }
    }

    /// The raw snapshot pair for a body.
    pub fn transform_pair(&self, object: ObjectId) -> Option<TransformPair> {
        self.transforms.get(&object).copied()
    }

    /// Transform to render a body at, blended between the previous and
    /// current fixed step by `alpha`.
    pub fn interpolated(&self, object: ObjectId, alpha: f32) -> Option<([f32; 2], f32)> {
        Some(self.transforms.get(&object)?.interpolated(alpha))
    }

    // -- queries ------------------------------------------------------------

    /// Closest hit along the `origin → end` segment, or `None`.
    pub fn ray_cast_first(
        &self,
        origin: [f32; 2],
        end: [f32; 2],
        mask: QueryMask,
    ) -> Option<RayHit> {
        let ray = Ray::new(
            point![origin[0] as Real, origin[1] as Real],
            vector![
                (end[0] - origin[0]) as Real,
                (end[1] - origin[1]) as Real
            ],
        );
        let (handle, intersection) = self.query_pipeline.cast_ray_and_get_normal(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            1.0,
            true,
            mask.to_filter(),
        )?;
        self.ray_hit(handle, &ray, &intersection)
    }

    /// All hits along the `origin → end` segment, ordered by fraction then
    /// object id.
    pub fn ray_cast_all(&self, origin: [f32; 2], end: [f32; 2], mask: QueryMask) -> Vec<RayHit> {
        let ray = Ray::new(
            point![origin[0] as Real, origin[1] as Real],
            vector![
                (end[0] - origin[0]) as Real,
                (end[1] - origin[1]) as Real
            ],
        );
        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            1.0,
            true,
            mask.to_filter(),
            |handle, intersection| {
                if let Some(hit) = self.ray_hit(handle, &ray, &intersection) {
                    hits.push(hit);
                }
                true
            },
        );
        hits.sort_by(|x, y| {
            x.fraction
                .total_cmp(&y.fraction)
                .then(x.object.cmp(&y.object))
        });
        hits
    }

    fn ray_hit(
        &self,
        handle: ColliderHandle,
        ray: &Ray,
        intersection: &RayIntersection,
    ) -> Option<RayHit> {
        let object = *self.collider_to_object.get(&handle)?;
        let point = ray.point_at(intersection.time_of_impact);
        Some(RayHit {
            object,
            point: [point.x as f32, point.y as f32],
            normal: [
                intersection.normal.x as f32,
                intersection.normal.y as f32,
            ],
            fraction: intersection.time_of_impact as f32,
        })
    }

    /// Objects whose collider AABB intersects the given world rect, sorted
    /// by id. This is the render-visibility broad-phase query.
    pub fn overlap_aabb(&self, rect: Rect) -> Vec<ObjectId> {
        let aabb = Aabb::new(
            point![rect.x as Real, rect.y as Real],
            point![(rect.x + rect.w) as Real, (rect.y + rect.h) as Real],
        );
        let mut objects = Vec::new();
        self.query_pipeline
            .colliders_with_aabb_intersecting_aabb(&aabb, |handle| {
                if let Some(&object) = self.collider_to_object.get(handle) {
                    objects.push(object);
                }
                true
            });
        objects.sort_unstable();
        objects.dedup();
        objects
    }

    /// Objects whose collider intersects a shape placed at `position`,
    /// sorted by id.
    pub fn intersect_shape(
        &self,
        position: [f32; 2],
        shape: ColliderShape,
        mask: QueryMask,
    ) -> Vec<ObjectId> {
        let iso = Isometry::new(
            vector![position[0] as Real, position[1] as Real],
            0.0,
        );
        let shared = shape.to_shared();
        let mut objects = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &iso,
            shared.as_ref(),
            mask.to_filter(),
            |handle| {
                if let Some(&object) = self.collider_to_object.get(&handle) {
                    objects.push(object);
                }
                true
            },
        );
        objects.sort_unstable();
        objects.dedup();
        objects
    }

    // -- debug draw ---------------------------------------------------------

    /// Outline gizmos for every collider, sorted by owning object id.
    pub fn debug_shapes(&self) -> Vec<Gizmo> {
        let mut shapes: Vec<(ObjectId, Gizmo)> = Vec::new();
        for (handle, collider) in self.collider_set.iter() {
            let Some(&object) = self.collider_to_object.get(&handle) else {
                continue;
            };
            let pos = collider.translation();
            let center = [pos.x as f32, pos.y as f32];
            let gizmo = if let Some(ball) = collider.shape().as_ball() {
                Gizmo::Circle {
                    center,
                    radius: ball.radius as f32,
                    color: Color::GREEN,
                }
            } else if let Some(cuboid) = collider.shape().as_cuboid() {
                Gizmo::Rect {
                    rect: Rect::from_center(
                        center,
                        [
                            cuboid.half_extents.x as f32,
                            cuboid.half_extents.y as f32,
                        ],
                    ),
                    color: Color::GREEN,
                }
            } else {
                Gizmo::Point {
                    at: center,
                    color: Color::GREEN,
                }
            };
            shapes.push((object, gizmo));
        }
        shapes.sort_by_key(|(object, _)| *object);
        shapes.into_iter().map(|(_, gizmo)| gizmo).collect()
    }
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.rigid_body_set.len())
            .field("colliders", &self.collider_set.len())
            .field("disabled_contacts", &self.disabled_contacts.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
