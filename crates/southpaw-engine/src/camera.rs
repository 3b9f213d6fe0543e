//! Cameras.
//!
//! A [`CameraLens`] is the pure view description: a world-space center and
//! half-extents, with helpers to compute the culling AABB and to project
//! world coordinates into logical pixels. [`Camera`] wraps a lens in a
//! [`GameObject`] so it lives in the scene graph like everything else; the
//! scene holds only the active camera's id, never a reference.

use serde::{Deserialize, Serialize};
use southpaw_object::id::ObjectId;

use crate::object::{GameObject, ObjectCtx};
use crate::render::Rect;

// ---------------------------------------------------------------------------
// CameraLens
// ---------------------------------------------------------------------------

/// World-space view rectangle of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraLens {
    /// World-space view center.
    pub center: [f32; 2],
    /// Half-width and half-height of the view.
    pub half_extents: [f32; 2],
}

impl CameraLens {
    /// A lens centered on a point with the given half-extents.
    pub fn new(center: [f32; 2], half_extents: [f32; 2]) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// The world-space AABB used for visibility culling.
    pub fn view_aabb(&self) -> Rect {
        Rect::from_center(self.center, self.half_extents)
    }

    /// Project a world point to logical pixels. The y axis flips: world +y
    /// is up, screen +y is down.
    pub fn world_to_screen(&self, world: [f32; 2], logical_size: [u32; 2]) -> [f32; 2] {
        let scale_x = logical_size[0] as f32 / (self.half_extents[0] * 2.0);
        let scale_y = logical_size[1] as f32 / (self.half_extents[1] * 2.0);
        [
            (world[0] - self.center[0] + self.half_extents[0]) * scale_x,
            (self.center[1] + self.half_extents[1] - world[1]) * scale_y,
        ]
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// A scene-graph camera, optionally tracking a physics body.
#[derive(Debug)]
pub struct Camera {
    lens: CameraLens,
    follow: Option<ObjectId>,
}

impl Camera {
    /// A fixed camera with the given lens.
    pub fn new(lens: CameraLens) -> Self {
        Self { lens, follow: None }
    }

    /// A camera that recenters on a body's interpolated position each tick.
    pub fn following(lens: CameraLens, target: ObjectId) -> Self {
        Self {
            lens,
            follow: Some(target),
        }
    }

    /// The current lens.
    pub fn lens(&self) -> CameraLens {
        self.lens
    }

    /// Replace the tracked body, or stop tracking with `None`.
    pub fn set_follow(&mut self, target: Option<ObjectId>) {
        self.follow = target;
    }
}

impl GameObject for Camera {
    fn update(&mut self, _id: ObjectId, ctx: &mut ObjectCtx<'_>) {
        // A dead or body-less target leaves the camera where it was.
        if let Some(target) = self.follow {
            if let Some((position, _)) = ctx.physics.interpolated(target, ctx.alpha) {
                self.lens.center = position;
            }
        }
    }

    fn as_camera(&self) -> Option<CameraLens> {
        Some(self.lens)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_aabb_matches_lens() {
        let lens = CameraLens::new([10.0, 5.0], [8.0, 4.5]);
        let aabb = lens.view_aabb();
        assert_eq!(aabb.x, 2.0);
        assert_eq!(aabb.y, 0.5);
        assert_eq!(aabb.w, 16.0);
        assert_eq!(aabb.h, 9.0);
    }

    #[test]
    fn world_to_screen_centers_and_flips_y() {
        let lens = CameraLens::new([0.0, 0.0], [8.0, 4.5]);
        let size = [1280, 720];
        assert_eq!(lens.world_to_screen([0.0, 0.0], size), [640.0, 360.0]);
        assert_eq!(lens.world_to_screen([-8.0, 4.5], size), [0.0, 0.0]);
        assert_eq!(lens.world_to_screen([8.0, -4.5], size), [1280.0, 720.0]);
    }

    #[test]
    fn camera_exposes_its_lens() {
        let camera = Camera::new(CameraLens::new([1.0, 2.0], [3.0, 4.0]));
        let lens = camera.as_camera().expect("camera objects expose a lens");
        assert_eq!(lens.center, [1.0, 2.0]);
    }
}
