//! Render backend boundary and debug gizmos.
//!
//! The engine never talks to a window or GPU directly. Drawing goes through
//! the [`RenderBackend`] trait: immediate-mode texture blits plus a logical
//! resolution query. The host (SDL, a test harness, a headless recorder)
//! implements it; the engine stays deterministic and windowless.
//!
//! Debug overlays are expressed as [`Gizmo`] primitives. Gameplay code pushes
//! gizmos into the scene's [`GizmoQueue`] during a fixed step; the queue is
//! drained at the start of the next fixed step so each overlay is visible for
//! exactly one simulated step.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Basic draw types
// ---------------------------------------------------------------------------

/// Opaque handle to a texture decoded and owned by the asset layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Axis-aligned rectangle in world or texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum-corner x.
    pub x: f32,
    /// Minimum-corner y.
    pub y: f32,
    /// Width, non-negative.
    pub w: f32,
    /// Height, non-negative.
    pub h: f32,
}

impl Rect {
    /// Build a rect from its minimum corner and size.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect from its center point and half-extents.
    pub fn from_center(center: [f32; 2], half_extents: [f32; 2]) -> Self {
        Self {
            x: center[0] - half_extents[0],
            y: center[1] - half_extents[1],
            w: half_extents[0] * 2.0,
            h: half_extents[1] * 2.0,
        }
    }

    /// Center point of the rect.
    pub fn center(&self) -> [f32; 2] {
        [self.x + self.w * 0.5, self.y + self.h * 0.5]
    }

    /// True if the two rects overlap (touching edges count as overlapping).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }
}

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 = opaque.
    pub a: u8,
}

impl Color {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully specified RGBA color.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// White, the blit default.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Debug-overlay green.
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    /// Debug-overlay red.
    pub const RED: Color = Color::rgb(255, 0, 0);
}

/// Mirroring applied to a blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flip {
    /// Draw the texture as-is.
    #[default]
    None,
    /// Mirror around the vertical axis (facing-direction swap).
    Horizontal,
    /// Mirror around the horizontal axis.
    Vertical,
    /// Both mirrors combined.
    Both,
}

// ---------------------------------------------------------------------------
// RenderBackend
// ---------------------------------------------------------------------------

/// Host-implemented drawing surface.
///
/// All coordinates handed to the backend are already camera-projected by the
/// caller; the backend draws in logical pixels.
pub trait RenderBackend {
    /// Logical resolution of the drawing surface, in pixels.
    fn logical_size(&self) -> [u32; 2];

    /// Blit a region of a texture to a destination rect, with rotation in
    /// radians around the destination center, mirroring, and alpha
    /// modulation (255 = opaque).
    fn blit(
        &mut self,
        texture: TextureId,
        src: Rect,
        dst: Rect,
        rotation: f32,
        flip: Flip,
        alpha: u8,
    );

    /// Draw a single debug primitive on top of the scene.
    fn draw_gizmo(&mut self, gizmo: &Gizmo);
}

// ---------------------------------------------------------------------------
// Gizmos
// ---------------------------------------------------------------------------

/// A debug-overlay primitive in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Gizmo {
    /// Line segment between two points.
    Line {
        /// Segment start.
        from: [f32; 2],
        /// Segment end.
        to: [f32; 2],
        /// Draw color.
        color: Color,
    },
    /// Rectangle outline.
    Rect {
        /// The outlined rect.
        rect: Rect,
        /// Draw color.
        color: Color,
    },
    /// Circle outline.
    Circle {
        /// Circle center.
        center: [f32; 2],
        /// Circle radius.
        radius: f32,
        /// Draw color.
        color: Color,
    },
    /// Single highlighted point (drawn as a small cross).
    Point {
        /// Point position.
        at: [f32; 2],
        /// Draw color.
        color: Color,
    },
}

/// Per-step accumulator of ad-hoc debug gizmos.
///
/// Filled by gameplay code during a fixed step, drawn at render time, and
/// cleared at the start of the next fixed step.
#[derive(Debug, Default)]
pub struct GizmoQueue {
    gizmos: Vec<Gizmo>,
}

impl GizmoQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a debug primitive for this step's overlay.
    pub fn push(&mut self, gizmo: Gizmo) {
        self.gizmos.push(gizmo);
    }

    /// Queue a line segment.
    pub fn line(&mut self, from: [f32; 2], to: [f32; 2], color: Color) {
        self.push(Gizmo::Line { from, to, color });
    }

    /// Queue a rectangle outline.
    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.push(Gizmo::Rect { rect, color });
    }

    /// Queue a circle outline.
    pub fn circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        self.push(Gizmo::Circle {
            center,
            radius,
            color,
        });
    }

    /// The gizmos queued since the last clear.
    pub fn pending(&self) -> &[Gizmo] {
        &self.gizmos
    }

    /// Drop all queued gizmos.
    pub fn clear(&mut self) {
        self.gizmos.clear();
    }

    /// Number of queued gizmos.
    pub fn len(&self) -> usize {
        self.gizmos.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.gizmos.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Recording backend (test + headless use)
// ---------------------------------------------------------------------------

/// A draw call captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlitCall {
    /// The texture that was blitted.
    pub texture: TextureId,
    /// Source region within the texture.
    pub src: Rect,
    /// Destination rect on the surface.
    pub dst: Rect,
    /// Rotation in radians.
    pub rotation: f32,
    /// Mirroring.
    pub flip: Flip,
    /// Alpha modulation.
    pub alpha: u8,
}

/// Backend that records draw calls instead of rasterizing them.
///
/// Used by tests to assert on draw order and by headless tooling.
#[derive(Debug)]
pub struct RecordingBackend {
    size: [u32; 2],
    /// Every blit, in submission order.
    pub blits: Vec<BlitCall>,
    /// Every gizmo, in submission order.
    pub gizmos: Vec<Gizmo>,
}

impl RecordingBackend {
    /// Create a recorder with the given logical size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width, height],
            blits: Vec::new(),
            gizmos: Vec::new(),
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn logical_size(&self) -> [u32; 2] {
        self.size
    }

    fn blit(
        &mut self,
        texture: TextureId,
        src: Rect,
        dst: Rect,
        rotation: f32,
        flip: Flip,
        alpha: u8,
    ) {
        self.blits.push(BlitCall {
            texture,
            src,
            dst,
            rotation,
            flip,
            alpha,
        });
    }

    fn draw_gizmo(&mut self, gizmo: &Gizmo) {
        self.gizmos.push(gizmo.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_center_round_trips() {
        let r = Rect::from_center([10.0, 20.0], [3.0, 4.0]);
        assert_eq!(r.x, 7.0);
        assert_eq!(r.y, 16.0);
        assert_eq!(r.w, 6.0);
        assert_eq!(r.h, 8.0);
        assert_eq!(r.center(), [10.0, 20.0]);
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 1.0, 1.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn gizmo_queue_drains_on_clear() {
        let mut queue = GizmoQueue::new();
        queue.line([0.0, 0.0], [1.0, 1.0], Color::GREEN);
        queue.circle([0.0, 0.0], 2.0, Color::RED);
        assert_eq!(queue.len(), 2);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn recording_backend_captures_order() {
        let mut backend = RecordingBackend::new(640, 360);
        let src = Rect::new(0.0, 0.0, 16.0, 16.0);
        backend.blit(TextureId(1), src, src, 0.0, Flip::None, 255);
        backend.blit(TextureId(2), src, src, 0.0, Flip::Horizontal, 128);
        assert_eq!(backend.blits.len(), 2);
        assert_eq!(backend.blits[0].texture, TextureId(1));
        assert_eq!(backend.blits[1].flip, Flip::Horizontal);
        assert_eq!(backend.logical_size(), [640, 360]);
    }
}
