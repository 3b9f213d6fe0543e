//! Asset-store boundary.
//!
//! Decoding textures, fonts, and sounds is host work; the engine only deals
//! in opaque integer handles. [`AssetStore`] is the lookup contract: loads
//! return a typed error instead of aborting, and handle lookups are `Option`
//! misses, never panics.

use std::collections::HashMap;

use crate::render::TextureId;

/// Failure to produce a usable asset handle.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    /// The backing file does not exist.
    #[error("asset not found: {path}")]
    NotFound {
        /// The path that was requested.
        path: String,
    },

    /// The file exists but could not be decoded.
    #[error("failed to decode asset {path}: {reason}")]
    Decode {
        /// The path that was requested.
        path: String,
        /// Host-provided decode failure description.
        reason: String,
    },
}

/// Host-implemented asset lookup.
pub trait AssetStore {
    /// Load (or return the cached handle for) a texture.
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetLoadError>;

    /// Pixel dimensions of a loaded texture, `None` for unknown handles.
    fn texture_size(&self, texture: TextureId) -> Option<[u32; 2]>;
}

/// In-memory store for tests and headless runs: every path "loads" with a
/// fixed size, and handles are assigned sequentially.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    by_path: HashMap<String, TextureId>,
    sizes: HashMap<TextureId, [u32; 2]>,
    next_id: u32,
}

impl MemoryAssets {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetStore for MemoryAssets {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetLoadError> {
        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.by_path.insert(path.to_owned(), id);
        self.sizes.insert(id, [64, 64]);
        Ok(id)
    }

    fn texture_size(&self, texture: TextureId) -> Option<[u32; 2]> {
        self.sizes.get(&texture).copied()
    }
}
