//! Object identifiers.
//!
//! An [`ObjectId`] is a monotonically increasing 64-bit handle assigned by the
//! [`ObjectManager`](crate::manager::ObjectManager) when an object is
//! registered. Ids are never reused, so a stale handle can never silently
//! alias a newer object -- lookups with a dead id simply miss.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// A unique, monotonically increasing object identifier.
///
/// Ordering follows creation order: if `a < b` then `a` was registered
/// before `b`. This ordering is load-bearing -- it is the deterministic
/// tie-breaker in every batch sort the manager performs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Construct an `ObjectId` from a raw value.
    ///
    /// Intended for the manager's allocator and for tests; gameplay code
    /// receives ids from registration and never forges them.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw `u64` representation.
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_raw_value() {
        let a = ObjectId::from_raw(1);
        let b = ObjectId::from_raw(2);
        assert!(a < b);
        assert_eq!(a, ObjectId::from_raw(1));
    }

    #[test]
    fn raw_roundtrip() {
        let id = ObjectId::from_raw(42);
        assert_eq!(ObjectId::from_raw(id.to_raw()), id);
        assert_eq!(format!("{id}"), "#42");
    }

    #[test]
    fn serde_roundtrip() {
        let id = ObjectId::from_raw(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
